//! Tolerant decoding of untrusted workout data.
//!
//! Persisted blobs and imported payloads arrive as arbitrary JSON. Every
//! function here is total: malformed values are replaced with a fallback or
//! dropped, entries that cannot be repaired are rejected as `None`, and
//! nothing panics or returns an error. Collections that survive satisfy the
//! model invariants (positive reps, non-negative weights, non-empty
//! exercises, recomputed totals, `started_at` not after `performed_at`).

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::{ExerciseDraft, SetDraft, Template, Workout, WorkoutExercise, WorkoutSet, stats};

pub(crate) const DEFAULT_WORKOUT_TITLE: &str = "Workout";
pub(crate) const DEFAULT_EXERCISE_NAME: &str = "Exercise";
pub(crate) const DEFAULT_TEMPLATE_NAME: &str = "Untitled Template";

/// Decodes a persisted workout collection. Anything that is not an array
/// yields an empty collection; surviving entries are sorted by
/// `performed_at`, newest first.
#[must_use]
pub fn workouts(raw: &Value, now: DateTime<Utc>) -> Vec<Workout> {
    let Value::Array(entries) = raw else {
        return vec![];
    };
    let mut workouts = entries
        .iter()
        .filter_map(|entry| workout(entry, now))
        .collect::<Vec<_>>();
    workouts.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
    workouts
}

/// Decodes a single workout. Returns `None` for non-objects and for
/// workouts without a single valid exercise.
#[must_use]
pub fn workout(raw: &Value, now: DateTime<Utc>) -> Option<Workout> {
    let object = raw.as_object()?;
    let exercises = exercises(object.get("exercises").unwrap_or(&Value::Null));
    if exercises.is_empty() {
        return None;
    }
    let performed_at = instant(object.get("performedAt")).unwrap_or(now);
    let started_at = instant(object.get("startedAt"))
        .unwrap_or(performed_at)
        .min(performed_at);
    let totals = stats::totals(&exercises);
    Some(Workout {
        id: id_or(object.get("id"), || workout_id(performed_at)),
        title: name_or(object.get("title"), DEFAULT_WORKOUT_TITLE),
        performed_at,
        started_at,
        duration_minutes: minutes(object.get("durationMinutes")),
        total_sets: totals.total_sets,
        total_volume: totals.total_volume,
        exercises,
    })
}

#[must_use]
pub fn exercises(raw: &Value) -> Vec<WorkoutExercise> {
    let Value::Array(entries) = raw else {
        return vec![];
    };
    entries.iter().filter_map(exercise).collect()
}

fn exercise(raw: &Value) -> Option<WorkoutExercise> {
    let object = raw.as_object()?;
    let sets = sets(object.get("sets"));
    if sets.is_empty() {
        return None;
    }
    Some(WorkoutExercise {
        id: id_or(object.get("id"), exercise_id),
        name: name_or(object.get("name"), DEFAULT_EXERCISE_NAME),
        sets,
        notes: text(object.get("notes")),
    })
}

fn sets(raw: Option<&Value>) -> Vec<WorkoutSet> {
    let Some(Value::Array(entries)) = raw else {
        return vec![];
    };
    entries.iter().filter_map(set).collect()
}

fn set(raw: &Value) -> Option<WorkoutSet> {
    let object = raw.as_object()?;
    let reps = reps(object.get("reps"))?;
    Some(WorkoutSet {
        id: id_or(object.get("id"), set_id),
        weight: number(object.get("weight"), 0.0).max(0.0),
        reps,
        completed: boolean(object.get("completed")),
        notes: text(object.get("notes")),
    })
}

#[must_use]
pub fn templates(raw: &Value, now: DateTime<Utc>) -> Vec<Template> {
    let Value::Array(entries) = raw else {
        return vec![];
    };
    entries
        .iter()
        .filter_map(|entry| template(entry, now))
        .collect()
}

#[must_use]
pub fn template(raw: &Value, now: DateTime<Utc>) -> Option<Template> {
    let object = raw.as_object()?;
    let exercises = exercises(object.get("exercises").unwrap_or(&Value::Null));
    if exercises.is_empty() {
        return None;
    }
    Some(Template {
        id: id_or(object.get("id"), || template_id(now)),
        name: name_or(object.get("name"), DEFAULT_TEMPLATE_NAME),
        description: text(object.get("description")),
        exercises,
    })
}

/// Validates typed runtime input the same way raw JSON is validated: names
/// are trimmed with fallbacks, sets with non-positive reps are dropped,
/// non-finite or negative weights are clamped to zero, and exercises left
/// without sets are dropped.
#[must_use]
pub fn exercise_drafts(drafts: Vec<ExerciseDraft>) -> Vec<WorkoutExercise> {
    drafts.into_iter().filter_map(exercise_draft).collect()
}

fn exercise_draft(draft: ExerciseDraft) -> Option<WorkoutExercise> {
    let sets = draft
        .sets
        .into_iter()
        .filter_map(set_draft)
        .collect::<Vec<_>>();
    if sets.is_empty() {
        return None;
    }
    let name = draft.name.trim();
    Some(WorkoutExercise {
        id: exercise_id(),
        name: if name.is_empty() {
            DEFAULT_EXERCISE_NAME.to_string()
        } else {
            name.to_string()
        },
        sets,
        notes: draft.notes,
    })
}

fn set_draft(draft: SetDraft) -> Option<WorkoutSet> {
    let reps = u32::try_from(draft.reps).ok().filter(|reps| *reps > 0)?;
    Some(WorkoutSet {
        id: set_id(),
        weight: if draft.weight.is_finite() {
            draft.weight.max(0.0)
        } else {
            0.0
        },
        reps,
        completed: draft.completed,
        notes: draft.notes,
    })
}

/// Numeric coercion: JSON numbers pass through, strings are trimmed and
/// parsed, everything else and every non-finite result becomes the
/// fallback.
pub(crate) fn number(value: Option<&Value>, fallback: f64) -> f64 {
    finite(value).unwrap_or(fallback)
}

fn finite(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    number.filter(|number| number.is_finite())
}

/// Boolean coercion: native booleans pass through, strings count as true
/// when they spell "true" after trimming, case-insensitively, and
/// everything else is false.
pub(crate) fn boolean(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn reps(value: Option<&Value>) -> Option<u32> {
    let reps = number(value, 0.0).round();
    if reps < 1.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let reps = reps as u32;
    Some(reps)
}

fn minutes(value: Option<&Value>) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let minutes = number(value, 1.0).round().max(1.0) as u32;
    minutes
}

fn instant(value: Option<&Value>) -> Option<DateTime<Utc>> {
    #[allow(clippy::cast_possible_truncation)]
    let millis = finite(value)?.round() as i64;
    DateTime::from_timestamp_millis(millis)
}

fn id_or(value: Option<&Value>, fresh: impl FnOnce() -> String) -> String {
    match value {
        Some(Value::String(id)) => id.clone(),
        _ => fresh(),
    }
}

fn name_or(value: Option<&Value>, fallback: &str) -> String {
    match value {
        Some(Value::String(name)) if !name.trim().is_empty() => name.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => Some(text.clone()),
        _ => None,
    }
}

fn random_suffix() -> String {
    let mut buffer = Uuid::encode_buffer();
    Uuid::new_v4().simple().encode_lower(&mut buffer)[..6].to_string()
}

pub(crate) fn workout_id(performed_at: DateTime<Utc>) -> String {
    format!("w-{}-{}", performed_at.timestamp_millis(), random_suffix())
}

pub(crate) fn template_id(now: DateTime<Utc>) -> String {
    format!("t-{}-{}", now.timestamp_millis(), random_suffix())
}

pub(crate) fn measurement_id(now: DateTime<Utc>) -> String {
    format!("m-{}-{}", now.timestamp_millis(), random_suffix())
}

fn set_id() -> String {
    format!("set-{}", random_suffix())
}

fn exercise_id() -> String {
    format!("ex-{}", random_suffix())
}
