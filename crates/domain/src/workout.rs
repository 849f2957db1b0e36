use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DeleteError, ReadError, UpdateError};

/// Implementations return sanitized collections only; loaded data never
/// violates the model invariants.
pub trait WorkoutRepository {
    fn read_workouts(&self) -> Result<Vec<Workout>, ReadError>;
    fn write_workouts(&self, workouts: &[Workout]) -> Result<(), UpdateError>;
    fn delete_workouts(&self) -> Result<(), DeleteError>;
}

/// A logged training session. `total_sets` and `total_volume` are derived
/// from `exercises` and recomputed on every decode, `started_at` never lies
/// after `performed_at`, and `exercises` is non-empty.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub title: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub performed_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub total_sets: u32,
    pub total_volume: f64,
    pub exercises: Vec<WorkoutExercise>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    pub id: String,
    pub name: String,
    pub sets: Vec<WorkoutSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    pub id: String,
    pub weight: f64,
    pub reps: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Runtime input to `Service::add_workout`. Drafts carry whatever a caller
/// collected, including non-positive reps and non-finite weights; the
/// sanitizer decides what survives.
#[derive(Debug, Clone, Default)]
pub struct NewWorkout {
    pub title: Option<String>,
    pub performed_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<u32>,
    pub exercises: Vec<ExerciseDraft>,
}

#[derive(Debug, Clone)]
pub struct ExerciseDraft {
    pub name: String,
    pub sets: Vec<SetDraft>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SetDraft {
    pub weight: f64,
    pub reps: i64,
    pub completed: bool,
    pub notes: Option<String>,
}

impl SetDraft {
    #[must_use]
    pub fn new(weight: f64, reps: i64) -> Self {
        Self {
            weight,
            reps,
            completed: false,
            notes: None,
        }
    }
}
