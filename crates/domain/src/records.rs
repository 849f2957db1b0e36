use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::{Badge, Settings, WorkoutExercise};

/// Best effort for an exercise, keyed externally by the lower-cased
/// exercise name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRecord {
    pub weight: f64,
    pub reps: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    #[serde(rename = "estimated1RM")]
    pub estimated_one_rm: f64,
}

/// Estimated one-rep max via the Epley formula, rounded to the nearest
/// kilogram: `weight × (1 + reps / 30)`. A single rep is the weight itself;
/// non-positive weight or zero reps yield 0.
#[must_use]
pub fn estimate_one_rm(weight: f64, reps: u32) -> f64 {
    if reps == 0 || weight <= 0.0 {
        return 0.0;
    }
    if reps == 1 {
        return weight;
    }
    (weight * (1.0 + f64::from(reps) / 30.0)).round()
}

/// Applies a finished workout to the progression state, in order: streak
/// update, personal records, badge sweep. Returns the badges earned by this
/// call.
///
/// The cumulative set and volume thresholds in the badge sweep are
/// estimates derived from `total_workouts_logged` (× 9 sets, × 5000 kg per
/// workout); the totals passed by the caller are part of the contract but
/// do not feed them.
pub fn record_workout(
    settings: &mut Settings,
    exercises: &[WorkoutExercise],
    _total_volume: f64,
    _total_sets: u32,
    now: DateTime<Utc>,
) -> Vec<Badge> {
    let today = now.with_timezone(&Local).date_naive();
    match settings.last_workout_date {
        None => settings.streak = 1,
        Some(last) => {
            let gap = (today - last.with_timezone(&Local).date_naive()).num_days();
            if gap == 1 {
                settings.streak += 1;
            } else if gap > 1 {
                settings.streak = 1;
            }
        }
    }
    settings.last_workout_date = Some(now);
    settings.total_workouts_logged += 1;

    let mut earned = vec![];

    for exercise in exercises {
        let key = exercise.name.to_lowercase();
        for set in &exercise.sets {
            if set.weight <= 0.0 || set.reps == 0 {
                continue;
            }
            let estimate = estimate_one_rm(set.weight, set.reps);
            let improved = settings
                .personal_records
                .get(&key)
                .is_none_or(|record| estimate > record.estimated_one_rm);
            if improved {
                settings.personal_records.insert(
                    key.clone(),
                    PersonalRecord {
                        weight: set.weight,
                        reps: set.reps,
                        date: now,
                        estimated_one_rm: estimate,
                    },
                );
                earn(&mut settings.badges, Badge::PR_HUNTER, now, &mut earned);
            }
        }
    }

    let total_workouts = settings.total_workouts_logged;
    let streak = settings.streak;
    let cumulative_sets = u64::from(total_workouts) * 9;
    let cumulative_volume = f64::from(total_workouts) * 5000.0;
    for badge in &mut settings.badges {
        if badge.earned_at.is_some() {
            continue;
        }
        let unlocked = match badge.id.as_str() {
            Badge::FIRST_WORKOUT => total_workouts >= 1,
            Badge::WEEK_STREAK => streak >= 7,
            Badge::THREE_WEEK => streak >= 21,
            Badge::CENTURION => cumulative_sets >= 100,
            Badge::VOLUME_KING => cumulative_volume >= 10_000.0,
            Badge::CONSISTENT => total_workouts >= 10,
            Badge::DEDICATION => total_workouts >= 50,
            _ => false,
        };
        if unlocked {
            badge.earned_at = Some(now);
            earned.push(badge.clone());
        }
    }

    earned
}

fn earn(badges: &mut [Badge], id: &str, now: DateTime<Utc>, earned: &mut Vec<Badge>) {
    if let Some(badge) = badges
        .iter_mut()
        .find(|badge| badge.id == id && badge.earned_at.is_none())
    {
        badge.earned_at = Some(now);
        earned.push(badge.clone());
    }
}
