use std::{cmp, collections::BTreeMap};

use chrono::{DateTime, Duration, Utc};
use derive_more::Display;

use crate::{
    catalog::{self, MuscleGroup},
    plan::Experience,
    workout::Workout,
};

/// Two top weights closer than this count as the same load.
const PLATEAU_TOLERANCE: f64 = 2.5;

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightKind {
    #[display("plateau")]
    Plateau,
    #[display("fatigue")]
    Fatigue,
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    #[display("info")]
    Info,
    #[display("warning")]
    Warning,
    #[display("success")]
    Success,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: &'static str,
    pub message: String,
    pub severity: Severity,
    pub exercise: Option<String>,
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceStatus {
    #[display("undertrained")]
    Undertrained,
    #[display("optimal")]
    Optimal,
    #[display("overtrained")]
    Overtrained,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuscleBalance {
    pub muscle_group: MuscleGroup,
    pub weekly_sets: u32,
    pub target_sets: u32,
    pub status: BalanceStatus,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingAge {
    pub level: Experience,
    pub weeks: u64,
    pub description: &'static str,
}

/// Plateau and fatigue findings, in that order.
#[must_use]
pub fn insights(workouts: &[Workout], now: DateTime<Utc>) -> Vec<Insight> {
    let mut insights = plateaus(workouts);
    insights.append(&mut fatigue(workouts, now));
    insights
}

/// Flags exercises whose top weight has not moved across the last four
/// sessions spanning at least two weeks.
#[must_use]
pub fn plateaus(workouts: &[Workout]) -> Vec<Insight> {
    let mut history: Vec<(&str, Vec<(DateTime<Utc>, f64)>)> = Vec::new();
    for workout in workouts {
        for exercise in &workout.exercises {
            let top_weight = exercise
                .sets
                .iter()
                .map(|set| set.weight)
                .fold(0.0_f64, f64::max);
            match history.iter_mut().find(|(name, _)| *name == exercise.name) {
                Some((_, sessions)) => sessions.push((workout.performed_at, top_weight)),
                None => history.push((&exercise.name, vec![(workout.performed_at, top_weight)])),
            }
        }
    }

    let mut insights = Vec::new();
    for (name, mut sessions) in history {
        if sessions.len() < 4 {
            continue;
        }
        sessions.sort_by_key(|(date, _)| cmp::Reverse(*date));
        let recent = &sessions[..4];
        let reference = recent[0].1;
        let stalled = recent
            .iter()
            .all(|(_, weight)| (weight - reference).abs() < PLATEAU_TOLERANCE);
        let days = span_days(recent[0].0, recent[3].0);
        if stalled && days >= 14.0 {
            insights.push(Insight {
                kind: InsightKind::Plateau,
                title: "Plateau Detected",
                message: format!(
                    "{name} weight has stalled at {reference}kg for {} days",
                    days.round()
                ),
                severity: Severity::Warning,
                exercise: Some(name.to_string()),
            });
        }
    }
    insights
}

/// Flags overtraining risks in the trailing week, first by frequency, then
/// by volume relative to the recent average.
#[must_use]
pub fn fatigue(workouts: &[Workout], now: DateTime<Utc>) -> Vec<Insight> {
    let mut insights = Vec::new();
    let week = Duration::days(7);
    let recent = workouts
        .iter()
        .filter(|workout| now - workout.performed_at < week)
        .collect::<Vec<_>>();

    if recent.len() >= 6 {
        insights.push(Insight {
            kind: InsightKind::Fatigue,
            title: "High Training Frequency",
            message: format!(
                "{} workouts in the last week. Consider a rest day for recovery.",
                recent.len()
            ),
            severity: Severity::Warning,
            exercise: None,
        });
    }

    let weekly_volume = recent
        .iter()
        .map(|workout| workout.total_volume)
        .sum::<f64>();
    #[allow(clippy::cast_precision_loss)]
    let average = if workouts.len() > 4 {
        let sample = &workouts[..workouts.len().min(20)];
        sample
            .iter()
            .map(|workout| workout.total_volume)
            .sum::<f64>()
            / sample.len() as f64
    } else {
        weekly_volume / recent.len().max(1) as f64
    };

    if weekly_volume > average * 1.5 && recent.len() >= 3 {
        insights.push(Insight {
            kind: InsightKind::Fatigue,
            title: "Volume Spike",
            message: "Weekly volume is 50% higher than your average. Watch for signs of fatigue."
                .to_string(),
            severity: Severity::Warning,
            exercise: None,
        });
    }
    insights
}

/// Trailing-week set counts per muscle group against the weekly targets.
/// Exercises missing from the catalogue are not counted.
#[must_use]
pub fn muscle_balance(workouts: &[Workout], now: DateTime<Utc>) -> Vec<MuscleBalance> {
    const TARGETS: &[(MuscleGroup, u32)] = &[
        (MuscleGroup::Chest, 12),
        (MuscleGroup::Back, 14),
        (MuscleGroup::Shoulders, 10),
        (MuscleGroup::Biceps, 8),
        (MuscleGroup::Triceps, 8),
        (MuscleGroup::Forearms, 4),
        (MuscleGroup::Legs, 16),
        (MuscleGroup::Glutes, 8),
        (MuscleGroup::Core, 6),
    ];

    let week = Duration::days(7);
    let mut weekly_sets = BTreeMap::<MuscleGroup, u32>::new();
    for workout in workouts
        .iter()
        .filter(|workout| now - workout.performed_at < week)
    {
        for exercise in &workout.exercises {
            let Some(entry) = catalog::get(&exercise.name) else {
                continue;
            };
            let sets = u32::try_from(exercise.sets.len()).unwrap_or(u32::MAX);
            *weekly_sets.entry(entry.muscle_group).or_default() += sets;
        }
    }

    TARGETS
        .iter()
        .map(|&(muscle_group, target_sets)| {
            let actual = weekly_sets.get(&muscle_group).copied().unwrap_or(0);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let percentage =
                (f64::from(actual) / f64::from(target_sets) * 100.0).round() as u32;
            let status = if percentage < 70 {
                BalanceStatus::Undertrained
            } else if percentage > 130 {
                BalanceStatus::Overtrained
            } else {
                BalanceStatus::Optimal
            };
            MuscleBalance {
                muscle_group,
                weekly_sets: actual,
                target_sets,
                status,
                percentage,
            }
        })
        .collect()
}

/// Classifies the lifter by history depth, from the oldest workout on
/// record and the total session count.
#[must_use]
pub fn training_age(workouts: &[Workout], now: DateTime<Utc>) -> TrainingAge {
    let Some(oldest) = workouts.iter().map(|workout| workout.performed_at).min() else {
        return TrainingAge {
            level: Experience::Beginner,
            weeks: 0,
            description: "Just getting started",
        };
    };
    let weeks = u64::try_from((now - oldest).num_weeks()).unwrap_or(0);
    if weeks < 8 || workouts.len() < 15 {
        TrainingAge {
            level: Experience::Beginner,
            weeks,
            description: "Building foundations",
        }
    } else if weeks < 52 || workouts.len() < 100 {
        TrainingAge {
            level: Experience::Intermediate,
            weeks,
            description: "Consistent progress",
        }
    } else {
        TrainingAge {
            level: Experience::Advanced,
            weeks,
            description: "Experienced lifter",
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn span_days(newest: DateTime<Utc>, oldest: DateTime<Utc>) -> f64 {
    (newest - oldest).num_milliseconds() as f64 / 86_400_000.0
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::workout::{WorkoutExercise, WorkoutSet};

    static NOW: LazyLock<DateTime<Utc>> =
        LazyLock::new(|| Utc.with_ymd_and_hms(2024, 12, 6, 18, 0, 0).unwrap());

    fn workout(days_ago: i64, volume: f64, exercises: Vec<WorkoutExercise>) -> Workout {
        let performed_at = *NOW - Duration::days(days_ago);
        Workout {
            id: format!("w-{days_ago}"),
            title: "Session".to_string(),
            performed_at,
            started_at: performed_at,
            duration_minutes: 60,
            total_sets: 0,
            total_volume: volume,
            exercises,
        }
    }

    fn exercise(name: &str, weights: &[f64]) -> WorkoutExercise {
        WorkoutExercise {
            id: format!("ex-{}", name.to_lowercase()),
            name: name.to_string(),
            sets: weights
                .iter()
                .enumerate()
                .map(|(index, &weight)| WorkoutSet {
                    id: format!("set-{index}"),
                    weight,
                    reps: 5,
                    completed: true,
                    notes: None,
                })
                .collect(),
            notes: None,
        }
    }

    fn stalled_history(weights: [f64; 4], days: [i64; 4]) -> Vec<Workout> {
        weights
            .iter()
            .zip(days)
            .map(|(&weight, days_ago)| {
                workout(days_ago, 0.0, vec![exercise("Bench Press", &[weight])])
            })
            .collect()
    }

    #[test]
    fn test_plateau_detected_after_four_flat_sessions() {
        let workouts = stalled_history([100.0, 100.0, 101.0, 100.0], [0, 5, 10, 15]);
        let found = plateaus(&workouts);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, InsightKind::Plateau);
        assert_eq!(found[0].severity, Severity::Warning);
        assert_eq!(found[0].exercise.as_deref(), Some("Bench Press"));
        assert_eq!(
            found[0].message,
            "Bench Press weight has stalled at 100kg for 15 days"
        );
    }

    #[rstest]
    #[case::progressing([100.0, 97.0, 94.0, 90.0], [0, 5, 10, 15])]
    #[case::tolerance_boundary([100.0, 102.5, 100.0, 100.0], [0, 5, 10, 15])]
    #[case::too_compressed([100.0, 100.0, 100.0, 100.0], [0, 4, 8, 12])]
    fn test_no_plateau(#[case] weights: [f64; 4], #[case] days: [i64; 4]) {
        assert_eq!(plateaus(&stalled_history(weights, days)), vec![]);
    }

    #[test]
    fn test_plateau_needs_four_sessions() {
        let workouts = stalled_history([100.0, 100.0, 100.0, 100.0], [0, 7, 14, 21]);
        assert_eq!(plateaus(&workouts[..3]).len(), 0);
        assert_eq!(plateaus(&workouts).len(), 1);
    }

    #[test]
    fn test_plateau_tracks_top_set_weight() {
        // The 60kg back-off sets never mask the stalled 100kg top set.
        let workouts = [0, 5, 10, 15]
            .map(|days_ago| {
                workout(
                    days_ago,
                    0.0,
                    vec![exercise("Squat", &[60.0, 100.0, 60.0])],
                )
            })
            .to_vec();
        assert_eq!(plateaus(&workouts).len(), 1);
    }

    #[test]
    fn test_high_frequency_warning() {
        let workouts = (0..6)
            .map(|days_ago| workout(days_ago, 1000.0, vec![]))
            .collect::<Vec<_>>();
        let found = fatigue(&workouts, *NOW);
        assert_eq!(found[0].title, "High Training Frequency");
        assert_eq!(
            found[0].message,
            "6 workouts in the last week. Consider a rest day for recovery."
        );
    }

    #[test]
    fn test_volume_spike_against_recent_average() {
        let mut workouts = (0..3)
            .map(|days_ago| workout(days_ago, 2000.0, vec![]))
            .collect::<Vec<_>>();
        workouts.extend((0..6).map(|index| workout(30 + index, 1000.0, vec![])));

        let found = fatigue(&workouts, *NOW);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Volume Spike");
    }

    #[test]
    fn test_volume_spike_with_short_history() {
        // With four or fewer workouts the baseline is the weekly mean, so
        // three sessions in one week always read as a spike.
        let workouts = (0..3)
            .map(|days_ago| workout(days_ago, 1500.0, vec![]))
            .collect::<Vec<_>>();
        let found = fatigue(&workouts, *NOW);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Volume Spike");
    }

    #[test]
    fn test_no_fatigue_for_light_week() {
        // Twice a week stays under the three-session spike threshold.
        let workouts = [0, 3, 10, 15, 20]
            .map(|days_ago| workout(days_ago, 1000.0, vec![]))
            .to_vec();
        assert_eq!(fatigue(&workouts, *NOW), vec![]);
    }

    #[test]
    fn test_muscle_balance_counts_trailing_week_sets() {
        let workouts = vec![
            workout(
                1,
                0.0,
                vec![
                    exercise("Bench Press", &[100.0, 100.0, 100.0]),
                    exercise("Squat", &[140.0, 140.0]),
                    exercise("Yoga", &[0.0]),
                ],
            ),
            // Outside the window, never counted.
            workout(9, 0.0, vec![exercise("Bench Press", &[100.0; 12])]),
        ];

        let balance = muscle_balance(&workouts, *NOW);
        assert_eq!(balance.len(), 9);

        let chest = &balance[0];
        assert_eq!(chest.muscle_group, MuscleGroup::Chest);
        assert_eq!(chest.weekly_sets, 3);
        assert_eq!(chest.target_sets, 12);
        assert_eq!(chest.percentage, 25);
        assert_eq!(chest.status, BalanceStatus::Undertrained);

        let legs = balance
            .iter()
            .find(|entry| entry.muscle_group == MuscleGroup::Legs)
            .unwrap();
        assert_eq!(legs.weekly_sets, 2);
        assert_eq!(legs.percentage, 13);

        let core = balance
            .iter()
            .find(|entry| entry.muscle_group == MuscleGroup::Core)
            .unwrap();
        assert_eq!(core.weekly_sets, 0);
        assert_eq!(core.status, BalanceStatus::Undertrained);
    }

    #[rstest]
    #[case::on_target(12, BalanceStatus::Optimal, 100)]
    #[case::above_range(16, BalanceStatus::Overtrained, 133)]
    #[case::lower_bound(9, BalanceStatus::Optimal, 75)]
    fn test_muscle_balance_status(
        #[case] sets: usize,
        #[case] expected: BalanceStatus,
        #[case] percentage: u32,
    ) {
        let weights = vec![100.0; sets];
        let workouts = vec![workout(1, 0.0, vec![exercise("Bench Press", &weights)])];
        let chest = &muscle_balance(&workouts, *NOW)[0];
        assert_eq!(chest.status, expected);
        assert_eq!(chest.percentage, percentage);
    }

    #[test]
    fn test_training_age_without_history() {
        let age = training_age(&[], *NOW);
        assert_eq!(age.level, Experience::Beginner);
        assert_eq!(age.weeks, 0);
        assert_eq!(age.description, "Just getting started");
    }

    #[rstest]
    #[case::young_history(5, 140, Experience::Beginner, "Building foundations")]
    #[case::enough_sessions(16, 70, Experience::Intermediate, "Consistent progress")]
    #[case::seasoned(100, 420, Experience::Advanced, "Experienced lifter")]
    fn test_training_age_levels(
        #[case] count: i64,
        #[case] oldest_days_ago: i64,
        #[case] level: Experience,
        #[case] description: &str,
    ) {
        let mut workouts = (0..count - 1)
            .map(|index| workout(index % 7, 1000.0, vec![]))
            .collect::<Vec<_>>();
        workouts.push(workout(oldest_days_ago, 1000.0, vec![]));

        let age = training_age(&workouts, *NOW);
        assert_eq!(age.level, level);
        assert_eq!(age.weeks, u64::try_from(oldest_days_ago / 7).unwrap());
        assert_eq!(age.description, description);
    }

    #[test]
    fn test_insights_combines_plateaus_and_fatigue() {
        let mut workouts = stalled_history([100.0, 100.0, 100.0, 100.0], [0, 3, 5, 15]);
        for entry in &mut workouts {
            entry.total_volume = 2000.0;
        }
        workouts.extend((0..6).map(|index| workout(30 + index, 100.0, vec![])));

        let found = insights(&workouts, *NOW);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].kind, InsightKind::Plateau);
        assert_eq!(found[1].kind, InsightKind::Fatigue);
    }
}
