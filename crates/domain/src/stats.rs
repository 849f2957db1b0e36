use chrono::{DateTime, Duration, Local, Months, Utc};

use crate::{Workout, WorkoutExercise};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub total_sets: u32,
    pub total_volume: f64,
}

/// Derives the set count and the exact volume (`Σ weight × reps`) of a
/// workout. Totals are always computed from the sets, never taken from
/// input.
#[must_use]
pub fn totals(exercises: &[WorkoutExercise]) -> Totals {
    let sets = exercises.iter().flat_map(|exercise| &exercise.sets);
    Totals {
        total_sets: u32::try_from(sets.clone().count()).unwrap_or(u32::MAX),
        total_volume: sets.map(|set| set.weight * f64::from(set.reps)).sum(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingStats {
    pub weekly_workouts: usize,
    pub weekly_volume: f64,
    pub total_workouts: usize,
    pub total_volume: f64,
    pub streak: u32,
}

/// Summarizes a history: trailing-seven-day count and volume, all-time
/// count and volume, and the current streak. The weekly window is the raw
/// interval `performed_at ≥ now − 7 days`, not a calendar week.
#[must_use]
pub fn training_stats(workouts: &[Workout], now: DateTime<Utc>) -> TrainingStats {
    let week_ago = now - Duration::days(7);
    let weekly = summarize(workouts, |performed_at| performed_at >= week_ago);
    let all_time = summarize(workouts, |_| true);
    TrainingStats {
        weekly_workouts: weekly.workouts,
        weekly_volume: weekly.volume,
        total_workouts: all_time.workouts,
        total_volume: all_time.volume,
        streak: streak(workouts, now),
    }
}

/// Counts the run of consecutive training days ending at the most recent
/// workout, on local calendar days. The most recent day anchors the streak
/// at 1; every distinct day exactly one day older extends it; repeated days
/// are skipped; the first gap stops the scan; days in the future are
/// ignored.
#[must_use]
pub fn streak(workouts: &[Workout], now: DateTime<Utc>) -> u32 {
    let today = now.with_timezone(&Local).date_naive();
    let mut days = workouts
        .iter()
        .map(|workout| workout.performed_at.with_timezone(&Local).date_naive())
        .collect::<Vec<_>>();
    days.sort_unstable_by(|a, b| b.cmp(a));

    let mut streak = 0;
    let mut last_offset = None;
    for day in days {
        let offset = (today - day).num_days();
        if offset < 0 {
            continue;
        }
        match last_offset {
            Some(last) if offset == last => {}
            Some(last) if offset != last + 1 => break,
            _ => {
                last_offset = Some(offset);
                streak += 1;
            }
        }
    }
    streak
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodSummary {
    pub workouts: usize,
    pub volume: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressComparison {
    pub current: PeriodSummary,
    pub previous: PeriodSummary,
    pub volume_delta_percent: i64,
    pub workout_delta: i64,
}

/// Compares the current period `[now − p, now]` against the previous one
/// `[now − 2p, now − p)`. Weekly periods are exactly seven days; monthly
/// and yearly periods use calendar arithmetic.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn progress(workouts: &[Workout], timeframe: Timeframe, now: DateTime<Utc>) -> ProgressComparison {
    let (current_start, previous_start) = window_starts(timeframe, now);
    let current = summarize(workouts, |performed_at| {
        performed_at >= current_start && performed_at <= now
    });
    let previous = summarize(workouts, |performed_at| {
        performed_at >= previous_start && performed_at < current_start
    });
    ProgressComparison {
        volume_delta_percent: volume_delta_percent(current.volume, previous.volume),
        workout_delta: current.workouts as i64 - previous.workouts as i64,
        current,
        previous,
    }
}

/// Percentage change of volume between two periods. The zero-guard is part
/// of the contract: a previous period without volume reports +100 when
/// volume appeared and 0 when both periods are empty, instead of dividing
/// by zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub fn volume_delta_percent(current: f64, previous: f64) -> i64 {
    if previous == 0.0 {
        return if current > 0.0 { 100 } else { 0 };
    }
    ((current - previous) / previous * 100.0).round() as i64
}

fn window_starts(timeframe: Timeframe, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    match timeframe {
        Timeframe::Weekly => (now - Duration::days(7), now - Duration::days(14)),
        Timeframe::Monthly => (
            now.checked_sub_months(Months::new(1)).unwrap_or(now),
            now.checked_sub_months(Months::new(2)).unwrap_or(now),
        ),
        Timeframe::Yearly => (
            now.checked_sub_months(Months::new(12)).unwrap_or(now),
            now.checked_sub_months(Months::new(24)).unwrap_or(now),
        ),
    }
}

fn summarize(workouts: &[Workout], include: impl Fn(DateTime<Utc>) -> bool) -> PeriodSummary {
    workouts
        .iter()
        .filter(|workout| include(workout.performed_at))
        .fold(
            PeriodSummary {
                workouts: 0,
                volume: 0.0,
            },
            |summary, workout| PeriodSummary {
                workouts: summary.workouts + 1,
                volume: summary.volume + workout.total_volume,
            },
        )
}
