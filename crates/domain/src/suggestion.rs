use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use derive_more::Display;

use crate::PersonalRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightSuggestion {
    pub weight: f64,
    pub reason: SuggestionReason,
    /// Rough confidence in the suggestion, 0 to 100.
    pub confidence: u8,
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionReason {
    #[display("NO_DATA")]
    NoData,
    #[display("DELOAD")]
    Deload,
    #[display("INCREASE")]
    Increase,
    #[display("DECREASE")]
    Decrease,
    #[display("HOLD")]
    Hold,
}

/// Suggests a working weight for the given target reps from the stored
/// personal record of the exercise (looked up by lower-cased name).
///
/// The base target inverts the Epley estimate for the target reps. Branches
/// apply in priority order on the age of the record in whole days: older
/// than 14 days deloads by 10%; 3 days or fresher with the record at or
/// above the target reps increases by 2.5%; a record more than two reps
/// below the target backs off by 5%; otherwise the base holds. The final
/// weight is rounded to the preference increment.
#[must_use]
pub fn weight_suggestion(
    records: &BTreeMap<String, PersonalRecord>,
    exercise_name: &str,
    target_reps: u32,
    increment: f64,
    now: DateTime<Utc>,
) -> WeightSuggestion {
    let Some(record) = records.get(&exercise_name.to_lowercase()) else {
        return WeightSuggestion {
            weight: 0.0,
            reason: SuggestionReason::NoData,
            confidence: 0,
        };
    };

    let days_since_record = (now - record.date).num_days();
    let base = (record.estimated_one_rm / (1.0 + f64::from(target_reps) / 30.0)).round();

    let (weight, reason, confidence) = if days_since_record > 14 {
        ((base * 0.9).round(), SuggestionReason::Deload, 70)
    } else if days_since_record <= 3 && record.reps >= target_reps {
        ((base * 1.025).round(), SuggestionReason::Increase, 85)
    } else if record.reps + 2 < target_reps {
        ((base * 0.95).round(), SuggestionReason::Decrease, 75)
    } else {
        (base, SuggestionReason::Hold, 80)
    };

    WeightSuggestion {
        weight: round_to_increment(weight, increment),
        reason,
        confidence,
    }
}

fn round_to_increment(weight: f64, increment: f64) -> f64 {
    if increment > 0.0 {
        (weight / increment).round() * increment
    } else {
        weight
    }
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::records::estimate_one_rm;

    use super::*;

    static NOW: LazyLock<DateTime<Utc>> =
        LazyLock::new(|| Utc.with_ymd_and_hms(2024, 12, 6, 12, 0, 0).unwrap());

    fn bench_record(days_ago: i64, reps: u32) -> BTreeMap<String, PersonalRecord> {
        BTreeMap::from([(
            "bench press".to_string(),
            PersonalRecord {
                weight: 100.0,
                reps,
                date: *NOW - Duration::days(days_ago),
                estimated_one_rm: estimate_one_rm(100.0, reps),
            },
        )])
    }

    #[test]
    fn test_no_record_means_no_data() {
        assert_eq!(
            weight_suggestion(&BTreeMap::new(), "Bench Press", 5, 2.5, *NOW),
            WeightSuggestion {
                weight: 0.0,
                reason: SuggestionReason::NoData,
                confidence: 0,
            }
        );
    }

    #[rstest]
    #[case::deload_after_stale_record(20, 5, 5, 90.0, SuggestionReason::Deload, 70)]
    #[case::increase_after_fresh_record(2, 5, 5, 102.5, SuggestionReason::Increase, 85)]
    #[case::increase_on_third_day(3, 5, 5, 102.5, SuggestionReason::Increase, 85)]
    #[case::decrease_when_reps_fall_short(10, 5, 8, 87.5, SuggestionReason::Decrease, 75)]
    #[case::hold_otherwise(10, 5, 4, 102.5, SuggestionReason::Hold, 80)]
    #[case::hold_on_day_fourteen(14, 5, 5, 100.0, SuggestionReason::Hold, 80)]
    fn test_suggestion_branches(
        #[case] days_ago: i64,
        #[case] record_reps: u32,
        #[case] target_reps: u32,
        #[case] weight: f64,
        #[case] reason: SuggestionReason,
        #[case] confidence: u8,
    ) {
        assert_eq!(
            weight_suggestion(&bench_record(days_ago, record_reps), "Bench Press", target_reps, 2.5, *NOW),
            WeightSuggestion {
                weight,
                reason,
                confidence,
            }
        );
    }

    #[rstest]
    #[case::coarser_plates(5.0, 100.0)]
    #[case::no_increment_keeps_raw_weight(0.0, 102.0)]
    fn test_increment_rounding(#[case] increment: f64, #[case] expected: f64) {
        let suggestion =
            weight_suggestion(&bench_record(2, 5), "bench press", 5, increment, *NOW);
        assert_eq!(suggestion.weight, expected);
    }

    #[test]
    fn test_reason_codes_render_in_wire_spelling() {
        assert_eq!(SuggestionReason::NoData.to_string(), "NO_DATA");
        assert_eq!(SuggestionReason::Deload.to_string(), "DELOAD");
    }
}
