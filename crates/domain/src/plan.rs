use derive_more::Display;

use crate::Workout;

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    #[display("Strength")]
    Strength,
    #[display("Muscle Size")]
    MuscleSize,
    #[display("Endurance")]
    Endurance,
    #[display("Power")]
    Power,
}

impl Goal {
    fn prescription(self) -> Prescription {
        match self {
            Goal::Strength => Prescription {
                rep_range: "3-5",
                rest_range: "3-5 min",
                base_sets: 4,
                sessions_per_week: 4,
            },
            Goal::MuscleSize => Prescription {
                rep_range: "8-12",
                rest_range: "60-90 sec",
                base_sets: 3,
                sessions_per_week: 4,
            },
            Goal::Endurance => Prescription {
                rep_range: "15-20",
                rest_range: "30-45 sec",
                base_sets: 2,
                sessions_per_week: 5,
            },
            Goal::Power => Prescription {
                rep_range: "1-3",
                rest_range: "3-5 min",
                base_sets: 3,
                sessions_per_week: 3,
            },
        }
    }
}

struct Prescription {
    rep_range: &'static str,
    rest_range: &'static str,
    base_sets: u32,
    sessions_per_week: u32,
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Experience {
    #[display("Beginner")]
    Beginner,
    #[display("Intermediate")]
    Intermediate,
    #[display("Advanced")]
    Advanced,
}

impl Experience {
    fn set_multiplier(self) -> f64 {
        match self {
            Experience::Beginner => 0.8,
            Experience::Intermediate => 1.0,
            Experience::Advanced => 1.2,
        }
    }

    fn rationale_note(self) -> &'static str {
        match self {
            Experience::Beginner => " - focus on form and consistency",
            Experience::Intermediate => "",
            Experience::Advanced => " - include advanced techniques",
        }
    }
}

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionDuration {
    #[display("30-45 min")]
    Short,
    #[display("45-60 min")]
    Medium,
    #[display("60-90 min")]
    Long,
}

impl SessionDuration {
    fn average_minutes(self) -> f64 {
        match self {
            SessionDuration::Short => 37.5,
            SessionDuration::Medium => 52.5,
            SessionDuration::Long => 75.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub goal: Goal,
    pub experience: Experience,
    pub duration: SessionDuration,
    pub muscles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanRecommendation {
    pub focus: String,
    pub sets: u32,
    pub reps: &'static str,
    pub rest: &'static str,
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingPlan {
    pub sessions_per_week: u32,
    pub sets_per_exercise: u32,
    pub rep_range: &'static str,
    pub rest_range: &'static str,
    /// Estimated weekly volume in kilograms, from session length alone.
    pub weekly_volume: u32,
    pub weekly_workouts: u32,
    pub adjustments: Vec<String>,
    pub recommendations: Vec<PlanRecommendation>,
}

/// Builds a weekly plan from the goal table, scaled by experience, with one
/// recommendation per selected muscle group. Advisory adjustments flag a
/// recent average volume (newest ≤ 10 workouts, list ordered newest first)
/// above twice the weekly estimate, more than five selected muscle groups,
/// and beginners always start lighter.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn build_plan(workouts: &[Workout], request: &PlanRequest) -> TrainingPlan {
    let prescription = request.goal.prescription();
    let sets_per_exercise =
        (f64::from(prescription.base_sets) * request.experience.set_multiplier()).ceil() as u32;
    let weekly_volume = (request.duration.average_minutes()
        * f64::from(prescription.sessions_per_week)
        * 10.0)
        .round() as u32;

    let goal_name = request.goal.to_string().to_lowercase();
    let note = request.experience.rationale_note();
    let recommendations = request
        .muscles
        .iter()
        .map(|muscle| PlanRecommendation {
            focus: muscle.clone(),
            sets: sets_per_exercise,
            reps: prescription.rep_range,
            rest: prescription.rest_range,
            rationale: format!("Optimal for {goal_name} development{note}"),
        })
        .collect();

    let mut adjustments = vec![];
    if !workouts.is_empty() {
        let recent = &workouts[..workouts.len().min(10)];
        let average_volume =
            recent.iter().map(|workout| workout.total_volume).sum::<f64>() / recent.len() as f64;
        if average_volume > f64::from(weekly_volume) * 2.0 {
            adjustments.push(
                "Your recent volume is higher than recommended - consider deloading".to_string(),
            );
        }
        if request.muscles.len() > 5 {
            adjustments.push(
                "Focusing on many muscle groups - ensure adequate recovery between sessions"
                    .to_string(),
            );
        }
    }
    if request.experience == Experience::Beginner {
        adjustments
            .push("Start with lighter weights to master movement patterns".to_string());
    }

    TrainingPlan {
        sessions_per_week: prescription.sessions_per_week,
        sets_per_exercise,
        rep_range: prescription.rep_range,
        rest_range: prescription.rest_range,
        weekly_volume,
        weekly_workouts: prescription.sessions_per_week,
        adjustments,
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{WorkoutExercise, WorkoutSet};

    use super::*;

    fn request(goal: Goal, experience: Experience, muscles: &[&str]) -> PlanRequest {
        PlanRequest {
            goal,
            experience,
            duration: SessionDuration::Medium,
            muscles: muscles.iter().map(ToString::to_string).collect(),
        }
    }

    fn workout_with_volume(volume: f64) -> Workout {
        Workout {
            id: "w-1".to_string(),
            title: "Workout".to_string(),
            performed_at: Utc.with_ymd_and_hms(2024, 12, 1, 12, 0, 0).unwrap(),
            started_at: Utc.with_ymd_and_hms(2024, 12, 1, 12, 0, 0).unwrap(),
            duration_minutes: 60,
            total_sets: 1,
            total_volume: volume,
            exercises: vec![WorkoutExercise {
                id: "ex-1".to_string(),
                name: "Squat".to_string(),
                sets: vec![WorkoutSet {
                    id: "set-1".to_string(),
                    weight: volume,
                    reps: 1,
                    completed: true,
                    notes: None,
                }],
                notes: None,
            }],
        }
    }

    #[rstest]
    #[case::strength(Goal::Strength, 4, "3-5", "3-5 min", 4)]
    #[case::muscle_size(Goal::MuscleSize, 4, "8-12", "60-90 sec", 3)]
    #[case::endurance(Goal::Endurance, 5, "15-20", "30-45 sec", 2)]
    #[case::power(Goal::Power, 3, "1-3", "3-5 min", 3)]
    fn test_goal_table(
        #[case] goal: Goal,
        #[case] sessions: u32,
        #[case] reps: &str,
        #[case] rest: &str,
        #[case] sets: u32,
    ) {
        let plan = build_plan(&[], &request(goal, Experience::Intermediate, &["Chest"]));
        assert_eq!(plan.sessions_per_week, sessions);
        assert_eq!(plan.weekly_workouts, sessions);
        assert_eq!(plan.rep_range, reps);
        assert_eq!(plan.rest_range, rest);
        assert_eq!(plan.sets_per_exercise, sets);
    }

    #[rstest]
    #[case::beginner_rounds_up(Experience::Beginner, 4)]
    #[case::intermediate_unscaled(Experience::Intermediate, 4)]
    #[case::advanced_adds_sets(Experience::Advanced, 5)]
    fn test_experience_scales_sets(#[case] experience: Experience, #[case] sets: u32) {
        let plan = build_plan(&[], &request(Goal::Strength, experience, &["Back"]));
        assert_eq!(plan.sets_per_exercise, sets);
    }

    #[test]
    fn test_weekly_volume_estimate() {
        let plan = build_plan(
            &[],
            &PlanRequest {
                goal: Goal::MuscleSize,
                experience: Experience::Intermediate,
                duration: SessionDuration::Long,
                muscles: vec!["Chest".to_string()],
            },
        );
        assert_eq!(plan.weekly_volume, 3000);
    }

    #[test]
    fn test_recommendations_carry_goal_and_experience() {
        let plan = build_plan(
            &[],
            &request(Goal::MuscleSize, Experience::Advanced, &["Chest", "Back"]),
        );
        assert_eq!(plan.recommendations.len(), 2);
        assert_eq!(plan.recommendations[0].focus, "Chest");
        assert_eq!(
            plan.recommendations[0].rationale,
            "Optimal for muscle size development - include advanced techniques"
        );
        assert_eq!(plan.recommendations[1].focus, "Back");
    }

    #[test]
    fn test_beginner_always_starts_lighter() {
        let plan = build_plan(&[], &request(Goal::Strength, Experience::Beginner, &[]));
        assert_eq!(
            plan.adjustments,
            vec!["Start with lighter weights to master movement patterns".to_string()]
        );
    }

    #[test]
    fn test_high_recent_volume_triggers_deload() {
        let workouts = vec![workout_with_volume(10_000.0)];
        let plan = build_plan(
            &workouts,
            &request(Goal::Power, Experience::Intermediate, &["Chest"]),
        );
        assert_eq!(
            plan.adjustments,
            vec!["Your recent volume is higher than recommended - consider deloading".to_string()]
        );
    }

    #[test]
    fn test_deload_considers_only_recent_workouts() {
        let mut workouts = vec![workout_with_volume(100.0); 10];
        workouts.push(workout_with_volume(1_000_000.0));
        let plan = build_plan(
            &workouts,
            &request(Goal::Power, Experience::Intermediate, &["Chest"]),
        );
        assert_eq!(plan.adjustments, Vec::<String>::new());
    }

    #[test]
    fn test_many_muscles_need_history_to_flag_recovery() {
        let muscles = ["Chest", "Back", "Shoulders", "Biceps", "Triceps", "Legs"];
        let without_history = build_plan(
            &[],
            &request(Goal::MuscleSize, Experience::Intermediate, &muscles),
        );
        assert_eq!(without_history.adjustments, Vec::<String>::new());

        let with_history = build_plan(
            &[workout_with_volume(500.0)],
            &request(Goal::MuscleSize, Experience::Intermediate, &muscles),
        );
        assert_eq!(
            with_history.adjustments,
            vec![
                "Focusing on many muscle groups - ensure adequate recovery between sessions"
                    .to_string()
            ]
        );
    }
}
