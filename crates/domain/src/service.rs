use std::cmp;

use chrono::{DateTime, TimeZone, Utc};
use log::warn;

use crate::{
    Badge, Clock, Insight, Measurement, MeasurementKind, MuscleBalance, NewWorkout, Notifications,
    PlanRequest, Preferences, Profile, ProgressComparison, Settings, SettingsRepository, Template,
    TemplateRepository, Timeframe, TrainingAge, TrainingPlan, TrainingStats, WeightSuggestion,
    Workout, WorkoutExercise, WorkoutRepository, WorkoutSet, insights, interchange, plan, records,
    sanitize, stats, suggestion,
};

macro_rules! warn_on_error {
    ($result: expr, $action: literal, $entity: literal) => {
        if let Err(err) = $result {
            warn!("failed to {} {}: {err}", $action, $entity);
        }
    };
}

/// Application state and the operations the screens run against it.
///
/// All collections are cached in memory and written through to the
/// repository on every change. Persistence failures are logged and never
/// interrupt an operation.
pub struct Service<R, C> {
    repository: R,
    clock: C,
    workouts: Vec<Workout>,
    templates: Vec<Template>,
    settings: Settings,
}

impl<R, C> Service<R, C>
where
    R: WorkoutRepository + TemplateRepository + SettingsRepository,
    C: Clock,
{
    pub fn new(repository: R, clock: C) -> Self {
        Self {
            repository,
            clock,
            workouts: Vec::new(),
            templates: Vec::new(),
            settings: Settings::default(),
        }
    }

    /// Reloads all collections from the repository. An empty workout log is
    /// replaced by the demo seed, and whatever was adopted is written back
    /// so both storage tiers converge on the cleaned form.
    pub fn refresh(&mut self) {
        self.workouts = match self.repository.read_workouts() {
            Ok(workouts) => {
                let workouts = if workouts.is_empty() {
                    seed_workouts()
                } else {
                    workouts
                };
                warn_on_error!(self.repository.write_workouts(&workouts), "write", "workouts");
                workouts
            }
            Err(err) => {
                warn!("failed to read workouts: {err}");
                Vec::new()
            }
        };

        self.templates = match self.repository.read_templates() {
            Ok(templates) => {
                warn_on_error!(
                    self.repository.write_templates(&templates),
                    "write",
                    "templates"
                );
                templates
            }
            Err(err) => {
                warn!("failed to read templates: {err}");
                Vec::new()
            }
        };

        self.settings = match self.repository.read_settings() {
            Ok(mut settings) => {
                settings.normalize_badges();
                settings
            }
            Err(err) => {
                warn!("failed to read settings: {err}");
                Settings::default()
            }
        };
    }

    #[must_use]
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    #[must_use]
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Builds a workout from the draft and files it into the log, newest
    /// first. Returns `None` when no valid set survives cleaning.
    pub fn add_workout(&mut self, draft: NewWorkout) -> Option<Workout> {
        let exercises = sanitize::exercise_drafts(draft.exercises);
        if exercises.is_empty() {
            return None;
        }

        let performed_at = draft.performed_at.unwrap_or_else(|| self.clock.now());
        let started_at = draft.started_at.unwrap_or(performed_at).min(performed_at);
        let duration_minutes = draft
            .duration_minutes
            .unwrap_or_else(|| minutes_between(started_at, performed_at));
        let totals = stats::totals(&exercises);

        let workout = Workout {
            id: sanitize::workout_id(performed_at),
            title: draft
                .title
                .map(|title| title.trim().to_string())
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| sanitize::DEFAULT_WORKOUT_TITLE.to_string()),
            performed_at,
            started_at,
            duration_minutes,
            total_sets: totals.total_sets,
            total_volume: totals.total_volume,
            exercises,
        };

        self.workouts.insert(0, workout.clone());
        self.workouts
            .sort_by_key(|workout| cmp::Reverse(workout.performed_at));
        self.persist_workouts();
        Some(workout)
    }

    pub fn add_template(&mut self, template: Template) {
        self.templates.insert(0, template);
        self.persist_templates();
    }

    /// Applies the given fields to the template; `None` leaves a field
    /// unchanged. Unknown ids are ignored.
    pub fn update_template(
        &mut self,
        id: &str,
        name: Option<String>,
        description: Option<String>,
        exercises: Option<Vec<WorkoutExercise>>,
    ) {
        let Some(template) = self
            .templates
            .iter_mut()
            .find(|template| template.id == id)
        else {
            return;
        };
        if let Some(name) = name {
            template.name = name;
        }
        if let Some(description) = description {
            template.description = Some(description);
        }
        if let Some(exercises) = exercises {
            template.exercises = exercises;
        }
        self.persist_templates();
    }

    pub fn delete_template(&mut self, id: &str) {
        self.templates.retain(|template| template.id != id);
        self.persist_templates();
    }

    #[must_use]
    pub fn template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|template| template.id == id)
    }

    /// Deletes the workout log and templates everywhere. Settings survive;
    /// the next [`Self::refresh`] reseeds the demo workouts.
    pub fn clear(&mut self) {
        warn_on_error!(self.repository.delete_workouts(), "delete", "workouts");
        warn_on_error!(self.repository.delete_templates(), "delete", "templates");
        self.workouts.clear();
        self.templates.clear();
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.settings.profile = profile;
        self.persist_settings();
    }

    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.settings.preferences = preferences;
        self.persist_settings();
    }

    pub fn set_notifications(&mut self, notifications: Notifications) {
        self.settings.notifications = notifications;
        self.persist_settings();
    }

    pub fn add_measurement(&mut self, kind: MeasurementKind, value: f64, unit: String) {
        let now = self.clock.now();
        let measurement = Measurement {
            id: sanitize::measurement_id(now),
            kind,
            value,
            unit,
            date: now,
        };
        self.settings.measurements.insert(0, measurement);
        self.persist_settings();
    }

    pub fn reset_settings(&mut self) {
        warn_on_error!(self.repository.delete_settings(), "delete", "settings");
        self.settings = Settings::default();
    }

    /// Updates streak, personal records, and badges for a finished workout
    /// and returns the badges earned by it.
    pub fn record_workout(&mut self, workout: &Workout) -> Vec<Badge> {
        let earned = records::record_workout(
            &mut self.settings,
            &workout.exercises,
            workout.total_volume,
            workout.total_sets,
            self.clock.now(),
        );
        self.persist_settings();
        earned
    }

    #[must_use]
    pub fn stats(&self) -> TrainingStats {
        stats::training_stats(&self.workouts, self.clock.now())
    }

    #[must_use]
    pub fn progress(&self, timeframe: Timeframe) -> ProgressComparison {
        stats::progress(&self.workouts, timeframe, self.clock.now())
    }

    #[must_use]
    pub fn weight_suggestion(&self, exercise_name: &str, target_reps: u32) -> WeightSuggestion {
        suggestion::weight_suggestion(
            &self.settings.personal_records,
            exercise_name,
            target_reps,
            self.settings.preferences.increment_size,
            self.clock.now(),
        )
    }

    #[must_use]
    pub fn build_plan(&self, request: &PlanRequest) -> TrainingPlan {
        plan::build_plan(&self.workouts, request)
    }

    #[must_use]
    pub fn insights(&self) -> Vec<Insight> {
        insights::insights(&self.workouts, self.clock.now())
    }

    #[must_use]
    pub fn muscle_balance(&self) -> Vec<MuscleBalance> {
        insights::muscle_balance(&self.workouts, self.clock.now())
    }

    #[must_use]
    pub fn training_age(&self) -> TrainingAge {
        insights::training_age(&self.workouts, self.clock.now())
    }

    #[must_use]
    pub fn export_csv(&self) -> String {
        interchange::export_csv(&self.workouts)
    }

    /// Applies a JSON or CSV backup. Sections present in the document
    /// replace the matching collections; absent sections are untouched.
    /// Returns `false` when the document is unreadable.
    pub fn import(&mut self, input: &str) -> bool {
        let Some(import) = interchange::parse_import(input, self.clock.now()) else {
            return false;
        };
        if let Some(mut settings) = import.settings {
            settings.normalize_badges();
            self.settings = settings;
            self.persist_settings();
        }
        if let Some(workouts) = import.workouts {
            self.workouts = workouts;
            self.persist_workouts();
        }
        if let Some(templates) = import.templates {
            self.templates = templates;
            self.persist_templates();
        }
        true
    }

    fn persist_workouts(&self) {
        warn_on_error!(self.repository.write_workouts(&self.workouts), "write", "workouts");
    }

    fn persist_templates(&self) {
        warn_on_error!(
            self.repository.write_templates(&self.templates),
            "write",
            "templates"
        );
    }

    fn persist_settings(&self) {
        warn_on_error!(
            self.repository.write_settings(&self.settings),
            "write",
            "settings"
        );
    }
}

fn minutes_between(started_at: DateTime<Utc>, performed_at: DateTime<Utc>) -> u32 {
    let millis = (performed_at - started_at).num_milliseconds();
    u32::try_from((millis + 30_000) / 60_000).unwrap_or(u32::MAX).max(1)
}

fn seed_workouts() -> Vec<Workout> {
    let seeds = [
        (
            "Push Day",
            (2024, 11, 28),
            75,
            vec![
                ("Bench Press", vec![(135.0, 10), (145.0, 8), (155.0, 6)]),
                ("Shoulder Press", vec![(65.0, 12), (70.0, 10)]),
            ],
        ),
        (
            "Pull Day",
            (2024, 11, 26),
            60,
            vec![("Deadlift", vec![(225.0, 5), (245.0, 5), (265.0, 3)])],
        ),
        (
            "Leg Day",
            (2024, 11, 21),
            90,
            vec![("Squat", vec![(185.0, 8), (205.0, 6), (225.0, 4)])],
        ),
    ];

    seeds
        .into_iter()
        .enumerate()
        .map(|(index, (title, (year, month, day), duration_minutes, exercises))| {
            let performed_at = Utc
                .with_ymd_and_hms(year, month, day, 0, 0, 0)
                .single()
                .unwrap_or_default();
            let exercises = exercises
                .into_iter()
                .enumerate()
                .map(|(exercise_index, (name, sets))| WorkoutExercise {
                    id: format!("seed-ex-{index}-{exercise_index}"),
                    name: name.to_string(),
                    sets: sets
                        .into_iter()
                        .enumerate()
                        .map(|(set_index, (weight, reps))| WorkoutSet {
                            id: format!("seed-set-{index}-{exercise_index}-{set_index}"),
                            weight,
                            reps,
                            completed: true,
                            notes: None,
                        })
                        .collect(),
                    notes: None,
                })
                .collect::<Vec<_>>();
            let totals = stats::totals(&exercises);
            Workout {
                id: format!("seed-{index}-{}", performed_at.timestamp_millis()),
                title: title.to_string(),
                performed_at,
                started_at: performed_at,
                duration_minutes,
                total_sets: totals.total_sets,
                total_volume: totals.total_volume,
                exercises,
            }
        })
        .collect()
}
