#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;
pub mod clock;
pub mod error;
pub mod insights;
pub mod interchange;
pub mod plan;
pub mod records;
pub mod sanitize;
pub mod service;
pub mod settings;
pub mod stats;
pub mod suggestion;
pub mod template;
pub mod workout;

pub use catalog::{Exercise, Mechanic, MuscleGroup};
pub use clock::{Clock, SystemClock};
pub use error::{DeleteError, ReadError, StorageError, UpdateError};
pub use insights::{BalanceStatus, Insight, InsightKind, MuscleBalance, Severity, TrainingAge};
pub use interchange::Import;
pub use plan::{Experience, Goal, PlanRecommendation, PlanRequest, SessionDuration, TrainingPlan};
pub use records::PersonalRecord;
pub use service::Service;
pub use settings::{
    Badge, Measurement, MeasurementKind, Notifications, Preferences, Profile, Settings,
    SettingsRepository, Units,
};
pub use stats::{PeriodSummary, ProgressComparison, Timeframe, Totals, TrainingStats};
pub use suggestion::{SuggestionReason, WeightSuggestion};
pub use template::{Template, TemplateRepository};
pub use workout::{
    ExerciseDraft, NewWorkout, SetDraft, Workout, WorkoutExercise, WorkoutRepository, WorkoutSet,
};
