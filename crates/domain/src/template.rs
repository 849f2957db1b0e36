use serde::{Deserialize, Serialize};

use crate::{DeleteError, ReadError, UpdateError, WorkoutExercise};

pub trait TemplateRepository {
    fn read_templates(&self) -> Result<Vec<Template>, ReadError>;
    fn write_templates(&self, templates: &[Template]) -> Result<(), UpdateError>;
    fn delete_templates(&self) -> Result<(), DeleteError>;
}

/// A reusable workout blueprint. Templates follow the same shape rules as
/// workouts: exercises are non-empty and every exercise keeps at least one
/// valid set.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub exercises: Vec<WorkoutExercise>,
}
