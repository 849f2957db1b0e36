use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DeleteError, PersonalRecord, ReadError, UpdateError};

pub trait SettingsRepository {
    fn read_settings(&self) -> Result<Settings, ReadError>;
    fn write_settings(&self, settings: &Settings) -> Result<(), UpdateError>;
    fn delete_settings(&self) -> Result<(), DeleteError>;
}

/// Profile, preferences, and progression state. Every field decodes
/// independently, so a partial or outdated blob falls back to defaults
/// field by field instead of being rejected wholesale.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub profile: Profile,
    pub preferences: Preferences,
    pub notifications: Notifications,
    pub badges: Vec<Badge>,
    pub measurements: Vec<Measurement>,
    pub streak: u32,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_workout_date: Option<DateTime<Utc>>,
    pub total_workouts_logged: u32,
    pub personal_records: BTreeMap<String, PersonalRecord>,
}

impl Settings {
    /// Re-aligns the stored badge list with the built-in catalogue: known
    /// badges keep their `earned_at`, unknown ids are dropped, and badges
    /// missing from the blob are added locked.
    pub fn normalize_badges(&mut self) {
        let earned = self
            .badges
            .iter()
            .filter_map(|badge| badge.earned_at.map(|date| (badge.id.clone(), date)))
            .collect::<BTreeMap<_, _>>();
        self.badges = Badge::catalogue();
        for badge in &mut self.badges {
            badge.earned_at = earned.get(&badge.id).copied();
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            preferences: Preferences::default(),
            notifications: Notifications::default(),
            badges: Badge::catalogue(),
            measurements: vec![],
            streak: 0,
            last_workout_date: None,
            total_workouts_logged: 0,
            personal_records: BTreeMap::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub weight: f64,
    pub height: f64,
    pub fitness_goal: String,
    pub profile_picture: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: 0,
            weight: 0.0,
            height: 0.0,
            fitness_goal: "Build Muscle".to_string(),
            profile_picture: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Rest timer length in seconds.
    pub default_rest_timer: u32,
    pub units: Units,
    pub rpe_enabled: bool,
    pub auto_increment: bool,
    pub increment_size: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_rest_timer: 90,
            units: Units::Kg,
            rpe_enabled: false,
            auto_increment: true,
            increment_size: 2.5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Kg,
    Lbs,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Notifications {
    pub workout_reminders: bool,
    pub reminder_time: String,
    pub rest_day_notifications: bool,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            workout_reminders: true,
            reminder_time: "09:00".to_string(),
            rest_day_notifications: false,
        }
    }
}

/// An achievement. `earned_at` moves from `None` to `Some` exactly once and
/// is never revoked.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub earned_at: Option<DateTime<Utc>>,
}

impl Badge {
    pub const FIRST_WORKOUT: &'static str = "first-workout";
    pub const WEEK_STREAK: &'static str = "week-streak";
    pub const THREE_WEEK: &'static str = "three-week";
    pub const PR_HUNTER: &'static str = "pr-hunter";
    pub const CENTURION: &'static str = "centurion";
    pub const VOLUME_KING: &'static str = "volume-king";
    pub const CONSISTENT: &'static str = "consistent";
    pub const DEDICATION: &'static str = "dedication";

    /// The built-in badge catalogue, all locked.
    #[must_use]
    pub fn catalogue() -> Vec<Badge> {
        [
            (
                Self::FIRST_WORKOUT,
                "First Workout",
                "Complete your first workout",
                "🏋️",
            ),
            (
                Self::WEEK_STREAK,
                "Week Warrior",
                "Maintain a 7-day streak",
                "🔥",
            ),
            (
                Self::THREE_WEEK,
                "3 Week Streak",
                "Maintain a 21-day streak",
                "💪",
            ),
            (
                Self::PR_HUNTER,
                "PR Hunter",
                "Set a new personal record",
                "🏆",
            ),
            (Self::CENTURION, "Centurion", "Log 100 sets", "💯"),
            (
                Self::VOLUME_KING,
                "Volume King",
                "Lift 10,000 kg total volume",
                "👑",
            ),
            (Self::CONSISTENT, "Consistency", "Log 10 workouts", "📈"),
            (Self::DEDICATION, "Dedication", "Log 50 workouts", "🎯"),
        ]
        .into_iter()
        .map(|(id, name, description, icon)| Badge {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            earned_at: None,
        })
        .collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MeasurementKind,
    pub value: f64,
    pub unit: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    Weight,
    BodyFat,
    Chest,
    Arms,
    Waist,
    Legs,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_badges_locked() {
        let settings = Settings::default();
        assert_eq!(settings.badges.len(), 8);
        assert!(settings.badges.iter().all(|badge| badge.earned_at.is_none()));
        assert_eq!(settings.badges[0].id, Badge::FIRST_WORKOUT);
    }

    #[test]
    fn test_normalize_badges_preserves_earned_and_drops_unknown() {
        let earned_date = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let mut settings = Settings {
            badges: vec![
                Badge {
                    id: Badge::PR_HUNTER.to_string(),
                    name: "outdated".to_string(),
                    description: String::new(),
                    icon: String::new(),
                    earned_at: Some(earned_date),
                },
                Badge {
                    id: "retired-badge".to_string(),
                    name: "Retired".to_string(),
                    description: String::new(),
                    icon: String::new(),
                    earned_at: Some(earned_date),
                },
            ],
            ..Settings::default()
        };

        settings.normalize_badges();

        assert_eq!(settings.badges.len(), 8);
        let pr_hunter = settings
            .badges
            .iter()
            .find(|badge| badge.id == Badge::PR_HUNTER)
            .unwrap();
        assert_eq!(pr_hunter.name, "PR Hunter");
        assert_eq!(pr_hunter.earned_at, Some(earned_date));
        assert!(!settings.badges.iter().any(|badge| badge.id == "retired-badge"));
    }

    #[test]
    fn test_partial_blob_decodes_field_by_field() {
        let settings: Settings = serde_json::from_str(r#"{"streak": 5}"#).unwrap();
        assert_eq!(settings.streak, 5);
        assert_eq!(settings.preferences, Preferences::default());

        let settings: Settings =
            serde_json::from_str(r#"{"preferences": {"units": "lbs"}}"#).unwrap();
        assert_eq!(settings.preferences.units, Units::Lbs);
        assert_eq!(settings.preferences.increment_size, 2.5);
    }

    #[test]
    fn test_units_wire_format() {
        assert_eq!(serde_json::to_string(&Units::Kg).unwrap(), r#""kg""#);
        assert_eq!(serde_json::to_string(&Units::Lbs).unwrap(), r#""lbs""#);
        assert_eq!(
            serde_json::to_string(&MeasurementKind::BodyFat).unwrap(),
            r#""bodyfat""#
        );
    }
}
