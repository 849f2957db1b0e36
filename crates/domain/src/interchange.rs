//! Backup import and spreadsheet export.
//!
//! Exports render one CSV row per set. Imports accept either a JSON backup
//! document or that same CSV shape, and always hand workout and template
//! payloads to [`crate::sanitize`] so nothing unchecked reaches storage.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Value, json};

use crate::{sanitize, settings::Settings, template::Template, workout::Workout};

const CSV_HEADER: &str = "Date,Workout,Exercise,Set,Weight,Reps,RPE";

/// Sections recovered from a backup document. Absent sections leave the
/// matching collection untouched on apply.
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub settings: Option<Settings>,
    pub workouts: Option<Vec<Workout>>,
    pub templates: Option<Vec<Template>>,
}

/// Renders the workout log as CSV, one row per set. The RPE column is kept
/// for spreadsheet compatibility and left empty.
#[must_use]
pub fn export_csv(workouts: &[Workout]) -> String {
    let mut csv = format!("{CSV_HEADER}\n");
    for workout in workouts {
        let date = workout.performed_at.format("%Y-%m-%d");
        let title = workout.title.replace(',', " ");
        for exercise in &workout.exercises {
            let name = exercise.name.replace(',', " ");
            for (index, set) in exercise.sets.iter().enumerate() {
                let _ = writeln!(
                    csv,
                    "{date},{title},{name},{},{},{},",
                    index + 1,
                    set.weight,
                    set.reps
                );
            }
        }
    }
    csv
}

/// Parses a JSON or CSV backup. Returns `None` when the document is
/// unreadable; a readable document with no usable rows still succeeds.
#[must_use]
pub fn parse_import(input: &str, now: DateTime<Utc>) -> Option<Import> {
    let trimmed = input.trim();
    if trimmed.starts_with('{') {
        parse_json(trimmed, now)
    } else {
        parse_csv(trimmed, now)
    }
}

fn parse_json(input: &str, now: DateTime<Utc>) -> Option<Import> {
    let document = serde_json::from_str::<Value>(input).ok()?;
    let settings = match document.get("settings") {
        Some(section) => Some(serde_json::from_value::<Settings>(section.clone()).ok()?),
        None => None,
    };
    Some(Import {
        settings,
        workouts: document
            .get("workouts")
            .map(|section| sanitize::workouts(section, now)),
        templates: document
            .get("templates")
            .map(|section| sanitize::templates(section, now)),
    })
}

struct CsvWorkout {
    title: String,
    performed_at: i64,
    exercises: Vec<CsvExercise>,
}

struct CsvExercise {
    name: String,
    sets: Vec<(f64, i64)>,
}

fn parse_csv(input: &str, now: DateTime<Utc>) -> Option<Import> {
    let lines = input.split('\n').collect::<Vec<_>>();
    if lines.len() < 2 {
        return None;
    }

    // Rows group into one workout per distinct date and title pair, in the
    // order the file first mentions them.
    let mut parsed: Vec<(String, CsvWorkout)> = Vec::new();
    for line in &lines[1..] {
        let columns = line.trim_end_matches('\r').split(',').collect::<Vec<_>>();
        if columns.len() < 6 {
            continue;
        }

        let (date, title, name) = (columns[0], columns[1], columns[2]);
        let key = format!("{date}|{title}");
        let slot = match parsed.iter().position(|(existing, _)| *existing == key) {
            Some(position) => position,
            None => {
                parsed.push((
                    key,
                    CsvWorkout {
                        title: title.to_string(),
                        performed_at: date_millis(date, now),
                        exercises: Vec::new(),
                    },
                ));
                parsed.len() - 1
            }
        };
        let workout = &mut parsed[slot].1;

        let slot = match workout
            .exercises
            .iter()
            .position(|exercise| exercise.name == name)
        {
            Some(position) => position,
            None => {
                workout.exercises.push(CsvExercise {
                    name: name.to_string(),
                    sets: Vec::new(),
                });
                workout.exercises.len() - 1
            }
        };

        let weight = columns[4].parse::<f64>().unwrap_or(0.0);
        #[allow(clippy::cast_possible_truncation)]
        let reps = columns[5]
            .parse::<f64>()
            .map_or(0, |value| value.trunc() as i64);
        workout.exercises[slot].sets.push((weight, reps));
    }

    let raw = parsed
        .into_iter()
        .map(|(_, workout)| {
            json!({
                "title": workout.title,
                "performedAt": workout.performed_at,
                "durationMinutes": 60,
                "exercises": workout
                    .exercises
                    .iter()
                    .map(|exercise| {
                        json!({
                            "name": exercise.name,
                            "sets": exercise
                                .sets
                                .iter()
                                .map(|&(weight, reps)| json!({"weight": weight, "reps": reps}))
                                .collect::<Vec<_>>(),
                        })
                    })
                    .collect::<Vec<_>>(),
            })
        })
        .collect::<Vec<_>>();

    Some(Import {
        settings: None,
        workouts: Some(sanitize::workouts(&Value::Array(raw), now)),
        templates: None,
    })
}

fn date_millis(date: &str, now: DateTime<Utc>) -> i64 {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map_or_else(
            || now.timestamp_millis(),
            |midnight| midnight.and_utc().timestamp_millis(),
        )
}
