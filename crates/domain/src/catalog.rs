use std::{collections::BTreeMap, sync::LazyLock};

use derive_more::Display;

/// Muscle groups covered by the built-in catalogue.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MuscleGroup {
    #[display("Chest")]
    Chest,
    #[display("Back")]
    Back,
    #[display("Shoulders")]
    Shoulders,
    #[display("Biceps")]
    Biceps,
    #[display("Triceps")]
    Triceps,
    #[display("Forearms")]
    Forearms,
    #[display("Legs")]
    Legs,
    #[display("Glutes")]
    Glutes,
    #[display("Core")]
    Core,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mechanic {
    Compound,
    Isolation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exercise {
    pub name: &'static str,
    pub muscle_group: MuscleGroup,
    pub mechanic: Mechanic,
}

/// Looks up an exercise by its exact catalogue name.
#[must_use]
pub fn get(name: &str) -> Option<&'static Exercise> {
    EXERCISES.get(name)
}

/// All catalogue exercises of one muscle group, in name order.
#[must_use]
pub fn by_muscle_group(muscle_group: MuscleGroup) -> Vec<&'static Exercise> {
    EXERCISES
        .values()
        .filter(|exercise| exercise.muscle_group == muscle_group)
        .collect()
}

/// The distinct muscle groups present in the catalogue.
#[must_use]
pub fn muscle_groups() -> Vec<MuscleGroup> {
    let mut groups = EXERCISES
        .values()
        .map(|exercise| exercise.muscle_group)
        .collect::<Vec<_>>();
    groups.sort_unstable();
    groups.dedup();
    groups
}

/// Case-insensitive substring search over exercise names and muscle group
/// names.
#[must_use]
pub fn search(query: &str) -> Vec<&'static Exercise> {
    let query = query.to_lowercase();
    EXERCISES
        .values()
        .filter(|exercise| {
            exercise.name.to_lowercase().contains(&query)
                || exercise
                    .muscle_group
                    .to_string()
                    .to_lowercase()
                    .contains(&query)
        })
        .collect()
}

static EXERCISES: LazyLock<BTreeMap<&'static str, Exercise>> =
    LazyLock::new(|| CATALOGUE.iter().map(|exercise| (exercise.name, *exercise)).collect());

const fn exercise(
    name: &'static str,
    muscle_group: MuscleGroup,
    mechanic: Mechanic,
) -> Exercise {
    Exercise {
        name,
        muscle_group,
        mechanic,
    }
}

const CATALOGUE: &[Exercise] = &[
    exercise("Bench Press", MuscleGroup::Chest, Mechanic::Compound),
    exercise("Incline Press", MuscleGroup::Chest, Mechanic::Compound),
    exercise("Dumbbell Press", MuscleGroup::Chest, Mechanic::Compound),
    exercise("Flyes", MuscleGroup::Chest, Mechanic::Isolation),
    exercise("Push-ups", MuscleGroup::Chest, Mechanic::Compound),
    exercise("Machine Chest Press", MuscleGroup::Chest, Mechanic::Compound),
    exercise("Deadlift", MuscleGroup::Back, Mechanic::Compound),
    exercise("Barbell Row", MuscleGroup::Back, Mechanic::Compound),
    exercise("Dumbbell Row", MuscleGroup::Back, Mechanic::Compound),
    exercise("Pull-ups", MuscleGroup::Back, Mechanic::Compound),
    exercise("Lat Pulldown", MuscleGroup::Back, Mechanic::Isolation),
    exercise("Seated Row", MuscleGroup::Back, Mechanic::Isolation),
    exercise("Cable Row", MuscleGroup::Back, Mechanic::Isolation),
    exercise("Face Pulls", MuscleGroup::Back, Mechanic::Isolation),
    exercise("Overhead Press", MuscleGroup::Shoulders, Mechanic::Compound),
    exercise("Military Press", MuscleGroup::Shoulders, Mechanic::Compound),
    exercise("Shoulder Press (Machine)", MuscleGroup::Shoulders, Mechanic::Compound),
    exercise("Lateral Raise", MuscleGroup::Shoulders, Mechanic::Isolation),
    exercise("Front Raise", MuscleGroup::Shoulders, Mechanic::Isolation),
    exercise("Reverse Flyes", MuscleGroup::Shoulders, Mechanic::Isolation),
    exercise("Shrugs", MuscleGroup::Shoulders, Mechanic::Isolation),
    exercise("Barbell Curl", MuscleGroup::Biceps, Mechanic::Isolation),
    exercise("Dumbbell Curl", MuscleGroup::Biceps, Mechanic::Isolation),
    exercise("Cable Curl", MuscleGroup::Biceps, Mechanic::Isolation),
    exercise("Hammer Curl", MuscleGroup::Biceps, Mechanic::Isolation),
    exercise("Preacher Curl", MuscleGroup::Biceps, Mechanic::Isolation),
    exercise("Close Grip Bench", MuscleGroup::Triceps, Mechanic::Compound),
    exercise("Dips", MuscleGroup::Triceps, Mechanic::Compound),
    exercise("Tricep Extension", MuscleGroup::Triceps, Mechanic::Isolation),
    exercise("Pushdown", MuscleGroup::Triceps, Mechanic::Isolation),
    exercise("Overhead Extension", MuscleGroup::Triceps, Mechanic::Isolation),
    exercise("Wrist Curl", MuscleGroup::Forearms, Mechanic::Isolation),
    exercise("Wrist Roller", MuscleGroup::Forearms, Mechanic::Isolation),
    exercise("Reverse Curl", MuscleGroup::Forearms, Mechanic::Isolation),
    exercise("Squat", MuscleGroup::Legs, Mechanic::Compound),
    exercise("Back Squat", MuscleGroup::Legs, Mechanic::Compound),
    exercise("Front Squat", MuscleGroup::Legs, Mechanic::Compound),
    exercise("Leg Press", MuscleGroup::Legs, Mechanic::Compound),
    exercise("Leg Extension", MuscleGroup::Legs, Mechanic::Isolation),
    exercise("Leg Curl", MuscleGroup::Legs, Mechanic::Isolation),
    exercise("Lunge", MuscleGroup::Legs, Mechanic::Compound),
    exercise("Step-ups", MuscleGroup::Legs, Mechanic::Compound),
    exercise("Hip Thrust", MuscleGroup::Glutes, Mechanic::Compound),
    exercise("Romanian Deadlift", MuscleGroup::Glutes, Mechanic::Compound),
    exercise("Cable Kickback", MuscleGroup::Glutes, Mechanic::Isolation),
    exercise("Glute Machine", MuscleGroup::Glutes, Mechanic::Isolation),
    exercise("Plank", MuscleGroup::Core, Mechanic::Isolation),
    exercise("Ab Crunch", MuscleGroup::Core, Mechanic::Isolation),
    exercise("Deadbug", MuscleGroup::Core, Mechanic::Isolation),
    exercise("Cable Woodchop", MuscleGroup::Core, Mechanic::Isolation),
    exercise("Hanging Leg Raise", MuscleGroup::Core, Mechanic::Isolation),
];

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let squat = get("Squat").unwrap();
        assert_eq!(squat.muscle_group, MuscleGroup::Legs);
        assert_eq!(squat.mechanic, Mechanic::Compound);
        assert_eq!(get("Yoga"), None);
    }

    #[test]
    fn test_by_muscle_group() {
        let names = by_muscle_group(MuscleGroup::Biceps)
            .iter()
            .map(|exercise| exercise.name)
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "Barbell Curl",
                "Cable Curl",
                "Dumbbell Curl",
                "Hammer Curl",
                "Preacher Curl",
            ]
        );
    }

    #[test]
    fn test_muscle_groups_are_distinct() {
        let groups = muscle_groups();
        assert_eq!(groups.len(), 9);
        assert_eq!(groups[0], MuscleGroup::Chest);
    }

    #[test]
    fn test_search_matches_names_and_groups() {
        let by_name = search("press");
        assert!(by_name.iter().any(|exercise| exercise.name == "Bench Press"));
        assert!(by_name.iter().any(|exercise| exercise.name == "Leg Press"));

        let by_group = search("biceps");
        assert_eq!(by_group.len(), 5);

        assert_eq!(search("zzz"), Vec::<&Exercise>::new());
    }

    #[test]
    fn test_catalogue_names_are_unique() {
        assert_eq!(EXERCISES.len(), CATALOGUE.len());
    }
}
