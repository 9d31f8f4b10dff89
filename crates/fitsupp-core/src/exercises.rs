/// Fixed exercise library that workouts are built from.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
}

impl MuscleGroup {
    pub const ALL: [MuscleGroup; 6] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Legs,
        MuscleGroup::Shoulders,
        MuscleGroup::Arms,
        MuscleGroup::Core,
    ];

    pub fn exercises(&self) -> &'static [&'static str] {
        match self {
            MuscleGroup::Chest => &[
                "Bench Press",
                "Incline Press",
                "Dumbbell Flyes",
                "Push-ups",
                "Cable Crossovers",
            ],
            MuscleGroup::Back => &[
                "Pull-ups",
                "Deadlifts",
                "Bent-Over Row",
                "Lat Pulldown",
                "T-Bar Row",
            ],
            MuscleGroup::Legs => &["Squats", "Leg Press", "Lunges", "Leg Curls", "Calf Raises"],
            MuscleGroup::Shoulders => &[
                "Overhead Press",
                "Lateral Raises",
                "Front Raises",
                "Shrugs",
                "Upright Row",
            ],
            MuscleGroup::Arms => &[
                "Bicep Curls",
                "Tricep Extensions",
                "Hammer Curls",
                "Cable Pushdowns",
                "Preacher Curls",
            ],
            MuscleGroup::Core => &[
                "Plank",
                "Crunches",
                "Russian Twists",
                "Leg Raises",
                "Mountain Climbers",
            ],
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "🏋️",
            MuscleGroup::Back => "💪",
            MuscleGroup::Legs => "🦵",
            MuscleGroup::Shoulders => "🤸",
            MuscleGroup::Arms => "💪",
            MuscleGroup::Core => "🧘",
        }
    }
}

/// Muscle group an exercise name belongs to, if it is in the library.
pub fn group_of(name: &str) -> Option<MuscleGroup> {
    MuscleGroup::ALL.into_iter().find(|g| {
        g.exercises()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(name.trim()))
    })
}
