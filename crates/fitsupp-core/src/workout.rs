/// Workout model and the analyzer that classifies a workout by rep range and volume.
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub type WorkoutId = String;
pub type ExerciseId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    /// Load in the user's unit of choice; 0 for bodyweight.
    pub weight: f64,
    /// Rest between sets, in seconds.
    pub rest_time: u32,
}

impl Exercise {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.sets == 0 {
            return Err(CoreError::InvalidExercise(format!(
                "{}: sets must be at least 1",
                self.name
            )));
        }
        if self.reps == 0 {
            return Err(CoreError::InvalidExercise(format!(
                "{}: reps must be at least 1",
                self.name
            )));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(CoreError::InvalidExercise(format!(
                "{}: weight must be a non-negative number",
                self.name
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Workout {
    pub id: WorkoutId,
    pub name: String,
    pub exercises: Vec<Exercise>,
    #[schemars(with = "String")]
    pub created_at: DateTime<Utc>,
    #[schemars(with = "String")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutKind {
    General,
    Strength,
    Hypertrophy,
    Endurance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WorkoutAnalysis {
    pub kind: WorkoutKind,
    pub intensity: Intensity,
}

impl WorkoutAnalysis {
    pub const GENERAL: WorkoutAnalysis = WorkoutAnalysis {
        kind: WorkoutKind::General,
        intensity: Intensity::Moderate,
    };
}

const STRENGTH_MAX_AVG_REPS: f64 = 6.0;
const HYPERTROPHY_MAX_AVG_REPS: f64 = 12.0;
const HIGH_INTENSITY_MIN_SETS: u64 = 21;
const LOW_INTENSITY_MAX_SETS: u64 = 9;

/// Classify a workout. An absent or empty workout is `general` / `moderate`.
pub fn analyze(workout: Option<&Workout>) -> WorkoutAnalysis {
    let Some(workout) = workout.filter(|w| !w.exercises.is_empty()) else {
        return WorkoutAnalysis::GENERAL;
    };

    let exercise_count = workout.exercises.len() as f64;
    let total_sets: u64 = workout.exercises.iter().map(|e| u64::from(e.sets)).sum();
    let total_reps: u64 = workout.exercises.iter().map(|e| u64::from(e.reps)).sum();
    let avg_reps = total_reps as f64 / exercise_count;

    let kind = if avg_reps <= STRENGTH_MAX_AVG_REPS {
        WorkoutKind::Strength
    } else if avg_reps <= HYPERTROPHY_MAX_AVG_REPS {
        WorkoutKind::Hypertrophy
    } else {
        WorkoutKind::Endurance
    };

    let intensity = if total_sets >= HIGH_INTENSITY_MIN_SETS {
        Intensity::High
    } else if total_sets <= LOW_INTENSITY_MAX_SETS {
        Intensity::Low
    } else {
        Intensity::Moderate
    };

    WorkoutAnalysis { kind, intensity }
}
