/// Workout designer: drafts built from the exercise library, and the in-session
/// library of saved workouts with a "current" selection.
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::CoreError;
use crate::ids::new_id;
use crate::workout::{Exercise, ExerciseId, Workout, WorkoutId};

pub const DEFAULT_SETS: u32 = 3;
pub const DEFAULT_REPS: u32 = 10;
pub const DEFAULT_REST_SECS: u32 = 60;

/// Partial update to an exercise in a draft. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExerciseUpdate {
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub rest_time: Option<u32>,
}

/// A workout under construction. Created fresh or from an existing workout via
/// [`WorkoutLibrary::edit`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutDraft {
    pub name: String,
    exercises: Vec<Exercise>,
    editing: Option<(WorkoutId, DateTime<Utc>)>,
}

impl WorkoutDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    /// Id of the saved workout this draft will replace, if any.
    pub fn editing(&self) -> Option<&WorkoutId> {
        self.editing.as_ref().map(|(id, _)| id)
    }

    /// Append an exercise with default sets, reps, weight and rest. Returns its id.
    pub fn add_exercise(&mut self, name: impl Into<String>) -> ExerciseId {
        let id = new_id("exercise");
        self.exercises.push(Exercise {
            id: id.clone(),
            name: name.into(),
            sets: DEFAULT_SETS,
            reps: DEFAULT_REPS,
            weight: 0.0,
            rest_time: DEFAULT_REST_SECS,
        });
        id
    }

    /// Apply `update` to one exercise. The draft is unchanged if the result is invalid.
    pub fn update_exercise(&mut self, id: &str, update: &ExerciseUpdate) -> Result<(), CoreError> {
        let exercise = self
            .exercises
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::UnknownExercise(id.to_string()))?;

        let mut updated = exercise.clone();
        if let Some(sets) = update.sets {
            updated.sets = sets;
        }
        if let Some(reps) = update.reps {
            updated.reps = reps;
        }
        if let Some(weight) = update.weight {
            updated.weight = weight;
        }
        if let Some(rest_time) = update.rest_time {
            updated.rest_time = rest_time;
        }
        updated.validate()?;
        *exercise = updated;
        Ok(())
    }

    pub fn clear_exercises(&mut self) {
        self.exercises.clear();
    }

    pub fn remove_exercise(&mut self, id: &str) -> Result<Exercise, CoreError> {
        let pos = self
            .exercises
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CoreError::UnknownExercise(id.to_string()))?;
        Ok(self.exercises.remove(pos))
    }
}

/// Saved workouts for one session, in creation order.
#[derive(Debug, Clone, Default)]
pub struct WorkoutLibrary {
    workouts: Vec<Workout>,
    current: Option<WorkoutId>,
}

impl WorkoutLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn get(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }

    pub fn current(&self) -> Option<&Workout> {
        self.current.as_deref().and_then(|id| self.get(id))
    }

    pub fn set_current(&mut self, id: Option<&str>) -> Result<(), CoreError> {
        match id {
            Some(id) => {
                if self.get(id).is_none() {
                    return Err(CoreError::UnknownWorkout(id.to_string()));
                }
                self.current = Some(id.to_string());
            }
            None => self.current = None,
        }
        Ok(())
    }

    /// Start a draft pre-filled from a saved workout.
    pub fn edit(&self, id: &str) -> Result<WorkoutDraft, CoreError> {
        let workout = self
            .get(id)
            .ok_or_else(|| CoreError::UnknownWorkout(id.to_string()))?;
        Ok(WorkoutDraft {
            name: workout.name.clone(),
            exercises: workout.exercises.clone(),
            editing: Some((workout.id.clone(), workout.created_at)),
        })
    }

    /// Save a draft and make it the current workout.
    ///
    /// A draft from [`WorkoutLibrary::edit`] replaces its workout in place and keeps
    /// its id and creation time; any other draft is appended as a new workout.
    pub fn save(&mut self, draft: WorkoutDraft) -> Result<&Workout, CoreError> {
        let name = draft.name.trim().to_string();
        if name.is_empty() || draft.exercises.is_empty() {
            return Err(CoreError::IncompleteWorkout);
        }
        for exercise in &draft.exercises {
            exercise.validate()?;
        }

        let now = Utc::now();
        let (id, created_at, slot) = match draft.editing {
            Some((id, created_at)) => {
                let pos = self
                    .workouts
                    .iter()
                    .position(|w| w.id == id)
                    .ok_or_else(|| CoreError::UnknownWorkout(id.clone()))?;
                (id, created_at, Some(pos))
            }
            None => (new_id("workout"), now, None),
        };

        let workout = Workout {
            id: id.clone(),
            name,
            exercises: draft.exercises,
            created_at,
            updated_at: now,
        };
        info!(
            workout_id = %workout.id,
            exercises = workout.exercises.len(),
            replaced = slot.is_some(),
            "workout saved"
        );

        let pos = match slot {
            Some(pos) => {
                self.workouts[pos] = workout;
                pos
            }
            None => {
                self.workouts.push(workout);
                self.workouts.len() - 1
            }
        };
        self.current = Some(id);
        Ok(&self.workouts[pos])
    }

    /// Remove a workout, clearing the current selection if it pointed at it.
    pub fn delete(&mut self, id: &str) -> Result<Workout, CoreError> {
        let pos = self
            .workouts
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| CoreError::UnknownWorkout(id.to_string()))?;
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        info!(workout_id = id, "workout deleted");
        Ok(self.workouts.remove(pos))
    }
}
