/// Per-process user session: saved workouts, profile, supplement stack and weekly plan.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use fitsupp_advisor::prompt::AdvisorContext;
use fitsupp_core::catalog::Catalog;
use fitsupp_core::error::CoreError;
use fitsupp_core::designer::{ExerciseUpdate, WorkoutDraft, WorkoutLibrary};
use fitsupp_core::exercises;
use fitsupp_core::profile::UserProfile;
use fitsupp_core::recommend::{Recommendation, Recommender};
use fitsupp_core::schedule::{ScheduleStats, Weekday, WeeklySchedule};
use fitsupp_core::stack::SupplementStack;
use fitsupp_core::workout::{analyze, Workout, WorkoutAnalysis};

use crate::error::AppError;

/// One exercise as supplied by a client. Omitted numbers take the designer defaults.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExerciseInput {
    /// Must match an entry of the exercise library, e.g. "Bench Press".
    pub name: String,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    /// Seconds of rest between sets.
    pub rest_time: Option<u32>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DayPlan {
    pub day: Weekday,
    pub workout_id: Option<String>,
    pub workout_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ScheduleView {
    pub days: Vec<DayPlan>,
    pub stats: ScheduleStats,
}

#[derive(Debug, Default)]
pub struct Session {
    pub library: WorkoutLibrary,
    pub profile: UserProfile,
    pub stack: SupplementStack,
    pub schedule: WeeklySchedule,
}

impl Session {
    pub fn create_workout(
        &mut self,
        name: &str,
        exercises: &[ExerciseInput],
    ) -> Result<Workout, AppError> {
        let mut draft = WorkoutDraft::new(name);
        fill_draft(&mut draft, exercises)?;
        Ok(self.library.save(draft)?.clone())
    }

    /// Rename and/or replace the exercises of a saved workout. The id and creation time
    /// are kept.
    pub fn update_workout(
        &mut self,
        workout_id: &str,
        name: Option<&str>,
        exercises: Option<&[ExerciseInput]>,
    ) -> Result<Workout, AppError> {
        let mut draft = self.library.edit(workout_id)?;
        if let Some(name) = name {
            draft.name = name.to_string();
        }
        if let Some(exercises) = exercises {
            draft.clear_exercises();
            fill_draft(&mut draft, exercises)?;
        }
        Ok(self.library.save(draft)?.clone())
    }

    /// Delete a workout and rest every day that was planned with it.
    pub fn delete_workout(&mut self, workout_id: &str) -> Result<(Workout, usize), AppError> {
        let deleted = self.library.delete(workout_id)?;
        let cleared = self.schedule.clear_workout(workout_id);
        if cleared > 0 {
            info!(workout_id, cleared_days = cleared, "schedule days cleared");
        }
        Ok((deleted, cleared))
    }

    /// Select or deselect a catalog supplement. Returns whether it is now in the stack.
    pub fn toggle_supplement(
        &mut self,
        catalog: &Catalog,
        supplement_id: &str,
    ) -> Result<bool, AppError> {
        let record = catalog.require(supplement_id.trim())?;
        let selected = self.stack.toggle(record);
        info!(
            supplement_id = %record.id,
            selected,
            stack_size = self.stack.len(),
            "supplement stack updated"
        );
        Ok(selected)
    }

    pub fn assign_day(&mut self, day: &str, workout_id: &str) -> Result<Weekday, AppError> {
        let day: Weekday = day.parse()?;
        if self.library.get(workout_id).is_none() {
            return Err(CoreError::UnknownWorkout(workout_id.to_string()).into());
        }
        self.schedule.assign(day, workout_id);
        Ok(day)
    }

    pub fn clear_day(&mut self, day: &str) -> Result<Weekday, AppError> {
        let day: Weekday = day.parse()?;
        self.schedule.clear(day);
        Ok(day)
    }

    pub fn schedule_view(&self) -> ScheduleView {
        let days = self
            .schedule
            .entries()
            .map(|(day, id)| DayPlan {
                day,
                workout_id: id.cloned(),
                workout_name: id
                    .and_then(|id| self.library.get(id))
                    .map(|w| w.name.clone()),
            })
            .collect();
        ScheduleView {
            days,
            stats: self.schedule.stats(),
        }
    }

    /// Analysis of the current workout, or the general default when none is selected.
    pub fn analysis(&self) -> WorkoutAnalysis {
        analyze(self.library.current())
    }

    pub fn recommendations(&self, recommender: &Recommender) -> Vec<Recommendation> {
        recommender.recommend_with_reasons(
            &self.profile,
            &self.analysis(),
            self.library.current().is_some(),
        )
    }

    /// Snapshot of what the copilot should know, taken at submission time.
    pub fn advisor_context(&self, recommender: &Recommender) -> AdvisorContext {
        AdvisorContext {
            experience: self.profile.experience_level,
            goals: self.profile.goals().to_vec(),
            current_workout: self.library.current().cloned(),
            recommendations: recommender.recommend(&self.profile, &self.analysis()),
        }
    }
}

fn fill_draft(draft: &mut WorkoutDraft, inputs: &[ExerciseInput]) -> Result<(), AppError> {
    for input in inputs {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::EmptyField("exercise name"));
        }
        if exercises::group_of(name).is_none() {
            return Err(AppError::UnlistedExercise(name.to_string()));
        }
        let id = draft.add_exercise(name);
        draft.update_exercise(
            &id,
            &ExerciseUpdate {
                sets: input.sets,
                reps: input.reps,
                weight: input.weight,
                rest_time: input.rest_time,
            },
        )?;
    }
    Ok(())
}
