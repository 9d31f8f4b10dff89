use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(ExperienceLevel::Beginner),
            "intermediate" => Ok(ExperienceLevel::Intermediate),
            "advanced" => Ok(ExperienceLevel::Advanced),
            _ => Err(CoreError::UnknownExperience(s.to_string())),
        }
    }
}

/// Fitness objective a user can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    MuscleGrowth,
    Strength,
    Endurance,
    Recovery,
    WeightLoss,
    GeneralHealth,
}

impl Goal {
    pub const ALL: [Goal; 6] = [
        Goal::MuscleGrowth,
        Goal::Strength,
        Goal::Endurance,
        Goal::Recovery,
        Goal::WeightLoss,
        Goal::GeneralHealth,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            Goal::MuscleGrowth => "muscle-growth",
            Goal::Strength => "strength",
            Goal::Endurance => "endurance",
            Goal::Recovery => "recovery",
            Goal::WeightLoss => "weight-loss",
            Goal::GeneralHealth => "general-health",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Goal::MuscleGrowth => "Muscle Growth",
            Goal::Strength => "Strength Gains",
            Goal::Endurance => "Endurance",
            Goal::Recovery => "Recovery",
            Goal::WeightLoss => "Weight Loss",
            Goal::GeneralHealth => "General Health",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Goal {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Goal::ALL
            .into_iter()
            .find(|g| g.tag().eq_ignore_ascii_case(tag))
            .ok_or_else(|| CoreError::UnknownGoal(s.to_string()))
    }
}

/// Experience level plus selected goals, in selection order and without repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UserProfile {
    pub experience_level: ExperienceLevel,
    goals: Vec<Goal>,
}

impl UserProfile {
    pub fn new(experience_level: ExperienceLevel, goals: impl IntoIterator<Item = Goal>) -> Self {
        let mut profile = Self {
            experience_level,
            goals: Vec::new(),
        };
        for goal in goals {
            profile.add_goal(goal);
        }
        profile
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn has_goal(&self, goal: Goal) -> bool {
        self.goals.contains(&goal)
    }

    pub fn add_goal(&mut self, goal: Goal) {
        if !self.has_goal(goal) {
            self.goals.push(goal);
        }
    }

    /// Select `goal` if absent, deselect it otherwise. Returns whether it is now selected.
    pub fn toggle_goal(&mut self, goal: Goal) -> bool {
        if let Some(pos) = self.goals.iter().position(|g| *g == goal) {
            self.goals.remove(pos);
            false
        } else {
            self.goals.push(goal);
            true
        }
    }
}
