/// Supplement recommendation engine.
///
/// Every supplement the engine can emit is bound to a stable catalog id and resolved
/// once when the [`Recommender`] is built. A catalog missing any of those ids fails
/// construction, so a recommendation is either complete or not produced at all.
///
/// Selection runs in three passes over an insertion-ordered list:
/// 1. seeds chosen by experience level
/// 2. goal-driven additions, in a fixed goal order
/// 3. additions driven by the analyzed workout
///
/// An id already in the list is never inserted again.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{ids, Catalog, SupplementCategory, SupplementRecord};
use crate::error::CoreError;
use crate::profile::{ExperienceLevel, Goal, UserProfile};
use crate::workout::{Intensity, WorkoutAnalysis, WorkoutKind};

pub const REASON_MUSCLE_GROWTH: &str = "Essential for muscle growth and recovery";
pub const REASON_STRENGTH: &str = "Proven to increase strength and power output";
pub const REASON_WORKOUT_RECOVERY: &str = "Helps with recovery from your workout routine";
pub const REASON_GENERAL_HEALTH: &str = "Supports overall health and wellness";
pub const REASON_BEGINNER: &str = "Foundational supplement for beginners";
pub const REASON_DEFAULT: &str = "Recommended based on your profile";

/// Supplement ids that seed a beginner's list.
pub const BEGINNER_SEEDS: [&str; 2] = [ids::WHEY_PROTEIN, ids::MAGNESIUM];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Recommendation {
    pub supplement: SupplementRecord,
    pub reason: String,
}

#[derive(Debug, Clone)]
struct Resolved {
    protein: SupplementRecord,
    creatine: SupplementRecord,
    sleep_mineral: SupplementRecord,
    stimulant: SupplementRecord,
    recovery_amino: SupplementRecord,
    bcaa: SupplementRecord,
    beta_alanine: SupplementRecord,
    omega_3: SupplementRecord,
    vitamin_d: SupplementRecord,
    citrulline: SupplementRecord,
}

impl Resolved {
    fn from_catalog(catalog: &Catalog) -> Result<Self, CoreError> {
        let get = |id: &str| catalog.require(id).cloned();
        Ok(Self {
            protein: get(ids::WHEY_PROTEIN)?,
            creatine: get(ids::CREATINE)?,
            sleep_mineral: get(ids::MAGNESIUM)?,
            stimulant: get(ids::CAFFEINE)?,
            recovery_amino: get(ids::GLUTAMINE)?,
            bcaa: get(ids::BCAA)?,
            beta_alanine: get(ids::BETA_ALANINE)?,
            omega_3: get(ids::OMEGA_3)?,
            vitamin_d: get(ids::VITAMIN_D3)?,
            citrulline: get(ids::CITRULLINE)?,
        })
    }
}

/// Recommendation engine bound to one catalog.
#[derive(Debug, Clone)]
pub struct Recommender {
    refs: Resolved,
}

impl Recommender {
    pub fn new(catalog: &Catalog) -> Result<Self, CoreError> {
        let refs = Resolved::from_catalog(catalog)?;
        Ok(Self { refs })
    }

    pub fn recommend(
        &self,
        profile: &UserProfile,
        analysis: &WorkoutAnalysis,
    ) -> Vec<SupplementRecord> {
        let r = &self.refs;
        let mut picks = Picks::default();

        match profile.experience_level {
            ExperienceLevel::Beginner => {
                picks.insert(&r.protein);
                picks.insert(&r.sleep_mineral);
            }
            ExperienceLevel::Intermediate => {
                picks.insert(&r.protein);
                picks.insert(&r.creatine);
                picks.insert(&r.sleep_mineral);
            }
            ExperienceLevel::Advanced => {
                picks.insert(&r.protein);
                picks.insert(&r.creatine);
                picks.insert(&r.stimulant);
                picks.insert(&r.recovery_amino);
            }
        }

        if profile.has_goal(Goal::MuscleGrowth) {
            picks.insert(&r.creatine);
            picks.insert(&r.bcaa);
        }
        if profile.has_goal(Goal::Endurance) {
            picks.insert(&r.beta_alanine);
        }
        if profile.has_goal(Goal::Recovery) {
            picks.insert(&r.recovery_amino);
            picks.insert(&r.omega_3);
        }
        if profile.has_goal(Goal::GeneralHealth) {
            picks.insert(&r.vitamin_d);
            picks.insert(&r.omega_3);
        }

        if analysis.kind == WorkoutKind::Strength {
            picks.insert(&r.creatine);
        }
        if analysis.intensity == Intensity::High {
            picks.insert(&r.citrulline);
        }

        debug!(
            experience = %profile.experience_level,
            goals = profile.goals().len(),
            count = picks.0.len(),
            "supplement recommendations computed"
        );
        picks.0
    }

    pub fn recommend_with_reasons(
        &self,
        profile: &UserProfile,
        analysis: &WorkoutAnalysis,
        has_current_workout: bool,
    ) -> Vec<Recommendation> {
        self.recommend(profile, analysis)
            .into_iter()
            .map(|supplement| {
                let reason = reason_for(&supplement, profile, has_current_workout).to_string();
                Recommendation { supplement, reason }
            })
            .collect()
    }
}

#[derive(Default)]
struct Picks(Vec<SupplementRecord>);

impl Picks {
    fn insert(&mut self, record: &SupplementRecord) {
        if !self.0.iter().any(|r| r.id == record.id) {
            self.0.push(record.clone());
        }
    }
}

/// One-shot form of [`Recommender::recommend`]. Fails if `catalog` lacks any
/// supplement the engine relies on.
pub fn recommend(
    profile: &UserProfile,
    analysis: &WorkoutAnalysis,
    catalog: &Catalog,
) -> Result<Vec<SupplementRecord>, CoreError> {
    Ok(Recommender::new(catalog)?.recommend(profile, analysis))
}

/// Explain why `supplement` was recommended. The first matching rule wins.
pub fn reason_for(
    supplement: &SupplementRecord,
    profile: &UserProfile,
    has_current_workout: bool,
) -> &'static str {
    let beginner = profile.experience_level == ExperienceLevel::Beginner;

    if supplement.category == SupplementCategory::Protein && profile.has_goal(Goal::MuscleGrowth)
    {
        REASON_MUSCLE_GROWTH
    } else if supplement.id == ids::CREATINE && (profile.has_goal(Goal::Strength) || !beginner) {
        REASON_STRENGTH
    } else if supplement.category == SupplementCategory::Recovery && has_current_workout {
        REASON_WORKOUT_RECOVERY
    } else if supplement.category == SupplementCategory::Vitamin
        && profile.has_goal(Goal::GeneralHealth)
    {
        REASON_GENERAL_HEALTH
    } else if beginner && BEGINNER_SEEDS.contains(&supplement.id.as_str()) {
        REASON_BEGINNER
    } else {
        REASON_DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::catalog::CatalogSection;

    fn ids_of(records: &[SupplementRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    fn engine() -> Recommender {
        Recommender::new(&Catalog::builtin()).expect("builtin catalog resolves")
    }

    fn profile(level: ExperienceLevel, goals: &[Goal]) -> UserProfile {
        UserProfile::new(level, goals.iter().copied())
    }

    #[test]
    fn beginner_without_goals_gets_seeds_only() {
        let picks = engine().recommend(
            &profile(ExperienceLevel::Beginner, &[]),
            &WorkoutAnalysis::GENERAL,
        );
        assert_eq!(ids_of(&picks), ["whey-protein", "magnesium"]);
    }

    #[test]
    fn experience_seeds() {
        let e = engine();
        let seeds = |level| ids_of(&e.recommend(&profile(level, &[]), &WorkoutAnalysis::GENERAL))
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        assert_eq!(
            seeds(ExperienceLevel::Intermediate),
            ["whey-protein", "creatine-mono", "magnesium"]
        );
        assert_eq!(
            seeds(ExperienceLevel::Advanced),
            ["whey-protein", "creatine-mono", "caffeine", "glutamine"]
        );
    }

    #[test]
    fn advanced_muscle_growth_inserts_creatine_once() {
        let picks = engine().recommend(
            &profile(ExperienceLevel::Advanced, &[Goal::MuscleGrowth]),
            &WorkoutAnalysis::GENERAL,
        );
        assert_eq!(
            ids_of(&picks),
            ["whey-protein", "creatine-mono", "caffeine", "glutamine", "bcaa"]
        );
    }

    #[test]
    fn goals_apply_in_fixed_order() {
        // Selection order must not change output order.
        let a = engine().recommend(
            &profile(
                ExperienceLevel::Beginner,
                &[Goal::GeneralHealth, Goal::Recovery, Goal::Endurance],
            ),
            &WorkoutAnalysis::GENERAL,
        );
        assert_eq!(
            ids_of(&a),
            [
                "whey-protein",
                "magnesium",
                "beta-alanine",
                "glutamine",
                "omega-3",
                "vitamin-d3"
            ]
        );
    }

    #[test]
    fn workout_adjustments() {
        let heavy = WorkoutAnalysis {
            kind: WorkoutKind::Strength,
            intensity: Intensity::High,
        };
        let picks = engine().recommend(&profile(ExperienceLevel::Beginner, &[]), &heavy);
        assert_eq!(
            ids_of(&picks),
            ["whey-protein", "magnesium", "creatine-mono", "citrulline"]
        );

        let light_endurance = WorkoutAnalysis {
            kind: WorkoutKind::Endurance,
            intensity: Intensity::Low,
        };
        let picks = engine().recommend(&profile(ExperienceLevel::Beginner, &[]), &light_endurance);
        assert_eq!(ids_of(&picks), ["whey-protein", "magnesium"]);
    }

    #[test]
    fn never_returns_duplicates() {
        let e = engine();
        let levels = [
            ExperienceLevel::Beginner,
            ExperienceLevel::Intermediate,
            ExperienceLevel::Advanced,
        ];
        let analyses = [
            WorkoutAnalysis::GENERAL,
            WorkoutAnalysis {
                kind: WorkoutKind::Strength,
                intensity: Intensity::High,
            },
            WorkoutAnalysis {
                kind: WorkoutKind::Hypertrophy,
                intensity: Intensity::Low,
            },
        ];
        for level in levels {
            for mask in 0u32..(1 << Goal::ALL.len()) {
                let goals: Vec<Goal> = Goal::ALL
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, g)| *g)
                    .collect();
                for analysis in &analyses {
                    let picks = e.recommend(&profile(level, &goals), analysis);
                    let unique: HashSet<&str> = picks.iter().map(|r| r.id.as_str()).collect();
                    assert_eq!(unique.len(), picks.len(), "{level:?} {goals:?} {analysis:?}");
                }
            }
        }
    }

    #[test]
    fn catalog_order_does_not_matter() {
        let builtin = Catalog::builtin();
        let mut shuffled = Catalog::empty();
        for section in CatalogSection::ALL {
            for record in builtin.section(section).iter().rev() {
                shuffled.push(section, record.clone());
            }
        }
        let p = profile(ExperienceLevel::Intermediate, &[Goal::Recovery]);
        let a = recommend(&p, &WorkoutAnalysis::GENERAL, &builtin).unwrap();
        let b = recommend(&p, &WorkoutAnalysis::GENERAL, &shuffled).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_entry_fails_closed() {
        let builtin = Catalog::builtin();
        let mut partial = Catalog::empty();
        for (section, record) in builtin.iter_sections() {
            if record.id != ids::CITRULLINE {
                partial.push(section, record.clone());
            }
        }
        let result = recommend(
            &profile(ExperienceLevel::Beginner, &[]),
            &WorkoutAnalysis::GENERAL,
            &partial,
        );
        assert_eq!(
            result,
            Err(CoreError::MissingCatalogEntry("citrulline".to_string()))
        );
    }

    #[test]
    fn protein_reason_beats_beginner_rule() {
        let catalog = Catalog::builtin();
        let whey = catalog.require(ids::WHEY_PROTEIN).unwrap();
        let p = profile(ExperienceLevel::Beginner, &[Goal::MuscleGrowth]);
        assert_eq!(reason_for(whey, &p, false), REASON_MUSCLE_GROWTH);
        assert_eq!(
            reason_for(whey, &profile(ExperienceLevel::Beginner, &[]), false),
            REASON_BEGINNER
        );
    }

    #[test]
    fn creatine_reason() {
        let catalog = Catalog::builtin();
        let creatine = catalog.require(ids::CREATINE).unwrap();
        assert_eq!(
            reason_for(creatine, &profile(ExperienceLevel::Intermediate, &[]), false),
            REASON_STRENGTH
        );
        assert_eq!(
            reason_for(creatine, &profile(ExperienceLevel::Beginner, &[Goal::Strength]), false),
            REASON_STRENGTH
        );
        assert_eq!(
            reason_for(creatine, &profile(ExperienceLevel::Beginner, &[]), false),
            REASON_DEFAULT
        );
    }

    #[test]
    fn recovery_vitamin_and_default_reasons() {
        let catalog = Catalog::builtin();
        let bcaa = catalog.require(ids::BCAA).unwrap();
        let vitamin_d = catalog.require(ids::VITAMIN_D3).unwrap();
        let omega = catalog.require(ids::OMEGA_3).unwrap();
        let health = profile(ExperienceLevel::Advanced, &[Goal::GeneralHealth]);

        assert_eq!(reason_for(bcaa, &health, true), REASON_WORKOUT_RECOVERY);
        assert_eq!(reason_for(bcaa, &health, false), REASON_DEFAULT);
        assert_eq!(reason_for(vitamin_d, &health, true), REASON_GENERAL_HEALTH);
        // Omega-3 is filed as a fatty acid, not a vitamin.
        assert_eq!(reason_for(omega, &health, true), REASON_DEFAULT);
    }

    #[test]
    fn recommendations_carry_reasons() {
        let recs = engine().recommend_with_reasons(
            &profile(ExperienceLevel::Beginner, &[]),
            &WorkoutAnalysis::GENERAL,
            false,
        );
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.reason == REASON_BEGINNER));
    }
}
