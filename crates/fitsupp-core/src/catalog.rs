/// Static supplement catalog.
///
/// Records are grouped into four sections and built once at startup. Each record
/// carries the regulatory citation that the advisor quotes verbatim, so the text in
/// `compliance` must not be paraphrased.
use std::collections::HashSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Well-known supplement ids referenced by the recommendation engine.
pub mod ids {
    pub const WHEY_PROTEIN: &str = "whey-protein";
    pub const CASEIN_PROTEIN: &str = "casein-protein";
    pub const CREATINE: &str = "creatine-mono";
    pub const BETA_ALANINE: &str = "beta-alanine";
    pub const CAFFEINE: &str = "caffeine";
    pub const CITRULLINE: &str = "citrulline";
    pub const GLUTAMINE: &str = "glutamine";
    pub const BCAA: &str = "bcaa";
    pub const VITAMIN_D3: &str = "vitamin-d3";
    pub const OMEGA_3: &str = "omega-3";
    pub const MAGNESIUM: &str = "magnesium";
}

/// Display category of a supplement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum SupplementCategory {
    Protein,
    Performance,
    Endurance,
    #[serde(rename = "Energy/Focus")]
    EnergyFocus,
    #[serde(rename = "Pump/Blood Flow")]
    PumpBloodFlow,
    Recovery,
    Vitamin,
    #[serde(rename = "Essential Fatty Acid")]
    EssentialFattyAcid,
    Mineral,
}

impl SupplementCategory {
    pub fn label(&self) -> &'static str {
        match self {
            SupplementCategory::Protein => "Protein",
            SupplementCategory::Performance => "Performance",
            SupplementCategory::Endurance => "Endurance",
            SupplementCategory::EnergyFocus => "Energy/Focus",
            SupplementCategory::PumpBloodFlow => "Pump/Blood Flow",
            SupplementCategory::Recovery => "Recovery",
            SupplementCategory::Vitamin => "Vitamin",
            SupplementCategory::EssentialFattyAcid => "Essential Fatty Acid",
            SupplementCategory::Mineral => "Mineral",
        }
    }
}

impl fmt::Display for SupplementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Catalog section a record is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum CatalogSection {
    Proteins,
    PreWorkout,
    Recovery,
    Vitamins,
}

impl CatalogSection {
    pub const ALL: [CatalogSection; 4] = [
        CatalogSection::Proteins,
        CatalogSection::PreWorkout,
        CatalogSection::Recovery,
        CatalogSection::Vitamins,
    ];

    fn index(self) -> usize {
        match self {
            CatalogSection::Proteins => 0,
            CatalogSection::PreWorkout => 1,
            CatalogSection::Recovery => 2,
            CatalogSection::Vitamins => 3,
        }
    }
}

/// Regulatory citation attached to a supplement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Compliance {
    /// e.g. "FDA Compliant - GRAS"
    pub status: String,
    /// e.g. "FDA 21 CFR 182.1180"
    pub source: String,
    pub url: String,
    /// Year and month the citation was last checked, e.g. "2024-01"
    pub last_verified: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SupplementRecord {
    pub id: String,
    pub name: String,
    pub category: SupplementCategory,
    pub ingredients: Vec<String>,
    pub benefits: Vec<String>,
    pub dosage: String,
    pub timing: String,
    /// Short regulatory label, e.g. "GRAS" or "Dietary Supplement"
    pub fda_status: String,
    pub compliance: Compliance,
    /// Training styles the supplement suits ("all" matches every style).
    /// Informational only; selection never reads it.
    pub workout_types: Vec<String>,
}

impl SupplementRecord {
    pub fn suits_workout_type(&self, tag: &str) -> bool {
        self.workout_types
            .iter()
            .any(|t| t == "all" || t.eq_ignore_ascii_case(tag))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    sections: [Vec<SupplementRecord>; 4],
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a record to a section. Uniqueness is checked by [`Catalog::validate`].
    pub fn push(&mut self, section: CatalogSection, record: SupplementRecord) {
        self.sections[section.index()].push(record);
    }

    pub fn section(&self, section: CatalogSection) -> &[SupplementRecord] {
        &self.sections[section.index()]
    }

    /// All records, section by section, preserving in-section order.
    pub fn iter(&self) -> impl Iterator<Item = &SupplementRecord> {
        self.sections.iter().flat_map(|s| s.iter())
    }

    /// All records paired with the section they belong to.
    pub fn iter_sections(&self) -> impl Iterator<Item = (CatalogSection, &SupplementRecord)> {
        CatalogSection::ALL
            .into_iter()
            .flat_map(move |s| self.section(s).iter().map(move |r| (s, r)))
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<&SupplementRecord> {
        self.iter().find(|r| r.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&SupplementRecord, CoreError> {
        self.get(id)
            .ok_or_else(|| CoreError::MissingCatalogEntry(id.to_string()))
    }

    /// Records tagged `all` or `tag`, in catalog order.
    pub fn supplements_for_workout_type(&self, tag: &str) -> Vec<&SupplementRecord> {
        self.iter().filter(|r| r.suits_workout_type(tag)).collect()
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen = HashSet::new();
        for record in self.iter() {
            if !seen.insert(record.id.as_str()) {
                return Err(CoreError::DuplicateSupplement(record.id.clone()));
            }
        }
        Ok(())
    }

    /// The catalog shipped with the application.
    pub fn builtin() -> Self {
        let mut catalog = Catalog::empty();

        catalog.push(
            CatalogSection::Proteins,
            record(
                ids::WHEY_PROTEIN,
                "Whey Protein Isolate",
                SupplementCategory::Protein,
                &["Whey Protein Isolate", "Natural Flavoring", "Sunflower Lecithin"],
                &["Muscle growth", "Recovery", "Protein synthesis"],
                "25-30g per serving",
                "Post-workout or between meals",
                "GRAS (Generally Recognized As Safe)",
                (
                    "FDA Compliant",
                    "FDA GRAS Notice No. GRN 000037",
                    GRAS_INVENTORY_URL,
                ),
                &["strength", "hypertrophy", "endurance"],
            ),
        );
        catalog.push(
            CatalogSection::Proteins,
            record(
                ids::CASEIN_PROTEIN,
                "Micellar Casein",
                SupplementCategory::Protein,
                &["Micellar Casein", "Natural Vanilla Flavor", "Xanthan Gum"],
                &["Slow-release protein", "Overnight recovery", "Muscle preservation"],
                "25-30g before bed",
                "Before sleep",
                "GRAS",
                (
                    "FDA Compliant",
                    "FDA GRAS Notice No. GRN 000397",
                    GRAS_INVENTORY_URL,
                ),
                &["strength", "hypertrophy"],
            ),
        );

        catalog.push(
            CatalogSection::PreWorkout,
            record(
                ids::CREATINE,
                "Creatine Monohydrate",
                SupplementCategory::Performance,
                &["Creatine Monohydrate (Creapure\u{ae})"],
                &["Increased strength", "Power output", "Muscle volume"],
                "5g daily",
                "Any time (consistency matters more than timing)",
                "Dietary Supplement",
                (
                    "FDA Compliant - Dietary Supplement",
                    "DSHEA compliant, New Dietary Ingredient (NDI) acknowledged",
                    DIETARY_SUPPLEMENTS_URL,
                ),
                &["strength", "power", "hypertrophy"],
            ),
        );
        catalog.push(
            CatalogSection::PreWorkout,
            record(
                ids::BETA_ALANINE,
                "Beta-Alanine",
                SupplementCategory::Endurance,
                &["Beta-Alanine"],
                &["Reduced fatigue", "Improved endurance", "Delayed muscle fatigue"],
                "2-5g daily (divided doses)",
                "Split throughout the day",
                "Dietary Supplement",
                (
                    "FDA Compliant - Dietary Supplement",
                    "DSHEA compliant, NDI No. 576",
                    "https://www.fda.gov/food/new-dietary-ingredients-ndi-notification-process",
                ),
                &["endurance", "hiit", "crossfit"],
            ),
        );
        catalog.push(
            CatalogSection::PreWorkout,
            record(
                ids::CAFFEINE,
                "Caffeine Anhydrous",
                SupplementCategory::EnergyFocus,
                &["Caffeine Anhydrous"],
                &["Increased energy", "Enhanced focus", "Fat oxidation"],
                "100-400mg (based on tolerance)",
                "30-45 minutes pre-workout",
                "GRAS",
                ("FDA Compliant - GRAS", "FDA 21 CFR 182.1180", CFR_SEARCH_URL),
                &["all"],
            ),
        );
        catalog.push(
            CatalogSection::PreWorkout,
            record(
                ids::CITRULLINE,
                "L-Citrulline",
                SupplementCategory::PumpBloodFlow,
                &["L-Citrulline"],
                &["Improved blood flow", "Reduced soreness", "Enhanced pump"],
                "6-8g pre-workout",
                "60 minutes pre-workout",
                "Dietary Supplement",
                (
                    "FDA Compliant - Dietary Supplement",
                    "DSHEA compliant, NDI acknowledged",
                    DIETARY_SUPPLEMENTS_URL,
                ),
                &["strength", "hypertrophy", "endurance"],
            ),
        );

        catalog.push(
            CatalogSection::Recovery,
            record(
                ids::GLUTAMINE,
                "L-Glutamine",
                SupplementCategory::Recovery,
                &["L-Glutamine"],
                &["Muscle recovery", "Immune support", "Gut health"],
                "5-10g post-workout",
                "Post-workout or before bed",
                "GRAS",
                (
                    "FDA Compliant - GRAS",
                    "FDA GRAS Notice No. GRN 000030",
                    GRAS_INVENTORY_URL,
                ),
                &["all"],
            ),
        );
        catalog.push(
            CatalogSection::Recovery,
            record(
                ids::BCAA,
                "BCAAs (Branched-Chain Amino Acids)",
                SupplementCategory::Recovery,
                &["L-Leucine", "L-Isoleucine", "L-Valine"],
                &["Muscle protein synthesis", "Reduced soreness", "Energy during workout"],
                "5-10g during or post-workout",
                "During or immediately post-workout",
                "GRAS",
                (
                    "FDA Compliant - GRAS",
                    "FDA GRAS Notices (Multiple: GRN 000458, 000459, 000460)",
                    GRAS_INVENTORY_URL,
                ),
                &["endurance", "strength", "fasted-training"],
            ),
        );

        catalog.push(
            CatalogSection::Vitamins,
            record(
                ids::VITAMIN_D3,
                "Vitamin D3 (Cholecalciferol)",
                SupplementCategory::Vitamin,
                &["Vitamin D3 (Cholecalciferol)"],
                &["Bone health", "Immune function", "Testosterone support"],
                "1000-4000 IU daily",
                "With meals (fat-soluble)",
                "GRAS",
                ("FDA Compliant - GRAS", "FDA 21 CFR 184.1950", CFR_SEARCH_URL),
                &["all"],
            ),
        );
        catalog.push(
            CatalogSection::Vitamins,
            record(
                ids::OMEGA_3,
                "Omega-3 Fatty Acids (Fish Oil)",
                SupplementCategory::EssentialFattyAcid,
                &["EPA (Eicosapentaenoic Acid)", "DHA (Docosahexaenoic Acid)"],
                &["Anti-inflammatory", "Joint health", "Heart health"],
                "1-3g EPA+DHA daily",
                "With meals",
                "GRAS",
                (
                    "FDA Compliant - GRAS",
                    "FDA GRAS Notice No. GRN 000105",
                    GRAS_INVENTORY_URL,
                ),
                &["all"],
            ),
        );
        catalog.push(
            CatalogSection::Vitamins,
            record(
                ids::MAGNESIUM,
                "Magnesium Glycinate",
                SupplementCategory::Mineral,
                &["Magnesium Glycinate"],
                &["Muscle function", "Sleep quality", "Recovery"],
                "200-400mg daily",
                "Before bed",
                "GRAS",
                ("FDA Compliant - GRAS", "FDA 21 CFR 184.1443", CFR_SEARCH_URL),
                &["all"],
            ),
        );

        catalog
    }
}

const GRAS_INVENTORY_URL: &str = "https://www.fda.gov/food/gras-notice-inventory";
const DIETARY_SUPPLEMENTS_URL: &str = "https://www.fda.gov/food/dietary-supplements";
const CFR_SEARCH_URL: &str =
    "https://www.accessdata.fda.gov/scripts/cdrh/cfdocs/cfcfr/cfrsearch.cfm";
const LAST_VERIFIED: &str = "2024-01";

#[allow(clippy::too_many_arguments)]
fn record(
    id: &str,
    name: &str,
    category: SupplementCategory,
    ingredients: &[&str],
    benefits: &[&str],
    dosage: &str,
    timing: &str,
    fda_status: &str,
    (status, source, url): (&str, &str, &str),
    workout_types: &[&str],
) -> SupplementRecord {
    SupplementRecord {
        id: id.to_string(),
        name: name.to_string(),
        category,
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        benefits: benefits.iter().map(|s| s.to_string()).collect(),
        dosage: dosage.to_string(),
        timing: timing.to_string(),
        fda_status: fda_status.to_string(),
        compliance: Compliance {
            status: status.to_string(),
            source: source.to_string(),
            url: url.to_string(),
            last_verified: LAST_VERIFIED.to_string(),
        },
        workout_types: workout_types.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 11);
        catalog.validate().expect("builtin ids are unique");
    }

    #[test]
    fn sections_keep_their_order() {
        let catalog = Catalog::builtin();
        let ids = |s| {
            catalog
                .section(s)
                .iter()
                .map(|r| r.id.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(CatalogSection::Proteins), ["whey-protein", "casein-protein"]);
        assert_eq!(
            ids(CatalogSection::PreWorkout),
            ["creatine-mono", "beta-alanine", "caffeine", "citrulline"]
        );
        assert_eq!(ids(CatalogSection::Recovery), ["glutamine", "bcaa"]);
        assert_eq!(
            ids(CatalogSection::Vitamins),
            ["vitamin-d3", "omega-3", "magnesium"]
        );
    }

    #[test]
    fn lookup_by_id() {
        let catalog = Catalog::builtin();
        let creatine = catalog.require("creatine-mono").unwrap();
        assert_eq!(creatine.dosage, "5g daily");
        assert_eq!(creatine.category, SupplementCategory::Performance);
        assert_eq!(
            catalog.require("ephedra"),
            Err(CoreError::MissingCatalogEntry("ephedra".to_string()))
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut catalog = Catalog::builtin();
        let whey = catalog.require(ids::WHEY_PROTEIN).unwrap().clone();
        catalog.push(CatalogSection::Vitamins, whey);
        assert_eq!(
            catalog.validate(),
            Err(CoreError::DuplicateSupplement("whey-protein".to_string()))
        );
    }

    #[test]
    fn workout_type_query_includes_all_tagged() {
        let catalog = Catalog::builtin();
        let ids: Vec<&str> = catalog
            .supplements_for_workout_type("hiit")
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(
            ids,
            ["beta-alanine", "caffeine", "glutamine", "vitamin-d3", "omega-3", "magnesium"]
        );
    }

    #[test]
    fn category_serializes_as_display_label() {
        let json = serde_json::to_string(&SupplementCategory::PumpBloodFlow).unwrap();
        assert_eq!(json, "\"Pump/Blood Flow\"");
        assert_eq!(SupplementCategory::EnergyFocus.to_string(), "Energy/Focus");
    }
}
