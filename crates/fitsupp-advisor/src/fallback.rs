/// Offline answers used when the chat API is unavailable. Pure; never touches the network.
use fitsupp_core::profile::ExperienceLevel;

const BEGINNER_ANSWER: &str = "For beginners, I recommend:
\u{2022} Whey Protein: 25-30g post-workout (FDA GRAS approved)
\u{2022} Magnesium: 200-400mg before bed (FDA compliant)
Start with these basics before adding more supplements.";

const COMPLIANCE_ANSWER: &str = "All recommended supplements are FDA-compliant:
\u{2022} GRAS Status: Whey, Casein, Caffeine, Vitamins
\u{2022} DSHEA Compliant: Creatine, Beta-Alanine, L-Citrulline
Each has specific FDA citations available in the details view.";

const CREATINE_ANSWER: &str = "Creatine Monohydrate:
\u{2022} Most studied supplement (1000+ studies)
\u{2022} 5g daily dosage
\u{2022} FDA Status: DSHEA compliant dietary supplement
\u{2022} Proven for strength and muscle gains";

/// Pick a canned answer by keyword. Rules are checked in order; the first hit wins.
pub fn fallback_answer(question: &str, experience: ExperienceLevel) -> String {
    let q = question.to_lowercase();
    if q.contains("beginner") {
        BEGINNER_ANSWER.to_string()
    } else if q.contains("fda") || q.contains("compliance") {
        COMPLIANCE_ANSWER.to_string()
    } else if q.contains("creatine") {
        CREATINE_ANSWER.to_string()
    } else {
        format!(
            "Based on your {experience} experience level and goals, check the recommendations \
above. Each supplement includes FDA compliance information and dosage guidelines."
        )
    }
}
