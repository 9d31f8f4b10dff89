use fitsupp_core::catalog::SupplementRecord;
use fitsupp_core::profile::{ExperienceLevel, Goal};
use fitsupp_core::workout::Workout;

/// Suggested questions offered alongside the chat box.
pub const QUICK_QUESTIONS: [&str; 6] = [
    "What supplements should I take as a beginner?",
    "Explain the FDA compliance of my recommendations",
    "When should I take each supplement?",
    "Are there any interactions I should know about?",
    "What's the science behind creatine?",
    "How do I maximize recovery?",
];

/// What the advisor knows about the user when a question is submitted.
#[derive(Debug, Clone, Default)]
pub struct AdvisorContext {
    pub experience: ExperienceLevel,
    pub goals: Vec<Goal>,
    pub current_workout: Option<Workout>,
    pub recommendations: Vec<SupplementRecord>,
}

const GUIDELINES: &str = "IMPORTANT GUIDELINES:
1. Only recommend supplements that are FDA-compliant (GRAS status or DSHEA compliant)
2. Always cite FDA regulatory status when discussing supplements
3. Provide evidence-based information with scientific backing
4. Include safety warnings and remind users to consult healthcare providers
5. Focus on these FDA-compliant supplements from our database:
   - Proteins: Whey Protein Isolate (GRAS GRN 000037), Casein (GRAS GRN 000397)
   - Performance: Creatine Monohydrate (DSHEA compliant), Beta-Alanine (NDI 576), Caffeine (FDA 21 CFR 182.1180)
   - Recovery: L-Glutamine (GRAS GRN 000030), BCAAs (GRAS GRN 000458-460)
   - Vitamins/Minerals: Vitamin D3 (FDA 21 CFR 184.1950), Omega-3 (GRAS GRN 000105), Magnesium (FDA 21 CFR 184.1443)
6. Explain timing, dosage, and potential interactions when relevant
7. Be helpful, specific, and practical in recommendations
8. If asked about non-compliant or potentially harmful substances, explain why they're not recommended

Provide concise, actionable advice while maintaining scientific accuracy and regulatory compliance.";

pub fn build_system_prompt(ctx: &AdvisorContext) -> String {
    let goal_text = if ctx.goals.is_empty() {
        "general fitness".to_string()
    } else {
        ctx.goals
            .iter()
            .map(Goal::tag)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let workout_info = match &ctx.current_workout {
        Some(w) => format!(
            "\nCurrent workout: {} with {} exercises focusing on {}",
            w.name,
            w.exercises.len(),
            w.exercises
                .iter()
                .map(|e| e.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        None => String::new(),
    };

    let recommended = if ctx.recommendations.is_empty() {
        "No recommendations yet".to_string()
    } else {
        ctx.recommendations
            .iter()
            .map(|s| {
                format!(
                    "- {}: {}, FDA Status: {}, Source: {}",
                    s.name, s.category, s.compliance.status, s.compliance.source
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are an expert AI supplement advisor specializing in FDA-compliant, evidence-based \
supplement recommendations for fitness and health.

USER PROFILE:
- Experience Level: {experience}
- Fitness Goals: {goal_text}{workout_info}

CURRENT RECOMMENDATIONS:
{recommended}

{GUIDELINES}",
        experience = ctx.experience,
    )
}
