use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use fitsupp_advisor::advisor::{Advisor, AdvisorReply};
use fitsupp_advisor::chat_log::ChatEntry;
use fitsupp_advisor::prompt::QUICK_QUESTIONS;
use fitsupp_core::catalog::{Catalog, CatalogSection, SupplementRecord};
use fitsupp_core::exercises::MuscleGroup;
use fitsupp_core::profile::{ExperienceLevel, Goal, UserProfile};
use fitsupp_core::recommend::{Recommendation, Recommender};
use fitsupp_core::stack::StackItem;
use fitsupp_core::workout::{analyze, Workout, WorkoutAnalysis};

use crate::error::AppError;
use crate::session::{ExerciseInput, ScheduleView, Session};

#[derive(Clone)]
pub struct FitSuppServer {
    catalog: Arc<Catalog>,
    recommender: Arc<Recommender>,
    advisor: Arc<Advisor>,
    session: Arc<RwLock<Session>>,
    tool_router: ToolRouter<FitSuppServer>,
}

impl FitSuppServer {
    pub fn new(catalog: Arc<Catalog>, recommender: Arc<Recommender>, advisor: Arc<Advisor>) -> Self {
        Self {
            catalog,
            recommender,
            advisor,
            session: Arc::new(RwLock::new(Session::default())),
            tool_router: Self::tool_router(),
        }
    }
}

fn tool_error(e: impl Into<AppError>) -> String {
    e.into().to_string()
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListSupplementsParams {
    /// One of proteins, preWorkout, recovery, vitamins.
    section: Option<CatalogSection>,
    /// Training style tag such as "strength" or "hiit".
    workout_type: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct GetSupplementParams {
    supplement_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct CreateWorkoutParams {
    name: String,
    exercises: Vec<ExerciseInput>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateWorkoutParams {
    workout_id: String,
    name: Option<String>,
    /// Replaces the whole exercise list when present.
    exercises: Option<Vec<ExerciseInput>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct WorkoutIdParams {
    workout_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SelectWorkoutParams {
    /// Omit to clear the selection.
    workout_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AnalyzeWorkoutParams {
    /// Defaults to the current workout.
    workout_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SetExperienceParams {
    /// beginner, intermediate or advanced
    experience_level: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ToggleGoalParams {
    goal: Goal,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ToggleSupplementParams {
    supplement_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AssignDayParams {
    day: String,
    workout_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct DayParams {
    day: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct AskCopilotParams {
    question: String,
}

#[derive(Debug, Serialize, JsonSchema)]
struct SupplementListResponse {
    supplements: Vec<SupplementRecord>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct SupplementResponse {
    supplement: SupplementRecord,
}

#[derive(Debug, Serialize, JsonSchema)]
struct ExerciseGroup {
    group: MuscleGroup,
    emoji: String,
    exercises: Vec<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct ExerciseLibraryResponse {
    groups: Vec<ExerciseGroup>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct WorkoutResponse {
    workout: Workout,
}

#[derive(Debug, Serialize, JsonSchema)]
struct WorkoutListResponse {
    workouts: Vec<Workout>,
    current_workout_id: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct DeleteWorkoutResponse {
    deleted: Workout,
    /// Schedule days that referenced the workout and are now rest days.
    cleared_days: usize,
}

#[derive(Debug, Serialize, JsonSchema)]
struct SelectWorkoutResponse {
    current_workout: Option<Workout>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct AnalysisResponse {
    workout_id: Option<String>,
    analysis: WorkoutAnalysis,
}

#[derive(Debug, Serialize, JsonSchema)]
struct ProfileResponse {
    profile: UserProfile,
}

#[derive(Debug, Serialize, JsonSchema)]
struct ToggleGoalResponse {
    goal: Goal,
    selected: bool,
    profile: UserProfile,
}

#[derive(Debug, Serialize, JsonSchema)]
struct RecommendationsResponse {
    analysis: WorkoutAnalysis,
    recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct ToggleSupplementResponse {
    supplement_id: String,
    selected: bool,
    stack: Vec<StackItem>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct SupplementStackResponse {
    stack: Vec<StackItem>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct AskCopilotResponse {
    reply: AdvisorReply,
    online: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
struct ChatHistoryResponse {
    entries: Vec<ChatEntry>,
}

#[derive(Debug, Serialize, JsonSchema)]
struct QuickQuestionsResponse {
    questions: Vec<String>,
}

#[tool_router]
impl FitSuppServer {
    #[tool(description = "List FDA-compliant supplements in catalog order, optionally filtered by catalog section and/or training style.")]
    async fn list_supplements(
        &self,
        Parameters(params): Parameters<ListSupplementsParams>,
    ) -> Result<Json<SupplementListResponse>, String> {
        let tag = params
            .workout_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let supplements = self
            .catalog
            .iter_sections()
            .filter(|(section, _)| params.section.map_or(true, |s| s == *section))
            .filter(|(_, record)| tag.map_or(true, |t| record.suits_workout_type(t)))
            .map(|(_, record)| record.clone())
            .collect();
        Ok(Json(SupplementListResponse { supplements }))
    }

    #[tool(description = "Get one supplement with its dosage, timing and FDA compliance citation.")]
    async fn get_supplement(
        &self,
        Parameters(params): Parameters<GetSupplementParams>,
    ) -> Result<Json<SupplementResponse>, String> {
        let supplement = self
            .catalog
            .require(params.supplement_id.trim())
            .map_err(tool_error)?
            .clone();
        Ok(Json(SupplementResponse { supplement }))
    }

    #[tool(description = "List the exercise library grouped by muscle group. Workouts may only use these exercise names.")]
    async fn list_exercise_library(&self) -> Result<Json<ExerciseLibraryResponse>, String> {
        let groups = MuscleGroup::ALL
            .into_iter()
            .map(|group| ExerciseGroup {
                group,
                emoji: group.emoji().to_string(),
                exercises: group.exercises().iter().map(|e| e.to_string()).collect(),
            })
            .collect();
        Ok(Json(ExerciseLibraryResponse { groups }))
    }

    #[tool(description = "Create and save a workout. Omitted sets/reps/rest default to 3/10/60s and weight to 0. The new workout becomes the current workout.")]
    async fn create_workout(
        &self,
        Parameters(params): Parameters<CreateWorkoutParams>,
    ) -> Result<Json<WorkoutResponse>, String> {
        let mut session = self.session.write().await;
        let workout = session
            .create_workout(&params.name, &params.exercises)
            .map_err(tool_error)?;
        Ok(Json(WorkoutResponse { workout }))
    }

    #[tool(description = "Edit a saved workout in place: rename it and/or replace its exercise list. It keeps its id and becomes the current workout.")]
    async fn update_workout(
        &self,
        Parameters(params): Parameters<UpdateWorkoutParams>,
    ) -> Result<Json<WorkoutResponse>, String> {
        let mut session = self.session.write().await;
        let workout = session
            .update_workout(
                &params.workout_id,
                params.name.as_deref(),
                params.exercises.as_deref(),
            )
            .map_err(tool_error)?;
        Ok(Json(WorkoutResponse { workout }))
    }

    #[tool(description = "Delete a saved workout. Schedule days that used it become rest days.")]
    async fn delete_workout(
        &self,
        Parameters(params): Parameters<WorkoutIdParams>,
    ) -> Result<Json<DeleteWorkoutResponse>, String> {
        let mut session = self.session.write().await;
        let (deleted, cleared_days) = session
            .delete_workout(&params.workout_id)
            .map_err(tool_error)?;
        Ok(Json(DeleteWorkoutResponse {
            deleted,
            cleared_days,
        }))
    }

    #[tool(description = "List saved workouts in creation order together with the current workout id.")]
    async fn list_workouts(&self) -> Result<Json<WorkoutListResponse>, String> {
        let session = self.session.read().await;
        Ok(Json(WorkoutListResponse {
            workouts: session.library.list().to_vec(),
            current_workout_id: session.library.current().map(|w| w.id.clone()),
        }))
    }

    #[tool(description = "Make a saved workout the current one (drives analysis and recommendations). Omit workout_id to clear.")]
    async fn select_workout(
        &self,
        Parameters(params): Parameters<SelectWorkoutParams>,
    ) -> Result<Json<SelectWorkoutResponse>, String> {
        let mut session = self.session.write().await;
        session
            .library
            .set_current(params.workout_id.as_deref())
            .map_err(tool_error)?;
        Ok(Json(SelectWorkoutResponse {
            current_workout: session.library.current().cloned(),
        }))
    }

    #[tool(description = "Classify a workout by average reps (strength/hypertrophy/endurance) and total sets (low/moderate/high). Defaults to the current workout.")]
    async fn analyze_workout(
        &self,
        Parameters(params): Parameters<AnalyzeWorkoutParams>,
    ) -> Result<Json<AnalysisResponse>, String> {
        let session = self.session.read().await;
        let workout = match params.workout_id.as_deref() {
            Some(id) => Some(
                session
                    .library
                    .get(id)
                    .ok_or_else(|| format!("unknown workout: {id}"))?,
            ),
            None => session.library.current(),
        };
        Ok(Json(AnalysisResponse {
            workout_id: workout.map(|w| w.id.clone()),
            analysis: analyze(workout),
        }))
    }

    #[tool(description = "Get the user profile: experience level and selected goals.")]
    async fn get_profile(&self) -> Result<Json<ProfileResponse>, String> {
        let session = self.session.read().await;
        Ok(Json(ProfileResponse {
            profile: session.profile.clone(),
        }))
    }

    #[tool(description = "Set the experience level: beginner, intermediate or advanced.")]
    async fn set_experience(
        &self,
        Parameters(params): Parameters<SetExperienceParams>,
    ) -> Result<Json<ProfileResponse>, String> {
        let level: ExperienceLevel = params.experience_level.parse().map_err(tool_error)?;
        let mut session = self.session.write().await;
        session.profile.experience_level = level;
        info!(experience = %level, "experience level set");
        Ok(Json(ProfileResponse {
            profile: session.profile.clone(),
        }))
    }

    #[tool(description = "Select a fitness goal if it is not selected, deselect it otherwise.")]
    async fn toggle_goal(
        &self,
        Parameters(params): Parameters<ToggleGoalParams>,
    ) -> Result<Json<ToggleGoalResponse>, String> {
        let goal = params.goal;
        let mut session = self.session.write().await;
        let selected = session.profile.toggle_goal(goal);
        Ok(Json(ToggleGoalResponse {
            goal,
            selected,
            profile: session.profile.clone(),
        }))
    }

    #[tool(description = "Recommend supplements for the current profile and workout, each with a short reason and its FDA compliance citation.")]
    async fn recommend_supplements(&self) -> Result<Json<RecommendationsResponse>, String> {
        let session = self.session.read().await;
        Ok(Json(RecommendationsResponse {
            analysis: session.analysis(),
            recommendations: session.recommendations(&self.recommender),
        }))
    }

    #[tool(description = "Add a catalog supplement to the user's stack, or remove it if already selected.")]
    async fn toggle_supplement_selection(
        &self,
        Parameters(params): Parameters<ToggleSupplementParams>,
    ) -> Result<Json<ToggleSupplementResponse>, String> {
        let mut session = self.session.write().await;
        let selected = session
            .toggle_supplement(&self.catalog, &params.supplement_id)
            .map_err(tool_error)?;
        Ok(Json(ToggleSupplementResponse {
            supplement_id: params.supplement_id.trim().to_string(),
            selected,
            stack: session.stack.items(),
        }))
    }

    #[tool(description = "Get the user's supplement stack in selection order, with the dosage of each item.")]
    async fn get_supplement_stack(&self) -> Result<Json<SupplementStackResponse>, String> {
        let session = self.session.read().await;
        Ok(Json(SupplementStackResponse {
            stack: session.stack.items(),
        }))
    }

    #[tool(description = "Plan a saved workout on a weekday (Monday..Sunday), replacing whatever was planned.")]
    async fn assign_day(
        &self,
        Parameters(params): Parameters<AssignDayParams>,
    ) -> Result<Json<ScheduleView>, String> {
        let mut session = self.session.write().await;
        session
            .assign_day(&params.day, &params.workout_id)
            .map_err(tool_error)?;
        Ok(Json(session.schedule_view()))
    }

    #[tool(description = "Make a weekday a rest day.")]
    async fn clear_day(
        &self,
        Parameters(params): Parameters<DayParams>,
    ) -> Result<Json<ScheduleView>, String> {
        let mut session = self.session.write().await;
        session.clear_day(&params.day).map_err(tool_error)?;
        Ok(Json(session.schedule_view()))
    }

    #[tool(description = "Get the weekly plan (Monday first) with active days, rest days and distinct workouts used.")]
    async fn get_schedule(&self) -> Result<Json<ScheduleView>, String> {
        let session = self.session.read().await;
        Ok(Json(session.schedule_view()))
    }

    #[tool(description = "Ask the supplement copilot a question. Answers cite FDA status; when the chat API is unavailable an offline answer is returned with a notice.")]
    async fn ask_copilot(
        &self,
        Parameters(params): Parameters<AskCopilotParams>,
    ) -> Result<Json<AskCopilotResponse>, String> {
        let ctx = {
            let session = self.session.read().await;
            session.advisor_context(&self.recommender)
        };
        let reply = self
            .advisor
            .ask(&params.question, &ctx)
            .await
            .map_err(tool_error)?;
        Ok(Json(AskCopilotResponse {
            reply,
            online: self.advisor.is_online(),
        }))
    }

    #[tool(description = "Get the copilot conversation so far, starting with its greeting.")]
    async fn get_chat_history(&self) -> Result<Json<ChatHistoryResponse>, String> {
        Ok(Json(ChatHistoryResponse {
            entries: self.advisor.history().await,
        }))
    }

    #[tool(description = "List suggested questions for the copilot.")]
    async fn list_quick_questions(&self) -> Result<Json<QuickQuestionsResponse>, String> {
        Ok(Json(QuickQuestionsResponse {
            questions: QUICK_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        }))
    }
}

#[tool_handler]
impl ServerHandler for FitSuppServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "fitsupp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Workout and FDA-compliant supplement planner. Build workouts from \
list_exercise_library with create_workout, set experience and goals with set_experience and \
toggle_goal, then call recommend_supplements and collect picks with \
toggle_supplement_selection. Plan the week with assign_day/clear_day/get_schedule \
and ask follow-up questions with ask_copilot."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use fitsupp_advisor::config::AdvisorConfig;

    use super::*;

    fn server() -> FitSuppServer {
        let catalog = Catalog::builtin();
        let recommender = Recommender::new(&catalog).unwrap();
        let advisor = Advisor::new(AdvisorConfig::offline()).unwrap();
        FitSuppServer::new(Arc::new(catalog), Arc::new(recommender), Arc::new(advisor))
    }

    #[test]
    fn tools_publish_output_schemas() {
        let tools = FitSuppServer::tool_router().list_all();
        for name in [
            "list_supplements",
            "get_supplement",
            "list_exercise_library",
            "create_workout",
            "update_workout",
            "delete_workout",
            "list_workouts",
            "select_workout",
            "analyze_workout",
            "get_profile",
            "set_experience",
            "toggle_goal",
            "recommend_supplements",
            "toggle_supplement_selection",
            "get_supplement_stack",
            "assign_day",
            "clear_day",
            "get_schedule",
            "ask_copilot",
            "get_chat_history",
            "list_quick_questions",
        ] {
            let tool = tools
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing tool: {name}"));
            assert!(
                tool.output_schema.is_some(),
                "tool {name} should publish output_schema"
            );
        }
    }

    #[tokio::test]
    async fn supplements_filter_by_section_and_style() {
        let server = server();
        let Json(all) = server
            .list_supplements(Parameters(ListSupplementsParams {
                section: None,
                workout_type: None,
            }))
            .await
            .unwrap();
        assert_eq!(all.supplements.len(), 11);

        let Json(proteins) = server
            .list_supplements(Parameters(ListSupplementsParams {
                section: Some(CatalogSection::Proteins),
                workout_type: None,
            }))
            .await
            .unwrap();
        assert_eq!(proteins.supplements.len(), 2);

        let err = server
            .get_supplement(Parameters(GetSupplementParams {
                supplement_id: "unobtainium".to_string(),
            }))
            .await
            .err().unwrap();
        assert!(err.contains("unobtainium"));
    }

    #[tokio::test]
    async fn profile_changes_drive_recommendations() {
        let server = server();
        server
            .set_experience(Parameters(SetExperienceParams {
                experience_level: "advanced".to_string(),
            }))
            .await
            .unwrap();
        let Json(toggled) = server
            .toggle_goal(Parameters(ToggleGoalParams {
                goal: Goal::Endurance,
            }))
            .await
            .unwrap();
        assert!(toggled.selected);

        let Json(recs) = server.recommend_supplements().await.unwrap();
        let names: Vec<&str> = recs
            .recommendations
            .iter()
            .map(|r| r.supplement.name.as_str())
            .collect();
        assert_eq!(names.len(), 5);
        assert!(recs.recommendations.iter().all(|r| !r.reason.is_empty()));

        assert!(server
            .set_experience(Parameters(SetExperienceParams {
                experience_level: "elite".to_string(),
            }))
            .await
            .is_err());
        let Json(profile) = server.get_profile().await.unwrap();
        assert_eq!(profile.profile.experience_level, ExperienceLevel::Advanced);
    }

    #[tokio::test]
    async fn offline_copilot_answers_and_logs() {
        let server = server();
        let Json(answer) = server
            .ask_copilot(Parameters(AskCopilotParams {
                question: "What's the science behind creatine?".to_string(),
            }))
            .await
            .unwrap();
        assert!(!answer.online);
        assert!(answer.reply.text.contains("5g daily"));
        assert!(answer.reply.notice.is_some());

        let Json(history) = server.get_chat_history().await.unwrap();
        assert_eq!(history.entries.len(), 3);

        assert!(server
            .ask_copilot(Parameters(AskCopilotParams {
                question: "   ".to_string(),
            }))
            .await
            .is_err());
    }

    #[test]
    fn toggle_goal_schema_lists_real_tags() {
        let tools = FitSuppServer::tool_router().list_all();
        let tool = tools
            .iter()
            .find(|t| t.name == "toggle_goal")
            .expect("toggle_goal is registered");
        let schema = serde_json::to_string(&*tool.input_schema).unwrap();
        for goal in Goal::ALL {
            assert!(schema.contains(goal.tag()), "schema should list {goal}");
        }
        assert!(!schema.contains("fat-loss"));

        let params: ToggleGoalParams =
            serde_json::from_value(serde_json::json!({ "goal": "weight-loss" })).unwrap();
        assert_eq!(params.goal, Goal::WeightLoss);
    }

    #[tokio::test]
    async fn supplement_stack_tools() {
        let server = server();
        for id in ["creatine-mono", "omega-3", "creatine-mono", "magnesium"] {
            server
                .toggle_supplement_selection(Parameters(ToggleSupplementParams {
                    supplement_id: id.to_string(),
                }))
                .await
                .unwrap();
        }
        let Json(stack) = server.get_supplement_stack().await.unwrap();
        let names: Vec<&str> = stack.stack.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(stack.stack.iter().all(|i| !i.dosage.is_empty()));
        assert_eq!(stack.stack[0].id, "omega-3");

        assert!(server
            .toggle_supplement_selection(Parameters(ToggleSupplementParams {
                supplement_id: "unobtainium".to_string(),
            }))
            .await
            .is_err());
    }
}
