use fitsupp_advisor::error::AdvisorError;
use fitsupp_core::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Advisor(#[from] AdvisorError),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("exercise not in the library: {0}")]
    UnlistedExercise(String),
}
