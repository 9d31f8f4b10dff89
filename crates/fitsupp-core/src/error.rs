/// Errors raised by the planning core.
///
/// `MissingCatalogEntry` and `DuplicateSupplement` indicate a malformed catalog and
/// should never surface with the built-in data. The rest are caller input errors.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("supplement catalog has no entry with id '{0}'")]
    MissingCatalogEntry(String),

    #[error("supplement id '{0}' appears more than once in the catalog")]
    DuplicateSupplement(String),

    #[error("unknown day: '{0}' (expected Monday through Sunday)")]
    UnknownDay(String),

    #[error("unknown goal: '{0}'")]
    UnknownGoal(String),

    #[error("unknown experience level: '{0}'")]
    UnknownExperience(String),

    #[error("workout not found: {0}")]
    UnknownWorkout(String),

    #[error("exercise not found: {0}")]
    UnknownExercise(String),

    #[error("invalid exercise: {0}")]
    InvalidExercise(String),

    #[error("workout needs a name and at least one exercise")]
    IncompleteWorkout,
}
