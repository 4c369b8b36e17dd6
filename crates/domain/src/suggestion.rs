use crate::{Exercise, ExerciseID, Reps, Weight};

/// Source of generated candidate routines.
///
/// The request is expected to be guarded by a timeout; expiry is reported as
/// [`SuggestionError::Timeout`]. No retry happens on failure.
#[allow(async_fn_in_trait)]
pub trait SuggestionRepository {
    async fn generate_routine(&self, goal: &str) -> Result<RoutineSuggestion, SuggestionError>;
}

/// A generated candidate routine.
///
/// Every field is optional. The service may omit any of them and only the
/// fields present are applied to the routine being edited.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoutineSuggestion {
    pub name: Option<String>,
    pub description: Option<String>,
    pub exercises: Vec<SuggestedExercise>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct SuggestedExercise {
    pub name: String,
    pub target_reps: Option<Reps>,
    pub target_weight: Option<Weight>,
    pub target_sets: Option<u32>,
}

impl SuggestedExercise {
    /// Turns the suggestion into an exercise row, filling missing fields
    /// with the editor defaults.
    #[must_use]
    pub fn into_exercise(self) -> Exercise {
        Exercise {
            id: ExerciseID::random(),
            name: self.name,
            target_reps: self.target_reps.unwrap_or(Reps::DEFAULT_TARGET),
            target_weight: self.target_weight.unwrap_or(Weight::ZERO),
            target_sets: self.target_sets.unwrap_or(Exercise::DEFAULT_SETS),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SuggestionError {
    #[error("no connection")]
    NoConnection,
    #[error("request timed out")]
    Timeout,
    #[error("unexpected response status: {0}")]
    Http(u16),
    #[error("invalid response")]
    InvalidResponse,
}
