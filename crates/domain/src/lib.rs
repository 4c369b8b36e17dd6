#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod body_weight;
mod error;
mod exercise;
mod name;
mod ongoing_training_session;
pub mod routine;
pub mod statistics;
mod suggestion;
mod training;
mod training_session;

pub use body_weight::{BodyWeight, BodyWeightRepository};
pub use error::{ReadError, StorageError, WriteError};
pub use exercise::{Exercise, ExerciseID};
pub use name::{Name, NameError};
pub use ongoing_training_session::{OngoingTrainingSession, Phase, Summary};
pub use routine::{Routine, RoutineID, RoutineRepository};
pub use statistics::{ExerciseHistory, Overview, Trend, WeeklySummary};
pub use suggestion::{
    RoutineSuggestion, SuggestedExercise, SuggestionError, SuggestionRepository,
};
pub use training::{ExerciseSet, Reps, RepsError, Weight, WeightError};
pub use training_session::{
    ExerciseSession, TrainingSession, TrainingSessionID, TrainingSessionRepository,
};
