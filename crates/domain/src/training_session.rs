use chrono::{DateTime, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{ReadError, Reps, RoutineID, Weight, WriteError};

pub trait TrainingSessionRepository {
    fn read_training_sessions(&self) -> Result<Vec<TrainingSession>, ReadError>;
    fn write_training_sessions(&self, sessions: &[TrainingSession]) -> Result<(), WriteError>;
}

/// A completed training session.
///
/// Sessions are append-only history. Once recorded they are never modified
/// or removed, and they only contain the exercises that were explicitly
/// marked complete during the session.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSession {
    pub id: TrainingSessionID,
    pub routine_id: RoutineID,
    pub date: DateTime<Utc>,
    pub exercises: Vec<ExerciseSession>,
}

impl TrainingSession {
    /// Total volume across all exercises of the session.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.exercises.iter().map(ExerciseSession::volume).sum()
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TrainingSessionID(Uuid);

impl TrainingSessionID {
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for TrainingSessionID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for TrainingSessionID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// The recorded outcome of one exercise within a session.
///
/// The exercise name is copied, not referenced, so renaming an exercise in a
/// routine does not rewrite past records. Weight and reps are those of the
/// best set; `sets` is the number of sets performed. An empty note means no
/// note was taken.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseSession {
    pub name: String,
    pub weight: Weight,
    pub reps: Reps,
    pub sets: u32,
    pub note: String,
}

impl ExerciseSession {
    /// Training volume of this exercise: weight × reps × sets.
    #[must_use]
    pub fn volume(&self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        {
            f32::from(self.weight) * u32::from(self.reps) as f32 * self.sets as f32
        }
    }
}
