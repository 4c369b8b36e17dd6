//! Serialized representations of the domain model.
//!
//! Local storage holds plain JSON. Dedicated serde structs isolate the
//! stored format from the domain types; converting back into the domain
//! revalidates every value, so tampered or truncated payloads surface as
//! [`domain::StorageError::Corrupted`].

use chrono::{DateTime, NaiveDate, Utc};
use liftlog_domain as domain;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Routine {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub last_performed: Option<DateTime<Utc>>,
}

impl From<&domain::Routine> for Routine {
    fn from(routine: &domain::Routine) -> Self {
        Self {
            id: *routine.id,
            name: routine.name.to_string(),
            description: routine.description.clone(),
            exercises: routine.exercises.iter().map(Exercise::from).collect(),
            last_performed: routine.last_performed,
        }
    }
}

impl TryFrom<Routine> for domain::Routine {
    type Error = domain::StorageError;

    fn try_from(routine: Routine) -> Result<Self, Self::Error> {
        Ok(Self {
            id: routine.id.into(),
            name: domain::Name::new(&routine.name).map_err(corrupted)?,
            description: routine.description,
            exercises: routine
                .exercises
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<_>, _>>()?,
            last_performed: routine.last_performed,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub target_reps: u32,
    pub target_weight: f32,
    pub target_sets: u32,
}

impl From<&domain::Exercise> for Exercise {
    fn from(exercise: &domain::Exercise) -> Self {
        Self {
            id: *exercise.id,
            name: exercise.name.clone(),
            target_reps: exercise.target_reps.into(),
            target_weight: exercise.target_weight.into(),
            target_sets: exercise.target_sets,
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = domain::StorageError;

    fn try_from(exercise: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: exercise.id.into(),
            name: exercise.name,
            target_reps: domain::Reps::new(exercise.target_reps).map_err(corrupted)?,
            target_weight: domain::Weight::new(exercise.target_weight).map_err(corrupted)?,
            target_sets: exercise.target_sets,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrainingSession {
    pub id: Uuid,
    pub routine_id: Uuid,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub exercises: Vec<ExerciseSession>,
}

impl From<&domain::TrainingSession> for TrainingSession {
    fn from(session: &domain::TrainingSession) -> Self {
        Self {
            id: *session.id,
            routine_id: *session.routine_id,
            date: session.date,
            exercises: session.exercises.iter().map(ExerciseSession::from).collect(),
        }
    }
}

impl TryFrom<TrainingSession> for domain::TrainingSession {
    type Error = domain::StorageError;

    fn try_from(session: TrainingSession) -> Result<Self, Self::Error> {
        Ok(Self {
            id: session.id.into(),
            routine_id: session.routine_id.into(),
            date: session.date,
            exercises: session
                .exercises
                .into_iter()
                .map(TryInto::try_into)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExerciseSession {
    pub name: String,
    pub weight: f32,
    pub reps: u32,
    pub sets: u32,
    #[serde(default)]
    pub note: String,
}

impl From<&domain::ExerciseSession> for ExerciseSession {
    fn from(exercise: &domain::ExerciseSession) -> Self {
        Self {
            name: exercise.name.clone(),
            weight: exercise.weight.into(),
            reps: exercise.reps.into(),
            sets: exercise.sets,
            note: exercise.note.clone(),
        }
    }
}

impl TryFrom<ExerciseSession> for domain::ExerciseSession {
    type Error = domain::StorageError;

    fn try_from(exercise: ExerciseSession) -> Result<Self, Self::Error> {
        Ok(Self {
            name: exercise.name,
            weight: domain::Weight::new(exercise.weight).map_err(corrupted)?,
            reps: domain::Reps::new(exercise.reps).map_err(corrupted)?,
            sets: exercise.sets,
            note: exercise.note,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BodyWeight {
    pub date: NaiveDate,
    pub weight: f32,
}

impl From<&domain::BodyWeight> for BodyWeight {
    fn from(body_weight: &domain::BodyWeight) -> Self {
        Self {
            date: body_weight.date,
            weight: body_weight.weight,
        }
    }
}

impl From<BodyWeight> for domain::BodyWeight {
    fn from(body_weight: BodyWeight) -> Self {
        Self {
            date: body_weight.date,
            weight: body_weight.weight,
        }
    }
}

fn corrupted(err: impl std::error::Error) -> domain::StorageError {
    domain::StorageError::Corrupted(err.to_string())
}
