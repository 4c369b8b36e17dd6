use derive_more::Deref;
use uuid::Uuid;

use crate::{Reps, Weight};

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
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

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// An exercise within a routine, with the targets configured for it.
///
/// The name is plain text and may still be empty while the routine is being
/// edited. Across session history, exercises are matched by name
/// (case-insensitively), not by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: String,
    pub target_reps: Reps,
    pub target_weight: Weight,
    pub target_sets: u32,
}

impl Exercise {
    /// Target sets of a newly added exercise.
    pub const DEFAULT_SETS: u32 = 3;

    /// A new exercise row with the default targets.
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            id: ExerciseID::random(),
            name,
            target_reps: Reps::DEFAULT_TARGET,
            target_weight: Weight::ZERO,
            target_sets: Self::DEFAULT_SETS,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_exercise_id_nil() {
        assert!(ExerciseID::nil().is_nil());
        assert_eq!(ExerciseID::nil(), ExerciseID::default());
    }

    #[test]
    fn test_exercise_id_random() {
        assert!(!ExerciseID::random().is_nil());
        assert_ne!(ExerciseID::random(), ExerciseID::random());
    }

    #[test]
    fn test_exercise_new_defaults() {
        let exercise = Exercise::new("Bench Press".into());
        assert_eq!(exercise.name, "Bench Press");
        assert_eq!(exercise.target_reps, Reps::DEFAULT_TARGET);
        assert_eq!(exercise.target_weight, Weight::ZERO);
        assert_eq!(exercise.target_sets, Exercise::DEFAULT_SETS);
    }
}
