use derive_more::{Display, Into};

/// Repetition count of a set.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, Eq, PartialOrd, Ord)]
pub struct Reps(u32);

impl Reps {
    pub const MAX: u32 = 999;
    /// Target reps of a newly added exercise.
    pub const DEFAULT_TARGET: Reps = Reps(10);

    pub fn new(value: u32) -> Result<Self, RepsError> {
        if value > Self::MAX {
            return Err(RepsError::OutOfRange);
        }

        Ok(Self(value))
    }

    /// Applies a signed step, clamped to the representable range. Negative
    /// rep counts do not exist.
    #[must_use]
    pub fn offset(self, delta: i32) -> Self {
        Self(self.0.saturating_add_signed(delta).min(Self::MAX))
    }
}

impl TryFrom<&str> for Reps {
    type Error = RepsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<u32>() {
            Ok(parsed_value) => Reps::new(parsed_value),
            Err(_) => Err(RepsError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RepsError {
    #[error("Reps must be in the range 0 to {}", Reps::MAX)]
    OutOfRange,
    #[error("Reps must be an integer")]
    ParseError,
}

/// Weight of a set in kilograms.
#[derive(Debug, Default, Display, Clone, Copy, Into, PartialEq, PartialOrd)]
pub struct Weight(f32);

impl Weight {
    pub const MAX: f32 = 999.0;
    pub const ZERO: Weight = Weight(0.0);

    pub fn new(value: f32) -> Result<Self, WeightError> {
        if !(0.0..=Self::MAX).contains(&value) {
            return Err(WeightError::OutOfRange);
        }

        Ok(Self(value))
    }

    /// Applies a signed step, clamped to the representable range. Negative
    /// weights do not exist.
    #[must_use]
    pub fn offset(self, delta: f32) -> Self {
        Self((self.0 + delta).clamp(0.0, Self::MAX))
    }
}

impl TryFrom<&str> for Weight {
    type Error = WeightError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.replace(',', ".").trim().parse::<f32>() {
            Ok(parsed_value) => Weight::new(parsed_value),
            Err(_) => Err(WeightError::ParseError),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum WeightError {
    #[error("Weight must be in the range 0 to {} kg", Weight::MAX)]
    OutOfRange,
    #[error("Weight must be a decimal number")]
    ParseError,
}

/// One performed or planned set.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ExerciseSet {
    pub weight: Weight,
    pub reps: Reps,
}

impl ExerciseSet {
    #[must_use]
    pub fn new(weight: Weight, reps: Reps) -> Self {
        Self { weight, reps }
    }

    /// Estimated one-rep max of this set, if defined.
    #[must_use]
    pub fn one_rep_max(&self) -> Option<f32> {
        crate::statistics::one_rep_max(self.weight, self.reps)
    }
}
