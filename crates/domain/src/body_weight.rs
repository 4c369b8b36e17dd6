use chrono::NaiveDate;

use crate::{ReadError, WriteError};

pub trait BodyWeightRepository {
    fn read_body_weight(&self) -> Result<Vec<BodyWeight>, ReadError>;
    fn write_body_weight(&self, entries: &[BodyWeight]) -> Result<(), WriteError>;
}

/// One body-weight measurement.
///
/// The collection holds at most one entry per calendar date and is kept
/// sorted ascending by date.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyWeight {
    pub date: NaiveDate,
    pub weight: f32,
}

/// Inserts a measurement, replacing any existing entry for the same date.
pub fn upsert(entries: &mut Vec<BodyWeight>, entry: BodyWeight) {
    entries.retain(|e| e.date != entry.date);
    entries.push(entry);
    entries.sort_by_key(|e| e.date);
}

/// The most recent measurement.
#[must_use]
pub fn latest(entries: &[BodyWeight]) -> Option<&BodyWeight> {
    entries.iter().max_by_key(|e| e.date)
}
