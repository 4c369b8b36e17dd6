use chrono::{DateTime, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{Exercise, Name, ReadError, WriteError};

pub trait RoutineRepository {
    fn read_routines(&self) -> Result<Vec<Routine>, ReadError>;
    fn write_routines(&self, routines: &[Routine]) -> Result<(), WriteError>;
}

/// A reusable template of exercises with targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Routine {
    pub id: RoutineID,
    pub name: Name,
    pub description: String,
    pub exercises: Vec<Exercise>,
    pub last_performed: Option<DateTime<Utc>>,
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoutineID(Uuid);

impl RoutineID {
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

impl From<Uuid> for RoutineID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for RoutineID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Replaces the routine with a matching id, preserving its position in the
/// collection, or appends the routine if the id is unknown.
pub fn upsert(routines: &mut Vec<Routine>, routine: Routine) {
    if let Some(existing) = routines.iter_mut().find(|r| r.id == routine.id) {
        *existing = routine;
    } else {
        routines.push(routine);
    }
}

/// Removes the routine with the given id, reporting whether it was present.
pub fn remove(routines: &mut Vec<Routine>, id: RoutineID) -> bool {
    let len = routines.len();
    routines.retain(|r| r.id != id);
    routines.len() < len
}

/// Sorts routines for display, least recently performed first. Routines
/// which have never been performed come before all others; ties keep the
/// existing order.
pub fn sort_stale_first(routines: &mut [Routine]) {
    routines.sort_by_key(|r| r.last_performed.unwrap_or(DateTime::UNIX_EPOCH));
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn routine(id: u128, name: &str, last_performed: Option<DateTime<Utc>>) -> Routine {
        Routine {
            id: id.into(),
            name: Name::new(name).unwrap(),
            description: String::new(),
            exercises: vec![],
            last_performed,
        }
    }

    #[test]
    fn test_routine_id_nil() {
        assert!(RoutineID::nil().is_nil());
        assert_eq!(RoutineID::nil(), RoutineID::default());
        assert!(!RoutineID::random().is_nil());
    }

    #[test]
    fn test_upsert_appends_unknown_id() {
        let mut routines = vec![routine(1, "A", None)];
        upsert(&mut routines, routine(2, "B", None));
        assert_eq!(
            routines.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1.into(), 2.into()]
        );
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut routines = vec![routine(1, "A", None), routine(2, "B", None)];
        upsert(&mut routines, routine(1, "A2", None));
        assert_eq!(
            routines
                .iter()
                .map(|r| r.name.to_string())
                .collect::<Vec<_>>(),
            vec!["A2", "B"]
        );
    }

    #[rstest]
    #[case(1, true, vec![2])]
    #[case(3, false, vec![1, 2])]
    fn test_remove(#[case] id: u128, #[case] removed: bool, #[case] remaining: Vec<u128>) {
        let mut routines = vec![routine(1, "A", None), routine(2, "B", None)];
        assert_eq!(remove(&mut routines, id.into()), removed);
        assert_eq!(
            routines.iter().map(|r| r.id).collect::<Vec<_>>(),
            remaining
                .into_iter()
                .map(RoutineID::from)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_sort_stale_first() {
        let mut routines = vec![
            routine(1, "A", Some(date(2020, 3, 5))),
            routine(2, "B", None),
            routine(3, "C", Some(date(2020, 3, 1))),
            routine(4, "D", None),
        ];
        sort_stale_first(&mut routines);
        assert_eq!(
            routines.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![2.into(), 4.into(), 3.into(), 1.into()]
        );
    }
}
