//! Browser local-storage persistence.
//!
//! Each collection is stored as one JSON value under its own key. Reads
//! recover from bad data per key: a missing key yields the empty collection,
//! an undecodable payload is logged and discarded. Startup must never fail
//! because of what is in local storage.

use std::collections::VecDeque;

use ::log::warn;
use gloo_storage::Storage as _;
use liftlog_domain as domain;
use liftlog_web_app::{Settings, log};

use crate::model;

pub struct LocalStorage;

const KEY_ROUTINES: &str = "liftlog_workouts";
const KEY_TRAINING_SESSIONS: &str = "liftlog_history";
const KEY_BODY_WEIGHT: &str = "liftlog_weight";
const KEY_SETTINGS: &str = "liftlog_settings";
const KEY_LOG: &str = "liftlog_log";

impl domain::RoutineRepository for LocalStorage {
    fn read_routines(&self) -> Result<Vec<domain::Routine>, domain::ReadError> {
        let stored: Vec<model::Routine> = load(KEY_ROUTINES)?;
        Ok(decode(KEY_ROUTINES, stored))
    }

    fn write_routines(&self, routines: &[domain::Routine]) -> Result<(), domain::WriteError> {
        store(
            KEY_ROUTINES,
            routines.iter().map(model::Routine::from).collect::<Vec<_>>(),
        )
    }
}

impl domain::TrainingSessionRepository for LocalStorage {
    fn read_training_sessions(&self) -> Result<Vec<domain::TrainingSession>, domain::ReadError> {
        let stored: Vec<model::TrainingSession> = load(KEY_TRAINING_SESSIONS)?;
        Ok(decode(KEY_TRAINING_SESSIONS, stored))
    }

    fn write_training_sessions(
        &self,
        sessions: &[domain::TrainingSession],
    ) -> Result<(), domain::WriteError> {
        store(
            KEY_TRAINING_SESSIONS,
            sessions
                .iter()
                .map(model::TrainingSession::from)
                .collect::<Vec<_>>(),
        )
    }
}

impl domain::BodyWeightRepository for LocalStorage {
    fn read_body_weight(&self) -> Result<Vec<domain::BodyWeight>, domain::ReadError> {
        let stored: Vec<model::BodyWeight> = load(KEY_BODY_WEIGHT)?;
        Ok(stored.into_iter().map(Into::into).collect())
    }

    fn write_body_weight(&self, entries: &[domain::BodyWeight]) -> Result<(), domain::WriteError> {
        store(
            KEY_BODY_WEIGHT,
            entries.iter().map(model::BodyWeight::from).collect::<Vec<_>>(),
        )
    }
}

impl liftlog_web_app::SettingsRepository for LocalStorage {
    fn read_settings(&self) -> Result<Settings, String> {
        load::<Settings>(KEY_SETTINGS).map_err(|err| err.to_string())
    }

    fn write_settings(&self, settings: &Settings) -> Result<(), String> {
        gloo_storage::LocalStorage::set(KEY_SETTINGS, settings).map_err(|err| err.to_string())
    }
}

impl log::Repository for LocalStorage {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        load(KEY_LOG).map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(log::CAPACITY);
        gloo_storage::LocalStorage::set(KEY_LOG, entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}

/// Reads one key, recovering to the default value where possible.
fn load<T>(key: &str) -> Result<T, domain::StorageError>
where
    T: Default + for<'de> serde::Deserialize<'de>,
{
    recover(key, gloo_storage::LocalStorage::get(key))
}

fn recover<T: Default>(
    key: &str,
    result: Result<T, gloo_storage::errors::StorageError>,
) -> Result<T, domain::StorageError> {
    match result {
        Ok(value) => Ok(value),
        Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => Ok(T::default()),
        Err(gloo_storage::errors::StorageError::SerdeError(err)) => {
            warn!("discarding corrupted data for '{key}': {err}");
            Ok(T::default())
        }
        Err(_) => Err(domain::StorageError::Unavailable),
    }
}

/// Converts stored entries into domain values. A payload that decodes as
/// JSON but fails domain validation counts as corrupted and is discarded as
/// a whole.
fn decode<S, T>(key: &str, stored: Vec<S>) -> Vec<T>
where
    T: TryFrom<S, Error = domain::StorageError>,
{
    match stored
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(values) => values,
        Err(err) => {
            warn!("discarding corrupted data for '{key}': {err}");
            Vec::new()
        }
    }
}

fn store<T: serde::Serialize>(key: &str, value: T) -> Result<(), domain::WriteError> {
    gloo_storage::LocalStorage::set(key, value).map_err(|err| {
        domain::WriteError::Storage(match err {
            gloo_storage::errors::StorageError::SerdeError(err) => {
                domain::StorageError::Other(err.to_string().into())
            }
            _ => domain::StorageError::Unavailable,
        })
    })
}
