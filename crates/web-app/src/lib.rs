#![warn(clippy::pedantic)]

pub mod log;

use ::log::error;
use chrono::{DateTime, Utc};
use liftlog_domain as domain;

/// The active top-level screen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum View {
    #[default]
    Dashboard,
    Editor,
    Session,
    Analytics,
    Settings,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub enable_ai_features: bool,
}

pub trait SettingsRepository {
    fn read_settings(&self) -> Result<Settings, String>;
    fn write_settings(&self, settings: &Settings) -> Result<(), String>;
}

/// Editable state of the routine editor.
///
/// A draft for an existing routine keeps its id and last-performed time, so
/// saving replaces the routine in place.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoutineDraft {
    pub id: Option<domain::RoutineID>,
    pub name: String,
    pub description: String,
    pub exercises: Vec<domain::Exercise>,
    pub last_performed: Option<DateTime<Utc>>,
}

impl RoutineDraft {
    #[must_use]
    pub fn edit(routine: &domain::Routine) -> Self {
        Self {
            id: Some(routine.id),
            name: routine.name.to_string(),
            description: routine.description.clone(),
            exercises: routine.exercises.clone(),
            last_performed: routine.last_performed,
        }
    }

    /// Appends an empty exercise row with the editor defaults.
    pub fn add_exercise(&mut self) {
        self.exercises.push(domain::Exercise::new(String::new()));
    }

    pub fn remove_exercise(&mut self, id: domain::ExerciseID) {
        self.exercises.retain(|e| e.id != id);
    }

    /// Merges a generated suggestion into the draft. Only the fields present
    /// in the suggestion are applied; a suggestion without exercises leaves
    /// the draft's exercise list untouched.
    pub fn apply(&mut self, suggestion: domain::RoutineSuggestion) {
        if let Some(name) = suggestion.name {
            self.name = name;
        }
        if let Some(description) = suggestion.description {
            self.description = description;
        }
        if !suggestion.exercises.is_empty() {
            self.exercises = suggestion
                .exercises
                .into_iter()
                .map(domain::SuggestedExercise::into_exercise)
                .collect();
        }
    }

    /// Validates the draft into a routine. An empty name is rejected and
    /// nothing is saved.
    pub fn build(&self) -> Result<domain::Routine, domain::NameError> {
        Ok(domain::Routine {
            id: self.id.unwrap_or_else(domain::RoutineID::random),
            name: domain::Name::new(&self.name)?,
            description: self.description.clone(),
            exercises: self.exercises.clone(),
            last_performed: self.last_performed,
        })
    }
}

/// The owned application state.
///
/// All collections live here and are replaced as a whole by the update
/// operations below. Every mutation is written back to storage immediately;
/// a failed write is logged and otherwise ignored, it must never block the
/// user.
pub struct App<S> {
    storage: S,
    pub view: View,
    pub routines: Vec<domain::Routine>,
    pub history: Vec<domain::TrainingSession>,
    pub body_weight: Vec<domain::BodyWeight>,
    pub settings: Settings,
    pub draft: Option<RoutineDraft>,
    pub ongoing: Option<domain::OngoingTrainingSession>,
}

impl<S> App<S>
where
    S: domain::RoutineRepository
        + domain::TrainingSessionRepository
        + domain::BodyWeightRepository
        + SettingsRepository,
{
    /// Hydrates the application state from storage.
    ///
    /// Corrupted collections have already been recovered to empty by the
    /// storage layer; an inaccessible storage area degrades to a fresh
    /// state. Startup never fails.
    pub fn init(storage: S) -> Self {
        let routines = storage.read_routines().unwrap_or_else(|err| {
            error!("failed to read routines: {err}");
            Vec::new()
        });
        let history = storage.read_training_sessions().unwrap_or_else(|err| {
            error!("failed to read training sessions: {err}");
            Vec::new()
        });
        let body_weight = storage.read_body_weight().unwrap_or_else(|err| {
            error!("failed to read body weight: {err}");
            Vec::new()
        });
        let settings = storage.read_settings().unwrap_or_else(|err| {
            error!("failed to read settings: {err}");
            Settings::default()
        });

        Self {
            storage,
            view: View::default(),
            routines,
            history,
            body_weight,
            settings,
            draft: None,
            ongoing: None,
        }
    }

    /// Routines in display order, least recently performed first.
    #[must_use]
    pub fn routines_stale_first(&self) -> Vec<domain::Routine> {
        let mut routines = self.routines.clone();
        domain::routine::sort_stale_first(&mut routines);
        routines
    }

    /// Opens the editor with an empty draft.
    pub fn create_routine(&mut self) {
        self.draft = Some(RoutineDraft::default());
        self.view = View::Editor;
    }

    /// Opens the editor for an existing routine.
    pub fn edit_routine(&mut self, id: domain::RoutineID) {
        if let Some(routine) = self.routines.iter().find(|r| r.id == id) {
            self.draft = Some(RoutineDraft::edit(routine));
            self.view = View::Editor;
        }
    }

    /// Validates and saves the routine being edited, then returns to the
    /// dashboard. On a validation error the editor state is left untouched.
    pub fn save_routine(&mut self) -> Result<(), domain::NameError> {
        let Some(draft) = &self.draft else {
            return Ok(());
        };
        let routine = draft.build()?;
        domain::routine::upsert(&mut self.routines, routine);
        self.store_routines();
        self.draft = None;
        self.view = View::Dashboard;
        Ok(())
    }

    pub fn delete_routine(&mut self, id: domain::RoutineID) {
        if domain::routine::remove(&mut self.routines, id) {
            self.store_routines();
        }
    }

    /// Merges a generated suggestion into the routine being edited.
    pub fn apply_suggestion(&mut self, suggestion: domain::RoutineSuggestion) {
        if let Some(draft) = &mut self.draft {
            draft.apply(suggestion);
        }
    }

    /// Starts a training session for the routine.
    pub fn start_session(&mut self, id: domain::RoutineID) {
        if let Some(routine) = self.routines.iter().find(|r| r.id == id) {
            self.ongoing = Some(domain::OngoingTrainingSession::start(
                routine,
                &self.history,
                Utc::now(),
            ));
            self.view = View::Session;
        }
    }

    /// Logs the active session: appends the record to the history and stamps
    /// the originating routine's last-performed time.
    pub fn finish_session(&mut self) {
        let Some(ongoing) = self.ongoing.take() else {
            return;
        };
        let session = ongoing.finish(domain::TrainingSessionID::random(), Utc::now());
        if let Some(routine) = self
            .routines
            .iter_mut()
            .find(|r| r.id == session.routine_id)
        {
            routine.last_performed = Some(session.date);
        }
        self.history.push(session);
        self.store_history();
        self.store_routines();
        self.view = View::Dashboard;
    }

    /// Abandons the active session without recording anything.
    pub fn cancel_session(&mut self) {
        self.ongoing = None;
        self.view = View::Dashboard;
    }

    pub fn add_body_weight(&mut self, entry: domain::BodyWeight) {
        domain::body_weight::upsert(&mut self.body_weight, entry);
        self.store_body_weight();
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        if let Err(err) = self.storage.write_settings(&self.settings) {
            error!("failed to write settings: {err}");
        }
    }

    pub fn open_analytics(&mut self) {
        self.view = View::Analytics;
    }

    pub fn open_settings(&mut self) {
        self.view = View::Settings;
    }

    /// Leaves the editor or a sub-view, discarding any draft.
    pub fn back_to_dashboard(&mut self) {
        self.draft = None;
        self.view = View::Dashboard;
    }

    /// Analytics aggregate for the current history.
    #[must_use]
    pub fn overview(&self) -> domain::Overview {
        domain::statistics::overview(&self.history, &self.body_weight, Utc::now())
    }

    /// Count and volume of the trailing seven days.
    #[must_use]
    pub fn weekly_summary(&self) -> domain::WeeklySummary {
        domain::statistics::weekly_summary(&self.history, Utc::now())
    }

    fn store_routines(&self) {
        if let Err(err) = self.storage.write_routines(&self.routines) {
            error!("failed to write routines: {err}");
        }
    }

    fn store_history(&self) {
        if let Err(err) = self.storage.write_training_sessions(&self.history) {
            error!("failed to write training sessions: {err}");
        }
    }

    fn store_body_weight(&self) {
        if let Err(err) = self.storage.write_body_weight(&self.body_weight) {
            error!("failed to write body weight: {err}");
        }
    }
}
