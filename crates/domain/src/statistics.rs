//! Derived metrics over session history.
//!
//! All functions are pure. The current time is always an explicit argument;
//! nothing in this module reads the clock.

use chrono::{DateTime, Duration, Utc};

use crate::{BodyWeight, ExerciseSession, Reps, TrainingSession, Weight, body_weight};

/// Estimated maximum weight liftable for a single repetition, extrapolated
/// from a submaximal set (Brzycki formula).
///
/// Returns `None` where the estimate is undefined: the denominator reaches
/// zero at 37 reps, beyond which the formula yields nonsense.
#[must_use]
pub fn one_rep_max(weight: Weight, reps: Reps) -> Option<f32> {
    #[allow(clippy::cast_precision_loss)]
    let denominator = 1.0278 - 0.0278 * u32::from(reps) as f32;
    if denominator <= 0.0 {
        return None;
    }
    Some(f32::from(weight) / denominator)
}

/// Per-exercise series extracted from session history, oldest first.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExerciseHistory {
    pub one_rep_max: Vec<f32>,
    pub volume: Vec<f32>,
    pub last_note: Option<String>,
    pub last_date: Option<DateTime<Utc>>,
}

/// Collects the one-rep-max and volume series of every past record of the
/// named exercise (matched case-insensitively), together with the most
/// recent non-empty note and the date of the most recent record.
#[must_use]
pub fn exercise_history(history: &[TrainingSession], name: &str) -> ExerciseHistory {
    let key = name.to_lowercase();
    let mut result = ExerciseHistory::default();
    for session in chronological(history) {
        let Some(exercise) = session
            .exercises
            .iter()
            .find(|e| e.name.to_lowercase() == key)
        else {
            continue;
        };
        if let Some(estimate) = one_rep_max(exercise.weight, exercise.reps) {
            result.one_rep_max.push(estimate);
        }
        result.volume.push(exercise.volume());
        if !exercise.note.is_empty() {
            result.last_note = Some(exercise.note.clone());
        }
        result.last_date = Some(session.date);
    }
    result
}

/// The most recent recorded outcome of the named exercise, if any.
#[must_use]
pub fn last_exercise_session<'a>(
    history: &'a [TrainingSession],
    name: &str,
) -> Option<&'a ExerciseSession> {
    let key = name.to_lowercase();
    chronological(history)
        .into_iter()
        .rev()
        .find_map(|session| {
            session
                .exercises
                .iter()
                .find(|e| e.name.to_lowercase() == key)
        })
}

/// When the named exercise was last performed, if ever.
#[must_use]
pub fn last_performed(history: &[TrainingSession], name: &str) -> Option<DateTime<Utc>> {
    let key = name.to_lowercase();
    history
        .iter()
        .filter(|session| {
            session
                .exercises
                .iter()
                .any(|e| e.name.to_lowercase() == key)
        })
        .map(|session| session.date)
        .max()
}

/// Direction of the recent total-session-volume trend.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    #[default]
    Neutral,
}

/// Compares the mean of the most recent 3 total session volumes with the
/// mean of the up to 3 sessions preceding them. A relative change of more
/// than 5% in either direction moves the trend off neutral. Fewer than 2
/// sessions have no trend.
#[must_use]
pub fn volume_trend(history: &[TrainingSession]) -> Trend {
    if history.len() < 2 {
        return Trend::Neutral;
    }

    let volumes = chronological(history)
        .into_iter()
        .map(TrainingSession::volume)
        .collect::<Vec<_>>();
    let recent = &volumes[volumes.len().saturating_sub(3)..];
    let past = &volumes[volumes.len().saturating_sub(6)..volumes.len() - recent.len()];
    if past.is_empty() {
        return Trend::Neutral;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = |values: &[f32]| values.iter().sum::<f32>() / values.len() as f32;
    let past_mean = mean(past);
    let divisor = if past_mean == 0.0 { 1.0 } else { past_mean };
    let change = (mean(recent) - past_mean) / divisor;

    if change > 0.05 {
        Trend::Up
    } else if change < -0.05 {
        Trend::Down
    } else {
        Trend::Neutral
    }
}

/// Average number of sessions per week between the earliest session and
/// `now`. The elapsed time is rounded up to whole weeks, with a floor of one
/// week, so a history recorded on a single day does not blow up the rate.
#[must_use]
pub fn sessions_per_week(history: &[TrainingSession], now: DateTime<Utc>) -> f32 {
    let Some(first) = history.iter().map(|session| session.date).min() else {
        return 0.0;
    };
    let elapsed = (now - first).max(Duration::zero());
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    {
        let weeks = (elapsed.num_seconds() as f64 / (7.0 * 24.0 * 60.0 * 60.0))
            .ceil()
            .max(1.0);
        history.len() as f32 / weeks as f32
    }
}

/// Session count and total volume within the trailing 7-day window.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WeeklySummary {
    pub sessions: usize,
    pub volume: f32,
}

#[must_use]
pub fn weekly_summary(history: &[TrainingSession], now: DateTime<Utc>) -> WeeklySummary {
    let window_start = now - Duration::days(7);
    let mut summary = WeeklySummary::default();
    for session in history {
        if session.date > window_start && session.date <= now {
            summary.sessions += 1;
            summary.volume += session.volume();
        }
    }
    summary
}

/// Aggregate numbers for the analytics view.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Overview {
    pub sessions: usize,
    pub total_volume: f32,
    pub avg_session_volume: f32,
    pub latest_body_weight: Option<f32>,
    pub sessions_per_week: f32,
    pub trend: Trend,
}

#[must_use]
pub fn overview(
    history: &[TrainingSession],
    body_weight: &[BodyWeight],
    now: DateTime<Utc>,
) -> Overview {
    let total_volume = history.iter().map(TrainingSession::volume).sum::<f32>();
    #[allow(clippy::cast_precision_loss)]
    let avg_session_volume = if history.is_empty() {
        0.0
    } else {
        total_volume / history.len() as f32
    };
    Overview {
        sessions: history.len(),
        total_volume,
        avg_session_volume,
        latest_body_weight: body_weight::latest(body_weight).map(|bw| bw.weight),
        sessions_per_week: sessions_per_week(history, now),
        trend: volume_trend(history),
    }
}

fn chronological(history: &[TrainingSession]) -> Vec<&TrainingSession> {
    let mut sessions = history.iter().collect::<Vec<_>>();
    sessions.sort_by_key(|session| session.date);
    sessions
}
