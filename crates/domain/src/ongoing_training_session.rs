use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, Utc};

use crate::{
    Exercise, ExerciseID, ExerciseSession, ExerciseSet, Routine, RoutineID, TrainingSession,
    TrainingSessionID, statistics,
};

/// Lifecycle of the active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Reviewing,
}

/// Figures shown on the review screen before the session is logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub duration: Duration,
    pub completed: usize,
    pub total: usize,
}

/// One active training session.
///
/// Created from a routine and the session history, mutated while the user
/// trains, and finally turned into a [`TrainingSession`] record. Appending
/// that record to the history and stamping the routine's last-performed time
/// is the caller's job.
#[derive(Debug, Clone, PartialEq)]
pub struct OngoingTrainingSession {
    routine_id: RoutineID,
    start_time: DateTime<Utc>,
    exercises: Vec<Exercise>,
    sets: BTreeMap<ExerciseID, Vec<ExerciseSet>>,
    completed: BTreeSet<ExerciseID>,
    notes: BTreeMap<ExerciseID, String>,
    phase: Phase,
}

impl OngoingTrainingSession {
    /// Starts a session for `routine`.
    ///
    /// Exercises are ordered ascending by the time they were last performed
    /// according to `history`, so neglected exercises surface at the front.
    /// Exercises that were never performed come first; ties keep the order
    /// of the routine. Each exercise is seeded with the sets of its most
    /// recent recorded outcome, falling back to the routine's configured
    /// targets.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn start(
        routine: &Routine,
        history: &[TrainingSession],
        start_time: DateTime<Utc>,
    ) -> Self {
        let mut exercises = routine.exercises.clone();
        exercises.sort_by_key(|exercise| {
            statistics::last_performed(history, &exercise.name).unwrap_or(DateTime::UNIX_EPOCH)
        });

        let sets = exercises
            .iter()
            .map(|exercise| {
                let seeded = match statistics::last_exercise_session(history, &exercise.name) {
                    Some(last) => {
                        vec![ExerciseSet::new(last.weight, last.reps); last.sets as usize]
                    }
                    None => vec![
                        ExerciseSet::new(exercise.target_weight, exercise.target_reps);
                        exercise.target_sets as usize
                    ],
                };
                (exercise.id, seeded)
            })
            .collect();

        Self {
            routine_id: routine.id,
            start_time,
            exercises,
            sets,
            completed: BTreeSet::new(),
            notes: BTreeMap::new(),
            phase: Phase::InProgress,
        }
    }

    #[must_use]
    pub fn routine_id(&self) -> RoutineID {
        self.routine_id
    }

    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Exercises in session order.
    #[must_use]
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    /// Live sets of an exercise.
    #[must_use]
    pub fn sets(&self, exercise_id: ExerciseID) -> &[ExerciseSet] {
        self.sets.get(&exercise_id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_completed(&self, exercise_id: ExerciseID) -> bool {
        self.completed.contains(&exercise_id)
    }

    #[must_use]
    pub fn note(&self, exercise_id: ExerciseID) -> Option<&str> {
        self.notes.get(&exercise_id).map(String::as_str)
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Applies a weight step to a set. The result is clamped at zero.
    pub fn change_weight(&mut self, exercise_id: ExerciseID, set: usize, delta: f32) {
        if let Some(set) = self
            .sets
            .get_mut(&exercise_id)
            .and_then(|sets| sets.get_mut(set))
        {
            set.weight = set.weight.offset(delta);
        }
    }

    /// Applies a rep step to a set. The result is clamped at zero.
    pub fn change_reps(&mut self, exercise_id: ExerciseID, set: usize, delta: i32) {
        if let Some(set) = self
            .sets
            .get_mut(&exercise_id)
            .and_then(|sets| sets.get_mut(set))
        {
            set.reps = set.reps.offset(delta);
        }
    }

    /// Appends a set, copying the values of the last one. The first set of
    /// an exercise without any starts at zero weight and zero reps.
    pub fn add_set(&mut self, exercise_id: ExerciseID) {
        if let Some(sets) = self.sets.get_mut(&exercise_id) {
            sets.push(sets.last().copied().unwrap_or_default());
        }
    }

    /// Removes a set by position. There is no minimum set count.
    pub fn remove_set(&mut self, exercise_id: ExerciseID, set: usize) {
        if let Some(sets) = self.sets.get_mut(&exercise_id) {
            if set < sets.len() {
                sets.remove(set);
            }
        }
    }

    /// Toggles whether the exercise will be part of the recorded session.
    pub fn toggle_completed(&mut self, exercise_id: ExerciseID) {
        if !self.completed.remove(&exercise_id) {
            self.completed.insert(exercise_id);
        }
    }

    /// Attaches a free-text note to an exercise. An empty note clears it.
    pub fn set_note(&mut self, exercise_id: ExerciseID, note: String) {
        if note.is_empty() {
            self.notes.remove(&exercise_id);
        } else {
            self.notes.insert(exercise_id, note);
        }
    }

    /// Time since the session was started. Display only; not part of the
    /// recorded session.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.start_time).max(Duration::zero())
    }

    /// Moves to the review screen.
    pub fn begin_review(&mut self, now: DateTime<Utc>) -> Summary {
        self.phase = Phase::Reviewing;
        Summary {
            duration: self.elapsed(now),
            completed: self.completed.len(),
            total: self.exercises.len(),
        }
    }

    /// Finalizes the session into a history record.
    ///
    /// Only completed exercises are recorded, in session order. The recorded
    /// weight and reps are those of the best set by estimated one-rep max
    /// (the earliest set on a tie; a set with an undefined estimate never
    /// wins). The recorded set count is the number of live sets, regardless
    /// of which set was best. Completing no exercise yields a session with
    /// an empty exercise list.
    #[must_use]
    pub fn finish(self, id: TrainingSessionID, end_time: DateTime<Utc>) -> TrainingSession {
        let exercises = self
            .exercises
            .iter()
            .filter(|exercise| self.completed.contains(&exercise.id))
            .map(|exercise| {
                let sets = self.sets.get(&exercise.id).map_or(&[][..], Vec::as_slice);
                let best = best_set(sets);
                ExerciseSession {
                    name: exercise.name.clone(),
                    weight: best.weight,
                    reps: best.reps,
                    sets: u32::try_from(sets.len()).unwrap_or(u32::MAX),
                    note: self.notes.get(&exercise.id).cloned().unwrap_or_default(),
                }
            })
            .collect();

        TrainingSession {
            id,
            routine_id: self.routine_id,
            date: end_time,
            exercises,
        }
    }
}

/// The set with the highest estimated one-rep max. Strict-greater
/// comparison, so the earliest of equally good sets wins.
fn best_set(sets: &[ExerciseSet]) -> ExerciseSet {
    let mut sets = sets.iter().copied();
    let Some(first) = sets.next() else {
        return ExerciseSet::default();
    };
    sets.fold(first, |best, candidate| {
        let better = match (candidate.one_rep_max(), best.one_rep_max()) {
            (Some(candidate), Some(best)) => candidate > best,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if better { candidate } else { best }
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{Name, Reps, Weight};

    use super::*;

    fn date(day: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(2020, 3, day)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn set(weight: f32, reps: u32) -> ExerciseSet {
        ExerciseSet::new(Weight::new(weight).unwrap(), Reps::new(reps).unwrap())
    }

    fn exercise(id: u128, name: &str, weight: f32, reps: u32, sets: u32) -> Exercise {
        Exercise {
            id: id.into(),
            name: name.into(),
            target_reps: Reps::new(reps).unwrap(),
            target_weight: Weight::new(weight).unwrap(),
            target_sets: sets,
        }
    }

    fn routine(exercises: Vec<Exercise>) -> Routine {
        Routine {
            id: 1.into(),
            name: Name::new("Push Day").unwrap(),
            description: String::new(),
            exercises,
            last_performed: None,
        }
    }

    fn recorded(day: u32, name: &str, weight: f32, reps: u32, sets: u32) -> TrainingSession {
        TrainingSession {
            id: u128::from(day).into(),
            routine_id: 1.into(),
            date: date(day),
            exercises: vec![ExerciseSession {
                name: name.into(),
                weight: Weight::new(weight).unwrap(),
                reps: Reps::new(reps).unwrap(),
                sets,
                note: String::new(),
            }],
        }
    }

    #[test]
    fn test_start_orders_never_performed_first() {
        let routine = routine(vec![
            exercise(1, "Bench", 60.0, 8, 3),
            exercise(2, "Ohp", 40.0, 8, 3),
        ]);
        let history = vec![recorded(5, "Ohp", 40.0, 8, 3)];

        let session = OngoingTrainingSession::start(&routine, &history, date(6));
        assert_eq!(
            session
                .exercises()
                .iter()
                .map(|e| e.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Bench", "Ohp"]
        );
    }

    #[test]
    fn test_start_orders_least_recently_performed_first() {
        let routine = routine(vec![
            exercise(1, "Bench", 60.0, 8, 3),
            exercise(2, "Ohp", 40.0, 8, 3),
            exercise(3, "Dips", 0.0, 10, 3),
        ]);
        let history = vec![
            recorded(5, "Bench", 60.0, 8, 3),
            recorded(3, "Ohp", 40.0, 8, 3),
            recorded(4, "Dips", 0.0, 10, 3),
        ];

        let session = OngoingTrainingSession::start(&routine, &history, date(6));
        assert_eq!(
            session
                .exercises()
                .iter()
                .map(|e| e.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Ohp", "Dips", "Bench"]
        );
    }

    #[test]
    fn test_start_breaks_ties_by_routine_position() {
        let routine = routine(vec![
            exercise(1, "Bench", 60.0, 8, 3),
            exercise(2, "Ohp", 40.0, 8, 3),
            exercise(3, "Dips", 0.0, 10, 3),
        ]);

        let session = OngoingTrainingSession::start(&routine, &[], date(6));
        assert_eq!(
            session.exercises().iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![1.into(), 2.into(), 3.into()]
        );
    }

    #[test]
    fn test_start_seeds_sets_from_history() {
        let routine = routine(vec![exercise(1, "Bench", 80.0, 5, 5)]);
        let history = vec![
            recorded(2, "bench", 62.5, 7, 4),
            recorded(1, "Bench", 60.0, 8, 3),
        ];

        let session = OngoingTrainingSession::start(&routine, &history, date(6));
        assert_eq!(session.sets(1.into()), vec![set(62.5, 7); 4]);
    }

    #[test]
    fn test_start_seeds_sets_from_targets_without_history() {
        let routine = routine(vec![exercise(1, "Bench", 60.0, 8, 3)]);

        let session = OngoingTrainingSession::start(&routine, &[], date(6));
        assert_eq!(session.sets(1.into()), vec![set(60.0, 8); 3]);
    }

    #[test]
    fn test_start_seeding_identical_for_matching_history_and_targets() {
        let routine = routine(vec![exercise(1, "Bench", 60.0, 8, 3)]);
        let history = vec![recorded(1, "Bench", 60.0, 8, 3)];

        let from_history = OngoingTrainingSession::start(&routine, &history, date(6));
        let from_targets = OngoingTrainingSession::start(&routine, &[], date(6));
        assert_eq!(from_history.sets(1.into()), from_targets.sets(1.into()));
    }

    #[rstest]
    #[case::increase(2.5, set(62.5, 8))]
    #[case::decrease(-2.5, set(57.5, 8))]
    #[case::clamped_at_zero(-100.0, set(0.0, 8))]
    fn test_change_weight(#[case] delta: f32, #[case] expected: ExerciseSet) {
        let routine = routine(vec![exercise(1, "Bench", 60.0, 8, 2)]);
        let mut session = OngoingTrainingSession::start(&routine, &[], date(6));

        session.change_weight(1.into(), 1, delta);
        assert_eq!(session.sets(1.into()), vec![set(60.0, 8), expected]);
    }

    #[rstest]
    #[case::increase(1, set(60.0, 9))]
    #[case::decrease(-1, set(60.0, 7))]
    #[case::clamped_at_zero(-100, set(60.0, 0))]
    fn test_change_reps(#[case] delta: i32, #[case] expected: ExerciseSet) {
        let routine = routine(vec![exercise(1, "Bench", 60.0, 8, 2)]);
        let mut session = OngoingTrainingSession::start(&routine, &[], date(6));

        session.change_reps(1.into(), 0, delta);
        assert_eq!(session.sets(1.into()), vec![expected, set(60.0, 8)]);
    }

    #[test]
    fn test_change_ignores_unknown_positions() {
        let routine = routine(vec![exercise(1, "Bench", 60.0, 8, 1)]);
        let mut session = OngoingTrainingSession::start(&routine, &[], date(6));

        session.change_weight(1.into(), 7, 2.5);
        session.change_reps(2.into(), 0, 1);
        assert_eq!(session.sets(1.into()), vec![set(60.0, 8)]);
    }

    #[test]
    fn test_add_set_copies_last_set() {
        let routine = routine(vec![exercise(1, "Bench", 60.0, 8, 2)]);
        let mut session = OngoingTrainingSession::start(&routine, &[], date(6));

        session.change_weight(1.into(), 1, 2.5);
        session.add_set(1.into());
        assert_eq!(
            session.sets(1.into()),
            vec![set(60.0, 8), set(62.5, 8), set(62.5, 8)]
        );
    }

    #[test]
    fn test_add_set_starts_at_zero_without_sets() {
        let routine = routine(vec![exercise(1, "Bench", 60.0, 8, 0)]);
        let mut session = OngoingTrainingSession::start(&routine, &[], date(6));

        session.add_set(1.into());
        assert_eq!(session.sets(1.into()), vec![set(0.0, 0)]);
    }

    #[test]
    fn test_remove_set() {
        let routine = routine(vec![exercise(1, "Bench", 60.0, 8, 3)]);
        let mut session = OngoingTrainingSession::start(&routine, &[], date(6));

        session.change_reps(1.into(), 1, -3);
        session.remove_set(1.into(), 1);
        assert_eq!(session.sets(1.into()), vec![set(60.0, 8); 2]);

        session.remove_set(1.into(), 0);
        session.remove_set(1.into(), 0);
        session.remove_set(1.into(), 0);
        assert_eq!(session.sets(1.into()), vec![]);
    }

    #[test]
    fn test_toggle_completed() {
        let routine = routine(vec![exercise(1, "Bench", 60.0, 8, 3)]);
        let mut session = OngoingTrainingSession::start(&routine, &[], date(6));

        assert!(!session.is_completed(1.into()));
        session.toggle_completed(1.into());
        assert!(session.is_completed(1.into()));
        session.toggle_completed(1.into());
        assert!(!session.is_completed(1.into()));
    }

    #[test]
    fn test_set_note() {
        let routine = routine(vec![exercise(1, "Bench", 60.0, 8, 3)]);
        let mut session = OngoingTrainingSession::start(&routine, &[], date(6));

        session.set_note(1.into(), "grip too wide".into());
        assert_eq!(session.note(1.into()), Some("grip too wide"));
        session.set_note(1.into(), String::new());
        assert_eq!(session.note(1.into()), None);
    }

    #[test]
    fn test_elapsed() {
        let routine = routine(vec![]);
        let session = OngoingTrainingSession::start(&routine, &[], date(6));

        assert_eq!(
            session.elapsed(date(6) + Duration::seconds(90)),
            Duration::seconds(90)
        );
        assert_eq!(session.elapsed(date(5)), Duration::zero());
    }

    #[test]
    fn test_begin_review() {
        let routine = routine(vec![
            exercise(1, "Bench", 60.0, 8, 3),
            exercise(2, "Ohp", 40.0, 8, 3),
        ]);
        let mut session = OngoingTrainingSession::start(&routine, &[], date(6));
        assert_eq!(session.phase(), Phase::InProgress);

        session.toggle_completed(1.into());
        let summary = session.begin_review(date(6) + Duration::seconds(600));
        assert_eq!(session.phase(), Phase::Reviewing);
        assert_eq!(
            summary,
            Summary {
                duration: Duration::seconds(600),
                completed: 1,
                total: 2,
            }
        );
    }

    #[test]
    fn test_finish_records_best_set_and_live_set_count() {
        let routine = routine(vec![exercise(1, "Squat", 100.0, 5, 2)]);
        let mut session = OngoingTrainingSession::start(&routine, &[], date(6));

        // 100 kg × 5 (≈112.7 kg 1RM) vs 110 kg × 3 (≈116.5 kg 1RM)
        session.change_weight(1.into(), 1, 10.0);
        session.change_reps(1.into(), 1, -2);
        session.toggle_completed(1.into());
        session.set_note(1.into(), "belt on".into());

        let result = session.finish(9.into(), date(6) + Duration::seconds(3600));
        assert_eq!(result.id, 9.into());
        assert_eq!(result.routine_id, 1.into());
        assert_eq!(result.date, date(6) + Duration::seconds(3600));
        assert_eq!(
            result.exercises,
            vec![ExerciseSession {
                name: "Squat".into(),
                weight: Weight::new(110.0).unwrap(),
                reps: Reps::new(3).unwrap(),
                sets: 2,
                note: "belt on".into(),
            }]
        );
    }

    #[test]
    fn test_finish_without_completed_exercises() {
        let routine = routine(vec![exercise(1, "Bench", 60.0, 8, 3)]);
        let session = OngoingTrainingSession::start(&routine, &[], date(6));

        let result = session.finish(9.into(), date(6));
        assert_eq!(result.exercises, vec![]);
    }

    #[test]
    fn test_finish_skips_incomplete_exercises() {
        let routine = routine(vec![
            exercise(1, "Bench", 60.0, 8, 3),
            exercise(2, "Ohp", 40.0, 8, 3),
        ]);
        let mut session = OngoingTrainingSession::start(&routine, &[], date(6));

        session.toggle_completed(2.into());
        let result = session.finish(9.into(), date(6));
        assert_eq!(
            result
                .exercises
                .iter()
                .map(|e| e.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Ohp"]
        );
    }

    #[rstest]
    #[case::empty(&[], set(0.0, 0))]
    #[case::single(&[set(60.0, 8)], set(60.0, 8))]
    #[case::higher_estimate_wins(&[set(100.0, 5), set(110.0, 3)], set(110.0, 3))]
    #[case::earlier_set_wins_ties(&[set(100.0, 5), set(100.0, 5)], set(100.0, 5))]
    #[case::undefined_estimate_never_wins(&[set(60.0, 8), set(500.0, 40)], set(60.0, 8))]
    #[case::all_undefined(&[set(500.0, 40), set(600.0, 40)], set(500.0, 40))]
    fn test_best_set(#[case] sets: &[ExerciseSet], #[case] expected: ExerciseSet) {
        assert_eq!(best_set(sets), expected);
    }
}
