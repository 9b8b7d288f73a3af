// ABOUTME: Per-set completion flags for a workout session and their snapshot encoding
// ABOUTME: Reconciles stored snapshots against the current exercise definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Completion state.
//!
//! Maps each join-record id to one flag per set. For every exercise in the
//! session the flag vector length equals the exercise's set count; this holds
//! after [`CompletionState::reconcile`] and every mutation preserves it.

use super::exercise::ExerciseInSession;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

/// Per-set completion flags keyed by join-record id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionState {
    sets: BTreeMap<Uuid, Vec<bool>>,
}

/// Stored form of a snapshot slot
#[derive(Debug, Serialize)]
struct ProgressSnapshot<'a> {
    completion: &'a CompletionState,
}

/// Lenient stored form: unknown keys ignored, ids parsed one by one
#[derive(Debug, Deserialize)]
struct StoredSnapshot {
    #[serde(default)]
    completion: BTreeMap<String, Vec<bool>>,
}

impl CompletionState {
    /// All-false state for `exercises`
    #[must_use]
    pub fn fresh(exercises: &[ExerciseInSession]) -> Self {
        Self::reconcile(None, exercises)
    }

    /// Rebuild state for `exercises`, keeping whatever `stored` knows.
    ///
    /// Each vector is resized to the exercise's current set count: missing
    /// flags become `false`, extras are dropped. Entries for join-records no
    /// longer in the session are discarded.
    #[must_use]
    pub fn reconcile(stored: Option<&Self>, exercises: &[ExerciseInSession]) -> Self {
        let sets = exercises
            .iter()
            .map(|exercise| {
                let len = exercise.sets as usize;
                let mut flags = stored
                    .and_then(|s| s.sets.get(&exercise.user_exercise_id))
                    .cloned()
                    .unwrap_or_default();
                flags.resize(len, false);
                (exercise.user_exercise_id, flags)
            })
            .collect();
        Self { sets }
    }

    /// Decode a snapshot slot value. Any parse problem yields `None`.
    #[must_use]
    pub fn from_snapshot(raw: &str) -> Option<Self> {
        let stored: StoredSnapshot = match serde_json::from_str(raw) {
            Ok(stored) => stored,
            Err(e) => {
                debug!(error = %e, "Discarding unreadable progress snapshot");
                return None;
            }
        };
        let sets = stored
            .completion
            .into_iter()
            .filter_map(|(key, flags)| Uuid::parse_str(&key).ok().map(|id| (id, flags)))
            .collect();
        Some(Self { sets })
    }

    /// Encode as a snapshot slot value: `{"completion": {...}}`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_snapshot(&self) -> AppResult<String> {
        serde_json::to_string(&ProgressSnapshot { completion: self }).map_err(AppError::from)
    }

    /// Flags for one exercise
    #[must_use]
    pub fn flags(&self, user_exercise_id: Uuid) -> Option<&[bool]> {
        self.sets.get(&user_exercise_id).map(Vec::as_slice)
    }

    /// Flip one flag and return its new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the exercise is unknown or `set_index` is out of range;
    /// the state is left untouched in that case.
    pub fn toggle(&mut self, user_exercise_id: Uuid, set_index: usize) -> AppResult<bool> {
        let flags = self
            .sets
            .get_mut(&user_exercise_id)
            .ok_or_else(|| AppError::not_found(format!("Exercise {user_exercise_id}")))?;
        let len = flags.len();
        let flag = flags.get_mut(set_index).ok_or_else(|| {
            AppError::out_of_range(format!(
                "Set index {set_index} out of range for exercise with {len} sets"
            ))
        })?;
        *flag = !*flag;
        Ok(*flag)
    }

    /// Whether every set of the exercise is done. Unknown ids are not complete.
    #[must_use]
    pub fn is_exercise_complete(&self, user_exercise_id: Uuid) -> bool {
        self.flags(user_exercise_id)
            .is_some_and(|flags| flags.iter().all(|&done| done))
    }

    /// Whether the exercise has at least one set left
    #[must_use]
    pub fn has_remaining_sets(&self, user_exercise_id: Uuid) -> bool {
        self.flags(user_exercise_id)
            .is_some_and(|flags| flags.iter().any(|&done| !done))
    }

    /// Count of finished sets for one exercise
    #[must_use]
    pub fn completed_sets(&self, user_exercise_id: Uuid) -> usize {
        self.flags(user_exercise_id)
            .map_or(0, |flags| flags.iter().filter(|&&done| done).count())
    }

    /// Join-record ids whose every set is done, in id order
    #[must_use]
    pub fn completed_exercise_ids(&self) -> Vec<Uuid> {
        self.sets
            .iter()
            .filter(|(_, flags)| flags.iter().all(|&done| done))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Number of tracked exercises
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether no exercise is tracked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::RepsOrSeconds;

    fn exercise(sets: u32) -> ExerciseInSession {
        ExerciseInSession {
            user_exercise_id: Uuid::new_v4(),
            exercise_id: None,
            name: "Exercise".to_owned(),
            sets,
            reps_or_seconds: RepsOrSeconds::Unset,
            duration: None,
            video_link: None,
            equipment: None,
            setup: None,
            cues: None,
        }
    }

    #[test]
    fn test_fresh_state_matches_set_counts() {
        let a = exercise(3);
        let b = exercise(2);
        let state = CompletionState::fresh(&[a.clone(), b.clone()]);

        assert_eq!(state.flags(a.user_exercise_id), Some(&[false, false, false][..]));
        assert_eq!(state.flags(b.user_exercise_id), Some(&[false, false][..]));
    }

    #[test]
    fn test_reconcile_pads_truncates_and_drops_stale() {
        let grown = exercise(4);
        let shrunk = exercise(2);
        let stale = Uuid::new_v4();
        let raw = format!(
            r#"{{"completion":{{"{}":[true,true],"{}":[true,false,true],"{}":[true]}}}}"#,
            grown.user_exercise_id, shrunk.user_exercise_id, stale
        );
        let stored = CompletionState::from_snapshot(&raw).unwrap();

        let state = CompletionState::reconcile(Some(&stored), &[grown.clone(), shrunk.clone()]);

        assert_eq!(
            state.flags(grown.user_exercise_id),
            Some(&[true, true, false, false][..])
        );
        assert_eq!(state.flags(shrunk.user_exercise_id), Some(&[true, false][..]));
        assert_eq!(state.flags(stale), None);
        assert_eq!(state.len(), 2);

        let again = CompletionState::reconcile(Some(&state), &[grown, shrunk]);
        assert_eq!(again, state);
    }

    #[test]
    fn test_corrupt_snapshots_are_absent() {
        assert_eq!(CompletionState::from_snapshot(""), None);
        assert_eq!(CompletionState::from_snapshot("not json"), None);
        assert_eq!(CompletionState::from_snapshot(r#"{"completion":{"x":[1,2]}}"#), None);

        let lenient = CompletionState::from_snapshot(r#"{"completion":{"not-a-uuid":[true]}}"#);
        assert_eq!(lenient.map(|s| s.len()), Some(0));
    }

    #[test]
    fn test_snapshot_encoding_is_stable() {
        let exercises = [exercise(3), exercise(2)];
        let mut state = CompletionState::fresh(&exercises);
        state.toggle(exercises[1].user_exercise_id, 1).unwrap();

        let first = state.to_snapshot().unwrap();
        let reloaded = CompletionState::from_snapshot(&first).unwrap();
        let reconciled = CompletionState::reconcile(Some(&reloaded), &exercises);

        assert_eq!(reconciled.to_snapshot().unwrap(), first);
        assert!(first.starts_with(r#"{"completion":{"#));
    }

    #[test]
    fn test_toggle_out_of_range_leaves_state() {
        let a = exercise(2);
        let mut state = CompletionState::fresh(std::slice::from_ref(&a));
        let before = state.clone();

        assert!(state.toggle(a.user_exercise_id, 2).is_err());
        assert!(state.toggle(Uuid::new_v4(), 0).is_err());
        assert_eq!(state, before);

        assert!(state.toggle(a.user_exercise_id, 0).unwrap());
        assert!(!state.toggle(a.user_exercise_id, 0).unwrap());
        assert_eq!(state, before);
    }

    #[test]
    fn test_completed_ids() {
        let a = exercise(1);
        let b = exercise(2);
        let mut state = CompletionState::fresh(&[a.clone(), b.clone()]);
        state.toggle(a.user_exercise_id, 0).unwrap();
        state.toggle(b.user_exercise_id, 0).unwrap();

        assert_eq!(state.completed_exercise_ids(), vec![a.user_exercise_id]);
        assert!(state.is_exercise_complete(a.user_exercise_id));
        assert!(!state.is_exercise_complete(b.user_exercise_id));
        assert!(state.has_remaining_sets(b.user_exercise_id));
        assert_eq!(state.completed_sets(b.user_exercise_id), 1);
    }
}
