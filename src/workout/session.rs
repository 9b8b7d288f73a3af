// ABOUTME: In-progress workout session: per-set completion, exercise cursor and review step
// ABOUTME: Mirrors completion state to the local snapshot slot after every change
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Session
//!
//! A [`WorkoutSession`] is the `Ready` state of the workout page. It owns the
//! exercise list (fixed at load), the [`CompletionState`] and a cursor over
//! `0..=exercise_count`, where `exercise_count` is the review step.
//!
//! Every completion change is written through to the [`SnapshotStore`] so a
//! reload picks up where the user left off. Snapshot failures are logged and
//! otherwise ignored: the in-memory state is authoritative.

use super::completion::CompletionState;
use super::exercise::ExerciseInSession;
use crate::errors::{AppError, AppResult};
use crate::logging::SessionLogger;
use crate::models::Workout;
use crate::snapshot::{SnapshotKey, SnapshotStore};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Where the cursor points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Step {
    /// Viewing the exercise at this index
    Exercise(usize),
    /// Summary shown before submission
    Review,
}

/// Submission lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Accepting changes
    Active,
    /// Submit was pressed with unfinished exercises; waiting for confirm or cancel
    AwaitingConfirmation,
    /// Completion has been written back; the session is finished
    Submitted,
}

/// One row of the review step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    /// Position in the session, usable with [`WorkoutSession::jump_to`]
    pub index: usize,
    /// Join-record id
    pub user_exercise_id: Uuid,
    /// Display name
    pub name: String,
    /// Sets marked done
    pub completed_sets: usize,
    /// Sets prescribed
    pub total_sets: usize,
    /// Whether every set is done
    pub complete: bool,
}

/// State of one workout being performed
pub struct WorkoutSession {
    user_id: Uuid,
    workout_id: Uuid,
    week: Option<i32>,
    day: Option<i32>,
    exercises: Vec<ExerciseInSession>,
    pub(super) completion: CompletionState,
    current_step: usize,
    pub(super) phase: SessionPhase,
    snapshots: Arc<dyn SnapshotStore>,
    snapshot_key: SnapshotKey,
    restored: bool,
}

impl fmt::Debug for WorkoutSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkoutSession")
            .field("user_id", &self.user_id)
            .field("workout_id", &self.workout_id)
            .field("week", &self.week)
            .field("day", &self.day)
            .field("exercises", &self.exercises.len())
            .field("current_step", &self.current_step)
            .field("phase", &self.phase)
            .field("snapshot_key", &self.snapshot_key.to_string())
            .finish_non_exhaustive()
    }
}

impl WorkoutSession {
    /// Start a session for `workout` with an already-joined exercise list.
    ///
    /// Restores completion from the snapshot slot when one exists and parses,
    /// reconciled against `exercises`; otherwise starts all-false. The cursor
    /// starts on the first exercise with a set left, or 0 when all are done.
    #[must_use]
    pub fn start(
        user_id: Uuid,
        workout: &Workout,
        exercises: Vec<ExerciseInSession>,
        snapshots: Arc<dyn SnapshotStore>,
        namespace: &str,
    ) -> Self {
        let snapshot_key = SnapshotKey::new(namespace, user_id, workout.id);
        let stored = match snapshots.read(&snapshot_key) {
            Ok(raw) => raw.as_deref().and_then(CompletionState::from_snapshot),
            Err(e) => {
                SessionLogger::log_snapshot_failure(
                    &snapshot_key.to_string(),
                    "read",
                    &e.to_string(),
                );
                None
            }
        };
        let restored = stored.is_some();
        let completion = CompletionState::reconcile(stored.as_ref(), &exercises);

        let current_step = exercises
            .iter()
            .position(|e| completion.has_remaining_sets(e.user_exercise_id))
            .unwrap_or(0);

        Self {
            user_id,
            workout_id: workout.id,
            week: workout.week,
            day: workout.day,
            exercises,
            completion,
            current_step,
            phase: SessionPhase::Active,
            snapshots,
            snapshot_key,
            restored,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Signed-in user performing the workout
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Workout being performed
    #[must_use]
    pub const fn workout_id(&self) -> Uuid {
        self.workout_id
    }

    /// Week number of the workout
    #[must_use]
    pub const fn week(&self) -> Option<i32> {
        self.week
    }

    /// Day number of the workout
    #[must_use]
    pub const fn day(&self) -> Option<i32> {
        self.day
    }

    /// Exercises in session order
    #[must_use]
    pub fn exercises(&self) -> &[ExerciseInSession] {
        &self.exercises
    }

    /// Number of exercises (also the cursor index of the review step)
    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.exercises.len()
    }

    /// Current completion flags
    #[must_use]
    pub const fn completion(&self) -> &CompletionState {
        &self.completion
    }

    /// Raw cursor in `0..=exercise_count`
    #[must_use]
    pub const fn current_step(&self) -> usize {
        self.current_step
    }

    /// Cursor as a [`Step`]
    #[must_use]
    pub fn step(&self) -> Step {
        if self.current_step >= self.exercises.len() {
            Step::Review
        } else {
            Step::Exercise(self.current_step)
        }
    }

    /// Whether the review step is showing
    #[must_use]
    pub fn is_review(&self) -> bool {
        self.step() == Step::Review
    }

    /// Exercise in view, `None` on review
    #[must_use]
    pub fn current_exercise(&self) -> Option<&ExerciseInSession> {
        self.exercises.get(self.current_step)
    }

    /// Submission lifecycle
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether the incomplete-workout prompt is open
    #[must_use]
    pub fn awaiting_confirmation(&self) -> bool {
        self.phase == SessionPhase::AwaitingConfirmation
    }

    /// Whether completion came from a saved snapshot
    #[must_use]
    pub const fn restored_from_snapshot(&self) -> bool {
        self.restored
    }

    /// Slot the session writes to
    #[must_use]
    pub const fn snapshot_key(&self) -> &SnapshotKey {
        &self.snapshot_key
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Flip the flag of one set and persist. Returns the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the session was already submitted, the exercise is
    /// not part of the session or `set_index` is not below its set count.
    pub fn toggle_set(&mut self, user_exercise_id: Uuid, set_index: usize) -> AppResult<bool> {
        self.ensure_not_submitted()?;
        let done = self.completion.toggle(user_exercise_id, set_index)?;
        SessionLogger::log_set_toggled(self.workout_id, user_exercise_id, set_index, done);
        self.persist();
        Ok(done)
    }

    /// Move back one exercise; no-op on the first
    pub fn go_prev(&mut self) {
        if self.current_step > 0 {
            self.move_to(self.current_step - 1);
            self.dismiss_prompt();
        }
    }

    /// Move forward one exercise, or from the last exercise to review; no-op on review
    pub fn go_next(&mut self) {
        if self.current_step < self.exercises.len() {
            self.move_to(self.current_step + 1);
        }
    }

    /// Jump straight to an exercise. Out-of-range indexes are rejected:
    /// returns `false` and leaves the cursor where it was.
    pub fn jump_to(&mut self, index: usize) -> bool {
        if index >= self.exercises.len() {
            debug!(
                workout.id = %self.workout_id,
                index,
                exercises = self.exercises.len(),
                "Ignoring jump to out-of-range exercise"
            );
            return false;
        }
        self.move_to(index);
        self.dismiss_prompt();
        true
    }

    // ------------------------------------------------------------------
    // Derived values
    // ------------------------------------------------------------------

    /// Whether every set of one exercise is done
    #[must_use]
    pub fn is_exercise_complete(&self, user_exercise_id: Uuid) -> bool {
        self.completion.is_exercise_complete(user_exercise_id)
    }

    /// Whether every exercise is complete
    #[must_use]
    pub fn all_complete(&self) -> bool {
        self.exercises
            .iter()
            .all(|e| self.completion.is_exercise_complete(e.user_exercise_id))
    }

    /// Whether the forward button should be emphasized: the exercise in view is complete
    #[must_use]
    pub fn forward_is_primary(&self) -> bool {
        self.current_exercise()
            .is_some_and(|e| self.completion.is_exercise_complete(e.user_exercise_id))
    }

    /// Rows for the review step
    #[must_use]
    pub fn review_summary(&self) -> Vec<ReviewItem> {
        self.exercises
            .iter()
            .enumerate()
            .map(|(index, e)| ReviewItem {
                index,
                user_exercise_id: e.user_exercise_id,
                name: e.name.clone(),
                completed_sets: self.completion.completed_sets(e.user_exercise_id),
                total_sets: e.sets as usize,
                complete: self.completion.is_exercise_complete(e.user_exercise_id),
            })
            .collect()
    }

    /// Join-records whose every set is done, in session order
    #[must_use]
    pub fn completed_user_exercise_ids(&self) -> Vec<Uuid> {
        self.exercises
            .iter()
            .map(|e| e.user_exercise_id)
            .filter(|id| self.completion.is_exercise_complete(*id))
            .collect()
    }

    /// Join-records with at least one set left, in session order
    #[must_use]
    pub fn incomplete_user_exercise_ids(&self) -> Vec<Uuid> {
        self.exercises
            .iter()
            .map(|e| e.user_exercise_id)
            .filter(|id| !self.completion.is_exercise_complete(*id))
            .collect()
    }

    // ------------------------------------------------------------------
    // Snapshot plumbing
    // ------------------------------------------------------------------

    fn persist(&self) {
        let result = self
            .completion
            .to_snapshot()
            .and_then(|raw| self.snapshots.write(&self.snapshot_key, &raw));
        if let Err(e) = result {
            SessionLogger::log_snapshot_failure(
                &self.snapshot_key.to_string(),
                "write",
                &e.to_string(),
            );
        }
    }

    pub(super) fn clear_snapshot(&self) {
        if let Err(e) = self.snapshots.remove(&self.snapshot_key) {
            SessionLogger::log_snapshot_failure(
                &self.snapshot_key.to_string(),
                "remove",
                &e.to_string(),
            );
        }
    }

    fn move_to(&mut self, step: usize) {
        SessionLogger::log_navigation(
            self.workout_id,
            self.current_step,
            step,
            step >= self.exercises.len(),
        );
        self.current_step = step;
    }

    fn dismiss_prompt(&mut self) {
        if self.phase == SessionPhase::AwaitingConfirmation {
            self.phase = SessionPhase::Active;
        }
    }

    pub(super) fn ensure_not_submitted(&self) -> AppResult<()> {
        if self.phase == SessionPhase::Submitted {
            return Err(AppError::invalid_input(format!(
                "Workout {} has already been submitted",
                self.workout_id
            )));
        }
        Ok(())
    }
}
