// ABOUTME: Submission protocol: incomplete-workout confirmation and completion write-back
// ABOUTME: Marks fully done exercises and the workout complete, then clears the snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Workout submission.
//!
//! Writes go out in two calls: one bulk update for every fully completed
//! join-record, then the workout itself. The first call is not undone if the
//! second fails. Both set an absolute timestamp, so retrying after a failure
//! re-sends the first call without changing its effect.

use super::loader::Destination;
use super::session::{SessionPhase, WorkoutSession};
use crate::database::WorkoutStore;
use crate::errors::{AppError, AppResult};
use crate::logging::SessionLogger;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// What happened when submit was pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Some exercises are unfinished; the user must confirm or cancel
    ConfirmationRequired {
        /// Join-records with sets left, in session order
        incomplete: Vec<Uuid>,
    },
    /// Completion was written back
    Submitted(SubmitReceipt),
}

/// Record of a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitReceipt {
    /// Workout marked complete
    pub workout_id: Uuid,
    /// Timestamp written to the store
    pub completed_at: DateTime<Utc>,
    /// Join-records marked complete
    pub completed_exercise_ids: Vec<Uuid>,
    /// Whether every exercise was finished
    pub all_complete: bool,
    /// Where to go next
    pub navigate_to: Destination,
}

impl WorkoutSession {
    /// Press submit on the review step.
    ///
    /// With unfinished exercises this opens the confirmation prompt and writes
    /// nothing; otherwise it writes completion back.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is not on the review step, was already
    /// submitted, or a store write fails. On a store failure the completion
    /// state and snapshot are unchanged and submit may be retried.
    pub async fn submit(&mut self, store: &dyn WorkoutStore) -> AppResult<SubmitOutcome> {
        self.ensure_submittable()?;
        if !self.all_complete() {
            self.phase = SessionPhase::AwaitingConfirmation;
            return Ok(SubmitOutcome::ConfirmationRequired {
                incomplete: self.incomplete_user_exercise_ids(),
            });
        }
        self.write_back(store).await.map(SubmitOutcome::Submitted)
    }

    /// Confirm submission of an unfinished workout.
    ///
    /// # Errors
    ///
    /// Returns an error if no confirmation is pending or a store write fails.
    /// After a store failure the prompt is closed and submit may be pressed again.
    pub async fn confirm_submit(&mut self, store: &dyn WorkoutStore) -> AppResult<SubmitReceipt> {
        if self.phase != SessionPhase::AwaitingConfirmation {
            return Err(AppError::invalid_input(
                "No incomplete-workout confirmation is pending",
            ));
        }
        self.ensure_submittable()?;
        self.write_back(store).await
    }

    /// Close the confirmation prompt without submitting
    pub fn cancel_submit(&mut self) {
        if self.phase == SessionPhase::AwaitingConfirmation {
            self.phase = SessionPhase::Active;
        }
    }

    fn ensure_submittable(&self) -> AppResult<()> {
        self.ensure_not_submitted()?;
        if !self.is_review() {
            return Err(AppError::invalid_input(
                "Workout can only be submitted from the review step",
            ));
        }
        Ok(())
    }

    async fn write_back(&mut self, store: &dyn WorkoutStore) -> AppResult<SubmitReceipt> {
        let completed_at = Utc::now();
        let completed = self.completed_user_exercise_ids();
        let all_complete = completed.len() == self.exercise_count();

        let result = async {
            if !completed.is_empty() {
                store
                    .mark_user_exercises_completed(&completed, completed_at)
                    .await?;
            }
            store
                .mark_workout_completed(self.workout_id(), completed_at)
                .await
        }
        .await;

        if let Err(e) = result {
            self.phase = SessionPhase::Active;
            SessionLogger::log_submission(
                self.workout_id(),
                completed.len(),
                self.exercise_count(),
                false,
            );
            return Err(e.with_resource_id(self.workout_id().to_string()));
        }

        self.clear_snapshot();
        self.phase = SessionPhase::Submitted;
        SessionLogger::log_submission(
            self.workout_id(),
            completed.len(),
            self.exercise_count(),
            true,
        );

        Ok(SubmitReceipt {
            workout_id: self.workout_id(),
            completed_at,
            completed_exercise_ids: completed,
            all_complete,
            navigate_to: Destination::TrainingHome,
        })
    }
}
