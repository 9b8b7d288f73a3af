// ABOUTME: Load protocol for the workout page: find the pending workout and build its session
// ABOUTME: Redirects when there is no user, test, workout or exercise to perform
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::exercise::{join_exercises, referenced_exercise_ids};
use super::session::WorkoutSession;
use crate::constants::snapshot::DEFAULT_NAMESPACE;
use crate::context::AuthSession;
use crate::database::WorkoutStore;
use crate::errors::AppResult;
use crate::logging::SessionLogger;
use crate::snapshot::SnapshotStore;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Screen the app moves to when leaving the workout page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Sign-in screen
    Login,
    /// Training overview
    TrainingHome,
}

/// Why loading ended without a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    /// No signed-in user
    NotAuthenticated,
    /// The user has no strength test yet
    NoTest,
    /// The latest test has no workouts
    NoWorkouts,
    /// Every workout of the latest test is complete
    AllWorkoutsComplete,
    /// The pending workout lists no exercises
    NoExercises,
}

impl RedirectReason {
    /// Where to send the user
    #[must_use]
    pub const fn destination(&self) -> Destination {
        match self {
            Self::NotAuthenticated => Destination::Login,
            Self::NoTest | Self::NoWorkouts | Self::AllWorkoutsComplete | Self::NoExercises => {
                Destination::TrainingHome
            }
        }
    }

    /// Stable name for logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "not_authenticated",
            Self::NoTest => "no_test",
            Self::NoWorkouts => "no_workouts",
            Self::AllWorkoutsComplete => "all_workouts_complete",
            Self::NoExercises => "no_exercises",
        }
    }
}

impl fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful load
#[derive(Debug)]
pub enum LoadOutcome {
    /// A pending workout was found
    Ready(Box<WorkoutSession>),
    /// Nothing to perform here
    Redirect(RedirectReason),
}

/// Knobs for session loading
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Snapshot key namespace
    pub namespace: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_owned(),
        }
    }
}

/// Run the load protocol for the signed-in user.
///
/// Store reads happen in sequence: latest test, its workouts, the first
/// workout without a completion timestamp, that workout's join-records, then
/// one batched catalog lookup. Snapshot problems never fail the load.
///
/// # Errors
///
/// Returns an error if any store read fails; the error carries the user id
pub async fn load_session(
    auth: Option<&AuthSession>,
    store: &dyn WorkoutStore,
    snapshots: Arc<dyn SnapshotStore>,
    options: &SessionOptions,
) -> AppResult<LoadOutcome> {
    let Some(auth) = auth else {
        return Ok(redirect(None, RedirectReason::NotAuthenticated));
    };
    load_for_user(auth, store, snapshots, options)
        .await
        .map_err(|e| e.with_user_id(auth.user_id))
}

async fn load_for_user(
    auth: &AuthSession,
    store: &dyn WorkoutStore,
    snapshots: Arc<dyn SnapshotStore>,
    options: &SessionOptions,
) -> AppResult<LoadOutcome> {
    let user_id = auth.user_id;

    let Some(test) = store.latest_test_for_user(user_id).await? else {
        return Ok(redirect(Some(auth), RedirectReason::NoTest));
    };

    let workouts = store.workouts_for_test(test.id).await?;
    if workouts.is_empty() {
        return Ok(redirect(Some(auth), RedirectReason::NoWorkouts));
    }

    let Some(workout) = workouts.into_iter().find(|w| !w.is_completed()) else {
        return Ok(redirect(Some(auth), RedirectReason::AllWorkoutsComplete));
    };

    let records = store.user_exercises_for_workout(workout.id).await?;
    if records.is_empty() {
        return Ok(redirect(Some(auth), RedirectReason::NoExercises));
    }

    let ids = referenced_exercise_ids(&records);
    let catalog = store.catalog_exercises(&ids).await?;
    debug!(
        workout.id = %workout.id,
        records = records.len(),
        catalog = catalog.len(),
        "Joined workout exercises"
    );
    let exercises = join_exercises(&records, &catalog);

    let session = WorkoutSession::start(user_id, &workout, exercises, snapshots, &options.namespace);
    SessionLogger::log_session_ready(
        user_id,
        workout.id,
        session.exercise_count(),
        session.restored_from_snapshot(),
    );
    Ok(LoadOutcome::Ready(Box::new(session)))
}

fn redirect(auth: Option<&AuthSession>, reason: RedirectReason) -> LoadOutcome {
    SessionLogger::log_session_redirect(auth.map(|a| a.user_id), reason.as_str());
    LoadOutcome::Redirect(reason)
}
