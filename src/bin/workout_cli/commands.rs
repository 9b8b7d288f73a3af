// ABOUTME: Subcommand implementations for workout-cli
// ABOUTME: Each command loads the pending workout through the same path the page uses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use strength_workout::{
    context::AuthContext,
    database::{seed_demo_plan, Database},
    errors::{AppError, AppResult},
    snapshot::SnapshotStore,
    workout::{
        load_session, LoadOutcome, PageState, SessionOptions, SubmitResult, WorkoutPage,
        WorkoutSession,
    },
};
use tracing::info;
use uuid::Uuid;

use crate::display;

/// Seed a demo plan for the signed-in user, or for a fresh user id when nobody is
pub async fn seed(database: &Database, auth: &AuthContext) -> AppResult<()> {
    let user_id = auth.current().map_or_else(Uuid::new_v4, |session| session.user_id);
    info!("Seeding demo plan for user {}", user_id);
    let plan = seed_demo_plan(database, user_id).await?;
    display::seeded_plan(user_id, &plan);
    Ok(())
}

/// Print the pending workout
pub async fn status(
    database: &Database,
    snapshots: Arc<dyn SnapshotStore>,
    options: &SessionOptions,
    auth: &AuthContext,
) -> AppResult<()> {
    if let Some(session) = load(database, snapshots, options, auth).await? {
        display::session(&session);
    }
    Ok(())
}

/// Flip one set and print the exercise
pub async fn toggle(
    database: &Database,
    snapshots: Arc<dyn SnapshotStore>,
    options: &SessionOptions,
    auth: &AuthContext,
    user_exercise_id: Uuid,
    set_index: usize,
) -> AppResult<()> {
    let Some(mut session) = load(database, snapshots, options, auth).await? else {
        return Ok(());
    };
    let done = session.toggle_set(user_exercise_id, set_index)?;
    display::toggled(&session, user_exercise_id, set_index, done);
    Ok(())
}

/// Move to review and submit, confirming unfinished workouts when asked to
pub async fn submit(
    database: &Database,
    snapshots: Arc<dyn SnapshotStore>,
    options: &SessionOptions,
    auth: &AuthContext,
    confirm: bool,
) -> AppResult<()> {
    let mut page = WorkoutPage::open(auth, database, snapshots, options).await;

    match page.state() {
        PageState::Ready(_) => {}
        PageState::Left(destination) => {
            display::left(*destination);
            return Ok(());
        }
        PageState::Error { notice } => {
            return Err(AppError::internal(notice.message.clone()));
        }
        PageState::Loading => return Ok(()),
    }

    if let Some(session) = page.session_mut() {
        while !session.is_review() {
            session.go_next();
        }
    }

    let mut result = page.submit(database).await;
    if result == SubmitResult::NeedsConfirmation {
        if let Some(session) = page.session() {
            display::incomplete(session);
        }
        if confirm {
            result = page.confirm_submit(database).await;
        } else {
            page.cancel_submit();
            println!("Re-run with --confirm to submit anyway.");
        }
    }

    for notice in page.take_notices() {
        display::notice(&notice);
    }

    match result {
        SubmitResult::Submitted(receipt) => {
            display::receipt(&receipt);
            Ok(())
        }
        SubmitResult::Failed => Err(AppError::internal("Workout submission failed")),
        SubmitResult::NeedsConfirmation | SubmitResult::Ignored => Ok(()),
    }
}

async fn load(
    database: &Database,
    snapshots: Arc<dyn SnapshotStore>,
    options: &SessionOptions,
    auth: &AuthContext,
) -> AppResult<Option<Box<WorkoutSession>>> {
    match load_session(auth.current().as_ref(), database, snapshots, options).await? {
        LoadOutcome::Ready(session) => Ok(Some(session)),
        LoadOutcome::Redirect(reason) => {
            display::redirect(reason);
            Ok(None)
        }
    }
}
