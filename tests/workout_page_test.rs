// ABOUTME: Integration tests for the workout page state machine
// ABOUTME: Covers notices, error state, redirects and reacting to auth changes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{catalog_exercise, create_plan, create_test_database, RecordingSnapshotStore, RecordingStore};
use std::sync::Arc;
use strength_workout::{
    context::{AuthContext, AuthSession},
    workout::{
        Destination, NoticeKind, PageState, SessionOptions, SubmitResult, WorkoutPage,
        WorkoutSession,
    },
};
use uuid::Uuid;

fn go_to_review(session: &mut WorkoutSession) {
    while !session.is_review() {
        session.go_next();
    }
}

#[tokio::test]
async fn test_page_reports_notices_and_leaves_on_success() -> Result<()> {
    let db = create_test_database().await?;
    let plan = create_plan(
        &db,
        vec![catalog_exercise("A", Some(2)), catalog_exercise("B", Some(3))],
    )
    .await?;
    let store = RecordingStore::new(db);
    let auth = AuthContext::signed_in(AuthSession::new(plan.user_id));
    let mut page = WorkoutPage::open(
        &auth,
        &store,
        Arc::new(RecordingSnapshotStore::new()),
        &SessionOptions::default(),
    )
    .await;

    let session = page.session_mut().unwrap();
    go_to_review(session);

    store.fail_workout_update(true);
    assert_eq!(page.submit(&store).await, SubmitResult::NeedsConfirmation);
    assert_eq!(page.confirm_submit(&store).await, SubmitResult::Failed);
    let notices = page.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert!(matches!(page.state(), PageState::Ready(_)));

    store.fail_workout_update(false);
    assert_eq!(page.submit(&store).await, SubmitResult::NeedsConfirmation);
    assert!(matches!(
        page.confirm_submit(&store).await,
        SubmitResult::Submitted(_)
    ));
    assert_eq!(page.destination(), Some(Destination::TrainingHome));
    let notices = page.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Success);

    // A second press after leaving writes nothing
    assert_eq!(page.confirm_submit(&store).await, SubmitResult::Ignored);
    assert_eq!(store.workout_updates().len(), 2);
    assert_eq!(auth.subscriber_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_page_load_failure_shows_error_state() -> Result<()> {
    let db = create_test_database().await?;
    let plan = create_plan(&db, vec![catalog_exercise("A", Some(2))]).await?;
    let store = RecordingStore::new(db);
    store.fail_reads(true);

    let auth = AuthContext::signed_in(AuthSession::new(plan.user_id));
    let mut page = WorkoutPage::open(
        &auth,
        &store,
        Arc::new(RecordingSnapshotStore::new()),
        &SessionOptions::default(),
    )
    .await;

    assert!(matches!(page.state(), PageState::Error { .. }));
    assert_eq!(page.take_notices().len(), 1);
    assert_eq!(page.submit(&store).await, SubmitResult::Ignored);

    page.return_to_training();
    assert_eq!(page.destination(), Some(Destination::TrainingHome));
    Ok(())
}

#[tokio::test]
async fn test_page_redirects_anonymous_user() -> Result<()> {
    let db = create_test_database().await?;
    let auth = AuthContext::new();
    let page = WorkoutPage::open(
        &auth,
        &db,
        Arc::new(RecordingSnapshotStore::new()),
        &SessionOptions::default(),
    )
    .await;
    assert_eq!(page.destination(), Some(Destination::Login));
    assert_eq!(auth.subscriber_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_sign_out_sends_page_to_login_without_writing() -> Result<()> {
    let db = create_test_database().await?;
    let plan = create_plan(&db, vec![catalog_exercise("A", Some(1))]).await?;
    let store = RecordingStore::new(db);
    let auth = AuthContext::signed_in(AuthSession::new(plan.user_id));
    let mut page = WorkoutPage::open(
        &auth,
        &store,
        Arc::new(RecordingSnapshotStore::new()),
        &SessionOptions::default(),
    )
    .await;
    assert_eq!(auth.subscriber_count(), 1);

    let session = page.session_mut().unwrap();
    session.toggle_set(plan.records[0].id, 0)?;
    go_to_review(session);
    assert!(!page.sync_auth());

    auth.sign_out();
    assert_eq!(page.submit(&store).await, SubmitResult::Ignored);
    assert_eq!(page.destination(), Some(Destination::Login));
    assert!(store.bulk_updates().is_empty());
    assert!(store.workout_updates().is_empty());
    assert_eq!(auth.subscriber_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_switching_user_leaves_page() -> Result<()> {
    let db = create_test_database().await?;
    let plan = create_plan(&db, vec![catalog_exercise("A", Some(1))]).await?;
    let auth = AuthContext::signed_in(AuthSession::new(plan.user_id));
    let mut page = WorkoutPage::open(
        &auth,
        &db,
        Arc::new(RecordingSnapshotStore::new()),
        &SessionOptions::default(),
    )
    .await;

    // Re-signing the same user keeps the session
    auth.sign_in(AuthSession::new(plan.user_id));
    assert!(!page.sync_auth());
    assert!(page.session().is_some());

    auth.sign_in(AuthSession::new(Uuid::new_v4()));
    assert!(page.sync_auth());
    assert_eq!(page.destination(), Some(Destination::Login));
    Ok(())
}

#[tokio::test]
async fn test_dropping_page_unsubscribes() -> Result<()> {
    let db = create_test_database().await?;
    let plan = create_plan(&db, vec![catalog_exercise("A", Some(1))]).await?;
    let auth = AuthContext::signed_in(AuthSession::new(plan.user_id));
    let page = WorkoutPage::open(
        &auth,
        &db,
        Arc::new(RecordingSnapshotStore::new()),
        &SessionOptions::default(),
    )
    .await;
    assert!(page.session().is_some());
    assert_eq!(auth.subscriber_count(), 1);

    drop(page);
    assert_eq!(auth.subscriber_count(), 0);
    Ok(())
}
