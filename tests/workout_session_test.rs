// ABOUTME: Integration tests for set toggling, snapshot write-through and navigation
// ABOUTME: Exercises a loaded session against in-memory and failing snapshot stores
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use common::{
    catalog_exercise, create_plan, create_test_database, default_key, FailingSnapshotStore,
    RecordingSnapshotStore, TestPlan,
};
use std::sync::Arc;
use strength_workout::{
    context::AuthSession,
    database::Database,
    errors::ErrorCode,
    snapshot::SnapshotStore,
    workout::{load_session, CompletionState, LoadOutcome, SessionOptions, Step, WorkoutSession},
};
use uuid::Uuid;

async fn load(
    db: &Database,
    plan: &TestPlan,
    snapshots: Arc<dyn SnapshotStore>,
) -> Result<Box<WorkoutSession>> {
    let auth = AuthSession::new(plan.user_id);
    match load_session(Some(&auth), db, snapshots, &SessionOptions::default()).await? {
        LoadOutcome::Ready(session) => Ok(session),
        LoadOutcome::Redirect(reason) => panic!("unexpected redirect {reason}"),
    }
}

#[tokio::test]
async fn test_toggle_twice_restores_state_and_writes_each_time() -> Result<()> {
    let db = create_test_database().await?;
    let plan = create_plan(&db, vec![catalog_exercise("A", Some(3))]).await?;
    let snapshots = Arc::new(RecordingSnapshotStore::new());
    let mut session = load(&db, &plan, snapshots.clone()).await?;
    let id = plan.records[0].id;
    let before = session.completion().clone();

    assert!(session.toggle_set(id, 1)?);
    assert_eq!(session.completion().flags(id).unwrap(), &[false, true, false]);
    assert!(!session.toggle_set(id, 1)?);

    assert_eq!(session.completion(), &before);
    let written = snapshots.written();
    assert_eq!(written.len(), 2);

    let first = CompletionState::from_snapshot(&written[0]).unwrap();
    assert_eq!(first.flags(id).unwrap(), &[false, true, false]);
    let second = CompletionState::from_snapshot(&written[1]).unwrap();
    assert_eq!(second.flags(id).unwrap(), &[false, false, false]);
    assert_eq!(
        written[1],
        format!(r#"{{"completion":{{"{id}":[false,false,false]}}}}"#)
    );
    Ok(())
}

#[tokio::test]
async fn test_snapshot_mirrors_completion_and_survives_reload() -> Result<()> {
    let db = create_test_database().await?;
    let plan = create_plan(
        &db,
        vec![catalog_exercise("A", Some(2)), catalog_exercise("B", Some(2))],
    )
    .await?;
    let snapshots = Arc::new(RecordingSnapshotStore::new());
    let (a, b) = (plan.records[0].id, plan.records[1].id);

    {
        let mut session = load(&db, &plan, snapshots.clone()).await?;
        session.toggle_set(a, 0)?;
        session.toggle_set(a, 1)?;
        session.toggle_set(b, 0)?;

        let raw = snapshots.read(&default_key(&plan))?.unwrap();
        let stored = CompletionState::from_snapshot(&raw).unwrap();
        assert_eq!(&stored, session.completion());
    }

    let session = load(&db, &plan, snapshots).await?;
    assert!(session.restored_from_snapshot());
    assert!(session.is_exercise_complete(a));
    assert_eq!(session.completion().flags(b).unwrap(), &[true, false]);
    assert_eq!(session.step(), Step::Exercise(1));
    Ok(())
}

#[tokio::test]
async fn test_out_of_range_toggle_is_rejected_without_side_effects() -> Result<()> {
    let db = create_test_database().await?;
    let plan = create_plan(&db, vec![catalog_exercise("A", Some(2))]).await?;
    let snapshots = Arc::new(RecordingSnapshotStore::new());
    let mut session = load(&db, &plan, snapshots.clone()).await?;
    let before = session.completion().clone();

    let err = session.toggle_set(plan.records[0].id, 2).unwrap_err();
    assert_eq!(err.code, ErrorCode::ValueOutOfRange);

    let err = session.toggle_set(Uuid::new_v4(), 0).unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    assert_eq!(session.completion(), &before);
    assert_eq!(snapshots.writes(), 0);
    Ok(())
}

#[tokio::test]
async fn test_failing_snapshot_store_keeps_in_memory_state() -> Result<()> {
    let db = create_test_database().await?;
    let plan = create_plan(&db, vec![catalog_exercise("A", Some(1))]).await?;
    let mut session = load(&db, &plan, Arc::new(FailingSnapshotStore)).await?;
    let id = plan.records[0].id;

    assert!(session.toggle_set(id, 0)?);
    assert!(session.is_exercise_complete(id));
    assert!(session.all_complete());
    Ok(())
}

#[tokio::test]
async fn test_navigation_reaches_review_and_back() -> Result<()> {
    let db = create_test_database().await?;
    let plan = create_plan(
        &db,
        vec![
            catalog_exercise("A", Some(1)),
            catalog_exercise("B", Some(1)),
            catalog_exercise("C", Some(1)),
        ],
    )
    .await?;
    let mut session = load(&db, &plan, Arc::new(RecordingSnapshotStore::new())).await?;

    session.go_next();
    session.go_next();
    assert_eq!(session.step(), Step::Exercise(2));
    session.go_next();
    assert!(session.is_review());
    assert_eq!(session.current_step(), session.exercise_count());
    session.go_next();
    assert!(session.is_review());

    session.go_prev();
    assert_eq!(session.step(), Step::Exercise(2));

    // Review rows jump back to their exercise
    let summary = session.review_summary();
    assert!(session.jump_to(summary[0].index));
    assert_eq!(session.step(), Step::Exercise(0));
    session.go_prev();
    assert_eq!(session.step(), Step::Exercise(0));

    assert!(!session.jump_to(3));
    assert_eq!(session.step(), Step::Exercise(0));
    Ok(())
}

#[tokio::test]
async fn test_forward_emphasis_follows_current_exercise() -> Result<()> {
    let db = create_test_database().await?;
    let plan = create_plan(
        &db,
        vec![catalog_exercise("A", Some(2)), catalog_exercise("B", Some(1))],
    )
    .await?;
    let mut session = load(&db, &plan, Arc::new(RecordingSnapshotStore::new())).await?;
    let a = plan.records[0].id;

    session.toggle_set(a, 0)?;
    assert!(!session.forward_is_primary());
    session.toggle_set(a, 1)?;
    assert!(session.forward_is_primary());

    session.go_next();
    assert!(!session.forward_is_primary());
    Ok(())
}
