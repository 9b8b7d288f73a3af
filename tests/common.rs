// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, plan builders and instrumented store wrappers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `strength_workout`

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use strength_workout::{
    database::{Database, WorkoutStore},
    errors::{AppError, AppResult},
    models::{CatalogExercise, RepsOrSeconds, StrengthTest, UserExercise, Workout},
    snapshot::{MemorySnapshotStore, SnapshotKey, SnapshotStore},
};
use uuid::Uuid;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Catalog row with sensible defaults
pub fn catalog_exercise(name: &str, sets: Option<i32>) -> CatalogExercise {
    CatalogExercise {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        sets,
        reps_or_seconds: RepsOrSeconds::Reps,
        duration: Some(10.0),
        video_link: None,
        equipment: None,
        setup: None,
        cues: None,
    }
}

/// Insert a test for `user_id` dated today
pub async fn insert_test(db: &Database, user_id: Uuid) -> Result<StrengthTest> {
    let now = Utc::now();
    let test = StrengthTest {
        id: Uuid::new_v4(),
        user_id,
        test_date: now.date_naive(),
        created_at: now,
    };
    db.insert_test(&test).await?;
    Ok(test)
}

/// Insert a workout for `test_id`
pub async fn insert_workout(
    db: &Database,
    test_id: Uuid,
    week: Option<i32>,
    day: Option<i32>,
    completed_at: Option<DateTime<Utc>>,
) -> Result<Workout> {
    let workout = Workout {
        id: Uuid::new_v4(),
        test_id,
        week,
        day,
        completed_at,
    };
    db.insert_workout(&workout).await?;
    Ok(workout)
}

/// Insert a join-record pointing at `exercise_id`
pub async fn insert_user_exercise(
    db: &Database,
    workout_id: Uuid,
    exercise_id: Option<Uuid>,
    order: Option<i32>,
) -> Result<UserExercise> {
    let record = UserExercise {
        id: Uuid::new_v4(),
        workout_id,
        exercise_id,
        order,
        completed_at: None,
    };
    db.insert_user_exercise(&record).await?;
    Ok(record)
}

/// A user with one pending workout made of the given catalog exercises
pub struct TestPlan {
    pub user_id: Uuid,
    pub test: StrengthTest,
    pub workout: Workout,
    pub records: Vec<UserExercise>,
    pub catalog: Vec<CatalogExercise>,
}

/// Build a plan whose single pending workout lists `exercises` in order
pub async fn create_plan(db: &Database, exercises: Vec<CatalogExercise>) -> Result<TestPlan> {
    let user_id = Uuid::new_v4();
    let test = insert_test(db, user_id).await?;
    let workout = insert_workout(db, test.id, Some(1), Some(1), None).await?;

    let mut records = Vec::with_capacity(exercises.len());
    for (order, exercise) in (1..).zip(&exercises) {
        db.insert_catalog_exercise(exercise).await?;
        records.push(insert_user_exercise(db, workout.id, Some(exercise.id), Some(order)).await?);
    }

    Ok(TestPlan {
        user_id,
        test,
        workout,
        records,
        catalog: exercises,
    })
}

/// Calls observed by [`RecordingStore`]
#[derive(Debug, Default)]
pub struct StoreCalls {
    pub catalog_lookups: Vec<Vec<Uuid>>,
    pub bulk_updates: Vec<Vec<Uuid>>,
    pub workout_updates: Vec<Uuid>,
}

/// Store wrapper that records reads and writes and can fail writes on demand
pub struct RecordingStore<S> {
    inner: S,
    calls: Mutex<StoreCalls>,
    fail_bulk_update: AtomicBool,
    fail_workout_update: AtomicBool,
    fail_reads: AtomicBool,
}

impl<S: WorkoutStore> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Mutex::new(StoreCalls::default()),
            fail_bulk_update: AtomicBool::new(false),
            fail_workout_update: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn fail_bulk_update(&self, fail: bool) {
        self.fail_bulk_update.store(fail, Ordering::SeqCst);
    }

    pub fn fail_workout_update(&self, fail: bool) {
        self.fail_workout_update.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn catalog_lookups(&self) -> Vec<Vec<Uuid>> {
        self.calls.lock().unwrap().catalog_lookups.clone()
    }

    pub fn bulk_updates(&self) -> Vec<Vec<Uuid>> {
        self.calls.lock().unwrap().bulk_updates.clone()
    }

    pub fn workout_updates(&self) -> Vec<Uuid> {
        self.calls.lock().unwrap().workout_updates.clone()
    }

    fn check_reads(&self) -> AppResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::database("simulated read failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl<S: WorkoutStore> WorkoutStore for RecordingStore<S> {
    async fn latest_test_for_user(&self, user_id: Uuid) -> AppResult<Option<StrengthTest>> {
        self.check_reads()?;
        self.inner.latest_test_for_user(user_id).await
    }

    async fn workouts_for_test(&self, test_id: Uuid) -> AppResult<Vec<Workout>> {
        self.check_reads()?;
        self.inner.workouts_for_test(test_id).await
    }

    async fn user_exercises_for_workout(&self, workout_id: Uuid) -> AppResult<Vec<UserExercise>> {
        self.check_reads()?;
        self.inner.user_exercises_for_workout(workout_id).await
    }

    async fn catalog_exercises(&self, ids: &[Uuid]) -> AppResult<Vec<CatalogExercise>> {
        self.check_reads()?;
        self.calls.lock().unwrap().catalog_lookups.push(ids.to_vec());
        self.inner.catalog_exercises(ids).await
    }

    async fn mark_user_exercises_completed(
        &self,
        ids: &[Uuid],
        completed_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.calls.lock().unwrap().bulk_updates.push(ids.to_vec());
        if self.fail_bulk_update.load(Ordering::SeqCst) {
            return Err(AppError::database("simulated bulk update failure"));
        }
        self.inner
            .mark_user_exercises_completed(ids, completed_at)
            .await
    }

    async fn mark_workout_completed(
        &self,
        workout_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> AppResult<()> {
        self.calls.lock().unwrap().workout_updates.push(workout_id);
        if self.fail_workout_update.load(Ordering::SeqCst) {
            return Err(AppError::database("simulated workout update failure"));
        }
        self.inner.mark_workout_completed(workout_id, completed_at).await
    }
}

/// Snapshot store that records writes and counts removals on top of a memory store
#[derive(Debug, Default)]
pub struct RecordingSnapshotStore {
    inner: MemorySnapshotStore,
    written: Mutex<Vec<String>>,
    removes: AtomicUsize,
}

impl RecordingSnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> usize {
        self.written.lock().unwrap().len()
    }

    /// Every value written, oldest first
    pub fn written(&self) -> Vec<String> {
        self.written.lock().unwrap().clone()
    }

    pub fn removes(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }
}

impl SnapshotStore for RecordingSnapshotStore {
    fn read(&self, key: &SnapshotKey) -> AppResult<Option<String>> {
        self.inner.read(key)
    }

    fn write(&self, key: &SnapshotKey, value: &str) -> AppResult<()> {
        self.written.lock().unwrap().push(value.to_owned());
        self.inner.write(key, value)
    }

    fn remove(&self, key: &SnapshotKey) -> AppResult<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove(key)
    }
}

/// Snapshot store whose every operation fails
#[derive(Debug, Default)]
pub struct FailingSnapshotStore;

impl SnapshotStore for FailingSnapshotStore {
    fn read(&self, _key: &SnapshotKey) -> AppResult<Option<String>> {
        Err(AppError::storage("simulated snapshot read failure"))
    }

    fn write(&self, _key: &SnapshotKey, _value: &str) -> AppResult<()> {
        Err(AppError::storage("simulated snapshot write failure"))
    }

    fn remove(&self, _key: &SnapshotKey) -> AppResult<()> {
        Err(AppError::storage("simulated snapshot remove failure"))
    }
}

/// Snapshot key a session for `plan` uses with the default namespace
pub fn default_key(plan: &TestPlan) -> SnapshotKey {
    SnapshotKey::with_default_namespace(plan.user_id, plan.workout.id)
}

/// Shared memory snapshot store
pub fn memory_snapshots() -> Arc<MemorySnapshotStore> {
    Arc::new(MemorySnapshotStore::new())
}
