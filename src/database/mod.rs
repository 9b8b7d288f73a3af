// ABOUTME: Workout store abstraction and the SQLite-backed implementation
// ABOUTME: Reads tests, workouts, join-records and catalog rows; writes completion timestamps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Workout Store
//!
//! [`WorkoutStore`] is the narrow interface the workout session needs from the
//! training-plan store. [`Database`] implements it on top of a `sqlx` SQLite
//! pool whose tables mirror the hosted schema (`tests`, `workouts`,
//! `exercises`, `user_exercises`).

mod seed;
mod workouts;

pub use seed::{seed_demo_plan, SeededPlan};

use crate::errors::{AppError, AppResult};
use crate::models::{CatalogExercise, StrengthTest, UserExercise, Workout};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

/// Training-plan operations consumed by a workout session.
///
/// Implementations scope every call to the authenticated user.
#[async_trait]
pub trait WorkoutStore: Send + Sync {
    /// Most recent strength test of a user
    async fn latest_test_for_user(&self, user_id: Uuid) -> AppResult<Option<StrengthTest>>;

    /// Workouts of a test ordered by `(week, day)`
    async fn workouts_for_test(&self, test_id: Uuid) -> AppResult<Vec<Workout>>;

    /// Join-records of a workout ordered by their `order` field
    async fn user_exercises_for_workout(&self, workout_id: Uuid) -> AppResult<Vec<UserExercise>>;

    /// Catalog rows for a set of ids in a single lookup. Unknown ids are skipped.
    async fn catalog_exercises(&self, ids: &[Uuid]) -> AppResult<Vec<CatalogExercise>>;

    /// Set `completed_at` on every listed join-record
    async fn mark_user_exercises_completed(
        &self,
        ids: &[Uuid],
        completed_at: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Set `completed_at` on one workout
    async fn mark_workout_completed(
        &self,
        workout_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> AppResult<()>;
}

/// SQLite-backed training-plan store
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails or migrations fail
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let is_memory = database_url.contains(":memory:");
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL {database_url}: {e}")))?
            .create_if_missing(true);

        // Every pooled connection to `:memory:` would open its own empty database.
        let max_connections = if is_memory { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to {database_url}: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(database.url = %database_url, "Workout database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and indexes if missing
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        let statements = [
            r"
            CREATE TABLE IF NOT EXISTS tests (
                id TEXT PRIMARY KEY,
                user_id TEXT,
                test_date TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                sets INTEGER,
                reps_seconds TEXT CHECK (reps_seconds IN ('reps', 'seconds')),
                duration REAL,
                video_link TEXT,
                equipment TEXT,
                setup TEXT,
                cues TEXT
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id TEXT PRIMARY KEY,
                test_id TEXT REFERENCES tests(id) ON DELETE CASCADE,
                week INTEGER,
                day INTEGER,
                completed_at TEXT
            )
            ",
            // no foreign key on exercise_id: join-records may reference missing catalog rows
            r#"
            CREATE TABLE IF NOT EXISTS user_exercises (
                id TEXT PRIMARY KEY,
                workout_id TEXT REFERENCES workouts(id) ON DELETE CASCADE,
                exercise_id TEXT,
                "order" INTEGER,
                completed_at TEXT
            )
            "#,
            "CREATE INDEX IF NOT EXISTS idx_tests_user ON tests(user_id, test_date)",
            "CREATE INDEX IF NOT EXISTS idx_workouts_test ON workouts(test_id, week, day)",
            "CREATE INDEX IF NOT EXISTS idx_user_exercises_workout ON user_exercises(workout_id)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        debug!("Workout schema migrated");
        Ok(())
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| AppError::database(format!("Invalid UUID in column {column}: {e}")))
}

pub(crate) fn parse_optional_uuid(value: Option<String>, column: &str) -> AppResult<Option<Uuid>> {
    value.as_deref().map(|v| parse_uuid(v, column)).transpose()
}
