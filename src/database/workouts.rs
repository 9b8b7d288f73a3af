// ABOUTME: SQL queries behind the workout store: plan reads, catalog lookup, completion writes
// ABOUTME: Also provides insert and fetch helpers used by seeding, the CLI and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{parse_optional_uuid, parse_uuid, Database, WorkoutStore};
use crate::errors::{AppError, AppResult};
use crate::models::{CatalogExercise, RepsOrSeconds, StrengthTest, UserExercise, Workout};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use tracing::debug;
use uuid::Uuid;

const WORKOUT_COLUMNS: &str = "id, test_id, week, day, completed_at";
const USER_EXERCISE_COLUMNS: &str = r#"id, workout_id, exercise_id, "order", completed_at"#;
const EXERCISE_COLUMNS: &str =
    "id, name, sets, reps_seconds, duration, video_link, equipment, setup, cues";

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn row_to_test(row: &SqliteRow) -> AppResult<StrengthTest> {
    Ok(StrengthTest {
        id: parse_uuid(&row.try_get::<String, _>("id")?, "tests.id")?,
        user_id: parse_uuid(&row.try_get::<String, _>("user_id")?, "tests.user_id")?,
        test_date: row.try_get("test_date")?,
        created_at: row.try_get("created_at")?,
    })
}

fn row_to_workout(row: &SqliteRow) -> AppResult<Workout> {
    Ok(Workout {
        id: parse_uuid(&row.try_get::<String, _>("id")?, "workouts.id")?,
        test_id: parse_uuid(&row.try_get::<String, _>("test_id")?, "workouts.test_id")?,
        week: row.try_get("week")?,
        day: row.try_get("day")?,
        completed_at: row.try_get("completed_at")?,
    })
}

fn row_to_user_exercise(row: &SqliteRow) -> AppResult<UserExercise> {
    Ok(UserExercise {
        id: parse_uuid(&row.try_get::<String, _>("id")?, "user_exercises.id")?,
        workout_id: parse_uuid(
            &row.try_get::<String, _>("workout_id")?,
            "user_exercises.workout_id",
        )?,
        exercise_id: parse_optional_uuid(row.try_get("exercise_id")?, "user_exercises.exercise_id")?,
        order: row.try_get("order")?,
        completed_at: row.try_get("completed_at")?,
    })
}

fn row_to_catalog_exercise(row: &SqliteRow) -> AppResult<CatalogExercise> {
    let reps_seconds: Option<String> = row.try_get("reps_seconds")?;
    Ok(CatalogExercise {
        id: parse_uuid(&row.try_get::<String, _>("id")?, "exercises.id")?,
        name: row.try_get("name")?,
        sets: row.try_get("sets")?,
        reps_or_seconds: RepsOrSeconds::from_db(reps_seconds.as_deref()),
        duration: row.try_get("duration")?,
        video_link: row.try_get("video_link")?,
        equipment: row.try_get("equipment")?,
        setup: row.try_get("setup")?,
        cues: row.try_get("cues")?,
    })
}

#[async_trait]
impl WorkoutStore for Database {
    async fn latest_test_for_user(&self, user_id: Uuid) -> AppResult<Option<StrengthTest>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, test_date, created_at
            FROM tests
            WHERE user_id = ?
            ORDER BY test_date DESC, created_at DESC
            LIMIT 1
            ",
        )
        .bind(user_id.to_string())
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to get latest test: {e}")))?;

        row.as_ref().map(row_to_test).transpose()
    }

    async fn workouts_for_test(&self, test_id: Uuid) -> AppResult<Vec<Workout>> {
        let query = format!(
            r"
            SELECT {WORKOUT_COLUMNS}
            FROM workouts
            WHERE test_id = ?
            ORDER BY week IS NULL, week ASC, day IS NULL, day ASC, rowid ASC
            "
        );
        let rows = sqlx::query(&query)
            .bind(test_id.to_string())
            .fetch_all(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to list workouts: {e}")))?;

        rows.iter().map(row_to_workout).collect()
    }

    async fn user_exercises_for_workout(&self, workout_id: Uuid) -> AppResult<Vec<UserExercise>> {
        let query = format!(
            r#"
            SELECT {USER_EXERCISE_COLUMNS}
            FROM user_exercises
            WHERE workout_id = ?
            ORDER BY "order" IS NULL, "order" ASC, rowid ASC
            "#
        );
        let rows = sqlx::query(&query)
            .bind(workout_id.to_string())
            .fetch_all(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to list user exercises: {e}")))?;

        rows.iter().map(row_to_user_exercise).collect()
    }

    async fn catalog_exercises(&self, ids: &[Uuid]) -> AppResult<Vec<CatalogExercise>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {EXERCISE_COLUMNS} FROM exercises WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut sql_query = sqlx::query(&query);
        for id in ids {
            sql_query = sql_query.bind(id.to_string());
        }
        let rows = sql_query
            .fetch_all(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to look up exercises: {e}")))?;

        debug!(requested = ids.len(), found = rows.len(), "Catalog lookup");
        rows.iter().map(row_to_catalog_exercise).collect()
    }

    async fn mark_user_exercises_completed(
        &self,
        ids: &[Uuid],
        completed_at: DateTime<Utc>,
    ) -> AppResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let query = format!(
            "UPDATE user_exercises SET completed_at = ? WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut sql_query = sqlx::query(&query).bind(completed_at);
        for id in ids {
            sql_query = sql_query.bind(id.to_string());
        }
        let result = sql_query
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to complete user exercises: {e}")))?;

        debug!(
            requested = ids.len(),
            updated = result.rows_affected(),
            "User exercises marked complete"
        );
        Ok(())
    }

    async fn mark_workout_completed(
        &self,
        workout_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let result = sqlx::query("UPDATE workouts SET completed_at = ? WHERE id = ?")
            .bind(completed_at)
            .bind(workout_id.to_string())
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to complete workout: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Workout {workout_id}")));
        }
        Ok(())
    }
}

impl Database {
    /// Insert a strength test
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert_test(&self, test: &StrengthTest) -> AppResult<()> {
        sqlx::query("INSERT INTO tests (id, user_id, test_date, created_at) VALUES (?, ?, ?, ?)")
            .bind(test.id.to_string())
            .bind(test.user_id.to_string())
            .bind(test.test_date)
            .bind(test.created_at)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to insert test: {e}")))?;
        Ok(())
    }

    /// Insert a workout
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert_workout(&self, workout: &Workout) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO workouts (id, test_id, week, day, completed_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(workout.id.to_string())
        .bind(workout.test_id.to_string())
        .bind(workout.week)
        .bind(workout.day)
        .bind(workout.completed_at)
        .execute(self.pool())
        .await
        .map_err(|e| AppError::database(format!("Failed to insert workout: {e}")))?;
        Ok(())
    }

    /// Insert a catalog exercise
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert_catalog_exercise(&self, exercise: &CatalogExercise) -> AppResult<()> {
        let query = format!(
            "INSERT INTO exercises ({EXERCISE_COLUMNS}) VALUES ({})",
            placeholders(9)
        );
        sqlx::query(&query)
            .bind(exercise.id.to_string())
            .bind(&exercise.name)
            .bind(exercise.sets)
            .bind(exercise.reps_or_seconds.as_db_str())
            .bind(exercise.duration)
            .bind(&exercise.video_link)
            .bind(&exercise.equipment)
            .bind(&exercise.setup)
            .bind(&exercise.cues)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to insert exercise: {e}")))?;
        Ok(())
    }

    /// Insert a workout/exercise join-record
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn insert_user_exercise(&self, record: &UserExercise) -> AppResult<()> {
        let query = format!(
            "INSERT INTO user_exercises ({USER_EXERCISE_COLUMNS}) VALUES ({})",
            placeholders(5)
        );
        sqlx::query(&query)
            .bind(record.id.to_string())
            .bind(record.workout_id.to_string())
            .bind(record.exercise_id.map(|id| id.to_string()))
            .bind(record.order)
            .bind(record.completed_at)
            .execute(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to insert user exercise: {e}")))?;
        Ok(())
    }

    /// Fetch one workout
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_workout(&self, workout_id: Uuid) -> AppResult<Option<Workout>> {
        let query = format!("SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(workout_id.to_string())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to get workout: {e}")))?;
        row.as_ref().map(row_to_workout).transpose()
    }

    /// Fetch one join-record
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get_user_exercise(&self, id: Uuid) -> AppResult<Option<UserExercise>> {
        let query = format!("SELECT {USER_EXERCISE_COLUMNS} FROM user_exercises WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| AppError::database(format!("Failed to get user exercise: {e}")))?;
        row.as_ref().map(row_to_user_exercise).transpose()
    }
}
