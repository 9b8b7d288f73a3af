// ABOUTME: Domain records of the training plan as stored in the workout database
// ABOUTME: Strength tests, workouts, user exercise join-records and catalog exercises
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Training plan records.
//!
//! These mirror the rows of the hosted store. A [`StrengthTest`] owns a set of
//! [`Workout`]s; each workout lists its exercises through [`UserExercise`]
//! join-records which point at reusable [`CatalogExercise`] definitions.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether an exercise is counted in repetitions or held for seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RepsOrSeconds {
    /// Counted in repetitions
    Reps,
    /// Held for a number of seconds
    Seconds,
    /// Not recorded in the catalog
    #[default]
    Unset,
}

impl RepsOrSeconds {
    /// Convert to database string representation (`None` for unset)
    #[must_use]
    pub const fn as_db_str(&self) -> Option<&'static str> {
        match self {
            Self::Reps => Some("reps"),
            Self::Seconds => Some("seconds"),
            Self::Unset => None,
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn from_db(value: Option<&str>) -> Self {
        match value.map(str::to_lowercase).as_deref() {
            Some("reps") => Self::Reps,
            Some("seconds") => Self::Seconds,
            _ => Self::Unset,
        }
    }

    /// Unit label for display next to a target
    #[must_use]
    pub const fn unit_label(&self) -> &'static str {
        match self {
            Self::Reps => "reps",
            Self::Seconds => "sec",
            Self::Unset => "",
        }
    }
}

/// A dated record of a user's strength measurements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthTest {
    /// Unique identifier
    pub id: Uuid,
    /// Owner of the test
    pub user_id: Uuid,
    /// Day the measurements were taken
    pub test_date: NaiveDate,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// One scheduled training session belonging to a test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    /// Unique identifier
    pub id: Uuid,
    /// Test this workout was generated from
    pub test_id: Uuid,
    /// Week number in the plan
    pub week: Option<i32>,
    /// Day number within the week
    pub day: Option<i32>,
    /// Set once the workout has been submitted
    pub completed_at: Option<DateTime<Utc>>,
}

impl Workout {
    /// Whether the workout has been submitted
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// Association between a workout and a catalog exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserExercise {
    /// Unique identifier, used as the completion key
    pub id: Uuid,
    /// Workout this record belongs to
    pub workout_id: Uuid,
    /// Catalog exercise; may dangle
    pub exercise_id: Option<Uuid>,
    /// Position inside the workout
    pub order: Option<i32>,
    /// Set once every set of the exercise was done at submission
    pub completed_at: Option<DateTime<Utc>>,
}

/// Reusable definition of an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogExercise {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Prescribed set count
    pub sets: Option<i32>,
    /// Repetitions or seconds
    pub reps_or_seconds: RepsOrSeconds,
    /// Target repetitions or seconds per set
    pub duration: Option<f64>,
    /// Demonstration video URL
    pub video_link: Option<String>,
    /// Equipment needed
    pub equipment: Option<String>,
    /// Setup instructions
    pub setup: Option<String>,
    /// Form cues
    pub cues: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reps_or_seconds_parsing() {
        assert_eq!(RepsOrSeconds::from_db(Some("reps")), RepsOrSeconds::Reps);
        assert_eq!(RepsOrSeconds::from_db(Some("SECONDS")), RepsOrSeconds::Seconds);
        assert_eq!(RepsOrSeconds::from_db(Some("minutes")), RepsOrSeconds::Unset);
        assert_eq!(RepsOrSeconds::from_db(None), RepsOrSeconds::Unset);
        assert_eq!(RepsOrSeconds::Unset.as_db_str(), None);
    }
}
