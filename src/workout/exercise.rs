// ABOUTME: Session view of one exercise, built by joining join-records with catalog rows
// ABOUTME: Applies placeholder name and default set count for dangling or incomplete rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::session::{DEFAULT_SETS, PLACEHOLDER_EXERCISE_NAME};
use crate::models::{CatalogExercise, RepsOrSeconds, UserExercise};
use crate::video;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// One exercise as performed in a session. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseInSession {
    /// Join-record id; completion key and write-back key
    pub user_exercise_id: Uuid,
    /// Catalog reference, if any
    pub exercise_id: Option<Uuid>,
    /// Display name
    pub name: String,
    /// Number of sets, always at least one
    pub sets: u32,
    /// Repetitions or seconds
    pub reps_or_seconds: RepsOrSeconds,
    /// Target per set
    pub duration: Option<f64>,
    /// Demonstration video URL as stored
    pub video_link: Option<String>,
    /// Equipment needed
    pub equipment: Option<String>,
    /// Setup instructions
    pub setup: Option<String>,
    /// Form cues
    pub cues: Option<String>,
}

impl ExerciseInSession {
    /// Build from a join-record and its catalog row (if the reference resolved)
    #[must_use]
    pub fn from_records(record: &UserExercise, catalog: Option<&CatalogExercise>) -> Self {
        let Some(catalog) = catalog else {
            return Self::placeholder(record);
        };
        Self {
            user_exercise_id: record.id,
            exercise_id: record.exercise_id,
            name: catalog.name.clone(),
            sets: normalize_sets(catalog.sets),
            reps_or_seconds: catalog.reps_or_seconds,
            duration: catalog.duration,
            video_link: catalog.video_link.clone(),
            equipment: catalog.equipment.clone(),
            setup: catalog.setup.clone(),
            cues: catalog.cues.clone(),
        }
    }

    fn placeholder(record: &UserExercise) -> Self {
        Self {
            user_exercise_id: record.id,
            exercise_id: record.exercise_id,
            name: PLACEHOLDER_EXERCISE_NAME.to_owned(),
            sets: DEFAULT_SETS,
            reps_or_seconds: RepsOrSeconds::Unset,
            duration: None,
            video_link: None,
            equipment: None,
            setup: None,
            cues: None,
        }
    }

    /// Embeddable player URL for the demonstration video
    #[must_use]
    pub fn video_embed_url(&self) -> Option<String> {
        video::embed_url(self.video_link.as_deref())
    }

    /// Per-set target such as `"10 reps"` or `"30 sec"`
    #[must_use]
    pub fn target_label(&self) -> Option<String> {
        let duration = self.duration?;
        let amount = if duration.fract() == 0.0 {
            format!("{duration:.0}")
        } else {
            format!("{duration}")
        };
        match self.reps_or_seconds.unit_label() {
            "" => Some(amount),
            unit => Some(format!("{amount} {unit}")),
        }
    }
}

fn normalize_sets(sets: Option<i32>) -> u32 {
    match sets {
        Some(n) if n > 0 => n as u32,
        _ => DEFAULT_SETS,
    }
}

/// Left-join ordered join-records with catalog rows.
///
/// Output order follows `records`; records whose catalog row is missing get
/// placeholder values.
#[must_use]
pub fn join_exercises(
    records: &[UserExercise],
    catalog: &[CatalogExercise],
) -> Vec<ExerciseInSession> {
    let by_id: HashMap<Uuid, &CatalogExercise> = catalog.iter().map(|c| (c.id, c)).collect();
    records
        .iter()
        .map(|record| {
            let row = record.exercise_id.and_then(|id| by_id.get(&id).copied());
            ExerciseInSession::from_records(record, row)
        })
        .collect()
}

/// Distinct catalog ids referenced by `records`, in first-seen order
#[must_use]
pub fn referenced_exercise_ids(records: &[UserExercise]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = Vec::with_capacity(records.len());
    for id in records.iter().filter_map(|r| r.exercise_id) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
