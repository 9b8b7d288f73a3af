// ABOUTME: Demo training plan seeding for local development and the CLI
// ABOUTME: Creates a catalog, a strength test and a two-week workout schedule for one user
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::Database;
use crate::errors::AppResult;
use crate::models::{CatalogExercise, RepsOrSeconds, StrengthTest, UserExercise, Workout};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

/// Identifiers of a seeded plan
#[derive(Debug, Clone)]
pub struct SeededPlan {
    /// Strength test the plan belongs to
    pub test_id: Uuid,
    /// Workouts in `(week, day)` order
    pub workout_ids: Vec<Uuid>,
    /// Catalog exercise ids
    pub catalog_ids: Vec<Uuid>,
}

struct CatalogSeed {
    name: &'static str,
    sets: i32,
    unit: RepsOrSeconds,
    duration: f64,
    video: &'static str,
    equipment: &'static str,
    setup: &'static str,
    cues: &'static str,
}

const CATALOG: [CatalogSeed; 5] = [
    CatalogSeed {
        name: "Bulgarian Split Squat",
        sets: 3,
        unit: RepsOrSeconds::Reps,
        duration: 10.0,
        video: "https://vimeo.com/76979871",
        equipment: "Bench, dumbbells",
        setup: "Rear foot on the bench, front foot two steps ahead.",
        cues: "Knee tracks over toes. Drive through the front heel.",
    },
    CatalogSeed {
        name: "Hip Thrust",
        sets: 3,
        unit: RepsOrSeconds::Reps,
        duration: 12.0,
        video: "https://www.youtube.com/watch?v=SEdqd1n0cvg",
        equipment: "Bench, barbell",
        setup: "Upper back against the bench, bar over the hips.",
        cues: "Tuck the chin. Squeeze the glutes at the top.",
    },
    CatalogSeed {
        name: "Side-Lying Hip Abduction",
        sets: 2,
        unit: RepsOrSeconds::Reps,
        duration: 15.0,
        video: "https://youtu.be/jgh6sGwtTwk",
        equipment: "Mat",
        setup: "Lie on your side, bottom knee bent.",
        cues: "Lead with the heel. Keep the pelvis stacked.",
    },
    CatalogSeed {
        name: "Nordic Hamstring Curl",
        sets: 3,
        unit: RepsOrSeconds::Reps,
        duration: 5.0,
        video: "https://vimeo.com/331165544",
        equipment: "Anchor or partner",
        setup: "Kneel with ankles anchored.",
        cues: "Lower slowly with a straight line from knee to head.",
    },
    CatalogSeed {
        name: "Wall Sit",
        sets: 2,
        unit: RepsOrSeconds::Seconds,
        duration: 45.0,
        video: "",
        equipment: "Wall",
        setup: "Back flat against the wall, thighs parallel to the floor.",
        cues: "Weight in the heels. Breathe.",
    },
];

/// Workout layout: `(week, day, catalog indexes)`
const SCHEDULE: [(i32, i32, [usize; 3]); 4] = [
    (1, 1, [0, 1, 2]),
    (1, 2, [3, 4, 2]),
    (2, 1, [0, 3, 4]),
    (2, 2, [1, 2, 4]),
];

/// Seed a catalog, a strength test dated today and a two-week plan for `user_id`
///
/// # Errors
///
/// Returns an error if any insert fails
pub async fn seed_demo_plan(db: &Database, user_id: Uuid) -> AppResult<SeededPlan> {
    let mut catalog_ids = Vec::with_capacity(CATALOG.len());
    for seed in &CATALOG {
        let exercise = CatalogExercise {
            id: Uuid::new_v4(),
            name: seed.name.to_owned(),
            sets: Some(seed.sets),
            reps_or_seconds: seed.unit,
            duration: Some(seed.duration),
            video_link: Some(seed.video.to_owned()).filter(|v| !v.is_empty()),
            equipment: Some(seed.equipment.to_owned()),
            setup: Some(seed.setup.to_owned()),
            cues: Some(seed.cues.to_owned()),
        };
        db.insert_catalog_exercise(&exercise).await?;
        catalog_ids.push(exercise.id);
    }

    let now = Utc::now();
    let test = StrengthTest {
        id: Uuid::new_v4(),
        user_id,
        test_date: now.date_naive(),
        created_at: now,
    };
    db.insert_test(&test).await?;

    let mut workout_ids = Vec::with_capacity(SCHEDULE.len());
    for (week, day, exercises) in SCHEDULE {
        let workout = Workout {
            id: Uuid::new_v4(),
            test_id: test.id,
            week: Some(week),
            day: Some(day),
            completed_at: None,
        };
        db.insert_workout(&workout).await?;

        for (order, catalog_index) in (1..).zip(exercises) {
            db.insert_user_exercise(&UserExercise {
                id: Uuid::new_v4(),
                workout_id: workout.id,
                exercise_id: Some(catalog_ids[catalog_index]),
                order: Some(order),
                completed_at: None,
            })
            .await?;
        }
        workout_ids.push(workout.id);
    }

    info!(
        user.id = %user_id,
        test.id = %test.id,
        workouts = workout_ids.len(),
        "Seeded demo training plan"
    );

    Ok(SeededPlan {
        test_id: test.id,
        workout_ids,
        catalog_ids,
    })
}
