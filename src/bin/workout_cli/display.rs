// ABOUTME: Output formatting helpers for workout-cli
// ABOUTME: Renders sessions, review rows, notices and submission receipts as plain text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use strength_workout::{
    database::SeededPlan,
    workout::{
        Destination, Notice, NoticeKind, RedirectReason, Step, SubmitReceipt, WorkoutSession,
    },
};
use uuid::Uuid;

pub fn seeded_plan(user_id: Uuid, plan: &SeededPlan) {
    println!("Seeded demo plan");
    println!("{}", "=".repeat(60));
    println!("   User:      {user_id}");
    println!("   Test:      {}", plan.test_id);
    println!("   Workouts:  {}", plan.workout_ids.len());
    println!("   Exercises: {}", plan.catalog_ids.len());
    println!("\nNext: workout-cli --user {user_id} status");
}

pub fn session(session: &WorkoutSession) {
    let week = session.week().map_or_else(|| "-".to_owned(), |w| w.to_string());
    let day = session.day().map_or_else(|| "-".to_owned(), |d| d.to_string());
    println!("Workout {} (week {week}, day {day})", session.workout_id());
    if session.restored_from_snapshot() {
        println!("   Progress restored from the last visit");
    }
    println!("{}", "=".repeat(60));

    for (index, exercise) in session.exercises().iter().enumerate() {
        let marker = if session.step() == Step::Exercise(index) {
            ">"
        } else {
            " "
        };
        let flags = session
            .completion()
            .flags(exercise.user_exercise_id)
            .unwrap_or_default();
        let sets: String = flags.iter().map(|done| if *done { 'x' } else { '.' }).collect();
        let target = exercise.target_label().unwrap_or_default();
        println!(
            "{marker} {}. {:<28} [{sets}] {target}",
            index + 1,
            exercise.name
        );
        println!("     id: {}", exercise.user_exercise_id);
        if let Some(url) = exercise.video_embed_url() {
            println!("     video: {url}");
        }
    }

    let summary = session.review_summary();
    let done = summary.iter().filter(|row| row.complete).count();
    println!("{}", "=".repeat(60));
    println!("{done}/{} exercises complete", summary.len());
}

pub fn toggled(session: &WorkoutSession, user_exercise_id: Uuid, set_index: usize, done: bool) {
    let name = session
        .exercises()
        .iter()
        .find(|e| e.user_exercise_id == user_exercise_id)
        .map_or("Exercise", |e| e.name.as_str());
    println!(
        "{name}: set {} {}",
        set_index + 1,
        if done { "done" } else { "not done" }
    );
    if session.is_exercise_complete(user_exercise_id) {
        println!("   All sets complete");
    }
}

pub fn incomplete(session: &WorkoutSession) {
    println!("Some exercises are not finished:");
    for row in session.review_summary().iter().filter(|row| !row.complete) {
        println!(
            "   {} ({}/{} sets)",
            row.name, row.completed_sets, row.total_sets
        );
    }
}

pub fn notice(notice: &Notice) {
    let label = match notice.kind {
        NoticeKind::Success => "OK",
        NoticeKind::Error => "ERROR",
    };
    println!("[{label}] {}: {}", notice.title, notice.message);
}

pub fn receipt(receipt: &SubmitReceipt) {
    println!(
        "Workout {} completed at {}",
        receipt.workout_id,
        receipt.completed_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!(
        "   Exercises marked complete: {}",
        receipt.completed_exercise_ids.len()
    );
    left(receipt.navigate_to);
}

pub fn redirect(reason: RedirectReason) {
    let message = match reason {
        RedirectReason::NotAuthenticated => "Not signed in. Pass --user <uuid>.",
        RedirectReason::NoTest => "No strength test found for this user.",
        RedirectReason::NoWorkouts => "The latest strength test has no workouts.",
        RedirectReason::AllWorkoutsComplete => "Every workout of the latest test is complete.",
        RedirectReason::NoExercises => "The pending workout has no exercises.",
    };
    println!("{message}");
    left(reason.destination());
}

pub fn left(destination: Destination) {
    let screen = match destination {
        Destination::Login => "login",
        Destination::TrainingHome => "training home",
    };
    println!("-> {screen}");
}
