// ABOUTME: Workout execution module: loading, per-set tracking, navigation and submission
// ABOUTME: Re-exports the session state machine and the page wrapper around it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Workout execution
//!
//! Loading a session ([`load_session`]) picks the first pending workout of the
//! user's latest strength test and joins its exercises. The resulting
//! [`WorkoutSession`] tracks per-set completion, the exercise cursor and the
//! submission flow. [`WorkoutPage`] wraps the whole lifecycle and turns errors
//! into notices.

/// Per-set completion flags
pub mod completion;
/// Exercises as shown during a session
pub mod exercise;
/// Load protocol and redirects
pub mod loader;
/// Page-level state machine
pub mod page;
/// Session state and navigation
pub mod session;
/// Submission protocol
pub mod submit;

pub use completion::CompletionState;
pub use exercise::{join_exercises, referenced_exercise_ids, ExerciseInSession};
pub use loader::{load_session, Destination, LoadOutcome, RedirectReason, SessionOptions};
pub use page::{Notice, NoticeKind, PageState, SubmitResult, WorkoutPage};
pub use session::{ReviewItem, SessionPhase, Step, WorkoutSession};
pub use submit::{SubmitOutcome, SubmitReceipt};
