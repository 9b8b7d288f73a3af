// ABOUTME: Main library entry point for strength workout sessions
// ABOUTME: Loads the pending workout, tracks sets, snapshots progress and writes completion back
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Strength Workout
//!
//! Execution engine for the workout page of a strength-training plan.
//!
//! ## Features
//!
//! - **Session loading**: finds the first pending workout of the user's latest
//!   strength test and joins its exercises with a single catalog lookup
//! - **Per-set tracking**: completion flags per set, mirrored to a local
//!   snapshot after every change so a reload resumes where the user left off
//! - **Navigation**: exercise cursor with a trailing review step
//! - **Submission**: confirmation for unfinished workouts, then completion
//!   timestamps written back to the store
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use strength_workout::context::{AuthContext, AuthSession};
//! use strength_workout::database::Database;
//! use strength_workout::errors::AppResult;
//! use strength_workout::snapshot::MemorySnapshotStore;
//! use strength_workout::workout::{load_session, LoadOutcome, SessionOptions};
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let db = Database::new("sqlite::memory:").await?;
//!     let auth = AuthContext::signed_in(AuthSession::new(Uuid::new_v4()));
//!     let outcome = load_session(
//!         auth.current().as_ref(),
//!         &db,
//!         Arc::new(MemorySnapshotStore::new()),
//!         &SessionOptions::default(),
//!     )
//!     .await?;
//!     if let LoadOutcome::Ready(session) = outcome {
//!         println!("{} exercises to go", session.exercise_count());
//!     }
//!     Ok(())
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// Application constants and env lookups
pub mod constants;

/// Signed-in user context
pub mod context;

/// Training-plan store
pub mod database;

/// Unified error handling
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Store row types
pub mod models;

/// Local progress snapshots
pub mod snapshot;

/// Exercise video link resolution
pub mod video;

/// Workout sessions and the workout page
pub mod workout;
