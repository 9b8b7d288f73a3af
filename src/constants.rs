// ABOUTME: System-wide constants and environment-backed defaults for workout sessions
// ABOUTME: Holds session defaults, snapshot namespace, service names and env lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Constants Module
//!
//! Hardcoded defaults plus environment variable lookups with fallbacks.

use std::env;

/// Defaults applied while building a session from catalog rows
pub mod session {
    /// Set count used when the catalog value is missing or not positive
    pub const DEFAULT_SETS: u32 = 3;

    /// Display name used when a join-record points at a missing catalog row
    pub const PLACEHOLDER_EXERCISE_NAME: &str = "Exercise";
}

/// Local progress snapshot defaults
pub mod snapshot {
    /// Prefix of every snapshot key
    pub const DEFAULT_NAMESPACE: &str = "workout-progress";

    /// File extension used by the file-backed snapshot store
    pub const FILE_EXTENSION: &str = "json";

    /// Directory under the platform data dir holding snapshot files
    pub const APP_DIR_NAME: &str = "strength-workout";
}

/// Service names for structured logging
pub mod service_names {
    /// Name reported by the logging layer
    pub const STRENGTH_WORKOUT: &str = "strength-workout";
}

/// Environment-based configuration lookups
pub mod env_config {
    use super::env;

    /// Get database `URL` from environment or default
    #[must_use]
    pub fn database_url() -> String {
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./data/workouts.db".into())
    }

    /// Get log level from environment or default
    #[must_use]
    pub fn log_level() -> String {
        env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into())
    }

    /// Get deployment environment name from environment or default
    #[must_use]
    pub fn environment() -> String {
        env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
    }

    /// Get snapshot backend name (`file` or `memory`)
    #[must_use]
    pub fn snapshot_backend() -> String {
        env::var("SNAPSHOT_BACKEND").unwrap_or_else(|_| "file".into())
    }

    /// Get explicit snapshot directory, if configured
    #[must_use]
    pub fn snapshot_dir() -> Option<String> {
        env::var("SNAPSHOT_DIR").ok().filter(|s| !s.trim().is_empty())
    }

    /// Get snapshot key namespace from environment or default
    #[must_use]
    pub fn snapshot_namespace() -> String {
        env::var("SNAPSHOT_NAMESPACE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| super::snapshot::DEFAULT_NAMESPACE.into())
    }
}
