// ABOUTME: Logging configuration and structured logging setup for the workout engine
// ABOUTME: Configures log levels, formatters and session-level structured events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging configuration

use crate::config::{Environment, LogLevel, ServerConfig};
use crate::constants::service_names;
use anyhow::{anyhow, Result};
use serde_json::json;
use std::env;
use std::io;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use uuid::Uuid;

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level for this crate's events
    pub level: LogLevel,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include thread information
    pub include_thread: bool,
    /// Include span information for tracing
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Deployment environment
    pub environment: Environment,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` records on stdout
    Json,
    /// Multi-line records on stdout
    Pretty,
    /// One line per event on stderr, out of the way of command output
    Compact,
}

impl LogFormat {
    /// Parse from string, falling back to compact
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Compact,
        }
    }
}

impl LoggingConfig {
    /// Logging settings for a loaded [`ServerConfig`].
    ///
    /// Level and environment come from the server config (`LOG_LEVEL`,
    /// `ENVIRONMENT`); output shape comes from `LOG_FORMAT`, `LOG_INCLUDE_*`,
    /// `SERVICE_NAME` and `SERVICE_VERSION`. Production always includes
    /// location, thread and span details.
    #[must_use]
    pub fn from_server_config(config: &ServerConfig) -> Self {
        let is_production = config.environment.is_production();
        Self {
            level: config.log_level,
            format: LogFormat::from_str_or_default(&env::var("LOG_FORMAT").unwrap_or_default()),
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_thread: is_production || env::var("LOG_INCLUDE_THREAD").is_ok(),
            include_spans: is_production || env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::STRENGTH_WORKOUT.into()),
            service_version: env::var("SERVICE_VERSION")
                .unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_owned()),
            environment: config.environment,
        }
    }

    /// Raise the level to at least debug when `verbose` is set
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.level = self.level.at_least(LogLevel::Debug);
        }
        self
    }

    fn env_filter(&self) -> EnvFilter {
        let fallback = self.level.to_tracing_level();
        env::var("RUST_LOG")
            .map_or_else(
                |_| EnvFilter::new(self.level.to_string()),
                |directive| EnvFilter::new(directive),
            )
            .add_directive("sqlx=warn".parse().unwrap_or_else(|_| tracing::Level::WARN.into()))
            .add_directive(
                "sqlx::query=warn"
                    .parse()
                    .unwrap_or_else(|_| tracing::Level::WARN.into()),
            )
            .add_directive(
                format!("strength_workout={}", self.level)
                    .parse()
                    .unwrap_or_else(|_| fallback.into()),
            )
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let installed = match self.format {
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_thread_ids(self.include_thread)
                        .with_thread_names(self.include_thread)
                        .with_target(true)
                        .with_writer(io::stdout)
                        .with_span_events(span_events)
                        .json(),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    fmt::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_thread_ids(self.include_thread)
                        .with_thread_names(self.include_thread)
                        .with_target(true)
                        .with_writer(io::stdout)
                        .with_span_events(span_events),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_thread_ids(self.include_thread)
                        .with_target(false)
                        .with_writer(io::stderr)
                        .with_span_events(span_events),
                )
                .try_init(),
        };
        installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))?;

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment.to_string()
            },
            "logging": {
                "level": self.level.to_string(),
                "format": format!("{:?}", self.format),
            }
        });
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            "Logging initialized: {}",
            config_summary
        );
    }
}

/// Structured events emitted by workout sessions
pub struct SessionLogger;

impl SessionLogger {
    /// A session finished loading
    pub fn log_session_ready(user_id: Uuid, workout_id: Uuid, exercises: usize, restored: bool) {
        info!(
            user.id = %user_id,
            workout.id = %workout_id,
            session.exercises = exercises,
            session.restored = restored,
            "Workout session ready"
        );
    }

    /// Loading ended without a session
    pub fn log_session_redirect(user_id: Option<Uuid>, reason: &str) {
        let user = user_id.map_or_else(|| "anonymous".to_owned(), |id| id.to_string());
        info!(
            user.id = %user,
            redirect.reason = %reason,
            "Workout session not started"
        );
    }

    /// Loading failed
    pub fn log_load_failure(user_id: Uuid, error: &str) {
        warn!(
            user.id = %user_id,
            error = %error,
            "Workout session failed to load"
        );
    }

    /// A set flag changed
    pub fn log_set_toggled(workout_id: Uuid, user_exercise_id: Uuid, set_index: usize, done: bool) {
        tracing::debug!(
            workout.id = %workout_id,
            user_exercise.id = %user_exercise_id,
            set.index = set_index,
            set.done = done,
            "Set toggled"
        );
    }

    /// The exercise cursor moved
    pub fn log_navigation(workout_id: Uuid, from: usize, to: usize, review: bool) {
        tracing::debug!(
            workout.id = %workout_id,
            step.from = from,
            step.to = to,
            step.review = review,
            "Cursor moved"
        );
    }

    /// A best-effort snapshot operation failed
    pub fn log_snapshot_failure(key: &str, operation: &str, error: &str) {
        warn!(
            snapshot.key = %key,
            snapshot.operation = %operation,
            error = %error,
            "Snapshot operation failed; continuing with in-memory state"
        );
    }

    /// Submission result
    pub fn log_submission(
        workout_id: Uuid,
        completed_exercises: usize,
        total_exercises: usize,
        success: bool,
    ) {
        info!(
            workout.id = %workout_id,
            submit.completed_exercises = completed_exercises,
            submit.total_exercises = total_exercises,
            submit.success = success,
            "Workout submission"
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 8] = [
        "LOG_LEVEL",
        "ENVIRONMENT",
        "LOG_FORMAT",
        "LOG_INCLUDE_LOCATION",
        "LOG_INCLUDE_THREAD",
        "LOG_INCLUDE_SPANS",
        "SERVICE_NAME",
        "SNAPSHOT_DIR",
    ];

    fn clear_env() {
        for key in VARS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::from_str_or_default("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_or_default("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str_or_default(""), LogFormat::Compact);
        assert_eq!(LogFormat::from_str_or_default("fancy"), LogFormat::Compact);
    }

    #[test]
    #[serial]
    fn test_config_follows_server_settings_and_env() {
        clear_env();
        env::set_var("SNAPSHOT_DIR", "/tmp/strength-workout-test");
        env::set_var("LOG_LEVEL", "warn");
        env::set_var("LOG_FORMAT", "json");
        env::set_var("LOG_INCLUDE_THREAD", "1");
        env::set_var("SERVICE_NAME", "workout-test");

        let server = ServerConfig::from_env().unwrap();
        let config = LoggingConfig::from_server_config(&server);
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.include_thread);
        assert!(!config.include_location);
        assert_eq!(config.service_name, "workout-test");
        assert_eq!(config.environment, Environment::Development);

        assert_eq!(config.clone().with_verbose(false).level, LogLevel::Warn);
        assert_eq!(config.with_verbose(true).level, LogLevel::Debug);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_production_enables_rich_records() {
        clear_env();
        env::set_var("SNAPSHOT_DIR", "/tmp/strength-workout-test");
        env::set_var("ENVIRONMENT", "production");
        env::set_var("LOG_LEVEL", "trace");

        let config = LoggingConfig::from_server_config(&ServerConfig::from_env().unwrap())
            .with_verbose(true);
        assert_eq!(config.level, LogLevel::Trace);
        assert!(config.include_location && config.include_thread && config.include_spans);
        assert_eq!(config.format, LogFormat::Compact);
        clear_env();
    }
}
