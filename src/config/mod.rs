// ABOUTME: Configuration management module for runtime settings
// ABOUTME: Groups environment loading, database location and shared config enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: [`ServerConfig`] loaded from environment variables
//! - **Database**: typed `DATABASE_URL`
//! - **Types**: log level and deployment environment enums

/// Database location types
pub mod database;
/// Environment and runtime configuration
pub mod environment;
/// Shared configuration enums
pub mod types;

pub use database::{DatabaseConfig, DatabaseUrl};
pub use environment::{ServerConfig, SnapshotBackend, SnapshotConfig};
pub use types::{Environment, LogLevel};
