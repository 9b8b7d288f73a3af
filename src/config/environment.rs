// ABOUTME: Environment configuration management for the workout engine
// ABOUTME: Reads database, snapshot and logging settings from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use super::database::{DatabaseConfig, DatabaseUrl};
use super::types::{Environment, LogLevel};
use crate::constants::env_config;
use crate::errors::{AppError, AppResult};
use crate::snapshot::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Where progress snapshots are kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SnapshotBackend {
    /// One JSON file per slot in a directory
    File {
        /// Slot directory
        dir: PathBuf,
    },
    /// Process memory only (lost on exit)
    Memory,
}

impl SnapshotBackend {
    /// Parse a backend name with an optional directory override
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown backend name, or for the file backend
    /// when no directory is given and the platform has no data directory
    pub fn parse(name: &str, dir: Option<&str>) -> AppResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" | "" => {
                let dir = match dir {
                    Some(dir) => PathBuf::from(dir),
                    None => FileSnapshotStore::default_dir()?,
                };
                Ok(Self::File { dir })
            }
            other => Err(AppError::config(format!(
                "Invalid SNAPSHOT_BACKEND value: {other} (expected 'file' or 'memory')"
            ))),
        }
    }
}

/// Snapshot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Storage backend
    pub backend: SnapshotBackend,
    /// Key prefix for every slot
    pub namespace: String,
}

impl SnapshotConfig {
    /// Build the configured store
    ///
    /// # Errors
    ///
    /// Returns an error if the file backend directory cannot be created
    pub fn build_store(&self) -> AppResult<Arc<dyn SnapshotStore>> {
        match &self.backend {
            SnapshotBackend::File { dir } => Ok(Arc::new(FileSnapshotStore::new(dir.clone())?)),
            SnapshotBackend::Memory => Ok(Arc::new(MemorySnapshotStore::new())),
        }
    }
}

/// Full runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Log level
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Snapshot configuration
    pub snapshots: SnapshotConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` or `SNAPSHOT_BACKEND` is invalid
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            log_level: LogLevel::from_str_or_default(&env_config::log_level()),
            environment: Environment::from_str_or_default(&env_config::environment()),
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_config::database_url())?,
            },
            snapshots: SnapshotConfig {
                backend: SnapshotBackend::parse(
                    &env_config::snapshot_backend(),
                    env_config::snapshot_dir().as_deref(),
                )?,
                namespace: env_config::snapshot_namespace(),
            },
        };
        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot namespace is empty
    pub fn validate(&self) -> AppResult<()> {
        if self.snapshots.namespace.trim().is_empty() {
            return Err(AppError::config("SNAPSHOT_NAMESPACE cannot be empty"));
        }
        Ok(())
    }

    /// Create the parent directory of a file database
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created
    pub fn prepare_data_dirs(&self) -> AppResult<()> {
        if let DatabaseUrl::SQLite { path } = &self.database.url {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::storage(format!(
                        "Failed to create database directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Strength Workout Configuration:\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Database: {}\n\
             - Snapshots: {}\n\
             - Snapshot Namespace: {}",
            self.environment,
            self.log_level,
            self.database.url,
            match &self.snapshots.backend {
                SnapshotBackend::File { dir } => format!("file ({})", dir.display()),
                SnapshotBackend::Memory => "memory".to_owned(),
            },
            self.snapshots.namespace,
        )
    }
}
