// ABOUTME: Local durable key-value slots holding in-progress workout snapshots
// ABOUTME: Provides the SnapshotStore trait with in-memory and file-backed implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Local snapshot storage.
//!
//! A snapshot store is a plain string key-value store. Keys are built from a
//! namespace, the user id and the workout id (`"<namespace>-<user>-<workout>"`);
//! values are opaque strings (the session writes JSON). All operations are
//! synchronous.

use crate::constants::snapshot::{APP_DIR_NAME, DEFAULT_NAMESPACE, FILE_EXTENSION};
use crate::errors::{AppError, AppResult};
use dashmap::DashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Key of one snapshot slot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    namespace: String,
    user_id: Uuid,
    workout_id: Uuid,
}

impl SnapshotKey {
    /// Build a key under `namespace`
    pub fn new(namespace: impl Into<String>, user_id: Uuid, workout_id: Uuid) -> Self {
        Self {
            namespace: namespace.into(),
            user_id,
            workout_id,
        }
    }

    /// Build a key under the default namespace
    #[must_use]
    pub fn with_default_namespace(user_id: Uuid, workout_id: Uuid) -> Self {
        Self::new(DEFAULT_NAMESPACE, user_id, workout_id)
    }

    /// User the snapshot belongs to
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Workout the snapshot belongs to
    #[must_use]
    pub const fn workout_id(&self) -> Uuid {
        self.workout_id
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.namespace, self.user_id, self.workout_id)
    }
}

/// Synchronous string key-value store for session snapshots
pub trait SnapshotStore: Send + Sync {
    /// Read a slot. A missing slot is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read
    fn read(&self, key: &SnapshotKey) -> AppResult<Option<String>>;

    /// Overwrite a slot
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written
    fn write(&self, key: &SnapshotKey, value: &str) -> AppResult<()>;

    /// Delete a slot. Deleting a missing slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified
    fn remove(&self, key: &SnapshotKey) -> AppResult<()>;
}

/// Process-local snapshot store
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slots: DashMap<String, String>,
}

impl MemorySnapshotStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is occupied
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn read(&self, key: &SnapshotKey) -> AppResult<Option<String>> {
        Ok(self.slots.get(&key.to_string()).map(|v| v.value().clone()))
    }

    fn write(&self, key: &SnapshotKey, value: &str) -> AppResult<()> {
        self.slots.insert(key.to_string(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &SnapshotKey) -> AppResult<()> {
        self.slots.remove(&key.to_string());
        Ok(())
    }
}

/// Snapshot store keeping one file per slot inside a directory
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    /// Use `dir`, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created
    pub fn new(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            AppError::storage(format!(
                "Failed to create snapshot directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    /// Platform default directory (`<data_local_dir>/strength-workout/progress`)
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no local data directory
    pub fn default_dir() -> AppResult<PathBuf> {
        dirs::data_local_dir()
            .map(|base| base.join(APP_DIR_NAME).join("progress"))
            .ok_or_else(|| AppError::config("No local data directory available for snapshots"))
    }

    /// Directory holding the slot files
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &SnapshotKey) -> PathBuf {
        let file_stem: String = key
            .to_string()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_stem}.{FILE_EXTENSION}"))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn read(&self, key: &SnapshotKey) -> AppResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::storage(format!("Failed to read snapshot {key}: {e}"))),
        }
    }

    fn write(&self, key: &SnapshotKey, value: &str) -> AppResult<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|e| {
                // A partial temp file is never read back; drop it
                let _ = fs::remove_file(&tmp);
                AppError::storage(format!("Failed to write snapshot {key}: {e}"))
            })?;
        debug!(snapshot.key = %key, bytes = value.len(), "Snapshot written");
        Ok(())
    }

    fn remove(&self, key: &SnapshotKey) -> AppResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage(format!("Failed to remove snapshot {key}: {e}"))),
        }
    }
}
