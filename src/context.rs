// ABOUTME: Explicit authentication context handed to workout session loading
// ABOUTME: Tracks the signed-in user and lets observers subscribe to auth changes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Authentication context.
//!
//! The current user is held in an [`AuthContext`] created at startup and passed
//! down explicitly. Observers call [`AuthContext::subscribe`] and stop observing
//! by dropping the returned [`AuthSubscription`].

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Authenticated user id
    pub user_id: Uuid,
    /// Email address, when the identity provider reports one
    pub email: Option<String>,
}

impl AuthSession {
    /// Create a session for the given user
    #[must_use]
    pub const fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            email: None,
        }
    }
}

/// Process-wide auth state with explicit init and teardown
#[derive(Debug)]
pub struct AuthContext {
    tx: watch::Sender<Option<AuthSession>>,
}

impl AuthContext {
    /// Create a context with no signed-in user
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Create a context already signed in as `session`
    #[must_use]
    pub fn signed_in(session: AuthSession) -> Self {
        let (tx, _rx) = watch::channel(Some(session));
        Self { tx }
    }

    /// Record a sign-in
    pub fn sign_in(&self, session: AuthSession) {
        debug!(user.id = %session.user_id, "Auth state changed: signed in");
        self.tx.send_replace(Some(session));
    }

    /// Record a sign-out
    pub fn sign_out(&self) {
        debug!("Auth state changed: signed out");
        self.tx.send_replace(None);
    }

    /// Snapshot of the current session
    #[must_use]
    pub fn current(&self) -> Option<AuthSession> {
        self.tx.borrow().clone()
    }

    /// Start observing auth changes
    #[must_use]
    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Live view of the auth state; dropping it unsubscribes
#[derive(Debug)]
pub struct AuthSubscription {
    rx: watch::Receiver<Option<AuthSession>>,
}

impl AuthSubscription {
    /// Current session as seen by this subscriber
    #[must_use]
    pub fn current(&self) -> Option<AuthSession> {
        self.rx.borrow().clone()
    }

    /// Take the latest auth state if it changed since the last look.
    ///
    /// A dropped context reads as a sign-out.
    pub fn poll_change(&mut self) -> Option<Option<AuthSession>> {
        match self.rx.has_changed() {
            Ok(true) => Some(self.rx.borrow_and_update().clone()),
            Ok(false) => None,
            Err(_) => Some(None),
        }
    }

    /// Wait for the next auth change. Returns `None` once the context is gone.
    pub async fn changed(&mut self) -> Option<Option<AuthSession>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
