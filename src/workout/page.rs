// ABOUTME: Page-level state machine around a workout session: loading, error, ready, left
// ABOUTME: Turns load and submit results into user notices and navigation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Workout page.
//!
//! `Loading → {Error | Ready}`; a redirect at load time or a successful
//! submission moves the page to `Left`. Failures never escape as errors here:
//! they become [`Notice`]s and the page stays in a state the user can act on.
//!
//! The page reads its user from an [`AuthContext`] and stays subscribed to it
//! until it leaves. Signing out (or switching user) sends it to the login screen.

use super::loader::{load_session, Destination, LoadOutcome, SessionOptions};
use super::session::WorkoutSession;
use super::submit::{SubmitOutcome, SubmitReceipt};
use crate::context::{AuthContext, AuthSubscription};
use crate::database::WorkoutStore;
use crate::errors::AppError;
use crate::logging::SessionLogger;
use crate::snapshot::SnapshotStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Something went right
    Success,
    /// Something went wrong
    Error,
}

/// Transient message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Severity
    pub kind: NoticeKind,
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
}

impl Notice {
    fn success(title: &str, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            title: title.to_owned(),
            message: message.into(),
        }
    }

    fn error(title: &str, error: &AppError) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: title.to_owned(),
            message: error.user_notice(),
        }
    }
}

/// Current state of the page
#[derive(Debug)]
pub enum PageState {
    /// Load in progress (or not started)
    Loading,
    /// Load failed; the only action is returning to training
    Error {
        /// What to show
        notice: Notice,
    },
    /// A session is in progress
    Ready(Box<WorkoutSession>),
    /// The page navigated away
    Left(Destination),
}

/// Result of pressing submit on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResult {
    /// The incomplete-workout prompt is showing
    NeedsConfirmation,
    /// Submitted; the page has left
    Submitted(SubmitReceipt),
    /// The write failed; still on review with an error notice
    Failed,
    /// Nothing to submit from the current state
    Ignored,
}

/// Workout page state machine
#[derive(Debug)]
pub struct WorkoutPage {
    state: PageState,
    notices: Vec<Notice>,
    auth: Option<AuthSubscription>,
    user_id: Option<Uuid>,
}

impl Default for WorkoutPage {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkoutPage {
    /// New page in the loading state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: PageState::Loading,
            notices: Vec::new(),
            auth: None,
            user_id: None,
        }
    }

    /// Load the page and return it in its post-load state
    pub async fn open(
        auth: &AuthContext,
        store: &dyn WorkoutStore,
        snapshots: Arc<dyn SnapshotStore>,
        options: &SessionOptions,
    ) -> Self {
        let mut page = Self::new();
        page.load(auth, store, snapshots, options).await;
        page
    }

    /// Run the load protocol. Errors move the page to [`PageState::Error`].
    pub async fn load(
        &mut self,
        auth: &AuthContext,
        store: &dyn WorkoutStore,
        snapshots: Arc<dyn SnapshotStore>,
        options: &SessionOptions,
    ) {
        self.state = PageState::Loading;
        let session = auth.current();
        self.user_id = session.as_ref().map(|s| s.user_id);
        self.auth = Some(auth.subscribe());

        match load_session(session.as_ref(), store, snapshots, options).await {
            Ok(LoadOutcome::Ready(session)) => self.state = PageState::Ready(session),
            Ok(LoadOutcome::Redirect(reason)) => self.leave(reason.destination()),
            Err(e) => {
                if let Some(user_id) = self.user_id {
                    SessionLogger::log_load_failure(user_id, &e.to_string());
                }
                let notice = Notice::error("Could not load your workout", &e);
                self.notices.push(notice.clone());
                self.state = PageState::Error { notice };
            }
        }
    }

    /// Apply any auth change seen since the last call.
    ///
    /// Returns `true` when the change made the page leave for the login screen.
    pub fn sync_auth(&mut self) -> bool {
        let Some(change) = self.auth.as_mut().and_then(AuthSubscription::poll_change) else {
            return false;
        };
        if change.map(|s| s.user_id) == self.user_id {
            return false;
        }
        debug!(user.id = ?self.user_id, "Auth changed under the workout page");
        self.leave(Destination::Login);
        true
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &PageState {
        &self.state
    }

    /// The session, when ready
    #[must_use]
    pub fn session(&self) -> Option<&WorkoutSession> {
        match &self.state {
            PageState::Ready(session) => Some(session),
            _ => None,
        }
    }

    /// Mutable session, when ready
    pub fn session_mut(&mut self) -> Option<&mut WorkoutSession> {
        match &mut self.state {
            PageState::Ready(session) => Some(session),
            _ => None,
        }
    }

    /// Where the page went, if it left
    #[must_use]
    pub const fn destination(&self) -> Option<Destination> {
        match self.state {
            PageState::Left(destination) => Some(destination),
            _ => None,
        }
    }

    /// Manual exit from the error state
    pub fn return_to_training(&mut self) {
        self.leave(Destination::TrainingHome);
    }

    /// Drain pending notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Press submit on the review step
    pub async fn submit(&mut self, store: &dyn WorkoutStore) -> SubmitResult {
        self.run_submit(store, false).await
    }

    /// Confirm the incomplete-workout prompt
    pub async fn confirm_submit(&mut self, store: &dyn WorkoutStore) -> SubmitResult {
        self.run_submit(store, true).await
    }

    /// Dismiss the incomplete-workout prompt
    pub fn cancel_submit(&mut self) {
        if let Some(session) = self.session_mut() {
            session.cancel_submit();
        }
    }

    async fn run_submit(&mut self, store: &dyn WorkoutStore, confirmed: bool) -> SubmitResult {
        if self.sync_auth() {
            return SubmitResult::Ignored;
        }
        let PageState::Ready(session) = &mut self.state else {
            return SubmitResult::Ignored;
        };
        let result = if confirmed {
            session.confirm_submit(store).await.map(SubmitOutcome::Submitted)
        } else {
            session.submit(store).await
        };

        match result {
            Ok(SubmitOutcome::ConfirmationRequired { .. }) => SubmitResult::NeedsConfirmation,
            Ok(SubmitOutcome::Submitted(receipt)) => {
                self.notices.push(Notice::success(
                    "Workout complete",
                    if receipt.all_complete {
                        "Great work! Your workout has been saved."
                    } else {
                        "Your workout has been saved."
                    },
                ));
                self.leave(receipt.navigate_to);
                SubmitResult::Submitted(receipt)
            }
            Err(e) => {
                self.notices
                    .push(Notice::error("Could not submit your workout", &e));
                SubmitResult::Failed
            }
        }
    }

    fn leave(&mut self, destination: Destination) {
        self.state = PageState::Left(destination);
        self.auth = None;
    }
}
