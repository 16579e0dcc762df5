// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::{fmt, sync::Arc};

/// Where the session currently stands. Every state other than `SignedOut`
/// can fall back to `SignedOut` when an operation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    SignedOut,
    AwaitingVerification,
    Bootstrapping,
    SignedIn,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::SignedOut => write!(f, "signed out"),
            SessionState::AwaitingVerification => write!(f, "awaiting verification"),
            SessionState::Bootstrapping => write!(f, "bootstrapping"),
            SessionState::SignedIn => write!(f, "signed in"),
        }
    }
}

/// Read-only view of the controller's state for the navigation layer.
#[derive(Clone)]
pub struct SharedSessionState {
    inner: Arc<tokio::sync::Mutex<SessionState>>,
}

impl SharedSessionState {
    pub(crate) fn new() -> Self {
        SharedSessionState {
            inner: Arc::new(tokio::sync::Mutex::new(SessionState::SignedOut)),
        }
    }

    pub async fn current(&self) -> SessionState {
        *self.inner.lock().await
    }

    pub(crate) async fn set(&self, state: SessionState) {
        let mut guard = self.inner.lock().await;
        tracing::info!("Session state: {}", state);
        *guard = state;
    }
}
