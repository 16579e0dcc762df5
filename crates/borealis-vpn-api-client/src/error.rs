// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

#[derive(Debug, thiserror::Error)]
pub enum AccountApiError {
    #[error("failed to create account api client")]
    CreateClient(#[source] reqwest::Error),

    #[error("account api base url cannot be a base")]
    InvalidBaseUrl,

    #[error("failed to construct request body")]
    RequestBody(#[source] serde_json::Error),

    #[error("failed to send request")]
    Transport(#[source] reqwest::Error),

    #[error("endpoint failure: status {status}: {message}")]
    EndpointFailure { status: u16, message: String },

    #[error("failed to deserialize response")]
    MalformedResponse(#[source] reqwest::Error),
}

impl AccountApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AccountApiError::EndpointFailure { status, .. } => Some(*status),
            _ => None,
        }
    }
}
