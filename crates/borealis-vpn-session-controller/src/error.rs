// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

use borealis_vpn_api_client::AccountApiError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no session is established")]
    EmptySession,

    #[error("key store error")]
    KeyStore {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("session store error")]
    SessionStore {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("settings store error")]
    SettingsStore {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to initiate login")]
    InitiateLogin(#[source] AccountApiError),

    #[error("failed to complete login verification")]
    CompleteLogin(#[source] AccountApiError),

    #[error("failed to fetch account info")]
    GetAccount(#[source] AccountApiError),

    #[error("failed to fetch vpn servers")]
    GetVpnServers(#[source] AccountApiError),

    #[error("failed to register device")]
    RegisterDevice(#[source] AccountApiError),

    #[error("failed to unregister device")]
    UnregisterDevice(#[source] AccountApiError),

    #[error("session controller is no longer running")]
    ControllerGone,
}
