// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::error::Error;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The durable record of this device's registration with the account
/// service. Present iff a session token is present; the pair is reconciled
/// at load time by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    pub id: String,
    pub name: String,
    pub pubkey: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Durable session credentials. Token and device record are stored as
/// separate entries, absent entry meaning signed out.
pub trait SessionStorage {
    type StorageError: Error + Send + Sync + 'static;

    #[allow(async_fn_in_trait)]
    async fn load_token(&self) -> Result<Option<String>, Self::StorageError>;

    #[allow(async_fn_in_trait)]
    async fn store_token(&self, token: &str) -> Result<(), Self::StorageError>;

    #[allow(async_fn_in_trait)]
    async fn remove_token(&self) -> Result<(), Self::StorageError>;

    #[allow(async_fn_in_trait)]
    async fn load_device(&self) -> Result<Option<DeviceRecord>, Self::StorageError>;

    #[allow(async_fn_in_trait)]
    async fn store_device(&self, device: &DeviceRecord) -> Result<(), Self::StorageError>;

    #[allow(async_fn_in_trait)]
    async fn remove_device(&self) -> Result<(), Self::StorageError>;
}
