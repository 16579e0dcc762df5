// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::error::Error;

use serde::{Deserialize, Serialize};

/// The user's default VPN endpoint choice. Its lifecycle is independent of
/// the session: neither logout nor a failed bootstrap clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedCity {
    pub name: String,
    pub region_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

pub trait SettingsStorage {
    type StorageError: Error + Send + Sync + 'static;

    #[allow(async_fn_in_trait)]
    async fn load_selected_city(&self) -> Result<Option<SelectedCity>, Self::StorageError>;

    #[allow(async_fn_in_trait)]
    async fn store_selected_city(&self, city: &SelectedCity) -> Result<(), Self::StorageError>;
}
