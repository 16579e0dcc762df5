// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::error::Error;

use super::DeviceKeys;

pub trait KeyStore {
    type StorageError: Error + Send + Sync + 'static;

    #[allow(async_fn_in_trait)]
    async fn load_keys(&self) -> Result<DeviceKeys, Self::StorageError>;

    #[allow(async_fn_in_trait)]
    async fn store_keys(&self, keys: &DeviceKeys) -> Result<(), Self::StorageError>;

    /// Generate and persist a keypair iff none is stored yet. Concurrent
    /// first accesses must go through a single call to this so that only one
    /// keypair ever comes into existence.
    #[allow(async_fn_in_trait)]
    async fn init_keys(&self, seed: Option<[u8; 32]>) -> Result<(), Self::StorageError>;

    /// Generate a fresh keypair, overwriting any stored one. Never invoked
    /// automatically; the device keypair survives login/logout cycles.
    #[allow(async_fn_in_trait)]
    async fn reset_keys(&self, seed: Option<[u8; 32]>) -> Result<(), Self::StorageError>;
}
