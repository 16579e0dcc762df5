// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

use rand::SeedableRng as _;
use tokio::sync::Mutex;

use crate::{
    keys::{DeviceKeys, KeyStore},
    session::{DeviceRecord, SessionStorage},
    settings::{SelectedCity, SettingsStorage},
};

/// In-memory storage. Nothing survives the process; used by tests and by
/// consumers that explicitly opt out of persistence.
#[derive(Default)]
pub struct EphemeralStorage {
    keys: Mutex<Option<DeviceKeys>>,
    token: Mutex<Option<String>>,
    device: Mutex<Option<DeviceRecord>>,
    selected_city: Mutex<Option<SelectedCity>>,
}

#[derive(Debug, thiserror::Error)]
pub enum EphemeralStorageError {
    #[error("unable to load ephemeral keys")]
    UnableToLoadKeys,
}

impl KeyStore for EphemeralStorage {
    type StorageError = EphemeralStorageError;

    async fn load_keys(&self) -> Result<DeviceKeys, Self::StorageError> {
        self.keys
            .lock()
            .await
            .as_ref()
            .cloned()
            .ok_or(EphemeralStorageError::UnableToLoadKeys)
    }

    async fn store_keys(&self, keys: &DeviceKeys) -> Result<(), Self::StorageError> {
        *self.keys.lock().await = Some(keys.clone());
        Ok(())
    }

    async fn init_keys(&self, seed: Option<[u8; 32]>) -> Result<(), Self::StorageError> {
        if self.keys.lock().await.is_some() {
            return Ok(());
        }
        self.reset_keys(seed).await
    }

    async fn reset_keys(&self, seed: Option<[u8; 32]>) -> Result<(), Self::StorageError> {
        let device_keys = if let Some(seed) = seed {
            let mut rng = rand_chacha::ChaCha20Rng::from_seed(seed);
            DeviceKeys::generate_new(&mut rng)
        } else {
            let mut rng = rand::rngs::OsRng;
            DeviceKeys::generate_new(&mut rng)
        };
        self.store_keys(&device_keys).await
    }
}

impl SessionStorage for EphemeralStorage {
    type StorageError = EphemeralStorageError;

    async fn load_token(&self) -> Result<Option<String>, Self::StorageError> {
        Ok(self.token.lock().await.clone())
    }

    async fn store_token(&self, token: &str) -> Result<(), Self::StorageError> {
        *self.token.lock().await = Some(token.to_string());
        Ok(())
    }

    async fn remove_token(&self) -> Result<(), Self::StorageError> {
        *self.token.lock().await = None;
        Ok(())
    }

    async fn load_device(&self) -> Result<Option<DeviceRecord>, Self::StorageError> {
        Ok(self.device.lock().await.clone())
    }

    async fn store_device(&self, device: &DeviceRecord) -> Result<(), Self::StorageError> {
        *self.device.lock().await = Some(device.clone());
        Ok(())
    }

    async fn remove_device(&self) -> Result<(), Self::StorageError> {
        *self.device.lock().await = None;
        Ok(())
    }
}

impl SettingsStorage for EphemeralStorage {
    type StorageError = EphemeralStorageError;

    async fn load_selected_city(&self) -> Result<Option<SelectedCity>, Self::StorageError> {
        Ok(self.selected_city.lock().await.clone())
    }

    async fn store_selected_city(&self, city: &SelectedCity) -> Result<(), Self::StorageError> {
        *self.selected_city.lock().await = Some(city.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keys_must_be_initialized_before_load() {
        let storage = EphemeralStorage::default();
        assert!(matches!(
            storage.load_keys().await,
            Err(EphemeralStorageError::UnableToLoadKeys)
        ));

        storage.init_keys(None).await.unwrap();
        storage.load_keys().await.unwrap();
    }

    #[tokio::test]
    async fn init_keys_does_not_regenerate() {
        let storage = EphemeralStorage::default();
        storage.init_keys(None).await.unwrap();
        let first = storage.load_keys().await.unwrap().public_key_base64();

        storage.init_keys(None).await.unwrap();
        assert_eq!(first, storage.load_keys().await.unwrap().public_key_base64());
    }
}
