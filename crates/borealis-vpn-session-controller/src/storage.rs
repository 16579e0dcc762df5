// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use borealis_vpn_store::{
    keys::{DeviceKeys, KeyStore},
    session::{DeviceRecord, SessionStorage},
    settings::{SelectedCity, SettingsStorage},
    ClientStorage,
};

use crate::error::Error;

/// Storage access for the controller, boxing the per-implementation error
/// types into the controller's error taxonomy.
pub(crate) struct ControllerStorage<S>
where
    S: ClientStorage,
{
    storage: Arc<tokio::sync::Mutex<S>>,
}

impl<S> ControllerStorage<S>
where
    S: ClientStorage,
{
    pub(crate) fn from(storage: Arc<tokio::sync::Mutex<S>>) -> Self {
        Self { storage }
    }

    pub(crate) async fn init_keys(&self) -> Result<(), Error> {
        self.storage
            .lock()
            .await
            .init_keys(None)
            .await
            .map_err(|err| Error::KeyStore {
                source: Box::new(err),
            })
    }

    pub(crate) async fn load_keys(&self) -> Result<DeviceKeys, Error> {
        self.storage
            .lock()
            .await
            .load_keys()
            .await
            .map_err(|err| Error::KeyStore {
                source: Box::new(err),
            })
    }

    pub(crate) async fn load_token(&self) -> Result<Option<String>, Error> {
        self.storage
            .lock()
            .await
            .load_token()
            .await
            .map_err(|err| Error::SessionStore {
                source: Box::new(err),
            })
    }

    pub(crate) async fn store_token(&self, token: &str) -> Result<(), Error> {
        self.storage
            .lock()
            .await
            .store_token(token)
            .await
            .map_err(|err| Error::SessionStore {
                source: Box::new(err),
            })
    }

    pub(crate) async fn remove_token(&self) -> Result<(), Error> {
        self.storage
            .lock()
            .await
            .remove_token()
            .await
            .map_err(|err| Error::SessionStore {
                source: Box::new(err),
            })
    }

    pub(crate) async fn load_device(&self) -> Result<Option<DeviceRecord>, Error> {
        self.storage
            .lock()
            .await
            .load_device()
            .await
            .map_err(|err| Error::SessionStore {
                source: Box::new(err),
            })
    }

    pub(crate) async fn store_device(&self, device: &DeviceRecord) -> Result<(), Error> {
        self.storage
            .lock()
            .await
            .store_device(device)
            .await
            .map_err(|err| Error::SessionStore {
                source: Box::new(err),
            })
    }

    pub(crate) async fn remove_device(&self) -> Result<(), Error> {
        self.storage
            .lock()
            .await
            .remove_device()
            .await
            .map_err(|err| Error::SessionStore {
                source: Box::new(err),
            })
    }

    pub(crate) async fn load_selected_city(&self) -> Result<Option<SelectedCity>, Error> {
        self.storage
            .lock()
            .await
            .load_selected_city()
            .await
            .map_err(|err| Error::SettingsStore {
                source: Box::new(err),
            })
    }

    pub(crate) async fn store_selected_city(&self, city: &SelectedCity) -> Result<(), Error> {
        self.storage
            .lock()
            .await
            .store_selected_city(city)
            .await
            .map_err(|err| Error::SettingsStore {
                source: Box::new(err),
            })
    }
}
