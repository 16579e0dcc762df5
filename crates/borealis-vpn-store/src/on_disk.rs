// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::SeedableRng as _;
use serde::{de::DeserializeOwned, Serialize};
use x25519_dalek::StaticSecret;
use zeroize::Zeroize as _;

use crate::{
    keys::{DeviceKeys, KeyStore},
    session::{DeviceRecord, SessionStorage},
    settings::{SelectedCity, SettingsStorage},
};

pub const DEFAULT_PRIVATE_DEVICE_KEY_FILENAME: &str = "device.key";
pub const DEFAULT_PUBLIC_DEVICE_KEY_FILENAME: &str = "device.pub";
pub const DEFAULT_SESSION_TOKEN_FILENAME: &str = "session_token.json";
pub const DEFAULT_DEVICE_RECORD_FILENAME: &str = "device.json";
pub const DEFAULT_SELECTED_CITY_FILENAME: &str = "selected_city.json";

#[derive(Debug, thiserror::Error)]
pub enum OnDiskStorageError {
    #[error("unable to read key file: {path}")]
    ReadKeyFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to write key file: {path}")]
    WriteKeyFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("key file is not valid base64: {path}")]
    MalformedKeyEncoding {
        path: PathBuf,
        #[source]
        source: base64::DecodeError,
    },

    #[error("key file does not contain a 32 byte key: {path}")]
    MalformedKeyLength { path: PathBuf },

    #[error("failed to open file: {path}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create file: {path}")]
    FileCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read record from file: {path}")]
    ReadRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write record to file: {path}")]
    WriteRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to remove file: {path}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Locations of all durable entries, rooted in one data directory.
pub struct StoragePaths {
    pub private_device_key_file: PathBuf,
    pub public_device_key_file: PathBuf,
    pub session_token_file: PathBuf,
    pub device_record_file: PathBuf,
    pub selected_city_file: PathBuf,
}

impl StoragePaths {
    pub fn new<P: AsRef<Path>>(base_data_directory: P) -> Self {
        let base_dir = base_data_directory.as_ref();
        StoragePaths {
            private_device_key_file: base_dir.join(DEFAULT_PRIVATE_DEVICE_KEY_FILENAME),
            public_device_key_file: base_dir.join(DEFAULT_PUBLIC_DEVICE_KEY_FILENAME),
            session_token_file: base_dir.join(DEFAULT_SESSION_TOKEN_FILENAME),
            device_record_file: base_dir.join(DEFAULT_DEVICE_RECORD_FILENAME),
            selected_city_file: base_dir.join(DEFAULT_SELECTED_CITY_FILENAME),
        }
    }

    pub fn keys_exist(&self) -> bool {
        self.private_device_key_file.exists()
    }
}

pub struct OnDiskStorage {
    paths: StoragePaths,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct StoredToken {
    token: String,
}

impl OnDiskStorage {
    pub fn new(paths: StoragePaths) -> Self {
        OnDiskStorage { paths }
    }

    pub fn from_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        OnDiskStorage::new(StoragePaths::new(data_dir))
    }

    fn load_device_keys(&self) -> Result<DeviceKeys, OnDiskStorageError> {
        let path = &self.paths.private_device_key_file;
        let encoded =
            std::fs::read_to_string(path).map_err(|source| OnDiskStorageError::ReadKeyFile {
                path: path.clone(),
                source,
            })?;
        let mut decoded = BASE64.decode(encoded.trim()).map_err(|source| {
            OnDiskStorageError::MalformedKeyEncoding {
                path: path.clone(),
                source,
            }
        })?;
        let mut bytes: [u8; 32] =
            decoded
                .as_slice()
                .try_into()
                .map_err(|_| OnDiskStorageError::MalformedKeyLength {
                    path: path.clone(),
                })?;
        decoded.zeroize();
        let keys = DeviceKeys::from_private_key(StaticSecret::from(bytes));
        bytes.zeroize();
        Ok(keys)
    }

    fn store_device_keys(&self, keys: &DeviceKeys) -> Result<(), OnDiskStorageError> {
        let private_path = &self.paths.private_device_key_file;
        let mut private_encoded = BASE64.encode(keys.private_key_bytes());
        let write_result = std::fs::write(private_path, format!("{private_encoded}\n"));
        private_encoded.zeroize();
        write_result.map_err(|source| OnDiskStorageError::WriteKeyFile {
            path: private_path.clone(),
            source,
        })?;

        let public_path = &self.paths.public_device_key_file;
        std::fs::write(public_path, format!("{}\n", keys.public_key_base64())).map_err(
            |source| OnDiskStorageError::WriteKeyFile {
                path: public_path.clone(),
                source,
            },
        )
    }

    fn init_device_keys(&self, seed: Option<[u8; 32]>) -> Result<(), OnDiskStorageError> {
        if self.paths.keys_exist() {
            return Ok(());
        }
        self.reset_device_keys(seed)
    }

    fn reset_device_keys(&self, seed: Option<[u8; 32]>) -> Result<(), OnDiskStorageError> {
        let device_keys = if let Some(seed) = seed {
            let mut rng = rand_chacha::ChaCha20Rng::from_seed(seed);
            DeviceKeys::generate_new(&mut rng)
        } else {
            let mut rng = rand::rngs::OsRng;
            DeviceKeys::generate_new(&mut rng)
        };
        self.store_device_keys(&device_keys)
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>, OnDiskStorageError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(OnDiskStorageError::FileOpen {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_reader(file)
            .map(Some)
            .map_err(|source| OnDiskStorageError::ReadRecord {
                path: path.to_path_buf(),
                source,
            })
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), OnDiskStorageError> {
        let file = File::create(path).map_err(|source| OnDiskStorageError::FileCreate {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer(file, value).map_err(|source| OnDiskStorageError::WriteRecord {
            path: path.to_path_buf(),
            source,
        })
    }

    fn remove_entry(&self, path: &Path) -> Result<(), OnDiskStorageError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(OnDiskStorageError::RemoveFile {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl KeyStore for OnDiskStorage {
    type StorageError = OnDiskStorageError;

    async fn load_keys(&self) -> Result<DeviceKeys, Self::StorageError> {
        self.load_device_keys()
    }

    async fn store_keys(&self, keys: &DeviceKeys) -> Result<(), Self::StorageError> {
        self.store_device_keys(keys)
    }

    async fn init_keys(&self, seed: Option<[u8; 32]>) -> Result<(), Self::StorageError> {
        self.init_device_keys(seed)
    }

    async fn reset_keys(&self, seed: Option<[u8; 32]>) -> Result<(), Self::StorageError> {
        self.reset_device_keys(seed)
    }
}

impl SessionStorage for OnDiskStorage {
    type StorageError = OnDiskStorageError;

    async fn load_token(&self) -> Result<Option<String>, Self::StorageError> {
        Ok(self
            .read_json::<StoredToken>(&self.paths.session_token_file)?
            .map(|stored| stored.token))
    }

    async fn store_token(&self, token: &str) -> Result<(), Self::StorageError> {
        let stored = StoredToken {
            token: token.to_string(),
        };
        self.write_json(&self.paths.session_token_file, &stored)
    }

    async fn remove_token(&self) -> Result<(), Self::StorageError> {
        self.remove_entry(&self.paths.session_token_file)
    }

    async fn load_device(&self) -> Result<Option<DeviceRecord>, Self::StorageError> {
        self.read_json(&self.paths.device_record_file)
    }

    async fn store_device(&self, device: &DeviceRecord) -> Result<(), Self::StorageError> {
        self.write_json(&self.paths.device_record_file, device)
    }

    async fn remove_device(&self) -> Result<(), Self::StorageError> {
        self.remove_entry(&self.paths.device_record_file)
    }
}

impl SettingsStorage for OnDiskStorage {
    type StorageError = OnDiskStorageError;

    async fn load_selected_city(&self) -> Result<Option<SelectedCity>, Self::StorageError> {
        self.read_json(&self.paths.selected_city_file)
    }

    async fn store_selected_city(&self, city: &SelectedCity) -> Result<(), Self::StorageError> {
        self.write_json(&self.paths.selected_city_file, city)
    }
}
