// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::{CryptoRng, RngCore};
use x25519_dalek::{PublicKey, StaticSecret};

/// The Curve25519 keypair that identifies this installation to the account
/// service. Generated once, shared freely afterwards: the key material is
/// read-only for the lifetime of the process.
#[derive(Clone)]
pub struct DeviceKeys {
    device_keypair: Arc<DeviceKeypair>,
}

pub struct DeviceKeypair {
    private_key: StaticSecret,
    public_key: PublicKey,
}

impl DeviceKeypair {
    pub fn from_private_key(private_key: StaticSecret) -> Self {
        let public_key = PublicKey::from(&private_key);
        DeviceKeypair {
            private_key,
            public_key,
        }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub(crate) fn private_key(&self) -> &StaticSecret {
        &self.private_key
    }
}

impl DeviceKeys {
    pub fn generate_new<R>(rng: &mut R) -> Self
    where
        R: RngCore + CryptoRng,
    {
        DeviceKeys::from_private_key(StaticSecret::random_from_rng(rng))
    }

    pub fn from_private_key(private_key: StaticSecret) -> Self {
        DeviceKeys {
            device_keypair: Arc::new(DeviceKeypair::from_private_key(private_key)),
        }
    }

    pub fn device_keypair(&self) -> Arc<DeviceKeypair> {
        Arc::clone(&self.device_keypair)
    }

    pub fn public_key(&self) -> &PublicKey {
        self.device_keypair.public_key()
    }

    pub fn public_key_base64(&self) -> String {
        BASE64.encode(self.public_key().as_bytes())
    }

    pub(crate) fn private_key_bytes(&self) -> [u8; 32] {
        self.device_keypair.private_key().to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_key_is_derived_from_private_key() {
        let mut rng = rand::rngs::OsRng;
        let keys = DeviceKeys::generate_new(&mut rng);

        let rebuilt = DeviceKeys::from_private_key(StaticSecret::from(keys.private_key_bytes()));
        assert_eq!(keys.public_key().as_bytes(), rebuilt.public_key().as_bytes());
    }

    #[test]
    fn public_key_base64_round_trips() {
        let mut rng = rand::rngs::OsRng;
        let keys = DeviceKeys::generate_new(&mut rng);

        let encoded = keys.public_key_base64();
        let decoded = BASE64.decode(encoded).unwrap();
        assert_eq!(decoded, keys.public_key().as_bytes());
    }
}
