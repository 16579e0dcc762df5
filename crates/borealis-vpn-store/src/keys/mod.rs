// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

mod device_keys;
mod key_store;

pub use device_keys::{DeviceKeypair, DeviceKeys};
pub use key_store::KeyStore;
