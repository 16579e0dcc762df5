// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

pub(crate) const API: &str = "api";
pub(crate) const V1: &str = "v1";
pub(crate) const VPN: &str = "vpn";
pub(crate) const LOGIN: &str = "login";
pub(crate) const ACCOUNT: &str = "account";
pub(crate) const SERVERS: &str = "servers";
pub(crate) const DEVICE: &str = "device";
