// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

//! The session authority of the borealis-vpn client. A single
//! [`SessionController`] instance owns the session aggregate (token, user,
//! device registration, server list) and runs the bootstrap/teardown state
//! machine over the account API and durable storage. Consumers talk to it
//! through a cloneable [`SessionCommander`] handle; screen navigation reacts
//! to the returned outcomes and to the shared session state.

mod commander;
mod controller;
mod error;
mod models;
mod shared_state;
mod storage;

pub use commander::SessionCommander;
pub use controller::{SessionController, DEFAULT_HEARTBEAT_INTERVAL, FALLBACK_REGION_CODE};
pub use error::Error;
pub use models::HeartbeatFailed;
pub use shared_state::{SessionState, SharedSessionState};
