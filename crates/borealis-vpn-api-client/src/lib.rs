// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

//! Client for the borealis account API: login, verification, account info,
//! server directory and device registration. Purely a request/response
//! boundary; it owns no session state.

mod client;
mod error;
mod request;
mod response;
mod routes;

pub use client::{AccountApi, AccountApiClient};
pub use error::AccountApiError;
pub use response::{
    City, Device, ErrorResponse, LoginCheckpoint, Region, Subscription, User, VerifyResponse,
};

pub type Result<T> = std::result::Result<T, AccountApiError>;
