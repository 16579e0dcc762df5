// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Handle for an out-of-band login flow: the UI opens `login_url` in a
/// browser and polls until the flow lands on the verification callback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCheckpoint {
    pub login_url: String,
    pub verify_url: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_on: OffsetDateTime,
    pub poll_interval: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    pub subscription: Subscription,
    pub max_devices: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub is_active: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub renews_on: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    pub pubkey: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub name: String,
    pub code: String,
    pub cities: Vec<City>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub name: String,
    pub code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub public_key: String,
}

/// Error body returned by the account API on non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub errno: Option<u32>,
    pub error: String,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            self.code.map(|code| format!("code: {}", code)),
            self.errno.map(|errno| format!("errno: {}", errno)),
            Some(format!("error: {}", self.error)),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
        write!(f, "{}", fields.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_login_checkpoint() {
        let json = r#"{
            "loginUrl": "https://accounts.borealisvpn.net/login/abc",
            "verifyUrl": "https://accounts.borealisvpn.net/login/verify/abc",
            "expiresOn": "2025-06-01T12:00:00Z",
            "pollInterval": 5
        }"#;

        let checkpoint: LoginCheckpoint = serde_json::from_str(json).unwrap();
        assert_eq!(checkpoint.poll_interval, 5);
        assert!(checkpoint.login_url.ends_with("/abc"));
    }

    #[test]
    fn deserialize_verify_response() {
        let json = r#"{
            "user": {
                "email": "user@example.com",
                "displayName": "A User",
                "subscription": { "isActive": true },
                "maxDevices": 5
            },
            "token": "T"
        }"#;

        let verify: VerifyResponse = serde_json::from_str(json).unwrap();
        assert_eq!(verify.token, "T");
        assert!(verify.user.subscription.is_active);
        assert_eq!(verify.user.subscription.renews_on, None);
    }

    #[test]
    fn deserialize_server_list() {
        let json = r#"[
            {
                "name": "United States",
                "code": "US",
                "cities": [
                    {
                        "name": "Chicago",
                        "code": "ord",
                        "latitude": 41.88,
                        "longitude": -87.63,
                        "publicKey": "c2VydmVyLWtleQ=="
                    }
                ]
            }
        ]"#;

        let regions: Vec<Region> = serde_json::from_str(json).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].cities[0].name, "Chicago");
    }

    #[test]
    fn error_response_display_skips_absent_fields() {
        let body = ErrorResponse {
            code: Some(401),
            errno: None,
            error: "invalid token".to_string(),
        };
        assert_eq!(body.to_string(), "code: 401, error: invalid token");
    }
}
