// Copyright 2025 - Borealis Labs <contact@borealisvpn.net>
// SPDX-License-Identifier: GPL-3.0-only

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

use crate::{
    error::AccountApiError,
    request::RegisterDeviceRequestBody,
    response::{Device, ErrorResponse, LoginCheckpoint, Region, User, VerifyResponse},
    routes, Result,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The remote operations the session layer depends on. Every call is
/// side-effect free from the caller's perspective and safe to re-issue:
/// device registration is keyed server-side by public key.
#[allow(async_fn_in_trait)]
pub trait AccountApi {
    async fn initiate_login(&self) -> Result<LoginCheckpoint>;

    async fn complete_login(&self, callback_url: &Url) -> Result<VerifyResponse>;

    async fn get_account(&self, token: &str) -> Result<User>;

    async fn get_vpn_servers(&self, token: &str) -> Result<Vec<Region>>;

    async fn register_device(&self, token: &str, name: &str, pubkey: &str) -> Result<Device>;

    async fn unregister_device(&self, token: &str, pubkey: &str) -> Result<()>;
}

pub struct AccountApiClient {
    inner: reqwest::Client,
    base_url: Url,
}

impl AccountApiClient {
    pub fn new(base_url: Url) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(AccountApiError::InvalidBaseUrl);
        }
        let inner = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(AccountApiError::CreateClient)?;
        Ok(AccountApiClient { inner, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AccountApiError::InvalidBaseUrl)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T>(&self, segments: &[&str], token: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let response = self
            .inner
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(AccountApiError::Transport)?;
        Self::parse_json_response(response).await
    }

    async fn post_json<T, B>(&self, segments: &[&str], json_body: &B, token: &str) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        let url = self.endpoint(segments)?;
        let body = serde_json::to_vec(json_body).map_err(AccountApiError::RequestBody)?;
        let response = self
            .inner
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(token)
            .body(body)
            .send()
            .await
            .map_err(AccountApiError::Transport)?;
        Self::parse_json_response(response).await
    }

    async fn parse_json_response<T>(response: reqwest::Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if !status.is_success() {
            return Err(Self::endpoint_failure(response).await);
        }
        response
            .json()
            .await
            .map_err(AccountApiError::MalformedResponse)
    }

    async fn parse_empty_response(response: reqwest::Response) -> Result<()> {
        if !response.status().is_success() {
            return Err(Self::endpoint_failure(response).await);
        }
        Ok(())
    }

    async fn endpoint_failure(response: reqwest::Response) -> AccountApiError {
        let status = response.status();
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.to_string(),
            Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
        };
        AccountApiError::EndpointFailure {
            status: status.as_u16(),
            message,
        }
    }
}

impl AccountApi for AccountApiClient {
    async fn initiate_login(&self) -> Result<LoginCheckpoint> {
        debug!("Initiating login");
        let url = self.endpoint(&[routes::API, routes::V1, routes::VPN, routes::LOGIN])?;
        let response = self
            .inner
            .post(url)
            .send()
            .await
            .map_err(AccountApiError::Transport)?;
        Self::parse_json_response(response).await
    }

    // The verification callback is a complete URL handed out by
    // `initiate_login`, not a path on our base url.
    async fn complete_login(&self, callback_url: &Url) -> Result<VerifyResponse> {
        debug!("Completing login verification");
        let response = self
            .inner
            .get(callback_url.clone())
            .send()
            .await
            .map_err(AccountApiError::Transport)?;
        Self::parse_json_response(response).await
    }

    async fn get_account(&self, token: &str) -> Result<User> {
        debug!("Fetching account info");
        self.get_json(&[routes::API, routes::V1, routes::ACCOUNT], token)
            .await
    }

    async fn get_vpn_servers(&self, token: &str) -> Result<Vec<Region>> {
        debug!("Fetching vpn servers");
        self.get_json(
            &[routes::API, routes::V1, routes::VPN, routes::SERVERS],
            token,
        )
        .await
    }

    async fn register_device(&self, token: &str, name: &str, pubkey: &str) -> Result<Device> {
        debug!("Registering device");
        let body = RegisterDeviceRequestBody {
            name: name.to_string(),
            pubkey: pubkey.to_string(),
        };
        self.post_json(
            &[routes::API, routes::V1, routes::VPN, routes::DEVICE],
            &body,
            token,
        )
        .await
    }

    async fn unregister_device(&self, token: &str, pubkey: &str) -> Result<()> {
        debug!("Unregistering device");
        let url = self.endpoint(&[routes::API, routes::V1, routes::VPN, routes::DEVICE, pubkey])?;
        let response = self
            .inner
            .delete(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(AccountApiError::Transport)?;
        Self::parse_empty_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AccountApiClient {
        AccountApiClient::new("https://api.borealisvpn.net".parse().unwrap()).unwrap()
    }

    #[test]
    fn endpoint_joins_path_segments() {
        let url = client()
            .endpoint(&[routes::API, routes::V1, routes::VPN, routes::SERVERS])
            .unwrap();
        assert_eq!(url.as_str(), "https://api.borealisvpn.net/api/v1/vpn/servers");
    }

    #[test]
    fn endpoint_percent_encodes_device_pubkey() {
        let url = client()
            .endpoint(&[
                routes::API,
                routes::V1,
                routes::VPN,
                routes::DEVICE,
                "ab/cd+ef=",
            ])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.borealisvpn.net/api/v1/vpn/device/ab%2Fcd+ef="
        );
    }

    #[test]
    fn rejects_base_url_that_cannot_be_a_base() {
        let result = AccountApiClient::new("mailto:user@example.com".parse().unwrap());
        assert!(matches!(result, Err(AccountApiError::InvalidBaseUrl)));
    }
}
