//! HTTP client for the remote Boteco API

use crate::{ClientError, ClientResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Path probed by [`RemoteClient::probe`]
pub const HEALTH_ENDPOINT: &str = "/health";

/// Build the shared `reqwest` client
pub fn build_http_client(timeout_secs: u64) -> ClientResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(ClientError::ClientBuild)
}

/// Authenticated GET client bound to one base URL
#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RemoteClient {
    /// Wrap an existing `reqwest` client (connection pool is shared)
    pub fn with_client(client: Client, token: Option<String>) -> Self {
        Self {
            client,
            base_url: String::new(),
            token: token.filter(|t| !t.is_empty()),
        }
    }

    /// Set the base URL, dropping one trailing slash. The URL is not checked;
    /// a malformed one fails on the next request.
    pub fn set_base_url(&mut self, url: &str) {
        self.base_url = url.strip_suffix('/').unwrap_or(url).to_string();
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for an endpoint path
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    async fn send(&self, endpoint: &str) -> ClientResult<reqwest::Response> {
        let url = self.url(endpoint);
        let mut req = self.client.get(&url);
        if let Some(auth) = self.auth_header() {
            req = req.header(reqwest::header::AUTHORIZATION, auth);
        }

        tracing::debug!(%url, "GET");
        let response = req.send().await.map_err(|e| ClientError::Transport {
            endpoint: endpoint.to_string(),
            status: None,
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Transport {
                endpoint: endpoint.to_string(),
                status: Some(status.as_u16()),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }
        Ok(response)
    }

    /// GET `base_url + endpoint` and decode the JSON body.
    ///
    /// Any non-2xx status is a `Transport` error carrying the status; the
    /// response body is not inspected. A body cut off mid-read is a
    /// `Transport` error without status, like any other network failure. A
    /// body that does not decode into `T` is `InvalidResponse`.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ClientResult<T> {
        let response = self.send(endpoint).await?;
        let body = response.bytes().await.map_err(|e| ClientError::Transport {
            endpoint: endpoint.to_string(),
            status: None,
            message: e.to_string(),
        })?;

        serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    /// Check that the backend answers on its health endpoint
    pub async fn probe(&self) -> ClientResult<()> {
        self.send(HEALTH_ENDPOINT)
            .await
            .map(|_| ())
            .map_err(|e| ClientError::Connectivity {
                base_url: self.base_url.clone(),
                message: e.to_string(),
            })
    }
}
