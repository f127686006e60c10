// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Constellix DNS REST API client.
//!
//! This module provides the client used to answer dns-01 challenges against
//! Constellix-hosted zones. It handles:
//!
//! - Signing every request with the HMAC-SHA1 security headers
//! - Resolving the managed zone for a challenge record by walking up the domain
//! - Reconciling the challenge TXT record (find-or-create, find-then-delete)
//!
//! # Architecture
//!
//! `ConstellixClient` owns one `reqwest` client with the API key installed as a
//! default header. Each call issues its requests one after another and keeps no
//! state between calls apart from the credentials and the signer's last request
//! date. Nothing is cached: every operation re-resolves the zone and the record.
//!
//! # Example
//!
//! ```rust,no_run
//! use constellix_dns01::constellix::ConstellixClient;
//!
//! # async fn example() -> Result<(), constellix_dns01::errors::ClientError> {
//! let client = ConstellixClient::new(
//!     "https://api.dns.constellix.com/v1",
//!     "my-api-key",
//!     "my-secret-key",
//! )?;
//!
//! client
//!     .add_txt_record("example.com", "_acme-challenge.example.com", "token", 60)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod records;
pub mod types;
pub mod zones;

pub use records::ExistingTxt;
pub use types::{ManagedZone, RecordPayload, RecordSummary, TxtRecord, TxtValue, Zone};
pub use zones::{base_domain_name_guesses, relative_record_name, zone_name_guesses};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::authenticator::DnsClient;
use crate::constants::{HEADER_API_KEY, HEADER_HMAC, HEADER_REQUEST_DATE};
use crate::errors::ClientError;
use crate::signing::RequestSigner;

/// Client for the Constellix DNS REST API.
#[derive(Debug)]
pub struct ConstellixClient {
    /// HTTP client carrying the API key header
    client: HttpClient,
    /// API base URL without trailing slash
    endpoint: String,
    /// Produces the per-request HMAC headers
    signer: RequestSigner,
}

impl ConstellixClient {
    /// Create a client for `endpoint` authenticated with `api_key` and `secret_key`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the API key cannot be sent as a
    /// header value or the HTTP client cannot be built.
    pub fn new(endpoint: &str, api_key: &str, secret_key: &str) -> Result<Self, ClientError> {
        debug!(endpoint = %endpoint, "Creating Constellix client");

        let mut api_key_value =
            HeaderValue::from_str(api_key).map_err(|e| ClientError::Transport {
                message: format!("API key is not a valid header value: {e}"),
                body: String::new(),
            })?;
        api_key_value.set_sensitive(true);

        let api_key_name =
            HeaderName::from_bytes(HEADER_API_KEY.as_bytes()).map_err(|e| ClientError::Transport {
                message: format!("invalid header name {HEADER_API_KEY}: {e}"),
                body: String::new(),
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(api_key_name, api_key_value);

        let client = HttpClient::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            signer: RequestSigner::new(secret_key),
        })
    }

    /// API base URL this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Full URL for a relative API action.
    #[must_use]
    pub fn url_for(&self, action: &str) -> String {
        format!("{}/{}", self.endpoint, action.trim_start_matches('/'))
    }

    /// Send one signed request and parse the JSON response.
    ///
    /// The security headers are computed immediately before sending, so the
    /// request date reflects send time. Non-success statuses are returned to
    /// the caller, not turned into errors here.
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `action` - Path relative to the endpoint, optionally with a query string
    /// * `body` - Optional JSON body
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the request cannot be sent or the
    /// response body is not valid JSON. The raw body is kept in the error.
    pub async fn api_request<T: Serialize + std::fmt::Debug>(
        &self,
        method: Method,
        action: &str,
        body: Option<&T>,
    ) -> Result<(u16, Value), ClientError> {
        let url = self.url_for(action);
        let signature = self.signer.sign();

        debug!(method = %method, url = %url, body = ?body, "API request to Constellix");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(HEADER_HMAC, signature.hmac)
            .header(HEADER_REQUEST_DATE, signature.request_date);
        if let Some(body_data) = body {
            request = request.json(body_data);
        }

        let response = request.send().await.map_err(|e| ClientError::Transport {
            message: format!("Failed to send HTTP request to {url}: {e}"),
            body: String::new(),
        })?;

        let status = response.status().as_u16();
        let text = response.text().await?;

        debug!(
            method = %method,
            url = %url,
            status = status,
            response_len = text.len(),
            "API response from Constellix"
        );

        let result = serde_json::from_str(&text).map_err(|e| ClientError::Transport {
            message: format!("{method} {url} returned HTTP {status} with a non-JSON body ({e})"),
            body: text,
        })?;

        Ok((status, result))
    }
}

/// Decode a JSON payload into a wire type, keeping the payload on failure.
pub(crate) fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, ClientError> {
    let raw = value.to_string();
    serde_json::from_value(value).map_err(|e| ClientError::Transport {
        message: format!("unexpected {what} payload: {e}"),
        body: raw,
    })
}

/// Fail with [`ClientError::Provider`] unless `status` is 2xx.
pub(crate) fn ensure_success(status: u16, body: &Value) -> Result<(), ClientError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(ClientError::from_provider_response(status, body))
    }
}

#[async_trait]
impl DnsClient for ConstellixClient {
    async fn add_txt_record(
        &self,
        domain: &str,
        record_name: &str,
        record_content: &str,
        record_ttl: u32,
    ) -> Result<(), ClientError> {
        ConstellixClient::add_txt_record(self, domain, record_name, record_content, record_ttl)
            .await
    }

    async fn del_txt_record(
        &self,
        domain: &str,
        record_name: &str,
        record_content: &str,
        record_ttl: u32,
    ) -> Result<(), ClientError> {
        ConstellixClient::del_txt_record(self, domain, record_name, record_content, record_ttl)
            .await
    }
}
