// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Authenticator configuration and credentials file loading.
//!
//! Credentials are read from a Certbot-style INI file:
//!
//! ```ini
//! dns_constellix_endpoint = https://api.dns.constellix.com/v1
//! dns_constellix_apikey = 00000000-0000-0000-0000-000000000000
//! dns_constellix_secretkey = 00000000-0000-0000-0000-000000000000
//! ```
//!
//! The `dns_constellix_` prefix is optional. Loading fails immediately if any of
//! the three values is missing or blank.

use ::config::{Config, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

use crate::constants::{CREDENTIALS_KEY_PREFIX, DEFAULT_CHALLENGE_TTL_SECS};
use crate::errors::ConfigError;

/// Credentials for the Constellix REST API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API base URL, e.g. `https://api.dns.constellix.com/v1`
    pub endpoint: String,
    /// API key sent as-is with every request
    pub api_key: String,
    /// Secret used to sign the request date
    pub secret_key: String,
}

// The secret must never reach logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Raw INI contents before validation.
#[derive(Debug, Default, Deserialize)]
struct RawCredentials {
    #[serde(alias = "endpoint")]
    dns_constellix_endpoint: Option<String>,
    #[serde(alias = "apikey")]
    dns_constellix_apikey: Option<String>,
    #[serde(alias = "secretkey")]
    dns_constellix_secretkey: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Credentials {
    /// Validate the three credential values.
    ///
    /// `source` names where the values came from and is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] listing every missing or blank value,
    /// or [`ConfigError::InvalidValue`] if the endpoint is not an http(s) URL.
    pub fn from_values(
        source: &str,
        endpoint: Option<String>,
        api_key: Option<String>,
        secret_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        let endpoint = non_blank(endpoint);
        let api_key = non_blank(api_key);
        let secret_key = non_blank(secret_key);

        let missing: Vec<String> = [
            ("endpoint", endpoint.is_none()),
            ("apikey", api_key.is_none()),
            ("secretkey", secret_key.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(key, _)| format!("{CREDENTIALS_KEY_PREFIX}{key}"))
        .collect();

        match (endpoint, api_key, secret_key) {
            (Some(endpoint), Some(api_key), Some(secret_key)) => {
                validate_endpoint(&endpoint)?;
                Ok(Self {
                    endpoint,
                    api_key,
                    secret_key,
                })
            }
            _ => Err(ConfigError::MissingField {
                path: source.to_string(),
                fields: missing,
            }),
        }
    }

    /// Load credentials from an INI file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the file cannot be read or parsed, and the
    /// errors of [`Credentials::from_values`] for missing or invalid values.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        warn_if_insecure(path);

        let raw: RawCredentials = Config::builder()
            .add_source(File::from(path).format(FileFormat::Ini).required(true))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| ConfigError::Load {
                path: display.clone(),
                reason: e.to_string(),
            })?;

        debug!(path = %path.display(), "Loaded Constellix credentials file");

        Self::from_values(
            &display,
            raw.dns_constellix_endpoint,
            raw.dns_constellix_apikey,
            raw.dns_constellix_secretkey,
        )
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let url = url::Url::parse(endpoint).map_err(|e| ConfigError::InvalidValue {
        field: format!("{CREDENTIALS_KEY_PREFIX}endpoint"),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue {
            field: format!("{CREDENTIALS_KEY_PREFIX}endpoint"),
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}

#[cfg(unix)]
fn warn_if_insecure(path: &Path) {
    use crate::constants::CREDENTIALS_INSECURE_MODE_MASK;
    use std::os::unix::fs::PermissionsExt;

    if let Ok(metadata) = std::fs::metadata(path) {
        let mode = metadata.permissions().mode() & 0o777;
        if mode & CREDENTIALS_INSECURE_MODE_MASK != 0 {
            warn!(
                path = %path.display(),
                mode = %format!("{mode:o}"),
                "Credentials file is accessible by other users (should be 0600 or 0400)"
            );
        }
    }
}

#[cfg(not(unix))]
fn warn_if_insecure(_path: &Path) {}

/// Settings the authenticator is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatorConfig {
    pub credentials: Credentials,
    /// TTL of the challenge record in seconds
    pub ttl: u32,
}

impl AuthenticatorConfig {
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            ttl: DEFAULT_CHALLENGE_TTL_SECS,
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
