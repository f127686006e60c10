// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the Constellix dns-01 authenticator.
//!
//! This module provides specialized error types for:
//! - Constellix REST API communication (transport, zone lookup, provider rejections)
//! - Loading and validating the credentials file
//! - The single failure type surfaced to the issuance agent

use serde_json::Value;
use thiserror::Error;

/// Errors raised by the Constellix API client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Network failure or a response body that is not JSON.
    ///
    /// `body` keeps the raw response text so unexpected provider output can be diagnosed.
    #[error("API response unknown: {message}: {body}")]
    Transport {
        /// What went wrong on the wire
        message: String,
        /// Raw response text (empty when no response was received)
        body: String,
    },

    /// No candidate zone name matched a zone hosted by the provider.
    #[error("Domain not known: no managed zone found for '{domain}'")]
    ZoneNotFound {
        /// The domain whose zone could not be resolved
        domain: String,
    },

    /// The provider answered with a well-formed JSON error payload.
    #[error("Constellix API error (HTTP {status}): {message}")]
    Provider {
        /// HTTP status code returned by the provider
        status: u16,
        /// Error text extracted from the response payload
        message: String,
    },
}

impl ClientError {
    /// Build a [`ClientError::Provider`] from a non-success response.
    ///
    /// Constellix reports failures as `{"errors": ["..."]}`; a `message` field
    /// and finally the whole payload are used as fallbacks.
    #[must_use]
    pub fn from_provider_response(status: u16, body: &Value) -> Self {
        let message = match body.get("errors") {
            Some(Value::Array(errors)) if !errors.is_empty() => errors
                .iter()
                .map(|e| e.as_str().map_or_else(|| e.to_string(), str::to_string))
                .collect::<Vec<_>>()
                .join("; "),
            _ => body
                .get("message")
                .and_then(Value::as_str)
                .map_or_else(|| body.to_string(), str::to_string),
        };

        Self::Provider { status, message }
    }

    /// Returns `true` if this error means the zone walk found nothing.
    #[must_use]
    pub fn is_zone_not_found(&self) -> bool {
        matches!(self, Self::ZoneNotFound { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
            body: String::new(),
        }
    }
}

/// Errors raised while loading authenticator configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required credential keys are absent or blank.
    #[error("Missing required credential(s) in {path}: {}", .fields.join(", "))]
    MissingField {
        /// Credentials file that was read
        path: String,
        /// Every required key that was missing
        fields: Vec<String>,
    },

    /// The credentials file could not be read or parsed.
    #[error("Failed to load credentials file {path}: {reason}")]
    Load {
        /// Credentials file that was read
        path: String,
        /// Underlying reason
        reason: String,
    },

    /// A configured value is present but unusable.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Offending key
        field: String,
        /// Why the value was rejected
        reason: String,
    },
}

/// The single failure type surfaced to the issuance agent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PluginError(pub String);

impl From<ClientError> for PluginError {
    fn from(err: ClientError) -> Self {
        Self(err.to_string())
    }
}

impl From<ConfigError> for PluginError {
    fn from(err: ConfigError) -> Self {
        Self(err.to_string())
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
