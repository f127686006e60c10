// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! dns-01 authenticator exposed to the certificate issuance agent.
//!
//! The agent drives two lifecycle hooks:
//!
//! - `perform` publishes the validation token for every challenge
//! - `cleanup` removes the tokens again once validation is over
//!
//! Each hook builds a fresh [`DnsClient`] from the configured credentials, so
//! independent invocations share no state. The authenticator is registered in
//! [`PLUGIN_REGISTRY`] and created through [`lookup_plugin`].

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{AuthenticatorConfig, Credentials};
use crate::constants::{
    ACME_CHALLENGE_LABEL, PLUGIN_DESCRIPTION, PLUGIN_MORE_INFO, PLUGIN_NAME,
};
use crate::constellix::ConstellixClient;
use crate::errors::{ClientError, PluginError};

/// Operations the authenticator needs from a DNS provider client.
#[async_trait]
pub trait DnsClient: Send + Sync {
    /// Make sure a TXT record with `record_content` exists at `record_name`.
    async fn add_txt_record(
        &self,
        domain: &str,
        record_name: &str,
        record_content: &str,
        record_ttl: u32,
    ) -> Result<(), ClientError>;

    /// Remove the TXT record with `record_content` at `record_name`, if any.
    async fn del_txt_record(
        &self,
        domain: &str,
        record_name: &str,
        record_content: &str,
        record_ttl: u32,
    ) -> Result<(), ClientError>;
}

/// Builds a DNS client from credentials.
pub type ClientFactory =
    Arc<dyn Fn(&Credentials) -> Result<Box<dyn DnsClient>, ClientError> + Send + Sync>;

/// A single dns-01 challenge handed over by the issuance agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Domain being validated, possibly a wildcard (`*.example.com`)
    pub domain: String,
    /// Token to publish in the TXT record
    pub validation: String,
}

impl Challenge {
    #[must_use]
    pub fn new(domain: &str, validation: &str) -> Self {
        Self {
            domain: domain.to_string(),
            validation: validation.to_string(),
        }
    }

    /// Name of the TXT record that carries the token.
    ///
    /// `*.example.com` and `example.com` both map to `_acme-challenge.example.com`.
    #[must_use]
    pub fn validation_domain_name(&self) -> String {
        let domain = self.domain.trim_end_matches('.');
        let domain = domain.strip_prefix("*.").unwrap_or(domain);
        format!("{ACME_CHALLENGE_LABEL}.{domain}")
    }
}

fn constellix_client_factory() -> ClientFactory {
    Arc::new(|credentials: &Credentials| {
        let client = ConstellixClient::new(
            &credentials.endpoint,
            &credentials.api_key,
            &credentials.secret_key,
        )?;
        Ok(Box::new(client) as Box<dyn DnsClient>)
    })
}

/// Constellix dns-01 authenticator.
pub struct Authenticator {
    config: AuthenticatorConfig,
    client_factory: ClientFactory,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Create an authenticator that talks to the Constellix REST API.
    #[must_use]
    pub fn new(config: AuthenticatorConfig) -> Self {
        Self {
            config,
            client_factory: constellix_client_factory(),
        }
    }

    /// Replace the way DNS clients are built.
    #[must_use]
    pub fn with_client_factory(mut self, client_factory: ClientFactory) -> Self {
        self.client_factory = client_factory;
        self
    }

    /// TTL used for challenge records.
    #[must_use]
    pub fn ttl(&self) -> u32 {
        self.config.ttl
    }

    fn client(&self) -> Result<Box<dyn DnsClient>, PluginError> {
        Ok((self.client_factory)(&self.config.credentials)?)
    }

    /// Publish the validation token of every challenge.
    ///
    /// Stops at the first failure, which aborts issuance for that domain.
    ///
    /// # Errors
    ///
    /// Returns a [`PluginError`] describing the first challenge that failed.
    pub async fn perform(&self, challenges: &[Challenge]) -> Result<(), PluginError> {
        for challenge in challenges {
            let validation_name = challenge.validation_domain_name();
            info!(domain = %challenge.domain, record_name = %validation_name, "Publishing dns-01 challenge");

            self.client()?
                .add_txt_record(
                    &challenge.domain,
                    &validation_name,
                    &challenge.validation,
                    self.config.ttl,
                )
                .await?;
        }

        Ok(())
    }

    /// Remove the validation token of every challenge.
    ///
    /// Every challenge is attempted even if an earlier one fails; failures are
    /// logged and the first one is returned. Whether a failed cleanup should
    /// fail issuance is for the caller to decide.
    ///
    /// # Errors
    ///
    /// Returns a [`PluginError`] describing the first challenge that failed.
    pub async fn cleanup(&self, challenges: &[Challenge]) -> Result<(), PluginError> {
        let mut first_error = None;

        for challenge in challenges {
            let validation_name = challenge.validation_domain_name();
            debug!(domain = %challenge.domain, record_name = %validation_name, "Cleaning up dns-01 challenge");

            let result = match self.client() {
                Ok(client) => client
                    .del_txt_record(
                        &challenge.domain,
                        &validation_name,
                        &challenge.validation,
                        self.config.ttl,
                    )
                    .await
                    .map_err(PluginError::from),
                Err(e) => Err(e),
            };

            if let Err(e) = result {
                warn!(domain = %challenge.domain, error = %e, "Failed to clean up dns-01 challenge");
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

/// Registry entry the host uses to discover and create the authenticator.
#[derive(Debug, Clone, Copy)]
pub struct PluginEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub more_info: &'static str,
    pub factory: fn(AuthenticatorConfig) -> Authenticator,
}

impl PluginEntry {
    /// Create the authenticator for `config`.
    #[must_use]
    pub fn create(&self, config: AuthenticatorConfig) -> Authenticator {
        (self.factory)(config)
    }
}

/// Authenticators provided by this crate.
pub static PLUGIN_REGISTRY: &[PluginEntry] = &[PluginEntry {
    name: PLUGIN_NAME,
    description: PLUGIN_DESCRIPTION,
    more_info: PLUGIN_MORE_INFO,
    factory: Authenticator::new,
}];

/// Find a registered authenticator by name.
#[must_use]
pub fn lookup_plugin(name: &str) -> Option<&'static PluginEntry> {
    PLUGIN_REGISTRY.iter().find(|entry| entry.name == name)
}

#[cfg(test)]
#[path = "authenticator_tests.rs"]
mod authenticator_tests;
