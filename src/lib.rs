// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # constellix-dns01 - Constellix DNS authenticator for ACME dns-01
//!
//! Proves control of a domain during certificate issuance by publishing the
//! ACME validation token as a TXT record in a Constellix-hosted zone, and
//! removing it again afterwards.
//!
//! ## Modules
//!
//! - [`constellix`] - Signed REST client: zone resolution and TXT record reconciliation
//! - [`authenticator`] - `perform`/`cleanup` hooks and the plugin registry
//! - [`config`] - Credentials file loading and authenticator settings
//! - [`signing`] - HMAC-SHA1 request signatures
//! - [`errors`] - Error types
//! - [`constants`] - Header names, defaults and API paths
//!
//! ## Example
//!
//! ```rust,no_run
//! use constellix_dns01::authenticator::{lookup_plugin, Challenge};
//! use constellix_dns01::config::{AuthenticatorConfig, Credentials};
//! use constellix_dns01::constants::PLUGIN_NAME;
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let credentials = Credentials::from_file(Path::new("/etc/letsencrypt/constellix.ini"))?;
//! let authenticator = lookup_plugin(PLUGIN_NAME)
//!     .expect("registered")
//!     .create(AuthenticatorConfig::new(credentials));
//!
//! let challenges = [Challenge::new("example.com", "validation-token")];
//! authenticator.perform(&challenges).await?;
//! // ... the CA validates the record ...
//! authenticator.cleanup(&challenges).await?;
//! # Ok(())
//! # }
//! ```

pub mod authenticator;
pub mod config;
pub mod constants;
pub mod constellix;
pub mod errors;
pub mod signing;
