// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the Constellix dns-01 authenticator.
//!
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Plugin Constants
// ============================================================================

/// Name under which the authenticator is registered with the host
pub const PLUGIN_NAME: &str = "dns-constellix";

/// One-line description shown by the host when listing plugins
pub const PLUGIN_DESCRIPTION: &str =
    "Obtain certificates using a DNS TXT record (if you are using Constellix for DNS).";

/// Longer help text for the plugin
pub const PLUGIN_MORE_INFO: &str = "This plugin configures a DNS TXT record to respond to a \
                                    dns-01 challenge using the Constellix DNS REST API.";

/// Prefix of the record that carries the dns-01 validation token
pub const ACME_CHALLENGE_LABEL: &str = "_acme-challenge";

// ============================================================================
// DNS Record Constants
// ============================================================================

/// Default TTL for challenge TXT records (60 seconds)
pub const DEFAULT_CHALLENGE_TTL_SECS: u32 = 60;

/// Default time to wait for DNS propagation after `perform` (2 minutes)
pub const DEFAULT_PROPAGATION_SECS: u64 = 120;

// ============================================================================
// Constellix API Constants
// ============================================================================

/// Header carrying the raw API key
pub const HEADER_API_KEY: &str = "x-cnsdns-apiKey";

/// Header carrying the base64 HMAC-SHA1 of the request date
pub const HEADER_HMAC: &str = "x-cnsdns-hmac";

/// Header carrying the request date in milliseconds since the epoch
pub const HEADER_REQUEST_DATE: &str = "x-cnsdns-requestDate";

/// Zone search action (exact match on zone name)
pub const ACTION_DOMAIN_SEARCH: &str = "domains/search";

/// HTTP status the provider returns for a successful search
pub const HTTP_OK: u16 = 200;

// ============================================================================
// Credentials Constants
// ============================================================================

/// Prefix Certbot-style credential files put in front of every key
pub const CREDENTIALS_KEY_PREFIX: &str = "dns_constellix_";

/// Credential file permission bits that should not be set (group/other access)
pub const CREDENTIALS_INSECURE_MODE_MASK: u32 = 0o077;
