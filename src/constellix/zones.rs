// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Managed zone resolution.
//!
//! The provider may host the exact subdomain or only a parent zone, so the
//! lookup tries the challenge record name first and then walks up the label
//! tree of the domain, longest candidate first.

use reqwest::Method;
use tracing::{debug, warn};
use url::form_urlencoded;

use super::types::{ManagedZone, Zone};
use super::{decode, ConstellixClient};
use crate::constants::{ACTION_DOMAIN_SEARCH, HTTP_OK};
use crate::errors::ClientError;

/// Strip a wildcard prefix and any trailing root dot from a domain.
fn normalize_domain(domain: &str) -> &str {
    let domain = domain.trim_end_matches('.');
    domain.strip_prefix("*.").unwrap_or(domain)
}

/// All suffixes of `domain`, from the domain itself down to its top-level label.
///
/// `sub.example.com` yields `sub.example.com`, `example.com`, `com`.
#[must_use]
pub fn base_domain_name_guesses(domain: &str) -> Vec<String> {
    let labels: Vec<&str> = normalize_domain(domain)
        .split('.')
        .filter(|label| !label.is_empty())
        .collect();

    (0..labels.len()).map(|i| labels[i..].join(".")).collect()
}

/// Ordered zone name candidates for a challenge record.
///
/// The full record name comes first, followed by [`base_domain_name_guesses`].
#[must_use]
pub fn zone_name_guesses(domain: &str, record_name: &str) -> Vec<String> {
    let mut guesses = vec![record_name.trim_end_matches('.').to_string()];
    for guess in base_domain_name_guesses(domain) {
        if !guesses.contains(&guess) {
            guesses.push(guess);
        }
    }
    guesses
}

/// Record name relative to `zone_name`.
///
/// `_acme-challenge.sub.example.com` in zone `example.com` becomes
/// `_acme-challenge.sub`. The zone apex maps to an empty name; a record
/// outside the zone is returned unchanged.
#[must_use]
pub fn relative_record_name(record_name: &str, zone_name: &str) -> String {
    let record_name = record_name.trim_end_matches('.');
    let zone_name = zone_name.trim_end_matches('.');

    if record_name.eq_ignore_ascii_case(zone_name) {
        return String::new();
    }

    let split = record_name.len().checked_sub(zone_name.len() + 1);
    match split {
        Some(at)
            if record_name.is_char_boundary(at)
                && record_name[at..].starts_with('.')
                && record_name[at + 1..].eq_ignore_ascii_case(zone_name) =>
        {
            record_name[..at].to_string()
        }
        _ => record_name.to_string(),
    }
}

/// Action for an exact-match search on `name` below `path`.
pub(crate) fn exact_search_action(path: &str, name: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(name.as_bytes()).collect();
    format!("{path}?exact={encoded}")
}

impl ConstellixClient {
    /// Find the zone the provider hosts for `record_name`.
    ///
    /// Each candidate from [`zone_name_guesses`] is searched in turn; the first
    /// one with a non-empty result wins. A failed search only rules out that
    /// candidate, since most guesses are expected to miss.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ZoneNotFound`] if no candidate matches.
    pub async fn find_managed_zone(
        &self,
        domain: &str,
        record_name: &str,
    ) -> Result<ManagedZone, ClientError> {
        for zone_name in zone_name_guesses(domain, record_name) {
            debug!(zone = %zone_name, "Looking for zone");

            match self.search_zone(&zone_name).await {
                Ok(Some(zone)) => {
                    let relative_name = relative_record_name(record_name, &zone.name);
                    debug!(
                        zone = %zone.name,
                        zone_id = %zone.id,
                        record_name = %relative_name,
                        "Found managed zone"
                    );
                    return Ok(ManagedZone {
                        id: zone.id,
                        name: zone.name,
                        relative_name,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    debug!(zone = %zone_name, error = %e, "Zone search failed, trying next candidate");
                }
            }
        }

        Err(ClientError::ZoneNotFound {
            domain: domain.to_string(),
        })
    }

    /// Exact-match search for a single zone name.
    ///
    /// Returns `Ok(None)` when the provider does not host `zone_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the result list is malformed.
    pub async fn search_zone(&self, zone_name: &str) -> Result<Option<Zone>, ClientError> {
        let action = exact_search_action(ACTION_DOMAIN_SEARCH, zone_name);
        let (status, result) = self.api_request(Method::GET, &action, None::<&()>).await?;

        if status != HTTP_OK {
            debug!(zone = %zone_name, status = status, "Zone search returned no result");
            return Ok(None);
        }

        let zones: Vec<Zone> = decode(result, "zone search")?;
        if zones.len() > 1 {
            warn!(
                zone = %zone_name,
                matches = zones.len(),
                "Exact zone search returned several zones, using the first"
            );
        }

        Ok(zones.into_iter().next())
    }
}

#[cfg(test)]
#[path = "zones_tests.rs"]
mod zones_tests;
