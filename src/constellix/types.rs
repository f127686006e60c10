// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Wire types for the Constellix REST API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accept ids sent either as JSON numbers or strings.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {other}"
        ))),
    }
}

/// A zone hosted by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Zone {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
}

/// Entry returned by the TXT record search; only the id is needed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecordSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
}

/// One part of a TXT record value, stored quoted by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TxtValue {
    pub value: String,
}

/// Full TXT record as returned by `domains/{zone}/records/txt/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TxtRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub value: Vec<TxtValue>,
}

impl TxtRecord {
    /// Concatenation of every value part with surrounding quotes stripped.
    ///
    /// Long TXT values are split by the provider into several quoted strings,
    /// e.g. `["\"ab\"", "\"cd\""]` reads back as `abcd`.
    #[must_use]
    pub fn full_value(&self) -> String {
        self.value
            .iter()
            .map(|part| part.value.trim_matches('"'))
            .collect()
    }
}

/// Single round-robin value in a record write payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundRobinValue {
    pub value: String,
}

/// Body of TXT record create (`POST`) and update (`PUT`) requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub ttl: u32,
    pub round_robin: Vec<RoundRobinValue>,
}

impl RecordPayload {
    /// Payload for a new record holding exactly `content`.
    #[must_use]
    pub fn new(name: &str, content: &str, ttl: u32) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            ttl,
            round_robin: vec![RoundRobinValue {
                value: content.to_string(),
            }],
        }
    }

    /// Same payload addressed at an existing record.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }
}

/// Zone resolved for a challenge record, with the record name made relative to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedZone {
    pub id: String,
    pub name: String,
    /// Record name with the zone suffix removed (empty at the zone apex)
    pub relative_name: String,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
