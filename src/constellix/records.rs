// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! TXT record reconciliation.
//!
//! Records are matched by content, not only by name: several challenge
//! attempts may share `_acme-challenge.<domain>` with different tokens, and a
//! cleanup must never remove a record it did not publish.

use reqwest::Method;
use tracing::{debug, info};

use super::types::{ManagedZone, RecordPayload, RecordSummary, TxtRecord};
use super::zones::exact_search_action;
use super::{decode, ensure_success, ConstellixClient};
use crate::constants::HTTP_OK;
use crate::errors::ClientError;

/// What exists at a relative record name compared with the desired content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExistingTxt {
    /// A record whose full value equals the desired content
    Matching(TxtRecord),
    /// Records exist at the name but none carries the desired content; holds the first
    Other(TxtRecord),
    /// No TXT record exists at the name
    Absent,
}

fn txt_path(zone_id: &str) -> String {
    format!("domains/{zone_id}/records/txt")
}

fn txt_record_path(zone_id: &str, record_id: &str) -> String {
    format!("domains/{zone_id}/records/txt/{record_id}")
}

impl ConstellixClient {
    /// Publish `record_content` at `record_name`.
    ///
    /// Creates the record when nothing exists at the name, updates the existing
    /// record in place when it holds different content, and does nothing when a
    /// record with the same content is already there.
    ///
    /// # Arguments
    /// * `domain` - Domain used to look up the managed zone
    /// * `record_name` - Full record name (typically `_acme-challenge.<domain>`)
    /// * `record_content` - Validation token
    /// * `record_ttl` - TTL in seconds
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ZoneNotFound`] if no managed zone matches, or any
    /// transport or provider error raised while reading or writing the record.
    pub async fn add_txt_record(
        &self,
        domain: &str,
        record_name: &str,
        record_content: &str,
        record_ttl: u32,
    ) -> Result<(), ClientError> {
        let zone = self.find_managed_zone(domain, record_name).await?;
        debug!(
            zone = %zone.name,
            zone_id = %zone.id,
            record_name = %zone.relative_name,
            original = %record_name,
            "Resolved challenge record"
        );

        match self
            .get_existing_txt(&zone.id, &zone.relative_name, record_content)
            .await?
        {
            ExistingTxt::Matching(record) => {
                info!(record_id = %record.id, record_name = %record_name, "TXT record already present");
                Ok(())
            }
            ExistingTxt::Other(record) => {
                info!(record_id = %record.id, record_name = %record_name, "Updating TXT record");
                self.update_txt_record(&zone, &record.id, record_content, record_ttl)
                    .await
            }
            ExistingTxt::Absent => {
                info!(record_name = %record_name, "Inserting new TXT record");
                self.insert_txt_record(&zone, record_content, record_ttl)
                    .await
            }
        }
    }

    /// Remove the TXT record at `record_name` holding `record_content`.
    ///
    /// Does nothing when no such record exists.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ZoneNotFound`] if no managed zone matches, or any
    /// transport or provider error raised while reading or deleting the record.
    pub async fn del_txt_record(
        &self,
        domain: &str,
        record_name: &str,
        record_content: &str,
        _record_ttl: u32,
    ) -> Result<(), ClientError> {
        let zone = self.find_managed_zone(domain, record_name).await?;
        debug!(
            zone = %zone.name,
            zone_id = %zone.id,
            record_name = %zone.relative_name,
            original = %record_name,
            "Resolved challenge record"
        );

        match self
            .get_existing_txt(&zone.id, &zone.relative_name, record_content)
            .await?
        {
            ExistingTxt::Matching(record) => self.delete_txt_record(&zone.id, &record.id).await,
            ExistingTxt::Other(_) | ExistingTxt::Absent => {
                debug!(record_name = %record_name, "No matching TXT record to delete");
                Ok(())
            }
        }
    }

    /// Compare the records at `relative_name` with `record_content`.
    ///
    /// Every record returned by the name search is fetched in full, because the
    /// search result does not carry the values.
    ///
    /// # Errors
    ///
    /// Returns an error if a record fetch fails.
    pub async fn get_existing_txt(
        &self,
        zone_id: &str,
        relative_name: &str,
        record_content: &str,
    ) -> Result<ExistingTxt, ClientError> {
        let mut first = None;

        for summary in self.search_txt_records(zone_id, relative_name).await? {
            let record = self.get_txt_record(zone_id, &summary.id).await?;
            if record.full_value() == record_content {
                return Ok(ExistingTxt::Matching(record));
            }
            first.get_or_insert(record);
        }

        Ok(first.map_or(ExistingTxt::Absent, ExistingTxt::Other))
    }

    /// TXT records at `relative_name`. A non-200 search counts as none.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the result list is malformed.
    pub async fn search_txt_records(
        &self,
        zone_id: &str,
        relative_name: &str,
    ) -> Result<Vec<RecordSummary>, ClientError> {
        let action = exact_search_action(&format!("{}/search", txt_path(zone_id)), relative_name);
        let (status, result) = self.api_request(Method::GET, &action, None::<&()>).await?;

        if status != HTTP_OK {
            debug!(zone_id = %zone_id, record_name = %relative_name, status = status, "TXT search returned no result");
            return Ok(Vec::new());
        }

        decode(result, "TXT record search")
    }

    /// Fetch one TXT record with its values.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Provider`] on a non-success status, or a transport error.
    pub async fn get_txt_record(
        &self,
        zone_id: &str,
        record_id: &str,
    ) -> Result<TxtRecord, ClientError> {
        let (status, result) = self
            .api_request(Method::GET, &txt_record_path(zone_id, record_id), None::<&()>)
            .await?;
        ensure_success(status, &result)?;

        decode(result, "TXT record")
    }

    async fn insert_txt_record(
        &self,
        zone: &ManagedZone,
        record_content: &str,
        record_ttl: u32,
    ) -> Result<(), ClientError> {
        let data = RecordPayload::new(&zone.relative_name, record_content, record_ttl);
        debug!(data = ?data, "Insert with data");

        let (status, result) = self
            .api_request(Method::POST, &txt_path(&zone.id), Some(&data))
            .await?;
        ensure_success(status, &result)
    }

    async fn update_txt_record(
        &self,
        zone: &ManagedZone,
        record_id: &str,
        record_content: &str,
        record_ttl: u32,
    ) -> Result<(), ClientError> {
        let data =
            RecordPayload::new(&zone.relative_name, record_content, record_ttl).with_id(record_id);
        debug!(data = ?data, "Update with data");

        let (status, result) = self
            .api_request(Method::PUT, &txt_record_path(&zone.id, record_id), Some(&data))
            .await?;
        ensure_success(status, &result)
    }

    async fn delete_txt_record(&self, zone_id: &str, record_id: &str) -> Result<(), ClientError> {
        debug!(record_id = %record_id, "Delete TXT record");

        let (status, result) = self
            .api_request(Method::DELETE, &txt_record_path(zone_id, record_id), None::<&()>)
            .await?;
        ensure_success(status, &result)
    }
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod records_tests;
