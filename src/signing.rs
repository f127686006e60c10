// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Request signing for the Constellix REST API.
//!
//! Every request proves possession of the API secret by sending the current
//! time in milliseconds together with a base64 HMAC-SHA1 of that timestamp,
//! keyed by the secret. The signature is produced right before each request.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::sync::atomic::{AtomicI64, Ordering};

type HmacSha1 = Hmac<Sha1>;

/// Security headers for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSignature {
    /// Milliseconds since the Unix epoch, as sent in `x-cnsdns-requestDate`
    pub request_date: String,
    /// Base64 HMAC-SHA1 of `request_date`, as sent in `x-cnsdns-hmac`
    pub hmac: String,
}

/// Compute the base64 HMAC-SHA1 of `message` keyed by `secret`.
#[must_use]
pub fn hmac_sha1_base64(secret: &str, message: &str) -> String {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(message.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Signs requests with a shared secret.
///
/// Request dates handed out by one signer are strictly increasing, so two
/// requests issued within the same millisecond still carry distinct dates and
/// digests.
#[derive(Debug)]
pub struct RequestSigner {
    secret: String,
    last_request_ms: AtomicI64,
}

impl RequestSigner {
    #[must_use]
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
            last_request_ms: AtomicI64::new(0),
        }
    }

    /// Produce the security headers for a request about to be sent.
    #[must_use]
    pub fn sign(&self) -> RequestSignature {
        self.sign_at(chrono::Utc::now().timestamp_millis())
    }

    /// Produce the security headers as if the clock read `now_ms`.
    #[must_use]
    pub fn sign_at(&self, now_ms: i64) -> RequestSignature {
        let request_date = self.next_request_date(now_ms).to_string();
        let hmac = hmac_sha1_base64(&self.secret, &request_date);

        RequestSignature { request_date, hmac }
    }

    fn next_request_date(&self, now_ms: i64) -> i64 {
        let mut last = self.last_request_ms.load(Ordering::SeqCst);
        loop {
            let next = now_ms.max(last + 1);
            match self.last_request_ms.compare_exchange(
                last,
                next,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return next,
                Err(current) => last = current,
            }
        }
    }
}

#[cfg(test)]
#[path = "signing_tests.rs"]
mod signing_tests;
