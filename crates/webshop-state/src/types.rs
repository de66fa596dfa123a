//! Request and result types for the state store client.
//!
//! Results are plain values built once per call. Their fields are private
//! so the found/missing and succeeded/rejected invariants hold by
//! construction: a missing read never carries a value, and a successful
//! call never carries error details.

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// A single key/value pair in a batch write.
///
/// Serializes to the wire shape `{"key": ..., "value": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateEntry<T> {
    pub key: String,
    pub value: T,
}

impl<T> StateEntry<T> {
    pub fn new(key: impl Into<String>, value: T) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

// ── Reads ──────────────────────────────────────────────────────────

/// Outcome of a state read.
#[derive(Debug, Clone, PartialEq)]
pub struct GetResult<T> {
    value: Option<T>,
    status_code: u16,
    error_reason: Option<String>,
    error_body: Option<String>,
}

impl<T> GetResult<T> {
    /// The store returned the value.
    pub fn found(value: T, status: StatusCode) -> Self {
        Self {
            value: Some(value),
            status_code: status.as_u16(),
            error_reason: None,
            error_body: None,
        }
    }

    /// The store answered with a non-OK status (absence or rejection).
    pub fn missing(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            value: None,
            status_code: status.as_u16(),
            error_reason: status.canonical_reason().map(str::to_string),
            error_body: Some(body.into()),
        }
    }

    pub fn is_found(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// Raw status code observed on the wire.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Canonical status phrase, e.g. `"Not Found"`. `None` when found.
    pub fn error_reason(&self) -> Option<&str> {
        self.error_reason.as_deref()
    }

    /// Raw response payload of a non-OK read. `None` when found.
    pub fn error_body(&self) -> Option<&str> {
        self.error_body.as_deref()
    }
}

// ── Writes ─────────────────────────────────────────────────────────

/// Outcome of a state write (single or batched).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetResult {
    success: bool,
    status_code: u16,
    error_reason: Option<String>,
    error_body: Option<String>,
}

impl SetResult {
    pub fn succeeded(status: StatusCode) -> Self {
        Self {
            success: true,
            status_code: status.as_u16(),
            error_reason: None,
            error_body: None,
        }
    }

    pub fn rejected(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: status.as_u16(),
            error_reason: status.canonical_reason().map(str::to_string),
            error_body: Some(body.into()),
        }
    }

    /// Whether the status is one that counts as a committed write (200/201).
    pub fn is_success_status(status: StatusCode) -> bool {
        status == StatusCode::OK || status == StatusCode::CREATED
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn error_reason(&self) -> Option<&str> {
        self.error_reason.as_deref()
    }

    pub fn error_body(&self) -> Option<&str> {
        self.error_body.as_deref()
    }
}
