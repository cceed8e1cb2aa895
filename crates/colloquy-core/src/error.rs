// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Colloquy conversation history store.

use thiserror::Error;

/// The primary error type used across store operations and the key encoder.
///
/// Encoding and validation errors are raised before any backend call is
/// issued; backend failures are wrapped in [`HistoryError::Unavailable`] so
/// callers can make the retry decision themselves.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// An identifier violated a key-encoding precondition (empty value or
    /// embedded key delimiter).
    #[error("invalid identifier in {field}: {reason}")]
    InvalidIdentifier { field: String, reason: String },

    /// A timestamp does not fit the fixed-width sort-key encoding.
    #[error("timestamp {value} exceeds the sort-key encoding range")]
    TimestampOutOfRange { value: u64 },

    /// A point lookup or conditional update targeted a record that does not
    /// exist (or has already expired).
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation is not permitted in the entity's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Transient backend or network failure. Idempotent operations are safe
    /// to retry with the same inputs.
    #[error("store unavailable: {source}")]
    Unavailable {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HistoryError {
    /// Builds an [`HistoryError::Unavailable`] from any error source.
    pub fn unavailable(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Unavailable {
            source: source.into(),
        }
    }

    /// Whether retrying the failed operation with identical inputs may
    /// succeed. Only transient backend failures are retryable; every other
    /// variant reports a caller or data error that a retry cannot fix.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}
