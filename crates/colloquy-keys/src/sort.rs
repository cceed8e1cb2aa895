// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sort keys and secondary-index projection keys.
//!
//! Message sort keys embed the timestamp zero-padded to [`TIMESTAMP_WIDTH`]
//! digits, so byte ordering equals chronological ordering, with the message
//! id as tie-break after an equal timestamp prefix. The width covers epoch
//! milliseconds through roughly year 5138; both the width and the prefix
//! tokens are frozen schema constants.

use colloquy_core::{HistoryError, MessageId, MessageKind, ThreadId};

use crate::{validate_identifier, KEY_DELIMITER};

/// Fixed digit width of every encoded timestamp.
pub const TIMESTAMP_WIDTH: usize = 19;

/// Largest timestamp the fixed-width encoding can hold (19 nines).
pub const MAX_ENCODABLE_TIMESTAMP: u64 = 9_999_999_999_999_999_999;

const THREAD_PREFIX: &str = "THREAD";

fn kind_prefix(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Plain => "MSG",
        MessageKind::ModelGenerated => "LLM",
    }
}

fn encode_timestamp(timestamp: u64) -> Result<String, HistoryError> {
    if timestamp > MAX_ENCODABLE_TIMESTAMP {
        return Err(HistoryError::TimestampOutOfRange { value: timestamp });
    }
    Ok(format!("{timestamp:0width$}", width = TIMESTAMP_WIDTH))
}

/// Primary sort key of a message: `MSG#<padded ts>#<id>` or `LLM#<…>`.
pub fn message_sort_key(
    kind: MessageKind,
    timestamp: u64,
    message_id: &MessageId,
) -> Result<String, HistoryError> {
    validate_identifier("message_id", &message_id.0)?;
    Ok(format!(
        "{}{KEY_DELIMITER}{}{KEY_DELIMITER}{}",
        kind_prefix(kind),
        encode_timestamp(timestamp)?,
        message_id.0
    ))
}

/// Id-lookup projection key of a message: `MSG#<id>` or `LLM#<id>`.
///
/// Carries no timestamp, so a message is addressable by id alone regardless
/// of when it was written.
pub fn message_lookup_key(kind: MessageKind, message_id: &MessageId) -> Result<String, HistoryError> {
    validate_identifier("message_id", &message_id.0)?;
    Ok(format!(
        "{}{KEY_DELIMITER}{}",
        kind_prefix(kind),
        message_id.0
    ))
}

/// Sort-key prefix selecting every message of one kind, delimiter included.
pub fn message_kind_prefix(kind: MessageKind) -> String {
    format!("{}{KEY_DELIMITER}", kind_prefix(kind))
}

/// Primary sort key of a thread metadata row: `THREAD#<thread_id>`.
pub fn thread_sort_key(thread_id: &ThreadId) -> Result<String, HistoryError> {
    validate_identifier("thread_id", &thread_id.0)?;
    Ok(format!("{THREAD_PREFIX}{KEY_DELIMITER}{}", thread_id.0))
}

/// Recency projection key of a thread: `THREAD#<padded ts>#<thread_id>`.
///
/// Refreshed on every append, so a descending scan of the projection yields
/// threads most-recently-active first.
pub fn thread_recency_key(timestamp: u64, thread_id: &ThreadId) -> Result<String, HistoryError> {
    validate_identifier("thread_id", &thread_id.0)?;
    Ok(format!(
        "{THREAD_PREFIX}{KEY_DELIMITER}{}{KEY_DELIMITER}{}",
        encode_timestamp(timestamp)?,
        thread_id.0
    ))
}

/// Sort-key prefix selecting every recency projection entry.
pub fn thread_recency_prefix() -> String {
    format!("{THREAD_PREFIX}{KEY_DELIMITER}")
}
