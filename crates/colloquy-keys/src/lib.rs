// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic key encoding for the Colloquy history store.
//!
//! Pure functions mapping logical identity (org, tenant, user, thread,
//! message, timestamp) to the physical partition/sort key strings and the
//! secondary-index projection keys. No I/O.
//!
//! The encoding is the load-bearing invariant of the whole storage scheme:
//! timestamps are zero-padded to a fixed width so byte ordering of sort keys
//! equals chronological ordering, and the prefix tokens (`MSG#`, `LLM#`,
//! `THREAD#`) are frozen. Changing either is a breaking schema migration.

pub mod partition;
pub mod sort;

pub use partition::{decode_partition_key, partition_key, user_partition_key};
pub use sort::{
    message_kind_prefix, message_lookup_key, message_sort_key, thread_recency_key,
    thread_recency_prefix, thread_sort_key, MAX_ENCODABLE_TIMESTAMP, TIMESTAMP_WIDTH,
};

/// Field delimiter within every physical key. Identifiers containing it are
/// rejected before any backend call.
pub const KEY_DELIMITER: char = '#';

pub(crate) use partition::validate_identifier;
