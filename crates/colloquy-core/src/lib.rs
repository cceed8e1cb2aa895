// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Colloquy conversation history store.
//!
//! This crate provides the foundational error taxonomy, identifier types,
//! persisted record shapes, and the abstract wide-column backend trait used
//! throughout the Colloquy workspace. Backend implementations and the
//! history store itself live in sibling crates.

pub mod clock;
pub mod error;
pub mod records;
pub mod request;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use clock::{Clock, SystemClock};
pub use error::HistoryError;
pub use records::{MessageContent, MessageRecord, Source, ThreadRecord};
pub use request::{FeedbackUpdate, NewMessage};
pub use traits::{
    Attributes, BackendError, Item, QueryPage, QueryRequest, SortCondition, UpdateRequest,
    WideColumnStore, EXPIRY_TIME_ATTR, SK_MESSAGE_ATTR, SK_TIMESTAMP_THREAD_ATTR,
};
pub use types::{
    FeedbackDirection, MessageId, MessageKind, OrgId, Role, TenantId, ThreadId, ThreadScope,
    UserId, UserScope,
};
