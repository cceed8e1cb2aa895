// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend trait definitions for the Colloquy store.
//!
//! The backend is modeled abstractly as a wide-column key-value store with
//! item-level atomicity, ordered range scans over the sort key, and named
//! secondary-index projections. Implementations use `#[async_trait]` for
//! dynamic dispatch compatibility.

pub mod backend;

pub use backend::{
    Attributes, BackendError, Item, QueryPage, QueryRequest, SortCondition, UpdateRequest,
    WideColumnStore, EXPIRY_TIME_ATTR, SK_MESSAGE_ATTR, SK_TIMESTAMP_THREAD_ATTR,
};
