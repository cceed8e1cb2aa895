// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! History store operations for Colloquy.
//!
//! [`HistoryStore`] is the only component that talks to the backend. It
//! enforces the cross-record invariants: message/metadata key derivation via
//! `colloquy-keys`, retention stamping on every write, idempotent append,
//! partial feedback merge, and key-based (never offset-based) pagination.
//!
//! The store is a stateless facade over the shared backend handle; clones
//! are cheap and every operation may run on any task without coordination.

mod listing;
mod paging;
mod retention;
mod store;
mod token;

pub use paging::{HistoryPage, PageRequest};
pub use retention::RetentionPolicy;
pub use store::HistoryStore;
