// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Colloquy tests.
//!
//! Provides a manually-driven clock and fixture builders for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`ManualClock`] - settable/advancing [`colloquy_core::Clock`]
//! - [`fixtures`] - scope and message builders shared across crates

pub mod clock;
pub mod fixtures;

pub use clock::ManualClock;
pub use fixtures::{
    assistant_message, random_message_id, tenant_thread_scope, thread_scope, user_message,
};
