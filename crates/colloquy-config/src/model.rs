// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Colloquy history store.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup rather than silently ignoring them.

use serde::{Deserialize, Serialize};

/// Top-level Colloquy configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ColloquyConfig {
    /// Store operation settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Record retention windows.
    #[serde(default)]
    pub retention: RetentionConfig,
}

/// Store operation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Per-operation deadline in milliseconds. Operations that exceed it
    /// report the store as unavailable; idempotent retries are safe.
    #[serde(default = "default_op_timeout_ms")]
    pub op_timeout_ms: u64,

    /// Page size used when a caller supplies no limit.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Hard cap applied to caller-supplied page limits.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            op_timeout_ms: default_op_timeout_ms(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_op_timeout_ms() -> u64 {
    5_000
}

fn default_page_size() -> usize {
    50
}

fn default_max_page_size() -> usize {
    200
}

/// Retention window configuration.
///
/// The same windows apply to a thread's metadata row and all of its
/// messages, so a listing never shows a thread whose records were retired
/// on a different schedule.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetentionConfig {
    /// Retention window for temporary threads, in hours.
    #[serde(default = "default_temporary_hours")]
    pub temporary_hours: u64,

    /// Retention window for ordinary threads, in hours. Zero means records
    /// never expire.
    #[serde(default)]
    pub standard_hours: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            temporary_hours: default_temporary_hours(),
            standard_hours: 0,
        }
    }
}

fn default_temporary_hours() -> u64 {
    168 // 7 days
}
