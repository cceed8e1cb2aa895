// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./colloquy.toml` > `~/.config/colloquy/colloquy.toml`
//! > `/etc/colloquy/colloquy.toml`, with environment variable overrides via
//! the `COLLOQUY_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ColloquyConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/colloquy/colloquy.toml` (system-wide)
/// 3. `~/.config/colloquy/colloquy.toml` (user XDG config)
/// 4. `./colloquy.toml` (local directory)
/// 5. `COLLOQUY_*` environment variables
pub fn load_config() -> Result<ColloquyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ColloquyConfig::default()))
        .merge(Toml::file("/etc/colloquy/colloquy.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("colloquy/colloquy.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("colloquy.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<ColloquyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ColloquyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ColloquyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ColloquyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `COLLOQUY_STORE_OP_TIMEOUT_MS` must map
/// to `store.op_timeout_ms`, not `store.op.timeout.ms`.
fn env_provider() -> Env {
    Env::prefixed("COLLOQUY_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("store_", "store.", 1)
            .replacen("retention_", "retention.", 1);
        mapped.into()
    })
}
