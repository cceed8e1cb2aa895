// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Errors are collected, not fail-fast, so a single run reports
//! everything that needs fixing.

use crate::diagnostic::ConfigError;
use crate::model::ColloquyConfig;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &ColloquyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.store.op_timeout_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "store.op_timeout_ms must be at least 1".to_string(),
        });
    }

    if config.store.default_page_size == 0 {
        errors.push(ConfigError::Validation {
            message: "store.default_page_size must be at least 1".to_string(),
        });
    }

    if config.store.max_page_size < config.store.default_page_size {
        errors.push(ConfigError::Validation {
            message: format!(
                "store.max_page_size ({}) must not be smaller than store.default_page_size ({})",
                config.store.max_page_size, config.store.default_page_size
            ),
        });
    }

    if config.retention.temporary_hours == 0 {
        errors.push(ConfigError::Validation {
            message: "retention.temporary_hours must be at least 1 \
                      (temporary threads always expire)"
                .to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RetentionConfig, StoreConfig};

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ColloquyConfig::default()).is_ok());
    }

    #[test]
    fn all_violations_are_collected() {
        let config = ColloquyConfig {
            store: StoreConfig {
                op_timeout_ms: 0,
                default_page_size: 0,
                max_page_size: 0,
            },
            retention: RetentionConfig {
                temporary_hours: 0,
                standard_hours: 0,
            },
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3, "timeout, page size, and retention errors");
    }

    #[test]
    fn inverted_page_sizes_are_rejected() {
        let config = ColloquyConfig {
            store: StoreConfig {
                max_page_size: 10,
                default_page_size: 50,
                ..StoreConfig::default()
            },
            ..ColloquyConfig::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
