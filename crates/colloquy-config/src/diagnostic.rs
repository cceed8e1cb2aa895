// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostic error type for configuration loading and validation.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error, renderable as a miette diagnostic.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// TOML or environment value failed to parse into the config model.
    #[error("{message}")]
    #[diagnostic(code(colloquy::config::parse))]
    Parse { message: String },

    /// The config parsed but a semantic constraint does not hold.
    #[error("{message}")]
    #[diagnostic(
        code(colloquy::config::validation),
        help("fix the value in colloquy.toml or the COLLOQUY_* environment override")
    )]
    Validation { message: String },
}

/// Converts a figment extraction failure into one diagnostic per error.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Parse {
            message: e.to_string(),
        })
        .collect()
}

/// Renders a list of config errors as one human-readable block.
pub fn render_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("error: {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_line_per_error() {
        let errors = vec![
            ConfigError::Validation {
                message: "store.op_timeout_ms must be at least 1".into(),
            },
            ConfigError::Validation {
                message: "retention.temporary_hours must be at least 1".into(),
            },
        ];
        let rendered = render_errors(&errors);
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.contains("op_timeout_ms"));
    }
}
