// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caller-facing pagination types.

/// Page parameters for listing operations.
///
/// `page_token` is an opaque continuation token from a previous page; it
/// encodes resume keys, never offsets, so pages stay stable under
/// concurrent appends.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub page_token: Option<String>,
    pub limit: Option<usize>,
}

impl PageRequest {
    /// First page with the configured default size.
    pub fn first() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.page_token = Some(token.into());
        self
    }
}

/// One page of records plus the token to fetch the next page, when any.
#[derive(Debug, Clone)]
pub struct HistoryPage<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}
