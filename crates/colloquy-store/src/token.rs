// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Opaque continuation tokens.
//!
//! Tokens are URL-safe base64 over a compact JSON cursor carrying the last
//! sort key(s) returned. Key-based resumption stays correct when records are
//! appended concurrently, which an offset never would.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use colloquy_core::{HistoryError, MessageKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Resume position of a chronological thread scan: one cursor per message
/// kind, because the two kinds live under distinct sort-key prefixes and are
/// merged at read time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ThreadCursor {
    #[serde(rename = "m", default, skip_serializing_if = "Option::is_none")]
    pub plain: Option<String>,
    #[serde(rename = "l", default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ThreadCursor {
    pub fn for_kind(&self, kind: MessageKind) -> Option<&String> {
        match kind {
            MessageKind::Plain => self.plain.as_ref(),
            MessageKind::ModelGenerated => self.model.as_ref(),
        }
    }

    pub fn advance(&mut self, kind: MessageKind, sort_key: String) {
        match kind {
            MessageKind::Plain => self.plain = Some(sort_key),
            MessageKind::ModelGenerated => self.model = Some(sort_key),
        }
    }
}

/// Resume position of a descending recency scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RecencyCursor {
    #[serde(rename = "r")]
    pub last: String,
}

pub(crate) fn encode_token<T: Serialize>(cursor: &T) -> Result<String, HistoryError> {
    let json = serde_json::to_vec(cursor)
        .map_err(|e| HistoryError::Internal(format!("cursor serialization failed: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub(crate) fn decode_token<T: DeserializeOwned>(token: &str) -> Result<T, HistoryError> {
    let invalid = || HistoryError::InvalidIdentifier {
        field: "page_token".to_string(),
        reason: "malformed continuation token".to_string(),
    };
    let bytes = URL_SAFE_NO_PAD.decode(token).map_err(|_| invalid())?;
    serde_json::from_slice(&bytes).map_err(|_| invalid())
}
