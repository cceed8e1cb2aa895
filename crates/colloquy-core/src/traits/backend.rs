// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The wide-column backend trait and its request/response types.

use async_trait::async_trait;
use thiserror::Error;

/// Attribute map of one stored item. Values are opaque to the backend.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Secondary-index sort attribute for id-based message lookup.
pub const SK_MESSAGE_ATTR: &str = "SKMessage";

/// Secondary-index sort attribute for recency-ordered thread listing.
pub const SK_TIMESTAMP_THREAD_ATTR: &str = "SKTimestampThread";

/// TTL attribute: epoch seconds after which the item is eligible for
/// backend-enforced removal. Expired items are invisible to every read.
pub const EXPIRY_TIME_ATTR: &str = "ExpiryTime";

/// One stored item: its primary key pair plus the attribute map.
///
/// Index projection keys (`SKMessage`, `SKTimestampThread`) live inside the
/// attribute map; the backend re-keys items under them on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub partition_key: String,
    pub sort_key: String,
    pub attributes: Attributes,
}

impl Item {
    pub fn new(
        partition_key: impl Into<String>,
        sort_key: impl Into<String>,
        attributes: Attributes,
    ) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
            attributes,
        }
    }
}

/// Errors surfaced by backend implementations.
///
/// The store maps these into its public taxonomy: `ConditionFailed` becomes
/// `NotFound` where that is the meaning, `Unavailable` passes through as the
/// retryable variant, and `Corrupt` is an internal error.
#[derive(Debug, Error)]
pub enum BackendError {
    /// A conditional write's precondition did not hold.
    #[error("condition failed for {partition_key}/{sort_key}")]
    ConditionFailed {
        partition_key: String,
        sort_key: String,
    },

    /// The backend is unreachable or failed transiently.
    #[error("backend unavailable: {source}")]
    Unavailable {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A stored item has an attribute shape the operation cannot work with.
    #[error("corrupt item at {partition_key}/{sort_key}: {reason}")]
    Corrupt {
        partition_key: String,
        sort_key: String,
        reason: String,
    },
}

/// Atomic read-modify-write request for one item.
///
/// Applied under item-level atomicity: all clauses take effect together or
/// not at all. An absent item is created unless `require_exists` is set.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub partition_key: String,
    pub sort_key: String,
    /// Attributes written unconditionally.
    pub set: Attributes,
    /// Attributes written only when currently absent. Idempotent and
    /// order-independent, so concurrent writers converge on one value.
    pub set_if_absent: Attributes,
    /// Numeric attributes incremented atomically; a missing attribute is
    /// treated as zero. Increments from concurrent writers commute.
    pub add: Vec<(String, i64)>,
    /// When set, the item must already exist or the update fails with
    /// [`BackendError::ConditionFailed`].
    pub require_exists: bool,
}

impl UpdateRequest {
    pub fn new(partition_key: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
            set: Attributes::new(),
            set_if_absent: Attributes::new(),
            add: Vec::new(),
            require_exists: false,
        }
    }

    pub fn set(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.set.insert(name.into(), value);
        self
    }

    pub fn set_if_absent(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.set_if_absent.insert(name.into(), value);
        self
    }

    pub fn add(mut self, name: impl Into<String>, delta: i64) -> Self {
        self.add.push((name.into(), delta));
        self
    }

    pub fn require_exists(mut self) -> Self {
        self.require_exists = true;
        self
    }
}

/// Sort-key condition of a [`QueryRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortCondition {
    /// Every item in the partition.
    All,
    /// Items whose sort value starts with the given prefix.
    BeginsWith(String),
    /// The single item whose sort value equals the given value.
    Equals(String),
}

/// Range query over one partition.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub partition_key: String,
    /// `None` queries the primary sort key; `Some(name)` queries the named
    /// index projection attribute instead. Items lacking the attribute are
    /// not projected into the index and never match.
    pub index: Option<String>,
    pub condition: SortCondition,
    /// Exclusive resume cursor: only items strictly past this sort value in
    /// scan direction are returned.
    pub start_after: Option<String>,
    pub descending: bool,
    /// Maximum number of items to return. Zero returns an empty page.
    pub limit: usize,
}

impl QueryRequest {
    pub fn partition(partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            index: None,
            condition: SortCondition::All,
            start_after: None,
            descending: false,
            limit: usize::MAX,
        }
    }

    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index = Some(name.into());
        self
    }

    pub fn begins_with(mut self, prefix: impl Into<String>) -> Self {
        self.condition = SortCondition::BeginsWith(prefix.into());
        self
    }

    pub fn equals(mut self, value: impl Into<String>) -> Self {
        self.condition = SortCondition::Equals(value.into());
        self
    }

    pub fn start_after(mut self, cursor: impl Into<String>) -> Self {
        self.start_after = Some(cursor.into());
        self
    }

    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// One page of query results.
#[derive(Debug, Clone)]
pub struct QueryPage {
    pub items: Vec<Item>,
    /// Sort value of the last returned item when the scan was cut short by
    /// `limit`; `None` means the scan is exhausted.
    pub last_key: Option<String>,
}

/// Abstract wide-column key-value backend.
///
/// Guarantees required of implementations: item-level atomicity for `put`
/// and `update`, byte-lexicographic ordering of range scans over the sort
/// value, and invisibility of items whose `ExpiryTime` has passed.
/// Cross-item transactions are never assumed.
#[async_trait]
pub trait WideColumnStore: Send + Sync {
    /// Writes an item, replacing any existing item with the same key pair.
    async fn put(&self, item: Item) -> Result<(), BackendError>;

    /// Point read by primary key pair.
    async fn get(&self, partition_key: &str, sort_key: &str)
        -> Result<Option<Item>, BackendError>;

    /// Atomic read-modify-write of one item; returns the resulting item.
    async fn update(&self, request: UpdateRequest) -> Result<Item, BackendError>;

    /// Ordered range query over a partition, via the primary sort key or a
    /// named index projection.
    async fn query(&self, request: QueryRequest) -> Result<QueryPage, BackendError>;

    /// Liveness probe.
    async fn health_check(&self) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_builder_accumulates_clauses() {
        let request = UpdateRequest::new("pk", "sk")
            .set("updated_at", serde_json::json!("2026-01-01T00:00:00Z"))
            .set_if_absent("created_at", serde_json::json!("2026-01-01T00:00:00Z"))
            .add("user_message_count", 1)
            .require_exists();

        assert_eq!(request.set.len(), 1);
        assert_eq!(request.set_if_absent.len(), 1);
        assert_eq!(request.add, vec![("user_message_count".to_string(), 1)]);
        assert!(request.require_exists);
    }

    #[test]
    fn query_request_builder_defaults_to_full_partition() {
        let request = QueryRequest::partition("pk");
        assert_eq!(request.condition, SortCondition::All);
        assert!(request.index.is_none());
        assert!(!request.descending);

        let request = QueryRequest::partition("pk")
            .index(SK_MESSAGE_ATTR)
            .equals("MSG#m-1")
            .limit(1);
        assert_eq!(request.index.as_deref(), Some(SK_MESSAGE_ATTR));
        assert_eq!(request.condition, SortCondition::Equals("MSG#m-1".into()));
    }
}
