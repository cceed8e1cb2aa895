// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of the [`WideColumnStore`] trait.
//!
//! Backed by an ordered map keyed on `(partition_key, sort_key)`, so range
//! scans fall out of the map's byte-lexicographic ordering, the same
//! ordering contract a production wide-column backend provides. Index
//! queries re-key a partition's items by the named projection attribute,
//! and items whose `ExpiryTime` has passed are invisible to every read and
//! purged lazily on write.
//!
//! Intended for tests and local development; data is lost on drop.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use colloquy_core::{
    BackendError, Clock, Item, QueryPage, QueryRequest, SortCondition, SystemClock,
    UpdateRequest, WideColumnStore, EXPIRY_TIME_ATTR,
};

type KeyedItems = BTreeMap<(String, String), Item>;

/// In-memory wide-column store.
#[derive(Clone)]
pub struct MemoryStore {
    items: Arc<RwLock<KeyedItems>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Creates an empty store reading the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store with an injected clock, for deterministic
    /// expiry behavior under test.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            items: Arc::new(RwLock::new(BTreeMap::new())),
            clock,
        }
    }

    /// Number of live (non-expired) items.
    pub async fn len(&self) -> usize {
        let now = self.clock.now_epoch_secs();
        let items = self.items.read().await;
        items.values().filter(|item| !is_expired(item, now)).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Removes all items.
    pub async fn clear(&self) {
        self.items.write().await.clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn is_expired(item: &Item, now_epoch_secs: u64) -> bool {
    match item.attributes.get(EXPIRY_TIME_ATTR).and_then(|v| v.as_u64()) {
        Some(expiry) => expiry <= now_epoch_secs,
        None => false,
    }
}

/// Sort value of an item under the requested keying: the primary sort key,
/// or the named projection attribute. Items lacking the attribute are not
/// projected into the index.
fn sort_value(item: &Item, index: Option<&str>) -> Option<String> {
    match index {
        None => Some(item.sort_key.clone()),
        Some(attr) => item
            .attributes
            .get(attr)
            .and_then(|v| v.as_str())
            .map(str::to_string),
    }
}

fn matches_condition(sort_value: &str, condition: &SortCondition) -> bool {
    match condition {
        SortCondition::All => true,
        SortCondition::BeginsWith(prefix) => sort_value.starts_with(prefix.as_str()),
        SortCondition::Equals(value) => sort_value == value,
    }
}

/// Drops expired items in one partition. Mirrors a backend's lazy TTL sweep;
/// reads never depend on it because they filter independently.
fn purge_partition(items: &mut KeyedItems, partition_key: &str, now_epoch_secs: u64) {
    let expired: Vec<(String, String)> = items
        .range((
            Bound::Included((partition_key.to_string(), String::new())),
            Bound::Unbounded,
        ))
        .take_while(|((pk, _), _)| pk == partition_key)
        .filter(|(_, item)| is_expired(item, now_epoch_secs))
        .map(|(key, _)| key.clone())
        .collect();
    for key in expired {
        items.remove(&key);
    }
}

#[async_trait]
impl WideColumnStore for MemoryStore {
    async fn put(&self, item: Item) -> Result<(), BackendError> {
        let now = self.clock.now_epoch_secs();
        let mut items = self.items.write().await;
        purge_partition(&mut items, &item.partition_key, now);
        debug!(
            partition_key = %item.partition_key,
            sort_key = %item.sort_key,
            "memstore put"
        );
        items.insert(
            (item.partition_key.clone(), item.sort_key.clone()),
            item,
        );
        Ok(())
    }

    async fn get(
        &self,
        partition_key: &str,
        sort_key: &str,
    ) -> Result<Option<Item>, BackendError> {
        let now = self.clock.now_epoch_secs();
        let items = self.items.read().await;
        let found = items
            .get(&(partition_key.to_string(), sort_key.to_string()))
            .filter(|item| !is_expired(item, now))
            .cloned();
        Ok(found)
    }

    async fn update(&self, request: UpdateRequest) -> Result<Item, BackendError> {
        let now = self.clock.now_epoch_secs();
        let mut items = self.items.write().await;
        let key = (request.partition_key.clone(), request.sort_key.clone());

        // An expired item is indistinguishable from an absent one.
        let existing = items
            .get(&key)
            .filter(|item| !is_expired(item, now))
            .cloned();
        if existing.is_none() && request.require_exists {
            return Err(BackendError::ConditionFailed {
                partition_key: request.partition_key,
                sort_key: request.sort_key,
            });
        }

        let mut attributes = existing.map(|item| item.attributes).unwrap_or_default();
        for (name, value) in request.set_if_absent {
            attributes.entry(name).or_insert(value);
        }
        for (name, value) in request.set {
            attributes.insert(name, value);
        }
        for (name, delta) in request.add {
            let current = match attributes.get(&name) {
                None => 0,
                Some(value) => value.as_i64().ok_or_else(|| BackendError::Corrupt {
                    partition_key: request.partition_key.clone(),
                    sort_key: request.sort_key.clone(),
                    reason: format!("attribute {name} is not numeric"),
                })?,
            };
            attributes.insert(name, serde_json::Value::from(current + delta));
        }

        let item = Item::new(request.partition_key, request.sort_key, attributes);
        debug!(
            partition_key = %item.partition_key,
            sort_key = %item.sort_key,
            "memstore update"
        );
        items.insert(key, item.clone());
        Ok(item)
    }

    async fn query(&self, request: QueryRequest) -> Result<QueryPage, BackendError> {
        let now = self.clock.now_epoch_secs();
        let items = self.items.read().await;

        let mut entries: Vec<(String, Item)> = items
            .range((
                Bound::Included((request.partition_key.clone(), String::new())),
                Bound::Unbounded,
            ))
            .take_while(|((pk, _), _)| pk == &request.partition_key)
            .filter(|(_, item)| !is_expired(item, now))
            .filter_map(|(_, item)| {
                sort_value(item, request.index.as_deref()).map(|sv| (sv, item.clone()))
            })
            .filter(|(sv, _)| matches_condition(sv, &request.condition))
            .collect();

        // Primary-key scans are already ordered; index projections re-key
        // the partition and need an explicit sort.
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        if request.descending {
            entries.reverse();
        }

        if let Some(after) = &request.start_after {
            entries.retain(|(sv, _)| {
                if request.descending {
                    sv < after
                } else {
                    sv > after
                }
            });
        }

        let truncated = entries.len() > request.limit;
        entries.truncate(request.limit);
        let last_key = if truncated {
            entries.last().map(|(sv, _)| sv.clone())
        } else {
            None
        };

        debug!(
            partition_key = %request.partition_key,
            index = request.index.as_deref().unwrap_or("<primary>"),
            count = entries.len(),
            truncated,
            "memstore query"
        );
        Ok(QueryPage {
            items: entries.into_iter().map(|(_, item)| item).collect(),
            last_key,
        })
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use colloquy_core::Attributes;
    use colloquy_test_utils::ManualClock;

    use super::*;

    fn item(pk: &str, sk: &str, attrs: &[(&str, serde_json::Value)]) -> Item {
        let mut attributes = Attributes::new();
        for (name, value) in attrs {
            attributes.insert((*name).to_string(), value.clone());
        }
        Item::new(pk, sk, attributes)
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryStore::new();
        let stored = item("pk-1", "sk-1", &[("content", serde_json::json!("hello"))]);
        store.put(stored.clone()).await.unwrap();

        let found = store.get("pk-1", "sk-1").await.unwrap();
        assert_eq!(found, Some(stored));
        assert_eq!(store.get("pk-1", "sk-2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_replaces_existing_item() {
        let store = MemoryStore::new();
        store
            .put(item("pk", "sk", &[("v", serde_json::json!(1))]))
            .await
            .unwrap();
        store
            .put(item("pk", "sk", &[("v", serde_json::json!(2))]))
            .await
            .unwrap();

        let found = store.get("pk", "sk").await.unwrap().unwrap();
        assert_eq!(found.attributes["v"], 2);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn query_scans_partition_in_sort_order() {
        let store = MemoryStore::new();
        for sk in ["c", "a", "b"] {
            store.put(item("pk", sk, &[])).await.unwrap();
        }
        store.put(item("other", "a", &[])).await.unwrap();

        let page = store
            .query(QueryRequest::partition("pk"))
            .await
            .unwrap();
        let keys: Vec<&str> = page.items.iter().map(|i| i.sort_key.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert!(page.last_key.is_none());
    }

    #[tokio::test]
    async fn query_honors_prefix_and_direction() {
        let store = MemoryStore::new();
        for sk in ["MSG#1", "MSG#2", "LLM#1"] {
            store.put(item("pk", sk, &[])).await.unwrap();
        }

        let page = store
            .query(QueryRequest::partition("pk").begins_with("MSG#").descending())
            .await
            .unwrap();
        let keys: Vec<&str> = page.items.iter().map(|i| i.sort_key.as_str()).collect();
        assert_eq!(keys, ["MSG#2", "MSG#1"]);
    }

    #[tokio::test]
    async fn query_resumes_after_cursor_in_both_directions() {
        let store = MemoryStore::new();
        for sk in ["a", "b", "c", "d"] {
            store.put(item("pk", sk, &[])).await.unwrap();
        }

        let ascending = store
            .query(QueryRequest::partition("pk").start_after("b"))
            .await
            .unwrap();
        let keys: Vec<&str> = ascending.items.iter().map(|i| i.sort_key.as_str()).collect();
        assert_eq!(keys, ["c", "d"]);

        let descending = store
            .query(QueryRequest::partition("pk").start_after("c").descending())
            .await
            .unwrap();
        let keys: Vec<&str> = descending.items.iter().map(|i| i.sort_key.as_str()).collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[tokio::test]
    async fn query_paginates_with_last_key() {
        let store = MemoryStore::new();
        for sk in ["a", "b", "c"] {
            store.put(item("pk", sk, &[])).await.unwrap();
        }

        let first = store
            .query(QueryRequest::partition("pk").limit(2))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.last_key.as_deref(), Some("b"));

        let second = store
            .query(QueryRequest::partition("pk").start_after("b").limit(2))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(second.last_key.is_none());
    }

    #[tokio::test]
    async fn index_query_rekeys_by_projection_attribute() {
        let store = MemoryStore::new();
        store
            .put(item(
                "pk",
                "MSG#0000000000000000002#m-2",
                &[("SKMessage", serde_json::json!("MSG#m-2"))],
            ))
            .await
            .unwrap();
        store
            .put(item(
                "pk",
                "MSG#0000000000000000001#m-1",
                &[("SKMessage", serde_json::json!("MSG#m-1"))],
            ))
            .await
            .unwrap();
        // No projection attribute: invisible to the index.
        store.put(item("pk", "THREAD#t-1", &[])).await.unwrap();

        let page = store
            .query(
                QueryRequest::partition("pk")
                    .index("SKMessage")
                    .equals("MSG#m-2"),
            )
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].sort_key, "MSG#0000000000000000002#m-2");

        let all = store
            .query(QueryRequest::partition("pk").index("SKMessage"))
            .await
            .unwrap();
        assert_eq!(all.items.len(), 2, "unprojected items are skipped");
    }

    #[tokio::test]
    async fn update_applies_clauses_atomically() {
        let store = MemoryStore::new();
        let updated = store
            .update(
                UpdateRequest::new("pk", "THREAD#t-1")
                    .set("updated_at", serde_json::json!("2026-01-02T00:00:00Z"))
                    .set_if_absent("created_at", serde_json::json!("2026-01-01T00:00:00Z"))
                    .add("user_message_count", 1),
            )
            .await
            .unwrap();
        assert_eq!(updated.attributes["user_message_count"], 1);
        assert_eq!(updated.attributes["created_at"], "2026-01-01T00:00:00Z");

        let updated = store
            .update(
                UpdateRequest::new("pk", "THREAD#t-1")
                    .set("updated_at", serde_json::json!("2026-01-03T00:00:00Z"))
                    .set_if_absent("created_at", serde_json::json!("2026-01-03T00:00:00Z"))
                    .add("user_message_count", 1),
            )
            .await
            .unwrap();
        assert_eq!(updated.attributes["user_message_count"], 2);
        // set_if_absent never clobbers.
        assert_eq!(updated.attributes["created_at"], "2026-01-01T00:00:00Z");
        assert_eq!(updated.attributes["updated_at"], "2026-01-03T00:00:00Z");
    }

    #[tokio::test]
    async fn update_requires_existing_item_when_asked() {
        let store = MemoryStore::new();
        let err = store
            .update(
                UpdateRequest::new("pk", "sk")
                    .set("verso", serde_json::json!("up"))
                    .require_exists(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::ConditionFailed { .. }));
    }

    #[tokio::test]
    async fn update_rejects_increment_of_non_numeric_attribute() {
        let store = MemoryStore::new();
        store
            .put(item("pk", "sk", &[("count", serde_json::json!("three"))]))
            .await
            .unwrap();
        let err = store
            .update(UpdateRequest::new("pk", "sk").add("count", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn expired_items_are_invisible_and_purged() {
        let clock = Arc::new(ManualClock::at(
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        ));
        let store = MemoryStore::with_clock(clock.clone());

        let expiry = clock.now().timestamp() as u64 + 60;
        store
            .put(item(
                "pk",
                "sk",
                &[(EXPIRY_TIME_ATTR, serde_json::json!(expiry))],
            ))
            .await
            .unwrap();
        assert!(store.get("pk", "sk").await.unwrap().is_some());

        clock.advance(chrono::Duration::seconds(61));
        assert!(store.get("pk", "sk").await.unwrap().is_none());
        let page = store.query(QueryRequest::partition("pk")).await.unwrap();
        assert!(page.items.is_empty());

        // A conditional update now sees no item at all.
        let err = store
            .update(UpdateRequest::new("pk", "sk").require_exists())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::ConditionFailed { .. }));

        // The next write to the partition sweeps the tombstone.
        store.put(item("pk", "other", &[])).await.unwrap();
        assert_eq!(store.len().await, 1);
    }
}
