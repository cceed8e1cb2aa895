// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The history store: append, point lookup, and feedback merge.
//!
//! Every operation validates identifiers and encodes keys before the first
//! backend call, runs under a deadline, and maps backend failures into the
//! public error taxonomy. The append path performs two item-level-atomic
//! writes (message, then thread metadata); both halves are idempotent, so a
//! crash between them is recovered by retrying with the same message id.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

use colloquy_config::ColloquyConfig;
use colloquy_core::{
    BackendError, Clock, FeedbackUpdate, HistoryError, Item, MessageId, MessageKind,
    MessageRecord, NewMessage, QueryRequest, Role, SystemClock, ThreadRecord, ThreadScope,
    UpdateRequest, WideColumnStore, EXPIRY_TIME_ATTR, SK_MESSAGE_ATTR, SK_TIMESTAMP_THREAD_ATTR,
};
use colloquy_keys as keys;

use crate::retention::RetentionPolicy;

/// Stateless facade over the wide-column backend.
///
/// Cheap to clone; the backend handle and clock are shared. There is no
/// in-process locking: the backend serializes concurrent writes to the same
/// key at the storage layer, and ordering is derived from key content, not
/// write order.
#[derive(Clone)]
pub struct HistoryStore {
    pub(crate) backend: Arc<dyn WideColumnStore>,
    clock: Arc<dyn Clock>,
    retention: RetentionPolicy,
    op_timeout: Duration,
    pub(crate) default_page_size: usize,
    pub(crate) max_page_size: usize,
}

/// Marker source for deadline expiry, surfaced inside `Unavailable`.
#[derive(Debug)]
struct DeadlineExceeded(Duration);

impl fmt::Display for DeadlineExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation deadline of {:?} exceeded", self.0)
    }
}

impl std::error::Error for DeadlineExceeded {}

impl HistoryStore {
    /// Creates a store over the given backend, reading the system clock.
    pub fn new(backend: Arc<dyn WideColumnStore>, config: &ColloquyConfig) -> Self {
        Self::with_clock(backend, config, Arc::new(SystemClock))
    }

    /// Creates a store with an injected clock, for deterministic tests.
    pub fn with_clock(
        backend: Arc<dyn WideColumnStore>,
        config: &ColloquyConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            backend,
            clock,
            retention: RetentionPolicy::from_config(&config.retention),
            op_timeout: Duration::from_millis(config.store.op_timeout_ms),
            default_page_size: config.store.default_page_size,
            max_page_size: config.store.max_page_size,
        }
    }

    /// Returns a handle whose operations run under `timeout` instead of the
    /// configured default deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let mut store = self.clone();
        store.op_timeout = timeout;
        store
    }

    /// Probes backend liveness.
    pub async fn health_check(&self) -> Result<(), HistoryError> {
        let deadline = self.deadline();
        self.call(deadline, self.backend.health_check())
            .await
            .map_err(map_backend_error)
    }

    pub(crate) fn deadline(&self) -> Instant {
        Instant::now() + self.op_timeout
    }

    /// Runs one backend call under the operation deadline. Deadline expiry
    /// is reported as a transient backend failure: the caller must not
    /// assume the call partially applied without checking.
    pub(crate) async fn call<T>(
        &self,
        deadline: Instant,
        fut: impl Future<Output = Result<T, BackendError>>,
    ) -> Result<T, BackendError> {
        match tokio::time::timeout_at(deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Unavailable {
                source: Box::new(DeadlineExceeded(self.op_timeout)),
            }),
        }
    }

    /// Appends one message turn and creates or refreshes the owning thread's
    /// metadata row.
    ///
    /// Retrying with the same message id and content is idempotent: the
    /// message upsert keys on `(partition, sort key)`, preserves the stored
    /// `created_at`, and leaves feedback attributes untouched. The metadata
    /// half uses a commutative counter add plus set-if-absent identity
    /// fields, so concurrent appends from independent callers converge.
    pub async fn append_message(
        &self,
        scope: &ThreadScope,
        message: NewMessage,
    ) -> Result<MessageRecord, HistoryError> {
        message.validate()?;
        let partition_key = keys::partition_key(scope)?;
        let kind = MessageKind::from(message.role);
        let sort_key = keys::message_sort_key(kind, message.timestamp, &message.message_id)?;
        let lookup_key = keys::message_lookup_key(kind, &message.message_id)?;
        let user_partition_key = keys::user_partition_key(&scope.user_scope())?;
        let thread_sort_key = keys::thread_sort_key(&scope.thread_id)?;
        let recency_key = keys::thread_recency_key(message.timestamp, &scope.thread_id)?;

        let now = self.clock.now();
        let expiry = self.retention.expiry_for(message.is_temporary, now);
        let deadline = self.deadline();

        let mut request = UpdateRequest::new(partition_key.as_str(), sort_key.as_str())
            .set("thread_id", to_value(&scope.thread_id)?)
            .set("message_id", to_value(&message.message_id)?)
            .set("timestamp", Value::from(message.timestamp))
            .set("role", to_value(&message.role)?)
            .set("content", to_value(&message.content)?)
            .set("updated_at", to_value(&now)?)
            .set(SK_MESSAGE_ATTR, Value::from(lookup_key))
            .set_if_absent("created_at", to_value(&now)?);
        if let Some(stop_reason) = &message.stop_reason {
            request = request.set("stop_reason", Value::from(stop_reason.as_str()));
        }
        if let Some(metadata) = &message.response_metadata {
            request = request.set("response_metadata", Value::Object(metadata.clone()));
        }
        if let Some(sources) = &message.sources {
            request = request.set("sources", to_value(sources)?);
        }
        if let Some(expiry) = expiry {
            request = request.set(EXPIRY_TIME_ATTR, Value::from(expiry));
        }
        let stored = self
            .call(deadline, self.backend.update(request))
            .await
            .map_err(map_backend_error)?;

        let mut metadata = UpdateRequest::new(user_partition_key.as_str(), thread_sort_key.as_str())
            .set("updated_at", to_value(&now)?)
            .set(SK_TIMESTAMP_THREAD_ATTR, Value::from(recency_key))
            .set_if_absent("thread_id", to_value(&scope.thread_id)?)
            .set_if_absent("org_id", to_value(&scope.org_id)?)
            .set_if_absent("user_id", to_value(&scope.user_id)?)
            .set_if_absent("origin", Value::from(message.origin.as_str()))
            .set_if_absent("is_temporary", Value::from(message.is_temporary))
            .set_if_absent("created_at", to_value(&now)?);
        if let Some(tenant_id) = &scope.tenant_id {
            metadata = metadata.set_if_absent("tenant_id", to_value(tenant_id)?);
        }
        if let Some(title) = &message.title {
            metadata = metadata.set_if_absent("title", Value::from(title.as_str()));
        }
        if let Some(expiry) = expiry {
            metadata = metadata.set(EXPIRY_TIME_ATTR, Value::from(expiry));
        }
        if message.role == Role::User {
            metadata = metadata.add("user_message_count", 1);
        }
        self.call(deadline, self.backend.update(metadata))
            .await
            .map_err(map_backend_error)?;

        debug!(
            thread_id = %scope.thread_id,
            message_id = %message.message_id,
            role = %message.role,
            timestamp = message.timestamp,
            "message appended"
        );
        message_from_item(&stored)
    }

    /// Point lookup by message id via the id projection, independent of when
    /// the message was written. A miss is an empty result, never an error.
    pub async fn get_message(
        &self,
        scope: &ThreadScope,
        message_id: &MessageId,
    ) -> Result<Option<MessageRecord>, HistoryError> {
        let deadline = self.deadline();
        let found = self.find_message(deadline, scope, message_id).await?;
        Ok(found.map(|(_, record)| record))
    }

    /// Merges a feedback annotation into an existing assistant message.
    ///
    /// Only the supplied fields are written; everything else on the record,
    /// including the other feedback field, is left untouched. `updated_at`
    /// advances. Safe to retry.
    pub async fn set_feedback(
        &self,
        scope: &ThreadScope,
        message_id: &MessageId,
        update: FeedbackUpdate,
    ) -> Result<MessageRecord, HistoryError> {
        if update.is_empty() {
            return Err(HistoryError::InvalidState(
                "feedback update supplies neither direction nor comment".into(),
            ));
        }

        let deadline = self.deadline();
        let Some((item, record)) = self.find_message(deadline, scope, message_id).await? else {
            return Err(HistoryError::NotFound(format!("message {message_id}")));
        };
        if record.role != Role::Assistant {
            return Err(HistoryError::InvalidState(
                "feedback is only accepted on assistant messages".into(),
            ));
        }

        let now = self.clock.now();
        let mut request = UpdateRequest::new(item.partition_key.as_str(), item.sort_key.as_str())
            .set("updated_at", to_value(&now)?)
            .require_exists();
        if let Some(direction) = update.direction {
            request = request.set("verso", to_value(&direction)?);
        }
        if let Some(comment) = update.comment {
            request = request.set("feedback", Value::from(comment));
        }

        match self.call(deadline, self.backend.update(request)).await {
            Ok(item) => {
                debug!(message_id = %message_id, "feedback merged");
                message_from_item(&item)
            }
            // The record expired between lookup and write.
            Err(BackendError::ConditionFailed { .. }) => {
                Err(HistoryError::NotFound(format!("message {message_id}")))
            }
            Err(other) => Err(map_backend_error(other)),
        }
    }

    /// Locates a message by id through the lookup projection. The stored
    /// kind is not part of the caller's knowledge, so both prefix forms are
    /// probed; two index point-queries, never a scan.
    pub(crate) async fn find_message(
        &self,
        deadline: Instant,
        scope: &ThreadScope,
        message_id: &MessageId,
    ) -> Result<Option<(Item, MessageRecord)>, HistoryError> {
        let partition_key = keys::partition_key(scope)?;
        for kind in [MessageKind::Plain, MessageKind::ModelGenerated] {
            let lookup_key = keys::message_lookup_key(kind, message_id)?;
            let page = self
                .call(
                    deadline,
                    self.backend.query(
                        QueryRequest::partition(partition_key.as_str())
                            .index(SK_MESSAGE_ATTR)
                            .equals(lookup_key)
                            .limit(1),
                    ),
                )
                .await
                .map_err(map_backend_error)?;
            if let Some(item) = page.items.into_iter().next() {
                let record = message_from_item(&item)?;
                return Ok(Some((item, record)));
            }
        }
        Ok(None)
    }

    pub(crate) fn clamp_limit(&self, limit: Option<usize>) -> usize {
        limit
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }
}

pub(crate) fn map_backend_error(err: BackendError) -> HistoryError {
    match err {
        BackendError::Unavailable { source } => HistoryError::Unavailable { source },
        other => HistoryError::Internal(other.to_string()),
    }
}

pub(crate) fn to_value<T: Serialize>(value: &T) -> Result<Value, HistoryError> {
    serde_json::to_value(value)
        .map_err(|e| HistoryError::Internal(format!("attribute serialization failed: {e}")))
}

pub(crate) fn message_from_item(item: &Item) -> Result<MessageRecord, HistoryError> {
    serde_json::from_value(Value::Object(item.attributes.clone())).map_err(|e| {
        HistoryError::Internal(format!(
            "corrupt message record at {}/{}: {e}",
            item.partition_key, item.sort_key
        ))
    })
}

pub(crate) fn thread_from_item(item: &Item) -> Result<ThreadRecord, HistoryError> {
    serde_json::from_value(Value::Object(item.attributes.clone())).map_err(|e| {
        HistoryError::Internal(format!(
            "corrupt thread record at {}/{}: {e}",
            item.partition_key, item.sort_key
        ))
    })
}
