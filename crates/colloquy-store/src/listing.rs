// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listing operations: chronological thread pages and recency-ordered
//! thread listings.
//!
//! Plain and model-generated turns live under distinct sort-key prefixes
//! (`MSG#`, `LLM#`), and `LLM#` sorts before `MSG#`, so one sort-key range
//! cannot interleave the two kinds by time. `list_thread` therefore merges
//! two prefix scans by `(timestamp, message_id)` and the continuation token
//! carries one resume key per kind.

use tracing::debug;

use colloquy_core::{
    HistoryError, MessageKind, MessageRecord, QueryRequest, ThreadRecord, ThreadScope, UserScope,
    SK_TIMESTAMP_THREAD_ATTR,
};
use colloquy_keys as keys;

use crate::paging::{HistoryPage, PageRequest};
use crate::store::{map_backend_error, message_from_item, thread_from_item, HistoryStore};
use crate::token::{decode_token, encode_token, RecencyCursor, ThreadCursor};

impl HistoryStore {
    /// Returns one chronological page of a thread's messages, ascending by
    /// `(timestamp, message_id)` regardless of the order writes arrived.
    pub async fn list_thread(
        &self,
        scope: &ThreadScope,
        request: PageRequest,
    ) -> Result<HistoryPage<MessageRecord>, HistoryError> {
        let partition_key = keys::partition_key(scope)?;
        let limit = self.clamp_limit(request.limit);
        let mut cursor: ThreadCursor = match &request.page_token {
            Some(token) => decode_token(token)?,
            None => ThreadCursor::default(),
        };
        let deadline = self.deadline();

        // One bounded scan per kind; each fetches at most `limit` items, so
        // the merge below can always emit a full page from what it has.
        let mut candidates: Vec<(MessageKind, String, MessageRecord)> = Vec::new();
        let mut backend_has_more = false;
        for kind in [MessageKind::Plain, MessageKind::ModelGenerated] {
            let mut query = QueryRequest::partition(partition_key.as_str())
                .begins_with(keys::message_kind_prefix(kind))
                .limit(limit);
            if let Some(after) = cursor.for_kind(kind) {
                query = query.start_after(after.as_str());
            }
            let page = self
                .call(deadline, self.backend.query(query))
                .await
                .map_err(map_backend_error)?;
            backend_has_more |= page.last_key.is_some();
            for item in page.items {
                let record = message_from_item(&item)?;
                candidates.push((kind, item.sort_key, record));
            }
        }

        candidates.sort_by(|a, b| {
            (a.2.timestamp, &a.2.message_id.0).cmp(&(b.2.timestamp, &b.2.message_id.0))
        });
        let leftover = candidates.len() > limit;
        candidates.truncate(limit);
        for (kind, sort_key, _) in &candidates {
            cursor.advance(*kind, sort_key.clone());
        }

        let next_page_token = if leftover || backend_has_more {
            Some(encode_token(&cursor)?)
        } else {
            None
        };
        let items: Vec<MessageRecord> =
            candidates.into_iter().map(|(_, _, record)| record).collect();
        debug!(
            thread_id = %scope.thread_id,
            count = items.len(),
            has_more = next_page_token.is_some(),
            "thread page listed"
        );
        Ok(HistoryPage {
            items,
            next_page_token,
        })
    }

    /// Returns one page of the user's threads, most recently active first.
    ///
    /// Served by the recency projection, which is only as fresh as the
    /// latest metadata write for each thread.
    pub async fn list_threads_by_recency(
        &self,
        scope: &UserScope,
        request: PageRequest,
    ) -> Result<HistoryPage<ThreadRecord>, HistoryError> {
        let partition_key = keys::user_partition_key(scope)?;
        let limit = self.clamp_limit(request.limit);
        let cursor: Option<RecencyCursor> = match &request.page_token {
            Some(token) => Some(decode_token(token)?),
            None => None,
        };
        let deadline = self.deadline();

        let mut query = QueryRequest::partition(partition_key.as_str())
            .index(SK_TIMESTAMP_THREAD_ATTR)
            .begins_with(keys::thread_recency_prefix())
            .descending()
            .limit(limit);
        if let Some(cursor) = &cursor {
            query = query.start_after(cursor.last.as_str());
        }
        let page = self
            .call(deadline, self.backend.query(query))
            .await
            .map_err(map_backend_error)?;

        let next_page_token = match &page.last_key {
            Some(last) => Some(encode_token(&RecencyCursor { last: last.clone() })?),
            None => None,
        };
        let items = page
            .items
            .iter()
            .map(thread_from_item)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            user_id = %scope.user_id,
            count = items.len(),
            has_more = next_page_token.is_some(),
            "threads listed by recency"
        );
        Ok(HistoryPage {
            items,
            next_page_token,
        })
    }
}
