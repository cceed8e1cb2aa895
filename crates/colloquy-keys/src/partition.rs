// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Partition key encoding and decoding.
//!
//! Layout: `ORG#<org>[#TENANT#<tenant>]#USER#<user>#THREAD#<thread>` for a
//! thread's message partition, and the same string minus the `THREAD`
//! segment for the user-level partition that owns thread metadata. The
//! tenant segment is omitted entirely when absent, which keeps single-tenant
//! and multi-tenant keys visually distinct and collision-free (a labeled
//! segment can never be mistaken for an identifier because identifiers may
//! not contain the delimiter).

use colloquy_core::{HistoryError, OrgId, TenantId, ThreadId, ThreadScope, UserId, UserScope};

use crate::KEY_DELIMITER;

const ORG_LABEL: &str = "ORG";
const TENANT_LABEL: &str = "TENANT";
const USER_LABEL: &str = "USER";
const THREAD_LABEL: &str = "THREAD";

/// Rejects identifiers that would corrupt the key encoding.
pub(crate) fn validate_identifier(field: &str, value: &str) -> Result<(), HistoryError> {
    if value.is_empty() {
        return Err(HistoryError::InvalidIdentifier {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if value.contains(KEY_DELIMITER) {
        return Err(HistoryError::InvalidIdentifier {
            field: field.to_string(),
            reason: format!("must not contain '{KEY_DELIMITER}'"),
        });
    }
    Ok(())
}

fn push_segment(key: &mut String, label: &str, value: &str) {
    if !key.is_empty() {
        key.push(KEY_DELIMITER);
    }
    key.push_str(label);
    key.push(KEY_DELIMITER);
    key.push_str(value);
}

/// Encodes the partition key of one thread's message partition.
pub fn partition_key(scope: &ThreadScope) -> Result<String, HistoryError> {
    let mut key = user_partition_key(&scope.user_scope())?;
    validate_identifier("thread_id", &scope.thread_id.0)?;
    push_segment(&mut key, THREAD_LABEL, &scope.thread_id.0);
    Ok(key)
}

/// Encodes the user-level partition key that owns thread metadata rows.
pub fn user_partition_key(scope: &UserScope) -> Result<String, HistoryError> {
    validate_identifier("org_id", &scope.org_id.0)?;
    if let Some(tenant) = &scope.tenant_id {
        validate_identifier("tenant_id", &tenant.0)?;
    }
    validate_identifier("user_id", &scope.user_id.0)?;

    let mut key = String::new();
    push_segment(&mut key, ORG_LABEL, &scope.org_id.0);
    if let Some(tenant) = &scope.tenant_id {
        push_segment(&mut key, TENANT_LABEL, &tenant.0);
    }
    push_segment(&mut key, USER_LABEL, &scope.user_id.0);
    Ok(key)
}

/// Decodes a thread partition key back into its logical scope.
///
/// Exact inverse of [`partition_key`]: the tenant segment's presence is
/// preserved, never defaulted.
pub fn decode_partition_key(key: &str) -> Result<ThreadScope, HistoryError> {
    let malformed = |reason: String| HistoryError::InvalidIdentifier {
        field: "partition_key".to_string(),
        reason,
    };

    let segments: Vec<&str> = key.split(KEY_DELIMITER).collect();
    let pair = |offset: usize, label: &str| -> Result<String, HistoryError> {
        match (segments.get(offset), segments.get(offset + 1)) {
            (Some(found), Some(value)) if *found == label && !value.is_empty() => {
                Ok(value.to_string())
            }
            _ => Err(malformed(format!("expected {label} segment"))),
        }
    };

    let org = pair(0, ORG_LABEL)?;
    let (tenant, user_offset) = if segments.get(2) == Some(&TENANT_LABEL) {
        (Some(pair(2, TENANT_LABEL)?), 4)
    } else {
        (None, 2)
    };
    let user = pair(user_offset, USER_LABEL)?;
    let thread = pair(user_offset + 2, THREAD_LABEL)?;
    if segments.len() != user_offset + 4 {
        return Err(malformed("trailing segments".to_string()));
    }

    Ok(ThreadScope {
        org_id: OrgId(org),
        tenant_id: tenant.map(TenantId),
        user_id: UserId(user),
        thread_id: ThreadId(thread),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(tenant: Option<&str>) -> ThreadScope {
        ThreadScope {
            org_id: OrgId("acme".into()),
            tenant_id: tenant.map(|t| TenantId(t.into())),
            user_id: UserId("u-42".into()),
            thread_id: ThreadId("t-7".into()),
        }
    }

    #[test]
    fn encodes_with_and_without_tenant() {
        assert_eq!(
            partition_key(&scope(None)).unwrap(),
            "ORG#acme#USER#u-42#THREAD#t-7"
        );
        assert_eq!(
            partition_key(&scope(Some("emea"))).unwrap(),
            "ORG#acme#TENANT#emea#USER#u-42#THREAD#t-7"
        );
    }

    #[test]
    fn user_partition_omits_thread_segment() {
        assert_eq!(
            user_partition_key(&scope(Some("emea")).user_scope()).unwrap(),
            "ORG#acme#TENANT#emea#USER#u-42"
        );
    }

    #[test]
    fn round_trips_exactly() {
        for tenant in [None, Some("emea")] {
            let original = scope(tenant);
            let key = partition_key(&original).unwrap();
            let decoded = decode_partition_key(&key).unwrap();
            assert_eq!(decoded, original);
        }
    }

    #[test]
    fn rejects_delimiter_in_identifiers() {
        let mut bad = scope(None);
        bad.thread_id = ThreadId("t#7".into());
        let err = partition_key(&bad).unwrap_err();
        assert!(matches!(
            err,
            HistoryError::InvalidIdentifier { ref field, .. } if field == "thread_id"
        ));

        let mut bad = scope(Some("em#ea"));
        bad.user_id = UserId("u-42".into());
        assert!(partition_key(&bad).is_err());
    }

    #[test]
    fn rejects_empty_identifiers() {
        let mut bad = scope(None);
        bad.org_id = OrgId(String::new());
        assert!(matches!(
            partition_key(&bad),
            Err(HistoryError::InvalidIdentifier { .. })
        ));
    }

    #[test]
    fn rejects_malformed_keys_on_decode() {
        for key in [
            "",
            "ORG#acme",
            "ORG#acme#USER#u-42",
            "USER#u-42#ORG#acme#THREAD#t-7",
            "ORG#acme#TENANT##USER#u-42#THREAD#t-7",
            "ORG#acme#USER#u-42#THREAD#t-7#extra",
        ] {
            assert!(decode_partition_key(key).is_err(), "{key:?} should not decode");
        }
    }
}
