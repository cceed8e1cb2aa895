// SPDX-FileCopyrightText: 2026 Colloquy Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Identifier newtypes, identity scopes, and wire-text enums.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for an organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgId(pub String);

/// Identifier for a tenant within a multi-tenant organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

/// Unique identifier for an end user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Unique identifier for a conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

/// Unique identifier for a message within its thread.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Addresses one thread's message partition.
///
/// The tenant segment is optional: organizations without tenancy omit it
/// entirely, and the key encoder keeps the two forms collision-free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadScope {
    pub org_id: OrgId,
    pub tenant_id: Option<TenantId>,
    pub user_id: UserId,
    pub thread_id: ThreadId,
}

impl ThreadScope {
    /// The user-level scope owning this thread's metadata row.
    pub fn user_scope(&self) -> UserScope {
        UserScope {
            org_id: self.org_id.clone(),
            tenant_id: self.tenant_id.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

/// Addresses a user's thread-listing partition (all threads of one user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserScope {
    pub org_id: OrgId,
    pub tenant_id: Option<TenantId>,
    pub user_id: UserId,
}

/// Author of a message turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// User judgment on an assistant turn, persisted under the `verso` attribute.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FeedbackDirection {
    Up,
    Down,
}

/// Physical message kind, selecting the sort-key prefix token.
///
/// Plain turns are keyed under `MSG#`, model-generated turns under `LLM#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Plain,
    ModelGenerated,
}

impl From<Role> for MessageKind {
    fn from(role: Role) -> Self {
        match role {
            Role::User => MessageKind::Plain,
            Role::Assistant => MessageKind::ModelGenerated,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn role_round_trips_through_text() {
        for role in [Role::User, Role::Assistant] {
            let text = role.to_string();
            assert_eq!(Role::from_str(&text).unwrap(), role);
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(serde_json::from_str::<Role>(&json).unwrap(), role);
        }
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.to_string(), "assistant");
    }

    #[test]
    fn feedback_direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&FeedbackDirection::Up).unwrap(), "\"up\"");
        assert_eq!(serde_json::to_string(&FeedbackDirection::Down).unwrap(), "\"down\"");
    }

    #[test]
    fn kind_follows_role() {
        assert_eq!(MessageKind::from(Role::User), MessageKind::Plain);
        assert_eq!(MessageKind::from(Role::Assistant), MessageKind::ModelGenerated);
    }

    #[test]
    fn thread_scope_projects_user_scope() {
        let scope = ThreadScope {
            org_id: OrgId("acme".into()),
            tenant_id: Some(TenantId("emea".into())),
            user_id: UserId("u-1".into()),
            thread_id: ThreadId("t-1".into()),
        };
        let user = scope.user_scope();
        assert_eq!(user.org_id, scope.org_id);
        assert_eq!(user.tenant_id, scope.tenant_id);
        assert_eq!(user.user_id, scope.user_id);
    }
}
