//! Association rows returned by the listing endpoints.
//!
//! Every row carries both endpoint ids; the server nests the counterpart of
//! the listing side by value, so a row fetched from `/packs/{id}/users` has
//! `user` populated while the same row fetched from `/users/{id}/packs` has
//! `pack` populated.

use serde::{Deserialize, Serialize};

use crate::entities::{Build, Client, Mod, Pack, Team, User, Version};
use crate::perm::Perm;

/// Link between a pack and a launcher client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackClient {
    /// Pack id.
    #[serde(default)]
    pub pack_id: i64,
    /// Nested pack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<Pack>,
    /// Client id.
    #[serde(default)]
    pub client_id: i64,
    /// Nested client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Permissioned link between a pack and a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackUser {
    /// Pack id.
    #[serde(default)]
    pub pack_id: i64,
    /// Nested pack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<Pack>,
    /// User id.
    #[serde(default)]
    pub user_id: i64,
    /// Nested user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Granted permission.
    pub perm: Perm,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Permissioned link between a pack and a team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackTeam {
    /// Pack id.
    #[serde(default)]
    pub pack_id: i64,
    /// Nested pack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<Pack>,
    /// Team id.
    #[serde(default)]
    pub team_id: i64,
    /// Nested team.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
    /// Granted permission.
    pub perm: Perm,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Permissioned link between a mod and a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModUser {
    /// Mod id.
    #[serde(default)]
    pub mod_id: i64,
    /// Nested mod.
    #[serde(rename = "mod", default, skip_serializing_if = "Option::is_none")]
    pub module: Option<Mod>,
    /// User id.
    #[serde(default)]
    pub user_id: i64,
    /// Nested user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Granted permission.
    pub perm: Perm,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Permissioned link between a mod and a team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModTeam {
    /// Mod id.
    #[serde(default)]
    pub mod_id: i64,
    /// Nested mod.
    #[serde(rename = "mod", default, skip_serializing_if = "Option::is_none")]
    pub module: Option<Mod>,
    /// Team id.
    #[serde(default)]
    pub team_id: i64,
    /// Nested team.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
    /// Granted permission.
    pub perm: Perm,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Permissioned link between a team and a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamUser {
    /// Team id.
    #[serde(default)]
    pub team_id: i64,
    /// Nested team.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
    /// User id.
    #[serde(default)]
    pub user_id: i64,
    /// Nested user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    /// Granted permission.
    pub perm: Perm,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Link between a build and a mod version.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildVersion {
    /// Build id.
    #[serde(default)]
    pub build_id: i64,
    /// Nested build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<Build>,
    /// Version id.
    #[serde(default)]
    pub version_id: i64,
    /// Nested version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pack_user_row_nests_counterpart() {
        let row: PackUser = serde_json::from_value(json!({
            "pack_id": 7,
            "user_id": 3,
            "user": {"id": 3, "slug": "alice", "username": "alice"},
            "perm": "admin"
        }))
        .expect("row should decode");
        assert_eq!(row.perm, Perm::Admin);
        assert_eq!(row.user.map(|user| user.username), Some("alice".into()));
        assert!(row.pack.is_none());
    }

    #[test]
    fn permissioned_rows_reject_unknown_grades() {
        let result = serde_json::from_value::<TeamUser>(json!({
            "team_id": 1,
            "user_id": 2,
            "perm": "superuser"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn mod_rows_use_mod_key() {
        let row: ModTeam = serde_json::from_value(json!({
            "mod_id": 4,
            "mod": {"id": 4, "slug": "buildcraft"},
            "team_id": 5,
            "perm": "owner"
        }))
        .expect("row should decode");
        assert_eq!(row.module.map(|module| module.slug), Some("buildcraft".into()));
    }
}
