//! Entities exposed by the Kleister API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::nullable;

/// Common accessors for entities addressable by numeric id or slug.
pub trait Identifiable {
    /// Server-assigned numeric id.
    fn id(&self) -> i64;
    /// Unique human-readable identifier within the entity kind.
    fn slug(&self) -> &str;

    /// Whether `reference` names this entity, either by slug or by decimal id.
    fn matches(&self, reference: &str) -> bool {
        self.slug() == reference || self.id().to_string() == reference
    }
}

macro_rules! identifiable {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl Identifiable for $kind {
                fn id(&self) -> i64 {
                    self.id
                }

                fn slug(&self) -> &str {
                    &self.slug
                }
            }
        )+
    };
}

identifiable!(Profile, Key, Client, Pack, Build, Mod, Version, User, Team, Minecraft, Forge);

/// Binary asset embedded in a parent entity.
///
/// Read responses populate `url` and `md5`; write requests carry only the
/// `upload` data URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    /// Download location assigned by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// MD5 checksum of the stored blob.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    /// RFC 2397 data URL holding the payload to store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload: Option<String>,
}

impl Attachment {
    /// Build the write form of an attachment from a data URL.
    #[must_use]
    pub fn upload(data_url: String) -> Self {
        Self {
            url: None,
            md5: None,
            upload: Some(data_url),
        }
    }
}

/// Session token issued by the login or token endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    /// Opaque bearer token.
    pub token: String,
    /// Expiry instant, absent for non-expiring tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<DateTime<Utc>>,
}

/// Profile of the authenticated account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Numeric id.
    pub id: i64,
    /// Unique slug.
    #[serde(default)]
    pub slug: String,
    /// Login name.
    #[serde(default)]
    pub username: String,
    /// Contact address.
    #[serde(default)]
    pub email: String,
    /// Whether the account may log in.
    #[serde(default)]
    pub active: bool,
    /// Whether the account has administrative rights.
    #[serde(default)]
    pub admin: bool,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// API credential distinct from session tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Key {
    /// Numeric id.
    pub id: i64,
    /// Unique slug.
    #[serde(default)]
    pub slug: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Secret value.
    #[serde(default)]
    pub value: String,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Launcher registration identified by a UUID.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Client {
    /// Numeric id.
    pub id: i64,
    /// Unique slug.
    #[serde(default)]
    pub slug: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Launcher UUID.
    #[serde(default)]
    pub uuid: String,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Curated collection of mods with per-build release tracks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pack {
    /// Numeric id.
    pub id: i64,
    /// Unique slug.
    #[serde(default)]
    pub slug: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Project website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Launcher icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Attachment>,
    /// Launcher logo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<Attachment>,
    /// Launcher background.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Attachment>,
    /// Id of the recommended build, `null` when unset.
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub recommended_id: Option<i64>,
    /// Recommended build, when embedded by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended: Option<Box<Build>>,
    /// Id of the latest build, `null` when unset.
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub latest_id: Option<i64>,
    /// Latest build, when embedded by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<Box<Build>>,
    /// Whether launchers may see the pack.
    #[serde(default)]
    pub published: bool,
    /// Whether access is restricted to assigned clients.
    #[serde(default)]
    pub private: bool,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Releasable configuration of a pack.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Build {
    /// Numeric id.
    pub id: i64,
    /// Owning pack id.
    #[serde(default)]
    pub pack_id: i64,
    /// Owning pack, when embedded by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<Box<Pack>>,
    /// Pinned Minecraft version id.
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub minecraft_id: Option<i64>,
    /// Pinned Minecraft version, when embedded by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minecraft: Option<Minecraft>,
    /// Pinned Forge version id.
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub forge_id: Option<i64>,
    /// Pinned Forge version, when embedded by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forge: Option<Forge>,
    /// Unique slug within the pack.
    #[serde(default)]
    pub slug: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Minimal Java version required to run the build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_java: Option<String>,
    /// Minimal memory required to run the build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_memory: Option<String>,
    /// Whether launchers may see the build.
    #[serde(default)]
    pub published: bool,
    /// Whether access is restricted.
    #[serde(default)]
    pub private: bool,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Plugin identity owning downloadable versions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mod {
    /// Numeric id.
    pub id: i64,
    /// Unique slug.
    #[serde(default)]
    pub slug: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Author attribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Project website.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Donation link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donate: Option<String>,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Downloadable revision of a mod.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Version {
    /// Numeric id.
    pub id: i64,
    /// Owning mod id.
    #[serde(default)]
    pub mod_id: i64,
    /// Owning mod, when embedded by the server.
    #[serde(rename = "mod", default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Mod>>,
    /// Unique slug within the mod.
    #[serde(default)]
    pub slug: String,
    /// Display name, usually the version number.
    #[serde(default)]
    pub name: String,
    /// Downloadable archive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<Attachment>,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Account managed by administrators.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Numeric id.
    pub id: i64,
    /// Unique slug.
    #[serde(default)]
    pub slug: String,
    /// Login name.
    #[serde(default)]
    pub username: String,
    /// Contact address.
    #[serde(default)]
    pub email: String,
    /// Whether the account may log in.
    #[serde(default)]
    pub active: bool,
    /// Whether the account has administrative rights.
    #[serde(default)]
    pub admin: bool,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Group of users sharing permissions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Team {
    /// Numeric id.
    pub id: i64,
    /// Unique slug.
    #[serde(default)]
    pub slug: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Minecraft release scraped from the upstream index.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Minecraft {
    /// Numeric id.
    pub id: i64,
    /// Unique slug.
    #[serde(default)]
    pub slug: String,
    /// Release number, e.g. `1.12.2`.
    #[serde(default)]
    pub version: String,
    /// Release channel, e.g. `release` or `snapshot`.
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Forge release scraped from the upstream index.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Forge {
    /// Numeric id.
    pub id: i64,
    /// Unique slug.
    #[serde(default)]
    pub slug: String,
    /// Forge release number, e.g. `14.23.5.2847`.
    #[serde(default)]
    pub version: String,
    /// Minecraft release the Forge build targets.
    #[serde(default)]
    pub minecraft: String,
    /// Creation timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}
