//! Request bodies sent by the client.
//!
//! `*Params` types are full create bodies. `*Patch` types hold only the
//! fields an update changes; unset fields are omitted from the JSON body.
//! Nullable references use a nested option so that `Some(None)` encodes an
//! explicit `null` while `None` leaves the field untouched.

use serde::Serialize;

use crate::entities::Attachment;
use crate::perm::Perm;

/// Credentials exchanged for a session token.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginParams {
    /// Login name.
    #[serde(rename = "Username")]
    pub username: String,
    /// Plain-text password.
    #[serde(rename = "Password")]
    pub password: String,
}

/// Changes to the authenticated profile.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ProfilePatch {
    /// New slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// New login name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New contact address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ProfilePatch {
    /// Whether the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slug.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
    }
}

/// Body for creating an API key.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct KeyParams {
    /// Display name.
    pub name: String,
    /// Secret value, generated by the server when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Changes to an API key.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct KeyPatch {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New secret value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl KeyPatch {
    /// Whether the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.value.is_none()
    }
}

/// Body for registering a launcher client.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ClientParams {
    /// Slug, derived from the name by the server when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Display name.
    pub name: String,
    /// Launcher UUID.
    pub uuid: String,
}

/// Changes to a launcher client.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ClientPatch {
    /// New slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New launcher UUID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

impl ClientPatch {
    /// Whether the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slug.is_none() && self.name.is_none() && self.uuid.is_none()
    }
}

/// Body for creating a pack.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PackParams {
    /// Slug, derived from the name by the server when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Display name.
    pub name: String,
    /// Project website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Icon upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Attachment>,
    /// Logo upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<Attachment>,
    /// Background upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Attachment>,
    /// Publication flag.
    pub published: bool,
    /// Visibility flag.
    pub private: bool,
}

/// Changes to a pack.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PackPatch {
    /// New slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// New icon upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Attachment>,
    /// New logo upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<Attachment>,
    /// New background upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Attachment>,
    /// New recommended build id, `Some(None)` clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_id: Option<Option<i64>>,
    /// New latest build id, `Some(None)` clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_id: Option<Option<i64>>,
    /// New publication flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    /// New visibility flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
}

impl PackPatch {
    /// Whether the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slug.is_none()
            && self.name.is_none()
            && self.website.is_none()
            && self.icon.is_none()
            && self.logo.is_none()
            && self.background.is_none()
            && self.recommended_id.is_none()
            && self.latest_id.is_none()
            && self.published.is_none()
            && self.private.is_none()
    }
}

/// Body for creating a build inside a pack.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BuildParams {
    /// Slug, derived from the name by the server when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Display name.
    pub name: String,
    /// Pinned Minecraft version id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minecraft_id: Option<i64>,
    /// Pinned Forge version id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forge_id: Option<i64>,
    /// Minimal Java version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_java: Option<String>,
    /// Minimal memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_memory: Option<String>,
    /// Publication flag.
    pub published: bool,
    /// Visibility flag.
    pub private: bool,
}

/// Changes to a build.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct BuildPatch {
    /// New slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New Minecraft version id, `Some(None)` clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minecraft_id: Option<Option<i64>>,
    /// New Forge version id, `Some(None)` clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forge_id: Option<Option<i64>>,
    /// New minimal Java version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_java: Option<String>,
    /// New minimal memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_memory: Option<String>,
    /// New publication flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    /// New visibility flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
}

impl BuildPatch {
    /// Whether the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slug.is_none()
            && self.name.is_none()
            && self.minecraft_id.is_none()
            && self.forge_id.is_none()
            && self.min_java.is_none()
            && self.min_memory.is_none()
            && self.published.is_none()
            && self.private.is_none()
    }
}

/// Body for creating a mod.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ModParams {
    /// Slug, derived from the name by the server when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Display name.
    pub name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Author attribution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Project website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Donation link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donate: Option<String>,
}

/// Changes to a mod.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ModPatch {
    /// New slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New author attribution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// New website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// New donation link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donate: Option<String>,
}

impl ModPatch {
    /// Whether the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slug.is_none()
            && self.name.is_none()
            && self.description.is_none()
            && self.author.is_none()
            && self.website.is_none()
            && self.donate.is_none()
    }
}

/// Body for creating a mod version.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct VersionParams {
    /// Slug, derived from the name by the server when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Display name.
    pub name: String,
    /// Owning mod id.
    pub mod_id: i64,
    /// Archive upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<Attachment>,
}

/// Changes to a mod version.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct VersionPatch {
    /// New slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New archive upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<Attachment>,
}

impl VersionPatch {
    /// Whether the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slug.is_none() && self.name.is_none() && self.file.is_none()
    }
}

/// Body for creating a user.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UserParams {
    /// Slug, derived from the username by the server when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Login name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Whether the account may log in.
    pub active: bool,
    /// Whether the account has administrative rights.
    pub admin: bool,
}

/// Changes to a user.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UserPatch {
    /// New slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// New login name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New contact address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// New activation flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// New administrator flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<bool>,
}

impl UserPatch {
    /// Whether the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slug.is_none()
            && self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.active.is_none()
            && self.admin.is_none()
    }
}

/// Body for creating a team.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TeamParams {
    /// Slug, derived from the name by the server when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Display name.
    pub name: String,
}

/// Changes to a team.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TeamPatch {
    /// New slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TeamPatch {
    /// Whether the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.slug.is_none() && self.name.is_none()
    }
}

/// Endpoints of a pack/client link.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PackClientParams {
    /// Pack id or slug.
    pub pack: String,
    /// Client id or slug.
    pub client: String,
}

/// Endpoints and grade of a pack/user link.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PackUserParams {
    /// Pack id or slug.
    pub pack: String,
    /// User id or slug.
    pub user: String,
    /// Grade, omitted on removal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perm: Option<Perm>,
}

/// Endpoints and grade of a pack/team link.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PackTeamParams {
    /// Pack id or slug.
    pub pack: String,
    /// Team id or slug.
    pub team: String,
    /// Grade, omitted on removal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perm: Option<Perm>,
}

/// Endpoints and grade of a mod/user link.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModUserParams {
    /// Mod id or slug.
    #[serde(rename = "mod")]
    pub module: String,
    /// User id or slug.
    pub user: String,
    /// Grade, omitted on removal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perm: Option<Perm>,
}

/// Endpoints and grade of a mod/team link.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModTeamParams {
    /// Mod id or slug.
    #[serde(rename = "mod")]
    pub module: String,
    /// Team id or slug.
    pub team: String,
    /// Grade, omitted on removal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perm: Option<Perm>,
}

/// Endpoints and grade of a team/user link.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TeamUserParams {
    /// Team id or slug.
    pub team: String,
    /// User id or slug.
    pub user: String,
    /// Grade, omitted on removal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perm: Option<Perm>,
}

/// Endpoints of a build/version link.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BuildVersionParams {
    /// Pack id or slug owning the build.
    pub pack: String,
    /// Build id or slug.
    pub build: String,
    /// Mod id or slug owning the version.
    #[serde(rename = "mod")]
    pub module: String,
    /// Version id or slug.
    pub version: String,
}

/// Endpoints of a Minecraft/build link.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MinecraftBuildParams {
    /// Minecraft id or slug.
    pub minecraft: String,
    /// Pack id or slug owning the build.
    pub pack: String,
    /// Build id or slug.
    pub build: String,
}

/// Endpoints of a Forge/build link.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ForgeBuildParams {
    /// Forge id or slug.
    pub forge: String,
    /// Pack id or slug owning the build.
    pub pack: String,
    /// Build id or slug.
    pub build: String,
}
