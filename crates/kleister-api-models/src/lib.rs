#![forbid(unsafe_code)]
#![warn(
    unused,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
//! Shared HTTP DTOs for the Kleister API.
//!
//! Read models mirror what the server returns; the `*Params` and `*Patch`
//! types are the request bodies the client sends. Field names follow the
//! server's `snake_case` wire format, timestamps are kept as the opaque
//! RFC 3339 strings the server produced.
//!
//! Layout:
//! - `entities.rs`: packs, builds, mods, versions, users, teams, catalogs
//! - `associations.rs`: join rows nesting their counterpart entity
//! - `params.rs`: create bodies, patch bodies and association bodies
//! - `perm.rs`: permission grade carried by permissioned associations
//! - `nullable.rs`: decoding helpers for nullable reference ids

pub mod associations;
pub mod entities;
pub mod nullable;
pub mod params;
pub mod perm;

pub use associations::{BuildVersion, ModTeam, ModUser, PackClient, PackTeam, PackUser, TeamUser};
pub use entities::{
    Attachment, Build, Client, Forge, Identifiable, Key, Minecraft, Mod, Pack, Profile, Team,
    Token, User, Version,
};
pub use params::{
    BuildParams, BuildPatch, BuildVersionParams, ClientParams, ClientPatch, ForgeBuildParams,
    KeyParams, KeyPatch, LoginParams, MinecraftBuildParams, ModParams, ModPatch, ModTeamParams,
    ModUserParams, PackClientParams, PackParams, PackPatch, PackTeamParams, PackUserParams,
    ProfilePatch, TeamParams, TeamPatch, TeamUserParams, UserParams, UserPatch, VersionParams,
    VersionPatch,
};
pub use perm::{InvalidPerm, Perm};

use serde::{Deserialize, Serialize};

/// Error envelope returned by the server for any status above 206.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// HTTP status echoed by the server.
    #[serde(default)]
    pub status: u16,
    /// Human-readable failure description.
    pub message: String,
}
