//! Per-entity operations on [`Kleister`](crate::Kleister).
//!
//! Every module adds one `impl` block. Association endpoints share their
//! shape across entities, so they are generated by the two macros below:
//! `permissioned!` for links carrying a [`Perm`](kleister_api_models::Perm)
//! grade (list, append, update grade, remove) and `linked!` for plain links
//! (list, append, remove). Both sides of a link use the same body.

macro_rules! permissioned {
    (
        $owner_label:literal / $member_label:literal,
        path: ($root:literal, $collection:literal),
        row: $row:ty,
        params: $params:ident { $owner:ident, $member:ident },
        list: $list:ident,
        append: $append:ident,
        update: $update:ident,
        remove: $remove:ident $(,)?
    ) => {
        impl<T: $crate::transport::Transport> $crate::api::Kleister<T> {
            #[doc = concat!("List the ", $member_label, " links of a ", $owner_label, " with their grade.")]
            ///
            /// # Errors
            ///
            /// Returns the classified transport error.
            pub async fn $list(&self, $owner: &str) -> $crate::error::Result<Vec<$row>> {
                let path = $crate::resources::link_path($owner_label, $root, $collection, $owner)?;
                self.get(&path).await
            }

            #[doc = concat!("Link a ", $member_label, " to a ", $owner_label, " with `perm`.")]
            ///
            /// # Errors
            ///
            /// Returns the classified transport error.
            pub async fn $append(
                &self,
                $owner: &str,
                $member: &str,
                perm: kleister_api_models::Perm,
            ) -> $crate::error::Result<()> {
                let path = $crate::resources::link_path($owner_label, $root, $collection, $owner)?;
                let body = $params {
                    $owner: $owner.trim().to_string(),
                    $member: $crate::api::ident($member_label, $member)?.to_string(),
                    perm: Some(perm),
                };
                self.send($crate::transport::Method::POST, &path, Some(&body)).await
            }

            #[doc = concat!("Change the grade of an existing ", $owner_label, "/", $member_label, " link.")]
            ///
            /// # Errors
            ///
            /// Returns the classified transport error.
            pub async fn $update(
                &self,
                $owner: &str,
                $member: &str,
                perm: kleister_api_models::Perm,
            ) -> $crate::error::Result<()> {
                let path = $crate::resources::link_path($owner_label, $root, $collection, $owner)?;
                let body = $params {
                    $owner: $owner.trim().to_string(),
                    $member: $crate::api::ident($member_label, $member)?.to_string(),
                    perm: Some(perm),
                };
                self.send($crate::transport::Method::PUT, &path, Some(&body)).await
            }

            #[doc = concat!("Unlink a ", $member_label, " from a ", $owner_label, ".")]
            ///
            /// # Errors
            ///
            /// Returns the classified transport error.
            pub async fn $remove(&self, $owner: &str, $member: &str) -> $crate::error::Result<()> {
                let path = $crate::resources::link_path($owner_label, $root, $collection, $owner)?;
                let body = $params {
                    $owner: $owner.trim().to_string(),
                    $member: $crate::api::ident($member_label, $member)?.to_string(),
                    perm: None,
                };
                self.send($crate::transport::Method::DELETE, &path, Some(&body)).await
            }
        }
    };
}

macro_rules! linked {
    (
        $owner_label:literal / $member_label:literal,
        path: ($root:literal, $collection:literal),
        row: $row:ty,
        params: $params:ident { $owner:ident, $member:ident },
        list: $list:ident,
        append: $append:ident,
        remove: $remove:ident $(,)?
    ) => {
        impl<T: $crate::transport::Transport> $crate::api::Kleister<T> {
            #[doc = concat!("List the ", $member_label, " links of a ", $owner_label, ".")]
            ///
            /// # Errors
            ///
            /// Returns the classified transport error.
            pub async fn $list(&self, $owner: &str) -> $crate::error::Result<Vec<$row>> {
                let path = $crate::resources::link_path($owner_label, $root, $collection, $owner)?;
                self.get(&path).await
            }

            #[doc = concat!("Link a ", $member_label, " to a ", $owner_label, ".")]
            ///
            /// # Errors
            ///
            /// Returns the classified transport error.
            pub async fn $append(&self, $owner: &str, $member: &str) -> $crate::error::Result<()> {
                let path = $crate::resources::link_path($owner_label, $root, $collection, $owner)?;
                let body = $params {
                    $owner: $owner.trim().to_string(),
                    $member: $crate::api::ident($member_label, $member)?.to_string(),
                };
                self.send($crate::transport::Method::POST, &path, Some(&body)).await
            }

            #[doc = concat!("Unlink a ", $member_label, " from a ", $owner_label, ".")]
            ///
            /// # Errors
            ///
            /// Returns the classified transport error.
            pub async fn $remove(&self, $owner: &str, $member: &str) -> $crate::error::Result<()> {
                let path = $crate::resources::link_path($owner_label, $root, $collection, $owner)?;
                let body = $params {
                    $owner: $owner.trim().to_string(),
                    $member: $crate::api::ident($member_label, $member)?.to_string(),
                };
                self.send($crate::transport::Method::DELETE, &path, Some(&body)).await
            }
        }
    };
}

mod builds;
mod clients;
mod forge;
mod keys;
mod minecraft;
mod mods;
mod packs;
mod profile;
mod teams;
mod users;
mod versions;

pub use builds::{BuildChanges, BuildDraft};
pub use packs::PackChanges;
pub use versions::VersionDraft;

use crate::api::ident;
use crate::error::Result;

/// `/api/{root}/{owner}/{collection}` with a validated owner.
pub(crate) fn link_path(
    owner_label: &str,
    root: &str,
    collection: &str,
    owner: &str,
) -> Result<String> {
    Ok(format!(
        "/api/{root}/{}/{collection}",
        ident(owner_label, owner)?
    ))
}

/// `/api/{root}/{id}` with a validated identifier.
pub(crate) fn item_path(label: &str, root: &str, id: &str) -> Result<String> {
    Ok(format!("/api/{root}/{}", ident(label, id)?))
}
