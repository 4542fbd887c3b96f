#![forbid(unsafe_code)]
#![warn(
    unused,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::redundant_pub_crate)]

//! Typed HTTP client for the Kleister mod-pack management API.
//!
//! Layout:
//! - `transport.rs`: the `Transport` capability and its reqwest implementation
//! - `api.rs`: the `Kleister` façade, shared request plumbing, update outcomes
//! - `auth.rs`: login and token probing
//! - `resources/`: one module per entity, association endpoints included
//! - `assets.rs`: data-URL encoding of local and remote uploads
//! - `ordering.rs`: version-aware orderings over catalog rows
//! - `catalog.rs`: filter, sort and first/last selection for catalog listings
//! - `error.rs`: the error taxonomy
//! - `testing.rs`: recording transport for tests (`testing` feature)

pub mod api;
pub mod assets;
mod auth;
pub mod catalog;
pub mod error;
pub mod ordering;
mod resources;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;

pub use api::{Kleister, UpdateOutcome};
pub use assets::{AssetEncoder, AssetSource};
pub use catalog::{CatalogQuery, Select};
pub use error::{Error, NetworkErrorKind, Result};
pub use resources::{BuildChanges, BuildDraft, PackChanges, VersionDraft};
pub use transport::{HttpTransport, Transport, TransportConfig};

pub use kleister_api_models as models;
