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
#![allow(clippy::redundant_pub_crate, clippy::module_name_repetitions)]

//! Administrative CLI for a Kleister mod-pack server.
//!
//! Layout:
//! - `cli.rs`: argument parsing, startup and command dispatch
//! - `config.rs`: server, token and deadline resolution
//! - `commands/`: command handlers grouped by entity
//! - `client.rs`: CLI errors and the context handed to handlers
//! - `output.rs`: text, JSON and XML renderers
//! - `template.rs`: the `{{ path | func }}` text template language
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod config;
pub(crate) mod output;
pub(crate) mod template;

pub use cli::{run, run_with_args};
