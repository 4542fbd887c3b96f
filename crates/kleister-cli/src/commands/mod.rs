//! Command handlers grouped by entity.
//!
//! Handlers build their renderer before the first request so a bad
//! `--format` template fails without touching the network. Results go to
//! stdout; confirmations go to stderr.

use kleister_client::UpdateOutcome;
use serde::Serialize;

use crate::client::CliResult;
use crate::output::{Renderer, emit, notice};

/// Run a permissioned [`LinkOp`](crate::cli::LinkOp) against one association.
macro_rules! permissioned_links {
    (
        $ctx:expr, $op:expr,
        owner: $owner_label:literal,
        element: $element:literal,
        template: $template:expr,
        list: $list:ident,
        append: $append:ident,
        update: $update:ident,
        remove: $remove:ident $(,)?
    ) => {{
        match $crate::cli::LinkOp::from($op) {
            $crate::cli::LinkOp::List { owner } => {
                let renderer = $ctx.output.renderer($template)?;
                let rows = $ctx.api.$list(&owner).await?;
                $crate::output::emit(&renderer.many($element, &rows)?);
            }
            $crate::cli::LinkOp::Append(link) => {
                let perm = link.perm_or_default()?;
                $ctx.api.$append(&link.owner, &link.member, perm).await?;
                $crate::output::notice(concat!("Successfully appended to ", $owner_label));
            }
            $crate::cli::LinkOp::Perm(link) => {
                let perm = link.required_perm()?;
                $ctx.api.$update(&link.owner, &link.member, perm).await?;
                $crate::output::notice("Successfully updated permissions");
            }
            $crate::cli::LinkOp::Remove(link) => {
                $ctx.api.$remove(&link.owner, &link.member).await?;
                $crate::output::notice(concat!("Successfully removed from ", $owner_label));
            }
        }
        Ok(())
    }};
}

/// Run a [`PlainLinkOp`](crate::cli::PlainLinkOp) against one association.
macro_rules! plain_links {
    (
        $ctx:expr, $op:expr,
        owner: $owner_label:literal,
        element: $element:literal,
        template: $template:expr,
        list: $list:ident,
        append: $append:ident,
        remove: $remove:ident $(,)?
    ) => {{
        match $crate::cli::PlainLinkOp::from($op) {
            $crate::cli::PlainLinkOp::List { owner } => {
                let renderer = $ctx.output.renderer($template)?;
                let rows = $ctx.api.$list(&owner).await?;
                $crate::output::emit(&renderer.many($element, &rows)?);
            }
            $crate::cli::PlainLinkOp::Append(link) => {
                $ctx.api.$append(&link.owner, &link.member).await?;
                $crate::output::notice(concat!("Successfully appended to ", $owner_label));
            }
            $crate::cli::PlainLinkOp::Remove(link) => {
                $ctx.api.$remove(&link.owner, &link.member).await?;
                $crate::output::notice(concat!("Successfully removed from ", $owner_label));
            }
        }
        Ok(())
    }};
}

pub(crate) mod builds;
pub(crate) mod catalog;
pub(crate) mod clients;
pub(crate) mod keys;
pub(crate) mod mods;
pub(crate) mod packs;
pub(crate) mod profile;
pub(crate) mod teams;
pub(crate) mod users;
pub(crate) mod versions;

pub(crate) fn print_created<T: Serialize>(renderer: &Renderer, element: &str, record: &T) -> CliResult<()> {
    notice("Successfully created");
    emit(&renderer.one(element, record)?);
    Ok(())
}

pub(crate) fn print_updated<T: Serialize>(
    renderer: &Renderer,
    element: &str,
    outcome: UpdateOutcome<T>,
) -> CliResult<()> {
    match outcome {
        UpdateOutcome::Updated(record) => {
            notice("Successfully updated");
            emit(&renderer.one(element, &record)?);
        }
        UpdateOutcome::Unchanged => notice("Nothing to update..."),
    }
    Ok(())
}

pub(crate) fn print_deleted() {
    notice("Successfully deleted");
}

/// `Some(value)` unless the flag was left empty.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use anyhow::{Result, anyhow};
    use httpmock::MockServer;
    use kleister_client::{Kleister, TransportConfig};

    use crate::client::AppContext;
    use crate::output::{Output, OutputFormat};

    pub(crate) fn context_with(server: &MockServer, format: OutputFormat) -> Result<AppContext> {
        let base_url = server.base_url().parse().map_err(|_| anyhow!("valid URL"))?;
        let api = Kleister::connect(TransportConfig::new(base_url))?;
        Ok(AppContext {
            api,
            output: Output {
                format,
                template: None,
            },
        })
    }

    pub(crate) fn context(server: &MockServer) -> Result<AppContext> {
        context_with(server, OutputFormat::Text)
    }
}
