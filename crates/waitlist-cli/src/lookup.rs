//! # Lookup Subcommand
//!
//! Drives the status panel: enter the identifier, search, and print what
//! the panel shows once the lookup resolves.

use anyhow::{bail, Result};
use clap::Args;
use waitlist_core::{PanelCommand, PanelEvent, StatusPanel};

use crate::client::ApiClient;

/// Arguments for the `waitlist lookup` subcommand.
#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Identifier returned at signup.
    pub id: String,
}

/// Search for `id` and return the settled panel.
pub async fn search(id: &str, client: &ApiClient) -> Result<StatusPanel> {
    let mut panel = StatusPanel::new();
    panel.apply(PanelEvent::Input(id.to_string()));

    let Some(PanelCommand::Lookup(unique_id)) = panel.apply(PanelEvent::Search) else {
        bail!("Missing uniqueId parameter");
    };
    let result = client.lookup(&unique_id).await.map_err(|e| e.to_string());
    panel.apply(PanelEvent::Resolved(result));
    Ok(panel)
}

pub async fn run_lookup(args: &LookupArgs, client: &ApiClient) -> Result<u8> {
    let panel = search(&args.id, client).await?;
    print!("{}", panel.render());
    Ok(if panel.entry().is_some() { 0 } else { 1 })
}
