//! Application runner: logging, runtime construction, and command dispatch.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;
use tokio::runtime::Builder;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use crate::client::RecipeClient;
use crate::controls::{Cli, ClientControls, Command, NavigateAction};
use crate::detail::DetailPage;
use crate::listing::ListingPage;
use crate::location::{commit_page, commit_search, recipe_location, Location};
use crate::shell;
use crate::transport::HttpTransport;

/// Entry point used by the binary.
pub fn run(cli: Cli) -> Result<()> {
    init_tracing();
    let rt = Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    rt.block_on(dispatch(cli))
}

fn init_tracing() {
    // stdout carries rendered views
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    let json = cli.json;
    match &cli.command {
        Command::Navigate { from, action } => {
            let from = parse_location(from)?;
            let next = match action {
                NavigateAction::Search { term } => commit_search(&from, term),
                NavigateAction::Page { number } => commit_page(&from, *number),
            };
            println!("{next}");
            Ok(())
        }
        Command::Menu { location } => {
            let location = parse_location(location)?;
            let mut page = ListingPage::new(build_client(&cli)?);
            let view = page.load_with_progress(&location, report).await;
            print!("{}", render(view, json)?);
            Ok(())
        }
        Command::Recipe { name } => {
            let mut page = DetailPage::new(build_client(&cli)?);
            let view = page
                .load_with_progress(&recipe_location(name), report)
                .await;
            print!("{}", render(view, json)?);
            Ok(())
        }
        Command::Shell { location } => {
            let location = parse_location(location)?;
            shell::run(build_client(&cli)?, location, json).await
        }
    }
}

/// Builds a network-backed recipe client from the CLI configuration.
pub fn build_client(cli: &Cli) -> Result<RecipeClient> {
    let controls = cli
        .build_controls()
        .with_context(|| format!("invalid base url '{}'", cli.base_url))?;
    client_from_controls(&controls)
}

/// Builds a network-backed recipe client from validated controls.
pub fn client_from_controls(controls: &ClientControls) -> Result<RecipeClient> {
    let transport = HttpTransport::new(controls).context("failed to build HTTP client")?;
    debug!(base = %controls.base_url(), "recipe client ready");
    Ok(RecipeClient::new(
        Arc::new(transport),
        controls.base_url().clone(),
    ))
}

fn parse_location(input: &str) -> Result<Location> {
    Location::parse(input).with_context(|| format!("invalid location '{input}'"))
}

/// Writes an in-progress view to stderr, keeping stdout for finished views.
pub fn report<T: Display>(view: &T) {
    eprint!("{view}");
}

/// Renders a view as text, or as pretty JSON followed by a newline.
pub fn render<T>(view: &T, json: bool) -> Result<String>
where
    T: Display + Serialize,
{
    if json {
        let mut out = serde_json::to_string_pretty(view).context("failed to encode view")?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(view.to_string())
    }
}
