//! `lifelog` command-line client.
//!
//! Talks to a running `lifelog-server`. Tokens from `lifelog login` are cached
//! in the user's config directory and refreshed transparently.

mod api;
mod client;
mod commands;
mod prompt;
mod render;
mod token_store;

use clap::Parser;
use color_eyre::eyre::{Context, Result};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::client::ApiClient;
use crate::commands::Command;
use crate::prompt::Prompter;
use crate::token_store::TokenStore;

#[derive(Debug, Parser)]
#[command(name = "lifelog", version, about = "Log tags, activities and expenses")]
struct Cli {
    /// Base URL of the lifelog server.
    #[arg(
        long,
        env = "LIFELOG_SERVER",
        default_value = "http://localhost:8080",
        global = true
    )]
    server: Url,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = TokenStore::default_location().wrap_err("failed to locate the token cache")?;
    debug!(path = %store.path().display(), "using token cache");
    let client = ApiClient::new(cli.server, store).wrap_err("failed to build the HTTP client")?;
    let mut prompter = Prompter::stdio();

    let output = commands::run(cli.command, &client, &mut prompter).await?;
    println!("{output}");
    Ok(())
}
