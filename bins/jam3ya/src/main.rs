//! Jam3ya operator CLI
//!
//! Spreadsheet import/export, postings, approvals and reports against the
//! configured fund database.

mod cli;
mod commands;
mod interchange;
mod report;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jam3ya_shared::AppConfig;

use crate::cli::Cli;
use crate::commands::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr so exports can be piped from stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jam3ya=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load()?;
    let app = App::connect(config).await?;

    commands::run(&app, cli.command).await
}
