//! Jam3ya reminder daemon
//!
//! Sleeps until the next quarterly reminder slot, then mails every active
//! member who has not paid for the current year.

use std::sync::Arc;

use anyhow::bail;
use chrono::{Datelike, Local};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jam3ya_core::ledger::ContributionPolicy;
use jam3ya_core::reminders::{ReminderService, until_next_reminder};
use jam3ya_db::{MemberRepository, TransactionRepository, connect};
use jam3ya_shared::{AppConfig, AppError, EmailService};

#[derive(Debug, Parser)]
#[command(name = "jam3ya-reminder", version, about = "Quarterly contribution reminders")]
struct Args {
    /// Send one round immediately and exit
    #[arg(long)]
    once: bool,
    /// Contribution year for `--once`; defaults to the current year
    #[arg(long, requires = "once")]
    year: Option<i32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jam3ya=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = connect(&config.database).await?;
    info!(backend = ?config.database.backend()?, "Connected to database");

    let email_service = EmailService::new(config.email.clone());
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        "Email service configured"
    );

    let service = ReminderService::new(
        Arc::new(TransactionRepository::new(db.clone())),
        Arc::new(MemberRepository::new(db)),
        Arc::new(email_service),
        ContributionPolicy::from(&config.ledger),
        config.reminders.clone(),
    );

    if args.once {
        let year = args.year.unwrap_or_else(|| Local::now().year());
        let summary = service.run_for_year(year).await?;
        info!(?summary, "Reminder round finished");
        return Ok(());
    }

    if !config.reminders.enabled {
        bail!("reminders are disabled; set reminders.enabled or use --once");
    }

    loop {
        let Some((at, wait)) = until_next_reminder(Local::now().naive_local()) else {
            bail!("no reminder slot left in the calendar");
        };
        info!(next = %at, "Waiting for next reminder round");

        tokio::select! {
            () = tokio::time::sleep(wait) => {}
            result = tokio::signal::ctrl_c() => {
                result?;
                info!("Shutting down");
                return Ok(());
            }
        }

        let year = at.year();
        if let Err(e) = service.run_for_year(year).await {
            let err = AppError::from(e);
            error!(year, code = err.error_code(), error = %err, "Reminder round failed");
        }
    }
}
