use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use jam3ya_core::ledger::ItemLabelMode;
use jam3ya_core::store::EntryType;
use jam3ya_shared::types::parse_amount;
use rust_decimal::Decimal;

use crate::interchange::parse_import_date;

#[derive(Debug, Parser)]
#[command(
    name = "jam3ya",
    version,
    about = "Operate the Jam3ya fund ledger: import, export, post and report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import ledger rows from CSV (date, subject, item, details, amount)
    ImportTransactions(ImportTransactionsArgs),
    /// Import or update members from CSV (code, name, phone, email)
    ImportMembers {
        /// CSV file to read
        path: PathBuf,
    },
    /// Mark every member code listed in a text file as inactive
    Deactivate {
        /// Text file with one member code per line
        path: PathBuf,
    },
    /// Write the projected ledger as CSV, newest first
    Export(ExportArgs),
    /// Print balances, subject totals and unpaid members
    Report {
        /// Contribution year to check; defaults to the current year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Record an approved income or expense posting
    Post(PostArgs),
    /// Record a member contribution awaiting approval
    Submit(SubmitArgs),
    /// Approve a pending transaction
    Approve {
        /// Transaction id
        id: i64,
    },
    /// Delete a transaction
    DeleteTransaction {
        /// Transaction id
        id: i64,
    },
    /// Move every transaction from one subject label to another
    Relabel {
        /// Current subject label
        #[arg(long)]
        from: String,
        /// New subject label
        #[arg(long)]
        to: String,
    },
    /// Manage the subject catalogue
    #[command(subcommand)]
    Subjects(SubjectCommand),
    /// Send contribution reminders to unpaid members now
    Remind {
        /// Contribution year; defaults to the current year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Suggest a category for a product listing
    Classify(ClassifyArgs),
}

#[derive(Debug, Args)]
pub struct ImportTransactionsArgs {
    /// CSV file to read
    pub path: PathBuf,
    /// Delete every existing transaction first
    #[arg(long)]
    pub replace: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Render member items as `codes` or `names`
    #[arg(long, default_value_t = ItemLabelMode::Codes)]
    pub mode: ItemLabelMode,
    /// Export one member's statement instead of the whole ledger
    #[arg(long)]
    pub member: Option<String>,
    /// Output file; stdout when omitted
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PostArgs {
    /// `income` or `expense`
    #[arg(long = "type")]
    pub entry_type: EntryType,
    /// Subject label
    #[arg(long)]
    pub subject: String,
    /// Member code or payee/payer
    #[arg(long, default_value = "")]
    pub item: String,
    /// Free-text details
    #[arg(long, default_value = "")]
    pub details: String,
    /// Value date; defaults to today
    #[arg(long, value_parser = date_arg)]
    pub date: Option<NaiveDate>,
    /// Amount; the sign follows `--type`
    #[arg(value_parser = amount_arg, allow_hyphen_values = true)]
    pub amount: Decimal,
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    /// Member code
    pub member: String,
    /// Amount paid
    #[arg(value_parser = amount_arg)]
    pub amount: Decimal,
    /// Contribution year, stored in the details
    #[arg(long)]
    pub year: Option<i32>,
    /// Payment date; defaults to today
    #[arg(long, value_parser = date_arg)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Subcommand)]
pub enum SubjectCommand {
    /// List subjects
    List,
    /// Add a subject
    Add {
        /// Subject name
        name: String,
    },
    /// Rename a subject and relabel its transactions
    Rename {
        /// Subject id
        id: i64,
        /// New name
        name: String,
    },
    /// Remove a subject from the catalogue
    Delete {
        /// Subject id
        id: i64,
    },
}

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Listing title
    #[arg(long)]
    pub title: String,
    /// Listing description
    #[arg(long)]
    pub description: Option<String>,
    /// Listing image
    #[arg(long)]
    pub image: Option<PathBuf>,
    /// MIME type of the image
    #[arg(long, default_value = "image/jpeg")]
    pub mime_type: String,
    /// Candidate category; repeat for each
    #[arg(long = "category", required = true)]
    pub categories: Vec<String>,
}

fn date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_import_date(value).ok_or_else(|| format!("not a date: {value}"))
}

fn amount_arg(value: &str) -> Result<Decimal, String> {
    parse_amount(value).ok_or_else(|| format!("not an amount: {value}"))
}
