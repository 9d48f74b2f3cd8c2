//! Command execution against the configured database.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local, NaiveDate};
use jam3ya_core::classification::{GeminiClassifier, ProductListing, spawn_classification};
use jam3ya_core::ledger::{ContributionPolicy, LedgerService};
use jam3ya_core::reminders::ReminderService;
use jam3ya_core::store::{MemberStore, StoreError, SubjectStore, TransactionStore};
use jam3ya_db::{MemberRepository, SubjectRepository, TransactionRepository, connect};
use jam3ya_shared::AppConfig;
use jam3ya_shared::email::EmailService;
use jam3ya_shared::types::{SubjectId, TransactionId};
use tracing::{info, warn};

use crate::cli::{
    ClassifyArgs, Commands, ExportArgs, ImportTransactionsArgs, PostArgs, SubjectCommand,
    SubmitArgs,
};
use crate::interchange::{read_code_list, read_members, read_transactions, write_ledger};
use crate::report::DashboardReport;

/// Repositories over one connection pool.
pub struct App {
    config: AppConfig,
    transactions: Arc<TransactionRepository>,
    members: Arc<MemberRepository>,
    subjects: SubjectRepository,
}

impl App {
    /// Connects to the configured database.
    pub async fn connect(config: AppConfig) -> Result<Self> {
        let db = connect(&config.database)
            .await
            .context("connecting to the database")?;
        Ok(Self {
            transactions: Arc::new(TransactionRepository::new(db.clone())),
            members: Arc::new(MemberRepository::new(db.clone())),
            subjects: SubjectRepository::new(db),
            config,
        })
    }

    fn ledger(&self) -> LedgerService {
        LedgerService::new(
            self.transactions.clone(),
            self.members.clone(),
            self.config.ledger.clone(),
        )
    }
}

fn current_year() -> i32 {
    Local::now().year()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Runs one command to completion.
pub async fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::ImportTransactions(args) => import_transactions(app, args).await,
        Commands::ImportMembers { path } => {
            let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
            let saved = app.members.import_members(read_members(file)?).await?;
            let total = saved.len();
            println!("Imported {total} members");
            Ok(())
        }
        Commands::Deactivate { path } => deactivate(app, &path).await,
        Commands::Export(args) => export(app, args).await,
        Commands::Report { year } => {
            let dashboard = app.ledger().dashboard(year.unwrap_or_else(current_year)).await?;
            print!("{}", DashboardReport(&dashboard));
            Ok(())
        }
        Commands::Post(args) => post(app, args).await,
        Commands::Submit(args) => submit(app, args).await,
        Commands::Approve { id } => {
            app.ledger().approve(TransactionId::new(id)).await?;
            println!("Approved transaction {id}");
            Ok(())
        }
        Commands::DeleteTransaction { id } => {
            app.transactions
                .delete_transaction(TransactionId::new(id))
                .await?;
            warn!(id, "transaction deleted");
            println!("Deleted transaction {id}");
            Ok(())
        }
        Commands::Relabel { from, to } => {
            if to.trim().is_empty() {
                bail!("the new subject label must not be blank");
            }
            let moved = app.transactions.rename_subject(&from, to.trim()).await?;
            info!(%from, %to, moved, "subject relabelled");
            println!("Relabelled {moved} transactions");
            Ok(())
        }
        Commands::Subjects(command) => subjects(app, command).await,
        Commands::Remind { year } => remind(app, year.unwrap_or_else(current_year)).await,
        Commands::Classify(args) => classify(app, args).await,
    }
}

async fn import_transactions(app: &App, args: ImportTransactionsArgs) -> Result<()> {
    let file = File::open(&args.path)
        .with_context(|| format!("opening {}", args.path.display()))?;
    let rows = read_transactions(file)?;
    if rows.is_empty() {
        bail!("{} contains no ledger rows", args.path.display());
    }

    if args.replace {
        warn!(path = %args.path.display(), "replacing every existing transaction");
    }
    let total = app
        .transactions
        .import_transactions(rows, args.replace)
        .await?;
    println!("Imported {total} transactions");
    Ok(())
}

async fn deactivate(app: &App, path: &std::path::Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let (mut updated, mut missing) = (0usize, 0usize);
    for code in read_code_list(&text) {
        match app.members.set_active(&code, false).await {
            Ok(()) => updated += 1,
            Err(StoreError::NotFound { .. }) => {
                missing += 1;
                warn!(%code, "no member with this code");
            }
            Err(e) => return Err(e.into()),
        }
    }
    println!("Deactivated {updated} members, {missing} codes not found");
    Ok(())
}

async fn export(app: &App, args: ExportArgs) -> Result<()> {
    let service = app.ledger();
    let ledger = match args.member.as_deref() {
        Some(code) => service.member_statement(code).await?,
        None => service.overview().await?,
    };
    let labeler = service.labeler().await?;

    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    write_ledger(output, &ledger, &labeler, args.mode)?;
    info!(rows = ledger.transactions.len(), mode = %args.mode, "ledger exported");
    Ok(())
}

async fn post(app: &App, args: PostArgs) -> Result<()> {
    let id = app
        .ledger()
        .post_entry(
            args.date.unwrap_or_else(today),
            &args.subject,
            &args.item,
            &args.details,
            args.entry_type,
            args.amount,
        )
        .await?;
    println!("Posted transaction {id}");
    Ok(())
}

async fn submit(app: &App, args: SubmitArgs) -> Result<()> {
    let id = app
        .ledger()
        .submit_contribution(
            args.date.unwrap_or_else(today),
            &args.member,
            args.year,
            args.amount,
        )
        .await?;
    println!("Contribution {id} awaits approval");
    Ok(())
}

async fn subjects(app: &App, command: SubjectCommand) -> Result<()> {
    match command {
        SubjectCommand::List => {
            for subject in app.subjects.list_subjects().await? {
                println!("{:>6}  {}", subject.id, subject.name);
            }
        }
        SubjectCommand::Add { name } => {
            let subject = app.subjects.add_subject(&name).await?;
            println!("Added subject {} ({})", subject.name, subject.id);
        }
        SubjectCommand::Rename { id, name } => {
            let relabelled = app.subjects.rename_subject(SubjectId::new(id), &name).await?;
            println!("Renamed subject {id}; {relabelled} transactions relabelled");
        }
        SubjectCommand::Delete { id } => {
            app.subjects.delete_subject(SubjectId::new(id)).await?;
            println!("Deleted subject {id}");
        }
    }
    Ok(())
}

async fn remind(app: &App, year: i32) -> Result<()> {
    let service = ReminderService::new(
        app.transactions.clone(),
        app.members.clone(),
        Arc::new(EmailService::new(app.config.email.clone())),
        ContributionPolicy::from(&app.config.ledger),
        app.config.reminders.clone(),
    );
    let summary = service.run_for_year(year).await?;
    println!(
        "Reminders for {}: {} sent, {} failed",
        summary.year, summary.sent, summary.failed
    );
    Ok(())
}

async fn classify(app: &App, args: ClassifyArgs) -> Result<()> {
    let classifier = GeminiClassifier::from_config(&app.config.classifier)?;
    let image = match &args.image {
        Some(path) => std::fs::read(path).with_context(|| format!("reading {}", path.display()))?,
        None => Vec::new(),
    };
    let listing = ProductListing::new(args.title, args.description, image, args.mime_type);

    let suggestion = spawn_classification(Arc::new(classifier), listing, args.categories)
        .await
        .context("classification task failed")?;
    match suggestion {
        Some(category) => println!("{category}"),
        None => println!("No suggestion"),
    }
    Ok(())
}
