//! Command dispatcher that routes parsed commands to their handlers.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;

use crate::cli::formatters;
use crate::commands::Command;
use crate::ui;
use fundledger::db::{self, RawTransaction, RecordSource, SqliteSource};
use fundledger::importers;
use fundledger::reports::{self, QueryParams, ReportKind};

/// Settings resolved once at startup and shared by every handler.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub db_path: PathBuf,
    pub params: QueryParams,
    pub json: bool,
}

/// Route a parsed command to its handler
pub async fn dispatch_command(command: Command, ctx: &AppContext) -> Result<()> {
    match command {
        Command::Init => dispatch_init(ctx),
        Command::Import { path, dry_run } => dispatch_import(&path, dry_run, ctx),
        Command::Report(kind) => dispatch_report(kind, ctx).await,
        Command::Menu => {
            println!("{}", formatters::format_menu());
            Ok(())
        }
        Command::Interactive => ui::launch_tui(ctx).await,
    }
}

fn dispatch_init(ctx: &AppContext) -> Result<()> {
    let conn = db::init_database(&ctx.db_path)?;
    let count = db::count_transactions(&conn)?;
    println!(
        "{} Ledger ready at {} ({} transactions)",
        "✓".green().bold(),
        ctx.db_path.display(),
        count
    );
    Ok(())
}

fn dispatch_import(path: &str, dry_run: bool, ctx: &AppContext) -> Result<()> {
    info!("Importing ledger from: {}", path);
    let parsed = importers::parse_ledger_csv(path)?;

    println!(
        "\n{} Found {} valid transactions\n",
        "✓".green().bold(),
        parsed.transactions.len()
    );
    for issue in &parsed.issues {
        println!(
            "  {} line {}: {}",
            "✗".red(),
            issue.line,
            issue.message
        );
    }

    if dry_run {
        println!("\n{} Dry run - no changes saved", "ℹ".blue().bold());
        return Ok(());
    }

    let mut conn = db::init_database(&ctx.db_path)?;
    let imported = db::insert_transactions(&mut conn, &parsed.transactions)?;

    println!("\n{} Import complete!", "✓".green().bold());
    println!("  Imported: {}", imported.to_string().green());
    if !parsed.issues.is_empty() {
        println!("  Rejected: {}", parsed.issues.len().to_string().red());
    }
    Ok(())
}

async fn dispatch_report(kind: ReportKind, ctx: &AppContext) -> Result<()> {
    info!("Running report {} ({})", kind.id(), kind.name());

    let rows = fetch_rows(ctx.db_path.clone(), kind, ctx.params.clone()).await?;
    let output = reports::build_report(kind, &rows, &ctx.params)
        .with_context(|| format!("Failed to build {}", kind.name()))?;

    if ctx.json {
        println!("{}", formatters::format_report_json(&output)?);
    } else {
        println!("{}", formatters::format_report_table(&output));
    }
    Ok(())
}

/// Run the report query off the async runtime; the connection lives only
/// for this call.
async fn fetch_rows(
    db_path: PathBuf,
    kind: ReportKind,
    params: QueryParams,
) -> Result<Vec<RawTransaction>> {
    tokio::task::spawn_blocking(move || -> Result<Vec<RawTransaction>> {
        let conn = db::init_database(&db_path)?;
        let rows = SqliteSource::new(&conn)
            .execute(kind, &params)
            .with_context(|| format!("Query for {} failed", kind.name()))?;
        Ok(rows)
    })
    .await
    .context("Report query task failed")?
}
