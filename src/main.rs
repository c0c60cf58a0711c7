mod cli;
mod commands;
mod dispatcher;
mod ui;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use cli::Cli;
use commands::Command;
use dispatcher::AppContext;
use fundledger::config::AppConfig;
use fundledger::reports::QueryParams;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    // Logs go to stderr so tables and JSON on stdout stay clean
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color || cli.json {
        colored::control::set_override(false);
    }

    let as_of = match cli.as_of.as_deref() {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid --as-of date '{}'. Use YYYY-MM-DD", raw))?,
        None => Local::now().date_naive(),
    };

    let ctx = AppContext {
        db_path: config.resolve_db_path(cli.db.as_deref())?,
        params: QueryParams { as_of },
        json: cli.json,
    };

    let command = match cli.command.as_ref() {
        Some(c) => cli::runner::to_internal_command(c)?,
        None => Command::Interactive,
    };

    dispatcher::dispatch_command(command, &ctx).await
}
