use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;
pub mod runner;

#[derive(Parser)]
#[command(name = "fundledger")]
#[command(version, about = "Reporting console over a buy/sell fund ledger")]
#[command(
    long_about = "Run sales, assets-under-management, break and profit reports over a ledger of STOCK_FUND/BOND_FUND transactions. Without a subcommand an interactive report menu is started."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Ledger database path (overrides FUNDLEDGER_DB and config.toml)
    #[arg(long = "db", global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today for period windows
    #[arg(long = "as-of", global = true, value_name = "DATE")]
    pub as_of: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the ledger database
    Init,

    /// Import ledger transactions from a CSV file
    Import {
        /// Path to the CSV file (SALES_REP,INVESTOR,FUND,TXN_TYPE,TXN_SHARES,TXN_PRICE,TXN_DATE)
        file: String,

        /// Validate only, don't save to database
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Run one report by menu id (1-4) or name (sales, aum, breaks, profit)
    Report {
        /// Report id or name
        report: String,
    },

    /// List the available reports
    Menu,

    /// Start the interactive report menu
    Interactive,
}
