//! Interactive report console
//!
//! Wires the session state machine to rustyline input and console output.

pub mod readline;
pub mod session;

use anyhow::Result;
use colored::Colorize;

use crate::cli::formatters;
use crate::dispatcher::AppContext;
use fundledger::config;
use fundledger::db::{self, SqliteSource};
use fundledger::reports::ReportOutput;
use session::{Renderer, Session};

const COMPLETION_WORDS: &[&str] = &[
    "sales", "aum", "breaks", "profit", "report", "menu", "help", "quit", "exit",
];

/// Prints to the terminal, as tables or JSON.
pub struct ConsoleRenderer {
    pub json: bool,
}

impl Renderer for ConsoleRenderer {
    fn menu(&mut self) {
        println!("{}", formatters::format_menu());
    }

    fn render(&mut self, output: &ReportOutput) {
        if self.json {
            match formatters::format_report_json(output) {
                Ok(json) => println!("{}", json),
                Err(e) => self.error(&e.to_string()),
            }
        } else {
            println!("{}", formatters::format_report_table(output));
        }
    }

    fn error(&mut self, message: &str) {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }
}

/// Launch the interactive report session.
pub async fn launch_tui(ctx: &AppContext) -> Result<()> {
    println!("{}", "Fundledger - Interactive Reports".bold());
    println!(
        "Pick a report by number or name, {} to list them, {} to exit\n",
        "menu".cyan(),
        "quit".cyan()
    );

    let conn = db::init_database(&ctx.db_path)?;
    let source = SqliteSource::new(&conn);
    let mut renderer = ConsoleRenderer { json: ctx.json };
    renderer.menu();

    let history_path = config::data_dir()?.join(".history");
    let mut rl = readline::Readline::new(COMPLETION_WORDS, history_path)?;

    Session::new(&source, ctx.params.clone()).run(&mut rl, &mut renderer)?;

    println!("Goodbye!");
    Ok(())
}
