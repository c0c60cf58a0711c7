//! Command parsing and routing layer
//!
//! `Command` is what the dispatcher runs, whether it came from clap or from
//! the interactive prompt. `parse_selection` handles prompt input, which is
//! limited to picking a report, showing the menu, or quitting.

use fundledger::reports::ReportKind;

/// Parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the ledger database: `init`
    Init,
    /// Import a ledger CSV: `import <path> [--dry-run]`
    Import { path: String, dry_run: bool },
    /// Run a single report: `report <id|name>`
    Report(ReportKind),
    /// Print the report menu
    Menu,
    /// Start the interactive session
    Interactive,
}

/// What the operator typed at the report prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Report(ReportKind),
    Menu,
    Quit,
    /// Blank line or Ctrl-C
    Nothing,
}

/// Error type for prompt parsing
#[derive(Debug, Clone)]
pub struct CommandParseError {
    pub message: String,
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandParseError {}

/// Parse one line of prompt input.
///
/// Accepts a menu id (`1`-`4`), a report slug or name, optionally prefixed
/// with `report` and/or a leading slash, plus `menu`/`help`/`list` and
/// `quit`/`exit`/`q`.
pub fn parse_selection(input: &str) -> Result<Selection, CommandParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Selection::Nothing);
    }

    let input = input.strip_prefix('/').unwrap_or(input);
    let lowered = input.to_lowercase();

    match lowered.as_str() {
        "quit" | "exit" | "q" => return Ok(Selection::Quit),
        "menu" | "help" | "list" | "?" => return Ok(Selection::Menu),
        _ => {}
    }

    let report = lowered
        .strip_prefix("report ")
        .map(str::trim)
        .unwrap_or(lowered.as_str());

    report
        .parse::<ReportKind>()
        .map(Selection::Report)
        .map_err(|message| CommandParseError {
            message: format!("{}. Type `menu` to list reports.", message),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_menu_ids() {
        assert_eq!(
            parse_selection("1").unwrap(),
            Selection::Report(ReportKind::SalesSummary)
        );
        assert_eq!(
            parse_selection(" 4 ").unwrap(),
            Selection::Report(ReportKind::InvestorProfit)
        );
    }

    #[test]
    fn parses_names_and_prefixes() {
        assert_eq!(
            parse_selection("/report Breaks").unwrap(),
            Selection::Report(ReportKind::BreakReport)
        );
        assert_eq!(
            parse_selection("assets under management").unwrap(),
            Selection::Report(ReportKind::AssetsUnderManagement)
        );
    }

    #[test]
    fn parses_control_words() {
        assert_eq!(parse_selection("Q").unwrap(), Selection::Quit);
        assert_eq!(parse_selection("/exit").unwrap(), Selection::Quit);
        assert_eq!(parse_selection("help").unwrap(), Selection::Menu);
        assert_eq!(parse_selection("   ").unwrap(), Selection::Nothing);
    }

    #[test]
    fn rejects_ids_outside_menu() {
        let err = parse_selection("5").unwrap_err();
        assert!(err.message.contains("No report with id 5"));
        assert!(parse_selection("0").is_err());
        assert!(parse_selection("ledger dump").is_err());
    }
}
