use anyhow::{anyhow, Result};

use crate::cli::Commands;
use crate::commands::Command;
use fundledger::reports::ReportKind;

/// Convert clap `Commands` into the internal `commands::Command`.
/// Report names are validated here so the engine only ever sees ids 1-4.
pub fn to_internal_command(c: &Commands) -> Result<Command> {
    match c {
        Commands::Init => Ok(Command::Init),
        Commands::Import { file, dry_run } => Ok(Command::Import {
            path: file.clone(),
            dry_run: *dry_run,
        }),
        Commands::Report { report } => {
            let kind = report.parse::<ReportKind>().map_err(|e| anyhow!(e))?;
            Ok(Command::Report(kind))
        }
        Commands::Menu => Ok(Command::Menu),
        Commands::Interactive => Ok(Command::Interactive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_report_by_slug_and_id() {
        let by_slug = to_internal_command(&Commands::Report {
            report: "profit".to_string(),
        })
        .expect("conversion failed");
        assert_eq!(by_slug, Command::Report(ReportKind::InvestorProfit));

        let by_id = to_internal_command(&Commands::Report {
            report: "2".to_string(),
        })
        .expect("conversion failed");
        assert_eq!(by_id, Command::Report(ReportKind::AssetsUnderManagement));
    }

    #[test]
    fn out_of_range_report_is_rejected() {
        let err = to_internal_command(&Commands::Report {
            report: "9".to_string(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("No report with id 9"));
    }

    #[test]
    fn import_keeps_flags() {
        let converted = to_internal_command(&Commands::Import {
            file: "ledger.csv".to_string(),
            dry_run: true,
        })
        .unwrap();
        assert_eq!(
            converted,
            Command::Import {
                path: "ledger.csv".to_string(),
                dry_run: true
            }
        );
    }
}
