//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of report calculation from presentation.

use anyhow::{Context, Result};
use colored::Colorize;
use fundledger::reports::{self, GroupSummary, ReportKind, ReportOutput};
use fundledger::utils::{format_currency, format_shares};
use rust_decimal::Decimal;
use std::ops::Range;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Style},
};

/// Format a report as pretty JSON
pub fn format_report_json(output: &ReportOutput) -> Result<String> {
    serde_json::to_string_pretty(output).context("JSON serialization failed")
}

/// Format a report for terminal table output
pub fn format_report_table(output: &ReportOutput) -> String {
    let kind = output.kind();
    let mut text = format!("\n{} {}\n\n", "📊".cyan().bold(), kind.name().bold());

    if output.is_empty() {
        text.push_str(&format_empty_report(kind));
        return text;
    }

    text.push_str(&report_table(kind, table_records(output)));

    match output {
        ReportOutput::AssetsUnderManagement(rows) => {
            text.push_str(&format!(
                "\n{:<20} {}\n",
                "Total:".bold(),
                colored_currency(reports::positions::total_net_value(rows))
            ));
        }
        ReportOutput::BreakReport(rows) => {
            let breaks = reports::positions::breaks_only(rows).count();
            if breaks > 0 {
                text.push_str(&format!(
                    "\n{} {} position(s) with a negative balance\n",
                    "⚠".yellow().bold(),
                    breaks
                ));
            } else {
                text.push_str(&format!("\n{} No breaks found\n", "✓".green().bold()));
            }
        }
        ReportOutput::SalesSummary(_) | ReportOutput::InvestorProfit(_) => {}
    }

    text
}

/// Cell text for every row, in the order of `ReportKind::columns`.
fn table_records(output: &ReportOutput) -> Vec<Vec<String>> {
    match output {
        ReportOutput::SalesSummary(rows) => rows
            .iter()
            .map(|s| {
                vec![
                    s.key.sales_rep().unwrap_or_default().to_string(),
                    format_currency(s.month_to_date),
                    format_currency(s.quarter_to_date),
                    format_currency(s.year_to_date),
                    format_currency(s.inception_to_date),
                ]
            })
            .collect(),
        ReportOutput::AssetsUnderManagement(rows) => rows
            .iter()
            .map(|s| {
                vec![
                    s.key.sales_rep().unwrap_or_default().to_string(),
                    colored_currency(s.net_value),
                ]
            })
            .collect(),
        ReportOutput::BreakReport(rows) => rows
            .iter()
            .map(|s| {
                vec![
                    s.key.investor().unwrap_or_default().to_string(),
                    fund_label(s),
                    s.net_shares.map(format_shares).unwrap_or_default(),
                    colored_currency(s.net_value),
                    s.error_message.trim_end().yellow().to_string(),
                ]
            })
            .collect(),
        ReportOutput::InvestorProfit(rows) => rows
            .iter()
            .map(|s| {
                vec![
                    s.key.investor().unwrap_or_default().to_string(),
                    fund_label(s),
                    colored_currency(s.net_value),
                ]
            })
            .collect(),
    }
}

/// Columns holding amounts, right-aligned.
fn numeric_columns(kind: ReportKind) -> Range<usize> {
    let width = kind.columns().len();
    match kind {
        ReportKind::SalesSummary | ReportKind::AssetsUnderManagement => 1..width,
        ReportKind::BreakReport => 2..width - 1,
        ReportKind::InvestorProfit => 2..width,
    }
}

/// Modern-style table headed by the report's own column list.
fn report_table(kind: ReportKind, records: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(kind.columns().iter().copied());
    for record in records {
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table.modify(Columns::new(numeric_columns(kind)), Alignment::right());
    table.to_string()
}

fn fund_label(summary: &GroupSummary) -> String {
    summary
        .key
        .fund()
        .map(|f| f.as_str().to_string())
        .unwrap_or_default()
}

fn colored_currency(value: Decimal) -> String {
    let text = format_currency(value);
    if value < Decimal::ZERO {
        text.red().to_string()
    } else {
        text
    }
}

/// Format empty report message
pub fn format_empty_report(kind: ReportKind) -> String {
    format!(
        "{} No transactions found for {}\nImport a ledger first using: {} import <file.csv>\n",
        "ℹ".blue().bold(),
        kind.name(),
        "fundledger".bold()
    )
}

/// The numbered report menu
pub fn format_menu() -> String {
    let mut text = format!("{}\n", "Reports".bold());
    for (id, name) in reports::menu() {
        text.push_str(&format!("  {}  {}\n", id.to_string().cyan(), name));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use fundledger::db::Fund;
    use fundledger::reports::GroupKey;
    use rust_decimal_macros::dec;

    fn no_color() {
        colored::control::set_override(false);
    }

    fn position(investor: &str, value: Decimal, shares: Decimal, error: &str) -> GroupSummary {
        GroupSummary {
            key: GroupKey::InvestorFund {
                investor: investor.to_string(),
                fund: Fund::BondFund,
            },
            net_shares: Some(shares),
            net_value: value,
            error_message: error.to_string(),
        }
    }

    #[test]
    fn test_empty_report_message() {
        no_color();
        let text = format_report_table(&ReportOutput::SalesSummary(Vec::new()));
        assert!(text.contains("No transactions found for Sales Summary"));
        assert!(text.contains("import"));
    }

    #[test]
    fn test_break_table_shows_flags_and_rounded_values() {
        no_color();
        let output = ReportOutput::BreakReport(vec![
            position("Xu", dec!(-5.004), dec!(-1), "Negative cash balance Negative share balance "),
            position("Yi", dec!(10), dec!(10), ""),
        ]);
        let text = format_report_table(&output);
        assert!(text.contains("Investor"));
        assert!(text.contains("BOND_FUND"));
        assert!(text.contains("-$5.00"));
        assert!(text.contains("Negative share balance"));
        assert!(text.contains("1 position(s) with a negative balance"));
    }

    #[test]
    fn test_assets_table_has_total() {
        no_color();
        let output = ReportOutput::AssetsUnderManagement(vec![GroupSummary {
            key: GroupKey::SalesRep {
                sales_rep: "Ann".to_string(),
            },
            net_shares: None,
            net_value: dec!(1234.5),
            error_message: String::new(),
        }]);
        let text = format_report_table(&output);
        assert!(text.contains("Assets Under Management"));
        assert!(text.contains("$1,234.50"));
        assert!(text.contains("Total:"));
    }

    #[test]
    fn test_table_header_follows_report_columns() {
        no_color();
        let output = ReportOutput::InvestorProfit(vec![position("Xu", dec!(3), dec!(1), "")]);
        let text = format_report_table(&output);
        let header = text
            .lines()
            .find(|line| line.contains("Profit/Loss"))
            .expect("header line");

        let mut last = 0;
        for column in ReportKind::InvestorProfit.columns() {
            let at = header.find(column).expect("column in header");
            assert!(at >= last, "{} out of order", column);
            last = at;
        }
    }

    #[test]
    fn test_json_keeps_full_precision() {
        let output = ReportOutput::BreakReport(vec![position("Xu", dec!(1.005), dec!(2), "")]);
        let json = format_report_json(&output).unwrap();
        assert!(json.contains("\"break_report\""));
        assert!(json.contains("\"1.005\""));
    }

    #[test]
    fn test_menu_lists_reports() {
        no_color();
        let menu = format_menu();
        assert!(menu.contains("1  Sales Summary"));
        assert!(menu.contains("4  Investor Profit"));
    }
}
