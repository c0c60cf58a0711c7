use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::db::{Fund, Transaction, TransactionType};

/// One CSV line, using the ledger's column names as headers.
#[derive(Debug, Deserialize)]
struct LedgerRow {
    #[serde(rename = "SALES_REP")]
    sales_rep: String,
    #[serde(rename = "INVESTOR")]
    investor: String,
    #[serde(rename = "FUND")]
    fund: String,
    #[serde(rename = "TXN_TYPE")]
    txn_type: String,
    #[serde(rename = "TXN_SHARES")]
    txn_shares: String,
    #[serde(rename = "TXN_PRICE")]
    txn_price: String,
    #[serde(rename = "TXN_DATE")]
    txn_date: String,
}

/// A line that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportIssue {
    /// Line number in the file (header is line 1)
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ParsedLedger {
    pub transactions: Vec<Transaction>,
    pub issues: Vec<ImportIssue>,
}

/// Parse a ledger CSV file. Bad lines are collected as issues, not fatal.
pub fn parse_ledger_csv<P: AsRef<Path>>(file_path: P) -> Result<ParsedLedger> {
    let path = file_path.as_ref();
    info!("Parsing ledger CSV file: {:?}", path);
    let file = std::fs::File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    parse_ledger_reader(file)
}

pub fn parse_ledger_reader<R: Read>(input: R) -> Result<ParsedLedger> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(input);
    let mut parsed = ParsedLedger::default();

    for (idx, result) in reader.deserialize::<LedgerRow>().enumerate() {
        let line = idx + 2;
        let outcome = result
            .map_err(|e| e.to_string())
            .and_then(validate_row);

        match outcome {
            Ok(tx) => parsed.transactions.push(tx),
            Err(message) => {
                warn!("Skipping line {}: {}", line, message);
                parsed.issues.push(ImportIssue { line, message });
            }
        }
    }

    info!(
        "Parsed {} transactions ({} rejected)",
        parsed.transactions.len(),
        parsed.issues.len()
    );
    Ok(parsed)
}

fn validate_row(row: LedgerRow) -> Result<Transaction, String> {
    if row.sales_rep.is_empty() {
        return Err("SALES_REP is empty".to_string());
    }
    if row.investor.is_empty() {
        return Err("INVESTOR is empty".to_string());
    }
    let fund = Fund::from_str(&row.fund).map_err(|_| format!("unknown FUND '{}'", row.fund))?;
    let txn_type = TransactionType::from_str(&row.txn_type)
        .map_err(|_| format!("unknown TXN_TYPE '{}'", row.txn_type))?;
    let txn_shares = non_negative("TXN_SHARES", &row.txn_shares)?;
    let txn_price = non_negative("TXN_PRICE", &row.txn_price)?;
    let txn_date = NaiveDate::parse_from_str(&row.txn_date, "%Y-%m-%d")
        .map_err(|_| format!("invalid TXN_DATE '{}' (expected YYYY-MM-DD)", row.txn_date))?;

    Ok(Transaction {
        id: None,
        sales_rep: row.sales_rep,
        investor: row.investor,
        fund,
        txn_type,
        txn_shares,
        txn_price,
        txn_date,
    })
}

fn non_negative(field: &str, raw: &str) -> Result<Decimal, String> {
    let value = Decimal::from_str(raw).map_err(|_| format!("invalid {} '{}'", field, raw))?;
    if value < Decimal::ZERO {
        return Err(format!("{} must not be negative", field));
    }
    Ok(value)
}
