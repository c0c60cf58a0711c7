// Import module - ledger CSV parser

pub mod ledger_csv;

pub use ledger_csv::{parse_ledger_csv, parse_ledger_reader, ImportIssue, ParsedLedger};
