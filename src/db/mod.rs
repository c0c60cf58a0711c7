// Database module - SQLite ledger store and record source

pub mod models;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::ReportError;
use crate::reports::{Grouping, QueryParams, ReportKind};
pub use models::{Fund, RawTransaction, Transaction, TransactionType};

/// Executes the aggregation query behind a report and returns its raw rows.
///
/// Implementations own the connection; the engine only sees rows.
pub trait RecordSource {
    fn execute(
        &self,
        report: ReportKind,
        params: &QueryParams,
    ) -> std::result::Result<Vec<RawTransaction>, ReportError>;
}

/// Open database connection
pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("Failed to open database at {:?}", path))?;
    Ok(conn)
}

/// Create the ledger schema. Safe to run on an existing database.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(include_str!("schema.sql"))
        .context("Failed to execute schema")?;
    Ok(())
}

/// Open the database at `path` and make sure the schema exists.
pub fn init_database(path: &Path) -> Result<Connection> {
    info!("Initializing database at: {:?}", path);
    let conn = open_db(path)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Insert transaction
pub fn insert_transaction(conn: &Connection, tx: &Transaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions (
            sales_rep, investor, fund, txn_type, txn_shares, txn_price, txn_date
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            tx.sales_rep,
            tx.investor,
            tx.fund.as_str(),
            tx.txn_type.as_str(),
            tx.txn_shares.to_string(),
            tx.txn_price.to_string(),
            tx.txn_date,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Insert a batch of transactions atomically, returning how many were written.
pub fn insert_transactions(conn: &mut Connection, txs: &[Transaction]) -> Result<usize> {
    let db_tx = conn.transaction()?;
    for tx in txs {
        insert_transaction(&db_tx, tx)?;
    }
    db_tx.commit().context("Failed to commit ledger import")?;
    Ok(txs.len())
}

pub fn count_transactions(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
    Ok(count)
}

/// Record source backed by the SQLite ledger.
pub struct SqliteSource<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSource<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl RecordSource for SqliteSource<'_> {
    fn execute(
        &self,
        report: ReportKind,
        params: &QueryParams,
    ) -> std::result::Result<Vec<RawTransaction>, ReportError> {
        let sql = report_query(report);
        debug!(report = report.id(), as_of = %params.as_of, "executing report query");

        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RawTransaction {
                    sales_rep: row.get(0)?,
                    investor: row.get(1)?,
                    fund: row.get(2)?,
                    txn_type: row.get(3)?,
                    txn_shares: get_decimal_value(row, 4)?,
                    txn_price: get_decimal_value(row, 5)?,
                    txn_date: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        info!(report = report.id(), rows = rows.len(), "report query returned");
        Ok(rows)
    }
}

/// Query shape per report. Every report sees every row so type and key
/// errors surface instead of being filtered out; ordering only makes output
/// readable, the aggregator keeps first-seen order of whatever it receives.
fn report_query(report: ReportKind) -> &'static str {
    match report.grouping() {
        Grouping::SalesRep => {
            "SELECT sales_rep, investor, fund, txn_type, txn_shares, txn_price, txn_date
             FROM transactions
             ORDER BY sales_rep, id"
        }
        Grouping::InvestorFund | Grouping::FundThenInvestor => {
            "SELECT sales_rep, investor, fund, txn_type, txn_shares, txn_price, txn_date
             FROM transactions
             ORDER BY investor, fund, id"
        }
    }
}

/// Helper to read Decimal from SQLite (handles TEXT, INTEGER and REAL storage)
fn get_decimal_value(row: &rusqlite::Row, idx: usize) -> Result<Decimal, rusqlite::Error> {
    if let Ok(s) = row.get::<_, String>(idx) {
        return Decimal::from_str(s.trim()).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        });
    }

    if let Ok(i) = row.get::<_, i64>(idx) {
        return Ok(Decimal::from(i));
    }

    if let Ok(f) = row.get::<_, f64>(idx) {
        return Decimal::try_from(f).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Real, Box::new(e))
        });
    }

    Err(rusqlite::Error::InvalidColumnType(
        idx,
        "decimal".to_string(),
        rusqlite::types::Type::Null,
    ))
}
