use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Funds offered through the ledger
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Fund {
    #[serde(rename = "STOCK_FUND")]
    StockFund,
    #[serde(rename = "BOND_FUND")]
    BondFund,
}

impl Fund {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fund::StockFund => "STOCK_FUND",
            Fund::BondFund => "BOND_FUND",
        }
    }
}

impl fmt::Display for Fund {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Fund {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STOCK_FUND" | "STOCK" => Ok(Fund::StockFund),
            "BOND_FUND" | "BOND" => Ok(Fund::BondFund),
            _ => Err(()),
        }
    }
}

/// Transaction type (buy or sell)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionType {
    Buy,
    Sell,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
        }
    }
}

impl FromStr for TransactionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(TransactionType::Buy),
            "SELL" => Ok(TransactionType::Sell),
            _ => Err(()),
        }
    }
}

/// One ledger row exactly as the record source returned it.
///
/// Text columns stay unparsed: the engine decides what a missing or unknown
/// value means for the report being built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawTransaction {
    pub sales_rep: Option<String>,
    pub investor: Option<String>,
    pub fund: Option<String>,
    pub txn_type: Option<String>,
    pub txn_shares: Decimal,
    pub txn_price: Decimal,
    pub txn_date: NaiveDate,
}

/// A validated ledger entry ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: Option<i64>,
    pub sales_rep: String,
    pub investor: String,
    pub fund: Fund,
    pub txn_type: TransactionType,
    pub txn_shares: Decimal,
    pub txn_price: Decimal,
    pub txn_date: NaiveDate,
}
