//! Grouping aggregator
//!
//! Folds a sequence of ledger rows into one running-total bucket per key.
//! Buckets come out in the order their key was first seen, never sorted.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

use crate::db::{Fund, RawTransaction};
use crate::error::ReportError;

type Extractor<'a> = Box<dyn Fn(&RawTransaction, usize) -> Result<Decimal, ReportError> + 'a>;

/// One running total: how to read a number from a row, and how to fold it in.
pub struct Accumulator<'a> {
    extract: Extractor<'a>,
    combine: fn(Decimal, Decimal) -> Decimal,
}

impl<'a> Accumulator<'a> {
    pub fn new<F>(extract: F, combine: fn(Decimal, Decimal) -> Decimal) -> Self
    where
        F: Fn(&RawTransaction, usize) -> Result<Decimal, ReportError> + 'a,
    {
        Self {
            extract: Box::new(extract),
            combine,
        }
    }

    /// Plain running sum, the accumulator every report uses.
    pub fn sum<F>(extract: F) -> Self
    where
        F: Fn(&RawTransaction, usize) -> Result<Decimal, ReportError> + 'a,
    {
        Self::new(extract, |acc, value| acc + value)
    }
}

/// Totals for one key, in accumulator order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<K> {
    pub key: K,
    pub totals: Vec<Decimal>,
}

/// Aggregate `rows`, numbering them from 1 for error reporting.
pub fn aggregate<K, F>(
    rows: &[RawTransaction],
    key_of: F,
    accumulators: &[Accumulator<'_>],
) -> Result<Vec<Group<K>>, ReportError>
where
    K: Eq + Hash + Clone,
    F: Fn(&RawTransaction, usize) -> Result<K, ReportError>,
{
    aggregate_numbered(
        rows.iter().enumerate().map(|(i, tx)| (i + 1, tx)),
        key_of,
        accumulators,
    )
}

/// Aggregate pre-numbered rows. Used when the caller filters the input
/// first but still wants errors to point at the original row.
pub fn aggregate_numbered<'r, I, K, F>(
    rows: I,
    key_of: F,
    accumulators: &[Accumulator<'_>],
) -> Result<Vec<Group<K>>, ReportError>
where
    I: IntoIterator<Item = (usize, &'r RawTransaction)>,
    K: Eq + Hash + Clone,
    F: Fn(&RawTransaction, usize) -> Result<K, ReportError>,
{
    let mut groups: Vec<Group<K>> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for (row, tx) in rows {
        let key = key_of(tx, row)?;
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    totals: vec![Decimal::ZERO; accumulators.len()],
                });
                groups.len() - 1
            }
        };

        for (acc, total) in accumulators.iter().zip(groups[slot].totals.iter_mut()) {
            let value = (acc.extract)(tx, row)?;
            *total = (acc.combine)(*total, value);
        }
    }

    Ok(groups)
}

/// Identity of an aggregation bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    SalesRep { sales_rep: String },
    InvestorFund { investor: String, fund: Fund },
}

impl GroupKey {
    pub fn by_sales_rep(tx: &RawTransaction, row: usize) -> Result<GroupKey, ReportError> {
        Ok(GroupKey::SalesRep {
            sales_rep: required(tx.sales_rep.as_deref(), row, "SALES_REP")?,
        })
    }

    pub fn by_investor_fund(tx: &RawTransaction, row: usize) -> Result<GroupKey, ReportError> {
        Ok(GroupKey::InvestorFund {
            investor: required(tx.investor.as_deref(), row, "INVESTOR")?,
            fund: fund_of(tx, row)?,
        })
    }

    pub fn sales_rep(&self) -> Option<&str> {
        match self {
            GroupKey::SalesRep { sales_rep } => Some(sales_rep),
            GroupKey::InvestorFund { .. } => None,
        }
    }

    pub fn investor(&self) -> Option<&str> {
        match self {
            GroupKey::InvestorFund { investor, .. } => Some(investor),
            GroupKey::SalesRep { .. } => None,
        }
    }

    pub fn fund(&self) -> Option<Fund> {
        match self {
            GroupKey::InvestorFund { fund, .. } => Some(*fund),
            GroupKey::SalesRep { .. } => None,
        }
    }
}

/// Parse the row's fund, failing on a missing or unknown value.
pub fn fund_of(tx: &RawTransaction, row: usize) -> Result<Fund, ReportError> {
    tx.fund
        .as_deref()
        .and_then(|f| f.parse::<Fund>().ok())
        .ok_or(ReportError::MalformedRecord { row, field: "FUND" })
}

fn required(value: Option<&str>, row: usize, field: &'static str) -> Result<String, ReportError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ReportError::MalformedRecord { row, field }),
    }
}
