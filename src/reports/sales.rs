//! Sales Summary: gross sale proceeds per sales rep over four date windows.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use super::aggregate::{aggregate, Accumulator, GroupKey};
use super::normalize::transaction_type;
use crate::db::{RawTransaction, TransactionType};
use crate::error::ReportError;

/// Reporting windows of the Sales Summary, all ending at "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesPeriod {
    MonthToDate,
    QuarterToDate,
    YearToDate,
    InceptionToDate,
}

impl SalesPeriod {
    pub const ALL: [SalesPeriod; 4] = [
        SalesPeriod::MonthToDate,
        SalesPeriod::QuarterToDate,
        SalesPeriod::YearToDate,
        SalesPeriod::InceptionToDate,
    ];

    /// A date belongs to the window when it shares now's calendar period and
    /// is not after now. Dated exactly `now` counts.
    pub fn contains(&self, date: NaiveDate, now: NaiveDate) -> bool {
        if date > now {
            return false;
        }
        match self {
            SalesPeriod::MonthToDate => date.year() == now.year() && date.month() == now.month(),
            SalesPeriod::QuarterToDate => {
                date.year() == now.year() && date.month0() / 3 == now.month0() / 3
            }
            SalesPeriod::YearToDate => date.year() == now.year(),
            SalesPeriod::InceptionToDate => true,
        }
    }
}

/// Per-representative sales totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesSummary {
    #[serde(flatten)]
    pub key: GroupKey,
    pub month_to_date: Decimal,
    pub quarter_to_date: Decimal,
    pub year_to_date: Decimal,
    pub inception_to_date: Decimal,
}

/// Sum the gross value (`shares * price`) of SELL rows per sales rep for
/// each window. BUY rows contribute nothing but must still carry a valid type.
pub fn sales_summary(
    rows: &[RawTransaction],
    now: NaiveDate,
) -> Result<Vec<SalesSummary>, ReportError> {
    let accumulators: Vec<Accumulator<'_>> = SalesPeriod::ALL
        .iter()
        .map(|&period| {
            Accumulator::sum(move |tx: &RawTransaction, row: usize| {
                let sold = transaction_type(tx, row)? == TransactionType::Sell;
                if sold && period.contains(tx.txn_date, now) {
                    Ok(tx.txn_shares * tx.txn_price)
                } else {
                    Ok(Decimal::ZERO)
                }
            })
        })
        .collect();

    let groups = aggregate(rows, GroupKey::by_sales_rep, &accumulators)?;

    Ok(groups
        .into_iter()
        .map(|group| SalesSummary {
            month_to_date: group.totals[0],
            quarter_to_date: group.totals[1],
            year_to_date: group.totals[2],
            inception_to_date: group.totals[3],
            key: group.key,
        })
        .collect())
}
