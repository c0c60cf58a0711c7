//! Investor profit, stock-fund positions first, then bond-fund positions.

use super::aggregate::{aggregate_numbered, fund_of, Accumulator, GroupKey};
use super::normalize::signed_value;
use super::GroupSummary;
use crate::db::{Fund, RawTransaction};
use crate::error::ReportError;

/// Partition order of the Investor Profit report.
pub const FUND_PARTITIONS: [Fund; 2] = [Fund::StockFund, Fund::BondFund];

/// Profit/loss per investor, stock-fund investors first, then bond-fund
/// investors, each partition in first-seen order.
pub fn investor_profit(rows: &[RawTransaction]) -> Result<Vec<GroupSummary>, ReportError> {
    let funds = rows
        .iter()
        .enumerate()
        .map(|(i, tx)| fund_of(tx, i + 1))
        .collect::<Result<Vec<_>, _>>()?;

    let mut output = Vec::new();
    for partition in FUND_PARTITIONS {
        let members = rows
            .iter()
            .zip(&funds)
            .enumerate()
            .filter(|(_, (_, fund))| **fund == partition)
            .map(|(i, (tx, _))| (i + 1, tx));

        let groups = aggregate_numbered(
            members,
            GroupKey::by_investor_fund,
            &[Accumulator::sum(signed_value)],
        )?;

        output.extend(groups.into_iter().map(|group| GroupSummary {
            net_value: group.totals[0],
            net_shares: None,
            error_message: String::new(),
            key: group.key,
        }));
    }

    Ok(output)
}
