//! Position reports: assets under management per rep and the break report.

use rust_decimal::Decimal;

use super::aggregate::{aggregate, Accumulator, GroupKey};
use super::normalize::{signed_shares, signed_value};
use super::GroupSummary;
use crate::db::RawTransaction;
use crate::error::ReportError;

/// Net signed value per sales rep. Investor and fund are folded away.
pub fn assets_under_management(
    rows: &[RawTransaction],
) -> Result<Vec<GroupSummary>, ReportError> {
    let groups = aggregate(
        rows,
        GroupKey::by_sales_rep,
        &[Accumulator::sum(signed_value)],
    )?;

    Ok(groups
        .into_iter()
        .map(|group| GroupSummary {
            net_value: group.totals[0],
            net_shares: None,
            error_message: String::new(),
            key: group.key,
        })
        .collect())
}

/// Net value and shares per (investor, fund). A correct history never
/// produces a negative position; `build_report` flags the ones that do.
pub fn break_report(rows: &[RawTransaction]) -> Result<Vec<GroupSummary>, ReportError> {
    let groups = aggregate(
        rows,
        GroupKey::by_investor_fund,
        &[
            Accumulator::sum(signed_value),
            Accumulator::sum(signed_shares),
        ],
    )?;

    Ok(groups
        .into_iter()
        .map(|group| GroupSummary {
            net_value: group.totals[0],
            net_shares: Some(group.totals[1]),
            error_message: String::new(),
            key: group.key,
        })
        .collect())
}

/// Groups carrying at least one anomaly flag.
pub fn breaks_only(summaries: &[GroupSummary]) -> impl Iterator<Item = &GroupSummary> {
    summaries.iter().filter(|s| !s.error_message.is_empty())
}

/// Total of every group's net value.
pub fn total_net_value(summaries: &[GroupSummary]) -> Decimal {
    summaries.iter().map(|s| s.net_value).sum()
}
