// Reports module - report definitions and the aggregation engine

pub mod aggregate;
pub mod flags;
pub mod normalize;
pub mod positions;
pub mod profit;
pub mod sales;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::db::{RawTransaction, RecordSource};
use crate::error::ReportError;
pub use aggregate::GroupKey;
pub use flags::flag_anomalies;
pub use sales::{SalesPeriod, SalesSummary};

/// The fixed report menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    SalesSummary,
    AssetsUnderManagement,
    BreakReport,
    InvestorProfit,
}

/// How a report buckets its rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    SalesRep,
    InvestorFund,
    /// Split by fund (stock first), then by investor within each fund.
    FundThenInvestor,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::SalesSummary,
        ReportKind::AssetsUnderManagement,
        ReportKind::BreakReport,
        ReportKind::InvestorProfit,
    ];

    pub fn id(&self) -> u8 {
        match self {
            ReportKind::SalesSummary => 1,
            ReportKind::AssetsUnderManagement => 2,
            ReportKind::BreakReport => 3,
            ReportKind::InvestorProfit => 4,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReportKind::SalesSummary => "Sales Summary",
            ReportKind::AssetsUnderManagement => "Assets Under Management",
            ReportKind::BreakReport => "Break Report",
            ReportKind::InvestorProfit => "Investor Profit",
        }
    }

    /// Short name accepted on the command line and at the prompt
    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::SalesSummary => "sales",
            ReportKind::AssetsUnderManagement => "aum",
            ReportKind::BreakReport => "breaks",
            ReportKind::InvestorProfit => "profit",
        }
    }

    pub fn grouping(&self) -> Grouping {
        match self {
            ReportKind::SalesSummary | ReportKind::AssetsUnderManagement => Grouping::SalesRep,
            ReportKind::BreakReport => Grouping::InvestorFund,
            ReportKind::InvestorProfit => Grouping::FundThenInvestor,
        }
    }

    pub fn flags_anomalies(&self) -> bool {
        matches!(self, ReportKind::BreakReport)
    }

    /// Output column order
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            ReportKind::SalesSummary => &["Sales Rep", "MTD", "QTD", "YTD", "ITD"],
            ReportKind::AssetsUnderManagement => &["Sales Rep", "Assets Under Management"],
            ReportKind::BreakReport => &["Investor", "Fund", "Net Shares", "Net Value", "Error"],
            ReportKind::InvestorProfit => &["Investor", "Fund", "Profit/Loss"],
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    /// Accepts the menu id, the slug or the full name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if let Ok(id) = wanted.parse::<u8>() {
            return Self::from_id(id).ok_or_else(|| format!("No report with id {}", id));
        }
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.slug().eq_ignore_ascii_case(wanted) || kind.name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| format!("Unknown report '{}'", wanted))
    }
}

/// `(id, name)` pairs in menu order.
pub fn menu() -> Vec<(u8, &'static str)> {
    ReportKind::ALL
        .iter()
        .map(|kind| (kind.id(), kind.name()))
        .collect()
}

/// Parameters handed to the record source with every query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    /// "Now" for period windows
    pub as_of: NaiveDate,
}

/// Net balances of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    #[serde(flatten)]
    pub key: GroupKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_shares: Option<Decimal>,
    pub net_value: Decimal,
    pub error_message: String,
}

/// Finished rows of one report run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "report", content = "rows", rename_all = "snake_case")]
pub enum ReportOutput {
    SalesSummary(Vec<SalesSummary>),
    AssetsUnderManagement(Vec<GroupSummary>),
    BreakReport(Vec<GroupSummary>),
    InvestorProfit(Vec<GroupSummary>),
}

impl ReportOutput {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportOutput::SalesSummary(_) => ReportKind::SalesSummary,
            ReportOutput::AssetsUnderManagement(_) => ReportKind::AssetsUnderManagement,
            ReportOutput::BreakReport(_) => ReportKind::BreakReport,
            ReportOutput::InvestorProfit(_) => ReportKind::InvestorProfit,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ReportOutput::SalesSummary(rows) => rows.len(),
            ReportOutput::AssetsUnderManagement(rows)
            | ReportOutput::BreakReport(rows)
            | ReportOutput::InvestorProfit(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every group summary through the anomaly flagger.
    pub fn flagged(self) -> Self {
        fn flag_all(rows: Vec<GroupSummary>) -> Vec<GroupSummary> {
            rows.iter().map(flag_anomalies).collect()
        }

        match self {
            ReportOutput::SalesSummary(rows) => ReportOutput::SalesSummary(rows),
            ReportOutput::AssetsUnderManagement(rows) => {
                ReportOutput::AssetsUnderManagement(flag_all(rows))
            }
            ReportOutput::BreakReport(rows) => ReportOutput::BreakReport(flag_all(rows)),
            ReportOutput::InvestorProfit(rows) => ReportOutput::InvestorProfit(flag_all(rows)),
        }
    }
}

/// Turn raw rows into the finished report. Pure: no I/O, no shared state.
pub fn build_report(
    kind: ReportKind,
    rows: &[RawTransaction],
    params: &QueryParams,
) -> Result<ReportOutput, ReportError> {
    let output = match kind {
        ReportKind::SalesSummary => {
            ReportOutput::SalesSummary(sales::sales_summary(rows, params.as_of)?)
        }
        ReportKind::AssetsUnderManagement => {
            ReportOutput::AssetsUnderManagement(positions::assets_under_management(rows)?)
        }
        ReportKind::BreakReport => ReportOutput::BreakReport(positions::break_report(rows)?),
        ReportKind::InvestorProfit => ReportOutput::InvestorProfit(profit::investor_profit(rows)?),
    };
    let output = if kind.flags_anomalies() {
        output.flagged()
    } else {
        output
    };
    debug!(report = kind.id(), input = rows.len(), groups = output.len(), "report built");
    Ok(output)
}

/// Query the source for `kind` and build the report from its rows.
pub fn run_report<S: RecordSource + ?Sized>(
    source: &S,
    kind: ReportKind,
    params: &QueryParams,
) -> Result<ReportOutput, ReportError> {
    let rows = source.execute(kind, params)?;
    build_report(kind, &rows, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct FixedSource(Vec<RawTransaction>);

    impl RecordSource for FixedSource {
        fn execute(
            &self,
            _report: ReportKind,
            _params: &QueryParams,
        ) -> Result<Vec<RawTransaction>, ReportError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl RecordSource for FailingSource {
        fn execute(
            &self,
            _report: ReportKind,
            _params: &QueryParams,
        ) -> Result<Vec<RawTransaction>, ReportError> {
            Err(ReportError::Query("connection refused".to_string()))
        }
    }

    fn params() -> QueryParams {
        QueryParams {
            as_of: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
        }
    }

    fn raw(investor: &str, fund: &str, kind: &str, price: Decimal) -> RawTransaction {
        RawTransaction {
            sales_rep: Some("Ann".to_string()),
            investor: Some(investor.to_string()),
            fund: Some(fund.to_string()),
            txn_type: Some(kind.to_string()),
            txn_shares: dec!(1),
            txn_price: price,
            txn_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    #[test]
    fn menu_lists_four_reports_in_order() {
        assert_eq!(
            menu(),
            vec![
                (1, "Sales Summary"),
                (2, "Assets Under Management"),
                (3, "Break Report"),
                (4, "Investor Profit"),
            ]
        );
    }

    #[test]
    fn report_kind_parses_ids_slugs_and_names() {
        assert_eq!("3".parse::<ReportKind>(), Ok(ReportKind::BreakReport));
        assert_eq!("AUM".parse::<ReportKind>(), Ok(ReportKind::AssetsUnderManagement));
        assert_eq!(
            "investor profit".parse::<ReportKind>(),
            Ok(ReportKind::InvestorProfit)
        );
        assert!("5".parse::<ReportKind>().is_err());
        assert!("ledger".parse::<ReportKind>().is_err());
    }

    #[test]
    fn only_break_report_flags() {
        let rows = vec![raw("X", "STOCK_FUND", "SELL", dec!(5))];
        for kind in ReportKind::ALL {
            let output = build_report(kind, &rows, &params()).unwrap();
            let flagged = match &output {
                ReportOutput::SalesSummary(_) => false,
                ReportOutput::AssetsUnderManagement(rows)
                | ReportOutput::BreakReport(rows)
                | ReportOutput::InvestorProfit(rows) => {
                    rows.iter().any(|r| !r.error_message.is_empty())
                }
            };
            assert_eq!(flagged, kind.flags_anomalies(), "{}", kind);
        }
    }

    #[test]
    fn run_report_dispatches_by_kind() {
        let source = FixedSource(vec![raw("X", "STOCK_FUND", "SELL", dec!(5))]);
        let output = run_report(&source, ReportKind::BreakReport, &params()).unwrap();
        assert_eq!(output.kind(), ReportKind::BreakReport);
        match output {
            ReportOutput::BreakReport(rows) => {
                assert_eq!(rows[0].net_value, dec!(-5));
                assert!(rows[0].error_message.contains("Negative cash balance"));
            }
            other => panic!("unexpected output: {:?}", other),
        }
    }

    #[test]
    fn query_errors_surface_unchanged() {
        let err = run_report(&FailingSource, ReportKind::SalesSummary, &params()).unwrap_err();
        assert!(matches!(err, ReportError::Query(_)));
    }

    #[test]
    fn empty_source_gives_empty_report() {
        for kind in ReportKind::ALL {
            let output = run_report(&FixedSource(Vec::new()), kind, &params()).unwrap();
            assert!(output.is_empty(), "{} should be empty", kind);
        }
    }

    #[test]
    fn json_shape_is_flat() {
        let output = build_report(
            ReportKind::InvestorProfit,
            &[raw("X", "BOND_FUND", "BUY", dec!(12.5))],
            &params(),
        )
        .unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["report"], "investor_profit");
        assert_eq!(json["rows"][0]["investor"], "X");
        assert_eq!(json["rows"][0]["fund"], "BOND_FUND");
        assert_eq!(json["rows"][0]["net_value"], "12.5");
        assert!(json["rows"][0].get("net_shares").is_none());
    }
}
