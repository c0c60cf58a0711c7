//! Anomaly flags for netted balances.

use rust_decimal::Decimal;

use super::GroupSummary;

pub const NEGATIVE_CASH: &str = "Negative cash balance ";
pub const NEGATIVE_SHARES: &str = "Negative share balance ";

/// Return a copy of `summary` whose `error_message` describes every
/// negative balance it holds. Balances at or above zero leave it empty.
pub fn flag_anomalies(summary: &GroupSummary) -> GroupSummary {
    let mut message = String::new();
    if summary.net_value < Decimal::ZERO {
        message.push_str(NEGATIVE_CASH);
    }
    if summary.net_shares.is_some_and(|shares| shares < Decimal::ZERO) {
        message.push_str(NEGATIVE_SHARES);
    }

    GroupSummary {
        error_message: message,
        ..summary.clone()
    }
}
