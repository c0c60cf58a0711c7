//! Signed-value normalization
//!
//! BUY contributes positively, SELL negatively. Every report goes through
//! these helpers so a row with an unknown type aborts the report instead of
//! being summed with the wrong sign.

use rust_decimal::Decimal;

use crate::db::{RawTransaction, TransactionType};
use crate::error::ReportError;

/// Parse the row's transaction type. `row` is the 1-based input position.
pub fn transaction_type(tx: &RawTransaction, row: usize) -> Result<TransactionType, ReportError> {
    let raw = tx.txn_type.as_deref().unwrap_or("");
    raw.parse::<TransactionType>()
        .map_err(|_| ReportError::InvalidTransactionType {
            row,
            value: raw.to_string(),
        })
}

/// `shares * price`, negated for SELL.
pub fn signed_value(tx: &RawTransaction, row: usize) -> Result<Decimal, ReportError> {
    let gross = tx.txn_shares * tx.txn_price;
    Ok(apply_sign(transaction_type(tx, row)?, gross))
}

/// Share count, negated for SELL.
pub fn signed_shares(tx: &RawTransaction, row: usize) -> Result<Decimal, ReportError> {
    Ok(apply_sign(transaction_type(tx, row)?, tx.txn_shares))
}

fn apply_sign(kind: TransactionType, amount: Decimal) -> Decimal {
    match kind {
        TransactionType::Buy => amount,
        TransactionType::Sell => -amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn raw(kind: Option<&str>, shares: Decimal, price: Decimal) -> RawTransaction {
        RawTransaction {
            sales_rep: Some("Ann".to_string()),
            investor: Some("Xu".to_string()),
            fund: Some("STOCK_FUND".to_string()),
            txn_type: kind.map(str::to_string),
            txn_shares: shares,
            txn_price: price,
            txn_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        }
    }

    #[test]
    fn buy_is_positive() {
        let tx = raw(Some("BUY"), dec!(10), dec!(12.345));
        assert_eq!(signed_value(&tx, 1).unwrap(), dec!(123.45));
        assert_eq!(signed_shares(&tx, 1).unwrap(), dec!(10));
    }

    #[test]
    fn sell_is_negative() {
        let tx = raw(Some("sell"), dec!(4), dec!(2.50));
        assert_eq!(signed_value(&tx, 1).unwrap(), dec!(-10.00));
        assert_eq!(signed_shares(&tx, 1).unwrap(), dec!(-4));
    }

    #[test]
    fn full_precision_is_kept() {
        let tx = raw(Some("BUY"), dec!(3.333), dec!(1.111));
        assert_eq!(signed_value(&tx, 1).unwrap(), dec!(3.702963));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = signed_value(&raw(Some("HOLD"), dec!(1), dec!(1)), 7).unwrap_err();
        match err {
            ReportError::InvalidTransactionType { row, value } => {
                assert_eq!(row, 7);
                assert_eq!(value, "HOLD");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_type_is_rejected() {
        let err = signed_shares(&raw(None, dec!(1), dec!(1)), 2).unwrap_err();
        assert!(matches!(err, ReportError::InvalidTransactionType { row: 2, .. }));
    }
}
