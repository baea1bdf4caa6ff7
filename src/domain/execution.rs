//! Execution record: a single buy or sell fill from the tradebook.

use crate::domain::{OrderId, Side, Symbol};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single normalized execution from the brokerage log.
///
/// Produced by the tradebook normalizer, which guarantees the symbol is
/// uppercase-trimmed, quantity and price are positive, and the timestamp has
/// at least second resolution. The matcher trusts these invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Execution time (exchange-local wall clock, no timezone).
    pub timestamp: NaiveDateTime,
    /// Buy or sell.
    pub side: Side,
    /// Number of units filled (> 0).
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    /// Fill price per unit (> 0).
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Broker order identifier, for traceability.
    pub order_id: OrderId,
}

impl Execution {
    /// Create a new Execution.
    pub fn new(
        symbol: Symbol,
        timestamp: NaiveDateTime,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        order_id: OrderId,
    ) -> Self {
        Execution {
            symbol,
            timestamp,
            side,
            quantity,
            price,
            order_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_execution_creation() {
        let execution = Execution::new(
            Symbol::new("RELIANCE".to_string()),
            ts(10, 0),
            Side::Buy,
            Decimal::from_str("100").unwrap(),
            Decimal::from_str("150.50").unwrap(),
            OrderId::new("ord-1".to_string()),
        );

        assert_eq!(execution.symbol.as_str(), "RELIANCE");
        assert_eq!(execution.side, Side::Buy);
        assert_eq!(execution.quantity, Decimal::from_str("100").unwrap());
        assert_eq!(execution.price, Decimal::from_str("150.50").unwrap());
    }

    #[test]
    fn test_execution_serialization_roundtrip() {
        let execution = Execution::new(
            Symbol::new("TCS".to_string()),
            ts(14, 30),
            Side::Sell,
            Decimal::from_str("25").unwrap(),
            Decimal::from_str("3999.75").unwrap(),
            OrderId::new("ord-2".to_string()),
        );

        let json = serde_json::to_string(&execution).unwrap();
        let deserialized: Execution = serde_json::from_str(&json).unwrap();
        assert_eq!(execution, deserialized);
    }

    #[test]
    fn test_execution_side_serializes_lowercase() {
        let execution = Execution::new(
            Symbol::new("INFY".to_string()),
            ts(9, 15),
            Side::Buy,
            Decimal::from_str("10").unwrap(),
            Decimal::from_str("1500").unwrap(),
            OrderId::new("ord-3".to_string()),
        );

        let json = serde_json::to_value(&execution).unwrap();
        assert_eq!(json["side"], "buy");
    }
}
