//! Stable chronological ordering for executions.

use crate::domain::Execution;

/// Sort executions by timestamp ascending.
///
/// Uses a stable sort: executions sharing a timestamp keep their original
/// relative order, so a given input always produces the same matching run.
/// Broker logs carry no secondary ordering key, which makes input order the
/// only deterministic tie-break available.
pub fn sort_executions_chronological(executions: &mut [Execution]) {
    executions.sort_by_key(|execution| execution.timestamp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderId, Side, Symbol};
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn execution(h: u32, m: u32, order_id: &str) -> Execution {
        Execution::new(
            Symbol::new("RELIANCE".to_string()),
            ts(h, m),
            Side::Buy,
            Decimal::from_str("10").unwrap(),
            Decimal::from_str("100").unwrap(),
            OrderId::new(order_id.to_string()),
        )
    }

    #[test]
    fn test_sorts_by_timestamp_ascending() {
        let mut executions = vec![
            execution(14, 0, "c"),
            execution(9, 30, "a"),
            execution(11, 0, "b"),
        ];

        sort_executions_chronological(&mut executions);

        assert_eq!(executions[0].order_id.as_str(), "a");
        assert_eq!(executions[1].order_id.as_str(), "b");
        assert_eq!(executions[2].order_id.as_str(), "c");
    }

    #[test]
    fn test_same_timestamp_preserves_input_order() {
        let mut executions = vec![
            execution(10, 0, "first"),
            execution(9, 0, "earliest"),
            execution(10, 0, "second"),
            execution(10, 0, "third"),
        ];

        sort_executions_chronological(&mut executions);

        assert_eq!(executions[0].order_id.as_str(), "earliest");
        assert_eq!(executions[1].order_id.as_str(), "first");
        assert_eq!(executions[2].order_id.as_str(), "second");
        assert_eq!(executions[3].order_id.as_str(), "third");
    }

    #[test]
    fn test_sort_is_deterministic() {
        let make = || {
            vec![
                execution(10, 0, "x"),
                execution(10, 0, "y"),
                execution(9, 0, "z"),
            ]
        };

        let mut a = make();
        let mut b = make();
        sort_executions_chronological(&mut a);
        sort_executions_chronological(&mut b);
        assert_eq!(a, b);
    }
}
