use rust_decimal::Decimal;
use std::fs::File;
use std::io::Write;
use std::str::FromStr;
use tradecoach::ingest::{parse_tradebook, TradebookError};
use tradecoach::Side;

const HEADER: &str = "symbol,trade_date,order_execution_time,trade_type,quantity,price,order_id\n";

#[test]
fn test_parse_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tradebook.csv");
    let mut file = File::create(&path).unwrap();
    write!(
        file,
        "{HEADER}\
         RELIANCE,2024-03-15,2024-03-15T10:00:00,buy,100,150.00,ord-1\n\
         RELIANCE,2024-03-15,2024-03-15T14:00:00,sell,100,155.00,ord-2\n"
    )
    .unwrap();

    let parsed = parse_tradebook(File::open(&path).unwrap()).unwrap();
    assert_eq!(parsed.executions.len(), 2);
    assert_eq!(parsed.skipped_rows, 0);
    assert_eq!(parsed.executions[0].symbol.as_str(), "RELIANCE");
    assert_eq!(
        parsed.executions[0].price,
        Decimal::from_str("150.00").unwrap()
    );
}

#[test]
fn test_normalization_rules() {
    let csv = format!(
        "{HEADER}\
         tcs ,2024-03-15,2024-03-15T10:00:00,BUY,10,4000,ord-1\n\
         TCS,2024-03-15,2024-03-15T11:00:00, Sell ,10,4050,ord-2\n"
    );
    let parsed = parse_tradebook(csv.as_bytes()).unwrap();

    assert_eq!(parsed.executions.len(), 2);
    assert_eq!(parsed.executions[0].symbol.as_str(), "TCS");
    assert_eq!(parsed.executions[0].side, Side::Buy);
    assert_eq!(parsed.executions[1].side, Side::Sell);
}

#[test]
fn test_rows_sorted_chronologically_regardless_of_file_order() {
    let csv = format!(
        "{HEADER}\
         INFY,2024-03-15,2024-03-15T14:00:00,sell,10,1520,ord-2\n\
         INFY,2024-03-15,2024-03-15T09:30:00,buy,10,1500,ord-1\n\
         INFY,2024-03-16,2024-03-16T09:30:00,buy,5,1510,ord-3\n"
    );
    let parsed = parse_tradebook(csv.as_bytes()).unwrap();

    let ids: Vec<&str> = parsed
        .executions
        .iter()
        .map(|e| e.order_id.as_str())
        .collect();
    assert_eq!(ids, vec!["ord-1", "ord-2", "ord-3"]);
}

#[test]
fn test_unusable_rows_skipped_and_counted() {
    let csv = format!(
        "{HEADER}\
         RELIANCE,2024-03-15,2024-03-15T10:00:00,buy,100,150,ord-1\n\
         RELIANCE,2024-03-15,2024-03-15T10:05:00,buy,,150,ord-2\n\
         RELIANCE,2024-03-15,2024-03-15T10:10:00,transfer,10,150,ord-3\n"
    );
    let parsed = parse_tradebook(csv.as_bytes()).unwrap();

    assert_eq!(parsed.executions.len(), 1);
    assert_eq!(parsed.skipped_rows, 2);
}

#[test]
fn test_missing_column_rejected() {
    let csv = "symbol,trade_date,order_execution_time,trade_type,quantity,price\n\
               RELIANCE,2024-03-15,2024-03-15T10:00:00,buy,100,150\n";
    let err = parse_tradebook(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, TradebookError::MissingColumns(_)));
    assert!(err.to_string().contains("order_id"));
}

#[test]
fn test_empty_file_with_header_is_valid() {
    let parsed = parse_tradebook(HEADER.as_bytes()).unwrap();
    assert!(parsed.executions.is_empty());
    assert_eq!(parsed.skipped_rows, 0);
}
