#![allow(clippy::unwrap_used)]

use super::*;
use crate::ledger::{Ledger, LedgerError};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::io::Write;

fn make_csv_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn sample_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    ledger
        .add(TransactionInput::new("Salary", dec!(1000)))
        .unwrap();
    ledger
        .add(
            TransactionInput::new("Rent, March", dec!(-500.00))
                .with_date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
                .with_category("Housing")
                .with_payment_method("Transfer")
                .with_tags(["monthly", "fixed"]),
        )
        .unwrap();
    ledger
        .add(TransactionInput::new("Coffee", dec!(-4.5)).with_category("Food"))
        .unwrap();
    ledger
}

// ── Round trip ────────────────────────────────────────────────

#[test]
fn test_export_then_read_preserves_records() {
    let ledger = sample_ledger();
    let file = tempfile::NamedTempFile::new().unwrap();

    let written = write_csv(file.path(), ledger.transactions()).unwrap();
    assert_eq!(written, 3);

    let records = read_csv(file.path()).unwrap();
    assert_eq!(records.len(), 3);
    for (record, txn) in records.iter().zip(ledger.transactions()) {
        assert_eq!(record.id, Some(txn.id));
        assert_eq!(record.input, txn.to_input());
    }
}

#[test]
fn test_round_trip_keeps_separator_in_tags_and_padded_text() {
    let mut ledger = Ledger::new();
    ledger
        .add(
            TransactionInput::new("  Deposit refund ", dec!(250))
                .with_tags(["a;b", r"back\slash", "plain"]),
        )
        .unwrap();
    let file = tempfile::NamedTempFile::new().unwrap();
    write_csv(file.path(), ledger.transactions()).unwrap();

    let records = read_csv(file.path()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].input.text, "  Deposit refund ");
    assert_eq!(records[0].input.tags, vec!["a;b", r"back\slash", "plain"]);
}

#[test]
fn test_split_tags_handles_escapes() {
    assert_eq!(split_tags("x;y"), vec!["x", "y"]);
    assert_eq!(split_tags(r"x\;y;z"), vec!["x;y", "z"]);
    assert_eq!(split_tags(r"trailing\"), vec![r"trailing\"]);
    assert_eq!(join_tags(&["a;b".to_string(), "c".to_string()]), r"a\;b;c");
}

#[test]
fn test_export_empty_ledger_writes_header_only() {
    let file = tempfile::NamedTempFile::new().unwrap();
    assert_eq!(write_csv(file.path(), &[]).unwrap(), 0);
    let content = std::fs::read_to_string(file.path()).unwrap();
    assert_eq!(content.trim(), HEADER.join(","));
    assert!(read_csv(file.path()).unwrap().is_empty());
}

// ── Reading ───────────────────────────────────────────────────

#[test]
fn test_read_minimal_columns() {
    let file = make_csv_file("Description,Amount\nLunch,-12.00\nRefund,$20\n");
    let records = read_csv(file.path()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].input.text, "Lunch");
    assert_eq!(records[0].input.amount, dec!(-12.00));
    assert!(records[0].id.is_none());
    assert!(records[0].input.date.is_none());
    assert_eq!(records[1].input.amount, dec!(20));
}

#[test]
fn test_read_skips_blank_rows() {
    let file = make_csv_file("text,amount\nA,1\n,\nB,2\n");
    let records = read_csv(file.path()).unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_read_missing_amount_column() {
    let file = make_csv_file("text,value\nA,1\n");
    let err = read_csv(file.path()).unwrap_err();
    assert!(err.to_string().contains("amount"));
}

#[test]
fn test_read_rejects_empty_text_with_row_number() {
    let file = make_csv_file("text,amount\nA,1\n  ,5\n");
    let err = read_csv(file.path()).unwrap_err();
    assert!(err.to_string().contains("Row 3"), "{err:#}");
    assert_eq!(
        err.root_cause().downcast_ref::<LedgerError>(),
        Some(&LedgerError::EmptyText)
    );
}

#[test]
fn test_read_rejects_non_finite_amount() {
    let file = make_csv_file("text,amount\nBroken,NaN\n");
    let err = read_csv(file.path()).unwrap_err();
    assert!(matches!(
        err.root_cause().downcast_ref::<LedgerError>(),
        Some(LedgerError::NonFiniteAmount(_))
    ));
}

#[test]
fn test_read_rejects_bad_date() {
    let file = make_csv_file("text,amount,date\nA,1,someday\n");
    let err = read_csv(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("someday"));
}

#[test]
fn test_read_tags_and_quoted_text() {
    let file = make_csv_file("text,amount,tags\n\"Dinner, with friends\",-60,\"social; weekend\"\n");
    let records = read_csv(file.path()).unwrap();
    assert_eq!(records[0].input.text, "Dinner, with friends");
    assert_eq!(
        records[0].input.tags,
        vec!["social".to_string(), "weekend".to_string()]
    );
}
