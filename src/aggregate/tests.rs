#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{TransactionId, TransactionInput};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn txn(id: u64, text: &str, amount: Decimal) -> Transaction {
    Transaction::from_input(TransactionId(id), TransactionInput::new(text, amount))
}

fn dated(id: u64, text: &str, amount: Decimal, on: NaiveDate) -> Transaction {
    Transaction::from_input(
        TransactionId(id),
        TransactionInput::new(text, amount).with_date(on),
    )
}

fn ids(txns: &[Transaction]) -> Vec<u64> {
    txns.iter().map(|t| t.id.0).collect()
}

// ── Totals ────────────────────────────────────────────────────

#[test]
fn test_empty_ledger_totals() {
    // Scenario A
    assert_eq!(balance(&[]), Decimal::ZERO);
    assert_eq!(income(&[]), Decimal::ZERO);
    assert_eq!(expense(&[]), Decimal::ZERO);
    assert!(by_category(&[]).is_empty());
    assert!(filter_by_date_range(&[], DateRange::Week, date(2024, 1, 1)).is_empty());
    assert!(search(&[], "x").is_empty());
}

#[test]
fn test_income_expense_partition() {
    let txns = vec![
        txn(1, "Salary", dec!(1000)),
        txn(2, "Rent", dec!(-500)),
        txn(3, "Refund", dec!(20.25)),
        txn(4, "Coffee", dec!(-4.5)),
        txn(5, "Zero", Decimal::ZERO),
    ];
    assert_eq!(income(&txns), dec!(1020.25));
    assert_eq!(expense(&txns), dec!(504.5));
    assert_eq!(balance(&txns), dec!(515.75));
    assert_eq!(balance(&txns), income(&txns) - expense(&txns));
}

#[test]
fn test_expense_is_exact_for_repeated_cents() {
    let txns: Vec<Transaction> = (0..10).map(|i| txn(i, "Gum", dec!(-0.10))).collect();
    assert_eq!(expense(&txns), dec!(1.00));
}

#[test]
fn test_totals_saturate_instead_of_overflowing() {
    // Records loaded from disk skip `Ledger::add` validation.
    let txns = vec![
        txn(1, "Big", Decimal::MAX),
        txn(2, "Big", Decimal::MAX),
        txn(3, "Debt", Decimal::MIN),
        txn(4, "Debt", Decimal::MIN),
    ];
    assert_eq!(income(&txns), Decimal::MAX);
    assert_eq!(expense(&txns), Decimal::MAX);
    assert_eq!(by_category(&txns)["Uncategorized"], Decimal::MAX);
    let summary = Summary::of(&txns);
    assert_eq!(summary.count, 4);
}

#[test]
fn test_by_category_is_expense_only() {
    let mut salary = txn(1, "Salary", dec!(1000));
    salary.category = Some("Income".into());
    let mut rent = txn(2, "Rent", dec!(-500));
    rent.category = Some("Housing".into());
    let mut bus = txn(3, "Bus", dec!(-2.75));
    bus.category = Some("Transportation".into());
    let mut train = txn(4, "Train", dec!(-10));
    train.category = Some("Transportation".into());
    let misc = txn(5, "Misc", dec!(-1));

    let cats = by_category(&[salary, rent, bus, train, misc]);
    assert_eq!(cats.len(), 3);
    assert_eq!(cats["Housing"], dec!(500));
    assert_eq!(cats["Transportation"], dec!(12.75));
    assert_eq!(cats["Uncategorized"], dec!(1));
    assert!(!cats.contains_key("Income"));
}

// ── Date range ────────────────────────────────────────────────

#[test]
fn test_range_all_keeps_everything() {
    let today = date(2024, 6, 15);
    let txns = vec![
        dated(1, "Old", dec!(-1), date(2001, 1, 1)),
        dated(2, "Future", dec!(-1), date(2030, 1, 1)),
        txn(3, "Undated", dec!(-1)),
    ];
    assert_eq!(ids(&filter_by_date_range(&txns, DateRange::All, today)), vec![1, 2, 3]);
}

#[test]
fn test_range_week_boundaries_inclusive() {
    let today = date(2024, 6, 15);
    let txns = vec![
        dated(1, "Edge", dec!(-1), date(2024, 6, 8)),
        dated(2, "Outside", dec!(-1), date(2024, 6, 7)),
        dated(3, "Today", dec!(-1), today),
        dated(4, "Tomorrow", dec!(-1), date(2024, 6, 16)),
        txn(5, "Undated", dec!(-1)),
    ];
    assert_eq!(ids(&filter_by_date_range(&txns, DateRange::Week, today)), vec![1, 3, 5]);
}

#[test]
fn test_range_day_month_year() {
    let today = date(2024, 3, 31);
    let txns = vec![
        dated(1, "Yesterday", dec!(-1), date(2024, 3, 30)),
        dated(2, "Two days", dec!(-1), date(2024, 3, 29)),
        dated(3, "Month edge", dec!(-1), date(2024, 2, 29)),
        dated(4, "Before month", dec!(-1), date(2024, 2, 28)),
        dated(5, "Year edge", dec!(-1), date(2023, 3, 31)),
        dated(6, "Before year", dec!(-1), date(2023, 3, 30)),
    ];
    assert_eq!(ids(&filter_by_date_range(&txns, DateRange::Day, today)), vec![1]);
    assert_eq!(
        ids(&filter_by_date_range(&txns, DateRange::Month, today)),
        vec![1, 2, 3]
    );
    assert_eq!(
        ids(&filter_by_date_range(&txns, DateRange::Year, today)),
        vec![1, 2, 3, 4, 5]
    );
}

#[test]
fn test_range_parse() {
    assert_eq!(DateRange::parse("WEEK"), Some(DateRange::Week));
    assert_eq!(DateRange::parse("y"), Some(DateRange::Year));
    assert_eq!(DateRange::parse("fortnight"), None);
    for r in DateRange::all() {
        assert_eq!(DateRange::parse(r.as_str()), Some(*r));
    }
    assert_eq!(DateRange::All.next(), DateRange::Day);
    assert_eq!(DateRange::Day.prev(), DateRange::All);
    for r in DateRange::all() {
        assert_eq!(r.next().prev(), *r);
    }
}

// ── Search ────────────────────────────────────────────────────

#[test]
fn test_search_case_insensitive() {
    // Scenario E
    let txns = vec![
        txn(1, "Coffee", dec!(-4.5)),
        txn(2, "Coffee", dec!(-4.5)),
        txn(3, "Bagel", dec!(-3)),
    ];
    assert_eq!(ids(&search(&txns, "coffee")), vec![1, 2]);
    assert_eq!(ids(&search(&txns, "OFF")), vec![1, 2]);
}

#[test]
fn test_search_blank_term_matches_all() {
    let txns = vec![txn(1, "A", dec!(1)), txn(2, "B", dec!(1))];
    assert_eq!(search(&txns, "").len(), 2);
    assert_eq!(search(&txns, "   ").len(), 2);
    assert!(search(&txns, "zzz").is_empty());
}

// ── Sort ──────────────────────────────────────────────────────

#[test]
fn test_sort_by_date_undated_first_both_ways() {
    let txns = vec![
        dated(1, "Mid", dec!(1), date(2024, 2, 1)),
        txn(2, "Undated", dec!(1)),
        dated(3, "Early", dec!(1), date(2024, 1, 1)),
        dated(4, "Late", dec!(1), date(2024, 3, 1)),
    ];
    assert_eq!(
        ids(&sort_by(&txns, SortKey::Date, SortOrder::Asc)),
        vec![2, 3, 1, 4]
    );
    assert_eq!(
        ids(&sort_by(&txns, SortKey::Date, SortOrder::Desc)),
        vec![2, 4, 1, 3]
    );
}

#[test]
fn test_sort_by_amount() {
    let txns = vec![
        txn(1, "A", dec!(10)),
        txn(2, "B", dec!(-20)),
        txn(3, "C", dec!(5)),
    ];
    assert_eq!(ids(&sort_by(&txns, SortKey::Amount, SortOrder::Asc)), vec![2, 3, 1]);
    assert_eq!(ids(&sort_by(&txns, SortKey::Amount, SortOrder::Desc)), vec![1, 3, 2]);
}

#[test]
fn test_sort_by_name_case_insensitive_and_stable() {
    let txns = vec![
        txn(1, "banana", dec!(1)),
        txn(2, "Apple", dec!(1)),
        txn(3, "apple", dec!(2)),
    ];
    assert_eq!(ids(&sort_by(&txns, SortKey::Name, SortOrder::Asc)), vec![2, 3, 1]);
    assert_eq!(ids(&sort_by(&txns, SortKey::Name, SortOrder::Desc)), vec![1, 2, 3]);
}

#[test]
fn test_sort_parse() {
    assert_eq!(SortKey::parse("Amount"), Some(SortKey::Amount));
    assert_eq!(SortKey::parse("text"), Some(SortKey::Name));
    assert_eq!(SortKey::parse("colour"), None);
    assert_eq!(SortOrder::parse("ASC"), Some(SortOrder::Asc));
    assert_eq!(SortOrder::Asc.flip(), SortOrder::Desc);
    assert_eq!(SortKey::Name.next(), SortKey::Date);
}

// ── Limit / display ───────────────────────────────────────────

#[test]
fn test_limit() {
    let txns = vec![txn(1, "A", dec!(1)), txn(2, "B", dec!(1)), txn(3, "C", dec!(1))];
    assert_eq!(ids(&limit(&txns, 2)), vec![1, 2]);
    assert_eq!(limit(&txns, 10).len(), 3);
    assert!(limit(&txns, 0).is_empty());
}

#[test]
fn test_round_display() {
    assert_eq!(round_display(dec!(9.005)), dec!(9.01));
    assert_eq!(round_display(dec!(-9.005)), dec!(-9.01));
    assert_eq!(round_display(dec!(0.333333)), dec!(0.33));
    assert_eq!(round_display(dec!(12)), dec!(12));
}

// ── Summary ───────────────────────────────────────────────────

#[test]
fn test_summary_orders_categories_by_spend() {
    let mut rent = txn(1, "Rent", dec!(-500));
    rent.category = Some("Housing".into());
    let mut lunch = txn(2, "Lunch", dec!(-12));
    lunch.category = Some("Food".into());
    let salary = txn(3, "Salary", dec!(1000));

    let s = Summary::of(&[rent, lunch, salary]);
    assert_eq!(s.balance, dec!(488));
    assert_eq!(s.income, dec!(1000));
    assert_eq!(s.expense, dec!(512));
    assert_eq!(s.count, 3);
    assert_eq!(s.income_count, 1);
    assert_eq!(s.expense_count, 2);
    assert_eq!(
        s.by_category,
        vec![("Housing".to_string(), dec!(500)), ("Food".to_string(), dec!(12))]
    );
}

#[test]
fn test_summary_empty() {
    let s = Summary::of(&[]);
    assert_eq!(s.balance, Decimal::ZERO);
    assert_eq!(s.count, 0);
    assert!(s.by_category.is_empty());
}

// ── Properties ────────────────────────────────────────────────

proptest! {
    #[test]
    fn prop_sign_decides_contribution(cents in -1_000_000i64..1_000_000i64) {
        let amount = Decimal::new(cents, 2);
        let t = [txn(1, "x", amount)];
        if amount >= Decimal::ZERO {
            prop_assert_eq!(income(&t), amount);
            prop_assert_eq!(expense(&t), Decimal::ZERO);
            prop_assert!(by_category(&t).is_empty());
        } else {
            prop_assert_eq!(income(&t), Decimal::ZERO);
            prop_assert_eq!(expense(&t), -amount);
            prop_assert_eq!(by_category(&t).get("Uncategorized").copied(), Some(-amount));
        }
    }

    #[test]
    fn prop_category_totals_sum_to_expense(cents in prop::collection::vec(-100_000i64..100_000i64, 0..30)) {
        let cats = ["Food", "Housing", "Other"];
        let txns: Vec<Transaction> = cents
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let mut t = txn(i as u64, "x", Decimal::new(*c, 2));
                if i % 4 != 0 {
                    t.category = Some(cats[i % cats.len()].to_string());
                }
                t
            })
            .collect();
        let total: Decimal = by_category(&txns).values().copied().sum();
        prop_assert_eq!(total, expense(&txns));
    }
}
