#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::aggregate::{DateRange, SortKey, SortOrder};
use crate::ledger::Ledger;
use crate::models::TransactionInput;
use crate::run::ViewQuery;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    ledger
        .add(
            TransactionInput::new("Salary", dec!(3000))
                .with_date(date(2024, 5, 1))
                .with_category("Income"),
        )
        .unwrap();
    ledger
        .add(
            TransactionInput::new("Rent", dec!(-1200))
                .with_date(date(2024, 6, 1))
                .with_category("Housing"),
        )
        .unwrap();
    ledger
        .add(
            TransactionInput::new("Coffee", dec!(-4.50))
                .with_date(date(2024, 6, 14))
                .with_category("Food"),
        )
        .unwrap();
    ledger
        .add(TransactionInput::new("Cash gift", dec!(50)))
        .unwrap();
    ledger
}

fn app_with(query: ViewQuery) -> App {
    App::new(query, 2, date(2024, 6, 15))
}

// ── Refresh ───────────────────────────────────────────────────

#[test]
fn test_refresh_all_range() {
    let ledger = sample_ledger();
    let mut app = app_with(ViewQuery::default());
    app.refresh(&ledger);

    assert_eq!(app.summary.balance, dec!(1845.50));
    assert_eq!(app.summary.income, dec!(3050));
    assert_eq!(app.summary.expense, dec!(1204.50));
    assert_eq!(app.transactions.len(), 4);
    assert_eq!(app.total_count, 4);
    // Newest first, capped at the recent limit.
    let recent: Vec<&str> = app.recent.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(recent, vec!["Cash gift", "Coffee"]);
}

#[test]
fn test_refresh_week_range_keeps_undated() {
    let ledger = sample_ledger();
    let mut app = app_with(ViewQuery {
        range: DateRange::Week,
        ..ViewQuery::default()
    });
    app.refresh(&ledger);

    let texts: Vec<&str> = app.transactions.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts.len(), 2);
    assert!(texts.contains(&"Coffee"));
    assert!(texts.contains(&"Cash gift"));
    assert_eq!(app.summary.balance, dec!(45.50));
    assert_eq!(app.total_count, 4);
}

#[test]
fn test_search_does_not_change_summary() {
    let ledger = sample_ledger();
    let mut app = app_with(ViewQuery {
        search: "RENT".into(),
        ..ViewQuery::default()
    });
    app.refresh(&ledger);
    assert_eq!(app.transactions.len(), 1);
    assert_eq!(app.summary.count, 4);
}

#[test]
fn test_sort_applies_to_table() {
    let ledger = sample_ledger();
    let mut app = app_with(ViewQuery {
        sort: SortKey::Amount,
        order: SortOrder::Asc,
        ..ViewQuery::default()
    });
    app.refresh(&ledger);
    assert_eq!(app.transactions[0].text, "Rent");
    assert_eq!(app.transactions[3].text, "Salary");
}

#[test]
fn test_refresh_clamps_cursor() {
    let mut ledger = sample_ledger();
    let mut app = app_with(ViewQuery::default());
    app.refresh(&ledger);
    app.transaction_index = 3;

    let last = app.transactions[3].id;
    ledger.delete(last);
    app.refresh(&ledger);
    assert_eq!(app.transaction_index, 2);
}

// ── Delete confirmation ───────────────────────────────────────

#[test]
fn test_request_delete_selected() {
    let ledger = sample_ledger();
    let mut app = app_with(ViewQuery::default());
    app.screen = Screen::Transactions;
    app.refresh(&ledger);
    app.transaction_index = 1;

    app.request_delete_selected();
    let selected = app.transactions[1].clone();
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(
        app.pending_action,
        Some(PendingAction::DeleteTransaction {
            id: selected.id,
            text: selected.text.clone(),
        })
    );
    assert!(app.confirm_message.contains(&selected.text));
}

#[test]
fn test_request_delete_with_empty_table() {
    let mut app = app_with(ViewQuery::default());
    app.refresh(&Ledger::new());
    app.request_delete_selected();
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.pending_action.is_none());
}

#[test]
fn test_screen_cycle() {
    assert_eq!(Screen::Dashboard.next(), Screen::Transactions);
    assert_eq!(Screen::Transactions.next(), Screen::Dashboard);
    assert_eq!(Screen::all().len(), 2);
}
