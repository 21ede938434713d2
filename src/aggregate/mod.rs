//! Derived figures over a ledger snapshot. Everything here is a pure function
//! of its arguments; nothing writes back into the ledger.

mod range;
mod sort;

pub(crate) use range::DateRange;
pub(crate) use sort::{sort_by, SortKey, SortOrder};

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

use crate::models::Transaction;

// Saturating so stored data from outside `Ledger::add` can never panic a total.
fn total(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

pub(crate) fn balance(txns: &[Transaction]) -> Decimal {
    total(txns.iter().map(|t| t.amount))
}

pub(crate) fn income(txns: &[Transaction]) -> Decimal {
    total(txns.iter().filter(|t| t.is_income()).map(|t| t.amount))
}

/// Total spent, as a non-negative magnitude.
pub(crate) fn expense(txns: &[Transaction]) -> Decimal {
    total(txns.iter().filter(|t| t.is_expense()).map(|t| t.abs_amount()))
}

/// Expense magnitude per category. Income is left out.
pub(crate) fn by_category(txns: &[Transaction]) -> BTreeMap<String, Decimal> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for txn in txns.iter().filter(|t| t.is_expense()) {
        let entry = totals
            .entry(txn.category_or_default().to_string())
            .or_insert(Decimal::ZERO);
        *entry = entry.saturating_add(txn.abs_amount());
    }
    totals
}

/// Transactions dated inside `[start, today]`, plus every undated one.
pub(crate) fn filter_by_date_range(
    txns: &[Transaction],
    range: DateRange,
    today: NaiveDate,
) -> Vec<Transaction> {
    let Some(start) = range.start(today) else {
        return txns.to_vec();
    };
    txns.iter()
        .filter(|t| t.date.map_or(true, |d| (start..=today).contains(&d)))
        .cloned()
        .collect()
}

/// Case-insensitive substring match on the text. A blank term matches all.
pub(crate) fn search(txns: &[Transaction], term: &str) -> Vec<Transaction> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return txns.to_vec();
    }
    txns.iter()
        .filter(|t| t.text.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// The first `n` items, in whatever order they were given.
pub(crate) fn limit(txns: &[Transaction], n: usize) -> Vec<Transaction> {
    txns.iter().take(n).cloned().collect()
}

/// Two-decimal rounding for display; aggregation itself never rounds.
pub(crate) fn round_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Everything a summary card or report needs, computed in one place.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Summary {
    pub(crate) balance: Decimal,
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
    pub(crate) count: usize,
    pub(crate) income_count: usize,
    pub(crate) expense_count: usize,
    pub(crate) by_category: Vec<(String, Decimal)>,
}

impl Summary {
    pub(crate) fn of(txns: &[Transaction]) -> Self {
        let mut by_category: Vec<(String, Decimal)> = by_category(txns).into_iter().collect();
        // Largest spend first; BTreeMap order breaks ties by name.
        by_category.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            balance: balance(txns),
            income: income(txns),
            expense: expense(txns),
            count: txns.len(),
            income_count: txns.iter().filter(|t| t.is_income()).count(),
            expense_count: txns.iter().filter(|t| t.is_expense()).count(),
            by_category,
        }
    }
}

#[cfg(test)]
mod tests;
