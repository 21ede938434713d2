use std::cmp::Ordering;

use crate::models::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SortKey {
    #[default]
    Date,
    Amount,
    Name,
}

impl SortKey {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" => Some(Self::Date),
            "amount" | "amt" => Some(Self::Amount),
            "name" | "text" | "description" => Some(Self::Name),
            _ => None,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Name => "name",
        }
    }

    pub(crate) fn next(&self) -> Self {
        match self {
            Self::Date => Self::Amount,
            Self::Amount => Self::Name,
            Self::Name => Self::Date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" | "up" => Some(Self::Asc),
            "desc" | "descending" | "down" => Some(Self::Desc),
            _ => None,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub(crate) fn flip(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Stable sort. When sorting by date, undated transactions come first in
/// both directions.
pub(crate) fn sort_by(txns: &[Transaction], key: SortKey, order: SortOrder) -> Vec<Transaction> {
    let mut sorted = txns.to_vec();
    sorted.sort_by(|a, b| compare(a, b, key, order));
    sorted
}

fn compare(a: &Transaction, b: &Transaction, key: SortKey, order: SortOrder) -> Ordering {
    let directed = |ord: Ordering| match order {
        SortOrder::Asc => ord,
        SortOrder::Desc => ord.reverse(),
    };
    match key {
        SortKey::Date => match (a.date, b.date) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => directed(x.cmp(&y)),
        },
        SortKey::Amount => directed(a.amount.cmp(&b.amount)),
        SortKey::Name => directed(a.text.to_lowercase().cmp(&b.text.to_lowercase())),
    }
}
