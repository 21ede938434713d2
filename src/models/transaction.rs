use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::ledger::LedgerError;

/// Category label used whenever a transaction carries none.
pub(crate) const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct TransactionId(pub(crate) u64);

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TransactionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(Self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Transaction {
    pub(crate) id: TransactionId,
    pub(crate) text: String,
    pub(crate) amount: Decimal,
    pub(crate) date: Option<NaiveDate>,
    pub(crate) category: Option<String>,
    pub(crate) payment_method: Option<String>,
    pub(crate) tags: Vec<String>,
}

impl Transaction {
    pub(crate) fn from_input(id: TransactionId, input: TransactionInput) -> Self {
        Self {
            id,
            text: input.text,
            amount: input.amount,
            date: input.date,
            category: input.category,
            payment_method: input.payment_method,
            tags: input.tags,
        }
    }

    pub(crate) fn is_income(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub(crate) fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    pub(crate) fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }

    pub(crate) fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }

    /// Everything except the id, e.g. for re-adding an exported record.
    pub(crate) fn to_input(&self) -> TransactionInput {
        TransactionInput {
            text: self.text.clone(),
            amount: self.amount,
            date: self.date,
            category: self.category.clone(),
            payment_method: self.payment_method.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// A transaction as submitted by a caller, before the ledger assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TransactionInput {
    pub(crate) text: String,
    pub(crate) amount: Decimal,
    pub(crate) date: Option<NaiveDate>,
    pub(crate) category: Option<String>,
    pub(crate) payment_method: Option<String>,
    pub(crate) tags: Vec<String>,
}

impl TransactionInput {
    pub(crate) fn new(text: impl Into<String>, amount: Decimal) -> Self {
        Self {
            text: text.into(),
            amount,
            date: None,
            category: None,
            payment_method: None,
            tags: Vec::new(),
        }
    }

    pub(crate) fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub(crate) fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(category.into());
        self
    }

    pub(crate) fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = non_blank(method.into());
        self
    }

    pub(crate) fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags
            .into_iter()
            .filter_map(|t| non_blank(t.into()))
            .collect();
        self
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn decimal_from_f64(amount: f64) -> Result<Decimal, LedgerError> {
    if !amount.is_finite() {
        return Err(LedgerError::NonFiniteAmount(amount.to_string()));
    }
    Decimal::from_f64(amount).ok_or_else(|| LedgerError::InvalidAmount(amount.to_string()))
}

/// Parse a user-typed amount such as `-4.50`, `$1,200` or `(12.00)`.
pub(crate) fn parse_amount(raw: &str) -> Result<Decimal, LedgerError> {
    let cleaned = raw
        .trim()
        .replace(['$', ',', '"'], "")
        .replace('(', "-")
        .replace(')', "");
    let cleaned = cleaned.trim();

    if let Ok(amount) = Decimal::from_str(cleaned).or_else(|_| Decimal::from_scientific(cleaned)) {
        return Ok(amount);
    }
    // NaN and infinity spellings only parse as floats.
    let float: f64 = cleaned
        .parse()
        .map_err(|_| LedgerError::InvalidAmount(raw.trim().to_string()))?;
    decimal_from_f64(float)
}

/// Parse a `YYYY-MM-DD` date, falling back to a couple of common spellings.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
