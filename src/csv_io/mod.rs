//! CSV interchange for the ledger: a flat, ordered list of transaction
//! records, one per row.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::models::{parse_amount, parse_date, Transaction, TransactionId, TransactionInput};

pub(crate) const HEADER: [&str; 7] = [
    "id",
    "date",
    "text",
    "amount",
    "category",
    "payment_method",
    "tags",
];

const TAG_SEPARATOR: char = ';';
const TAG_ESCAPE: char = '\\';

/// One row read back from a CSV file. The id is kept for reference only; the
/// ledger assigns fresh ids when records are imported.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TransactionRecord {
    pub(crate) id: Option<TransactionId>,
    pub(crate) input: TransactionInput,
}

pub(crate) fn write_csv(path: &Path, txns: &[Transaction]) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(HEADER)?;

    for txn in txns {
        wtr.write_record([
            txn.id.to_string(),
            txn.date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            txn.text.clone(),
            txn.amount.to_string(),
            txn.category.clone().unwrap_or_default(),
            txn.payment_method.clone().unwrap_or_default(),
            join_tags(&txn.tags),
        ])?;
    }
    wtr.flush()?;

    info!(count = txns.len(), path = %path.display(), "exported transactions");
    Ok(txns.len())
}

/// Column positions resolved from the header row.
struct Columns {
    id: Option<usize>,
    date: Option<usize>,
    text: usize,
    amount: usize,
    category: Option<usize>,
    payment_method: Option<usize>,
    tags: Option<usize>,
}

impl Columns {
    fn from_header(header: &csv::StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            header
                .iter()
                .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
        };
        Ok(Self {
            id: find(&["id"]),
            date: find(&["date"]),
            text: find(&["text", "description"])
                .context("CSV header has no 'text' column")?,
            amount: find(&["amount"]).context("CSV header has no 'amount' column")?,
            category: find(&["category"]),
            payment_method: find(&["payment_method", "payment method", "method"]),
            tags: find(&["tags"]),
        })
    }
}

/// Read every row of `path`. Rows are validated up front so an import either
/// has all of them or none.
pub(crate) fn read_csv(path: &Path) -> Result<Vec<TransactionRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let columns = Columns::from_header(rdr.headers().context("Failed to read CSV header")?)?;

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        // +2: one for the header, one for 1-based numbering.
        let line = i + 2;
        let row = result.with_context(|| format!("Row {line}: failed to read"))?;
        if row.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let record = parse_row(&row, &columns).with_context(|| format!("Row {line}"))?;
        records.push(record);
    }

    info!(count = records.len(), path = %path.display(), "read transactions from csv");
    Ok(records)
}

fn parse_row(row: &csv::StringRecord, columns: &Columns) -> Result<TransactionRecord> {
    let field = |col: Option<usize>| {
        col.and_then(|c| row.get(c))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    // Text is kept verbatim; only blank text is rejected.
    let text = row.get(columns.text).unwrap_or_default();
    if text.trim().is_empty() {
        anyhow::bail!(crate::ledger::LedgerError::EmptyText);
    }
    let amount = parse_amount(field(Some(columns.amount)).unwrap_or_default())?;

    let mut input = TransactionInput::new(text, amount);
    if let Some(raw) = field(columns.date) {
        let date = parse_date(raw).with_context(|| format!("bad date '{raw}'"))?;
        input = input.with_date(date);
    }
    if let Some(category) = field(columns.category) {
        input = input.with_category(category);
    }
    if let Some(method) = field(columns.payment_method) {
        input = input.with_payment_method(method);
    }
    if let Some(tags) = field(columns.tags) {
        input = input.with_tags(split_tags(tags));
    }

    let id = field(columns.id).and_then(|raw| raw.parse().ok());
    Ok(TransactionRecord { id, input })
}

/// Tags share one cell, separated by `;`. A literal `;` or `\` inside a tag
/// is written with a leading `\`.
fn join_tags(tags: &[String]) -> String {
    let mut out = String::new();
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            out.push(TAG_SEPARATOR);
        }
        for c in tag.chars() {
            if c == TAG_SEPARATOR || c == TAG_ESCAPE {
                out.push(TAG_ESCAPE);
            }
            out.push(c);
        }
    }
    out
}

fn split_tags(cell: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut current = String::new();
    let mut chars = cell.chars();
    while let Some(c) = chars.next() {
        match c {
            TAG_ESCAPE => current.push(chars.next().unwrap_or(TAG_ESCAPE)),
            TAG_SEPARATOR => tags.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    tags.push(current);
    tags
}

#[cfg(test)]
mod tests;
