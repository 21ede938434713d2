//! The transaction store. A `Ledger` owns every transaction and is the only
//! place ids are handed out; all mutations go through [`Ledger::dispatch`].

mod action;
mod error;

pub(crate) use action::{Applied, LedgerAction};
pub(crate) use error::LedgerError;

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{Transaction, TransactionId, TransactionInput};

#[derive(Debug, Clone)]
pub(crate) struct Ledger {
    // Newest first.
    transactions: Vec<Transaction>,
    next_id: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub(crate) fn new() -> Self {
        Self {
            transactions: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild a ledger from stored records (newest first) and the id counter
    /// that was saved alongside them.
    pub(crate) fn from_parts(
        transactions: Vec<Transaction>,
        next_id: u64,
    ) -> Result<Self, LedgerError> {
        let mut seen = std::collections::HashSet::with_capacity(transactions.len());
        for txn in &transactions {
            if !seen.insert(txn.id) {
                return Err(LedgerError::DuplicateId(txn.id));
            }
        }
        let max_id = transactions.iter().map(|t| t.id.0).max().unwrap_or(0);
        Ok(Self {
            transactions,
            next_id: next_id.max(max_id + 1),
        })
    }

    pub(crate) fn dispatch(&mut self, action: LedgerAction) -> Result<Applied, LedgerError> {
        let name = action.name();
        let applied = match action {
            LedgerAction::Add(input) => Applied::Added(self.add(input)?),
            LedgerAction::Delete(id) => Applied::Deleted(self.delete(id)),
            LedgerAction::Replace(id, input) => Applied::Replaced(self.replace(id, input)?),
        };
        debug!(
            action = name,
            changed = applied.changed(),
            size = self.transactions.len(),
            "ledger action applied"
        );
        Ok(applied)
    }

    pub(crate) fn add(&mut self, input: TransactionInput) -> Result<Transaction, LedgerError> {
        validate(&input)?;
        let id = self.allocate_id();
        let txn = Transaction::from_input(id, input);
        self.transactions.insert(0, txn.clone());
        Ok(txn)
    }

    /// Remove `id` if present. Unknown ids are not an error.
    pub(crate) fn delete(&mut self, id: TransactionId) -> Option<Transaction> {
        let pos = self.position(id)?;
        Some(self.transactions.remove(pos))
    }

    pub(crate) fn replace(
        &mut self,
        id: TransactionId,
        input: TransactionInput,
    ) -> Result<Option<Transaction>, LedgerError> {
        validate(&input)?;
        let Some(pos) = self.position(id) else {
            return Ok(None);
        };
        let txn = Transaction::from_input(id, input);
        self.transactions[pos] = txn.clone();
        Ok(Some(txn))
    }

    pub(crate) fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub(crate) fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.transactions.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// The id the next successful add will receive.
    pub(crate) fn next_id(&self) -> u64 {
        self.next_id
    }

    fn allocate_id(&mut self) -> TransactionId {
        let id = TransactionId(self.next_id);
        self.next_id += 1;
        id
    }

    fn position(&self, id: TransactionId) -> Option<usize> {
        self.transactions.iter().position(|t| t.id == id)
    }
}

/// Largest accepted magnitude (10^15). Totals stay far inside `Decimal` range.
pub(crate) const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

fn validate(input: &TransactionInput) -> Result<(), LedgerError> {
    if input.text.trim().is_empty() {
        return Err(LedgerError::EmptyText);
    }
    if input.amount.abs() > MAX_AMOUNT {
        return Err(LedgerError::AmountOutOfRange(input.amount));
    }
    Ok(())
}
