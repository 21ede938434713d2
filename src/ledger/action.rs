use crate::models::{Transaction, TransactionId, TransactionInput};

/// Every mutation the ledger accepts.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LedgerAction {
    Add(TransactionInput),
    Delete(TransactionId),
    /// Swap the whole record behind `id`; fields are never patched one by one.
    Replace(TransactionId, TransactionInput),
}

impl LedgerAction {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Delete(_) => "delete",
            Self::Replace(..) => "replace",
        }
    }
}

/// What a dispatched action did to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Applied {
    Added(Transaction),
    /// `None` when the id was not in the ledger.
    Deleted(Option<Transaction>),
    /// The new record, or `None` when the id was not in the ledger.
    Replaced(Option<Transaction>),
}

impl Applied {
    pub(crate) fn changed(&self) -> bool {
        match self {
            Self::Added(_) => true,
            Self::Deleted(t) | Self::Replaced(t) => t.is_some(),
        }
    }
}
