use thiserror::Error;

use crate::models::TransactionId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum LedgerError {
    #[error("transaction text must not be empty")]
    EmptyText,

    #[error("amount must be a finite number, got '{0}'")]
    NonFiniteAmount(String),

    #[error("'{0}' is not a valid amount")]
    InvalidAmount(String),

    #[error("amount {0} is outside the supported range of ±{max}", max = super::MAX_AMOUNT)]
    AmountOutOfRange(rust_decimal::Decimal),

    #[error("duplicate transaction id #{0}")]
    DuplicateId(TransactionId),
}

impl LedgerError {
    /// True for input that was rejected before touching the ledger.
    pub(crate) fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyText
                | Self::NonFiniteAmount(_)
                | Self::InvalidAmount(_)
                | Self::AmountOutOfRange(_)
        )
    }
}
