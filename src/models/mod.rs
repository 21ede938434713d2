mod transaction;

pub(crate) use transaction::{
    parse_amount, parse_date, Transaction, TransactionId, TransactionInput, UNCATEGORIZED,
};
