mod cli;
mod tui;

pub(crate) use cli::as_cli;
pub(crate) use tui::as_tui;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::aggregate::{self, DateRange, SortKey, SortOrder};
use crate::categorize::Categorizer;
use crate::config::AppConfig;
use crate::csv_io::TransactionRecord;
use crate::db::Database;
use crate::ledger::{Applied, Ledger, LedgerAction};
use crate::models::{Transaction, TransactionInput};

/// Owns the ledger for the lifetime of a run, together with the database
/// that mirrors it. Both front ends mutate only through [`Session::apply`].
pub(crate) struct Session {
    pub(crate) ledger: Ledger,
    pub(crate) db: Database,
    pub(crate) config: AppConfig,
    categorizer: Categorizer,
}

/// Which slice of the ledger to show, and in what order.
#[derive(Debug, Clone, Default)]
pub(crate) struct ViewQuery {
    pub(crate) range: DateRange,
    pub(crate) search: String,
    pub(crate) sort: SortKey,
    pub(crate) order: SortOrder,
    pub(crate) limit: Option<usize>,
}

impl ViewQuery {
    pub(crate) fn apply(&self, txns: &[Transaction], today: NaiveDate) -> Vec<Transaction> {
        let in_range = aggregate::filter_by_date_range(txns, self.range, today);
        let matched = aggregate::search(&in_range, &self.search);
        let sorted = aggregate::sort_by(&matched, self.sort, self.order);
        match self.limit {
            Some(n) => aggregate::limit(&sorted, n),
            None => sorted,
        }
    }
}

impl Session {
    pub(crate) fn new(db: Database, config: AppConfig) -> Result<Self> {
        let ledger = db.load_ledger()?;
        let (categorizer, bad_patterns) = Categorizer::with_user_rules(&config.category_rules);
        for pattern in &bad_patterns {
            warn!(pattern = %pattern, "skipping invalid category rule");
        }
        info!(count = ledger.len(), "session started");
        Ok(Self {
            ledger,
            db,
            config,
            categorizer,
        })
    }

    /// Dispatch to a staged copy of the ledger and mirror the result to disk.
    /// The live ledger only changes once the write has succeeded.
    pub(crate) fn apply(&mut self, action: LedgerAction) -> Result<Applied> {
        let mut staged = self.ledger.clone();
        let applied = staged.dispatch(action)?;
        self.db.persist(&applied, &staged)?;
        self.ledger = staged;
        Ok(applied)
    }

    pub(crate) fn add(&mut self, mut input: TransactionInput) -> Result<Transaction> {
        self.fill_category(&mut input);
        match self.apply(LedgerAction::Add(input))? {
            Applied::Added(txn) => Ok(txn),
            other => anyhow::bail!("Unexpected result for add: {other:?}"),
        }
    }

    /// Add every record, or none of them. Rows are applied in reverse file
    /// order, so the first row of the file becomes the newest transaction.
    pub(crate) fn import(&mut self, records: Vec<TransactionRecord>) -> Result<usize> {
        let renumbered = records.iter().filter(|r| r.id.is_some()).count();
        if renumbered > 0 {
            debug!(renumbered, "ids from the file are replaced with fresh ones");
        }
        let mut inputs: Vec<TransactionInput> = records.into_iter().map(|r| r.input).collect();
        if self.config.auto_categorize {
            let filled = self.categorizer.categorize_batch(&mut inputs);
            info!(filled, "auto-categorized imported transactions");
        }

        let mut staged = self.ledger.clone();
        for input in inputs.into_iter().rev() {
            staged.dispatch(LedgerAction::Add(input))?;
        }
        let added = staged.len() - self.ledger.len();
        self.db.save_ledger(&staged)?;
        self.ledger = staged;
        info!(added, "imported transactions");
        Ok(added)
    }

    fn fill_category(&self, input: &mut TransactionInput) {
        if self.config.auto_categorize && input.category.is_none() {
            if let Some(category) = self.categorizer.suggest(&input.text) {
                input.category = Some(category.to_string());
            }
        }
    }
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Expand a leading `~/` to the home directory.
pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
