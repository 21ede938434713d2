use chrono::NaiveDate;

use crate::aggregate::{self, Summary};
use crate::ledger::Ledger;
use crate::models::{Transaction, TransactionId};
use crate::run::ViewQuery;
use crate::ui::util::clamp_cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Transactions]
    }

    pub(crate) fn next(&self) -> Self {
        match self {
            Self::Dashboard => Self::Transactions,
            Self::Transactions => Self::Dashboard,
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Transactions"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: TransactionId, text: String },
}

/// Screen state derived from the ledger. Nothing here is authoritative; it is
/// rebuilt by [`App::refresh`] after every change.
pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) today: NaiveDate,

    // Filter, search and sort for the transactions table. The search term
    // lives in `query.search` and is edited live from `/`.
    pub(crate) query: ViewQuery,

    // Dashboard
    pub(crate) summary: Summary,
    pub(crate) recent: Vec<Transaction>,
    pub(crate) recent_limit: usize,

    // Transactions
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,
    pub(crate) total_count: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(query: ViewQuery, recent_limit: usize, today: NaiveDate) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            today,

            query,

            summary: Summary::of(&[]),
            recent: Vec::new(),
            recent_limit,

            transactions: Vec::new(),
            transaction_index: 0,
            transaction_scroll: 0,
            total_count: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    /// Recompute every derived view from the ledger.
    pub(crate) fn refresh(&mut self, ledger: &Ledger) {
        let txns = ledger.transactions();
        let in_range = aggregate::filter_by_date_range(txns, self.query.range, self.today);
        self.summary = Summary::of(&in_range);
        // Ledger order is newest first already.
        self.recent = aggregate::limit(&in_range, self.recent_limit);
        self.transactions = self.query.apply(txns, self.today);
        self.total_count = ledger.len();
        clamp_cursor(
            &mut self.transaction_index,
            &mut self.transaction_scroll,
            self.transactions.len(),
        );
    }

    pub(crate) fn selected(&self) -> Option<&Transaction> {
        self.transactions.get(self.transaction_index)
    }

    /// Ask for confirmation before deleting the highlighted transaction.
    pub(crate) fn request_delete_selected(&mut self) {
        let Some(txn) = self.selected() else {
            self.set_status("No transaction selected");
            return;
        };
        let (id, text) = (txn.id, txn.text.clone());
        self.confirm_message = format!("Delete #{id} '{text}'?");
        self.pending_action = Some(PendingAction::DeleteTransaction { id, text });
        self.input_mode = InputMode::Confirm;
    }

    pub(crate) fn reset_cursor(&mut self) {
        self.transaction_index = 0;
        self.transaction_scroll = 0;
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}
