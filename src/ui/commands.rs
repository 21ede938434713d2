use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use tracing::warn;

use super::app::{App, InputMode, PendingAction, Screen};
use crate::aggregate::{DateRange, SortKey, SortOrder};
use crate::ledger::{Applied, LedgerAction, LedgerError};
use crate::models::{parse_amount, parse_date, TransactionId, TransactionInput};
use crate::run::{shellexpand, Session};
use crate::ui::util::format_amount;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Session) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($registry:expr, $desc:expr, $func:expr, $($name:expr),+) => {{
        $(
            $registry.insert(
                $name,
                Command {
                    description: $desc,
                    run: $func,
                },
            );
        )+
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!(r, "Quit Tally", cmd_quit, "quit", "q");
    register_command!(r, "Show available commands", cmd_help, "help", "h");
    register_command!(r, "Go to Dashboard", cmd_dashboard, "dashboard", "d");
    register_command!(r, "Go to Transactions", cmd_transactions, "transactions", "t");
    register_command!(
        r,
        "Add transaction (e.g. :add [2024-01-15] Coffee -4.50)",
        cmd_add,
        "add",
        "a"
    );
    register_command!(
        r,
        "Delete selected transaction, or by id (e.g. :delete 12)",
        cmd_delete,
        "delete",
        "del"
    );
    register_command!(
        r,
        "Replace selected transaction (e.g. :edit Groceries -52.10)",
        cmd_edit,
        "edit",
        "e"
    );
    register_command!(
        r,
        "Sort transactions (e.g. :sort amount asc)",
        cmd_sort,
        "sort"
    );
    register_command!(
        r,
        "Date range: day, week, month, year, all",
        cmd_range,
        "range",
        "r"
    );
    register_command!(
        r,
        "Search transactions (e.g. :search coffee)",
        cmd_search,
        "search",
        "s"
    );
    register_command!(
        r,
        "Export transactions to CSV (e.g. :export ~/tally.csv)",
        cmd_export,
        "export"
    );
    register_command!(
        r,
        "Import transactions from CSV (e.g. :import ~/tally.csv)",
        cmd_import,
        "import"
    );

    r
});

/// Run one `:` command line. Failures are reported in the status bar rather
/// than ending the session.
pub(crate) fn handle_command(input: &str, app: &mut App, session: &mut Session) {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        if let Err(e) = (cmd.run)(args, app, session) {
            let invalid = e
                .downcast_ref::<LedgerError>()
                .is_some_and(LedgerError::is_validation);
            if invalid {
                app.set_status(format!("Invalid: {e}"));
            } else {
                warn!(command = cmd_name, error = %format!("{e:#}"), "command failed");
                app.set_status(format!("Error: {e:#}"));
            }
        }
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// `[date] <text...> <amount>`: the last word is the amount, and a leading
/// word that parses as a date is taken as the date.
pub(crate) fn parse_add_args(args: &str) -> anyhow::Result<TransactionInput> {
    let Some((rest, amount)) = args.trim().rsplit_once(' ') else {
        anyhow::bail!("Usage: :add [YYYY-MM-DD] <text> <amount>");
    };
    let amount = parse_amount(amount)?;

    let rest = rest.trim();
    let (first, tail) = rest.split_once(' ').unwrap_or((rest, ""));
    let (date, text) = match parse_date(first) {
        Some(date) => (Some(date), tail.trim()),
        None => (None, rest),
    };
    if text.is_empty() {
        anyhow::bail!(LedgerError::EmptyText);
    }

    let input = TransactionInput::new(text, amount);
    Ok(match date {
        Some(date) => input.with_date(date),
        None => input,
    })
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_dashboard(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.screen = Screen::Dashboard;
    Ok(())
}

fn cmd_transactions(_args: &str, app: &mut App, _session: &mut Session) -> anyhow::Result<()> {
    app.screen = Screen::Transactions;
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let input = parse_add_args(args)?;
    let txn = session.add(input)?;
    app.refresh(&session.ledger);
    app.set_status(format!(
        "Added #{} {} {} [{}]",
        txn.id,
        txn.text,
        format_amount(txn.amount),
        txn.category_or_default()
    ));
    Ok(())
}

fn cmd_delete(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if args.is_empty() {
        if app.screen != Screen::Transactions {
            app.set_status("Navigate to Transactions and select one first");
            return Ok(());
        }
        app.request_delete_selected();
        return Ok(());
    }

    let id: TransactionId = args
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid id: {args}"))?;
    match session.ledger.get(id) {
        Some(txn) => {
            app.confirm_message = format!("Delete #{id} '{}'?", txn.text);
            app.pending_action = Some(PendingAction::DeleteTransaction {
                id,
                text: txn.text.clone(),
            });
            app.input_mode = InputMode::Confirm;
        }
        None => app.set_status(format!("No transaction #{id}")),
    }
    Ok(())
}

/// Replace the selected record. Text and amount come from the arguments; the
/// old date, category, payment method and tags carry over, and a leading date
/// overrides the old one.
fn cmd_edit(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if app.screen != Screen::Transactions {
        app.set_status("Navigate to Transactions and select one first");
        return Ok(());
    }
    let Some(old) = app.selected().cloned() else {
        app.set_status("No transaction selected");
        return Ok(());
    };
    if args.is_empty() {
        app.command_input = format!("edit {} {}", old.text, old.amount);
        app.input_mode = InputMode::Command;
        return Ok(());
    }

    let parsed = parse_add_args(args)?;
    let mut input = old.to_input();
    input.text = parsed.text;
    input.amount = parsed.amount;
    if parsed.date.is_some() {
        input.date = parsed.date;
    }

    match session.apply(LedgerAction::Replace(old.id, input))? {
        Applied::Replaced(Some(txn)) => {
            app.refresh(&session.ledger);
            app.set_status(format!(
                "Updated #{} {} {}",
                txn.id,
                txn.text,
                format_amount(txn.amount)
            ));
        }
        _ => app.set_status(format!("No transaction #{}", old.id)),
    }
    Ok(())
}

fn cmd_sort(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let mut words = args.split_whitespace();
    let Some(key) = words.next() else {
        app.query.order = app.query.order.flip();
        app.refresh(&session.ledger);
        app.set_status(format!(
            "Sorted by {} {}",
            app.query.sort.as_str(),
            app.query.order.as_str()
        ));
        return Ok(());
    };

    let key = SortKey::parse(key)
        .ok_or_else(|| anyhow::anyhow!("Unknown sort key: {key} (date, amount, name)"))?;
    let order = match words.next() {
        Some(raw) => SortOrder::parse(raw)
            .ok_or_else(|| anyhow::anyhow!("Unknown order: {raw} (asc, desc)"))?,
        None => app.query.order,
    };

    app.query.sort = key;
    app.query.order = order;
    app.reset_cursor();
    app.refresh(&session.ledger);
    app.set_status(format!("Sorted by {} {}", key.as_str(), order.as_str()));
    Ok(())
}

fn cmd_range(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let range = if args.is_empty() {
        app.query.range.next()
    } else {
        DateRange::parse(args)
            .ok_or_else(|| anyhow::anyhow!("Unknown range: {args} (day, week, month, year, all)"))?
    };
    app.query.range = range;
    app.reset_cursor();
    app.refresh(&session.ledger);
    app.set_status(format!("Range: {range}"));
    Ok(())
}

fn cmd_search(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    app.query.search = args.to_string();
    app.screen = Screen::Transactions;
    app.reset_cursor();
    app.refresh(&session.ledger);
    if args.is_empty() {
        app.set_status("Search cleared");
    } else {
        app.set_status(format!("{} matches for '{args}'", app.transactions.len()));
    }
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/tally-export-{}.csv", app.today.format("%Y-%m-%d"))
    } else {
        shellexpand(args)
    };

    let count = crate::csv_io::write_csv(Path::new(&path), session.ledger.transactions())?;
    if count == 0 {
        app.set_status(format!("No transactions; wrote header only to {path}"));
    } else {
        app.set_status(format!("Exported {count} transactions to {path}"));
    }
    Ok(())
}

fn cmd_import(args: &str, app: &mut App, session: &mut Session) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :import <file.csv>");
        return Ok(());
    }
    let path = shellexpand(args);
    let records = crate::csv_io::read_csv(Path::new(&path))?;
    let count = session.import(records)?;
    app.refresh(&session.ledger);
    app.set_status(format!("Imported {count} transactions from {path}"));
    Ok(())
}
