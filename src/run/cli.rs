use anyhow::{Context, Result};
use std::path::Path;

use super::{shellexpand, today, Session, ViewQuery};
use crate::aggregate::{self, DateRange, SortKey, SortOrder, Summary};
use crate::ledger::{Applied, LedgerAction};
use crate::models::{parse_amount, parse_date, Transaction, TransactionId, TransactionInput};
use crate::ui::util::{format_amount, format_date, truncate};

pub(crate) fn as_cli(args: &[String], session: &mut Session) -> Result<()> {
    match args[1].as_str() {
        "add" | "a" => cli_add(&args[2..], session),
        "delete" | "rm" => cli_delete(&args[2..], session),
        "list" | "ls" => cli_list(&args[2..], session),
        "summary" | "s" => cli_summary(&args[2..], session),
        "export" => cli_export(&args[2..], session),
        "import" => cli_import(&args[2..], session),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("tally {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Tally - local-only income and expense ledger");
    println!();
    println!("Usage: tally [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  add <text> <amount>           Record a transaction (negative = expense)");
    println!("    --date <YYYY-MM-DD>         Date of the transaction");
    println!("    --category <name>           Category (default: auto-detected)");
    println!("    --method <name>             Payment method");
    println!("    --tag <tag>                 Tag, may be repeated");
    println!("  delete <id>                   Delete a transaction");
    println!("  list                          List transactions");
    println!("    --range <day|week|month|year|all>");
    println!("    --search <text>             Only matching descriptions");
    println!("    --sort <date|amount|name>   Sort key (default: date)");
    println!("    --order <asc|desc>          Sort order (default: desc)");
    println!("    --limit <n>                 Show at most n rows");
    println!("  summary [--range <range>]     Print balance, income, expenses");
    println!("  export [path]                 Export transactions to CSV");
    println!("  import <file.csv>             Import transactions from CSV");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

// ── Argument helpers ─────────────────────────────────────────

/// Split args into positionals and `--flag value` pairs. Every flag takes a
/// value; repeated flags are kept in order.
fn split_flags(args: &[String]) -> Result<(Vec<&str>, Vec<(&str, &str)>)> {
    let mut positional = Vec::new();
    let mut flags = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        // Single-dash args such as `-4.50` are amounts, not flags.
        if arg.starts_with("--") {
            let value = iter
                .next()
                .with_context(|| format!("Missing value for {arg}"))?;
            flags.push((arg.as_str(), value.as_str()));
        } else {
            positional.push(arg.as_str());
        }
    }
    Ok((positional, flags))
}

fn flag<'a>(flags: &[(&str, &'a str)], name: &str) -> Option<&'a str> {
    flags
        .iter()
        .rev()
        .find(|(f, _)| *f == name)
        .map(|(_, v)| *v)
}

fn check_flags(flags: &[(&str, &str)], allowed: &[&str]) -> Result<()> {
    if let Some((unknown, _)) = flags.iter().find(|(f, _)| !allowed.contains(f)) {
        anyhow::bail!("Unknown option: {unknown}");
    }
    Ok(())
}

fn parse_range(flags: &[(&str, &str)], session: &Session) -> Result<DateRange> {
    match flag(flags, "--range") {
        Some(raw) => DateRange::parse(raw).with_context(|| format!("Unknown range: {raw}")),
        None => Ok(session.config.default_range()),
    }
}

// ── Commands ─────────────────────────────────────────────────

fn cli_add(args: &[String], session: &mut Session) -> Result<()> {
    let (positional, flags) = split_flags(args)?;
    check_flags(&flags, &["--date", "--category", "--method", "--tag"])?;
    let [text, amount] = positional.as_slice() else {
        anyhow::bail!("Usage: tally add <text> <amount> [--date YYYY-MM-DD] [--category C]");
    };

    let mut input = TransactionInput::new(*text, parse_amount(amount)?);
    if let Some(raw) = flag(&flags, "--date") {
        let date = parse_date(raw).with_context(|| format!("Invalid date: {raw}"))?;
        input = input.with_date(date);
    }
    if let Some(category) = flag(&flags, "--category") {
        input = input.with_category(category);
    }
    if let Some(method) = flag(&flags, "--method") {
        input = input.with_payment_method(method);
    }
    input = input.with_tags(
        flags
            .iter()
            .filter(|(f, _)| *f == "--tag")
            .map(|(_, v)| *v),
    );

    let txn = session.add(input)?;
    println!(
        "Added #{} {} {} [{}]",
        txn.id,
        txn.text,
        format_amount(txn.amount),
        txn.category_or_default()
    );
    Ok(())
}

fn cli_delete(args: &[String], session: &mut Session) -> Result<()> {
    let raw = args
        .first()
        .context("Usage: tally delete <id>")?;
    let id: TransactionId = raw
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid id: {raw}"))?;

    match session.apply(LedgerAction::Delete(id))? {
        Applied::Deleted(Some(txn)) => println!("Deleted #{} {}", txn.id, txn.text),
        _ => println!("No transaction #{id}"),
    }
    Ok(())
}

fn cli_list(args: &[String], session: &Session) -> Result<()> {
    let (_, flags) = split_flags(args)?;
    check_flags(
        &flags,
        &["--range", "--search", "--sort", "--order", "--limit"],
    )?;

    let mut query = ViewQuery {
        range: parse_range(&flags, session)?,
        search: flag(&flags, "--search").unwrap_or_default().to_string(),
        ..ViewQuery::default()
    };
    if let Some(raw) = flag(&flags, "--sort") {
        query.sort = SortKey::parse(raw).with_context(|| format!("Unknown sort key: {raw}"))?;
    }
    if let Some(raw) = flag(&flags, "--order") {
        query.order = SortOrder::parse(raw).with_context(|| format!("Unknown order: {raw}"))?;
    }
    if let Some(raw) = flag(&flags, "--limit") {
        query.limit = Some(raw.parse().with_context(|| format!("Invalid limit: {raw}"))?);
    }

    let rows = query.apply(session.ledger.transactions(), today());
    if rows.is_empty() {
        println!("No transactions");
        return Ok(());
    }
    print_table(&rows);
    Ok(())
}

fn print_table(rows: &[Transaction]) {
    println!(
        "{:<6} {:<10} {:<28} {:>12} {:<16} Method",
        "ID", "Date", "Description", "Amount", "Category"
    );
    println!("{}", "─".repeat(84));
    for txn in rows {
        println!(
            "{:<6} {:<10} {:<28} {:>12} {:<16} {}",
            txn.id,
            format_date(txn.date),
            truncate(&txn.text, 28),
            format_amount(txn.amount),
            truncate(txn.category_or_default(), 16),
            txn.payment_method.as_deref().unwrap_or(""),
        );
    }
}

fn cli_summary(args: &[String], session: &Session) -> Result<()> {
    let (_, flags) = split_flags(args)?;
    check_flags(&flags, &["--range"])?;
    let range = parse_range(&flags, session)?;

    let txns = aggregate::filter_by_date_range(session.ledger.transactions(), range, today());
    let summary = Summary::of(&txns);

    println!("Tally - {range}");
    println!("{}", "─".repeat(40));
    println!("  Balance:    {}", format_amount(summary.balance));
    println!(
        "  Income:     {} ({} txns)",
        format_amount(summary.income),
        summary.income_count
    );
    println!(
        "  Expenses:   {} ({} txns)",
        format_amount(summary.expense),
        summary.expense_count
    );
    println!("  Total Txns: {}", summary.count);

    if !summary.by_category.is_empty() {
        println!();
        println!("Spending by Category:");
        for (name, amount) in &summary.by_category {
            println!("  {name:<24} {}", format_amount(*amount));
        }
    }
    Ok(())
}

fn cli_export(args: &[String], session: &Session) -> Result<()> {
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/tally-export-{}.csv", today().format("%Y-%m-%d"))
        });

    let count = crate::csv_io::write_csv(Path::new(&output_path), session.ledger.transactions())?;
    if session.ledger.is_empty() {
        println!("No transactions; wrote header only to {output_path}");
    } else {
        println!("Exported {count} transactions to {output_path}");
    }
    Ok(())
}

fn cli_import(args: &[String], session: &mut Session) -> Result<()> {
    let file_path = args
        .first()
        .context("Usage: tally import <file.csv>")?;
    let expanded = shellexpand(file_path);
    let path = Path::new(&expanded);
    if !path.exists() {
        anyhow::bail!("File not found: {file_path}");
    }

    let records = crate::csv_io::read_csv(path)?;
    let count = session.import(records)?;
    println!("Imported {count} transactions");
    Ok(())
}
