mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Transaction as SqlTransaction};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::ledger::{Applied, Ledger};
use crate::models::{Transaction, TransactionId};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite-backed storage for a [`Ledger`]. The ledger stays the source of
/// truth; this only mirrors what it applied.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        info!(path = %path.display(), "database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .optional()?
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Ledger ────────────────────────────────────────────────

    /// Rebuild the ledger, newest first, with the saved id counter.
    pub(crate) fn load_ledger(&self) -> Result<Ledger> {
        let mut tags = self.load_tags()?;

        let mut stmt = self.conn.prepare(
            "SELECT id, text, amount, date, category, payment_method
             FROM transactions ORDER BY id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StoredRow {
                id: row.get(0)?,
                text: row.get(1)?,
                amount: row.get(2)?,
                date: row.get(3)?,
                category: row.get(4)?,
                payment_method: row.get(5)?,
            })
        })?;

        let mut txns = Vec::new();
        for row in rows {
            let row = row?;
            let id = row.id;
            let mut txn = row.into_transaction()?;
            txn.tags = tags.remove(&id).unwrap_or_default();
            txns.push(txn);
        }

        let next_id = self.next_id()?;
        let ledger = Ledger::from_parts(txns, next_id).context("Stored ledger is inconsistent")?;
        debug!(count = ledger.len(), next_id = ledger.next_id(), "ledger loaded");
        Ok(ledger)
    }

    /// Replace everything on disk with the ledger's current contents.
    pub(crate) fn save_ledger(&mut self, ledger: &Ledger) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM transaction_tags", [])?;
        tx.execute("DELETE FROM transactions", [])?;
        for txn in ledger.transactions() {
            write_transaction(&tx, txn)?;
        }
        write_next_id(&tx, ledger.next_id())?;
        tx.commit()?;
        debug!(count = ledger.len(), "ledger saved");
        Ok(())
    }

    /// Mirror a single applied action. `ledger` is the state after applying it.
    pub(crate) fn persist(&mut self, applied: &Applied, ledger: &Ledger) -> Result<()> {
        let tx = self.conn.transaction()?;
        match applied {
            Applied::Added(txn) | Applied::Replaced(Some(txn)) => {
                delete_row(&tx, txn.id)?;
                write_transaction(&tx, txn)?;
            }
            Applied::Deleted(Some(txn)) => delete_row(&tx, txn.id)?,
            Applied::Deleted(None) | Applied::Replaced(None) => {}
        }
        write_next_id(&tx, ledger.next_id())?;
        tx.commit()?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> Result<()> {
        Ok(self.conn.execute_batch(sql)?)
    }

    #[cfg(test)]
    pub(crate) fn transaction_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    fn next_id(&self) -> Result<u64> {
        let value: Option<i64> = self
            .conn
            .query_row(
                "SELECT value FROM ledger_meta WHERE key = ?1",
                params![schema::NEXT_ID_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.map_or(1, |v| u64::try_from(v).unwrap_or(1)))
    }

    fn load_tags(&self) -> Result<HashMap<i64, Vec<String>>> {
        let mut stmt = self.conn.prepare(
            "SELECT transaction_id, tag FROM transaction_tags ORDER BY transaction_id, position",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;

        let mut tags: HashMap<i64, Vec<String>> = HashMap::new();
        for row in rows {
            let (id, tag) = row?;
            tags.entry(id).or_default().push(tag);
        }
        Ok(tags)
    }
}

struct StoredRow {
    id: i64,
    text: String,
    amount: String,
    date: Option<String>,
    category: Option<String>,
    payment_method: Option<String>,
}

impl StoredRow {
    fn into_transaction(self) -> Result<Transaction> {
        let id = u64::try_from(self.id)
            .with_context(|| format!("Invalid transaction id {}", self.id))?;
        let amount = Decimal::from_str(&self.amount)
            .with_context(|| format!("Transaction #{id}: bad amount '{}'", self.amount))?;
        let date = self
            .date
            .map(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT))
            .transpose()
            .with_context(|| format!("Transaction #{id}: bad date"))?;

        Ok(Transaction {
            id: TransactionId(id),
            text: self.text,
            amount,
            date,
            category: self.category,
            payment_method: self.payment_method,
            tags: Vec::new(),
        })
    }
}

fn sql_id(id: TransactionId) -> Result<i64> {
    i64::try_from(id.0).with_context(|| format!("Transaction id {id} does not fit in SQLite"))
}

fn write_transaction(tx: &SqlTransaction<'_>, txn: &Transaction) -> Result<()> {
    let id = sql_id(txn.id)?;
    tx.execute(
        "INSERT INTO transactions (id, text, amount, date, category, payment_method)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            id,
            txn.text,
            txn.amount.to_string(),
            txn.date.map(|d| d.format(DATE_FORMAT).to_string()),
            txn.category,
            txn.payment_method,
        ],
    )?;
    for (position, tag) in txn.tags.iter().enumerate() {
        tx.execute(
            "INSERT INTO transaction_tags (transaction_id, position, tag) VALUES (?1, ?2, ?3)",
            params![id, position as i64, tag],
        )?;
    }
    Ok(())
}

fn delete_row(tx: &SqlTransaction<'_>, id: TransactionId) -> Result<()> {
    let id = sql_id(id)?;
    tx.execute("DELETE FROM transaction_tags WHERE transaction_id = ?1", params![id])?;
    tx.execute("DELETE FROM transactions WHERE id = ?1", params![id])?;
    Ok(())
}

fn write_next_id(tx: &SqlTransaction<'_>, next_id: u64) -> Result<()> {
    let value = i64::try_from(next_id).context("Id counter overflow")?;
    tx.execute(
        "INSERT INTO ledger_meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![schema::NEXT_ID_KEY, value],
    )?;
    Ok(())
}
