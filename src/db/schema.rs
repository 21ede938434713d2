pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

-- Ids come from the ledger's counter, never from SQLite.
CREATE TABLE IF NOT EXISTS transactions (
    id              INTEGER PRIMARY KEY,
    text            TEXT NOT NULL,
    amount          TEXT NOT NULL,
    date            TEXT,
    category        TEXT,
    payment_method  TEXT
);

CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category);

CREATE TABLE IF NOT EXISTS transaction_tags (
    transaction_id  INTEGER NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
    position        INTEGER NOT NULL,
    tag             TEXT NOT NULL,
    PRIMARY KEY (transaction_id, position)
);

CREATE TABLE IF NOT EXISTS ledger_meta (
    key    TEXT PRIMARY KEY,
    value  INTEGER NOT NULL
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[];

pub(crate) const NEXT_ID_KEY: &str = "next_id";
