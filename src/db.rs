// 🗄️ Storage handle - SQLite file + connection-per-operation
//
// Every public operation opens its own connection, runs inside one
// transaction, and drops the connection on every exit path.

use crate::entities::Category;
use crate::error::{Error, Result};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Fixture rows inserted when the directory is first created empty
pub const STARTER_BUSINESSES: [(&str, Category, &str); 6] = [
    ("Sunrise Café", Category::Food, "Buy 1 breakfast, get 2nd 50% off"),
    ("Corner Book Nook", Category::Retail, "10% off local authors"),
    ("Sparkle Cleaners", Category::Services, "First shirt pressed for free"),
    ("Green Leaf Market", Category::Food, "Free fruit sample with purchase"),
    ("TechFix Repair", Category::Services, "Free diagnostics for laptops"),
    ("Tiny Treasures Gifts", Category::Retail, "Free gift wrapping this week"),
];

/// Handle to the directory database file.
///
/// Holds no open connection; cloning it is free.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Point at a database file, creating its parent directory if needed.
    /// The file itself is created on first connection.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| Error::StorageLocation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        Ok(Database { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        // SQLite leaves foreign keys off per connection; cascade deletes need them
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    /// Run `op` in an IMMEDIATE transaction. Commits on `Ok`; the transaction
    /// rolls back when dropped on `Err`.
    pub(crate) fn write<T>(&self, op: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = op(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Run `op` in a deferred transaction so every query sees one snapshot.
    pub(crate) fn read<T>(&self, op: impl FnOnce(&Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let value = op(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Create both tables if absent. Does not seed.
    pub fn create_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        // WAL for crash recovery; must be set outside a transaction
        conn.pragma_update(None, "journal_mode", "WAL")?;
        create_tables(&conn)
    }

    /// Idempotent bootstrap: ensure the schema exists and seed the starter
    /// businesses when the directory is empty. Returns how many rows were seeded.
    pub fn initialize(&self) -> Result<usize> {
        self.create_schema()?;

        let seeded = self.write(|tx| {
            let count: i64 = tx.query_row("SELECT COUNT(*) FROM businesses", [], |row| row.get(0))?;
            if count > 0 {
                return Ok(0);
            }

            let mut stmt =
                tx.prepare("INSERT INTO businesses (name, category, deal_text) VALUES (?1, ?2, ?3)")?;
            for (name, category, deal_text) in STARTER_BUSINESSES {
                stmt.execute(params![name, category, deal_text])?;
            }
            Ok(STARTER_BUSINESSES.len())
        })?;

        if seeded > 0 {
            info!(seeded, path = %self.path.display(), "seeded starter businesses");
        } else {
            debug!(path = %self.path.display(), "directory already initialized");
        }

        Ok(seeded)
    }
}

fn create_tables(conn: &Connection) -> Result<()> {
    // ==========================================================================
    // Businesses (rating columns are derived from reviews)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS businesses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            category TEXT NOT NULL,
            deal_text TEXT NOT NULL,
            average_rating REAL NOT NULL DEFAULT 0.0,
            review_count INTEGER NOT NULL DEFAULT 0,
            is_favorite INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    // ==========================================================================
    // Reviews (append-only, cascade with their business)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            business_id INTEGER NOT NULL,
            rating INTEGER NOT NULL,
            text TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY (business_id) REFERENCES businesses (id)
                ON DELETE CASCADE
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_reviews_business ON reviews(business_id)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Database;
    use tempfile::TempDir;

    /// Fresh database file with the schema but no rows.
    /// Keep the `TempDir` alive for as long as the database is used.
    pub fn empty_database() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("town_square.db")).unwrap();
        db.create_schema().unwrap();
        (dir, db)
    }

    /// Fresh database file bootstrapped with the starter businesses
    pub fn seeded_database() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::open(dir.path().join("town_square.db")).unwrap();
        db.initialize().unwrap();
        (dir, db)
    }
}
