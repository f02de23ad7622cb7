//! SQLite implementation using rusqlite (synchronous).
//!
//! Each account is one row in `accounts`; its inventory and pull history
//! live in child tables that are rewritten together with the account row
//! inside a single transaction.

use crate::auth;
use crate::repository::*;
use crate::types::*;
use chrono::{DateTime, Utc};
use gacha::{Account, AccountStore, Item, PullResult, StoreError};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;

/// Default database location
pub const DEFAULT_DB_PATH: &str = "share/gacha.db";

const ADMIN_PASSWORD_KEY: &str = "admin_password_hash";

/// SQLite-backed account database
pub struct SqliteDb {
    conn: Connection,
}

fn to_sql_int(value: u64, what: &str) -> RepoResult<i64> {
    i64::try_from(value).map_err(|_| RepoError::Corrupt(format!("{what} out of range: {value}")))
}

fn from_sql_int<T: TryFrom<i64>>(value: i64, what: &str) -> RepoResult<T> {
    T::try_from(value).map_err(|_| RepoError::Corrupt(format!("{what} out of range: {value}")))
}

fn parse_timestamp(value: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| RepoError::Corrupt(format!("bad timestamp {value:?}: {e}")))
}

impl SqliteDb {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Get a setting value
    pub fn get_setting(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Set a setting value
    pub fn set_setting(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn load_inventory(&self, username: &str) -> RepoResult<BTreeMap<String, u32>> {
        let mut stmt = self
            .conn
            .prepare("SELECT item_id, count FROM inventory WHERE username = ?1")?;
        let rows = stmt
            .query_map(params![username], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(item_id, count)| -> RepoResult<(String, u32)> {
                Ok((item_id, from_sql_int(count, "inventory count")?))
            })
            .collect()
    }

    fn load_history(&self, username: &str) -> RepoResult<VecDeque<PullResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT item_id, item_name, rarity, weight, pulled_at, guaranteed
             FROM history WHERE username = ?1 ORDER BY position",
        )?;
        let rows = stmt
            .query_map(params![username], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, bool>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, name, rarity, weight, pulled_at, guaranteed)| -> RepoResult<PullResult> {
                Ok(PullResult {
                    item: Item::new(&id, &name, from_sql_int(rarity, "rarity")?, weight),
                    pulled_at: parse_timestamp(&pulled_at)?,
                    guaranteed,
                })
            })
            .collect()
    }
}

impl SqliteDb {
    /// Check if a migration has been applied
    fn is_migration_applied(&self, version: &str) -> RepoResult<bool> {
        let result: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM schema_migrations WHERE version = ?1",
                params![version],
                |row| row.get(0),
            )
            .optional()?;
        Ok(result.is_some())
    }

    /// Mark a migration as applied
    fn mark_migration_applied(&self, version: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            params![version],
        )?;
        Ok(())
    }

    /// Run pending migrations
    fn run_migrations(&self) -> RepoResult<()> {
        if !self.is_migration_applied("0001_base_schema")? {
            self.conn.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS accounts (
                    username TEXT PRIMARY KEY NOT NULL,
                    password_hash TEXT NOT NULL,
                    currency INTEGER NOT NULL DEFAULT 0,
                    pity INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS inventory (
                    username TEXT NOT NULL REFERENCES accounts(username) ON DELETE CASCADE,
                    item_id TEXT NOT NULL,
                    count INTEGER NOT NULL,
                    PRIMARY KEY (username, item_id)
                );

                CREATE TABLE IF NOT EXISTS history (
                    username TEXT NOT NULL REFERENCES accounts(username) ON DELETE CASCADE,
                    position INTEGER NOT NULL,
                    item_id TEXT NOT NULL,
                    item_name TEXT NOT NULL,
                    rarity INTEGER NOT NULL,
                    weight REAL NOT NULL,
                    pulled_at TEXT NOT NULL,
                    guaranteed BOOLEAN NOT NULL DEFAULT FALSE,
                    PRIMARY KEY (username, position)
                );

                CREATE TABLE IF NOT EXISTS settings (
                    key TEXT PRIMARY KEY NOT NULL,
                    value TEXT NOT NULL
                );
                "#,
            )?;
            self.mark_migration_applied("0001_base_schema")?;
            tracing::debug!("applied migration 0001_base_schema");
        }

        Ok(())
    }
}

impl AccountsRepository for SqliteDb {
    fn init(&self) -> RepoResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version TEXT PRIMARY KEY NOT NULL,
                applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        self.run_migrations()?;
        auth::ensure_admin_password(self)?;
        Ok(())
    }

    fn create_account(
        &self,
        username: &str,
        password: &str,
        starting_currency: u64,
    ) -> RepoResult<AccountRecord> {
        let username = auth::normalize_username(username)?;
        let account = Account::new(starting_currency);
        let password_hash = auth::hash_password(password);

        let tx = self.conn.unchecked_transaction()?;
        let exists: Option<i64> = tx
            .query_row(
                "SELECT 1 FROM accounts WHERE username = ?1",
                params![username],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(RepoError::UsernameTaken(username.to_string()));
        }

        tx.execute(
            "INSERT INTO accounts (username, password_hash, currency, pity, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                username,
                password_hash,
                to_sql_int(account.currency, "currency")?,
                account.pity,
                account.created_at.to_rfc3339(),
            ],
        )?;
        tx.commit()?;

        tracing::info!(username, currency = starting_currency, "account created");
        Ok(AccountRecord {
            username: username.to_string(),
            password_hash,
            account,
        })
    }

    fn get_record(&self, username: &str) -> RepoResult<Option<AccountRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT username, password_hash, currency, pity, created_at
                 FROM accounts WHERE username = ?1",
                params![username],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((username, password_hash, currency, pity, created_at)) = row else {
            return Ok(None);
        };

        let account = Account {
            currency: from_sql_int(currency, "currency")?,
            pity: from_sql_int(pity, "pity")?,
            inventory: self.load_inventory(&username)?,
            history: self.load_history(&username)?,
            created_at: parse_timestamp(&created_at)?,
        };

        Ok(Some(AccountRecord {
            username,
            password_hash,
            account,
        }))
    }

    fn save_account(&self, username: &str, account: &Account) -> RepoResult<()> {
        let tx = self.conn.unchecked_transaction()?;

        let rows = tx.execute(
            "UPDATE accounts SET currency = ?2, pity = ?3 WHERE username = ?1",
            params![
                username,
                to_sql_int(account.currency, "currency")?,
                account.pity
            ],
        )?;
        if rows == 0 {
            return Err(RepoError::NotFound(username.to_string()));
        }

        tx.execute("DELETE FROM inventory WHERE username = ?1", params![username])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO inventory (username, item_id, count) VALUES (?1, ?2, ?3)",
            )?;
            for (item_id, count) in &account.inventory {
                stmt.execute(params![username, item_id, count])?;
            }
        }

        tx.execute("DELETE FROM history WHERE username = ?1", params![username])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO history
                 (username, position, item_id, item_name, rarity, weight, pulled_at, guaranteed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for (position, result) in account.history.iter().enumerate() {
                stmt.execute(params![
                    username,
                    to_sql_int(position as u64, "history position")?,
                    result.item.id,
                    result.item.name,
                    result.item.rarity,
                    result.item.weight,
                    result.pulled_at.to_rfc3339(),
                    result.guaranteed,
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!(
            username,
            history = account.history.len(),
            inventory = account.inventory.len(),
            "account saved"
        );
        Ok(())
    }

    fn delete_account(&self, username: &str) -> RepoResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM accounts WHERE username = ?1", params![username])?;
        Ok(rows > 0)
    }

    fn list_accounts(&self) -> RepoResult<Vec<AccountSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT a.username, a.currency, a.pity, a.created_at,
                    COALESCE(SUM(i.count), 0)
             FROM accounts a
             LEFT JOIN inventory i ON i.username = a.username
             GROUP BY a.username
             ORDER BY a.username",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(username, currency, pity, created_at, collection)| -> RepoResult<AccountSummary> {
                Ok(AccountSummary {
                    username,
                    currency: from_sql_int(currency, "currency")?,
                    pity: from_sql_int(pity, "pity")?,
                    collection_size: from_sql_int(collection, "collection size")?,
                    created_at: parse_timestamp(&created_at)?,
                })
            })
            .collect()
    }

    fn stats(&self) -> RepoResult<DbStats> {
        let account_count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))?;

        let history_count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;

        let total_currency: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(currency), 0) FROM accounts",
            [],
            |row| row.get(0),
        )?;

        Ok(DbStats {
            account_count,
            history_count,
            total_currency,
        })
    }
}

impl AdminRepository for SqliteDb {
    fn admin_password_hash(&self) -> RepoResult<Option<String>> {
        self.get_setting(ADMIN_PASSWORD_KEY)
    }

    fn set_admin_password_hash(&self, hash: &str) -> RepoResult<()> {
        self.set_setting(ADMIN_PASSWORD_KEY, hash)
    }
}

impl AccountStore for SqliteDb {
    fn get(&self, account_id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.get_record(account_id)?.map(|record| record.account))
    }

    fn put(&self, account_id: &str, account: &Account) -> Result<(), StoreError> {
        Ok(self.save_account(account_id, account)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gacha::{Gacha, GachaConfig, PullCount, RngSource};

    fn setup_db() -> SqliteDb {
        let db = SqliteDb::open_in_memory().unwrap();
        db.init().unwrap();
        db
    }

    fn count_rows(db: &SqliteDb, table: &str) -> i64 {
        db.conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .unwrap()
    }

    #[test]
    fn test_init_creates_tables() {
        let db = setup_db();
        assert_eq!(count_rows(&db, "accounts"), 0);
        assert_eq!(count_rows(&db, "inventory"), 0);
        assert_eq!(count_rows(&db, "history"), 0);
        // Default admin password is seeded
        assert_eq!(count_rows(&db, "settings"), 1);
    }

    #[test]
    fn test_init_is_idempotent() {
        let db = setup_db();
        db.create_account("alice", "pw", 500).unwrap();
        db.init().unwrap();
        assert!(db.get_record("alice").unwrap().is_some());
        assert_eq!(count_rows(&db, "schema_migrations"), 1);
    }

    #[test]
    fn test_create_and_get_account() {
        let db = setup_db();
        let created = db.create_account("  alice ", "hunter2", 500).unwrap();
        assert_eq!(created.username, "alice");
        assert_eq!(created.password_hash, auth::hash_password("hunter2"));

        let record = db.get_record("alice").unwrap().unwrap();
        assert_eq!(record, created);
        assert_eq!(record.account.currency, 500);
        assert_eq!(record.account.pity, 0);
        assert!(record.account.history.is_empty());
    }

    #[test]
    fn test_create_duplicate_account_errors() {
        let db = setup_db();
        db.create_account("alice", "one", 500).unwrap();
        let err = db.create_account(" alice", "two", 10).unwrap_err();
        assert!(matches!(err, RepoError::UsernameTaken(ref name) if name == "alice"));

        // Original credentials kept
        let record = db.get_record("alice").unwrap().unwrap();
        assert_eq!(record.password_hash, auth::hash_password("one"));
        assert_eq!(record.account.currency, 500);
    }

    #[test]
    fn test_create_empty_username_errors() {
        let db = setup_db();
        assert!(matches!(
            db.create_account("   ", "pw", 500),
            Err(RepoError::InvalidUsername)
        ));
        assert_eq!(count_rows(&db, "accounts"), 0);
    }

    #[test]
    fn test_save_round_trips_state() {
        let db = setup_db();
        db.create_account("alice", "pw", 1_000).unwrap();

        let gacha = Gacha::new(GachaConfig::default(), &db).unwrap();
        gacha
            .pull("alice", PullCount::Ten, &mut RngSource::seeded(42))
            .unwrap();
        let expected = gacha.account("alice").unwrap();

        let stored = db.get_record("alice").unwrap().unwrap().account;
        assert_eq!(stored, expected);
        assert_eq!(stored.currency, 100);
        assert_eq!(stored.history.len(), 10);
        assert_eq!(count_rows(&db, "history"), 10);
    }

    #[test]
    fn test_save_unknown_account_errors() {
        let db = setup_db();
        let err = db.save_account("ghost", &Account::new(5)).unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
        assert_eq!(count_rows(&db, "accounts"), 0);
    }

    #[test]
    fn test_save_replaces_children() {
        let db = setup_db();
        db.create_account("alice", "pw", 0).unwrap();

        let mut account = Account::new(0);
        account.inventory.insert("ren".to_string(), 3);
        account.inventory.insert("aiko".to_string(), 1);
        db.save_account("alice", &account).unwrap();
        assert_eq!(count_rows(&db, "inventory"), 2);

        account.inventory.remove("ren");
        db.save_account("alice", &account).unwrap();
        let stored = db.get_record("alice").unwrap().unwrap().account;
        assert_eq!(stored.owned("ren"), 0);
        assert_eq!(stored.owned("aiko"), 1);
        assert_eq!(count_rows(&db, "inventory"), 1);
    }

    #[test]
    fn test_delete_account_cascades() {
        let db = setup_db();
        db.create_account("alice", "pw", 900).unwrap();
        let gacha = Gacha::new(GachaConfig::default(), &db).unwrap();
        gacha
            .pull("alice", PullCount::Ten, &mut RngSource::seeded(1))
            .unwrap();

        assert!(db.delete_account("alice").unwrap());
        assert!(!db.delete_account("alice").unwrap());
        assert_eq!(count_rows(&db, "inventory"), 0);
        assert_eq!(count_rows(&db, "history"), 0);
    }

    #[test]
    fn test_list_accounts() {
        let db = setup_db();
        db.create_account("zoe", "pw", 100).unwrap();
        db.create_account("alice", "pw", 300).unwrap();

        let mut account = Account::new(300);
        account.inventory.insert("ren".to_string(), 2);
        account.inventory.insert("mika".to_string(), 1);
        db.save_account("alice", &account).unwrap();

        let accounts = db.list_accounts().unwrap();
        let names: Vec<_> = accounts.iter().map(|a| a.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "zoe"]);
        assert_eq!(accounts[0].collection_size, 3);
        assert_eq!(accounts[1].collection_size, 0);
        assert_eq!(accounts[1].currency, 100);
    }

    #[test]
    fn test_stats() {
        let db = setup_db();
        db.create_account("alice", "pw", 900).unwrap();
        db.create_account("bob", "pw", 50).unwrap();
        let gacha = Gacha::new(GachaConfig::default(), &db).unwrap();
        gacha
            .pull("alice", PullCount::Single, &mut RngSource::seeded(5))
            .unwrap();

        let stats = db.stats().unwrap();
        assert_eq!(stats.account_count, 2);
        assert_eq!(stats.history_count, 1);
        assert_eq!(stats.total_currency, 850);
    }

    #[test]
    fn test_settings() {
        let db = setup_db();
        assert!(db.get_setting("theme").unwrap().is_none());
        db.set_setting("theme", "dark").unwrap();
        db.set_setting("theme", "light").unwrap();
        assert_eq!(db.get_setting("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_admin_password_seeded_on_init() {
        let db = setup_db();
        assert_eq!(
            db.admin_password_hash().unwrap(),
            Some(auth::hash_password(auth::DEFAULT_ADMIN_PASSWORD))
        );
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gacha.db");

        {
            let db = SqliteDb::open(&path).unwrap();
            db.init().unwrap();
            db.create_account("alice", "pw", 900).unwrap();
            let gacha = Gacha::new(GachaConfig::default(), &db).unwrap();
            gacha
                .pull("alice", PullCount::Ten, &mut RngSource::seeded(11))
                .unwrap();
        }

        let db = SqliteDb::open(&path).unwrap();
        db.init().unwrap();
        let account = db.get_record("alice").unwrap().unwrap().account;
        assert_eq!(account.currency, 0);
        assert_eq!(account.history.len(), 10);
        assert_eq!(account.collection_size(), 10);
    }

    #[test]
    fn test_corrupt_timestamp_reported() {
        let db = setup_db();
        db.create_account("alice", "pw", 1).unwrap();
        db.conn
            .execute(
                "UPDATE accounts SET created_at = 'yesterday' WHERE username = 'alice'",
                [],
            )
            .unwrap();
        assert!(matches!(
            db.get_record("alice"),
            Err(RepoError::Corrupt(_))
        ));
    }
}
