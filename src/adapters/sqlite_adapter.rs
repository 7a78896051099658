//! SQLite ledger adapter.

use chrono::{DateTime, SecondsFormat, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{OptionalExtension, Row, TransactionBehavior, params};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, info};

use crate::domain::accounting::{self, Account};
use crate::domain::error::FinanceError;
use crate::domain::money::parse_amount;
use crate::domain::order::PricedOrder;
use crate::domain::portfolio::Holding;
use crate::domain::transaction::Transaction;
use crate::domain::user::{User, UserId};
use crate::ports::config_port::ConfigPort;
use crate::ports::ledger_port::LedgerPort;

pub const DEFAULT_STARTING_CASH: Decimal = Decimal::from_parts(10000, 0, 0, false, 0);

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
    starting_cash: Decimal,
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, FinanceError> {
        let db_path = config.get_string("database", "sqlite_path").ok_or_else(|| {
            FinanceError::ConfigMissing {
                section: "database".into(),
                key: "sqlite_path".into(),
            }
        })?;

        let starting_cash = match config.get_string("ledger", "starting_cash") {
            Some(raw) => parse_amount(&raw).ok_or_else(|| FinanceError::ConfigInvalid {
                section: "ledger".into(),
                key: "starting_cash".into(),
                reason: format!("{raw:?} is not a non-negative amount"),
            })?,
            None => DEFAULT_STARTING_CASH,
        };

        let adapter = if db_path == ":memory:" {
            Self::in_memory()?
        } else {
            let pool_size = config.get_int("database", "pool_size", 4);
            if pool_size < 1 {
                return Err(FinanceError::ConfigInvalid {
                    section: "database".into(),
                    key: "pool_size".into(),
                    reason: "pool_size must be at least 1".into(),
                });
            }
            let manager = SqliteConnectionManager::file(&db_path).with_init(|conn| {
                conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            });
            let pool = Pool::builder()
                .max_size(pool_size as u32)
                .build(manager)
                .map_err(pool_err)?;
            Self {
                pool,
                starting_cash: DEFAULT_STARTING_CASH,
            }
        };

        Ok(adapter.with_starting_cash(starting_cash))
    }

    /// A private database living as long as the adapter. Single connection,
    /// so every caller sees the same data.
    pub fn in_memory() -> Result<Self, FinanceError> {
        let manager = SqliteConnectionManager::memory()
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(pool_err)?;

        Ok(Self {
            pool,
            starting_cash: DEFAULT_STARTING_CASH,
        })
    }

    pub fn with_starting_cash(mut self, starting_cash: Decimal) -> Self {
        self.starting_cash = starting_cash;
        self
    }

    pub fn starting_cash(&self) -> Decimal {
        self.starting_cash
    }

    pub fn initialize_schema(&self) -> Result<(), FinanceError> {
        let conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                hash TEXT NOT NULL,
                cash TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                symbol TEXT NOT NULL,
                shares INTEGER NOT NULL,
                price TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_transactions_user_symbol
                ON transactions(user_id, symbol);",
        )
        .map_err(query_err)?;

        debug!("ledger schema ready");
        Ok(())
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, FinanceError> {
        self.pool.get().map_err(pool_err)
    }
}

impl LedgerPort for SqliteAdapter {
    fn create_user(&self, username: &str, password_hash: &str) -> Result<User, FinanceError> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT INTO users (username, hash, cash) VALUES (?1, ?2, ?3)",
            params![username, password_hash, self.starting_cash.to_string()],
        );

        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(FinanceError::DuplicateUsername {
                    username: username.to_string(),
                });
            }
            Err(e) => return Err(query_err(e)),
        }

        let id = conn.last_insert_rowid();
        info!(user_id = id, username, "user registered");
        Ok(User {
            id,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            cash: self.starting_cash,
        })
    }

    fn find_user(&self, username: &str) -> Result<Option<User>, FinanceError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, username, hash, cash FROM users WHERE username = ?1",
            params![username],
            user_from_row,
        )
        .optional()
        .map_err(query_err)
    }

    fn get_user(&self, id: UserId) -> Result<Option<User>, FinanceError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, username, hash, cash FROM users WHERE id = ?1",
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(query_err)
    }

    fn holdings(&self, user_id: UserId) -> Result<Vec<Holding>, FinanceError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT symbol, SUM(shares) AS total
                 FROM transactions
                 WHERE user_id = ?1
                 GROUP BY symbol
                 HAVING total > 0
                 ORDER BY symbol ASC",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(Holding {
                    symbol: row.get(0)?,
                    shares: row.get(1)?,
                })
            })
            .map_err(query_err)?;

        let mut holdings = Vec::new();
        for row in rows {
            holdings.push(row.map_err(query_err)?);
        }
        Ok(holdings)
    }

    fn history(&self, user_id: UserId) -> Result<Vec<Transaction>, FinanceError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, user_id, symbol, shares, price, timestamp
                 FROM transactions
                 WHERE user_id = ?1
                 ORDER BY timestamp DESC, id DESC",
            )
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                Ok(Transaction {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    symbol: row.get(2)?,
                    shares: row.get(3)?,
                    price: decimal_column(row, 4)?,
                    timestamp: timestamp_column(row, 5)?,
                })
            })
            .map_err(query_err)?;

        let mut transactions = Vec::new();
        for row in rows {
            transactions.push(row.map_err(query_err)?);
        }
        Ok(transactions)
    }

    fn settle(&self, user_id: UserId, order: &PricedOrder) -> Result<Transaction, FinanceError> {
        let mut conn = self.conn()?;
        // IMMEDIATE takes the write lock before the reads below.
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(query_err)?;

        let cash = tx
            .query_row(
                "SELECT cash FROM users WHERE id = ?1",
                params![user_id],
                |row| decimal_column(row, 0),
            )
            .optional()
            .map_err(query_err)?
            .ok_or(FinanceError::UnknownUser { id: user_id })?;

        let held: i64 = tx
            .query_row(
                "SELECT COALESCE(SUM(shares), 0) FROM transactions
                 WHERE user_id = ?1 AND symbol = ?2",
                params![user_id, order.symbol.as_str()],
                |row| row.get(0),
            )
            .map_err(query_err)?;

        let settlement = accounting::settle(&Account { cash, held }, order)?;
        let timestamp = Utc::now();

        tx.execute(
            "UPDATE users SET cash = ?1 WHERE id = ?2",
            params![settlement.cash_after.to_string(), user_id],
        )
        .map_err(query_err)?;

        tx.execute(
            "INSERT INTO transactions (user_id, symbol, shares, price, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                order.symbol.as_str(),
                settlement.signed_shares,
                order.price.to_string(),
                timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
            ],
        )
        .map_err(query_err)?;
        let id = tx.last_insert_rowid();

        tx.commit().map_err(query_err)?;

        Ok(Transaction {
            id,
            user_id,
            symbol: order.symbol.to_string(),
            shares: settlement.signed_shares,
            price: order.price,
            timestamp,
        })
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        cash: decimal_column(row, 3)?,
    })
}

fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(&text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn pool_err(e: r2d2::Error) -> FinanceError {
    FinanceError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> FinanceError {
    FinanceError::DatabaseQuery {
        reason: e.to_string(),
    }
}
