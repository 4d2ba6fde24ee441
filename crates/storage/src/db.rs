use chrono::NaiveDate;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use tally_core::{
    DateRange, ExtractedTransaction, Money, TransactionKind, TransactionSink, UserId,
    UserTransaction,
};
use thiserror::Error;

pub type DbPool = Pool<Sqlite>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Corrupt row {id}: {detail}")]
    Corrupt { id: i64, detail: String },
}

pub async fn create_db(path: &Path) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;
    configure(&pool).await?;
    Ok(pool)
}

/// A private in-memory database. One connection, so every query sees the same data.
pub async fn create_memory_db() -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    configure(&pool).await?;
    Ok(pool)
}

async fn configure(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(pool)
        .await?;
    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(pool)
        .await?;

    run_migrations(pool).await
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            date TEXT NOT NULL,
            kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
            category TEXT NOT NULL CHECK (length(trim(category)) > 0),
            amount TEXT NOT NULL,
            description TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions (user_id, date)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// A persisted transaction.
#[derive(Debug, Clone, Serialize)]
pub struct StoredTransaction {
    pub id: i64,
    pub user_id: UserId,
    #[serde(flatten)]
    pub transaction: ExtractedTransaction,
    pub created_at: String,
}

type TransactionRow = (i64, String, NaiveDate, String, String, String, String, String);

fn decode_row(r: TransactionRow) -> Result<StoredTransaction, StorageError> {
    let (id, user_id, date, kind, category, amount, description, created_at) = r;
    let kind = TransactionKind::from_str(&kind)
        .map_err(|e| StorageError::Corrupt { id, detail: e.to_string() })?;
    let amount =
        Money::parse(&amount).map_err(|e| StorageError::Corrupt { id, detail: e.to_string() })?;
    Ok(StoredTransaction {
        id,
        user_id: UserId(user_id),
        transaction: ExtractedTransaction { date, kind, category, amount, description },
        created_at,
    })
}

/// A user's transactions, newest first, optionally limited to an inclusive date range.
pub async fn get_transactions_for_user(
    pool: &DbPool,
    user: &UserId,
    range: Option<DateRange>,
) -> Result<Vec<StoredTransaction>, StorageError> {
    let rows = match range {
        Some(range) => {
            sqlx::query_as::<_, TransactionRow>(
                "SELECT id, user_id, date, kind, category, amount, description, created_at FROM transactions WHERE user_id = ? AND date >= ? AND date <= ? ORDER BY date DESC, id DESC"
            )
            .bind(user.as_str())
            .bind(range.start)
            .bind(range.end)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, TransactionRow>(
                "SELECT id, user_id, date, kind, category, amount, description, created_at FROM transactions WHERE user_id = ? ORDER BY date DESC, id DESC"
            )
            .bind(user.as_str())
            .fetch_all(pool)
            .await?
        }
    };

    rows.into_iter().map(decode_row).collect()
}

pub async fn count_transactions(pool: &DbPool) -> Result<i64, sqlx::Error> {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

/// Writes each batch inside one SQL transaction: either every row lands or none do.
#[derive(Debug, Clone)]
pub struct SqliteSink {
    pool: DbPool,
}

impl SqliteSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl TransactionSink for SqliteSink {
    type Error = StorageError;

    async fn insert_batch(&self, batch: &[UserTransaction]) -> Result<usize, StorageError> {
        let mut tx = self.pool.begin().await?;
        for item in batch {
            let t = &item.transaction;
            sqlx::query(
                "INSERT INTO transactions (user_id, date, kind, category, amount, description) VALUES (?, ?, ?, ?, ?, ?)"
            )
            .bind(item.user_id.as_str())
            .bind(t.date)
            .bind(t.kind.as_str())
            .bind(&t.category)
            .bind(t.amount.as_decimal().to_string())
            .bind(&t.description)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        tracing::debug!(rows = batch.len(), "transactions inserted");
        Ok(batch.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tagged(user: &str, on: NaiveDate, kind: TransactionKind, category: &str, amount: &str) -> UserTransaction {
        UserTransaction {
            user_id: UserId::new(user),
            transaction: ExtractedTransaction {
                date: on,
                kind,
                category: category.to_string(),
                amount: Money::parse(amount).unwrap(),
                description: "Uploaded from history: h.pdf".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn insert_batch_then_list_newest_first() {
        let pool = create_memory_db().await.unwrap();
        let sink = SqliteSink::new(pool.clone());
        let batch = vec![
            tagged("u1", date(2024, 1, 15), TransactionKind::Expense, "Groceries", "45.50"),
            tagged("u1", date(2024, 1, 16), TransactionKind::Income, "Salary", "2000.00"),
        ];

        assert_eq!(sink.insert_batch(&batch).await.unwrap(), 2);

        let rows = get_transactions_for_user(&pool, &UserId::new("u1"), None).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].transaction, batch[1].transaction);
        assert_eq!(rows[1].transaction, batch[0].transaction);
        assert_eq!(rows[0].transaction.amount.as_decimal().to_string(), "2000.00");
    }

    #[tokio::test]
    async fn listing_is_per_user() {
        let pool = create_memory_db().await.unwrap();
        let sink = SqliteSink::new(pool.clone());
        sink.insert_batch(&[tagged("u1", date(2024, 1, 15), TransactionKind::Expense, "Milk", "3.99")])
            .await
            .unwrap();
        sink.insert_batch(&[tagged("u2", date(2024, 1, 15), TransactionKind::Expense, "Bread", "2.50")])
            .await
            .unwrap();

        let rows = get_transactions_for_user(&pool, &UserId::new("u2"), None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction.category, "Bread");
    }

    #[tokio::test]
    async fn date_range_is_inclusive() {
        let pool = create_memory_db().await.unwrap();
        let sink = SqliteSink::new(pool.clone());
        let batch: Vec<_> = [1, 10, 31]
            .iter()
            .map(|d| tagged("u1", date(2024, 1, *d), TransactionKind::Expense, "Fuel", "30.00"))
            .chain(std::iter::once(tagged("u1", date(2024, 2, 1), TransactionKind::Expense, "Fuel", "30.00")))
            .collect();
        sink.insert_batch(&batch).await.unwrap();

        let january = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));
        let rows = get_transactions_for_user(&pool, &UserId::new("u1"), Some(january))
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| january.contains(r.transaction.date)));
    }

    #[tokio::test]
    async fn failing_row_rolls_back_whole_batch() {
        let pool = create_memory_db().await.unwrap();
        let sink = SqliteSink::new(pool.clone());
        let batch = vec![
            tagged("u1", date(2024, 1, 15), TransactionKind::Expense, "Milk", "3.99"),
            // Rejected by the category CHECK constraint.
            tagged("u1", date(2024, 1, 15), TransactionKind::Expense, "  ", "2.50"),
        ];

        assert!(sink.insert_batch(&batch).await.is_err());
        assert_eq!(count_transactions(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_db_on_disk_is_reopenable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tally.db");
        {
            let pool = create_db(&path).await.unwrap();
            SqliteSink::new(pool.clone())
                .insert_batch(&[tagged("u1", date(2024, 1, 15), TransactionKind::Expense, "Eggs", "4.00")])
                .await
                .unwrap();
            pool.close().await;
        }

        let pool = create_db(&path).await.unwrap();
        assert_eq!(count_transactions(&pool).await.unwrap(), 1);
    }
}
