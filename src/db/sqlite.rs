use crate::config::DatabaseConfig;
use crate::db::models::DbQuote;
use crate::db::schema::{META_MAX_CHARS, QUOTES_TABLE, SQLITE_INIT, TEXT_MAX_CHARS, clip};
use crate::error::QuoteError;
use crate::types::seed::SeedCandidate;
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::time::Duration;

pub type SqlitePool = Pool<Sqlite>;

/// Build a lazily connecting pool for `<server>/<name>.sqlite`.
///
/// No connection is opened here; each operation acquires its own and any
/// connectivity failure surfaces from that operation.
pub fn connect(cfg: &DatabaseConfig) -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(cfg.database_path())
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(cfg.connect_timeout_secs));
    SqlitePoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .connect_lazy_with(options)
}

#[derive(Clone)]
pub struct QuoteStore {
    pool: SqlitePool,
}

impl QuoteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Acquire a connection; it returns to the pool when dropped.
    async fn acquire(&self) -> Result<PoolConnection<Sqlite>, QuoteError> {
        self.pool.acquire().await.map_err(QuoteError::StoreConnectivity)
    }

    /// Create the quote table unless the catalog already lists it.
    /// Returns `true` when this call created it.
    pub async fn ensure_table_exists(&self) -> Result<bool, QuoteError> {
        let mut conn = self.acquire().await?;

        let (existing,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(QUOTES_TABLE)
                .fetch_one(&mut *conn)
                .await
                .map_err(QuoteError::Schema)?;
        if existing > 0 {
            return Ok(false);
        }

        // IF NOT EXISTS keeps a concurrent creator from failing us.
        sqlx::query(SQLITE_INIT.trim())
            .execute(&mut *conn)
            .await
            .map_err(QuoteError::Schema)?;
        Ok(true)
    }

    pub async fn count(&self) -> Result<i64, QuoteError> {
        let mut conn = self.acquire().await?;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM quotes")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    /// Insert one candidate as its own statement. Returns the row id.
    ///
    /// Values longer than their column are cut to the column width.
    pub async fn insert(&self, candidate: &SeedCandidate) -> Result<i64, QuoteError> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query("INSERT INTO quotes (text, author, source) VALUES (?, ?, ?)")
            .bind(clip(&candidate.text, TEXT_MAX_CHARS))
            .bind(candidate.author.as_deref().map(|a| clip(a, META_MAX_CHARS)))
            .bind(candidate.source.as_deref().map(|s| clip(s, META_MAX_CHARS)))
            .execute(&mut *conn)
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// One pseudo-random row, or `None` when the table is empty.
    pub async fn random_quote(&self) -> Result<Option<DbQuote>, QuoteError> {
        let mut conn = self.acquire().await?;
        let row = sqlx::query(
            r#"SELECT id, text, author, source, created_at
               FROM quotes ORDER BY RANDOM() LIMIT 1"#,
        )
        .fetch_optional(&mut *conn)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    fn row_to_model(row: SqliteRow) -> Result<DbQuote, QuoteError> {
        let id: i64 = row.try_get("id")?;
        let text: String = row.try_get("text")?;
        let author: Option<String> = row.try_get("author")?;
        let source: Option<String> = row.try_get("source")?;
        let created_at_str: String = row.try_get("created_at")?;

        let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(DbQuote {
            id,
            text,
            author,
            source,
            created_at,
        })
    }
}
