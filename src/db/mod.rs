// src/db/mod.rs

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Executor, Row, Statement, TypeInfo, ValueRef};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::models::{BoundQuery, ResultSet, Scalar};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("database file '{0}' not found")]
    StoreMissing(String),
    #[error("error connecting to database: {0}")]
    StoreUnavailable(String),
    #[error("error executing query: {0}")]
    Execution(#[from] sqlx::Error),
}

impl QueryError {
    /// Store-level failures are reported once per page, not per query.
    pub fn is_store_level(&self) -> bool {
        matches!(self, QueryError::StoreMissing(_) | QueryError::StoreUnavailable(_))
    }
}

/// The one database handle, opened at startup and shared by every report.
#[derive(Debug, Clone)]
pub enum Store {
    Ready(SqlitePool),
    Missing { path: PathBuf },
    Unavailable { reason: String },
}

impl Store {
    pub fn pool(&self) -> Result<&SqlitePool, QueryError> {
        match self {
            Store::Ready(pool) => Ok(pool),
            Store::Missing { path } => Err(QueryError::StoreMissing(path.display().to_string())),
            Store::Unavailable { reason } => Err(QueryError::StoreUnavailable(reason.clone())),
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Store::Ready(_) => "ready",
            Store::Missing { .. } => "missing",
            Store::Unavailable { .. } => "unavailable",
        }
    }

    /// User-facing banner text when the store cannot serve queries.
    pub fn diagnostic(&self) -> Option<String> {
        self.pool().err().map(|e| match e {
            QueryError::StoreMissing(path) => format!(
                "Database file '{path}' not found. Please ensure the dataset has been loaded before starting the dashboard."
            ),
            other => other.to_string(),
        })
    }
}

/// Opens the SQLite file read-only. Never creates it and never fails:
/// a missing or broken file degrades to a non-ready `Store`.
pub async fn open(path: &Path) -> Store {
    if !path.exists() {
        warn!(path = %path.display(), "database file not found; every report will be empty");
        return Store::Missing { path: path.to_path_buf() };
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .read_only(true)
        .create_if_missing(false);

    match SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
    {
        Ok(pool) => {
            info!(path = %path.display(), "connected to SQLite store");
            Store::Ready(pool)
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "failed to open SQLite store");
            Store::Unavailable { reason: e.to_string() }
        }
    }
}

/// Executes one bound query and returns every row as scalars.
pub async fn fetch_table(store: &Store, query: &BoundQuery) -> Result<ResultSet, QueryError> {
    let pool = store.pool()?;

    let statement = pool.prepare(query.sql.as_str()).await?;
    let columns: Vec<String> = statement
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let mut q = statement.query();
    for param in &query.params {
        q = q.bind(param.clone());
    }
    let rows = q.fetch_all(pool).await?;

    let rows = rows
        .iter()
        .map(|row| (0..columns.len()).map(|idx| decode_cell(row, idx)).collect())
        .collect();
    Ok(ResultSet { columns, rows })
}

/// A value plus the message of the failure that emptied it, if any.
#[derive(Debug, Clone, Default)]
pub struct Fetched<T> {
    pub value: T,
    pub failure: Option<String>,
}

impl<T> Fetched<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched { value: f(self.value), failure: self.failure }
    }
}

/// Like `fetch_table`, but failures become an empty table. Store-level
/// failures carry no per-query message (see `Store::diagnostic`).
pub async fn run_query(store: &Store, query: &BoundQuery) -> Fetched<ResultSet> {
    match fetch_table(store, query).await {
        Ok(table) => Fetched { value: table, failure: None },
        Err(e) if e.is_store_level() => {
            debug!(error = %e, "store unavailable; returning empty table");
            Fetched::default()
        }
        Err(e) => {
            warn!(error = %e, sql = %query.sql, "query failed");
            Fetched { value: ResultSet::default(), failure: Some(e.to_string()) }
        }
    }
}

// SQLite is dynamically typed; decode on the value's storage class.
fn decode_cell(row: &SqliteRow, idx: usize) -> Scalar {
    let kind = match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return Scalar::Null,
        Ok(raw) => raw.type_info().name().to_ascii_uppercase(),
        Err(_) => return Scalar::Null,
    };

    let decoded = match kind.as_str() {
        "INTEGER" | "BOOLEAN" => row.try_get_unchecked::<i64, _>(idx).map(Scalar::Integer),
        "REAL" | "NUMERIC" => row.try_get_unchecked::<f64, _>(idx).map(Scalar::Real),
        "BLOB" => row
            .try_get_unchecked::<Vec<u8>, _>(idx)
            .map(|b| Scalar::Text(format!("<{} bytes>", b.len()))),
        _ => row.try_get_unchecked::<String, _>(idx).map(Scalar::Text),
    };
    decoded.unwrap_or(Scalar::Null)
}
