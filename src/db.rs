use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Upper bound on rows returned by `list_status_checks`.
pub const STATUS_LIST_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCheck {
    pub id: String,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusCheckCreate {
    pub client_name: String,
}

impl StatusCheck {
    pub fn new(client_name: String) -> Self {
        StatusCheck {
            id: uuid::Uuid::new_v4().to_string(),
            client_name,
            timestamp: Utc::now(),
        }
    }
}

pub fn connect(path: &str) -> Result<Connection> {
    if let Some(dir) = Path::new(path).parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS status_checks (
            id          TEXT PRIMARY KEY,
            client_name TEXT NOT NULL,
            timestamp   TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_status_checks_ts ON status_checks(timestamp);
        ",
    )?;
    Ok(())
}

pub fn insert_status_check(conn: &Connection, check: &StatusCheck) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO status_checks (id, client_name, timestamp) VALUES (?1, ?2, ?3)",
        rusqlite::params![check.id, check.client_name, check.timestamp.to_rfc3339()],
    )?;
    Ok(())
}

pub fn list_status_checks(conn: &Connection) -> rusqlite::Result<Vec<StatusCheck>> {
    let mut stmt = conn.prepare(
        "SELECT id, client_name, timestamp FROM status_checks ORDER BY rowid LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([STATUS_LIST_LIMIT as i64], |row| {
            let ts: String = row.get(2)?;
            let timestamp = DateTime::parse_from_rfc3339(&ts)
                .map(|t| t.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
            Ok(StatusCheck {
                id: row.get(0)?,
                client_name: row.get(1)?,
                timestamp,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Shared handle for request handlers. rusqlite calls block, so each one runs
/// on tokio's blocking pool while holding the connection mutex.
#[derive(Clone)]
pub struct StatusStore {
    conn: Arc<Mutex<Connection>>,
}

impl StatusStore {
    pub fn open(path: &str) -> Result<Self> {
        let conn = connect(path)?;
        init_schema(&conn)?;
        Ok(Self::wrap(conn))
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self::wrap(conn))
    }

    fn wrap(conn: Connection) -> Self {
        StatusStore {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn run<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let out = tokio::task::spawn_blocking(move || {
            let conn = conn.lock().unwrap_or_else(|p| p.into_inner());
            op(&*conn)
        })
        .await??;
        Ok(out)
    }

    pub async fn create(&self, input: StatusCheckCreate) -> Result<StatusCheck, ApiError> {
        let check = StatusCheck::new(input.client_name);
        let row = check.clone();
        self.run(move |conn| insert_status_check(conn, &row)).await?;
        Ok(check)
    }

    pub async fn list(&self) -> Result<Vec<StatusCheck>, ApiError> {
        self.run(list_status_checks).await
    }
}
