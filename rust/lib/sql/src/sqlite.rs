use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::SQLError;
use crate::traits::{Row, SQLStore, Value};

/// Store files currently owned by a live handle in this process.
fn open_stores() -> &'static Mutex<HashSet<PathBuf>> {
    static OPEN: OnceLock<Mutex<HashSet<PathBuf>>> = OnceLock::new();
    OPEN.get_or_init(|| Mutex::new(HashSet::new()))
}

fn release(path: &Path) {
    if let Ok(mut open) = open_stores().lock() {
        open.remove(path);
    }
}

/// Canonical form of a store path that may not exist yet: the file itself
/// when present, otherwise its canonical parent directory plus file name.
fn canonical_store_path(path: &Path) -> Result<PathBuf, SQLError> {
    if let Ok(existing) = std::fs::canonicalize(path) {
        return Ok(existing);
    }
    let name = path
        .file_name()
        .ok_or_else(|| SQLError::Connection(format!("not a file path: {}", path.display())))?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let dir = std::fs::canonicalize(parent).map_err(|e| SQLError::Connection(e.to_string()))?;
    Ok(dir.join(name))
}

/// SqliteStore is a SQLStore implementation backed by rusqlite (bundled SQLite).
///
/// A file-backed store claims its path for the lifetime of the handle:
/// opening the same file again while the first handle is alive fails with
/// [`SQLError::AlreadyOpen`]. In-memory stores are private to their handle.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    claim: Option<PathBuf>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    ///
    /// The path is claimed before any connection is made, so a refused
    /// second open never touches the file.
    pub fn open(path: &Path) -> Result<Self, SQLError> {
        let canonical = canonical_store_path(path)?;
        {
            let mut open = open_stores()
                .lock()
                .map_err(|e| SQLError::Connection(e.to_string()))?;
            if !open.insert(canonical.clone()) {
                return Err(SQLError::AlreadyOpen(canonical));
            }
        }

        let conn = match Connection::open(path) {
            Ok(conn) => conn,
            Err(e) => {
                release(&canonical);
                return Err(SQLError::Connection(e.to_string()));
            }
        };
        // The claim is now released by Drop, including on error below.
        let store = Self {
            conn: Mutex::new(conn),
            claim: Some(canonical),
        };
        // Enable WAL mode for better concurrent read performance.
        store.exec_batch("PRAGMA journal_mode=WAL;")?;

        info!(path = %path.display(), "opened sqlite store");
        Ok(store)
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, SQLError> {
        let conn =
            Connection::open_in_memory().map_err(|e| SQLError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            claim: None,
        })
    }

    /// Path this handle owns, if it is file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.claim.as_deref()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, SQLError> {
        self.conn
            .lock()
            .map_err(|e| SQLError::Connection(e.to_string()))
    }
}

impl Drop for SqliteStore {
    fn drop(&mut self) {
        if let Some(path) = self.claim.take() {
            release(&path);
        }
    }
}

/// Convert our Value enum to rusqlite's ToSql.
fn to_sql(v: &Value) -> &dyn rusqlite::types::ToSql {
    match v {
        Value::Null => &rusqlite::types::Null,
        Value::Integer(i) => i,
        Value::Real(f) => f,
        Value::Text(s) => s,
        Value::Blob(b) => b,
    }
}

fn bind_params(params: &[Value]) -> Vec<&dyn rusqlite::types::ToSql> {
    params.iter().map(to_sql).collect()
}

impl SQLStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        debug!(sql, params = params.len(), "query");
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = stmt
            .query_map(bind_params(params).as_slice(), |row| {
                let mut columns = Vec::with_capacity(column_names.len());
                for (i, name) in column_names.iter().enumerate() {
                    columns.push((name.clone(), row_value_at(row, i)?));
                }
                Ok(Row { columns })
            })
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row.map_err(|e| SQLError::Execution(e.to_string()))?);
        }
        Ok(result)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        debug!(sql, params = params.len(), "exec");
        let conn = self.lock()?;

        let affected = conn
            .execute(sql, bind_params(params).as_slice())
            .map_err(|e| SQLError::Execution(e.to_string()))?;

        Ok(affected as u64)
    }

    fn exec_batch(&self, sql: &str) -> Result<(), SQLError> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| SQLError::Execution(e.to_string()))
    }

    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, SQLError> {
        debug!(sql, params = params.len(), "insert");
        let conn = self.lock()?;

        conn.execute(sql, bind_params(params).as_slice())
            .map_err(|e| SQLError::Execution(e.to_string()))?;

        Ok(conn.last_insert_rowid())
    }

    fn last_insert_id(&self) -> Result<i64, SQLError> {
        Ok(self.lock()?.last_insert_rowid())
    }
}

/// Read a column with its storage class preserved.
fn row_value_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Value> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    })
}
