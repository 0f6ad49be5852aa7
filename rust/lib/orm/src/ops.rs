//! `SqlOps<T>`: lookup and upsert for any [`Model`].

use std::marker::PhantomData;
use std::sync::Arc;

use quorum_core::ServiceError;
use quorum_sql::{Row, SQLError, SQLStore, Value};
use tracing::warn;

use crate::finder::Finder;
use crate::model::{Model, ID};
use crate::predicate::{Conditions, Predicate};

/// Shared database handle, constructed by the entry point.
pub type Db = Arc<dyn SQLStore>;

/// Lookup and persistence operations for a model.
pub struct SqlOps<T: Model> {
    sql: Db,
    _phantom: PhantomData<T>,
}

impl<T: Model> SqlOps<T> {
    pub fn new(sql: Db) -> Self {
        Self {
            sql,
            _phantom: PhantomData,
        }
    }

    /// Get a record by identity.
    pub fn find_by_id(&self, id: i64) -> Result<Option<T>, ServiceError> {
        let sql = format!("SELECT * FROM \"{}\" WHERE \"{ID}\" = ?1", T::table_name());
        let rows = self.sql.query(&sql, &[Value::Integer(id)])?;
        rows.first().map(T::from_row).transpose()
    }

    /// List all records.
    pub fn all(&self) -> Result<Vec<T>, ServiceError> {
        let sql = format!("SELECT * FROM \"{}\"", T::table_name());
        self.query(&sql, &[])
    }

    /// Records matching a predicate.
    ///
    /// Empty `Conditions` select nothing and return an empty list without
    /// touching the store. An expression that does not prepare is a
    /// malformed query; failures while stepping rows stay storage errors.
    pub fn filter(&self, predicate: impl Into<Predicate>) -> Result<Vec<T>, ServiceError> {
        match predicate.into() {
            Predicate::Eq(conditions) => self.filter_eq(&conditions),
            Predicate::Expr(expr) => {
                let sql = format!("SELECT * FROM \"{}\" WHERE {expr}", T::table_name());
                let rows = self.sql.query(&sql, &[]).map_err(|e| match e {
                    SQLError::Query(msg) => {
                        ServiceError::MalformedQuery(format!("predicate '{expr}': {msg}"))
                    }
                    other => other.into(),
                })?;
                materialize(&rows)
            }
        }
    }

    fn filter_eq(&self, conditions: &Conditions) -> Result<Vec<T>, ServiceError> {
        if conditions.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(unknown) = conditions.columns().find(|c| !T::has_attribute(c)) {
            return Err(ServiceError::MalformedQuery(format!(
                "{} has no attribute '{unknown}'",
                T::TYPE_NAME
            )));
        }

        let (where_sql, params) = conditions.to_sql(1);
        let sql = format!("SELECT * FROM \"{}\" WHERE {where_sql}", T::table_name());
        self.query(&sql, &params)
    }

    /// Run a parsed dynamic finder.
    pub fn find_by(&self, finder: &Finder, args: Vec<Value>) -> Result<Vec<T>, ServiceError> {
        let conditions = finder.bind(args).inspect_err(|e| {
            warn!(model = T::TYPE_NAME, finder = finder.name(), error = %e, "rejected finder");
        })?;
        self.filter_eq(&conditions).inspect_err(|e| {
            if let ServiceError::MalformedQuery(_) = e {
                warn!(model = T::TYPE_NAME, finder = finder.name(), error = %e, "rejected finder");
            }
        })
    }

    /// Insert a new record or update an existing one.
    ///
    /// A record without identity is inserted and receives the generated
    /// identity. A record with identity has every attribute written back;
    /// the statement runs even when nothing changed. Updating an identity
    /// with no row is `NotFound`.
    pub fn save(&self, record: &mut T) -> Result<(), ServiceError> {
        let table = T::table_name();
        let mut params = record.values();

        match record.id() {
            Some(id) => {
                let set_clauses: Vec<String> = T::ATTRIBUTES
                    .iter()
                    .enumerate()
                    .map(|(i, a)| format!("\"{a}\" = ?{}", i + 1))
                    .collect();
                let sql = format!(
                    "UPDATE \"{table}\" SET {} WHERE \"{ID}\" = ?{}",
                    set_clauses.join(", "),
                    params.len() + 1
                );
                params.push(Value::Integer(id));

                let affected = self.sql.exec(&sql, &params)?;
                if affected == 0 {
                    return Err(ServiceError::NotFound(format!("{table} {id}")));
                }
            }
            None => {
                let col_names: Vec<String> =
                    T::ATTRIBUTES.iter().map(|a| format!("\"{a}\"")).collect();
                let placeholders: Vec<String> =
                    (1..=params.len()).map(|i| format!("?{i}")).collect();
                let sql = format!(
                    "INSERT INTO \"{table}\" ({}) VALUES ({})",
                    col_names.join(", "),
                    placeholders.join(", ")
                );

                let id = self.sql.insert(&sql, &params)?;
                record.assign_id(id);
            }
        }
        Ok(())
    }

    /// Materialize the rows of a hand-written statement.
    pub fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<T>, ServiceError> {
        let rows = self.sql.query(sql, params)?;
        materialize(&rows)
    }
}

/// Materialize every row into `T`.
pub fn materialize<T: Model>(rows: &[Row]) -> Result<Vec<T>, ServiceError> {
    rows.iter().map(T::from_row).collect()
}

/// First column of the first row, or `Value::Null` when there is none.
pub fn query_scalar(db: &dyn SQLStore, sql: &str, params: &[Value]) -> Result<Value, ServiceError> {
    let rows = db.query(sql, params)?;
    Ok(rows
        .into_iter()
        .next()
        .and_then(|row| row.columns.into_iter().next())
        .map(|(_, v)| v)
        .unwrap_or(Value::Null))
}
