//! WHERE-clause construction.
//!
//! Every value ends up as a bound parameter. Only [`Predicate::Expr`]
//! places caller text into the statement, and it takes no values.

use quorum_sql::Value;

/// Ordered attribute/value pairs, AND-conjoined as equality tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    pairs: Vec<(String, Value)>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `column = value`. A `Value::Null` matches with `IS NULL`.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.pairs.push((column.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(c, _)| c.as_str())
    }

    /// Render the clause body and its parameters.
    ///
    /// Placeholders are numbered from `first_param`, so the clause can be
    /// appended after parameters already bound by the caller.
    pub fn to_sql(&self, first_param: usize) -> (String, Vec<Value>) {
        let mut clauses = Vec::with_capacity(self.pairs.len());
        let mut params = Vec::with_capacity(self.pairs.len());
        let mut idx = first_param;

        for (column, value) in &self.pairs {
            if value.is_null() {
                clauses.push(format!("\"{column}\" IS NULL"));
            } else {
                clauses.push(format!("\"{column}\" = ?{idx}"));
                params.push(value.clone());
                idx += 1;
            }
        }

        (clauses.join(" AND "), params)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Conditions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut conditions = Conditions::new();
        for (k, v) in iter {
            conditions.push(k, v);
        }
        conditions
    }
}

/// Filter accepted by `SqlOps::filter`.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Equality on named attributes.
    Eq(Conditions),
    /// A literal boolean SQL expression, inserted verbatim.
    ///
    /// Only for trusted, hand-written text. Structural errors surface
    /// as storage errors when the statement is prepared.
    Expr(String),
}

impl Predicate {
    pub fn expr(sql: impl Into<String>) -> Self {
        Predicate::Expr(sql.into())
    }
}

impl From<Conditions> for Predicate {
    fn from(c: Conditions) -> Self {
        Predicate::Eq(c)
    }
}
