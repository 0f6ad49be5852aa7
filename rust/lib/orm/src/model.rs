//! The `Model` trait and the `model!` declaration macro.
//!
//! A model maps one struct to one table. Implementations are normally
//! generated by [`model!`](crate::model) from the declared attribute list.

use std::borrow::Cow;

use quorum_core::ServiceError;
use quorum_sql::{Row, Value};

use crate::finder::Finder;
use crate::naming::tableize;
use crate::ops::{Db, SqlOps};
use crate::predicate::Predicate;

/// Name of the identity column every model table carries.
pub const ID: &str = "id";

/// Trait implemented by entities stored in one SQL table.
pub trait Model: Sized {
    /// Type name the default table name is derived from.
    const TYPE_NAME: &'static str;

    /// Non-identity attributes, in declared order. INSERT and UPDATE
    /// statements list columns in this order.
    const ATTRIBUTES: &'static [&'static str];

    /// Table name in SQL. Override for irregular names.
    fn table_name() -> Cow<'static, str> {
        Cow::Owned(tableize(Self::TYPE_NAME))
    }

    /// Identity, `None` until the record is first saved.
    fn id(&self) -> Option<i64>;

    /// Record the identity generated by the first INSERT.
    #[doc(hidden)]
    fn assign_id(&mut self, id: i64);

    /// Current attribute values, aligned with [`Model::ATTRIBUTES`].
    fn values(&self) -> Vec<Value>;

    /// Materialize one row.
    fn from_row(row: &Row) -> Result<Self, ServiceError>;

    /// Whether `name` is the identity or a declared attribute.
    fn has_attribute(name: &str) -> bool {
        name == ID || Self::ATTRIBUTES.contains(&name)
    }

    fn find_by_id(db: &Db, id: i64) -> Result<Option<Self>, ServiceError> {
        SqlOps::<Self>::new(db.clone()).find_by_id(id)
    }

    fn all(db: &Db) -> Result<Vec<Self>, ServiceError> {
        SqlOps::<Self>::new(db.clone()).all()
    }

    fn filter(db: &Db, predicate: impl Into<Predicate>) -> Result<Vec<Self>, ServiceError> {
        SqlOps::<Self>::new(db.clone()).filter(predicate)
    }

    /// Dynamic finder, e.g. `User::find_by(&db, "find_by_fname_and_lname", args)`.
    fn find_by(db: &Db, finder: &str, args: Vec<Value>) -> Result<Vec<Self>, ServiceError> {
        SqlOps::<Self>::new(db.clone()).find_by(&Finder::parse(finder)?, args)
    }

    /// Dynamic finder expecting a single record.
    fn find_one_by(
        db: &Db,
        finder: &str,
        args: Vec<Value>,
    ) -> Result<Option<Self>, ServiceError> {
        Ok(Self::find_by(db, finder, args)?.into_iter().next())
    }

    /// Insert when new, update when previously saved or loaded.
    fn save(&mut self, db: &Db) -> Result<(), ServiceError> {
        SqlOps::<Self>::new(db.clone()).save(self)
    }
}

/// Decode one column into a Rust value.
pub trait FromColumn: Sized {
    fn from_column(row: &Row, column: &str) -> Result<Self, ServiceError>;
}

fn column<'r>(row: &'r Row, column: &str) -> Result<&'r Value, ServiceError> {
    row.get(column)
        .ok_or_else(|| ServiceError::Decode(format!("missing column '{column}'")))
}

fn mismatch(column: &str, expected: &str, got: &Value) -> ServiceError {
    ServiceError::Decode(format!("column '{column}': expected {expected}, got {got:?}"))
}

impl FromColumn for i64 {
    fn from_column(row: &Row, name: &str) -> Result<Self, ServiceError> {
        match column(row, name)? {
            Value::Integer(i) => Ok(*i),
            other => Err(mismatch(name, "integer", other)),
        }
    }
}

impl FromColumn for f64 {
    fn from_column(row: &Row, name: &str) -> Result<Self, ServiceError> {
        match column(row, name)? {
            Value::Real(f) => Ok(*f),
            Value::Integer(i) => Ok(*i as f64),
            other => Err(mismatch(name, "real", other)),
        }
    }
}

impl FromColumn for String {
    fn from_column(row: &Row, name: &str) -> Result<Self, ServiceError> {
        match column(row, name)? {
            Value::Text(s) => Ok(s.clone()),
            other => Err(mismatch(name, "text", other)),
        }
    }
}

impl<T: FromColumn> FromColumn for Option<T> {
    fn from_column(row: &Row, name: &str) -> Result<Self, ServiceError> {
        match column(row, name)? {
            Value::Null => Ok(None),
            _ => T::from_column(row, name).map(Some),
        }
    }
}

/// Declare a model struct and generate its [`Model`] implementation.
///
/// The struct gets a private `id: Option<i64>` identity ahead of the
/// declared attributes, and a `new` constructor taking the attributes in
/// order. An optional `in "table"` overrides the derived table name.
///
/// ```ignore
/// model! {
///     #[derive(Debug, Clone)]
///     pub struct Reply in "replies" {
///         pub question_id: i64,
///         pub parent_id: Option<i64>,
///         pub user_id: i64,
///         pub body: String,
///     }
/// }
/// ```
#[macro_export]
macro_rules! model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(in $table:literal)? {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            id: Option<i64>,
            $( $(#[$fmeta])* $fvis $field: $ty, )+
        }

        impl $name {
            /// Build an unsaved record. The identity is assigned by `save`.
            #[allow(clippy::too_many_arguments)]
            $vis fn new($($field: $ty),+) -> Self {
                Self { id: None, $($field),+ }
            }
        }

        impl $crate::Model for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const ATTRIBUTES: &'static [&'static str] = &[$(stringify!($field)),+];

            $(
                fn table_name() -> ::std::borrow::Cow<'static, str> {
                    ::std::borrow::Cow::Borrowed($table)
                }
            )?

            fn id(&self) -> Option<i64> {
                self.id
            }

            fn assign_id(&mut self, id: i64) {
                self.id = Some(id);
            }

            fn values(&self) -> Vec<$crate::Value> {
                vec![$($crate::Value::from(self.$field.clone())),+]
            }

            fn from_row(row: &$crate::Row) -> Result<Self, $crate::ServiceError> {
                Ok(Self {
                    id: Some(<i64 as $crate::FromColumn>::from_column(row, $crate::ID)?),
                    $(
                        $field: <$ty as $crate::FromColumn>::from_column(
                            row,
                            stringify!($field),
                        )?,
                    )+
                })
            }
        }
    };
}
