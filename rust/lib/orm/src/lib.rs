//! Generic mapping layer between model structs and SQL tables.
//!
//! Models declare their attributes with [`model!`]; [`SqlOps`] provides
//! lookup by identity, equality filters, dynamic finders and upsert.
//!
//! ```ignore
//! model! {
//!     #[derive(Debug, Clone)]
//!     pub struct User {
//!         pub fname: String,
//!         pub lname: String,
//!     }
//! }
//!
//! let mut ada = User::new("Ada".into(), "Lovelace".into());
//! ada.save(&db)?;
//! let args = vec!["Ada".into(), "Lovelace".into()];
//! let found = User::find_by(&db, "find_by_fname_and_lname", args)?;
//! ```

pub mod finder;
pub mod model;
pub mod naming;
pub mod ops;
pub mod predicate;

pub use finder::Finder;
pub use model::{FromColumn, Model, ID};
pub use naming::tableize;
pub use ops::{materialize, query_scalar, Db, SqlOps};
pub use predicate::{Conditions, Predicate};

pub use quorum_core::ServiceError;
pub use quorum_sql::{Row, Value};
