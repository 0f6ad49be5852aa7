//! Database handle for the forum store.
//!
//! A [`SqliteStore`] owns exactly one connection to one store. Callers
//! construct it once at startup and share it as `Arc<dyn SQLStore>`.

pub mod error;
pub mod sqlite;
pub mod traits;

pub use error::SQLError;
pub use sqlite::SqliteStore;
pub use traits::{Row, SQLStore, Value};
