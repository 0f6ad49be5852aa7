//! Q&A forum entities on top of the `quorum-orm` mapping layer.
//!
//! ```ignore
//! let db: Db = Arc::new(SqliteStore::open(&path)?);
//! quorum_forum::ensure_schema(&db)?;
//!
//! let mut ada = User::new("Ada".into(), "Lovelace".into());
//! ada.save(&db)?;
//! let top = Question::most_liked(&db, 10)?;
//! ```

pub mod model;
pub mod schema;
pub mod thread;

pub use model::{Question, QuestionFollow, QuestionLike, Reply, User};
pub use schema::{ensure_schema, SCHEMA};
pub use thread::ReplyThread;
