use quorum_core::ServiceError;
use quorum_orm::Db;
use tracing::info;

/// SQL schema for the forum tables. Column names are load-bearing: the
/// joins in `model` refer to them directly.
///
/// Link columns carry no `REFERENCES` clause: a row may point at a user,
/// question or reply that does not exist, and lookups through it yield
/// nothing.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    fname       TEXT NOT NULL,
    lname       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS questions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL,
    title       TEXT NOT NULL,
    body        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS replies (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    question_id INTEGER NOT NULL,
    user_id     INTEGER NOT NULL,
    parent_id   INTEGER,
    body        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS question_follows (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    question_id INTEGER NOT NULL,
    user_id     INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS question_likes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    question_id INTEGER NOT NULL,
    user_id     INTEGER NOT NULL,
    like_status INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_questions_user ON questions(user_id);
CREATE INDEX IF NOT EXISTS idx_replies_question ON replies(question_id);
CREATE INDEX IF NOT EXISTS idx_replies_parent ON replies(parent_id);
CREATE INDEX IF NOT EXISTS idx_follows_question ON question_follows(question_id);
CREATE INDEX IF NOT EXISTS idx_follows_user ON question_follows(user_id);
CREATE INDEX IF NOT EXISTS idx_likes_question ON question_likes(question_id);
CREATE INDEX IF NOT EXISTS idx_likes_user ON question_likes(user_id);
";

/// Create the forum tables if they do not exist yet. Idempotent.
pub fn ensure_schema(db: &Db) -> Result<(), ServiceError> {
    db.exec_batch(SCHEMA)
        .map_err(|e| ServiceError::Storage(format!("forum schema init: {e}")))?;
    info!("forum schema ready");
    Ok(())
}
