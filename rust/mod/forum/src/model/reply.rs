use quorum_core::ServiceError;
use quorum_orm::{model, Conditions, Db, Model, Value};
use serde::Serialize;

use super::{Question, User};

model! {
    /// A reply to `question_id`, optionally nested under `parent_id`.
    ///
    /// A parent must belong to the same question. Root replies have no
    /// parent.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Reply in "replies" {
        pub question_id: i64,
        pub parent_id: Option<i64>,
        pub user_id: i64,
        pub body: String,
    }
}

impl Reply {
    pub fn find_by_user_id(db: &Db, user_id: i64) -> Result<Vec<Reply>, ServiceError> {
        Reply::filter(db, Conditions::new().eq("user_id", user_id))
    }

    pub fn find_by_question_id(db: &Db, question_id: i64) -> Result<Vec<Reply>, ServiceError> {
        Reply::filter(db, Conditions::new().eq("question_id", question_id))
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn author(&self, db: &Db) -> Result<Option<User>, ServiceError> {
        User::find_by_id(db, self.user_id)
    }

    pub fn question(&self, db: &Db) -> Result<Option<Question>, ServiceError> {
        Question::find_by_id(db, self.question_id)
    }

    /// One hop up. `None` for a root reply.
    pub fn parent_reply(&self, db: &Db) -> Result<Option<Reply>, ServiceError> {
        match self.parent_id {
            Some(parent_id) => Reply::find_by_id(db, parent_id),
            None => Ok(None),
        }
    }

    /// One hop down: replies whose parent is this one.
    pub fn child_replies(&self, db: &Db) -> Result<Vec<Reply>, ServiceError> {
        match self.id() {
            Some(id) => Reply::filter(db, Conditions::new().eq("parent_id", Value::Integer(id))),
            None => Ok(Vec::new()),
        }
    }
}
