use quorum_core::ServiceError;
use quorum_orm::{model, Conditions, Db, Model};
use serde::Serialize;

use super::{QuestionFollow, QuestionLike, Reply, User};

model! {
    /// A question posted by `user_id`.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct Question {
        pub user_id: i64,
        pub title: String,
        pub body: String,
    }
}

impl Question {
    pub fn find_by_author_id(db: &Db, user_id: i64) -> Result<Vec<Question>, ServiceError> {
        Question::filter(db, Conditions::new().eq("user_id", user_id))
    }

    /// The `n` questions with the most followers, most followed first.
    pub fn most_followed(db: &Db, n: usize) -> Result<Vec<Question>, ServiceError> {
        QuestionFollow::most_followed_questions(db, n)
    }

    /// The `n` questions with the most likes, most liked first.
    pub fn most_liked(db: &Db, n: usize) -> Result<Vec<Question>, ServiceError> {
        QuestionLike::most_liked_questions(db, n)
    }

    pub fn author(&self, db: &Db) -> Result<Option<User>, ServiceError> {
        User::find_by_id(db, self.user_id)
    }

    pub fn followers(&self, db: &Db) -> Result<Vec<User>, ServiceError> {
        match self.id() {
            Some(id) => QuestionFollow::followers_for_question_id(db, id),
            None => Ok(Vec::new()),
        }
    }

    pub fn likers(&self, db: &Db) -> Result<Vec<User>, ServiceError> {
        match self.id() {
            Some(id) => QuestionLike::likers_for_question_id(db, id),
            None => Ok(Vec::new()),
        }
    }

    pub fn replies(&self, db: &Db) -> Result<Vec<Reply>, ServiceError> {
        match self.id() {
            Some(id) => Reply::find_by_question_id(db, id),
            None => Ok(Vec::new()),
        }
    }

    pub fn num_likes(&self, db: &Db) -> Result<i64, ServiceError> {
        match self.id() {
            Some(id) => QuestionLike::num_likes_for_question_id(db, id),
            None => Ok(0),
        }
    }
}
