use quorum_core::ServiceError;
use quorum_orm::{model, query_scalar, Db, SqlOps, Value};
use serde::Serialize;

use super::{Question, User};

model! {
    /// `user_id`'s verdict on `question_id`: [`QuestionLike::LIKE`] or
    /// [`QuestionLike::DISLIKE`].
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct QuestionLike {
        pub question_id: i64,
        pub user_id: i64,
        pub like_status: i64,
    }
}

impl QuestionLike {
    pub const LIKE: i64 = 1;
    pub const DISLIKE: i64 = -1;

    pub fn is_like(&self) -> bool {
        self.like_status > 0
    }

    pub fn likers_for_question_id(db: &Db, question_id: i64) -> Result<Vec<User>, ServiceError> {
        SqlOps::<User>::new(db.clone()).query(
            "SELECT users.*
            FROM users
            JOIN question_likes ON users.id = question_likes.user_id
            WHERE question_likes.question_id = ?1
            ORDER BY question_likes.id",
            &[Value::Integer(question_id)],
        )
    }

    /// Number of like records for a question; 0 when there are none.
    pub fn num_likes_for_question_id(db: &Db, question_id: i64) -> Result<i64, ServiceError> {
        let count = query_scalar(
            db.as_ref(),
            "SELECT COUNT(*) AS num_likes FROM question_likes WHERE question_id = ?1",
            &[Value::Integer(question_id)],
        )?;
        match count {
            Value::Integer(n) => Ok(n),
            Value::Null => Ok(0),
            other => Err(ServiceError::Decode(format!("num_likes: unexpected {other:?}"))),
        }
    }

    pub fn liked_questions_for_user_id(
        db: &Db,
        user_id: i64,
    ) -> Result<Vec<Question>, ServiceError> {
        SqlOps::<Question>::new(db.clone()).query(
            "SELECT questions.*
            FROM questions
            JOIN question_likes ON questions.id = question_likes.question_id
            WHERE question_likes.user_id = ?1
            ORDER BY question_likes.id",
            &[Value::Integer(user_id)],
        )
    }

    /// Questions ranked by like count, descending. Ties come back in
    /// whatever order the store produces.
    pub fn most_liked_questions(db: &Db, n: usize) -> Result<Vec<Question>, ServiceError> {
        SqlOps::<Question>::new(db.clone()).query(
            "SELECT questions.*
            FROM questions
            JOIN question_likes ON questions.id = question_likes.question_id
            GROUP BY questions.id
            ORDER BY COUNT(*) DESC
            LIMIT ?1",
            &[Value::Integer(n as i64)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use quorum_orm::Model;

    #[test]
    fn zero_likes_is_zero() {
        let db = make_db();
        assert_eq!(QuestionLike::num_likes_for_question_id(&db, 1).unwrap(), 0);
    }

    #[test]
    fn like_status_round_trips() {
        let db = make_db();
        let ada = user(&db, "Ada", "Lovelace");
        let q = question(&db, &ada, "Q1");
        let l = like(&db, &q, &ada, QuestionLike::DISLIKE);

        let loaded = QuestionLike::find_by_id(&db, l.id().unwrap()).unwrap().unwrap();
        assert_eq!(loaded.like_status, -1);
        assert!(!loaded.is_like());
    }

    #[test]
    fn most_liked_groups_by_question_not_by_user() {
        let db = make_db();
        let ada = user(&db, "Ada", "Lovelace");
        let bob = user(&db, "Bob", "Babbage");
        let carl = user(&db, "Carl", "Gauss");
        let q1 = question(&db, &ada, "Q1");
        let q2 = question(&db, &ada, "Q2");
        let q3 = question(&db, &ada, "Q3");
        // One prolific liker spread over two questions...
        like(&db, &q1, &ada, 1);
        like(&db, &q2, &ada, 1);
        // ...and one question liked by everyone.
        like(&db, &q3, &ada, 1);
        like(&db, &q3, &bob, 1);
        like(&db, &q3, &carl, 1);

        let top = QuestionLike::most_liked_questions(&db, 3).unwrap();
        assert_eq!(top.len(), 3);
        assert_eq!(top[0], q3);
        assert_eq!(
            QuestionLike::liked_questions_for_user_id(&db, ada.id().unwrap()).unwrap(),
            vec![q1, q2, q3]
        );
    }
}
