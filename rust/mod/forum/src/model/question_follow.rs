use quorum_core::ServiceError;
use quorum_orm::{model, Db, SqlOps, Value};
use serde::Serialize;

use super::{Question, User};

model! {
    /// `user_id` follows `question_id`. One row per follow; duplicates are
    /// not rejected here.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct QuestionFollow {
        pub question_id: i64,
        pub user_id: i64,
    }
}

impl QuestionFollow {
    pub fn followers_for_question_id(db: &Db, question_id: i64) -> Result<Vec<User>, ServiceError> {
        SqlOps::<User>::new(db.clone()).query(
            "SELECT users.*
            FROM question_follows
            JOIN users ON users.id = question_follows.user_id
            WHERE question_follows.question_id = ?1
            ORDER BY question_follows.id",
            &[Value::Integer(question_id)],
        )
    }

    pub fn followed_questions_for_user_id(
        db: &Db,
        user_id: i64,
    ) -> Result<Vec<Question>, ServiceError> {
        SqlOps::<Question>::new(db.clone()).query(
            "SELECT questions.*
            FROM question_follows
            JOIN questions ON questions.id = question_follows.question_id
            WHERE question_follows.user_id = ?1
            ORDER BY question_follows.id",
            &[Value::Integer(user_id)],
        )
    }

    /// Questions ranked by follower count, descending. Ties come back in
    /// whatever order the store produces.
    pub fn most_followed_questions(db: &Db, n: usize) -> Result<Vec<Question>, ServiceError> {
        SqlOps::<Question>::new(db.clone()).query(
            "SELECT questions.*
            FROM questions
            JOIN question_follows ON question_follows.question_id = questions.id
            GROUP BY questions.id
            ORDER BY COUNT(question_follows.user_id) DESC
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
    fn table_name_is_derived() {
        assert_eq!(QuestionFollow::table_name(), "question_follows");
    }

    #[test]
    fn both_join_directions() {
        let db = make_db();
        let ada = user(&db, "Ada", "Lovelace");
        let bob = user(&db, "Bob", "Babbage");
        let q1 = question(&db, &ada, "Q1");
        let q2 = question(&db, &ada, "Q2");
        follow(&db, &q1, &ada);
        follow(&db, &q1, &bob);
        follow(&db, &q2, &bob);

        let q1_id = q1.id().unwrap();
        assert_eq!(
            QuestionFollow::followers_for_question_id(&db, q1_id).unwrap(),
            vec![ada.clone(), bob.clone()]
        );
        assert_eq!(
            QuestionFollow::followed_questions_for_user_id(&db, bob.id().unwrap()).unwrap(),
            vec![q1, q2]
        );
        assert!(QuestionFollow::followers_for_question_id(&db, 999).unwrap().is_empty());
    }

    #[test]
    fn follows_are_findable_by_pair() {
        let db = make_db();
        let ada = user(&db, "Ada", "Lovelace");
        let q = question(&db, &ada, "Q1");
        let f = follow(&db, &q, &ada);

        let found = QuestionFollow::find_by(
            &db,
            "find_by_question_id_and_user_id",
            vec![q.id().into(), ada.id().into()],
        )
        .unwrap();
        assert_eq!(found, vec![f]);
    }
}
