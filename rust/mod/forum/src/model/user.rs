use quorum_core::ServiceError;
use quorum_orm::{model, query_scalar, Conditions, Db, Model, Value};
use serde::Serialize;

use super::{Question, QuestionFollow, QuestionLike, Reply};

model! {
    /// A forum member.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct User {
        pub fname: String,
        pub lname: String,
    }
}

impl User {
    /// Users with exactly this first and last name.
    pub fn find_by_name(db: &Db, fname: &str, lname: &str) -> Result<Vec<User>, ServiceError> {
        User::filter(db, Conditions::new().eq("fname", fname).eq("lname", lname))
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.fname, self.lname)
    }

    pub fn authored_questions(&self, db: &Db) -> Result<Vec<Question>, ServiceError> {
        match self.id() {
            Some(id) => Question::find_by_author_id(db, id),
            None => Ok(Vec::new()),
        }
    }

    pub fn authored_replies(&self, db: &Db) -> Result<Vec<Reply>, ServiceError> {
        match self.id() {
            Some(id) => Reply::find_by_user_id(db, id),
            None => Ok(Vec::new()),
        }
    }

    pub fn followed_questions(&self, db: &Db) -> Result<Vec<Question>, ServiceError> {
        match self.id() {
            Some(id) => QuestionFollow::followed_questions_for_user_id(db, id),
            None => Ok(Vec::new()),
        }
    }

    pub fn liked_questions(&self, db: &Db) -> Result<Vec<Question>, ServiceError> {
        match self.id() {
            Some(id) => QuestionLike::liked_questions_for_user_id(db, id),
            None => Ok(Vec::new()),
        }
    }

    /// Like records per authored question.
    ///
    /// Counts non-null like statuses across the user's distinct questions
    /// and divides by the number of those questions. `None` when the user
    /// has authored nothing.
    pub fn average_karma(&self, db: &Db) -> Result<Option<f64>, ServiceError> {
        let Some(id) = self.id() else {
            return Ok(None);
        };

        let karma = query_scalar(
            db.as_ref(),
            "SELECT
                COUNT(question_likes.like_status) /
                    CAST(COUNT(DISTINCT users_questions.id) AS FLOAT) AS avg_karma
            FROM (
                SELECT DISTINCT * FROM questions WHERE questions.user_id = ?1
            ) AS users_questions
            LEFT OUTER JOIN question_likes
                ON question_likes.question_id = users_questions.id",
            &[Value::Integer(id)],
        )?;

        match karma {
            Value::Null => Ok(None),
            Value::Real(r) => Ok(Some(r)),
            Value::Integer(i) => Ok(Some(i as f64)),
            other => Err(ServiceError::Decode(format!("avg_karma: unexpected {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn find_by_name_matches_both_parts() {
        let db = make_db();
        let ada = user(&db, "Ada", "Lovelace");
        user(&db, "Ada", "Byron");

        assert_eq!(User::find_by_name(&db, "Ada", "Lovelace").unwrap(), vec![ada]);
        assert!(User::find_by_name(&db, "Grace", "Hopper").unwrap().is_empty());
    }

    #[test]
    fn authored_and_followed_questions() {
        let db = make_db();
        let ada = user(&db, "Ada", "Lovelace");
        let bob = user(&db, "Bob", "Babbage");
        let q1 = question(&db, &ada, "Q1");
        let q2 = question(&db, &bob, "Q2");
        follow(&db, &q2, &ada);
        like(&db, &q2, &ada, 1);

        assert_eq!(ada.authored_questions(&db).unwrap(), vec![q1.clone()]);
        assert_eq!(ada.followed_questions(&db).unwrap(), vec![q2.clone()]);
        assert_eq!(ada.liked_questions(&db).unwrap(), vec![q2]);
        assert!(bob.followed_questions(&db).unwrap().is_empty());

        let r = reply(&db, &q1, None, &bob, "answer");
        assert_eq!(bob.authored_replies(&db).unwrap(), vec![r]);
    }

    #[test]
    fn unsaved_user_has_no_relations() {
        let db = make_db();
        let ghost = User::new("No".into(), "Body".into());
        assert!(ghost.authored_questions(&db).unwrap().is_empty());
        assert_eq!(ghost.average_karma(&db).unwrap(), None);
    }

    #[test]
    fn average_karma_without_questions_is_absent() {
        let db = make_db();
        let ada = user(&db, "Ada", "Lovelace");
        assert_eq!(ada.average_karma(&db).unwrap(), None);
    }

    #[test]
    fn average_karma_is_likes_per_question() {
        let db = make_db();
        let ada = user(&db, "Ada", "Lovelace");
        let bob = user(&db, "Bob", "Babbage");
        let carl = user(&db, "Carl", "Gauss");
        let q1 = question(&db, &ada, "Q1");
        question(&db, &ada, "Q2");
        like(&db, &q1, &bob, 1);
        like(&db, &q1, &carl, -1);
        // Someone else's likes do not count.
        let q3 = question(&db, &bob, "Q3");
        like(&db, &q3, &ada, 1);

        assert_eq!(ada.average_karma(&db).unwrap(), Some(1.0));
        assert_eq!(bob.average_karma(&db).unwrap(), Some(1.0));
        assert_eq!(carl.average_karma(&db).unwrap(), None);
    }

    #[test]
    fn user_without_likes_has_zero_karma() {
        let db = make_db();
        let ada = user(&db, "Ada", "Lovelace");
        question(&db, &ada, "Q1");
        assert_eq!(ada.average_karma(&db).unwrap(), Some(0.0));
    }
}
