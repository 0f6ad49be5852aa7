use std::sync::Arc;

use quorum_forum::{ensure_schema, Question, QuestionFollow, QuestionLike, Reply, ReplyThread, User};
use quorum_orm::{Conditions, Db, Model};
use quorum_sql::{SqliteStore, Value};

fn open_db(dir: &tempfile::TempDir) -> Db {
    let db: Db = Arc::new(SqliteStore::open(&dir.path().join("questions.db")).unwrap());
    ensure_schema(&db).unwrap();
    db
}

#[test]
fn ada_asks_and_gets_liked() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);

    let mut ada = User::new("Ada".into(), "Lovelace".into());
    ada.save(&db).unwrap();
    assert_eq!(ada.id(), Some(1));

    let mut q1 = Question::new(1, "Q1".into(), "B1".into());
    q1.save(&db).unwrap();
    assert_eq!(q1.id(), Some(1));

    let by_author = Question::find_by_author_id(&db, 1).unwrap();
    assert_eq!(by_author.len(), 1);
    assert_eq!(by_author[0].title, "Q1");

    let mut bob = User::new("Bob".into(), "Babbage".into());
    bob.save(&db).unwrap();
    for liker in [&ada, &bob] {
        QuestionLike::new(1, liker.id().unwrap(), QuestionLike::LIKE)
            .save(&db)
            .unwrap();
    }
    assert_eq!(QuestionLike::num_likes_for_question_id(&db, 1).unwrap(), 2);

    let mut q2 = Question::new(2, "Q2".into(), "B2".into());
    q2.save(&db).unwrap();
    QuestionLike::new(2, 1, QuestionLike::LIKE).save(&db).unwrap();

    let top = Question::most_liked(&db, 1).unwrap();
    assert_eq!(top, vec![q1]);
}

#[test]
fn dynamic_finder_equals_filter() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    for (f, l) in [("Ada", "Lovelace"), ("Ada", "Byron"), ("Charles", "Babbage")] {
        User::new(f.into(), l.into()).save(&db).unwrap();
    }

    let args: Vec<Value> = vec!["Ada".into(), "Lovelace".into()];
    let dynamic = User::find_by(&db, "find_by_fname_and_lname", args).unwrap();
    let explicit =
        User::filter(&db, Conditions::new().eq("fname", "Ada").eq("lname", "Lovelace")).unwrap();
    assert_eq!(dynamic, explicit);
    assert_eq!(dynamic.len(), 1);

    let err = User::find_by(&db, "lookup_fname", vec!["Ada".into()]).unwrap_err();
    assert_eq!(err.error_code(), "MALFORMED_QUERY");
    assert!(User::filter(&db, Conditions::new()).unwrap().is_empty());
}

#[test]
fn threaded_replies() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let mut ada = User::new("Ada".into(), "Lovelace".into());
    ada.save(&db).unwrap();
    let mut q = Question::new(ada.id().unwrap(), "Q1".into(), "B1".into());
    q.save(&db).unwrap();

    let mut a = Reply::new(q.id().unwrap(), None, ada.id().unwrap(), "A".into());
    a.save(&db).unwrap();
    let mut b = Reply::new(q.id().unwrap(), a.id(), ada.id().unwrap(), "B".into());
    b.save(&db).unwrap();

    assert_eq!(a.child_replies(&db).unwrap(), vec![b.clone()]);
    let parent = b.parent_reply(&db).unwrap().unwrap();
    assert_eq!(parent, a);
    assert!(parent.parent_reply(&db).unwrap().is_none());

    let thread = ReplyThread::load(&db, q.id().unwrap()).unwrap();
    let walk: Vec<(usize, &str)> = thread
        .walk()
        .into_iter()
        .map(|(depth, r)| (depth, r.body.as_str()))
        .collect();
    assert_eq!(walk, [(0, "A"), (1, "B")]);
}

#[test]
fn data_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let db = open_db(&dir);
        let mut ada = User::new("Ada".into(), "Lovelace".into());
        ada.save(&db).unwrap();
        ada.id().unwrap()
    };

    let db = open_db(&dir);
    let ada = User::find_by_id(&db, id).unwrap().unwrap();
    assert_eq!(ada.full_name(), "Ada Lovelace");
}

#[test]
fn constraint_violation_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    db.exec_batch("CREATE UNIQUE INDEX uq_follow ON question_follows(question_id, user_id)")
        .unwrap();

    QuestionFollow::new(1, 1).save(&db).unwrap();
    let mut duplicate = QuestionFollow::new(1, 1);
    let err = duplicate.save(&db).unwrap_err();
    assert_eq!(err.error_code(), "STORAGE_ERROR");
    assert_eq!(duplicate.id(), None);
    assert_eq!(QuestionFollow::all(&db).unwrap().len(), 1);
}

#[test]
fn entities_serialize_with_identity() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let mut ada = User::new("Ada".into(), "Lovelace".into());
    ada.save(&db).unwrap();

    let json = serde_json::to_value(&ada).unwrap();
    assert_eq!(json["id"], 1);
    assert_eq!(json["fname"], "Ada");
}
