//! Command implementations. Each returns the text to print.

use anyhow::Context;
use quorum_core::ServiceError;
use quorum_forum::{Question, QuestionFollow, QuestionLike, Reply, ReplyThread, User};
use quorum_orm::{Db, Model, Value};
use serde::Serialize;
use serde_json::json;

use crate::Output;

/// One-line text rendering of an entity.
trait Describe {
    fn describe(&self) -> String;
}

fn id_of<T: Model>(m: &T) -> String {
    m.id().map(|i| i.to_string()).unwrap_or_else(|| "-".into())
}

impl Describe for User {
    fn describe(&self) -> String {
        format!("#{} {}", id_of(self), self.full_name())
    }
}

impl Describe for Question {
    fn describe(&self) -> String {
        format!("#{} {} (by user {})", id_of(self), self.title, self.user_id)
    }
}

impl Describe for Reply {
    fn describe(&self) -> String {
        format!("#{} [user {}] {}", id_of(self), self.user_id, self.body)
    }
}

impl Describe for QuestionFollow {
    fn describe(&self) -> String {
        format!("#{} user {} follows question {}", id_of(self), self.user_id, self.question_id)
    }
}

impl Describe for QuestionLike {
    fn describe(&self) -> String {
        format!(
            "#{} user {} {:+} on question {}",
            id_of(self),
            self.user_id,
            self.like_status,
            self.question_id
        )
    }
}

fn render_list<T: Serialize + Describe>(items: &[T], out: Output) -> anyhow::Result<String> {
    Ok(match out {
        Output::Json => serde_json::to_string_pretty(items)?,
        Output::Text if items.is_empty() => "(none)".to_string(),
        Output::Text => items
            .iter()
            .map(Describe::describe)
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

pub fn init(db: &Db) -> anyhow::Result<String> {
    quorum_forum::ensure_schema(db)?;
    Ok("schema ready".to_string())
}

pub fn user(db: &Db, id: i64, out: Output) -> anyhow::Result<String> {
    let user = User::find_by_id(db, id)?
        .ok_or_else(|| ServiceError::NotFound(format!("user {id} not found")))?;
    let questions = user.authored_questions(db)?;
    let karma = user.average_karma(db)?;

    Ok(match out {
        Output::Json => serde_json::to_string_pretty(&json!({
            "user": user,
            "questions": questions,
            "average_karma": karma,
        }))?,
        Output::Text => format!(
            "{}\nkarma: {}\nquestions:\n{}",
            user.describe(),
            format_karma(karma),
            render_list(&questions, out)?
        ),
    })
}

pub fn question(db: &Db, id: i64, out: Output) -> anyhow::Result<String> {
    let question = Question::find_by_id(db, id)?
        .ok_or_else(|| ServiceError::NotFound(format!("question {id} not found")))?;
    let author = question.author(db)?;
    let likes = question.num_likes(db)?;
    let followers = question.followers(db)?;

    Ok(match out {
        Output::Json => serde_json::to_string_pretty(&json!({
            "question": question,
            "author": author,
            "num_likes": likes,
            "followers": followers,
        }))?,
        Output::Text => format!(
            "{}\n{}\nauthor: {}\nlikes: {likes}\nfollowers:\n{}",
            question.describe(),
            question.body,
            author.map(|a| a.full_name()).unwrap_or_else(|| "(unknown)".into()),
            render_list(&followers, out)?
        ),
    })
}

pub fn top_liked(db: &Db, n: usize, out: Output) -> anyhow::Result<String> {
    render_list(&Question::most_liked(db, n)?, out)
}

pub fn top_followed(db: &Db, n: usize, out: Output) -> anyhow::Result<String> {
    render_list(&Question::most_followed(db, n)?, out)
}

pub fn karma(db: &Db, user_id: i64, out: Output) -> anyhow::Result<String> {
    let user = User::find_by_id(db, user_id)?
        .ok_or_else(|| ServiceError::NotFound(format!("user {user_id} not found")))?;
    let karma = user.average_karma(db)?;
    Ok(match out {
        Output::Json => json!({ "user_id": user_id, "average_karma": karma }).to_string(),
        Output::Text => format_karma(karma),
    })
}

fn format_karma(karma: Option<f64>) -> String {
    karma
        .map(|k| format!("{k:.2}"))
        .unwrap_or_else(|| "n/a (no questions)".to_string())
}

pub fn thread(db: &Db, question_id: i64, out: Output) -> anyhow::Result<String> {
    let thread = ReplyThread::load(db, question_id)?;
    let walk = thread.walk();

    Ok(match out {
        Output::Json => {
            let nodes: Vec<_> = walk
                .iter()
                .map(|(depth, reply)| json!({ "depth": depth, "reply": reply }))
                .collect();
            serde_json::to_string_pretty(&nodes)?
        }
        Output::Text if walk.is_empty() => "(no replies)".to_string(),
        Output::Text => walk
            .iter()
            .map(|(depth, reply)| format!("{}{}", "  ".repeat(*depth), reply.describe()))
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

/// Command-line argument to SQL value: integers and `null` are typed.
fn parse_arg(arg: &str) -> Value {
    if arg.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    match arg.parse::<i64>() {
        Ok(i) => Value::Integer(i),
        Err(_) => Value::Text(arg.to_string()),
    }
}

pub fn find(
    db: &Db,
    entity: &str,
    finder: &str,
    args: &[String],
    out: Output,
) -> anyhow::Result<String> {
    let args: Vec<Value> = args.iter().map(|a| parse_arg(a)).collect();
    let context = || format!("{entity}.{finder}");

    match entity {
        "users" => render_list(&User::find_by(db, finder, args).with_context(context)?, out),
        "questions" => render_list(
            &Question::find_by(db, finder, args).with_context(context)?,
            out,
        ),
        "replies" => render_list(&Reply::find_by(db, finder, args).with_context(context)?, out),
        "question_follows" => render_list(
            &QuestionFollow::find_by(db, finder, args).with_context(context)?,
            out,
        ),
        "question_likes" => render_list(
            &QuestionLike::find_by(db, finder, args).with_context(context)?,
            out,
        ),
        other => anyhow::bail!("unknown entity '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quorum_sql::SqliteStore;

    use super::*;

    fn seeded() -> Db {
        let db: Db = Arc::new(SqliteStore::open_in_memory().unwrap());
        quorum_forum::ensure_schema(&db).unwrap();
        let mut ada = User::new("Ada".into(), "Lovelace".into());
        ada.save(&db).unwrap();
        let mut q = Question::new(1, "Engines?".into(), "How do they work".into());
        q.save(&db).unwrap();
        QuestionLike::new(1, 1, QuestionLike::LIKE).save(&db).unwrap();
        let mut root = Reply::new(1, None, 1, "root".into());
        root.save(&db).unwrap();
        Reply::new(1, root.id(), 1, "nested".into()).save(&db).unwrap();
        db
    }

    #[test]
    fn parse_arg_types() {
        assert_eq!(parse_arg("42"), Value::Integer(42));
        assert_eq!(parse_arg("NULL"), Value::Null);
        assert_eq!(parse_arg("Ada"), Value::from("Ada"));
    }

    #[test]
    fn user_text_and_json() {
        let db = seeded();
        let text = user(&db, 1, Output::Text).unwrap();
        assert!(text.starts_with("#1 Ada Lovelace"));
        assert!(text.contains("karma: 1.00"));

        let json: serde_json::Value =
            serde_json::from_str(&user(&db, 1, Output::Json).unwrap()).unwrap();
        assert_eq!(json["user"]["fname"], "Ada");
        assert_eq!(json["questions"][0]["title"], "Engines?");
    }

    #[test]
    fn missing_user_is_an_error() {
        let db = seeded();
        let err = user(&db, 9, Output::Text).unwrap_err();
        assert!(err.to_string().contains("user 9 not found"));
    }

    #[test]
    fn thread_is_indented() {
        let db = seeded();
        let text = thread(&db, 1, Output::Text).unwrap();
        assert_eq!(text, "#1 [user 1] root\n  #2 [user 1] nested");
        assert_eq!(thread(&db, 2, Output::Text).unwrap(), "(no replies)");
    }

    #[test]
    fn find_dispatches_by_entity() {
        let db = seeded();
        let text = find(
            &db,
            "users",
            "find_by_fname_and_lname",
            &["Ada".into(), "Lovelace".into()],
            Output::Text,
        )
        .unwrap();
        assert_eq!(text, "#1 Ada Lovelace");

        let roots =
            find(&db, "replies", "find_by_parent_id", &["null".into()], Output::Text).unwrap();
        assert_eq!(roots, "#1 [user 1] root");

        assert!(find(&db, "users", "fetch_fname", &["Ada".into()], Output::Text).is_err());
        assert!(find(&db, "badges", "find_by_id", &["1".into()], Output::Text).is_err());
    }

    #[test]
    fn rankings_and_karma() {
        let db = seeded();
        assert_eq!(
            top_liked(&db, 5, Output::Text).unwrap(),
            "#1 Engines? (by user 1)"
        );
        assert_eq!(top_followed(&db, 5, Output::Text).unwrap(), "(none)");
        assert_eq!(karma(&db, 1, Output::Text).unwrap(), "1.00");
    }
}
