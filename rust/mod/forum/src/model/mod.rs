pub mod question;
pub mod question_follow;
pub mod question_like;
pub mod reply;
pub mod user;

pub use question::Question;
pub use question_follow::QuestionFollow;
pub use question_like::QuestionLike;
pub use reply::Reply;
pub use user::User;
