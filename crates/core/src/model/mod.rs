mod answer;
mod ids;
mod question;
mod session;

pub use ids::{OptionId, ParseIdError, QuestionId, QuizId, SessionId, UserId};

pub use answer::{AnswerResult, AnswerStatus};
pub use question::{AnswerOption, CurrentQuestion};
pub use session::{QuizSession, UserAnswer};
