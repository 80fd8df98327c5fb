use serde::{Deserialize, Serialize};

use crate::model::{OptionId, QuestionId};

/// One selectable answer for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub id: OptionId,
    pub text: String,
}

/// The question currently presented to the user.
///
/// Set each time a new question arrives and cleared before every fetch so the
/// UI never renders stale content during the round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentQuestion {
    pub quiz_question_id: QuestionId,
    pub question_text: String,
    pub options: Vec<AnswerOption>,
    pub time_limit_in_seconds: u32,
    pub time_remaining_in_seconds: u32,
}
