use serde::{Deserialize, Serialize};

/// Grading status of a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerStatus {
    NotAnswered,
    Correct,
    Incorrect,
    TimedOut,
}

impl AnswerStatus {
    /// Returns true when the answer was graded as correct.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, AnswerStatus::Correct)
    }
}

/// Outcome of submitting an answer for the current question.
///
/// Produced by the answer-grading collaborator; held by the controller only
/// until it decides the next transition, then appended to the
/// completed-answers sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub status: AnswerStatus,
    pub score_awarded: u32,
    pub is_quiz_complete: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_backend_strings() {
        let json = serde_json::to_string(&AnswerStatus::TimedOut).unwrap();
        assert_eq!(json, "\"TimedOut\"");

        let parsed: AnswerStatus = serde_json::from_str("\"NotAnswered\"").unwrap();
        assert_eq!(parsed, AnswerStatus::NotAnswered);
    }

    #[test]
    fn result_deserializes_from_wire_shape() {
        let body = r#"{"status":"Correct","scoreAwarded":10,"isQuizComplete":false}"#;
        let result: AnswerResult = serde_json::from_str(body).unwrap();
        assert!(result.status.is_correct());
        assert_eq!(result.score_awarded, 10);
        assert!(!result.is_quiz_complete);
    }
}
