use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{AnswerStatus, OptionId, QuestionId, QuizId, SessionId, UserId};

/// A single user's attempt at a quiz, as served by the backend.
///
/// This mirrors the create-session response field for field so the service
/// layer can store it without any transformation. It is immutable once
/// created; a retry replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSession {
    pub id: SessionId,
    pub quiz_id: QuizId,
    pub quiz_title: String,
    pub user_id: UserId,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_score: u32,
    pub is_completed: bool,
    pub user_answers: Vec<UserAnswer>,
    pub total_questions: u32,
    pub has_instant_feedback: bool,
    pub category: Option<String>,
}

/// Answer row recorded by the backend for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub id: u64,
    pub session_id: SessionId,
    pub quiz_question_id: QuestionId,
    pub selected_option_id: Option<OptionId>,
    pub submitted_answer: Option<String>,
    pub status: AnswerStatus,
    pub score: u32,
    pub question_text: String,
    pub selected_option_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn session_deserializes_from_wire_shape() {
        let body = r#"{
            "id": "s1",
            "quizId": 42,
            "quizTitle": "Capitals",
            "userId": "u1",
            "startTime": "2023-11-14T22:13:20Z",
            "endTime": null,
            "totalScore": 0,
            "isCompleted": false,
            "userAnswers": [],
            "totalQuestions": 5,
            "hasInstantFeedback": false,
            "category": "Geography"
        }"#;

        let session: QuizSession = serde_json::from_str(body).unwrap();
        assert_eq!(session.id, SessionId::new("s1"));
        assert_eq!(session.quiz_id, QuizId::new(42));
        assert_eq!(session.start_time, fixed_now());
        assert_eq!(session.total_questions, 5);
        assert!(!session.has_instant_feedback);
        assert!(session.user_answers.is_empty());
    }
}
