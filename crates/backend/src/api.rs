use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

use quiz_core::Clock;
use quiz_core::model::{CurrentQuestion, QuizId, QuizSession, SessionId, UserId};

/// Errors surfaced by backend adapters.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum ApiError {
    /// The server answered with a non-success status, optionally carrying
    /// the nested human-readable message from the response body.
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("connection error: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status code, when the failure reached the server.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for client errors in the 4xx range, which the UI treats as
    /// validation failures rather than transient ones.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Extracts the message to show a user.
    ///
    /// Prefers the server-provided message, falls back to this error's own
    /// display text, and uses `fallback` when the server answered with a
    /// status but no message body.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } if !m.trim().is_empty() => m.clone(),
            ApiError::Status { message: _, .. } => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

/// Creates a new quiz session record for a (quiz, user) pair.
#[async_trait]
pub trait SessionCreator: Send + Sync {
    /// Create a session and return its full record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the quiz does not exist, the request is
    /// rejected, or the transport fails.
    async fn create_session(
        &self,
        quiz_id: QuizId,
        user_id: &UserId,
    ) -> Result<QuizSession, ApiError>;
}

/// Serves the next unanswered question for a session.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch the next question, starting its timer server-side.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the session is unknown, the quiz has no more
    /// questions (signalled through the error message), or the transport
    /// fails.
    async fn next_question(&self, session_id: &SessionId) -> Result<CurrentQuestion, ApiError>;
}

/// A quiz as known to the in-memory backend.
#[derive(Debug, Clone)]
pub struct QuizDefinition {
    pub title: String,
    pub category: Option<String>,
    pub has_instant_feedback: bool,
    pub questions: Vec<CurrentQuestion>,
}

#[derive(Debug, Clone)]
struct SessionCursor {
    quiz_id: QuizId,
    next: usize,
}

/// Simple in-memory backend implementation for testing and prototyping.
///
/// Mimics the real REST collaborators, including the message-based
/// completion signal on question exhaustion.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    clock: Clock,
    quizzes: Arc<Mutex<HashMap<QuizId, QuizDefinition>>>,
    sessions: Arc<Mutex<HashMap<SessionId, SessionCursor>>>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            quizzes: Arc::new(Mutex::new(HashMap::new())),
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register a quiz so sessions can be created against it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the internal lock is poisoned.
    pub fn register_quiz(&self, id: QuizId, quiz: QuizDefinition) -> Result<(), ApiError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        guard.insert(id, quiz);
        Ok(())
    }
}

#[async_trait]
impl SessionCreator for InMemoryBackend {
    async fn create_session(
        &self,
        quiz_id: QuizId,
        user_id: &UserId,
    ) -> Result<QuizSession, ApiError> {
        let quizzes = self
            .quizzes
            .lock()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let Some(quiz) = quizzes.get(&quiz_id) else {
            return Err(ApiError::Status {
                status: 404,
                message: Some(format!("Quiz {quiz_id} was not found.")),
            });
        };

        let session_id = SessionId::new(Uuid::new_v4().to_string());
        let session = QuizSession {
            id: session_id.clone(),
            quiz_id,
            quiz_title: quiz.title.clone(),
            user_id: user_id.clone(),
            start_time: self.clock.now(),
            end_time: None,
            total_score: 0,
            is_completed: false,
            user_answers: Vec::new(),
            total_questions: u32::try_from(quiz.questions.len()).unwrap_or(u32::MAX),
            has_instant_feedback: quiz.has_instant_feedback,
            category: quiz.category.clone(),
        };

        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        sessions.insert(session_id, SessionCursor { quiz_id, next: 0 });

        Ok(session)
    }
}

#[async_trait]
impl QuestionSource for InMemoryBackend {
    async fn next_question(&self, session_id: &SessionId) -> Result<CurrentQuestion, ApiError> {
        // Take the cursor snapshot first so the two locks are never held at once.
        let cursor = {
            let sessions = self
                .sessions
                .lock()
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            sessions.get(session_id).cloned()
        };
        let Some(cursor) = cursor else {
            return Err(ApiError::Status {
                status: 404,
                message: Some(format!("Session {session_id} was not found.")),
            });
        };

        let question = {
            let quizzes = self
                .quizzes
                .lock()
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            let quiz = quizzes.get(&cursor.quiz_id).ok_or(ApiError::Status {
                status: 404,
                message: Some("Quiz was not found.".to_string()),
            })?;
            quiz.questions.get(cursor.next).cloned()
        };

        let Some(question) = question else {
            // The wording carries the completion signal the controller
            // matches on, same as the real backend.
            return Err(ApiError::Status {
                status: 400,
                message: Some(
                    "No more questions available. The session has been completed.".to_string(),
                ),
            });
        };

        let mut sessions = self
            .sessions
            .lock()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        if let Some(cursor) = sessions.get_mut(session_id) {
            cursor.next += 1;
        }

        Ok(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerOption, OptionId, QuestionId};
    use quiz_core::time::{fixed_clock, fixed_now};

    fn build_question(id: u64) -> CurrentQuestion {
        CurrentQuestion {
            quiz_question_id: QuestionId::new(id),
            question_text: format!("Q{id}"),
            options: vec![
                AnswerOption {
                    id: OptionId::new(1),
                    text: "A".into(),
                },
                AnswerOption {
                    id: OptionId::new(2),
                    text: "B".into(),
                },
            ],
            time_limit_in_seconds: 30,
            time_remaining_in_seconds: 30,
        }
    }

    fn build_backend(question_count: u64) -> InMemoryBackend {
        let backend = InMemoryBackend::new(fixed_clock());
        backend
            .register_quiz(
                QuizId::new(42),
                QuizDefinition {
                    title: "Capitals".into(),
                    category: Some("Geography".into()),
                    has_instant_feedback: false,
                    questions: (1..=question_count).map(build_question).collect(),
                },
            )
            .unwrap();
        backend
    }

    #[tokio::test]
    async fn creates_session_with_quiz_metadata() {
        let backend = build_backend(3);
        let session = backend
            .create_session(QuizId::new(42), &UserId::new("u1"))
            .await
            .unwrap();

        assert_eq!(session.quiz_id, QuizId::new(42));
        assert_eq!(session.quiz_title, "Capitals");
        assert_eq!(session.total_questions, 3);
        assert_eq!(session.start_time, fixed_now());
        assert!(!session.is_completed);
        assert!(!session.id.as_str().is_empty());
    }

    #[tokio::test]
    async fn unknown_quiz_is_a_validation_failure() {
        let backend = build_backend(1);
        let err = backend
            .create_session(QuizId::new(9), &UserId::new("u1"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn serves_questions_in_order_then_signals_completion() {
        let backend = build_backend(2);
        let session = backend
            .create_session(QuizId::new(42), &UserId::new("u1"))
            .await
            .unwrap();

        let q1 = backend.next_question(&session.id).await.unwrap();
        let q2 = backend.next_question(&session.id).await.unwrap();
        assert_eq!(q1.quiz_question_id, QuestionId::new(1));
        assert_eq!(q2.quiz_question_id, QuestionId::new(2));

        let err = backend.next_question(&session.id).await.unwrap_err();
        let message = err.user_message("An error occurred");
        assert!(message.contains("No more questions"));
        assert!(message.contains("completed"));
    }

    #[tokio::test]
    async fn unknown_session_is_not_a_completion_signal() {
        let backend = build_backend(1);
        let err = backend
            .next_question(&SessionId::new("missing"))
            .await
            .unwrap_err();

        let message = err.user_message("An error occurred");
        assert!(!message.contains("No more questions"));
        assert!(!message.contains("completed"));
    }

    #[test]
    fn user_message_prefers_server_message() {
        let err = ApiError::Status {
            status: 422,
            message: Some("Quiz has no questions.".into()),
        };
        assert_eq!(err.user_message("fallback"), "Quiz has no questions.");
    }

    #[test]
    fn user_message_falls_back_for_bare_status() {
        let err = ApiError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(
            err.user_message("Failed to start quiz session"),
            "Failed to start quiz session"
        );

        let blank = ApiError::Status {
            status: 500,
            message: Some("   ".into()),
        };
        assert_eq!(blank.user_message("fallback"), "fallback");
    }

    #[test]
    fn user_message_uses_display_for_transport_errors() {
        let err = ApiError::Transport("connection reset".into());
        assert_eq!(
            err.user_message("fallback"),
            "connection error: connection reset"
        );
    }

    #[test]
    fn validation_range_is_4xx_only() {
        let status = |s| ApiError::Status {
            status: s,
            message: None,
        };
        assert!(status(400).is_validation());
        assert!(status(422).is_validation());
        assert!(status(499).is_validation());
        assert!(!status(399).is_validation());
        assert!(!status(500).is_validation());
        assert!(!ApiError::Transport("down".into()).is_validation());
    }
}
