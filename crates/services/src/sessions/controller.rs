use std::sync::Arc;

use tracing::{debug, info, warn};

use backend::api::{QuestionSource, SessionCreator};
use quiz_core::model::{AnswerResult, CurrentQuestion, QuizId, QuizSession, SessionId, UserId};

use super::gateway::{UiEvent, UiGateway};
use super::progress::SessionProgress;

const INIT_FALLBACK_MESSAGE: &str = "Failed to start quiz session";
const DEFAULT_ERROR_MESSAGE: &str = "An error occurred";

/// Initialization lifecycle of a controller.
///
/// Session creation is attempted at most once per retry epoch; the phase is
/// what enforces that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitPhase {
    Idle,
    Initializing,
    Initialized,
}

/// Drives a single user's pass through a quiz.
///
/// The controller owns the session lifecycle: it creates the session once,
/// fetches questions sequentially, reacts to answer outcomes, and hands off
/// to the results view when the quiz ends. Network failures never escape it;
/// they land in `error()` as display strings, split into validation (4xx)
/// and transient failures.
///
/// The host drives it from a single-threaded event loop: call
/// [`ensure_initialized`](Self::ensure_initialized) on mount and again after
/// any state change (it is the reactive initialization trigger; a stored
/// error keeps it from looping, and only [`retry`](Self::retry) clears that
/// block).
pub struct QuizSessionController {
    creator: Arc<dyn SessionCreator>,
    questions: Arc<dyn QuestionSource>,
    gateway: Arc<dyn UiGateway>,

    quiz_id: QuizId,
    user_id: UserId,

    phase: InitPhase,
    epoch: u32,

    session: Option<QuizSession>,
    current_question: Option<CurrentQuestion>,
    last_answer_result: Option<AnswerResult>,
    current_question_number: u32,
    completed_answers: Vec<AnswerResult>,

    error: Option<String>,
    validation_error: bool,
}

impl QuizSessionController {
    #[must_use]
    pub fn new(
        quiz_id: QuizId,
        user_id: UserId,
        creator: Arc<dyn SessionCreator>,
        questions: Arc<dyn QuestionSource>,
        gateway: Arc<dyn UiGateway>,
    ) -> Self {
        Self {
            creator,
            questions,
            gateway,
            quiz_id,
            user_id,
            phase: InitPhase::Idle,
            epoch: 0,
            session: None,
            current_question: None,
            last_answer_result: None,
            current_question_number: 1,
            completed_answers: Vec::new(),
            error: None,
            validation_error: false,
        }
    }

    //
    // ─── STATE ─────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&CurrentQuestion> {
        self.current_question.as_ref()
    }

    #[must_use]
    pub fn last_answer_result(&self) -> Option<&AnswerResult> {
        self.last_answer_result.as_ref()
    }

    /// 1-based number of the question currently in play.
    #[must_use]
    pub fn current_question_number(&self) -> u32 {
        self.current_question_number
    }

    /// Answer outcomes recorded so far in this retry epoch, in order.
    #[must_use]
    pub fn completed_answers(&self) -> &[AnswerResult] {
        &self.completed_answers
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True when the stored error came from a 4xx response, so the UI can
    /// show a validation message instead of a retry affordance.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        self.validation_error
    }

    /// Number of user-initiated retries since the controller was built.
    #[must_use]
    pub fn retry_count(&self) -> u32 {
        self.epoch
    }

    #[must_use]
    pub fn phase(&self) -> InitPhase {
        self.phase
    }

    #[must_use]
    pub fn is_initializing(&self) -> bool {
        self.phase == InitPhase::Initializing
    }

    /// Derived from actual data, not call timing: loading until both the
    /// session and a question exist, unless an error took over.
    #[must_use]
    pub fn is_initial_loading(&self) -> bool {
        (self.session.is_none() || self.current_question.is_none()) && self.error.is_none()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self
            .session
            .as_ref()
            .map_or(0, |s| s.total_questions as usize);
        let answered = self.completed_answers.len();
        let correct = self
            .completed_answers
            .iter()
            .filter(|r| r.status.is_correct())
            .count();
        SessionProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            correct,
        }
    }

    //
    // ─── INITIALIZATION ────────────────────────────────────────────────────────
    //

    /// Reactive initialization trigger.
    ///
    /// Runs session setup iff no attempt has started in this epoch and no
    /// error is blocking. Safe to call from every host event: re-render
    /// storms collapse into a single session-creation call.
    pub async fn ensure_initialized(&mut self) {
        if self.phase != InitPhase::Idle || self.error.is_some() {
            return;
        }
        self.initialize().await;
    }

    async fn initialize(&mut self) {
        // Inputs may come straight from route params; without both, setup
        // is a no-op rather than an error.
        if self.quiz_id.value() == 0 || self.user_id.is_empty() {
            return;
        }

        self.phase = InitPhase::Initializing;
        self.error = None;
        self.validation_error = false;

        debug!(
            quiz_id = %self.quiz_id,
            user_id = %self.user_id,
            epoch = self.epoch,
            "initializing quiz session"
        );

        let created = self.creator.create_session(self.quiz_id, &self.user_id).await;
        match created {
            Ok(session) => {
                info!(session_id = %session.id, "quiz session created");
                let session_id = session.id.clone();
                let quiz_title = session.quiz_title.clone();

                // The response maps through untouched; the controller adds
                // no interpretation of its own.
                self.session = Some(session);
                self.current_question_number = 1;
                self.phase = InitPhase::Initialized;
                self.gateway.notify(UiEvent::SessionStarted { quiz_title });

                self.fetch_next_question(&session_id).await;
            }
            Err(err) => {
                warn!(error = %err, "failed to create quiz session");
                self.validation_error = err.is_validation();
                self.error = Some(err.user_message(INIT_FALLBACK_MESSAGE));
                // Back to Idle, not Initialized: the stored error is now the
                // only thing holding the trigger back until a retry.
                self.phase = InitPhase::Idle;
            }
        }
    }

    /// Recover from an initialization failure.
    ///
    /// Clears the blocking error, opens a fresh retry epoch and resets the
    /// guard and the completed answers. Does not touch the network itself;
    /// the next [`ensure_initialized`](Self::ensure_initialized) performs
    /// the new attempt.
    pub fn retry(&mut self) {
        debug!(epoch = self.epoch, "retrying quiz session initialization");
        self.error = None;
        self.validation_error = false;
        self.epoch += 1;
        self.phase = InitPhase::Idle;
        self.completed_answers.clear();
    }

    //
    // ─── QUESTION FLOW ─────────────────────────────────────────────────────────
    //

    /// Fetch the next unanswered question for `session_id`.
    ///
    /// Prior feedback, the previous question and any error are cleared up
    /// front so the UI never shows stale content during the round trip. A
    /// failure whose message says the quiz is over is not an error: it
    /// routes to the results view instead. Never retries on its own.
    pub async fn fetch_next_question(&mut self, session_id: &SessionId) {
        self.last_answer_result = None;
        self.current_question = None;
        self.error = None;

        let fetched = self.questions.next_question(session_id).await;
        match fetched {
            Ok(question) => {
                self.current_question = Some(question);
            }
            Err(err) => {
                let message = err.user_message(DEFAULT_ERROR_MESSAGE);
                // Deliberate simplification kept from the collaborator
                // contract: completion arrives as wording, not as a code.
                if message.contains("completed") || message.contains("No more questions") {
                    self.gateway.navigate(&format!("/quiz/results/{session_id}"));
                } else {
                    warn!(error = %err, %session_id, "failed to get next question");
                    self.error = Some(format!("Failed to load next question: {message}"));
                }
            }
        }
    }

    /// React to a scored answer handed in by the submission collaborator.
    ///
    /// The outcome is always recorded for progress tracking. Terminal
    /// results hand off to the results view; otherwise instant-feedback
    /// sessions park the result for display while plain sessions advance
    /// straight to the next question.
    pub async fn handle_answer_outcome(&mut self, result: AnswerResult) {
        self.completed_answers.push(result.clone());

        let Some(session) = &self.session else {
            return;
        };

        if result.is_quiz_complete {
            let path = format!("/quiz/results/{}", session.id);
            self.gateway.navigate(&path);
        } else if session.has_instant_feedback {
            self.last_answer_result = Some(result);
        } else {
            let session_id = session.id.clone();
            self.current_question_number += 1;
            self.fetch_next_question(&session_id).await;
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
