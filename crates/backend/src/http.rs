use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use quiz_core::model::{CurrentQuestion, QuizId, QuizSession, SessionId, UserId};

use crate::api::{ApiError, QuestionSource, SessionCreator};

/// Where the quiz REST API lives.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Reads `QUIZ_API_BASE_URL`, defaulting to the local dev server.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("QUIZ_API_BASE_URL").unwrap_or_else(|_| "http://localhost:5000/api".into());
        Self { base_url }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// REST implementation of the session collaborators.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: ApiConfig,
}

impl HttpBackend {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ApiConfig::from_env())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest<'a> {
    quiz_id: QuizId,
    user_id: &'a UserId,
}

/// Body shape the backend uses for failures; only `message` is contractual.
#[derive(Debug, Deserialize)]
struct ServerFailure {
    message: Option<String>,
}

async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let message = match response.text().await {
        Ok(body) => serde_json::from_str::<ServerFailure>(&body)
            .ok()
            .and_then(|failure| failure.message),
        Err(_) => None,
    };
    ApiError::Status { status, message }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Transport(err.to_string())
    }
}

#[async_trait]
impl SessionCreator for HttpBackend {
    async fn create_session(
        &self,
        quiz_id: QuizId,
        user_id: &UserId,
    ) -> Result<QuizSession, ApiError> {
        let url = self.config.endpoint("QuizSessions");
        debug!(%quiz_id, %user_id, "creating quiz session");

        let response = self
            .client
            .post(url)
            .json(&CreateSessionRequest { quiz_id, user_id })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response.json::<QuizSession>().await.map_err(transport_error)
    }
}

#[async_trait]
impl QuestionSource for HttpBackend {
    async fn next_question(&self, session_id: &SessionId) -> Result<CurrentQuestion, ApiError> {
        let url = self
            .config
            .endpoint(&format!("QuizSessions/{session_id}/next-question"));
        debug!(%session_id, "fetching next question");

        let response = self.client.get(url).send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<CurrentQuestion>()
            .await
            .map_err(transport_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = ApiConfig::new("http://localhost:5000/api/");
        assert_eq!(
            config.endpoint("QuizSessions"),
            "http://localhost:5000/api/QuizSessions"
        );
    }

    #[test]
    fn create_request_matches_wire_shape() {
        let user_id = UserId::new("u1");
        let body = serde_json::to_string(&CreateSessionRequest {
            quiz_id: QuizId::new(42),
            user_id: &user_id,
        })
        .unwrap();
        assert_eq!(body, r#"{"quizId":42,"userId":"u1"}"#);
    }

    #[test]
    fn failure_body_yields_server_message() {
        let failure: ServerFailure =
            serde_json::from_str(r#"{"message":"Quiz was not found."}"#).unwrap();
        assert_eq!(failure.message.as_deref(), Some("Quiz was not found."));

        // ProblemDetails without a message field still parses, just without one.
        let bare: ServerFailure =
            serde_json::from_str(r#"{"title":"Bad Request","status":400}"#).unwrap();
        assert!(bare.message.is_none());
    }
}
