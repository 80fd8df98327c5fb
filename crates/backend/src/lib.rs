#![forbid(unsafe_code)]

pub mod api;
pub mod http;

pub use api::{ApiError, InMemoryBackend, QuestionSource, QuizDefinition, SessionCreator};
pub use http::{ApiConfig, HttpBackend};
