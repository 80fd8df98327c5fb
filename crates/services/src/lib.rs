#![forbid(unsafe_code)]

pub mod sessions;

pub use quiz_core::Clock;

pub use sessions::{
    InitPhase, QuizSessionController, RecordingGateway, SessionProgress, UiEvent, UiGateway,
};
