mod controller;
mod gateway;
mod progress;

// Public API of the session subsystem.
pub use controller::{InitPhase, QuizSessionController};
pub use gateway::{RecordingGateway, UiEvent, UiGateway};
pub use progress::SessionProgress;
