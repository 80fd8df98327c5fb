use std::sync::Mutex;

/// One-shot announcements the controller hands to the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UiEvent {
    SessionStarted { quiz_title: String },
}

/// UI side effects the controller triggers but does not own.
///
/// Routing and notifications belong to the host; the controller only says
/// where to go and what happened.
pub trait UiGateway: Send + Sync {
    fn navigate(&self, path: &str);
    fn notify(&self, event: UiEvent);
}

/// Gateway that records everything, for testing and prototyping.
#[derive(Default)]
pub struct RecordingGateway {
    paths: Mutex<Vec<String>>,
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigation paths seen so far, in order.
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.paths.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Events seen so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().map(|g| g.clone()).unwrap_or_default()
    }
}

impl UiGateway for RecordingGateway {
    fn navigate(&self, path: &str) {
        if let Ok(mut guard) = self.paths.lock() {
            guard.push(path.to_string());
        }
    }

    fn notify(&self, event: UiEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
