use tokio::sync::mpsc;

use crate::speech::state::RequestState;

/// `SpeechEvent`s are the actor's output. Surfaces (CLI, tests, an embedding
/// application) subscribe to the receiver returned by `SpeechActor::launch`
/// and render from it.
#[derive(Debug, Clone)]
pub enum SpeechEvent {
    /// The request slot moved to a new state
    StateChanged(RequestState),
    /// Input was rejected before any synthesis call; the slot did not move
    ValidationFailed(String),
}

/// A small wrapper over the `event_tx` for convenience.
#[derive(Clone)]
pub struct EventSender {
    event_tx: mpsc::UnboundedSender<SpeechEvent>,
}

impl EventSender {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (event_tx, rx) = mpsc::unbounded_channel();
        (Self { event_tx }, rx)
    }

    pub fn state_changed(&self, state: RequestState) {
        let _ = self.event_tx.send(SpeechEvent::StateChanged(state));
    }

    pub fn validation_failed(&self, reason: String) {
        let _ = self.event_tx.send(SpeechEvent::ValidationFailed(reason));
    }
}
