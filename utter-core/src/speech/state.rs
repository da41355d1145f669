use std::sync::Arc;

use crate::audio::wav::WavClip;

/// Position of the single request slot.
///
/// Exactly one value is current at a time. The actor owns it and pushes every
/// change through `SpeechEvent::StateChanged`; there is no ambient global to
/// poke at. Replacing `Ready` drops the actor's reference to the clip, which
/// is how a superseded container gets released.
#[derive(Debug, Clone)]
pub enum RequestState {
    /// No request yet, or the last input failed validation
    Idle,
    /// A synthesis request is in flight
    Loading,
    /// The last cycle produced a playable clip
    Ready(Arc<WavClip>),
    /// The last cycle failed; the message is user-facing
    Failed(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn clip(&self) -> Option<&Arc<WavClip>> {
        match self {
            Self::Ready(clip) => Some(clip),
            _ => None,
        }
    }
}
