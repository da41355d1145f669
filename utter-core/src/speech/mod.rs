//! Request lifecycle: a single in-flight synthesis cycle driven by an actor

pub mod actor;
pub mod events;
pub mod state;

pub use actor::{SpeechActor, SpeechActorMessage};
pub use events::SpeechEvent;
pub use state::RequestState;
