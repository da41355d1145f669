//! Collaborator boundary to remote text-to-speech services

pub mod gemini;
pub mod mock;
pub mod provider;

pub use gemini::{GeminiTts, GeminiTtsConfig};
pub use provider::TextToSpeech;
