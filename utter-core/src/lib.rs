pub mod audio;
pub mod error;
pub mod settings;
pub mod speech;
pub mod tts;

// Public library API - the types an embedding application needs to submit
// text and consume the resulting clip.
pub use audio::wav::WavClip;
pub use error::SpeechError;
pub use settings::{Settings, SettingsManager};
pub use speech::{RequestState, SpeechActor, SpeechEvent};
pub use tts::gemini::{GeminiTts, GeminiTtsConfig};
pub use tts::provider::TextToSpeech;
