use anyhow::anyhow;
use thiserror::Error;

/// Everything a request cycle can raise. The actor flattens these into the
/// single user-visible failure slot; nothing partial escapes on error.
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Enter some text to synthesize")]
    EmptyInput,

    #[error("Gemini API key is not configured. Set GEMINI_API_KEY or add api_key to settings.")]
    MissingApiKey,

    #[error("Malformed audio payload: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("No audio data received from the API.")]
    NoAudio,

    #[error("{0}")]
    Collaborator(anyhow::Error),
}

impl From<reqwest::Error> for SpeechError {
    fn from(source: reqwest::Error) -> Self {
        Self::Collaborator(anyhow!(source))
    }
}
