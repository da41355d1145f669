use serde::{Deserialize, Serialize};

use crate::error::SpeechError;

fn default_voice() -> String {
    "Kore".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

/// Persisted configuration. The API key may instead come from the
/// `GEMINI_API_KEY` environment variable, which takes precedence over the
/// file value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_voice")]
    pub voice: String,

    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            voice: default_voice(),
            model: default_model(),
        }
    }
}

impl Settings {
    /// Resolve the credential, environment first. Absence is a startup-time
    /// configuration error raised before any request cycle begins.
    pub fn resolve_api_key(&self) -> Result<String, SpeechError> {
        Self::pick_api_key(
            std::env::var("GEMINI_API_KEY").ok(),
            self.api_key.as_deref(),
        )
    }

    pub(crate) fn pick_api_key(
        env: Option<String>,
        configured: Option<&str>,
    ) -> Result<String, SpeechError> {
        if let Some(key) = env {
            if !key.trim().is_empty() {
                return Ok(key);
            }
        }
        match configured {
            Some(key) if !key.trim().is_empty() => Ok(key.to_string()),
            _ => Err(SpeechError::MissingApiKey),
        }
    }
}
