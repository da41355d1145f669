//! Gemini text-to-speech implementation

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audio::{AudioProfile, MODEL_OUTPUT_PROFILE};
use crate::error::SpeechError;
use crate::tts::provider::TextToSpeech;

/// Keeps the model from answering conversationally instead of reading
const READ_ALOUD_PREFIX: &str = "Read the following text aloud, exactly as written: ";

#[derive(Debug, Clone)]
pub struct GeminiTtsConfig {
    pub api_key: String,
    pub voice: String,
    pub model: String,
}

impl GeminiTtsConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            voice: "Kore".to_string(),
            model: "gemini-2.5-flash-preview-tts".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct GeminiTts {
    config: GeminiTtsConfig,
    client: Client,
    base_url: String,
}

impl GeminiTts {
    /// Build the provider, failing fast when the credential is absent.
    pub fn new(config: GeminiTtsConfig) -> Result<Self, SpeechError> {
        if config.api_key.trim().is_empty() {
            return Err(SpeechError::MissingApiKey);
        }

        let client = Client::builder().timeout(Duration::from_secs(120)).build()?;

        Ok(Self {
            config,
            client,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
    speech_config: SpeechConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CandidatePart {
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
struct InlineData {
    data: Option<String>,
}

/// Pull the audio payload out of the first candidate's parts. Any shape
/// without one is treated as absence of audio, not as a transport error.
fn extract_audio_payload(response: GenerateContentResponse) -> Result<String, SpeechError> {
    response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .find_map(|part| part.inline_data.and_then(|inline| inline.data))
        .ok_or(SpeechError::NoAudio)
}

#[async_trait]
impl TextToSpeech for GeminiTts {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn output_profile(&self) -> AudioProfile {
        MODEL_OUTPUT_PROFILE
    }

    async fn synthesize(&self, text: &str) -> Result<String, SpeechError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.config.model
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!("{READ_ALOUD_PREFIX}{text}"),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.config.voice.clone(),
                        },
                    },
                },
            },
        };

        debug!(
            model = %self.config.model,
            voice = %self.config.voice,
            "sending synthesis request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Collaborator(anyhow!(
                "Gemini API error {status}: {body}"
            )));
        }

        let response: GenerateContentResponse = response.json().await?;
        extract_audio_payload(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_payload_from_inline_data() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "ignored preamble"},
                        {"inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": "AAEC"}}
                    ]
                }
            }]
        }))
        .unwrap();

        assert_eq!(extract_audio_payload(response).unwrap(), "AAEC");
    }

    #[test]
    fn audio_free_response_is_no_audio() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "I cannot read that."}]}}]
        }))
        .unwrap();

        assert!(matches!(
            extract_audio_payload(response),
            Err(SpeechError::NoAudio)
        ));
    }

    #[test]
    fn empty_response_is_no_audio() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            extract_audio_payload(response),
            Err(SpeechError::NoAudio)
        ));
    }

    #[test]
    fn request_uses_camel_case_wire_names() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hello".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["AUDIO".to_string()],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: "Kore".to_string(),
                        },
                    },
                },
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value.pointer("/generationConfig/responseModalities/0"),
            Some(&json!("AUDIO"))
        );
        assert_eq!(
            value.pointer(
                "/generationConfig/speechConfig/voiceConfig/prebuiltVoiceConfig/voiceName"
            ),
            Some(&json!("Kore"))
        );
    }

    #[test]
    fn blank_api_key_is_a_configuration_error() {
        let err = GeminiTts::new(GeminiTtsConfig::new("   ".to_string())).unwrap_err();
        assert!(matches!(err, SpeechError::MissingApiKey));
    }
}
