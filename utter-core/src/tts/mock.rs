use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::audio::{AudioProfile, MODEL_OUTPUT_PROFILE};
use crate::error::SpeechError;
use crate::tts::provider::TextToSpeech;

/// Scripted behavior for the mock synthesizer
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return this base64 payload
    Payload(String),
    /// Sleep, then return the payload. Exercises stale completions.
    DelayedPayload { delay: Duration, payload: String },
    /// A well-formed response that carries no audio field
    MissingAudio,
    /// A collaborator failure with this message
    Error(String),
}

/// Mock synthesizer for lifecycle tests.
///
/// Queued behaviors are consumed in order; once the queue is empty the
/// fallback repeats. Calls and submitted texts are recorded so tests can
/// assert the provider was (or was not) reached.
pub struct MockSynthesizer {
    queue: Mutex<VecDeque<MockBehavior>>,
    fallback: MockBehavior,
    call_count: Mutex<usize>,
    captured_texts: Mutex<Vec<String>>,
}

impl MockSynthesizer {
    pub fn new(fallback: MockBehavior) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            fallback,
            call_count: Mutex::new(0),
            captured_texts: Mutex::new(Vec::new()),
        }
    }

    pub fn with_queue(behaviors: Vec<MockBehavior>, fallback: MockBehavior) -> Self {
        Self {
            queue: Mutex::new(behaviors.into()),
            ..Self::new(fallback)
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn captured_texts(&self) -> Vec<String> {
        self.captured_texts.lock().unwrap().clone()
    }

    fn next_behavior(&self) -> MockBehavior {
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl TextToSpeech for MockSynthesizer {
    fn name(&self) -> &'static str {
        "Mock"
    }

    fn output_profile(&self) -> AudioProfile {
        MODEL_OUTPUT_PROFILE
    }

    async fn synthesize(&self, text: &str) -> Result<String, SpeechError> {
        *self.call_count.lock().unwrap() += 1;
        self.captured_texts.lock().unwrap().push(text.to_string());

        match self.next_behavior() {
            MockBehavior::Payload(payload) => Ok(payload),
            MockBehavior::DelayedPayload { delay, payload } => {
                tokio::time::sleep(delay).await;
                Ok(payload)
            }
            MockBehavior::MissingAudio => Err(SpeechError::NoAudio),
            MockBehavior::Error(message) => Err(SpeechError::Collaborator(anyhow!(message))),
        }
    }
}
