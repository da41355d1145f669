use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::audio::decode::decode_pcm_payload;
use crate::audio::wav::WavClip;
use crate::error::SpeechError;
use crate::speech::events::{EventSender, SpeechEvent};
use crate::speech::state::RequestState;
use crate::tts::provider::TextToSpeech;

/// Input messages to the `SpeechActor`
pub enum SpeechActorMessage {
    /// Submit text for synthesis, starting a fresh request cycle
    Submit(String),
}

/// The `SpeechActor` owns the request lifecycle.
///
/// It is built with two channels, an input and an output channel. Surfaces
/// send `SpeechActorMessage`s in and render the `SpeechEvent`s that come out;
/// all state lives inside the actor. One request cycle is in flight at a
/// time: a new submit supersedes whatever the slot held, and completions of
/// superseded cycles are detected through a generation counter and dropped,
/// so a slow early response can never overwrite a newer cycle.
pub struct SpeechActor {
    tx: mpsc::UnboundedSender<SpeechActorMessage>,
}

impl SpeechActor {
    /// Launch the actor and return a handle plus its event stream
    pub fn launch(
        provider: Arc<dyn TextToSpeech>,
    ) -> (Self, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (event_sender, event_rx) = EventSender::new();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        let state = ActorState {
            event_sender,
            provider,
            state: RequestState::Idle,
            generation: 0,
            completion_tx,
        };
        tokio::spawn(run_actor(state, rx, completion_rx));

        (Self { tx }, event_rx)
    }

    pub fn submit(&self, text: impl Into<String>) -> Result<()> {
        self.tx.send(SpeechActorMessage::Submit(text.into()))?;
        Ok(())
    }
}

/// Result of one synthesis task, tagged with the cycle that spawned it
struct Completion {
    generation: u64,
    payload: Result<String, SpeechError>,
}

struct ActorState {
    event_sender: EventSender,
    provider: Arc<dyn TextToSpeech>,
    state: RequestState,
    generation: u64,
    completion_tx: mpsc::UnboundedSender<Completion>,
}

async fn run_actor(
    mut state: ActorState,
    mut rx: mpsc::UnboundedReceiver<SpeechActorMessage>,
    mut completion_rx: mpsc::UnboundedReceiver<Completion>,
) {
    info!("SpeechActor started");

    loop {
        tokio::select! {
            message = rx.recv() => {
                let Some(message) = message else {
                    debug!("request queue dropped, actor exiting");
                    break;
                };
                match message {
                    SpeechActorMessage::Submit(text) => handle_submit(&mut state, text),
                }
            }
            Some(completion) = completion_rx.recv() => {
                handle_completion(&mut state, completion);
            }
        }
    }
}

fn handle_submit(state: &mut ActorState, text: String) {
    if text.trim().is_empty() {
        state
            .event_sender
            .validation_failed(SpeechError::EmptyInput.to_string());
        return;
    }

    // Entering Loading replaces whatever the slot held; a previous Ready
    // clip reference is released right here.
    if let Some(clip) = state.state.clip() {
        debug!(bytes = clip.bytes().len(), "releasing superseded clip");
    }
    state.generation += 1;
    let generation = state.generation;
    set_state(state, RequestState::Loading);

    let provider = Arc::clone(&state.provider);
    let completion_tx = state.completion_tx.clone();
    tokio::spawn(async move {
        let payload = provider.synthesize(&text).await;
        let _ = completion_tx.send(Completion {
            generation,
            payload,
        });
    });
}

fn handle_completion(state: &mut ActorState, completion: Completion) {
    if completion.generation != state.generation {
        debug!(
            generation = completion.generation,
            current = state.generation,
            "discarding stale synthesis result"
        );
        return;
    }

    let next = match finish_cycle(state, completion.payload) {
        Ok(clip) => RequestState::Ready(Arc::new(clip)),
        Err(e) => {
            error!(error = %e, provider = state.provider.name(), "synthesis cycle failed");
            RequestState::Failed(e.to_string())
        }
    };
    set_state(state, next);
}

/// Decode the payload and wrap it in a container. Both stages are synchronous
/// and run on the actor task once the collaborator call resumes.
fn finish_cycle(
    state: &ActorState,
    payload: Result<String, SpeechError>,
) -> Result<WavClip, SpeechError> {
    let pcm = decode_pcm_payload(&payload?)?;
    Ok(WavClip::from_pcm(&pcm, state.provider.output_profile()))
}

fn set_state(state: &mut ActorState, next: RequestState) {
    state.state = next.clone();
    state.event_sender.state_changed(next);
}
