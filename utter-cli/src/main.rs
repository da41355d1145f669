use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use indicatif::ProgressBar;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use utter_core::audio::playback::AudioPlayer;
use utter_core::speech::{RequestState, SpeechActor, SpeechEvent};
use utter_core::{GeminiTts, GeminiTtsConfig, SettingsManager, WavClip};

#[derive(Parser, Debug)]
#[command(name = "utter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Synthesize text into a playable WAV clip")]
struct Args {
    /// Text to speak; read from stdin when omitted
    text: Option<String>,

    /// Where to write the clip
    #[arg(long, default_value = "speech.wav")]
    out: PathBuf,

    /// Play the clip through the default output device after writing it
    #[arg(long)]
    play: bool,

    /// Voice to synthesize with (overrides settings)
    #[arg(long)]
    voice: Option<String>,

    /// Load settings from a specific file
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
}

fn main() -> Result<()> {
    setup_tracing()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    let args = Args::parse();

    let settings_manager = match args.settings.clone() {
        Some(path) => SettingsManager::from_path(path)?,
        None => SettingsManager::new()?,
    };
    let settings = settings_manager.settings();

    let text = match args.text.clone() {
        Some(text) => text,
        None => read_stdin()?,
    };

    let mut config = GeminiTtsConfig::new(settings.resolve_api_key()?);
    config.model = settings.model;
    config.voice = args.voice.clone().unwrap_or(settings.voice);
    let provider = Arc::new(GeminiTts::new(config)?);

    let (actor, mut events) = SpeechActor::launch(provider);
    actor.submit(text)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Synthesizing...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    while let Some(event) = events.recv().await {
        match event {
            SpeechEvent::StateChanged(RequestState::Ready(clip)) => {
                spinner.finish_and_clear();
                std::fs::write(&args.out, clip.bytes())?;
                info!(path = ?args.out, bytes = clip.bytes().len(), "clip written");
                println!(
                    "Wrote {:.1}s of audio ({} bytes) to {}",
                    clip.duration().as_secs_f64(),
                    clip.bytes().len(),
                    args.out.display()
                );
                if args.play {
                    play_clip(&clip).await?;
                }
                return Ok(());
            }
            SpeechEvent::StateChanged(RequestState::Failed(message)) => {
                spinner.finish_and_clear();
                eprintln!("error: {message}");
                std::process::exit(1);
            }
            SpeechEvent::ValidationFailed(reason) => {
                spinner.finish_and_clear();
                eprintln!("error: {reason}");
                std::process::exit(1);
            }
            SpeechEvent::StateChanged(RequestState::Loading | RequestState::Idle) => {}
        }
    }

    Ok(())
}

async fn play_clip(clip: &WavClip) -> Result<()> {
    let player = AudioPlayer::new()?;
    let playback = player.play(clip)?;
    info!("playback started");
    playback.wait().await;
    Ok(())
}

fn read_stdin() -> Result<String> {
    use std::io::Read;

    let mut text = String::new();
    std::io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

fn setup_tracing() -> Result<()> {
    use std::fs;
    use tracing_subscriber::fmt;

    // Trace to a file so the spinner and output stay clean
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    let trace_dir = PathBuf::from(home).join(".utter").join("trace");
    fs::create_dir_all(&trace_dir)?;

    let log_file = trace_dir.join("utter.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(file).with_ansi(false).with_target(true))
        .with(EnvFilter::new("info"))
        .init();

    info!("Tracing initialized to {:?}", log_file);
    Ok(())
}
