use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use speech_relay::listen::{listen, ListenOptions};
use speech_relay::{create_router, AppState, Config, NatsClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "speech-relay", version, about = "Live speech recognition relay")]
struct Cli {
    /// Configuration file (defaults to config/speech-relay.* if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP/WebSocket relay server
    Serve,
    /// Stream a WAV file to a running relay and print the transcript
    Listen {
        /// Relay WebSocket URL
        #[arg(long, default_value = "ws://localhost:8080/stream")]
        url: String,
        /// 16-bit PCM WAV file to stream
        #[arg(long)]
        file: PathBuf,
        /// Recognition language (server default if omitted)
        #[arg(long)]
        language: Option<String>,
        /// Translate final results into this language
        #[arg(long)]
        translate: Option<String>,
        /// Enable speaker diarization
        #[arg(long)]
        diarization: bool,
        /// Expected number of speakers
        #[arg(long, default_value_t = 2)]
        speakers: u32,
        /// Samples per audio frame
        #[arg(long, default_value_t = 2048)]
        frame_samples: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cli.config).await,
        Command::Listen {
            url,
            file,
            language,
            translate,
            diarization,
            speakers,
            frame_samples,
        } => {
            let view = listen(ListenOptions {
                url,
                file,
                language,
                translate,
                diarization,
                speakers,
                frame_samples,
            })
            .await?;

            println!("\n--- Transcript ---\n{}", view.final_text());
            if !view.translation().is_empty() {
                println!("--- Translation ---\n{}", view.translation());
            }
            Ok(())
        }
    }
}

async fn serve(config_path: Option<PathBuf>) -> Result<()> {
    let cfg = Config::load(config_path.as_deref())?;
    let defaults = cfg.recognition_defaults()?;

    info!("Loaded config: {}", cfg.service.name);
    info!(
        "Recognition defaults: language={}, diarization={} [{}..={}], translate={:?}",
        defaults.default_language,
        defaults.diarization_default_enabled,
        defaults.diarization_min,
        defaults.diarization_max,
        defaults.translate_default_target
    );

    let nats = Arc::new(NatsClient::connect(&cfg.nats).await?);
    let state = AppState::new(defaults, nats.clone(), nats);
    let router = create_router(state, &cfg.service.http);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP on http://{}", addr);
    info!(
        "Audio sessions on ws://{}{}, client assets from {}",
        addr,
        cfg.service.http.stream_path,
        cfg.service.http.static_dir.display()
    );

    axum::serve(listener, router)
        .await
        .context("HTTP server failed")?;

    Ok(())
}
