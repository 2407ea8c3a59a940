//! avastream CLI
//!
//! - List selectable avatars, voices, and languages
//! - Create / close streaming sessions through the session API
//! - Replay recorded data-channel frames into a transcript (offline)

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use avastream_client::api::{self, HttpSessionApi, SessionApi};
use avastream_client::config::{self, ClientConfig};
use avastream_client::obs::ClientMetrics;
use avastream_client::preview;
use avastream_core::error::{AvaError, Result};
use avastream_core::Transcript;

const DEFAULT_CONFIG: &str = "avastream.yaml";

#[derive(Parser)]
#[command(name = "avastream", version, about = "Streaming avatar session client")]
struct Cli {
    /// Config file (defaults apply if the default path does not exist).
    #[arg(long, short, default_value = DEFAULT_CONFIG)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Api(ApiCommand),
    /// Replay frames (one JSON frame per line, `> text` for a local send).
    Replay {
        file: String,
        /// Print frame counters after the transcript.
        #[arg(long)]
        metrics: bool,
    },
}

/// Subcommands that talk to the session API.
#[derive(Subcommand)]
enum ApiCommand {
    /// Fetch languages, voices, and avatars.
    Options,
    /// Create a streaming session and print its id and channel.
    Create {
        #[arg(long)]
        avatar_id: Option<String>,
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Close a streaming session.
    Close { session_id: String },
    /// Show the placeholder media for an avatar.
    Preview {
        #[arg(long)]
        avatar_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.client_code().as_str(), error = %e, "command failed");
            eprintln!("error [{}]: {e}", e.client_code().as_str());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let metrics = Arc::new(ClientMetrics::default());
    match cli.command {
        Command::Replay { file, metrics: show } => replay(&file, show, &metrics),
        Command::Api(cmd) => run_api(cmd, &cli.config, metrics).await,
    }
}

async fn run_api(cmd: ApiCommand, config_path: &str, metrics: Arc<ClientMetrics>) -> Result<()> {
    let cfg = load_config(config_path)?;
    let token = config::resolve_token(&cfg)?;
    let api = HttpSessionApi::new(&cfg.api, token, metrics)?;

    match cmd {
        ApiCommand::Options => {
            let opts = api::fetch_options(&api).await?;
            println!("languages:");
            for l in &opts.languages {
                println!("  {:<8} {}", l.lang_code, l.lang_name);
            }
            println!("voices:");
            for v in &opts.voices {
                println!("  {:<24} {}", v.voice_id, v.name);
            }
            println!("avatars:");
            for a in &opts.avatars {
                println!("  {:<32} {}", a.avatar_id, a.name);
            }
        }
        ApiCommand::Create { avatar_id, minutes } => {
            let avatar_id = avatar_id.unwrap_or(cfg.session.avatar_id);
            let minutes = minutes.unwrap_or(cfg.session.duration_minutes);
            if !(1..=120).contains(&minutes) {
                return Err(AvaError::BadRequest("minutes must be between 1 and 120".into()));
            }
            let session = api.create_session(&avatar_id, minutes * 60).await?;
            println!("session: {}", session.id);
            println!("channel: {}", session.credentials.channel);
            println!("uid:     {}", session.credentials.uid);
        }
        ApiCommand::Close { session_id } => {
            api.close_session(&session_id).await?;
            println!("closed: {session_id}");
        }
        ApiCommand::Preview { avatar_id } => {
            let avatar_id = avatar_id.unwrap_or_else(|| cfg.session.avatar_id.clone());
            let avatars = api.list_avatars().await?;
            let p = preview::placeholder_for(&avatars, &avatar_id, &cfg.session.avatar_video_url);
            println!("{:?}: {}", p.kind, p.url);
        }
    }
    Ok(())
}

fn load_config(path: &str) -> Result<ClientConfig> {
    if path == DEFAULT_CONFIG && !Path::new(path).exists() {
        tracing::debug!("no {DEFAULT_CONFIG}, using defaults");
        return Ok(ClientConfig::default());
    }
    config::load_from_file(path)
}

fn replay(file: &str, show_metrics: bool, metrics: &ClientMetrics) -> Result<()> {
    let s = std::fs::read_to_string(file)
        .map_err(|e| AvaError::BadRequest(format!("read {file} failed: {e}")))?;

    let mut transcript = Transcript::new();
    for (n, line) in s.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(text) = line.strip_prefix("> ") {
            transcript.push_local_at(n as u64, text);
            continue;
        }
        let applied = transcript.apply_frame(line.as_bytes());
        metrics.frames.inc(&[("outcome", applied.as_str())]);
    }

    for entry in transcript.iter() {
        let who = if entry.is_sent_by_me() { "me" } else { "avatar" };
        println!("[{who:>6}] {}", entry.text());
    }
    if show_metrics {
        print!("{}", metrics.render());
    }
    Ok(())
}
