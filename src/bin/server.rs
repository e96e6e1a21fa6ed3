//! mount-me-server binary
//!
//! Runs the attach/detach engine as a stdio bridge: the host writes
//! newline-delimited `SceneEvent` JSON to stdin and reads `HostCommand`
//! JSON lines from stdout.
//!
//! ## Configuration (env / TOML via `config` crate)
//!
//! | Key                      | Default  | Description                        |
//! |--------------------------|----------|------------------------------------|
//! | `MOUNT_ME_PLAYER_ID`     | `local`  | Local session/user id              |
//! | `MOUNT_ME_EVENT_BUFFER`  | `64`     | Inbound event channel capacity     |

use anyhow::{Context, Result};
use clap::Parser;
use mount_me::protocol::{HostCommand, SceneEvent};
use mount_me::{MountService, SceneAgent};
use parking_lot::Mutex;
use serde::Deserialize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "mount-me-server", about = "Mount Me attach/detach engine", version)]
struct Args {
    /// Local session/user id (overrides settings)
    #[arg(long, env = "MOUNT_ME_PLAYER_ID")]
    player_id: Option<String>,

    /// Optional TOML settings file
    #[arg(long)]
    config: Option<String>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Settings {
    player_id: String,
    event_buffer: usize,
}

fn load_settings(path: Option<&str>) -> Result<Settings> {
    let mut builder = config::Config::builder()
        .set_default("player_id", "local")?
        .set_default("event_buffer", 64)?;

    if let Some(path) = path {
        builder = builder.add_source(config::File::with_name(path));
    }
    builder = builder.add_source(config::Environment::with_prefix("MOUNT_ME"));

    builder
        .build()?
        .try_deserialize()
        .context("Invalid settings")
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise logging on stderr; stdout carries host commands only.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mount_me=debug".parse()?),
        )
        .init();

    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())?;
    let player_id = args.player_id.unwrap_or(settings.player_id);

    tracing::info!("Starting mount-me-server (player='{}')", player_id);

    let service = Arc::new(Mutex::new(MountService::new(&player_id)));
    let agent = SceneAgent::new(service);

    let (event_tx, event_rx) = mpsc::channel(settings.event_buffer);
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let reader = tokio::spawn(read_events(event_tx));
    let writer = tokio::spawn(write_commands(command_rx));
    let agent_task = tokio::spawn(agent.run(event_rx, command_tx));

    tokio::select! {
        result = agent_task => {
            result.context("agent task panicked")??;
            // Let the writer drain any final commands (stats snapshot).
            writer.await.context("writer task panicked")??;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("mount-me-server shutting down (SIGINT)");
        }
    }

    reader.abort();
    Ok(())
}

// ---------------------------------------------------------------------------
// Stdio bridge
// ---------------------------------------------------------------------------

/// Parse newline-delimited `SceneEvent` JSON from stdin into the event
/// channel. Malformed lines are logged and skipped.
async fn read_events(events: mpsc::Sender<SceneEvent>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<SceneEvent>(&line) {
            Ok(event) => {
                if events.send(event).await.is_err() {
                    break;
                }
            }
            Err(e) => tracing::warn!("ignoring malformed event line: {}", e),
        }
    }
    Ok(())
}

/// Serialise outbound commands as JSON lines on stdout.
async fn write_commands(mut commands: mpsc::UnboundedReceiver<HostCommand>) -> Result<()> {
    let mut stdout = tokio::io::stdout();

    while let Some(command) = commands.recv().await {
        let mut line = serde_json::to_vec(&command)?;
        line.push(b'\n');
        stdout.write_all(&line).await?;
        stdout.flush().await?;
    }
    Ok(())
}
