//! Terminal front end for the match controller.
//!
//! Wires one proposer per side from command-line flags, runs a single
//! match through a session actor, and streams the move log to stdout.
//! The session's event stream is the only coupling to the core: this
//! binary never touches the board or history directly.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tokio::sync::broadcast::error::RecvError;

use arena::{ControllerConfig, Session, SessionConfig, SessionEvent};
use proposer::{MoveProposer, RandomProposer, ScriptedProposer};

/// Command-line arguments for a single match.
#[derive(Parser)]
#[command(
    name = "arena",
    about = "Run a chess match between two move proposers"
)]
struct Cli {
    /// Proposer kind playing White.
    #[arg(long, value_enum, default_value_t = ProposerKind::Random)]
    white: ProposerKind,

    /// Proposer kind playing Black.
    #[arg(long, value_enum, default_value_t = ProposerKind::Random)]
    black: ProposerKind,

    /// Comma-separated move script for White (with `--white scripted`).
    #[arg(long)]
    white_moves: Option<String>,

    /// Comma-separated move script for Black (with `--black scripted`).
    #[arg(long)]
    black_moves: Option<String>,

    /// Custom starting position as a FEN string.
    #[arg(long)]
    fen: Option<String>,

    /// Hard ceiling on total half-moves before the match is aborted.
    #[arg(long, default_value_t = 500)]
    max_half_moves: usize,

    /// Failed proposals tolerated per half-move before aborting.
    #[arg(long, default_value_t = 3)]
    max_retries: u32,

    /// Print the final snapshot as pretty JSON instead of a summary line.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProposerKind {
    /// Picks a random legal move every turn.
    Random,
    /// Replays a fixed move list verbatim.
    Scripted,
}

fn build_proposer(
    kind: ProposerKind,
    label: &str,
    moves: Option<&str>,
) -> Result<Box<dyn MoveProposer>> {
    match kind {
        ProposerKind::Random => Ok(Box::new(RandomProposer::new(label))),
        ProposerKind::Scripted => {
            let script = moves
                .with_context(|| format!("--{label}-moves is required for a scripted proposer"))?;
            let moves: Vec<String> = script
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            if moves.is_empty() {
                bail!("--{label}-moves is empty");
            }
            Ok(Box::new(ScriptedProposer::new(label, moves)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let white = build_proposer(cli.white, "white", cli.white_moves.as_deref())?;
    let black = build_proposer(cli.black, "black", cli.black_moves.as_deref())?;

    let config = SessionConfig {
        controller: ControllerConfig {
            max_half_moves: cli.max_half_moves,
            max_retries: cli.max_retries,
        },
        start_fen: cli.fen.clone(),
    };

    let handle = Session::spawn(white, black, config).context("failed to spawn session")?;
    let (_, mut events) = handle.subscribe().await?;
    let _ = handle.start().await?;

    loop {
        match events.recv().await {
            Ok(SessionEvent::StateChanged(snapshot)) => {
                if let Some(entry) = snapshot.history.last() {
                    if entry.ply > 0 {
                        println!("{:>3}. {}", entry.ply, entry.description);
                    }
                }
            }
            Ok(SessionEvent::MoveRejected {
                side,
                notation,
                reason,
            }) => {
                println!("     {side} proposed {notation:?}: {reason}");
            }
            Ok(SessionEvent::GameEnded {
                outcome, snapshot, ..
            }) => {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                } else {
                    println!("Result: {outcome} after {} half-moves", snapshot.move_count);
                }
                break;
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event stream lagged, move log may have gaps");
            }
            Err(RecvError::Closed) => bail!("session closed before the game ended"),
        }
    }

    handle.shutdown().await;
    Ok(())
}
