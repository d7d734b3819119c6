use tokio::sync::{broadcast, mpsc};
use tracing::Instrument;

use crate::controller::GameOverReason;

use super::commands::SessionCommand;
use super::events::SessionEvent;
use super::state::{SessionState, StepOutcome};

/// The main session actor loop.
/// Owns all mutable state. Drives at most one proposal at a time and
/// processes commands between (or instead of) half-moves.
pub(crate) async fn run_session_actor(
    state: SessionState,
    cmd_rx: mpsc::Receiver<SessionCommand>,
    event_tx: broadcast::Sender<SessionEvent>,
) {
    let span = tracing::info_span!(
        "session",
        white = state.white_name(),
        black = state.black_name()
    );
    run_session_actor_inner(state, cmd_rx, event_tx)
        .instrument(span)
        .await;
}

async fn run_session_actor_inner(
    mut state: SessionState,
    mut cmd_rx: mpsc::Receiver<SessionCommand>,
    event_tx: broadcast::Sender<SessionEvent>,
) {
    tracing::info!("session actor started");

    loop {
        if state.is_stepping() {
            // Commands win over the in-flight proposal: a Reset arriving
            // mid-proposal discards the request, and the next step
            // re-reads the then-current board.
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(SessionCommand::Shutdown) | None => break,
                        Some(cmd) => handle_command(&mut state, cmd, &event_tx),
                    }
                }

                outcome = state.next_half_move() => {
                    publish_step(&mut state, outcome, &event_tx);
                }
            }
        } else {
            match cmd_rx.recv().await {
                Some(SessionCommand::Shutdown) | None => break,
                Some(cmd) => handle_command(&mut state, cmd, &event_tx),
            }
        }
    }

    tracing::info!("session actor exited");
}

fn handle_command(
    state: &mut SessionState,
    cmd: SessionCommand,
    event_tx: &broadcast::Sender<SessionEvent>,
) {
    match cmd {
        SessionCommand::Start { reply } => {
            let snap = state.start();
            let _ = event_tx.send(SessionEvent::StateChanged(snap.clone()));
            let _ = reply.send(snap);
            // A terminal starting position ends the match before any
            // proposer is consulted.
            if let Some(reason) = state.outcome() {
                finish(state, reason, event_tx);
            }
        }
        SessionCommand::Reset { reply } => {
            let snap = state.reset();
            let _ = event_tx.send(SessionEvent::StateChanged(snap.clone()));
            let _ = reply.send(snap);
        }
        SessionCommand::GetSnapshot { reply } => {
            let _ = reply.send(state.snapshot());
        }
        SessionCommand::GetHistory { reply } => {
            let _ = reply.send(state.history_records());
        }
        SessionCommand::Subscribe { reply } => {
            let snapshot = state.snapshot();
            let rx = event_tx.subscribe();
            let _ = reply.send((snapshot, rx));
        }
        SessionCommand::Shutdown => unreachable!(),
    }
}

fn publish_step(
    state: &mut SessionState,
    outcome: StepOutcome,
    event_tx: &broadcast::Sender<SessionEvent>,
) {
    match outcome {
        StepOutcome::Accepted(entry) => {
            tracing::info!(ply = entry.ply, "{}", entry.description);
            let _ = event_tx.send(SessionEvent::StateChanged(state.snapshot()));
            if let Some(reason) = state.outcome() {
                finish(state, reason, event_tx);
            }
        }
        StepOutcome::Rejected {
            side,
            notation,
            reason,
        } => {
            tracing::warn!(side = %side, notation = %notation, "proposal rejected: {}", reason);
            let _ = event_tx.send(SessionEvent::MoveRejected {
                side: side.as_str().to_string(),
                notation,
                reason,
            });
        }
        StepOutcome::Ended(reason) => {
            let _ = event_tx.send(SessionEvent::StateChanged(state.snapshot()));
            finish(state, reason, event_tx);
        }
    }
}

fn finish(
    state: &mut SessionState,
    reason: GameOverReason,
    event_tx: &broadcast::Sender<SessionEvent>,
) {
    state.stop();
    tracing::info!(%reason, "game over");
    let _ = event_tx.send(SessionEvent::GameEnded {
        status: reason.status(),
        outcome: reason.to_string(),
        snapshot: state.snapshot(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use board::{BoardState, Side};
    use proposer::{MoveProposer, ProposeError, ScriptedProposer};

    use crate::controller::{ControllerConfig, TerminationStatus};
    use crate::session::handle::SessionHandle;

    fn spawn_actor(
        white: Box<dyn MoveProposer>,
        black: Box<dyn MoveProposer>,
        config: ControllerConfig,
    ) -> SessionHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, _) = broadcast::channel(100);
        let state = SessionState::new(BoardState::new(), config, white, black);
        tokio::spawn(run_session_actor(state, cmd_rx, event_tx));
        SessionHandle::new(cmd_tx)
    }

    fn scripted(name: &str, moves: &[&str]) -> Box<dyn MoveProposer> {
        Box::new(ScriptedProposer::new(name, moves.to_vec()))
    }

    /// A proposer that never answers; used to park the loop mid-proposal.
    struct StallingProposer;

    #[async_trait]
    impl MoveProposer for StallingProposer {
        fn name(&self) -> &str {
            "stalling"
        }

        async fn propose(
            &mut self,
            _side: Side,
            _legal_moves: &[String],
        ) -> Result<String, ProposeError> {
            std::future::pending().await
        }
    }

    async fn recv_game_ended(
        events: &mut broadcast::Receiver<SessionEvent>,
    ) -> (TerminationStatus, String, crate::session::SessionSnapshot) {
        loop {
            match events.recv().await.expect("event stream closed") {
                SessionEvent::GameEnded {
                    status,
                    outcome,
                    snapshot,
                } => return (status, outcome, snapshot),
                _ => continue,
            }
        }
    }

    #[tokio::test]
    async fn subscribe_returns_the_initial_snapshot() {
        let handle = spawn_actor(
            scripted("w", &[]),
            scripted("b", &[]),
            ControllerConfig::default(),
        );
        let (snapshot, _rx) = handle.subscribe().await.unwrap();
        assert_eq!(snapshot.move_count, 0);
        assert_eq!(snapshot.side_to_move.as_deref(), Some("white"));
        assert!(!snapshot.running);
        assert_eq!(snapshot.history.len(), 1);
    }

    #[tokio::test]
    async fn scripted_fools_mate_runs_to_checkmate() {
        let handle = spawn_actor(
            scripted("w", &["f2f3", "g2g4"]),
            scripted("b", &["e7e5", "d8h4"]),
            ControllerConfig::default(),
        );
        let (_, mut events) = handle.subscribe().await.unwrap();
        handle.start().await.unwrap();

        let (status, outcome, snapshot) = recv_game_ended(&mut events).await;
        assert_eq!(status, TerminationStatus::Checkmate);
        assert_eq!(outcome, "checkmate, black wins");
        assert_eq!(snapshot.move_count, 4);
        assert_eq!(snapshot.history.len(), 5);
        assert!(!snapshot.running);
        assert!(snapshot.legal_moves.is_empty());

        // The actor stays responsive for reads after the game ends.
        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.status, TerminationStatus::Checkmate);
    }

    #[tokio::test]
    async fn garbage_past_the_retry_bound_aborts() {
        let handle = spawn_actor(
            scripted("w", &["xx", "yy", "zz", "e2e4"]),
            scripted("b", &[]),
            ControllerConfig::default(),
        );
        let (_, mut events) = handle.subscribe().await.unwrap();
        handle.start().await.unwrap();

        let (status, outcome, snapshot) = recv_game_ended(&mut events).await;
        assert_eq!(status, TerminationStatus::Aborted);
        assert_eq!(outcome, "aborted: white proposer unavailable");
        assert_eq!(snapshot.move_count, 0);
    }

    #[tokio::test]
    async fn rejections_are_surfaced_before_recovery() {
        let handle = spawn_actor(
            scripted("w", &["banana", "e2e4"]),
            scripted("b", &[]),
            ControllerConfig::default(),
        );
        let (_, mut events) = handle.subscribe().await.unwrap();
        handle.start().await.unwrap();

        let mut saw_rejection = false;
        loop {
            match events.recv().await.unwrap() {
                SessionEvent::MoveRejected { side, notation, .. } => {
                    assert_eq!(side, "white");
                    assert_eq!(notation, "banana");
                    saw_rejection = true;
                }
                SessionEvent::GameEnded { snapshot, .. } => {
                    // White recovered with e2e4, then black's empty script
                    // ran out.
                    assert_eq!(snapshot.move_count, 1);
                    break;
                }
                SessionEvent::StateChanged(_) => {}
            }
        }
        assert!(saw_rejection);
    }

    #[tokio::test]
    async fn move_limit_aborts_runaway_games() {
        let config = ControllerConfig {
            max_half_moves: 2,
            ..Default::default()
        };
        let handle = spawn_actor(
            scripted("w", &["e2e4", "d2d4"]),
            scripted("b", &["e7e5", "d7d5"]),
            config,
        );
        let (_, mut events) = handle.subscribe().await.unwrap();
        handle.start().await.unwrap();

        let (status, outcome, snapshot) = recv_game_ended(&mut events).await;
        assert_eq!(status, TerminationStatus::Aborted);
        assert_eq!(outcome, "aborted: half-move limit exceeded");
        assert_eq!(snapshot.move_count, 2);
    }

    #[tokio::test]
    async fn reset_discards_an_in_flight_proposal() {
        let handle = spawn_actor(
            Box::new(StallingProposer),
            scripted("b", &[]),
            ControllerConfig::default(),
        );
        handle.start().await.unwrap();

        // The stalling proposer never answers; Reset must still land.
        let snap = handle.reset().await.unwrap();
        assert_eq!(snap.move_count, 0);
        assert!(!snap.running);
        assert_eq!(snap.status, TerminationStatus::Ongoing);

        // And the actor is idle but alive.
        let snap = handle.snapshot().await.unwrap();
        assert!(!snap.running);
    }

    #[tokio::test]
    async fn start_is_a_full_restart() {
        let handle = spawn_actor(
            scripted("w", &["xx", "yy", "zz"]),
            scripted("b", &[]),
            ControllerConfig::default(),
        );
        let (_, mut events) = handle.subscribe().await.unwrap();
        handle.start().await.unwrap();
        let _ = recv_game_ended(&mut events).await;

        let snap = handle.start().await.unwrap();
        assert_eq!(snap.move_count, 0);
        assert_eq!(snap.status, TerminationStatus::Ongoing);
        assert!(snap.running);
    }

    #[tokio::test]
    async fn shutdown_closes_the_handle() {
        let handle = spawn_actor(
            scripted("w", &[]),
            scripted("b", &[]),
            ControllerConfig::default(),
        );
        handle.shutdown().await;
        assert!(handle.snapshot().await.is_err());
    }
}
