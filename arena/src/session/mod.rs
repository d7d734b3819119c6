//! The game session: an actor owning the turn controller, history, and
//! both proposers.
//!
//! One spawned task per session. All mutation happens inside the actor;
//! callers interact through a [`SessionHandle`] and receive read-only
//! snapshots and broadcast events. The actor drives at most one proposal
//! at a time, and commands preempt an in-flight proposal.

pub mod actor;
pub mod commands;
pub mod events;
pub mod handle;
pub mod snapshot;
pub mod state;

use board::BoardState;
use proposer::MoveProposer;
use tokio::sync::{broadcast, mpsc};

use crate::controller::ControllerConfig;

use actor::run_session_actor;
pub use commands::SessionError;
pub use events::SessionEvent;
pub use handle::SessionHandle;
pub use snapshot::{HistoryRecord, SessionSnapshot};
use state::SessionState;

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub controller: ControllerConfig,
    /// Optional custom starting position; standard setup when `None`.
    pub start_fen: Option<String>,
}

pub struct Session;

impl Session {
    /// Spawn a session actor for one white and one black proposer.
    ///
    /// The starting FEN is validated here so that `start` and `reset`
    /// are infallible afterwards. Must be called from within a tokio
    /// runtime.
    pub fn spawn(
        white: Box<dyn MoveProposer>,
        black: Box<dyn MoveProposer>,
        config: SessionConfig,
    ) -> Result<SessionHandle, SessionError> {
        let start = match &config.start_fen {
            Some(fen) => {
                BoardState::from_fen(fen).map_err(|_| SessionError::InvalidFen(fen.clone()))?
            }
            None => BoardState::new(),
        };

        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, _) = broadcast::channel(100);

        let state = SessionState::new(start, config.controller, white, black);
        tokio::spawn(run_session_actor(state, cmd_rx, event_tx));

        Ok(SessionHandle::new(cmd_tx))
    }
}
