use tokio::sync::{broadcast, oneshot};

use super::events::SessionEvent;
use super::snapshot::{HistoryRecord, SessionSnapshot};

#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    #[error("invalid start position: {0:?}")]
    InvalidFen(String),
    #[error("session actor closed")]
    Closed,
}

/// Commands sent to the session actor. Each embeds a oneshot for the reply.
pub enum SessionCommand {
    /// Discard the current game and begin a fresh turn loop.
    Start {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    /// Discard the current game and stay idle.
    Reset {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    GetSnapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    GetHistory {
        reply: oneshot::Sender<Vec<HistoryRecord>>,
    },
    Subscribe {
        reply: oneshot::Sender<(SessionSnapshot, broadcast::Receiver<SessionEvent>)>,
    },
    Shutdown,
}
