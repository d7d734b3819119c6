use tokio::sync::{broadcast, mpsc, oneshot};

use super::commands::{SessionCommand, SessionError};
use super::events::SessionEvent;
use super::snapshot::{HistoryRecord, SessionSnapshot};

/// Cheap, cloneable handle to a session actor.
#[derive(Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn new(cmd_tx: mpsc::Sender<SessionCommand>) -> Self {
        Self { cmd_tx }
    }

    /// Discard any current game and begin the turn loop from the
    /// starting position.
    pub async fn start(&self) -> Result<SessionSnapshot, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionCommand::Start { reply: tx }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Discard any current game, including an in-flight proposal, and
    /// leave the session idle.
    pub async fn reset(&self) -> Result<SessionSnapshot, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionCommand::Reset { reply: tx }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionCommand::GetSnapshot { reply: tx }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn history(&self) -> Result<Vec<HistoryRecord>, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionCommand::GetHistory { reply: tx }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Current snapshot plus a live event stream.
    pub async fn subscribe(
        &self,
    ) -> Result<(SessionSnapshot, broadcast::Receiver<SessionEvent>), SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionCommand::Subscribe { reply: tx }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(SessionCommand::Shutdown).await;
    }

    async fn send(&self, cmd: SessionCommand) -> Result<(), SessionError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| SessionError::Closed)
    }
}
