use crate::controller::TerminationStatus;

use super::snapshot::SessionSnapshot;

/// Events broadcast from the session actor to all subscribers.
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum SessionEvent {
    /// Full state snapshot after any accepted move, start, or reset.
    StateChanged(SessionSnapshot),
    /// A proposal was rejected and the same proposer will be re-prompted.
    MoveRejected {
        side: String,
        notation: String,
        reason: String,
    },
    /// The game reached a terminal state; no further proposer calls occur.
    GameEnded {
        status: TerminationStatus,
        outcome: String,
        snapshot: SessionSnapshot,
    },
}
