//! Turn-sequenced two-party match controller.
//!
//! Two opaque move proposers alternate over a single shared board. The
//! [`TurnController`] owns the board and history and enforces strict
//! alternation, bounded retries, and a half-move ceiling; the
//! [`session`] actor drives the loop and broadcasts snapshots to any
//! presentation layer.

pub mod controller;
pub mod history;
pub mod session;

pub use controller::{
    AbortReason, ControllerConfig, ControllerState, GameOverReason, SubmitError,
    TerminationStatus, TurnController,
};
pub use history::HistoryEntry;
pub use session::{
    HistoryRecord, Session, SessionConfig, SessionError, SessionEvent, SessionHandle,
    SessionSnapshot,
};
