//! Move proposers: opaque oracles that pick a move for one side.
//!
//! A proposer is handed the side to move and the current legal moves in
//! coordinate notation and answers with a single candidate string. The
//! answer is *not* trusted; the controller validates every proposal and
//! re-prompts on invalid or illegal output. Implementations may be backed
//! by anything (a script, a random pick, an LLM call, human input).

pub mod random;
pub mod scripted;

pub use random::RandomProposer;
pub use scripted::ScriptedProposer;

use async_trait::async_trait;
use board::Side;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProposeError {
    /// The oracle cannot produce a candidate at all. Non-recoverable:
    /// the controller aborts the game rather than retrying.
    #[error("proposer unavailable: {0}")]
    Unavailable(String),
}

/// An opaque, possibly-unreliable move oracle for one side.
#[async_trait]
pub trait MoveProposer: Send {
    /// Short display name for logs and match output.
    fn name(&self) -> &str;

    /// Produce one candidate move in coordinate notation (e.g. "e2e4").
    ///
    /// The returned string may be malformed or illegal; callers must
    /// validate it against the current position.
    async fn propose(&mut self, side: Side, legal_moves: &[String]) -> Result<String, ProposeError>;
}
