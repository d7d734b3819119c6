//! A proposer that replays a fixed move list.

use std::collections::VecDeque;

use async_trait::async_trait;
use board::Side;

use crate::{MoveProposer, ProposeError};

/// Plays a predetermined sequence of notation strings, one per prompt.
///
/// The strings are returned verbatim, so a script may deliberately
/// contain garbage or illegal moves to exercise the controller's
/// rejection path. When the script runs out the proposer reports itself
/// unavailable.
pub struct ScriptedProposer {
    name: String,
    moves: VecDeque<String>,
}

impl ScriptedProposer {
    pub fn new(name: impl Into<String>, moves: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            moves: moves.into_iter().map(Into::into).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

#[async_trait]
impl MoveProposer for ScriptedProposer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn propose(&mut self, side: Side, _legal_moves: &[String]) -> Result<String, ProposeError> {
        let next = self.moves.pop_front().ok_or_else(|| {
            ProposeError::Unavailable(format!("{} script exhausted for {}", self.name, side))
        })?;
        tracing::debug!(side = %side, notation = %next, remaining = self.moves.len(), "scripted move");
        Ok(next)
    }
}
