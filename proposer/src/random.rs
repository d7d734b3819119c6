//! A proposer that picks uniformly from the legal moves.

use async_trait::async_trait;
use board::Side;
use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::{MoveProposer, ProposeError};

/// Picks a random legal move. Always produces valid output, which makes
/// it the default opponent for exercising full games end to end.
pub struct RandomProposer {
    name: String,
}

impl RandomProposer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for RandomProposer {
    fn default() -> Self {
        Self::new("Random")
    }
}

#[async_trait]
impl MoveProposer for RandomProposer {
    fn name(&self) -> &str {
        &self.name
    }

    async fn propose(&mut self, side: Side, legal_moves: &[String]) -> Result<String, ProposeError> {
        let mut rng = thread_rng();
        let pick = legal_moves.choose(&mut rng).cloned();
        if let Some(notation) = &pick {
            tracing::debug!(side = %side, notation = %notation, "random pick");
        }
        pick.ok_or_else(|| {
            ProposeError::Unavailable(format!("{} has no legal moves to pick for {}", self.name, side))
        })
    }
}
