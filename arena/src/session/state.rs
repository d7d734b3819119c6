use board::{BoardState, Side};
use proposer::{MoveProposer, ProposeError};

use crate::controller::{
    AbortReason, ControllerConfig, ControllerState, GameOverReason, SubmitError, TurnController,
};
use crate::history::HistoryEntry;

use super::snapshot::{HistoryRecord, SessionSnapshot};

/// Internal mutable state, owned entirely by the session actor. No locks.
pub(crate) struct SessionState {
    start: BoardState,
    controller: TurnController,
    config: ControllerConfig,
    white: Box<dyn MoveProposer>,
    black: Box<dyn MoveProposer>,
    running: bool,
}

/// Result of driving one half-move through the active proposer.
pub(crate) enum StepOutcome {
    Accepted(HistoryEntry),
    /// Rejected proposal; the same proposer stays on the clock.
    Rejected {
        side: Side,
        notation: String,
        reason: String,
    },
    Ended(GameOverReason),
}

impl SessionState {
    pub fn new(
        start: BoardState,
        config: ControllerConfig,
        white: Box<dyn MoveProposer>,
        black: Box<dyn MoveProposer>,
    ) -> Self {
        let controller = TurnController::with_board(start.clone(), config);
        Self {
            start,
            controller,
            config,
            white,
            black,
            running: false,
        }
    }

    pub fn white_name(&self) -> &str {
        self.white.name()
    }

    pub fn black_name(&self) -> &str {
        self.black.name()
    }

    /// Whether the actor should be driving proposers right now.
    pub fn is_stepping(&self) -> bool {
        self.running && self.controller.active_side().is_some()
    }

    pub fn outcome(&self) -> Option<GameOverReason> {
        self.controller.outcome()
    }

    /// Fresh game, turn loop armed.
    pub fn start(&mut self) -> SessionSnapshot {
        self.controller = TurnController::with_board(self.start.clone(), self.config);
        self.running = true;
        tracing::info!(
            white = self.white.name(),
            black = self.black.name(),
            "match started"
        );
        self.snapshot()
    }

    /// Fresh game, turn loop idle. Any in-flight proposal was already
    /// discarded by the actor before this runs.
    pub fn reset(&mut self) -> SessionSnapshot {
        self.controller = TurnController::with_board(self.start.clone(), self.config);
        self.running = false;
        tracing::info!("session reset");
        self.snapshot()
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Build a full snapshot of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        let history: Vec<HistoryRecord> = self
            .controller
            .history()
            .iter()
            .map(HistoryRecord::from_entry)
            .collect();

        let last_move = self
            .controller
            .history()
            .last()
            .and_then(|e| e.record.as_ref())
            .map(|r| (r.from.clone(), r.to.clone()));

        let legal_moves = if self.controller.active_side().is_some() {
            self.controller.legal_moves()
        } else {
            Vec::new()
        };

        SessionSnapshot {
            fen: self.controller.board().to_fen(),
            side_to_move: self
                .controller
                .active_side()
                .map(|s| s.as_str().to_string()),
            status: self.controller.status(),
            outcome: self.controller.outcome().map(|r| r.to_string()),
            running: self.running,
            move_count: self.controller.accepted_moves(),
            last_move,
            legal_moves,
            history,
        }
    }

    pub fn history_records(&self) -> Vec<HistoryRecord> {
        self.controller
            .history()
            .iter()
            .map(HistoryRecord::from_entry)
            .collect()
    }

    /// Ask the active proposer for one move and feed it to the controller.
    ///
    /// Exactly one proposal is in flight at a time; the caller suspends
    /// here until the proposer answers. Dropping the returned future
    /// (actor command preemption) discards the request without touching
    /// board or history.
    pub async fn next_half_move(&mut self) -> StepOutcome {
        let side = match self.controller.state() {
            ControllerState::AwaitingWhite => Side::White,
            ControllerState::AwaitingBlack => Side::Black,
            ControllerState::GameOver(reason) => return StepOutcome::Ended(reason),
        };

        let legal = self.controller.legal_moves();
        let oracle = match side {
            Side::White => self.white.as_mut(),
            Side::Black => self.black.as_mut(),
        };

        let notation = match oracle.propose(side, &legal).await {
            Ok(notation) => notation,
            Err(ProposeError::Unavailable(msg)) => {
                tracing::warn!(side = %side, "proposer unavailable: {}", msg);
                return StepOutcome::Ended(
                    self.controller
                        .abort(AbortReason::ProposerUnavailable { side }),
                );
            }
        };

        match self.controller.submit(&notation) {
            Ok(entry) => StepOutcome::Accepted(entry.clone()),
            Err(SubmitError::RetriesExhausted { side, attempts }) => {
                tracing::warn!(side = %side, attempts, "proposer burned through the retry bound");
                StepOutcome::Ended(GameOverReason::Aborted(AbortReason::ProposerUnavailable {
                    side,
                }))
            }
            Err(SubmitError::GameOver) => {
                unreachable!("an awaited side was matched before submitting")
            }
            Err(err) => StepOutcome::Rejected {
                side,
                notation,
                reason: err.to_string(),
            },
        }
    }
}
