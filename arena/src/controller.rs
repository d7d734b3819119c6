//! The turn controller: a strict two-state alternator over a shared board.
//!
//! One half-move is processed at a time. A submitted notation is either
//! accepted (board mutates, history grows, turn flips or the game ends)
//! or rejected (nothing changes except the retry counter). Repeated
//! rejection and runaway games both end in an abort; nothing stalls
//! silently.

use serde::Serialize;

use board::{BoardError, BoardState, Side, TerminalKind};

use crate::history::HistoryEntry;

/// Whose proposer acts next, or why nobody does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    AwaitingWhite,
    AwaitingBlack,
    GameOver(GameOverReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    Checkmate { winner: Side },
    Stalemate,
    Draw,
    Aborted(AbortReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// A proposer failed to respond, or burned through the retry bound.
    ProposerUnavailable { side: Side },
    /// The half-move ceiling was hit without a natural conclusion.
    MoveLimitExceeded,
}

/// Coarse termination status, the wire-friendly view of the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    Draw,
    Aborted,
}

impl GameOverReason {
    pub fn status(&self) -> TerminationStatus {
        match self {
            Self::Checkmate { .. } => TerminationStatus::Checkmate,
            Self::Stalemate => TerminationStatus::Stalemate,
            Self::Draw => TerminationStatus::Draw,
            Self::Aborted(_) => TerminationStatus::Aborted,
        }
    }
}

impl From<TerminalKind> for GameOverReason {
    fn from(kind: TerminalKind) -> Self {
        match kind {
            TerminalKind::Checkmate { winner } => Self::Checkmate { winner },
            TerminalKind::Stalemate => Self::Stalemate,
            TerminalKind::Draw => Self::Draw,
        }
    }
}

impl std::fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Checkmate { winner } => write!(f, "checkmate, {} wins", winner),
            Self::Stalemate => write!(f, "stalemate"),
            Self::Draw => write!(f, "draw"),
            Self::Aborted(AbortReason::ProposerUnavailable { side }) => {
                write!(f, "aborted: {} proposer unavailable", side)
            }
            Self::Aborted(AbortReason::MoveLimitExceeded) => {
                write!(f, "aborted: half-move limit exceeded")
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    /// Hard ceiling on total half-moves before the game is aborted.
    pub max_half_moves: usize,
    /// Consecutive failed proposals tolerated per half-move before the
    /// proposer is treated as unavailable.
    pub max_retries: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_half_moves: 500,
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    #[error("game is over")]
    GameOver,
    #[error("invalid move notation {notation:?} ({attempts_left} attempts left)")]
    InvalidNotation { notation: String, attempts_left: u32 },
    #[error("illegal move {notation:?} ({attempts_left} attempts left)")]
    IllegalMove { notation: String, attempts_left: u32 },
    #[error("{side} proposer failed {attempts} consecutive proposals")]
    RetriesExhausted { side: Side, attempts: u32 },
}

/// Owns the board and history exclusively. Collaborators only ever see
/// read-only views (legal-move lists, history slices, snapshots).
#[derive(Debug, Clone)]
pub struct TurnController {
    board: BoardState,
    history: Vec<HistoryEntry>,
    state: ControllerState,
    config: ControllerConfig,
    retries: u32,
}

impl TurnController {
    /// Fresh controller from the standard starting position.
    pub fn new(config: ControllerConfig) -> Self {
        Self::with_board(BoardState::new(), config)
    }

    pub fn from_fen(fen: &str, config: ControllerConfig) -> Result<Self, BoardError> {
        Ok(Self::with_board(BoardState::from_fen(fen)?, config))
    }

    pub fn with_board(board: BoardState, config: ControllerConfig) -> Self {
        let state = match board.terminal() {
            Some(kind) => ControllerState::GameOver(kind.into()),
            None => match board.side_to_move() {
                Side::White => ControllerState::AwaitingWhite,
                Side::Black => ControllerState::AwaitingBlack,
            },
        };
        let history = vec![HistoryEntry::game_start(&board)];
        Self {
            board,
            history,
            state,
            config,
            retries: 0,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// The side whose proposer acts next; `None` once the game is over.
    pub fn active_side(&self) -> Option<Side> {
        match self.state {
            ControllerState::AwaitingWhite => Some(Side::White),
            ControllerState::AwaitingBlack => Some(Side::Black),
            ControllerState::GameOver(_) => None,
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Accepted moves so far (history minus the game-start entry).
    pub fn accepted_moves(&self) -> usize {
        self.history.len() - 1
    }

    pub fn status(&self) -> TerminationStatus {
        match self.state {
            ControllerState::GameOver(reason) => reason.status(),
            _ => TerminationStatus::Ongoing,
        }
    }

    pub fn outcome(&self) -> Option<GameOverReason> {
        match self.state {
            ControllerState::GameOver(reason) => Some(reason),
            _ => None,
        }
    }

    /// Failed proposals for the half-move currently being retried.
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Legal moves for the active side, in coordinate notation.
    pub fn legal_moves(&self) -> Vec<String> {
        self.board.legal_move_notations()
    }

    /// Submit the active proposer's candidate move.
    ///
    /// On acceptance the board mutates, a history entry is appended, and
    /// the turn flips (or the game ends). On rejection the board and
    /// history are untouched; the same side stays active until the retry
    /// bound escalates to an abort.
    pub fn submit(&mut self, notation: &str) -> Result<&HistoryEntry, SubmitError> {
        let side = match self.state {
            ControllerState::AwaitingWhite => Side::White,
            ControllerState::AwaitingBlack => Side::Black,
            ControllerState::GameOver(_) => return Err(SubmitError::GameOver),
        };

        let applied = match self.board.apply_uci(notation) {
            Ok(applied) => applied,
            Err(err) => return Err(self.reject(side, err)),
        };

        self.retries = 0;
        let ply = self.history.len();
        let terminal = applied.terminal;
        self.history.push(HistoryEntry::from_move(ply, applied));

        if let Some(kind) = terminal {
            self.state = ControllerState::GameOver(kind.into());
        } else if self.accepted_moves() >= self.config.max_half_moves {
            self.state =
                ControllerState::GameOver(GameOverReason::Aborted(AbortReason::MoveLimitExceeded));
        } else {
            self.state = match side {
                Side::White => ControllerState::AwaitingBlack,
                Side::Black => ControllerState::AwaitingWhite,
            };
        }

        Ok(&self.history[ply])
    }

    /// Force the game over. Used when a proposer fails outright rather
    /// than answering with a bad move. Returns the final reason, which is
    /// the pre-existing one if the game had already ended.
    pub fn abort(&mut self, reason: AbortReason) -> GameOverReason {
        if let ControllerState::GameOver(existing) = self.state {
            return existing;
        }
        let reason = GameOverReason::Aborted(reason);
        self.state = ControllerState::GameOver(reason);
        reason
    }

    fn reject(&mut self, side: Side, err: BoardError) -> SubmitError {
        self.retries += 1;
        if self.retries >= self.config.max_retries {
            let attempts = self.retries;
            self.state = ControllerState::GameOver(GameOverReason::Aborted(
                AbortReason::ProposerUnavailable { side },
            ));
            return SubmitError::RetriesExhausted { side, attempts };
        }

        let attempts_left = self.config.max_retries - self.retries;
        match err {
            BoardError::InvalidNotation(notation) => SubmitError::InvalidNotation {
                notation,
                attempts_left,
            },
            BoardError::IllegalMove(notation) | BoardError::InvalidFen(notation) => {
                SubmitError::IllegalMove {
                    notation,
                    attempts_left,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> TurnController {
        TurnController::new(ControllerConfig::default())
    }

    #[test]
    fn starts_awaiting_white_with_one_history_entry() {
        let ctl = controller();
        assert_eq!(ctl.state(), ControllerState::AwaitingWhite);
        assert_eq!(ctl.active_side(), Some(Side::White));
        assert_eq!(ctl.history().len(), 1);
        assert!(ctl.history()[0].is_game_start());
        assert_eq!(ctl.status(), TerminationStatus::Ongoing);
    }

    #[test]
    fn accepted_move_flips_the_turn() {
        let mut ctl = controller();
        let entry = ctl.submit("e2e4").unwrap();
        assert_eq!(entry.ply, 1);
        assert_eq!(ctl.state(), ControllerState::AwaitingBlack);
        assert_eq!(ctl.history().len(), 2);
        assert_eq!(ctl.accepted_moves(), 1);
    }

    #[test]
    fn sides_alternate_strictly() {
        let mut ctl = controller();
        for (mv, expected_next) in [
            ("e2e4", Side::Black),
            ("e7e5", Side::White),
            ("g1f3", Side::Black),
            ("b8c6", Side::White),
        ] {
            ctl.submit(mv).unwrap();
            assert_eq!(ctl.active_side(), Some(expected_next));
        }
        assert_eq!(ctl.history().len(), 5);
    }

    #[test]
    fn illegal_move_is_rejected_without_side_effects() {
        let mut ctl = controller();
        let fen_before = ctl.board().to_fen();
        let err = ctl.submit("e2e5").unwrap_err();
        assert!(matches!(err, SubmitError::IllegalMove { .. }));
        assert_eq!(ctl.state(), ControllerState::AwaitingWhite);
        assert_eq!(ctl.history().len(), 1);
        assert_eq!(ctl.board().to_fen(), fen_before);
        assert_eq!(ctl.retries(), 1);
    }

    #[test]
    fn invalid_notation_is_rejected_without_side_effects() {
        let mut ctl = controller();
        let err = ctl.submit("pawn forward").unwrap_err();
        assert!(matches!(err, SubmitError::InvalidNotation { .. }));
        assert_eq!(ctl.history().len(), 1);
        assert_eq!(ctl.retries(), 1);
    }

    #[test]
    fn acceptance_resets_the_retry_counter() {
        let mut ctl = controller();
        let _ = ctl.submit("e2e5");
        let _ = ctl.submit("garbage");
        assert_eq!(ctl.retries(), 2);
        ctl.submit("e2e4").unwrap();
        assert_eq!(ctl.retries(), 0);
    }

    #[test]
    fn retry_bound_escalates_to_abort() {
        let mut ctl = controller();
        assert!(ctl.submit("zzzz").is_err());
        assert!(ctl.submit("e2e5").is_err());
        let err = ctl.submit("h2h5").unwrap_err();
        assert_eq!(
            err,
            SubmitError::RetriesExhausted {
                side: Side::White,
                attempts: 3
            }
        );
        assert_eq!(
            ctl.outcome(),
            Some(GameOverReason::Aborted(AbortReason::ProposerUnavailable {
                side: Side::White
            }))
        );
        assert_eq!(ctl.status(), TerminationStatus::Aborted);
        assert_eq!(ctl.history().len(), 1);
    }

    #[test]
    fn submissions_after_game_over_are_refused() {
        let mut ctl = controller();
        for _ in 0..3 {
            let _ = ctl.submit("nonsense");
        }
        assert_eq!(ctl.submit("e2e4"), Err(SubmitError::GameOver));
        assert_eq!(ctl.history().len(), 1);
    }

    #[test]
    fn fools_mate_ends_with_checkmate() {
        let mut ctl = controller();
        for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            ctl.submit(mv).unwrap();
        }
        assert_eq!(
            ctl.outcome(),
            Some(GameOverReason::Checkmate {
                winner: Side::Black
            })
        );
        assert_eq!(ctl.status(), TerminationStatus::Checkmate);
        assert_eq!(ctl.history().len(), 5);
        assert_eq!(ctl.submit("a2a3"), Err(SubmitError::GameOver));
    }

    #[test]
    fn half_move_ceiling_aborts_the_game() {
        let config = ControllerConfig {
            max_half_moves: 2,
            ..Default::default()
        };
        let mut ctl = TurnController::new(config);
        ctl.submit("e2e4").unwrap();
        assert_eq!(ctl.status(), TerminationStatus::Ongoing);
        ctl.submit("e7e5").unwrap();
        assert_eq!(
            ctl.outcome(),
            Some(GameOverReason::Aborted(AbortReason::MoveLimitExceeded))
        );
        assert_eq!(ctl.accepted_moves(), 2);
    }

    #[test]
    fn custom_fen_can_start_with_black() {
        let ctl = TurnController::from_fen(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
            ControllerConfig::default(),
        )
        .unwrap();
        assert_eq!(ctl.state(), ControllerState::AwaitingBlack);
    }

    #[test]
    fn terminal_fen_is_game_over_immediately() {
        let ctl = TurnController::from_fen("k7/1R6/2K5/8/8/8/8/8 b - - 0 1", ControllerConfig::default())
            .unwrap();
        assert_eq!(ctl.outcome(), Some(GameOverReason::Stalemate));
        assert_eq!(ctl.history().len(), 1);
    }

    #[test]
    fn abort_is_idempotent_once_over() {
        let mut ctl = controller();
        for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            ctl.submit(mv).unwrap();
        }
        let reason = ctl.abort(AbortReason::MoveLimitExceeded);
        assert_eq!(
            reason,
            GameOverReason::Checkmate {
                winner: Side::Black
            }
        );
    }

    #[test]
    fn history_length_tracks_accepted_moves() {
        let mut ctl = controller();
        for (i, mv) in ["e2e4", "c7c5", "g1f3"].iter().enumerate() {
            ctl.submit(mv).unwrap();
            assert_eq!(ctl.history().len(), i + 2);
            assert_eq!(ctl.accepted_moves(), i + 1);
        }
    }

    #[test]
    fn reasons_render_for_humans() {
        let mate = GameOverReason::Checkmate {
            winner: Side::White,
        };
        assert_eq!(mate.to_string(), "checkmate, white wins");
        assert_eq!(GameOverReason::Stalemate.to_string(), "stalemate");
        assert_eq!(
            GameOverReason::Aborted(AbortReason::MoveLimitExceeded).to_string(),
            "aborted: half-move limit exceeded"
        );
        assert_eq!(
            GameOverReason::Aborted(AbortReason::ProposerUnavailable { side: Side::Black })
                .to_string(),
            "aborted: black proposer unavailable"
        );
    }
}
