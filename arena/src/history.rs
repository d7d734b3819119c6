//! Append-only move history.
//!
//! One entry per accepted move plus a synthetic game-start entry at
//! index 0, so a presentation layer can replay any prefix of the game
//! without recomputation.

use board::{AppliedMove, BoardState};

/// One entry in the ordered history. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// 0 for the game-start entry, then the half-move number.
    pub ply: usize,
    /// FEN of the position after this entry.
    pub fen: String,
    /// Human-readable log line for this entry.
    pub description: String,
    /// The accepted move; `None` only for the game-start entry.
    pub record: Option<AppliedMove>,
}

impl HistoryEntry {
    /// The synthetic entry every game log begins with.
    pub fn game_start(board: &BoardState) -> Self {
        Self {
            ply: 0,
            fen: board.to_fen(),
            description: "Game start".to_string(),
            record: None,
        }
    }

    pub fn from_move(ply: usize, applied: AppliedMove) -> Self {
        Self {
            ply,
            fen: applied.fen_after.clone(),
            description: applied.description.clone(),
            record: Some(applied),
        }
    }

    pub fn is_game_start(&self) -> bool {
        self.record.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_start_entry_carries_initial_fen() {
        let board = BoardState::new();
        let entry = HistoryEntry::game_start(&board);
        assert_eq!(entry.ply, 0);
        assert!(entry.is_game_start());
        assert_eq!(entry.fen, board.to_fen());
        assert_eq!(entry.description, "Game start");
    }

    #[test]
    fn move_entry_mirrors_the_applied_move() {
        let mut board = BoardState::new();
        let applied = board.apply_uci("e2e4").unwrap();
        let entry = HistoryEntry::from_move(1, applied.clone());
        assert_eq!(entry.ply, 1);
        assert_eq!(entry.fen, applied.fen_after);
        assert_eq!(entry.description, applied.description);
        assert!(!entry.is_game_start());
    }
}
