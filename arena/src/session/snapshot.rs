//! Read-only views handed to subscribers and presentation layers.

use serde::Serialize;

use board::TerminalKind;

use crate::controller::TerminationStatus;
use crate::history::HistoryEntry;

/// Complete, immutable snapshot of session state.
/// Sent to subscribers on every state change and on subscribe.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub fen: String,
    /// Lowercase side name, `None` once the game is over.
    pub side_to_move: Option<String>,
    pub status: TerminationStatus,
    /// Human-readable termination reason, `None` while ongoing.
    pub outcome: Option<String>,
    /// Whether the turn loop is actively driving proposers.
    pub running: bool,
    /// Accepted moves so far (excludes the game-start record).
    pub move_count: usize,
    pub last_move: Option<(String, String)>,
    /// Legal moves for the active side; empty once the game is over.
    pub legal_moves: Vec<String>,
    pub history: Vec<HistoryRecord>,
}

/// One history entry in wire-friendly form. Record index 0 is always the
/// synthetic game-start entry, so any prefix of the list replays cleanly.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRecord {
    pub ply: usize,
    pub description: String,
    pub fen: String,
    pub mover: Option<String>,
    pub notation: Option<String>,
    pub piece: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub captured: Option<String>,
    pub promotion: Option<String>,
    pub san: Option<String>,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
}

impl HistoryRecord {
    pub(crate) fn from_entry(entry: &HistoryEntry) -> Self {
        let record = entry.record.as_ref();
        Self {
            ply: entry.ply,
            description: entry.description.clone(),
            fen: entry.fen.clone(),
            mover: record.map(|r| r.mover.as_str().to_string()),
            notation: record.map(|r| r.notation.clone()),
            piece: record.map(|r| r.piece.to_char_upper().to_string()),
            from: record.map(|r| r.from.clone()),
            to: record.map(|r| r.to.clone()),
            captured: record
                .and_then(|r| r.captured)
                .map(|p| p.to_char_upper().to_string()),
            promotion: record
                .and_then(|r| r.promotion)
                .map(|p| p.to_char_upper().to_string()),
            san: record.map(|r| r.san.clone()),
            is_check: record.is_some_and(|r| r.is_check),
            is_checkmate: record
                .is_some_and(|r| matches!(r.terminal, Some(TerminalKind::Checkmate { .. }))),
            is_stalemate: record.is_some_and(|r| matches!(r.terminal, Some(TerminalKind::Stalemate))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board::BoardState;

    #[test]
    fn game_start_record_has_no_move_fields() {
        let board = BoardState::new();
        let record = HistoryRecord::from_entry(&HistoryEntry::game_start(&board));
        assert_eq!(record.ply, 0);
        assert!(record.mover.is_none());
        assert!(record.san.is_none());
        assert!(!record.is_check);
    }

    #[test]
    fn move_record_is_wire_friendly() {
        let mut board = BoardState::new();
        let applied = board.apply_uci("e2e4").unwrap();
        let record = HistoryRecord::from_entry(&HistoryEntry::from_move(1, applied));
        assert_eq!(record.mover.as_deref(), Some("white"));
        assert_eq!(record.piece.as_deref(), Some("P"));
        assert_eq!(record.from.as_deref(), Some("e2"));
        assert_eq!(record.to.as_deref(), Some("e4"));
        assert_eq!(record.san.as_deref(), Some("e4"));
    }

    #[test]
    fn records_serialize_to_json() {
        let board = BoardState::new();
        let record = HistoryRecord::from_entry(&HistoryEntry::game_start(&board));
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"ply\":0"));
        assert!(json.contains("Game start"));
    }
}
