//! The board state adapter: legal-move queries and validated move application.

use cozy_chess::{Board, GameStatus, Move, Piece};

use crate::describe;
use crate::types::{PieceKind, Side};
use crate::uci;

/// Why a position accepts no further moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    Checkmate { winner: Side },
    Stalemate,
    Draw,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum BoardError {
    #[error("invalid move notation: {0:?}")]
    InvalidNotation(String),
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("invalid FEN: {0:?}")]
    InvalidFen(String),
}

/// Everything known about a move at the moment it was accepted.
///
/// Self-describing so that history consumers can render any prefix of a
/// game without touching the rules engine again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    pub mover: Side,
    /// Coordinate notation of the move as played (castling in
    /// king-to-rook form, e.g. "e1h1").
    pub notation: String,
    pub piece: PieceKind,
    pub from: String,
    pub to: String,
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub san: String,
    pub description: String,
    pub is_check: bool,
    pub fen_after: String,
    pub terminal: Option<TerminalKind>,
}

/// Wrapper around a cozy-chess position. The only mutation path is
/// [`BoardState::apply_uci`], which validates before playing; a failed
/// application leaves the position untouched.
#[derive(Debug, Clone)]
pub struct BoardState {
    position: Board,
}

impl BoardState {
    /// Standard starting position.
    pub fn new() -> Self {
        Self {
            position: Board::default(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, BoardError> {
        let position = fen
            .parse()
            .map_err(|_| BoardError::InvalidFen(fen.to_string()))?;
        Ok(Self { position })
    }

    pub fn position(&self) -> &Board {
        &self.position
    }

    pub fn side_to_move(&self) -> Side {
        Side::from(self.position.side_to_move())
    }

    pub fn to_fen(&self) -> String {
        self.position.to_string()
    }

    /// All legal moves in the current position.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        self.position.generate_moves(|mvs| {
            moves.extend(mvs);
            false
        });
        moves
    }

    /// Legal moves rendered in coordinate notation, the interchange
    /// format handed to proposers. Empty only when the game is terminal.
    pub fn legal_move_notations(&self) -> Vec<String> {
        self.legal_moves().into_iter().map(uci::format_uci).collect()
    }

    pub fn terminal(&self) -> Option<TerminalKind> {
        terminal_of(&self.position)
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal().is_some()
    }

    /// Parse, validate, and play a move given in coordinate notation.
    ///
    /// Castling may be written either as the king moving two squares
    /// ("e1g1") or in cozy-chess king-to-rook form ("e1h1"); both are
    /// accepted when castling is legal.
    pub fn apply_uci(&mut self, notation: &str) -> Result<AppliedMove, BoardError> {
        let trimmed = notation.trim();
        let parsed: Move = trimmed
            .parse()
            .map_err(|_| BoardError::InvalidNotation(notation.to_string()))?;

        let legal = self.legal_moves();
        let mv = uci::normalize_castling(parsed, &legal);
        if !legal.contains(&mv) {
            return Err(BoardError::IllegalMove(trimmed.to_string()));
        }

        let mover = self.side_to_move();
        let piece = self
            .position
            .piece_on(mv.from)
            .ok_or_else(|| BoardError::IllegalMove(trimmed.to_string()))?;
        let captured = self.capture_of(mv, piece);

        let san_stem = describe::san_stem(&self.position, mv, piece, captured.is_some());

        let mut next = self.position.clone();
        next.play_unchecked(mv);

        let is_check = !next.checkers().is_empty();
        let terminal = terminal_of(&next);
        let is_checkmate = matches!(terminal, Some(TerminalKind::Checkmate { .. }));
        let san = describe::with_check_suffix(san_stem, is_check, is_checkmate);

        self.position = next;

        let piece = PieceKind::from(piece);
        let captured = captured.map(PieceKind::from);
        let promotion = mv.promotion.map(PieceKind::from);
        let from = mv.from.to_string();
        let to = mv.to.to_string();
        let description = describe::describe_line(
            mover, piece, &from, &to, captured, promotion, is_check, terminal,
        );

        Ok(AppliedMove {
            mover,
            notation: uci::format_uci(mv),
            piece,
            from,
            to,
            captured,
            promotion,
            san,
            description,
            is_check,
            fen_after: self.to_fen(),
            terminal,
        })
    }

    /// Captured piece, if any. Accounts for en passant (diagonal pawn move
    /// onto an empty square) and excludes castling, where the king lands on
    /// its own rook.
    fn capture_of(&self, mv: Move, piece: Piece) -> Option<Piece> {
        if let Some(victim) = self.position.piece_on(mv.to) {
            if self.position.color_on(mv.to) != Some(self.position.side_to_move()) {
                return Some(victim);
            }
            return None;
        }
        if piece == Piece::Pawn && mv.from.file() != mv.to.file() {
            return Some(Piece::Pawn);
        }
        None
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

fn terminal_of(board: &Board) -> Option<TerminalKind> {
    match board.status() {
        GameStatus::Ongoing => None,
        GameStatus::Won => Some(TerminalKind::Checkmate {
            winner: Side::from(!board.side_to_move()),
        }),
        GameStatus::Drawn => {
            let mut any_move = false;
            board.generate_moves(|_| {
                any_move = true;
                true
            });
            if any_move {
                Some(TerminalKind::Draw)
            } else {
                Some(TerminalKind::Stalemate)
            }
        }
    }
}
