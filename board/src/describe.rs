//! SAN rendering and human-readable move descriptions.
//!
//! The SAN here is intentionally simplified (no file/rank disambiguation
//! for twin pieces); it exists for log readability, not PGN export.

use cozy_chess::{Board, Move, Piece, Square};

use crate::state::TerminalKind;
use crate::types::{PieceKind, Side};

pub(crate) fn file_char(sq: Square) -> char {
    (b'a' + sq.file() as u8) as char
}

/// cozy_chess encodes castling as the king landing on its own rook.
pub(crate) fn is_castle(board: &Board, mv: Move, piece: Piece) -> bool {
    piece == Piece::King
        && board.piece_on(mv.to) == Some(Piece::Rook)
        && board.color_on(mv.to) == Some(board.side_to_move())
}

/// SAN for a move about to be played on `board`, without check/mate suffix.
pub(crate) fn san_stem(board: &Board, mv: Move, piece: Piece, is_capture: bool) -> String {
    if is_castle(board, mv, piece) {
        return if (mv.to.file() as u8) > (mv.from.file() as u8) {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        };
    }

    let mut san = String::new();

    match piece {
        Piece::Pawn => {
            if is_capture {
                san.push(file_char(mv.from));
            }
        }
        other => san.push(PieceKind::from(other).to_char_upper()),
    }

    if is_capture {
        san.push('x');
    }

    san.push_str(&mv.to.to_string());

    if let Some(promo) = mv.promotion {
        san.push('=');
        san.push(PieceKind::from(promo).to_char_upper());
    }

    san
}

pub(crate) fn with_check_suffix(mut san: String, is_check: bool, is_checkmate: bool) -> String {
    if is_checkmate {
        san.push('#');
    } else if is_check {
        san.push('+');
    }
    san
}

/// One log line per accepted move, in the shape a match log renders verbatim.
#[allow(clippy::too_many_arguments)]
pub(crate) fn describe_line(
    mover: Side,
    piece: PieceKind,
    from: &str,
    to: &str,
    captured: Option<PieceKind>,
    promotion: Option<PieceKind>,
    is_check: bool,
    terminal: Option<TerminalKind>,
) -> String {
    let mut line = format!("{} moves {} from {} to {}", mover.name(), piece.name(), from, to);

    if let Some(victim) = captured {
        line.push_str(&format!(", capturing {}", victim.name()));
    }
    if let Some(promo) = promotion {
        line.push_str(&format!(", promoting to {}", promo.name()));
    }

    match terminal {
        Some(TerminalKind::Checkmate { .. }) => line.push_str(". Checkmate!"),
        Some(TerminalKind::Stalemate) => line.push_str(". Stalemate."),
        Some(TerminalKind::Draw) => line.push_str(". Draw."),
        None if is_check => line.push_str(". Check!"),
        None => {}
    }

    line
}
