//! Coordinate (UCI) notation utilities.

use cozy_chess::{File, Move, Rank, Square};

use crate::types::PieceKind;

/// Convert standard coordinate castling notation to cozy_chess notation.
///
/// Coordinate notation writes castling as the king moving two squares
/// (e1g1, e1c1, e8g8, e8c8) while cozy_chess encodes it king-to-rook
/// (e1h1, e1a1, e8h8, e8a8). When the input looks like a two-square king
/// move and the king-to-rook equivalent is actually legal, the converted
/// move is returned; otherwise the input passes through untouched.
pub fn normalize_castling(mv: Move, legal_moves: &[Move]) -> Move {
    let on_back_rank = matches!(mv.from.rank(), Rank::First | Rank::Eighth);
    let from_e_file = matches!(mv.from.file(), File::E);
    let to_g_or_c = matches!(mv.to.file(), File::G | File::C);

    if on_back_rank && from_e_file && to_g_or_c && mv.promotion.is_none() {
        let rook_square = match (mv.from.rank(), mv.to.file()) {
            (Rank::First, File::G) => Square::new(File::H, Rank::First),
            (Rank::First, File::C) => Square::new(File::A, Rank::First),
            (Rank::Eighth, File::G) => Square::new(File::H, Rank::Eighth),
            (Rank::Eighth, File::C) => Square::new(File::A, Rank::Eighth),
            _ => return mv,
        };

        let converted = Move {
            from: mv.from,
            to: rook_square,
            promotion: None,
        };

        if legal_moves.contains(&converted) {
            return converted;
        }
    }

    mv
}

/// Format a move in coordinate notation (e.g. "e2e4", "e7e8q").
pub fn format_uci(mv: Move) -> String {
    let mut s = format!("{}{}", mv.from, mv.to);
    if let Some(promo) = mv.promotion {
        s.push(PieceKind::from(promo).to_char_lower());
    }
    s
}
