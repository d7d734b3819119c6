//! Board state adapter over the `cozy-chess` rules engine.
//!
//! All legality checking, check/mate/stalemate detection, and board
//! representation is delegated to `cozy-chess`. This crate owns the
//! coordinate-notation boundary: proposals arrive as strings such as
//! `"e2e4"` and are parsed, validated against the current legal set,
//! and applied. Rejected input never mutates the position.

pub mod describe;
pub mod state;
pub mod types;
pub mod uci;

pub use state::{AppliedMove, BoardError, BoardState, TerminalKind};
pub use types::{PieceKind, Side};
pub use uci::{format_uci, normalize_castling};
