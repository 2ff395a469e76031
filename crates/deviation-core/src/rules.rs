//! Chess rules seam.
//!
//! The comparison core never looks inside a position or a move. Everything it
//! needs (legality, advancing a board, SAN rendering, side to move) goes
//! through [`RulesEngine`]. [`StandardRules`] backs it with shakmaty.

use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Move, Position};

use crate::side::Side;

pub trait RulesEngine {
    type Position: Clone;
    type Move: Clone;

    /// Value equality of two moves taken from different games.
    fn same_move(&self, a: &Self::Move, b: &Self::Move) -> bool;

    fn is_legal(&self, position: &Self::Position, mv: &Self::Move) -> bool;

    /// Advances `position` by `mv`, or `None` if the move cannot be played there.
    fn apply(&self, position: Self::Position, mv: &Self::Move) -> Option<Self::Position>;

    /// Standard notation of `mv`, rendered against `position`.
    fn notation(&self, position: &Self::Position, mv: &Self::Move) -> String;

    fn turn(&self, position: &Self::Position) -> Side;

    /// Human-readable move + position, used in error messages.
    fn describe(&self, position: &Self::Position, mv: &Self::Move) -> String;
}

/// Orthodox chess via shakmaty.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl StandardRules {
    pub fn fen(position: &Chess) -> String {
        Fen::from_position(position, EnPassantMode::Legal).to_string()
    }
}

impl RulesEngine for StandardRules {
    type Position = Chess;
    type Move = Move;

    // Origin, destination and promotion only. Castling compares as the king move (e1g1).
    fn same_move(&self, a: &Move, b: &Move) -> bool {
        a.to_uci(CastlingMode::Standard) == b.to_uci(CastlingMode::Standard)
    }

    fn is_legal(&self, position: &Chess, mv: &Move) -> bool {
        position.legal_moves().contains(mv)
    }

    fn apply(&self, position: Chess, mv: &Move) -> Option<Chess> {
        position.play(mv.clone()).ok()
    }

    fn notation(&self, position: &Chess, mv: &Move) -> String {
        let san = San::from_move(position, mv.clone()).to_string();
        match position.clone().play(mv.clone()) {
            Ok(after) if after.is_checkmate() => format!("{san}#"),
            Ok(after) if after.is_check() => format!("{san}+"),
            _ => san,
        }
    }

    fn turn(&self, position: &Chess) -> Side {
        position.turn().into()
    }

    fn describe(&self, position: &Chess, mv: &Move) -> String {
        format!(
            "{} in position {}",
            mv.to_uci(CastlingMode::Standard),
            Self::fen(position)
        )
    }
}
