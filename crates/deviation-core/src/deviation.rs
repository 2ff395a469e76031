use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Move};

use crate::rules::StandardRules;
use crate::side::Side;

/// The first ply where a game left its reference line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviationResult {
    pub whole_move_number: u32,
    /// SAN of the move actually played.
    pub deviation_san: String,
    /// SAN of the move the reference line expected.
    pub reference_san: String,
    /// Side to move in the actual game when it deviated.
    pub side: Side,
}

impl DeviationResult {
    pub fn new(
        whole_move_number: u32,
        deviation_san: impl Into<String>,
        reference_san: impl Into<String>,
        side: Side,
    ) -> Self {
        Self {
            whole_move_number,
            deviation_san: deviation_san.into(),
            reference_san: reference_san.into(),
            side,
        }
    }

    /// Whole move number for a 1-based ply index: plies 1 and 2 are move 1.
    pub fn whole_move_number_for_ply(ply: usize) -> u32 {
        ply.div_ceil(2) as u32
    }

    /// e.g. `6.Qc2` or `8...a5`
    pub fn numbered_deviation(&self) -> String {
        format!(
            "{}{}",
            self.side.move_number_prefix(self.whole_move_number),
            self.deviation_san
        )
    }

    pub fn numbered_reference(&self) -> String {
        format!(
            "{}{}",
            self.side.move_number_prefix(self.whole_move_number),
            self.reference_san
        )
    }
}

/// A [`DeviationResult`] together with the artifacts a presentation layer may
/// want: the actual game's position before the deviating ply and both moves.
#[derive(Debug, Clone)]
pub struct Deviation<P = Chess, M = Move> {
    pub result: DeviationResult,
    pub ply: usize,
    pub position: P,
    pub played: M,
    pub expected: M,
}

impl<P, M> Deviation<P, M> {
    pub fn into_result(self) -> DeviationResult {
        self.result
    }

    pub fn side(&self) -> Side {
        self.result.side
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowColor {
    /// The move from the game.
    Red,
    /// The repertoire move.
    Blue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrow {
    pub from: String,
    pub to: String,
    pub color: ArrowColor,
}

impl Deviation<Chess, Move> {
    pub fn fen(&self) -> String {
        StandardRules::fen(&self.position)
    }

    /// Arrows for a board diagram: repertoire move first, game move second.
    pub fn arrows(&self) -> Vec<Arrow> {
        [(&self.expected, ArrowColor::Blue), (&self.played, ArrowColor::Red)]
            .into_iter()
            .filter_map(|(mv, color)| {
                Some(Arrow {
                    from: mv.from()?.to_string(),
                    to: mv.to().to_string(),
                    color,
                })
            })
            .collect()
    }
}
