//! Lockstep comparison of a reference line against a played game.
//!
//! Both sequences are walked ply by ply, each on its own board. The walk
//! stops at the first pair of moves that differ by value, or as soon as
//! either sequence runs out. Length differences alone never count as a
//! deviation, and neither side's identity is considered here: gating on the
//! tracked player happens in [`crate::color::filter`].

use tracing::debug;

use crate::deviation::{Deviation, DeviationResult};
use crate::error::{DeviationError, Result};
use crate::game::Game;
use crate::rules::{RulesEngine, StandardRules};

/// Find the first ply where `actual_moves` departs from `reference_moves`.
///
/// Returns `Ok(None)` when the sequences agree over their common length.
/// Fails with [`DeviationError::MalformedSequence`] if the actual game's move
/// can't be played in its own position, either at the deviation point or
/// while the two lines still agree.
pub fn align_moves<R: RulesEngine>(
    rules: &R,
    reference_start: R::Position,
    reference_moves: &[R::Move],
    actual_start: R::Position,
    actual_moves: &[R::Move],
) -> Result<Option<Deviation<R::Position, R::Move>>> {
    let mut reference_board = reference_start;
    let mut actual_board = actual_start;

    for (index, (expected, played)) in reference_moves.iter().zip(actual_moves).enumerate() {
        let ply = index + 1;

        if !rules.same_move(expected, played) {
            if !rules.is_legal(&actual_board, played) {
                return Err(DeviationError::MalformedSequence {
                    ply,
                    detail: format!("illegal move {}", rules.describe(&actual_board, played)),
                });
            }

            let result = DeviationResult {
                whole_move_number: DeviationResult::whole_move_number_for_ply(ply),
                deviation_san: rules.notation(&actual_board, played),
                reference_san: rules.notation(&reference_board, expected),
                side: rules.turn(&actual_board),
            };
            debug!(ply, deviation = %result.deviation_san, reference = %result.reference_san, "deviation found");

            return Ok(Some(Deviation {
                result,
                ply,
                position: actual_board,
                played: played.clone(),
                expected: expected.clone(),
            }));
        }

        actual_board = match rules.apply(actual_board.clone(), played) {
            Some(next) => next,
            None => {
                return Err(DeviationError::MalformedSequence {
                    ply,
                    detail: format!("unplayable move {}", rules.describe(&actual_board, played)),
                })
            }
        };
        reference_board = match rules.apply(reference_board.clone(), expected) {
            Some(next) => next,
            None => {
                return Err(DeviationError::MalformedSequence {
                    ply,
                    detail: format!(
                        "reference line cannot follow {}",
                        rules.describe(&reference_board, expected)
                    ),
                })
            }
        };
    }

    Ok(None)
}

/// [`align_moves`] over two parsed games, each from its own starting position.
pub fn align(reference: &Game, actual: &Game) -> Result<Option<Deviation>> {
    align_moves(
        &StandardRules,
        reference.start().clone(),
        reference.moves(),
        actual.start().clone(),
        actual.moves(),
    )
}
