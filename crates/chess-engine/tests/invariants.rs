//! Property tests for the universally-quantified invariants: no move ever
//! leaves the mover's own king in check, castling rights never come back
//! once removed, and every legal move's rendered SAN resolves back to the
//! same move. Random walks are used in place of full game-tree enumeration,
//! which is infeasible inside a property test.

use chess_engine::rules::{RuleSet, StandardChess};
use chess_engine::san::{move_to_san, san_to_move};
use chess_engine::{movegen, Position};
use proptest::prelude::*;

/// Plays up to `steps` pseudo-random plies from the standard starting
/// position, picking `choices[i] % legal_moves.len()` at each step, and
/// returns every position reached along the way (including the start).
fn random_walk(choices: &[u8], steps: usize) -> Vec<Position> {
    let mut position = StandardChess.initial_position();
    let mut visited = vec![position.clone()];

    for i in 0..steps {
        let moves = movegen::generate_moves(&position);
        if moves.is_empty() {
            break;
        }
        let pick = choices[i % choices.len()] as usize % moves.len();
        position = movegen::make_move(&position, moves.as_slice()[pick]);
        visited.push(position.clone());
    }

    visited
}

proptest! {
    /// No legal move, from any position reached by a bounded random walk,
    /// ever leaves the side that just moved in check.
    #[test]
    fn legal_moves_never_self_check(choices in prop::collection::vec(any::<u8>(), 1..24)) {
        for position in random_walk(&choices, 12) {
            for m in movegen::generate_moves(&position).as_slice() {
                let mover = position.side_to_move;
                let after = movegen::make_move(&position, *m);
                prop_assert!(!movegen::is_king_attacked(&after, mover));
            }
        }
    }

    /// Castling rights are monotonically non-increasing along any sequence
    /// of moves: once a right is gone, no later position in the walk has it
    /// back.
    #[test]
    fn castling_rights_never_increase(choices in prop::collection::vec(any::<u8>(), 1..24)) {
        let visited = random_walk(&choices, 16);
        for window in visited.windows(2) {
            let (before, after) = (window[0].castling.raw(), window[1].castling.raw());
            // Every bit set in `after` must already have been set in `before`.
            prop_assert_eq!(after & !before, 0);
        }
    }

    /// Rendering a legal move to SAN and resolving that SAN against the
    /// same position always yields the original move back.
    #[test]
    fn san_roundtrips_on_every_legal_move(choices in prop::collection::vec(any::<u8>(), 1..24)) {
        for position in random_walk(&choices, 10) {
            for m in movegen::generate_moves(&position).as_slice() {
                let san = move_to_san(&position, *m);
                let resolved = san_to_move(&position, &san);
                prop_assert_eq!(resolved, Ok(*m), "san {} did not roundtrip", san);
            }
        }
    }
}
