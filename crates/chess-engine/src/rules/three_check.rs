//! Three-Check: the first side to deliver check three times wins.
//!
//! Checks are counted on [`Position::checks`], which this rule set is the
//! only one that populates. All other rules (movement, checkmate,
//! stalemate, draws) are standard chess.

use super::standard::fide_insufficient_material;
use super::{DrawReason, GameResult, RuleSet, Variant};
use crate::movegen::{generate_moves, is_king_attacked, make_move};
use crate::{MoveList, Position};
use chess_core::{Color, Move};

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreeCheck;

impl RuleSet for ThreeCheck {
    fn initial_position(&self) -> Position {
        Position::startpos()
    }

    fn generate_moves(&self, position: &Position) -> MoveList {
        generate_moves(position)
    }

    fn is_legal(&self, position: &Position, m: Move) -> bool {
        self.generate_moves(position).as_slice().contains(&m)
    }

    fn make_move(&self, position: &Position, m: Move) -> Position {
        let mover = position.side_to_move;
        let mut new_pos = make_move(position, m);
        if is_king_attacked(&new_pos, mover.opposite()) {
            new_pos.checks[mover.index()] += 1;
        }
        new_pos
    }

    fn is_check(&self, position: &Position) -> bool {
        is_king_attacked(position, position.side_to_move)
    }

    fn game_result(&self, position: &Position) -> Option<GameResult> {
        if position.checks[Color::White.index()] >= 3 {
            return Some(GameResult::WhiteWins);
        }
        if position.checks[Color::Black.index()] >= 3 {
            return Some(GameResult::BlackWins);
        }

        if position.halfmove_clock >= 150 {
            return Some(GameResult::Draw(DrawReason::SeventyFiveMoveRule));
        }
        if self.is_insufficient_material(position) {
            return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
        }
        let moves = self.generate_moves(position);
        if moves.is_empty() {
            return Some(if self.is_check(position) {
                match position.side_to_move {
                    Color::White => GameResult::BlackWins,
                    Color::Black => GameResult::WhiteWins,
                }
            } else {
                GameResult::Draw(DrawReason::Stalemate)
            });
        }
        None
    }

    fn is_insufficient_material(&self, position: &Position) -> bool {
        // A lone king can still win by checking three times, so bare-king
        // endings are never automatically insufficient under Three-Check.
        position.checks[Color::White.index()] == 0
            && position.checks[Color::Black.index()] == 0
            && fide_insufficient_material(position)
    }

    fn variant(&self) -> Variant {
        Variant::ThreeCheck
    }
}
