//! Racing Kings: race your king to the eighth rank. No captures are forced
//! and no side may ever give check — a move that would place the opponent
//! in check is simply illegal, regardless of whether it is otherwise legal.
//!
//! There are no pawns, so no promotion, en passant, or 50/75-move draw by
//! inactivity; the only way to end the game is a king reaching rank 8 (a
//! win, unless both kings reach it on consecutive half-moves, which draws)
//! or a stalemate.

use super::{DrawReason, GameResult, RuleSet, Variant};
use crate::movegen::{generate_moves, is_king_attacked, make_move};
use crate::{Bitboard, MoveList, Position};
use chess_core::{Color, Move, Piece};

#[derive(Debug, Clone, Copy, Default)]
pub struct RacingKings;

impl RuleSet for RacingKings {
    fn initial_position(&self) -> Position {
        Position::from_fen("8/8/8/8/8/8/krbnNBRK/qrbnNBRQ w - - 0 1")
            .expect("racing kings start FEN is valid")
    }

    fn generate_moves(&self, position: &Position) -> MoveList {
        let mut moves = generate_moves(position);
        let them = position.side_to_move.opposite();
        moves.retain(|&m| {
            let new_pos = make_move(position, m);
            !is_king_attacked(&new_pos, them)
        });
        moves
    }

    fn is_legal(&self, position: &Position, m: Move) -> bool {
        self.generate_moves(position).as_slice().contains(&m)
    }

    fn make_move(&self, position: &Position, m: Move) -> Position {
        make_move(position, m)
    }

    fn is_check(&self, position: &Position) -> bool {
        // Legal play never reaches a position with a check pending (every
        // move that would give check is filtered out above), but a
        // hand-built position could still have one.
        is_king_attacked(position, position.side_to_move)
    }

    fn game_result(&self, position: &Position) -> Option<GameResult> {
        let white_on_goal = (position.pieces_of(Piece::King, Color::White) & Bitboard::RANK_8)
            .is_not_empty();
        let black_on_goal = (position.pieces_of(Piece::King, Color::Black) & Bitboard::RANK_8)
            .is_not_empty();

        if white_on_goal && black_on_goal {
            return Some(GameResult::Draw(DrawReason::VariantSpecific));
        }
        if white_on_goal {
            // White just reached the goal. If Black is still to move, Black
            // gets one more move to reach the goal itself and draw;
            // otherwise the race is already decided.
            return if position.side_to_move == Color::Black {
                None
            } else {
                Some(GameResult::WhiteWins)
            };
        }
        if black_on_goal {
            return Some(GameResult::BlackWins);
        }

        let moves = self.generate_moves(position);
        if moves.is_empty() {
            // No checks are ever legal, so an empty move list is always a
            // stalemate, never a checkmate.
            return Some(GameResult::Draw(DrawReason::Stalemate));
        }
        None
    }

    fn is_insufficient_material(&self, _position: &Position) -> bool {
        false
    }

    fn variant(&self) -> Variant {
        Variant::RacingKings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Square;

    #[test]
    fn initial_position_has_no_pawns() {
        let pos = RacingKings.initial_position();
        assert!(pos.pieces[Piece::Pawn.index()].is_empty());
    }

    #[test]
    fn reaching_rank_eight_wins_when_opponent_cannot_equalize() {
        // White king already on the goal rank, Black to move and nowhere
        // near it: White wins once it becomes White's "turn to have won".
        let pos = Position::from_fen("1K6/8/8/8/8/8/7k/8 b - - 0 1").unwrap();
        assert_eq!(RacingKings.game_result(&pos), None);
        let pos_after_black =
            Position::from_fen("1K6/8/8/8/8/8/7k/8 w - - 0 1").unwrap();
        assert_eq!(
            RacingKings.game_result(&pos_after_black),
            Some(GameResult::WhiteWins)
        );
    }

    #[test]
    fn both_kings_on_goal_rank_draws() {
        let pos = Position::from_fen("1K5k/8/8/8/8/8/8/8 w - - 0 1").unwrap();
        assert_eq!(
            RacingKings.game_result(&pos),
            Some(GameResult::Draw(DrawReason::VariantSpecific))
        );
    }

    #[test]
    fn moves_that_would_check_the_opponent_are_illegal() {
        let pos = Position::from_fen("8/8/8/8/8/3k4/3R4/3K4 w - - 0 1").unwrap();
        let moves = RacingKings.generate_moves(&pos);
        let d2 = Square::from_algebraic("d2").unwrap();
        let d3 = Square::from_algebraic("d3").unwrap();
        assert!(!moves
            .as_slice()
            .iter()
            .any(|m| m.from() == d2 && m.to() == d3));
    }
}
