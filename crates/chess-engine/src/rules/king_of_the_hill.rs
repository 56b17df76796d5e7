//! King of the Hill: an extra win condition layered on standard chess.
//!
//! Reaching one of the four central squares (d4, d5, e4, e5) with your own
//! king wins immediately, even if that king is simultaneously in check from
//! the move that brought it there. Everything else — movement, check,
//! checkmate, stalemate, draws — is standard chess.

use super::standard::fide_insufficient_material;
use super::{DrawReason, GameResult, RuleSet, Variant};
use crate::movegen::{generate_moves, is_king_attacked, make_move};
use crate::{Bitboard, MoveList, Position};
use chess_core::{Color, File, Move, Piece, Rank, Square};

/// The four central squares that end the game when a king reaches them.
const HILL: Bitboard = Bitboard::new(
    (1u64 << Square::new(File::D, Rank::R4).index())
        | (1u64 << Square::new(File::D, Rank::R5).index())
        | (1u64 << Square::new(File::E, Rank::R4).index())
        | (1u64 << Square::new(File::E, Rank::R5).index()),
);

#[derive(Debug, Clone, Copy, Default)]
pub struct KingOfTheHill;

impl RuleSet for KingOfTheHill {
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
        make_move(position, m)
    }

    fn is_check(&self, position: &Position) -> bool {
        is_king_attacked(position, position.side_to_move)
    }

    fn game_result(&self, position: &Position) -> Option<GameResult> {
        // The side that just moved is the opposite of side_to_move.
        let mover = position.side_to_move.opposite();
        if (position.pieces_of(Piece::King, mover) & HILL).is_not_empty() {
            return Some(match mover {
                Color::White => GameResult::WhiteWins,
                Color::Black => GameResult::BlackWins,
            });
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
        fide_insufficient_material(position)
    }

    fn variant(&self) -> Variant {
        Variant::KingOfTheHill
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn king_on_hill_wins_immediately() {
        // White king already sits on the hill; it is Black's turn to move,
        // so the mover (side_to_move.opposite()) is White — the side whose
        // king reached the hill on the move that produced this position.
        let pos = Position::from_fen("8/8/8/3K4/8/8/8/7k b - - 0 1").unwrap();
        assert_eq!(
            KingOfTheHill.game_result(&pos),
            Some(GameResult::WhiteWins)
        );
    }

    #[test]
    fn king_off_hill_no_special_result() {
        let pos = Position::startpos();
        assert_eq!(KingOfTheHill.game_result(&pos), None);
    }
}
