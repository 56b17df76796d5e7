//! Horde: White has no king and a wall of 36 pawns; Black has a standard
//! army. White loses only by running out of pieces (or being stalemated);
//! Black plays — and can be checkmated or stalemated — exactly as in
//! standard chess. Since White has no king, [`crate::movegen::is_king_attacked`]
//! already degrades gracefully (it returns `false` when there is no king to
//! attack), so the shared move generator and legality filter need no
//! Horde-specific changes at all.

use super::{DrawReason, GameResult, RuleSet, Variant};
use crate::movegen::{generate_moves, is_king_attacked, make_move};
use crate::{MoveList, Position};
use chess_core::{Color, Move};

#[derive(Debug, Clone, Copy, Default)]
pub struct Horde;

impl RuleSet for Horde {
    fn initial_position(&self) -> Position {
        Position::from_fen(
            "rnbqkbnr/pppppppp/8/1PP2PP1/PPPPPPPP/PPPPPPPP/PPPPPPPP/PPPPPPPP w kq - 0 1",
        )
        .expect("horde start FEN is valid")
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
        if position.colors[Color::White.index()].is_empty() {
            return Some(GameResult::BlackWins);
        }

        if position.halfmove_clock >= 150 {
            return Some(GameResult::Draw(DrawReason::SeventyFiveMoveRule));
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

    fn is_insufficient_material(&self, _position: &Position) -> bool {
        // White's horde is pawns-only by construction and Black always
        // retains a king; neither side's material is ever automatically
        // insufficient under Horde.
        false
    }

    fn variant(&self) -> Variant {
        Variant::Horde
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Piece;

    #[test]
    fn initial_position_has_no_white_king() {
        let pos = Horde.initial_position();
        assert!(pos.pieces_of(Piece::King, Color::White).is_empty());
        assert_eq!(pos.pieces_of(Piece::Pawn, Color::White).count(), 36);
    }

    #[test]
    fn white_loses_when_out_of_pieces() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(Horde.game_result(&pos), Some(GameResult::BlackWins));
    }

    #[test]
    fn checkmate_of_the_side_with_a_king_is_detected() {
        // Fool's mate: White (which, unlike in a real Horde game, still has
        // its king here) is checkmated, so Black wins.
        let pos =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1")
                .unwrap();
        assert!(Horde.generate_moves(&pos).is_empty());
        assert_eq!(Horde.game_result(&pos), Some(GameResult::BlackWins));
    }
}
