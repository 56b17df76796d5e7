//! Chess960 (Fischer Random Chess).
//!
//! Chess960 changes only the starting setup and castling geometry; every
//! other rule (check, checkmate, en passant, promotion, the 50/75-move
//! rules, insufficient material) is identical to standard chess. The move
//! generator's castling code already handles arbitrary king/rook files
//! (see [`crate::movegen`]), so this rule set mostly delegates to the same
//! primitives as [`super::StandardChess`] and differs only in which
//! starting position it reports.

use super::standard::fide_insufficient_material;
use super::{GameResult, RuleSet, Variant};
use crate::movegen::{generate_moves, is_king_attacked, make_move};
use crate::{MoveList, Position};
use chess_core::{Color, Move};

/// Chess960 rules.
///
/// [`Chess960::initial_position`] returns setup #518 (the standard chess
/// starting position, which is itself a valid Chess960 setup) since a
/// rule set has no source of randomness to pick among the 960 setups.
/// Callers that need a specific or randomized Chess960 start should build
/// it externally and load it with [`Position::from_fen`] using
/// Shredder-FEN castling notation (file letters instead of `KQkq`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Chess960;

impl RuleSet for Chess960 {
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
        if position.halfmove_clock >= 150 {
            return Some(GameResult::Draw(super::DrawReason::SeventyFiveMoveRule));
        }
        if self.is_insufficient_material(position) {
            return Some(GameResult::Draw(super::DrawReason::InsufficientMaterial));
        }
        let moves = self.generate_moves(position);
        if moves.is_empty() {
            return Some(if self.is_check(position) {
                match position.side_to_move {
                    Color::White => GameResult::BlackWins,
                    Color::Black => GameResult::WhiteWins,
                }
            } else {
                GameResult::Draw(super::DrawReason::Stalemate)
            });
        }
        None
    }

    fn is_insufficient_material(&self, position: &Position) -> bool {
        fide_insufficient_material(position)
    }

    fn variant(&self) -> Variant {
        Variant::Chess960
    }
}
