//! Atomic chess: every capture detonates. The capturing piece, the captured
//! piece, and every non-pawn piece on a square adjacent to the capture
//! square are removed from the board. Exploding your own king is illegal;
//! exploding the opponent's king wins immediately, overriding any check that
//! might otherwise be on the board.

use super::standard::fide_insufficient_material;
use super::{DrawReason, GameResult, RuleSet, Variant};
use crate::movegen::{generate_pseudo_legal, is_king_attacked, king_attacks, make_move};
use crate::{MoveList, Position};
use chess_core::{Color, Move, MoveFlag, Piece, Square};

#[derive(Debug, Clone, Copy, Default)]
pub struct Atomic;

impl RuleSet for Atomic {
    fn initial_position(&self) -> Position {
        Position::startpos()
    }

    fn generate_moves(&self, position: &Position) -> MoveList {
        let us = position.side_to_move;
        let them = us.opposite();
        let mut moves = generate_pseudo_legal(position);
        moves.retain(|&m| {
            let new_pos = atomic_make_move(position, m);
            if new_pos.pieces_of(Piece::King, us).is_empty() {
                // Exploding your own king is illegal.
                return false;
            }
            if new_pos.pieces_of(Piece::King, them).is_empty() {
                // Exploding the opponent's king wins outright, regardless of
                // whether our own king would otherwise be left in check.
                return true;
            }
            !is_king_attacked(&new_pos, us)
        });
        moves
    }

    fn is_legal(&self, position: &Position, m: Move) -> bool {
        self.generate_moves(position).as_slice().contains(&m)
    }

    fn make_move(&self, position: &Position, m: Move) -> Position {
        atomic_make_move(position, m)
    }

    fn is_check(&self, position: &Position) -> bool {
        is_king_attacked(position, position.side_to_move)
    }

    fn game_result(&self, position: &Position) -> Option<GameResult> {
        if position.pieces_of(Piece::King, Color::White).is_empty() {
            return Some(GameResult::BlackWins);
        }
        if position.pieces_of(Piece::King, Color::Black).is_empty() {
            return Some(GameResult::WhiteWins);
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
        Variant::Atomic
    }
}

/// Applies `m` and, if it was a capture, detonates the capture square: the
/// capturing piece and every non-pawn piece on an adjacent square are
/// removed (captured pawns adjacent to the blast are spared; the capturing
/// piece is removed even if it is itself a pawn).
fn atomic_make_move(position: &Position, m: Move) -> Position {
    let is_capture =
        position.piece_at(m.to()).is_some() || m.flag() == MoveFlag::EnPassant;
    let mut new_pos = make_move(position, m);
    if !is_capture {
        return new_pos;
    }

    let center = m.to();
    if let Some((piece, color)) = new_pos.piece_at(center) {
        remove_exploded(position, &mut new_pos, center, piece, color);
    }
    for sq in king_attacks(center) {
        if let Some((piece, color)) = new_pos.piece_at(sq) {
            if piece != Piece::Pawn {
                remove_exploded(position, &mut new_pos, sq, piece, color);
            }
        }
    }
    new_pos
}

/// Removes a piece destroyed by an explosion, and reconciles the castling
/// bookkeeping that a normal [`make_move`] would have handled for a move
/// made directly onto that square.
fn remove_exploded(
    old_pos: &Position,
    new_pos: &mut Position,
    sq: Square,
    piece: Piece,
    color: Color,
) {
    new_pos.pieces[piece.index()].clear(sq);
    new_pos.colors[color.index()].clear(sq);

    if piece == Piece::King {
        new_pos.castling.remove_color(color);
    }
    if piece == Piece::Rook && old_pos.unmoved_rooks.contains(sq) {
        new_pos.unmoved_rooks.clear(sq);
        if let Some(king_idx) = old_pos.pieces_of(Piece::King, color).lsb() {
            if sq.index() % 8 > king_idx % 8 {
                new_pos.castling.remove_kingside(color);
            } else {
                new_pos.castling.remove_queenside(color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_explodes_surrounding_non_pawn_pieces() {
        // Rxe2 detonates both rooks (the capturing piece always explodes
        // too), leaving only the two kings — an insufficient-material draw.
        let pos = Position::from_fen("k7/8/8/8/8/8/4r3/K3R3 w - - 0 1").unwrap();
        let e2 = Square::from_algebraic("e2").unwrap();
        let moves = Atomic.generate_moves(&pos);
        let rxe2 = moves
            .as_slice()
            .iter()
            .copied()
            .find(|m| m.to() == e2)
            .expect("Rxe2 should be legal");
        let after = Atomic.make_move(&pos, rxe2);
        assert_eq!(after.occupied().count(), 2);
        assert_eq!(
            Atomic.game_result(&after),
            Some(GameResult::Draw(DrawReason::InsufficientMaterial))
        );
    }

    #[test]
    fn exploding_own_king_is_illegal() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/3rK3/3R4 w - - 0 1").unwrap();
        let moves = Atomic.generate_moves(&pos);
        let d2 = Square::from_algebraic("d2").unwrap();
        assert!(!moves.as_slice().iter().any(|m| m.to() == d2));
    }

    #[test]
    fn exploding_enemy_king_wins_immediately() {
        // Rxd8 blows up the rook it captures and, with it, the adjacent
        // black king — an immediate win, generated as a legal move.
        let pos = Position::from_fen("3rk3/8/8/8/8/8/8/3RK3 w - - 0 1").unwrap();
        let d8 = Square::from_algebraic("d8").unwrap();
        let moves = Atomic.generate_moves(&pos);
        let rxd8 = moves
            .as_slice()
            .iter()
            .copied()
            .find(|m| m.to() == d8)
            .expect("Rxd8 should be legal");
        let after = Atomic.make_move(&pos, rxd8);
        assert_eq!(Atomic.game_result(&after), Some(GameResult::WhiteWins));
    }
}
