//! Crazyhouse: a captured piece joins the capturing side's pocket instead of
//! leaving the game, and on a later turn it may be dropped back onto any
//! empty square instead of making a normal move. A piece that reached its
//! current role through promotion reverts to a pawn when captured. The
//! 50-move rule is disabled, since the ability to re-deploy material keeps
//! games from drifting toward a dead, inactive position the way it does in
//! standard chess.

use super::{DrawReason, GameResult, IllegalDropReason, RuleSet, Variant};
use crate::movegen::{generate_moves, is_king_attacked, make_move};
use crate::{MoveList, Position};
use chess_core::{Color, Drop, Move, Piece, Rank, Square};

#[derive(Debug, Clone, Copy, Default)]
pub struct Crazyhouse;

/// Index of `role` within [`Position::pockets`]'s per-color array.
fn pocket_index(role: Piece) -> usize {
    match role {
        Piece::Pawn => 0,
        Piece::Knight => 1,
        Piece::Bishop => 2,
        Piece::Rook => 3,
        Piece::Queen => 4,
        Piece::King => unreachable!("kings are never pocketed"),
    }
}

impl RuleSet for Crazyhouse {
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
        let us = position.side_to_move;
        let captured = position.piece_at(m.to());
        let was_en_passant = m.flag() == chess_core::MoveFlag::EnPassant;

        let mut new_pos = make_move(position, m);

        if let Some((captured_piece, _)) = captured {
            let pocketed_role = if position.promoted.contains(m.to()) {
                Piece::Pawn
            } else {
                captured_piece
            };
            new_pos.pockets[us.index()][pocket_index(pocketed_role)] += 1;
        } else if was_en_passant {
            new_pos.pockets[us.index()][pocket_index(Piece::Pawn)] += 1;
        }

        let from_was_promoted = position.promoted.contains(m.from());
        let mut promoted = position.promoted;
        promoted.clear(m.from());
        promoted.clear(m.to());
        if m.flag().is_promotion() || from_was_promoted {
            promoted.set(m.to());
        }
        new_pos.promoted = promoted;

        new_pos
    }

    fn is_check(&self, position: &Position) -> bool {
        is_king_attacked(position, position.side_to_move)
    }

    fn game_result(&self, position: &Position) -> Option<GameResult> {
        // The 50-move rule is disabled under Crazyhouse, so no halfmove
        // clock check here.
        let moves = self.generate_moves(position);
        let any_drop = self.has_any_legal_drop(position);
        if moves.is_empty() && !any_drop {
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
        // Captured material stays in the game via the pocket, so it is
        // never actually gone; material is always considered sufficient.
        false
    }

    fn variant(&self) -> Variant {
        Variant::Crazyhouse
    }

    fn drop(&self, position: &Position, role: Piece, to: Square) -> Result<Drop, IllegalDropReason> {
        if role == Piece::King {
            return Err(IllegalDropReason::KingDrop);
        }
        let us = position.side_to_move;
        if position.pockets[us.index()][pocket_index(role)] == 0 {
            return Err(IllegalDropReason::EmptyPocket);
        }
        if position.piece_at(to).is_some() {
            return Err(IllegalDropReason::SquareOccupied);
        }
        if role == Piece::Pawn && (to.rank() == Rank::R1 || to.rank() == Rank::R8) {
            return Err(IllegalDropReason::PawnOnBackRank);
        }

        let d = Drop::new(role, to);
        let candidate = self.apply_drop(position, d);
        if is_king_attacked(&candidate, us) {
            return Err(IllegalDropReason::LeavesKingInCheck);
        }
        Ok(d)
    }

    fn apply_drop(&self, position: &Position, d: Drop) -> Position {
        let mut new_pos = position.clone();
        let us = position.side_to_move;

        new_pos.pieces[d.role.index()].set(d.to);
        new_pos.colors[us.index()].set(d.to);
        new_pos.pockets[us.index()][pocket_index(d.role)] -= 1;

        new_pos.en_passant = None;
        new_pos.halfmove_clock += 1;
        if us == Color::Black {
            new_pos.fullmove_number += 1;
        }
        new_pos.side_to_move = us.opposite();
        new_pos
    }
}

impl Crazyhouse {
    /// Enumerates every legal drop in `position`.
    pub fn legal_drops(&self, position: &Position) -> Vec<Drop> {
        let us = position.side_to_move;
        let mut drops = Vec::new();
        for role in [
            Piece::Pawn,
            Piece::Knight,
            Piece::Bishop,
            Piece::Rook,
            Piece::Queen,
        ] {
            if position.pockets[us.index()][pocket_index(role)] == 0 {
                continue;
            }
            for sq_idx in 0..64u8 {
                let sq = unsafe { Square::from_index_unchecked(sq_idx) };
                if let Ok(d) = self.drop(position, role, sq) {
                    drops.push(d);
                }
            }
        }
        drops
    }

    fn has_any_legal_drop(&self, position: &Position) -> bool {
        let us = position.side_to_move;
        let any_pocketed = [
            Piece::Pawn,
            Piece::Knight,
            Piece::Bishop,
            Piece::Rook,
            Piece::Queen,
        ]
        .iter()
        .any(|&role| position.pockets[us.index()][pocket_index(role)] > 0);
        any_pocketed && !self.legal_drops(position).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::File;

    #[test]
    fn capturing_pockets_the_captured_piece() {
        let pos = Position::from_fen("8/8/8/3p4/4P3/8/8/8 w - - 0 1").unwrap();
        let moves = Crazyhouse.generate_moves(&pos);
        let d5 = Square::new(File::D, Rank::R5);
        let exd5 = moves
            .as_slice()
            .iter()
            .copied()
            .find(|m| m.to() == d5)
            .unwrap();
        let after = Crazyhouse.make_move(&pos, exd5);
        assert_eq!(after.pockets[Color::White.index()][pocket_index(Piece::Pawn)], 1);
    }

    #[test]
    fn promoted_piece_reverts_to_pawn_when_captured() {
        // A white queen sits on e8 that reached that square through
        // promotion (tracked via `promoted`, since FEN cannot express it).
        // Black's rook on a8 captures it; the pocketed piece should be a
        // pawn, not a queen.
        let mut pos = Position::from_fen("r3Q2k/8/8/8/8/8/8/K7 b - - 0 1").unwrap();
        let e8 = Square::new(File::E, Rank::R8);
        let a8 = Square::new(File::A, Rank::R8);
        pos.promoted.set(e8);

        let moves = Crazyhouse.generate_moves(&pos);
        let rxe8 = moves
            .as_slice()
            .iter()
            .copied()
            .find(|m| m.from() == a8 && m.to() == e8)
            .expect("Rxe8 should be legal");
        let after = Crazyhouse.make_move(&pos, rxe8);
        assert_eq!(
            after.pockets[Color::Black.index()][pocket_index(Piece::Pawn)],
            1
        );
        assert_eq!(
            after.pockets[Color::Black.index()][pocket_index(Piece::Queen)],
            0
        );
        assert!(!after.promoted.contains(e8));
    }

    #[test]
    fn drop_requires_empty_pocket_slot() {
        let pos = Position::startpos();
        assert_eq!(
            Crazyhouse.drop(&pos, Piece::Knight, Square::new(File::E, Rank::R4)),
            Err(IllegalDropReason::EmptyPocket)
        );
    }

    #[test]
    fn drop_rejects_occupied_square() {
        let mut pos = Position::startpos();
        pos.pockets[Color::White.index()][pocket_index(Piece::Knight)] = 1;
        assert_eq!(
            Crazyhouse.drop(&pos, Piece::Knight, Square::new(File::E, Rank::R2)),
            Err(IllegalDropReason::SquareOccupied)
        );
    }

    #[test]
    fn drop_rejects_pawn_on_back_rank() {
        let mut pos = Position::startpos();
        pos.pockets[Color::White.index()][pocket_index(Piece::Pawn)] = 1;
        assert_eq!(
            Crazyhouse.drop(&pos, Piece::Pawn, Square::E8),
            Err(IllegalDropReason::PawnOnBackRank)
        );
    }

    #[test]
    fn legal_drop_places_piece_and_empties_pocket_slot() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        pos.pockets[Color::White.index()][pocket_index(Piece::Knight)] = 1;
        let d = Crazyhouse.drop(&pos, Piece::Knight, Square::new(File::E, Rank::R4)).unwrap();
        let after = Crazyhouse.apply_drop(&pos, d);
        assert_eq!(after.piece_at(Square::new(File::E, Rank::R4)), Some((Piece::Knight, Color::White)));
        assert_eq!(
            after.pockets[Color::White.index()][pocket_index(Piece::Knight)],
            0
        );
    }

    #[test]
    fn drop_rejected_if_it_leaves_own_king_in_check() {
        // White king on e1 is in check from the black rook on e8 along the
        // e-file; a knight drop on a square off that file cannot block it.
        let mut pos = Position::from_fen("4r3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        pos.pockets[Color::White.index()][pocket_index(Piece::Knight)] = 1;
        assert_eq!(
            Crazyhouse.drop(&pos, Piece::Knight, Square::A1),
            Err(IllegalDropReason::LeavesKingInCheck)
        );
        // Blocking on the e-file is fine.
        assert!(Crazyhouse.drop(&pos, Piece::Knight, Square::new(File::E, Rank::R4)).is_ok());
    }
}
