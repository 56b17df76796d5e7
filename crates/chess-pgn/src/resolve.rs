//! Resolves a parsed [`SanMove`] against a position under a given rule set.
//!
//! This mirrors `chess_engine::san::resolve_san`'s matching logic, but
//! starts from an already-tokenized [`SanMove`] instead of raw text, since
//! [`crate::parser`] has already done the tokenizing.

use crate::error::ResolveError;
use crate::model::SanMove;
use chess_core::{Color, Move, MoveFlag, PlayedMove};
use chess_engine::rules::RuleSet;
use chess_engine::Position;

/// Resolves `mv` to the board move or pocket drop it names in `position`.
pub fn resolve(
    rules: &dyn RuleSet,
    position: &Position,
    mv: &SanMove,
) -> Result<PlayedMove, ResolveError> {
    match *mv {
        SanMove::Castle { kingside } => resolve_castle(rules, position, kingside),
        SanMove::Drop { role, dest } => {
            let d = rules.drop(position, role, dest)?;
            Ok(PlayedMove::Drop(d))
        }
        SanMove::Piece {
            piece,
            disambig_file,
            disambig_rank,
            dest,
            promotion,
            ..
        } => resolve_piece_move(
            rules,
            position,
            piece,
            disambig_file,
            disambig_rank,
            dest,
            promotion,
        ),
    }
}

fn resolve_castle(
    rules: &dyn RuleSet,
    position: &Position,
    kingside: bool,
) -> Result<PlayedMove, ResolveError> {
    let flag = if kingside {
        MoveFlag::CastleKingside
    } else {
        MoveFlag::CastleQueenside
    };
    let moves = rules.generate_moves(position);
    let name = if kingside { "O-O" } else { "O-O-O" };
    moves
        .as_slice()
        .iter()
        .find(|m| m.flag() == flag)
        .copied()
        .map(PlayedMove::Board)
        .ok_or_else(|| ResolveError::NoMoveFound(name.to_string()))
}

#[allow(clippy::too_many_arguments)]
fn resolve_piece_move(
    rules: &dyn RuleSet,
    position: &Position,
    piece: chess_core::Piece,
    disambig_file: Option<chess_core::File>,
    disambig_rank: Option<chess_core::Rank>,
    dest: chess_core::Square,
    promotion: Option<chess_core::Piece>,
) -> Result<PlayedMove, ResolveError> {
    let moves = rules.generate_moves(position);
    let mut matching: Vec<Move> = Vec::new();
    let mut wrong_promotion = false;

    for m in moves.as_slice() {
        if m.to() != dest {
            continue;
        }
        let Some((moved_piece, _)) = position.piece_at(m.from()) else {
            continue;
        };
        if moved_piece != piece {
            continue;
        }
        if let Some(file) = disambig_file {
            if m.from().file() != file {
                continue;
            }
        }
        if let Some(rank) = disambig_rank {
            if m.from().rank() != rank {
                continue;
            }
        }
        match promotion {
            Some(p) => {
                if m.flag().promotion_piece() != Some(p) {
                    wrong_promotion = true;
                    continue;
                }
            }
            None => {
                if m.flag().is_promotion() {
                    wrong_promotion = true;
                    continue;
                }
            }
        }
        matching.push(*m);
    }

    match matching.len() {
        0 if wrong_promotion => Err(ResolveError::WrongPromotion(describe(piece, dest))),
        0 => Err(ResolveError::NoMoveFound(describe(piece, dest))),
        1 => Ok(PlayedMove::Board(matching[0])),
        _ => Err(ResolveError::AmbiguousMove(describe(piece, dest))),
    }
}

fn describe(piece: chess_core::Piece, dest: chess_core::Square) -> String {
    format!("{}{}", piece, dest)
}

/// Convenience used by [`crate::replay`] to tell which side a completed
/// board move or drop belongs to, e.g. for constructing error context.
pub(crate) fn side_to_move(position: &Position) -> Color {
    position.side_to_move
}
