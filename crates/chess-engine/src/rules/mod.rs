//! Rule set abstraction for chess variants.
//!
//! This module provides the [`RuleSet`] trait which abstracts over different
//! chess variants. The engine is rule-agnostic - it delegates game-specific
//! logic to the active rule set.

mod antichess;
mod atomic;
mod chess960;
mod crazyhouse;
mod horde;
mod king_of_the_hill;
mod racing_kings;
mod standard;
mod three_check;
mod variant;

pub use antichess::Antichess;
pub use atomic::Atomic;
pub use chess960::Chess960;
pub use crazyhouse::Crazyhouse;
pub use horde::Horde;
pub use king_of_the_hill::KingOfTheHill;
pub use racing_kings::RacingKings;
pub use standard::StandardChess;
pub use three_check::ThreeCheck;
pub use variant::{UnknownVariant, Variant};

use crate::{MoveList, Position};
use chess_core::{Drop, Move, Piece, Square};

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// White wins (checkmate, resignation, or a variant-specific win condition).
    WhiteWins,
    /// Black wins (checkmate, resignation, or a variant-specific win condition).
    BlackWins,
    /// Draw, tagged with the reason it was reached.
    Draw(DrawReason),
}

/// Why a game ended in a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// Side to move has no legal moves and is not in check.
    Stalemate,
    /// Neither side has enough material to deliver checkmate.
    InsufficientMaterial,
    /// The current position has occurred three times (claimed).
    ThreefoldRepetition,
    /// The current position has occurred five times (automatic).
    FivefoldRepetition,
    /// 50 full moves have passed with no capture or pawn move (claimed).
    FiftyMoveRule,
    /// 75 full moves have passed with no capture or pawn move (automatic).
    SeventyFiveMoveRule,
    /// Both players agreed to a draw.
    Agreement,
    /// A variant-specific drawing condition (e.g. Racing Kings both sides
    /// reaching the goal rank on the same move).
    VariantSpecific,
}

/// Trait for implementing chess variants.
///
/// The engine uses this trait to delegate all game-specific logic, making it
/// easy to support different chess variants (standard, Chess960, etc.) without
/// changing the core engine code.
///
/// # Example
///
/// ```
/// use chess_engine::{Position, StandardChess};
/// use chess_engine::rules::RuleSet;
///
/// let position = StandardChess.initial_position();
/// let moves = StandardChess.generate_moves(&position);
/// ```
pub trait RuleSet {
    /// Returns the initial position for this variant.
    fn initial_position(&self) -> Position;

    /// Generates all legal moves for the given position.
    fn generate_moves(&self, position: &Position) -> MoveList;

    /// Returns true if the given move is legal in the position.
    fn is_legal(&self, position: &Position, m: Move) -> bool;

    /// Makes a move on the position, returning the new position.
    ///
    /// # Panics
    ///
    /// May panic if the move is not legal. Use [`is_legal`](RuleSet::is_legal)
    /// to check first, or use [`try_make_move`](RuleSet::try_make_move).
    fn make_move(&self, position: &Position, m: Move) -> Position;

    /// Attempts to make a move, returning `None` if illegal.
    fn try_make_move(&self, position: &Position, m: Move) -> Option<Position> {
        if self.is_legal(position, m) {
            Some(self.make_move(position, m))
        } else {
            None
        }
    }

    /// Returns true if the side to move is in check.
    fn is_check(&self, position: &Position) -> bool;

    /// Returns the game result if the game is over, otherwise `None`.
    fn game_result(&self, position: &Position) -> Option<GameResult>;

    /// Returns true if the game is over.
    fn is_game_over(&self, position: &Position) -> bool {
        self.game_result(position).is_some()
    }

    /// Returns true if neither side has enough material to ever deliver
    /// checkmate, under this variant's rules.
    ///
    /// Standard, Chess960, King of the Hill, and Three-Check reuse the FIDE
    /// bare-king / single-minor-piece table. Variants with no royal king
    /// (Antichess), no traditional mating pattern (Horde, Racing Kings), or
    /// where a captured piece can return to play (Crazyhouse) override this.
    fn is_insufficient_material(&self, position: &Position) -> bool {
        standard::fide_insufficient_material(position)
    }

    /// Variant identity, used for FEN/PGN round-tripping and display.
    fn variant(&self) -> Variant;

    /// Validates dropping a pocketed piece of `role` onto `to`, without
    /// applying it.
    ///
    /// Only [`Crazyhouse`] overrides this; every other variant has no
    /// pockets, so the default rejects every drop.
    fn drop(&self, _position: &Position, _role: Piece, _to: Square) -> Result<Drop, IllegalDropReason> {
        Err(IllegalDropReason::NoPockets)
    }

    /// Applies an already-validated [`Drop`], returning the new position.
    ///
    /// # Panics
    ///
    /// May panic or return a nonsensical position if `d` was not first
    /// validated via [`RuleSet::drop`].
    fn apply_drop(&self, _position: &Position, _d: Drop) -> Position {
        unreachable!("apply_drop called on a variant with no pockets")
    }
}

/// Why a [`RuleSet::drop`] attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalDropReason {
    #[error("this variant has no pockets to drop from")]
    NoPockets,
    #[error("pocket has no piece of that role")]
    EmptyPocket,
    #[error("destination square is occupied")]
    SquareOccupied,
    #[error("pawns cannot be dropped on the first or last rank")]
    PawnOnBackRank,
    #[error("kings cannot be dropped")]
    KingDrop,
    #[error("drop would leave the dropping side's king in check")]
    LeavesKingInCheck,
}
