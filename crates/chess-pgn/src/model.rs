//! The parse tree a PGN game is parsed into.

use chess_core::{File, Piece, Rank, Square};

/// One fully parsed PGN game: its tag pairs, any comment before the first
/// move, the mainline, and the final result token if present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedGame {
    /// Tag pairs in file order (a PGN may repeat a tag name; both are kept).
    pub tags: Vec<(String, String)>,
    /// Comments that appear before the first move of the mainline.
    pub leading_comments: Vec<String>,
    /// The mainline, as a flat sequence of plies. Each ply may carry its own
    /// alternative variations.
    pub mainline: Vec<SanNode>,
    /// The game termination marker ("1-0", "0-1", "1/2-1/2", "*"), if any.
    pub result: Option<String>,
}

impl ParsedGame {
    /// Looks up a tag's value by name (first match, case-sensitive per the
    /// PGN standard).
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// One parsed ply: a SAN move plus its annotations and variations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SanNode {
    pub san: Option<SanMove>,
    /// True if the move text carried a `+` suffix.
    pub check: bool,
    /// True if the move text carried a `#` suffix.
    pub checkmate: bool,
    /// Numeric Annotation Glyphs and informal glyphs (`!`, `?`, `!!`, ...),
    /// kept as their raw text.
    pub nags: Vec<String>,
    /// Comments attached to this ply (those appearing after it in the text).
    pub comments: Vec<String>,
    /// Alternative lines branching off from the position before this ply.
    pub variations: Vec<Vec<SanNode>>,
}

/// A parsed (not yet resolved) SAN move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanMove {
    /// An ordinary piece move (pawn moves have `piece: Piece::Pawn`).
    Piece {
        piece: Piece,
        disambig_file: Option<File>,
        disambig_rank: Option<Rank>,
        capture: bool,
        dest: Square,
        promotion: Option<Piece>,
    },
    /// Castling, either kingside (`O-O`) or queenside (`O-O-O`).
    Castle { kingside: bool },
    /// A Crazyhouse pocket drop (`N@f3`).
    Drop { role: Piece, dest: Square },
}
