//! Error types for PGN parsing, SAN resolution, and replay.

/// Something went wrong while parsing PGN text into a [`crate::ParsedGame`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PgnError {
    #[error("unexpected end of input while expecting {expected}")]
    UnexpectedEof { expected: String },
    #[error("unexpected character {found:?} at offset {offset}, expected {expected}")]
    UnexpectedChar {
        offset: usize,
        found: char,
        expected: String,
    },
    #[error("malformed move text {0:?}")]
    MalformedMove(String),
    #[error("a variation must follow a move")]
    DanglingVariation,
    #[error("incomplete PGN: unterminated {0}")]
    IncompletePgn(&'static str),
}

/// Something went wrong resolving a parsed SAN token against a position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no legal move matches {0}")]
    NoMoveFound(String),
    #[error("move {0} is ambiguous between multiple legal moves")]
    AmbiguousMove(String),
    #[error("illegal drop: {0}")]
    IllegalDrop(#[from] chess_engine::IllegalDropReason),
    #[error("wrong promotion suffix for {0}")]
    WrongPromotion(String),
}

/// Why replaying a parsed game stopped before reaching the end of the
/// move list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("replay stopped at ply {ply}: {source}")]
pub struct ReplayError {
    pub ply: usize,
    #[source]
    pub source: ResolveError,
}

/// Top-level error for [`crate::Reader::full`], which goes straight from
/// PGN text to a replayed game.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReaderError {
    #[error(transparent)]
    Pgn(#[from] PgnError),
    #[error(transparent)]
    UnknownVariant(#[from] chess_engine::UnknownVariant),
    #[error(transparent)]
    InvalidFen(#[from] chess_core::FenError),
}
