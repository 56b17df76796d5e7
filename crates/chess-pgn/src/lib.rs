//! PGN parsing, SAN resolution, and game replay.
//!
//! This crate turns PGN text into a [`ParsedGame`] tree ([`parser::parse`])
//! and folds that tree's mainline against a starting [`chess_engine::Position`]
//! one ply at a time ([`replay::replay_mainline`]), resolving each SAN token
//! through the active variant's [`chess_engine::rules::RuleSet`]. [`Reader::full`]
//! chains both steps together for the common case of "I have a PGN string
//! and want the game it describes."

mod error;
mod model;
mod parser;
mod resolve;
mod replay;

pub use error::{PgnError, ReaderError, ReplayError, ResolveError};
pub use model::{ParsedGame, SanMove, SanNode};
pub use parser::{parse, parse_all};
pub use replay::{replay_mainline, Replay, ReplayOutcome, ReplayStep};
pub use resolve::resolve;

use chess_engine::rules::Variant;
use chess_engine::Position;

/// The single entry point from raw PGN text to a replayed game.
///
/// Reads the `[Variant "..."]` tag to select a rule set (defaulting to
/// standard chess when absent), and the `[FEN "..."]`/`[SetUp "1"]` tags to
/// pick a non-standard starting position, then replays the parsed mainline.
pub struct Reader;

impl Reader {
    /// Parses `pgn` and replays its mainline from its starting position.
    pub fn full(pgn: &str) -> Result<Replay, ReaderError> {
        let game = parser::parse(pgn)?;

        let variant = match game.tag("Variant") {
            Some(key) => Variant::from_key(key)?,
            None => Variant::Standard,
        };
        let rules = variant.rules();

        let start = match (game.tag("SetUp"), game.tag("FEN")) {
            (Some("1"), Some(fen)) => Position::from_fen(fen)?,
            _ => rules.initial_position(),
        };

        Ok(replay::replay_mainline(rules, &start, &game.mainline))
    }
}
