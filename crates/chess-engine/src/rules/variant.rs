//! Variant identity and lookup-by-key dispatch.

use super::{
    Antichess, Atomic, Chess960, Crazyhouse, Horde, KingOfTheHill, RacingKings, RuleSet,
    StandardChess, ThreeCheck,
};

/// Identifies one of the supported chess variants.
///
/// This is the "variant lookup by key" surface: external callers select a
/// variant by its [`Variant::key`] (e.g. from a PGN `[Variant "..."]` tag)
/// and get back the matching [`RuleSet`] implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Standard,
    Chess960,
    KingOfTheHill,
    ThreeCheck,
    Antichess,
    Atomic,
    Horde,
    RacingKings,
    Crazyhouse,
}

impl Variant {
    /// All supported variants, in a stable order.
    pub const ALL: [Variant; 9] = [
        Variant::Standard,
        Variant::Chess960,
        Variant::KingOfTheHill,
        Variant::ThreeCheck,
        Variant::Antichess,
        Variant::Atomic,
        Variant::Horde,
        Variant::RacingKings,
        Variant::Crazyhouse,
    ];

    /// The lowercase key used for lookup (matches lichess/PGN conventions).
    pub const fn key(self) -> &'static str {
        match self {
            Variant::Standard => "standard",
            Variant::Chess960 => "chess960",
            Variant::KingOfTheHill => "kingOfTheHill",
            Variant::ThreeCheck => "threeCheck",
            Variant::Antichess => "antichess",
            Variant::Atomic => "atomic",
            Variant::Horde => "horde",
            Variant::RacingKings => "racingKings",
            Variant::Crazyhouse => "crazyhouse",
        }
    }

    /// Looks up a variant by its key, case-insensitively.
    pub fn from_key(key: &str) -> Result<Variant, UnknownVariant> {
        Variant::ALL
            .into_iter()
            .find(|v| v.key().eq_ignore_ascii_case(key))
            .ok_or_else(|| UnknownVariant(key.to_string()))
    }

    /// Returns the rule set implementing this variant.
    pub fn rules(self) -> &'static dyn RuleSet {
        match self {
            Variant::Standard => &StandardChess,
            Variant::Chess960 => &Chess960,
            Variant::KingOfTheHill => &KingOfTheHill,
            Variant::ThreeCheck => &ThreeCheck,
            Variant::Antichess => &Antichess,
            Variant::Atomic => &Atomic,
            Variant::Horde => &Horde,
            Variant::RacingKings => &RacingKings,
            Variant::Crazyhouse => &Crazyhouse,
        }
    }
}

/// A variant key that did not match any known [`Variant`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant key: {0}")]
pub struct UnknownVariant(pub String);
