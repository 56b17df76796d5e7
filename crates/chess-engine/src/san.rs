//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"
//!
//! The functions here take a [`RuleSet`] so they resolve correctly under
//! every variant: `Crazyhouse`'s pocket drops (`N@f3`), `Antichess`'s
//! promotion to king, and castling on Chess960's arbitrary rook files all
//! go through the same code path as standard chess, since they all
//! ultimately ask the rule set for its legal moves rather than assuming
//! standard chess's own movegen.

use crate::rules::{RuleSet, StandardChess};
use crate::Position;
use chess_core::{Drop, File, Move, MoveFlag, PlayedMove, Piece, Rank, Square};
use std::fmt;

/// Error type for SAN parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanError {
    /// The SAN string is empty.
    Empty,
    /// The SAN string has invalid format.
    InvalidFormat(String),
    /// No legal move matches the SAN.
    NoMatchingMove(String),
    /// Multiple legal moves match the SAN (ambiguous).
    AmbiguousMove(String),
    /// A drop was requested (e.g. `N@f3`) but the variant rejected it.
    IllegalDrop(String),
    /// A promotion suffix was present on a move that cannot promote, or
    /// missing/mismatched on a pawn move that lands on the last rank.
    WrongPromotion(String),
}

impl fmt::Display for SanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanError::Empty => write!(f, "empty SAN string"),
            SanError::InvalidFormat(s) => write!(f, "invalid SAN format: {}", s),
            SanError::NoMatchingMove(s) => write!(f, "no legal move matches: {}", s),
            SanError::AmbiguousMove(s) => write!(f, "ambiguous move: {}", s),
            SanError::IllegalDrop(s) => write!(f, "illegal drop: {}", s),
            SanError::WrongPromotion(s) => write!(f, "wrong promotion suffix: {}", s),
        }
    }
}

impl std::error::Error for SanError {}

/// Converts a move to SAN notation given the current position, under
/// standard chess rules.
///
/// The position must be the state BEFORE the move is made.
/// The move must be legal in the given position.
pub fn move_to_san(position: &Position, m: Move) -> String {
    move_to_san_for(&StandardChess, position, m)
}

/// Parses a SAN string and returns the corresponding legal move, under
/// standard chess rules.
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, SanError> {
    match resolve_san(&StandardChess, position, san)? {
        PlayedMove::Board(m) => Ok(m),
        PlayedMove::Drop(_) => unreachable!("standard chess has no pockets to drop from"),
    }
}

/// Converts a move to SAN notation under `rules`.
///
/// The position must be the state BEFORE the move is made.
/// The move must be legal in the given position under `rules`.
pub fn move_to_san_for(rules: &dyn RuleSet, position: &Position, m: Move) -> String {
    let mut san = String::new();

    if m.flag() == MoveFlag::CastleKingside {
        san.push_str("O-O");
        return add_check_suffix(rules, position, m, san);
    }
    if m.flag() == MoveFlag::CastleQueenside {
        san.push_str("O-O-O");
        return add_check_suffix(rules, position, m, san);
    }

    let from = m.from();
    let to = m.to();
    let (piece, _color) = position.piece_at(from).expect("move has no piece at from square");

    // Piece letter (except for pawns)
    if piece != Piece::Pawn {
        san.push(piece_to_san_char(piece));
    }

    // Disambiguation for non-pawn pieces
    if piece != Piece::Pawn {
        let disambig = get_disambiguation(rules, position, m, piece);
        san.push_str(&disambig);
    }

    // Capture indicator
    let is_capture = position.piece_at(to).is_some() || m.flag() == MoveFlag::EnPassant;
    if is_capture {
        if piece == Piece::Pawn {
            // Pawn captures include the source file
            san.push(file_to_char(from.file()));
        }
        san.push('x');
    }

    // Destination square
    san.push(file_to_char(to.file()));
    san.push(rank_to_char(to.rank()));

    // Promotion
    if m.flag().is_promotion() {
        san.push('=');
        san.push(piece_to_san_char(
            m.flag().promotion_piece().expect("promotion flag without piece"),
        ));
    }

    add_check_suffix(rules, position, m, san)
}

/// Converts a pocket drop to SAN notation (e.g. `N@f3`, `@e4` for a pawn).
pub fn drop_to_san(d: Drop) -> String {
    if d.role == Piece::Pawn {
        format!("@{}", d.to)
    } else {
        format!("{}@{}", piece_to_san_char(d.role), d.to)
    }
}

/// Parses a SAN string and resolves it to a board move or pocket drop under
/// `rules`.
pub fn resolve_san(
    rules: &dyn RuleSet,
    position: &Position,
    san: &str,
) -> Result<PlayedMove, SanError> {
    let san = san.trim();
    if san.is_empty() {
        return Err(SanError::Empty);
    }

    // Strip informal glyphs and the check/checkmate suffix before parsing.
    let san = san.trim_end_matches(['!', '?']);
    let san = san.trim_end_matches('#').trim_end_matches('+');

    if san == "O-O" || san == "0-0" {
        return find_castling_move(rules, position, true).map(PlayedMove::Board);
    }
    if san == "O-O-O" || san == "0-0-0" {
        return find_castling_move(rules, position, false).map(PlayedMove::Board);
    }

    if let Some(at_idx) = san.find('@') {
        let role_part = &san[..at_idx];
        let dest_part = &san[at_idx + 1..];
        let role = if role_part.is_empty() {
            Piece::Pawn
        } else {
            san_char_to_piece(role_part.chars().next().unwrap())
                .ok_or_else(|| SanError::InvalidFormat(san.to_string()))?
        };
        let dest = Square::from_algebraic(dest_part)
            .ok_or_else(|| SanError::InvalidFormat(san.to_string()))?;
        let d = rules
            .drop(position, role, dest)
            .map_err(|e| SanError::IllegalDrop(e.to_string()))?;
        return Ok(PlayedMove::Drop(d));
    }

    let parsed = parse_san_components(san)?;
    find_matching_move(rules, position, &parsed).map(PlayedMove::Board)
}

/// Parsed components of a SAN string.
#[derive(Debug)]
struct ParsedSan {
    piece: Piece,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to_square: Square,
    promotion: Option<Piece>,
    is_capture: bool,
}

fn parse_san_components(san: &str) -> Result<ParsedSan, SanError> {
    let chars: Vec<char> = san.chars().collect();
    if chars.is_empty() {
        return Err(SanError::Empty);
    }

    let mut idx = 0;

    // Determine piece type
    let piece = if chars[0].is_uppercase() && chars[0] != 'O' {
        let p = san_char_to_piece(chars[0]).ok_or_else(|| {
            SanError::InvalidFormat(format!("invalid piece character: {}", chars[0]))
        })?;
        idx += 1;
        p
    } else {
        Piece::Pawn
    };

    // Parse remaining characters to find disambiguation, capture, and destination
    let remaining: String = chars[idx..].iter().collect();

    // Remove 'x' if present and note capture
    let (remaining, is_capture) = if remaining.contains('x') {
        (remaining.replace('x', ""), true)
    } else {
        (remaining, false)
    };

    // Check for promotion
    let (remaining, promotion) = if remaining.contains('=') {
        let parts: Vec<&str> = remaining.split('=').collect();
        if parts.len() != 2 || parts[1].len() != 1 {
            return Err(SanError::InvalidFormat(format!(
                "invalid promotion: {}",
                san
            )));
        }
        let promo_piece = san_char_to_piece(parts[1].chars().next().unwrap()).ok_or_else(|| {
            SanError::InvalidFormat(format!("invalid promotion piece: {}", parts[1]))
        })?;
        (parts[0].to_string(), Some(promo_piece))
    } else {
        (remaining, None)
    };

    let chars: Vec<char> = remaining.chars().collect();

    // The last two characters should be the destination square
    if chars.len() < 2 {
        return Err(SanError::InvalidFormat(format!("too short: {}", san)));
    }

    let to_file = char_to_file(chars[chars.len() - 2])
        .ok_or_else(|| SanError::InvalidFormat(format!("invalid file: {}", san)))?;
    let to_rank = char_to_rank(chars[chars.len() - 1])
        .ok_or_else(|| SanError::InvalidFormat(format!("invalid rank: {}", san)))?;
    let to_square = Square::new(to_file, to_rank);

    // Any characters before the destination are disambiguation
    let disambig: String = chars[..chars.len() - 2].iter().collect();
    let (from_file, from_rank) = parse_disambiguation(&disambig)?;

    Ok(ParsedSan {
        piece,
        from_file,
        from_rank,
        to_square,
        promotion,
        is_capture,
    })
}

fn parse_disambiguation(s: &str) -> Result<(Option<File>, Option<Rank>), SanError> {
    let chars: Vec<char> = s.chars().collect();

    match chars.len() {
        0 => Ok((None, None)),
        1 => {
            if let Some(f) = char_to_file(chars[0]) {
                Ok((Some(f), None))
            } else if let Some(r) = char_to_rank(chars[0]) {
                Ok((None, Some(r)))
            } else {
                Err(SanError::InvalidFormat(format!(
                    "invalid disambiguation: {}",
                    s
                )))
            }
        }
        2 => {
            let file = char_to_file(chars[0]).ok_or_else(|| {
                SanError::InvalidFormat(format!("invalid disambiguation file: {}", s))
            })?;
            let rank = char_to_rank(chars[1]).ok_or_else(|| {
                SanError::InvalidFormat(format!("invalid disambiguation rank: {}", s))
            })?;
            Ok((Some(file), Some(rank)))
        }
        _ => Err(SanError::InvalidFormat(format!(
            "disambiguation too long: {}",
            s
        ))),
    }
}

fn find_castling_move(
    rules: &dyn RuleSet,
    position: &Position,
    kingside: bool,
) -> Result<Move, SanError> {
    let moves = rules.generate_moves(position);
    let flag = if kingside {
        MoveFlag::CastleKingside
    } else {
        MoveFlag::CastleQueenside
    };

    for m in moves.as_slice() {
        if m.flag() == flag {
            return Ok(*m);
        }
    }

    let name = if kingside { "O-O" } else { "O-O-O" };
    Err(SanError::NoMatchingMove(name.to_string()))
}

fn find_matching_move(
    rules: &dyn RuleSet,
    position: &Position,
    parsed: &ParsedSan,
) -> Result<Move, SanError> {
    let moves = rules.generate_moves(position);
    let mut matching: Vec<Move> = Vec::new();
    let mut same_origin_wrong_promotion = false;

    for m in moves.as_slice() {
        // Check destination
        if m.to() != parsed.to_square {
            continue;
        }

        // Check piece type
        if let Some((piece, _)) = position.piece_at(m.from()) {
            if piece != parsed.piece {
                continue;
            }
        } else {
            continue;
        }

        // Check disambiguation
        if let Some(file) = parsed.from_file {
            if m.from().file() != file {
                continue;
            }
        }
        if let Some(rank) = parsed.from_rank {
            if m.from().rank() != rank {
                continue;
            }
        }

        // Check promotion
        match parsed.promotion {
            Some(promo) => {
                if !m.flag().is_promotion() {
                    same_origin_wrong_promotion = true;
                    continue;
                }
                if m.flag().promotion_piece() != Some(promo) {
                    same_origin_wrong_promotion = true;
                    continue;
                }
            }
            None => {
                if m.flag().is_promotion() {
                    // A promotion-bound pawn move with no `=X` suffix: the
                    // move exists, but the SAN is missing a required
                    // disambiguator, not simply absent.
                    same_origin_wrong_promotion = true;
                    continue;
                }
            }
        }

        matching.push(*m);
    }

    match matching.len() {
        0 if same_origin_wrong_promotion => {
            Err(SanError::WrongPromotion(format!("{:?}", parsed)))
        }
        0 => Err(SanError::NoMatchingMove(format!("{:?}", parsed))),
        1 => Ok(matching[0]),
        _ => {
            // If multiple matches and it's a pawn move, try to be smarter
            // In case of multiple promotions, this shouldn't happen with proper SAN
            Err(SanError::AmbiguousMove(format!(
                "multiple moves match: {:?}",
                parsed
            )))
        }
    }
}

fn get_disambiguation(rules: &dyn RuleSet, position: &Position, m: Move, piece: Piece) -> String {
    let moves = rules.generate_moves(position);
    let to = m.to();
    let from = m.from();

    // Find all moves of the same piece type to the same square
    let mut same_dest: Vec<Move> = Vec::new();
    for other in moves.as_slice() {
        if other.to() != to {
            continue;
        }
        if let Some((p, _)) = position.piece_at(other.from()) {
            if p == piece {
                same_dest.push(*other);
            }
        }
    }

    // If only one move, no disambiguation needed
    if same_dest.len() <= 1 {
        return String::new();
    }

    // Check if file alone is sufficient
    let same_file: Vec<&Move> = same_dest
        .iter()
        .filter(|o| o.from().file() == from.file())
        .collect();
    if same_file.len() == 1 {
        return file_to_char(from.file()).to_string();
    }

    // Check if rank alone is sufficient
    let same_rank: Vec<&Move> = same_dest
        .iter()
        .filter(|o| o.from().rank() == from.rank())
        .collect();
    if same_rank.len() == 1 {
        return rank_to_char(from.rank()).to_string();
    }

    // Need both file and rank
    format!("{}{}", file_to_char(from.file()), rank_to_char(from.rank()))
}

fn add_check_suffix(rules: &dyn RuleSet, position: &Position, m: Move, mut san: String) -> String {
    let new_pos = rules.make_move(position, m);
    if rules.is_check(&new_pos) {
        if rules.generate_moves(&new_pos).is_empty() {
            san.push('#');
        } else {
            san.push('+');
        }
    }
    san
}

fn piece_to_san_char(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P', // Not typically used in SAN
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

fn san_char_to_piece(c: char) -> Option<Piece> {
    match c {
        'N' => Some(Piece::Knight),
        'B' => Some(Piece::Bishop),
        'R' => Some(Piece::Rook),
        'Q' => Some(Piece::Queen),
        'K' => Some(Piece::King),
        'P' => Some(Piece::Pawn),
        _ => None,
    }
}

fn file_to_char(file: File) -> char {
    (b'a' + file.index()) as char
}

fn rank_to_char(rank: Rank) -> char {
    (b'1' + rank.index()) as char
}

fn char_to_file(c: char) -> Option<File> {
    match c {
        'a' => Some(File::A),
        'b' => Some(File::B),
        'c' => Some(File::C),
        'd' => Some(File::D),
        'e' => Some(File::E),
        'f' => Some(File::F),
        'g' => Some(File::G),
        'h' => Some(File::H),
        _ => None,
    }
}

fn char_to_rank(c: char) -> Option<Rank> {
    match c {
        '1' => Some(Rank::R1),
        '2' => Some(Rank::R2),
        '3' => Some(Rank::R3),
        '4' => Some(Rank::R4),
        '5' => Some(Rank::R5),
        '6' => Some(Rank::R6),
        '7' => Some(Rank::R7),
        '8' => Some(Rank::R8),
        _ => None,
    }
}
