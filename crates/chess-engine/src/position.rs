//! Chess position representation.

use chess_core::{Color, FenError, FenParser, File, Piece, Rank, Square};

use crate::zobrist::ZOBRIST;
use crate::Bitboard;

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    /// Returns true if the given side can castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Returns true if the given side can castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        let flag = match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        };
        (self.0 & flag) != 0
    }

    /// Removes castling rights for a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        let mask = match color {
            Color::White => !(Self::WHITE_KINGSIDE | Self::WHITE_QUEENSIDE),
            Color::Black => !(Self::BLACK_KINGSIDE | Self::BLACK_QUEENSIDE),
        };
        self.0 &= mask;
    }

    /// Removes kingside castling for a color.
    #[inline]
    pub fn remove_kingside(&mut self, color: Color) {
        let mask = match color {
            Color::White => !Self::WHITE_KINGSIDE,
            Color::Black => !Self::BLACK_KINGSIDE,
        };
        self.0 &= mask;
    }

    /// Removes queenside castling for a color.
    #[inline]
    pub fn remove_queenside(&mut self, color: Color) {
        let mask = match color {
            Color::White => !Self::WHITE_QUEENSIDE,
            Color::Black => !Self::BLACK_QUEENSIDE,
        };
        self.0 &= mask;
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Complete chess position state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Bitboards for each piece type, indexed by Piece enum.
    pub pieces: [Bitboard; 6],

    /// Bitboards for each color's pieces.
    pub colors: [Bitboard; 2],

    /// The side to move.
    pub side_to_move: Color,

    /// Castling rights.
    pub castling: CastlingRights,

    /// Rook home squares that have not yet moved and still carry castling
    /// rights. Used instead of fixed A/H-file assumptions so that Chess960
    /// starting setups (arbitrary rook files) generate castling moves
    /// through the same code path as standard chess.
    pub unmoved_rooks: Bitboard,

    /// En passant target square (if any).
    pub en_passant: Option<Square>,

    /// Halfmove clock for 50-move rule.
    pub halfmove_clock: u32,

    /// Fullmove number (starts at 1, increments after Black's move).
    pub fullmove_number: u32,

    /// Number of times each color has delivered check, indexed by
    /// [`Color::index`]. Only meaningful under the Three-Check variant;
    /// every other rule set leaves this at `[0, 0]`. Not part of standard
    /// FEN (Three-Check's "+n+n" suffix is a notation extension the base
    /// FEN parser does not implement), so it does not round-trip through
    /// `to_fen`/`from_fen` — callers that need persistence track it
    /// alongside the position themselves.
    pub checks: [u8; 2],

    /// Pocketed (captured, awaiting re-drop) pieces per color. Indexed by
    /// [`Color::index`] then by a promotable-role index (0=Pawn, 1=Knight,
    /// 2=Bishop, 3=Rook, 4=Queen — kings are never pocketed). Only
    /// meaningful under Crazyhouse; every other rule set leaves this at
    /// `[[0; 5]; 2]`. Not part of standard FEN.
    pub pockets: [[u8; 5]; 2],

    /// Squares holding a piece that reached its current role through pawn
    /// promotion. Under Crazyhouse a captured promoted piece reverts to a
    /// pocketed pawn rather than its on-board role; every other rule set
    /// never reads this field.
    pub promoted: Bitboard,
}

impl Position {
    /// Creates an empty position.
    pub fn empty() -> Self {
        Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            unmoved_rooks: Bitboard::EMPTY,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            checks: [0, 0],
            pockets: [[0; 5]; 2],
            promoted: Bitboard::EMPTY,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(FenParser::STARTPOS).expect("STARTPOS is valid")
    }

    /// Creates a position from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        let mut position = Position::empty();

        // Parse piece placement
        let ranks: Vec<&str> = parsed.piece_placement.split('/').collect();
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx; // FEN starts from rank 8
            let mut file = 0usize;

            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    file += digit as usize;
                } else if let Some((piece, color)) = Piece::from_fen_char(c) {
                    let sq = unsafe { Square::from_index_unchecked((rank * 8 + file) as u8) };
                    position.pieces[piece.index()].set(sq);
                    position.colors[color.index()].set(sq);
                    file += 1;
                }
            }
        }

        // Active color
        position.side_to_move = match parsed.active_color {
            'w' => Color::White,
            'b' => Color::Black,
            _ => unreachable!("FEN parser validated this"),
        };

        // Castling rights. Accepts both standard KQkq notation and
        // Chess960/Shredder-FEN file-letter notation (e.g. "HAha").
        let mut castling = 0u8;
        let mut unmoved_rooks = Bitboard::EMPTY;
        for c in parsed.castling.chars() {
            match c {
                'K' => {
                    castling |= CastlingRights::WHITE_KINGSIDE;
                    unmoved_rooks.set(Square::H1);
                }
                'Q' => {
                    castling |= CastlingRights::WHITE_QUEENSIDE;
                    unmoved_rooks.set(Square::A1);
                }
                'k' => {
                    castling |= CastlingRights::BLACK_KINGSIDE;
                    unmoved_rooks.set(Square::new(File::H, Rank::R8));
                }
                'q' => {
                    castling |= CastlingRights::BLACK_QUEENSIDE;
                    unmoved_rooks.set(Square::new(File::A, Rank::R8));
                }
                '-' => {}
                file_char if file_char.is_ascii_uppercase() => {
                    if let Some(file) = File::from_char(file_char.to_ascii_lowercase()) {
                        let king_file = position
                            .pieces_of(Piece::King, Color::White)
                            .lsb()
                            .and_then(|idx| File::from_index(idx % 8))
                            .unwrap_or(File::E);
                        if file.index() > king_file.index() {
                            castling |= CastlingRights::WHITE_KINGSIDE;
                        } else {
                            castling |= CastlingRights::WHITE_QUEENSIDE;
                        }
                        unmoved_rooks.set(Square::new(file, Rank::R1));
                    }
                }
                file_char if file_char.is_ascii_lowercase() => {
                    if let Some(file) = File::from_char(file_char) {
                        let king_file = position
                            .pieces_of(Piece::King, Color::Black)
                            .lsb()
                            .and_then(|idx| File::from_index(idx % 8))
                            .unwrap_or(File::E);
                        if file.index() > king_file.index() {
                            castling |= CastlingRights::BLACK_KINGSIDE;
                        } else {
                            castling |= CastlingRights::BLACK_QUEENSIDE;
                        }
                        unmoved_rooks.set(Square::new(file, Rank::R8));
                    }
                }
                _ => {}
            }
        }
        position.castling = CastlingRights::new(castling);
        position.unmoved_rooks = unmoved_rooks;

        // En passant
        position.en_passant = if parsed.en_passant == "-" {
            None
        } else {
            Square::from_algebraic(&parsed.en_passant)
        };

        position.halfmove_clock = parsed.halfmove_clock;
        position.fullmove_number = parsed.fullmove_number;

        Ok(position)
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        // Piece placement
        for rank in (0..8).rev() {
            let mut empty_count = 0;
            for file in 0..8 {
                let sq = unsafe { Square::from_index_unchecked(rank * 8 + file) };
                if let Some((piece, color)) = self.piece_at(sq) {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    fen.push(piece.to_fen_char(color));
                } else {
                    empty_count += 1;
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        // Active color
        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        // Castling. Emits standard KQkq letters when the unmoved rook sits
        // on its standard corner (H/A file), and falls back to Shredder-FEN
        // file letters otherwise, so a Chess960 setup with rooks away from
        // the corners round-trips through `unmoved_rooks` instead of being
        // silently reinterpreted as standard corners on the next `from_fen`.
        fen.push(' ');
        if self.castling.raw() == 0 {
            fen.push('-');
        } else {
            if self.castling.can_castle_kingside(Color::White) {
                fen.push(self.castling_char(Color::White, true, 'K'));
            }
            if self.castling.can_castle_queenside(Color::White) {
                fen.push(self.castling_char(Color::White, false, 'Q'));
            }
            if self.castling.can_castle_kingside(Color::Black) {
                fen.push(self.castling_char(Color::Black, true, 'k'));
            }
            if self.castling.can_castle_queenside(Color::Black) {
                fen.push(self.castling_char(Color::Black, false, 'q'));
            }
        }

        // En passant
        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        // Halfmove clock and fullmove number
        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }

    /// Returns the castling-field character for one granted right: the
    /// standard letter if the unmoved rook backing it sits on its usual
    /// corner (H1/A1/H8/A8), otherwise the Shredder-FEN file letter of
    /// wherever that rook actually is.
    fn castling_char(&self, color: Color, kingside: bool, standard: char) -> char {
        let back_rank = match color {
            Color::White => Bitboard::RANK_1,
            Color::Black => Bitboard::RANK_8,
        };
        let king_file = self
            .pieces_of(Piece::King, color)
            .lsb()
            .and_then(|idx| File::from_index(idx % 8))
            .unwrap_or(File::E);

        let rook_file = (self.unmoved_rooks & back_rank)
            .into_iter()
            .find(|sq| kingside == (sq.file().index() > king_file.index()))
            .map(|sq| sq.file());

        match rook_file {
            Some(file) => {
                let standard_file = if kingside { File::H } else { File::A };
                if file == standard_file {
                    standard
                } else {
                    let c = file.to_char();
                    if color == Color::White {
                        c.to_ascii_uppercase()
                    } else {
                        c
                    }
                }
            }
            None => standard,
        }
    }

    /// Returns the piece and color at the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        let bb = Bitboard::from_square(sq);

        // Check if any piece is on this square
        let color = if (self.colors[Color::White.index()] & bb).is_not_empty() {
            Color::White
        } else if (self.colors[Color::Black.index()] & bb).is_not_empty() {
            Color::Black
        } else {
            return None;
        };

        // Find which piece type
        for piece in Piece::ALL {
            if (self.pieces[piece.index()] & bb).is_not_empty() {
                return Some((piece, color));
            }
        }

        None
    }

    /// Returns a bitboard of all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    /// Returns a bitboard of all empty squares.
    #[inline]
    pub fn empty_squares(&self) -> Bitboard {
        !self.occupied()
    }

    /// Returns a bitboard of pieces of the given type and color.
    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    /// Computes the Zobrist hash of this position.
    ///
    /// Used for repetition detection; two positions with the same hash are
    /// treated as identical by [`crate::Game`]. Recomputed from scratch
    /// rather than updated incrementally, since the engine does not keep a
    /// running hash on [`Position`] itself.
    pub fn zobrist_hash(&self) -> u64 {
        let mut hash = 0u64;

        for piece in Piece::ALL {
            for color in [Color::White, Color::Black] {
                for sq in self.pieces_of(piece, color) {
                    hash ^= ZOBRIST.piece_key(piece, color, sq);
                }
            }
        }

        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.black_to_move;
        }

        if self.castling.can_castle_kingside(Color::White) {
            hash ^= ZOBRIST.castling_key(0);
        }
        if self.castling.can_castle_queenside(Color::White) {
            hash ^= ZOBRIST.castling_key(1);
        }
        if self.castling.can_castle_kingside(Color::Black) {
            hash ^= ZOBRIST.castling_key(2);
        }
        if self.castling.can_castle_queenside(Color::Black) {
            hash ^= ZOBRIST.castling_key(3);
        }

        if let Some(ep) = self.en_passant {
            hash ^= ZOBRIST.en_passant_key(ep.file().index() as usize);
        }

        hash
    }

    /// Checks the board invariants a position is expected to uphold.
    ///
    /// `strict` additionally rejects positions with more than one king per
    /// side or pawns on the back ranks, which can occur transiently in
    /// variant setups (e.g. Crazyhouse promotion bookkeeping) but must never
    /// reach [`crate::rules::RuleSet::generate_moves`].
    pub fn validate(&self, strict: bool) -> Result<(), PositionError> {
        let mut seen = Bitboard::EMPTY;
        for piece in Piece::ALL {
            let bb = self.pieces[piece.index()];
            if (bb & seen).is_not_empty() {
                return Err(PositionError::OverlappingRoles);
            }
            seen |= bb;
        }

        let all_roles = Piece::ALL
            .iter()
            .fold(Bitboard::EMPTY, |acc, p| acc | self.pieces[p.index()]);
        if all_roles != self.occupied() {
            return Err(PositionError::RoleColorMismatch);
        }
        if (self.colors[0] & self.colors[1]).is_not_empty() {
            return Err(PositionError::RoleColorMismatch);
        }

        if strict {
            for color in [Color::White, Color::Black] {
                if self.pieces_of(Piece::King, color).count() != 1 {
                    return Err(PositionError::WrongKingCount(color));
                }
            }
            let pawns = self.pieces[Piece::Pawn.index()];
            if (pawns & (Bitboard::RANK_1 | Bitboard::RANK_8)).is_not_empty() {
                return Err(PositionError::PawnOnBackRank);
            }
        }

        Ok(())
    }
}

/// Violations of the board invariants checked by [`Position::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("two piece types occupy the same square")]
    OverlappingRoles,
    #[error("color bitboards and role bitboards disagree on occupancy")]
    RoleColorMismatch,
    #[error("{0:?} does not have exactly one king")]
    WrongKingCount(Color),
    #[error("a pawn occupies the first or last rank")]
    PawnOnBackRank,
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
