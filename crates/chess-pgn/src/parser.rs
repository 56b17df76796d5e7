//! Handwritten recursive-descent PGN tokenizer and parser.
//!
//! No parser-generator crate is used, the same way the engine's `FenParser`
//! hand-splits FEN on whitespace and `/` rather than reaching for a grammar
//! library.

use crate::error::PgnError;
use crate::model::{ParsedGame, SanMove, SanNode};
use chess_core::{File, Piece, Rank, Square};

/// Parses a single PGN game (tag pairs, movetext, and result) from `input`.
pub fn parse(input: &str) -> Result<ParsedGame, PgnError> {
    let mut p = Parser::new(input);
    p.parse_game()
}

/// Parses every game found back to back in `input` (a multi-game PGN file).
pub fn parse_all(input: &str) -> Result<Vec<ParsedGame>, PgnError> {
    let mut p = Parser::new(input);
    let mut games = Vec::new();
    loop {
        p.skip_ws_and_comments();
        if p.at_end() {
            break;
        }
        games.push(p.parse_game()?);
    }
    Ok(games)
}

const RESULT_MARKERS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];
const GLYPHS: [&str; 6] = ["!!", "??", "!?", "?!", "!", "?"];

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        let input = input.strip_prefix('\u{feff}').unwrap_or(input);
        Parser {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn skip_ws_and_comments(&mut self) {
        loop {
            self.skip_ws();
            match self.peek() {
                Some('{') => {
                    let _ = self.parse_brace_comment();
                }
                Some(';') => self.skip_line_comment(),
                _ => break,
            }
        }
    }

    fn parse_game(&mut self) -> Result<ParsedGame, PgnError> {
        let mut game = ParsedGame::default();
        self.parse_tag_pairs(&mut game)?;

        loop {
            self.skip_ws();
            match self.peek() {
                Some('{') => game.leading_comments.push(self.parse_brace_comment()?),
                Some(';') => self.skip_line_comment(),
                _ => break,
            }
        }

        self.parse_movetext(&mut game.mainline, &mut game.result)?;
        Ok(game)
    }

    fn parse_tag_pairs(&mut self, game: &mut ParsedGame) -> Result<(), PgnError> {
        loop {
            self.skip_ws();
            if self.peek() != Some('[') {
                break;
            }
            self.advance();
            self.skip_ws();
            let name = self.parse_symbol()?;
            self.skip_ws();
            if self.peek() != Some('"') {
                return Err(self.unexpected("an opening '\"'"));
            }
            let value = self.parse_quoted_string()?;
            self.skip_ws();
            if self.peek() != Some(']') {
                return Err(self.unexpected("a closing ']'"));
            }
            self.advance();
            game.tags.push((name, value));
        }
        Ok(())
    }

    fn parse_symbol(&mut self) -> Result<String, PgnError> {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                s.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        if s.is_empty() {
            return Err(self.unexpected("a tag name"));
        }
        Ok(s)
    }

    fn parse_quoted_string(&mut self) -> Result<String, PgnError> {
        self.advance(); // opening quote
        let mut s = String::new();
        loop {
            match self.advance() {
                Some('"') => return Ok(s),
                Some('\\') => match self.advance() {
                    Some(c) => s.push(c),
                    None => return Err(PgnError::IncompletePgn("tag value")),
                },
                Some(c) => s.push(c),
                None => return Err(PgnError::IncompletePgn("tag value")),
            }
        }
    }

    fn parse_brace_comment(&mut self) -> Result<String, PgnError> {
        self.advance(); // opening brace
        let mut s = String::new();
        loop {
            match self.advance() {
                Some('}') => return Ok(s.trim().to_string()),
                Some(c) => s.push(c),
                None => return Err(PgnError::IncompletePgn("comment")),
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.advance() {
            if c == '\n' {
                break;
            }
        }
    }

    /// Parses a sequence of plies (a mainline or one variation's contents),
    /// stopping at an unmatched `)`, a result token, or end of input.
    fn parse_movetext(
        &mut self,
        nodes: &mut Vec<SanNode>,
        result: &mut Option<String>,
    ) -> Result<(), PgnError> {
        let mut pending_comments: Vec<String> = Vec::new();

        loop {
            self.skip_ws();
            let Some(c) = self.peek() else { break };

            match c {
                '{' => {
                    let comment = self.parse_brace_comment()?;
                    match nodes.last_mut() {
                        Some(n) => n.comments.push(comment),
                        None => pending_comments.push(comment),
                    }
                }
                ';' => self.skip_line_comment(),
                '(' => {
                    self.advance();
                    if nodes.is_empty() {
                        return Err(PgnError::DanglingVariation);
                    }
                    let mut variation = Vec::new();
                    let mut sub_result = None;
                    self.parse_movetext(&mut variation, &mut sub_result)?;
                    if self.peek() != Some(')') {
                        return Err(PgnError::IncompletePgn("variation"));
                    }
                    self.advance();
                    nodes
                        .last_mut()
                        .expect("checked non-empty above")
                        .variations
                        .push(variation);
                }
                ')' => break,
                _ => {
                    if let Some(r) = self.try_parse_result() {
                        *result = Some(r);
                        break;
                    }
                    if self.skip_move_number() {
                        continue;
                    }
                    if let Some(nag) = self.try_parse_nag() {
                        if let Some(n) = nodes.last_mut() {
                            n.nags.push(nag);
                        }
                        continue;
                    }
                    let token = self.read_token()?;
                    let mut node = parse_san_token(&token)?;
                    node.comments.extend(pending_comments.drain(..));
                    nodes.push(node);
                }
            }
        }
        Ok(())
    }

    fn try_parse_result(&mut self) -> Option<String> {
        for marker in RESULT_MARKERS {
            if self.matches_literal(marker) {
                self.pos += marker.chars().count();
                return Some(marker.to_string());
            }
        }
        None
    }

    fn matches_literal(&self, lit: &str) -> bool {
        let lit_chars: Vec<char> = lit.chars().collect();
        if self.pos + lit_chars.len() > self.chars.len() {
            return false;
        }
        if self.chars[self.pos..self.pos + lit_chars.len()] != lit_chars[..] {
            return false;
        }
        let next = self.chars.get(self.pos + lit_chars.len());
        next.map_or(true, |c| c.is_whitespace() || *c == ')')
    }

    /// Consumes a move-number token like `1.` or `12...`, returning whether
    /// one was found.
    fn skip_move_number(&mut self) -> bool {
        let start = self.pos;
        if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
            return false;
        }
        let mut i = self.pos;
        while i < self.chars.len() && self.chars[i].is_ascii_digit() {
            i += 1;
        }
        if i < self.chars.len() && self.chars[i] == '.' {
            while i < self.chars.len() && self.chars[i] == '.' {
                i += 1;
            }
            self.pos = i;
            return true;
        }
        self.pos = start;
        false
    }

    fn try_parse_nag(&mut self) -> Option<String> {
        if self.peek() != Some('$') {
            return None;
        }
        let start = self.pos;
        self.pos += 1;
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        if digits.is_empty() {
            self.pos = start;
            return None;
        }
        Some(format!("${digits}"))
    }

    fn read_token(&mut self) -> Result<String, PgnError> {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '{' | '(' | ')' | ';') {
                break;
            }
            s.push(c);
            self.pos += 1;
        }
        if s.is_empty() {
            return Err(self.unexpected("a move, comment, or variation"));
        }
        Ok(s)
    }

    fn unexpected(&self, expected: &str) -> PgnError {
        match self.peek() {
            Some(c) => PgnError::UnexpectedChar {
                offset: self.pos,
                found: c,
                expected: expected.to_string(),
            },
            None => PgnError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }
}

fn parse_san_token(raw: &str) -> Result<SanNode, PgnError> {
    let mut text = raw;
    let mut glyphs: Vec<String> = Vec::new();
    loop {
        let matched = GLYPHS.iter().find(|g| text.ends_with(*g));
        match matched {
            Some(g) => {
                text = &text[..text.len() - g.len()];
                glyphs.push((*g).to_string());
            }
            None => break,
        }
    }
    glyphs.reverse();

    let mut checkmate = false;
    let mut check = false;
    let core = if let Some(stripped) = text.strip_suffix('#') {
        checkmate = true;
        stripped
    } else if let Some(stripped) = text.strip_suffix('+') {
        check = true;
        stripped
    } else {
        text
    };

    if core.is_empty() {
        return Err(PgnError::MalformedMove(raw.to_string()));
    }

    let san = parse_san_move(core)?;

    Ok(SanNode {
        san: Some(san),
        check,
        checkmate,
        nags: glyphs,
        comments: Vec::new(),
        variations: Vec::new(),
    })
}

fn parse_san_move(core: &str) -> Result<SanMove, PgnError> {
    let normalized = core.replace('0', "O");
    if normalized == "O-O-O" {
        return Ok(SanMove::Castle { kingside: false });
    }
    if normalized == "O-O" {
        return Ok(SanMove::Castle { kingside: true });
    }

    if let Some(at_idx) = core.find('@') {
        let role_part = &core[..at_idx];
        let dest_part = &core[at_idx + 1..];
        let role = if role_part.is_empty() {
            Piece::Pawn
        } else {
            piece_from_char(role_part.chars().next().unwrap())
                .ok_or_else(|| PgnError::MalformedMove(core.to_string()))?
        };
        let dest = Square::from_algebraic(dest_part)
            .ok_or_else(|| PgnError::MalformedMove(core.to_string()))?;
        return Ok(SanMove::Drop { role, dest });
    }

    let (body, promotion) = if let Some(eq_idx) = core.find('=') {
        let promo_str = &core[eq_idx + 1..];
        let piece = promo_str
            .chars()
            .next()
            .and_then(piece_from_char)
            .ok_or_else(|| PgnError::MalformedMove(core.to_string()))?;
        (&core[..eq_idx], Some(piece))
    } else {
        (core, None)
    };

    let chars: Vec<char> = body.chars().collect();
    if chars.is_empty() {
        return Err(PgnError::MalformedMove(core.to_string()));
    }

    let mut idx = 0;
    let piece = if chars[0].is_ascii_uppercase() {
        let p = piece_from_char(chars[0]).ok_or_else(|| PgnError::MalformedMove(core.to_string()))?;
        idx += 1;
        p
    } else {
        Piece::Pawn
    };

    let mut rest: Vec<char> = chars[idx..].to_vec();
    let capture = if let Some(pos) = rest.iter().position(|&c| c == 'x') {
        rest.remove(pos);
        true
    } else {
        false
    };

    if rest.len() < 2 {
        return Err(PgnError::MalformedMove(core.to_string()));
    }
    let dest_rank = rest
        .pop()
        .and_then(Rank::from_char)
        .ok_or_else(|| PgnError::MalformedMove(core.to_string()))?;
    let dest_file = rest
        .pop()
        .and_then(File::from_char)
        .ok_or_else(|| PgnError::MalformedMove(core.to_string()))?;
    let dest = Square::new(dest_file, dest_rank);

    let (disambig_file, disambig_rank) = match rest.len() {
        0 => (None, None),
        1 => {
            if let Some(f) = File::from_char(rest[0]) {
                (Some(f), None)
            } else if let Some(r) = Rank::from_char(rest[0]) {
                (None, Some(r))
            } else {
                return Err(PgnError::MalformedMove(core.to_string()));
            }
        }
        2 => {
            let f = File::from_char(rest[0])
                .ok_or_else(|| PgnError::MalformedMove(core.to_string()))?;
            let r = Rank::from_char(rest[1])
                .ok_or_else(|| PgnError::MalformedMove(core.to_string()))?;
            (Some(f), Some(r))
        }
        _ => return Err(PgnError::MalformedMove(core.to_string())),
    };

    Ok(SanMove::Piece {
        piece,
        disambig_file,
        disambig_rank,
        capture,
        dest,
        promotion,
    })
}

fn piece_from_char(c: char) -> Option<Piece> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{File, Rank};

    #[test]
    fn parses_tag_pairs() {
        let game = parse("[Event \"Test\"]\n[Site \"?\"]\n\n1. e4 e5 *").unwrap();
        assert_eq!(game.tag("Event"), Some("Test"));
        assert_eq!(game.tag("Site"), Some("?"));
    }

    #[test]
    fn strips_leading_bom() {
        let game = parse("\u{feff}[Event \"Test\"]\n\n1. e4 e5 *").unwrap();
        assert_eq!(game.tag("Event"), Some("Test"));
    }

    #[test]
    fn tolerates_crlf_line_endings() {
        let game = parse("[Event \"Test\"]\r\n[Site \"?\"]\r\n\r\n1. e4 e5 *").unwrap();
        assert_eq!(game.tag("Event"), Some("Test"));
        assert_eq!(game.mainline.len(), 2);
    }

    #[test]
    fn unterminated_comment_reports_incomplete_pgn() {
        let err = parse("1. e4 {this comment never closes").unwrap_err();
        assert_eq!(err, PgnError::IncompletePgn("comment"));
    }

    #[test]
    fn parses_simple_mainline() {
        let game = parse("1. e4 e5 2. Nf3 Nc6 *").unwrap();
        assert_eq!(game.mainline.len(), 4);
        assert_eq!(
            game.mainline[0].san,
            Some(SanMove::Piece {
                piece: Piece::Pawn,
                disambig_file: None,
                disambig_rank: None,
                capture: false,
                dest: Square::new(File::E, Rank::R4),
                promotion: None,
            })
        );
        assert_eq!(game.result, Some("*".to_string()));
    }

    #[test]
    fn parses_castling_and_check_suffix() {
        let game = parse("1. e4 e5 2. Nf3 Nc6 3. Bb5 a6 4. O-O Nf6+ *").unwrap();
        let castle = &game.mainline[6];
        assert_eq!(castle.san, Some(SanMove::Castle { kingside: true }));
        let check_move = &game.mainline[7];
        assert!(check_move.check);
    }

    #[test]
    fn parses_drop_moves() {
        let game = parse("1. e4 e5 2. N@f3 *").unwrap();
        assert_eq!(
            game.mainline[2].san,
            Some(SanMove::Drop {
                role: Piece::Knight,
                dest: Square::new(File::F, Rank::R3),
            })
        );
    }

    #[test]
    fn parses_comments_and_nags() {
        let game = parse("1. e4 {best by test} e5 $1 2. Nf3 *").unwrap();
        assert_eq!(game.mainline[0].comments, vec!["best by test".to_string()]);
        assert_eq!(game.mainline[1].nags, vec!["$1".to_string()]);
    }

    #[test]
    fn parses_glyph_suffix_attached_to_move() {
        let game = parse("1. e4! e5?! *").unwrap();
        assert_eq!(game.mainline[0].nags, vec!["!".to_string()]);
        assert_eq!(game.mainline[1].nags, vec!["?!".to_string()]);
    }

    #[test]
    fn parses_variations() {
        let game = parse("1. e4 e5 (1... c5 2. Nf3) 2. Nf3 *").unwrap();
        assert_eq!(game.mainline.len(), 4);
        let variations = &game.mainline[1].variations;
        assert_eq!(variations.len(), 1);
        assert_eq!(variations[0].len(), 2);
    }

    #[test]
    fn dangling_variation_is_an_error() {
        assert_eq!(parse("(1. e4) *"), Err(PgnError::DanglingVariation));
    }

    #[test]
    fn promotion_is_parsed() {
        let game = parse("1. e4 e5 2. a8=Q *").unwrap();
        assert_eq!(
            game.mainline[2].san,
            Some(SanMove::Piece {
                piece: Piece::Pawn,
                disambig_file: None,
                disambig_rank: None,
                capture: false,
                dest: Square::new(File::A, Rank::R8),
                promotion: Some(Piece::Queen),
            })
        );
    }

    #[test]
    fn parses_multiple_games() {
        let games = parse_all("1. e4 e5 1-0\n\n1. d4 d5 0-1").unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].result, Some("1-0".to_string()));
        assert_eq!(games[1].result, Some("0-1".to_string()));
    }
}
