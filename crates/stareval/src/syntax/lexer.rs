use crate::error::{ErrorCode, LexError};
use crate::syntax::options::ParserOptions;
use crate::syntax::token::{Token, TokenKind};

pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    options: &'a ParserOptions,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, options: &'a ParserOptions) -> Self {
        Self { source: source.as_bytes(), pos: 0, options }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens: Vec<Token> = Vec::new();

        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            // `-` and `!` are unary, and `-` may start a number, only where an
            // operand is expected.
            let operand_position = tokens.last().is_none_or(|t| !t.kind.ends_operand());
            let tok = self.next_token(operand_position)?;
            tokens.push(tok);
        }

        Ok(tokens)
    }

    fn next_token(&mut self, operand_position: bool) -> Result<Token, LexError> {
        let start = self.pos;
        let ch = self.peek();

        let kind = match ch {
            b'(' => { self.advance(); TokenKind::LParen }
            b')' => { self.advance(); TokenKind::RParen }
            b'[' => { self.advance(); TokenKind::LBracket }
            b']' => { self.advance(); TokenKind::RBracket }
            b',' => { self.advance(); TokenKind::Comma }

            b'0'..=b'9' => TokenKind::Number(self.read_number(start)?),
            b'.' if operand_position && self.peek_next().is_ascii_digit() => {
                TokenKind::Number(self.read_number(start)?)
            }
            b'.' => { self.advance(); TokenKind::Dot }

            b'-' if operand_position
                && (self.peek_next().is_ascii_digit()
                    || (self.peek_next() == b'.' && self.peek_at(2).is_ascii_digit())) =>
            {
                TokenKind::Number(self.read_number(start)?)
            }

            b'a'..=b'z' | b'A'..=b'Z' | b'_' => TokenKind::Id(self.read_ident()),

            _ => self.read_operator(start, operand_position)?,
        };

        Ok(Token::new(kind, start))
    }

    // ─── Primitives ──────────────────────────────────────────────────────────

    fn advance(&mut self) -> u8 {
        let ch = self.source[self.pos];
        self.pos += 1;
        ch
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_next(&self) -> u8 {
        self.peek_at(1)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.peek().is_ascii_whitespace() {
            self.advance();
        }
    }

    // ─── Readers ─────────────────────────────────────────────────────────────

    /// The operator form the position calls for wins; the other form is still
    /// emitted so that a misplaced operator surfaces as a parse error.
    fn read_operator(&mut self, start: usize, operand_position: bool) -> Result<TokenKind, LexError> {
        let rest = &self.source[self.pos..];
        let unary = || self.options.match_unary(rest).map(|def| (def.symbol.len(), TokenKind::UnaryOp(def.op)));
        let binary = || self.options.match_binary(rest).map(|def| (def.symbol.len(), TokenKind::BinaryOp(def.op)));
        let matched = if operand_position { unary().or_else(binary) } else { binary().or_else(unary) };
        let Some((len, kind)) = matched else {
            return Err(self.unexpected(start));
        };
        self.pos += len;
        Ok(kind)
    }

    fn unexpected(&self, start: usize) -> LexError {
        let ch = self.source[start..]
            .utf8_chunks()
            .next()
            .and_then(|c| c.valid().chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        LexError::new(ErrorCode::L001, start, format!("unexpected character `{ch}`"))
    }

    /// Reads `-?digits(.digits?)?[fF]?` or `-?.digits[fF]?`.
    fn read_number(&mut self, start: usize) -> Result<String, LexError> {
        if self.peek() == b'-' {
            self.advance();
        }
        let mut digits = 0;
        while self.peek().is_ascii_digit() {
            self.advance();
            digits += 1;
        }
        if self.peek() == b'.' && (digits > 0 || self.peek_next().is_ascii_digit()) {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
                digits += 1;
            }
        }
        if matches!(self.peek(), b'f' | b'F') {
            self.advance();
        }

        // glued trailing characters make the whole literal malformed
        let next = self.peek();
        if digits == 0 || next == b'.' || next.is_ascii_alphanumeric() || next == b'_' {
            while self.peek() == b'.' || self.peek().is_ascii_alphanumeric() || self.peek() == b'_' {
                self.advance();
            }
            let text = String::from_utf8_lossy(&self.source[start..self.pos]);
            return Err(LexError::new(ErrorCode::L002, start, format!("malformed number `{text}`")));
        }

        Ok(String::from_utf8_lossy(&self.source[start..self.pos]).into_owned())
    }

    fn read_ident(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_ascii_alphanumeric() || self.peek() == b'_' {
            self.advance();
        }
        String::from_utf8_lossy(&self.source[start..self.pos]).into_owned()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::token::{BinaryOp, UnaryOp};

    fn lex(src: &str) -> Vec<TokenKind> {
        let options = ParserOptions::default();
        Lexer::new(src, &options).tokenize().unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn lex_err(src: &str) -> LexError {
        let options = ParserOptions::default();
        Lexer::new(src, &options).tokenize().unwrap_err()
    }

    fn id(s: &str) -> TokenKind { TokenKind::Id(s.into()) }
    fn num(s: &str) -> TokenKind { TokenKind::Number(s.into()) }

    #[test]
    fn empty() {
        assert_eq!(lex(""), vec![]);
        assert_eq!(lex("   \t "), vec![]);
    }

    #[test]
    fn integer_and_float_literals() {
        assert_eq!(lex("42"), vec![num("42")]);
        assert_eq!(lex("3.14"), vec![num("3.14")]);
        assert_eq!(lex(".5"), vec![num(".5")]);
        assert_eq!(lex("1."), vec![num("1.")]);
        assert_eq!(lex("2f"), vec![num("2f")]);
        assert_eq!(lex("2.5F"), vec![num("2.5F")]);
    }

    #[test]
    fn leading_minus_in_operand_position() {
        assert_eq!(lex("-3"), vec![num("-3")]);
        assert_eq!(lex("2 * -3"), vec![num("2"), TokenKind::BinaryOp(BinaryOp::Mul), num("-3")]);
        assert_eq!(lex("(-.5)"), vec![TokenKind::LParen, num("-.5"), TokenKind::RParen]);
    }

    #[test]
    fn minus_after_operand_is_binary() {
        assert_eq!(
            lex("10 - 3 -2"),
            vec![
                num("10"),
                TokenKind::BinaryOp(BinaryOp::Sub),
                num("3"),
                TokenKind::BinaryOp(BinaryOp::Sub),
                num("2"),
            ]
        );
    }

    #[test]
    fn unary_operators() {
        assert_eq!(lex("-x"), vec![TokenKind::UnaryOp(UnaryOp::Neg), id("x")]);
        assert_eq!(lex("!a"), vec![TokenKind::UnaryOp(UnaryOp::Not), id("a")]);
        // a detached minus stays an operator
        assert_eq!(lex("- 1"), vec![TokenKind::UnaryOp(UnaryOp::Neg), num("1")]);
    }

    #[test]
    fn two_char_operators_match_longest() {
        assert_eq!(lex("a <= b")[1], TokenKind::BinaryOp(BinaryOp::LtEq));
        assert_eq!(lex("a != b")[1], TokenKind::BinaryOp(BinaryOp::NotEq));
        assert_eq!(lex("a && b")[1], TokenKind::BinaryOp(BinaryOp::And));
        assert_eq!(lex("a || b")[1], TokenKind::BinaryOp(BinaryOp::Or));
        assert_eq!(lex("a < b")[1], TokenKind::BinaryOp(BinaryOp::Lt));
    }

    #[test]
    fn identifiers() {
        assert_eq!(lex("worldTime"), vec![id("worldTime")]);
        assert_eq!(lex("_a1_b2"), vec![id("_a1_b2")]);
    }

    #[test]
    fn member_access_dot() {
        assert_eq!(lex("pos.x"), vec![id("pos"), TokenKind::Dot, id("x")]);
    }

    #[test]
    fn call_structure() {
        assert_eq!(
            lex("max(a, 1)"),
            vec![id("max"), TokenKind::LParen, id("a"), TokenKind::Comma, num("1"), TokenKind::RParen]
        );
    }

    #[test]
    fn positions_are_byte_offsets() {
        let options = ParserOptions::default();
        let tokens = Lexer::new("a +  bc", &options).tokenize().unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 2, 5]);
    }

    #[test]
    fn unexpected_character() {
        let e = lex_err("a # b");
        assert_eq!(e.code, ErrorCode::L001);
        assert_eq!(e.position, 2);
    }

    #[test]
    fn misplaced_operators_are_still_tokens() {
        assert_eq!(
            lex("1 + * 2"),
            vec![num("1"), TokenKind::BinaryOp(BinaryOp::Add), TokenKind::BinaryOp(BinaryOp::Mul), num("2")]
        );
        assert_eq!(lex("a !b"), vec![id("a"), TokenKind::UnaryOp(UnaryOp::Not), id("b")]);
    }

    #[test]
    fn lone_equals_is_rejected() {
        assert_eq!(lex_err("a = b").code, ErrorCode::L001);
    }

    #[test]
    fn malformed_numbers() {
        assert_eq!(lex_err("1.2.3").code, ErrorCode::L002);
        assert_eq!(lex_err("12abc").code, ErrorCode::L002);
        assert_eq!(lex_err("3fx").code, ErrorCode::L002);
    }
}
