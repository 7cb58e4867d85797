//! Tokenizer for the lambda language
//!
//! The [`Lexer`] is an explicit byte cursor over caller-owned input. Each call
//! to [`Lexer::read_token`] classifies the next span and advances past it.
//! Tokens carry no text of their own; they are `(start, len)` views into the
//! input, so the parser slices the buffer when it needs a literal's bytes.
//!
//! Malformed input never aborts the lexer. It comes back as a token whose
//! kind names the problem (see [`TokenKind::is_error`]) with `error_at`
//! pointing at the offending byte, and the parser turns that into a
//! [`SyntaxError`](super::error::SyntaxError).
//!
//! # Delimiters
//!
//! Identifiers and integers run until the next delimiter: whitespace, `"`,
//! `(`, `)`, `{`, `}`, `,`, `;`, `=` (so also `=>`), the start of a `//`
//! comment, or end of input. End of input is the end of the slice or a NUL
//! byte, whichever comes first.

use super::ast::SourceLocation;
use super::limits::Limits;
use std::fmt;

/// Token classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structural
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Comma,
    Semicolon,

    // Atmosphere
    Whitespace,
    Comment,

    // Literals
    Identifier,
    Integer,
    String,

    // Keywords, in table order
    Lambda,
    LambdaAlt,
    Def,
    Cond,
    Arrow,
    Equals,
    Let,

    // Sentinels
    Eof,
    Panic,

    // Malformed input
    BadIdChar,
    BadIdLen,
    BadStrEof,
    BadStrLen,
    BadStrChar,
    BadIntChar,
    BadIntLen,
    BadChar,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::OpenParen => "OPENPAREN",
            TokenKind::CloseParen => "CLOSEPAREN",
            TokenKind::OpenBrace => "OPENBRACE",
            TokenKind::CloseBrace => "CLOSEBRACE",
            TokenKind::Comma => "COMMA",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Whitespace => "WS",
            TokenKind::Comment => "COMMENT",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Integer => "INT",
            TokenKind::String => "STRING",
            TokenKind::Lambda => "LAMBDA",
            TokenKind::LambdaAlt => "LAMBDA_ALT",
            TokenKind::Def => "DEF",
            TokenKind::Cond => "COND",
            TokenKind::Arrow => "ARROW",
            TokenKind::Equals => "EQUALS",
            TokenKind::Let => "LET",
            TokenKind::Eof => "EOF",
            TokenKind::Panic => "PANIC",
            TokenKind::BadIdChar => "BAD_IDCHAR",
            TokenKind::BadIdLen => "BAD_IDLEN",
            TokenKind::BadStrEof => "BAD_STREOF",
            TokenKind::BadStrLen => "BAD_STRLEN",
            TokenKind::BadStrChar => "BAD_STRCHAR",
            TokenKind::BadIntChar => "BAD_INTCHAR",
            TokenKind::BadIntLen => "BAD_INTLEN",
            TokenKind::BadChar => "BAD_CHAR",
        }
    }

    /// Whitespace and comments, which the parser skips.
    pub fn is_atmosphere(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    pub fn is_keyword(self) -> bool {
        KEYWORDS.iter().any(|(_, kind)| *kind == self)
    }

    /// True for the internal panic sentinel and every malformed-input kind.
    pub fn is_error(self) -> bool {
        matches!(
            self,
            TokenKind::Panic
                | TokenKind::BadIdChar
                | TokenKind::BadIdLen
                | TokenKind::BadStrEof
                | TokenKind::BadStrLen
                | TokenKind::BadStrChar
                | TokenKind::BadIntChar
                | TokenKind::BadIntLen
                | TokenKind::BadChar
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reserved words, in the order they are matched.
///
/// `=>` and `=` are listed for completeness; the lexer recognizes them as
/// structural tokens before any identifier scan could reach them.
pub const KEYWORDS: [(&str, TokenKind); 7] = [
    ("lambda", TokenKind::Lambda),
    ("λ", TokenKind::LambdaAlt),
    ("def", TokenKind::Def),
    ("cond", TokenKind::Cond),
    ("=>", TokenKind::Arrow),
    ("=", TokenKind::Equals),
    ("let", TokenKind::Let),
];

/// Enumerate the keyword spellings.
pub fn keywords() -> impl Iterator<Item = &'static str> {
    KEYWORDS.iter().map(|(word, _)| *word)
}

fn keyword_kind(text: &[u8]) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(word, _)| word.as_bytes() == text)
        .map(|(_, kind)| *kind)
}

/// A classified span of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub len: usize,
    /// Absolute offset of the offending byte, for malformed-input tokens.
    pub error_at: Option<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, len: usize) -> Self {
        Token {
            kind,
            start,
            len,
            error_at: None,
        }
    }

    fn bad(kind: TokenKind, start: usize, len: usize, at: usize) -> Self {
        Token {
            kind,
            start,
            len,
            error_at: Some(at),
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.start)
    }

    /// Where a malformed token should be reported: the offending byte if
    /// known, otherwise the token start.
    pub fn error_location(&self) -> SourceLocation {
        SourceLocation::new(self.error_at.unwrap_or(self.start))
    }

    /// The bytes this token covers.
    pub fn text<'src>(&self, input: &'src [u8]) -> &'src [u8] {
        input.get(self.start..self.end()).unwrap_or(&[])
    }

    /// Render the token with its text, e.g. `IDENTIFIER "abc" @3`.
    pub fn describe(&self, input: &[u8]) -> String {
        let text = String::from_utf8_lossy(self.text(input));
        match self.error_at {
            Some(at) => format!(
                "{} {} @{} (error @{})",
                self.kind,
                escape(&text),
                self.start,
                at
            ),
            None => format!("{} {} @{}", self.kind, escape(&text), self.start),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}..{}]", self.kind, self.start, self.end())?;
        if let Some(at) = self.error_at {
            write!(f, " error at {}", at)?;
        }
        Ok(())
    }
}

pub(crate) fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Control characters that may not appear in an identifier.
fn is_verboten(byte: u8) -> bool {
    (byte < 32 && !is_whitespace(byte)) || byte == 127
}

/// Tokenizer state: the input and a cursor into it.
///
/// `Lexer` is `Copy`, so a lookahead is just a read from a copy.
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'src> {
    input: &'src [u8],
    position: usize,
    limits: Limits,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src [u8]) -> Self {
        Self::with_limits(input, Limits::default())
    }

    pub fn with_limits(input: &'src [u8], limits: Limits) -> Self {
        Self {
            input,
            position: 0,
            limits,
        }
    }

    pub fn input(&self) -> &'src [u8] {
        self.input
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor. A position past the end of the input makes the next
    /// read return a [`TokenKind::Panic`] token.
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    pub fn is_at_end(&self) -> bool {
        self.byte_at(self.position) == 0
    }

    /// Read the next token and advance past it.
    pub fn read_token(&mut self) -> Token {
        let start = self.position;
        if start > self.input.len() {
            return Token::new(TokenKind::Panic, start, 0);
        }
        let token = self.scan(start);
        self.position = token.end();
        token
    }

    /// The token `read_token` would return, without consuming it.
    pub fn peek_token(&self) -> Token {
        let mut probe = *self;
        probe.read_token()
    }

    /// Read every remaining token, atmosphere included, through the final
    /// `Eof` (or `Panic`).
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.read_token();
            tokens.push(token);
            if matches!(token.kind, TokenKind::Eof | TokenKind::Panic) {
                break;
            }
        }
        tokens
    }

    // ===== Scanning =====

    fn byte_at(&self, index: usize) -> u8 {
        self.input.get(index).copied().unwrap_or(0)
    }

    fn is_delimiter(&self, index: usize) -> bool {
        let byte = self.byte_at(index);
        byte == 0
            || is_whitespace(byte)
            || matches!(byte, b'"' | b'(' | b')' | b'{' | b'}' | b',' | b';')
            || byte == b'='
            || (byte == b'/' && self.byte_at(index + 1) == b'/')
    }

    fn until_delimiter(&self, mut index: usize) -> usize {
        while !self.is_delimiter(index) {
            index += 1;
        }
        index
    }

    fn scan(&self, start: usize) -> Token {
        let single = |kind| Token::new(kind, start, 1);
        match self.byte_at(start) {
            0 => Token::new(TokenKind::Eof, start, 0),
            b'(' => single(TokenKind::OpenParen),
            b')' => single(TokenKind::CloseParen),
            b'{' => single(TokenKind::OpenBrace),
            b'}' => single(TokenKind::CloseBrace),
            b',' => single(TokenKind::Comma),
            b';' => single(TokenKind::Semicolon),
            b'=' if self.byte_at(start + 1) == b'>' => {
                Token::new(TokenKind::Arrow, start, 2)
            }
            b'=' => single(TokenKind::Equals),
            b'"' => self.scan_string(start),
            b'+' | b'-' | b'0'..=b'9' => self.scan_integer(start),
            b'/' if self.byte_at(start + 1) == b'/' => self.scan_comment(start),
            byte if is_whitespace(byte) => self.scan_whitespace(start),
            _ => self.scan_identifier(start),
        }
    }

    fn scan_whitespace(&self, start: usize) -> Token {
        let mut end = start;
        while is_whitespace(self.byte_at(end)) {
            end += 1;
        }
        Token::new(TokenKind::Whitespace, start, end - start)
    }

    fn scan_comment(&self, start: usize) -> Token {
        let mut end = start;
        while !matches!(self.byte_at(end), b'\n' | 0) {
            end += 1;
        }
        Token::new(TokenKind::Comment, start, end - start)
    }

    fn scan_integer(&self, start: usize) -> Token {
        let end = self.until_delimiter(start);
        let len = end - start;
        let digits_start = match self.byte_at(start) {
            b'+' | b'-' => start + 1,
            _ => start,
        };
        let digits = self.input[digits_start..end]
            .iter()
            .take_while(|byte| byte.is_ascii_digit())
            .count();
        let digits_end = digits_start + digits;

        if digits == 0 {
            Token::bad(TokenKind::BadIntChar, start, len, end - 1)
        } else if digits_end != end {
            Token::bad(TokenKind::BadIntChar, start, len, digits_end)
        } else if digits > self.limits.max_integer_digits {
            let at = digits_start + self.limits.max_integer_digits;
            Token::bad(TokenKind::BadIntLen, start, len, at)
        } else {
            Token::new(TokenKind::Integer, start, len)
        }
    }

    fn scan_string(&self, start: usize) -> Token {
        // Find the closing quote, skipping escaped bytes
        let mut index = start + 1;
        loop {
            match self.byte_at(index) {
                0 | b'"' => break,
                b'\\' if self.byte_at(index + 1) != 0 => index += 2,
                _ => index += 1,
            }
        }
        let terminated = self.byte_at(index) == b'"';
        let end = if terminated { index + 1 } else { index };

        if index - (start + 1) > self.limits.max_string_len {
            return Token::bad(TokenKind::BadStrLen, start, end - start, index);
        }
        if !terminated {
            return Token::bad(TokenKind::BadStrEof, start, end - start, index);
        }
        if let Some(offset) = first_invalid_utf8(&self.input[start..end]) {
            let at = start + offset;
            return Token::bad(TokenKind::BadStrChar, start, end - start, at);
        }
        Token::new(TokenKind::String, start, end - start)
    }

    fn scan_identifier(&self, start: usize) -> Token {
        let end = self.until_delimiter(start);
        let len = end - start;
        if len > self.limits.max_identifier_len {
            let at = start + self.limits.max_identifier_len;
            return Token::bad(TokenKind::BadIdLen, start, len, at);
        }

        let text = &self.input[start..end];
        let invalid = first_invalid_utf8(text)
            .or_else(|| text.iter().position(|&byte| is_verboten(byte)));
        if let Some(offset) = invalid {
            let kind = if offset == 0 {
                TokenKind::BadChar
            } else {
                TokenKind::BadIdChar
            };
            return Token::bad(kind, start, len, start + offset);
        }

        let kind = keyword_kind(text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, start, len)
    }
}

/// Offset of the first byte that makes `bytes` invalid UTF-8, if any.
///
/// NUL counts as invalid. A sequence cut short by the end of `bytes` is
/// reported at `bytes.len()`.
pub fn first_invalid_utf8(bytes: &[u8]) -> Option<usize> {
    let mut pending = 0;
    for (offset, &byte) in bytes.iter().enumerate() {
        if pending > 0 {
            if byte & 0xC0 != 0x80 {
                return Some(offset);
            }
            pending -= 1;
            continue;
        }
        pending = match byte {
            0 => return Some(offset),
            0x01..=0x7F => 0,
            0xC0..=0xDF => 1,
            0xE0..=0xEF => 2,
            0xF0..=0xF7 => 3,
            // Stray continuation byte or an impossible lead byte
            _ => return Some(offset),
        };
    }
    if pending > 0 {
        return Some(bytes.len());
    }
    // Overlong forms and surrogates have the right shape but are not UTF-8
    std::str::from_utf8(bytes).err().map(|err| err.valid_up_to())
}

/// Quote and escape a string payload for display.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Undo backslash escapes in the content of a string literal.
///
/// On an unknown escape, returns the offset of its backslash.
pub(crate) fn unescape(content: &[u8]) -> Result<Vec<u8>, usize> {
    let mut out = Vec::with_capacity(content.len());
    let mut bytes = content.iter().copied().enumerate();
    while let Some((offset, byte)) = bytes.next() {
        if byte != b'\\' {
            out.push(byte);
            continue;
        }
        let unescaped = match bytes.next() {
            Some((_, b'\\')) => b'\\',
            Some((_, b'"')) => b'"',
            Some((_, b'r')) => b'\r',
            Some((_, b'n')) => b'\n',
            Some((_, b't')) => b'\t',
            _ => return Err(offset),
        };
        out.push(unescaped);
    }
    Ok(out)
}
