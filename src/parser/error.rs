//! Syntax errors and internal-error handling
//!
//! A [`SyntaxError`] is the recoverable outcome of reading malformed input.
//! It records what went wrong ([`ErrorKind`]), the byte offset where it went
//! wrong, a short message, and the input itself so that
//! [`SyntaxError::report`] can show the offending line with a caret.
//!
//! Internal invariant violations are not syntax errors. They go through
//! [`internal_error`], which logs and panics.

use super::ast::SourceLocation;
use super::lexer::is_whitespace;
use std::fmt;
use thiserror::Error;

/// Category of a syntax error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnexpectedEof,
    Program,
    Definition,
    /// Reserved: every value is a valid right-hand side, and a missing one
    /// is reported as [`ErrorKind::UnexpectedEof`].
    Assignment,
    Lambda,
    Parameters,
    Block,
    Cond,
    /// Reserved: a missing comma is reported as the list's own kind.
    Comma,
    /// Reserved: a missing semicolon is reported as [`ErrorKind::Block`].
    Semicolon,
    IdentifierSyntax,
    IdentifierLength,
    IntegerSyntax,
    IntegerLength,
    IntegerRange,
    StringChar,
    StringEscape,
    StringLength,
    Nesting,
    BadChar,
    Lexer,
}

impl ErrorKind {
    pub fn description(self) -> &'static str {
        match self {
            ErrorKind::UnexpectedEof => "Unexpected EOF",
            ErrorKind::Program => "Not a valid program",
            ErrorKind::Definition => "Improper binding (def/let)",
            ErrorKind::Assignment => "Improper assignment",
            ErrorKind::Lambda => "Improper lambda expression",
            ErrorKind::Parameters => "Improper parameter list",
            ErrorKind::Block => "Improper block",
            ErrorKind::Cond => "Improper cond",
            ErrorKind::Comma => "Expected comma",
            ErrorKind::Semicolon => "Expected semicolon",
            ErrorKind::IdentifierSyntax => "Invalid identifier syntax",
            ErrorKind::IdentifierLength => "Identifier too long",
            ErrorKind::IntegerSyntax => "Invalid integer",
            ErrorKind::IntegerLength => "Integer too long",
            ErrorKind::IntegerRange => "Integer out of range",
            ErrorKind::StringChar => "Invalid character in string",
            ErrorKind::StringEscape => "Invalid escape sequence",
            ErrorKind::StringLength => "String too long",
            ErrorKind::Nesting => "Forms nested too deeply",
            ErrorKind::BadChar => "Illegal character",
            ErrorKind::Lexer => "Lexer failed",
        }
    }

    /// Whether a report should point at the column. Over-long literals are
    /// reported at their truncation point, which is not worth a caret.
    pub fn shows_caret(self) -> bool {
        !matches!(self, ErrorKind::IdentifierLength | ErrorKind::StringLength)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A located syntax error in some input.
#[derive(Clone, Copy, PartialEq, Eq, Error)]
#[error("Syntax error [{kind}]: {message}")]
pub struct SyntaxError<'src> {
    pub kind: ErrorKind,
    pub location: SourceLocation,
    pub message: &'static str,
    input: &'src [u8],
}

impl<'src> SyntaxError<'src> {
    pub fn new(
        kind: ErrorKind,
        location: SourceLocation,
        input: &'src [u8],
        message: &'static str,
    ) -> Self {
        SyntaxError {
            kind,
            location,
            message,
            input,
        }
    }

    pub fn input(&self) -> &'src [u8] {
        self.input
    }

    pub fn offset(&self) -> usize {
        self.location.offset
    }

    /// 1-based line and column of the error.
    pub fn line_column(&self) -> (usize, usize) {
        self.location.line_column(self.input)
    }

    /// The line holding the error, and the error's byte column within it.
    ///
    /// An error at end of input is shown on the last line that has content,
    /// as is one that lands on a newline.
    pub fn source_line(&self) -> Option<(&'src [u8], usize)> {
        let end = self
            .input
            .iter()
            .position(|&byte| byte == 0)
            .unwrap_or(self.input.len());
        let text = &self.input[..end];
        if text.is_empty() {
            return None;
        }

        let offset = self.offset().min(text.len());
        let mut point = offset;
        if point == text.len() {
            point -= 1;
        }
        if text[point] == b'\n' && point > 0 {
            point -= 1;
        }

        let line_start = text[..point]
            .iter()
            .rposition(|&byte| byte == b'\n')
            .map_or(0, |newline| newline + 1);
        let line_end = text[line_start..]
            .iter()
            .position(|&byte| byte == b'\n')
            .map_or(text.len(), |newline| line_start + newline);
        let line = &text[line_start..line_end];
        Some((line, offset.saturating_sub(line_start).min(line.len())))
    }

    /// Human-readable report: the header, then the source line and a caret
    /// under the error column where those make sense.
    pub fn report(&self) -> String {
        let mut out = format!("{}\n", self);
        if self.kind == ErrorKind::Lexer {
            return out;
        }
        let Some((line, column)) = self.source_line() else {
            return out;
        };
        if line.iter().all(|&byte| is_whitespace(byte)) {
            return out;
        }

        out.push_str("  ");
        out.push_str(&String::from_utf8_lossy(line));
        out.push('\n');
        if self.kind.shows_caret() {
            let width = String::from_utf8_lossy(&line[..column]).chars().count();
            out.push_str("  ");
            out.push_str(&" ".repeat(width));
            out.push_str("^\n");
        }
        out
    }
}

impl fmt::Debug for SyntaxError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxError")
            .field("kind", &self.kind)
            .field("offset", &self.location.offset)
            .field("message", &self.message)
            .finish()
    }
}

/// Halt on a broken internal invariant.
#[track_caller]
pub(crate) fn internal_error(what: &str) -> ! {
    tracing::error!(what, "internal parser error");
    panic!("internal parser error: {}", what)
}
