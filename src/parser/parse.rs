//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, its token helpers, and the two
//! entry points:
//! - [`Parser::read_form`]: read one raw form (no desugaring)
//! - [`Parser::read_program`]: read one top-level program and desugar it
//!
//! # Parser Architecture
//!
//! Recursive descent over a [`Lexer`] cursor. Tokens are pulled on demand;
//! lookahead is a read from a copy of the cursor. The productions for lists,
//! application, assignment, bindings, lambda and cond live in `forms` as a
//! second `impl Parser` block.
//!
//! Nesting is bounded by [`Limits::max_depth`]: a form that would open one
//! level too many is a [`ErrorKind::Nesting`] error at its first token.
//!
//! Every read returns one of three outcomes: `Ok(Some(node))`, `Ok(None)` at
//! end of input, or `Err(SyntaxError)`. Nothing partially built survives an
//! error.

use super::ast::{Node, SourceLocation};
use super::desugar::desugar;
use super::error::{internal_error, ErrorKind, SyntaxError};
use super::forms::{ARGUMENTS, BLOCK};
use super::lexer::{Lexer, Token, TokenKind};
use super::limits::Limits;

pub type ParseResult<'src, T> = Result<T, SyntaxError<'src>>;

/// Recursive descent parser for the lambda language
pub struct Parser<'src> {
    pub(crate) input: &'src [u8],
    pub(crate) lexer: Lexer<'src>,
    /// Start of the form most recently dispatched on
    pub(crate) form_start: usize,
    /// Forms currently being read
    depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(input: &'src [u8]) -> Self {
        Self::with_limits(input, Limits::default())
    }

    pub fn with_limits(input: &'src [u8], limits: Limits) -> Self {
        Self {
            input,
            lexer: Lexer::with_limits(input, limits),
            form_start: 0,
            depth: 0,
        }
    }

    /// Byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.lexer.position()
    }

    /// True when nothing but whitespace and comments remain.
    pub fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Read one program: a single top-level form, desugared.
    ///
    /// A bare parameter list is not a program. The cursor is left after the
    /// form, so calling this again reads whatever follows.
    pub fn read_program(&mut self) -> ParseResult<'src, Option<Node>> {
        let Some(form) = self.read_form()? else {
            return Ok(None);
        };
        if form.is_parameters() {
            return Err(self.error(
                ErrorKind::Program,
                form.location(),
                "a parameter list is not a program",
            ));
        }
        let program = desugar(&form);
        tracing::debug!(
            start = form.location().offset,
            end = self.position(),
            kind = program.type_name(),
            "read program"
        );
        Ok(Some(program))
    }

    /// Read one form without desugaring.
    pub fn read_form(&mut self) -> ParseResult<'src, Option<Node>> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            return Ok(None);
        }
        if self.depth >= self.lexer.limits().max_depth {
            return Err(self.error(
                ErrorKind::Nesting,
                token.location(),
                "forms nested too deeply",
            ));
        }

        self.depth += 1;
        let form = self.dispatch(token);
        self.depth -= 1;
        form.map(Some)
    }

    /// Read the rest of the form that `token` starts.
    fn dispatch(&mut self, token: Token) -> ParseResult<'src, Node> {
        self.form_start = token.start;

        let node = match token.kind {
            TokenKind::OpenParen => {
                Node::List(self.read_separated_list(&ARGUMENTS)?)
            }
            TokenKind::OpenBrace => {
                let block = self.read_separated_list(&BLOCK)?;
                self.maybe_application(Node::List(block))?
            }
            TokenKind::Lambda | TokenKind::LambdaAlt => {
                let lambda = self.read_lambda(token)?;
                self.maybe_application(lambda)?
            }
            TokenKind::Cond => self.read_cond(token)?,
            TokenKind::Def | TokenKind::Let => self.read_definition(token)?,
            TokenKind::Identifier => {
                let id = Node::identifier_literal(self.input, &token)?;
                if self.check(TokenKind::Equals) {
                    self.read_assignment(id)?
                } else {
                    self.maybe_application(id)?
                }
            }
            TokenKind::String => Node::string_literal(self.input, &token)?,
            TokenKind::Integer => Node::integer_literal(self.input, &token)?,
            TokenKind::Equals => {
                return Err(self.spurious(token, "spurious equals sign"));
            }
            TokenKind::Arrow => {
                return Err(self.spurious(token, "spurious arrow"));
            }
            TokenKind::CloseBrace => {
                return Err(self.spurious(token, "spurious closing brace"));
            }
            TokenKind::CloseParen => {
                return Err(self.spurious(token, "spurious closing paren"));
            }
            TokenKind::Comma => {
                return Err(self.spurious(token, "spurious comma"));
            }
            TokenKind::Semicolon => {
                return Err(self.spurious(token, "spurious semicolon"));
            }
            TokenKind::Eof | TokenKind::Whitespace | TokenKind::Comment => {
                internal_error("atmosphere token reached the parser")
            }
            _ => return Err(self.token_error(token)),
        };
        Ok(node)
    }

    // ===== Helper methods =====

    /// Next non-atmosphere token, consumed.
    pub(crate) fn next_token(&mut self) -> Token {
        let token = skip_atmosphere(&mut self.lexer);
        tracing::trace!(token = %token, "read token");
        token
    }

    /// Next non-atmosphere token, not consumed.
    pub(crate) fn peek_token(&self) -> Token {
        let mut probe = self.lexer;
        skip_atmosphere(&mut probe)
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_token().kind == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn error(
        &self,
        kind: ErrorKind,
        location: SourceLocation,
        message: &'static str,
    ) -> SyntaxError<'src> {
        SyntaxError::new(kind, location, self.input, message)
    }

    /// End-of-input error at the cursor.
    pub(crate) fn eof_error(&self, message: &'static str) -> SyntaxError<'src> {
        let location = SourceLocation::new(self.position());
        self.error(ErrorKind::UnexpectedEof, location, message)
    }

    fn spurious(
        &self,
        token: Token,
        message: &'static str,
    ) -> SyntaxError<'src> {
        self.error(ErrorKind::BadChar, token.location(), message)
    }

    /// Translate a malformed-input token into its syntax error.
    pub(crate) fn token_error(&self, token: Token) -> SyntaxError<'src> {
        let at = token.error_location();
        let (kind, location, message) = match token.kind {
            TokenKind::BadStrEof => (
                ErrorKind::UnexpectedEof,
                token.location(),
                "unterminated string",
            ),
            TokenKind::BadIdChar => (
                ErrorKind::IdentifierSyntax,
                at,
                "invalid character in identifier",
            ),
            TokenKind::BadIdLen => {
                (ErrorKind::IdentifierLength, at, "identifier too long")
            }
            TokenKind::BadStrChar => {
                (ErrorKind::StringChar, at, "invalid character in string")
            }
            TokenKind::BadStrLen => {
                (ErrorKind::StringLength, at, "string too long")
            }
            TokenKind::BadIntChar => {
                (ErrorKind::IntegerSyntax, at, "invalid character in integer")
            }
            TokenKind::BadIntLen => {
                (ErrorKind::IntegerLength, at, "integer too long")
            }
            TokenKind::BadChar => (ErrorKind::BadChar, at, "illegal character"),
            TokenKind::Panic => (
                ErrorKind::Lexer,
                SourceLocation::new(0),
                "cursor outside the input",
            ),
            other => internal_error(&format!(
                "{} is not a malformed-input token",
                other
            )),
        };
        self.error(kind, location, message)
    }
}

fn skip_atmosphere(lexer: &mut Lexer<'_>) -> Token {
    loop {
        let token = lexer.read_token();
        if !token.kind.is_atmosphere() {
            return token;
        }
    }
}

/// Parse the first program in `input`.
pub fn parse_program(input: &[u8]) -> ParseResult<'_, Option<Node>> {
    Parser::new(input).read_program()
}
