//! Compound-form productions
//!
//! This module extends [`Parser`] with the productions that build lists:
//!
//! ```text
//! arguments   := '(' [form (',' form)*] ')'
//! formals     := '(' [identifier (',' identifier)*] ')'
//! block       := '{' [form (';' form)*] '}'
//! clause      := '(' form '=>' form ')'
//! application := (identifier | block | lambda) arguments+
//! assignment  := identifier '=' form
//! binding     := ('def' | 'let') identifier '=' form [block]
//! lambda      := ('lambda' | 'λ') formals block
//! cond        := 'cond' clause+
//! ```

use super::ast::{List, ListKind, Node, SourceLocation};
use super::error::{internal_error, ErrorKind};
use super::lexer::{Token, TokenKind};
use super::parse::{ParseResult, Parser};

/// Shape of a delimited, separated list.
pub(crate) struct ListSpec {
    kind: ListKind,
    separator: TokenKind,
    close: TokenKind,
    error: ErrorKind,
    accept: fn(&Node) -> bool,
}

pub(crate) const ARGUMENTS: ListSpec = ListSpec {
    kind: ListKind::Parameters,
    separator: TokenKind::Comma,
    close: TokenKind::CloseParen,
    error: ErrorKind::Parameters,
    accept: Node::is_form,
};

pub(crate) const FORMALS: ListSpec = ListSpec {
    kind: ListKind::Parameters,
    separator: TokenKind::Comma,
    close: TokenKind::CloseParen,
    error: ErrorKind::Parameters,
    accept: Node::is_identifier,
};

pub(crate) const BLOCK: ListSpec = ListSpec {
    kind: ListKind::Block,
    separator: TokenKind::Semicolon,
    close: TokenKind::CloseBrace,
    error: ErrorKind::Block,
    accept: Node::is_form,
};

pub(crate) const CLAUSE: ListSpec = ListSpec {
    kind: ListKind::Clause,
    separator: TokenKind::Arrow,
    close: TokenKind::CloseParen,
    error: ErrorKind::Cond,
    accept: Node::is_form,
};

fn truncated(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Parameters => "truncated input in parameter list",
        ListKind::Block => "truncated input in block",
        ListKind::Clause => "truncated input in cond clause",
        _ => "truncated input",
    }
}

impl<'src> Parser<'src> {
    /// Read list elements up to `spec.close`. The opener has been consumed
    /// and `form_start` is its offset.
    pub(crate) fn read_separated_list(
        &mut self,
        spec: &ListSpec,
    ) -> ParseResult<'src, List> {
        let start = SourceLocation::new(self.form_start);
        let mut list = List::new(spec.kind, start);
        if self.match_token(spec.close) {
            return Ok(list);
        }

        loop {
            let Some(item) = self.read_form()? else {
                return Err(self.eof_error(truncated(spec.kind)));
            };
            if spec.kind == ListKind::Parameters && item.is_parameters() {
                return Err(self.error(
                    ErrorKind::Parameters,
                    item.location(),
                    "parameters not allowed here",
                ));
            }
            if !(spec.accept)(&item) {
                return Err(self.error(
                    spec.error,
                    item.location(),
                    "syntax error here",
                ));
            }
            list.push(item);

            let token = self.next_token();
            if token.kind == spec.separator {
                if self.check(spec.close) {
                    return Err(self.error(
                        ErrorKind::BadChar,
                        token.location(),
                        "spurious separator (or missing item) here",
                    ));
                }
            } else if token.kind == spec.close {
                return Ok(list);
            } else if token.kind == TokenKind::Eof {
                return Err(self.eof_error(truncated(spec.kind)));
            } else {
                return Err(self.error(
                    spec.error,
                    token.location(),
                    "expected separator here",
                ));
            }
        }
    }

    /// Wrap `callee` in one Application per argument list that follows.
    pub(crate) fn maybe_application(
        &mut self,
        mut callee: Node,
    ) -> ParseResult<'src, Node> {
        while self.check(TokenKind::OpenParen) {
            let open = self.next_token();
            self.form_start = open.start;
            let args = self.read_separated_list(&ARGUMENTS)?;
            let location = callee.location();
            callee = Node::List(List::from_items(
                ListKind::Application,
                location,
                vec![callee, Node::List(args)],
            ));
        }
        Ok(callee)
    }

    /// `target = value`, with the `=` still unread.
    pub(crate) fn read_assignment(
        &mut self,
        target: Node,
    ) -> ParseResult<'src, Node> {
        if !self.match_token(TokenKind::Equals) {
            internal_error("assignment without an equals sign");
        }
        let Some(value) = self.read_form()? else {
            return Err(self.eof_error("expected expression after '='"));
        };
        let location = target.location();
        Ok(Node::List(List::from_items(
            ListKind::Assignment,
            location,
            vec![target, value],
        )))
    }

    /// `def`/`let` binding, with an optional scope block.
    pub(crate) fn read_definition(
        &mut self,
        binder: Token,
    ) -> ParseResult<'src, Node> {
        let kind = match binder.kind {
            TokenKind::Let => ListKind::Let,
            _ => ListKind::Definition,
        };

        let name = self.next_token();
        let id = match name.kind {
            TokenKind::Identifier => {
                Node::identifier_literal(self.input, &name)?
            }
            TokenKind::Eof => {
                return Err(self.eof_error("expected identifier after def/let"));
            }
            bad if bad.is_error() => return Err(self.token_error(name)),
            _ => {
                return Err(self.error(
                    ErrorKind::Definition,
                    name.location(),
                    "expected identifier after def/let",
                ));
            }
        };

        let equals = self.next_token();
        match equals.kind {
            TokenKind::Equals => {}
            TokenKind::Eof => {
                return Err(self.eof_error("expected equals sign"));
            }
            _ => {
                return Err(self.error(
                    ErrorKind::Definition,
                    equals.location(),
                    "expected equals sign following identifier",
                ));
            }
        }

        let Some(value) = self.read_form()? else {
            return Err(self.eof_error("expected expression after '='"));
        };
        let mut items = vec![id, value];

        if self.check(TokenKind::OpenBrace) {
            let Some(scope) = self.read_form()? else {
                return Err(self.eof_error("expected code block"));
            };
            if !scope.is_block() {
                return Err(self.error(
                    ErrorKind::Definition,
                    scope.location(),
                    "expected code block",
                ));
            }
            items.push(scope);
        }

        Ok(Node::List(List::from_items(kind, binder.location(), items)))
    }

    /// `lambda (formals) {body}`, keyword already consumed.
    pub(crate) fn read_lambda(
        &mut self,
        keyword: Token,
    ) -> ParseResult<'src, Node> {
        let open = self.next_token();
        match open.kind {
            TokenKind::OpenParen => {}
            TokenKind::Eof => {
                return Err(self.eof_error("truncated input in lambda"));
            }
            _ => {
                return Err(self.error(
                    ErrorKind::Lambda,
                    open.location(),
                    "missing parameter list",
                ));
            }
        }
        self.form_start = open.start;
        let formals = self.read_separated_list(&FORMALS)?;

        let brace = self.next_token();
        match brace.kind {
            TokenKind::OpenBrace => {}
            TokenKind::Eof => {
                return Err(self.eof_error("truncated input in lambda"));
            }
            _ => {
                return Err(self.error(
                    ErrorKind::Lambda,
                    brace.location(),
                    "missing function body for lambda",
                ));
            }
        }
        self.form_start = brace.start;
        let body = self.read_separated_list(&BLOCK)?;

        Ok(Node::List(List::from_items(
            ListKind::Lambda,
            keyword.location(),
            vec![Node::List(formals), Node::List(body)],
        )))
    }

    /// `cond (test => consequent) ...`, keyword already consumed.
    pub(crate) fn read_cond(
        &mut self,
        keyword: Token,
    ) -> ParseResult<'src, Node> {
        let mut clauses = List::new(ListKind::Cond, keyword.location());
        loop {
            let open = self.next_token();
            match open.kind {
                TokenKind::OpenParen => {}
                TokenKind::Eof => {
                    return Err(self.eof_error("truncated input in cond"));
                }
                _ => {
                    return Err(self.error(
                        ErrorKind::Cond,
                        open.location(),
                        "expected a clause (test => consequent)",
                    ));
                }
            }
            self.form_start = open.start;
            let clause = self.read_separated_list(&CLAUSE)?;
            if clause.len() != 2 {
                return Err(self.error(
                    ErrorKind::Cond,
                    clause.location(),
                    "improper cond clause: should be (test => consequent)",
                ));
            }
            clauses.push(Node::List(clause));

            if !self.check(TokenKind::OpenParen) {
                return Ok(Node::List(clauses));
            }
        }
    }
}
