//! Lambda-language front end
//!
//! This module turns source bytes into a desugared Abstract Syntax Tree:
//! - [`lexer`]: Tokenization (bytes → span tokens)
//! - [`parse`]: Parsing (tokens → raw AST), with productions in `forms`
//! - [`desugar`]: Rewriting scopeless `let` into its three-part form
//! - [`ast`]: AST node definitions
//! - [`error`]: Located syntax errors and their source-line reports
//! - [`tree`]: Box-drawing tree display
//! - [`limits`]: Length and nesting limits
//!
//! # Language
//!
//! Atoms are identifiers, integers (`i64`) and strings with `\\ \" \n \r \t`
//! escapes. Compound forms are parameter lists `(a, b)`, blocks `{a; b}`,
//! application `f(x)(y)`, assignment `x = e`, bindings `def x = e` and
//! `let x = e {scope}`, lambdas `λ(x) {body}` and `cond (t => c) ...`.
//! Comments run from `//` to end of line.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent over a byte cursor. No external parser
//! generator dependencies.

pub mod ast;
pub mod desugar;
pub mod error;
mod forms;
pub mod lexer;
pub mod limits;
pub mod parse;
pub mod tree;

pub use ast::{List, ListKind, Node, SourceLocation};
pub use desugar::desugar;
pub use error::{ErrorKind, SyntaxError};
pub use lexer::{keywords, Lexer, Token, TokenKind, KEYWORDS};
pub use limits::Limits;
pub use parse::{parse_program, ParseResult, Parser};
