//! # Introduction
//!
//! lamparse reads programs in a small expression language built around
//! lambda, `let`/`def` bindings and `cond`, and produces a validated,
//! desugared syntax tree or a syntax error that points at the exact byte
//! where the input went wrong.
//!
//! ## Pipeline
//!
//! ```text
//! Source bytes → Lexer → Parser → raw AST → Desugarer → AST
//! ```
//!
//! 1. [`parser::lexer`]: classifies one token at a time from a byte cursor,
//!    validating UTF-8 and literal lengths as it goes.
//! 2. [`parser::parse`]: recursive descent; each call to
//!    [`parser::Parser::read_program`] yields a tree, end of input, or a
//!    [`parser::SyntaxError`].
//! 3. [`parser::desugar`]: gives every `let` an explicit scope block.
//!
//! ```
//! use lamparse::parser::parse_program;
//!
//! let tree = parse_program(b"{let a = 5; add(a, 1)}").unwrap().unwrap();
//! assert!(tree.is_block());
//! print!("{}", tree.tree());
//! ```
//!
//! Logging goes through [`tracing`]: tokens at `TRACE`, programs at `DEBUG`.

pub mod parser;
