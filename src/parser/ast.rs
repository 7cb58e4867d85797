//! AST node definitions
//!
//! A [`Node`] is either an atom (booleans, integers, strings, identifiers) or
//! a [`List`] tagged with a [`ListKind`]. The kind lives on the list itself,
//! so every element of a list shares one kind by construction.
//!
//! Nodes own their children. Cloning is a deep copy and equality is deep
//! structural equality that ignores source locations.

use super::error::{internal_error, ErrorKind, SyntaxError};
use super::lexer::{self, Token};
use std::fmt;

/// Byte offset into the parser input, for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourceLocation {
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(offset: usize) -> Self {
        Self { offset }
    }

    /// 1-based line and column (in bytes) of this offset within `input`.
    pub fn line_column(self, input: &[u8]) -> (usize, usize) {
        let before = &input[..self.offset.min(input.len())];
        let line = 1 + before.iter().filter(|&&byte| byte == b'\n').count();
        let line_start = before
            .iter()
            .rposition(|&byte| byte == b'\n')
            .map_or(0, |newline| newline + 1);
        (line, before.len() - line_start + 1)
    }
}

/// What a list represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Parameters,
    Block,
    Application,
    Definition,
    Let,
    Assignment,
    Clause,
    Cond,
    Lambda,
}

impl ListKind {
    pub fn name(self) -> &'static str {
        match self {
            ListKind::Parameters => "Parameters",
            ListKind::Block => "Block",
            ListKind::Application => "Application",
            ListKind::Definition => "Def",
            ListKind::Let => "Let",
            ListKind::Assignment => "Assignment",
            ListKind::Clause => "Clause",
            ListKind::Cond => "Cond",
            ListKind::Lambda => "Lambda",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered, kinded sequence of nodes. Empty lists stand in for `Nil`.
///
/// Desugared `let` chains nest two levels per binding, so copying,
/// comparing and dropping lists all walk an explicit stack instead of
/// recursing.
#[derive(Debug)]
pub struct List {
    kind: ListKind,
    items: Vec<Node>,
    location: SourceLocation,
}

impl List {
    pub fn new(kind: ListKind, location: SourceLocation) -> Self {
        Self::from_items(kind, location, Vec::new())
    }

    pub fn from_items(
        kind: ListKind,
        location: SourceLocation,
        items: Vec<Node>,
    ) -> Self {
        List {
            kind,
            items,
            location,
        }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Node] {
        &self.items
    }

    pub fn into_items(mut self) -> Vec<Node> {
        std::mem::take(&mut self.items)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index)
    }

    /// Same kind and location, no items yet.
    fn empty_copy(&self) -> List {
        List::from_items(
            self.kind,
            self.location,
            Vec::with_capacity(self.items.len()),
        )
    }

    /// First element. Halts on an empty list.
    pub fn head(&self) -> &Node {
        match self.items.first() {
            Some(head) => head,
            None => internal_error("head of an empty list"),
        }
    }

    /// Everything after the first element. Halts on an empty list.
    pub fn tail(&self) -> &[Node] {
        match self.items.split_first() {
            Some((_, tail)) => tail,
            None => internal_error("tail of an empty list"),
        }
    }

    pub fn push(&mut self, node: Node) {
        self.items.push(node);
    }

    /// Prepend `node`. The result takes the new head's location.
    pub fn cons(mut self, node: Node) -> Self {
        self.location = node.location();
        self.items.insert(0, node);
        self
    }

    /// Reverse in place.
    pub fn reverse(&mut self) {
        self.items.reverse();
    }

    /// A new list of the same kind and location with `f` applied to each
    /// element.
    pub fn map(&self, f: impl FnMut(&Node) -> Node) -> List {
        let items = self.items.iter().map(f).collect();
        List::from_items(self.kind, self.location, items)
    }

    pub fn fold<B>(&self, init: B, f: impl FnMut(B, &Node) -> B) -> B {
        self.items.iter().fold(init, f)
    }
}

impl Clone for List {
    fn clone(&self) -> Self {
        // Each frame is a source list's unvisited items and its copy so far
        let mut stack = vec![(self.items.iter(), self.empty_copy())];
        while let Some((pending, copy)) = stack.last_mut() {
            match pending.next() {
                Some(Node::List(child)) => {
                    stack.push((child.items.iter(), child.empty_copy()));
                }
                Some(atom) => copy.items.push(atom.clone()),
                None => {
                    let Some((_, done)) = stack.pop() else { break };
                    match stack.last_mut() {
                        Some((_, parent)) => {
                            parent.items.push(Node::List(done))
                        }
                        None => return done,
                    }
                }
            }
        }
        internal_error("list copy finished without a result")
    }
}

impl Drop for List {
    fn drop(&mut self) {
        let mut doomed = std::mem::take(&mut self.items);
        while let Some(node) = doomed.pop() {
            if let Node::List(mut list) = node {
                doomed.append(&mut list.items);
            }
        }
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((left, right)) = pending.pop() {
            if left.kind != right.kind || left.len() != right.len() {
                return false;
            }
            for pair in left.items.iter().zip(&right.items) {
                match pair {
                    (Node::List(a), Node::List(b)) => pending.push((a, b)),
                    (a, b) if !a.same_node(b) => return false,
                    _ => {}
                }
            }
        }
        true
    }
}

impl Eq for List {}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// A well-formed AST node.
#[derive(Debug, Clone)]
pub enum Node {
    True(SourceLocation),
    False(SourceLocation),
    Integer(i64, SourceLocation),
    /// Unescaped string contents
    Str(String, SourceLocation),
    Identifier(String, SourceLocation),
    List(List),
}

impl Node {
    pub fn location(&self) -> SourceLocation {
        match self {
            Node::True(loc)
            | Node::False(loc)
            | Node::Integer(_, loc)
            | Node::Str(_, loc)
            | Node::Identifier(_, loc) => *loc,
            Node::List(list) => list.location(),
        }
    }

    // ===== Constructors from tokens =====

    /// Materialize an integer token, checking the `i64` range.
    pub fn integer_literal<'src>(
        input: &'src [u8],
        token: &Token,
    ) -> Result<Node, SyntaxError<'src>> {
        interpret_int(token.text(input))
            .map(|value| Node::Integer(value, token.location()))
            .ok_or_else(|| {
                SyntaxError::new(
                    ErrorKind::IntegerRange,
                    token.location(),
                    input,
                    "integer does not fit in 64 bits",
                )
            })
    }

    /// Materialize a string token, undoing its escapes.
    pub fn string_literal<'src>(
        input: &'src [u8],
        token: &Token,
    ) -> Result<Node, SyntaxError<'src>> {
        let text = token.text(input);
        let content = text.get(1..text.len().saturating_sub(1)).unwrap_or(&[]);
        let content_start = token.start + 1;

        let bytes = lexer::unescape(content).map_err(|offset| {
            SyntaxError::new(
                ErrorKind::StringEscape,
                SourceLocation::new(content_start + offset),
                input,
                "invalid escape sequence",
            )
        })?;
        let value = String::from_utf8(bytes).map_err(|err| {
            let offset = content_start + err.utf8_error().valid_up_to();
            SyntaxError::new(
                ErrorKind::StringChar,
                SourceLocation::new(offset),
                input,
                "invalid UTF-8 in string",
            )
        })?;
        Ok(Node::Str(value, token.location()))
    }

    pub fn identifier_literal<'src>(
        input: &'src [u8],
        token: &Token,
    ) -> Result<Node, SyntaxError<'src>> {
        match std::str::from_utf8(token.text(input)) {
            Ok(name) => {
                Ok(Node::Identifier(name.to_string(), token.location()))
            }
            Err(err) => Err(SyntaxError::new(
                ErrorKind::IdentifierSyntax,
                SourceLocation::new(token.start + err.valid_up_to()),
                input,
                "invalid character in identifier",
            )),
        }
    }

    // ===== Predicates =====

    /// Every node is a form; errors live outside the tree.
    pub fn is_form(&self) -> bool {
        true
    }

    pub fn is_atom(&self) -> bool {
        !self.is_list()
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Node::List(_))
    }

    /// An empty list of any kind
    pub fn is_nil(&self) -> bool {
        matches!(self, Node::List(list) if list.is_empty())
    }

    /// A non-empty list of any kind
    pub fn is_pair(&self) -> bool {
        matches!(self, Node::List(list) if !list.is_empty())
    }

    /// A list whose elements are atoms or, recursively, proper lists.
    /// Lists hold their items in a `Vec`, so every list is proper.
    pub fn is_proper_list(&self) -> bool {
        self.is_list()
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Node::True(_))
    }

    pub fn is_false(&self) -> bool {
        matches!(self, Node::False(_))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Node::Integer(..))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Node::Str(..))
    }

    pub fn is_identifier(&self) -> bool {
        matches!(self, Node::Identifier(..))
    }

    pub fn is_kind(&self, kind: ListKind) -> bool {
        matches!(self, Node::List(list) if list.kind() == kind)
    }

    pub fn is_parameters(&self) -> bool {
        self.is_kind(ListKind::Parameters)
    }

    pub fn is_block(&self) -> bool {
        self.is_kind(ListKind::Block)
    }

    pub fn is_application(&self) -> bool {
        self.is_kind(ListKind::Application)
    }

    pub fn is_definition(&self) -> bool {
        self.is_kind(ListKind::Definition)
    }

    pub fn is_let(&self) -> bool {
        self.is_kind(ListKind::Let)
    }

    pub fn is_assignment(&self) -> bool {
        self.is_kind(ListKind::Assignment)
    }

    pub fn is_clause(&self) -> bool {
        self.is_kind(ListKind::Clause)
    }

    pub fn is_cond(&self) -> bool {
        self.is_kind(ListKind::Cond)
    }

    pub fn is_lambda(&self) -> bool {
        self.is_kind(ListKind::Lambda)
    }

    // ===== Accessors =====

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Node::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Node::Identifier(name, _) => Some(name),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Node::Integer(value, _) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(value, _) => Some(value),
            _ => None,
        }
    }

    /// The list inside this node. Halts if it is an atom.
    pub fn expect_list(&self) -> &List {
        match self {
            Node::List(list) => list,
            other => internal_error(&format!(
                "expected a list, found {}",
                other.type_name()
            )),
        }
    }

    /// The name of this identifier. Halts on any other node.
    pub fn expect_identifier(&self) -> &str {
        match self {
            Node::Identifier(name, _) => name,
            other => internal_error(&format!(
                "expected an identifier, found {}",
                other.type_name()
            )),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Node::True(_) => "true",
            Node::False(_) => "false",
            Node::Integer(..) => "Integer",
            Node::Str(..) => "String",
            Node::Identifier(..) => "Identifier",
            Node::List(list) => list.kind().name(),
        }
    }

    /// One-line rendering used by the tree printer.
    pub fn label(&self) -> String {
        match self {
            Node::True(_) => "true".to_string(),
            Node::False(_) => "false".to_string(),
            Node::Integer(value, _) => value.to_string(),
            Node::Str(value, _) => lexer::escape(value),
            Node::Identifier(name, _) => name.clone(),
            Node::List(list) if list.is_empty() => {
                format!("NULL {}", list.kind())
            }
            Node::List(list) => list.kind().name().to_string(),
        }
    }

    // ===== Copying and comparison =====

    /// Copy this node without its children: lists come back empty.
    pub fn shallow_copy(&self) -> Node {
        match self {
            Node::List(list) => {
                Node::List(List::new(list.kind(), list.location()))
            }
            atom => atom.clone(),
        }
    }

    /// Compare type, list kind and atom payload, ignoring children and
    /// locations.
    pub fn same_node(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::True(_), Node::True(_)) | (Node::False(_), Node::False(_)) => {
                true
            }
            (Node::Integer(a, _), Node::Integer(b, _)) => a == b,
            (Node::Str(a, _), Node::Str(b, _)) => a == b,
            (Node::Identifier(a, _), Node::Identifier(b, _)) => a == b,
            (Node::List(a), Node::List(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::List(a), Node::List(b)) => a == b,
            _ => self.same_node(other),
        }
    }
}

impl Eq for Node {}

/// Value of an integer literal (`[+-]?digits`), or `None` outside `i64`.
fn interpret_int(text: &[u8]) -> Option<i64> {
    let (negative, digits) = match text.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, text),
    };
    let magnitude = digits.iter().try_fold(0u64, |acc, &digit| {
        if !digit.is_ascii_digit() {
            return None;
        }
        acc.checked_mul(10)?.checked_add(u64::from(digit - b'0'))
    })?;
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}
