//! `let` desugaring
//!
//! A `let` written without a scope block scopes over the rest of its block:
//!
//! ```text
//! {let a = 5; let b = 10; add(a, b)}  =>  {let a = 5 {let b = 10 {add(a, b)}}}
//! let a = 5                          =>  let a = 5 {}
//! ```
//!
//! After [`desugar`], every `Let` has exactly three parts: name, value and
//! scope block. Other forms are copied unchanged, with their children
//! desugared.

use super::ast::{List, ListKind, Node};

/// Rewrite every scopeless `let` in `node` into its three-part form.
pub fn desugar(node: &Node) -> Node {
    match node {
        Node::List(list) => Node::List(match list.kind() {
            ListKind::Let => desugar_let(list, None),
            ListKind::Block => desugar_block(list),
            _ => list.map(desugar),
        }),
        atom => atom.clone(),
    }
}

/// Rebuild a `let`, using `scope` if it has no block of its own.
fn desugar_let(binding: &List, scope: Option<List>) -> List {
    let (name, value, own_scope) = match binding.items() {
        [name, value] => (name, value, None),
        [name, value, block] => (name, value, Some(block)),
        _ => return binding.map(desugar),
    };
    let scope = match (own_scope, scope) {
        (Some(block), _) => desugar(block),
        (None, Some(scope)) => Node::List(scope),
        (None, None) => {
            Node::List(List::new(ListKind::Block, binding.location()))
        }
    };
    List::from_items(
        ListKind::Let,
        binding.location(),
        vec![name.clone(), desugar(value), scope],
    )
}

fn is_scopeless_let(node: &Node) -> bool {
    matches!(
        node,
        Node::List(list) if list.kind() == ListKind::Let && list.len() == 2
    )
}

/// Walk the block from the end, so each scopeless `let` can take the
/// already-built remainder as its scope.
fn desugar_block(block: &List) -> List {
    let mut rest = List::new(ListKind::Block, block.location());
    for item in block.iter().rev() {
        match item {
            Node::List(binding) if is_scopeless_let(item) => {
                rest.reverse();
                let binding = desugar_let(binding, Some(rest));
                rest = List::new(ListKind::Block, block.location());
                rest.push(Node::List(binding));
            }
            _ => rest.push(desugar(item)),
        }
    }
    rest.reverse();
    rest
}
