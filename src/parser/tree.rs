//! Box-drawing display of an AST
//!
//! ```text
//! Application
//! ├── f
//! └── Parameters
//!     ├── x
//!     └── 1
//! ```

use super::ast::Node;
use super::limits::MAX_TREE_DEPTH;
use std::fmt;

/// `Display` adapter returned by [`Node::tree`].
pub struct TreeDisplay<'a> {
    root: &'a Node,
    max_depth: usize,
}

impl Node {
    pub fn tree(&self) -> TreeDisplay<'_> {
        TreeDisplay {
            root: self,
            max_depth: MAX_TREE_DEPTH,
        }
    }
}

impl TreeDisplay<'_> {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        node: &Node,
        depth: usize,
        has_sibling: bool,
        open: &mut Vec<bool>,
    ) -> fmt::Result {
        if depth > self.max_depth {
            return writeln!(f, "MAX TREE DEPTH EXCEEDED");
        }

        // open[i] records whether the ancestor at depth i has more siblings
        for &more in open.iter().skip(1) {
            f.write_str(if more { "│   " } else { "    " })?;
        }
        if depth > 0 {
            f.write_str(if has_sibling { "├── " } else { "└── " })?;
        }
        writeln!(f, "{}", node.label())?;

        if let Node::List(list) = node {
            open.push(has_sibling);
            let last = list.len().saturating_sub(1);
            for (index, child) in list.iter().enumerate() {
                self.write_node(f, child, depth + 1, index < last, open)?;
            }
            open.pop();
        }
        Ok(())
    }
}

impl fmt::Display for TreeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut open = Vec::new();
        self.write_node(f, self.root, 0, false, &mut open)
    }
}
