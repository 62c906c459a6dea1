//! # Parse Tree Reconstruction
//!
//! Rebuilds the derivation tree of an accepted run from its reduce steps.
//!
//! The reduces of a shift-reduce run form a reverse rightmost derivation.
//! Replaying them in *reverse* execution order therefore expands the tree
//! outside-in:
//!
//! - The first reduce seen creates the root, labelled with its left-hand
//!   side, and immediately expands it.
//! - Every later reduce expands the first node found by a depth-first
//!   search that visits children **right to left**, whose symbol equals the
//!   rule's left-hand side and which has no children yet. The node gets one
//!   childless child per right-hand symbol, left to right.
//!
//! Visiting children right to left is what makes "first open match" pick
//! the rightmost unexpanded nonterminal, which is the one a rightmost
//! derivation expands next. A reduce with no open match can only come from
//! a malformed trace and is reported as [`TreeError::Unattached`].

use crate::driver::Trace;
use crate::error::TreeError;
use crate::grammar::Rule;
use crate::symtab::Symbol;

/// A node of the derivation tree. Leaves are terminals.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParseTreeNode {
    pub symbol: Symbol,
    pub children: Vec<ParseTreeNode>,
}

impl ParseTreeNode {
    pub fn leaf(symbol: Symbol) -> Self {
        Self {
            symbol,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Leaf symbols, left to right.
    pub fn leaves(&self) -> Vec<Symbol> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves(&self, out: &mut Vec<Symbol>) {
        if self.is_leaf() {
            out.push(self.symbol);
        }
        for child in &self.children {
            child.collect_leaves(out);
        }
    }

    /// Expands the first open node labelled `rule.lhs`, searching children
    /// right to left. Returns `false` if there is none.
    fn attach(&mut self, rule: &Rule) -> bool {
        if self.symbol == rule.lhs && self.children.is_empty() {
            self.children = rule.rhs.iter().copied().map(ParseTreeNode::leaf).collect();
            return true;
        }
        self.children.iter_mut().rev().any(|child| child.attach(rule))
    }
}

/// Rebuilds the tree of an accepted run.
///
/// # Errors
/// - [`TreeError::NotAccepted`] if the trace does not end in `Accept`.
/// - [`TreeError::NoReductions`] if there is nothing to replay.
/// - [`TreeError::UnknownRule`] if a reduce names a rule outside `rules`.
/// - [`TreeError::Unattached`] if a reduce has no open node to expand.
pub fn try_reconstruct_tree(trace: &Trace, rules: &[Rule]) -> Result<ParseTreeNode, TreeError> {
    if !trace.is_accepted() {
        return Err(TreeError::NotAccepted);
    }
    let mut root: Option<ParseTreeNode> = None;
    for (step, r) in trace.reductions().rev() {
        let Some(rule) = rules.get(r) else {
            return Err(TreeError::UnknownRule { step, rule: r });
        };
        let node = root.get_or_insert_with(|| ParseTreeNode::leaf(rule.lhs));
        if !node.attach(rule) {
            return Err(TreeError::Unattached { step, rule: r });
        }
    }
    root.ok_or(TreeError::NoReductions)
}

/// Rebuilds the tree of an accepted run, or `None` if it cannot be built.
pub fn reconstruct_tree(trace: &Trace, rules: &[Rule]) -> Option<ParseTreeNode> {
    match try_reconstruct_tree(trace, rules) {
        Ok(tree) => Some(tree),
        Err(err) => {
            log::debug!("no parse tree: {}", err);
            None
        }
    }
}
