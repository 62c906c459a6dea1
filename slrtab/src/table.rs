//! SLR(1) action/goto table construction.
//!
//! Shift and goto entries come from the LR(0) automaton; reduce entries are
//! placed on the FOLLOW set of the completed rule's left-hand side. Cells
//! that receive more than one distinct action become [`Action::Conflict`]
//! and the table's conflict flag is raised. A table with conflicts is still
//! fully built so that it can be inspected.

use crate::automaton::{Collection, goto};
use crate::first_follow::follow;
use crate::grammar::Grammar;
use crate::symtab::Symbol;
use std::fmt;

/// A parser action stored in a terminal (or end-marker) column.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Push the lookahead and go to the given state.
    Shift(usize),
    /// Reduce by the rule with the given index.
    Reduce(usize),
    /// Accept the input.
    Accept,
    /// Every distinct action derived for this cell, in first-seen order.
    Conflict(Vec<Action>),
}

impl Action {
    /// Action equality used when filling the table.
    ///
    /// Two `Accept`s are always equal; shifts and reduces are equal when the
    /// variant and target agree; anything compared with a `Conflict` is
    /// unequal.
    pub fn same_as(&self, other: &Action) -> bool {
        match (self, other) {
            (Action::Conflict(_), _) | (_, Action::Conflict(_)) => false,
            (Action::Accept, Action::Accept) => true,
            (Action::Shift(a), Action::Shift(b)) => a == b,
            (Action::Reduce(a), Action::Reduce(b)) => a == b,
            _ => false,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Action::Conflict(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(s) => write!(f, "s{}", s),
            Action::Reduce(r) => write!(f, "r{}", r),
            Action::Accept => write!(f, "A"),
            Action::Conflict(actions) => {
                for (i, a) in actions.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", a)?;
                }
                Ok(())
            }
        }
    }
}

/// Combines the current content of a cell with a newly derived action.
///
/// An empty cell takes `new`. A conflict cell gains `new` unless an equal
/// action (per [`Action::same_as`]) is already listed. A single action
/// equal to `new` is kept; otherwise the cell becomes
/// `Conflict([existing, new])`.
pub fn merge(existing: Option<Action>, new: Action) -> Action {
    match existing {
        None => new,
        Some(Action::Conflict(mut actions)) => {
            if !actions.iter().any(|a| a.same_as(&new)) {
                actions.push(new);
            }
            Action::Conflict(actions)
        }
        Some(old) if old.same_as(&new) => old,
        Some(old) => Action::Conflict(vec![old, new]),
    }
}

/// An SLR(1) parse table.
///
/// - **Actions** are indexed by state and by terminal or end-marker symbol.
/// - **Gotos** are indexed by state and nonterminal.
///
/// Absent entries mean a syntax error on that pair.
#[derive(Clone, Debug)]
pub struct ParseTable {
    n_nonterm: usize,
    actions: Vec<Vec<Option<Action>>>,
    gotos: Vec<Vec<Option<usize>>>,
    has_conflict: bool,
}

impl ParseTable {
    /// Constructs the table from the canonical collection.
    ///
    /// - For every state and every symbol but the end marker, the goto
    ///   target becomes a goto entry (nonterminals) or a shift (terminals).
    /// - For every completed item, a reduce is placed on each terminal of
    ///   FOLLOW(lhs); the completed augmenting rule places `Accept` on the
    ///   end marker instead.
    ///
    /// Every placement goes through [`merge`], so a cell claimed twice turns
    /// into [`Action::Conflict`] instead of being overwritten.
    ///
    /// # Parameters
    /// - `grammar`: The augmented grammar the collection was built from.
    /// - `collection`: The canonical LR(0) collection of `grammar`.
    ///
    /// # Returns
    /// A table with one row per state. [`ParseTable::has_conflict`] is set
    /// iff at least one action cell holds more than one action.
    pub fn build(grammar: &Grammar, collection: &Collection) -> Self {
        let n_states = collection.len();
        let n_nonterm = grammar.count_nonterminals();
        let n_sym = grammar.symbols().len();
        let end = grammar.end();
        let mut tab = Self {
            n_nonterm,
            actions: vec![vec![None; n_sym - n_nonterm]; n_states],
            gotos: vec![vec![None; n_nonterm]; n_states],
            has_conflict: false,
        };

        for (state, items) in collection.states().iter().enumerate() {
            for sym in 0..end {
                let Some(next) = collection.find(&goto(grammar, items, sym)) else {
                    continue;
                };
                if sym < n_nonterm {
                    tab.gotos[state][sym] = Some(next);
                } else {
                    tab.set(state, sym, Action::Shift(next));
                }
            }

            for item in items.iter().filter(|it| it.is_complete(grammar.rules())) {
                let lhs = grammar.rules()[item.rule].lhs;
                for t in follow(grammar, lhs) {
                    if item.rule == 0 {
                        tab.set(state, end, Action::Accept);
                    } else {
                        tab.set(state, t, Action::Reduce(item.rule));
                    }
                }
            }
        }

        log::debug!(
            "SLR(1) table: {} states, {} conflict cells",
            n_states,
            tab.conflicts().count()
        );
        tab
    }

    fn set(&mut self, state: usize, sym: Symbol, action: Action) {
        let cell = &mut self.actions[state][sym - self.n_nonterm];
        let merged = merge(cell.take(), action);
        if merged.is_conflict() {
            self.has_conflict = true;
        }
        *cell = Some(merged);
    }

    /// The action at `(state, sym)` for a terminal or the end marker.
    pub fn action(&self, state: usize, sym: Symbol) -> Option<&Action> {
        let col = sym.checked_sub(self.n_nonterm)?;
        self.actions.get(state)?.get(col)?.as_ref()
    }

    /// The goto target at `(state, nt)` for a nonterminal.
    pub fn goto(&self, state: usize, nt: Symbol) -> Option<usize> {
        *self.gotos.get(state)?.get(nt)?
    }

    /// Returns `true` if any cell holds a conflict.
    pub fn has_conflict(&self) -> bool {
        self.has_conflict
    }

    pub fn n_states(&self) -> usize {
        self.actions.len()
    }

    /// Iterates over conflict cells as `(state, symbol, actions)`.
    pub fn conflicts(&self) -> impl Iterator<Item = (usize, Symbol, &[Action])> {
        self.actions.iter().enumerate().flat_map(move |(state, row)| {
            row.iter().enumerate().filter_map(move |(col, cell)| match cell {
                Some(Action::Conflict(actions)) => {
                    Some((state, col + self.n_nonterm, actions.as_slice()))
                }
                _ => None,
            })
        })
    }
}
