// This module defines LR(0) item machinery: closure, goto and the
// canonical collection of item sets.

use crate::grammar::{Grammar, Rule};
use crate::symtab::Symbol;
use indexmap::IndexSet;

/// Represents an LR(0) item consisting of a rule index and a dot position.
///
/// For example, if rule `E → E + T` is partially recognized as
/// `E → E • + T`, the `Item` stores the index of `E → E + T` and dot `1`.
/// Items never carry lookahead.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Item {
    /// The index of the rule in the grammar.
    pub rule: usize,

    /// The position of the dot within the rule's right-hand side, in
    /// `[0, rhs.len()]`.
    pub dot: usize,
}

impl Item {
    /// The symbol immediately after the dot, or `None` if the dot is at the end.
    pub fn next_symbol(&self, rules: &[Rule]) -> Option<Symbol> {
        rules[self.rule].rhs.get(self.dot).copied()
    }

    /// Returns `true` if the dot is past the last right-hand symbol.
    pub fn is_complete(&self, rules: &[Rule]) -> bool {
        self.dot == rules[self.rule].rhs.len()
    }
}

/// An insertion-ordered, duplicate-free set of items.
///
/// Equality is set equality: same cardinality and every item of one set is
/// present in the other. Insertion order only affects reporting.
#[derive(Clone, Debug, Default)]
pub struct ItemSet {
    items: IndexSet<Item>,
}

impl ItemSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `item`, returning `false` if it was already present.
    pub fn insert(&mut self, item: Item) -> bool {
        self.items.insert(item)
    }

    pub fn contains(&self, item: &Item) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }
}

impl PartialEq for ItemSet {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len() && self.items.iter().all(|i| other.contains(i))
    }
}

impl Eq for ItemSet {}

impl FromIterator<Item> for ItemSet {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ItemSet {
    type Item = &'a Item;
    type IntoIter = indexmap::set::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Computes the LR(0) *closure* of a set of items.
///
/// Scans items in order (including the ones it appends); for every item
/// whose next symbol is a nonterminal, appends `{rule, dot: 0}` for each
/// rule of that nonterminal in declaration order, skipping items already
/// present. Stops when a full scan adds nothing.
///
/// # Parameters
/// - `grammar`: The augmented grammar supplying rules and symbol kinds.
/// - `seed`: The kernel items to close over. Their order is kept.
///
/// # Returns
/// The closed set: `seed` followed by the items it introduced, in discovery
/// order.
///
/// # Example
/// ```text
/// Given the item `S' → • S`
/// and rules `S → A`, `A → a`,
/// the closure adds `S → • A` and then `A → • a`.
/// ```
pub fn closure(grammar: &Grammar, seed: ItemSet) -> ItemSet {
    let rules = grammar.rules();
    let mut c = seed;
    let mut i = 0;
    while i < c.len() {
        let item = c.items[i];
        i += 1;
        let Some(sym) = item.next_symbol(rules) else {
            continue;
        };
        if !grammar.symbols().is_nonterminal(sym) {
            continue;
        }
        for rule in grammar.rules_for(sym) {
            c.insert(Item {
                rule: rule.index,
                dot: 0,
            });
        }
    }
    c
}

/// Computes the LR(0) *goto* function for a given item set and symbol.
///
/// Advances the dot past `sym` in every item where `sym` is next, then
/// returns the closure of the result.
///
/// # Parameters
/// - `grammar`: The augmented grammar.
/// - `items`: The source state.
/// - `sym`: The symbol to transition on, terminal or nonterminal.
///
/// # Returns
/// The closed target set. An empty set means `items` has no transition on
/// `sym`.
///
/// # Example
/// From a state holding `E → E • + T`, the goto on `+` contains
/// `E → E + • T` followed by the `T` and `F` items its closure adds.
pub fn goto(grammar: &Grammar, items: &ItemSet, sym: Symbol) -> ItemSet {
    let rules = grammar.rules();
    let moved = items
        .iter()
        .filter(|item| item.next_symbol(rules) == Some(sym))
        .map(|item| Item {
            rule: item.rule,
            dot: item.dot + 1,
        })
        .collect();
    closure(grammar, moved)
}

/// The canonical collection of LR(0) item sets.
///
/// The position of a set in the collection is its parser state; state 0 is
/// the closure of `{S' → • S}`.
#[derive(Clone, Debug, Default)]
pub struct Collection {
    states: Vec<ItemSet>,
}

impl Collection {
    /// Builds the canonical collection.
    ///
    /// For every state (including states appended during the scan) and every
    /// symbol except the end marker, computes `goto`; a non-empty result not
    /// set-equal to an existing state becomes a new state. The item universe
    /// is finite, so this terminates.
    ///
    /// # Parameters
    /// - `grammar`: The augmented grammar. Rule 0 must be `S' → start`.
    ///
    /// # Returns
    /// The collection in discovery order. State 0 is the closure of
    /// `S' → • start`.
    pub fn build(grammar: &Grammar) -> Self {
        let start = ItemSet::from_iter([Item { rule: 0, dot: 0 }]);
        let mut states = vec![closure(grammar, start)];
        let end = grammar.end();
        let mut i = 0;
        while i < states.len() {
            for sym in 0..end {
                let nxt = goto(grammar, &states[i], sym);
                if !nxt.is_empty() && !states.contains(&nxt) {
                    states.push(nxt);
                }
            }
            i += 1;
        }
        log::debug!("LR(0) collection has {} states", states.len());
        Self { states }
    }

    /// Finds the state set-equal to `target`.
    pub fn find(&self, target: &ItemSet) -> Option<usize> {
        if target.is_empty() {
            return None;
        }
        self.states.iter().position(|st| st == target)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The item set of `state`, or `None` if out of range.
    pub fn get(&self, state: usize) -> Option<&ItemSet> {
        self.states.get(state)
    }

    pub fn states(&self) -> &[ItemSet] {
        &self.states
    }
}
