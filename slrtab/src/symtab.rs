//! # symtab
//!
//! Dense symbol identities for a compiled grammar, built on
//! [`indexmap::IndexMap`].
//!
//! Identities are assigned in insertion order and never reused:
//! `[0, n_nonterm)` are nonterminals (0 is the augmented start symbol),
//! `[n_nonterm, len - 1)` are terminals and `len - 1` is the end marker.
//! The kind of every identity is recorded once, at insertion, so callers
//! classify symbols by lookup instead of comparing ranges.
//!
//! ## Example
//! ```rust
//! # use slrtab::{SymTab, SymbolKind};
//! let mut st = SymTab::new();
//! let start = st.add_nonterminal("S'");
//! let e = st.add_nonterminal("E");
//! let id = st.add_terminal("id");
//! let end = st.add_end();
//! assert_eq!((start, e, id, end), (0, 1, 2, 3));
//! assert_eq!(st.kind(start), Some(SymbolKind::Start));
//! assert!(st.is_terminal(id));
//! assert_eq!(st.lookup("E"), Some(e));
//! ```

use indexmap::{IndexMap, map::Entry};
use smartstring::alias::String;
use std::ops::Range;

/// A symbol identity, dense in `[0, SymTab::len())`.
pub type Symbol = usize;

/// Name of the end-of-input marker.
pub const END_MARKER: &str = "$";

/// Classification of a symbol identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// The augmented start symbol (identity 0).
    Start,
    /// A nonterminal declared by some rule's left-hand side.
    Nonterminal,
    /// A right-hand-side token that is never a left-hand side.
    Terminal,
    /// The end-of-input marker (last identity).
    End,
}

impl SymbolKind {
    /// Returns `true` for [`SymbolKind::Start`] and [`SymbolKind::Nonterminal`].
    pub fn is_nonterminal(self) -> bool {
        matches!(self, SymbolKind::Start | SymbolKind::Nonterminal)
    }
}

/// Maps symbol names to dense identities and records each identity's kind.
#[derive(Debug, Clone, Default)]
pub struct SymTab {
    tab: IndexMap<String, SymbolKind>,
    n_nonterm: usize,
}

impl SymTab {
    /// Creates an empty symbol table.
    pub fn new() -> Self {
        Self {
            tab: IndexMap::new(),
            n_nonterm: 0,
        }
    }

    /// Interns a nonterminal and returns its identity.
    ///
    /// The first nonterminal interned becomes [`SymbolKind::Start`]. All
    /// nonterminals must be interned before any terminal.
    pub fn add_nonterminal(&mut self, name: impl AsRef<str>) -> Symbol {
        let kind = if self.tab.is_empty() {
            SymbolKind::Start
        } else {
            SymbolKind::Nonterminal
        };
        match self.tab.entry(String::from(name.as_ref())) {
            Entry::Occupied(o) => o.index(),
            Entry::Vacant(v) => {
                debug_assert_eq!(v.index(), self.n_nonterm, "nonterminal after terminal");
                self.n_nonterm += 1;
                v.insert_entry(kind).index()
            }
        }
    }

    /// Interns a terminal and returns its identity.
    ///
    /// A name already interned (as any kind) keeps its existing identity.
    pub fn add_terminal(&mut self, name: impl AsRef<str>) -> Symbol {
        match self.tab.entry(String::from(name.as_ref())) {
            Entry::Occupied(o) => o.index(),
            Entry::Vacant(v) => v.insert_entry(SymbolKind::Terminal).index(),
        }
    }

    /// Appends the end marker and returns its identity.
    pub fn add_end(&mut self) -> Symbol {
        match self.tab.entry(String::from(END_MARKER)) {
            Entry::Occupied(o) => o.index(),
            Entry::Vacant(v) => v.insert_entry(SymbolKind::End).index(),
        }
    }

    /// Returns the identity of `name`, if interned.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.tab.get_index_of(name)
    }

    /// Returns the name of `sym`, if it exists.
    pub fn name(&self, sym: Symbol) -> Option<&str> {
        self.tab.get_index(sym).map(|(name, _)| name.as_str())
    }

    /// Returns the kind of `sym`, if it exists.
    pub fn kind(&self, sym: Symbol) -> Option<SymbolKind> {
        self.tab.get_index(sym).map(|(_, kind)| *kind)
    }

    pub fn is_nonterminal(&self, sym: Symbol) -> bool {
        self.kind(sym).is_some_and(SymbolKind::is_nonterminal)
    }

    /// Returns `true` for grammar terminals. The end marker is not one.
    pub fn is_terminal(&self, sym: Symbol) -> bool {
        self.kind(sym) == Some(SymbolKind::Terminal)
    }

    /// Total number of identities, end marker included.
    pub fn len(&self) -> usize {
        self.tab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tab.is_empty()
    }

    /// Number of nonterminals, the augmented start symbol included.
    pub fn count_nonterminals(&self) -> usize {
        self.n_nonterm
    }

    /// Identity of the end marker.
    ///
    /// Only meaningful once [`SymTab::add_end`] has been called.
    pub fn end(&self) -> Symbol {
        self.tab.len().saturating_sub(1)
    }

    /// Nonterminal identities.
    pub fn nonterminals(&self) -> Range<Symbol> {
        0..self.n_nonterm
    }

    /// Terminal identities, end marker excluded.
    pub fn terminals(&self) -> Range<Symbol> {
        self.n_nonterm..self.end()
    }

    /// Iterates over `(identity, name, kind)` in identity order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str, SymbolKind)> {
        self.tab
            .iter()
            .enumerate()
            .map(|(i, (name, kind))| (i, name.as_str(), *kind))
    }

    /// Display name of `sym`, or `$<sym>` for an unknown identity.
    pub(crate) fn label(&self, sym: Symbol) -> std::borrow::Cow<'_, str> {
        match self.name(sym) {
            Some(name) => name.into(),
            None => format!("${}", sym).into(),
        }
    }
}
