//! # Session
//!
//! Entry points tying the pipeline together:
//!
//! - [`compile`]: grammar text → [`CompiledGrammar`] (rules, symbols,
//!   collection, table).
//! - [`run`]: compiled grammar + sentence → [`Trace`].
//! - [`Session`]: one owned "current session" holding the compiled grammar
//!   and the latest trace. Recompiling replaces everything at once; running
//!   only replaces the trace.
//!
//! ## Example
//! ```rust
//! use slrtab::{Session, reconstruct_tree};
//!
//! let mut session = Session::new();
//! session
//!     .compile("E E + T\nE T\nT T * F\nT F\nF ( E )\nF id")
//!     .unwrap();
//! let trace = session.run("id * id + id").unwrap();
//! assert!(trace.is_accepted());
//!
//! let tree = session.tree().unwrap();
//! let e = session.compiled().unwrap().symbols().lookup("E").unwrap();
//! assert_eq!(tree.symbol, e);
//! assert_eq!(tree.children.len(), 3);
//! ```

use crate::automaton::Collection;
use crate::driver::{self, Trace};
use crate::error::CompileError;
use crate::grammar::{Grammar, Rule};
use crate::symtab::SymTab;
use crate::table::ParseTable;
use crate::tree::{ParseTreeNode, reconstruct_tree};

/// Everything derived from one grammar text.
#[derive(Clone, Debug)]
pub struct CompiledGrammar {
    grammar: Grammar,
    collection: Collection,
    table: ParseTable,
}

impl CompiledGrammar {
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn rules(&self) -> &[Rule] {
        self.grammar.rules()
    }

    pub fn symbols(&self) -> &SymTab {
        self.grammar.symbols()
    }

    pub fn count_nonterminals(&self) -> usize {
        self.grammar.count_nonterminals()
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn table(&self) -> &ParseTable {
        &self.table
    }

    pub fn has_conflict(&self) -> bool {
        self.table.has_conflict()
    }
}

/// Compiles grammar text into rules, automaton and table.
///
/// A table with conflicts is still returned; it only refuses to [`run`].
pub fn compile(text: &str) -> Result<CompiledGrammar, CompileError> {
    let grammar = Grammar::parse(text)?;
    let collection = Collection::build(&grammar);
    let table = ParseTable::build(&grammar, &collection);
    Ok(CompiledGrammar {
        grammar,
        collection,
        table,
    })
}

/// Runs a compiled grammar's table over `sentence`.
pub fn run(compiled: &CompiledGrammar, sentence: &str) -> Trace {
    driver::run(&compiled.grammar, &compiled.table, sentence)
}

/// The current compiled grammar and the latest trace run against it.
#[derive(Debug, Default)]
pub struct Session {
    compiled: Option<CompiledGrammar>,
    trace: Option<Trace>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole session with a freshly compiled grammar.
    ///
    /// The new grammar is built completely before anything is replaced. On
    /// error the session is left empty.
    pub fn compile(&mut self, text: &str) -> Result<&CompiledGrammar, CompileError> {
        let result = compile(text);
        self.clear();
        let compiled = result?;
        Ok(self.compiled.insert(compiled))
    }

    /// Runs the current grammar over `sentence`, replacing the trace.
    ///
    /// Returns `None` (and records nothing) if no grammar is compiled.
    pub fn run(&mut self, sentence: &str) -> Option<&Trace> {
        let compiled = self.compiled.as_ref()?;
        let trace = run(compiled, sentence);
        Some(self.trace.insert(trace))
    }

    pub fn compiled(&self) -> Option<&CompiledGrammar> {
        self.compiled.as_ref()
    }

    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// Parse tree of the latest trace, if it was accepted.
    pub fn tree(&self) -> Option<ParseTreeNode> {
        let compiled = self.compiled.as_ref()?;
        reconstruct_tree(self.trace.as_ref()?, compiled.rules())
    }

    /// Discards the grammar and the trace.
    pub fn clear(&mut self) {
        self.compiled = None;
        self.trace = None;
    }

    /// Discards only the trace.
    pub fn clear_parsing(&mut self) {
        self.trace = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::RunState;

    const EXPR: &str = "E E + T\nE T\nT T * F\nT F\nF ( E )\nF id";

    #[test]
    fn compile_exposes_all_artifacts() {
        let c = compile(EXPR).unwrap();
        assert_eq!(c.rules().len(), 7);
        assert_eq!(c.count_nonterminals(), 4);
        assert_eq!(c.symbols().len(), 10);
        assert_eq!(c.collection().len(), 12);
        assert_eq!(c.table().n_states(), 12);
        assert!(!c.has_conflict());
    }

    #[test]
    fn run_without_grammar_records_nothing() {
        let mut s = Session::new();
        assert!(s.run("id").is_none());
        assert!(s.trace().is_none());
        assert!(s.tree().is_none());
    }

    #[test]
    fn rerun_replaces_only_the_trace() {
        let mut s = Session::new();
        s.compile(EXPR).unwrap();
        assert_eq!(s.run("id + id").unwrap().state(), RunState::Accepted);
        assert_eq!(s.run("id +").unwrap().state(), RunState::SyntaxError);
        assert!(s.compiled().is_some());
        assert!(s.tree().is_none());
        s.clear_parsing();
        assert!(s.trace().is_none());
        assert!(s.compiled().is_some());
    }

    #[test]
    fn recompile_discards_previous_session() {
        let mut s = Session::new();
        s.compile(EXPR).unwrap();
        s.run("id").unwrap();
        let c = s.compile("S a").unwrap();
        assert_eq!(c.rules().len(), 2);
        assert!(s.trace().is_none());
        assert!(s.compile("").is_err());
        assert!(s.compiled().is_none());
    }

    #[test]
    fn clear_empties_everything() {
        let mut s = Session::new();
        s.compile(EXPR).unwrap();
        s.run("id").unwrap();
        s.clear();
        assert!(s.compiled().is_none());
        assert!(s.trace().is_none());
    }
}
