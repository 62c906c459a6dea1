//! Copyright (c) 2005–2025 IKH Software, Inc.
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! SLR(1) parser construction and table-driven parsing.
//!
//! `slrtab` compiles a context-free grammar, written one production per
//! line as `lhs rhs1 rhs2 ...`, into an LR(0) automaton with SLR(1)
//! reduce placement, then drives the resulting table over a sentence:
//!
//!  * [`compile`]: grammar text → [`CompiledGrammar`] (rules, symbol table,
//!    item-set collection, action/goto table, conflict flag)
//!  * [`run`]: compiled grammar + sentence → [`Trace`] of every
//!    configuration and action
//!  * [`reconstruct_tree`]: accepted trace → [`ParseTreeNode`]
//!
//! [`Session`] keeps one compiled grammar and its latest trace together.
//! The [`report`] module writes each artifact as plain text.
//!
//! Grammars must not contain empty productions.
//!
//! # Example
//! ```rust
//! use slrtab::{TraceAction, compile, reconstruct_tree, run};
//!
//! let compiled = compile("S a S\nS b").unwrap();
//! assert!(!compiled.has_conflict());
//! let trace = run(&compiled, "a a b");
//! assert_eq!(trace.last().unwrap().action, TraceAction::Accept);
//! let tree = reconstruct_tree(&trace, compiled.rules()).unwrap();
//! assert_eq!(tree.leaves().len(), 3);
//! ```

pub mod automaton;
pub mod driver;
pub mod error;
pub mod first_follow;
pub mod grammar;
pub mod report;
pub mod session;
pub mod symtab;
pub mod table;
pub mod tree;

pub use automaton::{Collection, Item, ItemSet};
pub use driver::{RunState, StackEntry, Trace, TraceAction, TraceStep};
pub use error::{CompileError, ParseError, TreeError};
pub use grammar::{Grammar, Rule};
pub use session::{CompiledGrammar, Session, compile, run};
pub use symtab::{END_MARKER, SymTab, Symbol, SymbolKind};
pub use table::{Action, ParseTable};
pub use tree::{ParseTreeNode, reconstruct_tree, try_reconstruct_tree};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
pub struct ReadmeDoctests;
