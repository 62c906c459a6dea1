//! # Error Types
//!
//! This module defines the error taxonomy shared by the compiler, the parse
//! driver and the tree reconstructor:
//!
//! - [`CompileError`]: the grammar text could not be turned into rules. No
//!   partial automaton or table is ever exposed when this is returned.
//! - [`ParseError`]: the terminal error descriptor recorded as the last
//!   [`TraceStep`](crate::TraceStep) of a run. Runs never return these as
//!   `Err`; callers inspect the final step instead.
//! - [`TreeError`]: a trace could not be replayed into a derivation tree.
use smartstring::alias::String;
use thiserror::Error;

/// Errors raised while compiling grammar source text.
///
/// # Examples
/// ```rust
/// # use slrtab::{compile, CompileError};
/// assert!(matches!(compile("   \n  "), Err(CompileError::Empty)));
/// assert!(matches!(
///     compile("E E + T\nT"),
///     Err(CompileError::MalformedLine { line: 2, .. })
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The grammar text contains no productions.
    #[error("grammar is empty")]
    Empty,

    /// A production line has fewer than two tokens.
    #[error("line {line}: expected `lhs rhs...`, found {text:?}")]
    MalformedLine {
        /// 1-based line number in the source text.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },

    /// A production uses a name reserved for the end marker.
    #[error("line {line}: symbol {symbol:?} is reserved for the end marker")]
    ReservedSymbol {
        /// 1-based line number in the source text.
        line: usize,
        /// The reserved name as written.
        symbol: String,
    },
}

/// The terminal error descriptor of an unsuccessful run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The table holds at least one conflict cell; nothing was parsed.
    #[error("conflict in parse table")]
    TableConflict,

    /// A sentence token is not a declared terminal.
    #[error("input string is invalid: {token:?} at position {position} is not a terminal")]
    InvalidInput {
        /// The token as written in the sentence.
        token: String,
        /// 0-based index of the token in the sentence.
        position: usize,
    },

    /// No table entry exists for the current state and lookahead.
    #[error("syntax error in state {state} on symbol {lookahead}")]
    Syntax {
        /// State on top of the stack.
        state: usize,
        /// Symbol identity of the lookahead.
        lookahead: usize,
    },
}

/// Errors raised while rebuilding a parse tree from a trace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// The trace does not end in `Accept`.
    #[error("trace did not end in accept")]
    NotAccepted,

    /// The trace contains no reduce step. Runs produced by
    /// [`crate::driver::run`] always reduce to the start symbol before
    /// accepting, so only a hand-built trace ends up here.
    #[error("trace contains no reductions")]
    NoReductions,

    /// A reduce names a rule index the supplied rule list does not have.
    #[error("reduce at step {step} names unknown rule {rule}")]
    UnknownRule {
        /// Index of the offending trace step.
        step: usize,
        /// Rule index of the reduce.
        rule: usize,
    },

    /// A reduce found no childless node labelled with its left-hand side.
    #[error("reduce by rule {rule} at step {step} has no open node to attach to")]
    Unattached {
        /// Index of the offending trace step.
        step: usize,
        /// Rule index of the reduce.
        rule: usize,
    },
}
