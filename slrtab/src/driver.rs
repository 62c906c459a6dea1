//! Shift-reduce driver.
//!
//! Runs a compiled [`ParseTable`] against a whitespace-separated sentence
//! and records every configuration in a [`Trace`]. Each [`TraceStep`] holds
//! the stack and remaining input as they were *before* its action ran.
//! Errors never escape as `Err`: a failed run ends with a step whose action
//! is [`TraceAction::Error`].

use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::symtab::Symbol;
use crate::table::{Action, ParseTable};
use smartstring::alias::String;
use std::fmt;

/// One element of the parse stack.
///
/// The stack alternates states and symbols, starting and ending with a
/// state: `0 X1 s1 X2 s2 ...`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StackEntry {
    State(usize),
    Symbol(Symbol),
}

/// What a trace step did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceAction {
    Shift(usize),
    Reduce(usize),
    Accept,
    /// The run stopped here.
    Error(ParseError),
}

impl fmt::Display for TraceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceAction::Shift(s) => write!(f, "s{}", s),
            TraceAction::Reduce(r) => write!(f, "r{}", r),
            TraceAction::Accept => write!(f, "A"),
            TraceAction::Error(err) => write!(f, "Error: {}", err),
        }
    }
}

impl From<ParseError> for TraceAction {
    fn from(err: ParseError) -> Self {
        TraceAction::Error(err)
    }
}

/// A configuration of the driver and the action taken from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceStep {
    pub stack: Vec<StackEntry>,
    pub input: Vec<Symbol>,
    pub action: TraceAction,
}

/// Driver states. Every state but `Running` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    Running,
    Accepted,
    SyntaxError,
    InvalidInput,
    TableConflict,
}

/// The complete record of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trace {
    steps: Vec<TraceStep>,
    state: RunState,
}

impl Trace {
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    /// The terminal state the run stopped in.
    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_accepted(&self) -> bool {
        self.state == RunState::Accepted
    }

    pub fn last(&self) -> Option<&TraceStep> {
        self.steps.last()
    }

    /// The error descriptor of the final step, if the run failed.
    pub fn error(&self) -> Option<&ParseError> {
        match self.last().map(|s| &s.action) {
            Some(TraceAction::Error(err)) => Some(err),
            _ => None,
        }
    }

    /// Reduce steps as `(step index, rule index)`, in execution order.
    pub fn reductions(&self) -> impl DoubleEndedIterator<Item = (usize, usize)> + '_ {
        self.steps
            .iter()
            .enumerate()
            .filter_map(|(i, s)| match s.action {
                TraceAction::Reduce(r) => Some((i, r)),
                _ => None,
            })
    }

    /// Builds a trace from recorded steps, for replaying hand-made runs.
    #[cfg(test)]
    pub(crate) fn from_steps(steps: Vec<TraceStep>, state: RunState) -> Self {
        Self { steps, state }
    }

    fn push(&mut self, stack: &[StackEntry], input: &[Symbol], action: TraceAction) {
        self.steps.push(TraceStep {
            stack: stack.to_vec(),
            input: input.to_vec(),
            action,
        });
    }

    fn stop(mut self, err: ParseError) -> Self {
        self.state = match err {
            ParseError::TableConflict => RunState::TableConflict,
            ParseError::InvalidInput { .. } => RunState::InvalidInput,
            ParseError::Syntax { .. } => RunState::SyntaxError,
        };
        self
    }
}

/// Maps sentence tokens to terminal identities and appends the end marker.
///
/// # Errors
/// [`ParseError::InvalidInput`] for the first token that is not a declared
/// terminal (unknown names, nonterminals and the end marker itself).
pub fn tokenize(grammar: &Grammar, sentence: &str) -> Result<Vec<Symbol>, ParseError> {
    let symbols = grammar.symbols();
    let mut out = Vec::new();
    for (position, tok) in sentence.split_whitespace().enumerate() {
        match symbols.lookup(tok) {
            Some(sym) if symbols.is_terminal(sym) => out.push(sym),
            _ => {
                return Err(ParseError::InvalidInput {
                    token: String::from(tok),
                    position,
                });
            }
        }
    }
    out.push(grammar.end());
    Ok(out)
}

/// Runs `table` over `sentence`.
///
/// # Panics
/// If a reduce finds no goto entry. That cannot happen for a conflict-free
/// table built by [`ParseTable::build`].
pub fn run(grammar: &Grammar, table: &ParseTable, sentence: &str) -> Trace {
    let mut trace = Trace {
        steps: Vec::new(),
        state: RunState::Running,
    };

    if table.has_conflict() {
        let err = ParseError::TableConflict;
        trace.push(&[], &[], err.clone().into());
        return trace.stop(err);
    }

    let input = match tokenize(grammar, sentence) {
        Ok(input) => input,
        Err(err) => {
            trace.push(&[], &[], err.clone().into());
            return trace.stop(err);
        }
    };

    let mut stack = vec![StackEntry::State(0)];
    let mut pos = 0;
    loop {
        let state = top_state(&stack);
        let lookahead = input[pos];
        if log::log_enabled!(log::Level::Trace) {
            dump_state(grammar, &stack, &input[pos..]);
        }

        let Some(action) = table.action(state, lookahead) else {
            let err = ParseError::Syntax { state, lookahead };
            trace.push(&stack, &input[pos..], err.clone().into());
            return trace.stop(err);
        };

        match *action {
            Action::Shift(next) => {
                log::trace!("Shift {}", next);
                trace.push(&stack, &input[pos..], TraceAction::Shift(next));
                stack.push(StackEntry::Symbol(lookahead));
                stack.push(StackEntry::State(next));
                pos += 1;
            }

            Action::Reduce(r) => {
                log::trace!("Reduce {}", r);
                trace.push(&stack, &input[pos..], TraceAction::Reduce(r));
                let rule = &grammar.rules()[r];
                stack.truncate(stack.len() - 2 * rule.rhs.len());
                let from = top_state(&stack);
                let Some(next) = table.goto(from, rule.lhs) else {
                    unreachable!("no goto from state {} on symbol {}", from, rule.lhs);
                };
                stack.push(StackEntry::Symbol(rule.lhs));
                stack.push(StackEntry::State(next));
            }

            Action::Accept => {
                log::trace!("Accept");
                trace.push(&stack, &input[pos..], TraceAction::Accept);
                trace.state = RunState::Accepted;
                return trace;
            }

            Action::Conflict(_) => unreachable!("conflict cell in a conflict-free table"),
        }
    }
}

fn top_state(stack: &[StackEntry]) -> usize {
    match stack.last() {
        Some(StackEntry::State(s)) => *s,
        other => unreachable!("stack top is {:?}, expected a state", other),
    }
}

fn dump_state(grammar: &Grammar, stack: &[StackEntry], input: &[Symbol]) {
    let symbols = grammar.symbols();
    let mut output = std::string::String::new();
    for entry in stack {
        match entry {
            StackEntry::State(s) => output.push_str(&format!("<{}> ", s)),
            StackEntry::Symbol(sym) => output.push_str(&format!("{} ", symbols.label(*sym))),
        }
    }
    output.push_str(" <-  ");
    for &sym in input {
        output.push_str(&format!("{} ", symbols.label(sym)));
    }
    log::trace!("{}", output);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Collection;

    const EXPR: &str = "E E + T\nE T\nT T * F\nT F\nF ( E )\nF id";

    fn compile(text: &str) -> (Grammar, ParseTable) {
        let g = Grammar::parse(text).unwrap();
        let c = Collection::build(&g);
        let t = ParseTable::build(&g, &c);
        (g, t)
    }

    #[test]
    fn tokenize_appends_end_marker() {
        let (g, _) = compile(EXPR);
        let toks = tokenize(&g, "  id *\tid ").unwrap();
        let id = g.symbols().lookup("id").unwrap();
        let star = g.symbols().lookup("*").unwrap();
        assert_eq!(toks, vec![id, star, id, g.end()]);
        assert_eq!(tokenize(&g, "").unwrap(), vec![g.end()]);
    }

    #[test]
    fn tokenize_rejects_non_terminals() {
        let (g, _) = compile(EXPR);
        for (sentence, bad, at) in [("id @ id", "@", 1), ("E + id", "E", 0), ("id $", "$", 1)] {
            assert_eq!(
                tokenize(&g, sentence).unwrap_err(),
                ParseError::InvalidInput {
                    token: bad.into(),
                    position: at
                }
            );
        }
    }

    #[test]
    fn accepts_and_records_every_step() {
        let (g, t) = compile(EXPR);
        let trace = run(&g, &t, "id * id + id");
        assert_eq!(trace.state(), RunState::Accepted);
        assert!(trace.is_accepted());
        assert_eq!(trace.error(), None);
        let steps = trace.steps();
        assert_eq!(steps.first().unwrap().stack, vec![StackEntry::State(0)]);
        assert_eq!(steps.first().unwrap().input.len(), 6);
        assert!(matches!(steps.first().unwrap().action, TraceAction::Shift(_)));
        let last = trace.last().unwrap();
        assert_eq!(last.action, TraceAction::Accept);
        assert_eq!(last.input, vec![g.end()]);
        // 5 shifts, 8 reductions, 1 accept
        let shifts = steps
            .iter()
            .filter(|s| matches!(s.action, TraceAction::Shift(_)))
            .count();
        assert_eq!(shifts, 5);
        assert_eq!(trace.reductions().count(), 8);
        assert_eq!(steps.len(), 14);
    }

    #[test]
    fn snapshots_precede_the_action() {
        let (g, t) = compile(EXPR);
        let trace = run(&g, &t, "id");
        let steps = trace.steps();
        // After shifting `id`, the next step sees `0 id s` on the stack.
        let TraceAction::Shift(s) = steps[0].action else {
            panic!("expected shift");
        };
        let id = g.symbols().lookup("id").unwrap();
        assert_eq!(
            steps[1].stack,
            vec![StackEntry::State(0), StackEntry::Symbol(id), StackEntry::State(s)]
        );
        assert_eq!(steps[1].input, vec![g.end()]);
        assert_eq!(steps[1].action, TraceAction::Reduce(6));
    }

    #[test]
    fn syntax_error_is_the_last_step() {
        let (g, t) = compile(EXPR);
        let trace = run(&g, &t, "id + + id");
        assert_eq!(trace.state(), RunState::SyntaxError);
        let plus = g.symbols().lookup("+").unwrap();
        assert!(matches!(
            trace.error(),
            Some(ParseError::Syntax { lookahead, .. }) if *lookahead == plus
        ));
        assert!(!trace.last().unwrap().stack.is_empty());
    }

    #[test]
    fn empty_sentence_is_a_syntax_error() {
        let (g, t) = compile(EXPR);
        let trace = run(&g, &t, "   ");
        assert_eq!(trace.state(), RunState::SyntaxError);
        assert_eq!(trace.steps().len(), 1);
        assert_eq!(
            trace.error(),
            Some(&ParseError::Syntax {
                state: 0,
                lookahead: g.end()
            })
        );
    }

    #[test]
    fn invalid_input_short_circuits() {
        let (g, t) = compile(EXPR);
        let trace = run(&g, &t, "id @ id");
        assert_eq!(trace.state(), RunState::InvalidInput);
        assert_eq!(trace.steps().len(), 1);
        let step = &trace.steps()[0];
        assert!(step.stack.is_empty());
        assert!(step.input.is_empty());
        assert!(matches!(step.action, TraceAction::Error(ParseError::InvalidInput { .. })));
    }

    #[test]
    fn conflicting_table_refuses_to_run() {
        let (g, t) = compile("E E + E\nE id");
        assert!(t.has_conflict());
        let trace = run(&g, &t, "id + id");
        assert_eq!(trace.state(), RunState::TableConflict);
        assert_eq!(
            trace.steps(),
            &[TraceStep {
                stack: vec![],
                input: vec![],
                action: TraceAction::Error(ParseError::TableConflict),
            }]
        );
    }
}
