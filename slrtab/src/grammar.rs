//! # Grammar Compiler
//!
//! Turns rule source text into an augmented [`Grammar`].
//!
//! The text holds one production per line, written as space-separated
//! tokens `lhs rhs1 rhs2 ...`. Blank lines are skipped. The left-hand side
//! of the first production is the declared start symbol; a synthetic rule
//! `S' → start` is prepended as rule 0.
//!
//! Nonterminal identities are assigned in first-occurrence order over the
//! left-hand sides (augmented rule first), then terminal identities in
//! first-occurrence order over the right-hand sides, then the end marker.
//! A right-hand token that never appears on a left-hand side is therefore a
//! terminal by construction.

use crate::error::CompileError;
use crate::symtab::{END_MARKER, SymTab, Symbol};
use smartstring::alias::String;

/// Base name of the augmented start symbol.
pub const AUGMENTED_START: &str = "S'";

/// A production `lhs → rhs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    /// Position of this rule in the grammar; rule 0 is `S' → S`.
    pub index: usize,
    /// Left-hand nonterminal.
    pub lhs: Symbol,
    /// Right-hand symbols, never empty.
    pub rhs: Vec<Symbol>,
}

/// An augmented grammar: its rules and the symbol table they refer to.
#[derive(Debug, Clone)]
pub struct Grammar {
    rules: Vec<Rule>,
    symbols: SymTab,
}

impl Grammar {
    /// Compiles grammar source text.
    ///
    /// # Errors
    /// - [`CompileError::Empty`] if the text holds no productions.
    /// - [`CompileError::MalformedLine`] if a line has fewer than two tokens.
    /// - [`CompileError::ReservedSymbol`] if a token is spelled like the end marker.
    pub fn parse(text: &str) -> Result<Self, CompileError> {
        let mut lines: Vec<Vec<&str>> = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let toks: Vec<&str> = line.split_whitespace().collect();
            if toks.is_empty() {
                continue;
            }
            if toks.len() < 2 {
                return Err(CompileError::MalformedLine {
                    line: i + 1,
                    text: String::from(line.trim()),
                });
            }
            if let Some(tok) = toks.iter().find(|t| **t == END_MARKER) {
                return Err(CompileError::ReservedSymbol {
                    line: i + 1,
                    symbol: String::from(*tok),
                });
            }
            lines.push(toks);
        }
        let Some(first) = lines.first() else {
            return Err(CompileError::Empty);
        };

        let start = first[0];
        let aug = fresh_start_name(&lines);
        lines.insert(0, vec![aug.as_str(), start]);

        let mut symbols = SymTab::new();
        for toks in &lines {
            symbols.add_nonterminal(toks[0]);
        }
        for toks in &lines {
            for tok in &toks[1..] {
                symbols.add_terminal(tok);
            }
        }
        symbols.add_end();

        let rules = lines
            .iter()
            .enumerate()
            .map(|(index, toks)| Rule {
                index,
                lhs: symbols.add_nonterminal(toks[0]),
                rhs: toks[1..].iter().map(|t| symbols.add_terminal(t)).collect(),
            })
            .collect::<Vec<_>>();

        log::debug!(
            "compiled {} rules over {} symbols ({} nonterminals)",
            rules.len(),
            symbols.len(),
            symbols.count_nonterminals()
        );
        Ok(Self { rules, symbols })
    }

    /// Rules by index; rule 0 is the augmented start rule.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn symbols(&self) -> &SymTab {
        &self.symbols
    }

    pub fn count_nonterminals(&self) -> usize {
        self.symbols.count_nonterminals()
    }

    /// Identity of the end marker.
    pub fn end(&self) -> Symbol {
        self.symbols.end()
    }

    /// Rules whose left-hand side is `lhs`, in declaration order.
    pub fn rules_for(&self, lhs: Symbol) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.lhs == lhs)
    }

    /// Formats a rule as `lhs → rhs1 rhs2 ...`.
    pub fn rule_text(&self, rule: &Rule) -> std::string::String {
        let mut s = format!("{} →", self.symbols.label(rule.lhs));
        for &sym in &rule.rhs {
            s.push(' ');
            s.push_str(&self.symbols.label(sym));
        }
        s
    }
}

fn fresh_start_name(lines: &[Vec<&str>]) -> String {
    let mut name = String::from(AUGMENTED_START);
    while lines.iter().flatten().any(|t| *t == name.as_str()) {
        name.push('\'');
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symtab::SymbolKind;

    const EXPR: &str = "E E + T\nE T\nT T * F\nT F\nF ( E )\nF id";

    #[test]
    fn augments_and_numbers_symbols() {
        let g = Grammar::parse(EXPR).unwrap();
        let names: Vec<_> = g.symbols().iter().map(|(_, n, _)| n).collect();
        assert_eq!(
            names,
            vec!["S'", "E", "T", "F", "+", "*", "(", ")", "id", "$"]
        );
        assert_eq!(g.count_nonterminals(), 4);
        assert_eq!(g.end(), 9);
        assert_eq!(g.rules().len(), 7);
        assert_eq!(
            g.rules()[0],
            Rule {
                index: 0,
                lhs: 0,
                rhs: vec![1]
            }
        );
        assert_eq!(
            g.rules()[1],
            Rule {
                index: 1,
                lhs: 1,
                rhs: vec![1, 4, 2]
            }
        );
        assert_eq!(g.rule_text(&g.rules()[5]), "F → ( E )");
    }

    #[test]
    fn rhs_only_tokens_are_terminals() {
        let g = Grammar::parse("S a B\nB b").unwrap();
        let s = g.symbols();
        assert_eq!(s.kind(s.lookup("S").unwrap()), Some(SymbolKind::Nonterminal));
        assert_eq!(s.kind(s.lookup("B").unwrap()), Some(SymbolKind::Nonterminal));
        assert_eq!(s.kind(s.lookup("a").unwrap()), Some(SymbolKind::Terminal));
        assert_eq!(s.kind(s.lookup("b").unwrap()), Some(SymbolKind::Terminal));
    }

    #[test]
    fn blank_lines_and_extra_whitespace_are_ignored() {
        let g = Grammar::parse("\n  S   a  S \r\n\n\t\nS b\n").unwrap();
        assert_eq!(g.rules().len(), 3);
        assert_eq!(g.rule_text(&g.rules()[1]), "S → a S");
    }

    #[test]
    fn empty_text_is_rejected() {
        assert_eq!(Grammar::parse("").unwrap_err(), CompileError::Empty);
        assert_eq!(Grammar::parse(" \n\t\n").unwrap_err(), CompileError::Empty);
    }

    #[test]
    fn single_token_line_is_rejected() {
        let err = Grammar::parse("S a\n\nS\n").unwrap_err();
        assert_eq!(
            err,
            CompileError::MalformedLine {
                line: 3,
                text: "S".into()
            }
        );
    }

    #[test]
    fn end_marker_name_is_reserved() {
        let err = Grammar::parse("S a $").unwrap_err();
        assert!(matches!(err, CompileError::ReservedSymbol { line: 1, .. }));
    }

    #[test]
    fn augmented_name_avoids_collisions() {
        let g = Grammar::parse("S' a").unwrap();
        assert_eq!(g.symbols().name(0), Some("S''"));
        assert_eq!(g.symbols().name(1), Some("S'"));
    }

    #[test]
    fn rules_for_filters_by_lhs() {
        let g = Grammar::parse(EXPR).unwrap();
        let t = g.symbols().lookup("T").unwrap();
        let idx: Vec<_> = g.rules_for(t).map(|r| r.index).collect();
        assert_eq!(idx, vec![3, 4]);
    }
}
