//! FIRST and FOLLOW sets with explicit re-entrancy guards.
//!
//! FIRST only looks at the first right-hand symbol of each rule (grammars
//! have no empty productions). Recursion is cut by a [`Visited`] guard:
//! re-entering a symbol that is already being expanded contributes the
//! empty set. This terminates on left-recursive grammars without caching
//! partial results; which conflicts the table reports depends on this
//! exact behavior.
//!
//! Sets preserve first-seen order, which fixes the order in which reduce
//! actions reach the table.

use crate::grammar::Grammar;
use crate::symtab::Symbol;
use indexmap::IndexSet;

/// An insertion-ordered set of terminals (and possibly the end marker).
pub type TermSet = IndexSet<Symbol>;

/// One marker per symbol, scoped to a single top-level computation.
#[derive(Debug, Clone)]
pub struct Visited {
    marks: Vec<bool>,
}

impl Visited {
    pub fn new(n_symbols: usize) -> Self {
        Self {
            marks: vec![false; n_symbols],
        }
    }

    /// Marks `sym`, returning `false` if it was already marked.
    pub fn enter(&mut self, sym: Symbol) -> bool {
        match self.marks.get_mut(sym) {
            Some(mark) if !*mark => {
                *mark = true;
                true
            }
            _ => false,
        }
    }
}

/// FIRST(`sym`) with a freshly reset guard.
pub fn first(grammar: &Grammar, sym: Symbol) -> TermSet {
    let mut visited = Visited::new(grammar.symbols().len());
    first_guarded(grammar, sym, &mut visited)
}

/// FIRST(`sym`) sharing `visited` with the caller's recursion.
pub fn first_guarded(grammar: &Grammar, sym: Symbol, visited: &mut Visited) -> TermSet {
    if !grammar.symbols().is_nonterminal(sym) {
        return TermSet::from([sym]);
    }
    let mut out = TermSet::new();
    if !visited.enter(sym) {
        return out;
    }
    for rule in grammar.rules_for(sym) {
        out.extend(first_guarded(grammar, rule.rhs[0], visited));
    }
    out
}

/// FOLLOW(`sym`) with a freshly reset guard.
pub fn follow(grammar: &Grammar, sym: Symbol) -> TermSet {
    let mut visited = Visited::new(grammar.symbols().len());
    follow_guarded(grammar, sym, &mut visited)
}

/// FOLLOW(`sym`) sharing `visited` with the caller's recursion.
///
/// Every nested FIRST call gets its own fresh guard.
pub fn follow_guarded(grammar: &Grammar, sym: Symbol, visited: &mut Visited) -> TermSet {
    let mut out = TermSet::new();
    if !visited.enter(sym) {
        return out;
    }
    if sym == 0 {
        out.insert(grammar.end());
    }
    for rule in grammar.rules() {
        for (j, &s) in rule.rhs.iter().enumerate() {
            if s != sym {
                continue;
            }
            match rule.rhs.get(j + 1) {
                None => {
                    if rule.lhs != sym {
                        out.extend(follow_guarded(grammar, rule.lhs, visited));
                    }
                }
                Some(&next) => out.extend(first(grammar, next)),
            }
        }
    }
    out
}

/// FIRST of every symbol, indexed by identity.
pub fn first_sets(grammar: &Grammar) -> Vec<TermSet> {
    (0..grammar.symbols().len())
        .map(|sym| first(grammar, sym))
        .collect()
}

/// FOLLOW of every nonterminal, indexed by identity.
pub fn follow_sets(grammar: &Grammar) -> Vec<TermSet> {
    grammar
        .symbols()
        .nonterminals()
        .map(|sym| follow(grammar, sym))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPR: &str = "E E + T\nE T\nT T * F\nT F\nF ( E )\nF id";

    fn names(g: &Grammar, set: &TermSet) -> Vec<String> {
        set.iter()
            .map(|&s| g.symbols().name(s).unwrap().to_string())
            .collect()
    }

    fn sym(g: &Grammar, name: &str) -> Symbol {
        g.symbols().lookup(name).unwrap()
    }

    #[test]
    fn visited_marks_once() {
        let mut v = Visited::new(3);
        assert!(v.enter(1));
        assert!(!v.enter(1));
        assert!(v.enter(2));
        assert!(!v.enter(7));
    }

    #[test]
    fn first_of_terminal_is_itself() {
        let g = Grammar::parse(EXPR).unwrap();
        let plus = sym(&g, "+");
        assert_eq!(first(&g, plus), TermSet::from([plus]));
    }

    #[test]
    fn first_terminates_on_left_recursion() {
        let g = Grammar::parse(EXPR).unwrap();
        for nt in ["S'", "E", "T", "F"] {
            let mut set = names(&g, &first(&g, sym(&g, nt)));
            set.sort();
            assert_eq!(set, vec!["(", "id"], "FIRST({})", nt);
        }
    }

    #[test]
    fn follow_sets_of_expression_grammar() {
        let g = Grammar::parse(EXPR).unwrap();
        let sorted = |name: &str| {
            let mut v = names(&g, &follow(&g, sym(&g, name)));
            v.sort();
            v
        };
        assert_eq!(sorted("S'"), vec!["$"]);
        assert_eq!(sorted("E"), vec!["$", ")", "+"]);
        assert_eq!(sorted("T"), vec!["$", ")", "*", "+"]);
        assert_eq!(sorted("F"), vec!["$", ")", "*", "+"]);
    }

    #[test]
    fn follow_of_start_begins_with_end_marker() {
        let g = Grammar::parse(EXPR).unwrap();
        let set = follow(&g, 0);
        assert_eq!(set.first(), Some(&g.end()));
    }

    #[test]
    fn follow_terminates_on_mutual_recursion() {
        // FOLLOW(B) reaches FOLLOW(A) through A → x B, and FOLLOW(A) reaches
        // back through B → y A; the second visit of B contributes nothing.
        let g = Grammar::parse("S A c\nA x B\nB y A\nB z").unwrap();
        assert_eq!(names(&g, &follow(&g, sym(&g, "B"))), vec!["c"]);
        assert_eq!(names(&g, &follow(&g, sym(&g, "A"))), vec!["c"]);
    }

    #[test]
    fn bulk_sets_are_indexed_by_identity() {
        let g = Grammar::parse(EXPR).unwrap();
        let fst = first_sets(&g);
        let flw = follow_sets(&g);
        assert_eq!(fst.len(), g.symbols().len());
        assert_eq!(flw.len(), g.count_nonterminals());
        assert_eq!(flw[0], TermSet::from([g.end()]));
    }
}
