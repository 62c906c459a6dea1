// Plain-text writers for rules, item sets, FIRST/FOLLOW sets, the parse
// table, traces and parse trees.

use crate::automaton::{Collection, Item};
use crate::driver::{StackEntry, Trace, TraceAction};
use crate::first_follow::{TermSet, first_sets, follow_sets};
use crate::grammar::Grammar;
use crate::session::CompiledGrammar;
use crate::symtab::Symbol;
use crate::tree::ParseTreeNode;
use std::io::{self, Write};

/// Writes the numbered rule list.
///
/// # Output Format
/// ```text
/// 0 S' → E
/// 1 E → E + T
/// ```
pub fn write_rules<W: Write>(out: &mut W, grammar: &Grammar) -> io::Result<()> {
    for rule in grammar.rules() {
        writeln!(out, "{} {}", rule.index, grammar.rule_text(rule))?;
    }
    Ok(())
}

fn item_text(grammar: &Grammar, item: &Item) -> String {
    let symbols = grammar.symbols();
    let rule = &grammar.rules()[item.rule];
    let mut s = format!("{} →", symbols.label(rule.lhs));
    for (i, &sym) in rule.rhs.iter().enumerate() {
        if i == item.dot {
            s.push_str(" •");
        }
        s.push(' ');
        s.push_str(&symbols.label(sym));
    }
    if item.dot == rule.rhs.len() {
        s.push_str(" •");
    }
    s
}

/// Writes the canonical collection, one block per state.
///
/// Items appear in insertion order, the first one labelled `I<state>`.
pub fn write_collection<W: Write>(
    out: &mut W,
    grammar: &Grammar,
    collection: &Collection,
) -> io::Result<()> {
    for (i, state) in collection.states().iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        let label = format!("I{}", i);
        for (j, item) in state.iter().enumerate() {
            let head = if j == 0 { label.as_str() } else { "" };
            writeln!(out, "{:<5}{}", head, item_text(grammar, item))?;
        }
    }
    Ok(())
}

fn set_text(grammar: &Grammar, set: &TermSet) -> String {
    let names: Vec<_> = set.iter().map(|&t| grammar.symbols().label(t)).collect();
    format!("{{ {} }}", names.join(", "))
}

/// Writes FIRST and FOLLOW of every nonterminal.
pub fn write_first_follow<W: Write>(out: &mut W, grammar: &Grammar) -> io::Result<()> {
    let fst = first_sets(grammar);
    let flw = follow_sets(grammar);
    for nt in grammar.symbols().nonterminals() {
        let name = grammar.symbols().label(nt);
        writeln!(out, "FIRST({}) = {}", name, set_text(grammar, &fst[nt]))?;
        writeln!(out, "FOLLOW({}) = {}", name, set_text(grammar, &flw[nt]))?;
    }
    Ok(())
}

fn write_row<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let line: Vec<_> = cells
        .iter()
        .zip(widths)
        .map(|(c, w)| format!("{:<w$}", c, w = *w))
        .collect();
    writeln!(out, "{}", line.join(" | ").trim_end())
}

/// Writes the action/goto grid.
///
/// Action columns are the terminals followed by the end marker; goto
/// columns are the nonterminals other than the augmented start symbol.
/// Empty cells are errors.
pub fn write_table<W: Write>(out: &mut W, compiled: &CompiledGrammar) -> io::Result<()> {
    let symbols = compiled.symbols();
    let table = compiled.table();
    let action_cols: Vec<Symbol> = (symbols.count_nonterminals()..symbols.len()).collect();
    let goto_cols: Vec<Symbol> = (1..symbols.count_nonterminals()).collect();

    let mut rows: Vec<Vec<String>> = Vec::with_capacity(table.n_states() + 1);
    let mut header = vec!["State".to_string()];
    header.extend(action_cols.iter().map(|&s| symbols.label(s).into_owned()));
    header.extend(goto_cols.iter().map(|&s| symbols.label(s).into_owned()));
    rows.push(header);
    for state in 0..table.n_states() {
        let mut row = vec![state.to_string()];
        row.extend(action_cols.iter().map(|&s| {
            table
                .action(state, s)
                .map(|a| a.to_string())
                .unwrap_or_default()
        }));
        row.extend(goto_cols.iter().map(|&s| {
            table
                .goto(state, s)
                .map(|g| g.to_string())
                .unwrap_or_default()
        }));
        rows.push(row);
    }

    let widths = column_widths(&rows);
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    if table.has_conflict() {
        writeln!(out)?;
        for (state, sym, actions) in table.conflicts() {
            let list: Vec<_> = actions.iter().map(|a| a.to_string()).collect();
            writeln!(
                out,
                "conflict in state {} on {}: {}",
                state,
                symbols.label(sym),
                list.join(", ")
            )?;
        }
    }
    Ok(())
}

fn column_widths(rows: &[Vec<String>]) -> Vec<usize> {
    let n = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..n)
        .map(|i| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect()
}

/// Writes one row per trace step: stack, remaining input, action and, for
/// reduces, the rule applied.
pub fn write_trace<W: Write>(out: &mut W, grammar: &Grammar, trace: &Trace) -> io::Result<()> {
    let symbols = grammar.symbols();
    let mut rows = vec![vec![
        "Stack".to_string(),
        "Input".to_string(),
        "Action".to_string(),
        "Rule".to_string(),
    ]];
    for step in trace.steps() {
        let stack: Vec<_> = step
            .stack
            .iter()
            .map(|e| match e {
                StackEntry::State(s) => s.to_string(),
                StackEntry::Symbol(sym) => symbols.label(*sym).into_owned(),
            })
            .collect();
        let input: Vec<_> = step.input.iter().map(|&s| symbols.label(s)).collect();
        let rule = match step.action {
            TraceAction::Reduce(r) => grammar.rule_text(&grammar.rules()[r]),
            _ => String::new(),
        };
        rows.push(vec![
            stack.join(" "),
            input.join(" "),
            step.action.to_string(),
            rule,
        ]);
    }
    let widths = column_widths(&rows);
    for row in &rows {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

/// Writes the tree as an indented outline, two spaces per level.
pub fn write_tree<W: Write>(
    out: &mut W,
    grammar: &Grammar,
    node: &ParseTreeNode,
) -> io::Result<()> {
    write_node(out, grammar, node, 0)
}

fn write_node<W: Write>(
    out: &mut W,
    grammar: &Grammar,
    node: &ParseTreeNode,
    depth: usize,
) -> io::Result<()> {
    writeln!(
        out,
        "{:indent$}{}",
        "",
        grammar.symbols().label(node.symbol),
        indent = depth * 2
    )?;
    for child in &node.children {
        write_node(out, grammar, child, depth + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{compile, run};
    use crate::tree::reconstruct_tree;

    const EXPR: &str = "E E + T\nE T\nT T * F\nT F\nF ( E )\nF id";

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn rules_listing() {
        let c = compile(EXPR).unwrap();
        let s = render(|out| write_rules(out, c.grammar()));
        let lines: Vec<_> = s.lines().collect();
        assert_eq!(lines[0], "0 S' → E");
        assert_eq!(lines[6], "6 F → id");
    }

    #[test]
    fn collection_marks_dot() {
        let c = compile(EXPR).unwrap();
        let s = render(|out| write_collection(out, c.grammar(), c.collection()));
        let first = s.lines().next().unwrap();
        assert_eq!(first, "I0   S' → • E");
        assert!(s.contains("I1   S' → E •"));
    }

    #[test]
    fn first_follow_listing() {
        let c = compile(EXPR).unwrap();
        let s = render(|out| write_first_follow(out, c.grammar()));
        assert!(s.contains("FOLLOW(S') = { $ }"));
        assert!(s.lines().any(|l| l.starts_with("FIRST(F) = {")));
    }

    #[test]
    fn table_grid_has_header_and_rows() {
        let c = compile(EXPR).unwrap();
        let s = render(|out| write_table(out, &c));
        let lines: Vec<_> = s.lines().collect();
        assert_eq!(lines.len(), 13);
        let header: Vec<_> = lines[0].split('|').map(str::trim).collect();
        assert_eq!(header, vec!["State", "+", "*", "(", ")", "id", "$", "E", "T", "F"]);
        assert!(!s.contains("conflict"));
    }

    #[test]
    fn table_lists_conflicts() {
        let c = compile("E E + E\nE id").unwrap();
        let s = render(|out| write_table(out, &c));
        assert!(s.contains("conflict in state"));
        assert!(s.contains(", r1"));
    }

    #[test]
    fn trace_and_tree() {
        let c = compile(EXPR).unwrap();
        let trace = run(&c, "id");
        let s = render(|out| write_trace(out, c.grammar(), &trace));
        let lines: Vec<_> = s.lines().collect();
        assert!(lines[0].starts_with("Stack"));
        assert!(lines[2].contains("F → id"));
        assert!(lines.last().unwrap().contains("| A"));

        let tree = reconstruct_tree(&trace, c.rules()).unwrap();
        let s = render(|out| write_tree(out, c.grammar(), &tree));
        assert_eq!(s, "E\n  T\n    F\n      id\n");
    }

    #[test]
    fn error_step_text() {
        let c = compile(EXPR).unwrap();
        let trace = run(&c, "id @");
        let s = render(|out| write_trace(out, c.grammar(), &trace));
        assert!(s.contains("Error: input string is invalid"));
    }
}
