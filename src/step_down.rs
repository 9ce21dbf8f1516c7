//! Step-down table: precompute, per (lexeme type, target nonterminal), the
//! rule-application stacks that reach a leftmost terminal match (§4.3).

use std::collections::HashMap;
use std::rc::Rc;

use crate::grammar::{Grammar, GrammarError};
use crate::registry::{RuleId, TokenTypeId};

/// One descent from a target nonterminal down to a rule whose leftmost
/// pattern token matches the triggering lexeme: `N -> r1 -> r2 -> ... -> rk`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDownEntry {
    pub stack: Vec<RuleId>,
}

impl StepDownEntry {
    /// The rule whose leftmost pattern position actually matched the lexeme.
    pub fn leaf(&self) -> RuleId {
        *self.stack.last().expect("a step-down entry is never empty")
    }
}

/// Multimap `(terminal type, target nonterminal) -> stacks of rules`.
///
/// Also indexed by target nonterminal alone, so the step-up table (§4.4) can
/// enumerate "for every step-down entry whose target is N" without scanning
/// the whole table.
pub struct StepDownTable {
    by_terminal_target: HashMap<(TokenTypeId, TokenTypeId), Vec<Rc<StepDownEntry>>>,
    by_target: HashMap<TokenTypeId, Vec<(TokenTypeId, Rc<StepDownEntry>)>>,
}

/// Work item for the explicit-stack DFS (§9: "implement with an explicit
/// stack to keep blow-up predictable on pathological grammars").
struct Frame {
    stack: Vec<RuleId>,
    lhs_guard: Vec<TokenTypeId>,
}

impl StepDownTable {
    /// Build the table, rejecting grammars whose descent depth exceeds `max_depth`.
    pub fn build(grammar: &Grammar, max_depth: usize) -> Result<Self, GrammarError> {
        let mut by_terminal_target: HashMap<(TokenTypeId, TokenTypeId), Vec<Rc<StepDownEntry>>> =
            HashMap::new();
        let mut by_target: HashMap<TokenTypeId, Vec<(TokenTypeId, Rc<StepDownEntry>)>> =
            HashMap::new();

        for rule_index in 0..grammar.rule_count() {
            let origin = RuleId(rule_index as u32);
            let target = grammar.rule(origin).lhs;

            let mut work: Vec<Frame> = vec![Frame {
                stack: vec![origin],
                lhs_guard: vec![target],
            }];

            while let Some(frame) = work.pop() {
                if frame.stack.len() > max_depth {
                    return Err(GrammarError::StepDownDepthExceeded {
                        rule: grammar.rule_names.name_of(origin).to_string(),
                        limit: max_depth,
                    });
                }
                let current = grammar.rule(*frame.stack.last().unwrap());
                let first = current.first();

                if grammar.types.is_lexical(first) {
                    let entry = Rc::new(StepDownEntry {
                        stack: frame.stack.clone(),
                    });
                    by_terminal_target
                        .entry((first, target))
                        .or_default()
                        .push(entry.clone());
                    by_target.entry(target).or_default().push((first, entry));
                } else if !frame.lhs_guard.contains(&first) {
                    // Left-recursion guard: never descend into a rule whose LHS
                    // already appears on this stack (§4.3). Cycles on the
                    // leftmost-descent path are handled by the step-up table.
                    for &next_rule in grammar.rules_for(first) {
                        let mut next_stack = frame.stack.clone();
                        next_stack.push(next_rule);
                        let mut next_guard = frame.lhs_guard.clone();
                        next_guard.push(first);
                        work.push(Frame {
                            stack: next_stack,
                            lhs_guard: next_guard,
                        });
                    }
                }
            }
        }

        Ok(Self {
            by_terminal_target,
            by_target,
        })
    }

    /// Every descent stack reachable from `target` whose leftmost terminal is `terminal`.
    pub fn lookup(&self, terminal: TokenTypeId, target: TokenTypeId) -> &[Rc<StepDownEntry>] {
        self.by_terminal_target
            .get(&(terminal, target))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every `(terminal, entry)` pair whose descent target is `target`, used by
    /// step-up construction to join on the nonterminal in pattern position 1.
    pub fn lookup_by_target(&self, target: TokenTypeId) -> &[(TokenTypeId, Rc<StepDownEntry>)] {
        self.by_target
            .get(&target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn entry_count(&self) -> usize {
        self.by_terminal_target.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{GrammarSpec, RuleDef};

    fn demo_grammar() -> Grammar {
        Grammar::build(GrammarSpec::new(
            vec!["TRUE".into(), "FALSE".into(), "NUM".into(), "DASH".into()],
            vec![
                RuleDef::new("top", "top_expr", vec!["expr"]),
                RuleDef::new("expr", "true_expr", vec!["TRUE"]),
                RuleDef::new("expr", "false_expr", vec!["FALSE"]),
                RuleDef::new("expr", "num_expr", vec!["NUM"]),
                RuleDef::new("expr", "sub_expr", vec!["expr", "DASH", "expr"])
                    .with_priority(4),
            ],
        ))
        .unwrap()
    }

    #[test]
    fn step_down_soundness() {
        let grammar = demo_grammar();
        let table = StepDownTable::build(&grammar, 64).unwrap();
        let top = grammar.types.id_of("top");
        let true_t = grammar.types.id_of("TRUE");

        let stacks = table.lookup(true_t, top);
        assert_eq!(stacks.len(), 1);
        let stack = &stacks[0].stack;
        assert_eq!(grammar.rule(stack[0]).lhs, top);
        for pair in stack.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!(grammar.rule(b).lhs, grammar.rule(a).first());
        }
        assert_eq!(grammar.rule(*stack.last().unwrap()).first(), true_t);
    }

    #[test]
    fn no_duplicate_lhs_within_a_stack() {
        let grammar = demo_grammar();
        let table = StepDownTable::build(&grammar, 64).unwrap();
        let top = grammar.types.id_of("top");
        for terminal in ["TRUE", "FALSE", "NUM"] {
            let t = grammar.types.id_of(terminal);
            for entry in table.lookup(t, top) {
                let mut lhs_seen = std::collections::HashSet::new();
                for &r in &entry.stack {
                    assert!(lhs_seen.insert(grammar.rule(r).lhs));
                }
            }
        }
    }

    #[test]
    fn sub_expr_left_recursion_does_not_loop() {
        // expr -> sub_expr -> expr DASH expr: stepping down into the first
        // `expr` of sub_expr's own pattern must not re-enter sub_expr.
        let grammar = demo_grammar();
        let table = StepDownTable::build(&grammar, 64).unwrap();
        let expr = grammar.types.id_of("expr");
        let dash = grammar.types.id_of("DASH");
        assert!(table.lookup(dash, expr).is_empty());
    }
}
