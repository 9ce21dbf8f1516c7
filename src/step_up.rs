//! Step-up table: precompute, per (lexeme type, completed nonterminal), the
//! rules that can wrap a just-completed node to accept the next lexeme (§4.4).

use std::collections::HashMap;
use std::rc::Rc;

use crate::grammar::{Grammar, GrammarError};
use crate::registry::{RuleId, TokenTypeId};
use crate::step_down::{StepDownEntry, StepDownTable};

/// A wrap-and-continue action: re-parent the completed node under rule
/// `rule`, then graft `then_step_down` (if any) beneath it to reach the
/// pattern position that accepts the triggering lexeme.
#[derive(Debug, Clone)]
pub struct StepUpAction {
    pub rule: RuleId,
    pub then_step_down: Option<Rc<StepDownEntry>>,
}

/// Multimap `(terminal type, completed LHS) -> wrap actions`.
pub struct StepUpTable {
    map: HashMap<(TokenTypeId, TokenTypeId), Vec<Rc<StepUpAction>>>,
}

impl StepUpTable {
    pub fn build(grammar: &Grammar, step_down: &StepDownTable) -> Result<Self, GrammarError> {
        let mut map: HashMap<(TokenTypeId, TokenTypeId), Vec<Rc<StepUpAction>>> = HashMap::new();

        for rule_index in 0..grammar.rule_count() {
            let rule_id = RuleId(rule_index as u32);
            let rule = grammar.rule(rule_id);
            if rule.pattern.len() < 2 {
                continue;
            }
            let first = rule.pattern[0];
            let second = rule.pattern[1];

            if grammar.types.is_nonterminal(second) {
                if second == first {
                    return Err(GrammarError::LeftRecursiveStepUp(
                        grammar.rule_names.name_of(rule_id).to_string(),
                    ));
                }
                for (terminal, entry) in step_down.lookup_by_target(second) {
                    let action = Rc::new(StepUpAction {
                        rule: rule_id,
                        then_step_down: Some(entry.clone()),
                    });
                    map.entry((*terminal, first)).or_default().push(action);
                }
            } else {
                let action = Rc::new(StepUpAction {
                    rule: rule_id,
                    then_step_down: None,
                });
                map.entry((second, first)).or_default().push(action);
            }
        }

        Ok(Self { map })
    }

    pub fn lookup(&self, terminal: TokenTypeId, completed_lhs: TokenTypeId) -> &[Rc<StepUpAction>] {
        self.map
            .get(&(terminal, completed_lhs))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn entry_count(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    /// Whether any terminal at all can wrap a completed node whose rule's LHS
    /// is `lhs`. Used to decide whether a node worth keeping exposed on the
    /// work frontier after it completes, instead of immediately promoting
    /// ascent into its parent (§4.5 point 3).
    pub fn has_any(&self, lhs: TokenTypeId) -> bool {
        self.map.keys().any(|&(_, completed_lhs)| completed_lhs == lhs)
    }
}
