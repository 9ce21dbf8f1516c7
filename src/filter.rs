//! Post-filter hooks (§4.9) and the built-in operator-priority filter (§4.6).
//!
//! The context-filter extension point stays unprescribed per §12: `PostFilter`
//! is a trait object slot a caller can register against, with only
//! [`PriorityFilter`] wired in by default.

use crate::arena::NodeId;
use crate::candidate::Candidate;
use crate::grammar::Grammar;
use crate::node::{ParsedSlot, TokenIndex};

/// A domain or built-in rule invoked for each node that completes. Returning
/// `false` prunes the whole candidate the node belongs to (§4.8).
pub trait PostFilter {
    fn check(&self, candidate: &Candidate, grammar: &Grammar, completed: NodeId) -> bool;
}

/// The built-in operator-priority filter (§4.6).
pub struct PriorityFilter;

impl PostFilter for PriorityFilter {
    fn check(&self, candidate: &Candidate, grammar: &Grammar, completed: NodeId) -> bool {
        let node = candidate.node(completed);
        let rule = grammar.rule(node.rule);
        if rule.priority == 0 {
            return true;
        }
        for slot in &node.parsed {
            let children = match slot {
                ParsedSlot::Sub(children) => children,
                ParsedSlot::Lexed(_) => continue,
            };
            for &m in children {
                if !candidate.is_complete(m, grammar) {
                    continue;
                }
                let m_rule = grammar.rule(candidate.node(m).rule);
                if m_rule.lhs != rule.lhs || m_rule.priority == 0 {
                    continue;
                }
                if rule.priority < m_rule.priority {
                    return false;
                }
                if rule.priority == m_rule.priority {
                    let n_first = first_lexical_index(candidate, completed);
                    let m_first = first_lexical_index(candidate, m);
                    if let (Some(n_first), Some(m_first)) = (n_first, m_first) {
                        if n_first < m_first {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }
}

/// The token-stream index of the leftmost lexed leaf under `id`.
fn first_lexical_index(candidate: &Candidate, id: NodeId) -> Option<usize> {
    let node = candidate.node(id);
    for slot in &node.parsed {
        match slot {
            ParsedSlot::Lexed(TokenIndex(i)) => return Some(*i),
            ParsedSlot::Sub(children) => {
                for &c in children {
                    if let Some(i) = first_lexical_index(candidate, c) {
                        return Some(i);
                    }
                }
            }
        }
    }
    None
}

/// Run every registered filter over every complete node reachable from
/// `candidate`'s root. Applied as a full-tree scan rather than threading
/// incremental "which node just completed" state through the engine - the
/// two are equivalent for the final accept/reject decision because completion
/// is monotonic (§8 property 5): a priority violation, once present, is never
/// un-detected by a later token.
pub fn passes_all_filters(candidate: &Candidate, grammar: &Grammar, filters: &[Box<dyn PostFilter>]) -> bool {
    fn walk(
        candidate: &Candidate,
        grammar: &Grammar,
        filters: &[Box<dyn PostFilter>],
        id: NodeId,
    ) -> bool {
        if !candidate.is_complete(id, grammar) {
            return true;
        }
        if !filters.iter().all(|f| f.check(candidate, grammar, id)) {
            return false;
        }
        let node = candidate.node(id);
        for slot in &node.parsed {
            if let ParsedSlot::Sub(children) = slot {
                for &c in children {
                    if !walk(candidate, grammar, filters, c) {
                        return false;
                    }
                }
            }
        }
        true
    }
    walk(candidate, grammar, filters, candidate.root())
}
