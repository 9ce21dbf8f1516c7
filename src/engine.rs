//! The consume engine (§4.5, §4.8): advances a whole candidate set by one
//! token, then prunes the successor set down to the candidates still worth
//! carrying forward.

use crate::candidate::Candidate;
use crate::filter::{passes_all_filters, PostFilter};
use crate::grammar::Grammar;
use crate::logger::EngineLogger;
use crate::node::TokenIndex;
use crate::registry::TokenTypeId;
use crate::step_down::StepDownTable;
use crate::step_up::StepUpTable;

/// Advance every candidate in `candidates` past one incoming lexeme of type
/// `token_type`, at token-stream position `token_index`.
///
/// For each candidate's (pre-token) work frontier, a pointer contributes a
/// successor via exactly one of:
///   1. direct consumption, when its next pattern symbol is the terminal `token_type`;
///   2. a step-down graft, when its next pattern symbol is a nonterminal `N`
///      reachable from `token_type` (§4.4);
///   3. a step-up wrap, when the pointer is already complete and its rule's
///      LHS can be wrapped by a rule accepting `token_type` next (§4.4).
/// All three are tried; their successors union into the returned set (§4.5).
/// Case 1 mutates a candidate in place across all of its matching frontier
/// points (they are not mutually exclusive alternatives); cases 2 and 3 clone.
/// A candidate is carried into the result only if at least one of its
/// frontier pointers actually produced a successor; one that matched none of
/// the three cases (e.g. every pointer is nonterminal-next or already
/// complete, with no applicable step-down/step-up action either) is dropped
/// rather than passed through untouched (§4.5: candidates producing no
/// successor are dropped).
pub fn consume_token(
    candidates: Vec<Candidate>,
    grammar: &Grammar,
    step_down: &StepDownTable,
    step_up: &StepUpTable,
    token_type: TokenTypeId,
    token_index: TokenIndex,
    logger: &EngineLogger,
) -> Vec<Candidate> {
    let mut successors = Vec::new();

    for (ci, candidate) in candidates.into_iter().enumerate() {
        let frontier: Vec<_> = candidate.work().to_vec();

        for &w in &frontier {
            match candidate.next_symbol(w, grammar) {
                Some(n) if grammar.types.is_nonterminal(n) => {
                    for entry in step_down.lookup(token_type, n) {
                        successors.extend(
                            candidate.step_down_graft(w, entry, grammar, step_up, token_index),
                        );
                        logger.log_step_down(ci, entry.stack.len());
                    }
                }
                Some(_) => {
                    // A terminal-next pointer: handled by direct consumption below.
                }
                None => {
                    let lhs = grammar.rule(candidate.node(w).rule).lhs;
                    for action in step_up.lookup(token_type, lhs) {
                        successors.extend(
                            candidate.step_up_wrap(w, action, grammar, step_up, token_index),
                        );
                        logger.log_step_up(ci);
                    }
                }
            }
        }

        let mut branch = vec![candidate];
        let mut consumed = false;
        for &w in &frontier {
            let mut next_round = Vec::with_capacity(branch.len());
            for c in branch {
                if c.work().contains(&w) && c.next_symbol(w, grammar) == Some(token_type) {
                    logger.log_direct_consume(ci, "frontier");
                    consumed = true;
                    next_round.extend(c.consume_direct(w, grammar, step_up, token_index));
                } else {
                    next_round.push(c);
                }
            }
            branch = next_round;
        }
        // A candidate that produced no successor at all - no step-down graft,
        // no step-up wrap, and no direct consumption - is dropped rather than
        // carried forward untouched (§4.5: candidates that produce no
        // successor are dropped).
        if consumed {
            successors.extend(branch);
        }
    }

    successors
}

/// Drop dead ends (§4.8: empty frontier and an incomplete root) and anything
/// a registered post-filter rejects (§4.6, §4.9).
pub fn prune(
    candidates: Vec<Candidate>,
    grammar: &Grammar,
    filters: &[Box<dyn PostFilter>],
    logger: &EngineLogger,
    token_index: usize,
) -> Vec<Candidate> {
    let mut survivors = Vec::new();
    for (i, c) in candidates.into_iter().enumerate() {
        if c.is_dead(grammar) {
            logger.log_pruned(i, "dead end");
            continue;
        }
        if !passes_all_filters(&c, grammar, filters) {
            logger.log_pruned(i, "post-filter");
            continue;
        }
        survivors.push(c);
    }
    logger.log_candidate_set(token_index, survivors.len());
    survivors
}
