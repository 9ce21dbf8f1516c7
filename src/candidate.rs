//! The in-flight partial parse tree plus its work frontier (§3), and the tree
//! mutation primitives used by the consume engine: direct consumption,
//! step-down grafting, step-up wrapping, and node splitting (§4.5, §4.7).

use crate::arena::{NodeArena, NodeId};
use crate::grammar::Grammar;
use crate::node::{Node, ParsedSlot, TokenIndex};
use crate::registry::{RuleId, TokenTypeId};
use crate::step_down::StepDownEntry;
use crate::step_up::{StepUpAction, StepUpTable};

/// One in-flight partial parse tree. Cloning a candidate is a full structural
/// copy of its arena - the simpler of the two realizations §9 allows for
/// "shared subtrees under ambiguity" (the alternative, true copy-on-write
/// sharing of arena storage across candidates, needs a persistent node store
/// this arena does not provide; see DESIGN.md).
#[derive(Clone)]
pub struct Candidate {
    arena: NodeArena,
    root: NodeId,
    work: Vec<NodeId>,
}

impl Candidate {
    /// A fresh candidate: one root node with an empty pattern, `W = {root}` (§3 Lifecycle).
    pub fn new(top_rule: RuleId) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.allocate(Node::root(top_rule));
        Self {
            arena,
            root,
            work: vec![root],
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn work(&self) -> &[NodeId] {
        &self.work
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    fn add_work(&mut self, id: NodeId) {
        if !self.work.contains(&id) {
            self.work.push(id);
        }
    }

    fn remove_work(&mut self, id: NodeId) {
        self.work.retain(|&w| w != id);
    }

    /// The next pattern symbol `w` is waiting on, or `None` if `w` is already complete.
    pub fn next_symbol(&self, w: NodeId, grammar: &Grammar) -> Option<TokenTypeId> {
        let node = self.arena.get(w);
        grammar.rule(node.rule).pattern.get(node.parsed.len()).copied()
    }

    /// Whether `id` is complete: every pattern position filled, and - for a
    /// trailing sub-slot - every child in it is itself complete. Node
    /// splitting (§4.7) keeps a slot's children homogeneous by the time this
    /// is asked, so "every" and the glossary's "at least one" coincide.
    pub fn is_complete(&self, id: NodeId, grammar: &Grammar) -> bool {
        let node = self.arena.get(id);
        let pattern_len = grammar.rule(node.rule).pattern.len();
        if node.parsed.len() != pattern_len {
            return false;
        }
        match node.parsed.last() {
            Some(ParsedSlot::Lexed(_)) => true,
            Some(ParsedSlot::Sub(children)) => {
                children.iter().all(|&c| self.is_complete(c, grammar))
            }
            None => false,
        }
    }

    pub fn root_is_complete(&self, grammar: &Grammar) -> bool {
        self.is_complete(self.root, grammar)
    }

    /// Dead end: no work pointer left and the root never completed (§4.8).
    pub fn is_dead(&self, grammar: &Grammar) -> bool {
        self.work.is_empty() && !self.root_is_complete(grammar)
    }

    /// Append a lexed slot to `w` and update the work frontier. Returns `true`
    /// if `w` became complete (the caller should then call [`Self::bubble_completion`]).
    fn direct_consume(&mut self, w: NodeId, grammar: &Grammar, token_index: TokenIndex) -> bool {
        self.arena
            .get_mut(w)
            .parsed
            .push(ParsedSlot::Lexed(token_index));
        if self.is_complete(w, grammar) {
            self.remove_work(w);
            true
        } else {
            self.add_work(w);
            false
        }
    }

    /// Direct consumption (§4.5.1) for a work pointer whose next symbol is
    /// already known to be the terminal `t`. Returns the successor set: one
    /// candidate unless completion propagation split the root (§4.7).
    pub fn consume_direct(
        mut self,
        w: NodeId,
        grammar: &Grammar,
        step_up: &StepUpTable,
        token_index: TokenIndex,
    ) -> Vec<Candidate> {
        if self.direct_consume(w, grammar, token_index) {
            self.bubble_completion(grammar, step_up, w)
        } else {
            vec![self]
        }
    }

    /// Step-down graft (§4.5.2): clone, open a new Sub slot at `w`, chain the
    /// descent stack beneath it, and consume the lexeme at the leaf.
    pub fn step_down_graft(
        &self,
        w: NodeId,
        entry: &StepDownEntry,
        grammar: &Grammar,
        step_up: &StepUpTable,
        token_index: TokenIndex,
    ) -> Vec<Candidate> {
        let mut c = self.clone();
        c.remove_work(w);
        let mut parent_id = w;
        let mut leaf = w;
        for &rule_id in &entry.stack {
            let node_id = c.arena.allocate(Node::child(rule_id, parent_id));
            c.arena
                .get_mut(parent_id)
                .parsed
                .push(ParsedSlot::Sub(vec![node_id]));
            parent_id = node_id;
            leaf = node_id;
        }
        if c.direct_consume(leaf, grammar, token_index) {
            c.bubble_completion(grammar, step_up, leaf)
        } else {
            vec![c]
        }
    }

    /// Step-up wrap (§4.5.3): clone, wrap the already-complete `w` in a new
    /// node of `action.rule`, graft `action.then_step_down` beneath it, and
    /// consume the lexeme at the resulting leaf.
    pub fn step_up_wrap(
        &self,
        w: NodeId,
        action: &StepUpAction,
        grammar: &Grammar,
        step_up: &StepUpTable,
        token_index: TokenIndex,
    ) -> Vec<Candidate> {
        let mut c = self.clone();
        c.remove_work(w);
        let old_parent = c.arena.get(w).parent;
        let n = c.arena.allocate(Node {
            rule: action.rule,
            parent: old_parent,
            parsed: vec![ParsedSlot::Sub(vec![w])],
        });
        c.arena.get_mut(w).parent = Some(n);

        match old_parent {
            Some(op) => {
                let last = c.arena.get(op).parsed.len() - 1;
                if let Some(children) = c.arena.get_mut(op).parsed[last].as_sub_mut() {
                    for slot in children.iter_mut() {
                        if *slot == w {
                            *slot = n;
                        }
                    }
                }
            }
            None => c.root = n,
        }

        let mut leaf = n;
        if let Some(entry) = &action.then_step_down {
            for &rule_id in &entry.stack {
                let node_id = c.arena.allocate(Node::child(rule_id, leaf));
                c.arena
                    .get_mut(leaf)
                    .parsed
                    .push(ParsedSlot::Sub(vec![node_id]));
                leaf = node_id;
            }
        }

        if c.direct_consume(leaf, grammar, token_index) {
            c.bubble_completion(grammar, step_up, leaf)
        } else {
            c.add_work(leaf);
            vec![c]
        }
    }

    /// Walk up from `completed` marking completion and advancing the work
    /// frontier. When ascent reaches a node whose last sub-slot mixes complete
    /// and incomplete children, split it (§4.7) and continue from the split-off
    /// complete copy.
    ///
    /// A node whose rule's LHS some step-up action could still wrap is never
    /// silently promoted away: ascent forks into one candidate that keeps it
    /// exposed on the work frontier (so a later token can wrap it per §4.5
    /// point 3) and one that continues climbing into its parent as usual.
    /// Without this, "top -> expr" collapsing the instant any single `expr`
    /// completes would make a grammar like `expr -> expr DASH expr` unable to
    /// ever extend past the first operand, since nothing would be left on the
    /// frontier to offer the next token to.
    fn bubble_completion(
        mut self,
        grammar: &Grammar,
        step_up: &StepUpTable,
        completed: NodeId,
    ) -> Vec<Candidate> {
        let mut current = completed;
        let mut forks: Vec<Candidate> = Vec::new();
        loop {
            let lhs = grammar.rule(self.arena.get(current).rule).lhs;
            let parent = match self.arena.get(current).parent {
                Some(p) => p,
                None => {
                    // A complete root stays off the frontier unless some
                    // step-up rule could still wrap it (§3: W holds only
                    // incomplete nodes, plus exactly that exception).
                    if step_up.has_any(lhs) {
                        self.add_work(current);
                    }
                    forks.push(self);
                    return forks;
                }
            };

            let last_idx = self.arena.get(parent).parsed.len() - 1;
            let siblings = match &self.arena.get(parent).parsed[last_idx] {
                ParsedSlot::Sub(children) => children.clone(),
                ParsedSlot::Lexed(_) => {
                    unreachable!("a node's parent always holds it in a Sub slot")
                }
            };
            let (complete, incomplete): (Vec<NodeId>, Vec<NodeId>) = siblings
                .into_iter()
                .partition(|&c| self.is_complete(c, grammar));

            if incomplete.is_empty() {
                let parent_rule_len = grammar.rule(self.arena.get(parent).rule).pattern.len();
                if self.arena.get(parent).parsed.len() == parent_rule_len {
                    if step_up.has_any(lhs) {
                        let mut exposed = self.clone();
                        exposed.add_work(current);
                        forks.push(exposed);
                    }
                    current = parent;
                    continue;
                }
                self.add_work(parent);
                forks.push(self);
                return forks;
            }

            if complete.is_empty() {
                // `current` was complete but none of its siblings are (a single-child
                // slot, the common case); nothing further to propagate this round.
                forks.push(self);
                return forks;
            }

            if self.arena.get(parent).parent.is_none() {
                // Splitting the root would need two roots; fork into two candidates instead.
                let mut completed_candidate = self.clone();
                let idx = completed_candidate.arena.get(parent).parsed.len() - 1;
                completed_candidate.arena.get_mut(parent).parsed[idx] =
                    ParsedSlot::Sub(complete);
                completed_candidate.remove_work(parent);
                forks.push(completed_candidate);

                let idx = self.arena.get(parent).parsed.len() - 1;
                self.arena.get_mut(parent).parsed[idx] = ParsedSlot::Sub(incomplete);
                self.add_work(parent);
                forks.push(self);

                return forks;
            }

            let n_prime = self.split(parent, complete, incomplete);
            current = n_prime;
        }
    }

    /// Create `n'`, a shallow copy of `n` holding only `complete` in its last
    /// slot, parent-retargeted in place of `n` alongside `n` (which keeps
    /// `incomplete`) in their shared grandparent's last sub-slot.
    fn split(&mut self, n: NodeId, complete: Vec<NodeId>, incomplete: Vec<NodeId>) -> NodeId {
        let rule = self.arena.get(n).rule;
        let grandparent = self
            .arena
            .get(n)
            .parent
            .expect("root-level splits are handled by the caller before reaching here");
        let mut parsed = self.arena.get(n).parsed.clone();
        let last = parsed.len() - 1;
        parsed[last] = ParsedSlot::Sub(complete.clone());
        let n_prime = self.arena.allocate(Node {
            rule,
            parent: Some(grandparent),
            parsed,
        });

        for &c in &complete {
            self.arena.get_mut(c).parent = Some(n_prime);
        }

        let n_last = self.arena.get(n).parsed.len() - 1;
        self.arena.get_mut(n).parsed[n_last] = ParsedSlot::Sub(incomplete);

        let gp_last = self.arena.get(grandparent).parsed.len() - 1;
        if let Some(children) = self.arena.get_mut(grandparent).parsed[gp_last].as_sub_mut() {
            children.push(n_prime);
        }

        n_prime
    }
}
