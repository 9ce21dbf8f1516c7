//! A read-only, owned view over a completed candidate's parse tree, pretty-printed
//! with `ptree` (§10.5: `ToStringPretty` supplement from the original C++
//! parser). Grounded on the teacher's `ASTNode<TNode>` `TreeItem` impl in
//! `ast_node.rs` - same write_self/children shape, generalized to render
//! leftover ambiguity (a `Sub` slot with more than one child) as its own node
//! instead of assuming a single resolved tree.

use std::borrow::Cow;

use ptree::{Style, TreeItem};

use crate::candidate::Candidate;
use crate::grammar::Grammar;
use crate::node::ParsedSlot;
use crate::registry::RuleRegistry;

/// An owned snapshot of (a subtree of) a candidate, detached from the
/// candidate's arena so it can be printed, compared, or handed to a caller
/// after the session that produced it has moved on.
#[derive(Debug, Clone)]
pub enum Tree {
    /// A completed nonterminal node: the rule name that matched, and its
    /// pattern positions in order.
    Rule(String, Vec<Tree>),
    /// A terminal position, carrying the index into the session's token
    /// stream that filled it.
    Token(usize),
    /// A `Sub` slot that still holds more than one live alternative -
    /// printing this means the caller asked for a tree before ambiguity was
    /// fully resolved (or resolved it is genuinely ambiguous at `finish`).
    Ambiguous(Vec<Tree>),
}

impl Tree {
    /// Snapshot `candidate`'s tree rooted at its root node.
    pub fn build(candidate: &Candidate, grammar: &Grammar) -> Self {
        Self::build_node(candidate, grammar, &grammar.rule_names, candidate.root())
    }

    fn build_node(
        candidate: &Candidate,
        grammar: &Grammar,
        rule_names: &RuleRegistry,
        id: crate::arena::NodeId,
    ) -> Self {
        let node = candidate.node(id);
        let name = rule_names.name_of(node.rule).to_string();
        let children = node
            .parsed
            .iter()
            .map(|slot| match slot {
                ParsedSlot::Lexed(idx) => Tree::Token(idx.0),
                ParsedSlot::Sub(kids) if kids.len() == 1 => {
                    Self::build_node(candidate, grammar, rule_names, kids[0])
                }
                ParsedSlot::Sub(kids) => Tree::Ambiguous(
                    kids.iter()
                        .map(|&k| Self::build_node(candidate, grammar, rule_names, k))
                        .collect(),
                ),
            })
            .collect();
        Tree::Rule(name, children)
    }

    /// Render as an indented multi-line tree, in the style of the teacher's
    /// `ASTNode::print`, but returned as a string rather than written to stdout.
    pub fn pretty(&self) -> String {
        let mut buf = Vec::new();
        ptree::write_tree(self, &mut buf).expect("writing to a Vec<u8> cannot fail");
        String::from_utf8(buf).expect("ptree output is always UTF-8")
    }

    /// Print directly to stdout, as the teacher's `ASTNode::print` does.
    pub fn print(&self) -> std::io::Result<()> {
        ptree::print_tree(self)
    }
}

impl TreeItem for Tree {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _style: &Style) -> std::io::Result<()> {
        match self {
            Tree::Rule(name, _) => write!(f, "{}", name),
            Tree::Token(idx) => write!(f, "#{}", idx),
            Tree::Ambiguous(alts) => write!(f, "<ambiguous x{}>", alts.len()),
        }
    }

    fn children(&self) -> Cow<[Self::Child]> {
        match self {
            Tree::Rule(_, children) => Cow::from(children),
            Tree::Token(_) => Cow::from(&[][..]),
            Tree::Ambiguous(alts) => Cow::from(alts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::Candidate;
    use crate::grammar::{GrammarSpec, RuleDef};
    use crate::node::TokenIndex;
    use crate::step_down::StepDownTable;
    use crate::step_up::StepUpTable;

    fn demo_grammar() -> Grammar {
        Grammar::build(GrammarSpec::new(
            vec!["TRUE".into()],
            vec![
                RuleDef::new("top", "top_expr", vec!["expr"]),
                RuleDef::new("expr", "true_expr", vec!["TRUE"]),
            ],
        ))
        .unwrap()
    }

    #[test]
    fn renders_rule_names_and_token_positions() {
        let grammar = demo_grammar();
        let step_down = StepDownTable::build(&grammar, 64).unwrap();
        let step_up = StepUpTable::build(&grammar, &step_down).unwrap();
        let true_t = grammar.types.id_of("TRUE");
        let expr = grammar.types.id_of("expr");

        let c = Candidate::new(grammar.top_rule);
        let entries = step_down.lookup(true_t, expr);
        let mut successors =
            c.step_down_graft(c.root(), &entries[0], &grammar, &step_up, TokenIndex(0));
        let c = successors.remove(0);

        let tree = Tree::build(&c, &grammar);
        let rendered = tree.pretty();
        assert!(rendered.contains("top_expr"));
        assert!(rendered.contains("true_expr"));
        assert!(rendered.contains("#0"));
    }
}
