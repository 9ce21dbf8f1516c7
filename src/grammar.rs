//! Grammar schema validation and rule tables (§4.2, §6).

use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};

use crate::registry::{RuleId, RuleRegistry, TokenTypeId, TypeRegistry};

/// One rule as supplied by the caller, before interning (§6 grammar schema).
#[derive(Debug, Clone)]
pub struct RuleDef {
    pub lhs: String,
    pub name: String,
    pub pattern: Vec<String>,
    pub priority: u32,
    pub payload: Vec<u8>,
}

impl RuleDef {
    pub fn new(lhs: impl Into<String>, name: impl Into<String>, pattern: Vec<&str>) -> Self {
        Self {
            lhs: lhs.into(),
            name: name.into(),
            pattern: pattern.into_iter().map(String::from).collect(),
            priority: 0,
            payload: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }
}

/// The grammar as handed to [`crate::session::Parser::new`]: a list of rules
/// plus the declared set of lexical (terminal) type names.
#[derive(Debug, Clone)]
pub struct GrammarSpec {
    pub lexical_types: Vec<String>,
    pub rules: Vec<RuleDef>,
}

impl GrammarSpec {
    pub fn new(lexical_types: Vec<String>, rules: Vec<RuleDef>) -> Self {
        Self {
            lexical_types,
            rules,
        }
    }
}

/// Interned rule: producing nonterminal, unique name, priority, pattern, payload (§3).
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: RuleId,
    pub lhs: TokenTypeId,
    pub priority: u32,
    pub pattern: Vec<TokenTypeId>,
    pub payload: Vec<u8>,
}

impl Rule {
    pub fn first(&self) -> TokenTypeId {
        self.pattern[0]
    }
}

/// A malformed grammar, returned from [`Grammar::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    DuplicateRuleName(String),
    UnknownSymbol { rule: String, symbol: String },
    MissingTopRule,
    AmbiguousTopRule(usize),
    EmptyPattern(String),
    LeftRecursiveStepUp(String),
    StepDownDepthExceeded { rule: String, limit: usize },
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarError::DuplicateRuleName(name) => {
                write!(f, "GrammarError: duplicate rule name '{}'", name)
            }
            GrammarError::UnknownSymbol { rule, symbol } => write!(
                f,
                "GrammarError: rule '{}' references unknown symbol '{}'",
                rule, symbol
            ),
            GrammarError::MissingTopRule => {
                write!(f, "GrammarError: no rule with LHS 'top'")
            }
            GrammarError::AmbiguousTopRule(count) => write!(
                f,
                "GrammarError: expected exactly one rule with LHS 'top', found {}",
                count
            ),
            GrammarError::EmptyPattern(name) => {
                write!(f, "GrammarError: rule '{}' has an empty pattern", name)
            }
            GrammarError::LeftRecursiveStepUp(name) => write!(
                f,
                "GrammarError: rule '{}' is left-recursive through its step-up position (pattern[1] == pattern[0])",
                name
            ),
            GrammarError::StepDownDepthExceeded { rule, limit } => write!(
                f,
                "GrammarError: step-down construction from rule '{}' exceeded the configured depth limit ({})",
                rule, limit
            ),
        }
    }
}

pub const TOP_NONTERMINAL: &str = "top";

/// The indexed grammar: interned rules, grouped by producing nonterminal.
pub struct Grammar {
    pub types: TypeRegistry,
    pub rule_names: RuleRegistry,
    rules: Vec<Rule>,
    rules_by_lhs: HashMap<TokenTypeId, Vec<RuleId>>,
    pub top_rule: RuleId,
}

impl Grammar {
    /// Validate and index a [`GrammarSpec`], per §6's constraints:
    /// exactly one rule with LHS `top`; every pattern symbol is either a
    /// declared lexical type or the LHS of some rule; rule names are unique.
    pub fn build(spec: GrammarSpec) -> Result<Self, GrammarError> {
        let mut rule_names = RuleRegistry::new();
        let mut ids: Vec<RuleId> = Vec::with_capacity(spec.rules.len());
        for def in &spec.rules {
            if def.pattern.is_empty() {
                return Err(GrammarError::EmptyPattern(def.name.clone()));
            }
            match rule_names.intern(&def.name) {
                Some(id) => ids.push(id),
                None => return Err(GrammarError::DuplicateRuleName(def.name.clone())),
            }
        }

        let lexical: HashSet<&str> = spec.lexical_types.iter().map(String::as_str).collect();
        let mut nonterminal_names: Vec<String> = Vec::new();
        let mut seen_nonterminal: HashSet<&str> = HashSet::new();
        for def in &spec.rules {
            if seen_nonterminal.insert(def.lhs.as_str()) {
                nonterminal_names.push(def.lhs.clone());
            }
        }

        let types = TypeRegistry::build(&spec.lexical_types, &nonterminal_names);

        for def in &spec.rules {
            for symbol in &def.pattern {
                if !lexical.contains(symbol.as_str()) && !seen_nonterminal.contains(symbol.as_str())
                {
                    return Err(GrammarError::UnknownSymbol {
                        rule: def.name.clone(),
                        symbol: symbol.clone(),
                    });
                }
            }
        }

        let mut rules: Vec<Rule> = Vec::with_capacity(spec.rules.len());
        let mut rules_by_lhs: HashMap<TokenTypeId, Vec<RuleId>> = HashMap::new();
        for (def, &id) in spec.rules.iter().zip(ids.iter()) {
            let lhs = types.id_of(&def.lhs);
            let pattern = def.pattern.iter().map(|s| types.id_of(s)).collect();
            rules.push(Rule {
                id,
                lhs,
                priority: def.priority,
                pattern,
                payload: def.payload.clone(),
            });
            rules_by_lhs.entry(lhs).or_default().push(id);
        }

        let top_id = types.id_of(TOP_NONTERMINAL);
        let top_rules = rules_by_lhs.get(&top_id).cloned().unwrap_or_default();
        let top_rule = match top_rules.as_slice() {
            [] => return Err(GrammarError::MissingTopRule),
            [single] => *single,
            many => return Err(GrammarError::AmbiguousTopRule(many.len())),
        };

        Ok(Self {
            types,
            rule_names,
            rules,
            rules_by_lhs,
            top_rule,
        })
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    /// Rules producing a given nonterminal, in declaration order.
    pub fn rules_for(&self, lhs: TokenTypeId) -> &[RuleId] {
        self.rules_by_lhs
            .get(&lhs)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_spec() -> GrammarSpec {
        GrammarSpec::new(
            vec![
                "TRUE".into(),
                "FALSE".into(),
                "NUM".into(),
                "DASH".into(),
                "COMMA".into(),
            ],
            vec![
                RuleDef::new("top", "top_expr", vec!["expr"]),
                RuleDef::new("expr", "true_expr", vec!["TRUE"]),
                RuleDef::new("expr", "false_expr", vec!["FALSE"]),
                RuleDef::new("expr", "num_expr", vec!["NUM"]),
                RuleDef::new("expr", "sub_expr", vec!["expr", "DASH", "expr"])
                    .with_priority(4),
                RuleDef::new("list", "list_cons", vec!["COMMA", "list"]),
                RuleDef::new("list", "list_end", vec!["COMMA"]),
            ],
        )
    }

    #[test]
    fn builds_demo_grammar() {
        let grammar = Grammar::build(demo_spec()).unwrap();
        assert_eq!(grammar.rule_count(), 7);
        let expr_id = grammar.types.id_of("expr");
        assert_eq!(grammar.rules_for(expr_id).len(), 4);
    }

    #[test]
    fn rejects_missing_top() {
        let mut spec = demo_spec();
        spec.rules.retain(|r| r.lhs != "top");
        assert_eq!(Grammar::build(spec).unwrap_err(), GrammarError::MissingTopRule);
    }

    #[test]
    fn rejects_duplicate_rule_names() {
        let mut spec = demo_spec();
        spec.rules.push(RuleDef::new("expr", "true_expr", vec!["FALSE"]));
        assert!(matches!(
            Grammar::build(spec).unwrap_err(),
            GrammarError::DuplicateRuleName(_)
        ));
    }

    #[test]
    fn rejects_unknown_symbol() {
        let mut spec = demo_spec();
        spec.rules.push(RuleDef::new("expr", "bogus", vec!["NOT_DECLARED"]));
        assert!(matches!(
            Grammar::build(spec).unwrap_err(),
            GrammarError::UnknownSymbol { .. }
        ));
    }
}
