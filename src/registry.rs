//! Token type, token instance, and rule name interning (§4.1).
//!
//! Three write-once registries turn string names into small dense integers so the
//! hot path (step tables, candidate consumption) compares integers rather than
//! strings. Unknown names resolve to the sentinel id `0`, which every registry
//! treats as invalid rather than panicking - lookups never fail silently.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Interned token category, e.g. `IDENT`, `PLUS`, or a nonterminal like `expr`.
///
/// Lexical (terminal) categories occupy a distinguished prefix of the id space;
/// [`TypeRegistry::is_lexical`] is a single range test rather than a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenTypeId(u32);

impl TokenTypeId {
    /// Sentinel id returned for unknown names. Never a valid declared type.
    pub const INVALID: TokenTypeId = TokenTypeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for TokenTypeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Registry mapping declared `TokenType` names to dense ids and back.
///
/// Built once from two ordered name lists: the lexical (terminal) names first,
/// then the nonterminal names discovered while building the [`grammar`](crate::grammar)
/// tables. The boundary between the two forms the "distinguished prefix" from §3.
pub struct TypeRegistry {
    names: Vec<String>,
    ids: HashMap<String, TokenTypeId>,
    lexical_count: usize,
}

impl TypeRegistry {
    /// Build a registry from the declared lexical names followed by the
    /// nonterminal names collected from rule left-hand sides.
    ///
    /// Both lists must already be deduplicated; a duplicate name occurring in
    /// both lists (a lexical type reused as a nonterminal LHS) is a grammar
    /// error detected by the caller, not here.
    pub fn build(lexical_names: &[String], nonterminal_names: &[String]) -> Self {
        let mut names = Vec::with_capacity(1 + lexical_names.len() + nonterminal_names.len());
        let mut ids = HashMap::with_capacity(names.capacity());
        names.push(String::new()); // index 0: sentinel, never returned by id_of

        for name in lexical_names {
            let id = TokenTypeId(names.len() as u32);
            names.push(name.clone());
            ids.insert(name.clone(), id);
        }
        let lexical_count = lexical_names.len();

        for name in nonterminal_names {
            let id = TokenTypeId(names.len() as u32);
            names.push(name.clone());
            ids.insert(name.clone(), id);
        }

        Self {
            names,
            ids,
            lexical_count,
        }
    }

    /// Resolve a declared name to its id, or [`TokenTypeId::INVALID`] if unknown.
    pub fn id_of(&self, name: &str) -> TokenTypeId {
        self.ids.get(name).copied().unwrap_or(TokenTypeId::INVALID)
    }

    /// The declared source name for an id. Panics on the sentinel id or an id
    /// never produced by this registry - callers only hold ids this registry issued.
    pub fn name_of(&self, id: TokenTypeId) -> &str {
        &self.names[id.index()]
    }

    /// True for ids in the lexical (terminal) prefix.
    pub fn is_lexical(&self, id: TokenTypeId) -> bool {
        id != TokenTypeId::INVALID && id.index() <= self.lexical_count
    }

    /// True for ids past the lexical prefix, i.e. nonterminals.
    pub fn is_nonterminal(&self, id: TokenTypeId) -> bool {
        id != TokenTypeId::INVALID && id.index() > self.lexical_count
    }

    pub fn len(&self) -> usize {
        self.names.len() - 1
    }
}

/// Interned rule name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub(crate) u32);

impl RuleId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Registry interning unique rule names to dense ids, in declaration order.
///
/// Unlike [`TypeRegistry`] rule ids start at 0 and index directly into the
/// grammar's rule table (there is no sentinel: every [`RuleId`] a caller holds
/// was produced for a rule that exists).
pub struct RuleRegistry {
    names: Vec<String>,
    ids: HashMap<String, RuleId>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            ids: HashMap::new(),
        }
    }

    /// Intern a rule name. Returns `None` if the name was already interned
    /// (rule names must be unique across the grammar, checked by the caller).
    pub fn intern(&mut self, name: &str) -> Option<RuleId> {
        if self.ids.contains_key(name) {
            return None;
        }
        let id = RuleId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        Some(id)
    }

    pub fn name_of(&self, id: RuleId) -> &str {
        &self.names[id.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Interned token instance: a `(TokenType, content)` pair. Terminal instances
/// carry lexeme text; the registry also serves symbolic pattern references,
/// which always carry empty content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(u32);

impl TokenId {
    pub const INVALID: TokenId = TokenId(0);

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Registry interning `(TokenTypeId, content)` pairs produced while feeding a
/// session, so repeated identical lexemes (e.g. the keyword `true`) share one id.
#[derive(Default)]
pub struct TokenInstanceRegistry {
    entries: Vec<(TokenTypeId, String)>,
    ids: HashMap<(TokenTypeId, String), TokenId>,
}

impl TokenInstanceRegistry {
    pub fn new() -> Self {
        Self {
            entries: vec![(TokenTypeId::INVALID, String::new())],
            ids: HashMap::new(),
        }
    }

    pub fn intern(&mut self, token_type: TokenTypeId, content: &str) -> TokenId {
        if let Some(id) = self.ids.get(&(token_type, content.to_string())) {
            return *id;
        }
        let id = TokenId(self.entries.len() as u32);
        self.entries.push((token_type, content.to_string()));
        self.ids.insert((token_type, content.to_string()), id);
        id
    }

    pub fn type_of(&self, id: TokenId) -> TokenTypeId {
        self.entries[id.index()].0
    }

    pub fn content_of(&self, id: TokenId) -> &str {
        &self.entries[id.index()].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_registry_bijection() {
        let lexical = vec!["TRUE".to_string(), "DASH".to_string()];
        let nonterminal = vec!["expr".to_string()];
        let reg = TypeRegistry::build(&lexical, &nonterminal);
        for name in lexical.iter().chain(nonterminal.iter()) {
            let id = reg.id_of(name);
            assert_ne!(id, TokenTypeId::INVALID);
            assert_eq!(reg.name_of(id), name);
        }
        assert_eq!(reg.id_of("unknown"), TokenTypeId::INVALID);
    }

    #[test]
    fn lexical_prefix_is_distinguished() {
        let lexical = vec!["TRUE".to_string(), "DASH".to_string()];
        let nonterminal = vec!["expr".to_string()];
        let reg = TypeRegistry::build(&lexical, &nonterminal);
        assert!(reg.is_lexical(reg.id_of("TRUE")));
        assert!(reg.is_lexical(reg.id_of("DASH")));
        assert!(reg.is_nonterminal(reg.id_of("expr")));
        assert!(!reg.is_nonterminal(reg.id_of("TRUE")));
    }

    #[test]
    fn token_instance_bijection() {
        let mut reg = TokenInstanceRegistry::new();
        let t = TokenTypeId::INVALID;
        let id = reg.intern(t, "5");
        assert_eq!(reg.content_of(id), "5");
        assert_eq!(reg.type_of(id), t);
        // interning the same pair again returns the same id
        assert_eq!(reg.intern(t, "5"), id);
    }

    #[test]
    fn rule_registry_rejects_duplicate_names() {
        let mut reg = RuleRegistry::new();
        assert!(reg.intern("sub_expr").is_some());
        assert!(reg.intern("sub_expr").is_none());
    }
}
