//! Public API (§6): build a [`Parser`] once from a [`GrammarSpec`], then drive
//! as many independent [`Session`]s over it as needed. Mirrors the teacher's
//! `DefaultParser::new` (validate-at-construction) / `parse` split, reshaped
//! for token-at-a-time online consumption instead of batch parsing.

use crate::candidate::Candidate;
use crate::engine::{consume_token, prune};
use crate::error::{SessionError, SyntaxError};
use crate::filter::{PostFilter, PriorityFilter};
use crate::grammar::{Grammar, GrammarError, GrammarSpec};
use crate::logger::{EngineLogger, Log};
use crate::node::TokenIndex;
use crate::position::Position;
use crate::registry::TokenTypeId;
use crate::step_down::StepDownTable;
use crate::step_up::StepUpTable;
use crate::tree::Tree;

/// A single lexeme handed to [`Session::feed`]: its type, its text, and where
/// it was found. Lexing is out of scope (§1); this is the boundary the
/// external collaborator hands tokens across.
#[derive(Debug, Clone)]
pub struct LexedToken {
    pub token_type: TokenTypeId,
    pub content: String,
    pub position: Position,
}

impl LexedToken {
    pub fn new(token_type: TokenTypeId, content: impl Into<String>, position: Position) -> Self {
        Self {
            token_type,
            content: content.into(),
            position,
        }
    }
}

/// A built, validated grammar plus its precomputed step-down/step-up tables
/// (§6). Cheap to share across many concurrent [`Session`]s via `&Parser`.
pub struct Parser {
    grammar: Grammar,
    step_down: StepDownTable,
    step_up: StepUpTable,
    filters: Vec<Box<dyn PostFilter>>,
    logger: EngineLogger,
}

impl Parser {
    /// Build and validate a grammar (§6), rejecting left-recursive step-up
    /// rules and pathological step-down depth up front rather than at the
    /// first lexeme that would trigger them.
    pub fn new(spec: GrammarSpec) -> Result<Self, GrammarError> {
        Self::with_step_down_depth(spec, 4096)
    }

    pub fn with_step_down_depth(spec: GrammarSpec, max_step_down_depth: usize) -> Result<Self, GrammarError> {
        let grammar = Grammar::build(spec)?;
        let step_down = StepDownTable::build(&grammar, max_step_down_depth)?;
        let step_up = StepUpTable::build(&grammar, &step_down)?;
        let logger = EngineLogger::new(Log::None);
        #[cfg(debug_assertions)]
        logger.log_tables_built(step_down.entry_count(), step_up.entry_count());
        Ok(Self {
            grammar,
            step_down,
            step_up,
            filters: vec![Box::new(PriorityFilter)],
            logger,
        })
    }

    /// Replace the post-filter set (§4.6, §4.9). The built-in
    /// [`PriorityFilter`] is included by default; pass an empty vec to parse
    /// with only the grammar's structural constraints.
    pub fn with_filters(mut self, filters: Vec<Box<dyn PostFilter>>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_logger(mut self, level: Log<&'static str>) -> Self {
        self.logger = EngineLogger::new(level);
        self
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Start a fresh online parse (§3 Lifecycle): a single candidate holding
    /// just the root node.
    pub fn start(&self) -> Session<'_> {
        Session {
            parser: self,
            candidates: vec![Candidate::new(self.grammar.top_rule)],
            tokens: Vec::new(),
            poisoned: false,
        }
    }
}

/// One in-progress online parse: the live candidate set plus the token
/// history fed so far (§3, §6).
pub struct Session<'p> {
    parser: &'p Parser,
    candidates: Vec<Candidate>,
    tokens: Vec<LexedToken>,
    poisoned: bool,
}

impl<'p> Session<'p> {
    /// Advance every live candidate past one lexeme (§4.5), then prune
    /// (§4.8). Fails with [`SessionError::Syntax`] the moment the candidate
    /// set empties out - the caller learns of a parse error as soon as it is
    /// certain, not only at [`Self::finish`].
    pub fn feed(&mut self, token: LexedToken) -> Result<(), SessionError> {
        if self.poisoned {
            return Err(SessionError::InternalInvariantViolation(
                "feed called on a session already in an error state",
            ));
        }
        let token_index = TokenIndex(self.tokens.len());
        let candidates = std::mem::take(&mut self.candidates);
        let advanced = consume_token(
            candidates,
            &self.parser.grammar,
            &self.parser.step_down,
            &self.parser.step_up,
            token.token_type,
            token_index,
            &self.parser.logger,
        );
        let survivors = prune(
            advanced,
            &self.parser.grammar,
            &self.parser.filters,
            &self.parser.logger,
            token_index.0,
        );
        if survivors.is_empty() {
            self.poisoned = true;
            let type_name = self
                .parser
                .grammar
                .types
                .name_of(token.token_type)
                .to_string();
            return Err(SessionError::Syntax(SyntaxError {
                line: token.position.line,
                column: token.position.column,
                token_type: type_name,
            }));
        }
        self.candidates = survivors;
        self.tokens.push(token);
        Ok(())
    }

    /// Close the stream (§6): succeeds only when exactly one live candidate
    /// has a complete root. Zero is [`SessionError::IncompleteParse`]; more
    /// than one, with no filter left to resolve it, is
    /// [`SessionError::AmbiguousParse`].
    pub fn finish(self) -> Result<Tree, SessionError> {
        if self.poisoned {
            return Err(SessionError::InternalInvariantViolation(
                "finish called on a session already in an error state",
            ));
        }
        let grammar = &self.parser.grammar;
        let mut complete: Vec<&Candidate> = self
            .candidates
            .iter()
            .filter(|c| c.root_is_complete(grammar))
            .collect();
        match complete.len() {
            0 => Err(SessionError::IncompleteParse),
            1 => Ok(Tree::build(complete.remove(0), grammar)),
            count => Err(SessionError::AmbiguousParse { count }),
        }
    }

    /// The lexemes consumed so far, in order.
    pub fn tokens(&self) -> &[LexedToken] {
        &self.tokens
    }

    /// How many candidates are currently alive. Useful for tests and
    /// diagnostics; not part of the parse result itself.
    pub fn live_candidate_count(&self) -> usize {
        self.candidates.len()
    }
}
