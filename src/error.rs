//! Session-level error types (§7, §10.2). `GrammarError` (returned from
//! `Parser::new`) lives in [`crate::grammar`]; everything raised at the
//! `feed`/`finish` boundary lives here. Plain `Debug` types with hand-written
//! `Display` impls, matching this codebase's existing error style - no
//! `thiserror`, no `anyhow`.

use std::fmt::{Display, Formatter};

/// Raised when `feed` eliminates the last live candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub token_type: String,
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SyntaxError: unexpected {} at {}:{}",
            self.token_type, self.line, self.column
        )
    }
}

/// Everything `Session::feed`/`Session::finish` can fail with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    Syntax(SyntaxError),
    /// `finish` found more than one candidate whose root is complete and no
    /// filter resolved it.
    AmbiguousParse { count: usize },
    /// `finish` found zero complete candidates.
    IncompleteParse,
    /// An internal node/parent consistency assertion failed. Fatal: the
    /// session must not be used further. Carries the name of the violated
    /// invariant rather than panicking, so a caller embedding the parser
    /// cannot be brought down by a bug in candidate bookkeeping.
    InternalInvariantViolation(&'static str),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Syntax(e) => Display::fmt(e, f),
            SessionError::AmbiguousParse { count } => {
                write!(f, "AmbiguousParse: {} complete candidates survived", count)
            }
            SessionError::IncompleteParse => write!(f, "IncompleteParse: no candidate completed"),
            SessionError::InternalInvariantViolation(what) => {
                write!(f, "InternalInvariantViolation: {}", what)
            }
        }
    }
}

impl std::error::Error for SessionError {}
impl std::error::Error for SyntaxError {}
impl std::error::Error for crate::grammar::GrammarError {}
