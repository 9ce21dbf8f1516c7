//! An ambiguous, grammar-driven, online parser over a token stream.
//!
//! # Overview
//!
//! Unlike a batch recursive-descent parser, this library consumes one lexeme
//! at a time and maintains a *set* of candidate parse trees rather than a
//! single parse stack. Ambiguity in the grammar - several productions that
//! could all still match the tokens seen so far - is represented directly as
//! multiple live candidates, pruned as further tokens rule them out (§3-§5).
//! Lexing is explicitly out of scope: callers hand in already-typed lexemes
//! (token type, text, position) via [`session::LexedToken`].
//!
//! # Design
//!
//! A grammar ([`grammar::GrammarSpec`]) is a flat list of rules, each a left-hand
//! nonterminal and a pattern of terminal/nonterminal symbols, with an optional
//! operator priority used to resolve otherwise-ambiguous parses of the same
//! span (§4.6). Building a [`session::Parser`] from a spec precomputes two
//! tables once: a step-down table, mapping (lexeme type, target nonterminal)
//! to the chain of rules that reaches a lexical leaf of that type, and a
//! step-up table, mapping (lexeme type, just-completed nonterminal) to the
//! rules that can wrap that completed node to keep accepting lexemes (§4.4).
//! Every [`session::Session::feed`] call advances the live candidate set using
//! those tables plus direct consumption, then prunes dead ends and
//! priority-filter losers (§4.5, §4.8).
//!
//! # Example
//!
//! ```
//! use cfg_online_parser::grammar::{GrammarSpec, RuleDef};
//! use cfg_online_parser::position::Position;
//! use cfg_online_parser::session::{LexedToken, Parser};
//!
//! let spec = GrammarSpec::new(
//!     vec!["NUM".into(), "DASH".into()],
//!     vec![
//!         RuleDef::new("top", "top_expr", vec!["expr"]),
//!         RuleDef::new("expr", "num_expr", vec!["NUM"]),
//!         RuleDef::new("expr", "sub_expr", vec!["expr", "DASH", "expr"]).with_priority(4),
//!     ],
//! );
//! let parser = Parser::new(spec).unwrap();
//! let mut session = parser.start();
//!
//! let num = parser.grammar().types.id_of("NUM");
//! let dash = parser.grammar().types.id_of("DASH");
//! let pos = Position::new(1, 1);
//! session.feed(LexedToken::new(num, "1", pos)).unwrap();
//! session.feed(LexedToken::new(dash, "-", pos)).unwrap();
//! session.feed(LexedToken::new(num, "2", pos)).unwrap();
//!
//! let tree = session.finish().unwrap();
//! assert!(tree.pretty().contains("sub_expr"));
//! ```

pub mod arena;
pub mod candidate;
pub mod engine;
pub mod error;
pub mod filter;
pub mod grammar;
pub mod logger;
pub mod node;
pub mod position;
pub mod registry;
pub mod session;
pub mod step_down;
pub mod step_up;
pub mod tree;

pub use error::{SessionError, SyntaxError};
pub use filter::{PostFilter, PriorityFilter};
pub use grammar::{Grammar, GrammarError, GrammarSpec, RuleDef};
pub use logger::Log;
pub use position::Position;
pub use session::{LexedToken, Parser, Session};
pub use tree::Tree;

#[cfg(test)]
mod demo_grammar;
