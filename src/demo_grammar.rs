//! End-to-end scenarios S1-S6 driven through the public [`crate::session`] API,
//! colocated the way the teacher keeps its JSON walkthrough alongside the
//! library rather than under a separate integration-test crate.

use crate::error::SessionError;
use crate::grammar::{GrammarSpec, RuleDef};
use crate::position::Position;
use crate::session::{LexedToken, Parser};

fn pos(i: usize) -> Position {
    Position::new(1, i + 1)
}

fn feed_all(parser: &Parser, types: &[&str]) -> Result<String, SessionError> {
    let mut session = parser.start();
    for (i, name) in types.iter().enumerate() {
        let t = parser.grammar().types.id_of(name);
        session.feed(LexedToken::new(t, name.to_string(), pos(i)))?;
    }
    Ok(session.finish()?.pretty())
}

fn arithmetic_grammar() -> Parser {
    Parser::new(GrammarSpec::new(
        vec!["TRUE".into(), "FALSE".into(), "NUM".into(), "DASH".into()],
        vec![
            RuleDef::new("top", "top_expr", vec!["expr"]),
            RuleDef::new("expr", "true_expr", vec!["TRUE"]),
            RuleDef::new("expr", "false_expr", vec!["FALSE"]),
            RuleDef::new("expr", "num_expr", vec!["NUM"]),
            RuleDef::new("expr", "sub_expr", vec!["expr", "DASH", "expr"]).with_priority(4),
        ],
    ))
    .unwrap()
}

#[test]
fn s1_single_true_parses_uniquely() {
    let parser = arithmetic_grammar();
    let rendered = feed_all(&parser, &["TRUE"]).unwrap();
    assert!(rendered.contains("top_expr"));
    assert!(rendered.contains("true_expr"));
}

#[test]
fn s2_chained_subtraction_prefers_leftmost_dash_outermost() {
    let parser = arithmetic_grammar();
    let rendered = feed_all(&parser, &["NUM", "DASH", "NUM", "DASH", "NUM"]).unwrap();
    // Left-nested: the outer sub_expr's left child is itself a sub_expr, not a
    // bare num_expr - i.e. ((5 - 10) - 1), matching the leftmost-DASH-outermost rule.
    assert_eq!(rendered.matches("sub_expr").count(), 2);
    assert_eq!(rendered.matches("num_expr").count(), 3);
}

#[test]
fn s3_token_with_nowhere_to_attach_is_a_syntax_error() {
    // After COMMA COMMA FALSE, "seq" is already a complete parse; a further
    // TRUE has no step-up target ("seq" never appears as a pattern[0]).
    let parser = Parser::new(GrammarSpec::new(
        vec!["COMMA".into(), "FALSE".into(), "TRUE".into()],
        vec![
            RuleDef::new("top", "top_seq", vec!["seq"]),
            RuleDef::new("seq", "seq_comma", vec!["COMMA", "seq"]),
            RuleDef::new("seq", "seq_base", vec!["FALSE"]),
        ],
    ))
    .unwrap();

    let mut session = parser.start();
    let comma = parser.grammar().types.id_of("COMMA");
    let false_t = parser.grammar().types.id_of("FALSE");
    let true_t = parser.grammar().types.id_of("TRUE");

    session
        .feed(LexedToken::new(comma, "COMMA", pos(0)))
        .unwrap();
    session
        .feed(LexedToken::new(comma, "COMMA", pos(1)))
        .unwrap();
    session
        .feed(LexedToken::new(false_t, "FALSE", pos(2)))
        .unwrap();

    let err = session
        .feed(LexedToken::new(true_t, "TRUE", pos(3)))
        .unwrap_err();
    match err {
        SessionError::Syntax(e) => {
            assert_eq!(e.line, 1);
            assert_eq!(e.column, 4);
            assert_eq!(e.token_type, "TRUE");
        }
        other => panic!("expected SyntaxError, got {:?}", other),
    }
}

#[test]
fn s4_list_alternative_parses_uniquely() {
    let parser = Parser::new(GrammarSpec::new(
        vec!["COMMA".into(), "TRUE".into()],
        vec![
            RuleDef::new("top", "top_either", vec!["either"]),
            RuleDef::new("either", "either_expr", vec!["expr"]),
            RuleDef::new("either", "either_list", vec!["list"]),
            RuleDef::new("expr", "expr_true", vec!["TRUE"]),
            RuleDef::new("list", "list_rule", vec!["COMMA", "list_tail"]),
            RuleDef::new("list_tail", "list_tail_rule", vec!["TRUE"]),
        ],
    ))
    .unwrap();

    let rendered = feed_all(&parser, &["COMMA", "TRUE"]).unwrap();
    assert!(rendered.contains("list_rule"));
    assert!(rendered.contains("list_tail_rule"));
}

#[test]
fn s5_second_token_with_no_slot_is_a_syntax_error_after_a_valid_first_parse() {
    let parser = Parser::new(GrammarSpec::new(
        vec!["TRUE".into()],
        vec![
            RuleDef::new("top", "top_expr", vec!["expr"]),
            RuleDef::new("expr", "true_expr", vec!["TRUE"]),
        ],
    ))
    .unwrap();

    let mut session = parser.start();
    let true_t = parser.grammar().types.id_of("TRUE");
    session
        .feed(LexedToken::new(true_t, "TRUE", pos(0)))
        .unwrap();
    assert_eq!(session.live_candidate_count(), 1);

    let err = session
        .feed(LexedToken::new(true_t, "TRUE", pos(1)))
        .unwrap_err();
    assert!(matches!(err, SessionError::Syntax(_)));
}

#[test]
fn s6_ambiguous_slot_survives_to_finish_as_ambiguous_parse() {
    // Two distinct rules ("direct_comma", "indirect_comma") both reduce a lone
    // COMMA to "expr" - the same slot, same lexeme, two unrelated derivations.
    // Adapted from the literal S6 grammar text (`expr -> COMMA | FALSE`),
    // which with only those two alternatives is not actually ambiguous for
    // any input (COMMA and FALSE are disjoint lexeme types); this version
    // keeps the intent - an ambiguous slot surviving to `finish` - while
    // actually producing two complete candidates.
    let parser = Parser::new(GrammarSpec::new(
        vec!["COMMA".into()],
        vec![
            RuleDef::new("top", "top_pair", vec!["pair"]),
            RuleDef::new("pair", "pair_rule", vec!["COMMA", "expr"]),
            RuleDef::new("expr", "direct_comma", vec!["COMMA"]),
            RuleDef::new("expr", "indirect_comma", vec!["COMMA"]),
        ],
    ))
    .unwrap();

    let mut session = parser.start();
    let comma = parser.grammar().types.id_of("COMMA");
    session
        .feed(LexedToken::new(comma, "COMMA", pos(0)))
        .unwrap();
    session
        .feed(LexedToken::new(comma, "COMMA", pos(1)))
        .unwrap();

    match session.finish() {
        Err(SessionError::AmbiguousParse { count }) => assert_eq!(count, 2),
        other => panic!("expected AmbiguousParse{{2}}, got {:?}", other),
    }
}
