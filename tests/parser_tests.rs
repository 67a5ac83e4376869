// tests/parser_tests.rs

use datalisp::ast::{DataNode, ExpressionNode, StatementNode, SyntaxTree, ValueNode};
use datalisp::lexer::Lexer;
use datalisp::logger::{Level, LogRecord, MemoryLogger};
use datalisp::parser::{MAX_DEPTH, Parser};
use pretty_assertions::assert_eq;

fn parse(input: &str) -> (SyntaxTree, MemoryLogger) {
    let logger = MemoryLogger::new();
    let tree = Parser::new(Lexer::new(input, &logger)).parse();
    (tree, logger)
}

fn parse_ok(input: &str) -> SyntaxTree {
    let (tree, logger) = parse(input);
    assert_eq!(logger.records(), Vec::<LogRecord>::new(), "Unexpected diagnostics for: {}", input);
    tree
}

fn statement(name: &str, data: Vec<DataNode>) -> StatementNode {
    StatementNode {
        name: name.to_string(),
        data,
    }
}

fn int(n: i64) -> DataNode {
    DataNode::anonymous(ValueNode::Integer(n))
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_empty_source() {
    assert!(parse_ok("").is_empty());
    assert!(parse_ok("; nothing here\n").is_empty());
}

#[test]
fn test_multiple_statements() {
    let tree = parse_ok("(a) (b 1) (c, 2)");
    assert_eq!(
        tree.statements,
        vec![
            statement("a", vec![]),
            statement("b", vec![int(1)]),
            statement("c", vec![int(2)]),
        ]
    );
}

#[test]
fn test_end_to_end_example_tree() {
    let tree = parse_ok("(test :a 1 :b [2,3] (child :c true))");
    let expected = statement(
        "test",
        vec![
            DataNode::new("a", ValueNode::Integer(1)),
            DataNode::new(
                "b",
                ValueNode::Statement(statement("", vec![int(2), int(3)])),
            ),
            DataNode::anonymous(ValueNode::Statement(statement(
                "child",
                vec![DataNode::new("c", ValueNode::Boolean(true))],
            ))),
        ],
    );
    assert_eq!(tree.statements, vec![expected]);
}

#[test]
fn test_scalar_values() {
    let tree = parse_ok(r#"(v 1 -2 2.5 "s" 's' true false 1e3)"#);
    let values: Vec<ValueNode> = tree.statements[0]
        .data
        .iter()
        .map(|d| d.value.clone())
        .collect();
    assert_eq!(
        values,
        vec![
            ValueNode::Integer(1),
            ValueNode::Integer(-2),
            ValueNode::Float(2.5),
            ValueNode::String("s".to_string()),
            ValueNode::String("s".to_string()),
            ValueNode::Boolean(true),
            ValueNode::Boolean(false),
            ValueNode::Float(1000.0),
        ]
    );
}

#[test]
fn test_integer_keys() {
    let tree = parse_ok("(g :0 \"zero\" :-1 2)");
    assert_eq!(
        tree.statements[0].data,
        vec![
            DataNode::new("0", ValueNode::String("zero".to_string())),
            DataNode::new("-1", ValueNode::Integer(2)),
        ]
    );
}

#[test]
fn test_commas_are_optional() {
    let with = parse_ok("(g 1, 2, :k 3,)");
    let without = parse_ok("(g 1 2 :k 3)");
    assert_eq!(with, without);
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_expression_node() {
    let tree = parse_ok("(g :x $(if true 1 :k 2))");
    let mut expression = ExpressionNode::new("if");
    expression.args = vec![
        DataNode::anonymous(ValueNode::Boolean(true)),
        int(1),
        DataNode::new("k", ValueNode::Integer(2)),
    ];
    assert_eq!(
        tree.statements[0].data,
        vec![DataNode::new("x", ValueNode::Expression(expression))]
    );
}

#[test]
fn test_nested_expressions() {
    let tree = parse_ok("(g $(not $(and true [1 2])))");
    let ValueNode::Expression(outer) = &tree.statements[0].data[0].value else {
        panic!("expected expression");
    };
    assert_eq!(outer.name, "not");
    let ValueNode::Expression(inner) = &outer.args[0].value else {
        panic!("expected nested expression");
    };
    assert_eq!(inner.name, "and");
    assert!(matches!(&inner.args[1].value, ValueNode::Statement(s) if s.is_array()));
}

// ============================================================================
// Error recovery
// ============================================================================

#[test]
fn test_identifier_as_value() {
    let (tree, logger) = parse("(g :k ident)");
    // The key is parsed, the value is not a value token, so the list ends.
    assert_eq!(tree.statements.len(), 1);
    assert!(logger.error_count() >= 1);
}

#[test]
fn test_missing_close_paren() {
    let (tree, logger) = parse("(a 1");
    assert_eq!(tree.statements, vec![statement("a", vec![int(1)])]);
    assert_eq!(logger.messages(Level::Error), vec!["Expected ')' but got 'EOF'"]);
}

#[test]
fn test_missing_name() {
    // The colon is consumed in place of the name, then recovery cascades.
    let (tree, logger) = parse("(:k 1)");
    assert_eq!(tree.statements, vec![statement("", vec![])]);
    assert_eq!(
        logger.messages(Level::Error),
        vec![
            "Expected 'IDENTIFIER' but got ':'",
            "Expected ')' but got 'IDENTIFIER'",
            "Expected '(' or end of input but got 'INTEGER'",
        ]
    );
}

#[test]
fn test_integer_overflow_is_dropped() {
    let (tree, logger) = parse("(a 99999999999999999999 1)");
    assert_eq!(tree.statements[0].data, vec![int(1)]);
    assert_eq!(
        logger.messages(Level::Error),
        vec!["Integer '99999999999999999999' is out of range"]
    );
}

#[test]
fn test_errors_do_not_stop_following_statements() {
    let (tree, logger) = parse("(a # 1) (b 2)");
    assert_eq!(
        tree.statements,
        vec![statement("a", vec![int(1)]), statement("b", vec![int(2)])]
    );
    assert_eq!(logger.error_count(), 1);
}

#[test]
fn test_deep_nesting_is_cut_off() {
    let depth = 10_000;
    let (tree, logger) = parse(&format!("(g {}{}) (h 1)", "[".repeat(depth), "]".repeat(depth)));

    assert_eq!(tree.statements.len(), 2);
    assert_eq!(tree.statements[1], statement("h", vec![int(1)]));
    assert_eq!(
        logger.messages(Level::Error),
        vec![format!("Nesting is deeper than {MAX_DEPTH} levels")]
    );

    // The kept part stops one level short of the cut.
    let mut levels = 0;
    let mut value = &tree.statements[0].data[0].value;
    while let ValueNode::Statement(array) = value {
        levels += 1;
        match array.data.first() {
            Some(inner) => value = &inner.value,
            None => break,
        }
    }
    assert_eq!(levels, MAX_DEPTH);
}
