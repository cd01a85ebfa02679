//! Parser tests for the concrete syntax

use crate::ast::*;
use crate::lexer::tokenize;
use crate::parser::{parse, parse_expression};

/// Helper to parse a program and return the AST
fn parse_program(source: &str) -> crate::Result<Block> {
    let tokens = tokenize(source)?;
    parse("test.pc", source, tokens)
}

/// Helper to parse and expect success
fn parse_ok(source: &str) -> Block {
    parse_program(source).expect("Parse should succeed")
}

/// Helper to check if parsing fails
fn parse_fails(source: &str) -> bool {
    parse_program(source).is_err()
}

fn expr(source: &str) -> Expression {
    parse_expression(tokenize(source).unwrap()).expect("Expression should parse")
}

fn int(n: i64) -> Expression {
    Expression::integer(n)
}

// ============================================
// Expressions
// ============================================

#[test]
fn test_parse_literals() {
    assert_eq!(expr("42"), int(42));
    assert_eq!(expr("true"), Expression::boolean(true));
    assert_eq!(expr("false"), Expression::boolean(false));
    assert_eq!(expr(r#""hi""#), Expression::string("hi"));
}

#[test]
fn test_parse_precedence() {
    // 9 * (xyz + 5) keeps the nesting; 1 + 2 * 3 binds the product first
    assert_eq!(
        expr("9 * (xyz + 5)"),
        Expression::arithmetic(
            int(9),
            ArithmeticOp::Multiply,
            Expression::nested(Expression::arithmetic(Expression::name("xyz"), ArithmeticOp::Plus, int(5))),
        )
    );
    assert_eq!(
        expr("1 + 2 * 3"),
        Expression::arithmetic(
            int(1),
            ArithmeticOp::Plus,
            Expression::arithmetic(int(2), ArithmeticOp::Multiply, int(3)),
        )
    );
}

#[test]
fn test_parse_left_associative() {
    assert_eq!(
        expr("10 - 3 - 2"),
        Expression::arithmetic(
            Expression::arithmetic(int(10), ArithmeticOp::Minus, int(3)),
            ArithmeticOp::Minus,
            int(2),
        )
    );
}

#[test]
fn test_parse_negative_literal() {
    assert_eq!(expr("-7"), int(-7));
    assert_eq!(
        expr("x - -1"),
        Expression::arithmetic(Expression::name("x"), ArithmeticOp::Minus, int(-1))
    );
    assert_eq!(expr("2 * -3"), Expression::arithmetic(int(2), ArithmeticOp::Multiply, int(-3)));
    assert_eq!(expr("{-1, 2}"), Expression::Atom(Atom::Literal(Literal::Array(vec![int(-1), int(2)]))));
    parse_ok("return -1;");
}

#[test]
fn test_negative_literal_range() {
    assert_eq!(expr("-9223372036854775808"), int(i64::MIN));
    assert_eq!(expr("9223372036854775807"), int(i64::MAX));
    assert!(parse_fails("x = 9223372036854775808;"));
    assert!(parse_fails("x = -9223372036854775809;"));
}

#[test]
fn test_negation_of_non_literal() {
    let zero_minus = |e| Expression::arithmetic(int(0), ArithmeticOp::Minus, e);
    assert_eq!(expr("-x"), zero_minus(Expression::name("x")));
    assert_eq!(
        expr("-(1 + 2)"),
        zero_minus(Expression::nested(Expression::arithmetic(int(1), ArithmeticOp::Plus, int(2))))
    );
    assert_eq!(expr("--5"), zero_minus(int(-5)));
}

#[test]
fn test_parse_comparison_operators() {
    let cases = [
        ("<", ComparisonOp::LessThan),
        ("<=", ComparisonOp::LessEqual),
        (">", ComparisonOp::GreaterThan),
        (">=", ComparisonOp::GreaterEqual),
        ("==", ComparisonOp::Equals),
        ("!=", ComparisonOp::NotEquals),
    ];
    for (text, op) in cases {
        assert_eq!(
            expr(&format!("a {text} 1")),
            Expression::comparison(Expression::name("a"), op, int(1)),
            "{text}"
        );
    }
}

#[test]
fn test_comparisons_do_not_chain() {
    assert!(parse_fails("x = 1 < 2 < 3;"));
    parse_ok("x = (1 < 2) == true;");
}

#[test]
fn test_parse_field_path() {
    assert_eq!(
        expr("a.b[i + 1].c"),
        Expression::path(
            FieldPath::name("a")
                .field("b")
                .index(Expression::arithmetic(Expression::name("i"), ArithmeticOp::Plus, int(1)))
                .field("c")
        )
    );
}

#[test]
fn test_parse_array_literal() {
    assert_eq!(
        expr("{5, 6, 7}"),
        Expression::Atom(Atom::Literal(Literal::Array(vec![int(5), int(6), int(7)])))
    );
    assert_eq!(expr("{}"), Expression::Atom(Atom::Literal(Literal::Array(vec![]))));
}

#[test]
fn test_parse_record_literal() {
    let parsed = expr(r#"Person<id: 7, name: "ada", home: Address<zip: 1 + 2>>"#);
    let Expression::Atom(Atom::Literal(Literal::Record(record))) = parsed else {
        panic!("expected record literal");
    };
    assert_eq!(record.type_name, "Person");
    let names: Vec<_> = record.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "home"]);
    assert!(matches!(
        &record.fields[2].value,
        Expression::Atom(Atom::Literal(Literal::Record(inner))) if inner.type_name == "Address"
    ));
}

#[test]
fn test_record_field_comparison_needs_parens() {
    parse_ok("x = Flag<on: (a > 1)>;");
    assert!(parse_fails("x = Flag<on: a > 1>;"));
}

#[test]
fn test_parse_call_arguments() {
    let Expression::Call(call) = expr("f(x = 4, y + 1, z = 2)") else {
        panic!("expected call");
    };
    assert_eq!(call.target, "f");
    let names: Vec<_> = call.arguments.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["x", "arg1", "z"]);
}

#[test]
fn test_parse_call_without_arguments() {
    assert_eq!(expr("print_symbols()"), Expression::Call(Call::new("print_symbols", vec![])));
}

// ============================================
// Statements
// ============================================

#[test]
fn test_parse_assignments() {
    let block = parse_ok("x = 5; a.b = 6; a[0] = 7;");
    assert_eq!(
        block.statements,
        vec![
            Statement::assign_name("x", int(5)),
            Statement::assign(FieldPath::name("a").field("b"), int(6)),
            Statement::assign(FieldPath::name("a").index(int(0)), int(7)),
        ]
    );
}

#[test]
fn test_parse_call_statement() {
    let block = parse_ok("setq(x, 5);");
    assert_eq!(
        block.statements,
        vec![Statement::Call(Call::new(
            "setq",
            vec![
                Argument::new("arg0", Expression::name("x")),
                Argument::new("arg1", int(5)),
            ],
        ))]
    );
}

#[test]
fn test_parse_conditional_chain() {
    let block = parse_ok(
        "if (x == 1) { return 10; } elif (x == 2) { return 20; } elif (x == 3) { return 25; } else { return 30; }",
    );
    let [Statement::Conditional(cond)] = block.statements.as_slice() else {
        panic!("expected one conditional");
    };
    assert_eq!(cond.elif_branches.len(), 2);
    assert_eq!(cond.else_body, Some(Block::new(vec![Statement::Return(int(30))])));
}

#[test]
fn test_parse_conditional_without_else() {
    let block = parse_ok("if (true) { x = 1; }");
    let [Statement::Conditional(cond)] = block.statements.as_slice() else {
        panic!("expected one conditional");
    };
    assert!(cond.elif_branches.is_empty());
    assert!(cond.else_body.is_none());
}

#[test]
fn test_parse_while() {
    let block = parse_ok("while (x > 0) { x = x - 1; }");
    assert!(matches!(&block.statements[0], Statement::While { body, .. } if body.statements.len() == 1));
}

#[test]
fn test_parse_define() {
    let block = parse_ok("define f { return x * 2; }");
    assert_eq!(
        block.statements,
        vec![Statement::Define {
            name: "f".to_string(),
            body: Block::new(vec![Statement::Return(Expression::arithmetic(
                Expression::name("x"),
                ArithmeticOp::Multiply,
                int(2),
            ))]),
        }]
    );
}

#[test]
fn test_parse_comments() {
    let block = parse_ok("# header\nx = 1; // trailing\n");
    assert_eq!(block.statements.len(), 1);
}

#[test]
fn test_parse_empty_program() {
    assert!(parse_ok("").is_empty());
}

// ============================================
// Errors
// ============================================

#[test]
fn test_missing_semicolon() {
    assert!(parse_fails("x = 1"));
}

#[test]
fn test_bare_expression_statement_rejected() {
    assert!(parse_fails("1 + 2;"));
}

#[test]
fn test_error_span_points_at_token() {
    let err = parse_program("x = ;").unwrap_err();
    assert_eq!(err.span(), Some(Span::new(4, 5)));
}

#[test]
fn test_unclosed_block() {
    let err = parse_program("while (true) { x = 1;").unwrap_err();
    assert!(matches!(err, crate::CompileError::Parser { .. }));
}
