use shmoptix::error::CompileError;
use shmoptix::lexer::{Lexer, Position, TokenKind};
use shmoptix::parser::*;
use shmoptix::ty::ValueType;

fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::tokenize(input)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Identifier(name.to_string())
}

#[test]
fn tokenize_prototype() {
    assert_eq!(
        kinds("surface foo(float Kd = 123)"),
        vec![
            TokenKind::Surface,
            ident("foo"),
            TokenKind::ParenOpen,
            ident("float"),
            ident("Kd"),
            TokenKind::Equals,
            TokenKind::Number(123.0),
            TokenKind::ParenClose,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn tokenize_skips_comments() {
    assert_eq!(
        kinds("// leading comment\nnormal n; // trailing\n"),
        vec![
            TokenKind::Normal,
            ident("n"),
            TokenKind::Semicolon,
            TokenKind::Eof
        ]
    );
}

#[test]
fn tokenize_identifiers_and_numbers() {
    assert_eq!(kinds("Kd2x"), vec![ident("Kd2x"), TokenKind::Eof]);
    assert_eq!(
        kinds("2x"),
        vec![TokenKind::Number(2.0), ident("x"), TokenKind::Eof]
    );
    assert_eq!(kinds("a / b")[1], TokenKind::Slash);
    assert_eq!(kinds("{ } , *")[..4], [
        TokenKind::BraceOpen,
        TokenKind::BraceClose,
        TokenKind::Comma,
        TokenKind::Star
    ]);
}

#[test]
fn tokenize_tracks_positions() {
    let tokens = Lexer::tokenize("\n  surface").unwrap();
    assert_eq!(tokens[0].pos, Position::new(2, 3));
}

#[test]
fn tokenize_rejects_unknown_characters() {
    assert_eq!(
        Lexer::tokenize("Ci = Kd + Cs;"),
        Err(CompileError::Lex {
            found: '+',
            pos: Position::new(1, 9)
        })
    );
    // Numbers are plain digit sequences.
    assert!(matches!(
        Lexer::tokenize("Kd = 0.5"),
        Err(CompileError::Lex { found: '.', .. })
    ));
    assert!(matches!(
        Lexer::tokenize("a_b"),
        Err(CompileError::Lex { found: '_', .. })
    ));
}

fn parse(input: &str) -> Result<ShaderDefinition, CompileError> {
    shmoptix::parse(input)
}

fn single_stmt(input: &str) -> Expr {
    let shader = parse(input).unwrap();
    assert_eq!(shader.body.len(), 1);
    let Stmt::Expr(Expr::Assignment(_, rhs)) = &shader.body[0] else {
        panic!("expected an assignment, got {:?}", shader.body[0]);
    };
    (**rhs).clone()
}

#[test]
fn parse_minimal_shader() {
    let shader = parse("surface foo(float Kd = 1) { Ci = Kd * Cs; }").unwrap();

    assert_eq!(shader.prototype.name, "foo");
    assert_eq!(
        shader.prototype.arguments,
        vec![Argument {
            ty: ValueType::Float,
            name: "Kd".to_string(),
            default: Some(1.0),
        }]
    );
    assert_eq!(
        shader.body,
        vec![Stmt::Expr(Expr::assignment(
            Expr::variable("Ci"),
            Expr::multiply(Expr::variable("Kd"), Expr::variable("Cs")),
        ))]
    );
}

#[test]
fn describe_is_stable() {
    let shader = parse("surface foo(float Kd = 1) { Ci = Kd * Cs; }").unwrap();
    let expected = "\
SurfaceShader
  ShaderPrototype foo
    Argument Float Kd 1
  Assignment
    Variable Ci
    BinaryMultiply
      Variable Kd
      Variable Cs
";
    assert_eq!(shader.describe(), expected);
    assert_eq!(shader.describe(), shader.describe());
}

#[test]
fn parse_rejects_unknown_argument_type() {
    assert_eq!(
        parse("surface bad(int x) {}"),
        Err(CompileError::UnknownType {
            type_name: "int".to_string(),
            argument: "x".to_string(),
        })
    );
}

#[test]
fn parse_empty_body() {
    let shader = parse("surface empty() {}").unwrap();
    assert!(shader.prototype.arguments.is_empty());
    assert!(shader.body.is_empty());
}

#[test]
fn parse_argument_order() {
    let shader = parse("surface s(color Cs, float Kd) {}").unwrap();
    let args: Vec<_> = shader
        .prototype
        .arguments
        .iter()
        .map(|a| (a.ty, a.name.as_str(), a.default))
        .collect();
    assert_eq!(
        args,
        vec![(ValueType::Color, "Cs", None), (ValueType::Float, "Kd", None)]
    );
}

#[test]
fn parse_calls() {
    assert_eq!(
        single_stmt("surface s() { Ci = diffuse(N); }"),
        Expr::Call {
            callee: "diffuse".to_string(),
            argument: Some("N".to_string()),
        }
    );
    assert_eq!(
        single_stmt("surface s() { Ci = ambient(); }"),
        Expr::Call {
            callee: "ambient".to_string(),
            argument: None,
        }
    );
}

#[test]
fn parse_multiply_chain_is_left_associative() {
    assert_eq!(
        single_stmt("surface s() { Ci = Kd * Cs * Os; }"),
        Expr::multiply(
            Expr::multiply(Expr::variable("Kd"), Expr::variable("Cs")),
            Expr::variable("Os"),
        )
    );
    assert_eq!(
        single_stmt("surface s() { Ci = 2 * Cs; }"),
        Expr::multiply(Expr::Number(2.0), Expr::variable("Cs"))
    );
}

#[test]
fn parse_statement_sequence() {
    let shader = parse("surface s() { normal n; n = N; Ci = n * Cs; }").unwrap();
    assert_eq!(shader.body.len(), 3);
    assert_eq!(
        shader.body[0],
        Stmt::Declaration(Declaration {
            name: "n".to_string()
        })
    );
}

#[test]
fn parse_errors_name_the_expected_token() {
    let Err(CompileError::Parse { message, found, .. }) = parse("surface s() { Ci = Cs }") else {
        panic!("expected a parse error");
    };
    assert_eq!(message, "Expected ';'");
    assert_eq!(found, TokenKind::BraceClose);

    let Err(CompileError::Parse { message, .. }) = parse("surface a(float x float y) {}") else {
        panic!("expected a parse error");
    };
    assert_eq!(message, "Expected ',' or ')' in argument list");

    let Err(CompileError::Parse { message, .. }) = parse("surface s(float Kd = x) {}") else {
        panic!("expected a parse error");
    };
    assert_eq!(message, "Expected a number");
}

#[test]
fn parse_accepts_exactly_one_shader() {
    let Err(CompileError::Parse { found, .. }) = parse("surface a() {} surface b() {}") else {
        panic!("expected a parse error");
    };
    assert_eq!(found, TokenKind::Surface);

    assert!(matches!(
        parse("normal n;"),
        Err(CompileError::Parse { found: TokenKind::Normal, .. })
    ));
}

#[test]
fn tokenize_long_comment_header() {
    let mut source = "// header\n".repeat(100_000);
    source.push_str("surface s() {}");
    let tokens = Lexer::tokenize(&source).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Surface);
    assert_eq!(tokens[0].pos, Position::new(100_001, 1));
    assert!(parse(&source).is_ok());
}
