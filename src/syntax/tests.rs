use std::path::Path;

use super::parse_document;
use crate::{error::SchemaError, schema::SchemaRegistry};

const LOX: &str = "
# expressions
[Expr]
Binary:  Expr l, Token op, Expr r   # infix
Literal: Object val

[Stmt]
Block: List<Stmt> statements
Break:
";

#[test]
fn groups_lines_under_headers() {
    let document = parse_document(LOX).unwrap();
    let categories: Vec<_> = document.categories.iter().map(|c| *c.name).collect();
    assert_eq!(categories, ["Expr", "Stmt"]);

    let expr: Vec<_> = document.categories[0].lines.iter().map(|l| **l).collect();
    assert_eq!(expr, ["Binary:  Expr l, Token op, Expr r", "Literal: Object val"]);
}

#[test]
fn registers_blocks() {
    let document = parse_document(LOX).unwrap();
    let mut registry = SchemaRegistry::new();
    for block in &document.categories {
        block.register(&mut registry).unwrap();
    }

    let stmt = registry.get("Stmt").unwrap();
    assert_eq!(stmt.kind("Block").unwrap().fields[0].ty, "List<Stmt>");
    assert!(stmt.kind("Break").unwrap().fields.is_empty());

    let expr = registry.get("Expr").unwrap();
    let binary: Vec<_> = expr.kind("Binary").unwrap().fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(binary, ["l", "op", "r"]);
}

#[test]
fn crlf_line_endings() {
    let document = parse_document("[Expr]\r\nLiteral: Object val\r\n").unwrap();
    let mut registry = SchemaRegistry::new();
    let schema = document.categories[0].register(&mut registry).unwrap();
    assert_eq!(schema.kind("Literal").unwrap().fields[0].name, "val");
}

#[test]
fn empty_document() {
    let document = parse_document("# nothing here\n\n").unwrap();
    assert!(document.categories.is_empty());
}

#[test]
fn empty_category() {
    let document = parse_document("[Pattern]\n[Expr]\nLiteral: Object val").unwrap();
    let mut registry = SchemaRegistry::new();
    let schema = document.categories[0].register(&mut registry).unwrap();
    assert!(schema.is_empty());
}

#[test]
fn kind_before_header() {
    let src = "Literal: Object val\n[Expr]\n";
    let err = parse_document(src).unwrap_err();
    assert!(matches!(*err, SchemaError::Syntax { .. }));
    assert_eq!(&src[err.span], "Literal: Object val");
}

#[test]
fn unterminated_header() {
    let src = "[Expr\nLiteral: Object val";
    let document = parse_document(src).unwrap();
    assert_eq!(*document.categories[0].name, "Expr");
    let err = document.categories[0]
        .register(&mut SchemaRegistry::new())
        .unwrap_err();
    insta::assert_snapshot!(err.render(src, None), @r"
    error: unterminated category header, expected `]`
     --> <schema>:1:1
      |
    1 | [Expr
      | ^^^^^
    ");
}

#[test]
fn unterminated_header_fails_only_its_block() {
    let src = "[Expr]\nLiteral: Object val\n[Stmt\nPrint: Expr expr\n[Decl]\nVar: Token name\n";
    let document = parse_document(src).unwrap();
    let mut registry = SchemaRegistry::new();

    let results: Vec<_> = document
        .categories
        .iter()
        .map(|block| (*block.name, block.register(&mut registry).is_ok()))
        .collect();
    assert_eq!(results, [("Expr", true), ("Stmt", false), ("Decl", true)]);
    assert_eq!(document.categories[1].lines.len(), 1);
    assert!(registry.get("Stmt").is_none());
}

#[test]
fn missing_colon() {
    let src = "[Stmt]\nPrint Expr expr\n";
    let document = parse_document(src).unwrap();
    let err = document.categories[0]
        .register(&mut SchemaRegistry::new())
        .unwrap_err();

    assert_eq!(
        *err,
        SchemaError::MissingColon {
            category: "Stmt".into(),
            line: "Print Expr expr".into(),
        }
    );
}

#[test]
fn invalid_kind_name() {
    let src = "[Stmt]\nVar Decl: Token name\n";
    let document = parse_document(src).unwrap();
    let err = document.categories[0]
        .register(&mut SchemaRegistry::new())
        .unwrap_err();

    assert_eq!(
        *err,
        SchemaError::InvalidKind {
            category: "Stmt".into(),
            kind: "Var Decl".into(),
        }
    );
    assert_eq!(&src[err.span], "Var Decl");
}

#[test]
fn malformed_field_points_at_descriptor() {
    let src = "[Expr]\nBinary: Expr l, Token, Expr r\n";
    let document = parse_document(src).unwrap();
    let err = document.categories[0]
        .register(&mut SchemaRegistry::new())
        .unwrap_err();

    assert_eq!(&src[err.span], "Token");
    insta::assert_snapshot!(err.render(src, Some(Path::new("lox.ast"))), @r#"
    error: category `Expr`, kind `Binary`: field descriptor "Token" must be `<type> <name>`, found 1 token(s)
     --> lox.ast:2:17
      |
    2 | Binary: Expr l, Token, Expr r
      |                 ^^^^^
    "#);
}

#[test]
fn duplicate_kind_points_at_second_definition() {
    let src = "[Expr]\nLiteral: Object val\nLiteral: Object value\n";
    let document = parse_document(src).unwrap();
    let err = document.categories[0]
        .register(&mut SchemaRegistry::new())
        .unwrap_err();

    assert_eq!(err.span.location(src), (3, 1));
    assert!(matches!(*err, SchemaError::DuplicateKind { .. }));
}

#[test]
fn duplicate_category_across_blocks() {
    let src = "[Expr]\nLiteral: Object val\n\n[Expr]\nGrouping: Expr expr\n";
    let document = parse_document(src).unwrap();
    let mut registry = SchemaRegistry::new();

    assert!(document.categories[0].register(&mut registry).is_ok());
    let err = document.categories[1].register(&mut registry).unwrap_err();
    assert_eq!(
        *err,
        SchemaError::DuplicateCategory {
            category: "Expr".into(),
        }
    );
    assert_eq!(err.span.location(src), (4, 2));
}
