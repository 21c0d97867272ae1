use super::{Field, Schema, SchemaRegistry, is_identifier};
use crate::error::SchemaError;

fn field(ty: &str, name: &str) -> Field {
    Field {
        ty: ty.to_owned(),
        name: name.to_owned(),
    }
}

#[test]
fn register_keeps_kind_and_field_order() {
    let schema = Schema::register(
        "Expr",
        [("Binary", "Expr l, Token op, Expr r"), ("Literal", "Object val")],
    )
    .unwrap();

    assert_eq!(schema.category(), "Expr");
    let kinds: Vec<_> = schema.kinds().map(|k| k.name).collect();
    assert_eq!(kinds, ["Binary", "Literal"]);

    let binary = schema.kind("Binary").unwrap();
    assert_eq!(
        binary.fields,
        [field("Expr", "l"), field("Token", "op"), field("Expr", "r")]
    );
    let literal = schema.kind("Literal").unwrap();
    assert_eq!(literal.fields, [field("Object", "val")]);
}

#[test]
fn type_tokens_are_opaque() {
    let schema = Schema::register(
        "Stmt",
        [("Function", "Token name, List<Token> params, java.util.List<Stmt> body")],
    )
    .unwrap();

    let function = schema.kind("Function").unwrap();
    assert_eq!(function.fields[1], field("List<Token>", "params"));
    assert_eq!(function.fields[2], field("java.util.List<Stmt>", "body"));
}

#[test]
fn descriptors_split_on_any_whitespace() {
    let schema = Schema::register("Expr", [("Unary", "  Token\top ,Expr   right  ")]).unwrap();
    assert_eq!(
        schema.kind("Unary").unwrap().fields,
        [field("Token", "op"), field("Expr", "right")]
    );
}

#[test]
fn empty_field_list_means_no_fields() {
    let schema = Schema::register("Stmt", [("Break", ""), ("Continue", "   ")]).unwrap();
    assert_eq!(schema.len(), 2);
    assert!(schema.kinds().all(|k| k.fields.is_empty()));
}

#[test]
fn empty_schema_is_legal() {
    let schema = Schema::register("Pattern", Vec::<(&str, &str)>::new()).unwrap();
    assert!(schema.is_empty());
    assert_eq!(schema.kinds().len(), 0);
}

#[test]
fn descriptor_with_one_token() {
    let err = Schema::register("Expr", [("Grouping", "expression")]).unwrap_err();
    assert_eq!(
        err,
        SchemaError::MalformedField {
            category: "Expr".into(),
            kind: "Grouping".into(),
            descriptor: "expression".into(),
            tokens: 1,
        }
    );
}

#[test]
fn descriptor_with_three_tokens() {
    let err = Schema::register("Expr", [("Call", "Expr callee, final Token paren")]).unwrap_err();
    assert_eq!(
        err,
        SchemaError::MalformedField {
            category: "Expr".into(),
            kind: "Call".into(),
            descriptor: "final Token paren".into(),
            tokens: 3,
        }
    );
}

#[test]
fn comma_inside_generic_type_is_a_separator() {
    let err = Schema::register("Expr", [("Table", "Map<String, Object> entries")]).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::MalformedField { ref descriptor, tokens: 1, .. } if descriptor == "Map<String"
    ));
}

#[test]
fn trailing_comma_is_an_empty_descriptor() {
    let err = Schema::register("Expr", [("Variable", "Token name,")]).unwrap_err();
    assert_eq!(
        err,
        SchemaError::MalformedField {
            category: "Expr".into(),
            kind: "Variable".into(),
            descriptor: "".into(),
            tokens: 0,
        }
    );
}

#[test]
fn duplicate_kind() {
    let err = Schema::register("Expr", [("Literal", "Object a"), ("Literal", "Object b")])
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::DuplicateKind {
            category: "Expr".into(),
            kind: "Literal".into(),
        }
    );
}

#[test]
fn duplicate_field() {
    let err = Schema::register("Expr", [("Binary", "Expr side, Token op, Expr side")])
        .unwrap_err();
    assert_eq!(
        err,
        SchemaError::DuplicateField {
            category: "Expr".into(),
            kind: "Binary".into(),
            field: "side".into(),
        }
    );
}

#[test]
fn same_field_name_in_different_kinds() {
    let schema =
        Schema::register("Expr", [("Assign", "Token name, Expr value"), ("Variable", "Token name")]);
    assert!(schema.is_ok());
}

#[test]
fn invalid_category_name() {
    let err = Schema::register("Type Expr", [("Name", "Token name")]).unwrap_err();
    assert_eq!(
        err,
        SchemaError::InvalidCategory {
            category: "Type Expr".into(),
        }
    );
    assert_eq!(err.category(), Some("Type Expr"));
}

#[test]
fn reserved_category_name() {
    for category in ["class", "_", "int"] {
        let err = Schema::register(category, [("A", "Object v")]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidCategory { .. }), "{category}");
    }
}

#[test]
fn registry_rejects_repeated_category() {
    let mut registry = SchemaRegistry::new();
    registry.register("Expr", [("Literal", "Object val")]).unwrap();
    let err = registry
        .register("Expr", [("Grouping", "Expr expr")])
        .unwrap_err();

    assert_eq!(
        err,
        SchemaError::DuplicateCategory {
            category: "Expr".into(),
        }
    );
    assert_eq!(registry.len(), 1);
    assert!(registry.get("Expr").unwrap().kind("Literal").is_some());
}

#[test]
fn registry_claims_category_even_when_invalid() {
    let mut registry = SchemaRegistry::new();
    assert!(registry.register("Expr", [("Literal", "val")]).is_err());
    assert!(matches!(
        registry.register("Expr", [("Literal", "Object val")]),
        Err(SchemaError::DuplicateCategory { .. })
    ));
    assert!(registry.is_empty());
}

#[test]
fn registry_keeps_registration_order() {
    let mut registry = SchemaRegistry::new();
    registry.register("Stmt", [("Print", "Expr expr")]).unwrap();
    registry.register("Expr", [("Literal", "Object val")]).unwrap();

    let categories: Vec<_> = registry.iter().map(|s| s.category()).collect();
    assert_eq!(categories, ["Stmt", "Expr"]);
}

#[test]
fn identifiers() {
    assert!(is_identifier("Expr"));
    assert!(is_identifier("_private"));
    assert!(is_identifier("$Gen2"));
    assert!(is_identifier("Ünicode"));
    assert!(!is_identifier(""));
    assert!(!is_identifier("2fast"));
    assert!(!is_identifier("List<Expr>"));
    assert!(!is_identifier("has space"));
    assert!(!is_identifier("_"));
    assert!(!is_identifier("class"));
    assert!(is_identifier("Class"));
}
