//! Whole-translation scenarios against the PostgreSQL dialect (§8.3 S1-S3, S5-S6).

use cel_sql::{
    translate, BinaryOperator, Dialect, Expr, FieldSchema, Literal, OutputMode,
    ScalarType, Schema, SchemaRegistry, TranslateConfig, TranslateErrorKind,
};

fn usr_registry() -> SchemaRegistry {
    SchemaRegistry::new().with_table(
        "usr",
        Schema::new(vec![
            FieldSchema::scalar("name", ScalarType::String),
            FieldSchema::scalar("age", ScalarType::Int),
            FieldSchema::json("metadata", true),
            FieldSchema::array("tags", ScalarType::String),
        ]),
    )
}

#[test]
fn s1_comparison_and_logical() {
    let ast = Expr::binary(
        BinaryOperator::And,
        Expr::binary(BinaryOperator::Eq, Expr::ident("name"), Expr::lit(Literal::String("alice".into()))),
        Expr::binary(BinaryOperator::Gt, Expr::ident("age"), Expr::lit(Literal::Int(30))),
    );
    let out = translate(&ast, &SchemaRegistry::new(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "(\"name\" = 'alice' AND \"age\" > 30)");
    assert!(out.parameters.is_empty());
}

#[test]
fn s2_string_or_array_size() {
    let ast = Expr::binary(
        BinaryOperator::Or,
        Expr::binary(BinaryOperator::Eq, Expr::ident("status"), Expr::lit(Literal::String("active".into()))),
        Expr::binary(
            BinaryOperator::Gt,
            Expr::method(Expr::field(Expr::ident("usr"), "tags"), "size", vec![]),
            Expr::lit(Literal::Int(0)),
        ),
    );
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "(\"status\" = 'active' OR ARRAY_LENGTH(\"usr\".\"tags\", 1) > 0)");
}

#[test]
fn s3_json_path_lowering() {
    let ast = Expr::binary(
        BinaryOperator::Eq,
        Expr::field(Expr::field(Expr::ident("usr"), "metadata"), "role"),
        Expr::lit(Literal::String("admin".into())),
    );
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "\"usr\".\"metadata\"->>'role' = 'admin'");
}

#[test]
fn s5_parameterized_mode() {
    let ast = Expr::binary(
        BinaryOperator::And,
        Expr::binary(BinaryOperator::Eq, Expr::ident("name"), Expr::lit(Literal::String("alice".into()))),
        Expr::binary(BinaryOperator::Gt, Expr::ident("age"), Expr::lit(Literal::Int(30))),
    );
    let config = TranslateConfig::new(Dialect::Postgres).with_mode(OutputMode::Parameterized);
    let out = translate(&ast, &SchemaRegistry::new(), &config).unwrap();
    assert_eq!(out.sql, "(\"name\" = $1 AND \"age\" > $2)");
    assert_eq!(out.parameters.len(), 2);
}

#[test]
fn s6_matches_uses_tilde_operator() {
    let ast = Expr::call("matches", vec![Expr::ident("email"), Expr::lit(Literal::String("^.+@.+$".into()))]);
    let out = translate(&ast, &SchemaRegistry::new(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "\"email\" ~ '^.+@.+$'");
}

#[test]
fn json_field_binary_flag_does_not_change_path_operator_choice() {
    // PostgreSQL's `->>`/`->` split is the same for jsonb and json; the
    // `binary` flag only matters for `has()`'s key-existence choice.
    let registry = SchemaRegistry::new().with_table(
        "usr",
        Schema::new(vec![FieldSchema::json("metadata", false)]),
    );
    let ast = Expr::binary(
        BinaryOperator::Eq,
        Expr::field(Expr::field(Expr::ident("usr"), "metadata"), "role"),
        Expr::lit(Literal::String("admin".into())),
    );
    let out = translate(&ast, &registry, &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "\"usr\".\"metadata\"->>'role' = 'admin'");
}

#[test]
fn has_mid_path_on_plain_json_falls_back_to_extract_and_compare() {
    // `?` is jsonb-only; a `binary: false` field has no key-existence
    // operator available, so `has()` must fall back to the extract form.
    let registry = SchemaRegistry::new().with_table(
        "usr",
        Schema::new(vec![FieldSchema::json("metadata", false)]),
    );
    let ast = Expr::call(
        "has",
        vec![Expr::field(Expr::field(Expr::ident("usr"), "metadata"), "role")],
    );
    let out = translate(&ast, &registry, &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "\"usr\".\"metadata\"->>'role' IS NOT NULL");
}

#[test]
fn has_on_json_field_uses_key_exists_operator() {
    let ast = Expr::call("has", vec![Expr::field(Expr::ident("usr"), "metadata")]);
    // has() requires a path into the JSON field, not the bare field itself,
    // when the field is JSON-typed with no further segment it degrades to
    // a plain column existence check per §4.2's graceful-degradation rule.
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "\"usr\".\"metadata\" IS NOT NULL");
}

#[test]
fn has_mid_path_uses_postgres_key_exists_operator() {
    let ast = Expr::call(
        "has",
        vec![Expr::field(Expr::field(Expr::ident("usr"), "metadata"), "role")],
    );
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "\"usr\".\"metadata\" ? 'role'");
}

#[test]
fn cast_uses_function_syntax() {
    let ast = Expr::call("double", vec![Expr::ident("score")]);
    let out = translate(&ast, &SchemaRegistry::new(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "CAST(\"score\" AS DOUBLE PRECISION)");
}

#[test]
fn json_numeric_comparison_casts_extracted_value() {
    let ast = Expr::binary(
        BinaryOperator::Gt,
        Expr::field(Expr::field(Expr::ident("usr"), "metadata"), "score"),
        Expr::lit(Literal::Int(10)),
    );
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "(\"usr\".\"metadata\"->>'score')::numeric > 10");
}

#[test]
fn non_json_path_past_scalar_field_is_rejected() {
    let ast = Expr::field(Expr::field(Expr::ident("usr"), "name"), "oops");
    let err = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::Postgres)).unwrap_err();
    assert!(matches!(err.kind, TranslateErrorKind::NonJSONPath { .. }));
    // The public message never echoes the offending field name or literal text.
    assert_eq!(err.to_string(), "field access is not valid on a non-JSON field");
}

#[test]
fn temporal_component_accessor_uses_extract() {
    let ast = Expr::method(Expr::ident("created_at"), "getFullYear", vec![]);
    let out = translate(&ast, &SchemaRegistry::new(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "EXTRACT(YEAR FROM \"created_at\")");
}
