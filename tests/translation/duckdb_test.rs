//! Whole-translation scenarios against the DuckDB dialect: PostgreSQL-like
//! syntax with `regexp_matches`, `len()`, and `json_exists()`.

use cel_sql::{
    translate, BinaryOperator, Dialect, Expr, FieldSchema, Literal, OutputMode, ScalarType,
    Schema, SchemaRegistry, TranslateConfig,
};

fn usr_registry() -> SchemaRegistry {
    SchemaRegistry::new().with_table(
        "usr",
        Schema::new(vec![
            FieldSchema::scalar("name", ScalarType::String),
            FieldSchema::json("metadata", true),
            FieldSchema::array("tags", ScalarType::String),
        ]),
    )
}

#[test]
fn placeholder_matches_postgres_dollar_style() {
    let ast = Expr::binary(BinaryOperator::Eq, Expr::ident("name"), Expr::lit(Literal::String("alice".into())));
    let config = TranslateConfig::new(Dialect::DuckDb).with_mode(OutputMode::Parameterized);
    let out = translate(&ast, &SchemaRegistry::new(), &config).unwrap();
    assert_eq!(out.sql, "\"name\" = $1");
}

#[test]
fn regex_uses_regexp_matches_function() {
    let ast = Expr::call("matches", vec![Expr::ident("email"), Expr::lit(Literal::String("^a.*$".into()))]);
    let out = translate(&ast, &SchemaRegistry::new(), &TranslateConfig::new(Dialect::DuckDb)).unwrap();
    assert_eq!(out.sql, "regexp_matches(\"email\", '^a.*$')");
}

#[test]
fn array_length_uses_len_function() {
    let ast = Expr::method(Expr::field(Expr::ident("usr"), "tags"), "size", vec![]);
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::DuckDb)).unwrap();
    assert_eq!(out.sql, "len(\"usr\".\"tags\")");
}

#[test]
fn has_mid_path_uses_json_exists() {
    let ast = Expr::call(
        "has",
        vec![Expr::field(Expr::field(Expr::ident("usr"), "metadata"), "role")],
    );
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::DuckDb)).unwrap();
    assert_eq!(out.sql, "json_exists(\"usr\".\"metadata\", '$.role')");
}

#[test]
fn exists_macro_uses_unnest() {
    let comp = cel_sql::Comprehension {
        kind: cel_sql::ComprehensionKind::All,
        iter_range: Box::new(Expr::field(Expr::ident("usr"), "tags")),
        iter_var: "x".to_string(),
        step: Box::new(Expr::binary(BinaryOperator::Ne, Expr::ident("x"), Expr::lit(Literal::String("banned".into())))),
        span: None,
    };
    let ast = Expr::Comprehension(comp);
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::DuckDb)).unwrap();
    assert_eq!(
        out.sql,
        "NOT EXISTS (SELECT 1 FROM UNNEST(\"usr\".\"tags\") AS x WHERE NOT ((x != 'banned')))"
    );
}
