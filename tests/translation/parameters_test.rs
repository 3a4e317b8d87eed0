//! Parameter binder scenarios (§4.4, §8.1 P3/P4): ordinal allocation without
//! de-duplication, per-dialect placeholder spellings, and inline/parameterized
//! equivalence.

use cel_sql::{
    translate, BinaryOperator, BoundValue, Dialect, Expr, Literal, OutputMode, SchemaRegistry,
    TranslateConfig,
};

fn name_eq_twice() -> Expr {
    Expr::binary(
        BinaryOperator::And,
        Expr::binary(BinaryOperator::Eq, Expr::ident("name"), Expr::lit(Literal::String("alice".into()))),
        Expr::binary(BinaryOperator::Eq, Expr::ident("nickname"), Expr::lit(Literal::String("alice".into()))),
    )
}

#[test]
fn repeated_literal_values_get_distinct_ordinals_no_dedup() {
    let ast = name_eq_twice();
    let config = TranslateConfig::new(Dialect::Postgres).with_mode(OutputMode::Parameterized);
    let out = translate(&ast, &SchemaRegistry::new(), &config).unwrap();
    assert_eq!(out.sql, "(\"name\" = $1 AND \"nickname\" = $2)");
    assert_eq!(out.parameters, vec![BoundValue::String("alice".into()), BoundValue::String("alice".into())]);
}

#[test]
fn inline_mode_produces_an_empty_parameter_list() {
    let ast = name_eq_twice();
    let config = TranslateConfig::new(Dialect::Postgres).with_mode(OutputMode::Inline);
    let out = translate(&ast, &SchemaRegistry::new(), &config).unwrap();
    assert!(out.parameters.is_empty());
    assert_eq!(out.sql, "(\"name\" = 'alice' AND \"nickname\" = 'alice')");
}

#[test]
fn p4_no_literal_leakage_in_parameterized_mode() {
    let ast = Expr::binary(BinaryOperator::Eq, Expr::ident("ssn"), Expr::lit(Literal::String("123-45-6789".into())));
    let config = TranslateConfig::new(Dialect::Postgres).with_mode(OutputMode::Parameterized);
    let out = translate(&ast, &SchemaRegistry::new(), &config).unwrap();
    assert!(!out.sql.contains("123-45-6789"));
    assert_eq!(out.parameters, vec![BoundValue::String("123-45-6789".into())]);
}

#[test]
fn parameter_order_follows_first_occurrence_left_to_right() {
    let ast = Expr::binary(
        BinaryOperator::And,
        Expr::binary(BinaryOperator::Gt, Expr::ident("age"), Expr::lit(Literal::Int(18))),
        Expr::binary(BinaryOperator::Lt, Expr::ident("age"), Expr::lit(Literal::Int(65))),
    );
    let config = TranslateConfig::new(Dialect::Postgres).with_mode(OutputMode::Parameterized);
    let out = translate(&ast, &SchemaRegistry::new(), &config).unwrap();
    assert_eq!(out.parameters, vec![BoundValue::Int(18), BoundValue::Int(65)]);
}

#[test]
fn placeholder_spelling_is_per_dialect() {
    let ast = Expr::binary(BinaryOperator::Eq, Expr::ident("name"), Expr::lit(Literal::String("alice".into())));
    for (dialect, expected_sql) in [
        (Dialect::Postgres, "\"name\" = $1"),
        (Dialect::DuckDb, "\"name\" = $1"),
        (Dialect::MySql, "`name` = ?"),
        (Dialect::Sqlite, "\"name\" = ?"),
        (Dialect::BigQuery, "`name` = @p1"),
    ] {
        let config = TranslateConfig::new(dialect).with_mode(OutputMode::Parameterized);
        let out = translate(&ast, &SchemaRegistry::new(), &config).unwrap();
        assert_eq!(out.sql, expected_sql, "dialect {dialect:?}");
    }
}

#[test]
fn p3_parameter_inline_equivalence_for_string_literal() {
    // Manually substituting the bound value into the parameterized SQL,
    // escaped per dialect, reproduces the inline-mode SQL (P3).
    let ast = Expr::binary(BinaryOperator::Eq, Expr::ident("name"), Expr::lit(Literal::String("o'brien".into())));
    let inline = translate(&ast, &SchemaRegistry::new(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    let parameterized = translate(
        &ast,
        &SchemaRegistry::new(),
        &TranslateConfig::new(Dialect::Postgres).with_mode(OutputMode::Parameterized),
    )
    .unwrap();
    assert_eq!(parameterized.sql, "\"name\" = $1");
    let BoundValue::String(s) = &parameterized.parameters[0] else {
        panic!("expected string parameter");
    };
    let substituted = parameterized.sql.replace("$1", &format!("'{}'", s.replace('\'', "''")));
    assert_eq!(substituted, inline.sql);
}

#[test]
fn inline_bytes_literal_renders_per_dialect_family() {
    let ast = Expr::lit(Literal::Bytes(vec![0xAB, 0xCD]));
    let pg = translate(&ast, &SchemaRegistry::new(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(pg.sql, "x'abcd'");
    let mysql = translate(&ast, &SchemaRegistry::new(), &TranslateConfig::new(Dialect::MySql)).unwrap();
    assert_eq!(mysql.sql, "X'ABCD'");
    let bq = translate(&ast, &SchemaRegistry::new(), &TranslateConfig::new(Dialect::BigQuery)).unwrap();
    assert_eq!(bq.sql, "b\"\\xab\\xcd\"");
}
