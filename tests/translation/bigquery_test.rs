//! Whole-translation scenarios against the BigQuery dialect: `@pN`
//! placeholders, bracket array literals, `UNNEST`-membership, and
//! `JSON_VALUE`/`JSON_QUERY` path functions.

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
fn s5_placeholder_uses_at_p_spelling() {
    let ast = Expr::binary(
        BinaryOperator::And,
        Expr::binary(BinaryOperator::Eq, Expr::ident("name"), Expr::lit(Literal::String("alice".into()))),
        Expr::binary(BinaryOperator::Gt, Expr::ident("age"), Expr::lit(Literal::Int(30))),
    );
    let config = TranslateConfig::new(Dialect::BigQuery).with_mode(OutputMode::Parameterized);
    let out = translate(&ast, &SchemaRegistry::new(), &config).unwrap();
    assert_eq!(out.sql, "(`name` = @p1 AND `age` > @p2)");
}

#[test]
fn json_path_uses_json_value_for_scalar_extract() {
    let ast = Expr::binary(
        BinaryOperator::Eq,
        Expr::field(Expr::field(Expr::ident("usr"), "metadata"), "role"),
        Expr::lit(Literal::String("admin".into())),
    );
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::BigQuery)).unwrap();
    assert_eq!(out.sql, "JSON_VALUE(`usr`.`metadata`, '$.role') = 'admin'");
}

#[test]
fn array_literal_uses_brackets_and_in_membership_uses_unnest() {
    let ast = Expr::binary(
        BinaryOperator::In,
        Expr::ident("role"),
        Expr::ListLiteral {
            elements: vec![Expr::lit(Literal::String("admin".into())), Expr::lit(Literal::String("owner".into()))],
            span: None,
        },
    );
    let out = translate(&ast, &SchemaRegistry::new(), &TranslateConfig::new(Dialect::BigQuery)).unwrap();
    assert_eq!(out.sql, "`role` IN UNNEST(['admin', 'owner'])");
}

#[test]
fn matches_uses_regexp_contains() {
    let ast = Expr::call("matches", vec![Expr::ident("email"), Expr::lit(Literal::String("^a.*$".into()))]);
    let out = translate(&ast, &SchemaRegistry::new(), &TranslateConfig::new(Dialect::BigQuery)).unwrap();
    assert_eq!(out.sql, "REGEXP_CONTAINS(`email`, '^a.*$')");
}

#[test]
fn exists_one_macro_lowers_to_count_equals_one() {
    let comp = cel_sql::Comprehension {
        kind: cel_sql::ComprehensionKind::ExistsOne,
        iter_range: Box::new(Expr::field(Expr::ident("usr"), "tags")),
        iter_var: "x".to_string(),
        step: Box::new(Expr::binary(BinaryOperator::Eq, Expr::ident("x"), Expr::lit(Literal::String("vip".into())))),
        span: None,
    };
    let ast = Expr::Comprehension(comp);
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::BigQuery)).unwrap();
    assert_eq!(
        out.sql,
        "(SELECT COUNT(*) FROM UNNEST(`usr`.`tags`) AS x WHERE x = 'vip') = 1"
    );
}

#[test]
fn cast_uses_int64_keyword() {
    let ast = Expr::call("int", vec![Expr::ident("score")]);
    let out = translate(&ast, &SchemaRegistry::new(), &TranslateConfig::new(Dialect::BigQuery)).unwrap();
    assert_eq!(out.sql, "CAST(`score` AS INT64)");
}
