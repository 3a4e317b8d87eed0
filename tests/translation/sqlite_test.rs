//! Whole-translation scenarios against the SQLite dialect: JSON1-extension
//! functions, `?` placeholders, numeric booleans, `strftime`-based temporal
//! accessors, and no native regex.

use cel_sql::{
    translate, BinaryOperator, Dialect, Expr, FieldSchema, Literal, OutputMode, ScalarType,
    Schema, SchemaRegistry, TranslateConfig, TranslateErrorKind,
};

fn usr_registry() -> SchemaRegistry {
    SchemaRegistry::new().with_table(
        "usr",
        Schema::new(vec![
            FieldSchema::scalar("name", ScalarType::String),
            FieldSchema::json("metadata", false),
            FieldSchema::array("tags", ScalarType::String),
        ]),
    )
}

#[test]
fn placeholder_is_question_mark() {
    let ast = Expr::binary(BinaryOperator::Eq, Expr::ident("name"), Expr::lit(Literal::String("alice".into())));
    let config = TranslateConfig::new(Dialect::Sqlite).with_mode(OutputMode::Parameterized);
    let out = translate(&ast, &SchemaRegistry::new(), &config).unwrap();
    assert_eq!(out.sql, "\"name\" = ?");
}

#[test]
fn json_path_uses_json_extract() {
    let ast = Expr::binary(
        BinaryOperator::Eq,
        Expr::field(Expr::field(Expr::ident("usr"), "metadata"), "role"),
        Expr::lit(Literal::String("admin".into())),
    );
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::Sqlite)).unwrap();
    assert_eq!(out.sql, "json_extract(\"usr\".\"metadata\", '$.role') = 'admin'");
}

#[test]
fn array_length_uses_json_array_length() {
    let ast = Expr::binary(
        BinaryOperator::Gt,
        Expr::method(Expr::field(Expr::ident("usr"), "tags"), "size", vec![]),
        Expr::lit(Literal::Int(0)),
    );
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::Sqlite)).unwrap();
    assert_eq!(out.sql, "json_array_length(\"usr\".\"tags\") > 0");
}

#[test]
fn exists_macro_lowers_through_json_each() {
    let comp = cel_sql::Comprehension {
        kind: cel_sql::ComprehensionKind::Exists,
        iter_range: Box::new(Expr::field(Expr::ident("usr"), "tags")),
        iter_var: "x".to_string(),
        step: Box::new(Expr::binary(BinaryOperator::Eq, Expr::ident("x"), Expr::lit(Literal::String("vip".into())))),
        span: None,
    };
    let ast = Expr::Comprehension(comp);
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::Sqlite)).unwrap();
    assert_eq!(
        out.sql,
        "EXISTS (SELECT 1 FROM json_each(\"usr\".\"tags\") AS x WHERE x.value = 'vip')"
    );
}

#[test]
fn temporal_component_uses_strftime() {
    let ast = Expr::method(Expr::ident("created_at"), "getDayOfMonth", vec![]);
    let out = translate(&ast, &SchemaRegistry::new(), &TranslateConfig::new(Dialect::Sqlite)).unwrap();
    assert_eq!(out.sql, "CAST(strftime('%d', \"created_at\") AS INTEGER)");
}

#[test]
fn no_native_regex_rejects_lookbehind() {
    let ast = Expr::call("matches", vec![Expr::ident("email"), Expr::lit(Literal::String("(?<=a)b".into()))]);
    let err = translate(&ast, &SchemaRegistry::new(), &TranslateConfig::new(Dialect::Sqlite)).unwrap_err();
    assert!(matches!(err.kind, TranslateErrorKind::RegexUnsupported { .. }));
}

#[test]
fn in_membership_over_json_array_uses_subquery() {
    let ast = Expr::binary(BinaryOperator::In, Expr::lit(Literal::String("vip".into())), Expr::field(Expr::ident("usr"), "tags"));
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::Sqlite)).unwrap();
    assert_eq!(out.sql, "'vip' IN (SELECT value FROM json_each(\"usr\".\"tags\"))");
}
