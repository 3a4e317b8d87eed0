//! Macro expansion scenarios (§4.6.5): the five lowered comprehension shapes,
//! nested comprehension variable shadowing, and the comprehension-depth limit.

use cel_sql::{
    translate, BinaryOperator, Comprehension, ComprehensionKind, Dialect, Expr, FieldSchema,
    Literal, ScalarType, Schema, SchemaRegistry, TranslateConfig, TranslateErrorKind,
};

fn usr_registry() -> SchemaRegistry {
    SchemaRegistry::new().with_table(
        "usr",
        Schema::new(vec![FieldSchema::array("tags", ScalarType::String)]),
    )
}

fn tags_gt_10() -> Comprehension {
    Comprehension {
        kind: ComprehensionKind::Exists,
        iter_range: Box::new(Expr::field(Expr::ident("usr"), "tags")),
        iter_var: "x".to_string(),
        step: Box::new(Expr::binary(BinaryOperator::Gt, Expr::ident("x"), Expr::lit(Literal::Int(10)))),
        span: None,
    }
}

#[test]
fn s4_exists() {
    let ast = Expr::Comprehension(tags_gt_10());
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "EXISTS (SELECT 1 FROM UNNEST(\"usr\".\"tags\") AS x WHERE x > 10)");
}

#[test]
fn all_negates_the_predicate_under_not_exists() {
    let comp = Comprehension { kind: ComprehensionKind::All, ..tags_gt_10() };
    let ast = Expr::Comprehension(comp);
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "NOT EXISTS (SELECT 1 FROM UNNEST(\"usr\".\"tags\") AS x WHERE NOT (x > 10))");
}

#[test]
fn exists_one_counts_matches_equal_to_one() {
    let comp = Comprehension { kind: ComprehensionKind::ExistsOne, ..tags_gt_10() };
    let ast = Expr::Comprehension(comp);
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "(SELECT COUNT(*) FROM UNNEST(\"usr\".\"tags\") AS x WHERE x > 10) = 1");
}

#[test]
fn filter_projects_matching_elements_into_an_array() {
    let comp = Comprehension { kind: ComprehensionKind::Filter, ..tags_gt_10() };
    let ast = Expr::Comprehension(comp);
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "ARRAY(SELECT x FROM UNNEST(\"usr\".\"tags\") AS x WHERE x > 10)");
}

#[test]
fn map_projects_a_transformed_value_into_an_array() {
    let comp = Comprehension {
        kind: ComprehensionKind::Map,
        iter_range: Box::new(Expr::field(Expr::ident("usr"), "tags")),
        iter_var: "x".to_string(),
        step: Box::new(Expr::call("string", vec![Expr::ident("x")])),
        span: None,
    };
    let ast = Expr::Comprehension(comp);
    let out = translate(&ast, &usr_registry(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert_eq!(out.sql, "ARRAY(SELECT CAST(x AS TEXT) FROM UNNEST(\"usr\".\"tags\") AS x)");
}

#[test]
fn comprehension_depth_limit_is_enforced() {
    // exists(x, exists(y, exists(z, exists(w, true))))  -- four levels deep.
    fn wrap(body: Expr) -> Expr {
        Expr::Comprehension(Comprehension {
            kind: ComprehensionKind::Exists,
            iter_range: Box::new(Expr::field(Expr::ident("usr"), "tags")),
            iter_var: "v".to_string(),
            step: Box::new(body),
            span: None,
        })
    }
    let mut ast = Expr::lit(Literal::Bool(true));
    for _ in 0..4 {
        ast = wrap(ast);
    }
    let mut config = TranslateConfig::new(Dialect::Postgres);
    config.max_comprehension_nesting = 3;
    let err = translate(&ast, &usr_registry(), &config).unwrap_err();
    assert!(matches!(err.kind, TranslateErrorKind::ComprehensionTooDeep { .. }));
}

#[test]
fn p8_macro_lowering_is_idempotent() {
    // Translating the same already-lowered Comprehension twice in sequence
    // (independent calls, P1 determinism) yields byte-identical SQL both
    // times -- re-lowering never happens because the kernel only ever reads
    // the Comprehension form, it never rewrites it.
    let ast = Expr::Comprehension(tags_gt_10());
    let registry = usr_registry();
    let config = TranslateConfig::new(Dialect::Postgres);
    let first = translate(&ast, &registry, &config).unwrap();
    let second = translate(&ast, &registry, &config).unwrap();
    assert_eq!(first.sql, second.sql);
}

#[test]
fn nested_macro_reusing_the_iteration_variable_name_renames_the_inner_binding() {
    let inner = Expr::Comprehension(Comprehension {
        kind: ComprehensionKind::Exists,
        iter_range: Box::new(Expr::field(Expr::ident("usr"), "tags")),
        iter_var: "x".to_string(),
        step: Box::new(Expr::binary(BinaryOperator::Eq, Expr::ident("x"), Expr::lit(Literal::String("a".into())))),
        span: None,
    });
    let outer_step = Expr::binary(
        BinaryOperator::And,
        inner,
        Expr::binary(BinaryOperator::Eq, Expr::ident("x"), Expr::lit(Literal::String("b".into()))),
    );
    let outer = Expr::Comprehension(Comprehension {
        kind: ComprehensionKind::Exists,
        iter_range: Box::new(Expr::field(Expr::ident("usr"), "tags")),
        iter_var: "x".to_string(),
        step: Box::new(outer_step),
        span: None,
    });
    let out = translate(&outer, &usr_registry(), &TranslateConfig::new(Dialect::Postgres)).unwrap();
    assert!(out.sql.contains("AS x_1"));
    assert!(out.sql.contains("x_1 = 'a'"));
    assert!(out.sql.contains("x = 'b'"));
    assert!(!out.sql.contains("x_1 = 'b'"));
}
