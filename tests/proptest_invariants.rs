
use std::sync::Arc;

use proptest::prelude::*;
use shield_rules::{evaluate, parse_expression, ExpressionCache, Guard, Value};
use strategies::{arb_scene, arb_scene_expr, arb_syntax, scene_rules, Scene};

fn eval(expr: &shield_rules::Expr, scene: &Scene) -> Value {
    evaluate(expr, &scene.subject, Some(&scene.object), &scene_rules())
        .expect("scene expressions always evaluate")
}

// ---------------------------------------------------------------------------
// Invariant 1: Printing
//
// The printed form of any tree parses back to an equal tree.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn display_reparses(expr in arb_syntax(4)) {
        let text = expr.to_string();
        let reparsed = parse_expression(&text).unwrap();
        prop_assert_eq!(reparsed, expr, "printed as {}", text);
    }

    #[test]
    fn printing_is_stable(expr in arb_syntax(4)) {
        let once = expr.to_string();
        let twice = parse_expression(&once).unwrap().to_string();
        prop_assert_eq!(once, twice);
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Determinism
//
// Evaluating the same tree against the same inputs always gives the same
// value, whether the tree came from the builder, the parser or the cache.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn determinism(expr in arb_scene_expr(4), scene in arb_scene()) {
        let first = eval(&expr, &scene);
        for _ in 0..5 {
            prop_assert_eq!(&first, &eval(&expr, &scene));
        }
    }

    #[test]
    fn parsed_matches_built(expr in arb_scene_expr(4), scene in arb_scene()) {
        let parsed = parse_expression(&expr.to_string()).unwrap();
        prop_assert_eq!(eval(&expr, &scene), eval(&parsed, &scene));
    }

    #[test]
    fn cache_returns_one_tree(expr in arb_syntax(3)) {
        let cache = ExpressionCache::new();
        let text = expr.to_string();
        let first = cache.get_or_parse(&text).unwrap();
        let second = cache.get_or_parse(&text).unwrap();
        prop_assert!(Arc::ptr_eq(&first, &second));
        prop_assert_eq!(&*first, &expr);
        prop_assert_eq!(cache.len(), 1);
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Boolean laws
//
// `and`, `or` and `not` always produce booleans and obey the usual laws
// under truthiness.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn connectives_yield_bools(a in arb_scene_expr(2), b in arb_scene_expr(2), scene in arb_scene()) {
        for expr in [a.clone().and(b.clone()), a.clone().or(b), !a] {
            prop_assert!(matches!(eval(&expr, &scene), Value::Bool(_)));
        }
    }

    #[test]
    fn double_negation(expr in arb_scene_expr(3), scene in arb_scene()) {
        let plain = eval(&expr, &scene).truthy();
        let negated_twice = eval(&!!expr, &scene);
        prop_assert_eq!(negated_twice, Value::Bool(plain));
    }

    #[test]
    fn commutativity(a in arb_scene_expr(2), b in arb_scene_expr(2), scene in arb_scene()) {
        prop_assert_eq!(
            eval(&a.clone().and(b.clone()), &scene),
            eval(&b.clone().and(a.clone()), &scene)
        );
        prop_assert_eq!(eval(&a.clone().or(b.clone()), &scene), eval(&b.or(a), &scene));
    }

    #[test]
    fn de_morgan(a in arb_scene_expr(2), b in arb_scene_expr(2), scene in arb_scene()) {
        let lhs = !(a.clone().and(b.clone()));
        let rhs = (!a).or(!b);
        prop_assert_eq!(eval(&lhs, &scene), eval(&rhs, &scene));
    }

    #[test]
    fn missing_attributes_are_null(name in "a_[a-z]{1,6}", scene in arb_scene()) {
        let expr = parse_expression(&format!("obj.{name} == null and user.{name} == null")).unwrap();
        prop_assert_eq!(eval(&expr, &scene), Value::Bool(true));
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Guard decisions
//
// `is_allowed` is `check_expression` with every error mapped to a denial.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn is_allowed_matches_check(expr in arb_syntax(3), scene in arb_scene()) {
        let guard = Guard::new(scene_rules());
        let text = expr.to_string();
        let checked = guard
            .check_expression(&text, &scene.subject, Some(&scene.object))
            .unwrap_or(false);
        prop_assert_eq!(guard.is_allowed(&text, &scene.subject, Some(&scene.object)), checked);
    }

    #[test]
    fn guard_agrees_with_evaluate(expr in arb_scene_expr(3), scene in arb_scene()) {
        let guard = Guard::new(scene_rules());
        let allowed = guard
            .check_expression(&expr.to_string(), &scene.subject, Some(&scene.object))
            .unwrap();
        prop_assert_eq!(allowed, eval(&expr, &scene).truthy());
    }
}
