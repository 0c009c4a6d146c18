use shield_rules::{
    evaluate, parse_expression, EvalError, Expr, Guard, Record, RuleRegistry, ShieldError,
    SyntaxErrorKind, Value,
};

fn registry() -> RuleRegistry {
    RuleRegistry::new()
        .rule("is_admin", |u: &Value, _: Option<&Value>| match u {
            Value::Object(u) => u.attr("is_admin").unwrap_or_default(),
            _ => Value::Bool(false),
        })
        .rule("is_staff", |u: &Value, _: Option<&Value>| match u {
            Value::Object(u) => u.attr("is_staff").unwrap_or_default(),
            _ => Value::Bool(false),
        })
        .rule("is_author", |u: &Value, o: Option<&Value>| match o {
            Some(Value::Object(post)) => {
                Value::Bool(post.attr("author").is_some_and(|a| a.loose_eq(u)))
            }
            _ => Value::Bool(false),
        })
}

fn run(text: &str, subject: &Value, object: Option<&Value>) -> Result<Value, EvalError> {
    let expr = parse_expression(text).unwrap();
    evaluate(&expr, subject, object, &registry())
}

fn person(name: &str) -> Record {
    Record::named(name)
        .set("is_admin", false)
        .set("is_staff", false)
}

#[test]
fn author_or_admin() {
    let alice = person("alice").into_value();
    let admin = person("root").set("is_admin", true).into_value();
    let bob = person("bob").into_value();
    let post = Record::new().set("author", alice.clone()).into_value();

    let text = "is_admin or is_author";
    assert_eq!(run(text, &alice, Some(&post)), Ok(Value::Bool(true)));
    assert_eq!(run(text, &admin, Some(&post)), Ok(Value::Bool(true)));
    assert_eq!(run(text, &bob, Some(&post)), Ok(Value::Bool(false)));
}

#[test]
fn staff_and_not_locked() {
    let staff = person("sam").set("is_staff", true).into_value();
    let open = Record::new().set("is_locked", false).into_value();
    let locked = Record::new().set("is_locked", true).into_value();

    let text = "is_staff and not obj.is_locked";
    assert_eq!(run(text, &staff, Some(&open)), Ok(Value::Bool(true)));
    assert_eq!(run(text, &staff, Some(&locked)), Ok(Value::Bool(false)));
}

#[test]
fn author_identity_through_attributes() {
    let alice = person("alice").into_value();
    let bob = person("bob").into_value();
    let post = Record::new().set("author", alice.clone()).into_value();

    assert_eq!(run("obj.author == user", &alice, Some(&post)), Ok(Value::Bool(true)));
    assert_eq!(run("obj.author == user", &bob, Some(&post)), Ok(Value::Bool(false)));
    assert_eq!(run("obj.author != user", &bob, Some(&post)), Ok(Value::Bool(true)));
}

#[test]
fn status_workflow() {
    let staff = person("sam").set("is_staff", true).into_value();
    let text = r#"obj.status in ["draft", "review"] and (is_author or is_staff)"#;

    let draft = Record::new().set("status", "draft").into_value();
    let published = Record::new().set("status", "published").into_value();
    assert_eq!(run(text, &staff, Some(&draft)), Ok(Value::Bool(true)));
    assert_eq!(run(text, &staff, Some(&published)), Ok(Value::Bool(false)));
}

#[test]
fn nested_paths_on_both_sides() {
    let subject = person("alice")
        .set("profile.department.id", 7_i64)
        .into_value();
    let project = Record::new()
        .set("department.id", 7_i64)
        .set("budget", 2500.5)
        .into_value();

    assert_eq!(
        run("obj.department.id == user.profile.department.id", &subject, Some(&project)),
        Ok(Value::Bool(true))
    );
    assert_eq!(
        run("obj.budget >= 2500 and obj.budget < 3000.0", &subject, Some(&project)),
        Ok(Value::Bool(true))
    );
}

#[test]
fn raw_values_are_returned() {
    let subject = person("alice").set("name", "Test User").into_value();
    let post = Record::new().set("status", "draft").into_value();

    assert_eq!(run("obj.status", &subject, Some(&post)), Ok(Value::from("draft")));
    assert_eq!(run("user.name", &subject, None), Ok(Value::from("Test User")));
    assert_eq!(run("42", &subject, None), Ok(Value::Int(42)));
    assert_eq!(run("None", &subject, None), Ok(Value::Null));
    assert_eq!(run("user", &subject, None), Ok(subject.clone()));
}

#[test]
fn missing_attribute_compares_equal_to_null() {
    let post = Record::new().set("status", "draft").into_value();
    let subject = Value::Null;
    assert_eq!(run("obj.deleted_at == null", &subject, Some(&post)), Ok(Value::Bool(true)));
    assert_eq!(run("obj.deleted_at", &subject, Some(&post)), Ok(Value::Null));
    assert_eq!(run("user.anything == null", &subject, Some(&post)), Ok(Value::Bool(true)));
}

#[test]
fn precedence_matches_reading_order() {
    let expr = parse_expression("not a == b").unwrap();
    assert_eq!(expr.to_string(), "(not (a == b))");

    let expr = parse_expression("a or b and c").unwrap();
    assert_eq!(expr.to_string(), "(a or (b and c))");

    let expr = parse_expression("a and b and c").unwrap();
    assert_eq!(expr.to_string(), "((a and b) and c)");

    let expr = parse_expression("obj.x in [1, 2] or not user.y").unwrap();
    assert_eq!(expr.to_string(), "((obj.x in [1, 2]) or (not user.y))");
}

#[test]
fn parse_errors_name_the_problem() {
    let err = parse_expression(r#"obj.status == == "draft""#).unwrap_err();
    assert_eq!(err.kind(), &SyntaxErrorKind::UnexpectedToken("==".into()));
    assert!(err.to_string().contains(r#"obj.status == == "draft""#));

    let err = parse_expression("(is_admin or is_staff").unwrap_err();
    assert_eq!(err.kind(), &SyntaxErrorKind::UnexpectedEnd);
    assert!(err.to_string().contains("unexpected end of expression"));

    let err = parse_expression(r#"obj.status in ["a", "b""#).unwrap_err();
    assert_eq!(err.kind(), &SyntaxErrorKind::UnexpectedEnd);

    let err = parse_expression("is_admin @ is_staff").unwrap_err();
    assert_eq!(err.kind(), &SyntaxErrorKind::InvalidCharacter('@'));
    assert_eq!(err.position(), Some(9));

    let err = parse_expression("is_admin and").unwrap_err();
    assert_eq!(err.kind(), &SyntaxErrorKind::UnexpectedEnd);

    let err = parse_expression("   ").unwrap_err();
    assert_eq!(err.kind(), &SyntaxErrorKind::Empty);
    assert_eq!(err.position(), None);
}

#[test]
fn evaluation_errors() {
    let subject = person("alice").into_value();

    assert_eq!(
        run("nonexistent", &subject, None),
        Err(EvalError::RuleNotFound {
            name: "nonexistent".into()
        })
    );
    assert!(run("nonexistent", &subject, None)
        .unwrap_err()
        .to_string()
        .contains("rule 'nonexistent' is not registered"));

    assert_eq!(run("obj.status", &subject, None), Err(EvalError::NullObject));
    assert_eq!(
        run("obj.status", &subject, Some(&Value::Null)),
        Err(EvalError::NullObject)
    );

    let post = Record::new().set("title", "x").into_value();
    let err = run("obj.title > 5", &subject, Some(&post)).unwrap_err();
    assert!(matches!(err, EvalError::UnsupportedComparison { .. }));
}

#[test]
fn builder_and_parser_agree() {
    use shield_rules::{list, lit, obj, rule_ref, user};

    let built: Expr = obj("author")
        .eq(user())
        .or(rule_ref("is_admin"))
        .and(obj("status").is_in(list([lit("draft"), lit("review")])));
    let parsed =
        parse_expression(r#"(obj.author == user or is_admin) and obj.status in ["draft", "review"]"#)
            .unwrap();
    assert_eq!(built, parsed);
}

#[test]
fn combined_checks_and_denials() {
    let guard = Guard::new(registry());
    let alice = person("alice").into_value();
    let bob = person("bob").into_value();
    let post = Record::named("Post 1")
        .set("author", alice.clone())
        .set("status", "draft")
        .into_value();

    let edit = ["is_author", r#"obj.status in ["draft", "review"]"#];
    assert!(guard.check_all(&edit, &alice, Some(&post)).unwrap());
    assert!(guard.require_all(&edit, &alice, Some(&post)).is_ok());

    let err = guard.require_all(&edit, &bob, Some(&post)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "User 'bob' does not have permission 'is_author' for object 'Post 1'"
    );

    let moderate = ["is_admin", "is_staff"];
    assert!(!guard.check_any(&moderate, &bob, Some(&post)).unwrap());
    match guard.require_any(&moderate, &bob, Some(&post)).unwrap_err() {
        ShieldError::PermissionDenied { check, subject, object } => {
            assert_eq!(check, "is_staff");
            assert_eq!(subject, "bob");
            assert_eq!(object.as_deref(), Some("Post 1"));
        }
        other => panic!("expected PermissionDenied, got {other:?}"),
    }

    let admin = person("root").set("is_admin", true).into_value();
    assert!(guard.require_any(&moderate, &admin, None).is_ok());
}
