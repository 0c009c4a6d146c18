use shield_rules::{evaluate, parse_expression, Record, RuleRegistry, Value};

fn main() {
    // Define rules
    let rules = RuleRegistry::new().rule("is_admin", |u: &Value, _: Option<&Value>| match u {
        Value::Object(u) => u.attr("is_admin").unwrap_or_default(),
        _ => Value::Bool(false),
    });

    let expr = parse_expression(r#"obj.author == user or is_admin or obj.status == "published""#)
        .expect("failed to parse expression");
    println!("{expr}");

    // Evaluate against a subject and an object
    let alice = Record::named("alice").set("is_admin", false).into_value();
    let bob = Record::named("bob").set("is_admin", false).into_value();
    let post = Record::named("post #1")
        .set("author", alice.clone())
        .set("status", "draft")
        .into_value();

    for subject in [&alice, &bob] {
        match evaluate(&expr, subject, Some(&post), &rules) {
            Ok(result) => println!("{subject} on {post}: {result}"),
            Err(err) => println!("{subject} on {post}: error: {err}"),
        }
    }

    // Syntax errors point at the offending token
    if let Err(err) = parse_expression(r#"obj.status == == "draft""#) {
        println!("{err}");
    }
}
