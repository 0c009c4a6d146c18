use shield_rules::{Guard, GuardConfig, Record, RuleRegistry, Value};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let registry = RuleRegistry::new()
        .rule("is_staff", |u: &Value, _: Option<&Value>| match u {
            Value::Object(u) => u.attr("is_staff").unwrap_or_default(),
            _ => Value::Bool(false),
        })
        .rule("is_author", |u: &Value, o: Option<&Value>| match o {
            Some(Value::Object(post)) => {
                Value::Bool(post.attr("author").is_some_and(|a| a.loose_eq(u)))
            }
            _ => Value::Bool(false),
        });
    let guard = Guard::with_config(registry, GuardConfig::new().debug(true));

    let alice = Record::named("alice").set("is_staff", false).into_value();
    let sam = Record::named("sam").set("is_staff", true).into_value();
    let post = Record::named("post #7")
        .set("author", alice.clone())
        .set("is_locked", true)
        .into_value();

    let edit = "is_author and not obj.is_locked";
    let moderate = "is_staff or is_author";

    for (who, subject) in [("alice", &alice), ("sam", &sam)] {
        let can_edit = guard.is_allowed(edit, subject, Some(&post));
        let can_moderate = guard.is_allowed(moderate, subject, Some(&post));
        println!("{who}: edit={can_edit} moderate={can_moderate}");
    }

    match guard.check_rule("is_owner", &alice, Some(&post)) {
        Ok(allowed) => println!("is_owner: {allowed}"),
        Err(err) => println!("is_owner failed: {err}"),
    }

    match guard.require_all(&["is_author", "not obj.is_locked"], &alice, Some(&post)) {
        Ok(()) => println!("alice may publish"),
        Err(err) => println!("{err}"),
    }

    let allowed = guard.check_any(&["user.is_staff", "is_author"], &sam, Some(&post));
    println!("sam via check_any: {allowed:?}");

    println!("{} expressions cached", guard.cache().len());
}
