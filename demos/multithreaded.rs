use std::sync::Arc;
use std::thread;

use shield_rules::{Guard, Record, RuleRegistry, Value};

fn main() {
    let guard = Arc::new(Guard::new(RuleRegistry::new().rule(
        "is_staff",
        |u: &Value, _: Option<&Value>| match u {
            Value::Object(u) => u.attr("is_staff").unwrap_or_default(),
            _ => Value::Bool(false),
        },
    )));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let g = Arc::clone(&guard);
            thread::spawn(move || {
                let subject = Record::named(format!("user-{i}"))
                    .set("is_staff", i % 2 == 0)
                    .set("level", i64::from(i))
                    .into_value();
                let doc = Record::new().set("min_level", 2_i64).into_value();

                // Every thread shares one parsed tree per expression text.
                let result = g.is_allowed(
                    "is_staff or user.level >= obj.min_level",
                    &subject,
                    Some(&doc),
                );
                println!("Thread {i}: {result}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    println!("cached expressions: {}", guard.cache().len());
}
