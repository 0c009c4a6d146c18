use std::collections::HashMap;
use std::sync::Arc;

use super::value::{Attributes, ObjectRef, Value};

/// A host object backed by a string-keyed map.
///
/// Supports nested paths like `"author.profile.id"`: intermediate segments are
/// stored as nested records, which surface as [`Value::Object`] when read.
#[derive(Debug, Clone, Default)]
pub struct Record {
    label: Option<String>,
    fields: HashMap<String, Field>,
}

#[derive(Debug, Clone)]
enum Field {
    Leaf(Value),
    Nested(Arc<Record>),
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record with a label shown in traces and messages.
    #[must_use]
    pub fn named(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            fields: HashMap::new(),
        }
    }

    /// Set a value at a dot-separated path. Creates intermediate records as needed.
    #[must_use]
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.insert(path, value.into());
        self
    }

    /// Insert a value at a dot-separated path (mutable reference version).
    pub fn insert(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').collect();
        Self::insert_recursive(&mut self.fields, &segments, value);
    }

    /// Look up a value by dot-separated path.
    /// Returns `None` if any segment is missing or a leaf sits mid-path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Value> {
        let segments: Vec<&str> = path.split('.').collect();
        Self::get_recursive(&self.fields, &segments)
    }

    /// Wrap the record as a shared host object.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::object(self)
    }

    fn insert_recursive(map: &mut HashMap<String, Field>, segments: &[&str], value: Value) {
        match segments {
            [] => {}
            [last] => {
                map.insert((*last).to_owned(), Field::Leaf(value));
            }
            [first, rest @ ..] => {
                let entry = map
                    .entry((*first).to_owned())
                    .or_insert_with(|| Field::Nested(Arc::default()));
                match entry {
                    Field::Nested(nested) => {
                        Self::insert_recursive(&mut Arc::make_mut(nested).fields, rest, value);
                    }
                    Field::Leaf(_) => {
                        let mut nested = Record::new();
                        Self::insert_recursive(&mut nested.fields, rest, value);
                        *entry = Field::Nested(Arc::new(nested));
                    }
                }
            }
        }
    }

    fn get_recursive(map: &HashMap<String, Field>, segments: &[&str]) -> Option<Value> {
        match segments {
            [] => None,
            [last] => map.get(*last).map(Field::to_value),
            [first, rest @ ..] => match map.get(*first)? {
                Field::Nested(nested) => Self::get_recursive(&nested.fields, rest),
                Field::Leaf(_) => None,
            },
        }
    }
}

impl Field {
    fn to_value(&self) -> Value {
        match self {
            Field::Leaf(v) => v.clone(),
            Field::Nested(nested) => {
                Value::Object(ObjectRef::from_arc(Arc::clone(nested) as Arc<dyn Attributes>))
            }
        }
    }
}

impl Attributes for Record {
    fn attr(&self, name: &str) -> Option<Value> {
        self.fields.get(name).map(Field::to_value)
    }

    fn describe(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("Record({} fields)", self.fields.len()),
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}
