use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::parse::{parse_expression, SyntaxError};
use crate::Expr;

/// Compile-once store mapping exact expression text to its parsed tree.
///
/// Entries are immutable and live until [`clear()`](Self::clear). Failed
/// parses are never stored. Safe to share across threads; when two threads
/// miss on the same text at once, both parse and the first insert wins, so
/// every caller ends up holding the same `Arc`.
#[derive(Debug, Default)]
pub struct ExpressionCache {
    entries: RwLock<HashMap<String, Arc<Expr>>>,
}

impl ExpressionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached tree for `text`, parsing and storing it on first use.
    ///
    /// # Errors
    ///
    /// Returns the [`SyntaxError`] from parsing; nothing is cached in that case.
    pub fn get_or_parse(&self, text: &str) -> Result<Arc<Expr>, SyntaxError> {
        if let Some(hit) = self.get(text) {
            tracing::trace!(expression = text, "expression cache hit");
            return Ok(hit);
        }

        tracing::trace!(expression = text, "expression cache miss");
        let parsed = Arc::new(parse_expression(text)?);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entries.entry(text.to_owned()).or_insert(parsed)))
    }

    /// Cached tree for `text`, without parsing.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<Arc<Expr>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(text)
            .cloned()
    }

    #[must_use]
    pub fn contains(&self, text: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(text)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
