//! Explicit recursion guard for traversal drivers.

use std::{collections::HashSet, hash::Hash};

use crate::{Error, Result};

/// Stack of in-progress identities.
///
/// Re-entering an identity that is already on the stack is a skip, not an error. Nesting
/// deeper than `max_depth` is [`Error::RecursionLimit`].
#[derive(Debug)]
pub struct RecursionGuard<K> {
    stack: Vec<K>,
    active: HashSet<K>,
    max_depth: usize,
}

impl<K: Eq + Hash + Clone> RecursionGuard<K> {
    /// Create an empty guard
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        RecursionGuard {
            stack: Vec::new(),
            active: HashSet::new(),
            max_depth,
        }
    }

    /// Push `key`. Returns `Ok(false)` without pushing if `key` is already in progress.
    ///
    /// # Errors
    /// Returns [`Error::RecursionLimit`] if the stack is already `max_depth` deep.
    pub fn enter(&mut self, key: &K) -> Result<bool> {
        if self.active.contains(key) {
            return Ok(false);
        }
        if self.stack.len() >= self.max_depth {
            return Err(Error::RecursionLimit(self.max_depth));
        }
        self.stack.push(key.clone());
        self.active.insert(key.clone());
        Ok(true)
    }

    /// Pop the innermost key
    pub fn leave(&mut self) {
        if let Some(key) = self.stack.pop() {
            self.active.remove(&key);
        }
    }

    /// Returns true if `key` is in progress
    #[must_use]
    pub fn is_active(&self, key: &K) -> bool {
        self.active.contains(key)
    }

    /// Current nesting depth
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
