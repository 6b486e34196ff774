//! Deterministic element id generation.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

/// Prefix for floating label ids.
pub const LABEL_ID_PREFIX: &str = "mat-mdc-form-field-label-";
/// Prefix for hint ids, including the implicit `hint_label` hint.
pub const HINT_ID_PREFIX: &str = "mat-mdc-hint-";
/// Prefix for error message ids.
pub const ERROR_ID_PREFIX: &str = "mat-mdc-error-";
/// Prefix for native input control ids.
pub const INPUT_ID_PREFIX: &str = "mat-input-";

thread_local! {
    static GLOBAL_IDS: IdGenerator = IdGenerator::new();
}

#[derive(Debug, Clone, Default)]
/// Monotonic per-prefix id counter.
///
/// Clones share one registry. Fields take a generator at construction so tests can use a
/// fresh instance (or [`IdGenerator::reset`]) instead of depending on run order.
pub struct IdGenerator {
    counters: Rc<RefCell<HashMap<String, u64>>>,
}

impl IdGenerator {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle on the registry shared by the current thread.
    pub fn global() -> Self {
        GLOBAL_IDS.with(Clone::clone)
    }

    /// Returns `prefix` followed by the next counter value for that prefix, starting at 0.
    pub fn next_id(&self, prefix: &str) -> String {
        let mut counters = self.counters.borrow_mut();
        let counter = counters.entry(prefix.to_string()).or_insert(0);
        let id = format!("{prefix}{counter}");
        *counter += 1;
        id
    }

    /// Restarts every counter.
    pub fn reset(&self) {
        self.counters.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn counters_are_per_prefix_and_shared_between_clones() {
        let ids = IdGenerator::new();
        let other = ids.clone();

        assert_eq!(ids.next_id(HINT_ID_PREFIX), "mat-mdc-hint-0");
        assert_eq!(other.next_id(HINT_ID_PREFIX), "mat-mdc-hint-1");
        assert_eq!(ids.next_id(ERROR_ID_PREFIX), "mat-mdc-error-0");
    }

    #[test]
    fn reset_restarts_numbering() {
        let ids = IdGenerator::global();
        ids.reset();
        let first = ids.next_id(LABEL_ID_PREFIX);
        IdGenerator::global().reset();
        assert_eq!(ids.next_id(LABEL_ID_PREFIX), first);
    }
}
