//! The live, name-keyed collection the UI renders.

use tracing::debug;

use crate::model::Reading;

/// What one merge did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Existing items whose value was replaced.
    pub updated: usize,
    /// New items added at the end.
    pub appended: usize,
    /// Incoming values that did not fit the existing item's kind.
    pub rejected: usize,
}

/// Ordered readings keyed by name, updated in place from snapshots.
///
/// Items are never removed: a reading that disappears from the file stays
/// on screen at its last known value. Item order is insertion order, so a
/// row never moves once shown.
#[derive(Debug, Clone, Default)]
pub struct DisplayCollection {
    items: Vec<Reading>,
}

impl DisplayCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Reading] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First item with the given name.
    pub fn get(&self, name: &str) -> Option<&Reading> {
        self.items.iter().find(|r| r.name() == name)
    }

    /// Apply an incoming snapshot.
    ///
    /// For each incoming reading, in order: the first item with the same name
    /// has its value replaced (its kind is kept), otherwise the reading is
    /// appended. Applying the same snapshot twice is the same as applying it once.
    pub fn merge(&mut self, snapshot: &[Reading]) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        for incoming in snapshot {
            match self.items.iter_mut().find(|r| r.name() == incoming.name()) {
                Some(existing) => {
                    if existing.set_value(incoming.value().clone()) {
                        outcome.updated += 1;
                    } else {
                        debug!(
                            "Keeping {:?} as {:?}; ignoring {:?} value {}",
                            existing.name(),
                            existing.kind(),
                            incoming.kind(),
                            incoming.value()
                        );
                        outcome.rejected += 1;
                    }
                }
                None => {
                    self.items.push(incoming.clone());
                    outcome.appended += 1;
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReadingKind, ReadingValue};

    fn int(name: &str, value: i32) -> Reading {
        Reading::new(name, ReadingValue::Int(value))
    }

    fn names(display: &DisplayCollection) -> Vec<&str> {
        display.items().iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_merge_into_empty_appends_in_order() {
        let mut display = DisplayCollection::new();
        let outcome = display.merge(&[int("a", 1), int("b", 2)]);

        assert_eq!(names(&display), vec!["a", "b"]);
        assert_eq!(outcome.appended, 2);
        assert_eq!(outcome.updated, 0);
    }

    #[test]
    fn test_merge_updates_in_place_and_appends_new() {
        let mut display = DisplayCollection::new();
        display.merge(&[int("A", 1), int("B", 2)]);
        let outcome = display.merge(&[int("B", 20), int("C", 30)]);

        assert_eq!(names(&display), vec!["A", "B", "C"]);
        assert_eq!(display.get("A").unwrap().value(), &ReadingValue::Int(1));
        assert_eq!(display.get("B").unwrap().value(), &ReadingValue::Int(20));
        assert_eq!(display.get("C").unwrap().value(), &ReadingValue::Int(30));
        assert_eq!(outcome, MergeOutcome { updated: 1, appended: 1, rejected: 0 });
    }

    #[test]
    fn test_merge_is_idempotent() {
        let snapshot = vec![int("cpu", 40), int("gpu", 55)];

        let mut once = DisplayCollection::new();
        once.merge(&snapshot);

        let mut twice = DisplayCollection::new();
        twice.merge(&snapshot);
        twice.merge(&snapshot);

        assert_eq!(once.items(), twice.items());
    }

    #[test]
    fn test_missing_items_are_kept() {
        let mut display = DisplayCollection::new();
        display.merge(&[int("a", 1), int("b", 2)]);
        display.merge(&[int("b", 3)]);

        assert_eq!(names(&display), vec!["a", "b"]);
        assert_eq!(display.get("a").unwrap().value(), &ReadingValue::Int(1));

        display.merge(&[]);
        assert_eq!(display.len(), 2);
    }

    #[test]
    fn test_kind_fixed_at_first_insertion() {
        let mut display = DisplayCollection::new();
        display.merge(&[Reading::new("temp", ReadingValue::Float(40.5))]);

        let outcome = display.merge(&[int("temp", 41)]);
        let temp = display.get("temp").unwrap();
        assert_eq!(temp.kind(), ReadingKind::Float);
        assert_eq!(temp.value(), &ReadingValue::Float(41.0));
        assert_eq!(outcome.updated, 1);

        let outcome = display.merge(&[Reading::new("temp", ReadingValue::Bool(true))]);
        assert_eq!(outcome.rejected, 1);
        assert_eq!(display.get("temp").unwrap().value(), &ReadingValue::Float(41.0));
    }

    #[test]
    fn test_duplicate_names_update_first_match() {
        let mut display = DisplayCollection::new();
        display.merge(&[int("", 1), int("", 2)]);

        assert_eq!(display.len(), 1);
        assert_eq!(display.items()[0].value(), &ReadingValue::Int(2));
    }
}
