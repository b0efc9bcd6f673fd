//! Uniquely keyed item store
//!
//! Items are keyed by name and iterate in insertion order. Insertion never
//! overwrites: the first item stored under a name wins.

use indexmap::IndexMap;
use tracing::debug;

use crate::item::TestItem;

/// Prefix used when an item arrives without a name
pub const DEFAULT_NAME_PREFIX: &str = "Test";

#[derive(Debug, Clone)]
pub struct ItemStore<T> {
    items: IndexMap<String, TestItem<T>>,
    default_prefix: String,
}

impl<T> Default for ItemStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ItemStore<T> {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_NAME_PREFIX)
    }

    /// Store whose unnamed items get names built from `prefix`
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            items: IndexMap::new(),
            default_prefix: prefix.into(),
        }
    }

    pub fn default_prefix(&self) -> &str {
        &self.default_prefix
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TestItem<T>> {
        self.items.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestItem<T>> {
        self.items.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Produce `"{prefix}_{n}"` for the first `n >= len + 1` not already taken.
    ///
    /// Must run before the item it names is inserted, so the counter starts
    /// from the pre-insertion size.
    pub fn generate_unique_name(&self, prefix: &str) -> String {
        let mut counter = self.items.len() + 1;
        loop {
            let candidate = format!("{}_{}", prefix, counter);
            if !self.items.contains_key(&candidate) {
                debug!(name = %candidate, "generated item name");
                return candidate;
            }
            counter += 1;
        }
    }

    /// Insert unless the name is already taken. Returns whether it was stored.
    pub fn insert(&mut self, mut item: TestItem<T>) -> bool {
        if item.name.is_empty() {
            item.name = self.generate_unique_name(&self.default_prefix);
        }

        if self.items.contains_key(&item.name) {
            debug!(name = %item.name, "item already present, keeping the existing one");
            return false;
        }

        debug!(name = %item.name, expected_to_fail = item.expected_to_fail, "item added");
        self.items.insert(item.name.clone(), item);
        true
    }

    pub fn insert_value(&mut self, value: T, name: &str, description: &str) -> bool {
        self.insert(TestItem::named(value, name).with_description(description))
    }

    pub fn remove(&mut self, name: &str) -> Option<TestItem<T>> {
        let removed = self.items.shift_remove(name);
        if removed.is_some() {
            debug!(name, "item removed");
        }
        removed
    }

    /// Drop every item matching `pred`. Returns how many were removed.
    pub fn remove_if<P>(&mut self, mut pred: P) -> usize
    where
        P: FnMut(&TestItem<T>) -> bool,
    {
        let before = self.items.len();
        self.items.retain(|_, item| !pred(item));
        let removed = before - self.items.len();
        debug!(removed, "items removed by predicate");
        removed
    }

    /// Flag a single item as expected to fail. Returns false when absent.
    pub fn expect(&mut self, name: &str) -> bool {
        match self.items.get_mut(name) {
            Some(item) => {
                item.expected_to_fail = true;
                true
            }
            None => false,
        }
    }

    /// Flag every item matching `pred`. Returns how many matched.
    pub fn expect_if<P>(&mut self, mut pred: P) -> usize
    where
        P: FnMut(&TestItem<T>) -> bool,
    {
        let mut flagged = 0;
        for item in self.items.values_mut() {
            if pred(item) {
                item.expected_to_fail = true;
                flagged += 1;
            }
        }
        flagged
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_names_start_after_current_size() {
        let mut store = ItemStore::new();
        assert_eq!(store.generate_unique_name("Test"), "Test_1");

        store.insert(TestItem::named(1, "a"));
        store.insert(TestItem::named(2, "b"));
        assert_eq!(store.generate_unique_name("num"), "num_3");
    }

    #[test]
    fn test_generated_names_skip_taken_keys() {
        let mut store = ItemStore::new();
        store.insert(TestItem::named(1, "Test_2"));
        store.insert(TestItem::named(2, "Test_3"));

        let name = store.generate_unique_name("Test");
        assert_eq!(name, "Test_4");
        assert!(!store.contains(&name));
    }

    #[test]
    fn test_generated_name_never_collides() {
        let mut store = ItemStore::new();
        for n in 1..=20 {
            store.insert(TestItem::named(n, format!("p_{}", n * 2)));
        }
        for prefix in ["p", "Test", "q"] {
            let name = store.generate_unique_name(prefix);
            assert!(!store.contains(&name), "{} collided", name);
        }
    }

    #[test]
    fn test_insert_keeps_first_occurrence() {
        let mut store = ItemStore::new();
        assert!(store.insert_value(1, "dup", "first"));
        assert!(!store.insert_value(2, "dup", "second"));

        let item = store.get("dup").unwrap();
        assert_eq!(item.value, 1);
        assert_eq!(item.description, "first");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_insert_unnamed_uses_default_prefix() {
        let mut store = ItemStore::with_prefix("case");
        store.insert(TestItem::new(10));
        store.insert(TestItem::new(20));

        let names: Vec<_> = store.names().collect();
        assert_eq!(names, vec!["case_1", "case_2"]);
    }

    #[test]
    fn test_remove_and_remove_if() {
        let mut store = ItemStore::new();
        for n in -2..=2 {
            store.insert(TestItem::named(n, format!("n{}", n)));
        }

        assert!(store.remove("n0").is_some());
        assert!(store.remove("missing").is_none());

        let len = store.len();
        let mut visits = 0;
        let removed = store.remove_if(|item| {
            visits += 1;
            item.value < 0
        });
        assert_eq!(visits, len);
        assert_eq!(removed, 2);
        let names: Vec<_> = store.names().collect();
        assert_eq!(names, vec!["n1", "n2"]);
    }

    #[test]
    fn test_expect_if_visits_each_item_once() {
        let mut store = ItemStore::new();
        for n in 0..5 {
            store.insert(TestItem::named(n, format!("v{}", n)));
        }

        let mut visits = 0;
        let flagged = store.expect_if(|item| {
            visits += 1;
            item.value % 2 == 0
        });

        assert_eq!(visits, 5);
        assert_eq!(flagged, 3);
        assert!(store.get("v0").unwrap().expected_to_fail);
        assert!(!store.get("v1").unwrap().expected_to_fail);
    }

    #[test]
    fn test_expect_missing_name_is_noop() {
        let mut store: ItemStore<i32> = ItemStore::new();
        assert!(!store.expect("nothing"));
        assert!(store.is_empty());
    }
}
