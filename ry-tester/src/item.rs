//! Test items
//!
//! A test item is one named value handed to the predicate. Items are owned by
//! the [`ItemStore`](crate::store::ItemStore) once inserted.

/// One named value under test
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestItem<T> {
    /// Value passed to the predicate
    pub value: T,

    /// Unique key inside the store; empty means "generate one on insertion"
    pub name: String,

    /// Optional free-form description shown in the report
    pub description: String,

    /// Invert the predicate outcome for this item
    pub expected_to_fail: bool,
}

impl<T> TestItem<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            name: String::new(),
            description: String::new(),
            expected_to_fail: false,
        }
    }

    pub fn named(value: T, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new(value)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn expect_fail(mut self) -> Self {
        self.expected_to_fail = true;
        self
    }
}

/// Element of a mixed collection: either a bare value or a full item
#[derive(Debug, Clone, PartialEq)]
pub enum TestEntry<T> {
    /// Gets a generated name from the collection prefix
    Value(T),

    /// Inserted as-is; the prefix is ignored
    Item(TestItem<T>),
}

impl<T> From<TestItem<T>> for TestEntry<T> {
    fn from(item: TestItem<T>) -> Self {
        TestEntry::Item(item)
    }
}
