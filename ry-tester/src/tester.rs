//! Range tester
//!
//! Holds the item store, the single predicate and the result log of the last
//! run. Every mutating call returns `&mut Self` so setups read as one chain:
//!
//! ```
//! use ry_tester::{MemorySink, RangeTester};
//!
//! let mut tester = RangeTester::new().with_sink(MemorySink::new());
//! tester
//!     .add_named(1, "a", "")
//!     .add_named(-1, "b", "negative")
//!     .expect("b")
//!     .for_each(|x: &i32| *x > 0);
//! assert!(tester.run().unwrap());
//! ```

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::TesterConfig;
use crate::error::{Result, TesterError};
use crate::fault;
use crate::item::{TestEntry, TestItem};
use crate::report;
use crate::result::{self, RunSummary, RunTiming, TestResult};
use crate::sink::{ConsoleSink, NullSink, ReportSink};
use crate::store::ItemStore;

const UNEXPECTED_PASS: &str = "Test unexpectedly passed";
const PLAIN_FAILURE: &str = "Test failed";

type Predicate<'a, T> = Box<dyn FnMut(&T) -> anyhow::Result<bool> + 'a>;

pub struct RangeTester<'a, T> {
    store: ItemStore<T>,
    predicate: Option<Predicate<'a, T>>,
    results: Vec<TestResult>,
    timing: RunTiming,
    sink: Box<dyn ReportSink + 'a>,
}

impl<'a, T> Default for RangeTester<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> RangeTester<'a, T> {
    /// Tester reporting to the console
    pub fn new() -> Self {
        Self {
            store: ItemStore::new(),
            predicate: None,
            results: Vec::new(),
            timing: RunTiming::default(),
            sink: Box::new(ConsoleSink::new()),
        }
    }

    /// Tester whose unnamed items use the configured name prefix
    pub fn with_config(config: &TesterConfig) -> Self {
        Self {
            store: ItemStore::with_prefix(config.name_prefix.clone()),
            ..Self::new()
        }
    }

    pub fn with_sink(mut self, sink: impl ReportSink + 'a) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Add a value under a generated name
    pub fn add(&mut self, value: T) -> &mut Self {
        self.store.insert(TestItem::new(value));
        self
    }

    /// Add a value under `name`; an empty name gets a generated one.
    /// An existing item with the same name is left untouched.
    pub fn add_named(&mut self, value: T, name: &str, description: &str) -> &mut Self {
        self.store.insert_value(value, name, description);
        self
    }

    pub fn add_item(&mut self, item: TestItem<T>) -> &mut Self {
        self.store.insert(item);
        self
    }

    /// Add every value, naming each `"{prefix}_{n}"`
    pub fn add_values<I>(&mut self, values: I, prefix: &str) -> &mut Self
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            let name = self.store.generate_unique_name(prefix);
            self.store.insert_value(value, &name, "");
        }
        self
    }

    pub fn add_items<I>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = TestItem<T>>,
    {
        for item in items {
            self.store.insert(item);
        }
        self
    }

    /// Add a mixed collection: bare values are named from `prefix`, full
    /// items keep their own name
    pub fn add_entries<I>(&mut self, entries: I, prefix: &str) -> &mut Self
    where
        I: IntoIterator<Item = TestEntry<T>>,
    {
        for entry in entries {
            match entry {
                TestEntry::Value(value) => {
                    self.add_values(std::iter::once(value), prefix);
                }
                TestEntry::Item(item) => {
                    self.store.insert(item);
                }
            }
        }
        self
    }

    pub fn remove(&mut self, name: &str) -> &mut Self {
        self.store.remove(name);
        self
    }

    pub fn remove_if<P>(&mut self, pred: P) -> &mut Self
    where
        P: FnMut(&TestItem<T>) -> bool,
    {
        self.store.remove_if(pred);
        self
    }

    /// Set the predicate applied to every item
    pub fn for_each<F>(&mut self, mut predicate: F) -> &mut Self
    where
        F: FnMut(&T) -> bool + 'a,
    {
        self.predicate = Some(Box::new(move |value: &T| -> anyhow::Result<bool> {
            Ok(predicate(value))
        }));
        self
    }

    /// Set a predicate that may fail; an `Err` counts as a fault of the item
    pub fn for_each_fallible<F>(&mut self, predicate: F) -> &mut Self
    where
        F: FnMut(&T) -> anyhow::Result<bool> + 'a,
    {
        self.predicate = Some(Box::new(predicate));
        self
    }

    pub fn expect(&mut self, name: &str) -> &mut Self {
        if self.store.expect(name) {
            debug!(name, "item expected to fail");
        }
        self
    }

    pub fn expect_if<P>(&mut self, pred: P) -> &mut Self
    where
        P: FnMut(&TestItem<T>) -> bool,
    {
        let flagged = self.store.expect_if(pred);
        debug!(flagged, "items expected to fail by predicate");
        self
    }

    /// Drop all items and the results of the last run
    pub fn clear(&mut self) -> &mut Self {
        self.store.clear();
        self.results.clear();
        self.timing = RunTiming::default();
        self
    }

    pub fn get(&self, name: &str) -> Option<&TestItem<T>> {
        self.store.get(name)
    }

    pub fn items(&self) -> &ItemStore<T> {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Run the predicate over every item and print the report to the
    /// tester's own sink. `Ok(true)` when nothing failed.
    pub fn run(&mut self) -> Result<bool> {
        let mut sink = std::mem::replace(&mut self.sink, Box::new(NullSink));
        let outcome = self.run_with(sink.as_mut());
        self.sink = sink;
        outcome
    }

    /// Same as [`run`](Self::run) but writes to `sink`
    pub fn run_with(&mut self, sink: &mut dyn ReportSink) -> Result<bool> {
        let predicate = self.predicate.as_mut().ok_or(TesterError::NoPredicate)?;

        info!(count = self.store.len(), "running range tests");
        let total_start = Instant::now();
        report::write_run_header(sink, self.store.len());

        let mut results = Vec::with_capacity(self.store.len());
        for item in self.store.iter() {
            report::write_run_start(sink, &item.name, &item.description);

            let start = Instant::now();
            let (success, error) = evaluate(predicate, item);
            let duration = start.elapsed();

            let result = TestResult {
                name: item.name.clone(),
                success,
                error,
                duration,
                was_expected_to_fail: item.expected_to_fail,
                description: item.description.clone(),
            };
            report::write_outcome(sink, &result);
            results.push(result);
        }

        self.timing = RunTiming {
            wall: total_start.elapsed(),
        };
        self.results = results;

        report::write_report(sink, &self.results, self.timing);

        let all_passed = self.failed_count() == 0;
        info!(
            passed = self.passed_count(),
            failed = self.failed_count(),
            "range tests finished"
        );
        Ok(all_passed)
    }

    /// Render the report of the last run again
    pub fn print_test_report(&mut self) {
        report::write_report(self.sink.as_mut(), &self.results, self.timing);
    }

    pub fn print_test_report_to(&self, sink: &mut dyn ReportSink) {
        report::write_report(sink, &self.results, self.timing);
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn result(&self, name: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn timing(&self) -> RunTiming {
        self.timing
    }

    pub fn passed_count(&self) -> usize {
        result::passed_count(&self.results)
    }

    pub fn failed_count(&self) -> usize {
        result::failed_count(&self.results)
    }

    pub fn pass_rate(&self) -> f64 {
        result::pass_rate(&self.results)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_results(&self.results, self.timing)
    }
}

/// Run the predicate on one item: `(success, error message)`
fn evaluate<T>(predicate: &mut Predicate<'_, T>, item: &TestItem<T>) -> (bool, String) {
    let message = match fault::catch(|| predicate(&item.value)) {
        Ok(Ok(raw)) => {
            let success = raw != item.expected_to_fail;
            let error = match (success, item.expected_to_fail) {
                (true, _) => String::new(),
                (false, true) => UNEXPECTED_PASS.to_string(),
                (false, false) => PLAIN_FAILURE.to_string(),
            };
            return (success, error);
        }
        Ok(Err(err)) => err.to_string(),
        Err(message) => message,
    };

    warn!(name = %item.name, error = %message, "predicate faulted");
    (false, message)
}
