//! Embeddable range tester for typed values
//!
//! A [`RangeTester`] holds a set of uniquely named values, runs a single
//! predicate over each of them and renders a report through a [`ReportSink`].
//! The [`TestRegistry`] offers the suite/case flavour of the same output for
//! plain test functions.

pub mod config;
pub mod error;
#[doc(hidden)]
pub mod fault;
pub mod filter;
pub mod item;
pub mod macros;
pub mod registry;
pub mod report;
pub mod result;
pub mod sink;
pub mod store;
pub mod tester;

pub use config::{ColorMode, TesterConfig};
pub use error::{Result, TesterError};
pub use filter::TestFilter;
pub use item::{TestEntry, TestItem};
pub use registry::{CaseStatus, RegistryStats, TestCase, TestRegistry};
pub use result::{RunSummary, RunTiming, TestResult};
pub use sink::{Color, ConsoleSink, MemorySink, NullSink, ReportSink, SinkEvent};
pub use store::ItemStore;
pub use tester::RangeTester;

#[doc(hidden)]
pub use anyhow;
