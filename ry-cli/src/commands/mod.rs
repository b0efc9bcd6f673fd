//! Command implementations for rytest

pub mod check;
pub mod demo;
pub mod suite;

pub use check::{check_command, PredicateKind};
pub use demo::{demo_command, Scenario};
pub use suite::suite_command;

use ry_tester::{NullSink, RangeTester, TesterConfig};

use crate::format::OutputFormat;

/// Settings shared by every command
pub struct RunContext {
    pub config: TesterConfig,
    pub format: OutputFormat,
}

impl RunContext {
    pub fn new(config: TesterConfig, format: OutputFormat) -> Self {
        Self { config, format }
    }

    /// Tester honoring the configured name prefix; silent in JSON mode
    pub fn tester<'a, T>(&self) -> RangeTester<'a, T> {
        let tester = RangeTester::with_config(&self.config);
        if self.format.is_json() {
            tester.with_sink(NullSink)
        } else {
            tester
        }
    }
}

/// Process exit code for an overall outcome
pub fn exit_code(all_passed: bool) -> i32 {
    if all_passed {
        0
    } else {
        1
    }
}
