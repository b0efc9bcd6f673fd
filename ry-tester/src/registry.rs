//! Suite/case registry
//!
//! Plain test functions grouped by suite, run in registration order with the
//! same `RUN`/`OK`/`FAILED` lines as the range tester. Cases can be disabled
//! (never shown) or skipped (shown with a reason), and a [`TestFilter`]
//! narrows the run by full `suite.case` name.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::fault;
use crate::filter::TestFilter;
use crate::result::as_millis;
use crate::sink::{Color, ReportSink};

pub type CaseBody = Box<dyn Fn() -> anyhow::Result<()>>;
pub type CaseValidator = Box<dyn Fn() -> bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseStatus {
    #[default]
    Enabled,
    Disabled,
    Skip,
}

pub struct TestCase {
    pub suite: String,
    pub name: String,
    pub body: CaseBody,
    /// Checked before the body; `false` fails the case with "Validation failed"
    pub validate: Option<CaseValidator>,
    pub status: CaseStatus,
    pub skip_reason: String,
}

impl TestCase {
    pub fn new<F>(suite: impl Into<String>, name: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        Self {
            suite: suite.into(),
            name: name.into(),
            body: Box::new(body),
            validate: None,
            status: CaseStatus::Enabled,
            skip_reason: String::new(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}.{}", self.suite, self.name)
    }

    fn execute(&self) -> Result<(), String> {
        let outcome = fault::catch(|| {
            if let Some(validate) = &self.validate {
                if !validate() {
                    return Err(anyhow::anyhow!("Validation failed"));
                }
            }
            (self.body)()
        });

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err.to_string()),
            Err(message) => Err(message),
        }
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("suite", &self.suite)
            .field("name", &self.name)
            .field("status", &self.status)
            .field("has_validate", &self.validate.is_some())
            .finish()
    }
}

/// Counters of one registry run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total_time: Duration,
}

impl RegistryStats {
    /// Process exit code: `1` when anything failed
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else {
            0
        }
    }

    /// Wall time in whole milliseconds, saturating at `u64::MAX`
    pub fn total_time_ms(&self) -> u64 {
        as_millis(self.total_time)
    }
}

#[derive(Debug, Default)]
pub struct TestRegistry {
    cases: Vec<TestCase>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, case: TestCase) -> &mut Self {
        debug!(case = %case.full_name(), status = ?case.status, "case registered");
        self.cases.push(case);
        self
    }

    pub fn test<F>(&mut self, suite: &str, name: &str, body: F) -> &mut Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        self.add(TestCase::new(suite, name, body))
    }

    pub fn disabled_test<F>(&mut self, suite: &str, name: &str, body: F) -> &mut Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        let mut case = TestCase::new(suite, name, body);
        case.status = CaseStatus::Disabled;
        self.add(case)
    }

    pub fn skip_test<F>(&mut self, suite: &str, name: &str, reason: &str, body: F) -> &mut Self
    where
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        let mut case = TestCase::new(suite, name, body);
        case.status = CaseStatus::Skip;
        case.skip_reason = reason.to_string();
        self.add(case)
    }

    pub fn test_with_validate<V, F>(&mut self, suite: &str, name: &str, validate: V, body: F) -> &mut Self
    where
        V: Fn() -> bool + 'static,
        F: Fn() -> anyhow::Result<()> + 'static,
    {
        let mut case = TestCase::new(suite, name, body);
        case.validate = Some(Box::new(validate));
        self.add(case)
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Run every case the filter lets through, in registration order
    pub fn run_all(&self, filter: &TestFilter, sink: &mut dyn ReportSink) -> RegistryStats {
        let mut stats = RegistryStats::default();
        let start = Instant::now();

        stats.total = self
            .cases
            .iter()
            .filter(|case| case.status == CaseStatus::Enabled && filter.should_run(&case.full_name()))
            .count();

        info!(total = stats.total, "running registered cases");
        sink.set_color(Color::Blue);
        sink.blank_line();
        sink.write_line(&format!("[==========] Running {} tests", stats.total));
        sink.reset();

        for case in &self.cases {
            let full_name = case.full_name();

            match case.status {
                CaseStatus::Disabled => continue,
                CaseStatus::Skip => {
                    if !filter.is_disabled(&full_name) {
                        sink.set_color(Color::Yellow);
                        sink.write_line(&format!("[  SKIPPED ] {}: {}", full_name, case.skip_reason));
                        sink.reset();
                        stats.skipped += 1;
                    }
                    continue;
                }
                CaseStatus::Enabled if !filter.should_run(&full_name) => {
                    debug!(case = %full_name, "filtered out");
                    continue;
                }
                CaseStatus::Enabled => {}
            }

            sink.set_color(Color::Blue);
            sink.blank_line();
            sink.write_line(&format!("[ RUN      ] {}", full_name));
            sink.reset();

            let case_start = Instant::now();
            let outcome = case.execute();
            let millis = case_start.elapsed().as_millis();

            match outcome {
                Ok(()) => {
                    sink.set_color(Color::Green);
                    sink.write_line(&format!("[       OK ] {} ({} ms)", full_name, millis));
                    sink.reset();
                    stats.passed += 1;
                }
                Err(message) => {
                    warn!(case = %full_name, error = %message, "case failed");
                    sink.set_color(Color::Red);
                    sink.write_line(&format!("[  FAILED  ] {}", full_name));
                    if !message.is_empty() {
                        sink.write_line(&format!("Error: {}", message));
                    }
                    sink.reset();
                    stats.failed += 1;
                }
            }
        }

        stats.total_time = start.elapsed();
        write_summary(sink, &stats);
        stats
    }
}

fn write_summary(sink: &mut dyn ReportSink, stats: &RegistryStats) {
    sink.set_color(Color::Blue);
    sink.blank_line();
    sink.write_line(&format!(
        "[==========] {} tests ran. ({} ms total)",
        stats.total,
        stats.total_time.as_millis()
    ));

    if stats.passed > 0 {
        sink.set_color(Color::Green);
        sink.write_line(&format!("[  PASSED  ] {} tests.", stats.passed));
    }
    if stats.failed > 0 {
        sink.set_color(Color::Red);
        sink.write_line(&format!("[  FAILED  ] {} tests.", stats.failed));
    }
    if stats.skipped > 0 {
        sink.set_color(Color::Yellow);
        sink.write_line(&format!("[  SKIPPED ] {} tests.", stats.skipped));
    }
    sink.reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use crate::{ry_expect_eq, ry_expect_true};

    fn sample_registry() -> TestRegistry {
        let mut registry = TestRegistry::new();
        registry
            .test("Math", "add", || {
                ry_expect_eq!(4, 2 + 2);
                Ok(())
            })
            .test("Math", "broken", || {
                ry_expect_true!(1 > 2);
                Ok(())
            })
            .disabled_test("Math", "off", || anyhow::bail!("never runs"))
            .skip_test("Math", "later", "not ready", || Ok(()))
            .test("Strings", "panics", || panic!("kaboom"));
        registry
    }

    #[test]
    fn test_run_all_counts() {
        let registry = sample_registry();
        let mut sink = MemorySink::new();
        let stats = registry.run_all(&TestFilter::allow_all(), &mut sink);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.passed, 1);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.exit_code(), 1);
        assert!(sink.ends_reset());

        let lines = sink.lines();
        assert!(lines.contains(&"[==========] Running 3 tests"));
        assert!(lines.contains(&"[ RUN      ] Math.add"));
        assert!(lines.contains(&"[  FAILED  ] Math.broken"));
        assert!(lines.contains(&"Error: Expected true: 1 > 2"));
        assert!(lines.contains(&"[  SKIPPED ] Math.later: not ready"));
        assert!(lines.contains(&"Error: kaboom"));
        assert!(lines.contains(&"[  PASSED  ] 1 tests."));
        assert!(lines.contains(&"[  FAILED  ] 2 tests."));
        assert!(lines.contains(&"[  SKIPPED ] 1 tests."));
        assert!(!lines.iter().any(|l| l.contains("Math.off")));
    }

    #[test]
    fn test_filter_limits_run() {
        let registry = sample_registry();
        let filter = TestFilter::new(Some("Math.*"), vec!["Math.broken".to_string()]).unwrap();
        let mut sink = MemorySink::new();
        let stats = registry.run_all(&filter, &mut sink);

        assert_eq!(stats.total, 1);
        assert_eq!(stats.passed, 1);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.exit_code(), 0);
        assert!(!sink.text().contains("Strings.panics"));
    }

    #[test]
    fn test_validate_hook() {
        let mut registry = TestRegistry::new();
        registry
            .test_with_validate("V", "rejected", || false, || Ok(()))
            .test_with_validate("V", "accepted", || true, || Ok(()));

        let mut sink = MemorySink::new();
        let stats = registry.run_all(&TestFilter::allow_all(), &mut sink);

        assert_eq!(stats.passed, 1);
        assert_eq!(stats.failed, 1);
        assert!(sink.lines().contains(&"Error: Validation failed"));
    }

    #[test]
    fn test_empty_registry() {
        let registry = TestRegistry::new();
        let mut sink = MemorySink::new();
        let stats = registry.run_all(&TestFilter::allow_all(), &mut sink);

        assert_eq!(stats.total, 0);
        assert_eq!(stats.exit_code(), 0);
        assert!(sink.lines().contains(&"[==========] Running 0 tests"));
    }

    #[test]
    fn test_colors() {
        let mut registry = TestRegistry::new();
        registry.test("C", "ok", || Ok(()));
        let mut sink = MemorySink::new();
        registry.run_all(&TestFilter::allow_all(), &mut sink);

        let colored = sink.colored_lines();
        assert!(colored.contains(&(Some(Color::Blue), "[ RUN      ] C.ok")));
        assert!(colored
            .iter()
            .any(|(color, line)| *color == Some(Color::Green) && line.starts_with("[       OK ] C.ok")));
    }

    #[test]
    fn test_total_time_ms_saturates() {
        let mut stats = RegistryStats {
            total_time: Duration::from_micros(2_999),
            ..RegistryStats::default()
        };
        assert_eq!(stats.total_time_ms(), 2);

        stats.total_time = Duration::MAX;
        assert_eq!(stats.total_time_ms(), u64::MAX);
    }
}
