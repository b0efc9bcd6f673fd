//! Per-item results and the statistics derived from them
//!
//! Timings are reported in whole milliseconds. Every aggregate is computed from
//! the truncated per-item milliseconds, so the sums in the summary always add
//! up to what the passed/failed listings show.

use std::time::Duration;

use serde::{Serialize, Serializer};

/// Outcome of one item in one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub error: String,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    pub was_expected_to_fail: bool,
    pub description: String,
}

impl TestResult {
    pub fn millis(&self) -> u64 {
        as_millis(self.duration)
    }
}

/// Wall-clock span of a whole run, first item start to last item end
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTiming {
    pub wall: Duration,
}

/// Aggregate numbers of one run, all times in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
    pub total_time_ms: u64,
    pub total_test_time_ms: u64,
    pub average_time_ms: u64,
    pub overhead_time_ms: u64,
    pub slowest: Option<String>,
    pub fastest: Option<String>,
    pub slow_tests: Vec<String>,
    pub results: Vec<TestResult>,
}

impl RunSummary {
    pub fn from_results(results: &[TestResult], timing: RunTiming) -> Self {
        let total_time_ms = as_millis(timing.wall);
        let total_test_time_ms = total_test_time_ms(results);

        Self {
            total: results.len(),
            passed: passed_count(results),
            failed: failed_count(results),
            pass_rate: pass_rate(results),
            total_time_ms,
            total_test_time_ms,
            average_time_ms: average_time_ms(results),
            overhead_time_ms: total_time_ms.saturating_sub(total_test_time_ms),
            slowest: slowest(results).map(|r| r.name.clone()),
            fastest: fastest(results).map(|r| r.name.clone()),
            slow_tests: slow_results(results).map(|r| r.name.clone()).collect(),
            results: results.to_vec(),
        }
    }
}

pub fn passed_count(results: &[TestResult]) -> usize {
    results.iter().filter(|r| r.success).count()
}

pub fn failed_count(results: &[TestResult]) -> usize {
    results.len() - passed_count(results)
}

/// Percentage of passing results; `0.0` for an empty log
pub fn pass_rate(results: &[TestResult]) -> f64 {
    if results.is_empty() {
        0.0
    } else {
        passed_count(results) as f64 / results.len() as f64 * 100.0
    }
}

pub fn total_test_time_ms(results: &[TestResult]) -> u64 {
    results.iter().map(TestResult::millis).sum()
}

/// Mean per-item time, truncated towards zero; `0` for an empty log
pub fn average_time_ms(results: &[TestResult]) -> u64 {
    if results.is_empty() {
        0
    } else {
        total_test_time_ms(results) / results.len() as u64
    }
}

/// Longest-running result; the earliest one wins ties
pub fn slowest(results: &[TestResult]) -> Option<&TestResult> {
    results
        .iter()
        .reduce(|best, r| if r.millis() > best.millis() { r } else { best })
}

/// Shortest-running result; the earliest one wins ties
pub fn fastest(results: &[TestResult]) -> Option<&TestResult> {
    results
        .iter()
        .reduce(|best, r| if r.millis() < best.millis() { r } else { best })
}

/// Results taking strictly more than 1.5x the mean time
pub fn slow_results(results: &[TestResult]) -> impl Iterator<Item = &TestResult> {
    let average = average_time_ms(results);
    results.iter().filter(move |r| 2 * r.millis() > 3 * average)
}

pub(crate) fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(as_millis(*duration))
}
