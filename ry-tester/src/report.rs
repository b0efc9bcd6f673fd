//! Report rendering
//!
//! Everything here is a pure function of the result log and the run timing.
//! The literal line formats are relied upon by log scrapers, keep them stable.

use crate::result::{self, RunTiming, TestResult};
use crate::sink::{Color, ReportSink};

const SEPARATOR: &str = "==========================================";
const SUB_SEPARATOR: &str = "------------------------------------------";

/// `[==========] Running {n} tests`
pub fn write_run_header(sink: &mut dyn ReportSink, count: usize) {
    sink.blank_line();
    sink.write_line(&format!("[==========] Running {} tests", count));
}

/// `[ RUN      ] {name}`, with ` - {description}` when there is one
pub fn write_run_start(sink: &mut dyn ReportSink, name: &str, description: &str) {
    sink.blank_line();
    sink.write_line(&format!("[ RUN      ] {}{}", name, description_suffix(description)));
}

/// Green `OK` line, or red `FAILED` line followed by the error
pub fn write_outcome(sink: &mut dyn ReportSink, result: &TestResult) {
    if result.success {
        sink.set_color(Color::Green);
        sink.write_line(&format!("[       OK ] {} ({} ms)", result.name, result.millis()));
    } else {
        sink.set_color(Color::Red);
        sink.write_line(&format!("[  FAILED  ] {}", result.name));
        if !result.error.is_empty() {
            sink.write_line(&format!("Error: {}", result.error));
        }
    }
    sink.reset();
}

/// Full end-of-run report: summary, passed, failed and performance sections
pub fn write_report(sink: &mut dyn ReportSink, results: &[TestResult], timing: RunTiming) {
    let total = results.len();
    let passed = result::passed_count(results);
    let failed = total - passed;
    let total_test_time = result::total_test_time_ms(results);
    let total_time = u64::try_from(timing.wall.as_millis()).unwrap_or(u64::MAX);

    sink.blank_line();
    sink.blank_line();
    write_banner(sink, "                 Test Summary");
    sink.blank_line();

    sink.write_line(&format!("Total Tests: {}", total));
    sink.write_line(&format!("Total Time: {} ms", total_time));
    sink.write_line(&format!("Total Test Time: {} ms", total_test_time));
    sink.write_line(&format!("Average Time per Test: {} ms", result::average_time_ms(results)));
    sink.write_line(&format!(
        "Overhead Time: {} ms",
        total_time.saturating_sub(total_test_time)
    ));

    if passed > 0 {
        sink.set_color(Color::Green);
        sink.blank_line();
        sink.write_line(&format!("[PASSED TESTS] {} tests", passed));
        sink.write_line(SUB_SEPARATOR);
        for r in results.iter().filter(|r| r.success) {
            sink.write_line(&format!("+ {}", timed_entry(r)));
        }
        sink.reset();
    }

    if failed > 0 {
        sink.set_color(Color::Red);
        sink.blank_line();
        sink.write_line(&format!("[FAILED TESTS] {} tests", failed));
        sink.write_line(SUB_SEPARATOR);
        for r in results.iter().filter(|r| !r.success) {
            sink.write_line(&format!("x {}", timed_entry(r)));
            let error = if r.error.is_empty() { "Unknown error" } else { r.error.as_str() };
            sink.write_line(&format!("  Error: {}", error));
        }
        sink.reset();
    }

    if let (Some(slowest), Some(fastest)) = (result::slowest(results), result::fastest(results)) {
        sink.blank_line();
        sink.write_line("[PERFORMANCE ANALYSIS]");
        sink.write_line(SUB_SEPARATOR);

        sink.set_color(Color::Yellow);
        sink.write_line(&format!("Slowest Test: {} ({} ms)", slowest.name, slowest.millis()));
        sink.write_line(&format!("Fastest Test: {} ({} ms)", fastest.name, fastest.millis()));
        sink.write_line(&format!("Average Time: {} ms", result::average_time_ms(results)));

        let slow: Vec<&TestResult> = result::slow_results(results).collect();
        if !slow.is_empty() {
            sink.blank_line();
            sink.write_line("Tests Significantly Above Average (>50%):");
            for r in slow {
                sink.write_line(&format!("- {}", timed_entry(r)));
            }
        }
        sink.reset();
    }

    sink.blank_line();
    write_banner(sink, "                    End");
    sink.blank_line();
}

fn write_banner(sink: &mut dyn ReportSink, title: &str) {
    sink.write_line(SEPARATOR);
    sink.write_line(title);
    sink.write_line(SEPARATOR);
}

fn timed_entry(result: &TestResult) -> String {
    format!(
        "{} ({} ms){}",
        result.name,
        result.millis(),
        description_suffix(&result.description)
    )
}

fn description_suffix(description: &str) -> String {
    if description.is_empty() {
        String::new()
    } else {
        format!(" - {}", description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use std::time::Duration;

    fn result(name: &str, success: bool, ms: u64, error: &str, description: &str) -> TestResult {
        TestResult {
            name: name.to_string(),
            success,
            error: error.to_string(),
            duration: Duration::from_millis(ms),
            was_expected_to_fail: false,
            description: description.to_string(),
        }
    }

    #[test]
    fn test_outcome_lines() {
        let mut sink = MemorySink::new();
        write_outcome(&mut sink, &result("good", true, 3, "", ""));
        write_outcome(&mut sink, &result("bad", false, 1, "Test failed", ""));

        assert_eq!(
            sink.colored_lines(),
            vec![
                (Some(Color::Green), "[       OK ] good (3 ms)"),
                (Some(Color::Red), "[  FAILED  ] bad"),
                (Some(Color::Red), "Error: Test failed"),
            ]
        );
        assert!(sink.ends_reset());
    }

    #[test]
    fn test_run_start_with_description() {
        let mut sink = MemorySink::new();
        write_run_start(&mut sink, "x", "checks x");
        assert_eq!(sink.lines(), vec!["", "[ RUN      ] x - checks x"]);
    }

    #[test]
    fn test_report_sections() {
        let results = vec![
            result("a", true, 2, "", "first"),
            result("b", false, 10, "", ""),
            result("c", true, 0, "", ""),
        ];
        let mut sink = MemorySink::new();
        write_report(
            &mut sink,
            &results,
            RunTiming {
                wall: Duration::from_millis(20),
            },
        );
        let text = sink.text();

        assert!(text.contains("Total Tests: 3"));
        assert!(text.contains("Total Time: 20 ms"));
        assert!(text.contains("Total Test Time: 12 ms"));
        assert!(text.contains("Average Time per Test: 4 ms"));
        assert!(text.contains("Overhead Time: 8 ms"));
        assert!(text.contains("[PASSED TESTS] 2 tests"));
        assert!(text.contains("+ a (2 ms) - first"));
        assert!(text.contains("[FAILED TESTS] 1 tests"));
        assert!(text.contains("x b (10 ms)"));
        assert!(text.contains("  Error: Unknown error"));
        assert!(text.contains("Slowest Test: b (10 ms)"));
        assert!(text.contains("Fastest Test: c (0 ms)"));
        assert!(text.contains("Tests Significantly Above Average (>50%):"));
        assert!(text.contains("- b (10 ms)"));
        assert!(sink.ends_reset());

        let colored = sink.colored_lines();
        assert!(colored.contains(&(Some(Color::Green), "+ a (2 ms) - first")));
        assert!(colored.contains(&(Some(Color::Red), "x b (10 ms)")));
        assert!(colored.contains(&(Some(Color::Yellow), "Slowest Test: b (10 ms)")));
        assert!(colored.contains(&(None, "[PERFORMANCE ANALYSIS]")));
    }

    #[test]
    fn test_empty_report_has_no_sections() {
        let mut sink = MemorySink::new();
        write_report(&mut sink, &[], RunTiming::default());
        let text = sink.text();

        assert!(text.contains("Total Tests: 0"));
        assert!(text.contains("Average Time per Test: 0 ms"));
        assert!(!text.contains("[PASSED TESTS]"));
        assert!(!text.contains("[FAILED TESTS]"));
        assert!(!text.contains("[PERFORMANCE ANALYSIS]"));
        assert!(text.contains("End"));
    }

    #[test]
    fn test_failed_only_report_skips_passed_block() {
        let mut sink = MemorySink::new();
        write_report(
            &mut sink,
            &[result("only", false, 0, "boom", "")],
            RunTiming::default(),
        );
        let text = sink.text();
        assert!(!text.contains("[PASSED TESTS]"));
        assert!(text.contains("  Error: boom"));
    }
}
