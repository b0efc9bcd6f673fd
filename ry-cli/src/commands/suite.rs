//! Built-in registry self-suite
//!
//! Exercises the range tester through the case registry, the same way a
//! downstream crate would declare its own suites.

use anyhow::{Context, Result};
use serde_json::json;

use ry_tester::{
    ry_expect_eq, ry_expect_err, ry_expect_false, ry_expect_ge, ry_expect_gt, ry_expect_ne,
    ry_expect_true, ConsoleSink, MemorySink, NullSink, RangeTester, ReportSink, TestFilter,
    TestItem, TestRegistry, TesterError,
};

use super::RunContext;
use crate::format::print_json;

pub fn suite_command(ctx: &RunContext, filter: Option<String>, disabled: Vec<String>) -> Result<i32> {
    let pattern = filter.or_else(|| ctx.config.filter.clone());
    let disabled = ctx.config.disabled.iter().cloned().chain(disabled);
    let filter = TestFilter::new(pattern.as_deref(), disabled).context("Invalid case filter")?;

    let registry = self_suite();
    let mut console = ConsoleSink::new();
    let mut quiet = NullSink;
    let sink: &mut dyn ReportSink = if ctx.format.is_json() { &mut quiet } else { &mut console };

    let stats = registry.run_all(&filter, sink);

    if ctx.format.is_json() {
        print_json(&json!({
            "total": stats.total,
            "passed": stats.passed,
            "failed": stats.failed,
            "skipped": stats.skipped,
            "duration_ms": stats.total_time_ms(),
            "success": stats.failed == 0,
        }))?;
    }

    Ok(stats.exit_code())
}

fn quiet_tester<'a, T>() -> RangeTester<'a, T> {
    RangeTester::new().with_sink(NullSink)
}

fn self_suite() -> TestRegistry {
    let mut registry = TestRegistry::new();

    registry
        .test("Store", "insert_if_absent", || {
            let mut tester = quiet_tester();
            tester.add_named(1, "dup", "first").add_named(2, "dup", "second");
            ry_expect_eq!(1, tester.len());
            ry_expect_eq!(Some(1), tester.get("dup").map(|item| item.value));
            Ok(())
        })
        .test("Store", "generated_names_unique", || {
            let mut tester = quiet_tester();
            tester
                .add_named(0, "Test_2", "")
                .add(1)
                .add(2)
                .add_item(TestItem::new(3));
            ry_expect_eq!(4, tester.len());
            let names: Vec<&str> = tester.items().names().collect();
            ry_expect_eq!(names, vec!["Test_2", "Test_3", "Test_4", "Test_5"]);
            Ok(())
        })
        .test("Engine", "expected_failure_inverts", || {
            let mut tester = quiet_tester();
            tester
                .add_named(1, "a", "")
                .add_named(-1, "b", "")
                .expect("b")
                .for_each(|x: &i32| *x > 0);
            ry_expect_true!(tester.run()?);
            Ok(())
        })
        .test("Engine", "unexpected_pass_reported", || {
            let mut tester = quiet_tester();
            tester
                .add_named(-1, "b", "")
                .expect("b")
                .for_each(|x: &i32| *x != 0);
            ry_expect_false!(tester.run()?);
            let error = tester.result("b").map(|r| r.error.clone()).unwrap_or_default();
            ry_expect_eq!("Test unexpectedly passed", error);
            Ok(())
        })
        .test("Engine", "missing_predicate", || {
            let mut tester: RangeTester<i32> = quiet_tester();
            ry_expect_err!(tester.run());
            ry_expect_eq!(Err(TesterError::NoPredicate), tester.run());
            Ok(())
        })
        .test("Report", "failed_block", || {
            let mut tester = quiet_tester();
            tester.add_named(0, "zero", "").for_each(|x: &i32| *x > 0);
            let mut sink = MemorySink::new();
            tester.run_with(&mut sink)?;
            ry_expect_true!(sink.text().contains("[FAILED TESTS] 1 tests"));
            ry_expect_true!(sink.ends_reset());
            Ok(())
        })
        .test("Stats", "pass_rate", || {
            let mut tester = quiet_tester();
            tester.add_values(vec![1, 2, 3, -4], "v").for_each(|x: &i32| *x > 0);
            tester.run()?;
            ry_expect_eq!(75.0, tester.pass_rate());
            ry_expect_gt!(tester.passed_count(), tester.failed_count());
            ry_expect_ge!(tester.summary().total_time_ms, tester.summary().total_test_time_ms);
            ry_expect_ne!(0, tester.failed_count());
            Ok(())
        })
        .test_with_validate(
            "Filter",
            "wildcard",
            || TestFilter::new(Some("A.*"), Vec::new()).is_ok(),
            || {
                let filter = TestFilter::new(Some("A.*"), Vec::new())?;
                ry_expect_true!(filter.should_run("A.b"));
                ry_expect_false!(filter.should_run("B.a"));
                Ok(())
            },
        )
        .skip_test("Engine", "parallel_run", "runs are single-threaded", || Ok(()))
        .disabled_test("Engine", "always_fails", || anyhow::bail!("disabled cases never run"));

    registry
}
