//! Demonstration scenarios
//!
//! Each scenario builds a tester the way an embedding application would and
//! runs it. Failures are part of some scenarios on purpose: they show the
//! expected-to-fail handling.

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::*;
use serde_json::json;

use ry_tester::{RunSummary, TestEntry, TestItem};

use super::{exit_code, RunContext};
use crate::format::print_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Single values, generated names and full items
    Basic,
    /// Adding whole collections of values and items
    Containers,
    /// Expected failures by name and by predicate
    Failures,
    /// A user-defined value type
    Custom,
    /// String values, including non-ASCII
    Strings,
    /// Every scenario above
    All,
}

impl Scenario {
    const EACH: [Scenario; 5] = [
        Scenario::Basic,
        Scenario::Containers,
        Scenario::Failures,
        Scenario::Custom,
        Scenario::Strings,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Basic => "basic",
            Scenario::Containers => "containers",
            Scenario::Failures => "failures",
            Scenario::Custom => "custom",
            Scenario::Strings => "strings",
            Scenario::All => "all",
        }
    }

    fn expand(self) -> Vec<Scenario> {
        match self {
            Scenario::All => Self::EACH.to_vec(),
            single => vec![single],
        }
    }
}

pub fn demo_command(ctx: &RunContext, scenario: Scenario) -> Result<i32> {
    let mut outcomes = Vec::new();

    for scenario in scenario.expand() {
        if !ctx.format.is_json() {
            println!("\n{} {}", "Scenario".bold(), scenario.name().cyan());
        }

        let summary = run_scenario(ctx, scenario)
            .with_context(|| format!("Scenario '{}' could not run", scenario.name()))?;

        if !ctx.format.is_json() {
            let verdict = if summary.failed == 0 {
                "PASSED".green()
            } else {
                "FAILED".red()
            };
            println!("{} tests {}", scenario.name(), verdict);
        }
        outcomes.push((scenario, summary));
    }

    if ctx.format.is_json() {
        let scenarios: Vec<_> = outcomes
            .iter()
            .map(|(scenario, summary)| json!({ "scenario": scenario.name(), "summary": summary }))
            .collect();
        print_json(&json!({ "scenarios": scenarios }))?;
    }

    Ok(exit_code(outcomes.iter().all(|(_, summary)| summary.failed == 0)))
}

fn run_scenario(ctx: &RunContext, scenario: Scenario) -> Result<RunSummary> {
    match scenario {
        Scenario::Basic => basic_usage(ctx),
        Scenario::Containers => container_addition(ctx),
        Scenario::Failures => failure_scenarios(ctx),
        Scenario::Custom => custom_types(ctx),
        Scenario::Strings => string_values(ctx),
        Scenario::All => anyhow::bail!("'all' is not a single scenario"),
    }
}

fn basic_usage(ctx: &RunContext) -> Result<RunSummary> {
    let mut tester = ctx.tester::<String>();
    tester
        .add_named("value1".to_string(), "test1", "Basic test 1")
        .add("value2".to_string())
        .add_item(TestItem::named("value3".to_string(), "test3").with_description("Manual test item"))
        .for_each(|value: &String| !value.is_empty());

    tester.run()?;
    Ok(tester.summary())
}

fn container_addition(ctx: &RunContext) -> Result<RunSummary> {
    let mut tester = ctx.tester::<i32>();
    tester
        .add_values(vec![1, 2, 3, 4, 5], "num")
        .add_items(vec![
            TestItem::named(10, "test10").with_description("Special test 10"),
            TestItem::named(20, "test20").with_description("Special test 20"),
        ])
        .add_entries(
            vec![
                TestEntry::Value(100),
                TestEntry::Value(200),
                TestItem::named(300, "test300").into(),
            ],
            "Test",
        )
        .for_each(|value: &i32| *value > 0);

    tester.run()?;
    Ok(tester.summary())
}

fn failure_scenarios(ctx: &RunContext) -> Result<RunSummary> {
    let mut tester = ctx.tester::<f64>();
    tester
        .add_named(-1.0, "negative", "Should fail")
        .expect("negative")
        .add_items(vec![
            TestItem::named(1.0, "positive1").with_description("Should pass"),
            TestItem::named(-2.0, "negative2")
                .with_description("Should fail")
                .expect_fail(),
            TestItem::named(0.0, "zero").with_description("Should pass"),
        ])
        .expect_if(|item| item.value < 0.0)
        .for_each(|value: &f64| *value >= 0.0);

    tester.run()?;
    Ok(tester.summary())
}

#[derive(Debug, Clone, Copy)]
struct Point {
    x: i32,
    y: i32,
}

impl Point {
    fn is_valid(&self) -> bool {
        self.x >= 0 && self.y >= 0
    }
}

fn custom_types(ctx: &RunContext) -> Result<RunSummary> {
    let mut tester = ctx.tester::<Point>();
    tester
        .add_named(Point { x: 1, y: 1 }, "valid_point", "Should pass")
        .add_named(Point { x: -1, y: 1 }, "invalid_point", "Should fail")
        .expect("invalid_point")
        .add_values(
            vec![Point { x: 2, y: 2 }, Point { x: 3, y: 3 }, Point { x: 4, y: 4 }],
            "point",
        )
        .add_items(vec![
            TestItem::named(Point { x: 5, y: 5 }, "point5").with_description("Valid point at (5,5)"),
            TestItem::named(Point { x: -5, y: 5 }, "point_neg")
                .with_description("Invalid point")
                .expect_fail(),
        ])
        .for_each(Point::is_valid);

    tester.run()?;
    Ok(tester.summary())
}

fn string_values(ctx: &RunContext) -> Result<RunSummary> {
    let mut tester = ctx.tester::<String>();
    tester
        .add("hello".to_string())
        .add(String::from("world"))
        .add("test".to_owned())
        .add_values(["one", "two", "three"].map(String::from), "Test")
        .add_named("测试中文".to_string(), "chinese", "Chinese characters test")
        .add_named("!@#$%^".to_string(), "special", "Special characters test")
        .for_each(|value: &String| !value.is_empty());

    tester.run()?;
    Ok(tester.summary())
}
