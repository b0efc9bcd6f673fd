//! Ad-hoc integer checks

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::*;
use serde_json::json;
use tracing::debug;

use super::{exit_code, RunContext};
use crate::format::print_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PredicateKind {
    Positive,
    NonNegative,
    NonZero,
    Even,
}

impl PredicateKind {
    pub fn holds(self, value: i64) -> bool {
        match self {
            PredicateKind::Positive => value > 0,
            PredicateKind::NonNegative => value >= 0,
            PredicateKind::NonZero => value != 0,
            PredicateKind::Even => value % 2 == 0,
        }
    }
}

/// `NAME=VALUE` or bare `VALUE`
fn parse_value(raw: &str) -> Result<(Option<&str>, i64)> {
    let (name, value) = match raw.split_once('=') {
        Some((name, value)) => (Some(name.trim()), value),
        None => (None, raw),
    };
    let value = value
        .trim()
        .parse::<i64>()
        .with_context(|| format!("'{}' is not an integer value", raw))?;
    Ok((name, value))
}

pub fn check_command(
    ctx: &RunContext,
    values: &[String],
    predicate: PredicateKind,
    expect: &[String],
    expect_negative: bool,
    prefix: Option<&str>,
) -> Result<i32> {
    let prefix = prefix.unwrap_or(ctx.config.name_prefix.as_str());
    let mut tester = ctx.tester::<i64>();

    for raw in values {
        match parse_value(raw)? {
            (Some(name), value) => {
                tester.add_named(value, name, "");
            }
            (None, value) => {
                tester.add_values(std::iter::once(value), prefix);
            }
        }
    }

    for name in expect {
        if tester.get(name).is_none() {
            debug!(name = %name, "expected-to-fail name not found");
        }
        tester.expect(name);
    }
    if expect_negative {
        tester.expect_if(|item| item.value < 0);
    }

    let all_passed = tester.for_each(move |value: &i64| predicate.holds(*value)).run()?;

    if ctx.format.is_json() {
        print_json(&json!(tester.summary()))?;
    } else if all_passed {
        println!("{}", "All values passed".green().bold());
    } else {
        println!("{}", "Some values failed".red().bold());
    }

    Ok(exit_code(all_passed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("5").unwrap(), (None, 5));
        assert_eq!(parse_value("neg=-3").unwrap(), (Some("neg"), -3));
        assert!(parse_value("x=abc").is_err());
    }

    #[test]
    fn test_predicates() {
        assert!(PredicateKind::Positive.holds(1));
        assert!(!PredicateKind::Positive.holds(0));
        assert!(PredicateKind::NonNegative.holds(0));
        assert!(PredicateKind::NonZero.holds(-1));
        assert!(PredicateKind::Even.holds(-4));
        assert!(!PredicateKind::Even.holds(3));
    }
}
