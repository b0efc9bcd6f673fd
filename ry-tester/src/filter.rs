//! Case filter
//!
//! Decides whether a registry case runs, by its full `suite.case` name.
//! Patterns are wildcards (`*` any run of characters, `?` one character)
//! matched against the whole name. A pattern starting with `re:` is taken as
//! a raw regular expression instead.

use std::collections::HashSet;

use regex::Regex;

use crate::config::{split_names, DISABLED_VAR, FILTER_VAR};
use crate::error::{Result, TesterError};

const REGEX_PREFIX: &str = "re:";

#[derive(Debug, Clone, Default)]
pub struct TestFilter {
    disabled: HashSet<String>,
    pattern: Option<Regex>,
}

impl TestFilter {
    /// Filter that accepts everything
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn new<I>(pattern: Option<&str>, disabled: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let pattern = pattern
            .filter(|p| !p.is_empty())
            .map(compile_pattern)
            .transpose()?;

        Ok(Self {
            disabled: disabled.into_iter().collect(),
            pattern,
        })
    }

    /// Build from `RYTEST_FILTER` and the comma separated `RYTEST_DISABLED_TESTS`
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`TestFilter::from_env`] with variables taken from `lookup`
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pattern = lookup(FILTER_VAR);
        let disabled = lookup(DISABLED_VAR).unwrap_or_default();

        Self::new(pattern.as_deref(), split_names(&disabled))
    }

    pub fn disable(&mut self, full_name: impl Into<String>) -> &mut Self {
        self.disabled.insert(full_name.into());
        self
    }

    pub fn is_disabled(&self, full_name: &str) -> bool {
        self.disabled.contains(full_name)
    }

    pub fn should_run(&self, full_name: &str) -> bool {
        if self.is_disabled(full_name) {
            return false;
        }

        match &self.pattern {
            Some(pattern) => pattern.is_match(full_name),
            None => true,
        }
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    let source = match pattern.strip_prefix(REGEX_PREFIX) {
        Some(raw) => format!("^(?:{})$", raw),
        None => {
            let mut source = String::from("^");
            for ch in pattern.chars() {
                match ch {
                    '*' => source.push_str(".*"),
                    '?' => source.push('.'),
                    other => source.push_str(&regex::escape(&other.to_string())),
                }
            }
            source.push('$');
            source
        }
    };

    Regex::new(&source).map_err(|e| TesterError::invalid_filter(pattern, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_allow_all() {
        let filter = TestFilter::allow_all();
        assert!(filter.should_run("Any.case"));
    }

    #[test]
    fn test_wildcard_matches_whole_name() {
        let filter = TestFilter::new(Some("Math.*"), Vec::new()).unwrap();
        assert!(filter.should_run("Math.add"));
        assert!(filter.should_run("Math."));
        assert!(!filter.should_run("Strings.concat"));
        assert!(!filter.should_run("MyMath.add"));
    }

    #[test]
    fn test_dots_are_literal() {
        let filter = TestFilter::new(Some("a.b"), Vec::new()).unwrap();
        assert!(filter.should_run("a.b"));
        assert!(!filter.should_run("axb"));
    }

    #[test]
    fn test_question_mark_matches_one_char() {
        let filter = TestFilter::new(Some("T.case?"), Vec::new()).unwrap();
        assert!(filter.should_run("T.case1"));
        assert!(!filter.should_run("T.case12"));
    }

    #[test]
    fn test_disabled_wins_over_pattern() {
        let filter = TestFilter::new(Some("*"), vec!["Math.slow".to_string()]).unwrap();
        assert!(!filter.should_run("Math.slow"));
        assert!(filter.should_run("Math.fast"));
    }

    #[test]
    fn test_raw_regex() {
        let filter = TestFilter::new(Some("re:Math\\.(add|sub)"), Vec::new()).unwrap();
        assert!(filter.should_run("Math.sub"));
        assert!(!filter.should_run("Math.mul"));
    }

    #[test]
    fn test_invalid_raw_regex() {
        let err = TestFilter::new(Some("re:(unclosed"), Vec::new()).unwrap_err();
        assert!(matches!(err, TesterError::InvalidFilter { ref pattern, .. } if pattern == "re:(unclosed"));
    }

    #[test]
    fn test_empty_pattern_accepts_all() {
        let mut filter = TestFilter::new(Some(""), Vec::new()).unwrap();
        assert!(filter.should_run("x.y"));
        filter.disable("x.y");
        assert!(!filter.should_run("x.y"));
    }

    #[test]
    fn test_from_vars() {
        let vars: HashMap<&str, &str> = [(FILTER_VAR, "Math.*"), (DISABLED_VAR, " Math.slow ,,")]
            .into_iter()
            .collect();

        let filter = TestFilter::from_vars(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert!(filter.should_run("Math.add"));
        assert!(filter.is_disabled("Math.slow"));
        assert!(!filter.should_run("Math.slow"));
        assert!(!filter.should_run("Strings.concat"));
    }

    #[test]
    fn test_from_vars_unset_accepts_all() {
        let filter = TestFilter::from_vars(|_| None).unwrap();
        assert!(filter.should_run("Any.case"));
    }

    #[test]
    fn test_from_vars_invalid_pattern() {
        let result = TestFilter::from_vars(|key| (key == FILTER_VAR).then(|| "re:[".to_string()));
        assert!(matches!(result, Err(TesterError::InvalidFilter { .. })));
    }
}
