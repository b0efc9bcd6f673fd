//! Tester error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TesterError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TesterError {
    #[error("Test callback not set")]
    NoPredicate,

    #[error("Invalid filter pattern '{pattern}': {message}")]
    InvalidFilter { pattern: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },
}

impl TesterError {
    pub fn invalid_filter(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for TesterError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::de::Error> for TesterError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}
