use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A ticker symbol, trimmed and uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        let symbol = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();

        if symbol.is_empty() {
            return Err(PipelineError::InvalidInput(
                "Please enter a stock symbol".to_string(),
            ));
        }

        if symbol.chars().any(char::is_whitespace) {
            return Err(PipelineError::InvalidInput(format!(
                "Symbol '{symbol}' must not contain whitespace"
            )));
        }

        Ok(Self(symbol.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
