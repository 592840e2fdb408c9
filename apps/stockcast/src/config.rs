use std::env;
use std::time::Duration;
use thiserror::Error;

pub const FINNHUB_API_KEY: &str = "FINNHUB_API_KEY";
pub const TWELVE_DATA_API_KEY: &str = "TWELVE_DATA_API_KEY";
pub const FINNHUB_URL: &str = "STOCKCAST_FINNHUB_URL";
pub const TWELVE_DATA_URL: &str = "STOCKCAST_TWELVE_DATA_URL";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable not found")]
    Missing(&'static str),
}

/// Vendor credentials and endpoints, read once at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub finnhub_api_key: String,
    pub twelve_data_api_key: String,
    pub finnhub_url: String,
    pub twelve_data_url: String,
    pub timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        Ok(Self {
            finnhub_api_key: required(FINNHUB_API_KEY)?,
            twelve_data_api_key: required(TWELVE_DATA_API_KEY)?,
            finnhub_url: lookup(FINNHUB_URL)
                .unwrap_or_else(|| stockcast_finnhub::BASE_URL.to_string()),
            twelve_data_url: lookup(TWELVE_DATA_URL)
                .unwrap_or_else(|| stockcast_twelvedata::BASE_URL.to_string()),
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn reads_keys_and_default_urls() {
        let config = Config::from_lookup(lookup(&[
            (FINNHUB_API_KEY, " fh-key "),
            (TWELVE_DATA_API_KEY, "td-key"),
        ]))
        .unwrap();

        assert_eq!(config.finnhub_api_key, "fh-key");
        assert_eq!(config.twelve_data_api_key, "td-key");
        assert_eq!(config.finnhub_url, stockcast_finnhub::BASE_URL);
        assert_eq!(config.twelve_data_url, stockcast_twelvedata::BASE_URL);
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn url_overrides_apply() {
        let config = Config::from_lookup(lookup(&[
            (FINNHUB_API_KEY, "a"),
            (TWELVE_DATA_API_KEY, "b"),
            (FINNHUB_URL, "http://localhost:9000"),
        ]))
        .unwrap()
        .with_timeout(Some(Duration::from_secs(5)));

        assert_eq!(config.finnhub_url, "http://localhost:9000");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn missing_or_blank_key_is_an_error() {
        assert_eq!(
            Config::from_lookup(lookup(&[(TWELVE_DATA_API_KEY, "b")])).unwrap_err(),
            ConfigError::Missing(FINNHUB_API_KEY)
        );
        assert_eq!(
            Config::from_lookup(lookup(&[(FINNHUB_API_KEY, "a"), (TWELVE_DATA_API_KEY, "  ")]))
                .unwrap_err(),
            ConfigError::Missing(TWELVE_DATA_API_KEY)
        );
    }
}
