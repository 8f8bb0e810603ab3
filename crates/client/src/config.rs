//! Client configuration (environment driven).

use reqwest::Url;
use thiserror::Error;

use crate::list::DEFAULT_PAGE_SIZE;

/// Base URL used when `BPCATALOG_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:3002";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Settings needed to reach the catalog backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: Url,
    pub auth_token: Option<String>,
    pub page_size: usize,
}

impl ClientConfig {
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            auth_token: None,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Read `BPCATALOG_API_URL`, `BPCATALOG_AUTH_TOKEN` and `BPCATALOG_PAGE_SIZE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] but with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("BPCATALOG_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut config = Self::new(&api_url)?;

        config.auth_token = lookup("BPCATALOG_AUTH_TOKEN").filter(|t| !t.trim().is_empty());

        if let Some(raw) = lookup("BPCATALOG_PAGE_SIZE") {
            config.page_size = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "BPCATALOG_PAGE_SIZE",
                        reason: format!("expected a positive integer, got {raw:?}"),
                    });
                }
            };
        }

        Ok(config)
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var: "BPCATALOG_API_URL",
        reason,
    };

    let url = Url::parse(raw.trim().trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid(format!("{raw:?} cannot be used as a base URL")));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:3002/");
        assert_eq!(config.auth_token, None);
        assert_eq!(config.page_size, 5);
    }

    #[test]
    fn reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("BPCATALOG_API_URL", "https://api.example.com/v1/"),
            ("BPCATALOG_AUTH_TOKEN", "secret"),
            ("BPCATALOG_PAGE_SIZE", "20"),
        ]))
        .unwrap();

        assert_eq!(config.api_url.path(), "/v1");
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn rejects_bad_page_size() {
        let err = ClientConfig::from_lookup(lookup(&[("BPCATALOG_PAGE_SIZE", "0")])).unwrap_err();
        assert!(err.to_string().contains("BPCATALOG_PAGE_SIZE"));
    }

    #[test]
    fn rejects_unparseable_url() {
        assert!(ClientConfig::new("not a url").is_err());
        assert!(ClientConfig::new("mailto:someone@example.com").is_err());
    }
}
