//! Server configuration parsed from environment variables.
//!
//! ERROR HANDLING
//! ==============
//! Unset variables fall back to defaults. A variable that is set but
//! malformed is a startup error rather than a silent default.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PROXY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} ({reason})")]
    Invalid { var: &'static str, value: String, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Base URL of the REST backend that `/api/*` is forwarded to.
    /// `None` leaves `/api` to whatever fronts this server.
    pub api_upstream: Option<String>,
    pub proxy_timeout_secs: u64,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `API_UPSTREAM`: `http(s)://` base URL of the REST backend
    /// - `PROXY_TIMEOUT_SECS`: default 30
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_number("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let proxy_timeout_secs =
            parse_number("PROXY_TIMEOUT_SECS", lookup("PROXY_TIMEOUT_SECS"), DEFAULT_PROXY_TIMEOUT_SECS)?;
        if proxy_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "PROXY_TIMEOUT_SECS",
                value: "0".into(),
                reason: "must be positive",
            });
        }
        let api_upstream = parse_upstream(lookup("API_UPSTREAM"))?;
        Ok(Self { port, api_upstream, proxy_timeout_secs })
    }
}

fn parse_number<T: std::str::FromStr>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return Ok(default);
    };
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value: raw.clone(), reason: "not a number" })
}

fn parse_upstream(raw: Option<String>) -> Result<Option<String>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(None);
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid { var: "API_UPSTREAM", value: raw, reason: "expected an http(s) URL" });
    }
    Ok(Some(trimmed.to_owned()))
}
