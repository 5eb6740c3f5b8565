//! Build-time client configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "/api";

/// Where the REST backend lives, relative to the page origin or absolute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Read `CREDITS_API_BASE_URL` as captured at compile time.
    ///
    /// The bundle is static, so the value is baked in by the WASM build.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_raw(option_env!("CREDITS_API_BASE_URL"))
    }

    fn from_raw(raw: Option<&str>) -> Self {
        let base_url = raw
            .map(|value| value.trim().trim_end_matches('/'))
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .to_owned();
        Self { base_url }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_raw(None)
    }
}
