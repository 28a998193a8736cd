//! Request client configuration.

use serde::{Deserialize, Serialize};

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "APP_API_URL";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Externally tunable settings for [`crate::RequestClient`]. The base URL is the only one.
pub struct ClientConfig {
    /// Prefix prepended verbatim to every request path; empty means relative paths.
    #[serde(default)]
    pub base_url: String,
}

impl ClientConfig {
    /// Creates a config with an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Resolves the base URL from the process environment.
    ///
    /// Lookup order: `APP_API_URL` at runtime, then the value captured at compile time (bundled
    /// browser builds have no process environment), then the empty string. A runtime value that
    /// is set but empty counts as unset, so it falls through to the compile-time value rather
    /// than forcing relative paths.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(API_URL_ENV)
            .filter(|value| !value.is_empty())
            .or_else(|| option_env!("APP_API_URL").map(str::to_string))
            .unwrap_or_default();
        Self { base_url }
    }

    /// Joins the base URL and `path` without normalizing slashes.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
