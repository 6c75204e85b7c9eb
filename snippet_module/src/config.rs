//! Forge endpoints and credentials.
//!
//! Configuration:
//! - `GITHUB_TOKEN`: sent as `Authorization: token ...` to the GitHub API (also used for gists)
//! - `GITLAB_TOKEN`, `HEPTAPOD_TOKEN`: sent as `PRIVATE-TOKEN`
//! - `GITHUB_API_BASE_URL`, `GITLAB_API_BASE_URL`, `HEPTAPOD_API_BASE_URL`, `BITBUCKET_BASE_URL`
//! - `FORGE_HTTP_TIMEOUT_SECS`: per-request timeout (default: 15)
//!
//! Missing tokens are not an error; requests go out unauthenticated.

use std::env;
use std::time::Duration;

pub const DEFAULT_GITHUB_API_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_GITLAB_API_BASE_URL: &str = "https://gitlab.com/api/v4";
pub const DEFAULT_HEPTAPOD_API_BASE_URL: &str = "https://foss.heptapod.net/api/v4";
pub const DEFAULT_BITBUCKET_BASE_URL: &str = "https://bitbucket.org";

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeConfig {
    pub github_token: Option<String>,
    pub gitlab_token: Option<String>,
    pub heptapod_token: Option<String>,
    pub github_api_base: String,
    pub gitlab_api_base: String,
    pub heptapod_api_base: String,
    pub bitbucket_base: String,
    pub http_timeout: Duration,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            gitlab_token: None,
            heptapod_token: None,
            github_api_base: DEFAULT_GITHUB_API_BASE_URL.to_string(),
            gitlab_api_base: DEFAULT_GITLAB_API_BASE_URL.to_string(),
            heptapod_api_base: DEFAULT_HEPTAPOD_API_BASE_URL.to_string(),
            bitbucket_base: DEFAULT_BITBUCKET_BASE_URL.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl ForgeConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key/value source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).and_then(|value| normalize_value(&value));
        let base = |key: &str, default: &str| {
            read(key)
                .map(|value| value.trim_end_matches('/').to_string())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            github_token: read("GITHUB_TOKEN"),
            gitlab_token: read("GITLAB_TOKEN"),
            heptapod_token: read("HEPTAPOD_TOKEN"),
            github_api_base: base("GITHUB_API_BASE_URL", DEFAULT_GITHUB_API_BASE_URL),
            gitlab_api_base: base("GITLAB_API_BASE_URL", DEFAULT_GITLAB_API_BASE_URL),
            heptapod_api_base: base("HEPTAPOD_API_BASE_URL", DEFAULT_HEPTAPOD_API_BASE_URL),
            bitbucket_base: base("BITBUCKET_BASE_URL", DEFAULT_BITBUCKET_BASE_URL),
            http_timeout: read("FORGE_HTTP_TIMEOUT_SECS")
                .and_then(|value| value.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_HTTP_TIMEOUT),
        }
    }
}

/// Trim a raw value, strip one pair of surrounding quotes, and treat blanks as unset.
pub fn normalize_value(raw: &str) -> Option<String> {
    let trimmed = unquote(raw.trim()).trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_any_keys() {
        let config = ForgeConfig::from_lookup(|_| None);
        assert_eq!(config, ForgeConfig::default());
        assert!(config.github_token.is_none());
        assert_eq!(config.http_timeout, Duration::from_secs(15));
    }

    #[test]
    fn blank_tokens_are_unset() {
        let config = ForgeConfig::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", "   "),
            ("GITLAB_TOKEN", "\"\""),
        ]));
        assert!(config.github_token.is_none());
        assert!(config.gitlab_token.is_none());
    }

    #[test]
    fn tokens_and_bases_are_read() {
        let config = ForgeConfig::from_lookup(lookup_from(&[
            ("GITHUB_TOKEN", " 'ghp_abc' "),
            ("HEPTAPOD_TOKEN", "hep"),
            ("GITLAB_API_BASE_URL", "http://127.0.0.1:1234/api/v4/"),
            ("FORGE_HTTP_TIMEOUT_SECS", "3"),
        ]));
        assert_eq!(config.github_token.as_deref(), Some("ghp_abc"));
        assert_eq!(config.heptapod_token.as_deref(), Some("hep"));
        assert_eq!(config.gitlab_api_base, "http://127.0.0.1:1234/api/v4");
        assert_eq!(config.github_api_base, DEFAULT_GITHUB_API_BASE_URL);
        assert_eq!(config.http_timeout, Duration::from_secs(3));
    }

    #[test]
    fn invalid_timeout_falls_back() {
        let config = ForgeConfig::from_lookup(lookup_from(&[("FORGE_HTTP_TIMEOUT_SECS", "0")]));
        assert_eq!(config.http_timeout, DEFAULT_HTTP_TIMEOUT);
        let config = ForgeConfig::from_lookup(lookup_from(&[("FORGE_HTTP_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.http_timeout, DEFAULT_HTTP_TIMEOUT);
    }
}
