use std::path::PathBuf;
use std::time::Duration;

use crate::poller::PollConfig;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub api_url: String,
    /// JSON file holding the persisted identity keys.
    pub session_file: PathBuf,
    pub poll: PollConfig,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Directory downloaded results are written to.
    pub download_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} must be a valid {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                |
    /// |------------------------|------------------------|
    /// | `GOPHIC_API_URL`       | required               |
    /// | `GOPHIC_SESSION_FILE`  | `.gophic-session.json` |
    /// | `POLL_INTERVAL_MS`     | `2000`                 |
    /// | `POLL_TIMEOUT_MS`      | `300000`               |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                   |
    /// | `DOWNLOAD_DIR`         | `.`                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("GOPHIC_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("GOPHIC_API_URL"))?;

        let session_file = lookup("GOPHIC_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".gophic-session.json"));

        let defaults = PollConfig::default();
        let interval_ms = parse_u64(
            &lookup,
            "POLL_INTERVAL_MS",
            defaults.interval.as_millis() as u64,
        )?;
        let timeout_ms = parse_u64(
            &lookup,
            "POLL_TIMEOUT_MS",
            defaults.timeout.as_millis() as u64,
        )?;
        let request_timeout_secs = parse_u64(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        let download_dir = lookup("DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            api_url,
            session_file,
            poll: PollConfig {
                interval: Duration::from_millis(interval_ms),
                timeout: Duration::from_millis(timeout_ms),
            },
            request_timeout: Duration::from_secs(request_timeout_secs),
            download_dir,
        })
    }
}

fn parse_u64<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            expected: "u64",
            value: raw,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config =
            ClientConfig::from_lookup(lookup_from(&[("GOPHIC_API_URL", "http://api:8080/")]))
                .unwrap();
        assert_eq!(config.api_url, "http://api:8080");
        assert_eq!(config.poll.interval, Duration::from_millis(2000));
        assert_eq!(config.poll.timeout, Duration::from_millis(300_000));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.session_file, PathBuf::from(".gophic-session.json"));
        assert_eq!(config.download_dir, PathBuf::from("."));
    }

    #[test]
    fn api_url_required() {
        let err = ClientConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("GOPHIC_API_URL")));
    }

    #[test]
    fn overrides_parse() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("GOPHIC_API_URL", "http://api"),
            ("POLL_INTERVAL_MS", "500"),
            ("POLL_TIMEOUT_MS", "10000"),
            ("DOWNLOAD_DIR", "/tmp/out"),
        ]))
        .unwrap();
        assert_eq!(config.poll.interval, Duration::from_millis(500));
        assert_eq!(config.poll.timeout, Duration::from_secs(10));
        assert_eq!(config.download_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn bad_number_rejected() {
        let err = ClientConfig::from_lookup(lookup_from(&[
            ("GOPHIC_API_URL", "http://api"),
            ("POLL_INTERVAL_MS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("POLL_INTERVAL_MS"));
    }
}
