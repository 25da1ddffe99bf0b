//! Runtime configuration read from the environment

use std::path::PathBuf;
use std::time::Duration;

/// Default remote volumes search endpoint
pub const DEFAULT_LOOKUP_ENDPOINT: &str = "https://www.googleapis.com/books/v1/volumes";

/// Default per-stage timeout for lookups
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

/// Where the catalog lives on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub data_dir: PathBuf,
}

impl CatalogConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// `BOOKCASE_DATA_DIR`, else the platform data directory,
    /// else `./bookcase_data`
    pub fn from_env() -> Self {
        let data_dir = std::env::var_os("BOOKCASE_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| {
                directories::ProjectDirs::from("org", "Bookcase", "bookcase")
                    .map(|dirs| dirs.data_dir().to_path_buf())
            })
            .unwrap_or_else(|| PathBuf::from("./bookcase_data"));
        Self { data_dir }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Remote lookup settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// Volumes search endpoint; the identifier is sent as `q`
    pub endpoint: String,

    /// Timeout applied to each network stage
    pub timeout: Duration,

    /// When set, a volume without a thumbnail link counts as not found
    pub require_cover_link: bool,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_LOOKUP_ENDPOINT.to_string(),
            timeout: DEFAULT_LOOKUP_TIMEOUT,
            require_cover_link: true,
            user_agent: format!("bookcase/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl LookupConfig {
    /// Defaults overridden by `BOOKCASE_LOOKUP_ENDPOINT`,
    /// `BOOKCASE_LOOKUP_TIMEOUT_SECS` and `BOOKCASE_LOOKUP_ALLOW_MISSING_COVER`
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(endpoint) = std::env::var("BOOKCASE_LOOKUP_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                config.endpoint = endpoint;
            }
        }

        if let Ok(secs) = std::env::var("BOOKCASE_LOOKUP_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => tracing::warn!("Ignoring invalid BOOKCASE_LOOKUP_TIMEOUT_SECS: {}", secs),
            }
        }

        if let Ok(flag) = std::env::var("BOOKCASE_LOOKUP_ALLOW_MISSING_COVER") {
            config.require_cover_link = !parse_flag(&flag);
        }

        config
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_require_cover_link(mut self, require: bool) -> Self {
        self.require_cover_link = require;
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_defaults() {
        let config = LookupConfig::default();
        assert_eq!(config.endpoint, DEFAULT_LOOKUP_ENDPOINT);
        assert_eq!(config.timeout, DEFAULT_LOOKUP_TIMEOUT);
        assert!(config.require_cover_link);
        assert!(config.user_agent.starts_with("bookcase/"));
    }

    #[test]
    fn test_builders() {
        let config = LookupConfig::default()
            .with_endpoint("http://127.0.0.1:9/volumes")
            .with_timeout(Duration::from_millis(250))
            .with_require_cover_link(false);
        assert_eq!(config.endpoint, "http://127.0.0.1:9/volumes");
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert!(!config.require_cover_link);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("no"));
    }
}
