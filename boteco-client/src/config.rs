//! Client configuration

use std::path::PathBuf;

/// Default fixture directory shipped with this crate
pub const DEFAULT_FIXTURE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

/// Default per-value snapshot quota (same order as browser local storage)
pub const DEFAULT_SNAPSHOT_QUOTA: usize = 5 * 1024 * 1024;

/// Client configuration for the data-access layer
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Default API base URL (e.g., "https://api.example.com"), offered to `connect`
    pub base_url: Option<String>,

    /// Static bearer token attached to every remote request
    pub token: Option<String>,

    /// Directory holding the mock fixture files
    pub fixture_dir: PathBuf,

    /// redb file backing the snapshot store
    pub snapshot_path: PathBuf,

    /// Maximum serialized size of a single snapshot, in bytes
    pub snapshot_quota: usize,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a configuration with defaults and no backend
    pub fn new() -> Self {
        Self {
            base_url: None,
            token: None,
            fixture_dir: PathBuf::from(DEFAULT_FIXTURE_DIR),
            snapshot_path: PathBuf::from("boteco-snapshots.redb"),
            snapshot_quota: DEFAULT_SNAPSHOT_QUOTA,
            timeout: 30,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Unset or empty variables keep the defaults of [`ClientConfig::new`].
    pub fn from_env() -> Self {
        let defaults = Self::new();
        Self {
            base_url: env_non_empty("BOTECO_API_BASE_URL"),
            token: env_non_empty("BOTECO_API_TOKEN"),
            fixture_dir: env_non_empty("BOTECO_FIXTURE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.fixture_dir),
            snapshot_path: env_non_empty("BOTECO_SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),
            snapshot_quota: env_non_empty("BOTECO_SNAPSHOT_QUOTA")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.snapshot_quota),
            timeout: env_non_empty("BOTECO_HTTP_TIMEOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout),
        }
    }

    /// Set the default API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the fixture directory
    pub fn with_fixture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixture_dir = dir.into();
        self
    }

    /// Set the snapshot database path
    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }

    /// Set the per-snapshot quota in bytes
    pub fn with_snapshot_quota(mut self, bytes: usize) -> Self {
        self.snapshot_quota = bytes;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
