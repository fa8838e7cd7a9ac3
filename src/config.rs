//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::metric::TrackedMetric;
use crate::range::RangePolicy;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub ranges: RangesConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,

    #[serde(default)]
    pub clock: ClockConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Empty means any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8086
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Per-domain range policies
///
/// Each table may set either key; the other keeps that domain's default.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RangesFile")]
pub struct RangesConfig {
    pub water: RangePolicy,

    /// Also applies to calories
    pub exercise: RangePolicy,

    pub weight: RangePolicy,
}

/// `[ranges]` as written in the file, before domain defaults
#[derive(Debug, Default, Deserialize)]
struct RangesFile {
    #[serde(default)]
    water: PolicyOverride,
    #[serde(default)]
    exercise: PolicyOverride,
    #[serde(default)]
    weight: PolicyOverride,
}

#[derive(Debug, Default, Deserialize)]
struct PolicyOverride {
    default_span_days: Option<u32>,
    max_span_days: Option<u32>,
}

impl PolicyOverride {
    fn over(&self, base: RangePolicy) -> RangePolicy {
        RangePolicy::new(
            self.default_span_days.unwrap_or(base.default_span_days),
            self.max_span_days.unwrap_or(base.max_span_days),
        )
    }
}

impl From<RangesFile> for RangesConfig {
    fn from(file: RangesFile) -> Self {
        Self {
            water: file.water.over(RangePolicy::water()),
            exercise: file.exercise.over(RangePolicy::exercise()),
            weight: file.weight.over(RangePolicy::weight()),
        }
    }
}

impl Default for RangesConfig {
    fn default() -> Self {
        Self {
            water: RangePolicy::water(),
            exercise: RangePolicy::exercise(),
            weight: RangePolicy::weight(),
        }
    }
}

impl RangesConfig {
    /// Policy governing range queries on `metric`
    pub fn policy_for(&self, metric: TrackedMetric) -> RangePolicy {
        match metric {
            TrackedMetric::Water => self.water,
            TrackedMetric::Exercise | TrackedMetric::Calories => self.exercise,
            TrackedMetric::Weight => self.weight,
        }
    }
}

/// Page size limits applied before the paginator sees a request
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_page_limit")]
    pub default_limit: i64,

    #[serde(default = "default_max_page_limit")]
    pub max_limit: i64,
}

fn default_page_limit() -> i64 {
    20
}

fn default_max_page_limit() -> i64 {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_page_limit(),
            max_limit: default_max_page_limit(),
        }
    }
}

impl PaginationConfig {
    /// Apply the default and clamp to the maximum; non-positive values pass through
    pub fn effective_limit(&self, requested: Option<i64>) -> i64 {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}

/// Which calendar day counts as "today"
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClockConfig {
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// Nothing is logged here: this runs before the subscriber exists, so
    /// rejected files are returned in the `ConfigLoad` for the caller to report.
    pub fn load_default() -> ConfigLoad {
        let candidates: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("daybook").join("config.toml")),
            Some(PathBuf::from("/etc/daybook/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&candidates)
    }

    /// Load the first existing candidate that parses and validates
    pub fn load_first(candidates: &[PathBuf]) -> ConfigLoad {
        let mut rejected = Vec::new();

        for path in candidates.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    return ConfigLoad {
                        config,
                        path: Some(path.clone()),
                        rejected,
                    }
                }
                Err(e) => rejected.push(e),
            }
        }

        let config = Self::from_env();
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                rejected.push(e);
                Config::default()
            }
        };

        ConfigLoad {
            config,
            path: None,
            rejected,
        }
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        let policies = [
            ("ranges.water", self.ranges.water),
            ("ranges.exercise", self.ranges.exercise),
            ("ranges.weight", self.ranges.weight),
        ];
        for (name, policy) in policies {
            if !policy.is_valid() {
                return Err(ConfigError::Invalid(format!(
                    "{}: need 1 <= default_span_days ({}) <= max_span_days ({})",
                    name, policy.default_span_days, policy.max_span_days
                )));
            }
        }

        let pagination = &self.pagination;
        if pagination.max_limit < 1
            || pagination.default_limit < 1
            || pagination.default_limit > pagination.max_limit
        {
            return Err(ConfigError::Invalid(format!(
                "pagination: need 1 <= default_limit ({}) <= max_limit ({})",
                pagination.default_limit, pagination.max_limit
            )));
        }

        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // API overrides
        if let Ok(host) = std::env::var("DAYBOOK_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("DAYBOOK_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Pagination overrides
        if let Ok(limit) = std::env::var("DAYBOOK_DEFAULT_PAGE_LIMIT") {
            if let Ok(l) = limit.parse() {
                self.pagination.default_limit = l;
            }
        }
        if let Ok(limit) = std::env::var("DAYBOOK_MAX_PAGE_LIMIT") {
            if let Ok(l) = limit.parse() {
                self.pagination.max_limit = l;
            }
        }

        // Clock override
        if let Ok(offset) = std::env::var("DAYBOOK_UTC_OFFSET_MINUTES") {
            if let Ok(o) = offset.parse() {
                self.clock.utc_offset_minutes = o;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("DAYBOOK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("DAYBOOK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Outcome of searching the default config locations
#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    /// File the config came from; `None` means defaults plus environment
    pub path: Option<PathBuf>,
    /// Files or overrides that were skipped, in search order
    pub rejected: Vec<ConfigError>,
}

impl ConfigLoad {
    /// Log where the config came from and everything that was skipped
    pub fn report(&self) {
        for error in &self.rejected {
            tracing::warn!(error = %error, "Ignored configuration");
        }
        match &self.path {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Daybook Configuration
#
# Environment variables override these settings:
# - DAYBOOK_API_HOST
# - DAYBOOK_API_PORT
# - DAYBOOK_DEFAULT_PAGE_LIMIT
# - DAYBOOK_MAX_PAGE_LIMIT
# - DAYBOOK_UTC_OFFSET_MINUTES
# - DAYBOOK_LOG_LEVEL
# - DAYBOOK_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8086

# Allowed CORS origins (empty allows any origin)
cors_origins = []

# Request timeout in seconds
request_timeout_secs = 30

# Range policies: days covered when `from` is omitted, and the
# largest inclusive span a request may ask for.
[ranges.water]
default_span_days = 7
max_span_days = 7

# Also used for calories
[ranges.exercise]
default_span_days = 7
max_span_days = 31

[ranges.weight]
default_span_days = 1
max_span_days = 31

[pagination]
# Page size when the request has no `limit`
default_limit = 20

# Larger requested limits are reduced to this
max_limit = 100

[clock]
# Offset from UTC (minutes) that decides which day is "today"
utc_offset_minutes = 0

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/daybook/daybook.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.addr(), "0.0.0.0:8086");
        assert_eq!(config.ranges.water, RangePolicy::new(7, 7));
        assert_eq!(config.ranges.exercise, RangePolicy::new(7, 31));
        assert_eq!(config.ranges.weight, RangePolicy::new(1, 31));
        assert_eq!(config.pagination.default_limit, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.port, 8086);
        assert_eq!(config.ranges.exercise.max_span_days, 31);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [ranges.water]
            default_span_days = 3
            max_span_days = 14
            "#,
        )
        .unwrap();

        assert_eq!(config.ranges.water, RangePolicy::new(3, 14));
        assert_eq!(config.ranges.exercise, RangePolicy::exercise());
        assert_eq!(config.api.port, 8086);
    }

    #[test]
    fn test_policy_for_metric() {
        let ranges = RangesConfig::default();
        assert_eq!(ranges.policy_for(TrackedMetric::Water), RangePolicy::water());
        assert_eq!(
            ranges.policy_for(TrackedMetric::Calories),
            RangePolicy::exercise()
        );
        assert_eq!(ranges.policy_for(TrackedMetric::Weight), RangePolicy::weight());
    }

    #[test]
    fn test_effective_limit() {
        let pagination = PaginationConfig::default();
        assert_eq!(pagination.effective_limit(None), 20);
        assert_eq!(pagination.effective_limit(Some(5)), 5);
        assert_eq!(pagination.effective_limit(Some(500)), 100);
        assert_eq!(pagination.effective_limit(Some(0)), 0);
        assert_eq!(pagination.effective_limit(Some(-1)), -1);
    }

    #[test]
    fn test_validate_rejects_bad_policy() {
        let mut config = Config::default();
        config.ranges.exercise = RangePolicy::new(40, 31);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ranges.exercise"));

        let mut config = Config::default();
        config.pagination.default_limit = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nport = 9000\n\n[pagination]\nmax_limit = 50").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.pagination.max_limit, 50);
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Path::new("/nonexistent/daybook.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nport = ").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ranges.weight]\ndefault_span_days = 0\nmax_span_days = 31").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_partial_policy_keeps_domain_default() {
        let config: Config = toml::from_str(
            r#"
            [ranges.exercise]
            max_span_days = 60

            [ranges.weight]
            default_span_days = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.ranges.exercise, RangePolicy::new(7, 60));
        assert_eq!(config.ranges.weight, RangePolicy::new(3, 31));
        assert_eq!(config.ranges.water, RangePolicy::water());
    }

    #[test]
    fn test_load_first_reports_rejected_files() {
        let mut invalid = tempfile::NamedTempFile::new().unwrap();
        writeln!(invalid, "[ranges.water]\ndefault_span_days = 9\nmax_span_days = 7").unwrap();
        let mut valid = tempfile::NamedTempFile::new().unwrap();
        writeln!(valid, "[ranges.water]\ndefault_span_days = 3").unwrap();

        let loaded = Config::load_first(&[
            PathBuf::from("/nonexistent/daybook.toml"),
            invalid.path().to_path_buf(),
            valid.path().to_path_buf(),
        ]);

        assert_eq!(loaded.path.as_deref(), Some(valid.path()));
        assert_eq!(loaded.config.ranges.water, RangePolicy::new(3, 7));
        assert_eq!(loaded.rejected.len(), 1);
        assert!(loaded.rejected[0].to_string().contains("ranges.water"));
    }

    #[test]
    fn test_load_first_falls_back_to_defaults() {
        let mut invalid = tempfile::NamedTempFile::new().unwrap();
        writeln!(invalid, "[api\nport = ").unwrap();

        let loaded = Config::load_first(&[invalid.path().to_path_buf()]);

        assert!(loaded.path.is_none());
        assert!(matches!(loaded.rejected[0], ConfigError::Parse { .. }));
        assert_eq!(loaded.config.ranges.water, RangePolicy::water());
    }
}
