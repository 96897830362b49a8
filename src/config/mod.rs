//! Configuration handling for the service.
//!
//! Everything is read from environment variables with development defaults,
//! see [`Config::from_env`].

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::extractor::{ExtractMode, ModeKind};
use crate::telemetry::LogFormat;

/// Environment variable names. Public so tests and scripts can refer to them.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_PORT: &str = "PORT";
pub const ENV_EXTRACT_MODE: &str = "EXTRACT_MODE";
pub const ENV_REQUIRE_RECORDS: &str = "EXTRACT_REQUIRE_RECORDS";
pub const ENV_MAX_UPLOAD_BYTES: &str = "MAX_UPLOAD_BYTES";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Default development values used when environment variables are absent.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_MODE: ModeKind = ModeKind::Lenient;
const DEFAULT_REQUIRE_RECORDS: bool = true;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Service runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    mode: ModeKind,
    require_records: bool,
    max_upload_bytes: usize,
    log_format: LogFormat,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    ///
    /// `BIND_ADDR` wins over `PORT`; a bare `PORT` binds every interface.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = match (env::var(ENV_BIND_ADDR), env::var(ENV_PORT)) {
            (Ok(addr), _) => addr,
            (Err(_), Ok(port)) => {
                let port: u16 = parse_var(ENV_PORT, &port)?;
                format!("0.0.0.0:{port}")
            }
            (Err(_), Err(_)) => DEFAULT_BIND_ADDR.to_string(),
        };

        let mode = read_var(ENV_EXTRACT_MODE)?.unwrap_or(DEFAULT_MODE);
        let require_records = read_var(ENV_REQUIRE_RECORDS)?.unwrap_or(DEFAULT_REQUIRE_RECORDS);
        let max_upload_bytes =
            read_var(ENV_MAX_UPLOAD_BYTES)?.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        if max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_MAX_UPLOAD_BYTES,
                reason: "must be greater than zero".to_string(),
            });
        }
        let log_format = read_var(ENV_LOG_FORMAT)?.unwrap_or_default();

        Ok(Self {
            bind_addr,
            mode,
            require_records,
            max_upload_bytes,
            log_format,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// Mode used when a request does not pick one.
    pub fn mode(&self) -> ModeKind {
        self.mode
    }
    /// Whether strict extractions fail on repeated groups without records.
    pub fn require_records(&self) -> bool {
        self.require_records
    }
    pub fn extract_mode(&self) -> ExtractMode {
        ExtractMode::new(self.mode, self.require_records)
    }
    /// Largest accepted request body, uploads included.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            mode: DEFAULT_MODE,
            require_records: DEFAULT_REQUIRE_RECORDS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_format: LogFormat::default(),
        }
    }
}

fn read_var<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) => parse_var(name, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_var<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|err: T::Err| ConfigError::InvalidValue {
        field: name,
        reason: err.to_string(),
    })
}

/// Errors that can occur while building a configuration.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
