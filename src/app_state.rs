use crate::{
    config::Config,
    extractor::{ExtractMode, ModeKind},
};

/// Shared, read-only state for the HTTP handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppState {
    pub default_mode: ModeKind,
    pub require_records: bool,
}

impl AppState {
    pub fn new(default_mode: ModeKind, require_records: bool) -> Self {
        Self {
            default_mode,
            require_records,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.mode(), config.require_records())
    }

    /// Mode for one request: request values win over the configured defaults.
    pub fn resolve_mode(&self, mode: Option<ModeKind>, require_records: Option<bool>) -> ExtractMode {
        ExtractMode::new(
            mode.unwrap_or(self.default_mode),
            require_records.unwrap_or(self.require_records),
        )
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
