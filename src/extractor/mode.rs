use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

/// How the engine reacts to selectors that match nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Missing scalars and columns become empty strings; empty groups become
    /// empty arrays.
    #[default]
    Lenient,
    /// Any missing scalar or column fails the extraction. With
    /// `require_records`, a repeated group without data rows fails too.
    Strict { require_records: bool },
}

impl ExtractMode {
    pub const fn new(kind: ModeKind, require_records: bool) -> Self {
        match kind {
            ModeKind::Lenient => Self::Lenient,
            ModeKind::Strict => Self::Strict { require_records },
        }
    }

    /// Strict mode that also requires every group to yield a record.
    pub const fn strict() -> Self {
        Self::Strict {
            require_records: true,
        }
    }

    pub const fn kind(&self) -> ModeKind {
        match self {
            Self::Lenient => ModeKind::Lenient,
            Self::Strict { .. } => ModeKind::Strict,
        }
    }

    pub const fn is_strict(&self) -> bool {
        matches!(self, Self::Strict { .. })
    }

    pub const fn requires_records(&self) -> bool {
        matches!(
            self,
            Self::Strict {
                require_records: true
            }
        )
    }
}

/// Mode name as it appears in configuration and request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Lenient,
    Strict,
}

impl FromStr for ModeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown mode '{other}', expected 'lenient' or 'strict'")),
        }
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lenient => f.write_str("lenient"),
            Self::Strict => f.write_str("strict"),
        }
    }
}
