//! Process exit statuses.
//!
//! An empty cluster or similarity result still exits with `0`. Values stay
//! below 126, which shells reserve.

use crate::error::AtlasError;

/// Status the `entity-atlas` binary exits with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// 0
    Success = 0,

    /// 1, anything without a more specific code
    GeneralError = 1,

    /// 3, unknown query id
    NotFound = 3,

    /// 5, entity file unreadable or unwritable
    IoError = 5,

    /// 6, bad settings file or value
    ConfigError = 6,

    /// 9, bad vector or cluster count
    InvalidInput = 9,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Code for a library error.
    pub fn from_error(error: &AtlasError) -> Self {
        match error {
            AtlasError::EntityNotFound { .. } => ExitCode::NotFound,
            AtlasError::Load { .. } | AtlasError::Save { .. } => ExitCode::IoError,
            AtlasError::Config { .. } => ExitCode::ConfigError,
            AtlasError::DimensionMismatch { .. }
            | AtlasError::InvalidVector(_)
            | AtlasError::InvalidClusterCount { .. }
            | AtlasError::TooManyClusters { .. } => ExitCode::InvalidInput,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }

    /// Short label for the code.
    pub fn description(&self) -> &str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::NotFound => "Not found",
            ExitCode::IoError => "I/O error",
            ExitCode::ConfigError => "Configuration error",
            ExitCode::InvalidInput => "Invalid input",
        }
    }
}
