//! JSON envelope shared by every command.
//!
//! Success and failure use one shape so scripts can branch on `status`
//! and `code` without parsing human-readable messages.

use crate::error::AtlasError;
use crate::io::exit_code::ExitCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// How a command prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Tables and plain lines
    #[default]
    Text,
    /// One `JsonResponse` document on stdout
    Json,
}

impl OutputFormat {
    /// Maps the global `--json` switch.
    #[must_use]
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        *self == Self::Json
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Envelope around a command result or error.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonResponse<T = serde_json::Value>
where
    T: Serialize,
{
    pub status: ResponseStatus,

    /// "OK" on success, otherwise the error's status code
    pub code: String,

    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,

    /// Same value the process exits with
    pub exit_code: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

/// What the caller can do about a failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub suggestions: Vec<String>,
}

/// Provenance of a response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseMeta {
    /// Crate version that produced the response
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ResponseMeta {
    /// Metadata stamped with the crate version and the current time.
    pub fn now(execution_time_ms: u64) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Some(format_utc_timestamp()),
            execution_time_ms: Some(execution_time_ms),
        }
    }
}

impl<T> JsonResponse<T>
where
    T: Serialize,
{
    /// Wraps a command result.
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            code: "OK".to_string(),
            message: "Operation completed successfully".to_string(),
            data: Some(data),
            error: None,
            exit_code: ExitCode::Success as u8,
            meta: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_meta(mut self, meta: ResponseMeta) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl JsonResponse<serde_json::Value> {
    /// Describes a failed command.
    pub fn from_error(error: &AtlasError) -> Self {
        let suggestions = error
            .recovery_suggestions()
            .into_iter()
            .map(String::from)
            .collect();

        Self {
            status: ResponseStatus::Error,
            code: error.status_code(),
            message: error.to_string(),
            data: None,
            error: Some(ErrorDetails { suggestions }),
            exit_code: ExitCode::from_error(error) as u8,
            meta: None,
        }
    }

    /// Failure that did not come from the library, such as an unreadable
    /// working directory.
    pub fn general_error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            code: "GENERAL_ERROR".to_string(),
            message: message.into(),
            data: None,
            error: Some(ErrorDetails {
                suggestions: vec!["Re-run with --debug for more detail".to_string()],
            }),
            exit_code: ExitCode::GeneralError as u8,
            meta: None,
        }
    }
}

/// Current time as "YYYY-MM-DD HH:MM:SS UTC".
pub fn format_utc_timestamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
