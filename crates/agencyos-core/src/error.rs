//! Error types for Agency OS

use thiserror::Error;

/// Result type alias using Agency OS's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Agency OS error types with helpful messages and suggestions
///
/// Handlers and the interpreter never surface these to chat users; lookups
/// that miss and gateways that fail are rendered into the reply text. These
/// variants are for startup wiring, gateways and manual entry.
#[derive(Error, Debug)]
pub enum Error {
    // Wiring errors (E001-E099)
    #[error("{0} must be supplied before the interpreter is built")]
    MissingCollaborator(&'static str),

    // Persistence errors (E100-E199)
    #[error("Snapshot persistence failed: {0}")]
    Persistence(String),

    // Export errors (E200-E299)
    #[error("Sheet export failed: {0}")]
    ExportFailed(String),

    #[error("Gateway call timed out after {0} seconds")]
    GatewayTimeout(u64),

    #[error("Network error: {0}. Check the export webhook URL.")]
    NetworkError(#[from] reqwest::Error),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Input errors (E800-E899)
    #[error("Invalid {field}: {message}")]
    InvalidInput { field: &'static str, message: String },

    // Generic errors
    #[error("Snapshot is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a manual-entry validation gap
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCollaborator(_) => "E001",
            Self::Persistence(_) => "E100",
            Self::ExportFailed(_) => "E200",
            Self::GatewayTimeout(_) => "E201",
            Self::NetworkError(_) => "E202",
            Self::ConfigError(_) => "E600",
            Self::InvalidInput { .. } => "E800",
            Self::Serialization(_) => "E900",
            Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Persistence(_) => Some("agencyos config get storage.snapshot_path".to_string()),
            Self::ExportFailed(_) | Self::NetworkError(_) => {
                Some("agencyos config get export.webhook_url".to_string())
            }
            Self::GatewayTimeout(_) => Some("agencyos config set export.timeout_secs 20".to_string()),
            Self::ConfigError(_) => Some("agencyos config list".to_string()),
            Self::Serialization(_) => Some("agencyos reset".to_string()),
            _ => None,
        }
    }

    /// Whether this error should abort startup
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingCollaborator(_) | Self::ConfigError(_))
    }
}
