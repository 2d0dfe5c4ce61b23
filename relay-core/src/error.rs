//! Error types for Relay core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while parsing and rendering a resource request
#[derive(Debug, Error)]
pub enum CoreError {
    /// Stdin payload is not a valid resource request
    #[error("Invalid resource payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// A required parameter is absent after merging source and params
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// A parameter is present but has the wrong shape
    #[error("Invalid parameter `{name}`: {message}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// What was wrong with it
        message: String,
    },

    /// Template references a name with no value
    #[error("Unknown placeholder `{{{0}}}`")]
    UnknownPlaceholder(String),

    /// Template has unbalanced or empty braces
    #[error("Malformed template `{template}`: {reason}")]
    MalformedTemplate {
        /// The offending template string
        template: String,
        /// Why it could not be rendered
        reason: String,
    },

    /// File reference resolves outside the resource directory
    #[error("Can not traverse outside of working directory: `{}`", .0.display())]
    PathEscape(PathBuf),

    /// File reference does not point at a regular file
    #[error("Path `{}` not found or is not a file", .0.display())]
    FileNotFound(PathBuf),

    /// Filesystem failure while resolving or reading a file reference
    #[error("Failed to access `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    /// Create a malformed template error
    pub fn malformed(template: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }
}
