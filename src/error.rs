//! Error types for the versa library
//!
//! Every operation on the version store reports its outcome through
//! [`VersaError`]. All variants are recoverable: callers render a message and
//! carry on, the store is never left half-mutated.

use thiserror::Error;

/// Type alias for Results in the versa library
pub type Result<T> = std::result::Result<T, VersaError>;

/// Main error type for all versa operations
#[derive(Debug, Error)]
pub enum VersaError {
    /// Content hash matches a snapshot that is already stored
    #[error("Duplicate content: no change detected")]
    DuplicateContent,

    /// Version number not present in the store
    #[error("Version not found: {0}")]
    VersionNotFound(u64),

    /// At least one of two compared versions is missing
    #[error("One of the versions {first} and {second} was not found")]
    PartialNotFound {
        /// First requested version
        first: u64,
        /// Second requested version
        second: u64,
    },

    /// Append with a version that does not extend the history
    #[error("Version {version} does not follow latest version {latest}")]
    VersionOutOfOrder {
        /// Rejected version number
        version: u64,
        /// Current tail version
        latest: u64,
    },

    /// Every version number has been handed out
    #[error("No version number left after {latest}")]
    VersionSpaceExhausted {
        /// Highest version handed out so far
        latest: u64,
    },

    /// Tracked file or backup could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// I/O errors during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Walk directory error from walkdir crate
    #[error("Walk directory error")]
    WalkDir(#[from] walkdir::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VersaError {
    /// Create a persistence error with a custom message
    pub fn persistence(msg: impl Into<String>) -> Self {
        VersaError::Persistence(msg.into())
    }

    /// Create an invalid configuration error with a custom message
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        VersaError::InvalidConfiguration(msg.into())
    }

    /// Create an internal error with a custom message
    pub fn internal(msg: impl Into<String>) -> Self {
        VersaError::Internal(msg.into())
    }

    /// Check if this error means a requested version does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            VersaError::VersionNotFound(_) | VersaError::PartialNotFound { .. }
        )
    }

    /// Check if this error came from the file system side
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            VersaError::Persistence(_) | VersaError::Io(_) | VersaError::WalkDir(_)
        )
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        const LIST_HINT: &str =
            "If you are not sure please press 'p' to list all valid version numbers.";
        match self {
            VersaError::DuplicateContent => {
                "versa did not detect any change to your file and will not create a new version."
                    .to_string()
            }
            VersaError::VersionNotFound(_) => {
                format!("Please enter a valid version number.\n{}", LIST_HINT)
            }
            VersaError::PartialNotFound { .. } => {
                format!(
                    "One of the provided version numbers was invalid. Please enter a valid version number.\n{}",
                    LIST_HINT
                )
            }
            VersaError::Persistence(msg) => {
                format!("Failed to access the file: {}", msg)
            }
            _ => self.to_string(),
        }
    }
}
