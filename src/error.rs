//! Error types.
//!
//! Only configuration problems are fatal. Storage and leaderboard failures are
//! reported by the boundary collaborators and logged by the session; they never
//! reach the game state.

/// Error type for board configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The value pool has no entries, so no grid can be built
    EmptyValuePool,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyValuePool => write!(f, "Value pool must contain at least one value"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Result type for board configuration
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Error type for key-value store access
#[derive(Debug)]
pub enum StorageError {
    /// The backing store rejected the write (quota, private mode, ...)
    WriteFailed(String),
    /// A field could not be encoded
    Encode(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::WriteFailed(reason) => write!(f, "Failed to write to storage: {}", reason),
            StorageError::Encode(e) => write!(f, "Failed to encode stored field: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Encode(e) => Some(e),
            StorageError::WriteFailed(_) => None,
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Encode(e)
    }
}

/// Error type for leaderboard submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The sink refused or failed to store the record
    Rejected(String),
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkError::Rejected(reason) => write!(f, "Leaderboard rejected record: {}", reason),
        }
    }
}

impl std::error::Error for SinkError {}
