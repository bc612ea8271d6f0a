//! Error types for the library layer.

use std::fmt;

use crate::rightsholder::DirectoryError;

/// Errors produced while building royalty reports.
///
/// Source and directory failures are wrapped unmodified; the pipeline itself
/// only fails on rows it cannot total or on an invalid configuration.
#[derive(Debug)]
pub enum RoyaltyError {
    /// The usage-metrics source failed.
    Source(counter_api::Error),
    /// The rightsholder directory failed.
    Directory(DirectoryError),
    /// A raw row cannot be processed.
    InvalidRecord {
        proprietary_id: String,
        reason: String,
    },
    /// User-provided configuration failed validation.
    InvalidInput(String),
    /// A column pattern failed to compile.
    Pattern(String),
}

impl fmt::Display for RoyaltyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(e) => write!(f, "Usage source error: {}", e),
            Self::Directory(e) => write!(f, "Rightsholder directory error: {}", e),
            Self::InvalidRecord {
                proprietary_id,
                reason,
            } => write!(f, "Invalid usage record {}: {}", proprietary_id, reason),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::Pattern(msg) => write!(f, "Regex compile error: {}", msg),
        }
    }
}

impl std::error::Error for RoyaltyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Source(e) => Some(e),
            Self::Directory(e) => Some(e),
            _ => None,
        }
    }
}

impl From<counter_api::Error> for RoyaltyError {
    fn from(e: counter_api::Error) -> Self {
        Self::Source(e)
    }
}

impl From<DirectoryError> for RoyaltyError {
    fn from(e: DirectoryError) -> Self {
        Self::Directory(e)
    }
}
