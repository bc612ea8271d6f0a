//! Error types for the usage-source boundary.

use std::path::PathBuf;

/// Errors that can occur when obtaining an item report from a usage source.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The report document could not be read.
    #[error("Failed to read item report {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The report document was read but is not a valid item report.
    #[error("Failed to parse item report {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The source could not serve the request at all.
    #[error("Usage source unavailable: {0}")]
    Unavailable(String),
}
