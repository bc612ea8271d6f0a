//! Library layer for royalty usage reporting: turns COUNTER5 item report rows
//! into per-rightsholder and combined royalty reports.
//!
//! The stages are plain functions over `Vec<UsageRecord>` so that their order
//! is explicit in [`report`]; external metadata is reached only through the
//! [`RightsholderDirectory`] trait.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod isbn;
pub mod report;
pub mod rightsholder;
pub mod transform;

pub use counter_api;
pub use counter_api::types;
pub use counter_api::{ItemReportParams, JsonFileSource, StaticSource, UsageSource};

pub use cache::CachedDirectory;
pub use config::ReportConfig;
pub use error::RoyaltyError;
pub use isbn::{classify_isbns, IsbnClassifier, IsbnSet};
pub use report::{
    build_copyholder_report, build_reports, sanitize_filename, Report, ReportSet, UsageReport,
};
pub use rightsholder::{DirectoryError, RightsholderDirectory, WorkMetadata, WorkStore};
pub use transform::with_delimiter;
