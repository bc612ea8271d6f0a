//! The usage-metrics source seam and two file/memory-backed implementations.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::{ItemReport, UsageRecord};
use crate::{Error, ItemReportParams};

/// Something that can produce a COUNTER5 item report for a set of parameters.
///
/// Implementations are expected to apply the parameters' filters server-side;
/// the royalty pipeline does not re-filter what it receives.
pub trait UsageSource: Send + Sync {
    fn item_report(&self, params: &ItemReportParams) -> Result<ItemReport, Error>;
}

/// A source that always returns the same, already-filtered rows.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    items: Vec<UsageRecord>,
}

impl StaticSource {
    pub fn new(items: Vec<UsageRecord>) -> Self {
        Self { items }
    }
}

impl UsageSource for StaticSource {
    fn item_report(&self, params: &ItemReportParams) -> Result<ItemReport, Error> {
        tracing::debug!(
            "Serving {} static rows for press {}",
            self.items.len(),
            params.press
        );
        Ok(ItemReport::from_items(self.items.clone()))
    }
}

/// A source backed by a JSON document on disk: either an item report
/// object (`{"items": [...]}`) or a bare array of rows.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Rows(Vec<UsageRecord>),
    Report(ItemReport),
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UsageSource for JsonFileSource {
    fn item_report(&self, params: &ItemReportParams) -> Result<ItemReport, Error> {
        let body = std::fs::read_to_string(&self.path).map_err(|e| {
            tracing::error!("Failed to read {}: {}", self.path.display(), e);
            Error::Io {
                path: self.path.clone(),
                source: e,
            }
        })?;
        let document: Document = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse {}: {}", self.path.display(), e);
            Error::Parse {
                path: self.path.clone(),
                source: e,
            }
        })?;
        let report = match document {
            Document::Rows(items) => ItemReport::from_items(items),
            Document::Report(report) => report,
        };
        tracing::debug!(
            "Loaded {} rows from {} for press {} ({} to {})",
            report.items.len(),
            self.path.display(),
            params.press,
            params.start_date,
            params.end_date
        );
        Ok(report)
    }
}
