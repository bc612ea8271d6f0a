//! CLI subcommand implementations.

pub mod copyholder;
pub mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use royalty_lib::config::parse_date;
use royalty_lib::{JsonFileSource, ReportConfig, WorkStore};

/// Inputs shared by every subcommand.
#[derive(Args)]
pub struct InputArgs {
    /// COUNTER5 item report JSON (`{"items": [...]}` or a bare array of rows)
    #[arg(long)]
    pub items: PathBuf,

    /// Work metadata YAML (`works: [...]`) with rightsholders and identifiers
    #[arg(long)]
    pub works: PathBuf,

    /// Press subdomain the report is for
    #[arg(long)]
    pub press: String,

    /// Press display name, printed as the report's Collection Name
    #[arg(long, env = "ROYALTY_COLLECTION_NAME")]
    pub collection_name: String,

    /// First day of the reporting period (YYYY-MM-DD)
    #[arg(long)]
    pub start: String,

    /// Last day of the reporting period (YYYY-MM-DD)
    #[arg(long)]
    pub end: String,
}

impl InputArgs {
    pub fn config(&self) -> Result<ReportConfig> {
        let start = parse_date(&self.start)?;
        let end = parse_date(&self.end)?;
        Ok(ReportConfig::new(&self.press, &self.collection_name, start, end)?)
    }

    pub fn source(&self) -> JsonFileSource {
        JsonFileSource::new(&self.items)
    }

    pub fn works(&self) -> Result<WorkStore> {
        let store = WorkStore::load(&self.works)
            .with_context(|| format!("loading work metadata from {}", self.works.display()))?;
        Ok(store.scoped_to(&self.press))
    }
}
