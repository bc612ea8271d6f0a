//! Report assembly: chains the transform stages, takes the total, and builds
//! the named per-rightsholder and combined reports.

use counter_api::types::{UsageRecord, PARENT_PROPRIETARY_ID};
use counter_api::{ItemReportParams, UsageSource};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::aggregate::{add_rightsholder, group_by_rightsholder, total_hits};
use crate::cache::CachedDirectory;
use crate::config::ReportConfig;
use crate::error::RoyaltyError;
use crate::rightsholder::RightsholderDirectory;
use crate::transform::{
    add_hebids, format_hits, reclassify_isbns, relabel, remove_extra_lines, total_item_to_title,
    validate_records, with_delimiter,
};

pub const COLLECTION_NAME: &str = "Collection Name";
pub const REPORT_NAME: &str = "Report Name";
pub const RIGHTSHOLDER_NAME: &str = "Rightsholder Name";
pub const REPORTING_PERIOD: &str = "Reporting Period";
pub const TOTAL_HITS_ALL: &str = "Total Hits (All Titles, All Rights Holders)";
pub const TOTAL_HITS: &str = "Total Hits";

pub const USAGE_REPORT: &str = "Royalty Usage Report";
pub const USAGE_SUMMARY_REPORT: &str = "Royalty Usage Summary Report";
pub const ALL_RIGHTS_HOLDERS: &str = "All Rights Holders";

/// A header preamble plus the rows of one report.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Report {
    pub header: IndexMap<String, String>,
    pub items: Vec<UsageRecord>,
}

impl Report {
    pub fn header_value(&self, label: &str) -> Option<&str> {
        self.header.get(label).map(String::as_str)
    }

    /// Column names in order of first appearance across all rows.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: IndexSet<String> = IndexSet::new();
        for item in &self.items {
            for key in item.keys() {
                if !columns.contains(key) {
                    columns.insert(key.to_string());
                }
            }
        }
        columns.into_iter().collect()
    }
}

/// Reports keyed by file name, in output order.
pub type ReportSet = IndexMap<String, Report>;

/// Replaces every character outside `[0-9A-Za-z.-]` with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn header(
    config: &ReportConfig,
    report_name: &str,
    rightsholder: &str,
    total_label: &str,
    total: i64,
) -> IndexMap<String, String> {
    IndexMap::from([
        (COLLECTION_NAME.to_string(), config.collection_name.clone()),
        (REPORT_NAME.to_string(), report_name.to_string()),
        (RIGHTSHOLDER_NAME.to_string(), rightsholder.to_string()),
        (REPORTING_PERIOD.to_string(), config.period_label()),
        (total_label.to_string(), with_delimiter(total)),
    ])
}

/// Relabel, drop the empty half of each access-type pair, add hebids and
/// split the ISBN column.
fn normalize<D>(raw: Vec<UsageRecord>, directory: &D) -> Result<Vec<UsageRecord>, RoyaltyError>
where
    D: RightsholderDirectory + ?Sized,
{
    validate_records(&raw)?;
    let items = relabel(raw);
    let items = remove_extra_lines(items);
    let items = add_hebids(items, directory)?;
    reclassify_isbns(items)
}

/// Builds one report per rightsholder plus the combined report.
///
/// Per-rightsholder reports come first, in the order their rightsholders
/// first appear in `raw`; the combined report is always last. With no rows
/// the set holds only an empty combined report.
pub fn build_reports<D>(
    config: &ReportConfig,
    raw: Vec<UsageRecord>,
    directory: &D,
) -> Result<ReportSet, RoyaltyError>
where
    D: RightsholderDirectory + ?Sized,
{
    let directory = CachedDirectory::new(directory);
    let items = normalize(raw, &directory)?;
    let items = total_item_to_title(items);
    let total = total_hits(&items);
    // counts become display strings from here on
    let items = format_hits(items)?;

    let mut reports = ReportSet::new();
    for (rightsholder, group) in group_by_rightsholder(&items, &directory)? {
        let name = format!(
            "{}.usage.{}.csv",
            sanitize_filename(&rightsholder),
            config.period_slug()
        );
        tracing::info!("Built {} with {} rows", name, group.len());
        let report = Report {
            header: header(config, USAGE_REPORT, &rightsholder, TOTAL_HITS_ALL, total),
            items: group,
        };
        if reports.insert(name.clone(), report).is_some() {
            tracing::warn!("Rightsholder file name {} is shared; keeping the later report", name);
        }
    }

    let combined_name = format!("usage_combined.{}.csv", config.period_slug());
    let combined_items = add_rightsholder(items, &directory)?;
    tracing::info!(
        "Built {} with {} rows, total hits {}",
        combined_name,
        combined_items.len(),
        total
    );
    reports.insert(
        combined_name,
        Report {
            header: header(
                config,
                USAGE_SUMMARY_REPORT,
                ALL_RIGHTS_HOLDERS,
                TOTAL_HITS_ALL,
                total,
            ),
            items: combined_items,
        },
    );
    Ok(reports)
}

/// Builds the report of a single rightsholder for inline display.
///
/// Rows are restricted to that rightsholder's works before any stage runs.
/// `Metric_Type` keeps its source value here.
pub fn build_copyholder_report<D>(
    config: &ReportConfig,
    raw: Vec<UsageRecord>,
    directory: &D,
    rightsholder: &str,
) -> Result<Report, RoyaltyError>
where
    D: RightsholderDirectory + ?Sized,
{
    let ids = directory.ids_for(rightsholder)?;
    let raw: Vec<UsageRecord> = raw
        .into_iter()
        .filter(|r| {
            r.get_str(PARENT_PROPRIETARY_ID)
                .is_some_and(|parent_id| ids.contains(parent_id))
        })
        .collect();
    tracing::debug!("{} raw rows belong to {}", raw.len(), rightsholder);

    let directory = CachedDirectory::new(directory);
    let items = normalize(raw, &directory)?;
    let total = total_hits(&items);
    let items = format_hits(items)?;

    Ok(Report {
        header: header(config, USAGE_REPORT, rightsholder, TOTAL_HITS, total),
        items,
    })
}

/// A report run bound to its configuration and collaborators.
pub struct UsageReport<'a, S: ?Sized, D: ?Sized> {
    config: ReportConfig,
    source: &'a S,
    directory: &'a D,
}

impl<'a, S, D> UsageReport<'a, S, D>
where
    S: UsageSource + ?Sized,
    D: RightsholderDirectory + ?Sized,
{
    pub fn new(config: ReportConfig, source: &'a S, directory: &'a D) -> Self {
        Self {
            config,
            source,
            directory,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// The request sent to the usage source.
    pub fn params(&self) -> ItemReportParams {
        ItemReportParams::royalty(
            &self.config.subdomain,
            self.config.start_date,
            self.config.end_date,
        )
    }

    fn items(&self) -> Result<Vec<UsageRecord>, RoyaltyError> {
        let report = self.source.item_report(&self.params())?;
        tracing::debug!(
            "Usage source returned {} rows for {}",
            report.items.len(),
            self.config.subdomain
        );
        Ok(report.items)
    }

    /// All per-rightsholder reports plus the combined report.
    pub fn report(&self) -> Result<ReportSet, RoyaltyError> {
        build_reports(&self.config, self.items()?, self.directory)
    }

    /// The report of one rightsholder.
    pub fn report_for_copyholder(&self, rightsholder: &str) -> Result<Report, RoyaltyError> {
        build_copyholder_report(&self.config, self.items()?, self.directory, rightsholder)
    }
}
