//! The `copyholder` subcommand: the report of one rightsholder.

use anyhow::Result;
use clap::Args;
use royalty_lib::UsageReport;

use super::InputArgs;
use crate::output::{print_json, print_report_csv, print_report_markdown, print_report_table, OutputFormat};

#[derive(Args)]
pub struct CopyholderArgs {
    /// Rightsholder name exactly as recorded in the work metadata
    pub rightsholder: String,

    #[command(flatten)]
    pub input: InputArgs,
}

pub fn run(args: &CopyholderArgs, format: &OutputFormat) -> Result<()> {
    let config = args.input.config()?;
    let source = args.input.source();
    let works = args.input.works()?;

    let report = UsageReport::new(config, &source, &works).report_for_copyholder(&args.rightsholder)?;

    match format {
        OutputFormat::Table => print_report_table(None, &report),
        OutputFormat::Json => print_json(&report),
        OutputFormat::Csv => print_report_csv(None, &report)?,
        OutputFormat::Markdown => print_report_markdown(None, &report),
    }
    Ok(())
}
