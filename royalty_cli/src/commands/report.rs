//! The `report` subcommand: every per-rightsholder report plus the combined one.

use anyhow::Result;
use clap::Args;
use royalty_lib::UsageReport;

use super::InputArgs;
use crate::output::{print_json, print_report_csv, print_report_markdown, print_report_table, OutputFormat};

#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only print the report with this file name
    #[arg(long)]
    pub only: Option<String>,
}

pub fn run(args: &ReportArgs, format: &OutputFormat) -> Result<()> {
    let config = args.input.config()?;
    let source = args.input.source();
    let works = args.input.works()?;

    let mut reports = UsageReport::new(config, &source, &works).report()?;
    if let Some(only) = &args.only {
        reports.retain(|name, _| name == only);
        if reports.is_empty() {
            anyhow::bail!("no report named {}", only);
        }
    }

    eprintln!("{} reports", reports.len());

    if let OutputFormat::Json = format {
        print_json(&reports);
        return Ok(());
    }
    for (name, report) in &reports {
        match format {
            OutputFormat::Table => print_report_table(Some(name), report),
            OutputFormat::Markdown => print_report_markdown(Some(name), report),
            OutputFormat::Csv => print_report_csv(Some(name), report)?,
            OutputFormat::Json => {}
        }
    }
    Ok(())
}
