mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "royalty")]
#[command(about = "Build royalty usage reports from COUNTER5 item reports")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every per-rightsholder report plus the combined report
    Report(commands::report::ReportArgs),
    /// Build the report of a single rightsholder
    Copyholder(commands::copyholder::CopyholderArgs),
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("royalty=info".parse()?)
                .add_directive("royalty_lib=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        "csv" => OutputFormat::Csv,
        "markdown" | "md" => OutputFormat::Markdown,
        _ => OutputFormat::Table,
    };

    match &cli.command {
        Commands::Report(args) => commands::report::run(args, &format)?,
        Commands::Copyholder(args) => commands::copyholder::run(args, &format)?,
    }

    Ok(())
}
