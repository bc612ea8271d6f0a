use std::io::Write;

use anyhow::Result;
use royalty_lib::Report;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::Table;

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

// -- Row builders --

/// Column names and stringified cells of a report. Missing cells are empty.
fn build_item_rows(report: &Report) -> (Vec<String>, Vec<Vec<String>>) {
    let columns = report.columns();
    let rows = report
        .items
        .iter()
        .map(|item| {
            columns
                .iter()
                .map(|c| item.get(c).map(|v| v.to_string()).unwrap_or_default())
                .collect()
        })
        .collect();
    (columns, rows)
}

fn header_table(report: &Report) -> Table {
    let mut builder = Builder::default();
    for (label, value) in &report.header {
        builder.push_record([label.clone(), value.clone()]);
    }
    builder.build()
}

fn items_table(report: &Report) -> Table {
    let (columns, rows) = build_item_rows(report);
    let mut builder = Builder::default();
    builder.push_record(columns);
    for row in rows {
        builder.push_record(row);
    }
    builder.build()
}

fn title(name: Option<&str>) {
    if let Some(name) = name {
        println!("{}", name);
    }
}

// -- Table output --

pub fn print_report_table(name: Option<&str>, report: &Report) {
    title(name);
    println!("{}", header_table(report));
    if !report.items.is_empty() {
        println!("{}", items_table(report));
    }
}

// -- Markdown output --

pub fn print_report_markdown(name: Option<&str>, report: &Report) {
    if let Some(name) = name {
        println!("## {}", name);
        println!();
    }
    let mut header = header_table(report);
    header.with(Style::markdown());
    println!("{}", header);
    println!();
    if !report.items.is_empty() {
        let mut items = items_table(report);
        items.with(Style::markdown());
        println!("{}", items);
        println!();
    }
}

// -- CSV output --

/// Writes the header as `label,value` rows, then the column row and the
/// data rows.
pub fn write_report_csv<W: Write>(report: &Report, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    for (label, value) in &report.header {
        wtr.write_record([label, value])?;
    }
    let (columns, rows) = build_item_rows(report);
    if !columns.is_empty() {
        wtr.write_record(&columns)?;
    }
    for row in rows {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_report_csv(name: Option<&str>, report: &Report) -> Result<()> {
    title(name);
    write_report_csv(report, std::io::stdout())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
