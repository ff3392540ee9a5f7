//! Process command - ingest a single vendor invoice file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use tally_core::export::{to_csv_string, to_json, to_text};
use tally_core::{IngestOutput, IngestReport, InvoiceIngester, VendorProfile};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (CSV export or PDF invoice)
    #[arg(required = true)]
    input: PathBuf,

    /// Vendor id (see `tally vendors`)
    #[arg(long)]
    vendor: String,

    /// Master catalog CSV, overriding the vendor default
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Print row and match counts
    #[arg(long)]
    stats: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text table
    Text,
}

impl OutputFormat {
    /// File extension for written outputs.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let vendor = find_vendor(&config.vendors, &args.vendor)?.clone();
    check_extension(&args.input, &vendor)?;

    info!("Processing {} for {}", args.input.display(), vendor.name);

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );

    pb.set_message("Reading file...");
    pb.set_position(10);
    let data = fs::read(&args.input)?;

    pb.set_message("Extracting items...");
    pb.set_position(30);
    let ingester = InvoiceIngester::new(config);
    let result = ingester.process(&vendor.id, &data, args.catalog.as_deref());

    pb.finish_and_clear();
    let output = result?;
    if output.is_empty() {
        warn!("No invoice rows in {}", args.input.display());
    }

    let rendered = format_output(&output, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &rendered)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", rendered);
    }

    if args.stats {
        print_report(&output.report());
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Look up a vendor profile or explain how to list them.
pub fn find_vendor<'a>(
    vendors: &'a tally_core::models::config::VendorRegistry,
    id: &str,
) -> anyhow::Result<&'a VendorProfile> {
    vendors.get(id).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown vendor: {}. Run 'tally vendors' to list configured vendors.",
            id
        )
    })
}

/// Reject files whose extension does not fit the vendor's lane.
pub fn check_extension(path: &Path, vendor: &VendorProfile) -> anyhow::Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let expected = vendor.lane.extension();
    if extension != expected {
        anyhow::bail!(
            "{} expects a .{} file, got {}",
            vendor.name,
            expected,
            path.display()
        );
    }
    Ok(())
}

/// Render ingested rows in the requested format.
pub fn format_output(output: &IngestOutput, format: OutputFormat) -> anyhow::Result<String> {
    let rendered = match (output, format) {
        (IngestOutput::Structured(rows), OutputFormat::Json) => to_json(rows)? + "\n",
        (IngestOutput::Unstructured(rows), OutputFormat::Json) => to_json(rows)? + "\n",
        (IngestOutput::Structured(rows), OutputFormat::Csv) => to_csv_string(rows)?,
        (IngestOutput::Unstructured(rows), OutputFormat::Csv) => to_csv_string(rows)?,
        (IngestOutput::Structured(rows), OutputFormat::Text) => to_text(rows)?,
        (IngestOutput::Unstructured(rows), OutputFormat::Text) => to_text(rows)?,
    };
    Ok(rendered)
}

fn print_report(report: &IngestReport) {
    eprintln!();
    eprintln!("{} Rows: {}", style("ℹ").blue(), report.total_rows);
    eprintln!(
        "{} Matched: {} ({:.1}%)",
        style("ℹ").blue(),
        report.matched_rows,
        report.match_rate()
    );
}
