use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use na_core::{Error, Result};
use na_export::{CsvExporter, RecordExporter};
use na_scrapers::{init_logging, source_by_name, ArchiveExtractor, TracingSink};
use tracing::info;

/// Extracts structured articles from a newspaper's dated archive into a CSV
/// file. By default the whole archive day is walked; `--page` narrows the
/// run to one listing page, `--until` widens it to a span of days.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File the extracted records are written to (e.g. articles.csv).
    output: PathBuf,

    /// Newspaper to extract from (e.g. "repubblica").
    source: String,

    /// Day of the archive date, or of the first date of a range.
    day: u32,

    /// Month of the archive date.
    month: u32,

    /// Year of the archive date.
    year: i32,

    /// Extract a single archive page instead of the whole day.
    #[arg(long)]
    page: Option<u32>,

    /// Walk every day from the start date up to this one, excluded.
    #[arg(long, num_args = 3, value_names = ["DAY", "MONTH", "YEAR"])]
    until: Option<Vec<i64>>,
}

fn parse_date(day: i64, month: i64, year: i64) -> Result<NaiveDate> {
    u32::try_from(day)
        .ok()
        .zip(u32::try_from(month).ok())
        .and_then(|(day, month)| NaiveDate::from_ymd_opt(year as i32, month, day))
        .ok_or_else(|| Error::InvalidDate(format!("{}-{}-{}", day, month, year)))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let source = source_by_name(&cli.source)?;
    let start = parse_date(cli.day as i64, cli.month as i64, cli.year as i64)?;

    let mut extractor = ArchiveExtractor::new(source, Arc::new(TracingSink));
    if let Some(page) = cli.page {
        extractor.extract_page(start, page).await?;
    } else if let Some(until) = &cli.until {
        let end = parse_date(until[0], until[1], until[2])?;
        extractor.extract_range(start, end).await?;
    } else {
        extractor.extract_day(start).await?;
    }

    let records = extractor.into_records();
    info!("extracted {} articles", records.len());
    CsvExporter::new().export(&records, &cli.output)?;
    info!("saved records to {}", cli.output.display());
    Ok(())
}
