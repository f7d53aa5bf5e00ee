//! Result Export
//!
//! Writes a comparison result set as CSV or JSON. The CSV layout is fixed:
//! client address, listing address, match type, similarity.

use crate::error::AddrResult;
use crate::matcher::MatchResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// CSV header row
pub const CSV_HEADER: [&str; 4] = ["Client Address", "Listing Address", "Match Type", "Similarity"];

/// Default file name for downloaded results
pub const DEFAULT_CSV_NAME: &str = "address_matches.csv";

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    /// Guess from a file extension, falling back to CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

/// Write results as CSV with a header row
pub fn write_csv<W: Write>(writer: W, results: &[MatchResult]) -> AddrResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);

    writer.write_record(CSV_HEADER)?;
    for result in results {
        let similarity = result.similarity.to_string();
        writer.write_record([
            result.client_address.as_str(),
            result.listing_address.as_str(),
            result.match_type.label(),
            similarity.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write results as a pretty-printed JSON array
pub fn write_json<W: Write>(mut writer: W, results: &[MatchResult]) -> AddrResult<()> {
    serde_json::to_writer_pretty(&mut writer, results)?;
    writeln!(writer)?;
    Ok(())
}

/// Write results to any writer in the given format
pub fn write<W: Write>(writer: W, format: ExportFormat, results: &[MatchResult]) -> AddrResult<()> {
    match format {
        ExportFormat::Csv => write_csv(writer, results),
        ExportFormat::Json => write_json(writer, results),
    }
}

/// Write results to a file, creating parent directories as needed
pub fn export_to_file(path: &Path, format: ExportFormat, results: &[MatchResult]) -> AddrResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    write(std::io::BufWriter::new(file), format, results)?;
    info!("💾 Wrote {} results to {}", results.len(), path.display());
    Ok(())
}
