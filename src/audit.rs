use crate::config::{config_dir, config_path};
use crate::matcher::MatchKind;
use crate::store::IngestReport;
use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Write an entry to the audit log next to the config file
pub fn log(entry: &str) -> Result<()> {
    let path = config_path();
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_else(config_dir);
    log_to(&dir, entry)
}

/// Append a timestamped entry to `<dir>/audit.log`
pub fn log_to(dir: &Path, entry: &str) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("audit.log"))?;

    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        entry
    )?;
    Ok(())
}

/// Record an upload into the store
pub fn log_upload(client: &Path, listing: &Path, report: &IngestReport) -> Result<()> {
    log(&upload_entry(client, listing, report))
}

/// Record a finished comparison
pub fn log_comparison(kind: MatchKind, threshold: Option<f64>, results: usize) -> Result<()> {
    log(&comparison_entry(kind, threshold, results))
}

fn upload_entry(client: &Path, listing: &Path, report: &IngestReport) -> String {
    format!(
        "UPLOAD client={} ({} stored / {} lines) listing={} ({} stored / {} lines)",
        client.display(),
        report.client_stored,
        report.client_lines,
        listing.display(),
        report.listing_stored,
        report.listing_lines
    )
}

fn comparison_entry(kind: MatchKind, threshold: Option<f64>, results: usize) -> String {
    match (kind, threshold) {
        (MatchKind::Fuzzy, Some(threshold)) => {
            format!("COMPARE type=fuzzy threshold={} results={}", threshold, results)
        }
        _ => format!("COMPARE type={} results={}", kind, results),
    }
}
