//! addrmatch - Address list reconciliation
//!
//! Loads client and listing address files, runs the exact or fuzzy matcher,
//! and writes the matched pairs as CSV or JSON.

use addrmatch::audit;
use addrmatch::config::{config_path, Config};
use addrmatch::core::LineSource;
use addrmatch::export::{self, ExportFormat};
use addrmatch::matcher::{self, MatchKind};
use addrmatch::store::AddressStore;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load address files and match them
    Compare {
        /// Client address file, one address per line (repeatable)
        #[arg(short, long = "client", required = true)]
        client: Vec<PathBuf>,

        /// Listing address file, one address per line (repeatable)
        #[arg(short, long = "listing", required = true)]
        listing: Vec<PathBuf>,

        /// Matching type: "string" (exact) or "fuzzy"
        #[arg(short = 't', long = "type")]
        match_type: Option<String>,

        /// Fuzzy threshold 0-100, overrides the config value
        #[arg(long)]
        threshold: Option<f64>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (defaults to the output file extension, else csv)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,

        /// Sort results by similarity, best first
        #[arg(long)]
        sort: bool,

        /// Score fuzzy pairs on a single thread
        #[arg(long)]
        sequential: bool,

        /// Refuse fuzzy runs with more client × listing pairs than this
        #[arg(long)]
        max_pairs: Option<u64>,
    },

    /// Show or change configuration
    Config {
        /// Print the current configuration
        #[arg(long)]
        show: bool,

        /// Set the fuzzy match threshold (0-100)
        #[arg(long)]
        set_threshold: Option<f64>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The configured log level is not known yet, so loading logs at INFO
    let bootstrap = subscriber(if args.verbose { Level::DEBUG } else { Level::INFO });
    let config = tracing::subscriber::with_default(bootstrap, Config::load)?;

    // Setup logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::from_str(&config.log_level).unwrap_or(Level::INFO)
    };
    tracing::subscriber::set_global_default(subscriber(level))?;

    match args.command {
        Commands::Compare {
            client,
            listing,
            match_type,
            threshold,
            output,
            format,
            sort,
            sequential,
            max_pairs,
        } => {
            config.validate().context("Invalid configuration")?;

            let kind = match match_type {
                Some(name) => MatchKind::from_str(&name)?,
                None => config.default_match_type,
            };

            let mut settings = config.match_settings(threshold);
            if sequential {
                settings.parallel = false;
            }
            if max_pairs.is_some() {
                settings.max_pairs = max_pairs;
            }

            let mut store = AddressStore::new();
            upload(&mut store, &client, &listing, &config)
                .context("Failed to upload addresses. Please try again.")?;

            let mut results = matcher::compare(&store, kind, &settings)
                .context("Comparison failed. Please try again.")?;
            if sort {
                matcher::sort_by_similarity(&mut results);
            }
            info!("🏁 {} matches ({})", results.len(), kind);

            if config.audit_enabled {
                let threshold = if kind == MatchKind::Fuzzy { settings.threshold } else { None };
                if let Err(e) = audit::log_comparison(kind, threshold, results.len()) {
                    warn!("Could not write audit log: {}", e);
                }
            }

            match output {
                Some(path) => {
                    let format = format.unwrap_or_else(|| ExportFormat::from_path(&path));
                    export::export_to_file(&path, format, &results)
                        .context("Failed to export results. Please try again.")?;
                }
                None => {
                    let stdout = std::io::stdout();
                    export::write(stdout.lock(), format.unwrap_or_default(), &results)
                        .context("Failed to export results. Please try again.")?;
                }
            }
        }

        Commands::Config {
            show,
            set_threshold,
        } => {
            let mut config = config;

            if let Some(threshold) = set_threshold {
                config.set_fuzzy_threshold(threshold)?;
                config.save()?;
                println!("✔ Fuzzy threshold set to {}", threshold);
            }

            if show || set_threshold.is_none() {
                println!("Config: {}", config_path().display());
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

fn subscriber(level: Level) -> impl tracing::Subscriber + Send + Sync + 'static {
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish()
}

/// Ingest file pairs in order; each pair is one all-or-nothing upload
fn upload(
    store: &mut AddressStore,
    client: &[PathBuf],
    listing: &[PathBuf],
    config: &Config,
) -> Result<()> {
    if client.is_empty() || listing.is_empty() {
        bail!("both a client and a listing file are required");
    }

    let uploads = client.len().max(listing.len());
    for i in 0..uploads {
        let client_path = client.get(i);
        let listing_path = listing.get(i);

        let client_lines = open_optional(client_path)?;
        let listing_lines = open_optional(listing_path)?;
        let report = store.ingest(
            client_lines.into_iter().flatten(),
            listing_lines.into_iter().flatten(),
        )?;

        if config.audit_enabled {
            let none = Path::new("-");
            let entry_client = client_path.map(PathBuf::as_path).unwrap_or(none);
            let entry_listing = listing_path.map(PathBuf::as_path).unwrap_or(none);
            if let Err(e) = audit::log_upload(entry_client, entry_listing, &report) {
                warn!("Could not write audit log: {}", e);
            }
        }
    }
    Ok(())
}

fn open_optional(path: Option<&PathBuf>) -> Result<Option<LineSource<std::fs::File>>> {
    let source = path.map(|p| LineSource::open(p)).transpose()?;
    Ok(source)
}
