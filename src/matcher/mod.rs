//! Address Matching
//!
//! Exact and fuzzy matchers over an [`AddressStore`], plus the shared
//! result record and the dispatcher that picks a matcher by name.
//!
//! Both matchers are pure: they read a store snapshot and return a fresh
//! `Vec<MatchResult>`. Nothing is cached between calls.

pub mod exact;
pub mod fuzzy;

pub use exact::match_exact;
pub use fuzzy::{match_fuzzy, FuzzyMatcher};

use crate::error::{AddrResult, MatchError};
use crate::store::AddressStore;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Pair count above which a fuzzy run logs a warning
pub const DEFAULT_PAIR_WARNING_LEVEL: u64 = 10_000_000;

/// How a pair was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchType {
    #[serde(rename = "Exact Match")]
    ExactMatch,
    #[serde(rename = "Fuzzy Match")]
    FuzzyMatch,
}

impl MatchType {
    pub fn label(&self) -> &'static str {
        match self {
            MatchType::ExactMatch => "Exact Match",
            MatchType::FuzzyMatch => "Fuzzy Match",
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One matched client/listing pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub client_address: String,
    pub listing_address: String,
    pub match_type: MatchType,
    /// 0..=100; exact matches are always 100
    pub similarity: f64,
}

impl MatchResult {
    pub fn exact(client: &str, listing: &str) -> Self {
        Self {
            client_address: client.to_string(),
            listing_address: listing.to_string(),
            match_type: MatchType::ExactMatch,
            similarity: 100.0,
        }
    }

    pub fn fuzzy(client: &str, listing: &str, similarity: f64) -> Self {
        Self {
            client_address: client.to_string(),
            listing_address: listing.to_string(),
            match_type: MatchType::FuzzyMatch,
            similarity,
        }
    }
}

/// Matcher selected by identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchKind {
    /// Literal string equality
    #[default]
    #[serde(rename = "string")]
    Exact,
    /// Levenshtein similarity above a threshold
    #[serde(rename = "fuzzy")]
    Fuzzy,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchKind::Exact => "string",
            MatchKind::Fuzzy => "fuzzy",
        }
    }
}

impl FromStr for MatchKind {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(MatchKind::Exact),
            "fuzzy" => Ok(MatchKind::Fuzzy),
            other => Err(MatchError::InvalidMatchType(other.to_string())),
        }
    }
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated fuzzy threshold in `0.0..=100.0`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> AddrResult<Self> {
        if value.is_finite() && (0.0..=100.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(MatchError::InvalidThreshold(value))
        }
    }

    /// Validate an optional configured value
    pub fn from_option(value: Option<f64>) -> AddrResult<Self> {
        value.ok_or(MatchError::MissingThreshold).and_then(Self::new)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Threshold {
    type Error = MatchError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Knobs for a comparison run, usually built from [`crate::config::Config`]
#[derive(Debug, Clone)]
pub struct MatchSettings {
    /// Required for fuzzy matching; ignored for exact
    pub threshold: Option<f64>,
    /// Spread fuzzy scoring over the rayon pool
    pub parallel: bool,
    /// Refuse fuzzy runs with more pairs than this
    pub max_pairs: Option<u64>,
    pub pair_warning_level: u64,
    /// Set to abort a running fuzzy comparison
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            threshold: None,
            parallel: true,
            max_pairs: None,
            pair_warning_level: DEFAULT_PAIR_WARNING_LEVEL,
            cancel: None,
        }
    }
}

impl MatchSettings {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

/// Run the matcher named by `kind` ("string" or "fuzzy").
///
/// The identifier and threshold are validated before any pair is looked at.
pub fn compare_by_name(
    store: &AddressStore,
    kind: &str,
    settings: &MatchSettings,
) -> AddrResult<Vec<MatchResult>> {
    let kind: MatchKind = kind.parse()?;
    compare(store, kind, settings)
}

/// Run the selected matcher against the current store contents
pub fn compare(
    store: &AddressStore,
    kind: MatchKind,
    settings: &MatchSettings,
) -> AddrResult<Vec<MatchResult>> {
    match kind {
        MatchKind::Exact => Ok(match_exact(store)),
        MatchKind::Fuzzy => FuzzyMatcher::from_settings(settings)?.run(store),
    }
}

/// Sort best matches first. Ties keep their original order.
pub fn sort_by_similarity(results: &mut [MatchResult]) {
    results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
}
