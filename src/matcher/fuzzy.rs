//! Fuzzy Matching
//!
//! Scores every client × listing pair by Levenshtein similarity and keeps
//! pairs at or above the threshold. This is the O(n·m·L) hot path, so it:
//!
//! - skips pairs whose length difference alone rules them out,
//! - optionally scores client rows in parallel on the rayon pool,
//! - can refuse oversized runs up front and be cancelled mid-run.
//!
//! None of these change which pairs are reported or their order.

use super::{MatchResult, MatchSettings, Threshold, DEFAULT_PAIR_WARNING_LEVEL};
use crate::error::{AddrResult, MatchError};
use crate::store::AddressStore;
use crate::utils::fuzzy::{round2, similarity_upper_bound, similarity_with_len};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Match with a raw threshold and default settings
pub fn match_fuzzy(store: &AddressStore, threshold: f64) -> AddrResult<Vec<MatchResult>> {
    FuzzyMatcher::new(Threshold::new(threshold)?).run(store)
}

/// Configured fuzzy comparison
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    threshold: Threshold,
    parallel: bool,
    max_pairs: Option<u64>,
    pair_warning_level: u64,
    cancel: Option<Arc<AtomicBool>>,
}

impl FuzzyMatcher {
    pub fn new(threshold: Threshold) -> Self {
        Self {
            threshold,
            parallel: true,
            max_pairs: None,
            pair_warning_level: DEFAULT_PAIR_WARNING_LEVEL,
            cancel: None,
        }
    }

    /// Build from settings, failing if the threshold is missing or out of range
    pub fn from_settings(settings: &MatchSettings) -> AddrResult<Self> {
        let threshold = Threshold::from_option(settings.threshold)?;
        Ok(Self {
            threshold,
            parallel: settings.parallel,
            max_pairs: settings.max_pairs,
            pair_warning_level: settings.pair_warning_level,
            cancel: settings.cancel.clone(),
        })
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_max_pairs(mut self, max_pairs: Option<u64>) -> Self {
        self.max_pairs = max_pairs;
        self
    }

    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Score the store's cross product.
    ///
    /// Returns every pair with `similarity >= threshold` in client order,
    /// then listing order. Either the full result set or an error comes
    /// back; a cancelled run returns nothing.
    pub fn run(&self, store: &AddressStore) -> AddrResult<Vec<MatchResult>> {
        let start = Instant::now();
        let pairs = store.pair_count();

        if let Some(limit) = self.max_pairs {
            if pairs > limit {
                return Err(MatchError::TooManyPairs { pairs, limit });
            }
        }
        if pairs == 0 {
            debug!("Fuzzy match skipped: one side of the store is empty");
            return Ok(Vec::new());
        }
        if pairs > self.pair_warning_level {
            warn!(
                "⚠️ Fuzzy match over {} pairs; this may take a while (warning level {})",
                pairs, self.pair_warning_level
            );
        }

        let threshold = self.threshold.value();
        let listings: Vec<(&str, usize)> = store
            .listing_addresses()
            .iter()
            .map(|l| (l.as_str(), l.chars().count()))
            .collect();

        info!(
            "🔍 Fuzzy matching {} pairs at threshold {}{}",
            pairs,
            threshold,
            if self.parallel { " (parallel)" } else { "" }
        );

        let rows: Vec<Vec<MatchResult>> = if self.parallel {
            store
                .client_addresses()
                .par_iter()
                .map(|client| self.score_row(client, &listings, threshold))
                .collect::<AddrResult<_>>()?
        } else {
            store
                .client_addresses()
                .iter()
                .map(|client| self.score_row(client, &listings, threshold))
                .collect::<AddrResult<_>>()?
        };

        let results: Vec<MatchResult> = rows.into_iter().flatten().collect();
        info!(
            "✅ Fuzzy match: {} results in {:?}",
            results.len(),
            start.elapsed()
        );
        Ok(results)
    }

    fn score_row(
        &self,
        client: &str,
        listings: &[(&str, usize)],
        threshold: f64,
    ) -> AddrResult<Vec<MatchResult>> {
        if self.is_cancelled() {
            return Err(MatchError::Cancelled);
        }

        let client_len = client.chars().count();
        let mut row = Vec::new();
        for &(listing, listing_len) in listings {
            // Cheap rejection: distance is at least the length difference
            match similarity_upper_bound(client_len, listing_len) {
                Some(bound) if bound >= threshold => {}
                _ => continue,
            }

            let max_len = client_len.max(listing_len);
            if let Some(similarity) = similarity_with_len(client, listing, max_len) {
                if similarity >= threshold {
                    row.push(MatchResult::fuzzy(client, listing, round2(similarity)));
                }
            }
        }
        Ok(row)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchType;
    use crate::utils::fuzzy::similarity;

    fn store(client: &[&str], listing: &[&str]) -> AddressStore {
        let mut store = AddressStore::new();
        store
            .ingest_strs(client.iter().copied(), listing.iter().copied())
            .unwrap();
        store
    }

    #[test]
    fn test_fuzzy_kitten_sitting_threshold() {
        let store = store(&["kitten"], &["sitting"]);

        let included = match_fuzzy(&store, 50.0).unwrap();
        assert_eq!(included.len(), 1);
        assert_eq!(included[0].similarity, 57.14);
        assert_eq!(included[0].match_type, MatchType::FuzzyMatch);

        assert!(match_fuzzy(&store, 60.0).unwrap().is_empty());
    }

    #[test]
    fn test_fuzzy_identity_is_100() {
        let store = store(&["1 Main St"], &["1 Main St"]);
        let results = match_fuzzy(&store, 100.0).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].similarity, 100.0);
    }

    #[test]
    fn test_fuzzy_threshold_inclusive() {
        // One substitution in four characters: exactly 75
        let store = store(&["abcd"], &["abcx"]);
        let results = match_fuzzy(&store, 75.0).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].similarity, 75.0);
    }

    #[test]
    fn test_fuzzy_disjoint_equal_length_scores_zero() {
        let store = store(&["abc"], &["xyz"]);
        let results = match_fuzzy(&store, 0.0).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].similarity, 0.0);
    }

    #[test]
    fn test_fuzzy_threshold_zero_keeps_every_pair() {
        let store = store(&["a", "bb", "ccc"], &["dddd", "e"]);
        assert_eq!(match_fuzzy(&store, 0.0).unwrap().len(), 6);
    }

    #[test]
    fn test_fuzzy_empty_side() {
        let store = store(&["1 Main St"], &[]);
        assert!(match_fuzzy(&store, 50.0).unwrap().is_empty());
    }

    #[test]
    fn test_fuzzy_invalid_threshold() {
        let store = store(&["a"], &["a"]);
        assert!(matches!(
            match_fuzzy(&store, 101.0),
            Err(MatchError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_length_filter_is_lossless() {
        let clients = ["1 Main St", "1 Main Street", "12 Main St Apt 4", "Main", "M"];
        let listings = ["1 Main St.", "1 Main Str", "Main St", "1 Maine St", "12 Main St"];
        let store = store(&clients, &listings);

        for threshold in [0.0, 25.0, 50.0, 70.0, 85.0, 90.0, 100.0] {
            let results = match_fuzzy(&store, threshold).unwrap();
            let mut expected = Vec::new();
            for c in clients {
                for l in listings {
                    let score = similarity(c, l).unwrap();
                    if score >= threshold {
                        expected.push((c, l, round2(score)));
                    }
                }
            }
            let got: Vec<(&str, &str, f64)> = results
                .iter()
                .map(|r| (r.client_address.as_str(), r.listing_address.as_str(), r.similarity))
                .collect();
            assert_eq!(got, expected, "mismatch at threshold {}", threshold);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let clients: Vec<String> = (0..40).map(|i| format!("{} Main St", i)).collect();
        let listings: Vec<String> = (0..30).map(|i| format!("{} Main Street", i * 2)).collect();
        let mut store = AddressStore::new();
        store
            .ingest_strs(
                clients.iter().map(String::as_str),
                listings.iter().map(String::as_str),
            )
            .unwrap();

        let threshold = Threshold::new(60.0).unwrap();
        let parallel = FuzzyMatcher::new(threshold).with_parallel(true).run(&store).unwrap();
        let sequential = FuzzyMatcher::new(threshold).with_parallel(false).run(&store).unwrap();
        assert!(!parallel.is_empty());
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_max_pairs_rejects_before_work() {
        let store = store(&["a", "b"], &["a", "b", "c"]);
        let matcher = FuzzyMatcher::new(Threshold::new(0.0).unwrap()).with_max_pairs(Some(5));
        match matcher.run(&store) {
            Err(MatchError::TooManyPairs { pairs, limit }) => {
                assert_eq!(pairs, 6);
                assert_eq!(limit, 5);
            }
            other => panic!("expected TooManyPairs, got {:?}", other),
        }
    }

    #[test]
    fn test_cancelled_run_returns_no_results() {
        let store = store(&["a", "b"], &["a", "b"]);
        let cancel = Arc::new(AtomicBool::new(true));
        let matcher = FuzzyMatcher::new(Threshold::new(0.0).unwrap()).with_cancel_flag(cancel);
        assert!(matches!(matcher.run(&store), Err(MatchError::Cancelled)));
    }
}
