//! Exact Matching
//!
//! Equi-join of client and listing addresses on literal string equality.

use super::MatchResult;
use crate::store::AddressStore;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

/// Pair every client address with every identical listing address.
///
/// A value seen `k` times on the client side and `m` times on the listing
/// side yields `k * m` rows. Output follows client order; listing addresses
/// are counted in one pass, so the run is linear in the input size.
pub fn match_exact(store: &AddressStore) -> Vec<MatchResult> {
    let start = Instant::now();
    let clients = store.client_addresses();
    let listings = store.listing_addresses();

    if clients.is_empty() || listings.is_empty() {
        debug!("Exact match skipped: one side of the store is empty");
        return Vec::new();
    }

    let mut listing_counts: HashMap<&str, usize> = HashMap::with_capacity(listings.len());
    for listing in listings {
        *listing_counts.entry(listing.as_str()).or_insert(0) += 1;
    }

    let mut results = Vec::new();
    for client in clients {
        if let Some(&count) = listing_counts.get(client.as_str()) {
            // Equal strings, so the listing side carries the same value
            for _ in 0..count {
                results.push(MatchResult::exact(client, client));
            }
        }
    }

    info!(
        "✅ Exact match: {} results from {} client × {} listing addresses in {:?}",
        results.len(),
        clients.len(),
        listings.len(),
        start.elapsed()
    );
    results
}
