//! Address Store
//!
//! Holds the client and listing addresses of one comparison session.

use crate::core::normalize;
use crate::error::AddrResult;
use std::io;
use tracing::{debug, info};

/// Which side of the comparison an address belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Client,
    Listing,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Client => write!(f, "client"),
            Side::Listing => write!(f, "listing"),
        }
    }
}

/// Line counts from one ingest call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub client_lines: usize,
    pub client_stored: usize,
    pub listing_lines: usize,
    pub listing_stored: usize,
}

impl IngestReport {
    /// Lines dropped because they were blank
    pub fn skipped(&self) -> usize {
        (self.client_lines - self.client_stored) + (self.listing_lines - self.listing_stored)
    }

    /// True when the call changed nothing
    pub fn is_noop(&self) -> bool {
        self.client_stored == 0 && self.listing_stored == 0
    }
}

/// Two ordered address collections.
///
/// Entries are kept in input order and never deduplicated. Ingesting again
/// appends; nothing is removed unless [`AddressStore::clear`] is called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressStore {
    client_addresses: Vec<String>,
    listing_addresses: Vec<String>,
}

impl AddressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and append both line sequences.
    ///
    /// Both sequences are drained line by line. Nothing is stored until both
    /// have been read to the end, so a read error in either one leaves the
    /// store exactly as it was.
    pub fn ingest<C, L>(&mut self, client_lines: C, listing_lines: L) -> AddrResult<IngestReport>
    where
        C: IntoIterator<Item = io::Result<String>>,
        L: IntoIterator<Item = io::Result<String>>,
    {
        let (clients, client_lines) = collect_side(client_lines, Side::Client)?;
        let (listings, listing_lines) = collect_side(listing_lines, Side::Listing)?;

        let report = IngestReport {
            client_lines,
            client_stored: clients.len(),
            listing_lines,
            listing_stored: listings.len(),
        };

        if report.is_noop() {
            debug!("Ingest produced no addresses, store unchanged");
            return Ok(report);
        }

        self.client_addresses.extend(clients);
        self.listing_addresses.extend(listings);

        info!(
            "📥 Ingested {} client and {} listing addresses ({} blank lines skipped)",
            report.client_stored,
            report.listing_stored,
            report.skipped()
        );
        Ok(report)
    }

    /// Convenience for in-memory input
    pub fn ingest_strs<'a, C, L>(&mut self, client: C, listing: L) -> AddrResult<IngestReport>
    where
        C: IntoIterator<Item = &'a str>,
        L: IntoIterator<Item = &'a str>,
    {
        self.ingest(
            client.into_iter().map(|s| Ok(s.to_string())),
            listing.into_iter().map(|s| Ok(s.to_string())),
        )
    }

    pub fn client_addresses(&self) -> &[String] {
        &self.client_addresses
    }

    pub fn listing_addresses(&self) -> &[String] {
        &self.listing_addresses
    }

    /// Addresses on one side
    pub fn side(&self, side: Side) -> &[String] {
        match side {
            Side::Client => &self.client_addresses,
            Side::Listing => &self.listing_addresses,
        }
    }

    /// True when either side is empty, i.e. no pair can match
    pub fn is_empty(&self) -> bool {
        self.client_addresses.is_empty() || self.listing_addresses.is_empty()
    }

    /// Size of the client × listing cross product
    pub fn pair_count(&self) -> u64 {
        self.client_addresses.len() as u64 * self.listing_addresses.len() as u64
    }

    /// Drop every stored address
    pub fn clear(&mut self) {
        info!(
            "🧹 Clearing store ({} client, {} listing)",
            self.client_addresses.len(),
            self.listing_addresses.len()
        );
        self.client_addresses.clear();
        self.listing_addresses.clear();
    }
}

/// Drain one side into a staging vector, returning survivors and lines read
fn collect_side<I>(lines: I, side: Side) -> AddrResult<(Vec<String>, usize)>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut staged = Vec::new();
    let mut read = 0;
    for line in lines {
        let line = line?;
        read += 1;
        if let Some(address) = normalize(&line) {
            staged.push(address);
        }
    }
    debug!("Staged {} of {} {} lines", staged.len(), read, side);
    Ok((staged, read))
}
