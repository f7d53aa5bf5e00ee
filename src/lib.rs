//! addrmatch Library
//!
//! Reconciles two address lists (client and listing) by exact string
//! equality or by Levenshtein similarity.
//!
//! ```
//! use addrmatch::matcher::{match_exact, match_fuzzy};
//! use addrmatch::store::AddressStore;
//!
//! let mut store = AddressStore::new();
//! store.ingest_strs(["1 Main St", " kitten "], ["1 Main St", "sitting"]).unwrap();
//!
//! assert_eq!(match_exact(&store).len(), 1);
//! let fuzzy = match_fuzzy(&store, 50.0).unwrap();
//! assert!(fuzzy.iter().any(|m| m.client_address == "kitten" && m.similarity == 57.14));
//! ```

pub mod audit;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod matcher;
pub mod store;
pub mod utils;

pub use error::{AddrResult, MatchError};
pub use matcher::{MatchKind, MatchResult, MatchSettings, MatchType, Threshold};
pub use store::{AddressStore, IngestReport};
