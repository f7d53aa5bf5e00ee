//! Core ingestion modules
//!
//! Line normalization and the lazy line reader that feeds the address store.

pub mod lines;
pub mod normalizer;

pub use lines::LineSource;
pub use normalizer::normalize;
