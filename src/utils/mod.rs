//! Utility modules

pub mod fuzzy;

pub use fuzzy::{edit_distance, round2, similarity, similarity_upper_bound};
