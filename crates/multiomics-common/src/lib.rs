//! multiomics-common — Shared errors, constants, and the HTTP client used across the census crates.

pub mod error;
pub mod keywords;
pub mod sandbox;

// Re-export commonly used types
pub use error::{CensusError, Result};
pub use keywords::{OMICS_KEYWORDS, INFO_MARKER};
