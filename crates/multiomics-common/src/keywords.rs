//! Build-time constants for the omics census.

use std::time::Duration;

/// Omics disciplines searched for in the PubMed "Other Term" field.
pub const OMICS_KEYWORDS: &[&str] = &[
    "genomics",
    "lipidomics",
    "proteomics",
    "glycomics",
    "transcriptomics",
    "metabolomics",
    "epigenomics",
    "metagenomics",
    "phosphoproteomics",
];

/// Fixed pause before every E-utilities request (keeps us under ~9 req/s with a key).
pub const MIN_QUERY_INTERVAL: Duration = Duration::from_millis(110);

/// Result cap sent as `retmax` with every query.
pub const DEFAULT_RETMAX: u64 = 100_000;

pub const DEFAULT_FIRST_YEAR: i32 = 2000;
pub const DEFAULT_LAST_YEAR: i32 = 2017;

/// Date format used in query terms and log records.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Prefix of informational lines in the record log.
pub const INFO_MARKER: char = '#';

/// Layers above this collapse into the "4 or more keywords" bucket.
pub const MAX_LAYER: usize = 2;

/// Bucket index for a combination of `n_keywords` keywords.
///
/// Returns `None` for fewer than two keywords, which never form a combination.
pub fn layer_for(n_keywords: usize) -> Option<usize> {
    n_keywords.checked_sub(2).map(|l| l.min(MAX_LAYER))
}
