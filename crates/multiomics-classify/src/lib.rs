//! multiomics-classify — Reduces a record log into yearly omics-layer counts.
//! - Key-based record parsing
//! - Per-year layer buckets
//! - Highest-layer-wins deduplication
//! - Summary rendering

pub mod buckets;
pub mod classifier;
pub mod record;

pub use buckets::{Classification, SummaryRow, YearOrder, YearlyBuckets};
pub use classifier::{classify_file, classify_reader, write_summary, ParseMode};
pub use record::{ParsedRecord, RecordError};
