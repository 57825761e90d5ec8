//! multiomics-ingestion — Query side of the omics census.
//! - Keyword combination enumeration
//! - Year spans
//! - PubMed esearch client
//! - Fixed-interval throttling and retry
//! - The sequential fetch loop that writes the record log

pub mod combinations;
pub mod models;
pub mod pipeline;
pub mod retry;
pub mod sources;
pub mod throttle;
pub mod years;
