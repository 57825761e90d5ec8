//! Literature search backends.

pub mod pubmed;

use async_trait::async_trait;
use multiomics_common::error::Result;

use crate::models::EsearchResult;

/// A search service that answers one boolean term with a count and an ID list.
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Request URL for `term`, with credentials masked, for the progress log.
    fn request_url(&self, term: &str) -> String;

    /// Run one search. Failures of any kind surface as `Err`.
    async fn esearch(&self, term: &str) -> Result<EsearchResult>;
}
