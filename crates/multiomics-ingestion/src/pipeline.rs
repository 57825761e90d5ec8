//! Sequential query loop.
//!
//! For each year (ascending) and each keyword combination (enumeration
//! order), one throttled esearch is issued and one record line is written.
//! Lines starting with `#` are progress information for humans; everything
//! else is data for the classifier.

use std::collections::HashSet;
use std::io::Write;

use multiomics_common::error::{CensusError, Result};
use multiomics_common::keywords::INFO_MARKER;
use tracing::{info, warn};

use crate::combinations::keyword_combinations;
use crate::models::{EsearchResult, QueryRecord};
use crate::retry::RetryPolicy;
use crate::sources::pubmed::build_term;
use crate::sources::SearchSource;
use crate::throttle::RateLimiter;
use crate::years::year_spans;

/// What to query.
#[derive(Debug, Clone)]
pub struct CensusJob {
    pub keywords: Vec<String>,
    pub first_year: i32,
    pub last_year: i32,
}

/// Totals reported once the loop finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CensusSummary {
    pub years: usize,
    pub records: usize,
    pub failed_attempts: u64,
}

/// Owns the search backend together with its throttle and retry policy.
pub struct Fetcher<S> {
    source: S,
    limiter: RateLimiter,
    retry: RetryPolicy,
    failed_attempts: u64,
}

impl<S: SearchSource> Fetcher<S> {
    pub fn new(source: S, limiter: RateLimiter, retry: RetryPolicy) -> Self {
        Self { source, limiter, retry, failed_attempts: 0 }
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Run `term` until it succeeds, a fatal error occurs, or the retry policy gives up.
    pub async fn fetch_ids<W: Write>(&mut self, term: &str, out: &mut W) -> Result<Vec<String>> {
        let url = self.source.request_url(term);
        writeln!(out, "{}url={}", INFO_MARKER, url)?;

        let mut failures: u32 = 0;
        loop {
            self.limiter.wait().await;
            let err = match self.source.esearch(term).await.and_then(EsearchResult::into_ids) {
                Ok(ids) => return Ok(ids),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => e,
            };

            failures += 1;
            self.failed_attempts += 1;
            warn!(attempt = failures, error = %err, "esearch failed");

            if !self.retry.should_retry(failures) {
                writeln!(out, "{}ERROR retrieving {}: {}, giving up", INFO_MARKER, url, err)?;
                return Err(CensusError::RetriesExhausted { attempts: failures, last: err.to_string() });
            }

            writeln!(
                out,
                "{}ERROR retrieving {}: {}, retrying in {} seconds...",
                INFO_MARKER,
                url,
                err,
                self.retry.delay.as_secs()
            )?;
            tokio::time::sleep(self.retry.delay).await;
        }
    }
}

/// Query every (year, combination) pair and write the record log to `out`.
pub async fn run_queries<S, W>(job: &CensusJob, fetcher: &mut Fetcher<S>, out: &mut W) -> Result<CensusSummary>
where
    S: SearchSource,
    W: Write,
{
    let combinations = keyword_combinations(job.keywords.as_slice())?;
    let spans = year_spans(job.first_year, job.last_year)?;
    info!(
        years = spans.len(),
        combinations = combinations.len(),
        "Starting omics census"
    );

    let mut summary = CensusSummary::default();
    for span in spans {
        let (from, until) = (span.from_label(), span.until_label());
        writeln!(out, "{}Finding multiomics studies between {} and {}", INFO_MARKER, from, until)?;

        // Every study seen this year, regardless of layer.
        let mut studies: HashSet<String> = HashSet::new();
        for combination in &combinations {
            let term = build_term(combination, &span);
            let ids = fetcher.fetch_ids(&term, out).await?;
            studies.extend(ids.iter().cloned());

            let record = QueryRecord { combination: combination.clone(), span, ids };
            writeln!(out, "  {}", record)?;
            summary.records += 1;
        }

        writeln!(
            out,
            "{}From {} to {} there were {} multiomics studies",
            INFO_MARKER,
            from,
            until,
            studies.len()
        )?;
        info!(year = span.year(), studies = studies.len(), "Year complete");
        summary.years += 1;
    }

    summary.failed_attempts = fetcher.failed_attempts;
    out.flush()?;
    Ok(summary)
}
