//! Data models for the query side.

use std::fmt;

use multiomics_common::error::{CensusError, Result};

use crate::combinations::KeywordCombination;
use crate::years::YearSpan;

/// Parsed body of an esearch response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EsearchResult {
    /// Total hits reported by PubMed.
    pub count: u64,
    /// Result cap PubMed applied (echo of `retmax`).
    pub retmax: u64,
    pub ids: Vec<String>,
}

impl EsearchResult {
    /// Accept the ID list only if PubMed returned every hit.
    pub fn into_ids(self) -> Result<Vec<String>> {
        if self.count > self.retmax {
            return Err(CensusError::ResultCapExceeded { count: self.count, retmax: self.retmax });
        }
        Ok(self.ids)
    }
}

/// One line of the record log: a (year, combination) query and the PMIDs it returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub combination: KeywordCombination,
    pub span: YearSpan,
    pub ids: Vec<String>,
}

impl fmt::Display for QueryRecord {
    /// `Keywords=a,b; From=2007/01/01; To=2007/12/31; IDs=10,20`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Keywords={}; From={}; To={}; IDs={}",
            self.combination,
            self.span.from_label(),
            self.span.until_label(),
            self.ids.join(",")
        )
    }
}
