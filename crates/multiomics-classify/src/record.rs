//! Parsing of one record-log line.
//!
//! `Keywords=a,b,c; From=2004/01/01; To=2004/12/31; IDs=1,2,3`
//!
//! Fields are found by key, so their order and surrounding whitespace do not
//! matter. `To` is read past; the year comes from `From`.

use chrono::{Datelike, NaiveDate};
use multiomics_common::keywords::{layer_for, DATE_FORMAT};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("field {0:?} has no '='")]
    MissingEquals(String),

    #[error("missing {0} field")]
    MissingField(&'static str),

    #[error("duplicate {0} field")]
    DuplicateField(String),

    #[error("empty keyword in {0:?}")]
    EmptyKeyword(String),

    #[error("need at least two keywords, found {0}")]
    TooFewKeywords(usize),

    #[error("unparseable date {0:?}")]
    BadDate(String),
}

/// What the classifier needs from one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub keyword_count: usize,
    pub year: i32,
    pub ids: Vec<String>,
}

impl ParsedRecord {
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let mut keywords: Option<&str> = None;
        let mut from: Option<&str> = None;
        let mut ids: Option<&str> = None;

        for field in line.split(';').map(str::trim).filter(|f| !f.is_empty()) {
            let (key, value) = field
                .split_once('=')
                .ok_or_else(|| RecordError::MissingEquals(field.to_string()))?;
            let slot = match key.trim() {
                "Keywords" => &mut keywords,
                "From" => &mut from,
                "IDs" => &mut ids,
                _ => continue,
            };
            if slot.replace(value.trim()).is_some() {
                return Err(RecordError::DuplicateField(key.trim().to_string()));
            }
        }

        let keywords = keywords.ok_or(RecordError::MissingField("Keywords"))?;
        let from = from.ok_or(RecordError::MissingField("From"))?;
        let ids = ids.ok_or(RecordError::MissingField("IDs"))?;

        let mut keyword_count = 0;
        for kw in keywords.split(',') {
            if kw.trim().is_empty() {
                return Err(RecordError::EmptyKeyword(keywords.to_string()));
            }
            keyword_count += 1;
        }
        if keyword_count < 2 {
            return Err(RecordError::TooFewKeywords(keyword_count));
        }

        let year = NaiveDate::parse_from_str(from, DATE_FORMAT)
            .map_err(|_| RecordError::BadDate(from.to_string()))?
            .year();

        // "IDs=" splits to a single empty element: no studies, not one study named "".
        let ids = ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect();

        Ok(Self { keyword_count, year, ids })
    }

    /// Bucket index: 0 for 2 keywords, 1 for 3, 2 for 4 or more.
    pub fn layer(&self) -> usize {
        layer_for(self.keyword_count).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_three_keyword_record() {
        let rec = ParsedRecord::parse("Keywords=a,b,c; From=2004/01/01; To=2004/12/31; IDs=1,2,3").unwrap();
        assert_eq!(rec.keyword_count, 3);
        assert_eq!(rec.layer(), 1);
        assert_eq!(rec.year, 2004);
        assert_eq!(rec.ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_empty_ids_yield_no_studies() {
        let rec = ParsedRecord::parse("Keywords=a,b; From=2004/01/01; To=2004/12/31; IDs=").unwrap();
        assert!(rec.ids.is_empty());
    }

    #[test]
    fn test_indented_line_and_reordered_fields() {
        let rec = ParsedRecord::parse("  IDs=9 ; From=2011/01/01; Keywords=a,b,c,d,e; To=2011/12/31").unwrap();
        assert_eq!(rec.year, 2011);
        assert_eq!(rec.layer(), 2);
        assert_eq!(rec.ids, vec!["9"]);
    }

    #[test]
    fn test_layer_capped_at_two() {
        let line = "Keywords=a,b,c,d,e,f,g,h,i; From=2017/01/01; To=2017/12/31; IDs=5";
        assert_eq!(ParsedRecord::parse(line).unwrap().layer(), 2);
    }

    #[test]
    fn test_missing_field_is_reported() {
        let err = ParsedRecord::parse("Keywords=a,b; From=2004/01/01; To=2004/12/31").unwrap_err();
        assert_eq!(err, RecordError::MissingField("IDs"));
    }

    #[test]
    fn test_single_keyword_rejected() {
        let err = ParsedRecord::parse("Keywords=a; From=2004/01/01; To=2004/12/31; IDs=1").unwrap_err();
        assert_eq!(err, RecordError::TooFewKeywords(1));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(ParsedRecord::parse("hello world"), Err(RecordError::MissingEquals(_))));
        assert!(matches!(
            ParsedRecord::parse("Keywords=a,b; From=20x4/01/01; IDs=1"),
            Err(RecordError::BadDate(_))
        ));
        assert!(matches!(
            ParsedRecord::parse("Keywords=a,b; From=2004/01/01; From=2005/01/01; IDs=1"),
            Err(RecordError::DuplicateField(_))
        ));
    }
}
