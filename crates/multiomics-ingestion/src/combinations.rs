//! Keyword combination enumeration.
//!
//! Every subset of size 2..=N of the keyword set is produced, smallest subsets
//! first. Within one size, subsets follow lexicographic order of keyword
//! positions, and each subset keeps the set's original keyword order.

use std::collections::HashSet;
use std::fmt;

use multiomics_common::error::{CensusError, Result};

/// An ordered tuple of two or more distinct keywords.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeywordCombination {
    keywords: Vec<String>,
}

impl KeywordCombination {
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl fmt::Display for KeywordCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keywords.join(","))
    }
}

/// Enumerate all combinations of size >= 2, in size-ascending order.
///
/// For N keywords this yields 2^N - N - 1 combinations. Fewer than two
/// keywords yields none. Repeated keywords are rejected.
pub fn keyword_combinations<S: AsRef<str>>(all_keywords: &[S]) -> Result<Vec<KeywordCombination>> {
    let mut seen = HashSet::new();
    for kw in all_keywords {
        let kw = kw.as_ref();
        if kw.trim().is_empty() || kw.contains(',') || kw.contains(';') {
            return Err(CensusError::Config(format!("invalid keyword {:?}", kw)));
        }
        if !seen.insert(kw) {
            return Err(CensusError::Config(format!("duplicate keyword {:?}", kw)));
        }
    }

    let n = all_keywords.len();
    let mut out = Vec::new();
    for k in 2..=n {
        let mut idx: Vec<usize> = (0..k).collect();
        loop {
            out.push(KeywordCombination {
                keywords: idx.iter().map(|&i| all_keywords[i].as_ref().to_string()).collect(),
            });

            // Advance the rightmost index that still has room.
            let Some(pos) = (0..k).rev().find(|&i| idx[i] != i + n - k) else {
                break;
            };
            idx[pos] += 1;
            for j in pos + 1..k {
                idx[j] = idx[j - 1] + 1;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiomics_common::keywords::layer_for;
    use multiomics_common::OMICS_KEYWORDS;

    fn joined(combos: &[KeywordCombination]) -> Vec<String> {
        combos.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_count_matches_closed_form() {
        for n in 0..=9usize {
            let kws: Vec<String> = (0..n).map(|i| format!("kw{i}")).collect();
            let combos = keyword_combinations(kws.as_slice()).unwrap();
            let expected = if n < 2 { 0 } else { (1usize << n) - n - 1 };
            assert_eq!(combos.len(), expected, "n = {n}");
            assert!(combos.iter().all(|c| c.len() >= 2));
        }
    }

    #[test]
    fn test_full_omics_set_yields_502() {
        let combos = keyword_combinations(OMICS_KEYWORDS).unwrap();
        assert_eq!(combos.len(), 502);
        assert_eq!(combos[0].to_string(), "genomics,lipidomics");
        assert_eq!(combos.last().unwrap().len(), 9);
    }

    #[test]
    fn test_order_is_size_then_position() {
        let combos = keyword_combinations(&["a", "b", "c", "d"]).unwrap();
        assert_eq!(
            joined(&combos),
            vec![
                "a,b", "a,c", "a,d", "b,c", "b,d", "c,d",
                "a,b,c", "a,b,d", "a,c,d", "b,c,d",
                "a,b,c,d",
            ]
        );
    }

    #[test]
    fn test_every_combination_maps_to_a_layer() {
        let combos = keyword_combinations(&["a", "b", "c", "d", "e"]).unwrap();
        for c in &combos {
            let layer = layer_for(c.len()).unwrap();
            assert_eq!(layer, (c.len() - 2).min(2));
            assert!(layer <= 2);
        }
    }

    #[test]
    fn test_duplicate_keyword_rejected() {
        let err = keyword_combinations(&["genomics", "proteomics", "genomics"]).unwrap_err();
        assert!(matches!(err, CensusError::Config(_)));
    }

    #[test]
    fn test_keyword_with_delimiter_rejected() {
        assert!(keyword_combinations(&["a,b", "c"]).is_err());
        assert!(keyword_combinations(&["a", "c;d"]).is_err());
    }
}
