//! Classifying record logs as written by the query side.

use std::io::Write;

use multiomics_classify::{classify_file, write_summary, ParseMode, YearOrder};
use multiomics_common::CensusError;
use multiomics_ingestion::combinations::keyword_combinations;
use multiomics_ingestion::models::QueryRecord;
use multiomics_ingestion::years::year_spans;

fn ids(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_log_written_by_query_side_classifies() {
    let combos = keyword_combinations(&["genomics", "proteomics", "metabolomics"]).unwrap();
    let spans = year_spans(2006, 2007).unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    for span in &spans {
        writeln!(file, "#Finding multiomics studies between {} and {}", span.from_label(), span.until_label()).unwrap();
        for (i, combo) in combos.iter().enumerate() {
            let found = match (span.year(), i) {
                (2007, 0) => ids(&["10", "20"]),
                (2007, 3) => ids(&["20", "30"]),
                (2006, 1) => ids(&["5"]),
                _ => vec![],
            };
            let record = QueryRecord { combination: combo.clone(), span: *span, ids: found };
            writeln!(file, "  {}", record).unwrap();
        }
    }
    file.flush().unwrap();

    let classification = classify_file(file.path(), ParseMode::Strict).unwrap();
    let mut out = Vec::new();
    write_summary(&classification, YearOrder::Encounter, &mut out).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "#Year,2-omics,3-omics,>3-omics,Total\n2006,1,0,0,1\n2007,1,2,0,3\n"
    );
}

#[test]
fn test_three_keyword_record_lands_in_layer_one() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Keywords=a,b,c; From=2004/01/01; To=2004/12/31; IDs=1,2,3").unwrap();
    file.flush().unwrap();

    let classification = classify_file(file.path(), ParseMode::Strict).unwrap();
    assert_eq!(classification.layer_of(2004, "1"), Some(1));
}

#[test]
fn test_missing_log_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = classify_file(dir.path().join("absent.log"), ParseMode::Strict).unwrap_err();
    assert!(matches!(err, CensusError::Io(_)));
}
