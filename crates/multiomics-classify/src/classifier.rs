//! Reads a record log and produces the yearly layer summary.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use multiomics_common::error::{CensusError, Result};
use multiomics_common::keywords::INFO_MARKER;
use tracing::{debug, info, warn};

use crate::buckets::{Classification, SummaryRow, YearOrder, YearlyBuckets};
use crate::record::ParsedRecord;

/// What to do with a line that is neither a record nor informational.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Abort on the first malformed line.
    #[default]
    Strict,
    /// Log and skip malformed lines.
    Lenient,
}

pub fn classify_file(path: impl AsRef<Path>, mode: ParseMode) -> Result<Classification> {
    let path = path.as_ref();
    let file = File::open(path)?;
    info!(path = %path.display(), "Classifying record log");
    classify_reader(BufReader::new(file), mode)
}

pub fn classify_reader<R: BufRead>(reader: R, mode: ParseMode) -> Result<Classification> {
    let mut buckets = YearlyBuckets::new();
    let mut records = 0usize;
    let mut skipped = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(INFO_MARKER) {
            continue;
        }

        match ParsedRecord::parse(trimmed) {
            Ok(rec) => {
                let layer = rec.layer();
                buckets.insert(rec.year, layer, rec.ids);
                records += 1;
            }
            Err(e) if mode == ParseMode::Lenient => {
                warn!(line = idx + 1, error = %e, "Skipping malformed record");
                skipped += 1;
            }
            Err(e) => {
                return Err(CensusError::MalformedRecord { line: idx + 1, reason: e.to_string() });
            }
        }
    }

    debug!(records, skipped, "Record log read");
    Ok(buckets.finish())
}

/// Write the header and one line per year.
pub fn write_summary<W: Write>(classification: &Classification, order: YearOrder, out: &mut W) -> Result<()> {
    writeln!(out, "{}", SummaryRow::HEADER)?;
    for row in classification.rows(order) {
        writeln!(out, "{}", row)?;
    }
    out.flush()?;
    Ok(())
}
