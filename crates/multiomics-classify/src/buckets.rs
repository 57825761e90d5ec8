//! Per-year layer buckets and the highest-layer-wins pruning pass.

use std::collections::{HashMap, HashSet};
use std::fmt;

use multiomics_common::keywords::MAX_LAYER;

const LAYERS: usize = MAX_LAYER + 1;

type Layers = [HashSet<String>; LAYERS];

/// How years are ordered in the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum YearOrder {
    /// Order in which each year first appeared in the log.
    #[default]
    Encounter,
    Ascending,
}

/// Accumulates study IDs into `[year][layer]` sets.
///
/// Sets may overlap across layers while accumulating; `finish` prunes them.
#[derive(Debug, Default)]
pub struct YearlyBuckets {
    years: Vec<(i32, Layers)>,
    index: HashMap<i32, usize>,
}

impl YearlyBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `year` even if it ends up with no studies.
    pub fn touch(&mut self, year: i32) -> &mut Layers {
        let years = &mut self.years;
        let pos = *self.index.entry(year).or_insert_with(|| {
            years.push((year, Default::default()));
            years.len() - 1
        });
        &mut self.years[pos].1
    }

    pub fn insert<I>(&mut self, year: i32, layer: usize, ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        let layer = layer.min(MAX_LAYER);
        self.touch(year)[layer].extend(ids);
    }

    /// Run the dedup pass and freeze the buckets.
    ///
    /// From the highest layer down, every ID in a layer is removed from all
    /// lower layers of the same year, so each study is counted once, at the
    /// largest number of co-occurring omics keywords it was seen with.
    pub fn finish(mut self) -> Classification {
        for (_, layers) in &mut self.years {
            for upper in (1..LAYERS).rev() {
                let (lower, rest) = layers.split_at_mut(upper);
                let upper_ids = &rest[0];
                for lower_ids in lower.iter_mut() {
                    lower_ids.retain(|id| !upper_ids.contains(id));
                }
            }
        }
        Classification { years: self.years }
    }
}

/// Pruned buckets: each ID appears in at most one layer per year.
#[derive(Debug)]
pub struct Classification {
    years: Vec<(i32, Layers)>,
}

impl Classification {
    pub fn layer_of(&self, year: i32, id: &str) -> Option<usize> {
        self.years
            .iter()
            .find(|(y, _)| *y == year)
            .and_then(|(_, layers)| layers.iter().position(|set| set.contains(id)))
    }

    pub fn rows(&self, order: YearOrder) -> Vec<SummaryRow> {
        let mut rows: Vec<SummaryRow> = self
            .years
            .iter()
            .map(|(year, layers)| SummaryRow {
                year: *year,
                counts: [layers[0].len(), layers[1].len(), layers[2].len()],
            })
            .collect();
        if order == YearOrder::Ascending {
            rows.sort_by_key(|r| r.year);
        }
        rows
    }
}

/// One output line: `Year,2-omics,3-omics,>3-omics,Total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryRow {
    pub year: i32,
    pub counts: [usize; LAYERS],
}

impl SummaryRow {
    pub const HEADER: &'static str = "#Year,2-omics,3-omics,>3-omics,Total";

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl fmt::Display for SummaryRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.year,
            self.counts[0],
            self.counts[1],
            self.counts[2],
            self.total()
        )
    }
}
