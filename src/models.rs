// ==============================================================================
// models.rs - ksnp Data Models
// ==============================================================================
// Description: Position records, the load-ordered position map and cutoff lists
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use serde::Serialize;
use std::collections::HashMap;

/// One alternate allele observed at a position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AltAllele {
    /// Alternate allele sequence, kept exactly as read
    pub allele: String,

    /// Allele frequency
    pub frequency: f64,
}

/// All ksnp data for a single genomic position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionRecord {
    /// Base pair position
    pub position: u64,

    /// Reference allele (fixed by the first line seen for this position)
    pub ref_allele: String,

    /// Alternate alleles in the order they were read
    pub alternates: Vec<AltAllele>,
}

impl PositionRecord {
    /// Create a record with no alternates yet
    pub fn new(position: u64, ref_allele: String) -> Self {
        Self {
            position,
            ref_allele,
            alternates: Vec::new(),
        }
    }

    /// Number of alternate alleles recorded at this position
    pub fn alt_count(&self) -> usize {
        self.alternates.len()
    }
}

/// Position map that iterates in load order
///
/// Snapshot files list records in the order positions first appeared in the
/// ksnp file, so lookups go through an index into an ordered `Vec`.
#[derive(Debug, Clone, Default)]
pub struct PositionMap {
    records: Vec<PositionRecord>,
    index: HashMap<u64, usize>,
}

impl PositionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an alternate allele at `position`
    ///
    /// The first call for a position fixes its reference allele; later calls
    /// only append to the alternate list and `ref_allele` is ignored.
    pub fn add_alternate(&mut self, position: u64, ref_allele: &str, alt: AltAllele) {
        let slot = match self.index.get(&position) {
            Some(&slot) => slot,
            None => {
                self.records
                    .push(PositionRecord::new(position, ref_allele.to_string()));
                self.index.insert(position, self.records.len() - 1);
                self.records.len() - 1
            }
        };
        self.records[slot].alternates.push(alt);
    }

    pub fn get(&self, position: u64) -> Option<&PositionRecord> {
        self.index.get(&position).map(|&slot| &self.records[slot])
    }

    pub fn contains(&self, position: u64) -> bool {
        self.index.contains_key(&position)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in load order
    pub fn iter(&self) -> impl Iterator<Item = &PositionRecord> {
        self.records.iter()
    }

    /// Largest number of alternate alleles at any position (0 if empty)
    pub fn max_alternates(&self) -> usize {
        self.records
            .iter()
            .map(PositionRecord::alt_count)
            .max()
            .unwrap_or(0)
    }
}

/// Snapshot cutoffs, kept in ascending order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cutoffs(Vec<u64>);

impl Cutoffs {
    /// Sort the given values; duplicates are kept
    pub fn new(mut values: Vec<u64>) -> Self {
        values.sort_unstable();
        Self(values)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// List rendering used by the `##KSNP_NUM` header line (e.g., "[1, 2, 4]")
    pub fn header_value(&self) -> String {
        let values: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        format!("[{}]", values.join(", "))
    }
}
