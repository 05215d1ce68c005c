// ==============================================================================
// parsers/ksnp.rs - ksnp SNP-Frequency File Parser
// ==============================================================================
// Description: Loads a ksnp file into a load-ordered position map
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Format: whitespace-delimited text, exactly 8 fields per line
// Example:
//   chr  100  A  T  0.5  x  y  z
//   chr  100  A  G  0.2  x  y  z
//   chr  250  C  T  0.01 x  y  z
// Fields used: [1] position, [2] REF, [3] ALT, [4] allele frequency.
// Repeated positions add further alternates to the first record.
// ==============================================================================

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{AltAllele, PositionMap};

/// Number of whitespace-separated fields on every ksnp line
pub const KSNP_FIELD_COUNT: usize = 8;

const POSITION_FIELD: usize = 1;
const REF_FIELD: usize = 2;
const ALT_FIELD: usize = 3;
const FREQUENCY_FIELD: usize = 4;

/// Errors that can occur while loading a ksnp file
#[derive(Error, Debug)]
pub enum KsnpParseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid number of fields ({expected}) at line {line}: found {found}\n{content}")]
    InvalidFieldCount {
        line: usize,
        expected: usize,
        found: usize,
        content: String,
    },

    #[error("Invalid position value at line {line}: {value}")]
    InvalidPosition { line: usize, value: String },

    #[error("Invalid allele frequency at line {line}: {value}")]
    InvalidFrequency { line: usize, value: String },
}

/// Parser for ksnp files
#[derive(Debug, Clone, Default)]
pub struct KsnpParser;

impl KsnpParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a ksnp file from disk
    ///
    /// # Returns
    /// * `Ok(PositionMap)` - every position with at least one alternate
    /// * `Err(KsnpParseError)` - unreadable file or malformed line
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<PositionMap, KsnpParseError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let positions = self.parse_reader(BufReader::new(file))?;

        info!(
            "Loaded {} positions from {:?} (max {} alternates)",
            positions.len(),
            path,
            positions.max_alternates()
        );

        Ok(positions)
    }

    /// Parse ksnp lines from any buffered reader
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<PositionMap, KsnpParseError> {
        let mut positions = PositionMap::new();
        let mut line_count = 0;

        for (idx, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            self.parse_line(&line, idx + 1, &mut positions)?;
            line_count += 1;
        }

        debug!("Read {} ksnp lines", line_count);
        Ok(positions)
    }

    fn parse_line(
        &self,
        line: &str,
        line_number: usize,
        positions: &mut PositionMap,
    ) -> Result<(), KsnpParseError> {
        let fields: Vec<&str> = line.split_whitespace().collect();

        if fields.len() != KSNP_FIELD_COUNT {
            return Err(KsnpParseError::InvalidFieldCount {
                line: line_number,
                expected: KSNP_FIELD_COUNT,
                found: fields.len(),
                content: line.to_string(),
            });
        }

        let position_str = fields[POSITION_FIELD];
        let position = position_str.parse::<u64>().map_err(|_| {
            KsnpParseError::InvalidPosition {
                line: line_number,
                value: position_str.to_string(),
            }
        })?;

        let frequency_str = fields[FREQUENCY_FIELD];
        let frequency = frequency_str.parse::<f64>().map_err(|_| {
            KsnpParseError::InvalidFrequency {
                line: line_number,
                value: frequency_str.to_string(),
            }
        })?;

        positions.add_alternate(
            position,
            fields[REF_FIELD],
            AltAllele {
                allele: fields[ALT_FIELD].to_string(),
                frequency,
            },
        );

        Ok(())
    }
}
