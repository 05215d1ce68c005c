// ==============================================================================
// parsers/sort_order.rs - Position Sort-Order Parser
// ==============================================================================
// Description: Reads the priority order in which positions are added
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Format: first line only, comma-separated integer positions
// Example:
//   100,200,300
// Any further lines are ignored.
// ==============================================================================

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while reading a sort file
#[derive(Error, Debug)]
pub enum SortOrderError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Sort file is empty")]
    EmptyFile,

    #[error("Invalid position in sort order: '{value}'")]
    InvalidPosition { value: String },
}

/// Read the sort order from the first line of `path`
///
/// Positions are not checked against the ksnp data here; unknown positions
/// are reported when the partition writer reaches them.
pub fn read_sort_order(path: impl AsRef<Path>) -> Result<Vec<u64>, SortOrderError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let order = read_sort_order_from(BufReader::new(file))?;

    info!("Read sort order of {} positions from {:?}", order.len(), path);
    Ok(order)
}

/// Read the sort order from the first line of a buffered reader
pub fn read_sort_order_from<R: BufRead>(reader: R) -> Result<Vec<u64>, SortOrderError> {
    let first_line = reader
        .lines()
        .next()
        .ok_or(SortOrderError::EmptyFile)??;

    parse_position_list(&first_line)
}

/// Parse a comma-separated list of positions
pub fn parse_position_list(line: &str) -> Result<Vec<u64>, SortOrderError> {
    line.split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<u64>()
                .map_err(|_| SortOrderError::InvalidPosition {
                    value: token.to_string(),
                })
        })
        .collect()
}
