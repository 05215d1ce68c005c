// ==============================================================================
// parsers/cutoffs.rs - Snapshot Cutoff List Parser
// ==============================================================================
// Description: Parses the comma-separated cutoff counts given on the command line
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use thiserror::Error;

use crate::models::Cutoffs;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CutoffError {
    #[error("No cutoff values given")]
    Empty,

    #[error("Invalid cutoff '{value}' (expected a positive integer)")]
    InvalidValue { value: String },
}

/// Parse e.g. "1,2,4,8,16" into ascending cutoffs
pub fn parse_cutoffs(list: &str) -> Result<Cutoffs, CutoffError> {
    if list.trim().is_empty() {
        return Err(CutoffError::Empty);
    }

    let values = list
        .split(',')
        .map(|token| {
            let token = token.trim();
            match token.parse::<u64>() {
                Ok(value) if value > 0 => Ok(value),
                _ => Err(CutoffError::InvalidValue {
                    value: token.to_string(),
                }),
            }
        })
        .collect::<Result<Vec<u64>, CutoffError>>()?;

    Ok(Cutoffs::new(values))
}
