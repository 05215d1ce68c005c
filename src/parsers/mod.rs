// ==============================================================================
// parsers/mod.rs - Input parser modules
// ==============================================================================
// Description: Parsers for ksnp files, sort files and cutoff lists
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

pub mod ksnp;
pub mod sort_order;
pub mod cutoffs;

pub use ksnp::{KsnpParser, KsnpParseError, KSNP_FIELD_COUNT};
pub use sort_order::{read_sort_order, read_sort_order_from, SortOrderError};
pub use cutoffs::{parse_cutoffs, CutoffError};
