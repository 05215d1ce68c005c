// ==============================================================================
// config.rs - Converter Configuration
// ==============================================================================
// Description: Reference contig and output settings shared by all snapshots
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use serde::Serialize;

/// Chromosome used by the reference deployment
pub const DEFAULT_CHROMOSOME: &str = "22";

/// Assembly name written into the contig declaration
pub const DEFAULT_ASSEMBLY: &str = "b37";

/// Length of chromosome 22 in GRCh37
pub const DEFAULT_CONTIG_LENGTH: u64 = 51_304_566;

/// The single contig every record is placed on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceContig {
    /// CHROM column value and contig ID (e.g., "22")
    pub chromosome: String,

    /// Assembly name (e.g., "b37")
    pub assembly: String,

    /// Contig length in base pairs
    pub length: u64,
}

impl Default for ReferenceContig {
    fn default() -> Self {
        Self {
            chromosome: DEFAULT_CHROMOSOME.to_string(),
            assembly: DEFAULT_ASSEMBLY.to_string(),
            length: DEFAULT_CONTIG_LENGTH,
        }
    }
}

impl ReferenceContig {
    /// `##contig` header line for this contig
    pub fn header_line(&self) -> String {
        format!(
            "##contig=<ID={},assembly={},length={}>",
            self.chromosome, self.assembly, self.length
        )
    }
}

/// How snapshot files are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutputOptions {
    /// Gzip-compress snapshots (adds a `.gz` suffix)
    pub gzip: bool,
}

impl OutputOptions {
    /// File extension for snapshot files
    pub fn extension(&self) -> &'static str {
        if self.gzip {
            "vcf.gz"
        } else {
            "vcf"
        }
    }
}
