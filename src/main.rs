// ==============================================================================
// main.rs - ksnp to VCF Converter Entry Point
// ==============================================================================
// Description: Command-line entry point for cutoff-partitioned ksnp -> VCF conversion
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Usage:
//   ksnp-to-vcf snps.ksnp sortfile 1,2,4,8,16 output
// ==============================================================================

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ksnp_vcf::config::{
    OutputOptions, ReferenceContig, DEFAULT_ASSEMBLY, DEFAULT_CHROMOSOME, DEFAULT_CONTIG_LENGTH,
};
use ksnp_vcf::converter::{ConverterSettings, KsnpConverter};
use ksnp_vcf::parsers::parse_cutoffs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ksnp input file (8 whitespace-separated fields per line)
    ksnp_file: PathBuf,

    /// Sort file (first line: comma-separated positions)
    sort_file: PathBuf,

    /// Comma-separated cutoff counts (e.g., 1,2,4,8,16)
    cutoffs: String,

    /// Output prefix; files are named <prefix>_<cutoff>.vcf and <prefix>_<cutoff>_out.vcf
    output_prefix: String,

    /// Chromosome written to CHROM and the contig declaration
    #[arg(long, env = "KSNP_VCF_CHROM", default_value = DEFAULT_CHROMOSOME)]
    chrom: String,

    /// Assembly name for the contig declaration
    #[arg(long, env = "KSNP_VCF_ASSEMBLY", default_value = DEFAULT_ASSEMBLY)]
    assembly: String,

    /// Contig length for the contig declaration
    #[arg(long, env = "KSNP_VCF_CONTIG_LENGTH", default_value_t = DEFAULT_CONTIG_LENGTH)]
    contig_length: u64,

    /// Gzip-compress snapshot files (.vcf.gz)
    #[arg(long)]
    gzip: bool,

    /// Write a JSON manifest of the run to this path
    #[arg(long)]
    manifest: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing (stderr, so snapshot files are the only output)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ksnp_vcf=info,ksnp_to_vcf=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let cutoffs = parse_cutoffs(&args.cutoffs)?;

    let settings = ConverterSettings {
        ksnp_file: args.ksnp_file,
        sort_file: args.sort_file,
        cutoffs,
        output_prefix: args.output_prefix,
        contig: ReferenceContig {
            chromosome: args.chrom,
            assembly: args.assembly,
            length: args.contig_length,
        },
        output: OutputOptions { gzip: args.gzip },
        manifest: args.manifest,
    };

    let manifest = KsnpConverter::new(settings).run()?;
    info!(
        "Done: {} of {} cutoffs written",
        manifest.snapshots.len(),
        manifest.cutoffs.len()
    );

    Ok(())
}
