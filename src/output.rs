// ==============================================================================
// output.rs - VCF Rendering
// ==============================================================================
// Description: Header builder, record formatter and snapshot file sinks
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Record layout (tab-separated):
//   CHROM POS ID REF ALT QUAL FILTER INFO FORMAT 0|0 1|1 ... i|i 0|0 ... 0|0
// Every record carries max_alts + 1 genotype columns: the reference column,
// one `i|i` column per alternate, then `0|0` padding.
// ==============================================================================

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

use crate::config::{OutputOptions, ReferenceContig};
use crate::models::{Cutoffs, PositionMap, PositionRecord};

/// Placeholder written to the ID column
pub const ID_PLACEHOLDER: &str = "*";

/// Fixed QUAL value
pub const QUAL: &str = "100";

/// Fixed FILTER value
pub const FILTER_PASS: &str = "PASS";

/// Genotype for the reference column and for padding
const REFERENCE_GENOTYPE: &str = "0|0";

/// Render an allele frequency the way it is written in the INFO column
///
/// Shortest round-trip decimal, always with a fractional part ("1.0") and
/// with a signed two-digit exponent below 1e-4 or from 1e16 up ("1e-05").
pub fn format_frequency(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let scientific = format!("{:e}", value);
        if let Some((mantissa, exponent)) = scientific.split_once('e') {
            if let Ok(exponent) = exponent.parse::<i32>() {
                let sign = if exponent < 0 { '-' } else { '+' };
                return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
            }
        }
    }

    let plain = value.to_string();
    if plain.contains('.') {
        plain
    } else {
        format!("{}.0", plain)
    }
}

/// Format one VCF data line (without trailing newline)
///
/// `max_alts` is the largest alternate count in the dataset; shorter records
/// are padded with `0|0` so the genotype matrix stays rectangular.
pub fn format_record(record: &PositionRecord, contig: &ReferenceContig, max_alts: usize) -> String {
    let alts: Vec<&str> = record
        .alternates
        .iter()
        .map(|alt| alt.allele.as_str())
        .collect();
    let frequencies: Vec<String> = record
        .alternates
        .iter()
        .map(|alt| format_frequency(alt.frequency))
        .collect();

    let mut line = format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\tAF={}\tGT\t{}",
        contig.chromosome,
        record.position,
        ID_PLACEHOLDER,
        record.ref_allele,
        alts.join(","),
        QUAL,
        FILTER_PASS,
        frequencies.join(","),
        REFERENCE_GENOTYPE
    );

    for allele_index in 1..=record.alt_count() {
        line.push_str(&format!("\t{}|{}", allele_index, allele_index));
    }
    for _ in record.alt_count()..max_alts {
        line.push('\t');
        line.push_str(REFERENCE_GENOTYPE);
    }

    line
}

/// Pre-rendered VCF lines for every position, in load order
///
/// Rendering depends only on the dataset's max alternate count, so lines are
/// built once and reused for every snapshot.
#[derive(Debug, Clone, Default)]
pub struct RenderedRecords {
    lines: Vec<(u64, String)>,
}

impl RenderedRecords {
    pub fn build(positions: &PositionMap, contig: &ReferenceContig) -> Self {
        let max_alts = positions.max_alternates();
        let lines: Vec<(u64, String)> = positions
            .iter()
            .map(|record| (record.position, format_record(record, contig, max_alts)))
            .collect();

        debug!("Rendered {} VCF records ({} genotype columns)", lines.len(), max_alts + 1);
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// `(position, line)` pairs in load order
    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.lines.iter().map(|(pos, line)| (*pos, line.as_str()))
    }
}

/// VCF header shared by every snapshot file of a run
#[derive(Debug, Clone)]
pub struct VcfHeader {
    /// ksnp file name as given by the user
    pub ksnp_file: String,

    /// Sort file name as given by the user
    pub sort_file: String,

    pub cutoffs: Cutoffs,

    pub contig: ReferenceContig,

    /// Number of sample columns named in the `#CHROM` line
    pub max_alts: usize,
}

impl VcfHeader {
    /// Render the complete header block, ending with a newline
    pub fn render(&self) -> String {
        let mut header = String::new();
        header.push_str("##fileformat=VCFv4\n");
        header.push_str(&format!("##KSNPFILE={}\n", self.ksnp_file));
        header.push_str(&format!("##KSNP_SORT={}\n", self.sort_file));
        header.push_str(&format!("##KSNP_NUM={}\n", self.cutoffs.header_value()));
        header.push_str(&self.contig.header_line());
        header.push('\n');
        header.push_str("##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n");
        header.push_str("##FILTER=<ID=PASS,Description=\"All filters passed\">\n");
        header.push_str(
            "##INFO=<ID=AF,Number=A,Type=Float,Description=\"Estimated allele frequency in the range (0,1)\">\n",
        );

        let samples: Vec<String> = (0..self.max_alts).map(|i| i.to_string()).collect();
        header.push_str("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\t");
        header.push_str(&samples.join("\t"));
        header.push('\n');

        header
    }
}

/// Destination for one snapshot file
pub enum SnapshotSink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl SnapshotSink {
    /// Create (truncating) the file at `path`
    pub fn create(path: &Path, options: OutputOptions) -> io::Result<Self> {
        let writer = BufWriter::new(File::create(path)?);
        if options.gzip {
            Ok(SnapshotSink::Gzip(GzEncoder::new(writer, Compression::default())))
        } else {
            Ok(SnapshotSink::Plain(writer))
        }
    }

    /// Flush all buffered data and close the file
    pub fn finish(self) -> io::Result<()> {
        match self {
            SnapshotSink::Plain(mut writer) => writer.flush(),
            SnapshotSink::Gzip(encoder) => encoder.finish()?.flush(),
        }
    }
}

impl Write for SnapshotSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            SnapshotSink::Plain(writer) => writer.write(buf),
            SnapshotSink::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            SnapshotSink::Plain(writer) => writer.flush(),
            SnapshotSink::Gzip(encoder) => encoder.flush(),
        }
    }
}
