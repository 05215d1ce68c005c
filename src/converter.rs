// ==============================================================================
// converter.rs - ksnp -> VCF Conversion Pipeline
// ==============================================================================
// Description: Loads inputs, renders records once and writes cutoff snapshots
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{OutputOptions, ReferenceContig};
use crate::models::Cutoffs;
use crate::output::{RenderedRecords, VcfHeader};
use crate::parsers::{read_sort_order, KsnpParser};
use crate::partition::{PartitionContext, PartitionReport, PartitionWriter, SnapshotSummary};

/// Everything needed for one conversion run
#[derive(Debug, Clone)]
pub struct ConverterSettings {
    pub ksnp_file: PathBuf,
    pub sort_file: PathBuf,
    pub cutoffs: Cutoffs,
    /// Snapshot files are named `<prefix>_<cutoff>.vcf`
    pub output_prefix: String,
    pub contig: ReferenceContig,
    pub output: OutputOptions,
    /// Optional JSON manifest describing the run
    pub manifest: Option<PathBuf>,
}

/// Machine-readable record of a conversion run
#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub ksnp_file: String,
    pub sort_file: String,
    pub cutoffs: Cutoffs,
    pub contig: ReferenceContig,
    pub total_positions: usize,
    pub max_alternates: usize,
    pub sort_order_length: usize,
    pub consumed: u64,
    pub snapshots: Vec<SnapshotSummary>,
    pub unfulfilled_cutoffs: Vec<u64>,
    pub generated_at: DateTime<Utc>,
}

pub struct KsnpConverter {
    settings: ConverterSettings,
}

impl KsnpConverter {
    pub fn new(settings: ConverterSettings) -> Self {
        Self { settings }
    }

    /// Main conversion pipeline
    pub fn run(&self) -> Result<RunManifest> {
        let settings = &self.settings;
        info!("Converting {:?} with cutoffs {}", settings.ksnp_file, settings.cutoffs.header_value());

        // 1. Load ksnp positions
        let positions = KsnpParser::new()
            .parse(&settings.ksnp_file)
            .with_context(|| format!("Failed to load ksnp file {:?}", settings.ksnp_file))?;
        let max_alternates = positions.max_alternates();

        // 2. Shared header
        let ksnp_name = settings.ksnp_file.display().to_string();
        let sort_name = settings.sort_file.display().to_string();
        let header = VcfHeader {
            ksnp_file: ksnp_name.clone(),
            sort_file: sort_name.clone(),
            cutoffs: settings.cutoffs.clone(),
            contig: settings.contig.clone(),
            max_alts: max_alternates,
        }
        .render();

        // 3. Sort order
        let sort_order = read_sort_order(&settings.sort_file)
            .with_context(|| format!("Failed to read sort file {:?}", settings.sort_file))?;

        // 4. Render every record once
        let rendered = RenderedRecords::build(&positions, &settings.contig);

        // 5. Walk the sort order, writing snapshots at each cutoff
        let context = PartitionContext {
            positions: &positions,
            rendered: &rendered,
            header: &header,
        };
        let report: PartitionReport = PartitionWriter::new(
            context,
            &settings.cutoffs,
            settings.output_prefix.clone(),
            settings.output,
        )
        .run(&sort_order)?;

        if !report.unfulfilled.is_empty() {
            warn!(
                "Sort order ended after {} entries; no snapshots for cutoffs {:?}",
                report.consumed, report.unfulfilled
            );
        }

        let manifest = RunManifest {
            ksnp_file: ksnp_name,
            sort_file: sort_name,
            cutoffs: settings.cutoffs.clone(),
            contig: settings.contig.clone(),
            total_positions: positions.len(),
            max_alternates,
            sort_order_length: sort_order.len(),
            consumed: report.consumed,
            snapshots: report.snapshots,
            unfulfilled_cutoffs: report.unfulfilled,
            generated_at: Utc::now(),
        };

        if let Some(path) = &settings.manifest {
            write_manifest(path, &manifest)?;
        }

        info!("Conversion complete: {} snapshot pairs written", manifest.snapshots.len());
        Ok(manifest)
    }
}

/// Write the run manifest as pretty-printed JSON
pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest).context("Failed to serialize manifest")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write manifest {:?}", path))?;

    info!("Manifest written: {:?}", path);
    Ok(())
}
