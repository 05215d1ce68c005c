// ==============================================================================
// partition.rs - Cutoff Partition Writer
// ==============================================================================
// Description: Walks the sort order and writes included/excluded VCF snapshots
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// State machine:
//   CutoffsRemaining --(counter == last cutoff)--> CutoffsExhausted
// The included set only grows. At each cutoff two files are written:
//   <prefix>_<cutoff>.vcf      positions consumed so far
//   <prefix>_<cutoff>_out.vcf  every other position
// Records in both files follow ksnp load order, not sort order.
// ==============================================================================

use serde::Serialize;
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::OutputOptions;
use crate::models::{Cutoffs, PositionMap};
use crate::output::{RenderedRecords, SnapshotSink};

#[derive(Error, Debug)]
pub enum PartitionError {
    #[error("{0} does not exist in the ksnp data")]
    UnknownPosition(u64),

    #[error("Failed to write snapshot {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where the writer is in its cutoff list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionState {
    CutoffsRemaining,
    CutoffsExhausted,
}

/// One written pair of snapshot files
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotSummary {
    pub cutoff: u64,
    pub included_path: PathBuf,
    pub included_records: usize,
    pub excluded_path: PathBuf,
    pub excluded_records: usize,
}

/// Outcome of a full pass over the sort order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartitionReport {
    pub snapshots: Vec<SnapshotSummary>,

    /// Sort-order entries consumed before stopping
    pub consumed: u64,

    /// Cutoffs never reached
    pub unfulfilled: Vec<u64>,
}

/// Read-only data shared by every snapshot
pub struct PartitionContext<'a> {
    pub positions: &'a PositionMap,
    pub rendered: &'a RenderedRecords,
    pub header: &'a str,
}

pub struct PartitionWriter<'a> {
    context: PartitionContext<'a>,
    cutoffs: &'a Cutoffs,
    prefix: String,
    options: OutputOptions,
    included: HashSet<u64>,
    consumed: u64,
    next_cutoff: usize,
}

impl<'a> PartitionWriter<'a> {
    pub fn new(
        context: PartitionContext<'a>,
        cutoffs: &'a Cutoffs,
        prefix: impl Into<String>,
        options: OutputOptions,
    ) -> Self {
        Self {
            context,
            cutoffs,
            prefix: prefix.into(),
            options,
            included: HashSet::new(),
            consumed: 0,
            next_cutoff: 0,
        }
    }

    pub fn state(&self) -> PartitionState {
        if self.next_cutoff < self.cutoffs.len() {
            PartitionState::CutoffsRemaining
        } else {
            PartitionState::CutoffsExhausted
        }
    }

    /// Positions added so far
    pub fn included(&self) -> &HashSet<u64> {
        &self.included
    }

    /// Paths of the included and excluded files for `cutoff`
    pub fn snapshot_paths(&self, cutoff: u64) -> (PathBuf, PathBuf) {
        let ext = self.options.extension();
        (
            PathBuf::from(format!("{}_{}.{}", self.prefix, cutoff, ext)),
            PathBuf::from(format!("{}_{}_out.{}", self.prefix, cutoff, ext)),
        )
    }

    /// Consume the sort order until it or the cutoff list runs out
    ///
    /// Snapshots written before an error stay on disk.
    pub fn run(mut self, sort_order: &[u64]) -> Result<PartitionReport, PartitionError> {
        let mut snapshots = Vec::new();

        for &position in sort_order {
            if self.state() == PartitionState::CutoffsExhausted {
                break;
            }
            if let Some(summary) = self.consume(position)? {
                snapshots.push(summary);
            }
        }

        let unfulfilled = self.cutoffs.as_slice()[self.next_cutoff..].to_vec();
        Ok(PartitionReport {
            snapshots,
            consumed: self.consumed,
            unfulfilled,
        })
    }

    /// Add one sort-order entry, writing a snapshot if it hits the current cutoff
    ///
    /// A repeated position still advances the counter but is only included once.
    pub fn consume(&mut self, position: u64) -> Result<Option<SnapshotSummary>, PartitionError> {
        if !self.context.positions.contains(position) {
            return Err(PartitionError::UnknownPosition(position));
        }

        self.included.insert(position);
        self.consumed += 1;

        let Some(&cutoff) = self.cutoffs.as_slice().get(self.next_cutoff) else {
            return Ok(None);
        };
        if self.consumed != cutoff {
            return Ok(None);
        }

        let summary = self.write_snapshot(cutoff)?;
        self.next_cutoff += 1;
        Ok(Some(summary))
    }

    fn write_snapshot(&self, cutoff: u64) -> Result<SnapshotSummary, PartitionError> {
        let (included_path, excluded_path) = self.snapshot_paths(cutoff);
        debug!("Writing snapshot for cutoff {}: {:?}", cutoff, included_path);

        let mut included_sink = self.open_sink(&included_path)?;
        let mut excluded_sink = self.open_sink(&excluded_path)?;

        let header = self.context.header.as_bytes();
        included_sink
            .write_all(header)
            .map_err(|e| io_error(&included_path, e))?;
        excluded_sink
            .write_all(header)
            .map_err(|e| io_error(&excluded_path, e))?;

        let mut included_records = 0;
        let mut excluded_records = 0;
        for (position, line) in self.context.rendered.iter() {
            let (sink, path) = if self.included.contains(&position) {
                included_records += 1;
                (&mut included_sink, &included_path)
            } else {
                excluded_records += 1;
                (&mut excluded_sink, &excluded_path)
            };
            writeln!(sink, "{}", line).map_err(|e| io_error(path, e))?;
        }

        included_sink
            .finish()
            .map_err(|e| io_error(&included_path, e))?;
        excluded_sink
            .finish()
            .map_err(|e| io_error(&excluded_path, e))?;

        info!(
            "Cutoff {}: {} included, {} excluded",
            cutoff, included_records, excluded_records
        );

        Ok(SnapshotSummary {
            cutoff,
            included_path,
            included_records,
            excluded_path,
            excluded_records,
        })
    }

    fn open_sink(&self, path: &Path) -> Result<SnapshotSink, PartitionError> {
        SnapshotSink::create(path, self.options).map_err(|e| io_error(path, e))
    }
}

fn io_error(path: &Path, source: io::Error) -> PartitionError {
    PartitionError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReferenceContig;
    use crate::models::AltAllele;
    use std::fs;

    const HEADER: &str = "#HEADER\n";

    fn positions(list: &[u64]) -> PositionMap {
        let mut map = PositionMap::new();
        for &pos in list {
            map.add_alternate(
                pos,
                "A",
                AltAllele {
                    allele: "T".to_string(),
                    frequency: 0.5,
                },
            );
        }
        map
    }

    fn data_positions(path: &Path) -> Vec<u64> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .filter(|line| !line.starts_with('#'))
            .map(|line| line.split('\t').nth(1).unwrap().parse::<u64>().unwrap())
            .collect()
    }

    #[test]
    fn test_snapshots_at_each_cutoff() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out").to_string_lossy().to_string();

        let map = positions(&[100, 200, 300]);
        let rendered = RenderedRecords::build(&map, &ReferenceContig::default());
        let cutoffs = Cutoffs::new(vec![3, 1]);
        let context = PartitionContext {
            positions: &map,
            rendered: &rendered,
            header: HEADER,
        };

        let writer = PartitionWriter::new(context, &cutoffs, prefix.clone(), OutputOptions::default());
        let report = writer.run(&[200, 300, 100]).unwrap();

        assert_eq!(report.snapshots.len(), 2);
        assert_eq!(report.consumed, 3);
        assert!(report.unfulfilled.is_empty());

        let first = &report.snapshots[0];
        assert_eq!(first.cutoff, 1);
        assert_eq!(first.included_path, PathBuf::from(format!("{}_1.vcf", prefix)));
        assert_eq!(first.excluded_path, PathBuf::from(format!("{}_1_out.vcf", prefix)));
        assert_eq!(data_positions(&first.included_path), vec![200]);
        // Load order, not sort order
        assert_eq!(data_positions(&first.excluded_path), vec![100, 300]);

        let last = &report.snapshots[1];
        assert_eq!(data_positions(&last.included_path), vec![100, 200, 300]);
        assert_eq!(fs::read_to_string(&last.excluded_path).unwrap(), HEADER);
        assert_eq!(last.excluded_records, 0);
    }

    #[test]
    fn test_unknown_position_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out").to_string_lossy().to_string();

        let map = positions(&[100, 200]);
        let rendered = RenderedRecords::build(&map, &ReferenceContig::default());
        let cutoffs = Cutoffs::new(vec![1, 2]);
        let context = PartitionContext {
            positions: &map,
            rendered: &rendered,
            header: HEADER,
        };

        let writer = PartitionWriter::new(context, &cutoffs, prefix.clone(), OutputOptions::default());
        let result = writer.run(&[100, 999, 200]);

        assert!(matches!(result, Err(PartitionError::UnknownPosition(999))));
        // Earlier snapshot is left in place
        assert!(Path::new(&format!("{}_1.vcf", prefix)).exists());
        assert!(!Path::new(&format!("{}_2.vcf", prefix)).exists());
    }

    #[test]
    fn test_stops_after_last_cutoff() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out").to_string_lossy().to_string();

        let map = positions(&[1, 2]);
        let rendered = RenderedRecords::build(&map, &ReferenceContig::default());
        let cutoffs = Cutoffs::new(vec![1]);
        let context = PartitionContext {
            positions: &map,
            rendered: &rendered,
            header: HEADER,
        };

        // 42 is never inspected
        let report = PartitionWriter::new(context, &cutoffs, prefix, OutputOptions::default())
            .run(&[2, 42])
            .unwrap();
        assert_eq!(report.consumed, 1);
        assert_eq!(report.snapshots.len(), 1);
    }

    #[test]
    fn test_cutoff_beyond_sort_order() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out").to_string_lossy().to_string();

        let map = positions(&[1, 2, 3]);
        let rendered = RenderedRecords::build(&map, &ReferenceContig::default());
        let cutoffs = Cutoffs::new(vec![2, 10]);
        let context = PartitionContext {
            positions: &map,
            rendered: &rendered,
            header: HEADER,
        };

        let report = PartitionWriter::new(context, &cutoffs, prefix.clone(), OutputOptions::default())
            .run(&[3, 1, 2])
            .unwrap();

        assert_eq!(report.snapshots.len(), 1);
        assert_eq!(report.unfulfilled, vec![10]);
        assert!(!Path::new(&format!("{}_10.vcf", prefix)).exists());
    }

    #[test]
    fn test_duplicate_sort_entries_advance_counter() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out").to_string_lossy().to_string();

        let map = positions(&[1, 2, 3]);
        let rendered = RenderedRecords::build(&map, &ReferenceContig::default());
        let cutoffs = Cutoffs::new(vec![3]);
        let context = PartitionContext {
            positions: &map,
            rendered: &rendered,
            header: HEADER,
        };

        let report = PartitionWriter::new(context, &cutoffs, prefix, OutputOptions::default())
            .run(&[1, 1, 2, 3])
            .unwrap();

        let snapshot = &report.snapshots[0];
        assert_eq!(snapshot.included_records, 2);
        assert_eq!(snapshot.excluded_records, 1);
        assert_eq!(data_positions(&snapshot.excluded_path), vec![3]);
    }

    #[test]
    fn test_state_transitions() {
        let map = positions(&[1, 2]);
        let rendered = RenderedRecords::build(&map, &ReferenceContig::default());
        let cutoffs = Cutoffs::new(vec![]);
        let context = PartitionContext {
            positions: &map,
            rendered: &rendered,
            header: HEADER,
        };

        let writer = PartitionWriter::new(context, &cutoffs, "unused", OutputOptions::default());
        assert_eq!(writer.state(), PartitionState::CutoffsExhausted);
        assert!(writer.included().is_empty());
        assert_eq!(writer.run(&[1, 2]).unwrap().consumed, 0);
    }

    #[test]
    fn test_gzip_snapshot_names() {
        let map = positions(&[1]);
        let rendered = RenderedRecords::build(&map, &ReferenceContig::default());
        let cutoffs = Cutoffs::new(vec![1]);
        let context = PartitionContext {
            positions: &map,
            rendered: &rendered,
            header: HEADER,
        };

        let writer = PartitionWriter::new(context, &cutoffs, "run", OutputOptions { gzip: true });
        assert_eq!(
            writer.snapshot_paths(4),
            (PathBuf::from("run_4.vcf.gz"), PathBuf::from("run_4_out.vcf.gz"))
        );
    }

    #[test]
    fn test_duplicate_cutoff_stalls() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out").to_string_lossy().to_string();

        let map = positions(&[1, 2, 3]);
        let rendered = RenderedRecords::build(&map, &ReferenceContig::default());
        let cutoffs = Cutoffs::new(vec![1, 1, 3]);
        let context = PartitionContext {
            positions: &map,
            rendered: &rendered,
            header: HEADER,
        };

        let report = PartitionWriter::new(context, &cutoffs, prefix.clone(), OutputOptions::default())
            .run(&[1, 2, 3])
            .unwrap();

        // Counter passes 1 only once, so the second 1 is never hit
        assert_eq!(report.snapshots.len(), 1);
        assert_eq!(report.unfulfilled, vec![1, 3]);
        assert_eq!(report.consumed, 3);
        assert!(!Path::new(&format!("{}_3.vcf", prefix)).exists());
    }

    #[test]
    fn test_gzip_snapshot_contents() {
        use flate2::read::GzDecoder;
        use std::io::Read;

        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("out").to_string_lossy().to_string();

        let map = positions(&[10, 20]);
        let rendered = RenderedRecords::build(&map, &ReferenceContig::default());
        let cutoffs = Cutoffs::new(vec![1]);
        let context = PartitionContext {
            positions: &map,
            rendered: &rendered,
            header: HEADER,
        };

        let report = PartitionWriter::new(context, &cutoffs, prefix.clone(), OutputOptions { gzip: true })
            .run(&[20])
            .unwrap();

        let snapshot = &report.snapshots[0];
        assert_eq!(snapshot.included_path, PathBuf::from(format!("{}_1.vcf.gz", prefix)));

        let decode = |path: &Path| {
            let mut text = String::new();
            GzDecoder::new(fs::File::open(path).unwrap())
                .read_to_string(&mut text)
                .unwrap();
            text
        };

        assert_eq!(
            decode(snapshot.included_path.as_path()),
            format!("{}22\t20\t*\tA\tT\t100\tPASS\tAF=0.5\tGT\t0|0\t1|1\n", HEADER)
        );
        assert_eq!(
            decode(snapshot.excluded_path.as_path()),
            format!("{}22\t10\t*\tA\tT\t100\tPASS\tAF=0.5\tGT\t0|0\t1|1\n", HEADER)
        );
    }
}
