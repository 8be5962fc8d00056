// SPDX-License-Identifier: Apache-2.0

//! Durable run storage and the result-reuse layer.
//!
//! Each configuration owns a directory keyed by its deterministic encoding,
//! containing numbered subdirectories - one per repeat - each holding the
//! raw `result.json` record. Stale or partial history must never block
//! exploration: malformed records are logged and treated as absent.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::{ExploreError, ExploreResult};
use crate::score::{RawRunResult, ResultScorer, RunHandle, RunScore};
use crate::types::{HardwareConfiguration, RunId};

/// File name of the raw record inside each run directory.
const RESULT_FILE: &str = "result.json";

/// Disk-backed store of benchmark repeats, shared by the run cache (reads)
/// and the scheduler (writes).
#[derive(Debug, Clone)]
pub struct RunStore {
    root: PathBuf,
}

impl RunStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one repeat's artifacts.
    pub fn run_dir(&self, configuration: &HardwareConfiguration, run_id: RunId) -> PathBuf {
        self.root
            .join(configuration.dir_key())
            .join(run_id.to_string())
    }

    /// List persisted run identifiers for a configuration, ascending.
    /// A missing directory or unreadable entries yield an empty/partial
    /// list, never an error.
    pub fn list_prior_runs(&self, configuration: &HardwareConfiguration) -> Vec<RunId> {
        let dir = self.root.join(configuration.dir_key());
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut ids: Vec<RunId> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(|name| name.parse::<u32>().ok())
                    .and_then(RunId::new)
            })
            .collect();
        ids.sort_unstable();
        ids
    }

    /// The next fresh run identifier: one past the maximum existing numeric
    /// subdirectory, or 1 if none exist. Identifiers are never reused, so
    /// concurrent and historical runs never collide.
    pub fn next_run_id(&self, configuration: &HardwareConfiguration) -> RunId {
        self.list_prior_runs(configuration)
            .last()
            .map(|id| id.next())
            .unwrap_or(RunId::FIRST)
    }

    /// Create the run directory for a fresh repeat, returning its path for
    /// the executor to use as the target workspace.
    pub fn prepare_run_dir(
        &self,
        configuration: &HardwareConfiguration,
        run_id: RunId,
    ) -> ExploreResult<PathBuf> {
        let dir = self.run_dir(configuration, run_id);
        fs::create_dir_all(&dir).map_err(|source| ExploreError::Io {
            context: "creating run directory",
            source,
        })?;
        Ok(dir)
    }

    /// Persist a raw result into its run directory. Fresh results are made
    /// durable before scoring, so a crash mid-aggregation leaves
    /// recoverable history for the next invocation.
    pub fn persist(
        &self,
        configuration: &HardwareConfiguration,
        run_id: RunId,
        raw: &RawRunResult,
    ) -> ExploreResult<RunHandle> {
        let dir = self.prepare_run_dir(configuration, run_id)?;
        let path = dir.join(RESULT_FILE);

        let file = File::create(&path).map_err(|source| ExploreError::Io {
            context: "creating result record",
            source,
        })?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, raw).map_err(|err| ExploreError::Io {
            context: "serializing result record",
            source: std::io::Error::other(err),
        })?;

        Ok(RunHandle::new(dir))
    }

    /// Load a persisted raw result. Malformed or unreadable records are
    /// logged and treated as absent, never fatal.
    pub fn load(
        &self,
        configuration: &HardwareConfiguration,
        run_id: RunId,
    ) -> Option<RawRunResult> {
        let path = self.run_dir(configuration, run_id).join(RESULT_FILE);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) => {
                tracing::debug!(
                    configuration = %configuration,
                    run = %run_id,
                    error = %err,
                    "no readable result record"
                );
                return None;
            }
        };

        match serde_json::from_reader(file) {
            Ok(raw) => Some(raw),
            Err(err) => {
                tracing::warn!(
                    configuration = %configuration,
                    run = %run_id,
                    error = %err,
                    "malformed result record, skipping"
                );
                None
            }
        }
    }

    /// Reconstruct a validated score from a persisted run, or absent when
    /// the run is incomplete, failed, or malformed.
    pub fn reuse(
        &self,
        configuration: &HardwareConfiguration,
        run_id: RunId,
        scorer: &ResultScorer,
    ) -> Option<RunScore> {
        let raw = self.load(configuration, run_id)?;
        if !raw.status.is_reusable() {
            tracing::debug!(
                configuration = %configuration,
                run = %run_id,
                status = ?raw.status,
                "persisted run not reusable"
            );
            return None;
        }

        let handle = RunHandle::new(self.run_dir(configuration, run_id));
        match scorer.score(configuration, &raw, handle) {
            Ok(score) => Some(score),
            Err(err) => {
                tracing::warn!(
                    configuration = %configuration,
                    run = %run_id,
                    error = %err,
                    "persisted run could not be rescored"
                );
                None
            }
        }
    }
}
