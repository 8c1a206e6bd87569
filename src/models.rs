//
// models.rs
// C3d-Tools-rs
//
// Defines serializable data structures for invocation results, runtime details, collected outputs, and reports.
//
// Thales Matheus Mendonça Santos - October 2026

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened when the subprocess ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeInfo {
    pub program: String,
    pub working_dir: PathBuf,
    pub returncode: i32,
    pub stdout: String,
    pub stderr: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Outcome of a completed invocation: the command line, how it ran, and what it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationResult<O> {
    pub cmdline: String,
    pub runtime: RuntimeInfo,
    pub outputs: O,
}

/// Outputs of the affine converter; the path is resolved but not checked for existence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffineOutputs {
    pub out_file: PathBuf,
}

/// Outputs of the multi-component split: only the declared files found after execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitOutputs {
    pub out_files: Vec<PathBuf>,
}

/// Uniform view over the files an invocation reports.
pub trait OutputFiles {
    fn files(&self) -> Vec<&Path>;
}

impl OutputFiles for AffineOutputs {
    fn files(&self) -> Vec<&Path> {
        vec![self.out_file.as_path()]
    }
}

impl OutputFiles for SplitOutputs {
    fn files(&self) -> Vec<&Path> {
        self.out_files.iter().map(PathBuf::as_path).collect()
    }
}

/// A reported output file with its fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputRecord {
    pub path: PathBuf,
    pub exists: bool,
    pub size: Option<u64>,
    pub sha256: Option<String>,
}

/// JSON-ready summary of one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationReport {
    pub tool: String,
    pub cmdline: String,
    pub runtime: RuntimeInfo,
    pub outputs: Vec<OutputRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_outputs: Vec<PathBuf>,
}

/// A batch entry that did not complete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    pub input: PathBuf,
    pub error: String,
}

/// Aggregated result of a batch split run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub succeeded: Vec<InvocationReport>,
    pub failed: Vec<BatchFailure>,
}
