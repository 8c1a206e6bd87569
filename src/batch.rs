//
// batch.rs
// C3d-Tools-rs
//
// Finds multi-component warp fields under a directory and splits each one in parallel, collecting per-file reports.
//
// Thales Matheus Mendonça Santos - October 2026

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use rayon::prelude::*;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::command::{ExecContext, ToolInterface};
use crate::json;
use crate::models::{BatchFailure, BatchSummary, InvocationReport};
use crate::split::{self, C3dMultiComponentSplit};

const KNOWN_EXTENSIONS: [&str; 4] = [".nii.gz", ".nii", ".nrrd", ".mha"];

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// File-name suffix identifying the inputs to split.
    pub suffix: String,
    /// One output per axis label, named `<stem>_w<axis><ext>`.
    pub axes: Vec<String>,
    pub program: String,
    /// Treat declared-but-missing components as failures.
    pub strict_outputs: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            suffix: "Warp.nii.gz".to_string(),
            axes: vec!["x".into(), "y".into(), "z".into()],
            program: split::DEFAULT_PROGRAM.to_string(),
            strict_outputs: false,
        }
    }
}

/// Inputs under `dir` whose file name ends with `suffix`, sorted for stable output.
pub fn find_inputs(dir: &Path, suffix: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.file_name()
                .to_str()
                .map_or(false, |name| name.ends_with(suffix))
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Component file names placed next to `input`.
pub fn component_outputs(input: &Path, axes: &[String]) -> Vec<PathBuf> {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let (stem, ext) = KNOWN_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(ext).map(|stem| (stem, *ext)))
        .unwrap_or((name, ".nii.gz"));
    let parent = input.parent().unwrap_or_else(|| Path::new(""));

    axes.iter()
        .map(|axis| parent.join(format!("{}_w{}{}", stem, axis, ext)))
        .collect()
}

pub fn process_directory(dir: &Path, options: &BatchOptions) -> Result<BatchSummary> {
    if options.axes.is_empty() {
        bail!("At least one component axis is required");
    }
    // Walk an absolute root so inputs and outputs stay valid inside the subprocess directory.
    let ctx = ExecContext::in_dir(dir);
    let root = ctx.base_dir()?;
    if !root.is_dir() {
        bail!("Not a directory: {:?}", root);
    }
    let inputs = find_inputs(&root, &options.suffix);
    info!(directory = %root.display(), count = inputs.len(), "splitting multi-component images");

    let outcomes: Vec<(PathBuf, Result<InvocationReport>)> = inputs
        .par_iter()
        .map(|input| (input.clone(), split_one(input, options, &ctx)))
        .collect();

    let mut summary = BatchSummary::default();
    for (input, outcome) in outcomes {
        match outcome {
            Ok(report) => summary.succeeded.push(report),
            Err(e) => {
                let error = format!("{:#}", e);
                warn!(input = %input.display(), %error, "split failed");
                summary.failed.push(BatchFailure { input, error });
            }
        }
    }
    Ok(summary)
}

fn split_one(input: &Path, options: &BatchOptions, ctx: &ExecContext) -> Result<InvocationReport> {
    let tool = C3dMultiComponentSplit::new()
        .with_program(options.program.as_str())
        .in_file(input)
        .out_files(component_outputs(input, &options.axes));

    let result = tool.run_in(ctx)?;
    let missing = tool.missing_outputs(ctx)?;
    if options.strict_outputs && !missing.is_empty() {
        bail!("{} declared component(s) were not written", missing.len());
    }
    json::build_report(split::DEFAULT_PROGRAM, &result, missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn component_outputs_follow_axis_labels() {
        let axes: Vec<String> = ["x", "y", "z"].iter().map(|s| s.to_string()).collect();
        let outputs = component_outputs(Path::new("/data/sub01/transform1Warp.nii.gz"), &axes);
        assert_eq!(
            outputs,
            vec![
                PathBuf::from("/data/sub01/transform1Warp_wx.nii.gz"),
                PathBuf::from("/data/sub01/transform1Warp_wy.nii.gz"),
                PathBuf::from("/data/sub01/transform1Warp_wz.nii.gz"),
            ]
        );
    }

    #[test]
    fn find_inputs_matches_suffix_recursively() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("sub02");
        fs::create_dir_all(&nested).expect("nested");
        fs::write(dir.path().join("sub01_1Warp.nii.gz"), b"w").expect("write");
        fs::write(nested.join("sub02_1Warp.nii.gz"), b"w").expect("write");
        fs::write(nested.join("sub02_0GenericAffine.mat"), b"a").expect("write");

        let found = find_inputs(dir.path(), "Warp.nii.gz");
        assert_eq!(
            found,
            vec![
                dir.path().join("sub01_1Warp.nii.gz"),
                nested.join("sub02_1Warp.nii.gz"),
            ]
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("not-here");
        let err = process_directory(&missing, &BatchOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Not a directory"));

        let file = dir.path().join("warp.nii.gz");
        fs::write(&file, b"w").expect("write");
        assert!(process_directory(&file, &BatchOptions::default()).is_err());
    }

    #[test]
    fn empty_axes_are_rejected() {
        let dir = tempdir().expect("tempdir");
        let options = BatchOptions {
            axes: Vec::new(),
            ..BatchOptions::default()
        };
        assert!(process_directory(dir.path(), &options).is_err());
    }
}
