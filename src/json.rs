//
// json.rs
// C3d-Tools-rs
//
// Turns invocation results into JSON reports with output fingerprints, printed to stdout or saved to disk.
//
// Thales Matheus Mendonça Santos - October 2026

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{InvocationReport, InvocationResult, OutputFiles};
use crate::outputs;

/// Build a report for a finished invocation, fingerprinting every reported output.
pub fn build_report<O: OutputFiles>(
    tool: &str,
    result: &InvocationResult<O>,
    missing_outputs: Vec<PathBuf>,
) -> Result<InvocationReport> {
    let records = result
        .outputs
        .files()
        .into_iter()
        .map(outputs::record)
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to fingerprint outputs")?;

    Ok(InvocationReport {
        tool: tool.to_string(),
        cmdline: result.cmdline.clone(),
        runtime: result.runtime.clone(),
        outputs: records,
        missing_outputs,
    })
}

/// Pretty JSON without touching the filesystem.
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize to JSON")
}

/// Write the report to `output`, or print it when no path (or `-`) is given.
pub fn to_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json_string = to_json_string(value)?;

    match output {
        Some(path) if path != Path::new("-") => {
            std::fs::write(path, json_string).context("Failed to write JSON to file")?;
            println!("Report saved to {:?}", path);
        }
        _ => {
            println!("{}", json_string);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AffineOutputs, RuntimeInfo};
    use chrono::Utc;
    use serde_json::Value;
    use tempfile::tempdir;

    fn runtime(dir: &Path) -> RuntimeInfo {
        RuntimeInfo {
            program: "c3d_affine_tool".into(),
            working_dir: dir.to_path_buf(),
            returncode: 0,
            stdout: String::new(),
            stderr: String::new(),
            started_at: Utc::now(),
            duration_ms: 5,
        }
    }

    #[test]
    fn report_records_unproduced_affine_output_without_digest() {
        let dir = tempdir().expect("tempdir");
        let result = InvocationResult {
            cmdline: "c3d_affine_tool -o out.mat".to_string(),
            runtime: runtime(dir.path()),
            outputs: AffineOutputs {
                out_file: dir.path().join("out.mat"),
            },
        };

        let report = build_report("c3d_affine_tool", &result, Vec::new()).expect("report");
        assert_eq!(report.outputs.len(), 1);
        assert!(!report.outputs[0].exists);

        let value: Value = serde_json::from_str(&to_json_string(&report).expect("json")).expect("parse");
        assert_eq!(value["tool"], "c3d_affine_tool");
        assert_eq!(value["runtime"]["returncode"], 0);
        assert!(value.get("missing_outputs").is_none());
    }

    #[test]
    fn to_json_writes_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        to_json(&vec!["a", "b"], Some(path.as_path())).expect("write");
        let written = std::fs::read_to_string(&path).expect("read");
        let value: Value = serde_json::from_str(&written).expect("parse");
        assert_eq!(value, serde_json::json!(["a", "b"]));
    }
}
