//
// error.rs
// C3d-Tools-rs
//
// Error taxonomy shared by the wrappers: validation failures raised before any process spawns, and execution failures carrying the failing command line.
//
// Thales Matheus Mendonça Santos - October 2026

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = ToolError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ToolError {
    /// A field marked mandatory was never set.
    #[error("{tool}: mandatory input `{field}` is not set")]
    MissingMandatory {
        tool: &'static str,
        field: &'static str,
    },

    /// A field that must reference an existing file points nowhere.
    #[error("input `{field}` references a missing file: {}", path.display())]
    MissingInput { field: &'static str, path: PathBuf },

    /// The subprocess ran but reported failure.
    #[error("command `{cmdline}` failed with {}", describe_code(*code))]
    Execution {
        cmdline: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to start `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("filesystem error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ToolError {
    /// True for errors raised before the subprocess was launched because of bad inputs.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ToolError::MissingMandatory { .. } | ToolError::MissingInput { .. }
        )
    }
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    }
}
