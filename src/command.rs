//
// command.rs
// C3d-Tools-rs
//
// Shared invocation layer: renders a wrapper's fields into a command line, runs it as a blocking subprocess, and hands back the collected outputs.
//
// Thales Matheus Mendonça Santos - October 2026

use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info};

use crate::argspec::{build_args, ArgField};
use crate::error::{Result, ToolError};
use crate::models::{InvocationResult, RuntimeInfo};
use crate::outputs::absolute_in;

/// Per-invocation settings supplied by the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct ExecContext {
    working_dir: Option<PathBuf>,
}

impl ExecContext {
    /// Run in `dir` and resolve relative inputs/outputs against it.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
        }
    }

    /// Absolute directory the subprocess runs in; defaults to the process working directory.
    pub fn base_dir(&self) -> Result<PathBuf> {
        let cwd = || {
            env::current_dir().map_err(|source| ToolError::Io {
                path: PathBuf::from("."),
                source,
            })
        };
        match &self.working_dir {
            Some(dir) if dir.is_absolute() => Ok(absolute_in(dir, Path::new(""))),
            Some(dir) => Ok(absolute_in(&cwd()?, dir)),
            None => cwd(),
        }
    }
}

/// A fully rendered, validated command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<OsString>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Spawn the program and block until it exits.
    ///
    /// A non-zero exit becomes [`ToolError::Execution`] carrying this command line.
    pub fn execute(&self, ctx: &ExecContext) -> Result<RuntimeInfo> {
        let working_dir = ctx.base_dir()?;
        debug!(cmdline = %self, dir = %working_dir.display(), "spawning");

        let started_at = Utc::now();
        let clock = Instant::now();
        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&working_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ToolError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let duration_ms = clock.elapsed().as_millis() as u64;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(ToolError::Execution {
                cmdline: self.to_string(),
                code: output.status.code(),
                stderr,
            });
        }

        info!(program = %self.program, duration_ms, "command finished");
        Ok(RuntimeInfo {
            program: self.program.clone(),
            working_dir,
            returncode: output.status.code().unwrap_or_default(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr,
            started_at,
            duration_ms,
        })
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Uniform "set inputs, run, read outputs" contract implemented by every wrapper.
pub trait ToolInterface {
    type Outputs;

    /// Name used in validation errors.
    const TOOL: &'static str;

    /// Executable to spawn.
    fn program(&self) -> &str;

    /// Declared fields with their current values.
    fn fields(&self) -> Vec<ArgField>;

    /// Collect outputs once the subprocess exited successfully.
    fn list_outputs(&self, base_dir: &Path) -> Result<Self::Outputs>;

    fn command_line_in(&self, ctx: &ExecContext) -> Result<CommandLine> {
        let base_dir = ctx.base_dir()?;
        let args = build_args(Self::TOOL, &self.fields(), &base_dir)?;
        Ok(CommandLine::new(self.program(), args))
    }

    /// Validate inputs and render the command line against the current directory.
    fn command_line(&self) -> Result<CommandLine> {
        self.command_line_in(&ExecContext::default())
    }

    fn run_in(&self, ctx: &ExecContext) -> Result<InvocationResult<Self::Outputs>> {
        let cmdline = self.command_line_in(ctx)?;
        let runtime = cmdline.execute(ctx)?;
        let outputs = self.list_outputs(&runtime.working_dir)?;
        Ok(InvocationResult {
            cmdline: cmdline.to_string(),
            runtime,
            outputs,
        })
    }

    fn run(&self) -> Result<InvocationResult<Self::Outputs>> {
        self.run_in(&ExecContext::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_program_and_args() {
        let cmd = CommandLine::new("c3d", vec!["-mcs".into(), "in.nii.gz".into()]);
        assert_eq!(cmd.to_string(), "c3d -mcs in.nii.gz");
        assert_eq!(cmd.program(), "c3d");
        assert_eq!(cmd.args().len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn base_dir_prefers_explicit_working_dir() {
        let ctx = ExecContext::in_dir("/data/./subject01");
        assert_eq!(ctx.base_dir().expect("base"), PathBuf::from("/data/subject01"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_reports_exit_code_of_failing_program() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cmd = CommandLine::new("false", vec!["-o".into(), "x.mat".into()]);
        match cmd.execute(&ExecContext::in_dir(dir.path())) {
            Err(ToolError::Execution { cmdline, code, .. }) => {
                assert_eq!(cmdline, "false -o x.mat");
                assert_eq!(code, Some(1));
            }
            other => panic!("expected execution error, got {:?}", other),
        }
    }

    #[test]
    fn execute_surfaces_spawn_failures() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cmd = CommandLine::new("/nonexistent/c3d", Vec::new());
        let err = cmd.execute(&ExecContext::in_dir(dir.path())).unwrap_err();
        assert!(matches!(err, ToolError::Spawn { .. }));
    }
}
