//
// split.rs
// C3d-Tools-rs
//
// Wraps `c3d -mcs ... -oo ...` to split a multi-component image (e.g. an ANTs warp field) into one file per component.
//
// Thales Matheus Mendonça Santos - October 2026

use std::path::{Path, PathBuf};

use crate::argspec::{ArgField, ArgValue, Position};
use crate::command::{ExecContext, ToolInterface};
use crate::error::Result;
use crate::models::SplitOutputs;
use crate::outputs::{existing_outputs, missing_outputs};

pub const DEFAULT_PROGRAM: &str = "c3d";

/// Inputs for one `c3d -mcs` split. Output names are always supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct C3dMultiComponentSplit {
    program: Option<String>,
    in_file: Option<PathBuf>,
    out_files: Vec<PathBuf>,
}

impl C3dMultiComponentSplit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    pub fn in_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.in_file = Some(path.into());
        self
    }

    /// One path per component, in the order `c3d` writes them.
    pub fn out_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.out_files = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Declared outputs not present on disk, resolved against the context directory.
    pub fn missing_outputs(&self, ctx: &ExecContext) -> Result<Vec<PathBuf>> {
        Ok(missing_outputs(&ctx.base_dir()?, &self.out_files))
    }
}

impl ToolInterface for C3dMultiComponentSplit {
    type Outputs = SplitOutputs;

    const TOOL: &'static str = DEFAULT_PROGRAM;

    fn program(&self) -> &str {
        self.program.as_deref().unwrap_or(DEFAULT_PROGRAM)
    }

    fn fields(&self) -> Vec<ArgField> {
        vec![
            ArgField::new("in_file", "-mcs %s", Position::Start(1))
                .mandatory()
                .with_value(self.in_file.clone().map(ArgValue::Path)),
            ArgField::new("out_files", "-oo %s", Position::End(0))
                .mandatory()
                .with_value(Some(ArgValue::Paths(self.out_files.clone()))),
        ]
    }

    /// Outputs the tool did not write are left out rather than reported as errors.
    fn list_outputs(&self, base_dir: &Path) -> Result<SplitOutputs> {
        Ok(SplitOutputs {
            out_files: existing_outputs(base_dir, &self.out_files),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use std::fs;
    use tempfile::tempdir;

    const WARP_COMPONENTS: [&str; 3] = [
        "ants_str2Template_wx.nii.gz",
        "ants_str2Template_wy.nii.gz",
        "ants_str2Template_wz.nii.gz",
    ];

    #[test]
    fn renders_documented_warp_split() {
        let dir = tempdir().expect("tempdir");
        let tool = C3dMultiComponentSplit::new()
            .in_file("transform1Warp.nii.gz")
            .out_files(WARP_COMPONENTS);

        let cmd = tool
            .command_line_in(&ExecContext::in_dir(dir.path()))
            .expect("command line");
        assert_eq!(
            cmd.to_string(),
            "c3d -mcs transform1Warp.nii.gz -oo ants_str2Template_wx.nii.gz \
             ants_str2Template_wy.nii.gz ants_str2Template_wz.nii.gz"
        );
    }

    #[test]
    fn in_file_and_out_files_are_mandatory() {
        let dir = tempdir().expect("tempdir");
        let ctx = ExecContext::in_dir(dir.path());

        let no_input = C3dMultiComponentSplit::new().out_files(WARP_COMPONENTS);
        assert!(matches!(
            no_input.command_line_in(&ctx),
            Err(ToolError::MissingMandatory {
                field: "in_file",
                ..
            })
        ));

        let no_outputs = C3dMultiComponentSplit::new().in_file("warp.nii.gz");
        assert!(matches!(
            no_outputs.command_line_in(&ctx),
            Err(ToolError::MissingMandatory {
                field: "out_files",
                ..
            })
        ));
    }

    #[test]
    fn list_outputs_keeps_only_produced_components() {
        let dir = tempdir().expect("tempdir");
        fs::write(dir.path().join(WARP_COMPONENTS[0]), b"x").expect("write wx");
        fs::write(dir.path().join(WARP_COMPONENTS[2]), b"z").expect("write wz");

        let tool = C3dMultiComponentSplit::new()
            .in_file("transform1Warp.nii.gz")
            .out_files(WARP_COMPONENTS);
        let outputs = tool.list_outputs(dir.path()).expect("outputs");
        assert_eq!(
            outputs.out_files,
            vec![
                dir.path().join(WARP_COMPONENTS[0]),
                dir.path().join(WARP_COMPONENTS[2]),
            ]
        );

        let missing = tool
            .missing_outputs(&ExecContext::in_dir(dir.path()))
            .expect("missing");
        assert_eq!(missing, vec![dir.path().join(WARP_COMPONENTS[1])]);
    }
}
