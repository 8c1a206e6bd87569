//
// affine.rs
// C3d-Tools-rs
//
// Wraps `c3d_affine_tool` to convert an ANTs/ITK affine matrix into the FSL convention (e.g. for ICA-AROMA).
//
// Thales Matheus Mendonça Santos - October 2026

use std::path::{Path, PathBuf};

use crate::argspec::{ArgField, ArgValue, Position};
use crate::command::ToolInterface;
use crate::error::{Result, ToolError};
use crate::models::AffineOutputs;
use crate::outputs::absolute_in;

pub const DEFAULT_PROGRAM: &str = "c3d_affine_tool";

/// How the `-itk` option is passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItkTransform {
    /// Bare `-itk` flag.
    Export,
    /// `-itk <path>`.
    Path(PathBuf),
}

/// Inputs for one `c3d_affine_tool` invocation.
///
/// ```no_run
/// use c3d_tools::affine::{C3dAffineTool, ItkTransform};
/// use c3d_tools::command::ToolInterface;
///
/// let tool = C3dAffineTool::new()
///     .reference_file("standard.nii.gz")
///     .source_file("highres.nii.gz")
///     .itk_transform(ItkTransform::Path("transform0GenericAffine.mat".into()))
///     .ras2fsl(true)
///     .out_file("ants_str2Template_affine_flirt.mat");
/// let result = tool.run()?;
/// println!("{}", result.outputs.out_file.display());
/// # Ok::<(), c3d_tools::error::ToolError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct C3dAffineTool {
    program: Option<String>,
    reference_file: Option<PathBuf>,
    source_file: Option<PathBuf>,
    transform_file: Option<PathBuf>,
    itk_transform: Option<ItkTransform>,
    ras2fsl: bool,
    out_file: Option<PathBuf>,
}

impl C3dAffineTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `program` instead of `c3d_affine_tool` found on `PATH`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    pub fn reference_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference_file = Some(path.into());
        self
    }

    pub fn source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_file = Some(path.into());
        self
    }

    pub fn transform_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.transform_file = Some(path.into());
        self
    }

    pub fn itk_transform(mut self, itk: ItkTransform) -> Self {
        self.itk_transform = Some(itk);
        self
    }

    pub fn ras2fsl(mut self, enabled: bool) -> Self {
        self.ras2fsl = enabled;
        self
    }

    pub fn out_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.out_file = Some(path.into());
        self
    }
}

impl ToolInterface for C3dAffineTool {
    type Outputs = AffineOutputs;

    const TOOL: &'static str = DEFAULT_PROGRAM;

    fn program(&self) -> &str {
        self.program.as_deref().unwrap_or(DEFAULT_PROGRAM)
    }

    fn fields(&self) -> Vec<ArgField> {
        let path = |p: &Option<PathBuf>| p.clone().map(ArgValue::Path);
        let itk = self.itk_transform.clone().map(|itk| match itk {
            ItkTransform::Export => ArgValue::Flag(true),
            ItkTransform::Path(p) => ArgValue::Path(p),
        });

        vec![
            ArgField::new("reference_file", "-ref %s", Position::Start(1))
                .must_exist()
                .with_value(path(&self.reference_file)),
            ArgField::new("source_file", "-src %s", Position::Start(2))
                .must_exist()
                .with_value(path(&self.source_file)),
            ArgField::new("transform_file", "%s", Position::Start(3))
                .must_exist()
                .with_value(path(&self.transform_file)),
            ArgField::new("itk_transform", "-itk %s", Position::Start(4)).with_value(itk),
            ArgField::new("ras2fsl", "-ras2fsl", Position::Start(5))
                .with_value(Some(ArgValue::Flag(self.ras2fsl))),
            ArgField::new("out_file", "-o %s", Position::End(0))
                .mandatory()
                .with_value(path(&self.out_file)),
        ]
    }

    fn list_outputs(&self, base_dir: &Path) -> Result<AffineOutputs> {
        let out_file = self
            .out_file
            .as_deref()
            .ok_or(ToolError::MissingMandatory {
                tool: Self::TOOL,
                field: "out_file",
            })?;
        Ok(AffineOutputs {
            out_file: absolute_in(base_dir, out_file),
        })
    }
}
