//
// cli.rs
// C3d-Tools-rs
//
// Defines the CLI surface with Clap and dispatches user-selected commands to the wrappers, acting as a small orchestrator.
//
// Thales Matheus Mendonça Santos - October 2026

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

use crate::affine::{self, C3dAffineTool, ItkTransform};
use crate::batch::{self, BatchOptions};
use crate::command::{ExecContext, ToolInterface};
use crate::json;
use crate::models::OutputFiles;
use crate::split::{self, C3dMultiComponentSplit};

/// Command-line interface glue code: defines the available verbs and dispatches to modules.
#[derive(Parser)]
#[command(name = "c3d-tools")]
#[command(about = "Typed wrappers around the Convert3D tools", long_about = None)]
pub struct Cli {
    /// Directory the tools run in; relative paths resolve against it
    #[arg(long, global = true)]
    pub workdir: Option<PathBuf>,
    /// Print the command line without running it
    #[arg(long, global = true)]
    pub dry_run: bool,
    /// Write a JSON report to FILE (`-` for stdout)
    #[arg(long, global = true, value_name = "FILE")]
    pub report: Option<PathBuf>,
    /// Executable used for affine conversions
    #[arg(long, global = true, env = "C3D_AFFINE_TOOL", default_value = affine::DEFAULT_PROGRAM)]
    pub affine_tool: String,
    /// Executable used for multi-component splits
    #[arg(long, global = true, env = "C3D_BIN", default_value = split::DEFAULT_PROGRAM)]
    pub c3d: String,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert an ITK/ANTs affine into another convention (c3d_affine_tool)
    Affine {
        #[arg(long = "ref", value_name = "FILE")]
        reference: Option<PathBuf>,
        #[arg(long = "src", value_name = "FILE")]
        source: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        transform: Option<PathBuf>,
        /// Export ITK transform; pass a FILE to read it from there
        #[arg(long, num_args = 0..=1, value_name = "FILE")]
        itk: Option<Option<PathBuf>>,
        #[arg(long)]
        ras2fsl: bool,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Split a multi-component image into one file per component (c3d -mcs)
    Split {
        input: PathBuf,
        #[arg(short, long = "output", num_args = 1.., required = true)]
        outputs: Vec<PathBuf>,
        /// Fail when a declared output was not written
        #[arg(long)]
        strict_outputs: bool,
    },
    /// Split every matching warp field under a directory
    BatchSplit {
        #[arg(short, long)]
        directory: PathBuf,
        #[arg(long, default_value = "Warp.nii.gz")]
        suffix: String,
        #[arg(long, value_delimiter = ',', default_value = "x,y,z")]
        axes: Vec<String>,
        #[arg(long)]
        strict_outputs: bool,
    },
}

pub fn run() -> anyhow::Result<()> {
    // Parse the raw CLI arguments once and dispatch to a subcommand handler.
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    execute(cli)
}

/// Dispatch an already parsed command line.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    if cli.dry_run && cli.report.is_some() {
        bail!("--dry-run cannot be combined with --report");
    }

    let ctx = match &cli.workdir {
        Some(dir) => ExecContext::in_dir(dir),
        None => ExecContext::default(),
    };

    match &cli.command {
        Commands::Affine {
            reference,
            source,
            transform,
            itk,
            ras2fsl,
            output,
        } => {
            let mut tool = C3dAffineTool::new()
                .with_program(cli.affine_tool.as_str())
                .ras2fsl(*ras2fsl)
                .out_file(output);
            if let Some(path) = reference {
                tool = tool.reference_file(path);
            }
            if let Some(path) = source {
                tool = tool.source_file(path);
            }
            if let Some(path) = transform {
                tool = tool.transform_file(path);
            }
            if let Some(itk) = itk {
                tool = tool.itk_transform(match itk {
                    Some(path) => ItkTransform::Path(path.clone()),
                    None => ItkTransform::Export,
                });
            }
            invoke(&cli, &ctx, &tool)?;
        }
        Commands::Split {
            input,
            outputs,
            strict_outputs,
        } => {
            let tool = C3dMultiComponentSplit::new()
                .with_program(cli.c3d.as_str())
                .in_file(input)
                .out_files(outputs.iter().cloned());
            let missing = invoke(&cli, &ctx, &tool)?;
            if *strict_outputs && !missing.is_empty() {
                bail!(
                    "{} declared output(s) were not written: {:?}",
                    missing.len(),
                    missing
                );
            }
        }
        Commands::BatchSplit {
            directory,
            suffix,
            axes,
            strict_outputs,
        } => {
            if cli.dry_run {
                bail!("--dry-run is not supported for batch-split");
            }
            let directory = match &cli.workdir {
                Some(workdir) if directory.is_relative() => workdir.join(directory),
                _ => directory.clone(),
            };
            let options = BatchOptions {
                suffix: suffix.clone(),
                axes: axes.clone(),
                program: cli.c3d.clone(),
                strict_outputs: *strict_outputs,
            };
            let summary = batch::process_directory(&directory, &options)?;
            status(
                &cli,
                format_args!(
                    "Batch split in {:?}: {} succeeded, {} failed",
                    directory,
                    summary.succeeded.len(),
                    summary.failed.len()
                ),
            );
            for failure in &summary.failed {
                eprintln!("Error in {:?}: {}", failure.input, failure.error);
            }
            if let Some(report) = &cli.report {
                json::to_json(&summary, Some(report.as_path()))?;
            }
            if !summary.failed.is_empty() {
                bail!("{} input(s) failed", summary.failed.len());
            }
        }
    }

    Ok(())
}

/// Human-readable progress line; kept off stdout when the JSON report goes there.
fn status(cli: &Cli, line: std::fmt::Arguments<'_>) {
    let report_on_stdout = cli
        .report
        .as_deref()
        .map_or(false, |path| path == Path::new("-"));
    if report_on_stdout {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

/// Shared dry-run / run / report flow for any wrapper.
///
/// Returns the declared outputs that were not produced (always empty for dry runs).
fn invoke<T>(cli: &Cli, ctx: &ExecContext, tool: &T) -> anyhow::Result<Vec<PathBuf>>
where
    T: ToolInterface + DeclaredOutputs,
    T::Outputs: OutputFiles,
{
    if cli.dry_run {
        println!("{}", tool.command_line_in(ctx)?);
        return Ok(Vec::new());
    }

    let result = tool
        .run_in(ctx)
        .with_context(|| format!("{} failed", T::TOOL))?;
    status(cli, format_args!("Command: {}", result.cmdline));
    for file in result.outputs.files() {
        status(cli, format_args!("Output: {}", file.display()));
    }

    let missing = tool.missing_after_run(ctx)?;
    for file in &missing {
        status(cli, format_args!("Not written: {}", file.display()));
    }

    if let Some(report) = &cli.report {
        let report_value = json::build_report(T::TOOL, &result, missing.clone())?;
        json::to_json(&report_value, Some(report.as_path()))?;
    }
    Ok(missing)
}

/// Declared outputs that a wrapper reports as absent after running.
trait DeclaredOutputs {
    fn missing_after_run(&self, ctx: &ExecContext) -> anyhow::Result<Vec<PathBuf>>;
}

impl DeclaredOutputs for C3dAffineTool {
    fn missing_after_run(&self, _ctx: &ExecContext) -> anyhow::Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }
}

impl DeclaredOutputs for C3dMultiComponentSplit {
    fn missing_after_run(&self, ctx: &ExecContext) -> anyhow::Result<Vec<PathBuf>> {
        Ok(self.missing_outputs(ctx)?)
    }
}

fn init_logging(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}
