//
// lib.rs
// C3d-Tools-rs
//
// Exposes the Convert3D wrappers, the shared invocation layer, and the CLI entry point for both binary and library consumers.
//
// Thales Matheus Mendonça Santos - October 2026

// Public surface of the library: one module per wrapped tool plus the shared plumbing they sit on.
pub mod affine;
pub mod argspec;
pub mod batch;
pub mod cli;
pub mod command;
pub mod error;
pub mod json;
pub mod models;
pub mod outputs;
pub mod split;

pub use affine::{C3dAffineTool, ItkTransform};
pub use cli::{run as run_cli, Cli, Commands};
pub use command::{CommandLine, ExecContext, ToolInterface};
pub use error::ToolError;
pub use split::C3dMultiComponentSplit;
