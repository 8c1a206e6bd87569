//
// main.rs
// C3d-Tools-rs
//
// Binary entry point that hands off execution to the CLI layer.
//
// Thales Matheus Mendonça Santos - October 2026

use c3d_tools::cli;

fn main() -> anyhow::Result<()> {
    // Delegate all argument parsing and dispatching to the CLI module.
    cli::run()
}
