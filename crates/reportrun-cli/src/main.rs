//! reportrun CLI - Command-line interface for report run orchestration
//!
//! This binary provides commands for running the external report
//! generator and checking the host configuration it depends on.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

// Use modules from the library crate
use reportrun_cli::commands;

/// reportrun - Report Run Orchestrator
#[derive(Parser)]
#[command(name = "reportrun")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the report generator once and record the outcome
    Run {
        /// Directory receiving artifacts and the run log (must exist)
        #[arg(short, long)]
        output_dir: String,

        /// Working directory for the generator (default: the output directory)
        #[arg(short, long)]
        project_dir: Option<String>,

        /// Generator program (absolute path or on PATH)
        #[arg(short, long)]
        generator: String,

        /// Leading argument passed before the output path (repeatable)
        #[arg(long = "generator-arg", value_name = "ARG", allow_hyphen_values = true)]
        generator_args: Vec<String>,

        /// Artifact base name
        #[arg(long, default_value = "report")]
        name: String,

        /// Report file extension
        #[arg(long, default_value = "pdf")]
        ext: String,

        /// Output machine-readable JSON summary (no colored output)
        #[arg(long)]
        json: bool,

        /// Skip the single-run lock on the output directory
        #[arg(long)]
        no_lock: bool,
    },

    /// Check system dependencies and configuration
    Doctor {
        /// Generator program to check
        #[arg(short, long)]
        generator: Option<String>,

        /// Output directory to check
        #[arg(short, long)]
        output_dir: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            output_dir,
            project_dir,
            generator,
            generator_args,
            name,
            ext,
            json,
            no_lock,
        } => commands::run::run(
            &output_dir,
            project_dir.as_deref(),
            &generator,
            &generator_args,
            &name,
            &ext,
            json,
            no_lock,
        ),
        Commands::Doctor {
            generator,
            output_dir,
        } => commands::doctor::run(generator.as_deref(), output_dir.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
