//! Run command implementation
//!
//! Invokes the external report generator once, classifies its exit
//! status, promotes verified artifacts, and appends the audit entry.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use reportrun_core::{
    execute, exit_codes, GeneratorCommand, OutcomeKind, RunContext, RunError, RunLock, RunReport,
};

use super::json_output::RunOutput;

/// Run the run command
///
/// # Arguments
/// * `output_dir` - Pre-existing directory receiving artifacts and the run log
/// * `project_dir` - Working directory for the generator (default: output dir)
/// * `generator` - Generator program
/// * `generator_args` - Leading arguments passed before the output path
/// * `name` - Artifact base name
/// * `ext` - Report extension
/// * `json_output` - Whether to output machine-readable JSON
/// * `no_lock` - Skip the single-run lock
///
/// # Returns
/// Exit code: 0 success, 1 network error, 2 verification failure,
/// 3 unknown error or lock contention, 4 promotion failure, 5 run-log
/// write failure
pub fn run(
    output_dir: &str,
    project_dir: Option<&str>,
    generator: &str,
    generator_args: &[String],
    name: &str,
    ext: &str,
    json_output: bool,
    no_lock: bool,
) -> Result<ExitCode> {
    let project_dir = project_dir.unwrap_or(output_dir);
    let ctx = RunContext::for_today(output_dir, project_dir, name, ext);
    let gen = GeneratorCommand::new(generator).args(generator_args.iter().cloned());

    // Take the lock before anything else: a concurrent run owns the run
    // log and the latest paths, so this run must not touch either.
    let _lock = if no_lock {
        None
    } else {
        match RunLock::acquire(&ctx.output_dir) {
            Ok(lock) => Some(lock),
            Err(e) => {
                if json_output {
                    let err = serde_json::json!({
                        "ok": false,
                        "error": e.to_string(),
                        "process_exit_code": exit_codes::UNKNOWN_ERROR,
                    });
                    println!("{}", serde_json::to_string_pretty(&err)?);
                } else {
                    eprintln!("{} {}", "FAILED".red().bold(), e);
                }
                return Ok(ExitCode::from(exit_codes::UNKNOWN_ERROR));
            }
        }
    };

    if json_output {
        run_json(&ctx, &gen)
    } else {
        run_human(&ctx, &gen)
    }
}

/// Run with human-readable (colored) output
fn run_human(ctx: &RunContext, gen: &GeneratorCommand) -> Result<ExitCode> {
    println!(
        "{} {}",
        "Generator:".cyan().bold(),
        gen.program().display()
    );
    println!(
        "{} {}",
        "Output dir:".cyan().bold(),
        ctx.output_dir.display()
    );
    println!(
        "{} {}",
        "Dated report:".dimmed(),
        ctx.dated_report_path.display()
    );

    match execute(ctx, gen) {
        Ok(report) => {
            print_summary(ctx, &report);
            Ok(ExitCode::from(report.process_exit_code()))
        }
        Err(e @ RunError::AuditLog { .. }) => {
            eprintln!("{} {}", "FAILED".red().bold(), e);
            Ok(ExitCode::from(exit_codes::AUDIT_LOG_FAILED))
        }
        Err(e) => Err(e.into()),
    }
}

/// Run with machine-readable JSON output
fn run_json(ctx: &RunContext, gen: &GeneratorCommand) -> Result<ExitCode> {
    match execute(ctx, gen) {
        Ok(report) => {
            let output = RunOutput::from_report(ctx, &report);
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::from(report.process_exit_code()))
        }
        Err(e @ RunError::AuditLog { .. }) => {
            let err = serde_json::json!({
                "ok": false,
                "error": e.to_string(),
                "process_exit_code": exit_codes::AUDIT_LOG_FAILED,
            });
            println!("{}", serde_json::to_string_pretty(&err)?);
            Ok(ExitCode::from(exit_codes::AUDIT_LOG_FAILED))
        }
        Err(e) => Err(e.into()),
    }
}

fn print_summary(ctx: &RunContext, report: &RunReport) {
    println!();
    match report.outcome.kind {
        OutcomeKind::Success => {
            if let Some(err) = &report.promotion_error {
                println!(
                    "{} report generated but promotion failed: {}",
                    "FAILED".red().bold(),
                    err
                );
            } else {
                println!(
                    "{} report promoted to {}",
                    "SUCCESS".green().bold(),
                    ctx.latest_report_path.display()
                );
                if let Some(hash) = &report.artifact_hash {
                    println!("{} blake3 {}", "Content:".dimmed(), hash);
                }
            }
        }
        OutcomeKind::NetworkError => {
            println!(
                "{} network failure (generator status {}); nothing promoted",
                "FAILED".red().bold(),
                report.outcome.exit_code
            );
        }
        OutcomeKind::VerificationFailure => {
            println!(
                "{} report verification failed; diagnostics captured in the run log",
                "FAILED".red().bold()
            );
        }
        OutcomeKind::UnknownError => match &report.launch_error {
            Some(err) => println!("{} {}", "FAILED".red().bold(), err),
            None => println!(
                "{} generator exited with unclassified status {}",
                "FAILED".red().bold(),
                report.outcome.exit_code
            ),
        },
    }
    println!("{} {}", "Run log:".dimmed(), ctx.run_log_path().display());
}
