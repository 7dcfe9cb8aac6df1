//! Doctor command implementation
//!
//! Checks system dependencies and configuration.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

/// Run the doctor command
///
/// Checks:
/// - Generator program availability
/// - Output directory existence and write permissions
/// - Version information
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run(generator: Option<&str>, output_dir: Option<&str>) -> Result<ExitCode> {
    println!("{}", "reportrun Doctor".cyan().bold());
    println!("{}", "================".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!(
        "  {} reportrun-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("{}", "Generator:".bold());
    match generator {
        Some(program) => match check_generator(program) {
            GeneratorStatus::Found(path) => {
                println!("  {} {} ({})", "ok".green(), program, path.dimmed());
            }
            GeneratorStatus::NotFound => {
                println!("  {} {} not found", "!!".red(), program);
                println!(
                    "     {}",
                    "The generator must be an absolute path or on PATH.".dimmed()
                );
                all_ok = false;
            }
        },
        None => {
            println!(
                "  {} no generator configured (pass --generator to check one)",
                "!!".yellow()
            );
        }
    }
    println!();

    println!("{}", "Output directory:".bold());
    match output_dir {
        Some(dir) => {
            if !check_dir_exists(dir) {
                println!("  {} {} does not exist", "!!".red(), dir);
                println!(
                    "     {}",
                    "The output directory must be created before the first run.".dimmed()
                );
                all_ok = false;
            } else if check_dir_writable(dir) {
                println!("  {} {} is writable", "ok".green(), dir);
            } else {
                println!("  {} cannot write to {}", "!!".red(), dir);
                all_ok = false;
            }
        }
        None => {
            println!(
                "  {} no output directory configured (pass --output-dir to check one)",
                "!!".yellow()
            );
        }
    }
    println!();

    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "WARNING".yellow().bold()
        );
        Ok(ExitCode::from(1))
    }
}

/// Status of the generator program check
enum GeneratorStatus {
    Found(String),
    NotFound,
}

/// Resolve the generator program: an existing path, or a PATH lookup.
fn check_generator(program: &str) -> GeneratorStatus {
    let as_path = Path::new(program);
    if as_path.is_absolute() || program.contains(std::path::MAIN_SEPARATOR) {
        if as_path.exists() {
            return GeneratorStatus::Found(program.to_string());
        }
        return GeneratorStatus::NotFound;
    }

    match which::which(program) {
        Ok(path) => GeneratorStatus::Found(path.display().to_string()),
        Err(_) => GeneratorStatus::NotFound,
    }
}

fn check_dir_exists(dir: &str) -> bool {
    Path::new(dir).is_dir()
}

/// Probe write access with a throwaway file.
fn check_dir_writable(dir: &str) -> bool {
    let test_file = Path::new(dir).join(".reportrun_write_test");
    match std::fs::write(&test_file, "test") {
        Ok(_) => {
            let _ = std::fs::remove_file(&test_file);
            true
        }
        Err(_) => false,
    }
}
