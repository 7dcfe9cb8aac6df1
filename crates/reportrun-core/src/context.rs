//! Run identity and artifact path resolution.
//!
//! A [`RunContext`] is built once at the start of a run and is immutable
//! afterwards. It performs no I/O: missing or unwritable directories are
//! surfaced later by the file operations that actually touch them.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Suffix replacing the report extension for verification artifacts.
pub const VERIFICATION_SUFFIX: &str = "verification.txt";

/// File name of the persistent run log inside the output directory.
pub const RUN_LOG_FILENAME: &str = "run_log.txt";

/// The identity and file layout of a single run.
///
/// Naming scheme, for base name `name` and extension `ext`:
///
/// - dated report:        `{output_dir}/{name}_{YYYY-MM-DD}.{ext}`
/// - latest report:       `{output_dir}/{name}_report.{ext}`
/// - dated verification:  `{output_dir}/{name}_{YYYY-MM-DD}.verification.txt`
/// - latest verification: `{output_dir}/{name}_report.verification.txt`
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Calendar date of the run, derived from the run's start time.
    pub run_date: NaiveDate,
    /// Directory receiving all artifacts and the run log.
    pub output_dir: PathBuf,
    /// Working directory for the generator subprocess.
    pub project_dir: PathBuf,
    /// Historical, date-stamped report path (the generator's output target).
    pub dated_report_path: PathBuf,
    /// Stable pointer to the most recent successful report.
    pub latest_report_path: PathBuf,
    /// Date-stamped verification artifact the generator may write.
    pub dated_verification_path: PathBuf,
    /// Stable pointer to the most recent successful verification artifact.
    pub latest_verification_path: PathBuf,
}

impl RunContext {
    /// Builds a context for the given run date.
    pub fn new(
        output_dir: impl Into<PathBuf>,
        project_dir: impl Into<PathBuf>,
        name: &str,
        ext: &str,
        run_date: NaiveDate,
    ) -> Self {
        let output_dir = output_dir.into();
        let stamp = run_date.format("%Y-%m-%d").to_string();

        let dated_report_path = output_dir.join(format!("{}_{}.{}", name, stamp, ext));
        let dated_verification_path =
            output_dir.join(format!("{}_{}.{}", name, stamp, VERIFICATION_SUFFIX));
        let latest_report_path = output_dir.join(format!("{}_report.{}", name, ext));
        let latest_verification_path =
            output_dir.join(format!("{}_report.{}", name, VERIFICATION_SUFFIX));

        Self {
            run_date,
            output_dir,
            project_dir: project_dir.into(),
            dated_report_path,
            latest_report_path,
            dated_verification_path,
            latest_verification_path,
        }
    }

    /// Builds a context stamped with today's local date.
    pub fn for_today(
        output_dir: impl Into<PathBuf>,
        project_dir: impl Into<PathBuf>,
        name: &str,
        ext: &str,
    ) -> Self {
        Self::new(
            output_dir,
            project_dir,
            name,
            ext,
            chrono::Local::now().date_naive(),
        )
    }

    /// The `YYYY-MM-DD` stamp used in dated artifact names.
    pub fn date_stamp(&self) -> String {
        self.run_date.format("%Y-%m-%d").to_string()
    }

    /// Path of the persistent run log shared across all runs.
    pub fn run_log_path(&self) -> PathBuf {
        self.output_dir.join(RUN_LOG_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_context() -> RunContext {
        RunContext::new(
            "/srv/reports",
            "/srv/advisory",
            "travel_advisory",
            "pdf",
            NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        )
    }

    #[test]
    fn test_dated_paths_carry_the_date_stamp() {
        let ctx = sample_context();
        assert_eq!(
            ctx.dated_report_path,
            Path::new("/srv/reports/travel_advisory_2024-03-09.pdf")
        );
        assert_eq!(
            ctx.dated_verification_path,
            Path::new("/srv/reports/travel_advisory_2024-03-09.verification.txt")
        );
    }

    #[test]
    fn test_latest_paths_are_date_independent() {
        let ctx = sample_context();
        assert_eq!(
            ctx.latest_report_path,
            Path::new("/srv/reports/travel_advisory_report.pdf")
        );
        assert_eq!(
            ctx.latest_verification_path,
            Path::new("/srv/reports/travel_advisory_report.verification.txt")
        );
    }

    #[test]
    fn test_date_stamp_format() {
        let ctx = sample_context();
        assert_eq!(ctx.date_stamp(), "2024-03-09");
        // Single-digit fields are zero padded.
        let ctx = RunContext::new(
            "/out",
            "/out",
            "r",
            "pdf",
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        );
        assert_eq!(ctx.date_stamp(), "2024-01-02");
    }

    #[test]
    fn test_run_log_lives_in_output_dir() {
        let ctx = sample_context();
        assert_eq!(ctx.run_log_path(), Path::new("/srv/reports/run_log.txt"));
    }

}
