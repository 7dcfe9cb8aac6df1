//! JSON output types for machine-readable CLI output.
//!
//! Structured output for the `--json` flag on the `run` command, so
//! schedulers and other tools can parse the result without scraping the
//! run log.

use serde::{Deserialize, Serialize};

use reportrun_core::{RunContext, RunReport, VerificationRecord};

/// Machine-readable summary of one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunOutput {
    /// True when the run fully succeeded, promotion included.
    pub ok: bool,
    /// Classified outcome kind (success, network_error,
    /// verification_failure, unknown_error).
    pub outcome: String,
    /// Raw generator exit status.
    pub exit_status: i32,
    /// Process exit code the orchestrator will terminate with.
    pub process_exit_code: u8,
    /// Date stamp of this run (YYYY-MM-DD).
    pub run_date: String,
    /// The dated report path handed to the generator.
    pub dated_report: String,
    /// The stable latest-report path.
    pub latest_report: String,
    /// Whether the report was promoted to the latest path.
    pub promoted: bool,
    /// Whether a verification artifact was promoted alongside it.
    pub verification_promoted: bool,
    /// Whether a verification artifact was found on disk.
    pub verification_present: bool,
    /// Path of the persistent run log.
    pub run_log: String,
    /// Short BLAKE3 hash of the report content, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_hash: Option<String>,
    /// Launch failure message, when the generator could not be started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_error: Option<String>,
    /// Promotion failure message, when promotion was attempted and failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_error: Option<String>,
}

impl RunOutput {
    /// Builds the summary from a completed run.
    pub fn from_report(ctx: &RunContext, report: &RunReport) -> Self {
        Self {
            ok: report.succeeded(),
            outcome: report.outcome.kind.as_str().to_string(),
            exit_status: report.outcome.exit_code,
            process_exit_code: report.process_exit_code(),
            run_date: ctx.date_stamp(),
            dated_report: ctx.dated_report_path.display().to_string(),
            latest_report: ctx.latest_report_path.display().to_string(),
            promoted: report.promotion.is_some(),
            verification_promoted: report
                .promotion
                .map(|p| p.verification_promoted)
                .unwrap_or(false),
            verification_present: matches!(
                report.verification,
                VerificationRecord::Present(_) | VerificationRecord::Unreadable(_)
            ),
            run_log: ctx.run_log_path().display().to_string(),
            artifact_hash: report.artifact_hash.clone(),
            launch_error: report.launch_error.clone(),
            promotion_error: report.promotion_error.clone(),
        }
    }
}
