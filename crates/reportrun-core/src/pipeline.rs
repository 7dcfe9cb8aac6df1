//! The run pipeline.
//!
//! A single run moves through a fixed sequence of states:
//!
//! `Start -> Invoked -> Classified -> {Promoted | Skipped} -> Logged -> End`
//!
//! There are no retries. Promotion, when it happens, completes or fails
//! observably before the audit entry is written, and the log write is the
//! final step on every path. The only error [`execute`] returns is a
//! failed log write, which breaks the audit guarantee and is fatal.

use std::path::Path;

use crate::audit::AuditLog;
use crate::context::RunContext;
use crate::error::{RunError, RunResult};
use crate::generator::GeneratorCommand;
use crate::outcome::{GeneratorOutcome, OutcomeKind};
use crate::promote::{promote, Promotion};
use crate::verification::VerificationRecord;

/// Process exit codes produced by the orchestrator, so an external
/// scheduler can branch without parsing the run log. 0-2 mirror the
/// generator classification table; 3-5 cover the orchestrator's own
/// failure modes.
pub mod exit_codes {
    /// Report generated, verified, and promoted.
    pub const SUCCESS: u8 = 0;
    /// Generator reported a network failure (status 1).
    pub const NETWORK_ERROR: u8 = 1;
    /// Generator reported a verification failure (status 2).
    pub const VERIFICATION_FAILURE: u8 = 2;
    /// Unclassified generator status, launch failure, or lock contention.
    pub const UNKNOWN_ERROR: u8 = 3;
    /// Promotion I/O failed after a Success classification.
    pub const PROMOTION_FAILED: u8 = 4;
    /// The run log could not be written; the audit guarantee is broken.
    pub const AUDIT_LOG_FAILED: u8 = 5;
}

/// Everything a completed run produced, ready for logging and
/// presentation.
#[derive(Debug)]
pub struct RunReport {
    /// The classified generator outcome.
    pub outcome: GeneratorOutcome,
    /// Set when the generator could not be launched at all; the outcome
    /// is then UnknownError with a sentinel status.
    pub launch_error: Option<String>,
    /// The verification artifact as found on disk.
    pub verification: VerificationRecord,
    /// What promotion copied, when it ran and succeeded.
    pub promotion: Option<Promotion>,
    /// Set when promotion was attempted and failed.
    pub promotion_error: Option<String>,
    /// Short BLAKE3 hash of the dated report on success, when readable.
    pub artifact_hash: Option<String>,
}

impl RunReport {
    /// True when the run fully succeeded, promotion included.
    pub fn succeeded(&self) -> bool {
        self.outcome.kind == OutcomeKind::Success && self.promotion_error.is_none()
    }

    /// The process exit code this run maps to.
    pub fn process_exit_code(&self) -> u8 {
        if self.promotion_error.is_some() {
            return exit_codes::PROMOTION_FAILED;
        }
        match self.outcome.kind {
            OutcomeKind::Success => exit_codes::SUCCESS,
            OutcomeKind::NetworkError => exit_codes::NETWORK_ERROR,
            OutcomeKind::VerificationFailure => exit_codes::VERIFICATION_FAILURE,
            OutcomeKind::UnknownError => exit_codes::UNKNOWN_ERROR,
        }
    }
}

/// Short BLAKE3 content hash of a file, for the audit trail.
fn artifact_hash(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    let hex = blake3::hash(&bytes).to_hex().to_string();
    Ok(hex[..16].to_string())
}

/// Runs the full pipeline for one invocation.
///
/// Every stage converts failure into a classified outcome or a logged
/// note; the returned error is reserved for a failed run-log write.
pub fn execute(ctx: &RunContext, generator: &GeneratorCommand) -> RunResult<RunReport> {
    // Invoked -> Classified. A launch failure is itself classified as
    // UnknownError and recorded; it never bypasses the log write.
    let (outcome, launch_error) = match generator.invoke(ctx) {
        Ok(outcome) => (outcome, None),
        Err(e @ RunError::SpawnFailed { .. }) => (
            GeneratorOutcome {
                exit_code: crate::generator::SIGNALED_EXIT_CODE,
                kind: OutcomeKind::UnknownError,
            },
            Some(e.to_string()),
        ),
        Err(e) => return Err(e),
    };

    let verification = VerificationRecord::read(&ctx.dated_verification_path);

    // Promoted | Skipped. Promotion failure is surfaced in the report and
    // the log rather than aborting the run.
    let (promotion, promotion_error) = if outcome.kind.promotion_allowed() {
        match promote(ctx) {
            Ok(p) => (Some(p), None),
            Err(e) => (None, Some(e.to_string())),
        }
    } else {
        (None, None)
    };

    let hash = match outcome.kind {
        OutcomeKind::Success => artifact_hash(&ctx.dated_report_path).ok(),
        _ => None,
    };

    let report = RunReport {
        outcome,
        launch_error,
        verification,
        promotion,
        promotion_error,
        artifact_hash: hash,
    };

    // Logged. Unconditional and last.
    let mut log = AuditLog::open(&ctx.run_log_path())?;
    log.append_run(&report, &ctx.dated_report_path)?;

    Ok(report)
}
