//! The append-only run log.
//!
//! Every invocation of the pipeline appends exactly one entry to
//! `run_log.txt`, whatever the outcome. The log is the audit trail: it is
//! never rewritten or truncated by this system, and verification content
//! is deliberately recorded twice (once in the outcome-specific block,
//! once under the generic heading) for audit completeness.
//!
//! The handle is scoped to a single run: open in append mode, write the
//! entry, flush, close. Orchestrator-emitted lines carry a human-readable
//! timestamp prefix; generator-produced verification content is quoted
//! verbatim so the trail preserves it byte-for-byte.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{RunError, RunResult};
use crate::outcome::OutcomeKind;
use crate::pipeline::RunReport;
use crate::verification::VerificationRecord;

/// Opening delimiter of the verification block in a FAILURE entry.
pub const VERIFICATION_OPEN: &str = "--- verification output ---";

/// Closing delimiter of the verification block in a FAILURE entry.
pub const VERIFICATION_CLOSE: &str = "--- end verification output ---";

/// Heading of the outcome-independent verification record.
pub const VERIFICATION_HEADING: &str = "Verification log:";

/// Note written when a verification artifact was expected but absent.
pub const NO_VERIFICATION_NOTE: &str = "no verification file found";

/// Scoped, append-only handle on the run log.
pub struct AuditLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl AuditLog {
    /// Opens the run log in append mode, creating it on first use.
    pub fn open(path: &Path) -> RunResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| RunError::audit_log(path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    /// Path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn timestamp() -> String {
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Writes one timestamped line.
    fn line(&mut self, message: &str) -> RunResult<()> {
        writeln!(self.writer, "[{}] {}", Self::timestamp(), message)
            .map_err(|e| RunError::audit_log(&self.path, e))
    }

    /// Writes generator-produced text verbatim, ensuring it ends with a
    /// newline so delimiters stay on their own lines.
    fn verbatim(&mut self, text: &str) -> RunResult<()> {
        self.writer
            .write_all(text.as_bytes())
            .and_then(|_| {
                if text.ends_with('\n') {
                    Ok(())
                } else {
                    self.writer.write_all(b"\n")
                }
            })
            .map_err(|e| RunError::audit_log(&self.path, e))
    }

    /// Appends the full entry for a completed run and flushes.
    ///
    /// Layout per outcome:
    /// - Success: one `SUCCESS:` line naming the dated report (with a
    ///   BLAKE3 content hash when available), plus an `ERROR:` line if
    ///   promotion failed afterwards.
    /// - VerificationFailure: one `FAILURE:` line, then the verification
    ///   content (or an absence note) between delimiters.
    /// - NetworkError / UnknownError: one `ERROR:` line naming the raw
    ///   exit status, or the launch failure message.
    ///
    /// The generic `Verification log:` block always follows.
    pub fn append_run(&mut self, report: &RunReport, dated_report: &Path) -> RunResult<()> {
        match report.outcome.kind {
            OutcomeKind::Success => {
                match &report.artifact_hash {
                    Some(hash) => self.line(&format!(
                        "SUCCESS: report generated at {} (blake3 {})",
                        dated_report.display(),
                        hash
                    ))?,
                    None => self.line(&format!(
                        "SUCCESS: report generated at {}",
                        dated_report.display()
                    ))?,
                }
                if let Some(err) = &report.promotion_error {
                    self.line(&format!("ERROR: promotion failed: {}", err))?;
                }
            }
            OutcomeKind::VerificationFailure => {
                self.line(&format!(
                    "FAILURE: report verification failed (exit status {})",
                    report.outcome.exit_code
                ))?;
                self.line(VERIFICATION_OPEN)?;
                match &report.verification {
                    VerificationRecord::Present(content) => self.verbatim(content)?,
                    VerificationRecord::Absent => self.line(NO_VERIFICATION_NOTE)?,
                    VerificationRecord::Unreadable(note) => self.line(&format!(
                        "verification file present but unreadable: {}",
                        note
                    ))?,
                }
                self.line(VERIFICATION_CLOSE)?;
            }
            OutcomeKind::NetworkError | OutcomeKind::UnknownError => {
                match &report.launch_error {
                    Some(msg) => self.line(&format!("ERROR: failed to launch generator: {}", msg))?,
                    None => self.line(&format!(
                        "ERROR: generator exited with status {}",
                        report.outcome.exit_code
                    ))?,
                }
            }
        }

        // Outcome-independent record. Duplicates the content above on the
        // Success and VerificationFailure branches by design.
        self.line(VERIFICATION_HEADING)?;
        match &report.verification {
            VerificationRecord::Present(content) => self.verbatim(content)?,
            VerificationRecord::Absent => {}
            VerificationRecord::Unreadable(note) => self.line(&format!(
                "verification file present but unreadable: {}",
                note
            ))?,
        }

        self.writer
            .flush()
            .map_err(|e| RunError::audit_log(&self.path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::GeneratorOutcome;
    use crate::pipeline::RunReport;

    fn report(exit_code: i32, verification: VerificationRecord) -> RunReport {
        RunReport {
            outcome: GeneratorOutcome::from_exit_code(exit_code),
            launch_error: None,
            verification,
            promotion: None,
            promotion_error: None,
            artifact_hash: None,
        }
    }

    fn append_and_read(report: &RunReport) -> String {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run_log.txt");
        let mut log = AuditLog::open(&path).unwrap();
        log.append_run(report, Path::new("/out/r_2024-06-01.pdf"))
            .unwrap();
        drop(log);
        std::fs::read_to_string(&path).unwrap()
    }

    #[test]
    fn test_success_entry_has_one_success_line_and_generic_block() {
        let text = append_and_read(&report(0, VerificationRecord::Absent));
        assert_eq!(text.matches("SUCCESS:").count(), 1);
        assert!(text.contains("/out/r_2024-06-01.pdf"));
        assert_eq!(text.matches(VERIFICATION_HEADING).count(), 1);
        assert!(!text.contains("FAILURE"));
    }

    #[test]
    fn test_success_entry_includes_artifact_hash_when_known() {
        let mut r = report(0, VerificationRecord::Absent);
        r.artifact_hash = Some("0123456789abcdef".into());
        let text = append_and_read(&r);
        assert!(text.contains("(blake3 0123456789abcdef)"));
    }

    #[test]
    fn test_verification_failure_duplicates_content() {
        let r = report(
            2,
            VerificationRecord::Present("Error: expired certificate\n".into()),
        );
        let text = append_and_read(&r);
        assert!(text.contains("FAILURE: report verification failed (exit status 2)"));
        assert!(text.contains(VERIFICATION_OPEN));
        assert!(text.contains(VERIFICATION_CLOSE));
        // Once in the delimited block, once under the generic heading.
        assert_eq!(text.matches("Error: expired certificate").count(), 2);
    }

    #[test]
    fn test_verification_failure_without_artifact_notes_absence() {
        let text = append_and_read(&report(2, VerificationRecord::Absent));
        assert!(text.contains(NO_VERIFICATION_NOTE));
        assert!(text.contains(VERIFICATION_OPEN));
        assert!(text.contains(VERIFICATION_CLOSE));
    }

    #[test]
    fn test_network_error_names_raw_status() {
        let text = append_and_read(&report(1, VerificationRecord::Absent));
        assert!(text.contains("ERROR: generator exited with status 1"));
        assert!(!text.contains("SUCCESS"));
        assert!(!text.contains("FAILURE"));
    }

    #[test]
    fn test_unknown_error_names_raw_status() {
        let text = append_and_read(&report(42, VerificationRecord::Absent));
        assert!(text.contains("ERROR: generator exited with status 42"));
    }

    #[test]
    fn test_launch_failure_entry() {
        let mut r = report(-1, VerificationRecord::Absent);
        r.launch_error = Some("No such file or directory".into());
        let text = append_and_read(&r);
        assert!(text.contains("ERROR: failed to launch generator: No such file"));
    }

    #[test]
    fn test_promotion_failure_is_not_swallowed() {
        let mut r = report(0, VerificationRecord::Absent);
        r.promotion_error = Some("permission denied".into());
        let text = append_and_read(&r);
        assert!(text.contains("SUCCESS:"));
        assert!(text.contains("ERROR: promotion failed: permission denied"));
    }

    #[test]
    fn test_unreadable_verification_degrades_to_note() {
        let r = report(0, VerificationRecord::Unreadable("permission denied".into()));
        let text = append_and_read(&r);
        assert!(text.contains("verification file present but unreadable: permission denied"));
    }

    #[test]
    fn test_log_is_append_only_and_strictly_grows() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run_log.txt");

        let mut previous = String::new();
        for code in [0, 1, 2, 42] {
            let mut log = AuditLog::open(&path).unwrap();
            log.append_run(
                &report(code, VerificationRecord::Absent),
                Path::new("/out/r.pdf"),
            )
            .unwrap();
            drop(log);

            let current = std::fs::read_to_string(&path).unwrap();
            assert!(current.len() > previous.len());
            assert!(current.starts_with(&previous), "prior entries were lost");
            previous = current;
        }
    }

    #[test]
    fn test_every_orchestrator_line_is_timestamped() {
        let text = append_and_read(&report(1, VerificationRecord::Absent));
        for line in text.lines() {
            assert!(
                line.starts_with('['),
                "line missing timestamp prefix: {line}"
            );
        }
    }

    #[test]
    fn test_verbatim_content_gets_trailing_newline() {
        let r = report(2, VerificationRecord::Present("no newline".into()));
        let text = append_and_read(&r);
        // The closing delimiter must start its own line.
        assert!(text.contains("no newline\n"));
    }
}
