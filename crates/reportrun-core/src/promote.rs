//! Atomic promotion of dated artifacts to their latest paths.
//!
//! Promotion runs only on a Success outcome. The latest paths are read by
//! external consumers at arbitrary times, so every replace goes through a
//! temp file in the destination directory followed by an atomic rename:
//! a reader sees either the previous artifact or the new one, never a
//! partially-written file.

use std::fs::File;
use std::io;
use std::path::Path;

use crate::context::RunContext;
use crate::error::{RunError, RunResult};

/// What a promotion pass copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Promotion {
    /// The report was copied to its latest path. Always true when
    /// promotion returns Ok.
    pub report_promoted: bool,
    /// A dated verification artifact existed and was copied alongside.
    pub verification_promoted: bool,
}

/// Copies `src` over `dest` without exposing a partial file at `dest`.
fn replace_atomic(src: &Path, dest: &Path) -> RunResult<()> {
    let map_err = |e: io::Error| RunError::promotion(src, dest, e);

    let dir = dest.parent().ok_or_else(|| {
        map_err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "destination has no parent directory",
        ))
    })?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".reportrun_tmp_")
        .tempfile_in(dir)
        .map_err(map_err)?;

    let mut reader = File::open(src).map_err(map_err)?;
    io::copy(&mut reader, tmp.as_file_mut()).map_err(map_err)?;
    tmp.as_file_mut().sync_all().map_err(map_err)?;

    tmp.persist(dest).map_err(|e| map_err(e.error))?;
    Ok(())
}

/// Promotes the dated report (and its verification artifact, if present)
/// to the latest paths.
///
/// Absence of a verification artifact on success is not an error.
pub fn promote(ctx: &RunContext) -> RunResult<Promotion> {
    replace_atomic(&ctx.dated_report_path, &ctx.latest_report_path)?;

    let verification_promoted = if ctx.dated_verification_path.exists() {
        replace_atomic(&ctx.dated_verification_path, &ctx.latest_verification_path)?;
        true
    } else {
        false
    };

    Ok(Promotion {
        report_promoted: true,
        verification_promoted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn test_context(dir: &Path) -> RunContext {
        RunContext::new(
            dir,
            dir,
            "report",
            "pdf",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
    }

    #[test]
    fn test_promote_copies_report_byte_for_byte() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = test_context(tmp.path());
        fs::write(&ctx.dated_report_path, b"%PDF-1.7 fake report body").unwrap();

        let promotion = promote(&ctx).unwrap();
        assert!(promotion.report_promoted);
        assert!(!promotion.verification_promoted);
        assert_eq!(
            fs::read(&ctx.latest_report_path).unwrap(),
            fs::read(&ctx.dated_report_path).unwrap()
        );
    }

    #[test]
    fn test_promote_carries_verification_when_present() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = test_context(tmp.path());
        fs::write(&ctx.dated_report_path, "report").unwrap();
        fs::write(&ctx.dated_verification_path, "ALL PASSED").unwrap();

        let promotion = promote(&ctx).unwrap();
        assert!(promotion.verification_promoted);
        assert_eq!(
            fs::read_to_string(&ctx.latest_verification_path).unwrap(),
            "ALL PASSED"
        );
    }

    #[test]
    fn test_promote_overwrites_previous_latest() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = test_context(tmp.path());
        fs::write(&ctx.latest_report_path, "stale").unwrap();
        fs::write(&ctx.dated_report_path, "fresh").unwrap();

        promote(&ctx).unwrap();
        assert_eq!(fs::read_to_string(&ctx.latest_report_path).unwrap(), "fresh");
    }

    #[test]
    fn test_promote_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = test_context(tmp.path());
        fs::write(&ctx.dated_report_path, "same content").unwrap();

        promote(&ctx).unwrap();
        let first = fs::read(&ctx.latest_report_path).unwrap();
        promote(&ctx).unwrap();
        let second = fs::read(&ctx.latest_report_path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_promote_missing_report_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = test_context(tmp.path());

        let err = promote(&ctx).unwrap_err();
        assert!(matches!(err, RunError::Promotion { .. }));
        assert!(!ctx.latest_report_path.exists());
    }

    #[test]
    fn test_promote_leaves_no_temp_files_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = test_context(tmp.path());
        fs::write(&ctx.dated_report_path, "report").unwrap();

        promote(&ctx).unwrap();
        let leftovers: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with(".reportrun_tmp_")
            })
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_concurrent_reader_never_sees_partial_latest() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let tmp = tempfile::tempdir().unwrap();
        let ctx = test_context(tmp.path());

        // Two distinguishable full-size payloads.
        let payload_a = vec![b'a'; 256 * 1024];
        let payload_b = vec![b'b'; 256 * 1024];
        fs::write(&ctx.dated_report_path, &payload_a).unwrap();
        promote(&ctx).unwrap();

        let stop = Arc::new(AtomicBool::new(false));
        let reader_stop = Arc::clone(&stop);
        let latest = ctx.latest_report_path.clone();
        let reader = std::thread::spawn(move || {
            let mut observations = 0usize;
            while !reader_stop.load(Ordering::Relaxed) {
                if let Ok(bytes) = fs::read(&latest) {
                    observations += 1;
                    assert_eq!(bytes.len(), 256 * 1024, "reader saw a truncated file");
                    assert!(
                        bytes.iter().all(|b| *b == bytes[0]),
                        "reader saw a mixed file"
                    );
                }
            }
            observations
        });

        for i in 0..20 {
            let payload = if i % 2 == 0 { &payload_b } else { &payload_a };
            fs::write(&ctx.dated_report_path, payload).unwrap();
            promote(&ctx).unwrap();
        }

        stop.store(true, Ordering::Relaxed);
        let observations = reader.join().unwrap();
        assert!(observations > 0, "reader never observed the latest path");
    }
}
