//! Reading the optional verification artifact.
//!
//! The generator may write a verification artifact alongside its report.
//! Its presence is independent of the outcome kind: partial output can
//! exist even when verification failed, and a clean success may come with
//! no verification file at all.

use std::fs;
use std::io;
use std::path::Path;

/// Result of attempting to read the dated verification artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationRecord {
    /// The artifact exists and was read in full.
    Present(String),
    /// No artifact at the expected path. Not an error.
    Absent,
    /// The artifact exists but could not be read (permissions, partial
    /// write). Degrades to a logged note; never aborts the run.
    Unreadable(String),
}

impl VerificationRecord {
    /// Reads the verification artifact at `path`.
    pub fn read(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => VerificationRecord::Present(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => VerificationRecord::Absent,
            Err(e) => VerificationRecord::Unreadable(e.to_string()),
        }
    }

    /// The verification text, when present.
    pub fn content(&self) -> Option<&str> {
        match self {
            VerificationRecord::Present(content) => Some(content),
            _ => None,
        }
    }

    /// True when an artifact was found on disk, readable or not.
    pub fn exists(&self) -> bool {
        !matches!(self, VerificationRecord::Absent)
    }
}
