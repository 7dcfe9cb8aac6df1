//! reportrun core library
//!
//! This crate orchestrates one run of an external report generator:
//! invoke it as a subprocess, classify its exit status, verify the
//! produced artifact, atomically promote verified artifacts to stable
//! "latest" paths, and append an entry to a persistent, append-only run
//! log. The generator itself and the scheduling trigger are external.
//!
//! # Example
//!
//! ```no_run
//! use reportrun_core::{execute, GeneratorCommand, RunContext, RunLock};
//!
//! let ctx = RunContext::for_today("/srv/reports", "/srv/advisory", "travel_advisory", "pdf");
//! let _lock = RunLock::acquire(&ctx.output_dir)?;
//! let generator = GeneratorCommand::new("/usr/local/bin/advisory-gen").arg("--quiet");
//!
//! let report = execute(&ctx, &generator)?;
//! println!("{} (exit code {})", report.outcome.kind.as_str(), report.process_exit_code());
//! # Ok::<(), reportrun_core::RunError>(())
//! ```
//!
//! # Modules
//!
//! - [`context`]: run identity and artifact path resolution
//! - [`generator`]: generator subprocess invocation
//! - [`outcome`]: exit-status classification
//! - [`verification`]: reading the optional verification artifact
//! - [`promote`]: atomic promotion to the latest paths
//! - [`audit`]: the append-only run log
//! - [`lock`]: single-run lock on the output directory
//! - [`pipeline`]: the run state machine tying the stages together
//! - [`error`]: error taxonomy for the pipeline

pub mod audit;
pub mod context;
pub mod error;
pub mod generator;
pub mod lock;
pub mod outcome;
pub mod pipeline;
pub mod promote;
pub mod verification;

// Re-export commonly used types at the crate root
pub use audit::AuditLog;
pub use context::{RunContext, RUN_LOG_FILENAME, VERIFICATION_SUFFIX};
pub use error::{RunError, RunResult};
pub use generator::GeneratorCommand;
pub use lock::{RunLock, LOCK_FILENAME};
pub use outcome::{GeneratorOutcome, OutcomeKind};
pub use pipeline::{execute, exit_codes, RunReport};
pub use promote::{promote, Promotion};
pub use verification::VerificationRecord;
