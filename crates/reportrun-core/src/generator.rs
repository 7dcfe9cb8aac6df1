//! Generator subprocess invocation.
//!
//! The generator is a black box: it receives the dated report path as its
//! final argument, runs in the project directory, and reports its result
//! through its exit status. The orchestrator blocks until it exits and
//! imposes no timeout of its own.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::context::RunContext;
use crate::error::{RunError, RunResult};
use crate::outcome::GeneratorOutcome;

/// Exit status recorded when the generator is killed by a signal and no
/// code is available.
pub const SIGNALED_EXIT_CODE: i32 = -1;

/// The external generator command: program plus leading arguments.
///
/// The dated report path is appended as the final argument on each
/// invocation, per the subprocess contract.
#[derive(Debug, Clone)]
pub struct GeneratorCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl GeneratorCommand {
    /// Creates a command for the given program with no leading arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends a leading argument (passed before the output path).
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several leading arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The program this command will launch.
    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    /// Runs the generator and returns its classified outcome.
    ///
    /// The child's working directory is set to the project directory via
    /// `Command::current_dir`; the orchestrator's own working directory is
    /// never modified. Blocks until the child exits. The exit status is
    /// captured even when the generator wrote nothing.
    pub fn invoke(&self, ctx: &RunContext) -> RunResult<GeneratorOutcome> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&ctx.dated_report_path)
            .current_dir(&ctx.project_dir)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| RunError::spawn_failed(self.program.display().to_string(), e))?;

        // A signal-killed child has no exit code; fold it into the
        // unknown bucket with a sentinel.
        let exit_code = status.code().unwrap_or(SIGNALED_EXIT_CODE);
        Ok(GeneratorOutcome::from_exit_code(exit_code))
    }
}
