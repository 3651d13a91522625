//! Execution transports.
//!
//! A [`Transport`] is where replayed commands and uploads land: the local
//! machine or a remote host reached through the system `ssh` binary.
//! Transports report outcomes; deciding what a non-zero exit means is the
//! driver's job.

pub mod local;
pub mod ssh;

pub use local::LocalTransport;
pub use ssh::SshTransport;

use std::process::Output;

use anyhow::Result;

use crate::recipe::Privilege;

/// Result of one command or upload on a transport.
#[derive(Debug, Clone)]
pub struct ExecOutcome {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited zero.
    pub success: bool,
    /// Exit code, if the process reported one.
    pub code: Option<i32>,
}

impl From<Output> for ExecOutcome {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Where replayed commands and uploads are executed.
///
/// Implementations run a command line under a privilege and write file
/// contents to a destination path. A failing process is reported through
/// the returned [`ExecOutcome`], not as an `Err`; errors are reserved for
/// failures to execute at all.
pub trait Transport: Send + Sync {
    /// Run a shell command line under the given privilege.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying process cannot be spawned.
    fn run(&self, command: &str, privilege: Privilege) -> Result<ExecOutcome>;

    /// Write `contents` to `path` on the target under the given privilege.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying process cannot be spawned or fed.
    fn upload(&self, contents: &[u8], path: &str, privilege: Privilege) -> Result<ExecOutcome>;

    /// Hostname this transport targets, when remote.
    fn host(&self) -> Option<String> {
        None
    }

    /// Human-readable description of the target.
    fn describe(&self) -> String;
}
