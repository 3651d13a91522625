//! Local execution.

use std::io::Write as _;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use super::{ExecOutcome, Transport};
use crate::recipe::Privilege;

/// Runs commands on the local machine through `sh`.
///
/// Root-privileged steps go through `sudo -n` so a missing sudo ticket
/// fails fast instead of prompting. Uploads stream through `tee`, which
/// gives user and root writes a single code path.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTransport;

impl LocalTransport {
    /// Create a local transport.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Transport for LocalTransport {
    fn run(&self, command: &str, privilege: Privilege) -> Result<ExecOutcome> {
        let mut cmd = match privilege {
            Privilege::Root => {
                let mut c = Command::new("sudo");
                c.args(["-n", "sh", "-c", command]);
                c
            }
            Privilege::User => {
                let mut c = Command::new("sh");
                c.args(["-c", command]);
                c
            }
        };
        let output = cmd
            .output()
            .with_context(|| format!("failed to execute: {command}"))?;
        Ok(output.into())
    }

    fn upload(&self, contents: &[u8], path: &str, privilege: Privilege) -> Result<ExecOutcome> {
        let mut cmd = match privilege {
            Privilege::Root => {
                let mut c = Command::new("sudo");
                c.args(["-n", "tee", "--", path]);
                c
            }
            Privilege::User => {
                let mut c = Command::new("tee");
                c.args(["--", path]);
                c
            }
        };
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn tee for {path}"))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(contents)
                .with_context(|| format!("failed to stream contents to {path}"))?;
        }
        let output = child
            .wait_with_output()
            .with_context(|| format!("failed to collect tee output for {path}"))?;
        Ok(output.into())
    }

    fn describe(&self) -> String {
        "localhost".to_string()
    }
}
