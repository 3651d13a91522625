//! Remote execution over the system `ssh` binary.

use std::io::Write as _;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use super::{ExecOutcome, Transport};
use crate::recipe::Privilege;

/// Runs commands on a remote host by shelling out to `ssh`.
///
/// Every call is its own `ssh` invocation in batch mode, so interactive
/// prompts fail fast instead of hanging a provisioning run. Command lines
/// are wrapped in `sh -c` with single-quote escaping; uploads stream
/// through `tee` on the remote side.
#[derive(Debug, Clone)]
pub struct SshTransport {
    host: String,
}

impl SshTransport {
    /// Create a transport for `host`, verifying `ssh` is on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns an error if no `ssh` binary can be found.
    pub fn new(host: impl Into<String>) -> Result<Self> {
        which::which("ssh").context("ssh binary not found on PATH")?;
        Ok(Self { host: host.into() })
    }

    fn ssh_command(&self, remote: &str) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.args(["-o", "BatchMode=yes", "--", self.host.as_str(), remote]);
        cmd
    }

    fn wrap(command: &str, privilege: Privilege) -> String {
        match privilege {
            Privilege::Root => format!("sudo -n sh -c {}", shell_quote(command)),
            Privilege::User => format!("sh -c {}", shell_quote(command)),
        }
    }
}

/// Quote `value` for a POSIX shell.
fn shell_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(ch);
        }
    }
    quoted.push('\'');
    quoted
}

impl Transport for SshTransport {
    fn run(&self, command: &str, privilege: Privilege) -> Result<ExecOutcome> {
        let output = self
            .ssh_command(&Self::wrap(command, privilege))
            .output()
            .with_context(|| format!("failed to execute ssh to {}", self.host))?;
        Ok(output.into())
    }

    fn upload(&self, contents: &[u8], path: &str, privilege: Privilege) -> Result<ExecOutcome> {
        let write_command = match privilege {
            Privilege::Root => format!("sudo -n tee -- {} >/dev/null", shell_quote(path)),
            Privilege::User => format!("tee -- {} >/dev/null", shell_quote(path)),
        };
        let mut cmd = self.ssh_command(&write_command);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn ssh to {}", self.host))?;
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(contents).with_context(|| {
                format!("failed to stream contents to {}:{path}", self.host)
            })?;
        }
        let output = child
            .wait_with_output()
            .with_context(|| format!("failed to collect ssh output from {}", self.host))?;
        Ok(output.into())
    }

    fn host(&self) -> Option<String> {
        Some(self.host.clone())
    }

    fn describe(&self) -> String {
        self.host.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_plain_word_is_wrapped() {
        assert_eq!(shell_quote("hello"), "'hello'");
    }

    #[test]
    fn quote_escapes_embedded_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn quote_empty_string() {
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn wrap_root_uses_sudo() {
        assert_eq!(
            SshTransport::wrap("echo hi", Privilege::Root),
            "sudo -n sh -c 'echo hi'"
        );
    }

    #[test]
    fn wrap_user_runs_plain_shell() {
        assert_eq!(
            SshTransport::wrap("echo hi", Privilege::User),
            "sh -c 'echo hi'"
        );
    }

    #[test]
    fn transport_reports_its_host() {
        let transport = SshTransport {
            host: "web1".to_string(),
        };
        assert_eq!(transport.host(), Some("web1".to_string()));
        assert_eq!(transport.describe(), "web1");
    }
}
