// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed recipe root and a transport that
// records every call instead of executing, so each integration test can
// assert on the exact replay sequence without touching the system.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use chandler::recipe::Privilege;
use chandler::transport::{ExecOutcome, Transport};

/// A recipe root backed by a [`tempfile::TempDir`].
///
/// The directory is deleted when the fixture drops.
pub struct RecipeRoot {
    dir: tempfile::TempDir,
}

impl RecipeRoot {
    /// Create an empty recipe root.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path to the root directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `<distribution>/common.toml`.
    pub fn common(&self, distribution: &str, contents: &str) -> &Self {
        self.write(distribution, "common.toml", contents)
    }

    /// Write `<distribution>/<package>.toml`.
    pub fn package(&self, distribution: &str, package: &str, contents: &str) -> &Self {
        self.write(distribution, &format!("{package}.toml"), contents)
    }

    /// Create a bare distribution directory with no files.
    pub fn distribution(&self, distribution: &str) -> &Self {
        std::fs::create_dir_all(self.path().join(distribution)).expect("create distribution dir");
        self
    }

    fn write(&self, distribution: &str, file: &str, contents: &str) -> &Self {
        let dir = self.path().join(distribution);
        std::fs::create_dir_all(&dir).expect("create distribution dir");
        std::fs::write(dir.join(file), contents).expect("write recipe file");
        self
    }
}

/// A transport that records calls instead of executing them.
///
/// Each run becomes `run(user): <command>` or `run(root): <command>`;
/// each upload becomes `upload: <path> = <contents>`. A command line
/// containing the configured failure marker reports a non-zero exit.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    events: Arc<Mutex<Vec<String>>>,
    host: Option<String>,
    fail_marker: Option<String>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that reports itself as targeting `host`.
    pub fn for_host(host: &str) -> Self {
        Self {
            host: Some(host.to_string()),
            ..Self::default()
        }
    }

    /// Make any command containing `marker` report exit 1.
    pub fn fail_on(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    /// Everything recorded so far, in call order.
    pub fn transcript(&self) -> Vec<String> {
        self.events.lock().expect("transcript lock").clone()
    }

    fn record(&self, event: String) {
        self.events.lock().expect("transcript lock").push(event);
    }

    fn outcome_for(&self, command: &str) -> ExecOutcome {
        let failed = self
            .fail_marker
            .as_deref()
            .is_some_and(|marker| command.contains(marker));
        ExecOutcome {
            stdout: String::new(),
            stderr: if failed {
                "injected failure".to_string()
            } else {
                String::new()
            },
            success: !failed,
            code: Some(i32::from(failed)),
        }
    }
}

impl Transport for RecordingTransport {
    fn run(&self, command: &str, privilege: Privilege) -> anyhow::Result<ExecOutcome> {
        let tag = match privilege {
            Privilege::User => "user",
            Privilege::Root => "root",
        };
        self.record(format!("run({tag}): {command}"));
        Ok(self.outcome_for(command))
    }

    fn upload(&self, contents: &[u8], path: &str, _privilege: Privilege) -> anyhow::Result<ExecOutcome> {
        self.record(format!(
            "upload: {path} = {}",
            String::from_utf8_lossy(contents)
        ));
        Ok(self.outcome_for(path))
    }

    fn host(&self) -> Option<String> {
        self.host.clone()
    }

    fn describe(&self) -> String {
        self.host.clone().unwrap_or_else(|| "recording".to_string())
    }
}
