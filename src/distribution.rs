//! The distribution driver: package resolution and ordered replay.
//!
//! A [`Distribution`] owns everything one provisioning run needs: the
//! distribution name, the recipe root, a transport, and the list of
//! packages waiting for their post-install replay. There is no global
//! state; the CLI builds one driver per target host and drops it when the
//! host is done.
//!
//! Replay ordering is fixed: the install command line first, then the
//! distribution-global setup from `common.toml` (configs, then commands),
//! then each pending package in the order it was first installed
//! (commands, configs, after-action), and finally the global after-action.
//! Any failed step aborts the rest of the replay; nothing is rolled back.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, RecipeError, ReplayError};
use crate::recipe::loader::{self, CommonRecipe};
use crate::recipe::{CommandSet, Package, PackageArg, Privilege, Setup};
use crate::transport::{ExecOutcome, Transport};

/// Driver for one distribution against one transport.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use chandler::distribution::Distribution;
/// use chandler::transport::LocalTransport;
///
/// let mut driver = Distribution::new("arch", "recipes", Arc::new(LocalTransport::new()));
/// let batch = driver.batch();
/// // batch.setup([...])? for each package set, then:
/// batch.finish().unwrap();
/// ```
pub struct Distribution {
    name: String,
    recipes_root: PathBuf,
    install_command: Option<String>,
    dry_run: bool,
    host: Option<String>,
    pending: Vec<Package>,
    in_batch: bool,
    report: Vec<String>,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Distribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Distribution")
            .field("name", &self.name)
            .field("recipes_root", &self.recipes_root)
            .field("install_command", &self.install_command)
            .field("dry_run", &self.dry_run)
            .field("host", &self.host)
            .field("pending", &self.pending.len())
            .field("in_batch", &self.in_batch)
            .field("transport", &self.transport.describe())
            .finish()
    }
}

impl Distribution {
    /// Create a driver for `name` with recipes under `recipes_root`.
    ///
    /// The active host scope starts out as the transport's target host, so
    /// host-keyed config entries line up with where uploads actually land.
    pub fn new(
        name: impl Into<String>,
        recipes_root: impl Into<PathBuf>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let host = transport.host();
        Self {
            name: name.into(),
            recipes_root: recipes_root.into(),
            install_command: None,
            dry_run: false,
            host,
            pending: Vec::new(),
            in_batch: false,
            report: Vec::new(),
            transport,
        }
    }

    /// Set a default install command, used when no per-call override is
    /// given and `common.toml` declares none.
    #[must_use]
    pub fn with_install_command(mut self, command: impl Into<String>) -> Self {
        self.install_command = Some(command.into());
        self
    }

    /// Enable or disable dry-run. In dry-run mode nothing reaches the
    /// transport; every step is recorded in [`Self::report`] instead.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Override the active host scope used to select host-keyed config
    /// entries during replay.
    pub fn set_host(&mut self, host: Option<String>) {
        self.host = host;
    }

    /// The active host scope, if any.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// The distribution name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps recorded so far in dry-run mode, in replay order.
    #[must_use]
    pub fn report(&self) -> &[String] {
        &self.report
    }

    /// Restore the driver to its freshly constructed state, keeping the
    /// name, recipe root, and transport. Call between independent runs
    /// that reuse one driver.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.in_batch = false;
        self.report.clear();
    }

    /// Resolve package arguments into packages, in input order.
    ///
    /// Names load through the recipe directory; already built packages
    /// pass through unchanged. One failure discards the whole result.
    ///
    /// # Errors
    ///
    /// Returns any [`RecipeError`] from loading a named recipe.
    pub fn resolve_packages(
        &self,
        packages: impl IntoIterator<Item = PackageArg>,
    ) -> Result<Vec<Package>, RecipeError> {
        packages
            .into_iter()
            .map(|arg| match arg {
                PackageArg::Name(name) => {
                    loader::load_package(&self.recipes_root, &self.name, &name)
                }
                PackageArg::Package(package) => Ok(package),
            })
            .collect()
    }

    /// The effective install command: `override_command` wins, then the
    /// driver default, then `install_command` from `common.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`RecipeError::MissingInstallCommand`] when none of the
    /// three sources provides a command.
    pub fn install_command(&self, override_command: Option<&str>) -> Result<String, RecipeError> {
        if let Some(command) = override_command {
            return Ok(command.to_string());
        }
        if let Some(command) = &self.install_command {
            return Ok(command.clone());
        }
        let common = loader::load_common(&self.recipes_root, &self.name)?;
        common
            .install_command
            .ok_or_else(|| RecipeError::MissingInstallCommand {
                distribution: self.name.clone(),
            })
    }

    /// Install packages and replay their setup.
    ///
    /// Outside a batch the after-setup replay runs immediately; inside,
    /// it is deferred to [`Batch::finish`].
    ///
    /// # Errors
    ///
    /// Returns a [`RecipeError`] from resolution or a [`ReplayError`] from
    /// a failed install or replay step; partial work is not undone.
    pub fn setup(&mut self, packages: impl IntoIterator<Item = PackageArg>) -> Result<(), Error> {
        self.setup_with(packages, None)
    }

    /// [`Self::setup`] with a per-call install-command override.
    ///
    /// # Errors
    ///
    /// As for [`Self::setup`].
    pub fn setup_with(
        &mut self,
        packages: impl IntoIterator<Item = PackageArg>,
        override_command: Option<&str>,
    ) -> Result<(), Error> {
        let resolved = self.resolve_packages(packages)?;
        let install = self.install_command(override_command)?;

        let mut line = install;
        for package in &resolved {
            for name in package.names() {
                line.push(' ');
                line.push_str(name);
            }
        }
        self.pending.extend(resolved);

        self.execute(&line, Privilege::Root)?;

        if self.in_batch {
            debug!("batch active, deferring after-setup");
            Ok(())
        } else {
            self.after_setup()
        }
    }

    /// Replay configuration only: the distribution-global configs from
    /// `common.toml` once, then each package's configs. After-actions
    /// never fire here.
    ///
    /// # Errors
    ///
    /// Returns a [`RecipeError`] from resolution or a [`ReplayError`] from
    /// a failed upload or post-upload command.
    pub fn config(&mut self, packages: impl IntoIterator<Item = PackageArg>) -> Result<(), Error> {
        let resolved = self.resolve_packages(packages)?;
        let common = self.load_common()?;

        if let Some(setup) = &common.setup {
            self.replay_configs(setup)?;
        }
        for package in &resolved {
            debug!(package = package.name(), "replaying configs");
            self.replay_configs(package.setup())?;
        }
        Ok(())
    }

    /// Replay everything deferred since installs began: the global setup,
    /// each pending package's setup and after-action, and the global
    /// after-action. Drains the pending list up front, so a failed replay
    /// is not replayed again by a later call.
    ///
    /// # Errors
    ///
    /// Returns the first failed step as a [`ReplayError`], or a
    /// [`RecipeError`] if `common.toml` cannot be loaded.
    pub fn after_setup(&mut self) -> Result<(), Error> {
        let pending = std::mem::take(&mut self.pending);
        let common = self.load_common()?;

        if let Some(setup) = &common.setup {
            debug!("replaying distribution-global setup");
            self.replay_configs(setup)?;
            self.replay_commands(setup.commands())?;
        }
        for package in &pending {
            debug!(package = package.name(), "replaying package setup");
            self.replay_commands(package.setup().commands())?;
            self.replay_configs(package.setup())?;
            let after = package.setup().resolved_after()?;
            self.replay_commands(&after)?;
        }
        if let Some(setup) = &common.setup {
            let after = setup.resolved_after()?;
            self.replay_commands(&after)?;
        }
        Ok(())
    }

    /// Enter a batch scope. Setup calls made through the guard defer the
    /// after-setup replay until [`Batch::finish`].
    pub fn batch(&mut self) -> Batch<'_> {
        self.in_batch = true;
        Batch {
            distribution: self,
            finished: false,
        }
    }

    fn load_common(&self) -> Result<CommonRecipe, RecipeError> {
        loader::load_common(&self.recipes_root, &self.name)
    }

    fn replay_commands(&mut self, commands: &CommandSet) -> Result<(), Error> {
        for step in commands.steps() {
            self.execute(&step.command, step.privilege)?;
        }
        Ok(())
    }

    /// Replay a setup's config entries under the active host scope.
    ///
    /// Entries keyed to a host replay only when that host is active;
    /// unscoped entries replay under every scope.
    fn replay_configs(&mut self, setup: &Setup) -> Result<(), Error> {
        let entries: Vec<_> = setup
            .configs()
            .filter(|(entry_host, _)| entry_host.is_none() || *entry_host == self.host())
            .map(|(_, entry)| entry.clone())
            .collect();
        for entry in entries {
            let Some(contents) = entry.data() else {
                return Err(ReplayError::MissingContents {
                    path: entry.path().to_string(),
                }
                .into());
            };
            self.upload(contents, entry.path())?;
            self.replay_commands(entry.commands())?;
        }
        Ok(())
    }

    fn execute(&mut self, command: &str, privilege: Privilege) -> Result<(), Error> {
        let tag = match privilege {
            Privilege::Root => "root",
            Privilege::User => "user",
        };
        if self.dry_run {
            info!(sink = %self.transport.describe(), "would run ({tag}): {command}");
            self.report.push(format!("run({tag}): {command}"));
            return Ok(());
        }
        debug!(sink = %self.transport.describe(), "running ({tag}): {command}");
        let outcome = self.transport.run(command, privilege)?;
        check_outcome(&outcome).map_err(|(code, stderr)| ReplayError::CommandFailed {
            command: command.to_string(),
            code,
            stderr,
        })?;
        Ok(())
    }

    fn upload(&mut self, contents: &str, path: &str) -> Result<(), Error> {
        if self.dry_run {
            info!(sink = %self.transport.describe(), "would upload {path} ({} bytes)", contents.len());
            self.report
                .push(format!("upload: {path} ({} bytes)", contents.len()));
            return Ok(());
        }
        debug!(sink = %self.transport.describe(), "uploading {path}");
        let outcome = self
            .transport
            .upload(contents.as_bytes(), path, Privilege::Root)?;
        check_outcome(&outcome).map_err(|(code, stderr)| ReplayError::UploadFailed {
            path: path.to_string(),
            code,
            stderr,
        })?;
        Ok(())
    }

    /// The directory holding this distribution's recipes.
    #[must_use]
    pub fn recipe_dir(&self) -> PathBuf {
        self.recipes_root.join(&self.name)
    }

    /// The recipe root directory shared by all distributions.
    #[must_use]
    pub fn recipes_root(&self) -> &Path {
        &self.recipes_root
    }
}

fn check_outcome(outcome: &ExecOutcome) -> Result<(), (Option<i32>, String)> {
    if outcome.success {
        Ok(())
    } else {
        Err((outcome.code, outcome.stderr.trim().to_string()))
    }
}

/// Guard for a batch of setup calls whose after-setup replay fires once.
///
/// Derefs to the underlying [`Distribution`]. Call [`Batch::finish`] to
/// run the deferred replay; dropping the guard without finishing (the
/// failure path) skips after-actions entirely and discards the pending
/// packages.
#[derive(Debug)]
pub struct Batch<'a> {
    distribution: &'a mut Distribution,
    finished: bool,
}

impl Batch<'_> {
    /// Run the deferred after-setup replay and leave the batch.
    ///
    /// # Errors
    ///
    /// Returns the first failed replay step; see
    /// [`Distribution::after_setup`].
    pub fn finish(mut self) -> Result<(), Error> {
        self.finished = true;
        self.distribution.in_batch = false;
        self.distribution.after_setup()
    }
}

impl std::ops::Deref for Batch<'_> {
    type Target = Distribution;

    fn deref(&self) -> &Self::Target {
        self.distribution
    }
}

impl std::ops::DerefMut for Batch<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.distribution
    }
}

impl Drop for Batch<'_> {
    fn drop(&mut self) {
        self.distribution.in_batch = false;
        if !self.finished {
            // Abandoned batch: skip after-actions, drop what was pending.
            self.distribution.pending.clear();
        }
    }
}
