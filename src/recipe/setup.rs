//! Setup plans: install commands, configuration entries, and after-actions.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::error::ReplayError;
use crate::recipe::command::{CommandSet, Privilege};
use crate::recipe::config::ConfigFile;

/// Factories deeper than this fail resolution instead of looping.
const FACTORY_DEPTH_LIMIT: usize = 8;

/// The action to replay once installation has finished.
///
/// Either a ready command set, or a factory that produces the action at
/// replay time. Factories may return further factories; resolution
/// unwraps them up to a fixed depth.
pub enum AfterAction {
    /// Commands to replay directly.
    Commands(CommandSet),
    /// Deferred construction, invoked during replay.
    Factory(Box<dyn Fn() -> AfterAction + Send + Sync>),
}

impl AfterAction {
    /// Wrap a factory closure.
    #[must_use]
    pub fn factory(factory: impl Fn() -> Self + Send + Sync + 'static) -> Self {
        Self::Factory(Box::new(factory))
    }

    /// Resolve to a command set, invoking factories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::AfterActionUnresolved`] if factories nest
    /// deeper than the resolution limit.
    pub fn into_commands(self) -> Result<CommandSet, ReplayError> {
        let mut action = self;
        for _ in 0..FACTORY_DEPTH_LIMIT {
            match action {
                Self::Commands(commands) => return Ok(commands),
                Self::Factory(factory) => action = factory(),
            }
        }
        Err(ReplayError::AfterActionUnresolved {
            limit: FACTORY_DEPTH_LIMIT,
        })
    }
}

impl From<CommandSet> for AfterAction {
    fn from(commands: CommandSet) -> Self {
        Self::Commands(commands)
    }
}

impl fmt::Debug for AfterAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commands(commands) => f.debug_tuple("Commands").field(commands).finish(),
            Self::Factory(_) => f.write_str("Factory(<closure>)"),
        }
    }
}

/// A configuration entry together with the host scope it was recorded under.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ConfigSlot {
    host: Option<String>,
    file: ConfigFile,
}

/// Everything a package (or a whole distribution) wants done around an
/// install: commands to run, configuration files to upload, and an
/// after-action once installation has finished.
///
/// Configuration entries are keyed by host scope and destination path;
/// asking for the same path twice under the same scope returns the same
/// entry. Entry order is the order paths were first mentioned.
///
/// # Example
///
/// ```
/// use chandler::recipe::Setup;
///
/// let mut setup = Setup::new();
/// setup.sudo("useradd -r app");
/// setup
///     .config("/etc/app.conf")
///     .contents("mode = production\n")
///     .sudo("systemctl restart app");
/// {
///     let mut scope = setup.host("db1");
///     scope.config("/etc/app-db.conf").contents("role = primary\n");
/// }
/// assert_eq!(setup.configs().count(), 2);
/// ```
#[derive(Default)]
pub struct Setup {
    commands: CommandSet,
    configs: Vec<ConfigSlot>,
    after: CommandSet,
    after_factory: Option<Box<dyn Fn() -> AfterAction + Send + Sync>>,
    current_host: Option<String>,
}

impl Setup {
    /// Create an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an install-time command to run as the connecting user.
    pub fn run(&mut self, command: impl Into<String>) -> &mut Self {
        self.commands.run(command);
        self
    }

    /// Record an install-time command to run as root.
    pub fn sudo(&mut self, command: impl Into<String>) -> &mut Self {
        self.commands.sudo(command);
        self
    }

    /// Record an install-time command under an explicit privilege.
    pub fn record(&mut self, command: impl Into<String>, privilege: Privilege) -> &mut Self {
        self.commands.record(command, privilege);
        self
    }

    /// Install-time commands, in recording order.
    #[must_use]
    pub const fn commands(&self) -> &CommandSet {
        &self.commands
    }

    /// The configuration entry for `path` under the current host scope,
    /// created on first use.
    pub fn config(&mut self, path: impl Into<String>) -> &mut ConfigFile {
        let path = path.into();
        let position = self
            .configs
            .iter()
            .position(|slot| slot.host == self.current_host && slot.file.path() == path);
        let position = position.unwrap_or_else(|| {
            self.configs.push(ConfigSlot {
                host: self.current_host.clone(),
                file: ConfigFile::new(path),
            });
            self.configs.len() - 1
        });
        // In bounds: either found above or pointing at the entry just pushed.
        #[allow(clippy::indexing_slicing)]
        let entry = &mut self.configs[position].file;
        entry
    }

    /// All configuration entries with their host scopes, in the order the
    /// paths were first mentioned.
    pub fn configs(&self) -> impl Iterator<Item = (Option<&str>, &ConfigFile)> {
        self.configs
            .iter()
            .map(|slot| (slot.host.as_deref(), &slot.file))
    }

    /// Enter a host scope. Entries recorded through the returned guard are
    /// keyed to `name`; dropping the guard restores the previous scope.
    pub fn host(&mut self, name: impl Into<String>) -> HostScope<'_> {
        let previous = self.current_host.replace(name.into());
        HostScope {
            setup: self,
            previous,
        }
    }

    /// The host scope entries are currently recorded under.
    #[must_use]
    pub fn current_host(&self) -> Option<&str> {
        self.current_host.as_deref()
    }

    /// Commands to replay after installation completes.
    ///
    /// Recording here discards any previously set factory.
    pub fn after(&mut self) -> &mut CommandSet {
        self.after_factory = None;
        &mut self.after
    }

    /// Defer the after-action to a factory invoked at replay time.
    ///
    /// Discards any previously recorded after commands.
    pub fn after_factory(
        &mut self,
        factory: impl Fn() -> AfterAction + Send + Sync + 'static,
    ) -> &mut Self {
        self.after = CommandSet::new();
        self.after_factory = Some(Box::new(factory));
        self
    }

    /// Resolve the after-action to a command set.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::AfterActionUnresolved`] if a factory chain
    /// exceeds the resolution limit.
    pub fn resolved_after(&self) -> Result<CommandSet, ReplayError> {
        match &self.after_factory {
            Some(factory) => factory().into_commands(),
            None => Ok(self.after.clone()),
        }
    }
}

impl fmt::Debug for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setup")
            .field("commands", &self.commands)
            .field("configs", &self.configs)
            .field("after", &self.after)
            .field(
                "after_factory",
                &self.after_factory.as_ref().map(|_| "<factory>"),
            )
            .field("current_host", &self.current_host)
            .finish()
    }
}

/// RAII guard for a host scope on a [`Setup`].
///
/// Dereferences to the underlying plan, so recording reads the same as
/// outside the scope. The previous scope is restored when the guard
/// drops, on every exit path.
#[derive(Debug)]
pub struct HostScope<'a> {
    setup: &'a mut Setup,
    previous: Option<String>,
}

impl Deref for HostScope<'_> {
    type Target = Setup;

    fn deref(&self) -> &Self::Target {
        self.setup
    }
}

impl DerefMut for HostScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.setup
    }
}

impl Drop for HostScope<'_> {
    fn drop(&mut self) {
        self.setup.current_host = self.previous.take();
    }
}
