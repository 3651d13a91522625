//! Shell command recording.
//!
//! A [`CommandSet`] accumulates shell command lines together with the
//! privilege they should run under. Recording never executes anything;
//! replay is the driver's job (see [`crate::distribution`]).

/// Privilege level a recorded command runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Privilege {
    /// Run as the connecting user.
    User,
    /// Run as root (via `sudo` on the target).
    Root,
}

/// A single recorded command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandStep {
    /// The shell command line to run.
    pub command: String,
    /// Privilege the command runs under.
    pub privilege: Privilege,
}

/// An ordered set of recorded commands.
///
/// Commands replay in the order they were recorded. The set itself is a
/// pure accumulator: it holds command lines and privileges but never
/// touches a transport.
///
/// # Example
///
/// ```
/// use chandler::recipe::{CommandSet, Privilege};
///
/// let mut commands = CommandSet::new();
/// commands
///     .run("mkdir -p ~/.config/app")
///     .sudo("systemctl daemon-reload");
/// assert_eq!(commands.steps().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSet {
    steps: Vec<CommandStep>,
}

impl CommandSet {
    /// Create an empty command set.
    #[must_use]
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Record a command to run as the connecting user.
    pub fn run(&mut self, command: impl Into<String>) -> &mut Self {
        self.record(command, Privilege::User)
    }

    /// Record a command to run as root.
    pub fn sudo(&mut self, command: impl Into<String>) -> &mut Self {
        self.record(command, Privilege::Root)
    }

    /// Record a command under an explicit privilege.
    pub fn record(&mut self, command: impl Into<String>, privilege: Privilege) -> &mut Self {
        self.steps.push(CommandStep {
            command: command.into(),
            privilege,
        });
        self
    }

    /// The recorded steps, in recording order.
    #[must_use]
    pub fn steps(&self) -> &[CommandStep] {
        &self.steps
    }

    /// Number of recorded steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
