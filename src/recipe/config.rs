//! Configuration file entries.

use crate::recipe::command::CommandSet;

/// A configuration file staged for upload to a target host.
///
/// Carries the destination path, the file contents, and commands to run
/// after the file lands. Contents start out unset; replaying an entry
/// whose contents were never provided is an error, so a half-built entry
/// fails loudly instead of writing an empty file.
///
/// # Example
///
/// ```
/// use chandler::recipe::ConfigFile;
///
/// let mut entry = ConfigFile::new("/etc/motd");
/// entry
///     .contents("welcome\n")
///     .sudo("wall 'motd updated'");
/// assert_eq!(entry.data(), Some("welcome\n"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    path: String,
    contents: Option<String>,
    commands: CommandSet,
}

impl ConfigFile {
    /// Create an entry for the given destination path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: None,
            commands: CommandSet::new(),
        }
    }

    /// Set the contents to upload. Replaces any previous contents.
    pub fn contents(&mut self, contents: impl Into<String>) -> &mut Self {
        self.contents = Some(contents.into());
        self
    }

    /// Record a post-upload command to run as the connecting user.
    pub fn run(&mut self, command: impl Into<String>) -> &mut Self {
        self.commands.run(command);
        self
    }

    /// Record a post-upload command to run as root.
    pub fn sudo(&mut self, command: impl Into<String>) -> &mut Self {
        self.commands.sudo(command);
        self
    }

    /// Destination path on the target host.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The staged contents, if set.
    #[must_use]
    pub fn data(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Commands recorded to run after the upload.
    #[must_use]
    pub const fn commands(&self) -> &CommandSet {
        &self.commands
    }
}
