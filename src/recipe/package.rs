//! Package descriptors.

use crate::recipe::setup::{HostScope, Setup};

/// A package and the setup that accompanies its installation.
///
/// A package always has a primary name; additional names cover split or
/// renamed upstream packages that install together. All names appear on
/// the install command line.
#[derive(Debug, Default)]
pub struct Package {
    name: String,
    aliases: Vec<String>,
    setup: Setup,
}

impl Package {
    /// Create a package with the given primary name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            setup: Setup::new(),
        }
    }

    /// Add a further name installed alongside the primary one.
    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.aliases.push(name.into());
        self
    }

    /// The primary name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every name, primary first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// The package's setup plan.
    #[must_use]
    pub const fn setup(&self) -> &Setup {
        &self.setup
    }

    /// Mutable access to the package's setup plan.
    pub const fn setup_mut(&mut self) -> &mut Setup {
        &mut self.setup
    }

    /// Enter a host scope on the package's setup plan.
    pub fn host(&mut self, name: impl Into<String>) -> HostScope<'_> {
        self.setup.host(name)
    }
}

/// A package argument accepted by the distribution driver.
///
/// Driver operations take either a name to resolve through the recipe
/// directory, or an already built [`Package`].
#[derive(Debug)]
pub enum PackageArg {
    /// A package name, resolved via its recipe.
    Name(String),
    /// A ready package, passed through unchanged.
    Package(Package),
}

impl From<&str> for PackageArg {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for PackageArg {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<&String> for PackageArg {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}

impl From<Package> for PackageArg {
    fn from(package: Package) -> Self {
        Self::Package(package)
    }
}
