//! The provisioning DSL: commands, config files, setup plans, packages,
//! and the TOML loader that builds them from recipe directories.

pub mod command;
pub mod config;
pub mod loader;
pub mod package;
pub mod setup;

pub use command::{CommandSet, CommandStep, Privilege};
pub use config::ConfigFile;
pub use package::{Package, PackageArg};
pub use setup::{AfterAction, HostScope, Setup};
