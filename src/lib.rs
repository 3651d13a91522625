//! Recipe-driven host provisioning.
//!
//! Describe, per Linux distribution, a set of packages, their install
//! command, and the configuration files and shell commands that follow
//! an install; then apply that description to the local machine or to
//! remote hosts over SSH.
//!
//! The public API is organised into four layers:
//!
//! - **[`recipe`]** — the DSL: command sets, config entries, setup plans,
//!   packages, and the TOML loader that builds them
//! - **[`distribution`]** — the driver that resolves packages and replays
//!   their setup in order
//! - **[`transport`]** — where replayed commands and uploads land (local
//!   shell or `ssh`)
//! - **[`commands`]** — top-level subcommand orchestration (`setup`,
//!   `config`, `generate`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

/// Command-line interface definitions.
pub mod cli;
pub mod commands;
pub mod distribution;
pub mod error;
pub mod logging;
pub mod recipe;
pub mod templates;
pub mod transport;
