//! Subcommand orchestration.
//!
//! Each submodule owns one CLI subcommand: it turns parsed options into
//! drivers and transports, then hands control to the core. Shared
//! plumbing (recipe-root resolution, transport construction) lives here.

pub mod config;
pub mod generate;
pub mod setup;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::transport::{LocalTransport, SshTransport, Transport};

/// Resolve the recipe root: `--recipes` when given, else `./recipes`,
/// absolutized against the current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn recipes_root(global: &GlobalOpts) -> Result<PathBuf> {
    let root = global
        .recipes
        .clone()
        .unwrap_or_else(|| PathBuf::from("recipes"));
    if root.is_absolute() {
        Ok(root)
    } else {
        let cwd = std::env::current_dir().context("cannot determine current directory")?;
        Ok(cwd.join(root))
    }
}

/// One transport per target host, or a single local transport when no
/// hosts were named.
///
/// # Errors
///
/// Returns an error if the `ssh` binary cannot be found.
pub fn transports_for(hosts: &[String]) -> Result<Vec<Arc<dyn Transport>>> {
    if hosts.is_empty() {
        return Ok(vec![Arc::new(LocalTransport::new())]);
    }
    hosts
        .iter()
        .map(|host| {
            let transport = SshTransport::new(host)?;
            Ok(Arc::new(transport) as Arc<dyn Transport>)
        })
        .collect()
}
