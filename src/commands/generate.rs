//! The `generate` subcommand: scaffold recipe directories and files.

use std::path::Path;

use anyhow::{Context as _, Result, bail};
use tracing::{info, warn};

use crate::cli::{GenerateCommand, GlobalOpts};
use crate::templates;

/// Run a generate subcommand.
///
/// # Errors
///
/// Returns an error on filesystem failures, or for `recipe` when no
/// distribution directories exist yet.
pub fn run(global: &GlobalOpts, what: &GenerateCommand) -> Result<()> {
    match what {
        GenerateCommand::Template {
            distribution,
            directory,
        } => {
            let root = match directory {
                Some(dir) => dir.clone(),
                None => super::recipes_root(global)?,
            };
            template(&root, distribution)
        }
        GenerateCommand::Recipe { packages, force } => {
            let root = super::recipes_root(global)?;
            recipes(&root, packages, *force)
        }
    }
}

/// Create `<root>/<distribution>/` with a starter `common.toml`.
///
/// An existing `common.toml` is left alone; scaffolding is not allowed
/// to clobber a distribution that is already configured.
fn template(root: &Path, distribution: &str) -> Result<()> {
    let dir = root.join(distribution);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("cannot create {}", dir.display()))?;
    let path = dir.join("common.toml");
    if path.exists() {
        warn!("skipping {}: already exists", path.display());
        return Ok(());
    }
    std::fs::write(&path, templates::common_template(distribution))
        .with_context(|| format!("cannot write {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

/// Write a starter recipe for each package into every distribution
/// directory under `root`. Existing files are skipped unless `force`.
fn recipes(root: &Path, packages: &[String], force: bool) -> Result<()> {
    let dirs = distribution_dirs(root)?;
    if dirs.is_empty() {
        bail!(
            "no distribution directories under {}; run `chandler generate template` first",
            root.display()
        );
    }
    for dir in &dirs {
        for package in packages {
            let path = dir.join(format!("{package}.toml"));
            if path.exists() && !force {
                warn!("skipping {}: already exists", path.display());
                continue;
            }
            std::fs::write(&path, templates::recipe_template(package))
                .with_context(|| format!("cannot write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn distribution_dirs(root: &Path) -> Result<Vec<std::path::PathBuf>> {
    let mut dirs = Vec::new();
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(dirs),
        Err(err) => {
            return Err(err).with_context(|| format!("cannot read {}", root.display()));
        }
    };
    for entry in entries {
        let entry = entry.with_context(|| format!("cannot read {}", root.display()))?;
        if entry.file_type().is_ok_and(|kind| kind.is_dir()) {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}
