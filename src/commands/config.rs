//! The `config` subcommand: replay configuration uploads without
//! installing anything. After-actions never fire here.

use anyhow::Result;
use tracing::info;

use crate::cli::{ConfigOpts, GlobalOpts};
use crate::distribution::Distribution;
use crate::recipe::PackageArg;

/// Run the config command, one host at a time.
///
/// # Errors
///
/// Returns an error if recipe resolution or any upload or post-upload
/// command fails; remaining hosts are not attempted.
pub fn run(global: &GlobalOpts, opts: &ConfigOpts) -> Result<()> {
    let root = super::recipes_root(global)?;
    for transport in super::transports_for(&opts.host)? {
        info!(
            "config {} on {} ({})",
            opts.packages.join(" "),
            transport.describe(),
            opts.distribution
        );
        let mut driver = Distribution::new(&opts.distribution, &root, transport)
            .with_dry_run(global.dry_run);
        driver.config(opts.packages.iter().map(PackageArg::from))?;
    }
    Ok(())
}
