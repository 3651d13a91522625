//! The `setup` subcommand: install packages and replay their setup on
//! each target host in turn.

use anyhow::Result;
use tracing::info;

use crate::cli::{GlobalOpts, SetupOpts};
use crate::distribution::Distribution;
use crate::recipe::PackageArg;

/// Run the setup command.
///
/// Hosts are provisioned sequentially: each host's full install and
/// replay completes before the next host begins. One batch wraps each
/// host, so after-actions fire once per host.
///
/// # Errors
///
/// Returns an error if recipe resolution, installation, or any replay
/// step fails; remaining hosts are not attempted.
pub fn run(global: &GlobalOpts, opts: &SetupOpts) -> Result<()> {
    let root = super::recipes_root(global)?;
    for transport in super::transports_for(&opts.host)? {
        info!(
            "setup {} on {} ({})",
            opts.packages.join(" "),
            transport.describe(),
            opts.distribution
        );
        let mut driver = Distribution::new(&opts.distribution, &root, transport)
            .with_dry_run(global.dry_run);
        let batch = {
            let mut batch = driver.batch();
            batch.setup_with(
                opts.packages.iter().map(PackageArg::from),
                opts.install_command.as_deref(),
            )?;
            batch
        };
        batch.finish()?;
    }
    Ok(())
}
