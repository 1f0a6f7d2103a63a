//! Status operation - enable or disable a module in the host.

use std::path::Path;

use eyre::Result;
use modforge_host::{ArtisanRunner, HostIntegration};

use crate::reports::StatusReport;

/// Execute the enable or disable operation.
pub fn set_status(
    host_root: &Path,
    module: &str,
    enabled: bool,
    runner: &dyn ArtisanRunner,
) -> Result<StatusReport> {
    let install = HostIntegration::new(host_root, runner).set_enabled(module, enabled)?;
    Ok(StatusReport {
        module: module.to_string(),
        enabled,
        install,
    })
}
