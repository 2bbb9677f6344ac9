//! Bootstrap execution logic

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use burrow_isolation::{current_mount_namespace, Bootstrapper};

/// Isolate, hand the terminal to a shell, and report its exit code
pub fn execute() -> Result<i32> {
    info!("🐚 Starting Burrow");

    let mut bootstrapper = Bootstrapper::with_defaults();

    if let Ok(host_ns) = current_mount_namespace() {
        debug!(namespace = %host_ns, "Host mount namespace");
    }

    bootstrapper
        .isolate()
        .context("Mount namespace isolation needs CAP_SYS_ADMIN. Try: sudo burrow")?;

    match current_mount_namespace() {
        Ok(ns) => info!(namespace = %ns, "Entered private mount namespace"),
        Err(e) => debug!(error = %e, "Could not read mount namespace id"),
    }

    info!("Mounts made in this shell stay invisible to the host. Exit to leave.");

    match bootstrapper.launch() {
        Ok(exit_code) => {
            info!(exit_code, "Shell session ended");
            Ok(exit_code)
        }
        Err(e) => {
            // Non-fatal: the namespace is torn down with this process anyway
            warn!(error = %e, "Shell did not run");
            Ok(0)
        }
    }
}
