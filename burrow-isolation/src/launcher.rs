//! Interactive child process launch
//!
//! Spawns the configured shell with the parent's environment and all
//! three standard streams inherited, then blocks until it terminates.
//! Mount-namespace membership is inherited by plain children, so no
//! fork/exec gymnastics are needed here.

use std::os::unix::process::ExitStatusExt;
use std::process::Command;

use burrow_core::{Error, Result};
use tracing::{debug, info, warn};

use crate::config::ShellConfig;

/// Run the configured shell to completion and return its exit code
///
/// The child inherits the caller's environment verbatim and shares the
/// caller's stdin, stdout, and stderr, so the user interacts with it as
/// if it were run directly. The call does not return until the child
/// has terminated.
///
/// A spawn failure (program missing, exec refused) is a
/// [`Error::ChildLaunch`]; a child that runs and exits non-zero is not
/// an error, and its exit code is returned as-is. A child killed by a
/// signal yields `128 + signal`.
pub fn run_shell(shell: &ShellConfig) -> Result<i32> {
    info!(command = %shell, "Launching shell");

    let status = Command::new(shell.program())
        .args(&shell.args)
        .status()
        .map_err(|e| {
            warn!(command = %shell, error = %e, "Failed to start shell");
            Error::ChildLaunch {
                message: format!("Failed to start {}: {e}", shell.program().display()),
            }
        })?;

    let exit_code = status.code().map_or_else(
        || {
            // Killed by a signal: conventional 128 + signo
            let signal = status.signal().unwrap_or(0);
            warn!(signal, "Shell terminated by signal");
            128 + signal
        },
        |code| {
            debug!(code, "Shell exited");
            code
        },
    );

    Ok(exit_code)
}
