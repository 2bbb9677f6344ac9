//! OS backend trait for pluggable implementations

use nix::mount::{mount, MsFlags};
use nix::sched::{unshare, CloneFlags};

use burrow_core::{Error, Result};
use tracing::debug;

use crate::config::ShellConfig;
use crate::launcher;

/// Trait over the two OS primitives the bootstrapper composes
///
/// This allows for different implementations:
/// - [`SysBackend`] - Production syscalls
/// - [`MockBackend`] - Testing without privileges or real processes
///
/// Both operations mutate process-wide state; a backend is owned by
/// exactly one bootstrapper and never shared.
pub trait IsolationBackend {
    /// Detach the calling process into a new, private mount namespace
    ///
    /// # Errors
    /// Returns [`Error::IsolationDenied`] if the operating system refuses
    /// the request (insufficient privilege, kernel support missing, or a
    /// namespace limit reached). On error no partial isolation applies.
    fn unshare_mount(&mut self) -> Result<()>;

    /// Run the shell attached to the caller's terminal, blocking until
    /// it terminates; returns the child's exit code
    ///
    /// # Errors
    /// Returns [`Error::ChildLaunch`] if the child cannot be started.
    fn run_shell(&mut self, shell: &ShellConfig) -> Result<i32>;
}

/// Production backend issuing real syscalls
#[derive(Debug, Default)]
pub struct SysBackend;

impl SysBackend {
    /// Create a new system backend
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl IsolationBackend for SysBackend {
    fn unshare_mount(&mut self) -> Result<()> {
        debug!("Calling unshare(CLONE_NEWNS)");

        unshare(CloneFlags::CLONE_NEWNS).map_err(|errno| {
            tracing::error!(error = %errno, "Failed to unshare mount namespace");
            Error::IsolationDenied {
                message: format!("unshare(CLONE_NEWNS) failed: {errno}"),
            }
        })?;

        // The new namespace starts with copies of the host's mounts, and
        // on hosts where / is a shared mount those copies still propagate
        // events back. Remount the tree private so nothing escapes.
        mount(
            None::<&str>,
            "/",
            None::<&str>,
            MsFlags::MS_REC | MsFlags::MS_PRIVATE,
            None::<&str>,
        )
        .map_err(|errno| {
            tracing::error!(error = %errno, "Failed to make mount tree private");
            Error::IsolationDenied {
                message: format!("remounting / as rprivate failed: {errno}"),
            }
        })
    }

    fn run_shell(&mut self, shell: &ShellConfig) -> Result<i32> {
        launcher::run_shell(shell)
    }
}

/// A call recorded by [`MockBackend`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    /// The isolation primitive was invoked
    UnshareMount,
    /// The shell launch was invoked
    RunShell,
}

/// Mock backend for testing (no syscalls, no child processes)
///
/// Records every call in order and can be configured to deny isolation,
/// fail the launch, or report a canned exit code.
///
/// # Example
/// ```
/// use burrow_isolation::{IsolationBackend, MockBackend};
///
/// let mut backend = MockBackend::new().deny_isolation();
/// assert!(backend.unshare_mount().is_err());
/// assert_eq!(backend.unshare_calls(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockBackend {
    deny_isolation: bool,
    fail_launch: bool,
    exit_code: i32,
    calls: Vec<Call>,
}

impl MockBackend {
    /// Create a new mock backend that succeeds with exit code 0
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the isolation request fail with [`Error::IsolationDenied`]
    #[must_use]
    pub fn deny_isolation(mut self) -> Self {
        self.deny_isolation = true;
        self
    }

    /// Make the launch fail with [`Error::ChildLaunch`]
    #[must_use]
    pub fn fail_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    /// Set the exit code reported for a successful shell run
    #[must_use]
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// All calls made against this backend, in order
    #[must_use]
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Number of isolation requests made
    #[must_use]
    pub fn unshare_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| **c == Call::UnshareMount)
            .count()
    }

    /// Number of shell launches made
    #[must_use]
    pub fn launch_calls(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::RunShell).count()
    }
}

impl IsolationBackend for MockBackend {
    fn unshare_mount(&mut self) -> Result<()> {
        self.calls.push(Call::UnshareMount);

        if self.deny_isolation {
            debug!("Mock: Denying isolation request");
            return Err(Error::IsolationDenied {
                message: "mock denial".to_string(),
            });
        }

        debug!("Mock: Isolation granted");
        Ok(())
    }

    fn run_shell(&mut self, shell: &ShellConfig) -> Result<i32> {
        self.calls.push(Call::RunShell);

        if self.fail_launch {
            debug!(command = %shell, "Mock: Failing launch");
            return Err(Error::ChildLaunch {
                message: format!("mock launch failure for {}", shell.program().display()),
            });
        }

        debug!(command = %shell, code = self.exit_code, "Mock: Shell ran");
        Ok(self.exit_code)
    }
}
