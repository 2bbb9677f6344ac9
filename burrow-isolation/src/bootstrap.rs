//! Bootstrap sequence: isolate, then hand the terminal to a shell

use std::fs;

use burrow_core::{Error, MountNamespaceId, Result};

use crate::backend::{IsolationBackend, SysBackend};
use crate::config::ShellConfig;

/// Progress of the bootstrap sequence
///
/// Transitions only move forward: `Uninitialized → Isolated →
/// ChildRunning → Done`. A denied isolation request leaves the phase at
/// `Uninitialized`, so no launch can follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing has happened yet
    Uninitialized,
    /// The process sits in its own private mount namespace
    Isolated,
    /// The shell is attached to the terminal and running
    ChildRunning,
    /// The shell has terminated
    Done,
}

/// The isolation bootstrapper
///
/// Owns the OS backend and the shell configuration, and drives the
/// strictly linear sequence the crate exists for: request a private
/// mount namespace for the calling process, then run an interactive
/// shell inside it and wait for it to exit.
#[derive(Debug)]
pub struct Bootstrapper<B = SysBackend> {
    backend: B,
    shell: ShellConfig,
    phase: Phase,
}

impl Bootstrapper<SysBackend> {
    /// Create a bootstrapper that issues real syscalls
    #[must_use]
    pub fn new(shell: ShellConfig) -> Self {
        Self::with_backend(SysBackend::new(), shell)
    }

    /// Create a bootstrapper for the default interactive shell
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ShellConfig::default())
    }
}

impl<B: IsolationBackend> Bootstrapper<B> {
    /// Create a bootstrapper over an explicit backend
    #[must_use]
    pub fn with_backend(backend: B, shell: ShellConfig) -> Self {
        Self {
            backend,
            shell,
            phase: Phase::Uninitialized,
        }
    }

    /// Get the shell configuration
    #[must_use]
    pub fn shell(&self) -> &ShellConfig {
        &self.shell
    }

    /// Get the current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Get the backend (mainly useful for inspecting mocks in tests)
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Detach the calling process into a new, private mount namespace
    ///
    /// After this returns `Ok`, mounts and unmounts performed by this
    /// process or its children stay invisible to the original
    /// namespace. The kernel tears the namespace down when the last
    /// process in it exits; there is nothing to undo.
    ///
    /// # Errors
    /// Returns [`Error::IsolationDenied`] if the operating system
    /// refuses. This is fatal to the sequence: the phase does not
    /// advance and no shell may be launched.
    pub fn isolate(&mut self) -> Result<()> {
        if self.phase != Phase::Uninitialized {
            tracing::warn!("Mount namespace already unshared");
            return Ok(());
        }

        self.backend.unshare_mount()?;
        self.phase = Phase::Isolated;

        tracing::info!("Mount namespace isolation in effect");
        Ok(())
    }

    /// Run the interactive shell and block until it terminates
    ///
    /// The child inherits the isolated mount namespace, the full
    /// environment, and the caller's standard streams. Returns the
    /// child's exit code.
    ///
    /// # Errors
    /// Returns [`Error::ChildLaunch`] if called before a successful
    /// [`isolate`](Self::isolate), or if the shell cannot be started.
    /// Either way the sequence still finishes: the phase ends at
    /// `Done`.
    pub fn launch(&mut self) -> Result<i32> {
        if self.phase == Phase::Uninitialized {
            return Err(Error::ChildLaunch {
                message: "shell requested before mount namespace isolation".to_string(),
            });
        }

        self.phase = Phase::ChildRunning;
        let outcome = self.backend.run_shell(&self.shell);
        self.phase = Phase::Done;

        let exit_code = outcome?;
        tracing::info!(exit_code, "Shell session finished");
        Ok(exit_code)
    }

    /// Run the whole sequence: isolate, launch, wait
    ///
    /// # Errors
    /// Propagates [`Error::IsolationDenied`] from the isolation step
    /// (in which case no child was ever launched) and
    /// [`Error::ChildLaunch`] from the launch step.
    pub fn run(&mut self) -> Result<i32> {
        self.isolate()?;
        self.launch()
    }
}

impl Default for Bootstrapper<SysBackend> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Get the mount-namespace identity of a process
///
/// # Errors
/// Returns an I/O error if `/proc/<pid>/ns/mnt` cannot be read.
pub fn mount_namespace_of(pid: u32) -> Result<MountNamespaceId> {
    let path = format!("/proc/{pid}/ns/mnt");
    let link = fs::read_link(&path)?;
    Ok(MountNamespaceId::new(link.to_string_lossy()))
}

/// Get the mount-namespace identity of the calling process
///
/// # Errors
/// Returns an I/O error if `/proc/self/ns/mnt` cannot be read.
pub fn current_mount_namespace() -> Result<MountNamespaceId> {
    mount_namespace_of(std::process::id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Call, MockBackend};

    #[test]
    fn test_bootstrapper_starts_uninitialized() {
        let bootstrapper = Bootstrapper::with_defaults();

        assert_eq!(bootstrapper.phase(), Phase::Uninitialized);
        assert_eq!(bootstrapper.shell().program(), std::path::Path::new("/bin/sh"));
    }

    #[test]
    fn test_full_sequence_with_mock() {
        let backend = MockBackend::new().with_exit_code(3);
        let mut bootstrapper = Bootstrapper::with_backend(backend, ShellConfig::default());

        let code = bootstrapper.run().unwrap();

        assert_eq!(code, 3);
        assert_eq!(bootstrapper.phase(), Phase::Done);
        // Exactly one isolation request, strictly before exactly one launch
        assert_eq!(
            bootstrapper.backend().calls(),
            &[Call::UnshareMount, Call::RunShell]
        );
    }

    #[test]
    fn test_denied_isolation_never_launches() {
        let backend = MockBackend::new().deny_isolation();
        let mut bootstrapper = Bootstrapper::with_backend(backend, ShellConfig::default());

        let err = bootstrapper.run().unwrap_err();

        assert!(matches!(err, Error::IsolationDenied { .. }));
        assert_eq!(bootstrapper.phase(), Phase::Uninitialized);
        assert_eq!(bootstrapper.backend().launch_calls(), 0);
    }

    #[test]
    fn test_launch_before_isolation_is_refused() {
        let mut bootstrapper =
            Bootstrapper::with_backend(MockBackend::new(), ShellConfig::default());

        let err = bootstrapper.launch().unwrap_err();

        assert!(matches!(err, Error::ChildLaunch { .. }));
        assert_eq!(bootstrapper.backend().launch_calls(), 0);
    }

    #[test]
    fn test_repeated_isolate_is_noop() {
        let mut bootstrapper =
            Bootstrapper::with_backend(MockBackend::new(), ShellConfig::default());

        bootstrapper.isolate().unwrap();
        bootstrapper.isolate().unwrap();

        assert_eq!(bootstrapper.backend().unshare_calls(), 1);
        assert_eq!(bootstrapper.phase(), Phase::Isolated);
    }

    #[test]
    fn test_launch_failure_still_reaches_done() {
        let backend = MockBackend::new().fail_launch();
        let mut bootstrapper = Bootstrapper::with_backend(backend, ShellConfig::default());

        bootstrapper.isolate().unwrap();
        let err = bootstrapper.launch().unwrap_err();

        assert!(matches!(err, Error::ChildLaunch { .. }));
        assert_eq!(bootstrapper.phase(), Phase::Done);
    }

    #[test]
    fn test_current_mount_namespace_readable() {
        let ns = current_mount_namespace().unwrap();
        assert!(ns.as_str().starts_with("mnt:["));
    }

    #[test]
    fn test_mount_namespace_of_self_matches_current() {
        let by_pid = mount_namespace_of(std::process::id()).unwrap();
        let current = current_mount_namespace().unwrap();
        assert_eq!(by_pid, current);
    }
}
