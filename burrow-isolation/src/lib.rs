//! Mount-namespace isolation for an interactive shell
//!
//! This crate implements the single primitive this project demonstrates:
//! detach the calling process into a new, private mount namespace, then
//! run an interactive shell inside it. Mounts and unmounts performed in
//! that shell are invisible to the namespace the process came from.
//!
//! The sequence is strictly linear: isolate, launch, wait, done. The
//! OS-facing primitives sit behind [`IsolationBackend`] so the sequence
//! can be exercised in tests without privileges.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod backend;
pub mod bootstrap;
pub mod config;
pub mod launcher;

pub use backend::{Call, IsolationBackend, MockBackend, SysBackend};
pub use bootstrap::{current_mount_namespace, mount_namespace_of, Bootstrapper, Phase};
pub use config::ShellConfig;
pub use launcher::run_shell;
