//! Shell configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the interactive child process
///
/// The default is the fixed command this demonstration runs: `/bin/sh`
/// with no arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Program to execute
    pub program: PathBuf,

    /// Arguments passed to the program
    pub args: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("/bin/sh"),
            args: Vec::new(),
        }
    }
}

impl ShellConfig {
    /// Create the default shell configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the program to execute
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Append a single argument
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Replace the argument list
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Get the program path
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl std::fmt::Display for ShellConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
