//! Error types for Burrow

use thiserror::Error;

/// Burrow error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The operating system refused the mount-namespace isolation request
    #[error("Isolation denied: {message}")]
    IsolationDenied {
        /// Reason reported by the operating system
        message: String,
    },

    /// The interactive child process could not be started
    #[error("Child launch failed: {message}")]
    ChildLaunch {
        /// Error message
        message: String,
    },
}

impl Error {
    /// True for errors that must abort the run before any child is launched
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::IsolationDenied { .. })
    }
}

/// Result type alias for Burrow operations
pub type Result<T> = std::result::Result<T, Error>;
