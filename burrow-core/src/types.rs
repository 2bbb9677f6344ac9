//! Core type definitions with strong typing

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a mount namespace as reported by the kernel
///
/// Wraps the text of the `/proc/<pid>/ns/mnt` symlink, e.g.
/// `mnt:[4026531840]`. Two processes observe the same mount table
/// if and only if their ids compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct MountNamespaceId(String);

impl MountNamespaceId {
    /// Create from the raw symlink text
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MountNamespaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<MountNamespaceId> for String {
    fn from(id: MountNamespaceId) -> Self {
        id.0
    }
}
