//! Fatal configuration errors.
//!
//! These abort a whole resolution call. Per-profile problems are never
//! raised here; they are reported as [`crate::Diagnostic`]s instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::paths::PathRole;

/// Structural configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("toolchain paths `{first}` and `{second}` both point to {}", path.display())]
    PathConflict {
        first: PathRole,
        second: PathRole,
        path: PathBuf,
    },

    #[error("toolchain `{role}` directory does not exist: {}", path.display())]
    PathMissing { role: PathRole, path: PathBuf },

    #[error("toolchain `{role}` path is not a directory: {}", path.display())]
    NotADirectory { role: PathRole, path: PathBuf },

    #[error("failed to create toolchain `{role}` directory {}: {source}", path.display())]
    CreateDir {
        role: PathRole,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no network profiles configured")]
    NoProfiles,

    #[error("network profile `{0}` is declared more than once")]
    DuplicateProfile(String),

    #[error("network profile name must not be empty")]
    EmptyProfileName,
}

impl ConfigError {
    /// True for errors raised while validating [`crate::ToolchainPaths`].
    pub fn is_path_error(&self) -> bool {
        matches!(
            self,
            ConfigError::PathConflict { .. }
                | ConfigError::PathMissing { .. }
                | ConfigError::NotADirectory { .. }
                | ConfigError::CreateDir { .. }
        )
    }
}
