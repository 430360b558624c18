//! Toolchain directory layout.

use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::ConfigError;

/// The four directory roles a build toolchain works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathRole {
    Sources,
    Tests,
    Cache,
    Artifacts,
}

impl PathRole {
    pub const ALL: [PathRole; 4] = [
        PathRole::Sources,
        PathRole::Tests,
        PathRole::Cache,
        PathRole::Artifacts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PathRole::Sources => "sources",
            PathRole::Tests => "tests",
            PathRole::Cache => "cache",
            PathRole::Artifacts => "artifacts",
        }
    }

    /// Inputs must already exist; outputs are created on demand.
    pub fn is_input(&self) -> bool {
        matches!(self, PathRole::Sources | PathRole::Tests)
    }

    /// Conventional directory name used when a project does not override it.
    pub fn default_dir(&self) -> &'static str {
        match self {
            PathRole::Sources => "contracts",
            PathRole::Tests => "test",
            PathRole::Cache => "cache",
            PathRole::Artifacts => "artifacts",
        }
    }
}

impl fmt::Display for PathRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source, test, cache and artifact directories of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainPaths {
    pub sources: PathBuf,
    pub tests: PathBuf,
    pub cache: PathBuf,
    pub artifacts: PathBuf,
}

impl Default for ToolchainPaths {
    fn default() -> Self {
        Self {
            sources: PathRole::Sources.default_dir().into(),
            tests: PathRole::Tests.default_dir().into(),
            cache: PathRole::Cache.default_dir().into(),
            artifacts: PathRole::Artifacts.default_dir().into(),
        }
    }
}

impl ToolchainPaths {
    pub fn new(
        sources: impl Into<PathBuf>,
        tests: impl Into<PathBuf>,
        cache: impl Into<PathBuf>,
        artifacts: impl Into<PathBuf>,
    ) -> Self {
        Self {
            sources: sources.into(),
            tests: tests.into(),
            cache: cache.into(),
            artifacts: artifacts.into(),
        }
    }

    pub fn get(&self, role: PathRole) -> &Path {
        match role {
            PathRole::Sources => &self.sources,
            PathRole::Tests => &self.tests,
            PathRole::Cache => &self.cache,
            PathRole::Artifacts => &self.artifacts,
        }
    }

    /// Resolve relative entries against `root`. Absolute entries are kept.
    pub fn rooted_at(&self, root: &Path) -> Self {
        let join = |path: &Path| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                root.join(path)
            }
        };
        Self {
            sources: join(&self.sources),
            tests: join(&self.tests),
            cache: join(&self.cache),
            artifacts: join(&self.artifacts),
        }
    }

    /// Check that no two roles name the same location.
    ///
    /// Locations are compared lexically after making them absolute, so
    /// `./src` and `src/.` conflict. Symlinks are not followed.
    pub fn check_distinct(&self) -> Result<(), ConfigError> {
        let normalized: Vec<(PathRole, PathBuf)> = PathRole::ALL
            .iter()
            .map(|role| (*role, normalize(self.get(*role))))
            .collect();

        for (i, (first, first_path)) in normalized.iter().enumerate() {
            for (second, second_path) in &normalized[i + 1..] {
                if first_path == second_path {
                    return Err(ConfigError::PathConflict {
                        first: *first,
                        second: *second,
                        path: self.get(*first).to_path_buf(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Validate the layout and create missing output directories.
    ///
    /// Runs once per resolution: conflicts first, then required inputs, then
    /// `cache`/`artifacts` creation.
    pub fn prepare(&self) -> Result<(), ConfigError> {
        self.check_distinct()?;

        for role in PathRole::ALL.into_iter().filter(PathRole::is_input) {
            let path = self.get(role);
            if !path.exists() {
                return Err(ConfigError::PathMissing {
                    role,
                    path: path.to_path_buf(),
                });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory {
                    role,
                    path: path.to_path_buf(),
                });
            }
        }

        for role in PathRole::ALL.into_iter().filter(|role| !role.is_input()) {
            let path = self.get(role);
            if path.is_dir() {
                continue;
            }
            if path.exists() {
                return Err(ConfigError::NotADirectory {
                    role,
                    path: path.to_path_buf(),
                });
            }
            std::fs::create_dir_all(path).map_err(|source| ConfigError::CreateDir {
                role,
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!(role = %role, path = %path.display(), "created toolchain directory");
        }

        Ok(())
    }
}

fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
