//! Project configuration loading
//!
//! A project is described by a `chainprofile.toml` file. The file is located
//! in priority order:
//!
//! 1. An explicit path (the `--config` flag)
//! 2. The `CHAINPROFILE_CONFIG` environment variable
//! 3. The nearest `chainprofile.toml` in the current directory or a parent
//!
//! Secrets referenced by network templates come from the process
//! environment and, optionally, a `.env` file next to the configuration.
//!
//! # Examples
//!
//! ```rust,no_run
//! use chainprofile_core::resolve_all;
//! use chainprofile_tools::config::{load_environment, ProjectConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let process = chainprofile_core::EnvironmentSnapshot::capture();
//! let config = ProjectConfig::load(None, &process)?;
//! let env = load_environment(&config.root, None, process)?;
//! let resolution = resolve_all(&config.profiles, &env, &config.paths)?;
//! println!("{} networks ready", resolution.resolved.len());
//! # Ok(())
//! # }
//! ```

use chainprofile_core::{EnvironmentSnapshot, NetworkProfile, ProfileSet, ToolchainPaths};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file name searched for in the project tree.
pub const CONFIG_FILE_NAME: &str = "chainprofile.toml";

/// Environment variable that points at a configuration file.
pub const CONFIG_ENV_VAR: &str = "CHAINPROFILE_CONFIG";

/// Secrets file read from the project root.
pub const DOTENV_FILE_NAME: &str = ".env";

/// Configuration loading error types
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("no chainprofile.toml found in {} or any parent directory", start.display())]
    NotFound { start: PathBuf },

    #[error("invalid solidity compiler version `{version}`: {source}")]
    InvalidCompilerVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("network `{network}`: {detail}")]
    Shape { network: String, detail: String },

    #[error("failed to read env file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error(transparent)]
    Config(#[from] chainprofile_core::ConfigError),
}

/// Raw file layout.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    solidity: String,
    #[serde(default)]
    paths: RawPaths,
    // Kept as a table so declaration order survives (`preserve_order`).
    #[serde(default)]
    networks: toml::Table,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPaths {
    sources: Option<PathBuf>,
    tests: Option<PathBuf>,
    cache: Option<PathBuf>,
    artifacts: Option<PathBuf>,
}

/// One `[networks.<name>]` entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNetwork {
    url: String,
    #[serde(default)]
    accounts: Vec<String>,
    #[serde(default)]
    eth_network: Option<String>,
    #[serde(default)]
    zksync: bool,
}

impl RawNetwork {
    fn into_profile(self, name: &str) -> Result<NetworkProfile, LoadError> {
        let shape = |detail: &str| LoadError::Shape {
            network: name.to_string(),
            detail: detail.to_string(),
        };

        if self.url.trim().is_empty() {
            return Err(shape("`url` must not be empty"));
        }

        match (self.zksync, self.eth_network) {
            (true, Some(parent)) => Ok(NetworkProfile::rollup(name, self.url, self.accounts, parent)),
            (true, None) => Err(shape("`zksync = true` requires `eth_network`")),
            (false, Some(_)) => Err(shape("`eth_network` is only valid with `zksync = true`")),
            (false, None) => Ok(NetworkProfile::standard(name, self.url, self.accounts)),
        }
    }
}

/// A loaded, shape-validated project configuration
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Directory containing the configuration file
    pub root: PathBuf,
    /// Path of the configuration file itself
    pub config_path: PathBuf,
    /// Solidity compiler version
    pub solidity: semver::Version,
    /// Toolchain directories, already joined onto `root`
    pub paths: ToolchainPaths,
    /// Declared network profiles
    pub profiles: ProfileSet,
}

impl ProjectConfig {
    /// Locate and load the project configuration.
    ///
    /// `explicit` wins over `CHAINPROFILE_CONFIG` in `env`, which wins over
    /// searching upward from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if:
    /// - No configuration file can be found
    /// - The file cannot be read or is not valid TOML
    /// - A network entry is malformed
    pub fn load(explicit: Option<&Path>, env: &EnvironmentSnapshot) -> Result<Self, LoadError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = env.get(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            return Self::from_file(Path::new(path));
        }

        let cwd = std::env::current_dir().map_err(|source| LoadError::Read {
            path: PathBuf::from("."),
            source,
        })?;
        Self::find_and_load(&cwd)
    }

    /// Search upward from `start_dir` for `chainprofile.toml`.
    pub fn find_and_load(start_dir: &Path) -> Result<Self, LoadError> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Self::from_file(&candidate);
            }
            if !dir.pop() {
                break;
            }
        }
        Err(LoadError::NotFound {
            start: start_dir.to_path_buf(),
        })
    }

    /// Load a specific configuration file.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut config = Self::parse(&content, &root)?;
        config.config_path = path.to_path_buf();
        tracing::debug!(
            config = %path.display(),
            networks = config.profiles.len(),
            "loaded project configuration"
        );
        Ok(config)
    }

    /// Parse configuration text. Relative paths are resolved against `root`.
    pub fn parse(content: &str, root: &Path) -> Result<Self, LoadError> {
        let raw: RawConfig = toml::from_str(content)?;

        let solidity = semver::Version::parse(raw.solidity.trim()).map_err(|source| {
            LoadError::InvalidCompilerVersion {
                version: raw.solidity.clone(),
                source,
            }
        })?;

        let defaults = ToolchainPaths::default();
        let paths = ToolchainPaths {
            sources: raw.paths.sources.unwrap_or(defaults.sources),
            tests: raw.paths.tests.unwrap_or(defaults.tests),
            cache: raw.paths.cache.unwrap_or(defaults.cache),
            artifacts: raw.paths.artifacts.unwrap_or(defaults.artifacts),
        }
        .rooted_at(root);

        let mut profiles = Vec::with_capacity(raw.networks.len());
        for (name, value) in raw.networks {
            let network: RawNetwork = value.try_into()?;
            profiles.push(network.into_profile(&name)?);
        }
        let profiles = ProfileSet::new(profiles)?;

        Ok(ProjectConfig {
            root: root.to_path_buf(),
            config_path: root.join(CONFIG_FILE_NAME),
            solidity,
            paths,
            profiles,
        })
    }
}

/// Build the environment snapshot used for resolution.
///
/// Entries from the `.env` file (or `env_file`, when given) form the base and
/// `process` is layered on top, so variables already set in the process are
/// never overridden. A missing default `.env` is not an error; a missing
/// explicit `env_file` is.
pub fn load_environment(
    root: &Path,
    env_file: Option<&Path>,
    process: EnvironmentSnapshot,
) -> Result<EnvironmentSnapshot, LoadError> {
    let path = match env_file {
        Some(path) => path.to_path_buf(),
        None => {
            let default = root.join(DOTENV_FILE_NAME);
            if !default.is_file() {
                return Ok(process);
            }
            default
        }
    };

    let env_error = |source| LoadError::EnvFile {
        path: path.clone(),
        source,
    };
    let mut from_file = Vec::new();
    for entry in dotenvy::from_path_iter(&path).map_err(env_error)? {
        from_file.push(entry.map_err(env_error)?);
    }
    tracing::debug!(file = %path.display(), entries = from_file.len(), "read env file");

    Ok(from_file
        .into_iter()
        .collect::<EnvironmentSnapshot>()
        .overlay(process))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainprofile_core::ProfileKind;
    use tempfile::TempDir;

    const HARDHAT: &str = r#"
solidity = "0.8.27"

[paths]
sources = "./src"
tests = "./test"
cache = "./cache"
artifacts = "./out"

[networks.sepolia]
url = "https://sepolia.infura.io/v3/${INFURA_PROJECT_ID}"
accounts = ["0x${PRIVATE_KEY}"]

[networks.mainnet]
url = "https://mainnet.infura.io/v3/${INFURA_PROJECT_ID}"
accounts = ["0x${PRIVATE_KEY}"]

[networks.zkTestnet]
url = "https://sepolia.era.zksync.dev"
eth_network = "sepolia"
zksync = true
accounts = ["0x${PRIVATE_KEY}"]

[networks.zkSyncMainnet]
url = "https://mainnet.era.zksync.io"
eth_network = "mainnet"
zksync = true
accounts = ["0x${PRIVATE_KEY}"]
"#;

    #[test]
    fn test_parse_hardhat_layout() {
        let config = ProjectConfig::parse(HARDHAT, Path::new("/project")).unwrap();

        assert_eq!(config.solidity, semver::Version::new(0, 8, 27));
        assert_eq!(config.paths.sources, PathBuf::from("/project/./src"));
        assert_eq!(config.paths.artifacts, PathBuf::from("/project/./out"));
        assert_eq!(
            config.profiles.names().collect::<Vec<_>>(),
            vec!["sepolia", "mainnet", "zkTestnet", "zkSyncMainnet"]
        );

        let zk = config.profiles.get("zkSyncMainnet").unwrap();
        assert_eq!(zk.kind(), ProfileKind::Rollup);
        assert_eq!(zk.parent_ref(), Some("mainnet"));
        assert_eq!(
            config.profiles.get("sepolia").unwrap().accounts()[0].as_str(),
            "0x${PRIVATE_KEY}"
        );
    }

    #[test]
    fn test_default_paths() {
        let config = ProjectConfig::parse(
            r#"
solidity = "0.8.27"
[networks.local]
url = "http://127.0.0.1:8545"
"#,
            Path::new("/project"),
        )
        .unwrap();

        assert_eq!(config.paths.sources, PathBuf::from("/project/contracts"));
        assert_eq!(config.paths.tests, PathBuf::from("/project/test"));
        assert_eq!(config.paths.cache, PathBuf::from("/project/cache"));
        assert_eq!(config.paths.artifacts, PathBuf::from("/project/artifacts"));
        assert!(config.profiles.get("local").unwrap().accounts().is_empty());
    }

    #[test]
    fn test_invalid_compiler_version() {
        let result = ProjectConfig::parse(
            "solidity = \"latest\"\n[networks.local]\nurl = \"http://localhost:8545\"\n",
            Path::new("."),
        );
        assert!(matches!(result, Err(LoadError::InvalidCompilerVersion { .. })));
    }

    #[test]
    fn test_missing_solidity_field() {
        let result = ProjectConfig::parse(
            "[networks.local]\nurl = \"http://localhost:8545\"\n",
            Path::new("."),
        );
        assert!(matches!(result, Err(LoadError::Toml(_))));
    }

    #[test]
    fn test_no_networks() {
        let result = ProjectConfig::parse("solidity = \"0.8.27\"\n", Path::new("."));
        assert!(matches!(
            result,
            Err(LoadError::Config(chainprofile_core::ConfigError::NoProfiles))
        ));
    }

    #[test]
    fn test_rollup_requires_eth_network() {
        let result = ProjectConfig::parse(
            "solidity = \"0.8.27\"\n[networks.zk]\nurl = \"https://zk\"\nzksync = true\n",
            Path::new("."),
        );
        assert!(matches!(result, Err(LoadError::Shape { network, .. }) if network == "zk"));
    }

    #[test]
    fn test_eth_network_requires_zksync() {
        let result = ProjectConfig::parse(
            "solidity = \"0.8.27\"\n[networks.zk]\nurl = \"https://zk\"\neth_network = \"sepolia\"\n",
            Path::new("."),
        );
        assert!(matches!(result, Err(LoadError::Shape { .. })));
    }

    #[test]
    fn test_empty_url_rejected() {
        let result = ProjectConfig::parse(
            "solidity = \"0.8.27\"\n[networks.local]\nurl = \"\"\n",
            Path::new("."),
        );
        assert!(matches!(result, Err(LoadError::Shape { .. })));
    }

    #[test]
    fn test_empty_eth_network_is_left_to_resolver() {
        let config = ProjectConfig::parse(
            "solidity = \"0.8.27\"\n[networks.zk]\nurl = \"https://zk\"\nzksync = true\neth_network = \"\"\n",
            Path::new("."),
        )
        .unwrap();
        assert_eq!(config.profiles.get("zk").unwrap().parent_ref(), Some(""));
    }

    #[test]
    fn test_unknown_network_field_rejected() {
        let result = ProjectConfig::parse(
            "solidity = \"0.8.27\"\n[networks.local]\nurl = \"http://localhost\"\nchainId = 1\n",
            Path::new("."),
        );
        assert!(matches!(result, Err(LoadError::Toml(_))));
    }

    #[test]
    fn test_find_and_load_searches_parents() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), HARDHAT).unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = ProjectConfig::find_and_load(&nested).unwrap();
        assert_eq!(config.root, dir.path());
        assert_eq!(config.config_path, dir.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_load_prefers_explicit_then_env_var() {
        let dir = TempDir::new().unwrap();
        let explicit = dir.path().join("explicit.toml");
        let from_env = dir.path().join("from-env.toml");
        std::fs::write(&explicit, HARDHAT).unwrap();
        std::fs::write(
            &from_env,
            "solidity = \"0.8.20\"\n[networks.local]\nurl = \"http://localhost:8545\"\n",
        )
        .unwrap();
        let env = EnvironmentSnapshot::new().with(CONFIG_ENV_VAR, from_env.to_string_lossy());

        let config = ProjectConfig::load(Some(&explicit), &env).unwrap();
        assert_eq!(config.solidity, semver::Version::new(0, 8, 27));

        let config = ProjectConfig::load(None, &env).unwrap();
        assert_eq!(config.solidity, semver::Version::new(0, 8, 20));
    }

    #[test]
    fn test_load_environment_process_wins() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(DOTENV_FILE_NAME),
            "INFURA_PROJECT_ID=from-file\nPRIVATE_KEY=abcd\n",
        )
        .unwrap();
        let process = EnvironmentSnapshot::new().with("INFURA_PROJECT_ID", "from-process");

        let env = load_environment(dir.path(), None, process).unwrap();
        assert_eq!(env.get("INFURA_PROJECT_ID"), Some("from-process"));
        assert_eq!(env.get("PRIVATE_KEY"), Some("abcd"));
    }

    #[test]
    fn test_load_environment_without_dotenv() {
        let dir = TempDir::new().unwrap();
        let process = EnvironmentSnapshot::new().with("A", "1");
        let env = load_environment(dir.path(), None, process.clone()).unwrap();
        assert_eq!(env, process);
    }

    #[test]
    fn test_load_environment_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let result = load_environment(
            dir.path(),
            Some(&dir.path().join("missing.env")),
            EnvironmentSnapshot::new(),
        );
        assert!(matches!(result, Err(LoadError::EnvFile { .. })));
    }
}
