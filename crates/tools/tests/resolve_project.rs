use chainprofile_core::{
    resolve_all, ConfigError, Diagnostic, DiagnosticKind, EnvironmentSnapshot, ParentRef,
};
use chainprofile_tools::{load_environment, ProjectConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const KEY: &str = "1111111111111111111111111111111111111111111111111111111111111111";

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

fn write_project(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::create_dir(dir.path().join("test")).unwrap();
    fs::write(dir.path().join("chainprofile.toml"), config).unwrap();
    dir
}

fn load(dir: &Path) -> ProjectConfig {
    ProjectConfig::from_file(&dir.join("chainprofile.toml")).unwrap()
}

#[test]
fn resolves_hardhat_project_from_dotenv() {
    let dir = write_project(HARDHAT);
    fs::write(
        dir.path().join(".env"),
        format!("INFURA_PROJECT_ID=abc123\nPRIVATE_KEY={KEY}\n"),
    )
    .unwrap();

    let config = load(dir.path());
    let env = load_environment(&config.root, None, EnvironmentSnapshot::new()).unwrap();
    let resolution = resolve_all(&config.profiles, &env, &config.paths).unwrap();

    assert!(resolution.diagnostics.is_empty());
    assert_eq!(resolution.resolved.len(), 4);
    assert_eq!(
        resolution.get("mainnet").unwrap().endpoint_url.expose_secret(),
        "https://mainnet.infura.io/v3/abc123"
    );
    assert!(dir.path().join("cache").is_dir());
    assert!(dir.path().join("out").is_dir());
}

#[test]
fn missing_private_key_excludes_every_network_that_needs_it() {
    let dir = write_project(HARDHAT);
    let config = load(dir.path());
    let env = EnvironmentSnapshot::new().with("INFURA_PROJECT_ID", "abc123");

    let resolution = resolve_all(&config.profiles, &env, &config.paths).unwrap();

    assert!(resolution.resolved.is_empty());
    assert_eq!(
        resolution.diagnostics,
        vec![
            Diagnostic::missing_env_var("sepolia", "PRIVATE_KEY"),
            Diagnostic::missing_env_var("mainnet", "PRIVATE_KEY"),
            Diagnostic::missing_env_var("zkTestnet", "PRIVATE_KEY"),
            Diagnostic::missing_env_var("zkSyncMainnet", "PRIVATE_KEY"),
        ]
    );
}

#[test]
fn rollups_survive_missing_infura_project() {
    let dir = write_project(HARDHAT);
    let config = load(dir.path());
    let env = EnvironmentSnapshot::new().with("PRIVATE_KEY", KEY);

    let resolution = resolve_all(&config.profiles, &env, &config.paths).unwrap();

    assert_eq!(
        resolution.resolved.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["zkSyncMainnet", "zkTestnet"]
    );
    assert_eq!(resolution.errors().count(), 2);
    assert!(resolution
        .diagnostics
        .iter()
        .all(|d| d.kind == DiagnosticKind::MissingEnvVar { var: "INFURA_PROJECT_ID".into() }));

    let zk = resolution.get("zkTestnet").unwrap().rollup.as_ref().unwrap();
    assert_eq!(zk.parent, ParentRef::Profile("sepolia".into()));
}

#[test]
fn cache_colliding_with_sources_is_fatal() {
    let dir = write_project(&HARDHAT.replace("cache = \"./cache\"", "cache = \"./src\""));
    let config = load(dir.path());
    let env = EnvironmentSnapshot::new()
        .with("INFURA_PROJECT_ID", "abc123")
        .with("PRIVATE_KEY", KEY);

    let err = resolve_all(&config.profiles, &env, &config.paths).unwrap_err();
    assert!(matches!(err, ConfigError::PathConflict { .. }));
}

#[test]
fn process_environment_overrides_dotenv() {
    let dir = write_project(HARDHAT);
    fs::write(
        dir.path().join(".env"),
        "INFURA_PROJECT_ID=from-file\nPRIVATE_KEY=abcd\n",
    )
    .unwrap();
    let config = load(dir.path());
    let process = EnvironmentSnapshot::new().with("PRIVATE_KEY", KEY);

    let env = load_environment(&config.root, None, process).unwrap();
    let resolution = resolve_all(&config.profiles, &env, &config.paths).unwrap();

    assert!(resolution.diagnostics.is_empty());
    assert_eq!(
        resolution.get("sepolia").unwrap().endpoint_url.expose_secret(),
        "https://sepolia.infura.io/v3/from-file"
    );
}
