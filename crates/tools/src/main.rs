use anyhow::{Context, Result};
use chainprofile_core::{resolve_all, EnvironmentSnapshot, Resolution};
use chainprofile_tools::report::NetworkStatus;
use chainprofile_tools::{config, logging, report, ProjectConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "chainprofile")]
#[command(about = "Resolve smart-contract network profiles and deployment credentials")]
struct Cli {
    /// Path to chainprofile.toml (defaults to CHAINPROFILE_CONFIG, then the nearest file)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Env file to read secrets from (defaults to .env next to the config)
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,
    /// Debug logging when RUST_LOG is unset
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve network profiles and print a summary
    Resolve {
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
        /// Fail unless this network resolves
        #[arg(short, long)]
        network: Option<String>,
    },
    /// Validate configuration and environment
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// List declared networks without resolving them
    Networks,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let process = EnvironmentSnapshot::capture();
    let project = ProjectConfig::load(cli.config.as_deref(), &process)
        .context("Failed to load project configuration")?;

    match cli.command {
        Commands::Networks => {
            print!("{}", report::render_network_list(&project));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Resolve { json, network } => {
            let resolution = resolve(&project, cli.env_file, process)?;
            if json {
                println!("{}", report::to_json(&project, &resolution)?);
            } else {
                print!("{}", report::render_summary(&project, &resolution));
            }

            let Some(name) = network else {
                return Ok(ExitCode::SUCCESS);
            };
            match report::requested_network_status(&project, &resolution, &name) {
                NetworkStatus::Resolved => Ok(ExitCode::SUCCESS),
                NetworkStatus::Unresolved => {
                    tracing::error!(network = %name, "requested network did not resolve");
                    Ok(ExitCode::FAILURE)
                }
                NetworkStatus::Undeclared => {
                    tracing::error!(network = %name, "requested network is not declared");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Check { strict } => {
            let resolution = resolve(&project, cli.env_file, process)?;
            eprint!("{}", report::render_diagnostics(&resolution, ""));

            let errors = resolution.errors().count();
            let warnings = resolution.warnings().count();
            if !report::check_passed(&resolution, strict) {
                tracing::error!(errors, warnings, "configuration check failed");
                Ok(ExitCode::FAILURE)
            } else {
                tracing::info!(
                    networks = resolution.resolved.len(),
                    warnings,
                    "configuration check passed"
                );
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn resolve(
    project: &ProjectConfig,
    env_file: Option<PathBuf>,
    process: EnvironmentSnapshot,
) -> Result<Resolution> {
    let env = config::load_environment(&project.root, env_file.as_deref(), process)
        .context("Failed to read environment")?;
    let resolution = resolve_all(&project.profiles, &env, &project.paths)
        .context("Toolchain paths are invalid")?;
    Ok(resolution)
}
