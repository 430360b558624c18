use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "chainprofile=info,chainprofile_core=info,chainprofile_tools=info";

const VERBOSE_FILTER: &str = "chainprofile=debug,chainprofile_core=debug,chainprofile_tools=debug";

/// Initialize logging for the chainprofile CLI
///
/// Logs go to stderr so that stdout stays clean for `--json` output. The
/// level can be controlled via the RUST_LOG environment variable:
/// - RUST_LOG=debug chainprofile resolve  (verbose logging)
/// - RUST_LOG=warn chainprofile resolve   (warnings and errors only)
///
/// `verbose` raises the default to debug when RUST_LOG is unset.
pub fn init(verbose: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}
