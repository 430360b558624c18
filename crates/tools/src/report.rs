//! Human and JSON renderings of a resolution.
//!
//! Endpoints are always shown as their templates (`${VAR}` intact) and keys
//! only as counts, so nothing printed here contains secret material.

use chainprofile_core::{
    Diagnostic, ParentRef, ProfileKind, Resolution, ResolvedNetwork, ToolchainPaths,
};
use serde::Serialize;
use std::fmt::Write as _;

use crate::config::ProjectConfig;

/// Secret-free view of one resolved network.
#[derive(Debug, Serialize)]
pub struct NetworkReport<'a> {
    pub name: &'a str,
    pub kind: ProfileKind,
    pub endpoint: &'a str,
    pub accounts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<&'a ParentRef>,
}

impl<'a> From<&'a ResolvedNetwork> for NetworkReport<'a> {
    fn from(network: &'a ResolvedNetwork) -> Self {
        Self {
            name: &network.name,
            kind: network.kind(),
            endpoint: network.endpoint_template.as_str(),
            accounts: network.credentials.len(),
            parent: network.rollup.as_ref().map(|rollup| &rollup.parent),
        }
    }
}

/// Secret-free view of a whole resolution.
#[derive(Debug, Serialize)]
pub struct ResolutionReport<'a> {
    pub solidity: String,
    pub paths: &'a ToolchainPaths,
    pub networks: Vec<NetworkReport<'a>>,
    pub diagnostics: &'a [Diagnostic],
}

impl<'a> ResolutionReport<'a> {
    /// Networks appear in declaration order.
    pub fn new(config: &'a ProjectConfig, resolution: &'a Resolution) -> Self {
        let networks = config
            .profiles
            .names()
            .filter_map(|name| resolution.get(name))
            .map(NetworkReport::from)
            .collect();
        Self {
            solidity: config.solidity.to_string(),
            paths: &config.paths,
            networks,
            diagnostics: &resolution.diagnostics,
        }
    }
}

/// Get the resolution as pretty JSON
pub fn to_json(config: &ProjectConfig, resolution: &Resolution) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ResolutionReport::new(config, resolution))
}

/// Boxed summary of the resolved configuration.
pub fn render_summary(config: &ProjectConfig, resolution: &Resolution) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "╔════════════════════════════════════════════════════════════════╗");
    let _ = writeln!(out, "║         NETWORK CONFIGURATION RESOLVED                         ║");
    let _ = writeln!(out, "╚════════════════════════════════════════════════════════════════╝");
    let _ = writeln!(out, "  Config:              {}", config.config_path.display());
    let _ = writeln!(out, "  Solidity:            {}", config.solidity);
    let _ = writeln!(out, "  Sources:             {}", config.paths.sources.display());
    let _ = writeln!(out, "  Tests:               {}", config.paths.tests.display());
    let _ = writeln!(out, "  Cache:               {}", config.paths.cache.display());
    let _ = writeln!(out, "  Artifacts:           {}", config.paths.artifacts.display());
    let _ = writeln!(
        out,
        "  Networks:            {} of {} resolved",
        resolution.resolved.len(),
        config.profiles.len()
    );

    for profile in &config.profiles {
        match resolution.get(profile.name()) {
            Some(network) => {
                let report = NetworkReport::from(network);
                let _ = writeln!(out, "  ✔ {} ({})", report.name, report.kind);
                let _ = writeln!(out, "      RPC URL:         {}", report.endpoint);
                let _ = writeln!(out, "      Accounts:        {}", report.accounts);
                if let Some(parent) = report.parent {
                    let _ = writeln!(out, "      Settles to:      {parent}");
                }
            }
            None => {
                let _ = writeln!(out, "  ✘ {} (not resolved)", profile.name());
            }
        }
    }

    if !resolution.diagnostics.is_empty() {
        let _ = writeln!(out, "  Diagnostics:");
        out.push_str(&render_diagnostics(resolution, "    "));
    }
    let _ = writeln!(out, "╚════════════════════════════════════════════════════════════════╝");
    out
}

/// One diagnostic per line, each prefixed with `indent`.
pub fn render_diagnostics(resolution: &Resolution, indent: &str) -> String {
    let mut out = String::new();
    for diagnostic in &resolution.diagnostics {
        let _ = writeln!(out, "{indent}{diagnostic}");
    }
    out
}

/// Whether `check` succeeds: no errors, and no warnings either when `strict`.
pub fn check_passed(resolution: &Resolution, strict: bool) -> bool {
    !resolution.has_errors() && !(strict && resolution.warnings().next().is_some())
}

/// Outcome for a network named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStatus {
    Resolved,
    /// Declared, but excluded by an error diagnostic.
    Unresolved,
    /// No profile with that name.
    Undeclared,
}

impl NetworkStatus {
    pub fn is_success(&self) -> bool {
        *self == NetworkStatus::Resolved
    }
}

pub fn requested_network_status(
    config: &ProjectConfig,
    resolution: &Resolution,
    name: &str,
) -> NetworkStatus {
    if resolution.is_resolved(name) {
        NetworkStatus::Resolved
    } else if config.profiles.contains(name) {
        NetworkStatus::Unresolved
    } else {
        NetworkStatus::Undeclared
    }
}

/// Declared profiles without resolving them.
pub fn render_network_list(config: &ProjectConfig) -> String {
    let mut out = String::new();
    for profile in &config.profiles {
        let _ = write!(out, "{:<20} {:<9} {}", profile.name(), profile.kind(), profile.url());
        if let Some(parent) = profile.parent_ref() {
            let _ = write!(out, "  (parent: {parent})");
        }
        out.push('\n');
    }
    out
}
