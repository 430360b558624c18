//! Turn declared profiles into ready-to-use network descriptors.
//!
//! Resolution runs in a fixed order:
//!
//! 1. Validate [`ToolchainPaths`] once. Conflicts and missing inputs are fatal.
//! 2. Substitute the endpoint URL template. It must not render blank.
//! 3. Substitute and validate every credential template.
//! 4. For rollups, check the parent reference is non-empty.
//!
//! Steps 2 to 4 run per profile. A profile with any error diagnostic is left
//! out of [`Resolution::resolved`]; the others are unaffected.

use std::collections::BTreeMap;
use std::fmt;

use crate::credential::PrivateKey;
use crate::diagnostic::{Diagnostic, DiagnosticKind, Severity};
use crate::env::EnvironmentSnapshot;
use crate::error::ConfigError;
use crate::paths::ToolchainPaths;
use crate::profile::{has_rpc_scheme, NetworkProfile, ParentRef, ProfileKind, ProfileSet};
use crate::template::{PlaceholderError, Template};

/// Endpoint URL with secrets substituted in.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretUrl(String);

impl SecretUrl {
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretUrl(<redacted>)")
    }
}

/// Rollup-specific connection metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupMetadata {
    /// The reference exactly as declared.
    pub parent_network_ref: String,
    pub parent: ParentRef,
}

/// A profile that resolved without errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNetwork {
    pub name: String,
    pub endpoint_url: SecretUrl,
    /// The URL template the endpoint was rendered from, safe to print.
    pub endpoint_template: Template,
    pub credentials: Vec<PrivateKey>,
    pub rollup: Option<RollupMetadata>,
}

impl ResolvedNetwork {
    pub fn kind(&self) -> ProfileKind {
        if self.rollup.is_some() {
            ProfileKind::Rollup
        } else {
            ProfileKind::Standard
        }
    }
}

/// Outcome of a resolution call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Usable networks by name.
    pub resolved: BTreeMap<String, ResolvedNetwork>,
    /// Ordered by profile declaration, then resolution step.
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn get(&self, name: &str) -> Option<&ResolvedNetwork> {
        self.resolved.get(name)
    }

    pub fn is_resolved(&self, name: &str) -> bool {
        self.resolved.contains_key(name)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Diagnostics concerning one profile.
    pub fn diagnostics_for<'a>(&'a self, profile: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.profile == profile)
    }
}

/// Resolves profiles against one environment snapshot.
#[derive(Debug, Clone, Copy)]
pub struct NetworkProfileResolver<'a> {
    env: &'a EnvironmentSnapshot,
}

impl<'a> NetworkProfileResolver<'a> {
    pub fn new(env: &'a EnvironmentSnapshot) -> Self {
        Self { env }
    }

    /// Validate `paths`, then resolve every profile in declaration order.
    ///
    /// # Errors
    ///
    /// Only structural path problems are returned as errors; nothing is
    /// resolved in that case. Environment problems become diagnostics.
    pub fn resolve_all(
        &self,
        profiles: &ProfileSet,
        paths: &ToolchainPaths,
    ) -> Result<Resolution, ConfigError> {
        paths.prepare()?;

        let mut resolution = Resolution::default();
        for profile in profiles {
            let (resolved, diagnostics) = self.resolve_profile(profile, profiles);
            match resolved {
                Some(network) => {
                    tracing::debug!(network = %network.name, kind = %network.kind(), "resolved network profile");
                    resolution.resolved.insert(network.name.clone(), network);
                }
                None => {
                    tracing::warn!(
                        network = %profile.name(),
                        errors = diagnostics.iter().filter(|d| d.is_error()).count(),
                        "network profile excluded"
                    );
                }
            }
            resolution.diagnostics.extend(diagnostics);
        }
        Ok(resolution)
    }

    /// Resolve a single profile. `profiles` is only used to classify a
    /// rollup's parent reference.
    pub fn resolve_profile(
        &self,
        profile: &NetworkProfile,
        profiles: &ProfileSet,
    ) -> (Option<ResolvedNetwork>, Vec<Diagnostic>) {
        let name = profile.name();
        let mut diagnostics = Vec::new();
        let mut reported: Vec<PlaceholderError> = Vec::new();

        let mut report_placeholders =
            |errors: Vec<PlaceholderError>, diagnostics: &mut Vec<Diagnostic>| {
                for error in errors {
                    if reported.contains(&error) {
                        continue;
                    }
                    diagnostics.push(match &error {
                        PlaceholderError::Missing(var) => {
                            Diagnostic::missing_env_var(name, var.as_str())
                        }
                        PlaceholderError::Malformed(token) => {
                            Diagnostic::malformed_placeholder(name, token.as_str())
                        }
                    });
                    reported.push(error);
                }
            };

        let endpoint = match profile.url().render(self.env) {
            Ok(url) if url.trim().is_empty() => {
                diagnostics.push(Diagnostic::new(name, DiagnosticKind::EmptyEndpoint));
                None
            }
            Ok(url) => {
                if !has_rpc_scheme(&url) {
                    diagnostics.push(Diagnostic::new(
                        name,
                        DiagnosticKind::UnrecognizedEndpointScheme,
                    ));
                }
                Some(url)
            }
            Err(errors) => {
                report_placeholders(errors, &mut diagnostics);
                None
            }
        };

        let mut credentials = Vec::with_capacity(profile.accounts().len());
        for (index, template) in profile.accounts().iter().enumerate() {
            let rendered = match template.render(self.env) {
                Ok(rendered) => rendered,
                Err(errors) => {
                    report_placeholders(errors, &mut diagnostics);
                    continue;
                }
            };
            match PrivateKey::parse(&rendered) {
                Ok(key) => {
                    if !key.is_canonical() {
                        diagnostics.push(Diagnostic::new(
                            name,
                            DiagnosticKind::NonCanonicalCredentialLength {
                                index,
                                digits: key.hex_digits(),
                            },
                        ));
                    }
                    credentials.push(key);
                }
                Err(defect) => diagnostics.push(Diagnostic::invalid_credential(name, index, defect)),
            }
        }

        let rollup = match profile {
            NetworkProfile::Standard(_) => None,
            NetworkProfile::Rollup { parent, .. } if parent.trim().is_empty() => {
                diagnostics.push(Diagnostic::new(name, DiagnosticKind::EmptyParentRef));
                None
            }
            NetworkProfile::Rollup { parent, .. } => Some(RollupMetadata {
                parent_network_ref: parent.clone(),
                parent: ParentRef::classify(parent, profiles),
            }),
        };

        let failed = diagnostics.iter().any(Diagnostic::is_error);
        let resolved = match endpoint {
            Some(url) if !failed => Some(ResolvedNetwork {
                name: name.to_string(),
                endpoint_url: SecretUrl(url),
                endpoint_template: profile.url().clone(),
                credentials,
                rollup,
            }),
            _ => None,
        };
        (resolved, diagnostics)
    }
}

/// Resolve `profiles` against `env` after validating `paths`.
///
/// Shorthand for [`NetworkProfileResolver::resolve_all`].
pub fn resolve_all(
    profiles: &ProfileSet,
    env: &EnvironmentSnapshot,
    paths: &ToolchainPaths,
) -> Result<Resolution, ConfigError> {
    NetworkProfileResolver::new(env).resolve_all(profiles, paths)
}
