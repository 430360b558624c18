//! Per-profile resolution problems.

use serde::Serialize;
use std::fmt;

use crate::credential::{CredentialDefect, CANONICAL_KEY_HEX_DIGITS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported, but the profile still resolves.
    Warning,
    /// The profile is excluded from the resolved set.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// What went wrong. Names tokens and indices, never substituted values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A `${VAR}` token has no value in the environment.
    MissingEnvVar { var: String },
    /// A `${...}` token that cannot name a variable, or an unclosed `${`.
    MalformedPlaceholder { token: String },
    /// The endpoint URL rendered to an empty or blank string.
    EmptyEndpoint,
    /// Account `index` rendered to something that is not a usable key.
    InvalidCredential {
        index: usize,
        defect: CredentialDefect,
    },
    /// Account `index` is valid hex but not a 256-bit key.
    NonCanonicalCredentialLength { index: usize, digits: usize },
    /// A rollup declares an empty parent network reference.
    EmptyParentRef,
    /// The rendered endpoint is not an http(s) or ws(s) URL.
    UnrecognizedEndpointScheme,
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::MissingEnvVar { .. }
            | DiagnosticKind::MalformedPlaceholder { .. }
            | DiagnosticKind::EmptyEndpoint
            | DiagnosticKind::InvalidCredential { .. }
            | DiagnosticKind::EmptyParentRef => Severity::Error,
            DiagnosticKind::NonCanonicalCredentialLength { .. }
            | DiagnosticKind::UnrecognizedEndpointScheme => Severity::Warning,
        }
    }
}

/// A diagnostic tagged with the profile it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub profile: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(profile: impl Into<String>, kind: DiagnosticKind) -> Self {
        Self {
            profile: profile.into(),
            kind,
        }
    }

    pub fn missing_env_var(profile: impl Into<String>, var: impl Into<String>) -> Self {
        Self::new(profile, DiagnosticKind::MissingEnvVar { var: var.into() })
    }

    pub fn malformed_placeholder(profile: impl Into<String>, token: impl Into<String>) -> Self {
        Self::new(
            profile,
            DiagnosticKind::MalformedPlaceholder {
                token: token.into(),
            },
        )
    }

    pub fn invalid_credential(
        profile: impl Into<String>,
        index: usize,
        defect: CredentialDefect,
    ) -> Self {
        Self::new(profile, DiagnosticKind::InvalidCredential { index, defect })
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: network `{}`: ", self.severity(), self.profile)?;
        match &self.kind {
            DiagnosticKind::MissingEnvVar { var } => {
                write!(f, "environment variable `{var}` is not set")
            }
            DiagnosticKind::MalformedPlaceholder { token } => {
                write!(f, "placeholder `{token}` is malformed")
            }
            DiagnosticKind::EmptyEndpoint => write!(f, "endpoint URL is empty"),
            DiagnosticKind::InvalidCredential { index, defect } => {
                write!(f, "account #{index} is invalid: {defect}")
            }
            DiagnosticKind::NonCanonicalCredentialLength { index, digits } => write!(
                f,
                "account #{index} has {digits} hex digits, expected {CANONICAL_KEY_HEX_DIGITS}"
            ),
            DiagnosticKind::EmptyParentRef => write!(f, "rollup parent network is empty"),
            DiagnosticKind::UnrecognizedEndpointScheme => {
                write!(f, "endpoint URL is not http(s):// or ws(s)://")
            }
        }
    }
}
