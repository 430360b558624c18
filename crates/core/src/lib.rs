//! Network profile resolution for smart-contract build and deploy tooling.
//!
//! A project declares named network profiles whose endpoint URLs and signing
//! keys are templates over environment variables (`${INFURA_PROJECT_ID}`,
//! `0x${PRIVATE_KEY}`). This crate turns those declarations into validated,
//! ready-to-use connection parameters:
//!
//! 1. [`ToolchainPaths`] are checked once (distinct roles, input directories
//!    present, output directories created).
//! 2. Every profile is resolved independently against an immutable
//!    [`EnvironmentSnapshot`].
//! 3. Profiles that resolve cleanly become [`ResolvedNetwork`]s; the rest are
//!    reported as [`Diagnostic`]s naming the profile and the offending token.
//!
//! # Examples
//!
//! ```rust,no_run
//! use chainprofile_core::{
//!     resolve_all, EnvironmentSnapshot, NetworkProfile, ProfileSet, ToolchainPaths,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let profiles = ProfileSet::new(vec![NetworkProfile::standard(
//!     "sepolia",
//!     "https://sepolia.infura.io/v3/${INFURA_PROJECT_ID}",
//!     ["0x${PRIVATE_KEY}"],
//! )])?;
//! let env = EnvironmentSnapshot::capture();
//! let resolution = resolve_all(&profiles, &env, &ToolchainPaths::default())?;
//! for diagnostic in &resolution.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod credential;
pub mod diagnostic;
pub mod env;
pub mod error;
pub mod paths;
pub mod profile;
pub mod resolver;
pub mod template;

pub use credential::{CredentialDefect, PrivateKey, CANONICAL_KEY_HEX_DIGITS};
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use env::EnvironmentSnapshot;
pub use error::ConfigError;
pub use paths::{PathRole, ToolchainPaths};
pub use profile::{BaseChain, NetworkProfile, ParentRef, ProfileBase, ProfileKind, ProfileSet};
pub use resolver::{
    resolve_all, NetworkProfileResolver, Resolution, ResolvedNetwork, RollupMetadata, SecretUrl,
};
pub use template::{PlaceholderError, Template};
