//! Network profile declarations.
//!
//! A profile is either a standard EVM network or a layer-2 rollup that also
//! names the base-layer network it settles to. Both share [`ProfileBase`].

use serde::Serialize;
use std::fmt;

use crate::error::ConfigError;
use crate::template::Template;

/// Fields shared by every profile kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileBase {
    pub name: String,
    /// Endpoint URL template.
    pub url: Template,
    /// Credential templates, one per signing account, in declaration order.
    pub accounts: Vec<Template>,
}

impl ProfileBase {
    pub fn new<A, T>(name: impl Into<String>, url: impl Into<Template>, accounts: A) -> Self
    where
        A: IntoIterator<Item = T>,
        T: Into<Template>,
    {
        Self {
            name: name.into(),
            url: url.into(),
            accounts: accounts.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Standard,
    Rollup,
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileKind::Standard => f.pad("standard"),
            ProfileKind::Rollup => f.pad("rollup"),
        }
    }
}

/// A named way of reaching one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkProfile {
    Standard(ProfileBase),
    Rollup {
        base: ProfileBase,
        /// Base-layer network: a profile name, a well-known chain
        /// identifier, or an RPC URL. Descriptive only.
        parent: String,
    },
}

impl NetworkProfile {
    pub fn standard<A, T>(name: impl Into<String>, url: impl Into<Template>, accounts: A) -> Self
    where
        A: IntoIterator<Item = T>,
        T: Into<Template>,
    {
        NetworkProfile::Standard(ProfileBase::new(name, url, accounts))
    }

    pub fn rollup<A, T>(
        name: impl Into<String>,
        url: impl Into<Template>,
        accounts: A,
        parent: impl Into<String>,
    ) -> Self
    where
        A: IntoIterator<Item = T>,
        T: Into<Template>,
    {
        NetworkProfile::Rollup {
            base: ProfileBase::new(name, url, accounts),
            parent: parent.into(),
        }
    }

    pub fn base(&self) -> &ProfileBase {
        match self {
            NetworkProfile::Standard(base) => base,
            NetworkProfile::Rollup { base, .. } => base,
        }
    }

    pub fn name(&self) -> &str {
        &self.base().name
    }

    pub fn url(&self) -> &Template {
        &self.base().url
    }

    pub fn accounts(&self) -> &[Template] {
        &self.base().accounts
    }

    pub fn kind(&self) -> ProfileKind {
        match self {
            NetworkProfile::Standard(_) => ProfileKind::Standard,
            NetworkProfile::Rollup { .. } => ProfileKind::Rollup,
        }
    }

    pub fn is_rollup(&self) -> bool {
        self.kind() == ProfileKind::Rollup
    }

    pub fn parent_ref(&self) -> Option<&str> {
        match self {
            NetworkProfile::Standard(_) => None,
            NetworkProfile::Rollup { parent, .. } => Some(parent),
        }
    }
}

/// A non-empty, name-unique collection of profiles in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSet {
    profiles: Vec<NetworkProfile>,
}

impl ProfileSet {
    pub fn new(profiles: Vec<NetworkProfile>) -> Result<Self, ConfigError> {
        if profiles.is_empty() {
            return Err(ConfigError::NoProfiles);
        }
        for (i, profile) in profiles.iter().enumerate() {
            if profile.name().is_empty() {
                return Err(ConfigError::EmptyProfileName);
            }
            if profiles[..i].iter().any(|p| p.name() == profile.name()) {
                return Err(ConfigError::DuplicateProfile(profile.name().to_string()));
            }
        }
        Ok(Self { profiles })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NetworkProfile> {
        self.profiles.iter()
    }

    pub fn get(&self, name: &str) -> Option<&NetworkProfile> {
        self.profiles.iter().find(|p| p.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(NetworkProfile::name)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl<'a> IntoIterator for &'a ProfileSet {
    type Item = &'a NetworkProfile;
    type IntoIter = std::slice::Iter<'a, NetworkProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

const RPC_SCHEMES: [&str; 4] = ["http://", "https://", "ws://", "wss://"];

/// True when `url` starts with a scheme JSON-RPC endpoints are served over.
pub(crate) fn has_rpc_scheme(url: &str) -> bool {
    RPC_SCHEMES.iter().any(|scheme| url.starts_with(scheme))
}

/// Base-layer chains a rollup may name by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseChain {
    /// Ethereum mainnet
    Mainnet,
    /// Sepolia testnet
    Sepolia,
    /// Holesky testnet
    Holesky,
}

impl BaseChain {
    pub fn from_identifier(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" => Some(BaseChain::Mainnet),
            "sepolia" => Some(BaseChain::Sepolia),
            "holesky" => Some(BaseChain::Holesky),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BaseChain::Mainnet => "mainnet",
            BaseChain::Sepolia => "sepolia",
            BaseChain::Holesky => "holesky",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            BaseChain::Mainnet => 1,
            BaseChain::Sepolia => 11_155_111,
            BaseChain::Holesky => 17_000,
        }
    }
}

impl fmt::Display for BaseChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a rollup's parent reference points at. Classification only; the
/// reference is never followed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParentRef {
    /// Another declared profile (possibly the rollup itself).
    Profile(String),
    BaseChain(BaseChain),
    /// A base-layer RPC URL.
    Url(String),
    /// Anything else, forwarded as-is.
    Opaque(String),
}

impl ParentRef {
    /// Classify `raw` against the declared profiles. Declared names shadow
    /// well-known chain identifiers.
    pub fn classify(raw: &str, profiles: &ProfileSet) -> Self {
        if profiles.contains(raw) {
            return ParentRef::Profile(raw.to_string());
        }
        if let Some(chain) = BaseChain::from_identifier(raw) {
            return ParentRef::BaseChain(chain);
        }
        if has_rpc_scheme(raw) {
            return ParentRef::Url(raw.to_string());
        }
        ParentRef::Opaque(raw.to_string())
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentRef::Profile(name) => write!(f, "profile `{name}`"),
            ParentRef::BaseChain(chain) => write!(f, "{chain} (chain id {})", chain.chain_id()),
            ParentRef::Url(url) => f.write_str(url),
            ParentRef::Opaque(raw) => write!(f, "`{raw}`"),
        }
    }
}
