//! Immutable environment snapshots.
//!
//! The resolver never reads process-wide state. Callers capture the
//! environment once (or build a synthetic one in tests) and pass the
//! snapshot in explicitly.

use std::collections::BTreeMap;
use std::fmt;

/// A read-only mapping from variable name to optional value.
///
/// A name mapped to `None` is known but unusable (for example a process
/// variable whose value is not valid UTF-8) and is treated as missing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    vars: BTreeMap<String, Option<String>>,
}

impl EnvironmentSnapshot {
    /// Empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current process environment.
    pub fn capture() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(name, value)| {
                let name = name.into_string().ok()?;
                Some((name, value.into_string().ok()))
            })
            .collect();
        Self { vars }
    }

    /// Builder: set `name` to `value`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), Some(value.into()));
        self
    }

    /// Builder: record `name` as present but without a usable value.
    pub fn with_unset(mut self, name: impl Into<String>) -> Self {
        self.vars.insert(name.into(), None);
        self
    }

    /// Builder: drop `name` entirely.
    pub fn without(mut self, name: &str) -> Self {
        self.vars.remove(name);
        self
    }

    /// Value of `name`, if defined.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).and_then(|value| value.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Variable names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Layer `other` on top of `self`. Defined values in `other` win; a
    /// `None` in `other` never hides a defined value in `self`.
    pub fn overlay(mut self, other: EnvironmentSnapshot) -> Self {
        for (name, value) in other.vars {
            match value {
                Some(value) => {
                    self.vars.insert(name, Some(value));
                }
                None => {
                    self.vars.entry(name).or_insert(None);
                }
            }
        }
        self
    }
}

impl<K, V> FromIterator<(K, V)> for EnvironmentSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let vars = iter
            .into_iter()
            .map(|(name, value)| (name.into(), Some(value.into())))
            .collect();
        Self { vars }
    }
}

// Values are secrets; only names are printed.
impl fmt::Debug for EnvironmentSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentSnapshot")
            .field("names", &self.vars.keys().collect::<Vec<_>>())
            .finish()
    }
}
