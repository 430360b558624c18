//! `${VAR}` placeholder templates.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::env::EnvironmentSnapshot;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]*)\}").expect("placeholder pattern is valid"));

const OPEN: &str = "${";

/// Why a placeholder could not be substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderError {
    /// `${NAME}` where `NAME` has no value in the environment.
    Missing(String),
    /// A token that cannot name a variable: `${}`, a name containing
    /// whitespace or `${`, or an unclosed `${...`. Holds the token as written.
    Malformed(String),
}

/// A string containing zero or more `${VAR}` placeholders.
///
/// Any non-empty name without whitespace is looked up as written, so
/// `${RPC-KEY}` reads the `RPC-KEY` variable. Every `${` must belong to a
/// well-formed placeholder; there is no escape syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Template {
    raw: String,
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(OPEN) && !name.chars().any(char::is_whitespace)
}

impl Template {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The template text with placeholders intact. Safe to display.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Well-formed placeholder names in order of appearance, repeats included.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        PLACEHOLDER
            .captures_iter(&self.raw)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .filter(|name| is_valid_name(name))
    }

    /// Substitute every placeholder from `env`.
    ///
    /// All placeholders are attempted before failing, so the error lists
    /// every problem once, in order of first appearance.
    pub fn render(&self, env: &EnvironmentSnapshot) -> Result<String, Vec<PlaceholderError>> {
        let mut rendered = String::with_capacity(self.raw.len());
        let mut errors: Vec<PlaceholderError> = Vec::new();
        let mut push_error = |error: PlaceholderError| {
            if !errors.contains(&error) {
                errors.push(error);
            }
        };
        let mut last = 0;

        for caps in PLACEHOLDER.captures_iter(&self.raw) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            rendered.push_str(&self.raw[last..whole.start()]);
            last = whole.end();

            if !is_valid_name(name.as_str()) {
                push_error(PlaceholderError::Malformed(whole.as_str().to_string()));
                continue;
            }
            match env.get(name.as_str()) {
                Some(value) => rendered.push_str(value),
                None => push_error(PlaceholderError::Missing(name.as_str().to_string())),
            }
        }

        // The pattern matches leftmost-first up to the next `}`, so an
        // unmatched `${` can only remain in the tail, with no `}` after it.
        let tail = &self.raw[last..];
        if let Some(open) = tail.find(OPEN) {
            push_error(PlaceholderError::Malformed(tail[open..].to_string()));
        }
        rendered.push_str(tail);

        if errors.is_empty() {
            Ok(rendered)
        } else {
            Err(errors)
        }
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for Template {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Template {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}
