//! Private key validation.
//!
//! A credential template such as `0x${PRIVATE_KEY}` must render to `0x`
//! followed by a non-empty, even-length run of hex digits. Sixty-four digits
//! (a 256-bit key) is canonical; other lengths are accepted so that short
//! test-only keys keep working, but the resolver warns about them.

use serde::Serialize;
use std::fmt;

/// Hex digits in a canonical 256-bit private key.
pub const CANONICAL_KEY_HEX_DIGITS: usize = 64;

const KEY_PREFIX: &str = "0x";

/// Why a rendered credential was rejected. Never carries key material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CredentialDefect {
    /// Does not start with `0x`.
    MissingPrefix,
    /// Nothing follows the `0x` prefix.
    Empty,
    /// Odd number of hex digits.
    OddLength { digits: usize },
    /// A character outside `[0-9a-fA-F]`, at this character offset after
    /// the prefix.
    NonHexDigit { position: usize },
}

impl fmt::Display for CredentialDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialDefect::MissingPrefix => write!(f, "key must start with `0x`"),
            CredentialDefect::Empty => write!(f, "key is empty after the `0x` prefix"),
            CredentialDefect::OddLength { digits } => {
                write!(f, "key has an odd number of hex digits ({digits})")
            }
            CredentialDefect::NonHexDigit { position } => {
                write!(f, "key contains a non-hex character at offset {position}")
            }
        }
    }
}

/// Validated signing key bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    bytes: Vec<u8>,
}

impl PrivateKey {
    /// Parse a rendered `0x`-prefixed hex key.
    pub fn parse(rendered: &str) -> Result<Self, CredentialDefect> {
        let digits = rendered
            .strip_prefix(KEY_PREFIX)
            .ok_or(CredentialDefect::MissingPrefix)?;

        if digits.is_empty() {
            return Err(CredentialDefect::Empty);
        }

        if let Some(position) = digits.chars().position(|c| !c.is_ascii_hexdigit()) {
            return Err(CredentialDefect::NonHexDigit { position });
        }
        // All ASCII from here, so byte length equals digit count.
        if digits.len() % 2 != 0 {
            return Err(CredentialDefect::OddLength {
                digits: digits.len(),
            });
        }

        let bytes = hex::decode(digits).map_err(|err| match err {
            hex::FromHexError::InvalidHexCharacter { index, .. } => {
                CredentialDefect::NonHexDigit { position: index }
            }
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                CredentialDefect::OddLength {
                    digits: digits.len(),
                }
            }
        })?;

        Ok(Self { bytes })
    }

    /// Number of hex digits the key was written with.
    pub fn hex_digits(&self) -> usize {
        self.bytes.len() * 2
    }

    pub fn is_canonical(&self) -> bool {
        self.hex_digits() == CANONICAL_KEY_HEX_DIGITS
    }

    /// Raw key bytes.
    pub fn expose_secret(&self) -> &[u8] {
        &self.bytes
    }

    /// Lowercase `0x`-prefixed hex encoding.
    pub fn expose_hex(&self) -> String {
        format!("{KEY_PREFIX}{}", hex::encode(&self.bytes))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(<redacted {} bytes>)", self.bytes.len())
    }
}

impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x<redacted>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn test_parse_canonical_key() {
        let key = PrivateKey::parse(KEY).unwrap();
        assert_eq!(key.hex_digits(), 64);
        assert!(key.is_canonical());
        assert_eq!(key.expose_secret().len(), 32);
        assert_eq!(key.expose_hex(), KEY);
    }

    #[test]
    fn test_parse_accepts_uppercase() {
        let key = PrivateKey::parse("0xABCDEF").unwrap();
        assert_eq!(key.expose_secret(), &[0xab, 0xcd, 0xef]);
        assert!(!key.is_canonical());
    }

    #[test]
    fn test_parse_rejects_missing_prefix() {
        assert_eq!(
            PrivateKey::parse("4c0883a6"),
            Err(CredentialDefect::MissingPrefix)
        );
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(PrivateKey::parse("0x"), Err(CredentialDefect::Empty));
        assert_eq!(PrivateKey::parse(""), Err(CredentialDefect::MissingPrefix));
    }

    #[test]
    fn test_parse_rejects_odd_length() {
        assert_eq!(
            PrivateKey::parse("0xabc"),
            Err(CredentialDefect::OddLength { digits: 3 })
        );
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert_eq!(
            PrivateKey::parse("0xabzz"),
            Err(CredentialDefect::NonHexDigit { position: 2 })
        );
        // A doubled prefix is not hex either.
        assert_eq!(
            PrivateKey::parse("0x0xabcd"),
            Err(CredentialDefect::NonHexDigit { position: 1 })
        );
    }

    #[test]
    fn test_parse_rejects_non_ascii() {
        // `é` is two bytes wide.
        assert_eq!(
            PrivateKey::parse("0xé1"),
            Err(CredentialDefect::NonHexDigit { position: 0 })
        );
        assert_eq!(
            PrivateKey::parse("0xab€"),
            Err(CredentialDefect::NonHexDigit { position: 2 })
        );
        assert_eq!(
            PrivateKey::parse("0xéé1a"),
            Err(CredentialDefect::NonHexDigit { position: 0 })
        );
    }

    #[test]
    fn test_non_hex_reported_before_odd_length() {
        assert_eq!(
            PrivateKey::parse("0xabz"),
            Err(CredentialDefect::NonHexDigit { position: 2 })
        );
    }

    #[test]
    fn test_debug_and_display_are_redacted() {
        let key = PrivateKey::parse(KEY).unwrap();
        assert!(!format!("{key:?}").contains("4c0883"));
        assert_eq!(key.to_string(), "0x<redacted>");
    }
}
