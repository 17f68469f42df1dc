//! Key tags
//!
//! A rotating key carries its own tag in front of a delimiter:
//!
//! ```text
//! _V001_:|@|0dyABqn3OGcacvYGqypaKM
//! ^^^^^^^                           tag (prefixed to every ciphertext)
//!        ^^^                        delimiter
//! ```
//!
//! The whole string, tag included, is the raw key material. Keys without the
//! delimiter are untagged (legacy) and produce untagged ciphertext.

use core::fmt;

use crate::error::ConfigError;

/// Separates the tag from the rest of the key.
pub const DELIMITER: &str = "|@|";

/// Number of characters between the underscores of a tag.
pub const PREFIX_LEN: usize = 4;

/// Identifier of the key that produced a ciphertext.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyTag(String);

impl KeyTag {
    /// Tag embedded in raw key material, or the empty tag when the key has no
    /// delimiter.
    pub fn extract(key: &[u8]) -> Self {
        match key
            .windows(DELIMITER.len())
            .position(|window| window == DELIMITER.as_bytes())
        {
            Some(at) => Self(String::from_utf8_lossy(&key[..at]).into_owned()),
            None => Self::default(),
        }
    }

    /// Build the tag `_<prefix>_:` for a four character prefix.
    pub fn for_prefix(prefix: &str) -> Result<Self, ConfigError> {
        if !is_valid_prefix(prefix) {
            return Err(ConfigError::InvalidPrefix(prefix.to_string()));
        }
        Ok(Self(format!("_{prefix}_:")))
    }

    /// Check the shape of a non-empty tag. The empty tag is always valid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.0.is_empty() {
            return Ok(());
        }
        let prefix = self
            .0
            .strip_prefix('_')
            .and_then(|rest| rest.strip_suffix("_:"))
            .unwrap_or_default();
        if is_valid_prefix(prefix) {
            Ok(())
        } else {
            Err(ConfigError::InvalidPrefix(self.0.clone()))
        }
    }

    /// True iff the tag is non-empty and `ciphertext` starts with it.
    pub fn matches(&self, ciphertext: &str) -> bool {
        !self.0.is_empty() && ciphertext.starts_with(self.0.as_str())
    }

    /// Remove the tag from the front of `ciphertext`. Occurrences of the tag
    /// text further into the payload are left alone.
    pub fn strip<'a>(&self, ciphertext: &'a str) -> Option<&'a str> {
        if self.0.is_empty() {
            return None;
        }
        ciphertext.strip_prefix(self.0.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for KeyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structural test for rotation-aware ciphertext: exactly one `:` and the
/// part before it is wrapped in underscores.
///
/// A legacy value that happens to have this shape is treated as tagged. The
/// AES-GCM payloads produced by this crate are standard base64, which never
/// contains `:` or `_`.
pub fn is_tagged_envelope(ciphertext: &str) -> bool {
    let mut parts = ciphertext.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(head), Some(_), None) => head.starts_with('_') && head.ends_with('_'),
        _ => false,
    }
}

fn is_valid_prefix(prefix: &str) -> bool {
    prefix.chars().count() == PREFIX_LEN
        && prefix
            .chars()
            .all(|c| c.is_ascii_graphic() && c != ':' && c != '|')
}
