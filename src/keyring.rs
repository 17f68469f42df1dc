//! Active key plus retired keys, in configuration order.

use std::collections::HashMap;

use crate::error::{ConfigError, Error, Result};
use crate::key::{CipherKind, Key};
use crate::tag::{is_tagged_envelope, KeyTag};

/// Separates entries of the old-key list.
pub const KEY_LIST_SEPARATOR: char = ',';

#[derive(Clone, Debug)]
struct Entry {
    key: Key,
    tag: KeyTag,
}

impl Entry {
    fn new(key: Key) -> Self {
        let tag = key.tag();
        Self { key, tag }
    }
}

/// Immutable set of keys known to one configuration.
///
/// New data is always encrypted with the active key; retired keys are kept
/// only so older ciphertext stays readable.
#[derive(Clone, Debug)]
pub struct KeyRing {
    active: Entry,
    retired: Vec<Entry>,
}

impl KeyRing {
    /// Build a ring, rejecting configurations that would make key resolution
    /// ambiguous.
    pub fn new(active: Key, retired: Vec<Key>) -> Result<Self, ConfigError> {
        let ring = Self {
            active: Entry::new(active),
            retired: retired.into_iter().map(Entry::new).collect(),
        };
        ring.validate()?;
        Ok(ring)
    }

    /// Parse configured key strings. `key_old` is a single key or a
    /// comma-separated list, most recent first; when absent the active key
    /// doubles as the old key.
    pub fn parse(key: &str, key_old: Option<&str>, cipher: CipherKind) -> Result<Self, ConfigError> {
        let active = Key::parse(key, cipher)?;
        let retired = match key_old.filter(|old| !old.is_empty()) {
            Some(list) => parse_key_list(list, cipher)?,
            None => vec![active.clone()],
        };
        Self::new(active, retired)
    }

    pub fn active_key(&self) -> &Key {
        &self.active.key
    }

    pub fn active_tag(&self) -> &KeyTag {
        &self.active.tag
    }

    pub fn retired_keys(&self) -> impl ExactSizeIterator<Item = &Key> + '_ {
        self.retired.iter().map(|entry| &entry.key)
    }

    /// Whether new ciphertext carries a tag.
    pub fn is_rotation_enabled(&self) -> bool {
        !self.active.tag.is_empty()
    }

    /// Key for ciphertext that carries no tag: the first untagged retired
    /// key, else the first retired key, else the active key.
    pub fn legacy_key(&self) -> &Key {
        self.retired
            .iter()
            .find(|entry| entry.tag.is_empty())
            .or_else(|| self.retired.first())
            .map_or(&self.active.key, |entry| &entry.key)
    }

    /// Find the key whose tag prefixes `ciphertext`. The active key is checked
    /// first, then retired keys in order.
    pub fn resolve(&self, ciphertext: &str) -> Result<(&Key, &KeyTag)> {
        if !is_tagged_envelope(ciphertext) {
            return Err(Error::KeyResolutionFailed);
        }
        core::iter::once(&self.active)
            .chain(self.retired.iter())
            .find(|entry| entry.tag.matches(ciphertext))
            .map(|entry| (&entry.key, &entry.tag))
            .ok_or(Error::KeyResolutionFailed)
    }

    /// True iff any key's tag prefixes `value`. No decryption is attempted.
    pub fn matches_any(&self, value: &str) -> bool {
        core::iter::once(&self.active)
            .chain(self.retired.iter())
            .any(|entry| entry.tag.matches(value))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: HashMap<&str, &Key> = HashMap::new();
        for entry in core::iter::once(&self.active).chain(self.retired.iter()) {
            entry.tag.validate()?;
            if entry.tag.is_empty() {
                continue;
            }
            match seen.get(entry.tag.as_str()) {
                Some(existing) if **existing != entry.key => {
                    return Err(ConfigError::DuplicateTag(entry.tag.as_str().to_string()));
                }
                Some(_) => {}
                None => {
                    seen.insert(entry.tag.as_str(), &entry.key);
                }
            }
        }

        if self.active.tag.is_empty() && *self.legacy_key() != self.active.key {
            return Err(ConfigError::UntaggedActiveKey);
        }
        Ok(())
    }
}

/// Split an old-key list on `,` and parse each entry on its own.
pub fn parse_key_list(list: &str, cipher: CipherKind) -> Result<Vec<Key>, ConfigError> {
    list.split(KEY_LIST_SEPARATOR)
        .map(|entry| Key::parse(entry, cipher))
        .collect()
}
