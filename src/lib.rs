//! # rotacrypt
//!
//! Transparent key rotation for symmetric authenticated encryption.
//!
//! Values encrypted under an old key stay readable after the active key
//! changes. Each ciphertext starts with the tag of the key that produced it,
//! and decryption picks the matching key from the configured ring.
//!
//! ## Quick Start
//!
//! ```rust
//! use rotacrypt::{Encrypter, KeyRingConfig, RotateEncrypter, RotationalEncrypter};
//!
//! // Before rotation: V001 is active, the untagged legacy key is retired.
//! let before = KeyRingConfig::new("_V001_:|@|0dyABqn3OGcacvYGqypaKM")
//!     .with_old_key("wkHRWb5CGwDEl98VPx9I7L1234567890");
//! let before = RotationalEncrypter::from_config(&before).unwrap();
//! let stored = before.encrypt_string("Hello World").unwrap();
//! assert!(stored.starts_with("_V001_:"));
//!
//! // After rotation: V002 is active, V001 is retired.
//! let after = KeyRingConfig::new("_V002_:|@|jC8Uw7rcD1TSvrGdDtE4og")
//!     .with_old_key("_V001_:|@|0dyABqn3OGcacvYGqypaKM");
//! let after = RotationalEncrypter::from_config(&after).unwrap();
//!
//! assert!(after.is_encrypted(&stored));
//! assert_eq!(after.decrypt_string(&stored).unwrap(), "Hello World");
//! assert!(after.encrypt_string("new").unwrap().starts_with("_V002_:"));
//! ```
//!
//! ## Key format
//!
//! `_<PREFIX>_:|@|<random>`: everything before `|@|` is the tag, and the
//! whole string is the key. Keys without `|@|` are untagged legacy keys.
//! Either form may be given as `base64:<encoded>`.
//!
//! ## What's NOT Provided
//!
//! - Key storage or distribution
//! - Re-encryption of existing data
//! - Asymmetric encryption

#![deny(unsafe_code)]
#![doc(html_root_url = "https://docs.rs/rotacrypt/0.1.0")]

// ---------------------------------------------------------------------------
// Internal modules (not part of public API)
// ---------------------------------------------------------------------------

mod aead;
mod error;

// Payload codec is exposed for inspection tooling, not as stable API
#[doc(hidden)]
pub mod wire;

// ---------------------------------------------------------------------------
// Public modules
// ---------------------------------------------------------------------------

pub mod cipher;
pub mod config;
pub mod encrypter;
pub mod key;
pub mod keygen;
pub mod keyring;
pub mod tag;

pub use cipher::{AesGcmCipher, Cipher};
pub use config::KeyRingConfig;
pub use encrypter::{Encrypter, Inspection, RotateEncrypter, RotationalEncrypter};
pub use error::{ConfigError, Error, Result};
pub use key::{CipherKind, Key};
pub use keyring::KeyRing;
pub use tag::{is_tagged_envelope, KeyTag};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
