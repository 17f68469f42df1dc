//! Unified error types for rotacrypt.

/// Errors produced while building a key ring from configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Two different keys carry the same tag.
    #[error("tag {0:?} is shared by more than one key")]
    DuplicateTag(String),

    /// A tag is not of the form `_XXXX_:`.
    #[error("invalid key tag {0:?}: prefix must be exactly 4 characters")]
    InvalidPrefix(String),

    /// Key material does not fit the configured cipher.
    #[error("invalid key length for {cipher}: expected {expected} bytes, got {got}")]
    InvalidKeyLength {
        cipher: &'static str,
        expected: usize,
        got: usize,
    },

    /// A `base64:` key could not be decoded.
    #[error("key is not valid base64")]
    InvalidBase64,

    /// An empty key string (or an empty entry in the old-key list).
    #[error("empty key")]
    EmptyKey,

    #[error("unknown cipher {0:?}")]
    UnknownCipher(String),

    /// The active key is untagged but untagged ciphertext would resolve to a
    /// different key, so the ring could not read its own output.
    #[error("untagged active key must also be the legacy key")]
    UntaggedActiveKey,

    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors surfaced by encrypt/decrypt operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No key in the ring carries the ciphertext's tag.
    #[error("unable to determine the encryption key used")]
    KeyResolutionFailed,

    /// The primitive cipher rejected the payload. Uniform on purpose: bad
    /// encoding, bad nonce and bad authentication tag are indistinguishable.
    #[error("decryption failed")]
    DecryptionFailed,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("decrypted value is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// True for failures that mean "this ring has no key for that value".
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyResolutionFailed)
    }
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
