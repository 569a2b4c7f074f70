//! Custom error types for sealcfg
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions. Cryptographic failures are kept as
//! distinct variants so callers can tell a malformed envelope apart from
//! a tampered one or from a key problem; none of them are ever masked.

use thiserror::Error;

/// The main error type for sealcfg operations
#[derive(Error, Debug)]
pub enum SealError {
    /// Invalid input to `encrypt` (empty or whitespace-only plaintext)
    #[error("Input error: {0}")]
    Input(String),

    /// Envelope framing errors (too short, size fields inconsistent
    /// with the actual buffer length, or empty signature region)
    #[error("Format error: {0}")]
    Format(String),

    /// Signature verification over the envelope prefix failed.
    ///
    /// The envelope must be treated as tampered or corrupted; no
    /// decryption is attempted after this error.
    #[error("Signature verification failed")]
    Integrity,

    /// No certificate with the requested thumbprint exists in the store
    #[error("Certificate not found with Thumbprint: {thumbprint}, Store Name: {store_name}, and Store Location: {store_location}")]
    CertificateNotFound {
        thumbprint: String,
        store_location: String,
        store_name: String,
    },

    /// The certificate exists but does not expose a private key
    #[error("Certificate associated with the provided Thumbprint [{thumbprint}] does not contain a private key")]
    NoPrivateKey { thumbprint: String },

    /// Key-level errors (unwrap failure, unusable key material)
    #[error("Key error: {0}")]
    Key(String),

    /// Cipher-level errors (bad padding, wrong key/iv length,
    /// non-UTF-8 plaintext)
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl SealError {
    /// Check if this is an integrity (tampering) error
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity)
    }

    /// Check if this is an envelope format error
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// Check if this is a key-related error (lookup or unwrap)
    pub fn is_key(&self) -> bool {
        matches!(
            self,
            Self::Key(_) | Self::CertificateNotFound { .. } | Self::NoPrivateKey { .. }
        )
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for SealError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SealError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for sealcfg operations
pub type SealResult<T> = Result<T, SealError>;
