//! Cryptographic core for sealcfg
//!
//! Implements the hybrid encryption envelope: an ephemeral AES-256-CBC key
//! derived from fresh randomness, wrapped with the certificate's RSA public
//! key, and the whole prefix signed with RSA/SHA-512. See [`envelope`] for
//! the wire format.

pub mod cipher;
pub mod envelope;
pub mod key_derivation;

pub use cipher::{cipher_decrypt, cipher_encrypt, IV_LEN, KEY_LEN};
pub use envelope::{decrypt, encrypt, Envelope};
pub use key_derivation::{derive_material, SymmetricMaterial, SEED_LEN, STRETCH_ITERATIONS};
