//! Ephemeral key material derivation
//!
//! Expands a fresh 32-byte random seed into AES key + CBC IV material
//! using a PBKDF2 stretch. The seed is random to begin with, so the
//! stretch is purely an expansion step; it is kept for parity with the
//! established envelope scheme rather than for password hardening.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::cipher::{IV_LEN, KEY_LEN};

/// Length of the random seed fed into the stretch function
pub const SEED_LEN: usize = 32;

/// Length of the random salt for the stretch function
pub const SALT_LEN: usize = 32;

/// PBKDF2 iteration count used to expand the seed
pub const STRETCH_ITERATIONS: u32 = 10_000;

/// Ephemeral symmetric key material for one envelope
///
/// Generated fresh per encrypt call, never persisted, never reused.
/// Zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SymmetricMaterial {
    /// AES-256 key
    pub key: [u8; KEY_LEN],
    /// CBC initialization vector
    pub iv: [u8; IV_LEN],
}

impl SymmetricMaterial {
    /// The wrapped form placed in the envelope: `key ‖ iv`
    pub fn concat(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(KEY_LEN + IV_LEN);
        out.extend_from_slice(&self.key);
        out.extend_from_slice(&self.iv);
        out
    }

    /// Split unwrapped `key ‖ iv` bytes back into material
    ///
    /// Returns `None` if the slice is not exactly `KEY_LEN + IV_LEN`
    /// bytes long.
    pub fn from_concat(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != KEY_LEN + IV_LEN {
            return None;
        }
        let mut key = [0u8; KEY_LEN];
        let mut iv = [0u8; IV_LEN];
        key.copy_from_slice(&bytes[..KEY_LEN]);
        iv.copy_from_slice(&bytes[KEY_LEN..]);
        Some(Self { key, iv })
    }
}

/// Derive key + iv material from a random seed and salt
///
/// PBKDF2-HMAC-SHA-256, 10,000 iterations, 48 bytes of output: the
/// first 32 bytes become the AES key, the next 16 the IV.
pub fn derive_material(seed: &[u8], salt: &[u8]) -> SymmetricMaterial {
    let mut okm = [0u8; KEY_LEN + IV_LEN];
    pbkdf2_hmac::<Sha256>(seed, salt, STRETCH_ITERATIONS, &mut okm);

    let mut key = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];
    key.copy_from_slice(&okm[..KEY_LEN]);
    iv.copy_from_slice(&okm[KEY_LEN..]);
    okm.zeroize();

    SymmetricMaterial { key, iv }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_material_lengths() {
        let material = derive_material(&[1u8; SEED_LEN], &[2u8; SALT_LEN]);
        assert_eq!(material.key.len(), KEY_LEN);
        assert_eq!(material.iv.len(), IV_LEN);
    }

    #[test]
    fn test_same_seed_same_material() {
        let a = derive_material(&[7u8; SEED_LEN], &[9u8; SALT_LEN]);
        let b = derive_material(&[7u8; SEED_LEN], &[9u8; SALT_LEN]);
        assert_eq!(a.key, b.key);
        assert_eq!(a.iv, b.iv);
    }

    #[test]
    fn test_different_seed_different_material() {
        let a = derive_material(&[7u8; SEED_LEN], &[9u8; SALT_LEN]);
        let b = derive_material(&[8u8; SEED_LEN], &[9u8; SALT_LEN]);
        assert_ne!(a.key, b.key);
    }

    #[test]
    fn test_different_salt_different_material() {
        let a = derive_material(&[7u8; SEED_LEN], &[9u8; SALT_LEN]);
        let b = derive_material(&[7u8; SEED_LEN], &[10u8; SALT_LEN]);
        assert_ne!(a.key, b.key);
    }

    #[test]
    fn test_key_and_iv_do_not_overlap() {
        let material = derive_material(&[3u8; SEED_LEN], &[4u8; SALT_LEN]);
        let concat = material.concat();
        assert_eq!(&concat[..KEY_LEN], &material.key);
        assert_eq!(&concat[KEY_LEN..], &material.iv);
    }

    #[test]
    fn test_from_concat_rejects_wrong_length() {
        assert!(SymmetricMaterial::from_concat(&[0u8; 47]).is_none());
        assert!(SymmetricMaterial::from_concat(&[0u8; 49]).is_none());
        assert!(SymmetricMaterial::from_concat(&[0u8; 48]).is_some());
    }
}
