//! Asymmetric key handles
//!
//! A [`KeyHandle`] is a capability bound to one certificate keypair. The
//! envelope codec only ever talks to this trait; the RSA implementation
//! below is what the file-backed store hands out.

use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Encrypt, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

use crate::error::{SealError, SealResult};

/// Capability object exposing the asymmetric operations of one keypair
///
/// A handle must always carry the private key; constructing one from
/// public-only material is a store-level error, not a handle state.
///
/// Handles hold sensitive key material which is released (and zeroed,
/// for the RSA implementation) when the handle is dropped. The
/// underlying primitives are not guaranteed reentrant, so callers that
/// share one handle across threads should serialize access to it.
pub trait KeyHandle: Send + Sync {
    /// Encrypt symmetric key material with the public key
    fn wrap_key(&self, material: &[u8]) -> SealResult<Vec<u8>>;

    /// Decrypt wrapped key material with the private key
    fn unwrap_key(&self, wrapped: &[u8]) -> SealResult<Zeroizing<Vec<u8>>>;

    /// Sign `data` with the private key (RSASSA-PKCS1-v1_5 / SHA-512)
    fn sign(&self, data: &[u8]) -> SealResult<Vec<u8>>;

    /// Verify a signature over `data` with the public key
    fn verify(&self, data: &[u8], signature: &[u8]) -> bool;
}

/// RSA-backed key handle
///
/// Key wrap uses RSAES-PKCS1-v1_5, signatures RSASSA-PKCS1-v1_5 over
/// SHA-512, matching envelopes produced by existing deployments. The
/// private key is zeroed on drop by the `rsa` crate.
#[derive(Debug)]
pub struct RsaKeyHandle {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl RsaKeyHandle {
    /// Build a handle from an RSA private key
    pub fn from_private_key(private: RsaPrivateKey) -> Self {
        let public = RsaPublicKey::from(&private);
        Self { private, public }
    }

    /// Parse a handle from a PKCS#8 private-key PEM document
    pub fn from_pkcs8_pem(pem: &str) -> SealResult<Self> {
        let private = RsaPrivateKey::from_pkcs8_pem(pem)
            .map_err(|e| SealError::Key(format!("Failed to parse private key: {}", e)))?;
        Ok(Self::from_private_key(private))
    }

    /// Round-trip a short probe through wrap and unwrap
    ///
    /// Used by the store listing to filter out keys that exist on disk
    /// but cannot actually perform both operations.
    pub fn self_check(&self) -> bool {
        let probe = b"test";
        match self.wrap_key(probe).and_then(|w| self.unwrap_key(&w)) {
            Ok(unwrapped) => unwrapped.as_slice() == probe,
            Err(_) => false,
        }
    }
}

impl KeyHandle for RsaKeyHandle {
    fn wrap_key(&self, material: &[u8]) -> SealResult<Vec<u8>> {
        let mut rng = rand::thread_rng();
        self.public
            .encrypt(&mut rng, Pkcs1v15Encrypt, material)
            .map_err(|e| SealError::Key(format!("Key wrap failed: {}", e)))
    }

    fn unwrap_key(&self, wrapped: &[u8]) -> SealResult<Zeroizing<Vec<u8>>> {
        self.private
            .decrypt(Pkcs1v15Encrypt, wrapped)
            .map(Zeroizing::new)
            .map_err(|e| SealError::Key(format!("Key unwrap failed: {}", e)))
    }

    fn sign(&self, data: &[u8]) -> SealResult<Vec<u8>> {
        let digest = Sha512::digest(data);
        self.private
            .sign(Pkcs1v15Sign::new::<Sha512>(), &digest)
            .map_err(|e| SealError::Key(format!("Signing failed: {}", e)))
    }

    fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let digest = Sha512::digest(data);
        self.public
            .verify(Pkcs1v15Sign::new::<Sha512>(), &digest, signature)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::test_keys::test_handle;

    #[test]
    fn test_wrap_unwrap_roundtrip() {
        let handle = test_handle();
        let material = [0xAB; 48];
        let wrapped = handle.wrap_key(&material).unwrap();
        assert_ne!(&wrapped[..], &material[..]);
        let unwrapped = handle.unwrap_key(&wrapped).unwrap();
        assert_eq!(unwrapped.as_slice(), &material[..]);
    }

    #[test]
    fn test_sign_verify() {
        let handle = test_handle();
        let signature = handle.sign(b"prefix bytes").unwrap();
        assert!(handle.verify(b"prefix bytes", &signature));
    }

    #[test]
    fn test_verify_rejects_other_data() {
        let handle = test_handle();
        let signature = handle.sign(b"prefix bytes").unwrap();
        assert!(!handle.verify(b"other bytes", &signature));
    }

    #[test]
    fn test_verify_rejects_corrupt_signature() {
        let handle = test_handle();
        let mut signature = handle.sign(b"prefix bytes").unwrap();
        signature[0] ^= 0x01;
        assert!(!handle.verify(b"prefix bytes", &signature));
    }

    #[test]
    fn test_unwrap_garbage_fails() {
        let handle = test_handle();
        let result = handle.unwrap_key(&[0u8; 256]);
        assert!(matches!(result, Err(SealError::Key(_))));
    }

    #[test]
    fn test_self_check() {
        assert!(test_handle().self_check());
    }
}
