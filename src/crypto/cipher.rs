//! AES-256-CBC bulk cipher helper
//!
//! Stateless encrypt/decrypt pair used by the envelope codec. Both
//! functions are deterministic given (key, iv, input); all randomness
//! lives in the per-call seed generated by the codec itself.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::{SealError, SealResult};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;

/// CBC initialization vector length in bytes (one AES block)
pub const IV_LEN: usize = 16;

/// Encrypt `plaintext` with AES-256-CBC and PKCS#7 padding
pub fn cipher_encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> SealResult<Vec<u8>> {
    let cipher = Aes256CbcEnc::new_from_slices(key, iv)
        .map_err(|e| SealError::Crypto(format!("Invalid key or iv length: {}", e)))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Decrypt AES-256-CBC ciphertext, stripping PKCS#7 padding
///
/// Corrupt ciphertext or a wrong key surfaces as invalid padding.
pub fn cipher_decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> SealResult<Vec<u8>> {
    let cipher = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|e| SealError::Crypto(format!("Invalid key or iv length: {}", e)))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| SealError::Crypto("Decryption failed: invalid padding or corrupt ciphertext".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; KEY_LEN] = [0x42; KEY_LEN];
    const IV: [u8; IV_LEN] = [0x24; IV_LEN];

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let plaintext = b"some sensitive configuration";
        let ciphertext = cipher_encrypt(&KEY, &IV, plaintext).unwrap();
        assert_ne!(&ciphertext[..], &plaintext[..]);
        let decrypted = cipher_decrypt(&KEY, &IV, &ciphertext).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_deterministic_given_key_and_iv() {
        let plaintext = b"same input, same output";
        let c1 = cipher_encrypt(&KEY, &IV, plaintext).unwrap();
        let c2 = cipher_encrypt(&KEY, &IV, plaintext).unwrap();
        assert_eq!(c1, c2);
    }

    #[test]
    fn test_ciphertext_is_block_padded() {
        // PKCS#7 always pads, so a block-aligned input grows by a block
        let ciphertext = cipher_encrypt(&KEY, &IV, &[0u8; 16]).unwrap();
        assert_eq!(ciphertext.len(), 32);
    }

    #[test]
    fn test_wrong_key_length_rejected() {
        let err = cipher_encrypt(&[0u8; 16], &IV, b"data").unwrap_err();
        assert!(matches!(err, SealError::Crypto(_)));
    }

    #[test]
    fn test_corrupt_ciphertext_fails() {
        let mut ciphertext = cipher_encrypt(&KEY, &IV, b"payload").unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0xFF;
        let result = cipher_decrypt(&KEY, &IV, &ciphertext);
        assert!(matches!(result, Err(SealError::Crypto(_))));
    }

    #[test]
    fn test_wrong_key_fails() {
        let ciphertext = cipher_encrypt(&KEY, &IV, b"payload").unwrap();
        let other_key = [0x13; KEY_LEN];
        // With a wrong key the padding check fails with overwhelming
        // probability
        let result = cipher_decrypt(&other_key, &IV, &ciphertext);
        assert!(result.is_err() || result.unwrap() != b"payload");
    }
}
