//! Hybrid encryption envelope codec
//!
//! Fixed little-endian layout:
//!
//! | Offset | Size     | Field                          |
//! |--------|----------|--------------------------------|
//! | 0      | 4        | keySize (LE u32)               |
//! | 4      | 4        | dataSize (LE u32)              |
//! | 8      | keySize  | encryptedKey (RSA-wrapped)     |
//! | 8+k    | dataSize | encryptedData (AES-256-CBC)    |
//! | 8+k+d  | rest     | signature (RSA/SHA-512)        |
//!
//! The signature covers everything before it (the prefix), so no
//! ciphertext byte is unauthenticated. Decryption verifies the
//! signature before touching either ciphertext; that ordering is part
//! of the format's contract and must not change.

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::crypto::cipher::{cipher_decrypt, cipher_encrypt};
use crate::crypto::key_derivation::{derive_material, SymmetricMaterial, SALT_LEN, SEED_LEN};
use crate::error::{SealError, SealResult};
use crate::keystore::KeyHandle;

/// Size of the two length fields
pub const HEADER_LEN: usize = 8;

/// Smallest buffer that can possibly be an envelope (header plus at
/// least one byte beyond it)
pub const MIN_ENVELOPE_LEN: usize = HEADER_LEN + 1;

/// Zero-copy framing view over an envelope buffer
///
/// Parsing validates the size fields against the actual buffer length
/// before any slice is taken, so a hostile header can never cause an
/// out-of-bounds read.
pub struct Envelope<'a> {
    encrypted_key: &'a [u8],
    encrypted_data: &'a [u8],
    prefix: &'a [u8],
    signature: &'a [u8],
}

impl<'a> Envelope<'a> {
    /// Parse and validate the framing of an envelope buffer
    pub fn parse(bytes: &'a [u8]) -> SealResult<Self> {
        if bytes.len() < MIN_ENVELOPE_LEN {
            return Err(SealError::Format(
                "Encrypted data is not large enough".to_string(),
            ));
        }

        let key_size = read_u32_le(bytes, 0) as u64;
        let data_size = read_u32_le(bytes, 4) as u64;

        // u64 arithmetic so declared sizes near u32::MAX cannot wrap
        let prefix_len = HEADER_LEN as u64 + key_size + data_size;
        if prefix_len > bytes.len() as u64 {
            return Err(SealError::Format(
                "Encrypted data is not large enough".to_string(),
            ));
        }
        if prefix_len == bytes.len() as u64 {
            // a zero-length signature can never verify
            return Err(SealError::Format("Envelope has no signature".to_string()));
        }

        let key_size = key_size as usize;
        let data_size = data_size as usize;
        let prefix_len = prefix_len as usize;

        Ok(Self {
            encrypted_key: &bytes[HEADER_LEN..HEADER_LEN + key_size],
            encrypted_data: &bytes[HEADER_LEN + key_size..prefix_len],
            prefix: &bytes[..prefix_len],
            signature: &bytes[prefix_len..],
        })
    }

    /// The RSA-wrapped symmetric key material
    pub fn encrypted_key(&self) -> &[u8] {
        self.encrypted_key
    }

    /// The symmetric-cipher ciphertext
    pub fn encrypted_data(&self) -> &[u8] {
        self.encrypted_data
    }

    /// The signed portion: header and both ciphertexts
    pub fn prefix(&self) -> &[u8] {
        self.prefix
    }

    /// The trailing signature bytes
    pub fn signature(&self) -> &[u8] {
        self.signature
    }
}

fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

/// Encrypt `text` into a signed envelope
///
/// Each call draws a fresh random seed, so two encryptions of the same
/// text under the same key produce different envelopes.
pub fn encrypt(text: &str, handle: &dyn KeyHandle) -> SealResult<Vec<u8>> {
    if text.trim().is_empty() {
        return Err(SealError::Input(
            "must pass in a non-empty text".to_string(),
        ));
    }

    // fresh randomness per call; the stretch only expands it
    let mut seed = Zeroizing::new([0u8; SEED_LEN]);
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut seed[..]);
    OsRng.fill_bytes(&mut salt);
    let material = derive_material(&seed[..], &salt);

    let encrypted_key = handle.wrap_key(&Zeroizing::new(material.concat()))?;
    let encrypted_data = cipher_encrypt(&material.key, &material.iv, text.as_bytes())?;

    let mut envelope =
        Vec::with_capacity(HEADER_LEN + encrypted_key.len() + encrypted_data.len() + 512);
    envelope.extend_from_slice(&(encrypted_key.len() as u32).to_le_bytes());
    envelope.extend_from_slice(&(encrypted_data.len() as u32).to_le_bytes());
    envelope.extend_from_slice(&encrypted_key);
    envelope.extend_from_slice(&encrypted_data);

    let signature = handle.sign(&envelope)?;
    envelope.extend_from_slice(&signature);
    Ok(envelope)
}

/// Decrypt a signed envelope back to text
///
/// The signature over the prefix is verified first; on failure the
/// function stops immediately without attempting key unwrap or
/// decryption, so no private-key operation is ever spent on
/// unauthenticated input.
pub fn decrypt(bytes: &[u8], handle: &dyn KeyHandle) -> SealResult<String> {
    let envelope = Envelope::parse(bytes)?;

    if !handle.verify(envelope.prefix(), envelope.signature()) {
        return Err(SealError::Integrity);
    }

    let key_iv = handle.unwrap_key(envelope.encrypted_key())?;
    let material = SymmetricMaterial::from_concat(&key_iv).ok_or_else(|| {
        SealError::Key("Unwrapped key material has unexpected length".to_string())
    })?;

    let plaintext = cipher_decrypt(&material.key, &material.iv, envelope.encrypted_data())?;
    String::from_utf8(plaintext)
        .map_err(|e| SealError::Crypto(format!("Decrypted data is not valid UTF-8: {}", e)))
}
