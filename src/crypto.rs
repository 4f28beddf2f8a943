// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Symmetric encryption for stored wallet seeds.
//!
//! AES-256-GCM with a random 96-bit nonce per encryption. The stored blob
//! layout is `nonce || ciphertext || tag`. The key must be exactly 32 bytes.

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};

/// Required key length in bytes.
pub const KEY_LENGTH: usize = 32;

/// Cryptographic operation failure.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("encryption key must be exactly {KEY_LENGTH} bytes")]
    InvalidKeySize,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("ciphertext is malformed")]
    InvalidCiphertext,
}

/// AES-256-GCM cipher for wallet seed material.
pub struct SeedCipher {
    key: [u8; KEY_LENGTH],
    rng: SystemRandom,
}

impl SeedCipher {
    /// Create a cipher from a raw key. Fails unless the key is 32 bytes.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let key: [u8; KEY_LENGTH] = key.try_into().map_err(|_| CryptoError::InvalidKeySize)?;
        Ok(Self {
            key,
            rng: SystemRandom::new(),
        })
    }

    /// Encrypt plaintext, returning `nonce || ciphertext || tag`.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| CryptoError::EncryptionFailed)?;

        let key = self.sealing_key()?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut buffer = plaintext.to_vec();
        key.seal_in_place_append_tag(nonce, Aad::empty(), &mut buffer)
            .map_err(|_| CryptoError::EncryptionFailed)?;

        let mut out = Vec::with_capacity(NONCE_LEN + buffer.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&buffer);
        Ok(out)
    }

    /// Decrypt a blob produced by [`SeedCipher::encrypt`].
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if data.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(CryptoError::InvalidCiphertext);
        }

        let (nonce_bytes, ciphertext) = data.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| CryptoError::InvalidCiphertext)?;

        let key = self.sealing_key()?;
        let mut buffer = ciphertext.to_vec();
        let plaintext = key
            .open_in_place(nonce, Aad::empty(), &mut buffer)
            .map_err(|_| CryptoError::DecryptionFailed)?;

        Ok(plaintext.to_vec())
    }

    fn sealing_key(&self) -> Result<LessSafeKey, CryptoError> {
        let unbound =
            UnboundKey::new(&AES_256_GCM, &self.key).map_err(|_| CryptoError::InvalidKeySize)?;
        Ok(LessSafeKey::new(unbound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_KEY: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn encrypt_decrypt_round_trip() {
        let cipher = SeedCipher::new(TEST_KEY).unwrap();
        let seed = b"SCZANGBA5YHTNYVVV4C3U252E2B6P6F5T276DZI4A7F2UFG5ONZXQPEM";

        let encrypted = cipher.encrypt(seed).unwrap();
        assert_ne!(&encrypted[NONCE_LEN..], seed.as_slice());

        let decrypted = cipher.decrypt(&encrypted).unwrap();
        assert_eq!(decrypted, seed);
    }

    #[test]
    fn encrypting_twice_yields_different_ciphertexts() {
        let cipher = SeedCipher::new(TEST_KEY).unwrap();
        let a = cipher.encrypt(b"same plaintext").unwrap();
        let b = cipher.encrypt(b"same plaintext").unwrap();
        // Random nonce makes ciphertexts differ
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_size_is_rejected() {
        assert!(matches!(
            SeedCipher::new(b"short"),
            Err(CryptoError::InvalidKeySize)
        ));
        assert!(matches!(
            SeedCipher::new(&[0u8; 33]),
            Err(CryptoError::InvalidKeySize)
        ));
    }

    #[test]
    fn wrong_key_fails_to_decrypt() {
        let cipher = SeedCipher::new(TEST_KEY).unwrap();
        let other = SeedCipher::new(b"ffffffffffffffffffffffffffffffff").unwrap();

        let encrypted = cipher.encrypt(b"secret").unwrap();
        assert!(matches!(
            other.decrypt(&encrypted),
            Err(CryptoError::DecryptionFailed)
        ));
    }

    #[test]
    fn truncated_blob_is_malformed() {
        let cipher = SeedCipher::new(TEST_KEY).unwrap();
        assert!(matches!(
            cipher.decrypt(&[0u8; 8]),
            Err(CryptoError::InvalidCiphertext)
        ));
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let cipher = SeedCipher::new(TEST_KEY).unwrap();
        let mut encrypted = cipher.encrypt(b"secret").unwrap();
        let last = encrypted.len() - 1;
        encrypted[last] ^= 0xFF;
        assert!(matches!(
            cipher.decrypt(&encrypted),
            Err(CryptoError::DecryptionFailed)
        ));
    }
}
