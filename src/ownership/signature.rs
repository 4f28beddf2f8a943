// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ed25519 signature checks over challenge messages.

use base64ct::{Base64, Encoding};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use super::address::{self, AddressError};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("signature is not valid base64")]
    MalformedSignature,
}

/// Verify a base64-encoded ed25519 signature over `message` against the
/// account address.
///
/// Returns `Ok(false)` for a signature that decodes but does not verify,
/// including one of the wrong length. Errors are reserved for inputs the
/// caller should have rejected up front: a bad address or non-base64
/// signature text.
pub fn verify_message_signature(
    public_key: &str,
    message: &str,
    signature_b64: &str,
) -> Result<bool, SignatureError> {
    let key_bytes = address::decode_public_key(public_key)?;
    let verifying_key = match VerifyingKey::from_bytes(&key_bytes) {
        Ok(key) => key,
        // Off-curve point; the address encodes bytes that are not a key
        Err(_) => return Ok(false),
    };

    let sig_bytes =
        Base64::decode_vec(signature_b64).map_err(|_| SignatureError::MalformedSignature)?;
    let signature = match Signature::from_slice(&sig_bytes) {
        Ok(sig) => sig,
        Err(_) => return Ok(false),
    };

    Ok(verifying_key
        .verify(message.as_bytes(), &signature)
        .is_ok())
}
