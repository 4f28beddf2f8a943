// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stellar strkey encoding and validation.
//!
//! Strkey is base32 over `version_byte || key || crc16_le`. Account
//! addresses use version byte `6 << 3` and render with a `G` prefix;
//! secret seeds use `18 << 3` and render with an `S` prefix. Both encode
//! to exactly 56 characters for 32-byte keys.

use data_encoding::BASE32;

/// Length of a rendered strkey for a 32-byte payload.
pub const STRKEY_LENGTH: usize = 56;

const VERSION_ACCOUNT: u8 = 6 << 3;
const VERSION_SEED: u8 = 18 << 3;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address has invalid length or prefix")]
    InvalidFormat,

    #[error("address is not valid base32")]
    InvalidEncoding,

    #[error("address checksum mismatch")]
    ChecksumMismatch,

    #[error("address carries an unexpected version byte")]
    WrongVersion,
}

/// Whether `address` is a well-formed Stellar account address.
///
/// Cheap prefix and length checks run before the full decode, matching
/// the common case of obviously malformed input.
pub fn is_valid_public_key(address: &str) -> bool {
    if address.len() != STRKEY_LENGTH || !address.starts_with('G') {
        return false;
    }
    decode_public_key(address).is_ok()
}

/// Decode a `G...` account address into its raw ed25519 public key.
pub fn decode_public_key(address: &str) -> Result<[u8; 32], AddressError> {
    decode(address, VERSION_ACCOUNT)
}

/// Encode a raw ed25519 public key as a `G...` account address.
pub fn encode_public_key(key: &[u8; 32]) -> String {
    encode(key, VERSION_ACCOUNT)
}

/// Encode a raw 32-byte seed as an `S...` secret seed string.
pub fn encode_secret_seed(seed: &[u8; 32]) -> String {
    encode(seed, VERSION_SEED)
}

fn encode(key: &[u8; 32], version: u8) -> String {
    let mut payload = Vec::with_capacity(35);
    payload.push(version);
    payload.extend_from_slice(key);

    let checksum = crc16_xmodem(&payload);
    payload.push((checksum & 0xFF) as u8);
    payload.push((checksum >> 8) as u8);

    BASE32.encode(&payload)
}

fn decode(input: &str, version: u8) -> Result<[u8; 32], AddressError> {
    if input.len() != STRKEY_LENGTH {
        return Err(AddressError::InvalidFormat);
    }

    let payload = BASE32
        .decode(input.as_bytes())
        .map_err(|_| AddressError::InvalidEncoding)?;
    if payload.len() != 35 {
        return Err(AddressError::InvalidFormat);
    }

    let (body, checksum_bytes) = payload.split_at(33);
    let expected = crc16_xmodem(body);
    let actual = u16::from(checksum_bytes[0]) | (u16::from(checksum_bytes[1]) << 8);
    if expected != actual {
        return Err(AddressError::ChecksumMismatch);
    }

    if body[0] != version {
        return Err(AddressError::WrongVersion);
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&body[1..]);
    Ok(key)
}

/// CRC16-XModem, as used by the strkey checksum.
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for byte in data {
        crc ^= u16::from(*byte) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
