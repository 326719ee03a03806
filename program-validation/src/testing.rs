//! Module for testing helpers
//!

use bitcoin::hashes::sha256;
use bitcoin::hashes::Hash as _;
use secp256k1::Message;
use secp256k1::SecretKey;
use secp256k1::SECP256K1;

use crate::signature;
use crate::SIGNATURE_LEN;
use crate::SIG_RECORD_LEN;

pub mod accounts;

/// Sign the SHA256 digest of the message, returning the compact
/// signature.
pub fn sign(secret_key: &SecretKey, message: &[u8]) -> [u8; SIGNATURE_LEN] {
    let digest = Message::from_digest(sha256::Hash::hash(message).to_byte_array());
    SECP256K1.sign_ecdsa(&digest, secret_key).serialize_compact()
}

/// Sign the message and wrap the signature in a signature record.
pub fn sign_record(secret_key: &SecretKey, message: &[u8]) -> [u8; SIG_RECORD_LEN] {
    signature::encode_one(&sign(secret_key, message))
}
