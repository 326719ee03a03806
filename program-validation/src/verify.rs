//! Signature verification for standard and multi-signature programs
//!

use std::collections::HashSet;

use bitcoin::hashes::sha256;
use bitcoin::hashes::Hash as _;
use secp256k1::ecdsa::Signature;
use secp256k1::Message;
use secp256k1::PublicKey;
use secp256k1::SECP256K1;

use crate::error::VerifyError;
use crate::script::MultiSigScript;
use crate::signature;
use crate::SIGNATURE_LEN;
use crate::SIG_RECORD_LEN;

/// Check a compact ECDSA signature over the SHA256 digest of the
/// message.
///
/// Signatures that cannot be parsed, including ones with an out of range
/// `r` or `s`, do not verify.
pub fn verify_signature(
    public_key: &PublicKey,
    message: &[u8],
    signature: &[u8; SIGNATURE_LEN],
) -> bool {
    let Ok(signature) = Signature::from_compact(signature) else {
        return false;
    };
    let digest = Message::from_digest(sha256::Hash::hash(message).to_byte_array());

    SECP256K1.verify_ecdsa(&digest, &signature, public_key).is_ok()
}

/// Verify the parameter of a standard program. The parameter must be
/// exactly one signature record made by the given public key.
pub fn verify_standard(
    public_key: &PublicKey,
    parameter: &[u8],
    message: &[u8],
) -> Result<(), VerifyError> {
    if parameter.len() != SIG_RECORD_LEN {
        return Err(VerifyError::InvalidSignatureLength(parameter.len()));
    }
    let signature = signature::decode_one(parameter)?;

    if !verify_signature(public_key, message, signature) {
        return Err(VerifyError::VerifyFailed);
    }

    Ok(())
}

/// Verify the parameter of a multi-signature or cross-chain program.
///
/// # Notes
///
/// The parameter is a concatenation of between M and N signature
/// records. Signatures are matched to public keys greedily: each
/// signature is checked against the keys that have not been matched yet,
/// in script order, and the first key that verifies is consumed. So the
/// signatures need not be in key order, but a key can back at most one
/// signature. Two byte-identical records are rejected outright, whatever
/// key they would have matched.
///
/// This is deliberately not a maximum bipartite matching; which
/// parameters are accepted must not change.
pub fn verify_multisig(
    script: &MultiSigScript,
    parameter: &[u8],
    message: &[u8],
) -> Result<(), VerifyError> {
    let signatures = signature::split_many(parameter)?;
    let required = script.m() as usize;
    let public_keys = script.public_keys();

    if signatures.len() < required {
        return Err(VerifyError::TooFewSignatures {
            required,
            supplied: signatures.len(),
        });
    }
    if signatures.len() > public_keys.len() {
        return Err(VerifyError::TooManySignatures {
            allowed: public_keys.len(),
            supplied: signatures.len(),
        });
    }

    let mut seen = HashSet::with_capacity(signatures.len());
    let mut consumed = vec![false; public_keys.len()];
    let mut matched = 0;

    for signature in signatures {
        if !seen.insert(signature) {
            return Err(VerifyError::DuplicateSignature);
        }

        let key_index = public_keys
            .iter()
            .enumerate()
            .filter(|(index, _)| !consumed[*index])
            .find(|(_, public_key)| verify_signature(public_key, message, signature))
            .map(|(index, _)| index);

        if let Some(index) = key_index {
            consumed[index] = true;
            matched += 1;
        }
    }

    if matched < required {
        return Err(VerifyError::InsufficientMatches { required, matched });
    }

    Ok(())
}
