//! Encoding and decoding of signature records
//!
//! A signature record is a declared length byte followed by a compact
//! ECDSA signature:
//!
//! ```text
//! 0          1                                  65
//! |----------|----------------------------------|
//!   length     r || s
//! ```
//!
//! The declared length is informational, only the total length of the
//! record is checked.

use crate::error::CodecError;
use crate::SIGNATURE_LEN;
use crate::SIG_RECORD_LEN;

/// Decode a single signature record into its raw signature bytes.
pub fn decode_one(record: &[u8]) -> Result<&[u8; SIGNATURE_LEN], CodecError> {
    match record.split_first() {
        Some((_, signature)) if record.len() == SIG_RECORD_LEN => signature
            .try_into()
            .map_err(|_| CodecError::InvalidLength(record.len())),
        _ => Err(CodecError::InvalidLength(record.len())),
    }
}

/// Split a concatenation of signature records into raw signatures, in
/// the order that they appear.
pub fn split_many(records: &[u8]) -> Result<Vec<&[u8; SIGNATURE_LEN]>, CodecError> {
    if records.len() % SIG_RECORD_LEN != 0 {
        return Err(CodecError::LengthMismatch(records.len()));
    }

    records.chunks_exact(SIG_RECORD_LEN).map(decode_one).collect()
}

/// Encode a raw signature as a signature record.
pub fn encode_one(signature: &[u8; SIGNATURE_LEN]) -> [u8; SIG_RECORD_LEN] {
    let mut record = [0; SIG_RECORD_LEN];
    record[0] = SIGNATURE_LEN as u8;
    record[1..].copy_from_slice(signature);
    record
}
