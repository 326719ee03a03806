#![deny(missing_docs)]

//! # Program Validation Library
//!
//! This library decides whether the programs attached to a transaction
//! authorize its signed content. A program is a redeem script together
//! with the signatures that satisfy it, and every program is bound to
//! the program hash (address) derived from its redeem script.
//!
//! The rules here run on every validating node, so parsing is strict
//! and verification is deterministic: the same inputs are always
//! accepted or rejected with the same error.

pub mod address;
pub mod config;
pub mod error;
pub mod logging;
pub mod program;
pub mod script;
pub mod signature;
pub mod verify;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// The opcode that pushes the number 1. Small numbers `k` in the range
/// `1..=16` are encoded as the single byte `PUSH1 + k - 1`.
pub const PUSH1: u8 = 0x51;

/// The opcode that pushes the next 33 bytes onto the stack, used for
/// every compressed public key in a redeem script.
pub const OP_PUSHBYTES_33: u8 = 0x21;

/// The length of a compressed secp256k1 public key.
pub const PUBLIC_KEY_LEN: usize = 33;

/// The length of a standard (single key) redeem script:
/// ```text
///  OP_PUSHBYTES_33 <compressed-public-key> STANDARD
/// ```
pub const PUBKEY_SCRIPT_LEN: usize = 1 + PUBLIC_KEY_LEN + 1;

/// The length of a compact ECDSA signature.
pub const SIGNATURE_LEN: usize = 64;

/// The length of one signature record, which is a declared length byte
/// followed by the signature.
pub const SIG_RECORD_LEN: usize = 1 + SIGNATURE_LEN;

/// The shortest legal multi-signature redeem script. It has the M byte,
/// two public key slots, the N byte and the type tag, so
/// 1 + 2 * 34 + 1 + 1 = 71.
pub const MIN_MULTISIG_SCRIPT_LEN: usize = 1 + 2 * (PUBKEY_SCRIPT_LEN - 1) + 2;

/// The largest N that can be expressed with a single small-number
/// opcode.
pub const MAX_MULTISIG_KEYS: usize = 16;

/// The trailing type tag of a standard single-signature redeem script.
pub const STANDARD: u8 = 0xac;

/// The trailing type tag of an M-of-N multi-signature redeem script.
pub const MULTISIG: u8 = 0xae;

/// The trailing type tag of a cross-chain redeem script. These scripts
/// have the same layout as multi-signature scripts.
pub const CROSSCHAIN: u8 = 0xaf;

/// The length of a program hash: one prefix byte followed by a 20 byte
/// HASH160 digest.
pub const PROGRAM_HASH_LEN: usize = 21;
