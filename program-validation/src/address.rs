//! Program hashes and their address strings
//!
//! A program hash identifies the owner of a redeem script. It is the
//! HASH160 of the script code with a prefix byte that depends on the
//! script type:
//!
//! ```text
//! 0        1                         21
//! |--------|-------------------------|
//!   prefix   RIPEMD160(SHA256(code))
//! ```
//!
//! Program hashes are ordered byte-wise, which is the canonical order
//! of programs within a transaction.

use std::fmt;

use bitcoin::hashes::hash160;
use bitcoin::hashes::Hash as _;

use crate::error::AddressError;
use crate::script::ScriptType;
use crate::PROGRAM_HASH_LEN;

/// The program hash prefix of standard scripts. Addresses with this
/// prefix start with the letter `E`.
pub const PREFIX_STANDARD: u8 = 0x21;
/// The program hash prefix of multi-signature scripts.
pub const PREFIX_MULTISIG: u8 = 0x12;
/// The program hash prefix of cross-chain scripts.
pub const PREFIX_CROSSCHAIN: u8 = 0x4b;

impl ScriptType {
    /// The program hash prefix for scripts of this type.
    pub fn prefix(&self) -> u8 {
        match self {
            ScriptType::Standard => PREFIX_STANDARD,
            ScriptType::MultiSig => PREFIX_MULTISIG,
            ScriptType::CrossChain => PREFIX_CROSSCHAIN,
        }
    }

    /// Map a program hash prefix back to a script type.
    pub fn from_prefix(prefix: u8) -> Option<Self> {
        match prefix {
            PREFIX_STANDARD => Some(ScriptType::Standard),
            PREFIX_MULTISIG => Some(ScriptType::MultiSig),
            PREFIX_CROSSCHAIN => Some(ScriptType::CrossChain),
            _ => None,
        }
    }
}

/// The address of a program, derived from its code.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProgramHash([u8; PROGRAM_HASH_LEN]);

impl ProgramHash {
    /// Derive the program hash of the given code.
    ///
    /// Only the trailing type tag of the code is inspected, the rest of
    /// the code does not need to be a well-formed redeem script.
    pub fn from_code(code: &[u8]) -> Result<Self, AddressError> {
        let Some(&tag) = code.last() else {
            return Err(AddressError::EmptyCode);
        };
        let script_type = ScriptType::from_tag(tag).ok_or(AddressError::UnknownCodeType(tag))?;

        Ok(Self::new(script_type, code))
    }

    /// Derive the program hash of code whose script type is already
    /// known.
    pub fn new(script_type: ScriptType, code: &[u8]) -> Self {
        let mut bytes = [0; PROGRAM_HASH_LEN];
        bytes[0] = script_type.prefix();
        bytes[1..].copy_from_slice(hash160::Hash::hash(code).as_byte_array());
        Self(bytes)
    }

    /// Return the inner bytes of the program hash.
    pub fn as_bytes(&self) -> &[u8; PROGRAM_HASH_LEN] {
        &self.0
    }

    /// The script type given by the prefix byte, if it is a known one.
    pub fn script_type(&self) -> Option<ScriptType> {
        ScriptType::from_prefix(self.0[0])
    }

    /// Encode the program hash as a base58check address.
    pub fn to_address(&self) -> String {
        bitcoin::base58::encode_check(&self.0)
    }

    /// Decode a base58check address into a program hash.
    pub fn from_address(address: &str) -> Result<Self, AddressError> {
        let data = bitcoin::base58::decode_check(address).map_err(AddressError::Base58)?;
        let bytes: [u8; PROGRAM_HASH_LEN] = data
            .as_slice()
            .try_into()
            .map_err(|_| AddressError::InvalidAddressLength(data.len()))?;

        if ScriptType::from_prefix(bytes[0]).is_none() {
            return Err(AddressError::UnknownAddressPrefix(bytes[0]));
        }

        Ok(Self(bytes))
    }
}

impl From<[u8; PROGRAM_HASH_LEN]> for ProgramHash {
    fn from(bytes: [u8; PROGRAM_HASH_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ProgramHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for ProgramHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProgramHash({self})")
    }
}

/// Derive the program hash of the given code.
pub fn derive_address(code: &[u8]) -> Result<ProgramHash, AddressError> {
    ProgramHash::from_code(code)
}

/// Sort program hashes into the canonical order.
pub fn sort_program_hashes(hashes: &mut [ProgramHash]) {
    hashes.sort();
}
