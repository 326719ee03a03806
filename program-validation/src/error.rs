//! Error types for parsing, binding and verifying programs
//!
//! The messages of the variants below show up in node logs when a
//! transaction is rejected, so they are kept stable.

use crate::address::ProgramHash;

/// Errors returned while parsing a redeem script.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    /// The redeem script has no bytes.
    #[error("empty redeem script")]
    EmptyScript,
    /// The public key in a standard redeem script was either not pushed
    /// with `OP_PUSHBYTES_33` or is not a valid compressed point.
    #[error("the public key in the standard redeem script is malformed: {0}")]
    MalformedKey(#[source] secp256k1::Error),
    /// The script ends with the standard type tag but it is not exactly
    /// `PUBKEY_SCRIPT_LEN` bytes long.
    #[error("invalid standard redeem script length: {0}")]
    InvalidStandardScriptLength(usize),
    /// The trailing type tag is not one that we know about.
    #[error("unknown redeem script type: {0:#04x}")]
    UnknownScriptType(u8),
    /// M is less than one or greater than N.
    #[error("invalid multi sign script code")]
    InvalidMultiSigHeader,
    /// The multi-signature script is shorter than the minimum legal
    /// length.
    #[error("not a valid multi sign transaction code, length not enough")]
    LengthNotEnough,
    /// The key slots of the multi-signature script do not fill the space
    /// between the M byte and the trailing N and tag bytes.
    #[error("not a valid multi sign transaction code, length not match")]
    LengthMismatch,
    /// The declared N does not match the number of public keys in the
    /// script.
    #[error("invalid multi sign public key script count")]
    KeyCountMismatch,
    /// A public key slot in a multi-signature script does not hold a
    /// 33 byte push of a valid compressed point.
    #[error("The encodeData format is error")]
    MalformedEncodeData,
}

/// Errors returned while decoding signature records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A single signature record was not `SIG_RECORD_LEN` bytes.
    #[error("invalid signature record length: {0}")]
    InvalidLength(usize),
    /// A concatenation of signature records was not a multiple of
    /// `SIG_RECORD_LEN` bytes.
    #[error("invalid multi sign signatures, length not match")]
    LengthMismatch(usize),
}

/// Errors returned while verifying the signatures of a program.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// The signature records could not be decoded.
    #[error("{0}")]
    Codec(#[from] CodecError),
    /// The parameter of a standard program is not exactly one signature
    /// record.
    #[error("Invalid signature length")]
    InvalidSignatureLength(usize),
    /// The signature does not verify against the public key and message.
    #[error("[Validation], Verify failed.")]
    VerifyFailed,
    /// There are fewer signature records than the M of the script.
    #[error("invalid signatures, not enough signatures")]
    TooFewSignatures {
        /// The M of the script.
        required: usize,
        /// The number of signature records in the parameter.
        supplied: usize,
    },
    /// There are more signature records than the N of the script.
    #[error("invalid signatures, too many signatures")]
    TooManySignatures {
        /// The N of the script.
        allowed: usize,
        /// The number of signature records in the parameter.
        supplied: usize,
    },
    /// Two signature records in the parameter are byte-for-byte equal.
    #[error("duplicated signatures")]
    DuplicateSignature,
    /// Fewer than M signatures matched a distinct public key.
    #[error("matched signatures not enough")]
    InsufficientMatches {
        /// The M of the script.
        required: usize,
        /// The number of signatures that matched a public key.
        matched: usize,
    },
}

/// Errors returned while deriving or decoding program hashes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// Program hashes cannot be derived from empty code.
    #[error("[ToProgramHash] failed, empty program code")]
    EmptyCode,
    /// The trailing type tag of the code has no program hash prefix.
    #[error("unknown code signature type: {0:#04x}")]
    UnknownCodeType(u8),
    /// The address string is not valid base58check.
    #[error("could not decode the base58check address: {0}")]
    Base58(#[source] bitcoin::base58::Error),
    /// The decoded address is not `PROGRAM_HASH_LEN` bytes.
    #[error("invalid program hash length: {0}")]
    InvalidAddressLength(usize),
    /// The decoded address does not start with a known prefix byte.
    #[error("unknown program hash prefix: {0:#04x}")]
    UnknownAddressPrefix(u8),
}

/// The reasons a single program can fail verification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgramError {
    /// The code is not a valid redeem script.
    #[error("{0}")]
    Script(#[from] ScriptError),
    /// The parameter does not authorize the message.
    #[error("{0}")]
    Verify(#[from] VerifyError),
}

impl ProgramError {
    /// Attach the index of the failing program.
    pub(crate) fn at(self, index: usize) -> RunError {
        match self {
            ProgramError::Script(source) => RunError::InvalidScript { index, source },
            ProgramError::Verify(source) => RunError::Verification { index, source },
        }
    }
}

/// Errors returned by [`crate::program::run_programs`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    /// The number of expected program hashes differs from the number of
    /// programs, or there are no programs at all.
    #[error("The number of data hashes is different with number of programs.")]
    CountMismatch {
        /// The number of expected program hashes.
        hashes: usize,
        /// The number of programs.
        programs: usize,
    },
    /// The program hash derived from the code of a program is not the
    /// expected hash at the same index.
    #[error("The data hashes is different with corresponding program code.")]
    HashMismatch {
        /// The index of the offending program.
        index: usize,
        /// The program hash the caller expected at this index.
        expected: ProgramHash,
        /// The program hash derived from the program code.
        actual: ProgramHash,
    },
    /// The program hash could not be derived from the program code.
    #[error("{source}")]
    ProgramHash {
        /// The index of the offending program.
        index: usize,
        /// The underlying error.
        #[source]
        source: AddressError,
    },
    /// The redeem script of the program could not be parsed.
    #[error("program {index}: {source}")]
    InvalidScript {
        /// The index of the offending program.
        index: usize,
        /// The underlying error.
        #[source]
        source: ScriptError,
    },
    /// The signatures of the program did not authorize the message.
    #[error("program {index}: {source}")]
    Verification {
        /// The index of the offending program.
        index: usize,
        /// The underlying error.
        #[source]
        source: VerifyError,
    },
}

/// Errors returned by [`crate::program::sort_programs`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    /// The code of a program is not a recognized redeem script.
    #[error("invalid program code at index {index}: {source}")]
    InvalidProgramCode {
        /// The index of the offending program.
        index: usize,
        /// The underlying error.
        #[source]
        source: ScriptError,
    },
}
