//! Parsing and construction of redeem scripts
//!

use secp256k1::PublicKey;

use crate::error::ScriptError;
use crate::error::VerifyError;
use crate::verify;
use crate::CROSSCHAIN;
use crate::MAX_MULTISIG_KEYS;
use crate::MIN_MULTISIG_SCRIPT_LEN;
use crate::MULTISIG;
use crate::OP_PUSHBYTES_33;
use crate::PUBKEY_SCRIPT_LEN;
use crate::PUBLIC_KEY_LEN;
use crate::PUSH1;
use crate::STANDARD;

/// The kind of a redeem script, as given by its trailing type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptType {
    /// A single public key script.
    Standard,
    /// An M-of-N multi-signature script.
    MultiSig,
    /// A cross-chain script, which has the multi-signature layout.
    CrossChain,
}

impl ScriptType {
    /// Map a trailing type tag to a script type.
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            STANDARD => Some(ScriptType::Standard),
            MULTISIG => Some(ScriptType::MultiSig),
            CROSSCHAIN => Some(ScriptType::CrossChain),
            _ => None,
        }
    }

    /// The trailing type tag of scripts of this type.
    pub fn tag(&self) -> u8 {
        match self {
            ScriptType::Standard => STANDARD,
            ScriptType::MultiSig => MULTISIG,
            ScriptType::CrossChain => CROSSCHAIN,
        }
    }
}

/// The M and public keys of a multi-signature (or cross-chain) redeem
/// script.
///
/// A value of this type always satisfies `1 <= m <= n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSigScript {
    /// The number of signatures required.
    m: u8,
    /// The public keys in script order. N is the length of this vector.
    public_keys: Vec<PublicKey>,
}

impl MultiSigScript {
    /// Create a new M-of-N script from the given public keys.
    ///
    /// The keys are sorted by the x-coordinate and then the
    /// y-coordinate of their points, so that the same set of keys always
    /// produces the same script and program hash.
    pub fn new(m: u8, mut public_keys: Vec<PublicKey>) -> Result<Self, ScriptError> {
        if !(2..=MAX_MULTISIG_KEYS).contains(&public_keys.len()) {
            return Err(ScriptError::KeyCountMismatch);
        }
        if m < 1 || m as usize > public_keys.len() {
            return Err(ScriptError::InvalidMultiSigHeader);
        }
        public_keys.sort_by_key(PublicKey::serialize_uncompressed);

        Ok(Self { m, public_keys })
    }

    /// The number of signatures required.
    pub fn m(&self) -> u8 {
        self.m
    }

    /// The public keys in script order.
    pub fn public_keys(&self) -> &[PublicKey] {
        &self.public_keys
    }

    /// The number of public keys in the script.
    pub fn n(&self) -> usize {
        self.public_keys.len()
    }

    /// Serialize the script with the given trailing type tag.
    ///
    /// ```text
    ///  <m> (OP_PUSHBYTES_33 <public-key>)* <n> <tag>
    /// ```
    fn to_code(&self, tag: u8) -> Vec<u8> {
        let mut code = Vec::with_capacity(self.n() * (PUBKEY_SCRIPT_LEN - 1) + 3);
        code.push(encode_small_int(self.m));
        for public_key in self.public_keys.iter() {
            code.push(OP_PUSHBYTES_33);
            code.extend_from_slice(&public_key.serialize());
        }
        // N came either from the builder, which caps it at 16, or from a
        // single script byte, so this cast cannot truncate.
        code.push(encode_small_int(self.n() as u8));
        code.push(tag);
        code
    }

    /// Parse the body of a multi-signature or cross-chain script.
    ///
    /// The expected wire format is
    ///
    /// ```text
    /// 0     1                   35                 len-2   len-1
    /// |-----|-------------------|-- ... ------------|-------|-----|
    ///    m    OP_PUSHBYTES_33     more key slots       n      tag
    ///         <public-key>
    /// ```
    ///
    /// where `m` and `n` are small-number opcodes.
    fn parse(code: &[u8]) -> Result<Self, ScriptError> {
        let [m_byte, ..] = code else {
            return Err(ScriptError::EmptyScript);
        };
        let m = decode_small_int(*m_byte);
        if m < 1 {
            return Err(ScriptError::InvalidMultiSigHeader);
        }
        if code.len() < MIN_MULTISIG_SCRIPT_LEN {
            return Err(ScriptError::LengthNotEnough);
        }
        // The length check above means that this pattern always matches.
        let [_, slots @ .., n_byte, _] = code else {
            return Err(ScriptError::LengthNotEnough);
        };
        let mut slots = slots;

        let mut public_keys = Vec::new();
        while let [opcode, rest @ ..] = slots {
            if *opcode != OP_PUSHBYTES_33 {
                return Err(ScriptError::MalformedEncodeData);
            }
            let Some((key, rest)) = rest.split_first_chunk::<PUBLIC_KEY_LEN>() else {
                return Err(ScriptError::LengthMismatch);
            };
            let public_key =
                PublicKey::from_slice(key).map_err(|_| ScriptError::MalformedEncodeData)?;
            public_keys.push(public_key);
            slots = rest;
        }

        let n = decode_small_int(*n_byte);
        if m > n {
            return Err(ScriptError::InvalidMultiSigHeader);
        }
        if n as usize != public_keys.len() {
            return Err(ScriptError::KeyCountMismatch);
        }

        Ok(Self { m: m as u8, public_keys })
    }
}

/// A parsed redeem script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedeemScript {
    /// A single public key script.
    Standard(PublicKey),
    /// An M-of-N multi-signature script.
    MultiSig(MultiSigScript),
    /// A cross-chain script.
    CrossChain(MultiSigScript),
}

impl RedeemScript {
    /// Parse the code of a program into a redeem script.
    ///
    /// The variant is chosen by the trailing byte of the code. A
    /// standard script is expected to be
    /// ```text
    ///  OP_PUSHBYTES_33 <compressed-public-key> STANDARD
    /// ```
    /// while multi-signature and cross-chain scripts follow the layout
    /// described in [`MultiSigScript`]. Public keys must be valid
    /// compressed points on the secp256k1 curve.
    pub fn parse(code: &[u8]) -> Result<Self, ScriptError> {
        match code {
            [] => Err(ScriptError::EmptyScript),
            [.., STANDARD] if code.len() == PUBKEY_SCRIPT_LEN => match code {
                [OP_PUSHBYTES_33, key @ .., STANDARD] => PublicKey::from_slice(key)
                    .map(RedeemScript::Standard)
                    .map_err(ScriptError::MalformedKey),
                _ => Err(ScriptError::MalformedKey(secp256k1::Error::InvalidPublicKey)),
            },
            [.., STANDARD] => Err(ScriptError::InvalidStandardScriptLength(code.len())),
            [.., MULTISIG] => MultiSigScript::parse(code).map(RedeemScript::MultiSig),
            [.., CROSSCHAIN] => MultiSigScript::parse(code).map(RedeemScript::CrossChain),
            [.., tag] => Err(ScriptError::UnknownScriptType(*tag)),
        }
    }

    /// Create a standard redeem script for the given public key.
    pub fn standard(public_key: PublicKey) -> Self {
        RedeemScript::Standard(public_key)
    }

    /// The type of this script.
    pub fn script_type(&self) -> ScriptType {
        match self {
            RedeemScript::Standard(_) => ScriptType::Standard,
            RedeemScript::MultiSig(_) => ScriptType::MultiSig,
            RedeemScript::CrossChain(_) => ScriptType::CrossChain,
        }
    }

    /// Serialize the script into program code. This is the inverse of
    /// [`RedeemScript::parse`].
    pub fn to_code(&self) -> Vec<u8> {
        match self {
            RedeemScript::Standard(public_key) => {
                let mut code = Vec::with_capacity(PUBKEY_SCRIPT_LEN);
                code.push(OP_PUSHBYTES_33);
                code.extend_from_slice(&public_key.serialize());
                code.push(STANDARD);
                code
            }
            RedeemScript::MultiSig(script) => script.to_code(MULTISIG),
            RedeemScript::CrossChain(script) => script.to_code(CROSSCHAIN),
        }
    }

    /// Check that the parameter of a program authorizes the message
    /// under this script.
    pub fn verify(&self, parameter: &[u8], message: &[u8]) -> Result<(), VerifyError> {
        match self {
            RedeemScript::Standard(public_key) => {
                verify::verify_standard(public_key, parameter, message)
            }
            RedeemScript::MultiSig(script) | RedeemScript::CrossChain(script) => {
                verify::verify_multisig(script, parameter, message)
            }
        }
    }
}

/// Decode a small-number opcode. Bytes below `PUSH1` decode to zero or
/// negative numbers, which are never valid M or N values.
fn decode_small_int(byte: u8) -> i16 {
    byte as i16 - PUSH1 as i16 + 1
}

/// Encode a number in `1..=16` as a small-number opcode.
fn encode_small_int(value: u8) -> u8 {
    PUSH1 + value - 1
}
