//! Key holders that can produce valid programs
//!

use rand::Rng;
use secp256k1::PublicKey;
use secp256k1::SecretKey;
use secp256k1::SECP256K1;

use crate::address::ProgramHash;
use crate::program::Program;
use crate::script::MultiSigScript;
use crate::script::RedeemScript;
use crate::script::ScriptType;
use crate::SIG_RECORD_LEN;

/// An owner of a standard redeem script.
#[derive(Debug, Clone)]
pub struct Account {
    /// The secret key of the account
    pub secret_key: SecretKey,
    /// The public key in the redeem script
    pub public_key: PublicKey,
}

impl Account {
    /// Generate an account with a random key.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from(SecretKey::new(rng))
    }

    /// The standard redeem script of this account.
    pub fn redeem_script(&self) -> Vec<u8> {
        RedeemScript::standard(self.public_key).to_code()
    }

    /// The program hash of the redeem script.
    pub fn program_hash(&self) -> ProgramHash {
        ProgramHash::new(ScriptType::Standard, &self.redeem_script())
    }

    /// A signature record over the message.
    pub fn sign(&self, message: &[u8]) -> [u8; SIG_RECORD_LEN] {
        super::sign_record(&self.secret_key, message)
    }

    /// A program that authorizes the message.
    pub fn program(&self, message: &[u8]) -> Program {
        Program::new(self.redeem_script(), self.sign(message).to_vec())
    }
}

impl From<SecretKey> for Account {
    fn from(secret_key: SecretKey) -> Self {
        Self {
            public_key: secret_key.public_key(SECP256K1),
            secret_key,
        }
    }
}

/// The owners of a multi-signature or cross-chain redeem script.
#[derive(Debug, Clone)]
pub struct MultiAccount {
    /// The signers, in the order they were generated. This is generally
    /// not the order of the keys in the script.
    pub accounts: Vec<Account>,
    /// The redeem script
    pub script: RedeemScript,
}

impl MultiAccount {
    /// Generate an M-of-N multi-signature account with random keys.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, m: u8, n: usize) -> Self {
        let (accounts, script) = Self::generate(rng, m, n);
        Self {
            accounts,
            script: RedeemScript::MultiSig(script),
        }
    }

    /// Generate an M-of-N cross-chain account with random keys.
    pub fn random_cross_chain<R: Rng + ?Sized>(rng: &mut R, m: u8, n: usize) -> Self {
        let (accounts, script) = Self::generate(rng, m, n);
        Self {
            accounts,
            script: RedeemScript::CrossChain(script),
        }
    }

    fn generate<R: Rng + ?Sized>(rng: &mut R, m: u8, n: usize) -> (Vec<Account>, MultiSigScript) {
        let accounts: Vec<Account> = (0..n).map(|_| Account::random(rng)).collect();
        let public_keys = accounts.iter().map(|account| account.public_key).collect();
        let script = MultiSigScript::new(m, public_keys).expect("invalid M or N for the account");
        (accounts, script)
    }

    /// The M of the script.
    pub fn m(&self) -> usize {
        match &self.script {
            RedeemScript::MultiSig(script) | RedeemScript::CrossChain(script) => {
                script.m() as usize
            }
            RedeemScript::Standard(_) => 1,
        }
    }

    /// The serialized redeem script.
    pub fn redeem_script(&self) -> Vec<u8> {
        self.script.to_code()
    }

    /// The program hash of the redeem script.
    pub fn program_hash(&self) -> ProgramHash {
        ProgramHash::new(self.script.script_type(), &self.redeem_script())
    }

    /// Signature records over the message from the first M accounts.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signers: Vec<usize> = (0..self.m()).collect();
        self.sign_with(&signers, message)
    }

    /// Signature records over the message from the accounts at the given
    /// indices, in that order.
    pub fn sign_with(&self, signers: &[usize], message: &[u8]) -> Vec<u8> {
        signers
            .iter()
            .flat_map(|index| self.accounts[*index].sign(message))
            .collect()
    }

    /// A program that authorizes the message.
    pub fn program(&self, message: &[u8]) -> Program {
        Program::new(self.redeem_script(), self.sign(message))
    }
}
