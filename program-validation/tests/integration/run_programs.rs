//! End-to-end checks of the programs attached to a transaction

use std::num::NonZeroUsize;

use rand::rngs::OsRng;

use program_validation::address::ProgramHash;
use program_validation::config::ValidationConfig;
use program_validation::error::AddressError;
use program_validation::error::RunError;
use program_validation::error::VerifyError;
use program_validation::program::run_programs;
use program_validation::program::sort_programs;
use program_validation::program::Program;
use program_validation::program::ProgramValidator;
use program_validation::testing::accounts::Account;
use program_validation::testing::accounts::MultiAccount;

use test_case::test_case;

use crate::MESSAGE;

/// A transaction spending from a standard account, a 2-of-3 account and
/// a 3-of-5 cross-chain account, with its programs in canonical order.
fn signed_transaction() -> (Vec<ProgramHash>, Vec<Program>) {
    let standard = Account::random(&mut OsRng);
    let multisig = MultiAccount::random(&mut OsRng, 2, 3);
    let cross_chain = MultiAccount::random_cross_chain(&mut OsRng, 3, 5);

    let mut hashes = vec![
        standard.program_hash(),
        multisig.program_hash(),
        cross_chain.program_hash(),
    ];
    let mut programs = vec![
        standard.program(MESSAGE),
        multisig.program(MESSAGE),
        cross_chain.program(MESSAGE),
    ];

    hashes.sort();
    sort_programs(&mut programs).unwrap();
    (hashes, programs)
}

fn validators() -> [ProgramValidator; 2] {
    [
        ProgramValidator::new(ValidationConfig::default()),
        ProgramValidator::new(ValidationConfig {
            parallel: true,
            parallel_min_programs: NonZeroUsize::MIN,
        }),
    ]
}

#[test]
fn signed_transaction_is_authorized() {
    let (hashes, programs) = signed_transaction();

    assert_eq!(run_programs(MESSAGE, &hashes, &programs), Ok(()));
    for validator in validators() {
        assert_eq!(validator.run_programs(MESSAGE, &hashes, &programs), Ok(()));
    }
}

#[test]
fn tampered_message_is_rejected() {
    let (hashes, programs) = signed_transaction();
    let message = b"version=1;inputs=[a1f3:0];outputs=[EXh7:900000]";

    let error = run_programs(message, &hashes, &programs).unwrap_err();
    assert!(matches!(error, RunError::Verification { index: 0, .. }));
}

#[test]
fn standard_program_with_corrupted_signature_is_rejected() {
    let account = Account::random(&mut OsRng);
    let mut program = account.program(MESSAGE);
    program.parameter[20] ^= 0x80;

    let error = run_programs(MESSAGE, &[account.program_hash()], &[program]).unwrap_err();
    assert_eq!(
        error,
        RunError::Verification {
            index: 0,
            source: VerifyError::VerifyFailed
        }
    );
}

#[test_case(&[0, 1, 2]; "first three")]
#[test_case(&[4, 0, 2]; "out of order")]
#[test_case(&[1, 2, 3, 4]; "four of them")]
fn three_of_five_with_enough_signers_is_authorized(signers: &[usize]) {
    let account = MultiAccount::random(&mut OsRng, 3, 5);
    let program = Program::new(account.redeem_script(), account.sign_with(signers, MESSAGE));

    assert_eq!(run_programs(MESSAGE, &[account.program_hash()], &[program]), Ok(()));
}

#[test]
fn three_of_five_with_two_signers_is_rejected() {
    let account = MultiAccount::random(&mut OsRng, 3, 5);
    let program = Program::new(account.redeem_script(), account.sign_with(&[0, 3], MESSAGE));

    let error = run_programs(MESSAGE, &[account.program_hash()], &[program]).unwrap_err();
    assert_eq!(
        error,
        RunError::Verification {
            index: 0,
            source: VerifyError::TooFewSignatures { required: 3, supplied: 2 }
        }
    );
}

#[test]
fn three_of_five_with_a_stranger_is_rejected() {
    let account = MultiAccount::random(&mut OsRng, 3, 5);
    let stranger = Account::random(&mut OsRng);
    let mut parameter = account.sign_with(&[0, 1], MESSAGE);
    parameter.extend(stranger.sign(MESSAGE));
    let program = Program::new(account.redeem_script(), parameter);

    let error = run_programs(MESSAGE, &[account.program_hash()], &[program]).unwrap_err();
    assert_eq!(
        error,
        RunError::Verification {
            index: 0,
            source: VerifyError::InsufficientMatches { required: 3, matched: 2 }
        }
    );
}

#[test]
fn repeated_signer_is_rejected() {
    let account = MultiAccount::random(&mut OsRng, 2, 3);
    let program = Program::new(account.redeem_script(), account.sign_with(&[1, 1], MESSAGE));

    let error = run_programs(MESSAGE, &[account.program_hash()], &[program]).unwrap_err();
    assert_eq!(
        error,
        RunError::Verification {
            index: 0,
            source: VerifyError::DuplicateSignature
        }
    );
}

#[test]
fn reversed_programs_do_not_match_their_hashes() {
    let (hashes, mut programs) = signed_transaction();
    programs.reverse();

    let error = run_programs(MESSAGE, &hashes, &programs).unwrap_err();
    assert!(matches!(error, RunError::HashMismatch { index: 0, .. }));
}

#[test]
fn program_bound_to_another_address_is_rejected() {
    // A valid program for one account cannot stand in for another.
    let owner = Account::random(&mut OsRng);
    let thief = Account::random(&mut OsRng);

    let error = run_programs(MESSAGE, &[owner.program_hash()], &[thief.program(MESSAGE)])
        .unwrap_err();
    assert_eq!(
        error,
        RunError::HashMismatch {
            index: 0,
            expected: owner.program_hash(),
            actual: thief.program_hash(),
        }
    );
}

#[test]
fn missing_program_is_rejected() {
    let (hashes, mut programs) = signed_transaction();
    programs.pop();

    let error = run_programs(MESSAGE, &hashes, &programs).unwrap_err();
    assert_eq!(error, RunError::CountMismatch { hashes: 3, programs: 2 });
}

#[test]
fn transaction_without_programs_is_rejected() {
    for validator in validators() {
        let error = validator.run_programs(MESSAGE, &[], &[]).unwrap_err();
        assert_eq!(error, RunError::CountMismatch { hashes: 0, programs: 0 });
    }
}

#[test]
fn empty_code_is_rejected_before_anything_else() {
    let (hashes, mut programs) = signed_transaction();
    programs[2].code.clear();
    programs[2].parameter.clear();

    let error = run_programs(MESSAGE, &hashes, &programs).unwrap_err();
    assert_eq!(
        error,
        RunError::ProgramHash {
            index: 2,
            source: AddressError::EmptyCode
        }
    );
    assert_eq!(error.to_string(), "[ToProgramHash] failed, empty program code");
}

#[test]
fn validators_agree_on_the_first_failure() {
    let accounts: Vec<Account> = (0..16).map(|_| Account::random(&mut OsRng)).collect();
    let mut hashes: Vec<ProgramHash> = accounts.iter().map(Account::program_hash).collect();
    let mut programs: Vec<Program> = accounts.iter().map(|a| a.program(MESSAGE)).collect();
    hashes.sort();
    sort_programs(&mut programs).unwrap();

    programs[13].parameter.truncate(10);
    programs[5].parameter[40] ^= 0x01;

    let expected = run_programs(MESSAGE, &hashes, &programs).unwrap_err();
    assert!(matches!(expected, RunError::Verification { index: 5, .. }));
    for validator in validators() {
        assert_eq!(validator.run_programs(MESSAGE, &hashes, &programs), Err(expected.clone()));
    }
}
