//! Canonical ordering of programs

use rand::rngs::OsRng;

use program_validation::address::sort_program_hashes;
use program_validation::address::ProgramHash;
use program_validation::error::ScriptError;
use program_validation::error::SortError;
use program_validation::program::run_programs;
use program_validation::program::sort_programs;
use program_validation::program::Program;
use program_validation::testing::accounts::Account;
use program_validation::testing::accounts::MultiAccount;
use program_validation::MULTISIG;

use crate::MESSAGE;

fn mixed_accounts(count: usize) -> Vec<(ProgramHash, Program)> {
    (0..count)
        .map(|i| match i % 3 {
            0 => {
                let account = Account::random(&mut OsRng);
                (account.program_hash(), account.program(MESSAGE))
            }
            1 => {
                let account = MultiAccount::random(&mut OsRng, 1, 2);
                (account.program_hash(), account.program(MESSAGE))
            }
            _ => {
                let account = MultiAccount::random_cross_chain(&mut OsRng, 2, 2);
                (account.program_hash(), account.program(MESSAGE))
            }
        })
        .collect()
}

#[test]
fn sorted_programs_line_up_with_sorted_hashes() {
    let (mut hashes, mut programs): (Vec<_>, Vec<_>) = mixed_accounts(12).into_iter().unzip();

    sort_program_hashes(&mut hashes);
    sort_programs(&mut programs).unwrap();

    assert_eq!(run_programs(MESSAGE, &hashes, &programs), Ok(()));
}

#[test]
fn sorting_twice_changes_nothing() {
    let (_, mut programs): (Vec<_>, Vec<_>) = mixed_accounts(9).into_iter().unzip();

    sort_programs(&mut programs).unwrap();
    let sorted = programs.clone();
    sort_programs(&mut programs).unwrap();

    assert_eq!(programs, sorted);
}

#[test]
fn input_order_does_not_matter() {
    let (_, mut programs): (Vec<_>, Vec<_>) = mixed_accounts(9).into_iter().unzip();
    let mut reversed: Vec<Program> = programs.iter().rev().cloned().collect();

    sort_programs(&mut programs).unwrap();
    sort_programs(&mut reversed).unwrap();

    assert_eq!(programs, reversed);
}

#[test]
fn malformed_program_code_is_rejected() {
    let (_, mut programs): (Vec<_>, Vec<_>) = mixed_accounts(4).into_iter().unzip();
    // The tag is known but the script is far too short.
    programs.push(Program::new(vec![0x52, MULTISIG], Vec::new()));
    let before = programs.clone();

    let error = sort_programs(&mut programs).unwrap_err();
    assert_eq!(
        error,
        SortError::InvalidProgramCode {
            index: 4,
            source: ScriptError::LengthNotEnough
        }
    );
    assert_eq!(programs, before);
}

#[test]
fn empty_program_code_is_rejected() {
    let mut programs = vec![Program::default()];

    let error = sort_programs(&mut programs).unwrap_err();
    assert_eq!(
        error,
        SortError::InvalidProgramCode {
            index: 0,
            source: ScriptError::EmptyScript
        }
    );
}
