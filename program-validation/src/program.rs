//! Validation and ordering of the programs attached to a transaction
//!

use rayon::prelude::*;

use crate::address::ProgramHash;
use crate::config::ValidationConfig;
use crate::error::AddressError;
use crate::error::ProgramError;
use crate::error::RunError;
use crate::error::SortError;
use crate::script::RedeemScript;

/// A redeem script together with the signatures that satisfy it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// The redeem script.
    pub code: Vec<u8>,
    /// The signature payload.
    pub parameter: Vec<u8>,
}

impl Program {
    /// Create a new program.
    pub fn new(code: Vec<u8>, parameter: Vec<u8>) -> Self {
        Self { code, parameter }
    }

    /// The program hash of the code of this program.
    pub fn program_hash(&self) -> Result<ProgramHash, AddressError> {
        ProgramHash::from_code(&self.code)
    }

    /// Parse the code and check that the parameter authorizes the
    /// message.
    pub fn verify(&self, message: &[u8]) -> Result<(), ProgramError> {
        let script = RedeemScript::parse(&self.code)?;
        script.verify(&self.parameter, message)?;
        Ok(())
    }

    /// Check this program against the program hash the caller expects
    /// at `index`.
    fn check(&self, index: usize, expected: &ProgramHash, message: &[u8]) -> Result<(), RunError> {
        let actual = self
            .program_hash()
            .map_err(|source| RunError::ProgramHash { index, source })?;

        if actual != *expected {
            return Err(RunError::HashMismatch {
                index,
                expected: *expected,
                actual,
            });
        }

        self.verify(message).map_err(|error| error.at(index))
    }
}

/// Verify every program attached to a transaction.
///
/// The program hash of `programs[i]` must equal `hashes[i]`, so callers
/// must put both slices in the same order beforehand, normally the
/// canonical order given by [`sort_programs`]. Programs are checked in
/// index order and the first failure is returned.
#[tracing::instrument(skip_all, fields(num_programs = programs.len()))]
pub fn run_programs(
    message: &[u8],
    hashes: &[ProgramHash],
    programs: &[Program],
) -> Result<(), RunError> {
    check_counts(hashes, programs)?;

    programs
        .iter()
        .zip(hashes)
        .enumerate()
        .try_for_each(|(index, (program, expected))| program.check(index, expected, message))
        .inspect_err(log_rejection)
}

/// Reorder the programs into ascending order of their program hashes.
///
/// Every program must have a recognized redeem script, otherwise an
/// error is returned and the programs are left untouched. The sort is
/// stable, so programs with identical code keep their relative order.
#[tracing::instrument(skip_all, fields(num_programs = programs.len()))]
pub fn sort_programs(programs: &mut [Program]) -> Result<(), SortError> {
    let mut keys = programs
        .iter()
        .enumerate()
        .map(|(index, program)| {
            let script = RedeemScript::parse(&program.code)
                .map_err(|source| SortError::InvalidProgramCode { index, source })?;
            Ok((ProgramHash::new(script.script_type(), &program.code), index))
        })
        .collect::<Result<Vec<_>, SortError>>()
        .inspect_err(|error| tracing::warn!(%error, "could not sort programs"))?;

    // The index is part of the key, so equal hashes keep their input
    // order.
    keys.sort_unstable();

    let mut unsorted: Vec<Program> = programs.iter_mut().map(std::mem::take).collect();
    for (slot, (_, index)) in programs.iter_mut().zip(keys) {
        *slot = std::mem::take(&mut unsorted[index]);
    }

    Ok(())
}

/// Runs [`run_programs`], optionally checking programs in parallel.
#[derive(Debug, Clone)]
pub struct ProgramValidator {
    config: ValidationConfig,
}

impl ProgramValidator {
    /// Create a new validator.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Verify every program attached to a transaction.
    ///
    /// This has the same outcome as [`run_programs`]. When programs are
    /// checked in parallel every program is checked, and the failure with
    /// the lowest index is returned.
    #[tracing::instrument(skip_all, fields(num_programs = programs.len()))]
    pub fn run_programs(
        &self,
        message: &[u8],
        hashes: &[ProgramHash],
        programs: &[Program],
    ) -> Result<(), RunError> {
        let parallel =
            self.config.parallel && programs.len() >= self.config.parallel_min_programs.get();
        if !parallel {
            return run_programs(message, hashes, programs);
        }

        check_counts(hashes, programs)?;

        let results: Vec<Result<(), RunError>> = programs
            .par_iter()
            .zip(hashes)
            .enumerate()
            .map(|(index, (program, expected))| program.check(index, expected, message))
            .collect();

        results
            .into_iter()
            .collect::<Result<(), RunError>>()
            .inspect_err(log_rejection)
    }
}

fn check_counts(hashes: &[ProgramHash], programs: &[Program]) -> Result<(), RunError> {
    if programs.is_empty() || hashes.len() != programs.len() {
        let error = RunError::CountMismatch {
            hashes: hashes.len(),
            programs: programs.len(),
        };
        log_rejection(&error);
        return Err(error);
    }
    Ok(())
}

fn log_rejection(error: &RunError) {
    match error {
        RunError::CountMismatch { hashes, programs } => {
            tracing::debug!(%hashes, %programs, %error, "program count mismatch");
        }
        RunError::HashMismatch { index, expected, actual } => {
            tracing::debug!(%index, %expected, %actual, %error, "program hash mismatch");
        }
        RunError::ProgramHash { index, .. }
        | RunError::InvalidScript { index, .. }
        | RunError::Verification { index, .. } => {
            tracing::debug!(%index, %error, "program rejected");
        }
    }
}
