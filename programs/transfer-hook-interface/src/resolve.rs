//! Off-chain resolution of extra account metas into concrete accounts.

use {
    crate::{
        error::AccountResolutionError,
        meta::{ExtraAccountMeta, MetaKind},
        pda::MAX_SEEDS,
        seeds::Seed,
    },
    solana_address::Address,
    solana_program_error::ProgramError,
};

/// An extra account ready to be appended to an `Execute` instruction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ResolvedAccount {
    pub address: Address,
    pub is_signer: bool,
    pub is_writable: bool,
}

/// Resolves `meta` against the accounts of the instruction built so far.
///
/// `accounts` holds the address and current data of every account that
/// precedes the meta in the instruction, so seeds can refer to both the
/// base accounts and the extra accounts resolved before this one.
pub fn resolve_extra_account_meta(
    meta: &ExtraAccountMeta,
    instruction_data: &[u8],
    accounts: &[(Address, &[u8])],
    hook_program_id: &Address,
) -> Result<ResolvedAccount, ProgramError> {
    let address = match meta.kind()? {
        MetaKind::Fixed => Address::new_from_array(*meta.address_config()),
        MetaKind::HookPda => derive(meta, instruction_data, accounts, hook_program_id)?,
        MetaKind::ExternalPda { program_index } => {
            let (program_id, _) = accounts
                .get(program_index as usize)
                .ok_or(AccountResolutionError::AccountNotFound)?;
            derive(meta, instruction_data, accounts, program_id)?
        }
    };

    Ok(ResolvedAccount {
        address,
        is_signer: meta.is_signer(),
        is_writable: meta.is_writable(),
    })
}

fn derive(
    meta: &ExtraAccountMeta,
    instruction_data: &[u8],
    accounts: &[(Address, &[u8])],
    program_id: &Address,
) -> Result<Address, ProgramError> {
    let mut seeds: [&[u8]; MAX_SEEDS] = [&[]; MAX_SEEDS];
    let mut count = 0;

    for seed in meta.seeds()? {
        let slot = seeds
            .get_mut(count)
            .ok_or(AccountResolutionError::TooManySeeds)?;
        *slot = seed_bytes(seed?, instruction_data, accounts)?;
        count += 1;
    }

    Ok(Address::find_program_address(&seeds[..count], program_id).0)
}

fn seed_bytes<'a>(
    seed: Seed<'a>,
    instruction_data: &'a [u8],
    accounts: &'a [(Address, &'a [u8])],
) -> Result<&'a [u8], ProgramError> {
    match seed {
        Seed::Literal { bytes } => Ok(bytes),
        Seed::InstructionData { index, length } => {
            let start = index as usize;
            instruction_data
                .get(start..start + length as usize)
                .ok_or(AccountResolutionError::InstructionDataTooSmall.into())
        }
        Seed::AccountKey { index } => accounts
            .get(index as usize)
            .map(|(address, _)| address.as_ref())
            .ok_or(AccountResolutionError::AccountNotFound.into()),
        Seed::AccountData {
            account_index,
            data_index,
            length,
        } => {
            let (_, data) = accounts
                .get(account_index as usize)
                .ok_or(AccountResolutionError::AccountNotFound)?;
            let start = data_index as usize;
            data.get(start..start + length as usize)
                .ok_or(AccountResolutionError::AccountDataTooSmall.into())
        }
    }
}
