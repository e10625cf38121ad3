//! Whitelist registry.
//!
//! Each approved `(mint, account)` pair is a [`WhitelistEntry`] account at
//! `["whitelist", mint, account]`. An account without an entry is not
//! approved.

use {
    crate::{
        account::{check_address, check_canonical_address, check_writable, ProgramAccount},
        error::WhitelistError,
        state::{AccountState, WhitelistConfig, WhitelistEntry},
        CONFIG_SEED, ENTRY_SEED,
    },
    pinocchio_log::log,
    solana_address::Address,
    solana_program_error::{ProgramError, ProgramResult},
    transfer_hook_interface::pda::derive_address,
};

#[inline(always)]
pub fn config_seeds(mint: &Address) -> [&[u8]; 2] {
    [CONFIG_SEED, mint.as_ref()]
}

#[inline(always)]
pub fn entry_seeds<'a>(mint: &'a Address, account: &'a Address) -> [&'a [u8]; 3] {
    [ENTRY_SEED, mint.as_ref(), account.as_ref()]
}

/// Proof that the signer of the current instruction is the authority of a
/// mint's whitelist.
///
/// Registry mutations take this token instead of checking the signer
/// themselves.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VerifiedAuthority {
    mint: Address,
    authority: Address,
}

impl VerifiedAuthority {
    /// Checks `signer` against the authority recorded in `config`.
    pub fn from_config<A: ProgramAccount>(
        config: &WhitelistConfig,
        signer: &A,
    ) -> Result<Self, ProgramError> {
        Self::verify(config.mint(), config.authority(), signer)
    }

    /// Checks `signer` against the `authority` of `mint`.
    pub(crate) fn verify<A: ProgramAccount>(
        mint: &Address,
        authority: &Address,
        signer: &A,
    ) -> Result<Self, ProgramError> {
        if !signer.is_signer() {
            return Err(ProgramError::MissingRequiredSignature);
        }
        if signer.address() != authority {
            let error = WhitelistError::UnauthorizedCaller;
            log!("{}", error.message());
            return Err(error.into());
        }

        Ok(Self {
            mint: *mint,
            authority: *authority,
        })
    }

    #[inline(always)]
    pub fn mint(&self) -> &Address {
        &self.mint
    }

    #[inline(always)]
    pub fn authority(&self) -> &Address {
        &self.authority
    }
}

/// Loads a whitelist configuration, checking that it sits at the address
/// derived from the mint it names.
pub fn load_config<A: ProgramAccount>(
    program_id: &Address,
    config: &A,
) -> Result<WhitelistConfig, ProgramError> {
    if !config.owned_by(program_id) {
        return Err(ProgramError::InvalidAccountOwner);
    }

    let state = *WhitelistConfig::from_bytes(&config.try_borrow()?)?;
    check_address(
        config,
        &derive_address(&config_seeds(state.mint()), state.bump(), program_id)?,
    )?;

    Ok(state)
}

/// Whether `account` is whitelisted for `mint`, given the account found at
/// its entry address.
///
/// Any account that is not an entry written by this program for exactly
/// this pair counts as absent.
pub fn is_approved<A: ProgramAccount>(
    program_id: &Address,
    mint: &Address,
    account: &Address,
    entry: &A,
) -> Result<bool, ProgramError> {
    if !entry.owned_by(program_id) {
        return Ok(false);
    }

    let data = entry.try_borrow()?;
    let Ok(state) = WhitelistEntry::from_bytes(&data) else {
        return Ok(false);
    };

    if state.mint() != mint || state.account() != account {
        return Ok(false);
    }

    let expected = derive_address(&entry_seeds(mint, account), state.bump(), program_id)?;
    Ok(entry.address() == &expected)
}

/// Adds `account` to the whitelist.
///
/// Adding an account that is already whitelisted succeeds without
/// changing anything. `entry_bump` must be the canonical bump of the entry
/// address, so a pair never has more than one entry.
pub fn add<A: ProgramAccount>(
    program_id: &Address,
    authority: &VerifiedAuthority,
    payer: &A,
    account: &Address,
    entry: &A,
    entry_bump: u8,
) -> ProgramResult {
    let mint = authority.mint();
    let seeds = entry_seeds(mint, account);
    check_canonical_address(entry, &seeds, entry_bump, program_id)?;

    if is_approved(program_id, mint, account, entry)? {
        log!("Account already whitelisted");
        return Ok(());
    }
    check_writable(entry)?;

    let bump = [entry_bump];
    entry.create_pda(
        payer,
        WhitelistEntry::LEN,
        program_id,
        &[seeds[0], seeds[1], seeds[2], bump.as_slice()],
    )?;

    let mut data = entry.try_borrow_mut()?;
    WhitelistEntry::new(entry_bump, mint, account).write_to(&mut data)?;

    log!("Account whitelisted");
    Ok(())
}

/// Removes `account` from the whitelist, returning the entry rent to
/// `recipient`.
///
/// Removing an account that is not whitelisted succeeds without changing
/// anything.
pub fn remove<A: ProgramAccount>(
    program_id: &Address,
    authority: &VerifiedAuthority,
    recipient: &A,
    account: &Address,
    entry: &A,
) -> ProgramResult {
    if !is_approved(program_id, authority.mint(), account, entry)? {
        log!("Account not whitelisted");
        return Ok(());
    }

    check_writable(entry)?;
    entry.close_to(recipient)?;

    log!("Account removed from whitelist");
    Ok(())
}
