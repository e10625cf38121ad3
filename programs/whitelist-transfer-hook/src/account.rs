use {
    core::ops::{Deref, DerefMut},
    solana_address::Address,
    solana_program_error::{ProgramError, ProgramResult},
};

/// View of an account passed to the program.
///
/// The processors only see accounts through this trait, so the same code
/// runs against the runtime's account views on-chain and against in-memory
/// accounts in host tests.
pub trait ProgramAccount {
    type Data<'a>: Deref<Target = [u8]>
    where
        Self: 'a;

    type DataMut<'a>: DerefMut<Target = [u8]>
    where
        Self: 'a;

    fn address(&self) -> &Address;

    fn is_signer(&self) -> bool;

    fn is_writable(&self) -> bool;

    fn owned_by(&self, program_id: &Address) -> bool;

    fn data_len(&self) -> usize;

    fn lamports(&self) -> u64;

    fn try_borrow(&self) -> Result<Self::Data<'_>, ProgramError>;

    fn try_borrow_mut(&self) -> Result<Self::DataMut<'_>, ProgramError>;

    /// Creates this program derived account with `space` zeroed bytes,
    /// owned by `owner` and funded by `payer` to be rent exempt.
    ///
    /// Lamports already held by the address are kept, and `payer` only
    /// covers what is missing. `signer_seeds` must include the bump.
    fn create_pda<const SEEDS: usize>(
        &self,
        payer: &Self,
        space: usize,
        owner: &Address,
        signer_seeds: &[&[u8]; SEEDS],
    ) -> ProgramResult;

    /// Moves all lamports of this account to `destination` and releases the
    /// account.
    fn close_to(&self, destination: &Self) -> ProgramResult;
}

/// Returns `Ok` if the account is a signer.
#[inline(always)]
pub fn check_signer<A: ProgramAccount>(account: &A) -> ProgramResult {
    if !account.is_signer() {
        return Err(ProgramError::MissingRequiredSignature);
    }
    Ok(())
}

/// Returns `Ok` if the account is writable.
#[inline(always)]
pub fn check_writable<A: ProgramAccount>(account: &A) -> ProgramResult {
    if !account.is_writable() {
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(())
}

/// Returns `Ok` if the account has the expected address.
#[inline(always)]
pub fn check_address<A: ProgramAccount>(account: &A, expected: &Address) -> ProgramResult {
    if account.address() != expected {
        return Err(ProgramError::InvalidSeeds);
    }
    Ok(())
}

/// Returns `Ok` if the account sits at the program address of `seeds` and
/// `bump` is its canonical bump.
///
/// Any other bump is rejected, so each set of seeds maps to one account.
pub fn check_canonical_address<A: ProgramAccount>(
    account: &A,
    seeds: &[&[u8]],
    bump: u8,
    program_id: &Address,
) -> ProgramResult {
    let (expected, canonical_bump) = Address::find_program_address(seeds, program_id);
    if bump != canonical_bump {
        return Err(ProgramError::InvalidSeeds);
    }
    check_address(account, &expected)
}
