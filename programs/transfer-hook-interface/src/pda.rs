use {
    crate::EXTRA_ACCOUNT_METAS_SEED,
    sha2::{Digest, Sha256},
    solana_address::Address,
    solana_program_error::ProgramError,
};

/// Maximum number of seeds of a program address, bump excluded.
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed.
pub const MAX_SEED_LEN: usize = 32;

const PDA_MARKER: &[u8; 21] = b"ProgramDerivedAddress";

/// Derive a [program address][pda] from the given seeds, bump and program id.
///
/// [pda]: https://solana.com/docs/core/pda
///
/// Unlike `create_program_address`, this does not check that the result is
/// off the curve. It is meant for addresses whose bump has been found
/// already, either at creation time or off-chain, where the only question
/// is whether a given account matches.
pub fn derive_address(
    seeds: &[&[u8]],
    bump: u8,
    program_id: &Address,
) -> Result<Address, ProgramError> {
    if seeds.len() > MAX_SEEDS {
        return Err(ProgramError::MaxSeedLengthExceeded);
    }

    let mut hasher = Sha256::new();
    for seed in seeds {
        if seed.len() > MAX_SEED_LEN {
            return Err(ProgramError::MaxSeedLengthExceeded);
        }
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id);
    hasher.update(PDA_MARKER);

    Ok(Address::new_from_array(hasher.finalize().into()))
}

/// Seeds of the extra account metas account of `mint`, bump excluded.
#[inline(always)]
pub fn extra_account_metas_seeds(mint: &Address) -> [&[u8]; 2] {
    [EXTRA_ACCOUNT_METAS_SEED, mint.as_ref()]
}

/// Address and bump of the extra account metas account of `mint`.
#[cfg(feature = "find-pda")]
pub fn find_extra_account_metas_address(mint: &Address, program_id: &Address) -> (Address, u8) {
    Address::find_program_address(&extra_account_metas_seeds(mint), program_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_find_program_address() {
        let program_id = Address::new_from_array([3; 32]);
        let mint = Address::new_from_array([5; 32]);
        let seeds = extra_account_metas_seeds(&mint);

        let (expected, bump) = Address::find_program_address(&seeds, &program_id);

        assert_eq!(derive_address(&seeds, bump, &program_id), Ok(expected));
    }

    #[test]
    fn other_bump_gives_other_address() {
        let program_id = Address::new_from_array([3; 32]);
        let mint = Address::new_from_array([5; 32]);
        let seeds = extra_account_metas_seeds(&mint);

        let (expected, bump) = Address::find_program_address(&seeds, &program_id);

        assert_ne!(
            derive_address(&seeds, bump.wrapping_sub(1), &program_id),
            Ok(expected)
        );
    }

    #[test]
    fn seed_limits() {
        let program_id = Address::new_from_array([1; 32]);
        let long = [0u8; MAX_SEED_LEN + 1];

        assert_eq!(
            derive_address(&[&long], 255, &program_id),
            Err(ProgramError::MaxSeedLengthExceeded)
        );
        assert_eq!(
            derive_address(&[b"s".as_slice(); MAX_SEEDS + 1], 255, &program_id),
            Err(ProgramError::MaxSeedLengthExceeded)
        );
    }
}
