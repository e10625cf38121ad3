use {
    crate::{
        account::{check_writable, ProgramAccount},
        registry::{self, load_config, VerifiedAuthority},
    },
    solana_address::Address,
    solana_program_error::{ProgramError, ProgramResult},
};

pub fn process_remove_from_whitelist<A: ProgramAccount>(
    program_id: &Address,
    accounts: &[A],
) -> ProgramResult {
    let [authority, config, account, entry, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    let config = load_config(program_id, config)?;
    let verified = VerifiedAuthority::from_config(&config, authority)?;
    // Receives the entry rent.
    check_writable(authority)?;

    registry::remove(program_id, &verified, authority, account.address(), entry)
}
