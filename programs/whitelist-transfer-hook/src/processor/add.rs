use {
    crate::{
        account::ProgramAccount,
        registry::{self, load_config, VerifiedAuthority},
    },
    solana_address::Address,
    solana_program_error::{ProgramError, ProgramResult},
};

pub fn process_add_to_whitelist<A: ProgramAccount>(
    program_id: &Address,
    accounts: &[A],
    entry_bump: u8,
) -> ProgramResult {
    let [authority, config, account, entry, _system_program, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    let config = load_config(program_id, config)?;
    let verified = VerifiedAuthority::from_config(&config, authority)?;

    registry::add(
        program_id,
        &verified,
        authority,
        account.address(),
        entry,
        entry_bump,
    )
}
