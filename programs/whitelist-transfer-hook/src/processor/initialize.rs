use {
    crate::{
        account::{check_canonical_address, check_writable, ProgramAccount},
        error::WhitelistError,
        registry::{config_seeds, VerifiedAuthority},
        state::{AccountState, WhitelistConfig},
        token::Mint,
        token_2022, CONFIG_SEED, ENTRY_SEED,
    },
    pinocchio_log::log,
    solana_address::Address,
    solana_program_error::{ProgramError, ProgramResult},
    transfer_hook_interface::{
        pda::extra_account_metas_seeds,
        ExtraAccountMeta, ExtraAccountMetaList, Seed,
    },
};

/// Number of extra accounts required by `Execute`.
pub const EXTRA_ACCOUNT_METAS_LEN: usize = 2;

/// Extra accounts required by `Execute`, in order:
///
///   5. Whitelist configuration, `["whitelist-config", mint]`
///   6. Whitelist entry of the destination, `["whitelist", mint, destination]`
pub fn extra_account_metas() -> Result<[ExtraAccountMeta; EXTRA_ACCOUNT_METAS_LEN], ProgramError>
{
    Ok([
        ExtraAccountMeta::new_with_seeds(
            &[
                Seed::Literal { bytes: CONFIG_SEED },
                Seed::AccountKey { index: 1 },
            ],
            false,
            false,
        )?,
        ExtraAccountMeta::new_with_seeds(
            &[
                Seed::Literal { bytes: ENTRY_SEED },
                Seed::AccountKey { index: 1 },
                Seed::AccountKey { index: 2 },
            ],
            false,
            false,
        )?,
    ])
}

/// The authority of a mint's whitelist: the transfer hook authority, or the
/// mint authority when the hook has none.
fn asset_authority<A: ProgramAccount>(
    program_id: &Address,
    mint: &A,
) -> Result<Option<Address>, ProgramError> {
    if !mint.owned_by(&token_2022::ID) {
        return Err(ProgramError::InvalidAccountOwner);
    }

    let data = mint.try_borrow()?;
    let mint = Mint::unpack(&data)?;

    let Some(hook) = mint.transfer_hook()? else {
        return Err(WhitelistError::MintNotGoverned.into());
    };
    if hook.program_id != Some(program_id) {
        return Err(WhitelistError::MintNotGoverned.into());
    }

    Ok(hook.authority.or(mint.mint_authority()).copied())
}

pub fn process_initialize<A: ProgramAccount>(
    program_id: &Address,
    accounts: &[A],
    extra_account_metas_bump: u8,
    config_bump: u8,
) -> ProgramResult {
    let [authority, meta_list, mint, config, _system_program, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys);
    };

    let mint_address = mint.address();
    let asset_authority =
        asset_authority(program_id, mint)?.ok_or(WhitelistError::UnauthorizedCaller)?;
    let verified = VerifiedAuthority::verify(mint_address, &asset_authority, authority)?;

    let meta_list_seeds = extra_account_metas_seeds(mint_address);
    check_canonical_address(
        meta_list,
        &meta_list_seeds,
        extra_account_metas_bump,
        program_id,
    )?;
    let seeds = config_seeds(mint_address);
    check_canonical_address(config, &seeds, config_bump, program_id)?;

    // Lamports alone do not make an account ours, anyone can send them.
    if meta_list.owned_by(program_id) || config.owned_by(program_id) {
        let error = WhitelistError::AlreadyInitialized;
        log!("{}", error.message());
        return Err(error.into());
    }
    check_writable(meta_list)?;
    check_writable(config)?;

    let metas = extra_account_metas()?;

    let bump = [extra_account_metas_bump];
    meta_list.create_pda(
        authority,
        ExtraAccountMetaList::size_of(metas.len()),
        program_id,
        &[meta_list_seeds[0], meta_list_seeds[1], bump.as_slice()],
    )?;
    ExtraAccountMetaList::init(&mut meta_list.try_borrow_mut()?, &metas)?;

    let bump = [config_bump];
    config.create_pda(
        authority,
        WhitelistConfig::LEN,
        program_id,
        &[seeds[0], seeds[1], bump.as_slice()],
    )?;
    WhitelistConfig::new(
        config_bump,
        extra_account_metas_bump,
        verified.mint(),
        verified.authority(),
    )
    .write_to(&mut config.try_borrow_mut()?)?;

    log!("Whitelist initialized");
    Ok(())
}
