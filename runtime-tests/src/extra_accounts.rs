//! Resolution of the extra accounts a transfer hook asks for.
//!
//! Used by clients building a transfer and by Token-2022 when it builds the
//! `Execute` call, so both agree on the accounts.

use {
    solana_address::Address,
    solana_program_error::ProgramError,
    transfer_hook_interface::{
        instruction::execute_data,
        pda::find_extra_account_metas_address,
        resolve::{resolve_extra_account_meta, ResolvedAccount},
        ExtraAccountMetaList,
    },
};

/// Base accounts of an `Execute` instruction besides the extra account
/// metas account.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TransferAccounts {
    pub source: Address,
    pub mint: Address,
    pub destination: Address,
    pub owner: Address,
}

/// Extra accounts of an `Execute` call for a transfer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExecuteExtras {
    /// Address of the extra account metas account of the mint.
    pub extra_account_metas: Address,
    pub accounts: Vec<ResolvedAccount>,
}

/// Reads the extra account metas published by `hook_program_id` for the
/// transfer's mint and resolves them in order.
///
/// `fetch` returns the current data of an account, empty if it does not
/// exist.
pub fn resolve_execute_extras<F>(
    hook_program_id: &Address,
    transfer: &TransferAccounts,
    amount: u64,
    fetch: F,
) -> Result<ExecuteExtras, ProgramError>
where
    F: Fn(&Address) -> Vec<u8>,
{
    let (extra_account_metas, _) =
        find_extra_account_metas_address(&transfer.mint, hook_program_id);
    let meta_list = fetch(&extra_account_metas);
    let metas = ExtraAccountMetaList::unpack(&meta_list)?;

    let instruction_data = execute_data(amount);
    let mut known: Vec<(Address, Vec<u8>)> = [
        transfer.source,
        transfer.mint,
        transfer.destination,
        transfer.owner,
        extra_account_metas,
    ]
    .into_iter()
    .map(|address| (address, fetch(&address)))
    .collect();

    let mut accounts = Vec::with_capacity(metas.len());
    for meta in metas {
        let views: Vec<(Address, &[u8])> = known
            .iter()
            .map(|(address, data)| (*address, data.as_slice()))
            .collect();
        let resolved =
            resolve_extra_account_meta(meta, &instruction_data, &views, hook_program_id)?;

        known.push((resolved.address, fetch(&resolved.address)));
        accounts.push(resolved);
    }

    Ok(ExecuteExtras {
        extra_account_metas,
        accounts,
    })
}
