//! Client-side instruction builders.

use {
    crate::{
        extra_accounts::{resolve_execute_extras, TransferAccounts},
        ledger,
        runtime::{AccountMeta, Instruction, Runtime},
    },
    solana_address::Address,
    solana_program_error::ProgramError,
    transfer_hook_interface::pda::find_extra_account_metas_address,
    whitelist_transfer_hook::{
        instruction::WhitelistInstruction,
        registry::{config_seeds, entry_seeds},
        system_program,
        token::Mint,
        token_2022,
    },
};

pub fn config_address(mint: &Address) -> (Address, u8) {
    Address::find_program_address(&config_seeds(mint), &whitelist_transfer_hook::ID)
}

pub fn entry_address(mint: &Address, account: &Address) -> (Address, u8) {
    Address::find_program_address(&entry_seeds(mint, account), &whitelist_transfer_hook::ID)
}

pub fn initialize(authority: &Address, mint: &Address) -> Instruction {
    let (extra_account_metas, extra_account_metas_bump) =
        find_extra_account_metas_address(mint, &whitelist_transfer_hook::ID);
    let (config, config_bump) = config_address(mint);

    Instruction {
        program_id: whitelist_transfer_hook::ID,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(extra_account_metas, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(config, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: WhitelistInstruction::Initialize {
            extra_account_metas_bump,
            config_bump,
        }
        .pack()
        .to_vec(),
    }
}

pub fn add_to_whitelist(authority: &Address, mint: &Address, account: &Address) -> Instruction {
    let (entry, entry_bump) = entry_address(mint, account);

    Instruction {
        program_id: whitelist_transfer_hook::ID,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(config_address(mint).0, false),
            AccountMeta::new_readonly(*account, false),
            AccountMeta::new(entry, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: WhitelistInstruction::AddToWhitelist { entry_bump }
            .pack()
            .to_vec(),
    }
}

pub fn remove_from_whitelist(authority: &Address, mint: &Address, account: &Address) -> Instruction {
    Instruction {
        program_id: whitelist_transfer_hook::ID,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(config_address(mint).0, false),
            AccountMeta::new_readonly(*account, false),
            AccountMeta::new(entry_address(mint, account).0, false),
        ],
        data: WhitelistInstruction::RemoveFromWhitelist.pack().to_vec(),
    }
}

/// A standalone `Execute`, as anyone could send it outside of a transfer.
pub fn execute(transfer: &TransferAccounts, amount: u64) -> Instruction {
    let mint = &transfer.mint;

    Instruction {
        program_id: whitelist_transfer_hook::ID,
        accounts: vec![
            AccountMeta::new_readonly(transfer.source, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(transfer.destination, false),
            AccountMeta::new_readonly(transfer.owner, false),
            AccountMeta::new_readonly(
                find_extra_account_metas_address(mint, &whitelist_transfer_hook::ID).0,
                false,
            ),
            AccountMeta::new_readonly(config_address(mint).0, false),
            AccountMeta::new_readonly(entry_address(mint, &transfer.destination).0, false),
        ],
        data: WhitelistInstruction::Execute { amount }.pack().to_vec(),
    }
}

pub fn mint_to(mint: &Address, destination: &Address, authority: &Address, amount: u64) -> Instruction {
    Instruction {
        program_id: token_2022::ID,
        accounts: vec![
            AccountMeta::new(*mint, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*authority, true),
        ],
        data: ledger::mint_to_data(amount),
    }
}

/// `TransferChecked` with the given accounts appended after the base
/// accounts.
pub fn transfer_checked_with_accounts(
    transfer: &TransferAccounts,
    amount: u64,
    decimals: u8,
    additional_accounts: &[AccountMeta],
) -> Instruction {
    let mut accounts = vec![
        AccountMeta::new(transfer.source, false),
        AccountMeta::new_readonly(transfer.mint, false),
        AccountMeta::new(transfer.destination, false),
        AccountMeta::new_readonly(transfer.owner, true),
    ];
    accounts.extend_from_slice(additional_accounts);

    Instruction {
        program_id: token_2022::ID,
        accounts,
        data: ledger::transfer_checked_data(amount, decimals),
    }
}

/// `TransferChecked` carrying every account the mint's transfer hook
/// needs, resolved against the current state of `runtime`.
pub fn transfer_checked(
    runtime: &Runtime,
    transfer: &TransferAccounts,
    amount: u64,
    decimals: u8,
) -> Result<Instruction, ProgramError> {
    let mint = runtime
        .account(&transfer.mint)
        .ok_or(ProgramError::UninitializedAccount)?;
    let hook_program_id = Mint::unpack(&mint.data)?
        .transfer_hook()?
        .and_then(|hook| hook.program_id)
        .copied();

    let Some(hook_program_id) = hook_program_id else {
        return Ok(transfer_checked_with_accounts(transfer, amount, decimals, &[]));
    };

    let extras = resolve_execute_extras(&hook_program_id, transfer, amount, |address| {
        runtime
            .account(address)
            .map(|account| account.data.clone())
            .unwrap_or_default()
    })?;

    let mut accounts: Vec<AccountMeta> = extras
        .accounts
        .iter()
        .map(|resolved| AccountMeta {
            address: resolved.address,
            is_signer: resolved.is_signer,
            is_writable: resolved.is_writable,
        })
        .collect();
    accounts.push(AccountMeta::new_readonly(hook_program_id, false));
    accounts.push(AccountMeta::new_readonly(extras.extra_account_metas, false));

    Ok(transfer_checked_with_accounts(
        transfer, amount, decimals, &accounts,
    ))
}
