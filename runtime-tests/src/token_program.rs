//! Native Token-2022 of the runtime.
//!
//! Supports `MintTo` and `TransferChecked`. Transfers of a mint with a
//! transfer hook set the `transferring` flag of both token accounts, call
//! the hook's `Execute` with the extra accounts it publishes, and clear the
//! flags once the hook approves.

use {
    crate::{
        account::AccountState,
        extra_accounts::{resolve_execute_extras, TransferAccounts},
        ledger::{self, TokenError, TokenInstruction},
        runtime::{AccountMeta, Instruction, InstructionError, InvokeContext},
    },
    solana_address::Address,
    solana_program_error::ProgramError,
    transfer_hook_interface::instruction::execute_data,
    whitelist_transfer_hook::{
        token::{Mint, TokenAccount},
        token_2022,
    },
};

pub(crate) fn process(
    context: &mut InvokeContext,
    instruction: &Instruction,
) -> Result<(), InstructionError> {
    match TokenInstruction::unpack(&instruction.data)? {
        TokenInstruction::MintTo { amount } => mint_to(context, &instruction.accounts, amount),
        TokenInstruction::TransferChecked { amount, decimals } => {
            transfer_checked(context, &instruction.accounts, amount, decimals)
        }
    }
}

fn load(context: &InvokeContext, address: &Address) -> Result<AccountState, InstructionError> {
    let state = context.state(address);
    if state.owner != token_2022::ID {
        return Err(ProgramError::IncorrectProgramId.into());
    }
    Ok(state)
}

fn check_writable(accounts: &[&AccountMeta]) -> Result<(), InstructionError> {
    match accounts.iter().find(|meta| !meta.is_writable) {
        Some(meta) => Err(InstructionError::ReadonlyModified(meta.address)),
        None => Ok(()),
    }
}

fn update<F>(context: &mut InvokeContext, address: &Address, f: F) -> Result<(), InstructionError>
where
    F: FnOnce(&mut [u8]),
{
    let data = context
        .data_mut(address)
        .ok_or(ProgramError::UninitializedAccount)?;
    f(data.as_mut_slice());
    Ok(())
}

fn mint_to(
    context: &mut InvokeContext,
    accounts: &[AccountMeta],
    amount: u64,
) -> Result<(), InstructionError> {
    let [mint, destination, authority, ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys.into());
    };
    check_writable(&[mint, destination])?;

    let mint_state = load(context, &mint.address)?;
    let mint_account = Mint::unpack(&mint_state.data)?;
    if mint_account.mint_authority() != Some(&authority.address) {
        return Err(TokenError::OwnerMismatch.into());
    }
    if !authority.is_signer {
        return Err(ProgramError::MissingRequiredSignature.into());
    }

    let destination_state = load(context, &destination.address)?;
    let destination_account = TokenAccount::unpack(&destination_state.data)?;
    if destination_account.mint() != &mint.address {
        return Err(TokenError::MintMismatch.into());
    }

    let balance = destination_account
        .amount()
        .checked_add(amount)
        .ok_or(TokenError::Overflow)?;
    let supply = ledger::supply(&mint_state.data)
        .checked_add(amount)
        .ok_or(TokenError::Overflow)?;

    update(context, &destination.address, |data| {
        ledger::set_amount(data, balance)
    })?;
    update(context, &mint.address, |data| ledger::set_supply(data, supply))
}

fn transfer_checked(
    context: &mut InvokeContext,
    accounts: &[AccountMeta],
    amount: u64,
    decimals: u8,
) -> Result<(), InstructionError> {
    let [source, mint, destination, authority, remaining @ ..] = accounts else {
        return Err(ProgramError::NotEnoughAccountKeys.into());
    };
    check_writable(&[source, destination])?;

    let mint_state = load(context, &mint.address)?;
    let mint_account = Mint::unpack(&mint_state.data)?;
    if mint_account.decimals() != decimals {
        return Err(TokenError::MintDecimalsMismatch.into());
    }
    let hook_program_id = mint_account
        .transfer_hook()?
        .and_then(|hook| hook.program_id)
        .copied();

    let source_state = load(context, &source.address)?;
    let source_account = TokenAccount::unpack(&source_state.data)?;
    let destination_state = load(context, &destination.address)?;
    let destination_account = TokenAccount::unpack(&destination_state.data)?;

    if source_account.mint() != &mint.address || destination_account.mint() != &mint.address {
        return Err(TokenError::MintMismatch.into());
    }
    if source_account.owner() != &authority.address {
        return Err(TokenError::OwnerMismatch.into());
    }
    if !authority.is_signer {
        return Err(ProgramError::MissingRequiredSignature.into());
    }

    let source_balance = source_account
        .amount()
        .checked_sub(amount)
        .ok_or(TokenError::InsufficientFunds)?;
    let destination_balance = destination_account
        .amount()
        .checked_add(amount)
        .ok_or(TokenError::Overflow)?;

    update(context, &source.address, |data| {
        ledger::set_amount(data, source_balance)
    })?;
    update(context, &destination.address, |data| {
        ledger::set_amount(data, destination_balance)
    })?;

    let Some(hook_program_id) = hook_program_id else {
        return Ok(());
    };

    let transfer = TransferAccounts {
        source: source.address,
        mint: mint.address,
        destination: destination.address,
        owner: authority.address,
    };

    set_transferring(context, &transfer, true)?;
    let execute = execute_instruction(context, &hook_program_id, &transfer, remaining, amount)?;
    context.invoke(&execute)?;
    set_transferring(context, &transfer, false)
}

fn set_transferring(
    context: &mut InvokeContext,
    transfer: &TransferAccounts,
    transferring: bool,
) -> Result<(), InstructionError> {
    for address in [&transfer.source, &transfer.destination] {
        update(context, address, |data| {
            ledger::set_transferring(data, transferring);
        })?;
    }
    Ok(())
}

/// Builds the `Execute` call of a transfer.
///
/// The hook program, its extra account metas account and every extra
/// account must have been passed to the transfer. Base accounts are passed
/// to the hook read-only and unsigned.
fn execute_instruction(
    context: &InvokeContext,
    hook_program_id: &Address,
    transfer: &TransferAccounts,
    remaining: &[AccountMeta],
    amount: u64,
) -> Result<Instruction, InstructionError> {
    let passed = |address: &Address| {
        remaining
            .iter()
            .find(|meta| &meta.address == address)
            .ok_or(ProgramError::NotEnoughAccountKeys)
    };

    passed(hook_program_id)?;
    let extras = resolve_execute_extras(hook_program_id, transfer, amount, |address| {
        context.state(address).data
    })?;
    passed(&extras.extra_account_metas)?;

    let mut accounts = vec![
        AccountMeta::new_readonly(transfer.source, false),
        AccountMeta::new_readonly(transfer.mint, false),
        AccountMeta::new_readonly(transfer.destination, false),
        AccountMeta::new_readonly(transfer.owner, false),
        AccountMeta::new_readonly(extras.extra_account_metas, false),
    ];
    for resolved in &extras.accounts {
        let meta = passed(&resolved.address)?;
        accounts.push(AccountMeta {
            address: resolved.address,
            is_signer: resolved.is_signer && meta.is_signer,
            is_writable: resolved.is_writable && meta.is_writable,
        });
    }

    Ok(Instruction {
        program_id: *hook_program_id,
        accounts,
        data: execute_data(amount).to_vec(),
    })
}
