mod add;
mod execute;
mod initialize;
mod remove;

use {
    crate::{account::ProgramAccount, instruction::WhitelistInstruction},
    solana_address::Address,
    solana_program_error::ProgramResult,
};

pub use initialize::{extra_account_metas, EXTRA_ACCOUNT_METAS_LEN};

/// Processes an instruction of the whitelist transfer hook.
pub fn process_instruction<A: ProgramAccount>(
    program_id: &Address,
    accounts: &[A],
    instruction_data: &[u8],
) -> ProgramResult {
    match WhitelistInstruction::unpack(instruction_data)? {
        WhitelistInstruction::Initialize {
            extra_account_metas_bump,
            config_bump,
        } => initialize::process_initialize(
            program_id,
            accounts,
            extra_account_metas_bump,
            config_bump,
        ),
        WhitelistInstruction::AddToWhitelist { entry_bump } => {
            add::process_add_to_whitelist(program_id, accounts, entry_bump)
        }
        WhitelistInstruction::RemoveFromWhitelist => {
            remove::process_remove_from_whitelist(program_id, accounts)
        }
        WhitelistInstruction::Execute { amount } => {
            execute::process_execute(program_id, accounts, amount)
        }
    }
}
