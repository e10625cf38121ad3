use {
    crate::{
        account::ProgramAccount,
        hook::{ExecuteAccounts, Invocation, Verdict},
    },
    solana_address::Address,
    solana_program_error::ProgramResult,
};

pub fn process_execute<A: ProgramAccount>(
    program_id: &Address,
    accounts: &[A],
    amount: u64,
) -> ProgramResult {
    let accounts = ExecuteAccounts::try_from(accounts)?;

    match Invocation::begin(program_id, accounts, amount)?.resolve()? {
        Verdict::Approved => Ok(()),
        Verdict::Rejected(error) => Err(error.into()),
    }
}
