//! A single-threaded ledger that executes transactions against the
//! whitelist transfer hook and a native Token-2022.
//!
//! Transactions are atomic: instructions run against a working copy of the
//! accounts that is only committed when every instruction succeeds.

use {
    crate::{
        account::{AccountState, SimAccount},
        ledger::{self, TokenError, TransferHookConfig},
        rent::minimum_balance,
        token_program,
    },
    solana_address::Address,
    solana_program_error::ProgramError,
    std::collections::{BTreeMap, BTreeSet},
    thiserror::Error,
    whitelist_transfer_hook::{
        system_program,
        token::{Mint, TokenAccount},
        token_2022,
    },
};

/// An account passed to an instruction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AccountMeta {
    pub address: Address,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(address: Address, is_signer: bool) -> Self {
        Self {
            address,
            is_signer,
            is_writable: true,
        }
    }

    pub fn new_readonly(address: Address, is_signer: bool) -> Self {
        Self {
            address,
            is_signer,
            is_writable: false,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Instruction {
    pub program_id: Address,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum InstructionError {
    #[error("program failed: {0:?}")]
    Program(ProgramError),
    #[error("missing signature for {0:?}")]
    MissingSignature(Address),
    #[error("account {0:?} passed more than once")]
    DuplicateAccount(Address),
    #[error("read-only account {0:?} was modified")]
    ReadonlyModified(Address),
    #[error("program modified account {0:?} it does not own")]
    ExternalAccountDataModified(Address),
    #[error("sum of account balances changed")]
    UnbalancedLamports,
    #[error("unknown program {0:?}")]
    UnknownProgram(Address),
}

impl From<ProgramError> for InstructionError {
    fn from(error: ProgramError) -> Self {
        Self::Program(error)
    }
}

impl From<TokenError> for InstructionError {
    fn from(error: TokenError) -> Self {
        Self::Program(error.into())
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("instruction {index} failed: {error}")]
pub struct TransactionError {
    pub index: usize,
    #[source]
    pub error: InstructionError,
}

impl TransactionError {
    /// The error returned by the failing program, if a program failed.
    pub fn program_error(&self) -> Option<&ProgramError> {
        match &self.error {
            InstructionError::Program(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct Runtime {
    accounts: BTreeMap<Address, AccountState>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&self, address: &Address) -> Option<&AccountState> {
        self.accounts.get(address)
    }

    pub fn lamports(&self, address: &Address) -> u64 {
        self.accounts
            .get(address)
            .map_or(0, |account| account.lamports)
    }

    /// Stores `state` at `address`, removing the account if `state` is
    /// empty.
    pub fn set_account(&mut self, address: Address, state: AccountState) {
        store(&mut self.accounts, address, state);
    }

    pub fn airdrop(&mut self, address: &Address, lamports: u64) {
        self.accounts
            .entry(*address)
            .or_insert_with(|| AccountState::with_lamports(0))
            .lamports += lamports;
    }

    /// Creates an initialized Token-2022 mint.
    pub fn create_mint(
        &mut self,
        address: Address,
        mint_authority: Option<&Address>,
        decimals: u8,
        transfer_hook: Option<&TransferHookConfig>,
    ) {
        let data = ledger::mint_data(mint_authority, decimals, transfer_hook);
        self.set_token_account(address, data);
    }

    /// Creates an empty token account of `mint`.
    pub fn create_token_account(
        &mut self,
        address: Address,
        mint: &Address,
        owner: &Address,
    ) -> Result<(), ProgramError> {
        let mint_state = self
            .accounts
            .get(mint)
            .filter(|account| account.owner == token_2022::ID)
            .ok_or(ProgramError::UninitializedAccount)?;
        let transfer_hook = Mint::unpack(&mint_state.data)?.transfer_hook()?.is_some();

        let data = ledger::token_account_data(mint, owner, transfer_hook);
        self.set_token_account(address, data);
        Ok(())
    }

    fn set_token_account(&mut self, address: Address, data: Vec<u8>) {
        let state = AccountState {
            owner: token_2022::ID,
            lamports: minimum_balance(data.len()),
            data,
        };
        self.set_account(address, state);
    }

    pub fn token_account(&self, address: &Address) -> Option<TokenAccount<'_>> {
        self.accounts
            .get(address)
            .filter(|account| account.owner == token_2022::ID)
            .and_then(|account| TokenAccount::unpack(&account.data).ok())
    }

    pub fn token_balance(&self, address: &Address) -> Option<u64> {
        self.token_account(address).map(|account| account.amount())
    }

    /// Executes `instructions` in order, committing their effects only if
    /// all of them succeed.
    pub fn process_transaction(
        &mut self,
        instructions: &[Instruction],
        signers: &[Address],
    ) -> Result<(), TransactionError> {
        let mut accounts = self.accounts.clone();
        let mut context = InvokeContext {
            accounts: &mut accounts,
            signers,
        };

        for (index, instruction) in instructions.iter().enumerate() {
            context
                .invoke(instruction)
                .map_err(|error| TransactionError { index, error })?;
        }

        self.accounts = accounts;
        Ok(())
    }
}

fn store(accounts: &mut BTreeMap<Address, AccountState>, address: Address, state: AccountState) {
    if state.is_empty() {
        accounts.remove(&address);
    } else {
        accounts.insert(address, state);
    }
}

fn total_lamports(states: &[AccountState]) -> u128 {
    states
        .iter()
        .map(|state| u128::from(state.lamports))
        .sum()
}

/// Accounts of the running transaction, as seen by the instruction being
/// executed.
pub(crate) struct InvokeContext<'a> {
    accounts: &'a mut BTreeMap<Address, AccountState>,
    signers: &'a [Address],
}

impl InvokeContext<'_> {
    /// Current state of `address`; accounts that do not exist are empty.
    pub(crate) fn state(&self, address: &Address) -> AccountState {
        self.accounts.get(address).cloned().unwrap_or_default()
    }

    pub(crate) fn data_mut(&mut self, address: &Address) -> Option<&mut Vec<u8>> {
        self.accounts
            .get_mut(address)
            .map(|account| &mut account.data)
    }

    pub(crate) fn invoke(&mut self, instruction: &Instruction) -> Result<(), InstructionError> {
        let mut seen = BTreeSet::new();
        for meta in &instruction.accounts {
            if !seen.insert(meta.address) {
                return Err(InstructionError::DuplicateAccount(meta.address));
            }
            if meta.is_signer && !self.signers.contains(&meta.address) {
                return Err(InstructionError::MissingSignature(meta.address));
            }
        }

        if instruction.program_id == whitelist_transfer_hook::ID {
            self.run_hook(instruction)
        } else if instruction.program_id == token_2022::ID {
            token_program::process(self, instruction)
        } else {
            Err(InstructionError::UnknownProgram(instruction.program_id))
        }
    }

    /// Runs the hook program over copies of its accounts, then writes back
    /// the changes the runtime allows.
    fn run_hook(&mut self, instruction: &Instruction) -> Result<(), InstructionError> {
        let program_id = &instruction.program_id;
        let before: Vec<AccountState> = instruction
            .accounts
            .iter()
            .map(|meta| self.state(&meta.address))
            .collect();

        let accounts: Vec<SimAccount> = instruction
            .accounts
            .iter()
            .zip(&before)
            .map(|(meta, state)| {
                SimAccount::new(meta.address, meta.is_signer, meta.is_writable, state.clone())
            })
            .collect();

        whitelist_transfer_hook::process_instruction(program_id, &accounts, &instruction.data)?;

        let after: Vec<AccountState> = accounts.into_iter().map(SimAccount::into_state).collect();

        if total_lamports(&before) != total_lamports(&after) {
            return Err(InstructionError::UnbalancedLamports);
        }

        for ((meta, before), after) in instruction.accounts.iter().zip(&before).zip(&after) {
            if before == after {
                continue;
            }
            if !meta.is_writable {
                return Err(InstructionError::ReadonlyModified(meta.address));
            }

            // Unallocated system accounts, funded or not, can be handed to
            // the program through the system program.
            let assigned = before.owner == system_program::ID
                && before.data.is_empty()
                && &after.owner == program_id;
            let owned = &before.owner == program_id || assigned;
            if (before.owner != after.owner || before.data != after.data) && !owned {
                return Err(InstructionError::ExternalAccountDataModified(meta.address));
            }
        }

        for (meta, state) in instruction.accounts.iter().zip(after) {
            store(self.accounts, meta.address, state);
        }

        Ok(())
    }
}
