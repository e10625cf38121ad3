//! Host-side runtime for exercising the whitelist transfer hook end to end.
//!
//! [`Runtime`] keeps accounts in memory, runs the hook program through its
//! generic account interface and implements the part of Token-2022 needed
//! to mint and transfer tokens of a mint with a transfer hook.

pub mod account;
pub mod extra_accounts;
pub mod instructions;
pub mod ledger;
pub mod rent;
pub mod runtime;
mod token_program;

pub use {
    account::AccountState,
    extra_accounts::TransferAccounts,
    ledger::{TokenError, TransferHookConfig},
    runtime::{AccountMeta, Instruction, InstructionError, Runtime, TransactionError},
};
