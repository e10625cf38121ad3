//! Whitelist transfer hook.
//!
//! A Token-2022 transfer hook that approves a transfer only when the
//! destination token account has been explicitly added to the whitelist of
//! the mint by the mint's authority.

#![cfg_attr(target_os = "solana", no_std)]

pub mod account;
#[cfg(feature = "bpf-entrypoint")]
mod entrypoint;
pub mod error;
pub mod hook;
pub mod instruction;
pub mod processor;
pub mod registry;
pub mod state;
pub mod token;

pub use {error::WhitelistError, processor::process_instruction};

/// Token-2022 program.
pub mod token_2022 {
    solana_address::declare_id!("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");
}

/// System program.
pub mod system_program {
    solana_address::declare_id!("11111111111111111111111111111111");
}

solana_address::declare_id!("F24uFiAveNWHsrXd7iP9SdvEtYaivyCAbWrDvauq4TK9");

/// Seed prefix of the whitelist configuration of a mint.
pub const CONFIG_SEED: &[u8] = b"whitelist-config";

/// Seed prefix of a whitelist entry.
pub const ENTRY_SEED: &[u8] = b"whitelist";
