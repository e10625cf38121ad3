//! Transfer hook interface.
//!
//! A token runtime invoking a transfer hook needs to know which accounts the
//! hook expects besides the transfer's own source, mint, destination and
//! owner. Hook programs publish that list in the
//! `["extra-account-metas", mint]` account as a TLV entry of
//! [`ExtraAccountMeta`] records; this crate defines that encoding and the
//! helpers to write, read and resolve it.

#![cfg_attr(not(test), no_std)]

pub mod error;
pub mod instruction;
pub mod meta;
pub mod pda;
#[cfg(feature = "find-pda")]
pub mod resolve;
pub mod seeds;
pub mod state;

pub use {
    error::AccountResolutionError,
    meta::{ExtraAccountMeta, MetaKind},
    seeds::Seed,
    state::ExtraAccountMetaList,
};

/// Seed prefix of the account holding the extra account metas of a mint.
pub const EXTRA_ACCOUNT_METAS_SEED: &[u8] = b"extra-account-metas";

/// Number of accounts preceding the extra accounts of an `Execute`
/// instruction: source, mint, destination, owner and the extra account
/// metas account.
pub const EXECUTE_BASE_ACCOUNTS: usize = 5;
