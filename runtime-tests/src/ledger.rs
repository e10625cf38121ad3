//! Token-2022 bookkeeping: account layouts and the instructions the tests
//! need.
//!
//! Layouts match Token-2022: a 165-byte base (mints are zero padded), an
//! account type byte, then TLV extensions.

use {
    solana_address::Address,
    solana_program_error::ProgramError,
    whitelist_transfer_hook::token::{
        AccountType, ExtensionType, BASE_ACCOUNT_LEN, MINT_BASE_LEN, TLV_HEADER_LEN,
        TLV_START_INDEX,
    },
};

/// `TokenInstruction::MintTo`
pub const MINT_TO: u8 = 7;

/// `TokenInstruction::TransferChecked`
pub const TRANSFER_CHECKED: u8 = 12;

/// Token-2022 errors raised by the ledger.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenError {
    InsufficientFunds = 1,
    MintMismatch = 3,
    OwnerMismatch = 4,
    Overflow = 14,
    MintDecimalsMismatch = 18,
}

impl From<TokenError> for ProgramError {
    fn from(error: TokenError) -> Self {
        ProgramError::Custom(error as u32)
    }
}

/// Transfer hook configuration of a mint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TransferHookConfig {
    pub authority: Option<Address>,
    pub program_id: Address,
}

fn push_extension(data: &mut Vec<u8>, extension_type: ExtensionType, value: &[u8]) {
    data.extend_from_slice(&(extension_type as u16).to_le_bytes());
    data.extend_from_slice(&(value.len() as u16).to_le_bytes());
    data.extend_from_slice(value);
}

/// Data of an initialized mint.
pub fn mint_data(
    mint_authority: Option<&Address>,
    decimals: u8,
    transfer_hook: Option<&TransferHookConfig>,
) -> Vec<u8> {
    let mut data = vec![0u8; MINT_BASE_LEN];
    if let Some(mint_authority) = mint_authority {
        data[0..4].copy_from_slice(&1u32.to_le_bytes());
        data[4..36].copy_from_slice(mint_authority.as_ref());
    }
    data[44] = decimals;
    data[45] = 1;

    if let Some(hook) = transfer_hook {
        data.resize(BASE_ACCOUNT_LEN, 0);
        data.push(AccountType::Mint as u8);

        let mut value = [0u8; 64];
        if let Some(authority) = &hook.authority {
            value[..32].copy_from_slice(authority.as_ref());
        }
        value[32..].copy_from_slice(hook.program_id.as_ref());
        push_extension(&mut data, ExtensionType::TransferHook, &value);
    }

    data
}

/// Data of an initialized token account with a zero balance.
///
/// Accounts of a mint with a transfer hook carry the transfer hook account
/// extension.
pub fn token_account_data(mint: &Address, owner: &Address, transfer_hook: bool) -> Vec<u8> {
    let mut data = vec![0u8; BASE_ACCOUNT_LEN];
    data[0..32].copy_from_slice(mint.as_ref());
    data[32..64].copy_from_slice(owner.as_ref());
    // `AccountState::Initialized`
    data[108] = 1;

    if transfer_hook {
        data.push(AccountType::Account as u8);
        push_extension(&mut data, ExtensionType::TransferHookAccount, &[0]);
    }

    data
}

/// Value of the `extension` entry of an account carrying extensions.
fn extension_mut(data: &mut [u8], extension: ExtensionType) -> Option<&mut [u8]> {
    let mut remaining = data.get_mut(TLV_START_INDEX..)?;

    loop {
        let (header, rest) =
            std::mem::take(&mut remaining).split_first_chunk_mut::<TLV_HEADER_LEN>()?;
        let [type_lo, type_hi, len_lo, len_hi] = *header;

        let extension_type = u16::from_le_bytes([type_lo, type_hi]);
        if extension_type == 0 {
            return None;
        }

        let len = usize::from(u16::from_le_bytes([len_lo, len_hi]));
        let (value, rest) = rest.split_at_mut_checked(len)?;
        if extension_type == extension as u16 {
            return Some(value);
        }
        remaining = rest;
    }
}

/// Sets the `transferring` flag of a token account.
///
/// Returns `false` if the account has no transfer hook account extension.
pub fn set_transferring(data: &mut [u8], transferring: bool) -> bool {
    match extension_mut(data, ExtensionType::TransferHookAccount) {
        Some([flag]) => {
            *flag = transferring as u8;
            true
        }
        _ => false,
    }
}

pub fn amount(data: &[u8]) -> u64 {
    let mut amount = [0u8; 8];
    amount.copy_from_slice(&data[64..72]);
    u64::from_le_bytes(amount)
}

pub fn set_amount(data: &mut [u8], amount: u64) {
    data[64..72].copy_from_slice(&amount.to_le_bytes());
}

pub fn supply(data: &[u8]) -> u64 {
    let mut supply = [0u8; 8];
    supply.copy_from_slice(&data[36..44]);
    u64::from_le_bytes(supply)
}

pub fn set_supply(data: &mut [u8], supply: u64) {
    data[36..44].copy_from_slice(&supply.to_le_bytes());
}

/// `[MintTo, amount]`
pub fn mint_to_data(amount: u64) -> Vec<u8> {
    let mut data = vec![MINT_TO];
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

/// `[TransferChecked, amount, decimals]`
pub fn transfer_checked_data(amount: u64, decimals: u8) -> Vec<u8> {
    let mut data = vec![TRANSFER_CHECKED];
    data.extend_from_slice(&amount.to_le_bytes());
    data.push(decimals);
    data
}

/// Instructions understood by the ledger.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenInstruction {
    MintTo { amount: u64 },
    TransferChecked { amount: u64, decimals: u8 },
}

impl TokenInstruction {
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let (tag, rest) = data
            .split_first()
            .ok_or(ProgramError::InvalidInstructionData)?;
        let amount = rest
            .get(..8)
            .and_then(|bytes| bytes.try_into().ok())
            .map(u64::from_le_bytes)
            .ok_or(ProgramError::InvalidInstructionData)?;

        match (*tag, &rest[8..]) {
            (MINT_TO, []) => Ok(Self::MintTo { amount }),
            (TRANSFER_CHECKED, [decimals]) => Ok(Self::TransferChecked {
                amount,
                decimals: *decimals,
            }),
            _ => Err(ProgramError::InvalidInstructionData),
        }
    }
}
