//! Read-only views of Token-2022 mints and token accounts.
//!
//! Only the fields and extensions the hook inspects are exposed. Callers
//! are expected to check that the account is owned by Token-2022 before
//! trusting what these views return.

use {solana_address::Address, solana_program_error::ProgramError};

/// Length of a base token account, which is also the padded length of a
/// mint carrying extensions.
pub const BASE_ACCOUNT_LEN: usize = 165;

/// Length of a base mint.
pub const MINT_BASE_LEN: usize = 82;

/// Offset of the account type byte of accounts carrying extensions.
pub const ACCOUNT_TYPE_INDEX: usize = BASE_ACCOUNT_LEN;

/// Offset of the first TLV entry.
pub const TLV_START_INDEX: usize = ACCOUNT_TYPE_INDEX + 1;

/// Length of a TLV entry header: `u16` type followed by `u16` length.
pub const TLV_HEADER_LEN: usize = 4;

const MINT_DECIMALS_OFFSET: usize = 44;
const MINT_IS_INITIALIZED_OFFSET: usize = 45;
const ACCOUNT_STATE_OFFSET: usize = 108;

#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccountType {
    Uninitialized,
    Mint,
    Account,
}

/// Extension types read by the hook.
#[repr(u16)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExtensionType {
    TransferHook = 14,
    TransferHookAccount = 15,
}

/// Entries of the extension area, as `(extension type, value)`.
///
/// Stops at the first uninitialized entry, which marks the end of the
/// written extensions, and yields an error for an entry running past the
/// end of the data.
struct Extensions<'a> {
    remaining: &'a [u8],
}

impl<'a> Iterator for Extensions<'a> {
    type Item = Result<(u16, &'a [u8]), ProgramError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (header, rest) = self.remaining.split_first_chunk::<TLV_HEADER_LEN>()?;
        let [type_lo, type_hi, len_lo, len_hi] = *header;

        let extension_type = u16::from_le_bytes([type_lo, type_hi]);
        if extension_type == 0 {
            return None;
        }

        let len = usize::from(u16::from_le_bytes([len_lo, len_hi]));
        match rest.split_at_checked(len) {
            Some((value, rest)) => {
                self.remaining = rest;
                Some(Ok((extension_type, value)))
            }
            None => {
                self.remaining = &[];
                Some(Err(ProgramError::InvalidAccountData))
            }
        }
    }
}

/// Value of the `extension` entry, if the account carries one.
fn find_extension(
    tlv_data: &[u8],
    extension: ExtensionType,
) -> Result<Option<&[u8]>, ProgramError> {
    for entry in (Extensions { remaining: tlv_data }) {
        let (extension_type, value) = entry?;
        if extension_type == extension as u16 {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

#[inline(always)]
fn address_at(data: &[u8], offset: usize) -> &Address {
    bytemuck::from_bytes(&data[offset..offset + 32])
}

/// Reads an `OptionalNonZeroPubkey`, where all zeroes means `None`.
#[inline(always)]
fn optional_address_at(data: &[u8], offset: usize) -> Option<&Address> {
    let address = address_at(data, offset);
    (address != &Address::default()).then_some(address)
}

/// Transfer hook extension of a mint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TransferHook<'a> {
    /// Authority allowed to change the hook program.
    pub authority: Option<&'a Address>,
    /// Hook program invoked on every transfer.
    pub program_id: Option<&'a Address>,
}

/// A Token-2022 mint.
pub struct Mint<'a> {
    data: &'a [u8],
}

impl<'a> Mint<'a> {
    pub fn unpack(data: &'a [u8]) -> Result<Self, ProgramError> {
        if data.len() < MINT_BASE_LEN || data[MINT_IS_INITIALIZED_OFFSET] == 0 {
            return Err(ProgramError::InvalidAccountData);
        }

        if data.len() > MINT_BASE_LEN {
            if data.len() <= ACCOUNT_TYPE_INDEX
                || data[MINT_BASE_LEN..BASE_ACCOUNT_LEN].iter().any(|b| *b != 0)
                || data[ACCOUNT_TYPE_INDEX] != AccountType::Mint as u8
            {
                return Err(ProgramError::InvalidAccountData);
            }
        }

        Ok(Self { data })
    }

    /// `COption<Pubkey>`: a `u32` tag followed by the address.
    pub fn mint_authority(&self) -> Option<&'a Address> {
        (self.data[0..4] == [1, 0, 0, 0]).then(|| address_at(self.data, 4))
    }

    pub fn decimals(&self) -> u8 {
        self.data[MINT_DECIMALS_OFFSET]
    }

    pub fn transfer_hook(&self) -> Result<Option<TransferHook<'a>>, ProgramError> {
        let Some(tlv_data) = self.data.get(TLV_START_INDEX..) else {
            return Ok(None);
        };

        match find_extension(tlv_data, ExtensionType::TransferHook)? {
            Some(value) if value.len() == 64 => Ok(Some(TransferHook {
                authority: optional_address_at(value, 0),
                program_id: optional_address_at(value, 32),
            })),
            Some(_) => Err(ProgramError::InvalidAccountData),
            None => Ok(None),
        }
    }
}

/// A Token-2022 token account.
pub struct TokenAccount<'a> {
    data: &'a [u8],
}

impl<'a> TokenAccount<'a> {
    pub fn unpack(data: &'a [u8]) -> Result<Self, ProgramError> {
        if data.len() < BASE_ACCOUNT_LEN || data[ACCOUNT_STATE_OFFSET] == 0 {
            return Err(ProgramError::InvalidAccountData);
        }

        if data.len() > BASE_ACCOUNT_LEN && data[ACCOUNT_TYPE_INDEX] != AccountType::Account as u8
        {
            return Err(ProgramError::InvalidAccountData);
        }

        Ok(Self { data })
    }

    pub fn mint(&self) -> &'a Address {
        address_at(self.data, 0)
    }

    pub fn owner(&self) -> &'a Address {
        address_at(self.data, 32)
    }

    pub fn amount(&self) -> u64 {
        let mut amount = [0u8; 8];
        amount.copy_from_slice(&self.data[64..72]);
        u64::from_le_bytes(amount)
    }

    /// The `transferring` flag of the transfer hook account extension,
    /// or `None` if the account does not carry the extension.
    pub fn transferring(&self) -> Result<Option<bool>, ProgramError> {
        let Some(tlv_data) = self.data.get(TLV_START_INDEX..) else {
            return Ok(None);
        };

        match find_extension(tlv_data, ExtensionType::TransferHookAccount)? {
            Some([transferring]) => Ok(Some(*transferring != 0)),
            Some(_) => Err(ProgramError::InvalidAccountData),
            None => Ok(None),
        }
    }
}
