use {
    crate::{
        error::AccountResolutionError,
        instruction::{DISCRIMINATOR_LEN, EXECUTE_DISCRIMINATOR},
        meta::ExtraAccountMeta,
    },
    solana_program_error::ProgramError,
};

/// Offset of the TLV value length.
const LENGTH_OFFSET: usize = DISCRIMINATOR_LEN;

/// Offset of the meta count.
const COUNT_OFFSET: usize = LENGTH_OFFSET + 4;

/// Offset of the first meta.
const METAS_OFFSET: usize = COUNT_OFFSET + 4;

/// The extra account metas of the `Execute` instruction, stored as a
/// single TLV entry:
///
/// ```text
/// [execute discriminator: 8][value length: u32][count: u32][metas: 35 * count]
/// ```
pub struct ExtraAccountMetaList;

impl ExtraAccountMetaList {
    /// Account size needed to hold `count` metas.
    #[inline(always)]
    pub const fn size_of(count: usize) -> usize {
        METAS_OFFSET + count * ExtraAccountMeta::LEN
    }

    /// Writes `metas` into a zeroed account.
    pub fn init(data: &mut [u8], metas: &[ExtraAccountMeta]) -> Result<(), ProgramError> {
        if data.len() < Self::size_of(metas.len()) {
            return Err(AccountResolutionError::BufferTooSmall.into());
        }

        if data[..DISCRIMINATOR_LEN].iter().any(|b| *b != 0) {
            return Err(ProgramError::AccountAlreadyInitialized);
        }

        Self::write(data, metas)
    }

    fn write(data: &mut [u8], metas: &[ExtraAccountMeta]) -> Result<(), ProgramError> {
        let count = u32::try_from(metas.len()).map_err(|_| ProgramError::InvalidArgument)?;
        let length = 4 + count * ExtraAccountMeta::LEN as u32;

        data[..DISCRIMINATOR_LEN].copy_from_slice(&EXECUTE_DISCRIMINATOR);
        data[LENGTH_OFFSET..COUNT_OFFSET].copy_from_slice(&length.to_le_bytes());
        data[COUNT_OFFSET..METAS_OFFSET].copy_from_slice(&count.to_le_bytes());
        data[METAS_OFFSET..Self::size_of(metas.len())]
            .copy_from_slice(bytemuck::cast_slice(metas));

        Ok(())
    }

    /// Reads the metas of an initialized account.
    pub fn unpack(data: &[u8]) -> Result<&[ExtraAccountMeta], ProgramError> {
        let header = data
            .get(..METAS_OFFSET)
            .ok_or(ProgramError::AccountDataTooSmall)?;

        let discriminator = &header[..DISCRIMINATOR_LEN];
        if discriminator != EXECUTE_DISCRIMINATOR {
            return Err(if discriminator.iter().all(|b| *b == 0) {
                ProgramError::UninitializedAccount
            } else {
                AccountResolutionError::TlvDiscriminatorMismatch.into()
            });
        }

        let mut count = [0u8; 4];
        count.copy_from_slice(&header[COUNT_OFFSET..METAS_OFFSET]);
        let count = u32::from_le_bytes(count) as usize;

        let metas = count
            .checked_mul(ExtraAccountMeta::LEN)
            .and_then(|len| data.get(METAS_OFFSET..METAS_OFFSET + len))
            .ok_or(AccountResolutionError::BufferTooSmall)?;

        Ok(bytemuck::cast_slice(metas))
    }
}
