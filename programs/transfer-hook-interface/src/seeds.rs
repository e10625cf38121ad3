use {crate::error::AccountResolutionError, solana_program_error::ProgramError};

/// Size of the address config of an `ExtraAccountMeta`, which also bounds
/// the packed seeds.
pub const ADDRESS_CONFIG_LEN: usize = 32;

const LITERAL: u8 = 1;
const INSTRUCTION_DATA: u8 = 2;
const ACCOUNT_KEY: u8 = 3;
const ACCOUNT_DATA: u8 = 4;

/// A seed of a program derived extra account.
///
/// Seeds are packed back to back into the 32-byte address config of the
/// meta; a zero byte (or the end of the config) terminates the list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Seed<'a> {
    /// Fixed bytes.
    ///
    /// Packed as `[1, len, bytes...]`.
    Literal { bytes: &'a [u8] },
    /// A slice of the instruction data.
    ///
    /// Packed as `[2, index, length]`.
    InstructionData { index: u8, length: u8 },
    /// The address of the account at `index` in the instruction.
    ///
    /// Packed as `[3, index]`.
    AccountKey { index: u8 },
    /// A slice of the data of the account at `account_index`.
    ///
    /// Packed as `[4, account_index, data_index, length]`.
    AccountData {
        account_index: u8,
        data_index: u8,
        length: u8,
    },
}

impl Seed<'_> {
    /// Number of bytes the seed takes once packed.
    pub fn packed_len(&self) -> usize {
        match self {
            Self::Literal { bytes } => 2 + bytes.len(),
            Self::InstructionData { .. } => 3,
            Self::AccountKey { .. } => 2,
            Self::AccountData { .. } => 4,
        }
    }

    fn pack_into(&self, destination: &mut [u8]) -> Result<usize, ProgramError> {
        let len = self.packed_len();
        if destination.len() < len {
            return Err(AccountResolutionError::SeedConfigsTooLarge.into());
        }

        match self {
            Self::Literal { bytes } => {
                let length = u8::try_from(bytes.len())
                    .map_err(|_| AccountResolutionError::SeedConfigsTooLarge)?;
                destination[0] = LITERAL;
                destination[1] = length;
                destination[2..len].copy_from_slice(bytes);
            }
            Self::InstructionData { index, length } => {
                destination[..len].copy_from_slice(&[INSTRUCTION_DATA, *index, *length]);
            }
            Self::AccountKey { index } => {
                destination[..len].copy_from_slice(&[ACCOUNT_KEY, *index]);
            }
            Self::AccountData {
                account_index,
                data_index,
                length,
            } => {
                destination[..len].copy_from_slice(&[
                    ACCOUNT_DATA,
                    *account_index,
                    *data_index,
                    *length,
                ]);
            }
        }

        Ok(len)
    }
}

/// Packs `seeds` into an address config.
pub fn pack_seeds(seeds: &[Seed]) -> Result<[u8; ADDRESS_CONFIG_LEN], ProgramError> {
    let mut config = [0u8; ADDRESS_CONFIG_LEN];
    let mut offset = 0;

    for seed in seeds {
        offset += seed.pack_into(&mut config[offset..])?;
    }

    Ok(config)
}

/// Iterator over the seeds packed in an address config.
pub struct SeedIter<'a> {
    config: &'a [u8],
    offset: usize,
}

impl<'a> SeedIter<'a> {
    pub fn new(config: &'a [u8; ADDRESS_CONFIG_LEN]) -> Self {
        Self {
            config: config.as_slice(),
            offset: 0,
        }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ProgramError> {
        let end = self.offset + len;
        let bytes = self
            .config
            .get(self.offset..end)
            .ok_or(AccountResolutionError::InvalidSeedConfig)?;
        self.offset = end;
        Ok(bytes)
    }

    fn next_seed(&mut self) -> Result<Seed<'a>, ProgramError> {
        let discriminator = self.take(1)?[0];

        match discriminator {
            LITERAL => {
                let length = self.take(1)?[0] as usize;
                Ok(Seed::Literal {
                    bytes: self.take(length)?,
                })
            }
            INSTRUCTION_DATA => {
                let args = self.take(2)?;
                Ok(Seed::InstructionData {
                    index: args[0],
                    length: args[1],
                })
            }
            ACCOUNT_KEY => Ok(Seed::AccountKey {
                index: self.take(1)?[0],
            }),
            ACCOUNT_DATA => {
                let args = self.take(3)?;
                Ok(Seed::AccountData {
                    account_index: args[0],
                    data_index: args[1],
                    length: args[2],
                })
            }
            _ => Err(AccountResolutionError::InvalidSeedConfig.into()),
        }
    }
}

impl<'a> Iterator for SeedIter<'a> {
    type Item = Result<Seed<'a>, ProgramError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.config.get(self.offset).copied() {
            None | Some(0) => None,
            Some(_) => {
                let seed = self.next_seed();
                if seed.is_err() {
                    // Stop after the first malformed seed.
                    self.offset = self.config.len();
                }
                Some(seed)
            }
        }
    }
}
