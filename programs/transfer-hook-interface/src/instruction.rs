use {core::mem::size_of, solana_program_error::ProgramError};

/// Length of an instruction discriminator.
pub const DISCRIMINATOR_LEN: usize = 8;

/// `sha256("spl-transfer-hook-interface:execute")[..8]`
pub const EXECUTE_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] = [105, 37, 101, 197, 75, 251, 102, 26];

/// `sha256("spl-transfer-hook-interface:initialize-extra-account-metas")[..8]`
pub const INITIALIZE_EXTRA_ACCOUNT_METAS_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] =
    [43, 34, 13, 49, 167, 88, 235, 235];

/// Length of the data of an `Execute` instruction.
pub const EXECUTE_DATA_LEN: usize = DISCRIMINATOR_LEN + size_of::<u64>();

/// Instructions every transfer hook program understands.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransferHookInstruction {
    /// Runs the hook for a transfer of `amount` tokens.
    ///
    /// Accounts expected by this instruction:
    ///
    ///   0. `[]` Source token account.
    ///   1. `[]` Mint.
    ///   2. `[]` Destination token account.
    ///   3. `[]` Source owner or delegate.
    ///   4. `[]` Extra account metas account.
    ///   5. ..`5+N` `[]` Extra accounts, in the order of the metas.
    Execute { amount: u64 },
}

impl TransferHookInstruction {
    /// Unpacks an instruction.
    ///
    /// Returns `Ok(None)` when the discriminator is not `Execute`, so the
    /// caller can try its own instructions.
    pub fn unpack(data: &[u8]) -> Result<Option<Self>, ProgramError> {
        let (discriminator, rest) = match data.split_first_chunk::<DISCRIMINATOR_LEN>() {
            Some(split) => split,
            None => return Ok(None),
        };

        match *discriminator {
            EXECUTE_DISCRIMINATOR => {
                let amount = rest
                    .first_chunk::<8>()
                    .map(|bytes| u64::from_le_bytes(*bytes))
                    .ok_or(ProgramError::InvalidInstructionData)?;
                Ok(Some(Self::Execute { amount }))
            }
            _ => Ok(None),
        }
    }
}

/// Data of an `Execute` instruction for a transfer of `amount` tokens.
pub fn execute_data(amount: u64) -> [u8; EXECUTE_DATA_LEN] {
    let mut data = [0u8; EXECUTE_DATA_LEN];
    data[..DISCRIMINATOR_LEN].copy_from_slice(&EXECUTE_DISCRIMINATOR);
    data[DISCRIMINATOR_LEN..].copy_from_slice(&amount.to_le_bytes());
    data
}
