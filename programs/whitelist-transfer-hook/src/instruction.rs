use {
    core::ops::Deref,
    solana_program_error::ProgramError,
    transfer_hook_interface::instruction::{
        execute_data, TransferHookInstruction, DISCRIMINATOR_LEN, EXECUTE_DATA_LEN,
    },
};

/// `sha256("whitelist-transfer-hook:initialize")[..8]`
pub const INITIALIZE_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] =
    [226, 195, 250, 45, 143, 152, 11, 214];

/// `sha256("whitelist-transfer-hook:add-to-whitelist")[..8]`
pub const ADD_TO_WHITELIST_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] =
    [160, 233, 133, 63, 160, 23, 138, 48];

/// `sha256("whitelist-transfer-hook:remove-from-whitelist")[..8]`
pub const REMOVE_FROM_WHITELIST_DISCRIMINATOR: [u8; DISCRIMINATOR_LEN] =
    [38, 11, 26, 185, 181, 165, 176, 167];

/// Instructions of the whitelist transfer hook.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WhitelistInstruction {
    /// Creates the extra account metas account and the whitelist
    /// configuration of a mint.
    ///
    /// ### Accounts:
    ///   0. `[WRITE, SIGNER]` Mint authority, pays for both accounts
    ///   1. `[WRITE]` Extra account metas account, `["extra-account-metas", mint]`
    ///   2. `[]` Mint
    ///   3. `[WRITE]` Whitelist configuration, `["whitelist-config", mint]`
    ///   4. `[]` System program
    Initialize {
        extra_account_metas_bump: u8,
        config_bump: u8,
    },

    /// Adds a token account to the whitelist of a mint.
    ///
    /// ### Accounts:
    ///   0. `[WRITE, SIGNER]` Mint authority, pays for the entry
    ///   1. `[]` Whitelist configuration
    ///   2. `[]` Account to whitelist
    ///   3. `[WRITE]` Whitelist entry, `["whitelist", mint, account]`
    ///   4. `[]` System program
    AddToWhitelist { entry_bump: u8 },

    /// Removes a token account from the whitelist of a mint.
    ///
    /// ### Accounts:
    ///   0. `[WRITE, SIGNER]` Mint authority, receives the entry rent
    ///   1. `[]` Whitelist configuration
    ///   2. `[]` Account to remove
    ///   3. `[WRITE]` Whitelist entry
    RemoveFromWhitelist,

    /// Transfer hook `Execute`.
    ///
    /// ### Accounts:
    ///   0. `[]` Source token account
    ///   1. `[]` Mint
    ///   2. `[]` Destination token account
    ///   3. `[]` Source owner
    ///   4. `[]` Extra account metas account
    ///   5. `[]` Whitelist configuration
    ///   6. `[]` Whitelist entry of the destination
    Execute { amount: u64 },
}

impl WhitelistInstruction {
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        // The interface's own setup instruction is not supported, setup goes
        // through `Initialize`, which also creates the whitelist configuration.
        if let Some(TransferHookInstruction::Execute { amount }) =
            TransferHookInstruction::unpack(data)?
        {
            return Ok(Self::Execute { amount });
        }

        let (discriminator, rest) = data
            .split_first_chunk::<DISCRIMINATOR_LEN>()
            .ok_or(ProgramError::InvalidInstructionData)?;

        match (*discriminator, rest) {
            (INITIALIZE_DISCRIMINATOR, [extra_account_metas_bump, config_bump]) => {
                Ok(Self::Initialize {
                    extra_account_metas_bump: *extra_account_metas_bump,
                    config_bump: *config_bump,
                })
            }
            (ADD_TO_WHITELIST_DISCRIMINATOR, [entry_bump]) => Ok(Self::AddToWhitelist {
                entry_bump: *entry_bump,
            }),
            (REMOVE_FROM_WHITELIST_DISCRIMINATOR, []) => Ok(Self::RemoveFromWhitelist),
            _ => Err(ProgramError::InvalidInstructionData),
        }
    }

    pub fn pack(&self) -> InstructionData {
        let mut data = InstructionData {
            bytes: [0; EXECUTE_DATA_LEN],
            len: DISCRIMINATOR_LEN,
        };

        match self {
            Self::Initialize {
                extra_account_metas_bump,
                config_bump,
            } => {
                data.bytes[..DISCRIMINATOR_LEN].copy_from_slice(&INITIALIZE_DISCRIMINATOR);
                data.bytes[DISCRIMINATOR_LEN] = *extra_account_metas_bump;
                data.bytes[DISCRIMINATOR_LEN + 1] = *config_bump;
                data.len += 2;
            }
            Self::AddToWhitelist { entry_bump } => {
                data.bytes[..DISCRIMINATOR_LEN].copy_from_slice(&ADD_TO_WHITELIST_DISCRIMINATOR);
                data.bytes[DISCRIMINATOR_LEN] = *entry_bump;
                data.len += 1;
            }
            Self::RemoveFromWhitelist => {
                data.bytes[..DISCRIMINATOR_LEN]
                    .copy_from_slice(&REMOVE_FROM_WHITELIST_DISCRIMINATOR);
            }
            Self::Execute { amount } => {
                data.bytes = execute_data(*amount);
                data.len = EXECUTE_DATA_LEN;
            }
        }

        data
    }
}

/// Packed instruction data.
#[derive(Clone, Copy, Debug)]
pub struct InstructionData {
    bytes: [u8; EXECUTE_DATA_LEN],
    len: usize,
}

impl Deref for InstructionData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}
