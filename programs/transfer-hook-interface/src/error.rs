use solana_program_error::ProgramError;

/// Errors raised while encoding, reading or resolving extra account metas.
///
/// Codes live in their own range so they can be told apart from the custom
/// errors of the hook program that embeds this crate.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccountResolutionError {
    /// Packed seeds do not fit in the 32-byte address config.
    SeedConfigsTooLarge = 2_724_315_840,
    /// Unknown seed discriminator or truncated seed config.
    InvalidSeedConfig,
    /// Unknown extra account meta discriminator.
    InvalidExtraAccountMeta,
    /// A seed or a program index refers to an account that is not available.
    AccountNotFound,
    /// Instruction data is shorter than a seed requires.
    InstructionDataTooSmall,
    /// Account data is shorter than a seed requires.
    AccountDataTooSmall,
    /// The TLV entry does not hold the extra account metas of `Execute`.
    TlvDiscriminatorMismatch,
    /// The declared number of metas exceeds the account data.
    BufferTooSmall,
    /// More seeds than a program address accepts.
    TooManySeeds,
}

impl From<AccountResolutionError> for ProgramError {
    #[inline(always)]
    fn from(error: AccountResolutionError) -> Self {
        ProgramError::Custom(error as u32)
    }
}
