use solana_program_error::ProgramError;

/// Errors raised by the whitelist transfer hook.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WhitelistError {
    /// The signer is not the authority of the mint.
    UnauthorizedCaller,
    /// The whitelist of the mint is already set up.
    AlreadyInitialized,
    /// The destination account is not whitelisted.
    NotWhitelisted,
    /// The hook was not invoked by Token-2022 as part of a transfer.
    InvalidInvocationContext,
    /// The mint does not name this program as its transfer hook.
    MintNotGoverned,
}

impl WhitelistError {
    /// Text logged when the program fails with this error.
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnauthorizedCaller => "Signer is not the mint authority",
            Self::AlreadyInitialized => "Whitelist already initialized",
            Self::NotWhitelisted => "Destination account is not whitelisted",
            Self::InvalidInvocationContext => "Hook invoked outside of a transfer",
            Self::MintNotGoverned => "Mint transfer hook does not name this program",
        }
    }
}

impl From<WhitelistError> for ProgramError {
    #[inline(always)]
    fn from(error: WhitelistError) -> Self {
        ProgramError::Custom(error as u32)
    }
}
