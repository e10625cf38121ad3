use {
    bytemuck::{Pod, Zeroable},
    solana_address::Address,
    solana_program_error::ProgramError,
};

/// Discriminates the accounts owned by the program.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccountType {
    Uninitialized,
    Config,
    Entry,
}

/// Accounts stored as a fixed-size, alignment-1 record whose first byte is
/// the [`AccountType`].
pub trait AccountState: Pod {
    const ACCOUNT_TYPE: AccountType;

    const LEN: usize = core::mem::size_of::<Self>();

    /// Interprets initialized account data.
    fn from_bytes(data: &[u8]) -> Result<&Self, ProgramError> {
        match data.first() {
            Some(account_type) if *account_type == Self::ACCOUNT_TYPE as u8 => {
                bytemuck::try_from_bytes(data).map_err(|_| ProgramError::InvalidAccountData)
            }
            Some(0) => Err(ProgramError::UninitializedAccount),
            _ => Err(ProgramError::InvalidAccountData),
        }
    }

    /// Writes `self` into freshly allocated account data.
    fn write_to(&self, data: &mut [u8]) -> Result<(), ProgramError> {
        if data.len() != Self::LEN {
            return Err(ProgramError::InvalidAccountData);
        }
        if data[0] != AccountType::Uninitialized as u8 {
            return Err(ProgramError::AccountAlreadyInitialized);
        }

        data.copy_from_slice(bytemuck::bytes_of(self));
        Ok(())
    }
}

/// Whitelist configuration of a mint, at `["whitelist-config", mint]`.
///
/// Records the authority allowed to change the whitelist, captured from the
/// mint when the whitelist is set up.
#[repr(C)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Pod, Zeroable)]
pub struct WhitelistConfig {
    account_type: u8,
    bump: u8,
    extra_account_metas_bump: u8,
    mint: Address,
    authority: Address,
}

impl WhitelistConfig {
    pub fn new(bump: u8, extra_account_metas_bump: u8, mint: &Address, authority: &Address) -> Self {
        Self {
            account_type: AccountType::Config as u8,
            bump,
            extra_account_metas_bump,
            mint: *mint,
            authority: *authority,
        }
    }

    #[inline(always)]
    pub fn bump(&self) -> u8 {
        self.bump
    }

    #[inline(always)]
    pub fn extra_account_metas_bump(&self) -> u8 {
        self.extra_account_metas_bump
    }

    #[inline(always)]
    pub fn mint(&self) -> &Address {
        &self.mint
    }

    #[inline(always)]
    pub fn authority(&self) -> &Address {
        &self.authority
    }
}

impl AccountState for WhitelistConfig {
    const ACCOUNT_TYPE: AccountType = AccountType::Config;
}

/// Whitelist entry, at `["whitelist", mint, account]`.
///
/// The existence of the entry is the approval.
#[repr(C)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Pod, Zeroable)]
pub struct WhitelistEntry {
    account_type: u8,
    bump: u8,
    mint: Address,
    account: Address,
}

impl WhitelistEntry {
    pub fn new(bump: u8, mint: &Address, account: &Address) -> Self {
        Self {
            account_type: AccountType::Entry as u8,
            bump,
            mint: *mint,
            account: *account,
        }
    }

    #[inline(always)]
    pub fn bump(&self) -> u8 {
        self.bump
    }

    #[inline(always)]
    pub fn mint(&self) -> &Address {
        &self.mint
    }

    #[inline(always)]
    pub fn account(&self) -> &Address {
        &self.account
    }
}

impl AccountState for WhitelistEntry {
    const ACCOUNT_TYPE: AccountType = AccountType::Entry;
}

#[cfg(test)]
mod tests {
    use {super::*, pretty_assertions::assert_eq};

    #[test]
    fn layouts() {
        assert_eq!(WhitelistConfig::LEN, 67);
        assert_eq!(WhitelistEntry::LEN, 66);
    }

    #[test]
    fn write_and_read() {
        let mint = Address::new_from_array([1; 32]);
        let account = Address::new_from_array([2; 32]);
        let entry = WhitelistEntry::new(250, &mint, &account);

        let mut data = [0u8; WhitelistEntry::LEN];
        entry.write_to(&mut data).unwrap();

        assert_eq!(data[0], AccountType::Entry as u8);
        assert_eq!(data[1], 250);
        assert_eq!(WhitelistEntry::from_bytes(&data), Ok(&entry));

        assert_eq!(
            entry.write_to(&mut data),
            Err(ProgramError::AccountAlreadyInitialized)
        );
    }

    #[test]
    fn type_confusion() {
        let mint = Address::new_from_array([1; 32]);
        let config = WhitelistConfig::new(255, 254, &mint, &mint);

        let mut data = [0u8; WhitelistConfig::LEN];
        config.write_to(&mut data).unwrap();

        assert_eq!(
            WhitelistEntry::from_bytes(&data),
            Err(ProgramError::InvalidAccountData)
        );
        assert_eq!(
            WhitelistConfig::from_bytes(&[0; WhitelistConfig::LEN]),
            Err(ProgramError::UninitializedAccount)
        );
        assert_eq!(
            WhitelistConfig::from_bytes(&data[..10]),
            Err(ProgramError::InvalidAccountData)
        );
    }
}
