use {
    crate::{
        error::AccountResolutionError,
        seeds::{pack_seeds, Seed, SeedIter, ADDRESS_CONFIG_LEN},
    },
    bytemuck::{Pod, Zeroable},
    solana_address::Address,
    solana_program_error::ProgramError,
};

/// Discriminator of a meta holding a fixed address.
const FIXED_ADDRESS: u8 = 0;

/// Discriminator of a meta derived from the hook program.
const HOOK_PDA: u8 = 1;

/// First discriminator of a meta derived from another program, whose
/// account index is `discriminator - EXTERNAL_PDA`.
const EXTERNAL_PDA: u8 = 1 << 7;

/// How the address of an extra account is obtained.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetaKind {
    /// The address config is the address.
    Fixed,
    /// Program address of the hook program derived from the packed seeds.
    HookPda,
    /// Program address of the program at `program_index` derived from the
    /// packed seeds.
    ExternalPda { program_index: u8 },
}

/// Description of one extra account required by a transfer hook (35 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Pod, Zeroable)]
pub struct ExtraAccountMeta {
    /// Discriminator of the address config.
    discriminator: u8,
    /// Fixed address or packed seeds.
    address_config: [u8; ADDRESS_CONFIG_LEN],
    /// Whether the account signs.
    is_signer: u8,
    /// Whether the account is writable.
    is_writable: u8,
}

impl ExtraAccountMeta {
    pub const LEN: usize = core::mem::size_of::<ExtraAccountMeta>();

    /// Meta for an account with a fixed address.
    pub fn new_with_address(address: &Address, is_signer: bool, is_writable: bool) -> Self {
        Self {
            discriminator: FIXED_ADDRESS,
            address_config: address.to_bytes(),
            is_signer: is_signer as u8,
            is_writable: is_writable as u8,
        }
    }

    /// Meta for a program address of the hook program.
    pub fn new_with_seeds(
        seeds: &[Seed],
        is_signer: bool,
        is_writable: bool,
    ) -> Result<Self, ProgramError> {
        Ok(Self {
            discriminator: HOOK_PDA,
            address_config: pack_seeds(seeds)?,
            is_signer: is_signer as u8,
            is_writable: is_writable as u8,
        })
    }

    /// Meta for a program address of the program found at `program_index`
    /// in the instruction accounts.
    pub fn new_external_pda_with_seeds(
        program_index: u8,
        seeds: &[Seed],
        is_signer: bool,
        is_writable: bool,
    ) -> Result<Self, ProgramError> {
        if program_index >= EXTERNAL_PDA {
            return Err(AccountResolutionError::InvalidExtraAccountMeta.into());
        }

        Ok(Self {
            discriminator: EXTERNAL_PDA + program_index,
            address_config: pack_seeds(seeds)?,
            is_signer: is_signer as u8,
            is_writable: is_writable as u8,
        })
    }

    #[inline(always)]
    pub fn discriminator(&self) -> u8 {
        self.discriminator
    }

    #[inline(always)]
    pub fn address_config(&self) -> &[u8; ADDRESS_CONFIG_LEN] {
        &self.address_config
    }

    #[inline(always)]
    pub fn is_signer(&self) -> bool {
        self.is_signer != 0
    }

    #[inline(always)]
    pub fn is_writable(&self) -> bool {
        self.is_writable != 0
    }

    /// Decodes the discriminator.
    pub fn kind(&self) -> Result<MetaKind, ProgramError> {
        match self.discriminator {
            FIXED_ADDRESS => Ok(MetaKind::Fixed),
            HOOK_PDA => Ok(MetaKind::HookPda),
            d if d >= EXTERNAL_PDA => Ok(MetaKind::ExternalPda {
                program_index: d - EXTERNAL_PDA,
            }),
            _ => Err(AccountResolutionError::InvalidExtraAccountMeta.into()),
        }
    }

    /// Seeds of a program derived meta.
    ///
    /// Fixed-address metas have no seeds.
    pub fn seeds(&self) -> Result<SeedIter<'_>, ProgramError> {
        match self.kind()? {
            MetaKind::Fixed => Err(AccountResolutionError::InvalidSeedConfig.into()),
            _ => Ok(SeedIter::new(&self.address_config)),
        }
    }
}
