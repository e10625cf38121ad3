use {
    crate::rent::minimum_balance,
    solana_address::Address,
    solana_program_error::{ProgramError, ProgramResult},
    std::cell::{Cell, Ref, RefCell, RefMut},
    whitelist_transfer_hook::{account::ProgramAccount, system_program},
};

/// Committed state of an account.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccountState {
    pub owner: Address,
    pub lamports: u64,
    pub data: Vec<u8>,
}

impl AccountState {
    /// A system account holding only lamports.
    pub fn with_lamports(lamports: u64) -> Self {
        Self {
            owner: system_program::ID,
            lamports,
            data: Vec::new(),
        }
    }

    /// Whether the account does not exist on the ledger.
    pub fn is_empty(&self) -> bool {
        self.lamports == 0 && self.data.is_empty()
    }
}

/// An account as seen by a program during one instruction.
#[derive(Debug)]
pub struct SimAccount {
    address: Address,
    is_signer: bool,
    is_writable: bool,
    owner: Cell<Address>,
    lamports: Cell<u64>,
    data: RefCell<Vec<u8>>,
}

impl SimAccount {
    pub fn new(address: Address, is_signer: bool, is_writable: bool, state: AccountState) -> Self {
        Self {
            address,
            is_signer,
            is_writable,
            owner: Cell::new(state.owner),
            lamports: Cell::new(state.lamports),
            data: RefCell::new(state.data),
        }
    }

    pub fn into_state(self) -> AccountState {
        AccountState {
            owner: self.owner.get(),
            lamports: self.lamports.get(),
            data: self.data.into_inner(),
        }
    }
}

impl ProgramAccount for SimAccount {
    type Data<'a> = Ref<'a, [u8]>;
    type DataMut<'a> = RefMut<'a, [u8]>;

    fn address(&self) -> &Address {
        &self.address
    }

    fn is_signer(&self) -> bool {
        self.is_signer
    }

    fn is_writable(&self) -> bool {
        self.is_writable
    }

    fn owned_by(&self, program_id: &Address) -> bool {
        &self.owner.get() == program_id
    }

    fn data_len(&self) -> usize {
        self.data.borrow().len()
    }

    fn lamports(&self) -> u64 {
        self.lamports.get()
    }

    fn try_borrow(&self) -> Result<Ref<'_, [u8]>, ProgramError> {
        self.data
            .try_borrow()
            .map(|data| Ref::map(data, Vec::as_slice))
            .map_err(|_| ProgramError::AccountBorrowFailed)
    }

    fn try_borrow_mut(&self) -> Result<RefMut<'_, [u8]>, ProgramError> {
        if !self.is_writable {
            return Err(ProgramError::InvalidArgument);
        }
        self.data
            .try_borrow_mut()
            .map(|data| RefMut::map(data, Vec::as_mut_slice))
            .map_err(|_| ProgramError::AccountBorrowFailed)
    }

    /// Stands in for a system program `CreateAccount` signed by `owner`, or
    /// for `Transfer`, `Allocate` and `Assign` when the address already
    /// holds lamports.
    fn create_pda<const SEEDS: usize>(
        &self,
        payer: &Self,
        space: usize,
        owner: &Address,
        signer_seeds: &[&[u8]; SEEDS],
    ) -> ProgramResult {
        if !payer.is_signer {
            return Err(ProgramError::MissingRequiredSignature);
        }
        if !(payer.is_writable && self.is_writable) {
            return Err(ProgramError::InvalidArgument);
        }

        let signer = Address::create_program_address(signer_seeds, owner)
            .map_err(|_| ProgramError::InvalidSeeds)?;
        if signer != self.address {
            return Err(ProgramError::MissingRequiredSignature);
        }

        // `SystemError::AccountAlreadyInUse`
        if self.owner.get() != system_program::ID || !self.data.borrow().is_empty() {
            return Err(ProgramError::Custom(0));
        }

        let shortfall = minimum_balance(space).saturating_sub(self.lamports.get());
        let remaining = payer
            .lamports
            .get()
            .checked_sub(shortfall)
            .ok_or(ProgramError::InsufficientFunds)?;

        payer.lamports.set(remaining);
        self.lamports.set(self.lamports.get() + shortfall);
        self.owner.set(*owner);
        *self
            .data
            .try_borrow_mut()
            .map_err(|_| ProgramError::AccountBorrowFailed)? = vec![0; space];

        Ok(())
    }

    fn close_to(&self, destination: &Self) -> ProgramResult {
        let lamports = destination
            .lamports
            .get()
            .checked_add(self.lamports.get())
            .ok_or(ProgramError::ArithmeticOverflow)?;

        destination.lamports.set(lamports);
        self.lamports.set(0);
        self.owner.set(system_program::ID);
        self.data
            .try_borrow_mut()
            .map_err(|_| ProgramError::AccountBorrowFailed)?
            .clear();

        Ok(())
    }
}
