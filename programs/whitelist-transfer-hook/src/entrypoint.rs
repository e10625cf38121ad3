use {
    crate::{account::ProgramAccount, system_program},
    pinocchio::{
        account::{Ref, RefMut},
        cpi::{invoke, invoke_signed, Seed, Signer},
        error::ProgramError,
        instruction::{InstructionAccount, InstructionView},
        no_allocator, nostd_panic_handler, program_entrypoint,
        sysvars::{rent::Rent, Sysvar},
        AccountView, Address, ProgramResult,
    },
};

program_entrypoint!(process_instruction);
no_allocator!();
nostd_panic_handler!();

fn process_instruction(
    program_id: &Address,
    accounts: &[AccountView],
    instruction_data: &[u8],
) -> ProgramResult {
    crate::processor::process_instruction(program_id, accounts, instruction_data)
}

impl ProgramAccount for AccountView {
    type Data<'a> = Ref<'a, [u8]>;
    type DataMut<'a> = RefMut<'a, [u8]>;

    #[inline(always)]
    fn address(&self) -> &Address {
        AccountView::address(self)
    }

    #[inline(always)]
    fn is_signer(&self) -> bool {
        AccountView::is_signer(self)
    }

    #[inline(always)]
    fn is_writable(&self) -> bool {
        AccountView::is_writable(self)
    }

    #[inline(always)]
    fn owned_by(&self, program_id: &Address) -> bool {
        AccountView::owned_by(self, program_id)
    }

    #[inline(always)]
    fn data_len(&self) -> usize {
        AccountView::data_len(self)
    }

    #[inline(always)]
    fn lamports(&self) -> u64 {
        AccountView::lamports(self)
    }

    #[inline(always)]
    fn try_borrow(&self) -> Result<Ref<'_, [u8]>, ProgramError> {
        AccountView::try_borrow(self)
    }

    #[inline(always)]
    fn try_borrow_mut(&self) -> Result<RefMut<'_, [u8]>, ProgramError> {
        AccountView::try_borrow_mut(self)
    }

    fn create_pda<const SEEDS: usize>(
        &self,
        payer: &Self,
        space: usize,
        owner: &Address,
        signer_seeds: &[&[u8]; SEEDS],
    ) -> ProgramResult {
        let rent_exempt = Rent::get()?.minimum_balance(space);
        let seeds: [Seed; SEEDS] = core::array::from_fn(|i| Seed::from(signer_seeds[i]));
        let signers = [Signer::from(&seeds)];

        let lamports = self.lamports();
        if lamports == 0 {
            return create_account(payer, self, rent_exempt, space, owner, &signers);
        }

        // `CreateAccount` rejects an address that already holds lamports.
        let shortfall = rent_exempt.saturating_sub(lamports);
        if shortfall > 0 {
            transfer(payer, self, shortfall)?;
        }
        allocate(self, space, &signers)?;
        assign(self, owner, &signers)
    }

    fn close_to(&self, destination: &Self) -> ProgramResult {
        let lamports = destination
            .lamports()
            .checked_add(self.lamports())
            .ok_or(ProgramError::ArithmeticOverflow)?;

        destination.set_lamports(lamports);
        self.set_lamports(0);

        self.close()
    }
}

fn create_account(
    from: &AccountView,
    to: &AccountView,
    lamports: u64,
    space: usize,
    owner: &Address,
    signers: &[Signer],
) -> ProgramResult {
    let account_metas = [
        InstructionAccount::writable_signer(from.address()),
        InstructionAccount::writable_signer(to.address()),
    ];

    // instruction data
    // - [0..4  ]: instruction discriminator
    // - [4..12 ]: lamports
    // - [12..20]: account space
    // - [20..52]: owner address
    let mut instruction_data = [0; 52];
    instruction_data[4..12].copy_from_slice(&lamports.to_le_bytes());
    instruction_data[12..20].copy_from_slice(&(space as u64).to_le_bytes());
    instruction_data[20..52].copy_from_slice(owner.as_ref());

    let instruction = InstructionView {
        program_id: &system_program::ID,
        accounts: &account_metas,
        data: &instruction_data,
    };

    invoke_signed(&instruction, &[from, to], signers)
}

fn transfer(from: &AccountView, to: &AccountView, lamports: u64) -> ProgramResult {
    let account_metas = [
        InstructionAccount::writable_signer(from.address()),
        InstructionAccount::writable(to.address()),
    ];

    // instruction data
    // - [0..4 ]: instruction discriminator
    // - [4..12]: lamports
    let mut instruction_data = [0; 12];
    instruction_data[0] = 2;
    instruction_data[4..12].copy_from_slice(&lamports.to_le_bytes());

    let instruction = InstructionView {
        program_id: &system_program::ID,
        accounts: &account_metas,
        data: &instruction_data,
    };

    invoke(&instruction, &[from, to])
}

fn allocate(account: &AccountView, space: usize, signers: &[Signer]) -> ProgramResult {
    let account_metas = [InstructionAccount::writable_signer(account.address())];

    // instruction data
    // - [0..4 ]: instruction discriminator
    // - [4..12]: space
    let mut instruction_data = [0; 12];
    instruction_data[0] = 8;
    instruction_data[4..12].copy_from_slice(&(space as u64).to_le_bytes());

    let instruction = InstructionView {
        program_id: &system_program::ID,
        accounts: &account_metas,
        data: &instruction_data,
    };

    invoke_signed(&instruction, &[account], signers)
}

fn assign(account: &AccountView, owner: &Address, signers: &[Signer]) -> ProgramResult {
    let account_metas = [InstructionAccount::writable_signer(account.address())];

    // instruction data
    // - [0..4 ]: instruction discriminator
    // - [4..36]: owner address
    let mut instruction_data = [0; 36];
    instruction_data[0] = 1;
    instruction_data[4..36].copy_from_slice(owner.as_ref());

    let instruction = InstructionView {
        program_id: &system_program::ID,
        accounts: &account_metas,
        data: &instruction_data,
    };

    invoke_signed(&instruction, &[account], signers)
}
