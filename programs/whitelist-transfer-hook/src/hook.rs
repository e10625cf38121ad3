//! Transfer hook handler.
//!
//! Every `Execute` call goes through the same transitions and keeps
//! nothing between calls:
//!
//! ```text
//! Idle --begin--> Invoked --resolve--> Approved
//!                                  \--> Rejected(NotWhitelisted)
//! ```
//!
//! [`Invocation::begin`] only succeeds when Token-2022 is in the middle of
//! transferring between the given accounts, which it signals by setting the
//! `transferring` flag of the transfer hook account extension on both token
//! accounts. Only Token-2022 can write its accounts, so a standalone call
//! cannot reach [`Invocation::resolve`].

use {
    crate::{
        account::{check_address, ProgramAccount},
        error::WhitelistError,
        registry::{is_approved, load_config},
        token::{Mint, TokenAccount},
        token_2022,
    },
    pinocchio_log::log,
    solana_address::Address,
    solana_program_error::ProgramError,
    transfer_hook_interface::pda::{derive_address, extra_account_metas_seeds},
};

/// Outcome of a hook invocation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verdict {
    Approved,
    Rejected(WhitelistError),
}

/// The transfer the hook is asked to approve.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TransferIntent<'a> {
    pub source: &'a Address,
    pub mint: &'a Address,
    pub destination: &'a Address,
    pub owner: &'a Address,
    pub amount: u64,
}

/// Accounts of an `Execute` instruction.
pub struct ExecuteAccounts<'a, A: ProgramAccount> {
    pub source: &'a A,
    pub mint: &'a A,
    pub destination: &'a A,
    pub owner: &'a A,
    pub extra_account_metas: &'a A,
    pub config: &'a A,
    pub entry: &'a A,
}

impl<'a, A: ProgramAccount> TryFrom<&'a [A]> for ExecuteAccounts<'a, A> {
    type Error = ProgramError;

    fn try_from(accounts: &'a [A]) -> Result<Self, Self::Error> {
        let [source, mint, destination, owner, extra_account_metas, config, entry, ..] = accounts
        else {
            return Err(ProgramError::NotEnoughAccountKeys);
        };

        Ok(Self {
            source,
            mint,
            destination,
            owner,
            extra_account_metas,
            config,
            entry,
        })
    }
}

/// A hook call that has been checked to come from a Token-2022 transfer.
pub struct Invocation<'a, A: ProgramAccount> {
    program_id: &'a Address,
    intent: TransferIntent<'a>,
    accounts: ExecuteAccounts<'a, A>,
}

impl<'a, A: ProgramAccount> Invocation<'a, A> {
    /// Checks that the call is part of a Token-2022 transfer of a mint
    /// governed by this program.
    ///
    /// Fails with [`WhitelistError::InvalidInvocationContext`] otherwise.
    pub fn begin(
        program_id: &'a Address,
        accounts: ExecuteAccounts<'a, A>,
        amount: u64,
    ) -> Result<Self, ProgramError> {
        check_transfer_context(program_id, &accounts).map_err(|error| {
            log!("{}", error.message());
            error
        })?;

        Ok(Self {
            program_id,
            intent: TransferIntent {
                source: accounts.source.address(),
                mint: accounts.mint.address(),
                destination: accounts.destination.address(),
                owner: accounts.owner.address(),
                amount,
            },
            accounts,
        })
    }

    /// Looks up the destination in the whitelist of the mint.
    pub fn resolve(self) -> Result<Verdict, ProgramError> {
        let mint = self.intent.mint;
        let config = load_config(self.program_id, self.accounts.config)?;
        if config.mint() != mint {
            return Err(ProgramError::InvalidAccountData);
        }

        check_address(
            self.accounts.extra_account_metas,
            &derive_address(
                &extra_account_metas_seeds(mint),
                config.extra_account_metas_bump(),
                self.program_id,
            )?,
        )?;

        if is_approved(
            self.program_id,
            mint,
            self.intent.destination,
            self.accounts.entry,
        )? {
            log!("Transfer of {} approved", self.intent.amount);
            Ok(Verdict::Approved)
        } else {
            let error = WhitelistError::NotWhitelisted;
            log!("Transfer rejected: {}", error.message());
            Ok(Verdict::Rejected(error))
        }
    }
}

fn check_transfer_context<A: ProgramAccount>(
    program_id: &Address,
    accounts: &ExecuteAccounts<A>,
) -> Result<(), WhitelistError> {
    const INVALID: WhitelistError = WhitelistError::InvalidInvocationContext;

    if !(accounts.source.owned_by(&token_2022::ID)
        && accounts.destination.owned_by(&token_2022::ID)
        && accounts.mint.owned_by(&token_2022::ID))
    {
        return Err(INVALID);
    }

    {
        let data = accounts.mint.try_borrow().map_err(|_| INVALID)?;
        let hook = Mint::unpack(&data)
            .and_then(|mint| mint.transfer_hook())
            .map_err(|_| INVALID)?;

        if hook.and_then(|hook| hook.program_id) != Some(program_id) {
            return Err(INVALID);
        }
    }

    for token_account in [accounts.source, accounts.destination] {
        let data = token_account.try_borrow().map_err(|_| INVALID)?;
        let token_account = TokenAccount::unpack(&data).map_err(|_| INVALID)?;

        if token_account.mint() != accounts.mint.address() {
            return Err(INVALID);
        }
        if token_account.transferring() != Ok(Some(true)) {
            return Err(INVALID);
        }
    }

    Ok(())
}
