use {
    pretty_assertions::assert_eq,
    runtime_tests::{
        instructions::{
            add_to_whitelist, config_address, entry_address, execute, initialize, mint_to,
            remove_from_whitelist, transfer_checked, transfer_checked_with_accounts,
        },
        ledger::set_transferring,
        rent::minimum_balance,
        AccountMeta, AccountState, InstructionError, Runtime, TokenError, TransactionError,
        TransferAccounts, TransferHookConfig,
    },
    solana_address::Address,
    solana_program_error::ProgramError,
    transfer_hook_interface::{
        pda::{extra_account_metas_seeds, find_extra_account_metas_address},
        ExtraAccountMetaList,
    },
    whitelist_transfer_hook::{
        instruction::WhitelistInstruction,
        processor::extra_account_metas,
        registry::{config_seeds, entry_seeds},
        state::{AccountState as _, WhitelistConfig, WhitelistEntry},
        WhitelistError,
    },
};

const DECIMALS: u8 = 6;

const LAMPORTS: u64 = 10_000_000_000;

fn address(byte: u8) -> Address {
    Address::new_from_array([byte; 32])
}

struct Setup {
    runtime: Runtime,
    authority: Address,
    mint: Address,
    holder: Address,
    source: Address,
    destination: Address,
}

impl Setup {
    /// A mint governed by the hook, with 1_000 tokens in `source` and an
    /// empty `destination`. The whitelist is not initialized.
    fn new() -> Self {
        Self::with_hook_authority(Some(address(1)))
    }

    fn with_hook_authority(hook_authority: Option<Address>) -> Self {
        let mut runtime = Runtime::new();
        let authority = address(1);
        let mint = address(2);
        let holder = address(3);
        let source = address(4);
        let destination = address(5);
        let recipient = address(6);

        runtime.airdrop(&authority, LAMPORTS);
        runtime.airdrop(&holder, LAMPORTS);
        runtime.create_mint(
            mint,
            Some(&authority),
            DECIMALS,
            Some(&TransferHookConfig {
                authority: hook_authority,
                program_id: whitelist_transfer_hook::ID,
            }),
        );
        runtime
            .create_token_account(source, &mint, &holder)
            .unwrap();
        runtime
            .create_token_account(destination, &mint, &recipient)
            .unwrap();
        runtime
            .process_transaction(&[mint_to(&mint, &source, &authority, 1_000)], &[authority])
            .unwrap();

        Self {
            runtime,
            authority,
            mint,
            holder,
            source,
            destination,
        }
    }

    fn initialized() -> Self {
        let mut setup = Self::new();
        setup.initialize().unwrap();
        setup
    }

    fn initialize(&mut self) -> Result<(), TransactionError> {
        self.runtime.process_transaction(
            &[initialize(&self.authority, &self.mint)],
            &[self.authority],
        )
    }

    fn add(&mut self, account: &Address) -> Result<(), TransactionError> {
        self.runtime.process_transaction(
            &[add_to_whitelist(&self.authority, &self.mint, account)],
            &[self.authority],
        )
    }

    fn remove(&mut self, account: &Address) -> Result<(), TransactionError> {
        self.runtime.process_transaction(
            &[remove_from_whitelist(&self.authority, &self.mint, account)],
            &[self.authority],
        )
    }

    fn transfer_accounts(&self, destination: &Address) -> TransferAccounts {
        TransferAccounts {
            source: self.source,
            mint: self.mint,
            destination: *destination,
            owner: self.holder,
        }
    }

    fn transfer(&mut self, destination: &Address, amount: u64) -> Result<(), TransactionError> {
        let instruction = transfer_checked(
            &self.runtime,
            &self.transfer_accounts(destination),
            amount,
            DECIMALS,
        )
        .unwrap();
        self.runtime
            .process_transaction(&[instruction], &[self.holder])
    }

    fn balances(&self) -> (Option<u64>, Option<u64>) {
        (
            self.runtime.token_balance(&self.source),
            self.runtime.token_balance(&self.destination),
        )
    }

    fn is_whitelisted(&self, account: &Address) -> bool {
        self.runtime
            .account(&entry_address(&self.mint, account).0)
            .is_some()
    }
}

/// A valid program address of `seeds` other than the canonical one.
fn non_canonical_address(seeds: &[&[u8]]) -> (Address, u8) {
    let (_, canonical_bump) = Address::find_program_address(seeds, &whitelist_transfer_hook::ID);

    (0..canonical_bump)
        .rev()
        .find_map(|bump| {
            let bump_seed = [bump];
            let mut signer_seeds = seeds.to_vec();
            signer_seeds.push(&bump_seed);
            Address::create_program_address(&signer_seeds, &whitelist_transfer_hook::ID)
                .ok()
                .map(|address| (address, bump))
        })
        .expect("off-curve address below the canonical bump")
}

fn program_error(result: Result<(), TransactionError>) -> ProgramError {
    result
        .unwrap_err()
        .program_error()
        .cloned()
        .expect("program error")
}

#[test]
fn transfer_requires_whitelisted_destination() {
    let mut setup = Setup::initialized();
    let destination = setup.destination;

    assert_eq!(
        program_error(setup.transfer(&destination, 100)),
        WhitelistError::NotWhitelisted.into()
    );
    assert_eq!(setup.balances(), (Some(1_000), Some(0)));

    setup.add(&destination).unwrap();
    setup.transfer(&destination, 100).unwrap();

    assert_eq!(setup.balances(), (Some(900), Some(100)));

    // The same accounts outside of a transfer.
    let instruction = execute(&setup.transfer_accounts(&destination), 100);
    let result = setup.runtime.process_transaction(&[instruction], &[]);
    assert_eq!(
        program_error(result),
        WhitelistError::InvalidInvocationContext.into()
    );
}

#[test]
fn transferring_flags_are_cleared_after_transfer() {
    let mut setup = Setup::initialized();
    let destination = setup.destination;
    setup.add(&destination).unwrap();
    setup.transfer(&destination, 1).unwrap();

    for account in [setup.source, setup.destination] {
        assert_eq!(
            setup.runtime.token_account(&account).unwrap().transferring(),
            Ok(Some(false))
        );
    }
}

#[test]
fn initialize_publishes_extra_accounts_and_config() {
    let setup = Setup::initialized();

    let (meta_list_address, meta_list_bump) =
        find_extra_account_metas_address(&setup.mint, &whitelist_transfer_hook::ID);
    let meta_list = setup.runtime.account(&meta_list_address).unwrap();
    assert_eq!(meta_list.owner, whitelist_transfer_hook::ID);
    assert_eq!(
        ExtraAccountMetaList::unpack(&meta_list.data).unwrap(),
        extra_account_metas().unwrap().as_slice()
    );

    let (config_address, config_bump) = config_address(&setup.mint);
    let config = setup.runtime.account(&config_address).unwrap();
    assert_eq!(config.owner, whitelist_transfer_hook::ID);
    assert_eq!(config.lamports, minimum_balance(WhitelistConfig::LEN));
    assert_eq!(
        WhitelistConfig::from_bytes(&config.data).unwrap(),
        &WhitelistConfig::new(config_bump, meta_list_bump, &setup.mint, &setup.authority)
    );
}

#[test]
fn initialize_twice_fails() {
    let mut setup = Setup::initialized();

    assert_eq!(
        program_error(setup.initialize()),
        WhitelistError::AlreadyInitialized.into()
    );
}

#[test]
fn initialize_requires_canonical_bumps() {
    for initialized in [false, true] {
        let mut setup = if initialized {
            Setup::initialized()
        } else {
            Setup::new()
        };
        let (meta_list, extra_account_metas_bump) =
            non_canonical_address(&extra_account_metas_seeds(&setup.mint));
        let (config, config_bump) = non_canonical_address(&config_seeds(&setup.mint));

        let mut instruction = initialize(&setup.authority, &setup.mint);
        instruction.accounts[1].address = meta_list;
        instruction.accounts[3].address = config;
        instruction.data = WhitelistInstruction::Initialize {
            extra_account_metas_bump,
            config_bump,
        }
        .pack()
        .to_vec();

        let result = setup
            .runtime
            .process_transaction(&[instruction], &[setup.authority]);

        assert_eq!(program_error(result), ProgramError::InvalidSeeds);
        assert_eq!(setup.runtime.account(&meta_list), None);
        assert_eq!(setup.runtime.account(&config), None);
    }
}

#[test]
fn initialize_over_prefunded_accounts() {
    let mut setup = Setup::new();
    let destination = setup.destination;
    let (meta_list, _) = find_extra_account_metas_address(&setup.mint, &whitelist_transfer_hook::ID);
    let (config, _) = config_address(&setup.mint);

    // Anyone can send lamports to the addresses before setup.
    setup
        .runtime
        .set_account(meta_list, AccountState::with_lamports(1));
    setup
        .runtime
        .set_account(config, AccountState::with_lamports(1));
    let before = setup.runtime.lamports(&setup.authority);

    setup.initialize().unwrap();

    let meta_list_len = ExtraAccountMetaList::size_of(extra_account_metas().unwrap().len());
    for (address, len) in [(meta_list, meta_list_len), (config, WhitelistConfig::LEN)] {
        let account = setup.runtime.account(&address).unwrap();
        assert_eq!(account.owner, whitelist_transfer_hook::ID);
        assert_eq!(account.data.len(), len);
        assert_eq!(account.lamports, minimum_balance(len));
    }
    assert_eq!(
        setup.runtime.lamports(&setup.authority),
        before - (minimum_balance(meta_list_len) - 1) - (minimum_balance(WhitelistConfig::LEN) - 1)
    );

    setup.add(&destination).unwrap();
    setup.transfer(&destination, 10).unwrap();
    assert_eq!(setup.balances(), (Some(990), Some(10)));
}

#[test]
fn initialize_requires_the_mint_authority() {
    let mut setup = Setup::new();
    let impostor = address(7);
    setup.runtime.airdrop(&impostor, LAMPORTS);

    let result = setup
        .runtime
        .process_transaction(&[initialize(&impostor, &setup.mint)], &[impostor]);

    assert_eq!(
        program_error(result),
        WhitelistError::UnauthorizedCaller.into()
    );
    assert!(setup
        .runtime
        .account(&config_address(&setup.mint).0)
        .is_none());
}

#[test]
fn hook_authority_falls_back_to_mint_authority() {
    let mut setup = Setup::with_hook_authority(None);
    setup.initialize().unwrap();

    let destination = setup.destination;
    setup.add(&destination).unwrap();
    setup.transfer(&destination, 10).unwrap();

    assert_eq!(setup.balances(), (Some(990), Some(10)));
}

#[test]
fn mint_must_name_this_hook() {
    let mut runtime = Runtime::new();
    let authority = address(1);
    runtime.airdrop(&authority, LAMPORTS);

    let other_hook = address(2);
    runtime.create_mint(
        other_hook,
        Some(&authority),
        DECIMALS,
        Some(&TransferHookConfig {
            authority: Some(authority),
            program_id: address(9),
        }),
    );
    let no_hook = address(3);
    runtime.create_mint(no_hook, Some(&authority), DECIMALS, None);

    for mint in [other_hook, no_hook] {
        assert_eq!(
            program_error(runtime.process_transaction(&[initialize(&authority, &mint)], &[authority])),
            WhitelistError::MintNotGoverned.into()
        );
    }
}

#[test]
fn transfer_before_initialize_fails() {
    let mut setup = Setup::new();
    let transfer = setup.transfer_accounts(&setup.destination);

    assert_eq!(
        transfer_checked(&setup.runtime, &transfer, 100, DECIMALS),
        Err(ProgramError::AccountDataTooSmall)
    );

    let (meta_list, _) = find_extra_account_metas_address(&setup.mint, &whitelist_transfer_hook::ID);
    let instruction = transfer_checked_with_accounts(
        &transfer,
        100,
        DECIMALS,
        &[
            AccountMeta::new_readonly(whitelist_transfer_hook::ID, false),
            AccountMeta::new_readonly(meta_list, false),
        ],
    );
    let result = setup
        .runtime
        .process_transaction(&[instruction], &[setup.holder]);

    assert_eq!(program_error(result), ProgramError::AccountDataTooSmall);
    assert_eq!(setup.balances(), (Some(1_000), Some(0)));
}

#[test]
fn transfer_without_extra_accounts_fails() {
    let mut setup = Setup::initialized();
    let destination = setup.destination;
    setup.add(&destination).unwrap();

    let instruction =
        transfer_checked_with_accounts(&setup.transfer_accounts(&destination), 100, DECIMALS, &[]);
    let result = setup
        .runtime
        .process_transaction(&[instruction], &[setup.holder]);

    assert_eq!(program_error(result), ProgramError::NotEnoughAccountKeys);
}

#[test]
fn zero_amount_transfer_requires_whitelisting() {
    let mut setup = Setup::initialized();
    let destination = setup.destination;

    assert_eq!(
        program_error(setup.transfer(&destination, 0)),
        WhitelistError::NotWhitelisted.into()
    );

    setup.add(&destination).unwrap();
    setup.transfer(&destination, 0).unwrap();
}

#[test]
fn authority_is_not_implicitly_whitelisted() {
    let mut setup = Setup::initialized();
    let authority_account = address(8);
    let (mint, authority) = (setup.mint, setup.authority);
    setup
        .runtime
        .create_token_account(authority_account, &mint, &authority)
        .unwrap();

    assert_eq!(
        program_error(setup.transfer(&authority_account, 1)),
        WhitelistError::NotWhitelisted.into()
    );
}

#[test]
fn whitelist_is_per_destination() {
    let mut setup = Setup::initialized();
    let destination = setup.destination;
    let other = address(8);
    let (mint, holder) = (setup.mint, setup.holder);
    setup
        .runtime
        .create_token_account(other, &mint, &holder)
        .unwrap();

    setup.add(&destination).unwrap();

    assert_eq!(
        program_error(setup.transfer(&other, 1)),
        WhitelistError::NotWhitelisted.into()
    );
    setup.transfer(&destination, 1).unwrap();
}

#[test]
fn whitelist_is_per_mint() {
    let mut setup = Setup::initialized();
    let authority = setup.authority;
    let other_mint = address(10);
    let other_source = address(11);
    let other_destination = address(12);

    setup.runtime.create_mint(
        other_mint,
        Some(&authority),
        DECIMALS,
        Some(&TransferHookConfig {
            authority: Some(authority),
            program_id: whitelist_transfer_hook::ID,
        }),
    );
    for account in [other_source, other_destination] {
        setup
            .runtime
            .create_token_account(account, &other_mint, &setup.holder)
            .unwrap();
    }
    setup
        .runtime
        .process_transaction(
            &[
                initialize(&authority, &other_mint),
                mint_to(&other_mint, &other_source, &authority, 50),
            ],
            &[authority],
        )
        .unwrap();

    // Whitelisted under the first mint only.
    setup.add(&other_destination).unwrap();

    let transfer = TransferAccounts {
        source: other_source,
        mint: other_mint,
        destination: other_destination,
        owner: setup.holder,
    };
    let instruction = transfer_checked(&setup.runtime, &transfer, 5, DECIMALS).unwrap();
    let result = setup
        .runtime
        .process_transaction(&[instruction], &[setup.holder]);

    assert_eq!(
        program_error(result),
        WhitelistError::NotWhitelisted.into()
    );
}

#[test]
fn add_is_idempotent() {
    let mut setup = Setup::initialized();
    let destination = setup.destination;
    let before = setup.runtime.lamports(&setup.authority);

    setup.add(&destination).unwrap();
    let entry = setup
        .runtime
        .account(&entry_address(&setup.mint, &destination).0)
        .cloned()
        .unwrap();
    setup.add(&destination).unwrap();

    assert_eq!(
        setup
            .runtime
            .account(&entry_address(&setup.mint, &destination).0),
        Some(&entry)
    );
    assert_eq!(
        setup.runtime.lamports(&setup.authority),
        before - minimum_balance(WhitelistEntry::LEN)
    );
}

#[test]
fn add_requires_canonical_bump() {
    let mut setup = Setup::initialized();
    let destination = setup.destination;
    setup.add(&destination).unwrap();

    let (entry, entry_bump) = non_canonical_address(&entry_seeds(&setup.mint, &destination));
    let mut instruction = add_to_whitelist(&setup.authority, &setup.mint, &destination);
    instruction.accounts[3].address = entry;
    instruction.data = WhitelistInstruction::AddToWhitelist { entry_bump }
        .pack()
        .to_vec();

    let result = setup
        .runtime
        .process_transaction(&[instruction], &[setup.authority]);

    assert_eq!(program_error(result), ProgramError::InvalidSeeds);
    assert_eq!(setup.runtime.account(&entry), None);

    // Removing the canonical entry leaves nothing behind.
    setup.remove(&destination).unwrap();
    assert_eq!(
        program_error(setup.transfer(&destination, 1)),
        WhitelistError::NotWhitelisted.into()
    );
}

#[test]
fn unauthorized_add_is_rejected() {
    let mut setup = Setup::initialized();
    let destination = setup.destination;
    let impostor = address(7);
    setup.runtime.airdrop(&impostor, LAMPORTS);

    let result = setup.runtime.process_transaction(
        &[add_to_whitelist(&impostor, &setup.mint, &destination)],
        &[impostor],
    );
    assert_eq!(
        program_error(result),
        WhitelistError::UnauthorizedCaller.into()
    );

    let mut unsigned = add_to_whitelist(&setup.authority, &setup.mint, &destination);
    unsigned.accounts[0].is_signer = false;
    let result = setup.runtime.process_transaction(&[unsigned], &[]);
    assert_eq!(program_error(result), ProgramError::MissingRequiredSignature);

    assert!(!setup.is_whitelisted(&destination));
}

#[test]
fn remove_revokes_and_refunds() {
    let mut setup = Setup::initialized();
    let destination = setup.destination;
    setup.add(&destination).unwrap();
    setup.transfer(&destination, 100).unwrap();

    let before = setup.runtime.lamports(&setup.authority);
    setup.remove(&destination).unwrap();

    assert!(!setup.is_whitelisted(&destination));
    assert_eq!(
        setup.runtime.lamports(&setup.authority),
        before + minimum_balance(WhitelistEntry::LEN)
    );
    assert_eq!(
        program_error(setup.transfer(&destination, 100)),
        WhitelistError::NotWhitelisted.into()
    );
    assert_eq!(setup.balances(), (Some(900), Some(100)));

    // Removing again changes nothing.
    let before = setup.runtime.lamports(&setup.authority);
    setup.remove(&destination).unwrap();
    assert_eq!(setup.runtime.lamports(&setup.authority), before);
}

#[test]
fn unauthorized_remove_is_rejected() {
    let mut setup = Setup::initialized();
    let destination = setup.destination;
    let impostor = address(7);
    setup.runtime.airdrop(&impostor, LAMPORTS);
    setup.add(&destination).unwrap();

    let result = setup.runtime.process_transaction(
        &[remove_from_whitelist(&impostor, &setup.mint, &destination)],
        &[impostor],
    );

    assert_eq!(
        program_error(result),
        WhitelistError::UnauthorizedCaller.into()
    );
    assert!(setup.is_whitelisted(&destination));
}

#[test]
fn direct_execute_is_rejected() {
    let mut setup = Setup::initialized();
    let destination = setup.destination;
    setup.add(&destination).unwrap();

    let instruction = execute(&setup.transfer_accounts(&destination), 100);
    let result = setup.runtime.process_transaction(&[instruction], &[]);

    assert_eq!(
        program_error(result),
        WhitelistError::InvalidInvocationContext.into()
    );
}

#[test]
fn spoofed_token_accounts_are_rejected() {
    let mut setup = Setup::initialized();
    let destination = setup.destination;
    setup.add(&destination).unwrap();

    // Copies of the real accounts with the flag raised, owned by another
    // program.
    let attacker = address(99);
    let (spoofed_source, spoofed_destination) = (address(20), address(21));
    for (real, spoofed) in [(setup.source, spoofed_source), (destination, spoofed_destination)] {
        let mut state = setup.runtime.account(&real).cloned().unwrap();
        assert!(set_transferring(&mut state.data, true));
        state.owner = attacker;
        setup.runtime.set_account(spoofed, state);
    }

    let transfer = TransferAccounts {
        source: spoofed_source,
        mint: setup.mint,
        destination: spoofed_destination,
        owner: setup.holder,
    };
    let result = setup
        .runtime
        .process_transaction(&[execute(&transfer, 100)], &[]);

    assert_eq!(
        program_error(result),
        WhitelistError::InvalidInvocationContext.into()
    );
}

#[test]
fn failed_transfer_is_rolled_back() {
    let mut setup = Setup::initialized();
    let destination = setup.destination;
    let other = address(8);
    let (mint, holder) = (setup.mint, setup.holder);
    setup
        .runtime
        .create_token_account(other, &mint, &holder)
        .unwrap();
    setup.add(&destination).unwrap();

    // The second transfer is rejected, so the first one does not happen
    // either.
    let first = transfer_checked(
        &setup.runtime,
        &setup.transfer_accounts(&destination),
        100,
        DECIMALS,
    )
    .unwrap();
    let second =
        transfer_checked(&setup.runtime, &setup.transfer_accounts(&other), 100, DECIMALS).unwrap();

    let error = setup
        .runtime
        .process_transaction(&[first, second], &[setup.holder])
        .unwrap_err();

    assert_eq!(error.index, 1);
    assert_eq!(
        error.error,
        InstructionError::Program(WhitelistError::NotWhitelisted.into())
    );
    assert_eq!(setup.balances(), (Some(1_000), Some(0)));
    assert_eq!(
        setup.runtime.token_account(&destination).unwrap().transferring(),
        Ok(Some(false))
    );
}

#[test]
fn token_checks_run_before_the_hook() {
    let mut setup = Setup::initialized();
    let destination = setup.destination;
    setup.add(&destination).unwrap();

    assert_eq!(
        program_error(setup.transfer(&destination, 1_001)),
        TokenError::InsufficientFunds.into()
    );

    let instruction = transfer_checked(
        &setup.runtime,
        &setup.transfer_accounts(&destination),
        1,
        DECIMALS + 1,
    )
    .unwrap();
    assert_eq!(
        program_error(
            setup
                .runtime
                .process_transaction(&[instruction], &[setup.holder])
        ),
        TokenError::MintDecimalsMismatch.into()
    );
}

#[test]
fn empty_accounts_are_not_entries() {
    let mut setup = Setup::initialized();
    let destination = setup.destination;

    // Lamports sent to the entry address do not make an entry.
    let (entry, _) = entry_address(&setup.mint, &destination);
    setup
        .runtime
        .set_account(entry, AccountState::with_lamports(1_000_000));

    assert_eq!(
        program_error(setup.transfer(&destination, 1)),
        WhitelistError::NotWhitelisted.into()
    );

    // Nor do they stop the account from being whitelisted.
    let before = setup.runtime.lamports(&setup.authority);
    setup.add(&destination).unwrap();

    let account = setup.runtime.account(&entry).unwrap();
    assert_eq!(account.owner, whitelist_transfer_hook::ID);
    assert_eq!(account.lamports, minimum_balance(WhitelistEntry::LEN));
    assert_eq!(
        setup.runtime.lamports(&setup.authority),
        before - (minimum_balance(WhitelistEntry::LEN) - 1_000_000)
    );
    assert!(setup.is_whitelisted(&destination));

    setup.transfer(&destination, 1).unwrap();
    assert_eq!(setup.balances(), (Some(999), Some(1)));
}
