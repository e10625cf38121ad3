//! Rent as configured on mainnet.

/// Bytes accounted for each account on top of its data.
pub const ACCOUNT_STORAGE_OVERHEAD: u64 = 128;

pub const LAMPORTS_PER_BYTE_YEAR: u64 = 3_480;

pub const EXEMPTION_THRESHOLD_YEARS: u64 = 2;

/// Balance an account of `data_len` bytes needs to be rent exempt.
pub fn minimum_balance(data_len: usize) -> u64 {
    (ACCOUNT_STORAGE_OVERHEAD + data_len as u64) * LAMPORTS_PER_BYTE_YEAR * EXEMPTION_THRESHOLD_YEARS
}
