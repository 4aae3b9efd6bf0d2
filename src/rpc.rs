//! Account store access
//!
//! The only component that performs network I/O. Everything above it
//! consumes the `AccountStore` trait, which is a thin pass-through to the
//! chain's JSON-RPC account queries: single reads, ordered batch reads and
//! owner scans filtered by exact data size. Retry and backoff policy is
//! deliberately the caller's concern.

pub mod http;
pub mod testing;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::errors::ResolveResult;

pub use http::HttpAccountStore;

/// Maximum number of addresses per getMultipleAccounts call
pub const MULTIPLE_ACCOUNTS_BATCH_SIZE: usize = 100;

/// Raw account snapshot at a point in time.
///
/// Immutable once fetched; the chain may move on immediately, so the
/// fetch timestamp travels with the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAccount {
    pub address: Pubkey,
    pub owner: Pubkey,
    pub lamports: u64,
    pub data: Vec<u8>,
    pub fetched_at: DateTime<Utc>,
}

impl RawAccount {
    /// Length of the account data in bytes
    pub fn data_len(&self) -> usize {
        self.data.len()
    }
}

/// Read-only interface to the chain's account store.
///
/// Implementations perform no interpretation of account bytes; decoding
/// belongs to the layout layer.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fetch one account; `None` when the account does not exist
    async fn get_account(&self, address: &Pubkey) -> ResolveResult<Option<RawAccount>>;

    /// Fetch many accounts, preserving input order; missing accounts
    /// yield `None` at their input position
    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> ResolveResult<Vec<Option<RawAccount>>>;

    /// All accounts owned by `program_id` whose data is exactly
    /// `data_size` bytes long
    async fn get_program_accounts_by_size(
        &self,
        program_id: &Pubkey,
        data_size: usize,
    ) -> ResolveResult<Vec<RawAccount>>;

    /// All token accounts held by `owner` under the given token program
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        token_program_id: &Pubkey,
    ) -> ResolveResult<Vec<RawAccount>>;
}
