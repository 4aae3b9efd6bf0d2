//! In-memory account store for tests
//!
//! Backs the `AccountStore` trait with a plain map so resolution logic
//! can be exercised against fixture accounts without a network.

use async_trait::async_trait;
use chrono::Utc;
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{AccountStore, RawAccount};
use crate::errors::ResolveResult;
use crate::layout::spl::TOKEN_ACCOUNT_SPAN;

/// Map-backed account store
#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: Mutex<HashMap<Pubkey, RawAccount>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an account with the given owner and data
    pub fn insert_account(&self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        let account = RawAccount {
            address,
            owner,
            lamports: 1,
            data,
            fetched_at: Utc::now(),
        };
        self.accounts.lock().unwrap().insert(address, account);
    }

    /// Remove an account, as if it were closed on-chain
    pub fn remove_account(&self, address: &Pubkey) {
        self.accounts.lock().unwrap().remove(address);
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn get_account(&self, address: &Pubkey) -> ResolveResult<Option<RawAccount>> {
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> ResolveResult<Vec<Option<RawAccount>>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(addresses
            .iter()
            .map(|address| accounts.get(address).cloned())
            .collect())
    }

    async fn get_program_accounts_by_size(
        &self,
        program_id: &Pubkey,
        data_size: usize,
    ) -> ResolveResult<Vec<RawAccount>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .values()
            .filter(|account| account.owner == *program_id && account.data.len() == data_size)
            .cloned()
            .collect())
    }

    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        token_program_id: &Pubkey,
    ) -> ResolveResult<Vec<RawAccount>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .values()
            .filter(|account| {
                account.owner == *token_program_id
                    && account.data.len() == TOKEN_ACCOUNT_SPAN
                    && account.data[32..64] == owner.to_bytes()
            })
            .cloned()
            .collect())
    }
}
