//! Farm ledger resolution
//!
//! A farm ledger is the per-staker deposit record of a farm pool,
//! derived from (farm pool, owner). As with token accounts, resolution
//! only reports whether the ledger exists; creating it is a
//! transaction-building concern upstream.

use solana_sdk::pubkey::Pubkey;

use crate::derive;
use crate::errors::{ResolveError, ResolveResult};
use crate::layout::farm::FarmLedger;
use crate::rpc::AccountStore;

pub use crate::derive::farm_ledger_address;

/// Result of a farm ledger existence check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerStatus {
    pub address: Pubkey,
    pub existed: bool,
}

/// Derive the owner's ledger for a farm pool and report whether it
/// already exists on-chain
pub async fn ensure_ledger<S>(
    store: &S,
    farm_program_id: &Pubkey,
    farm_pool_id: &Pubkey,
    owner: &Pubkey,
) -> ResolveResult<LedgerStatus>
where
    S: AccountStore + ?Sized,
{
    let address = derive::farm_ledger_address(farm_program_id, farm_pool_id, owner)?;
    let existed = store.get_account(&address).await?.is_some();
    Ok(LedgerStatus { address, existed })
}

/// Fetch and decode the owner's ledger for a farm pool.
///
/// `version` selects the farm program generation (3 or 5) and with it
/// the expected ledger span.
pub async fn fetch_ledger<S>(
    store: &S,
    farm_program_id: &Pubkey,
    farm_pool_id: &Pubkey,
    owner: &Pubkey,
    version: u8,
) -> ResolveResult<FarmLedger>
where
    S: AccountStore + ?Sized,
{
    let address = derive::farm_ledger_address(farm_program_id, farm_pool_id, owner)?;
    let account = store
        .get_account(&address)
        .await?
        .ok_or(ResolveError::AccountNotFound(address))?;

    if account.owner != *farm_program_id {
        return Err(ResolveError::WrongAccountOwner {
            address,
            owner: account.owner,
        });
    }

    FarmLedger::decode(version, &account.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;
    use crate::rpc::testing::MemoryAccountStore;

    #[tokio::test]
    async fn test_ensure_ledger_reports_existence() {
        let store = MemoryAccountStore::new();
        let farm_program = constants::farm_program_v3();
        let pool = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let before = ensure_ledger(&store, &farm_program, &pool, &owner)
            .await
            .unwrap();
        assert!(!before.existed);

        let ledger = FarmLedger {
            version: 3,
            state: 1,
            id: pool,
            owner,
            deposited: 100,
            reward_debts: vec![0],
        };
        store.insert_account(before.address, farm_program, ledger.encode().unwrap());

        let after = ensure_ledger(&store, &farm_program, &pool, &owner)
            .await
            .unwrap();
        assert!(after.existed);
        assert_eq!(before.address, after.address);
    }

    #[tokio::test]
    async fn test_fetch_ledger_decodes_state() {
        let store = MemoryAccountStore::new();
        let farm_program = constants::farm_program_v5();
        let pool = Pubkey::new_unique();
        let owner = Pubkey::new_unique();

        let ledger = FarmLedger {
            version: 5,
            state: 1,
            id: pool,
            owner,
            deposited: 123_456,
            reward_debts: vec![7, 8],
        };
        let address = farm_ledger_address(&farm_program, &pool, &owner).unwrap();
        store.insert_account(address, farm_program, ledger.encode().unwrap());

        let fetched = fetch_ledger(&store, &farm_program, &pool, &owner, 5)
            .await
            .unwrap();
        assert_eq!(fetched, ledger);
    }

    #[tokio::test]
    async fn test_fetch_ledger_missing_is_not_found() {
        let store = MemoryAccountStore::new();
        let farm_program = constants::farm_program_v3();
        let err = fetch_ledger(
            &store,
            &farm_program,
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            3,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ResolveError::AccountNotFound(_)));
        assert!(err.is_not_found());
    }
}
