//! Pool key-set resolution
//!
//! Joins three sources into one complete record per pool: the decoded
//! pool state account, the decoded state of the market it trades against,
//! and the addresses the derivation engine computes from the pool's own
//! seeds. A key set is assembled once and is immutable; callers receive
//! either a fully populated record or an error, never a partial one.

use log::{debug, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::constants;
use crate::derive;
use crate::errors::{ResolveError, ResolveResult};
use crate::layout::liquidity::LiquidityState;
use crate::layout::market::MarketState;
use crate::rpc::AccountStore;

/// One supported pairing of liquidity program and market program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedPool {
    pub version: u8,
    pub program_id: Pubkey,
    pub market_version: u8,
    pub market_program_id: Pubkey,
}

static SUPPORTED_POOLS: Lazy<Vec<SupportedPool>> = Lazy::new(|| {
    vec![SupportedPool {
        version: 4,
        program_id: constants::liquidity_program_v4(),
        market_version: 3,
        market_program_id: constants::serum_program_v3(),
    }]
});

/// Program pairings the resolver understands
pub fn supported_pools() -> &'static [SupportedPool] {
    &SUPPORTED_POOLS
}

fn supported_pool_for_owner(owner: &Pubkey) -> Option<&'static SupportedPool> {
    supported_pools().iter().find(|p| p.program_id == *owner)
}

/// Complete key set of one liquidity pool.
///
/// The canonical record a downstream consumer needs to build any
/// instruction against the pool or its market.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolKeySet {
    pub id: Pubkey,
    pub version: u8,
    pub program_id: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub lp_mint: Pubkey,
    pub authority: Pubkey,
    pub nonce: u8,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub open_orders: Pubkey,
    pub target_orders: Pubkey,
    /// Default when the pool version carries no withdraw queue
    pub withdraw_queue: Pubkey,
    /// Default when the pool version carries no temporary lp vault
    pub lp_vault: Pubkey,
    pub market_version: u8,
    pub market_program_id: Pubkey,
    pub market_id: Pubkey,
    pub market_authority: Pubkey,
    pub market_base_vault: Pubkey,
    pub market_quote_vault: Pubkey,
    pub market_bids: Pubkey,
    pub market_asks: Pubkey,
    pub market_event_queue: Pubkey,
}

/// Resolve the complete key set of a single pool.
///
/// Fatal on anything out of place: a missing account, a foreign owner,
/// a wrong-sized buffer, an uninitialized pool or a missing market.
pub async fn fetch_pool_keys<S>(store: &S, pool_id: &Pubkey) -> ResolveResult<PoolKeySet>
where
    S: AccountStore + ?Sized,
{
    let account = store
        .get_account(pool_id)
        .await?
        .ok_or(ResolveError::AccountNotFound(*pool_id))?;

    let supported = supported_pool_for_owner(&account.owner).ok_or(
        ResolveError::WrongAccountOwner {
            address: *pool_id,
            owner: account.owner,
        },
    )?;

    let state = LiquidityState::decode(supported.version, &account.data)?;
    if !state.is_initialized() {
        return Err(ResolveError::PoolUninitialized(*pool_id));
    }

    let market_account = store
        .get_account(&state.market_id)
        .await?
        .ok_or(ResolveError::AccountNotFound(state.market_id))?;
    let market = MarketState::decode(supported.market_version, &market_account.data)?;

    join_pool_keys(pool_id, supported, &state, &market)
}

/// Resolve every initialized pool of every supported program pairing.
///
/// Uninitialized or malformed pool accounts are expected on a real chain
/// and are skipped silently; a pool whose market cannot be fetched or
/// decoded is dropped alone, never the whole batch. Output order is
/// unspecified.
pub async fn fetch_all_pool_keys<S>(store: &S) -> ResolveResult<Vec<PoolKeySet>>
where
    S: AccountStore + ?Sized,
{
    let mut all = Vec::new();
    for supported in supported_pools() {
        all.extend(fetch_all_pool_keys_for(store, supported).await?);
    }
    Ok(all)
}

/// Resolve every initialized pool owned by one supported program
pub async fn fetch_all_pool_keys_for<S>(
    store: &S,
    supported: &SupportedPool,
) -> ResolveResult<Vec<PoolKeySet>>
where
    S: AccountStore + ?Sized,
{
    let span = LiquidityState::span(supported.version)?;
    let accounts = store
        .get_program_accounts_by_size(&supported.program_id, span)
        .await?;

    let mut pools: Vec<(Pubkey, LiquidityState)> = Vec::with_capacity(accounts.len());
    for account in &accounts {
        let state = match LiquidityState::decode(supported.version, &account.data) {
            Ok(state) => state,
            Err(e) => {
                warn!("skipping undecodable pool {}: {}", account.address, e);
                continue;
            }
        };
        if !state.is_initialized() {
            debug!("skipping uninitialized pool {}", account.address);
            continue;
        }
        pools.push((account.address, state));
    }

    let market_ids: Vec<Pubkey> = pools.iter().map(|(_, state)| state.market_id).collect();
    let markets = store.get_multiple_accounts(&market_ids).await?;

    let mut key_sets = Vec::with_capacity(pools.len());
    for ((pool_id, state), market_account) in pools.iter().zip(markets) {
        let market_account = match market_account {
            Some(account) => account,
            None => {
                warn!(
                    "skipping pool {}: market {} not found",
                    pool_id, state.market_id
                );
                continue;
            }
        };
        let market = match MarketState::decode(supported.market_version, &market_account.data) {
            Ok(market) => market,
            Err(e) => {
                warn!(
                    "skipping pool {}: undecodable market {}: {}",
                    pool_id, state.market_id, e
                );
                continue;
            }
        };
        match join_pool_keys(pool_id, supported, state, &market) {
            Ok(keys) => key_sets.push(keys),
            Err(e) => {
                warn!("skipping pool {}: {}", pool_id, e);
            }
        }
    }

    Ok(key_sets)
}

/// First pool trading exactly the given mint pair, if any.
///
/// Scans the full pool set; callers wanting the reverse pair must swap
/// the arguments themselves.
pub async fn find_pool_id_by_mints<S>(
    store: &S,
    base_mint: &Pubkey,
    quote_mint: &Pubkey,
) -> ResolveResult<Option<Pubkey>>
where
    S: AccountStore + ?Sized,
{
    let pools = fetch_all_pool_keys(store).await?;
    Ok(pools
        .iter()
        .find(|keys| keys.base_mint == *base_mint && keys.quote_mint == *quote_mint)
        .map(|keys| keys.id))
}

fn join_pool_keys(
    pool_id: &Pubkey,
    supported: &SupportedPool,
    state: &LiquidityState,
    market: &MarketState,
) -> ResolveResult<PoolKeySet> {
    let (authority, nonce) = derive::associated_authority(&supported.program_id)?;
    let (market_authority, _) =
        derive::market_authority(&supported.market_program_id, &state.market_id)?;

    Ok(PoolKeySet {
        id: *pool_id,
        version: supported.version,
        program_id: supported.program_id,
        base_mint: state.base_mint,
        quote_mint: state.quote_mint,
        lp_mint: state.lp_mint,
        authority,
        nonce,
        base_vault: state.base_vault,
        quote_vault: state.quote_vault,
        open_orders: state.open_orders,
        target_orders: state.target_orders,
        withdraw_queue: state.withdraw_queue,
        lp_vault: state.lp_vault,
        market_version: supported.market_version,
        market_program_id: supported.market_program_id,
        market_id: state.market_id,
        market_authority,
        market_base_vault: market.base_vault,
        market_quote_vault: market.quote_vault,
        market_bids: market.bids,
        market_asks: market.asks,
        market_event_queue: market.event_queue,
    })
}
