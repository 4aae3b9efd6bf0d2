//! Owner token account resolution
//!
//! Associated token account lookup plus decoded reads of a wallet's SPL
//! accounts and of mint state. Nothing here creates accounts: callers
//! that see `existed == false` decide upstream whether to attach a
//! creation instruction.

use log::warn;
use solana_sdk::pubkey::Pubkey;

use crate::constants;
use crate::derive;
use crate::errors::{ResolveError, ResolveResult};
use crate::layout::spl::{MintState, TokenAccountState, MINT_SPAN};
use crate::rpc::AccountStore;

pub use crate::derive::{associated_token_address, associated_token_address_with_program};

/// Result of an associated-account existence check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtaStatus {
    pub address: Pubkey,
    pub existed: bool,
}

/// A wallet's token account with its decoded state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedTokenAccount {
    pub address: Pubkey,
    pub state: TokenAccountState,
}

/// Derive the owner's associated token account and report whether it
/// already exists on-chain.
///
/// Never creates the account; the flag tells the caller whether a
/// creation instruction is needed upstream.
pub async fn ensure_token_account<S>(
    store: &S,
    owner: &Pubkey,
    mint: &Pubkey,
) -> ResolveResult<AtaStatus>
where
    S: AccountStore + ?Sized,
{
    let address = derive::associated_token_address(owner, mint)?;
    let existed = store.get_account(&address).await?.is_some();
    Ok(AtaStatus { address, existed })
}

/// All SPL token accounts held by `owner`, decoded.
///
/// Malformed entries are dropped with a warning; the node should never
/// return one from a token-program scan, but a bad account must not
/// poison the rest.
pub async fn get_token_accounts_by_owner<S>(
    store: &S,
    owner: &Pubkey,
) -> ResolveResult<Vec<OwnedTokenAccount>>
where
    S: AccountStore + ?Sized,
{
    let accounts = store
        .get_token_accounts_by_owner(owner, &constants::token_program())
        .await?;

    let mut decoded = Vec::with_capacity(accounts.len());
    for account in accounts {
        match TokenAccountState::decode(&account.data) {
            Ok(state) => decoded.push(OwnedTokenAccount {
                address: account.address,
                state,
            }),
            Err(e) => {
                warn!("skipping undecodable token account {}: {}", account.address, e);
            }
        }
    }
    Ok(decoded)
}

/// Fetch and decode a mint account.
///
/// The account must exist, be owned by the SPL Token program and match
/// the mint span exactly.
pub async fn fetch_mint<S>(store: &S, mint: &Pubkey) -> ResolveResult<MintState>
where
    S: AccountStore + ?Sized,
{
    let account = store
        .get_account(mint)
        .await?
        .ok_or(ResolveError::AccountNotFound(*mint))?;

    if account.owner != constants::token_program() {
        return Err(ResolveError::WrongAccountOwner {
            address: *mint,
            owner: account.owner,
        });
    }
    if account.data.len() != MINT_SPAN {
        return Err(ResolveError::InvalidAccountSize {
            expected: MINT_SPAN,
            actual: account.data.len(),
        });
    }

    MintState::decode(&account.data)
}
