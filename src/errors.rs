use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Error type for address derivation, account decoding and key resolution.
///
/// Bulk resolution paths convert per-pool errors into omissions; single
/// entity paths surface them directly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("no valid program address found for seeds under {program_id}")]
    DerivationExhausted { program_id: Pubkey },

    #[error("invalid seeds: {0}")] InvalidSeeds(String),

    #[error("invalid account size: expected {expected} bytes, got {actual}")] InvalidAccountSize {
        expected: usize,
        actual: usize,
    },

    #[error("unsupported {kind} version: {version}")] UnsupportedVersion {
        kind: &'static str,
        version: u8,
    },

    #[error("account not found: {0}")] AccountNotFound(Pubkey),

    #[error("pool {0} is uninitialized")] PoolUninitialized(Pubkey),

    #[error("account {address} is owned by unexpected program {owner}")] WrongAccountOwner {
        address: Pubkey,
        owner: Pubkey,
    },

    #[error("invalid account data: {0}")] InvalidAccountData(String),

    #[error("RPC error: {0}")] Rpc(String),
}

impl ResolveError {
    /// Whether the error indicates a missing account rather than bad data.
    ///
    /// Callers typically treat a missing account as "needs creation".
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::AccountNotFound(_))
    }
}

pub type ResolveResult<T> = std::result::Result<T, ResolveError>;
