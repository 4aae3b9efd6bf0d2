//! Resolution of liquidity pool key sets and owner token accounts
//!
//! Given a handful of seed identifiers (program ids, a market id, mint
//! ids) this crate derives every dependent account address the AMM
//! protocol requires, fetches the raw account bytes and decodes them
//! into typed records. Transaction construction, signing and wallet
//! handling live upstream; nothing here writes to the chain.

pub mod constants;
pub mod derive;
pub mod errors;
pub mod farm;
pub mod layout;
pub mod pool_keys;
pub mod rpc;
pub mod tokens;

pub use errors::{ResolveError, ResolveResult};
pub use pool_keys::{fetch_all_pool_keys, fetch_pool_keys, PoolKeySet};
