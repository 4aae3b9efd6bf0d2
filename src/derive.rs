//! Program-derived address search and the protocol seed recipes
//!
//! Reimplements the chain's PDA derivation so every dependent address of a
//! liquidity pool can be computed locally: hash the seeds together with the
//! owning program id and a fixed domain marker, and walk the bump space
//! until the digest falls off the ed25519 curve. Off-curve is what makes
//! the address program-owned rather than spendable.

use curve25519_dalek::edwards::CompressedEdwardsY;
use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;

use crate::constants;
use crate::errors::{ResolveError, ResolveResult};

/// Domain marker appended after the program id when hashing PDA seeds
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Maximum length of a single seed in bytes
pub const MAX_SEED_LEN: usize = 32;

/// Maximum number of seeds in one derivation
pub const MAX_SEEDS: usize = 16;

/// Upper bound of the market vault-signer nonce search
const MAX_MARKET_AUTHORITY_NONCE: u64 = 100;

// Seed strings defined by the liquidity program. Each associated account of
// a pool is derived from (program id, market id, one of these).
const ID_ASSOCIATED_SEED: &[u8] = b"amm_associated_seed";
const AUTHORITY_ASSOCIATED_SEED: &[u8] = b"amm authority";
const BASE_VAULT_ASSOCIATED_SEED: &[u8] = b"coin_vault_associated_seed";
const QUOTE_VAULT_ASSOCIATED_SEED: &[u8] = b"pc_vault_associated_seed";
const LP_MINT_ASSOCIATED_SEED: &[u8] = b"lp_mint_associated_seed";
const LP_VAULT_ASSOCIATED_SEED: &[u8] = b"temp_lp_token_associated_seed";
const OPEN_ORDERS_ASSOCIATED_SEED: &[u8] = b"open_order_associated_seed";
const TARGET_ORDERS_ASSOCIATED_SEED: &[u8] = b"target_associated_seed";
const WITHDRAW_QUEUE_ASSOCIATED_SEED: &[u8] = b"withdraw_associated_seed";

/// Seed string for a farm ledger account, derived from (pool id, owner)
const FARM_LEDGER_ASSOCIATED_SEED: &[u8] = b"staker_info_v2_associated_seed";

/// Whether a 32-byte value decompresses to a valid ed25519 curve point
fn is_on_curve(bytes: &[u8; 32]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_some()
}

fn validate_seeds(seeds: &[&[u8]]) -> ResolveResult<()> {
    if seeds.len() > MAX_SEEDS {
        return Err(ResolveError::InvalidSeeds(format!(
            "too many seeds: {} > {}",
            seeds.len(),
            MAX_SEEDS
        )));
    }
    for seed in seeds {
        if seed.len() > MAX_SEED_LEN {
            return Err(ResolveError::InvalidSeeds(format!(
                "seed too long: {} > {} bytes",
                seed.len(),
                MAX_SEED_LEN
            )));
        }
    }
    Ok(())
}

fn hash_seeds(seeds: &[&[u8]], program_id: &Pubkey) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id.as_ref());
    hasher.update(PDA_MARKER);
    hasher.finalize().into()
}

/// Derive the program address for an exact seed set.
///
/// Fails with `InvalidSeeds` when the digest lands on the curve; callers
/// searching for a valid bump treat that as "try the next candidate".
pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> ResolveResult<Pubkey> {
    validate_seeds(seeds)?;
    let hash = hash_seeds(seeds, program_id);
    if is_on_curve(&hash) {
        return Err(ResolveError::InvalidSeeds(
            "derived address falls on the ed25519 curve".to_string(),
        ));
    }
    Ok(Pubkey::new_from_array(hash))
}

/// Find the first valid program address for a seed set.
///
/// Tries bump 255 down to 0, appending the bump as a one-byte trailing
/// seed, and accepts the first off-curve digest. Identical seeds and
/// program id always produce the identical (address, bump) pair.
pub fn find_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> ResolveResult<(Pubkey, u8)> {
    if seeds.len() >= MAX_SEEDS {
        return Err(ResolveError::InvalidSeeds(format!(
            "too many seeds: {} leaves no room for the bump",
            seeds.len()
        )));
    }
    validate_seeds(seeds)?;
    for bump in (0u8..=255).rev() {
        let bump_seed = [bump];
        let mut candidate: Vec<&[u8]> = seeds.to_vec();
        candidate.push(&bump_seed);
        let hash = hash_seeds(&candidate, program_id);
        if !is_on_curve(&hash) {
            return Ok((Pubkey::new_from_array(hash), bump));
        }
    }
    Err(ResolveError::DerivationExhausted {
        program_id: *program_id,
    })
}

fn associated_seed_address(
    program_id: &Pubkey,
    market_id: &Pubkey,
    associated_seed: &[u8],
) -> ResolveResult<Pubkey> {
    find_program_address(
        &[program_id.as_ref(), market_id.as_ref(), associated_seed],
        program_id,
    )
    .map(|(address, _)| address)
}

/// Pool id for a market under the given liquidity program
pub fn associated_id(program_id: &Pubkey, market_id: &Pubkey) -> ResolveResult<Pubkey> {
    associated_seed_address(program_id, market_id, ID_ASSOCIATED_SEED)
}

/// Pool authority of a liquidity program, shared by all of its pools
pub fn associated_authority(program_id: &Pubkey) -> ResolveResult<(Pubkey, u8)> {
    find_program_address(&[AUTHORITY_ASSOCIATED_SEED], program_id)
}

/// Base (coin) vault of the pool paired with a market
pub fn associated_base_vault(program_id: &Pubkey, market_id: &Pubkey) -> ResolveResult<Pubkey> {
    associated_seed_address(program_id, market_id, BASE_VAULT_ASSOCIATED_SEED)
}

/// Quote (pc) vault of the pool paired with a market
pub fn associated_quote_vault(program_id: &Pubkey, market_id: &Pubkey) -> ResolveResult<Pubkey> {
    associated_seed_address(program_id, market_id, QUOTE_VAULT_ASSOCIATED_SEED)
}

/// LP mint of the pool paired with a market
pub fn associated_lp_mint(program_id: &Pubkey, market_id: &Pubkey) -> ResolveResult<Pubkey> {
    associated_seed_address(program_id, market_id, LP_MINT_ASSOCIATED_SEED)
}

/// Temporary LP token vault of the pool paired with a market
pub fn associated_lp_vault(program_id: &Pubkey, market_id: &Pubkey) -> ResolveResult<Pubkey> {
    associated_seed_address(program_id, market_id, LP_VAULT_ASSOCIATED_SEED)
}

/// Open-orders bookkeeping account of the pool paired with a market
pub fn associated_open_orders(program_id: &Pubkey, market_id: &Pubkey) -> ResolveResult<Pubkey> {
    associated_seed_address(program_id, market_id, OPEN_ORDERS_ASSOCIATED_SEED)
}

/// Target-orders bookkeeping account of the pool paired with a market
pub fn associated_target_orders(program_id: &Pubkey, market_id: &Pubkey) -> ResolveResult<Pubkey> {
    associated_seed_address(program_id, market_id, TARGET_ORDERS_ASSOCIATED_SEED)
}

/// Withdraw queue of the pool paired with a market
pub fn associated_withdraw_queue(program_id: &Pubkey, market_id: &Pubkey) -> ResolveResult<Pubkey> {
    associated_seed_address(program_id, market_id, WITHDRAW_QUEUE_ASSOCIATED_SEED)
}

/// Market vault-signer authority.
///
/// The order-book program uses the opposite search direction: the nonce
/// counts up from 0 as a little-endian u64 seed, and the first exact
/// derivation that lands off-curve wins.
pub fn market_authority(program_id: &Pubkey, market_id: &Pubkey) -> ResolveResult<(Pubkey, u8)> {
    for nonce in 0..MAX_MARKET_AUTHORITY_NONCE {
        let nonce_seed = nonce.to_le_bytes();
        match create_program_address(&[market_id.as_ref(), &nonce_seed], program_id) {
            Ok(address) => return Ok((address, nonce as u8)),
            Err(ResolveError::InvalidSeeds(_)) => continue,
            Err(e) => return Err(e),
        }
    }
    Err(ResolveError::DerivationExhausted {
        program_id: *program_id,
    })
}

/// Canonical associated token account of (owner, mint) under the SPL Token
/// program
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> ResolveResult<Pubkey> {
    associated_token_address_with_program(owner, mint, &constants::token_program())
}

/// Associated token account of (owner, mint) for an explicit token program.
///
/// The token program id is always the middle seed. Omitting it yields a
/// syntactically valid but wrong address, so the recipe is pinned by a
/// regression test below.
pub fn associated_token_address_with_program(
    owner: &Pubkey,
    mint: &Pubkey,
    token_program_id: &Pubkey,
) -> ResolveResult<Pubkey> {
    find_program_address(
        &[owner.as_ref(), token_program_id.as_ref(), mint.as_ref()],
        &constants::associated_token_program(),
    )
    .map(|(address, _)| address)
}

/// Farm ledger account of (farm pool, owner) under a farm program
pub fn farm_ledger_address(
    farm_program_id: &Pubkey,
    farm_pool_id: &Pubkey,
    owner: &Pubkey,
) -> ResolveResult<Pubkey> {
    find_program_address(
        &[
            farm_pool_id.as_ref(),
            owner.as_ref(),
            FARM_LEDGER_ASSOCIATED_SEED,
        ],
        farm_program_id,
    )
    .map(|(address, _)| address)
}

/// Derived key set of one pool, before any on-chain data is consulted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociatedPoolKeys {
    pub id: Pubkey,
    pub authority: Pubkey,
    pub nonce: u8,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub lp_mint: Pubkey,
    pub lp_vault: Pubkey,
    pub open_orders: Pubkey,
    pub target_orders: Pubkey,
    pub withdraw_queue: Pubkey,
    pub market_authority: Pubkey,
}

/// Compute every derived address of the pool paired with `market_id`.
///
/// `program_id` must be the liquidity program that owns the pool and
/// `market_program_id` the order-book program that owns the market;
/// swapping them produces valid-looking but wrong addresses.
pub fn associated_pool_keys(
    program_id: &Pubkey,
    market_program_id: &Pubkey,
    market_id: &Pubkey,
) -> ResolveResult<AssociatedPoolKeys> {
    let id = associated_id(program_id, market_id)?;
    let (authority, nonce) = associated_authority(program_id)?;
    let base_vault = associated_base_vault(program_id, market_id)?;
    let quote_vault = associated_quote_vault(program_id, market_id)?;
    let lp_mint = associated_lp_mint(program_id, market_id)?;
    let lp_vault = associated_lp_vault(program_id, market_id)?;
    let open_orders = associated_open_orders(program_id, market_id)?;
    let target_orders = associated_target_orders(program_id, market_id)?;
    let withdraw_queue = associated_withdraw_queue(program_id, market_id)?;
    let (market_authority, _) = market_authority(market_program_id, market_id)?;

    Ok(AssociatedPoolKeys {
        id,
        authority,
        nonce,
        base_vault,
        quote_vault,
        lp_mint,
        lp_vault,
        open_orders,
        target_orders,
        withdraw_queue,
        market_authority,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    /// Well-known authority of the mainnet AMM v4 program
    const AMM_V4_AUTHORITY: &str = "5Q544fKrFoe6tsEbD7S8EmxGTJYAKtTVhAW5Q5pge4j1";

    #[test]
    fn test_find_program_address_matches_sdk() {
        let program = Pubkey::new_unique();
        let market = Pubkey::new_unique();
        let seed_sets: Vec<Vec<&[u8]>> = vec![
            vec![b"amm authority"],
            vec![program.as_ref(), market.as_ref(), ID_ASSOCIATED_SEED],
            vec![market.as_ref()],
        ];

        for seeds in seed_sets {
            let (ours, our_bump) = find_program_address(&seeds, &program).unwrap();
            let (sdk, sdk_bump) = Pubkey::find_program_address(&seeds, &program);
            assert_eq!(ours, sdk);
            assert_eq!(our_bump, sdk_bump);
        }
    }

    #[test]
    fn test_find_program_address_is_deterministic() {
        let program = constants::liquidity_program_v4();
        let market = Pubkey::new_unique();
        let a = associated_id(&program, &market).unwrap();
        let b = associated_id(&program, &market).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_derived_addresses_are_off_curve() {
        let program = Pubkey::new_unique();
        let (address, _) = find_program_address(&[b"some seed"], &program).unwrap();
        // Independent check through the SDK's curve decompression
        assert!(!address.is_on_curve());
    }

    #[test]
    fn test_create_program_address_round_trips_bump() {
        let program = Pubkey::new_unique();
        let seeds: Vec<&[u8]> = vec![b"vault", b"state"];
        let (expected, bump) = find_program_address(&seeds, &program).unwrap();

        let bump_seed = [bump];
        let mut with_bump = seeds.clone();
        with_bump.push(&bump_seed);
        assert_eq!(create_program_address(&with_bump, &program).unwrap(), expected);

        let sdk = Pubkey::create_program_address(&with_bump, &program).unwrap();
        assert_eq!(sdk, expected);
    }

    #[test]
    fn test_amm_authority_fixture() {
        let (authority, _) = associated_authority(&constants::liquidity_program_v4()).unwrap();
        assert_eq!(authority, Pubkey::from_str(AMM_V4_AUTHORITY).unwrap());
    }

    #[test]
    fn test_seed_validation() {
        let program = Pubkey::new_unique();
        let long = [0u8; 33];
        assert!(matches!(
            find_program_address(&[&long], &program),
            Err(ResolveError::InvalidSeeds(_))
        ));

        let seed: &[u8] = b"s";
        let too_many: Vec<&[u8]> = vec![seed; 17];
        assert!(matches!(
            create_program_address(&too_many, &program),
            Err(ResolveError::InvalidSeeds(_))
        ));
    }

    #[test]
    fn test_associated_token_address_matches_spl_crate() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ours = associated_token_address(&owner, &mint).unwrap();
        let spl = spl_associated_token_account::get_associated_token_address(&owner, &mint);
        assert_eq!(ours, spl);
    }

    #[test]
    fn test_associated_token_address_includes_token_program_seed() {
        // The canonical recipe hashes (owner, token program, mint). A
        // derivation that drops the middle seed must not match.
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let canonical = associated_token_address(&owner, &mint).unwrap();
        let (without_program_seed, _) = find_program_address(
            &[owner.as_ref(), mint.as_ref()],
            &constants::associated_token_program(),
        )
        .unwrap();
        assert_ne!(canonical, without_program_seed);
    }

    #[test]
    fn test_market_authority_matches_sdk_create() {
        let market_program = constants::serum_program_v3();
        let market = Pubkey::new_unique();
        let (authority, nonce) = market_authority(&market_program, &market).unwrap();

        let nonce_seed = (nonce as u64).to_le_bytes();
        let sdk =
            Pubkey::create_program_address(&[market.as_ref(), &nonce_seed], &market_program)
                .unwrap();
        assert_eq!(authority, sdk);
        assert!(!authority.is_on_curve());
    }

    #[test]
    fn test_farm_ledger_address_is_stable() {
        let farm_program = constants::farm_program_v3();
        let pool = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let a = farm_ledger_address(&farm_program, &pool, &owner).unwrap();
        let b = farm_ledger_address(&farm_program, &pool, &owner).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, farm_ledger_address(&farm_program, &owner, &pool).unwrap());
    }

    #[test]
    fn test_associated_pool_keys_complete() {
        let program = constants::liquidity_program_v4();
        let market_program = constants::serum_program_v3();
        let market = Pubkey::new_unique();

        let keys = associated_pool_keys(&program, &market_program, &market).unwrap();
        assert_eq!(keys.id, associated_id(&program, &market).unwrap());
        assert_eq!(
            keys.market_authority,
            market_authority(&market_program, &market).unwrap().0
        );
        // All addresses in the set are distinct
        let all = [
            keys.id,
            keys.authority,
            keys.base_vault,
            keys.quote_vault,
            keys.lp_mint,
            keys.lp_vault,
            keys.open_orders,
            keys.target_orders,
            keys.withdraw_queue,
            keys.market_authority,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
