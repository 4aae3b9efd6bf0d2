/// Global constants used across the pool-keys crate
///
/// This module contains the well-known program and mint addresses that are
/// not configurable and are used across multiple modules.

use once_cell::sync::Lazy;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

// ============================================================================
// SOLANA BLOCKCHAIN CONSTANTS
// ============================================================================

/// SOL token mint address (wrapped SOL / WSOL)
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// USDC mint address
pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

/// SPL Token program
pub const SPL_TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";

/// Associated Token Account program
pub const ASSOCIATED_TOKEN_PROGRAM_ID: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";

// ============================================================================
// RAYDIUM / SERUM PROGRAM CONSTANTS (mainnet-beta)
// ============================================================================

/// Raydium liquidity pool program, AMM v4
pub const LIQUIDITY_PROGRAM_ID_V4: &str = "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8";

/// Serum order-book program, DEX v3
pub const SERUM_PROGRAM_ID_V3: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";

/// Raydium farm / staking program v3
pub const FARM_PROGRAM_ID_V3: &str = "EhhTKczWMGQt46ynNeRX1WfeagwwJd7ufHvCDjRxjo5Q";

/// Raydium fusion farm program v5
pub const FARM_PROGRAM_ID_V5: &str = "9KEPoZmtHUrBbhWN1v1KWLMkkvwY6WLtAVUCPRtRjP4z";

// Devnet deployments of the same programs, kept for integration runs
// against a non-production cluster.
pub const DEVNET_LIQUIDITY_PROGRAM_ID_V4: &str = "9rpQHSyFVM1dkkHFQ2TtTzPEW7DVmEyPmN8wVniqJtuC";
pub const DEVNET_SERUM_PROGRAM_ID_V3: &str = "DESVgJVGajEgKGXhb6XmqDHGz3VjdgP7rEVESBgxmroY";

// ============================================================================
// PARSED PUBKEY ACCESSORS
// ============================================================================

static LIQUIDITY_V4: Lazy<Pubkey> = Lazy::new(|| {
    Pubkey::from_str(LIQUIDITY_PROGRAM_ID_V4).expect("Invalid liquidity program ID")
});

static SERUM_V3: Lazy<Pubkey> =
    Lazy::new(|| Pubkey::from_str(SERUM_PROGRAM_ID_V3).expect("Invalid serum program ID"));

static TOKEN_PROGRAM: Lazy<Pubkey> =
    Lazy::new(|| Pubkey::from_str(SPL_TOKEN_PROGRAM_ID).expect("Invalid SPL Token program ID"));

static ASSOCIATED_TOKEN_PROGRAM: Lazy<Pubkey> = Lazy::new(|| {
    Pubkey::from_str(ASSOCIATED_TOKEN_PROGRAM_ID).expect("Invalid Associated Token program ID")
});

static FARM_V3: Lazy<Pubkey> =
    Lazy::new(|| Pubkey::from_str(FARM_PROGRAM_ID_V3).expect("Invalid farm v3 program ID"));

static FARM_V5: Lazy<Pubkey> =
    Lazy::new(|| Pubkey::from_str(FARM_PROGRAM_ID_V5).expect("Invalid farm v5 program ID"));

/// Raydium AMM v4 program id
pub fn liquidity_program_v4() -> Pubkey {
    *LIQUIDITY_V4
}

/// Serum DEX v3 program id
pub fn serum_program_v3() -> Pubkey {
    *SERUM_V3
}

/// SPL Token program id
pub fn token_program() -> Pubkey {
    *TOKEN_PROGRAM
}

/// Associated Token Account program id
pub fn associated_token_program() -> Pubkey {
    *ASSOCIATED_TOKEN_PROGRAM
}

/// Raydium farm v3 program id
pub fn farm_program_v3() -> Pubkey {
    *FARM_V3
}

/// Raydium farm v5 program id
pub fn farm_program_v5() -> Pubkey {
    *FARM_V5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_ids_parse() {
        // Forces every Lazy through Pubkey::from_str
        assert_ne!(liquidity_program_v4(), Pubkey::default());
        assert_ne!(serum_program_v3(), Pubkey::default());
        assert_ne!(token_program(), Pubkey::default());
        assert_ne!(associated_token_program(), Pubkey::default());
        assert_ne!(farm_program_v3(), Pubkey::default());
        assert_ne!(farm_program_v5(), Pubkey::default());
    }

    #[test]
    fn test_token_program_matches_spl_crate() {
        assert_eq!(token_program(), spl_token::id());
    }
}
