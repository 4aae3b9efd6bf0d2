//! SPL token account and mint layouts
//!
//! Both records use the token program's `COption` wire form for optional
//! fields: a 4-byte little-endian presence tag followed by the value
//! bytes, which are ignored when the tag is zero.

use solana_sdk::pubkey::Pubkey;

use super::{check_span, ByteReader, ByteWriter};
use crate::errors::ResolveResult;

/// Byte span of an SPL token account
pub const TOKEN_ACCOUNT_SPAN: usize = 165;

/// Byte span of an SPL mint account
pub const MINT_SPAN: usize = 82;

/// Token account state values; 2 marks a frozen account
pub const ACCOUNT_STATE_UNINITIALIZED: u8 = 0;
pub const ACCOUNT_STATE_INITIALIZED: u8 = 1;
pub const ACCOUNT_STATE_FROZEN: u8 = 2;

/// Decoded SPL token account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccountState {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub delegate: Option<Pubkey>,
    pub state: u8,
    /// Rent-exempt reserve when the account wraps native SOL
    pub is_native: Option<u64>,
    pub delegated_amount: u64,
    pub close_authority: Option<Pubkey>,
}

impl TokenAccountState {
    pub fn is_initialized(&self) -> bool {
        self.state != ACCOUNT_STATE_UNINITIALIZED
    }

    pub fn is_frozen(&self) -> bool {
        self.state == ACCOUNT_STATE_FROZEN
    }

    pub fn decode(data: &[u8]) -> ResolveResult<Self> {
        check_span(TOKEN_ACCOUNT_SPAN, data)?;
        let mut r = ByteReader::new(data);

        let mint = r.read_pubkey();
        let owner = r.read_pubkey();
        let amount = r.read_u64();
        let delegate = r.read_coption_pubkey()?;
        let state = r.read_u8();
        let is_native = r.read_coption_u64()?;
        let delegated_amount = r.read_u64();
        let close_authority = r.read_coption_pubkey()?;
        debug_assert_eq!(r.remaining(), 0);

        Ok(Self {
            mint,
            owner,
            amount,
            delegate,
            state,
            is_native,
            delegated_amount,
            close_authority,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_span(TOKEN_ACCOUNT_SPAN);
        w.write_pubkey(&self.mint);
        w.write_pubkey(&self.owner);
        w.write_u64(self.amount);
        w.write_coption_pubkey(&self.delegate);
        w.write_u8(self.state);
        w.write_coption_u64(&self.is_native);
        w.write_u64(self.delegated_amount);
        w.write_coption_pubkey(&self.close_authority);
        w.finish(TOKEN_ACCOUNT_SPAN)
    }
}

/// Decoded SPL mint account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintState {
    pub mint_authority: Option<Pubkey>,
    pub supply: u64,
    pub decimals: u8,
    pub is_initialized: bool,
    pub freeze_authority: Option<Pubkey>,
}

impl MintState {
    pub fn decode(data: &[u8]) -> ResolveResult<Self> {
        check_span(MINT_SPAN, data)?;
        let mut r = ByteReader::new(data);

        let mint_authority = r.read_coption_pubkey()?;
        let supply = r.read_u64();
        let decimals = r.read_u8();
        let is_initialized = r.read_u8() != 0;
        let freeze_authority = r.read_coption_pubkey()?;
        debug_assert_eq!(r.remaining(), 0);

        Ok(Self {
            mint_authority,
            supply,
            decimals,
            is_initialized,
            freeze_authority,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = ByteWriter::with_span(MINT_SPAN);
        w.write_coption_pubkey(&self.mint_authority);
        w.write_u64(self.supply);
        w.write_u8(self.decimals);
        w.write_u8(self.is_initialized as u8);
        w.write_coption_pubkey(&self.freeze_authority);
        w.finish(MINT_SPAN)
    }
}
