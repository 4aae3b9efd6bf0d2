//! Order-book market state layout
//!
//! The order-book program wraps every account in a 5-byte head and 7-byte
//! tail marker. V1 is the original 380-byte market state; V2 and V3 share
//! the 388-byte layout that appends the referrer rebate accumulator.

use solana_sdk::pubkey::Pubkey;

use super::{check_span, ByteReader, ByteWriter};
use crate::errors::{ResolveError, ResolveResult};

/// Byte span of a v1 market state account
pub const MARKET_STATE_SPAN_V1: usize = 380;

/// Byte span of a v2/v3 market state account
pub const MARKET_STATE_SPAN_V3: usize = 388;

const HEAD_PADDING: &[u8; 5] = b"serum";
const TAIL_PADDING: &[u8; 7] = b"padding";

/// Decoded order-book market state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketState {
    pub version: u8,
    pub account_flags: u64,
    pub own_address: Pubkey,
    pub vault_signer_nonce: u64,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub base_vault: Pubkey,
    pub base_deposits_total: u64,
    pub base_fees_accrued: u64,
    pub quote_vault: Pubkey,
    pub quote_deposits_total: u64,
    pub quote_fees_accrued: u64,
    pub quote_dust_threshold: u64,
    pub request_queue: Pubkey,
    pub event_queue: Pubkey,
    pub bids: Pubkey,
    pub asks: Pubkey,
    pub base_lot_size: u64,
    pub quote_lot_size: u64,
    pub fee_rate_bps: u64,
    /// Zero for v1 layouts, which predate referrer rebates
    pub referrer_rebates_accrued: u64,
}

impl MarketState {
    /// Fixed byte span of the layout for a market version
    pub fn span(version: u8) -> ResolveResult<usize> {
        match version {
            1 => Ok(MARKET_STATE_SPAN_V1),
            2 | 3 => Ok(MARKET_STATE_SPAN_V3),
            other => Err(ResolveError::UnsupportedVersion {
                kind: "market",
                version: other,
            }),
        }
    }

    pub fn decode(version: u8, data: &[u8]) -> ResolveResult<Self> {
        let span = Self::span(version)?;
        check_span(span, data)?;
        if &data[..5] != HEAD_PADDING {
            return Err(ResolveError::InvalidAccountData(
                "missing market head padding".to_string(),
            ));
        }
        if &data[span - 7..] != TAIL_PADDING {
            return Err(ResolveError::InvalidAccountData(
                "missing market tail padding".to_string(),
            ));
        }

        let mut r = ByteReader::new(data);
        r.skip(5);
        let account_flags = r.read_u64();
        let own_address = r.read_pubkey();
        let vault_signer_nonce = r.read_u64();
        let base_mint = r.read_pubkey();
        let quote_mint = r.read_pubkey();
        let base_vault = r.read_pubkey();
        let base_deposits_total = r.read_u64();
        let base_fees_accrued = r.read_u64();
        let quote_vault = r.read_pubkey();
        let quote_deposits_total = r.read_u64();
        let quote_fees_accrued = r.read_u64();
        let quote_dust_threshold = r.read_u64();
        let request_queue = r.read_pubkey();
        let event_queue = r.read_pubkey();
        let bids = r.read_pubkey();
        let asks = r.read_pubkey();
        let base_lot_size = r.read_u64();
        let quote_lot_size = r.read_u64();
        let fee_rate_bps = r.read_u64();
        let referrer_rebates_accrued = if version >= 2 { r.read_u64() } else { 0 };
        r.skip(7);
        debug_assert_eq!(r.remaining(), 0);

        Ok(Self {
            version,
            account_flags,
            own_address,
            vault_signer_nonce,
            base_mint,
            quote_mint,
            base_vault,
            base_deposits_total,
            base_fees_accrued,
            quote_vault,
            quote_deposits_total,
            quote_fees_accrued,
            quote_dust_threshold,
            request_queue,
            event_queue,
            bids,
            asks,
            base_lot_size,
            quote_lot_size,
            fee_rate_bps,
            referrer_rebates_accrued,
        })
    }

    pub fn encode(&self) -> ResolveResult<Vec<u8>> {
        let span = Self::span(self.version)?;
        let mut w = ByteWriter::with_span(span);

        w.write_bytes(HEAD_PADDING);
        w.write_u64(self.account_flags);
        w.write_pubkey(&self.own_address);
        w.write_u64(self.vault_signer_nonce);
        w.write_pubkey(&self.base_mint);
        w.write_pubkey(&self.quote_mint);
        w.write_pubkey(&self.base_vault);
        w.write_u64(self.base_deposits_total);
        w.write_u64(self.base_fees_accrued);
        w.write_pubkey(&self.quote_vault);
        w.write_u64(self.quote_deposits_total);
        w.write_u64(self.quote_fees_accrued);
        w.write_u64(self.quote_dust_threshold);
        w.write_pubkey(&self.request_queue);
        w.write_pubkey(&self.event_queue);
        w.write_pubkey(&self.bids);
        w.write_pubkey(&self.asks);
        w.write_u64(self.base_lot_size);
        w.write_u64(self.quote_lot_size);
        w.write_u64(self.fee_rate_bps);
        if self.version >= 2 {
            w.write_u64(self.referrer_rebates_accrued);
        }
        w.write_bytes(TAIL_PADDING);

        Ok(w.finish(span))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn market_state(version: u8) -> MarketState {
        MarketState {
            version,
            account_flags: 3,
            own_address: Pubkey::new_unique(),
            vault_signer_nonce: 1,
            base_mint: Pubkey::new_unique(),
            quote_mint: Pubkey::new_unique(),
            base_vault: Pubkey::new_unique(),
            base_deposits_total: 1000,
            base_fees_accrued: 10,
            quote_vault: Pubkey::new_unique(),
            quote_deposits_total: 2000,
            quote_fees_accrued: 20,
            quote_dust_threshold: 100,
            request_queue: Pubkey::new_unique(),
            event_queue: Pubkey::new_unique(),
            bids: Pubkey::new_unique(),
            asks: Pubkey::new_unique(),
            base_lot_size: 100000,
            quote_lot_size: 100,
            fee_rate_bps: 0,
            referrer_rebates_accrued: if version >= 2 { 42 } else { 0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::market_state as sample_market;
    use super::*;

    #[test]
    fn test_round_trip_v3() {
        let market = sample_market(3);
        let bytes = market.encode().unwrap();
        assert_eq!(bytes.len(), MARKET_STATE_SPAN_V3);
        let decoded = MarketState::decode(3, &bytes).unwrap();
        assert_eq!(decoded, market);
        assert_eq!(decoded.encode().unwrap(), bytes);
    }

    #[test]
    fn test_round_trip_v1() {
        let market = sample_market(1);
        let bytes = market.encode().unwrap();
        assert_eq!(bytes.len(), MARKET_STATE_SPAN_V1);
        let decoded = MarketState::decode(1, &bytes).unwrap();
        assert_eq!(decoded, market);
    }

    #[test]
    fn test_size_guard() {
        let bytes = sample_market(3).encode().unwrap();
        assert_eq!(
            MarketState::decode(1, &bytes),
            Err(ResolveError::InvalidAccountSize {
                expected: MARKET_STATE_SPAN_V1,
                actual: MARKET_STATE_SPAN_V3,
            })
        );
    }

    #[test]
    fn test_unknown_version_rejected() {
        let bytes = vec![0u8; MARKET_STATE_SPAN_V3];
        assert!(matches!(
            MarketState::decode(4, &bytes),
            Err(ResolveError::UnsupportedVersion {
                kind: "market",
                ..
            })
        ));
    }

    #[test]
    fn test_padding_markers_checked() {
        let mut bytes = sample_market(3).encode().unwrap();
        bytes[0] = b'x';
        assert!(matches!(
            MarketState::decode(3, &bytes),
            Err(ResolveError::InvalidAccountData(_))
        ));
    }
}
