//! Liquidity pool state layout
//!
//! Mirrors the AMM program's on-chain `AmmInfo` account byte-for-byte.
//! V4 is the full 752-byte layout; V3 is the same field set without the
//! withdraw queue and temporary LP vault. A status of zero marks an
//! uninitialized pool and such records are excluded from every bulk
//! resolution path.

use solana_sdk::pubkey::Pubkey;

use super::{check_span, ByteReader, ByteWriter};
use crate::errors::{ResolveError, ResolveResult};

/// Byte span of the v4 pool state account
pub const LIQUIDITY_STATE_SPAN_V4: usize = 752;

/// Byte span of the v3 pool state account (no withdraw queue / lp vault)
pub const LIQUIDITY_STATE_SPAN_V3: usize = 688;

/// Decoded liquidity pool state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiquidityState {
    pub version: u8,
    pub status: u64,
    pub nonce: u64,
    pub max_order: u64,
    pub depth: u64,
    pub base_decimal: u64,
    pub quote_decimal: u64,
    pub state: u64,
    pub reset_flag: u64,
    pub min_size: u64,
    pub vol_max_cut_ratio: u64,
    pub amount_wave_ratio: u64,
    pub base_lot_size: u64,
    pub quote_lot_size: u64,
    pub min_price_multiplier: u64,
    pub max_price_multiplier: u64,
    pub system_decimal_value: u64,
    pub min_separate_numerator: u64,
    pub min_separate_denominator: u64,
    pub trade_fee_numerator: u64,
    pub trade_fee_denominator: u64,
    pub pnl_numerator: u64,
    pub pnl_denominator: u64,
    pub swap_fee_numerator: u64,
    pub swap_fee_denominator: u64,
    pub base_need_take_pnl: u64,
    pub quote_need_take_pnl: u64,
    pub quote_total_pnl: u64,
    pub base_total_pnl: u64,
    pub pool_open_time: u64,
    pub punish_pc_amount: u64,
    pub punish_coin_amount: u64,
    pub orderbook_to_init_time: u64,
    pub swap_base_in_amount: u128,
    pub swap_quote_out_amount: u128,
    pub swap_base2_quote_fee: u64,
    pub swap_quote_in_amount: u128,
    pub swap_base_out_amount: u128,
    pub swap_quote2_base_fee: u64,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub lp_mint: Pubkey,
    pub open_orders: Pubkey,
    pub market_id: Pubkey,
    pub market_program_id: Pubkey,
    pub target_orders: Pubkey,
    /// Default for v3 layouts, which carry no withdraw queue
    pub withdraw_queue: Pubkey,
    /// Default for v3 layouts, which carry no temporary lp vault
    pub lp_vault: Pubkey,
    pub owner: Pubkey,
    pub lp_reserve: u64,
    pub padding: [u64; 3],
}

impl LiquidityState {
    /// Fixed byte span of the layout for a pool version
    pub fn span(version: u8) -> ResolveResult<usize> {
        match version {
            3 => Ok(LIQUIDITY_STATE_SPAN_V3),
            4 => Ok(LIQUIDITY_STATE_SPAN_V4),
            other => Err(ResolveError::UnsupportedVersion {
                kind: "liquidity",
                version: other,
            }),
        }
    }

    /// Whether the pool has been initialized on-chain
    pub fn is_initialized(&self) -> bool {
        self.status != 0
    }

    /// Withdraw queue when the layout version carries one
    pub fn withdraw_queue(&self) -> Option<Pubkey> {
        (self.version >= 4).then_some(self.withdraw_queue)
    }

    /// Temporary lp vault when the layout version carries one
    pub fn lp_vault(&self) -> Option<Pubkey> {
        (self.version >= 4).then_some(self.lp_vault)
    }

    pub fn decode(version: u8, data: &[u8]) -> ResolveResult<Self> {
        let span = Self::span(version)?;
        check_span(span, data)?;
        let mut r = ByteReader::new(data);

        let status = r.read_u64();
        let nonce = r.read_u64();
        let max_order = r.read_u64();
        let depth = r.read_u64();
        let base_decimal = r.read_u64();
        let quote_decimal = r.read_u64();
        let state = r.read_u64();
        let reset_flag = r.read_u64();
        let min_size = r.read_u64();
        let vol_max_cut_ratio = r.read_u64();
        let amount_wave_ratio = r.read_u64();
        let base_lot_size = r.read_u64();
        let quote_lot_size = r.read_u64();
        let min_price_multiplier = r.read_u64();
        let max_price_multiplier = r.read_u64();
        let system_decimal_value = r.read_u64();
        let min_separate_numerator = r.read_u64();
        let min_separate_denominator = r.read_u64();
        let trade_fee_numerator = r.read_u64();
        let trade_fee_denominator = r.read_u64();
        let pnl_numerator = r.read_u64();
        let pnl_denominator = r.read_u64();
        let swap_fee_numerator = r.read_u64();
        let swap_fee_denominator = r.read_u64();
        let base_need_take_pnl = r.read_u64();
        let quote_need_take_pnl = r.read_u64();
        let quote_total_pnl = r.read_u64();
        let base_total_pnl = r.read_u64();
        let pool_open_time = r.read_u64();
        let punish_pc_amount = r.read_u64();
        let punish_coin_amount = r.read_u64();
        let orderbook_to_init_time = r.read_u64();
        let swap_base_in_amount = r.read_u128();
        let swap_quote_out_amount = r.read_u128();
        let swap_base2_quote_fee = r.read_u64();
        let swap_quote_in_amount = r.read_u128();
        let swap_base_out_amount = r.read_u128();
        let swap_quote2_base_fee = r.read_u64();
        let base_vault = r.read_pubkey();
        let quote_vault = r.read_pubkey();
        let base_mint = r.read_pubkey();
        let quote_mint = r.read_pubkey();
        let lp_mint = r.read_pubkey();
        let open_orders = r.read_pubkey();
        let market_id = r.read_pubkey();
        let market_program_id = r.read_pubkey();
        let target_orders = r.read_pubkey();
        let (withdraw_queue, lp_vault) = if version >= 4 {
            (r.read_pubkey(), r.read_pubkey())
        } else {
            (Pubkey::default(), Pubkey::default())
        };
        let owner = r.read_pubkey();
        let lp_reserve = r.read_u64();
        let padding = [r.read_u64(), r.read_u64(), r.read_u64()];
        debug_assert_eq!(r.remaining(), 0);

        Ok(Self {
            version,
            status,
            nonce,
            max_order,
            depth,
            base_decimal,
            quote_decimal,
            state,
            reset_flag,
            min_size,
            vol_max_cut_ratio,
            amount_wave_ratio,
            base_lot_size,
            quote_lot_size,
            min_price_multiplier,
            max_price_multiplier,
            system_decimal_value,
            min_separate_numerator,
            min_separate_denominator,
            trade_fee_numerator,
            trade_fee_denominator,
            pnl_numerator,
            pnl_denominator,
            swap_fee_numerator,
            swap_fee_denominator,
            base_need_take_pnl,
            quote_need_take_pnl,
            quote_total_pnl,
            base_total_pnl,
            pool_open_time,
            punish_pc_amount,
            punish_coin_amount,
            orderbook_to_init_time,
            swap_base_in_amount,
            swap_quote_out_amount,
            swap_base2_quote_fee,
            swap_quote_in_amount,
            swap_base_out_amount,
            swap_quote2_base_fee,
            base_vault,
            quote_vault,
            base_mint,
            quote_mint,
            lp_mint,
            open_orders,
            market_id,
            market_program_id,
            target_orders,
            withdraw_queue,
            lp_vault,
            owner,
            lp_reserve,
            padding,
        })
    }

    pub fn encode(&self) -> ResolveResult<Vec<u8>> {
        let span = Self::span(self.version)?;
        let mut w = ByteWriter::with_span(span);

        w.write_u64(self.status);
        w.write_u64(self.nonce);
        w.write_u64(self.max_order);
        w.write_u64(self.depth);
        w.write_u64(self.base_decimal);
        w.write_u64(self.quote_decimal);
        w.write_u64(self.state);
        w.write_u64(self.reset_flag);
        w.write_u64(self.min_size);
        w.write_u64(self.vol_max_cut_ratio);
        w.write_u64(self.amount_wave_ratio);
        w.write_u64(self.base_lot_size);
        w.write_u64(self.quote_lot_size);
        w.write_u64(self.min_price_multiplier);
        w.write_u64(self.max_price_multiplier);
        w.write_u64(self.system_decimal_value);
        w.write_u64(self.min_separate_numerator);
        w.write_u64(self.min_separate_denominator);
        w.write_u64(self.trade_fee_numerator);
        w.write_u64(self.trade_fee_denominator);
        w.write_u64(self.pnl_numerator);
        w.write_u64(self.pnl_denominator);
        w.write_u64(self.swap_fee_numerator);
        w.write_u64(self.swap_fee_denominator);
        w.write_u64(self.base_need_take_pnl);
        w.write_u64(self.quote_need_take_pnl);
        w.write_u64(self.quote_total_pnl);
        w.write_u64(self.base_total_pnl);
        w.write_u64(self.pool_open_time);
        w.write_u64(self.punish_pc_amount);
        w.write_u64(self.punish_coin_amount);
        w.write_u64(self.orderbook_to_init_time);
        w.write_u128(self.swap_base_in_amount);
        w.write_u128(self.swap_quote_out_amount);
        w.write_u64(self.swap_base2_quote_fee);
        w.write_u128(self.swap_quote_in_amount);
        w.write_u128(self.swap_base_out_amount);
        w.write_u64(self.swap_quote2_base_fee);
        w.write_pubkey(&self.base_vault);
        w.write_pubkey(&self.quote_vault);
        w.write_pubkey(&self.base_mint);
        w.write_pubkey(&self.quote_mint);
        w.write_pubkey(&self.lp_mint);
        w.write_pubkey(&self.open_orders);
        w.write_pubkey(&self.market_id);
        w.write_pubkey(&self.market_program_id);
        w.write_pubkey(&self.target_orders);
        if self.version >= 4 {
            w.write_pubkey(&self.withdraw_queue);
            w.write_pubkey(&self.lp_vault);
        }
        w.write_pubkey(&self.owner);
        w.write_u64(self.lp_reserve);
        for pad in self.padding {
            w.write_u64(pad);
        }

        Ok(w.finish(span))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn liquidity_state(version: u8, status: u64) -> LiquidityState {
        LiquidityState {
            version,
            status,
            nonce: 254,
            max_order: 7,
            depth: 3,
            base_decimal: 9,
            quote_decimal: 6,
            state: 1,
            reset_flag: 0,
            min_size: 1,
            vol_max_cut_ratio: 500,
            amount_wave_ratio: 5000000,
            base_lot_size: 1000000,
            quote_lot_size: 1000,
            min_price_multiplier: 1,
            max_price_multiplier: 1000000000,
            system_decimal_value: 1000000000,
            min_separate_numerator: 5,
            min_separate_denominator: 10000,
            trade_fee_numerator: 25,
            trade_fee_denominator: 10000,
            pnl_numerator: 12,
            pnl_denominator: 100,
            swap_fee_numerator: 25,
            swap_fee_denominator: 10000,
            base_need_take_pnl: 11,
            quote_need_take_pnl: 22,
            quote_total_pnl: 33,
            base_total_pnl: 44,
            pool_open_time: 1660000000,
            punish_pc_amount: 0,
            punish_coin_amount: 0,
            orderbook_to_init_time: 0,
            swap_base_in_amount: 123456789012345678901,
            swap_quote_out_amount: 987654321098765432109,
            swap_base2_quote_fee: 555,
            swap_quote_in_amount: 111111111111111111111,
            swap_base_out_amount: 222222222222222222222,
            swap_quote2_base_fee: 666,
            base_vault: Pubkey::new_unique(),
            quote_vault: Pubkey::new_unique(),
            base_mint: Pubkey::new_unique(),
            quote_mint: Pubkey::new_unique(),
            lp_mint: Pubkey::new_unique(),
            open_orders: Pubkey::new_unique(),
            market_id: Pubkey::new_unique(),
            market_program_id: Pubkey::new_unique(),
            target_orders: Pubkey::new_unique(),
            withdraw_queue: if version >= 4 { Pubkey::new_unique() } else { Pubkey::default() },
            lp_vault: if version >= 4 { Pubkey::new_unique() } else { Pubkey::default() },
            owner: Pubkey::new_unique(),
            lp_reserve: 777,
            padding: [0; 3],
        }
    }
}
