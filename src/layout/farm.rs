//! Farm ledger layout
//!
//! The per-staker deposit ledger of a farm pool. V3 farms track a single
//! reward debt, v5 (dual-reward) farms track two.

use solana_sdk::pubkey::Pubkey;

use super::{check_span, ByteReader, ByteWriter};
use crate::errors::{ResolveError, ResolveResult};

/// Byte span of a v3 farm ledger account
pub const FARM_LEDGER_SPAN_V3: usize = 88;

/// Byte span of a v5 farm ledger account
pub const FARM_LEDGER_SPAN_V5: usize = 96;

/// Decoded farm ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmLedger {
    pub version: u8,
    pub state: u64,
    /// Farm pool this ledger belongs to
    pub id: Pubkey,
    pub owner: Pubkey,
    pub deposited: u64,
    /// One entry per reward track of the farm version
    pub reward_debts: Vec<u64>,
}

impl FarmLedger {
    fn reward_count(version: u8) -> ResolveResult<usize> {
        match version {
            3 => Ok(1),
            5 => Ok(2),
            other => Err(ResolveError::UnsupportedVersion {
                kind: "farm ledger",
                version: other,
            }),
        }
    }

    /// Fixed byte span of the layout for a farm version
    pub fn span(version: u8) -> ResolveResult<usize> {
        Ok(match Self::reward_count(version)? {
            1 => FARM_LEDGER_SPAN_V3,
            _ => FARM_LEDGER_SPAN_V5,
        })
    }

    pub fn decode(version: u8, data: &[u8]) -> ResolveResult<Self> {
        let rewards = Self::reward_count(version)?;
        check_span(Self::span(version)?, data)?;
        let mut r = ByteReader::new(data);

        let state = r.read_u64();
        let id = r.read_pubkey();
        let owner = r.read_pubkey();
        let deposited = r.read_u64();
        let reward_debts = (0..rewards).map(|_| r.read_u64()).collect();
        debug_assert_eq!(r.remaining(), 0);

        Ok(Self {
            version,
            state,
            id,
            owner,
            deposited,
            reward_debts,
        })
    }

    pub fn encode(&self) -> ResolveResult<Vec<u8>> {
        let rewards = Self::reward_count(self.version)?;
        if self.reward_debts.len() != rewards {
            return Err(ResolveError::InvalidAccountData(format!(
                "farm ledger v{} expects {} reward debts, got {}",
                self.version,
                rewards,
                self.reward_debts.len()
            )));
        }
        let span = Self::span(self.version)?;
        let mut w = ByteWriter::with_span(span);

        w.write_u64(self.state);
        w.write_pubkey(&self.id);
        w.write_pubkey(&self.owner);
        w.write_u64(self.deposited);
        for debt in &self.reward_debts {
            w.write_u64(*debt);
        }

        Ok(w.finish(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ledger(version: u8) -> FarmLedger {
        FarmLedger {
            version,
            state: 1,
            id: Pubkey::new_unique(),
            owner: Pubkey::new_unique(),
            deposited: 5_000_000,
            reward_debts: if version == 5 { vec![17, 34] } else { vec![17] },
        }
    }

    #[test]
    fn test_round_trip_v3_and_v5() {
        for version in [3u8, 5] {
            let ledger = sample_ledger(version);
            let bytes = ledger.encode().unwrap();
            assert_eq!(bytes.len(), FarmLedger::span(version).unwrap());
            let decoded = FarmLedger::decode(version, &bytes).unwrap();
            assert_eq!(decoded, ledger);
            assert_eq!(decoded.encode().unwrap(), bytes);
        }
    }

    #[test]
    fn test_size_guard() {
        let bytes = sample_ledger(3).encode().unwrap();
        assert_eq!(
            FarmLedger::decode(5, &bytes),
            Err(ResolveError::InvalidAccountSize {
                expected: FARM_LEDGER_SPAN_V5,
                actual: FARM_LEDGER_SPAN_V3,
            })
        );
    }

    #[test]
    fn test_unknown_version_rejected() {
        let bytes = vec![0u8; FARM_LEDGER_SPAN_V3];
        assert!(matches!(
            FarmLedger::decode(4, &bytes),
            Err(ResolveError::UnsupportedVersion {
                kind: "farm ledger",
                ..
            })
        ));
    }

    #[test]
    fn test_encode_checks_reward_count() {
        let mut ledger = sample_ledger(3);
        ledger.reward_debts.push(99);
        assert!(matches!(
            ledger.encode(),
            Err(ResolveError::InvalidAccountData(_))
        ));
    }
}
