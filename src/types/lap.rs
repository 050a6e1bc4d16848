//! Lap timing data shared by session and per-car updates.

use serde::{Deserialize, Serialize};

/// Sentinel the server places in sector slots that were never completed.
pub const INVALID_SECTOR_TIME_MS: i32 = 2_147_483_647;

/// Minimum number of split entries a decoded lap always carries.
pub const MIN_SPLIT_COUNT: usize = 3;

/// Classification of a lap, derived from two wire flags.
///
/// The protocol transmits `is_out_lap` and `is_in_lap` as separate booleans
/// that are mutually exclusive by contract; both false means a regular
/// flying lap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LapType {
    Error,
    Outlap,
    Regular,
    Inlap,
}

impl LapType {
    /// Collapse the two wire flags into the lap classification.
    pub fn from_flags(is_out_lap: bool, is_in_lap: bool) -> Self {
        if is_out_lap {
            LapType::Outlap
        } else if is_in_lap {
            LapType::Inlap
        } else {
            LapType::Regular
        }
    }
}

/// One lap as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapInfo {
    pub lap_time_ms: i32,
    /// Sector splits in ms, zero-padded to at least [`MIN_SPLIT_COUNT`].
    pub splits: Vec<i32>,
    pub car_index: u16,
    pub driver_index: u16,
    pub is_invalid: bool,
    pub is_valid_for_best: bool,
    pub lap_type: LapType,
}

impl LapInfo {
    /// True when every transmitted sector carries a real time rather than
    /// the [`INVALID_SECTOR_TIME_MS`] sentinel.
    pub fn has_valid_sectors(&self) -> bool {
        self.splits.iter().all(|&split| split != INVALID_SECTOR_TIME_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lap_type_derivation_from_flags() {
        assert_eq!(LapType::from_flags(true, false), LapType::Outlap);
        assert_eq!(LapType::from_flags(false, true), LapType::Inlap);
        assert_eq!(LapType::from_flags(false, false), LapType::Regular);
        // Protocol contract says both flags never arrive set; out-lap wins
        // if a server ever violates it.
        assert_eq!(LapType::from_flags(true, true), LapType::Outlap);
    }

    #[test]
    fn sector_sentinel_detection() {
        let lap = LapInfo {
            lap_time_ms: 104_523,
            splits: vec![34_100, 35_221, INVALID_SECTOR_TIME_MS],
            car_index: 7,
            driver_index: 0,
            is_invalid: false,
            is_valid_for_best: false,
            lap_type: LapType::Regular,
        };
        assert!(!lap.has_valid_sectors());

        let complete = LapInfo { splits: vec![34_100, 35_221, 35_202], ..lap };
        assert!(complete.has_valid_sectors());
    }
}
