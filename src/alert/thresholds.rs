//! Flood threshold checking.
//!
//! A reading is a flood condition when the river level, the rainfall, or
//! their sum reaches the corresponding threshold for its location.

use crate::model::FloodThresholds;

/// Which threshold comparisons a reading met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThresholdBreach {
    pub river_level: bool,
    pub rainfall: bool,
    pub combined: bool,
}

impl ThresholdBreach {
    pub fn any(&self) -> bool {
        self.river_level || self.rainfall || self.combined
    }
}

/// Evaluates each comparison separately. The combined sum is widened so
/// that large readings cannot overflow.
pub fn evaluate(river_level: u64, rainfall_amount: u64, thresholds: &FloodThresholds) -> ThresholdBreach {
    let combined = u128::from(river_level) + u128::from(rainfall_amount);
    ThresholdBreach {
        river_level: river_level >= thresholds.river_level_threshold,
        rainfall: rainfall_amount >= thresholds.rainfall_threshold,
        combined: combined >= u128::from(thresholds.combined_threshold),
    }
}

/// Returns true when at least one threshold comparison holds.
pub fn check_flood_condition(river_level: u64, rainfall_amount: u64, thresholds: &FloodThresholds) -> bool {
    evaluate(river_level, rainfall_amount, thresholds).any()
}
