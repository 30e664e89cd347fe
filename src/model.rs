/// Core data types for the flood monitoring ledger.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond small constructors, and no I/O.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Sequential reading identifier. The first reading is 1; 0 means "none yet".
pub type ReadingId = u64;

/// Host-supplied block height, used as the ledger's only notion of time.
pub type BlockHeight = u64;

/// Per-call inputs supplied by the host environment.
///
/// Both fields are trusted: the ledger never derives them itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxContext {
    pub sender: String,
    pub block_height: BlockHeight,
}

impl TxContext {
    pub fn new(sender: impl Into<String>, block_height: BlockHeight) -> Self {
        Self {
            sender: sender.into(),
            block_height,
        }
    }
}

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// A single water-level observation recorded by an authorized provider.
///
/// Immutable once stored. `is_flood_condition` captures the evaluation
/// against the thresholds in effect at submission time, so later threshold
/// changes never rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterLevelReading {
    pub location_code: String,
    pub river_level: u64,
    pub rainfall_amount: u64,
    pub reading_time: BlockHeight,
    pub sensor_id: String,
    pub is_flood_condition: bool,
}

// ---------------------------------------------------------------------------
// Threshold types
// ---------------------------------------------------------------------------

/// Flood thresholds for one location.
///
/// A reading is a flood condition when any of the three comparisons holds:
///   river_level >= river_level_threshold
///   rainfall    >= rainfall_threshold
///   river_level + rainfall >= combined_threshold
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloodThresholds {
    pub river_level_threshold: u64,
    pub rainfall_threshold: u64,
    pub combined_threshold: u64,
    pub last_updated: BlockHeight,
}

impl FloodThresholds {
    /// The record used for locations that never had thresholds set.
    /// Every reading meets an all-zero threshold.
    pub fn zero() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Alert types
// ---------------------------------------------------------------------------

/// Flood alert state for one location.
///
/// `alert_level` counts flood readings within the current epoch and
/// `start_time` is the block height at which the epoch began. Clearing only
/// flips `is_active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloodAlert {
    pub alert_level: u64,
    pub start_time: BlockHeight,
    pub last_reading_id: ReadingId,
    pub is_active: bool,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors returned by ledger operations. A failed call mutates nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The sender is not an authorized data provider.
    Unauthorized { provider: String },
    /// No flood alert has ever been raised for the location.
    NotFound { location: String },
}

impl LedgerError {
    /// Numeric code matching the contract's `(err u1)` responses.
    pub fn code(&self) -> u32 {
        match self {
            LedgerError::Unauthorized { .. } | LedgerError::NotFound { .. } => 1,
        }
    }
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::Unauthorized { provider } => {
                write!(f, "Unauthorized provider: {}", provider)
            }
            LedgerError::NotFound { location } => {
                write!(f, "No flood alert found for location: {}", location)
            }
        }
    }
}

impl std::error::Error for LedgerError {}
