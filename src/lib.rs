/// flomon_ledger: flood monitoring ledger for water-level sensor readings.
///
/// # Module structure
///
/// ```text
/// flomon_ledger
/// ├── model       — shared data types (WaterLevelReading, FloodThresholds, FloodAlert, LedgerError, …)
/// ├── ledger      — FloodMonitoringLedger: providers, thresholds, readings, alerts
/// ├── alert
/// │   ├── thresholds — flood condition evaluation for a reading
/// │   └── epochs     — alert start / escalation transitions
/// ├── host        — host chain simulator (block height, sender context, seeding)
/// ├── config      — ledger configuration loader (ledger.toml)
/// ├── endpoint    — JSON HTTP API over the host
/// └── logging     — structured console/file logging
/// ```

/// Public modules
pub mod alert;
pub mod config;
pub mod endpoint;
pub mod host;
pub mod ledger;
pub mod logging;
pub mod model;

pub use host::HostChain;
pub use ledger::FloodMonitoringLedger;
pub use model::{FloodAlert, FloodThresholds, LedgerError, TxContext, WaterLevelReading};
