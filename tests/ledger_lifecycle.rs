/// Integration tests for the flood monitoring ledger
///
/// These tests walk the ledger through the full provider / threshold /
/// reading / alert lifecycle, driven both directly and through the host
/// chain the way a runtime would.
///
/// Run with: cargo test --test ledger_lifecycle

use flomon_ledger::config;
use flomon_ledger::host::{HostChain, HostConfig};
use flomon_ledger::{FloodMonitoringLedger, FloodThresholds, LedgerError, TxContext};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const PROVIDER: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";
const OTHER: &str = "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG";

fn at(height: u64) -> TxContext {
    TxContext::new(PROVIDER, height)
}

fn zone001_ledger() -> FloodMonitoringLedger {
    let mut ledger = FloodMonitoringLedger::new();
    ledger.authorize_provider(PROVIDER);
    ledger.set_flood_thresholds("ZONE001", 100, 50, 120, &at(100));
    ledger
}

// ---------------------------------------------------------------------------
// 1. Reading Ids
// ---------------------------------------------------------------------------

#[test]
fn test_reading_ids_are_sequential_without_gaps() {
    let mut ledger = zone001_ledger();
    let mut ids = Vec::new();

    for i in 0..10u64 {
        // Interleave rejected submissions; they must not consume ids.
        let rejected = ledger.submit_reading("ZONE001", i, i, "S", &TxContext::new(OTHER, 100 + i));
        assert!(rejected.is_err());

        ids.push(ledger.submit_reading("ZONE001", i, i, "S", &at(100 + i)).unwrap());
    }

    assert_eq!(ids, (1..=10).collect::<Vec<u64>>());
    assert_eq!(ledger.last_reading_id(), 10);
}

#[test]
fn test_revoked_provider_keeps_prior_readings() {
    let mut ledger = zone001_ledger();
    ledger.submit_reading("ZONE001", 10, 10, "S", &at(100)).unwrap();

    ledger.revoke_provider(PROVIDER);
    let result = ledger.submit_reading("ZONE001", 10, 10, "S", &at(101));

    assert_eq!(result, Err(LedgerError::Unauthorized { provider: PROVIDER.to_string() }));
    assert!(ledger.reading(1).is_some(), "revocation must not invalidate recorded readings");
    assert_eq!(ledger.last_reading_id(), 1);
}

// ---------------------------------------------------------------------------
// 2. Flood Evaluation
// ---------------------------------------------------------------------------

#[test]
fn test_flood_flag_uses_thresholds_at_submission_time() {
    let mut ledger = zone001_ledger();
    ledger.submit_reading("ZONE001", 90, 10, "S", &at(100)).unwrap();
    assert!(!ledger.reading(1).unwrap().is_flood_condition);

    // Lowering the thresholds afterwards does not rewrite reading 1.
    ledger.set_flood_thresholds("ZONE001", 80, 50, 120, &at(101));
    ledger.submit_reading("ZONE001", 90, 10, "S", &at(102)).unwrap();

    assert!(!ledger.reading(1).unwrap().is_flood_condition);
    assert!(ledger.reading(2).unwrap().is_flood_condition);
}

#[test]
fn test_each_comparison_can_trigger_alone() {
    let thresholds = FloodThresholds {
        river_level_threshold: 100,
        rainfall_threshold: 50,
        combined_threshold: 200,
        last_updated: 0,
    };
    let cases = [
        ((100, 0), true),   // river only
        ((0, 50), true),    // rainfall only
        ((99, 49), false),  // nothing
    ];

    for ((river, rain), expected) in cases {
        assert_eq!(
            flomon_ledger::alert::thresholds::check_flood_condition(river, rain, &thresholds),
            expected,
            "river={} rain={}",
            river,
            rain
        );
    }
}

// ---------------------------------------------------------------------------
// 3. Alert Epochs
// ---------------------------------------------------------------------------

#[test]
fn test_example_scenario_combined_then_calm() {
    let mut ledger = zone001_ledger();

    ledger.submit_reading("ZONE001", 70, 60, "SENSOR001", &at(100)).unwrap();
    assert!(ledger.reading(1).unwrap().is_flood_condition, "70 + 60 = 130 >= 120");

    let alert = ledger.flood_alert("ZONE001").unwrap().clone();
    assert_eq!(alert.alert_level, 1);
    assert!(alert.is_active);

    ledger.submit_reading("ZONE001", 50, 30, "SENSOR001", &at(101)).unwrap();
    assert!(!ledger.reading(2).unwrap().is_flood_condition);
    assert_eq!(ledger.flood_alert("ZONE001").unwrap(), &alert, "calm reading leaves alert unchanged");
}

#[test]
fn test_alert_level_counts_within_epoch_and_resets_after_clear() {
    let mut ledger = zone001_ledger();

    for (i, height) in [100u64, 104, 109].iter().enumerate() {
        ledger.submit_reading("ZONE001", 150, 0, "S", &at(*height)).unwrap();
        let alert = ledger.flood_alert("ZONE001").unwrap();
        assert_eq!(alert.alert_level, i as u64 + 1);
        assert_eq!(alert.start_time, 100);
    }

    ledger.clear_flood_alert("ZONE001").unwrap();
    let cleared = ledger.flood_alert("ZONE001").unwrap();
    assert!(!cleared.is_active);
    assert_eq!(cleared.alert_level, 3);
    assert_eq!(cleared.start_time, 100);
    assert_eq!(cleared.last_reading_id, 3);

    ledger.submit_reading("ZONE001", 150, 0, "S", &at(120)).unwrap();
    let restarted = ledger.flood_alert("ZONE001").unwrap();
    assert!(restarted.is_active);
    assert_eq!(restarted.alert_level, 1);
    assert_eq!(restarted.start_time, 120);
    assert_eq!(restarted.last_reading_id, 4);
}

#[test]
fn test_alerts_are_tracked_per_location() {
    let mut ledger = zone001_ledger();
    ledger.set_flood_thresholds("ZONE002", 10, 10, 10, &at(100));

    ledger.submit_reading("ZONE001", 150, 0, "S", &at(100)).unwrap();
    ledger.submit_reading("ZONE002", 15, 0, "S", &at(101)).unwrap();
    ledger.submit_reading("ZONE002", 15, 0, "S", &at(102)).unwrap();

    assert_eq!(ledger.flood_alert("ZONE001").unwrap().alert_level, 1);
    assert_eq!(ledger.flood_alert("ZONE002").unwrap().alert_level, 2);

    ledger.clear_flood_alert("ZONE002").unwrap();
    let active: Vec<String> = ledger.active_alerts().into_iter().map(|a| a.location_code).collect();
    assert_eq!(active, vec!["ZONE001".to_string()]);
}

#[test]
fn test_clearing_twice_is_allowed_but_unknown_location_is_not() {
    let mut ledger = zone001_ledger();
    ledger.submit_reading("ZONE001", 150, 0, "S", &at(100)).unwrap();

    assert!(ledger.clear_flood_alert("ZONE001").is_ok());
    assert!(ledger.clear_flood_alert("ZONE001").is_ok(), "alert still exists after clearing");
    assert!(matches!(
        ledger.clear_flood_alert("ZONE999"),
        Err(LedgerError::NotFound { .. })
    ));
}

// ---------------------------------------------------------------------------
// 4. Host Chain
// ---------------------------------------------------------------------------

#[test]
fn test_host_from_shipped_config() {
    let cfg = config::load_config_default().expect("ledger.toml should load");
    let mut host = HostChain::from_config(&cfg);

    assert!(host.ledger().is_provider_authorized(PROVIDER));
    let start = host.block_height();

    let id = host.submit_reading(PROVIDER, "ZONE001", 120, 30, "SENSOR001").unwrap();
    assert_eq!(id, 1);

    let alert = host.ledger().flood_alert("ZONE001").unwrap();
    assert_eq!(alert.start_time, start);
    assert!(alert.is_active);
}

#[test]
fn test_host_stamps_each_call_with_current_height() {
    let mut host = HostChain::with_config(HostConfig {
        initial_block_height: 100,
        auto_mine: false,
    });
    host.authorize_provider(PROVIDER);
    host.set_flood_thresholds(PROVIDER, "ZONE001", 100, 50, 120);

    host.submit_reading(PROVIDER, "ZONE001", 120, 0, "S").unwrap();
    host.advance_blocks(7);
    host.submit_reading(PROVIDER, "ZONE001", 130, 40, "S").unwrap();

    let alert = host.ledger().flood_alert("ZONE001").unwrap();
    assert_eq!(alert.alert_level, 2);
    assert_eq!(alert.start_time, 100);
    assert_eq!(host.ledger().reading(2).unwrap().reading_time, 107);
    assert_eq!(host.ledger().flood_thresholds("ZONE001").unwrap().last_updated, 100);
}
