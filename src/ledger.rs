/// Flood monitoring ledger: the record-and-evaluate state machine.
///
/// Owns every map the monitoring contract keeps (readings, thresholds,
/// providers, alerts). Each operation is a single synchronous transition and
/// either completes fully or returns an error without touching state. The
/// host supplies sender identity and block height through `TxContext`.

use crate::alert::epochs::{self, AlertTransition};
use crate::alert::thresholds;
use crate::logging::{self, LogSource};
use crate::model::{
    BlockHeight, FloodAlert, FloodThresholds, LedgerError, ReadingId, TxContext, WaterLevelReading,
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Summary of ledger state for status reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSnapshot {
    pub last_reading_id: ReadingId,
    pub reading_count: usize,
    pub flood_reading_count: usize,
    pub monitored_locations: usize,
    pub authorized_providers: usize,
    pub active_alerts: Vec<LocationAlert>,
}

/// An alert paired with the location it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationAlert {
    pub location_code: String,
    #[serde(flatten)]
    pub alert: FloodAlert,
}

#[derive(Debug, Default)]
pub struct FloodMonitoringLedger {
    last_reading_id: ReadingId,
    readings: BTreeMap<ReadingId, WaterLevelReading>,
    thresholds: HashMap<String, FloodThresholds>,
    providers: HashMap<String, bool>,
    alerts: BTreeMap<String, FloodAlert>,
}

impl FloodMonitoringLedger {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Provider authorization
    // -----------------------------------------------------------------------

    pub fn authorize_provider(&mut self, provider: &str) {
        self.providers.insert(provider.to_string(), true);
        logging::info(LogSource::Ledger, None, &format!("Authorized provider {}", provider));
    }

    /// Readings already recorded by the provider stay untouched.
    pub fn revoke_provider(&mut self, provider: &str) {
        self.providers.insert(provider.to_string(), false);
        logging::info(LogSource::Ledger, None, &format!("Revoked provider {}", provider));
    }

    pub fn is_provider_authorized(&self, provider: &str) -> bool {
        self.providers.get(provider).copied().unwrap_or(false)
    }

    // -----------------------------------------------------------------------
    // Thresholds
    // -----------------------------------------------------------------------

    /// Replaces the location's thresholds wholesale, stamped with the
    /// caller's block height.
    pub fn set_flood_thresholds(
        &mut self,
        location: &str,
        river_level_threshold: u64,
        rainfall_threshold: u64,
        combined_threshold: u64,
        ctx: &TxContext,
    ) {
        let record = FloodThresholds {
            river_level_threshold,
            rainfall_threshold,
            combined_threshold,
            last_updated: ctx.block_height,
        };
        logging::debug(
            LogSource::Ledger,
            Some(location),
            &format!(
                "Thresholds set: river {} / rain {} / combined {} at block {}",
                river_level_threshold, rainfall_threshold, combined_threshold, ctx.block_height
            ),
        );
        self.thresholds.insert(location.to_string(), record);
    }

    /// Thresholds explicitly set for a location, if any.
    pub fn flood_thresholds(&self, location: &str) -> Option<&FloodThresholds> {
        self.thresholds.get(location)
    }

    /// Thresholds in effect for a location; all-zero when none were set.
    pub fn effective_thresholds(&self, location: &str) -> FloodThresholds {
        self.thresholds
            .get(location)
            .cloned()
            .unwrap_or_else(FloodThresholds::zero)
    }

    // -----------------------------------------------------------------------
    // Readings
    // -----------------------------------------------------------------------

    /// Records a reading from `ctx.sender` and returns its id.
    ///
    /// Fails with `Unauthorized` before any state is touched when the sender
    /// is not an authorized provider. A flood reading also updates the
    /// location's alert.
    pub fn submit_reading(
        &mut self,
        location: &str,
        river_level: u64,
        rainfall_amount: u64,
        sensor_id: &str,
        ctx: &TxContext,
    ) -> Result<ReadingId, LedgerError> {
        if !self.is_provider_authorized(&ctx.sender) {
            logging::warn(
                LogSource::Ledger,
                Some(location),
                &format!("Rejected reading from unauthorized provider {}", ctx.sender),
            );
            return Err(LedgerError::Unauthorized { provider: ctx.sender.clone() });
        }

        let reading_id = self.last_reading_id + 1;
        let thresholds = self.effective_thresholds(location);
        let is_flood = thresholds::check_flood_condition(river_level, rainfall_amount, &thresholds);

        self.last_reading_id = reading_id;
        self.readings.insert(
            reading_id,
            WaterLevelReading {
                location_code: location.to_string(),
                river_level,
                rainfall_amount,
                reading_time: ctx.block_height,
                sensor_id: sensor_id.to_string(),
                is_flood_condition: is_flood,
            },
        );

        if is_flood {
            self.update_flood_alert(location, reading_id, ctx.block_height);
        }

        Ok(reading_id)
    }

    fn update_flood_alert(&mut self, location: &str, reading_id: ReadingId, block_height: BlockHeight) {
        let (alert, transition) = epochs::next_alert(self.alerts.get(location), reading_id, block_height);

        match transition {
            AlertTransition::Started => logging::warn(
                LogSource::Ledger,
                Some(location),
                &format!("Flood alert raised by reading {} at block {}", reading_id, block_height),
            ),
            AlertTransition::Escalated => logging::warn(
                LogSource::Ledger,
                Some(location),
                &format!("Flood alert escalated to level {} by reading {}", alert.alert_level, reading_id),
            ),
        }

        self.alerts.insert(location.to_string(), alert);
    }

    pub fn reading(&self, reading_id: ReadingId) -> Option<&WaterLevelReading> {
        self.readings.get(&reading_id)
    }

    /// Id of the most recent reading; 0 before the first submission.
    pub fn last_reading_id(&self) -> ReadingId {
        self.last_reading_id
    }

    /// All readings for a location, in submission order.
    pub fn readings_for_location(&self, location: &str) -> Vec<(ReadingId, &WaterLevelReading)> {
        self.readings
            .iter()
            .filter(|(_, r)| r.location_code == location)
            .map(|(id, r)| (*id, r))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Alerts
    // -----------------------------------------------------------------------

    /// Marks the location's alert inactive, keeping its level, start time
    /// and last reading id. Fails with `NotFound` if no alert was ever raised.
    pub fn clear_flood_alert(&mut self, location: &str) -> Result<(), LedgerError> {
        let alert = self
            .alerts
            .get_mut(location)
            .ok_or_else(|| LedgerError::NotFound { location: location.to_string() })?;

        alert.is_active = false;
        logging::info(
            LogSource::Ledger,
            Some(location),
            &format!("Flood alert cleared at level {}", alert.alert_level),
        );
        Ok(())
    }

    pub fn flood_alert(&self, location: &str) -> Option<&FloodAlert> {
        self.alerts.get(location)
    }

    /// Active alerts ordered by location code.
    pub fn active_alerts(&self) -> Vec<LocationAlert> {
        self.alerts
            .iter()
            .filter(|(_, a)| a.is_active)
            .map(|(location, a)| LocationAlert {
                location_code: location.clone(),
                alert: a.clone(),
            })
            .collect()
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            last_reading_id: self.last_reading_id,
            reading_count: self.readings.len(),
            flood_reading_count: self.readings.values().filter(|r| r.is_flood_condition).count(),
            monitored_locations: self.thresholds.len(),
            authorized_providers: self.providers.values().filter(|a| **a).count(),
            active_alerts: self.active_alerts(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
