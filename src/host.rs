/// Host chain simulator for the flood monitoring ledger
///
/// Plays the role of the blockchain runtime around the ledger:
/// 1. Owns the single ledger instance
/// 2. Tracks the block height and only ever moves it forward
/// 3. Builds the per-call `TxContext` from the caller identity
/// 4. Optionally mines one block after each successful mutating call
/// 5. Seeds providers and thresholds from `ledger.toml`

use crate::config::LedgerConfig;
use crate::ledger::FloodMonitoringLedger;
use crate::logging::{self, LogSource};
use crate::model::{BlockHeight, LedgerError, ReadingId, TxContext};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Host configuration
pub struct HostConfig {
    /// Block height of the first call (default: 100)
    pub initial_block_height: BlockHeight,

    /// Mine a block after every successful mutating call (default: true)
    pub auto_mine: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            initial_block_height: 100,
            auto_mine: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Host State
// ---------------------------------------------------------------------------

pub struct HostChain {
    config: HostConfig,
    block_height: BlockHeight,
    ledger: FloodMonitoringLedger,
}

impl HostChain {
    /// Create a host with default configuration and an empty ledger
    pub fn new() -> Self {
        Self::with_config(HostConfig::default())
    }

    pub fn with_config(config: HostConfig) -> Self {
        Self {
            block_height: config.initial_block_height,
            config,
            ledger: FloodMonitoringLedger::new(),
        }
    }

    /// Build a host from `ledger.toml` settings, authorizing the configured
    /// providers and setting thresholds at the initial block height.
    pub fn from_config(config: &LedgerConfig) -> Self {
        let mut host = Self::with_config(HostConfig {
            initial_block_height: config.host.initial_block_height,
            auto_mine: config.host.auto_mine,
        });

        for provider in &config.providers {
            logging::debug(
                LogSource::Config,
                None,
                &format!("Provider {} ({})", provider.id, provider.display_name()),
            );
            host.ledger.authorize_provider(&provider.id);
        }

        let ctx = host.context("config");
        for location in &config.locations {
            logging::debug(
                LogSource::Config,
                Some(&location.location_code),
                &format!("Seeding thresholds for {}", location.display_name()),
            );
            host.ledger.set_flood_thresholds(
                &location.location_code,
                location.river_level_threshold,
                location.rainfall_threshold,
                location.combined_threshold,
                &ctx,
            );
        }

        logging::info(
            LogSource::Host,
            None,
            &format!(
                "Seeded {} providers and {} locations at block {}",
                config.providers.len(),
                config.locations.len(),
                host.block_height
            ),
        );

        host
    }

    pub fn block_height(&self) -> BlockHeight {
        self.block_height
    }

    /// Move the chain forward by `blocks`, returning the new height.
    pub fn advance_blocks(&mut self, blocks: u64) -> BlockHeight {
        self.block_height = self.block_height.saturating_add(blocks);
        logging::debug(LogSource::Host, None, &format!("Mined to block {}", self.block_height));
        self.block_height
    }

    pub fn context(&self, sender: &str) -> TxContext {
        TxContext::new(sender, self.block_height)
    }

    pub fn ledger(&self) -> &FloodMonitoringLedger {
        &self.ledger
    }

    fn mined(&mut self) {
        if self.config.auto_mine {
            self.advance_blocks(1);
        }
    }

    // -----------------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------------

    pub fn authorize_provider(&mut self, provider: &str) {
        self.ledger.authorize_provider(provider);
        self.mined();
    }

    pub fn revoke_provider(&mut self, provider: &str) {
        self.ledger.revoke_provider(provider);
        self.mined();
    }

    pub fn set_flood_thresholds(
        &mut self,
        sender: &str,
        location: &str,
        river_level_threshold: u64,
        rainfall_threshold: u64,
        combined_threshold: u64,
    ) {
        let ctx = self.context(sender);
        self.ledger.set_flood_thresholds(
            location,
            river_level_threshold,
            rainfall_threshold,
            combined_threshold,
            &ctx,
        );
        self.mined();
    }

    /// A rejected submission leaves the block height unchanged.
    pub fn submit_reading(
        &mut self,
        sender: &str,
        location: &str,
        river_level: u64,
        rainfall_amount: u64,
        sensor_id: &str,
    ) -> Result<ReadingId, LedgerError> {
        let ctx = self.context(sender);
        let id = self
            .ledger
            .submit_reading(location, river_level, rainfall_amount, sensor_id, &ctx)?;
        self.mined();
        Ok(id)
    }

    pub fn clear_flood_alert(&mut self, location: &str) -> Result<(), LedgerError> {
        self.ledger.clear_flood_alert(location)?;
        self.mined();
        Ok(())
    }
}

impl Default for HostChain {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
